use chrono::Utc;
use mockall::predicate;
use praxis_core::models::product::{NumericUpdate, TagsUpdate, UpdateProductRequest};
use praxis_db::models::DbProduct;
use uuid::Uuid;

use crate::test_utils::TestContext;

fn db_product(id: Uuid, is_deleted: bool) -> DbProduct {
    let now = Utc::now();
    DbProduct {
        id,
        event_id: Uuid::new_v4(),
        name: "Whitening".to_string(),
        description: None,
        price: 250.0,
        price_max: Some(400.0),
        image: None,
        tags: vec!["cosmetic".to_string()],
        is_deleted,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_soft_deleted_product_stays_retrievable() {
    let mut ctx = TestContext::new();
    let product_id = Uuid::new_v4();

    ctx.product_repo
        .expect_soft_delete_product()
        .with(predicate::eq(product_id))
        .times(1)
        .returning(|id| Ok(Some(db_product(id, true))));

    // The row survives deletion and is still served by id
    ctx.product_repo
        .expect_get_product_by_id()
        .with(predicate::eq(product_id))
        .times(1)
        .returning(|id| Ok(Some(db_product(id, true))));

    let deleted = ctx
        .product_repo
        .soft_delete_product(product_id)
        .await
        .unwrap()
        .expect("product should exist");
    assert!(deleted.is_deleted);

    let fetched = ctx
        .product_repo
        .get_product_by_id(product_id)
        .await
        .unwrap()
        .expect("soft-deleted product must remain retrievable");
    assert_eq!(fetched.id, product_id);
    assert!(fetched.is_deleted);
}

#[tokio::test]
async fn test_default_listing_excludes_deleted_lines() {
    let mut ctx = TestContext::new();
    let event_id = Uuid::new_v4();

    ctx.product_repo
        .expect_list_products_by_event_id()
        .with(predicate::eq(event_id), predicate::eq(false))
        .times(1)
        .returning(|_, _| Ok(vec![db_product(Uuid::new_v4(), false)]));

    ctx.product_repo
        .expect_list_products_by_event_id()
        .with(predicate::eq(event_id), predicate::eq(true))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                db_product(Uuid::new_v4(), false),
                db_product(Uuid::new_v4(), true),
            ])
        });

    let visible = ctx
        .product_repo
        .list_products_by_event_id(event_id, false)
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert!(visible.iter().all(|p| !p.is_deleted));

    let all = ctx
        .product_repo
        .list_products_by_event_id(event_id, true)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_price_delta_and_tag_push() {
    let mut ctx = TestContext::new();
    let product_id = Uuid::new_v4();

    let request = UpdateProductRequest {
        name: None,
        description: None,
        image: None,
        price: Some(NumericUpdate::Increment(50.0)),
        price_max: None,
        tags: Some(TagsUpdate::Push("urgent".to_string())),
    };

    ctx.product_repo
        .expect_update_product()
        .times(1)
        .returning(|id, request| {
            let mut product = db_product(id, false);
            match request.price {
                Some(NumericUpdate::Increment(delta)) => product.price += delta,
                _ => panic!("expected an increment delta"),
            }
            if let Some(TagsUpdate::Push(tag)) = request.tags {
                product.tags.push(tag);
            }
            Ok(Some(product))
        });

    let updated = ctx
        .product_repo
        .update_product(product_id, request)
        .await
        .unwrap()
        .expect("product should exist");

    assert_eq!(updated.price, 300.0);
    assert_eq!(
        updated.tags,
        vec!["cosmetic".to_string(), "urgent".to_string()]
    );
}
