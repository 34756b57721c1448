use crate::filter::{push_list_clauses, Condition, ListOptions, SortDirection};
use crate::models::DbProduct;
use chrono::Utc;
use eyre::{bail, Result};
use praxis_core::models::product::{
    CreateProductRequest, NumericUpdate, TagsUpdate, UpdateProductRequest,
};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

pub const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "event_id",
    "name",
    "price",
    "price_max",
    "is_deleted",
    "created_at",
    "updated_at",
];

const PRODUCT_RETURNING: &str = "id, event_id, name, description, price, price_max, image, \
     tags, is_deleted, created_at, updated_at";

pub async fn create_product(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    request: &CreateProductRequest,
) -> Result<DbProduct> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let product = sqlx::query_as::<_, DbProduct>(&format!(
        r#"
        INSERT INTO products (id, event_id, name, description, price, price_max, image, tags,
                              is_deleted, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, $9)
        RETURNING {PRODUCT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(event_id)
    .bind(&request.name)
    .bind(&request.description)
    .bind(request.price)
    .bind(request.price_max)
    .bind(&request.image)
    .bind(&request.tags)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

// Soft-deleted rows stay addressable by id.
pub async fn get_product_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProduct>> {
    let product = sqlx::query_as::<_, DbProduct>(&format!(
        r#"
        SELECT {PRODUCT_RETURNING}
        FROM products
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn list_products_by_event_id(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    include_deleted: bool,
) -> Result<Vec<DbProduct>> {
    let mut conditions = vec![Condition::eq("event_id", event_id)];
    if !include_deleted {
        conditions.push(Condition::eq("is_deleted", false));
    }

    let options = ListOptions {
        filter: Some(Condition::And(conditions)),
        order_by: Some(("created_at".to_string(), SortDirection::Asc)),
        limit: None,
        offset: None,
    };

    let mut qb = QueryBuilder::new(format!("SELECT {PRODUCT_RETURNING} FROM products"));
    push_list_clauses(&mut qb, &options, PRODUCT_COLUMNS)?;

    let products = qb.build_query_as::<DbProduct>().fetch_all(pool).await?;
    Ok(products)
}

fn push_numeric_update(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    update: &NumericUpdate,
) -> Result<()> {
    qb.push(", ");
    qb.push(column);
    qb.push(" = ");
    match update {
        NumericUpdate::Set(value) => {
            qb.push_bind(*value);
        }
        NumericUpdate::Increment(delta) => {
            qb.push(column);
            qb.push(" + ");
            qb.push_bind(*delta);
        }
        NumericUpdate::Decrement(delta) => {
            qb.push(column);
            qb.push(" - ");
            qb.push_bind(*delta);
        }
        NumericUpdate::Multiply(factor) => {
            qb.push(column);
            qb.push(" * ");
            qb.push_bind(*factor);
        }
        NumericUpdate::Divide(divisor) => {
            if *divisor == 0.0 {
                bail!("cannot divide {column} by zero");
            }
            qb.push(column);
            qb.push(" / ");
            qb.push_bind(*divisor);
        }
    }
    Ok(())
}

pub async fn update_product(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateProductRequest,
) -> Result<Option<DbProduct>> {
    let now = Utc::now();

    let mut qb = QueryBuilder::new("UPDATE products SET updated_at = ");
    qb.push_bind(now);

    if let Some(name) = &request.name {
        qb.push(", name = ");
        qb.push_bind(name.clone());
    }
    if let Some(description) = &request.description {
        qb.push(", description = ");
        qb.push_bind(description.clone());
    }
    if let Some(image) = &request.image {
        qb.push(", image = ");
        qb.push_bind(image.clone());
    }
    if let Some(update) = &request.price {
        push_numeric_update(&mut qb, "price", update)?;
    }
    if let Some(update) = &request.price_max {
        push_numeric_update(&mut qb, "price_max", update)?;
    }
    if let Some(tags) = &request.tags {
        match tags {
            TagsUpdate::Set(values) => {
                qb.push(", tags = ");
                qb.push_bind(values.clone());
            }
            TagsUpdate::Push(item) => {
                qb.push(", tags = array_append(tags, ");
                qb.push_bind(item.clone());
                qb.push(")");
            }
        }
    }

    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb.push(format!(" RETURNING {PRODUCT_RETURNING}"));

    let product = qb
        .build_query_as::<DbProduct>()
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

pub async fn soft_delete_product(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProduct>> {
    let now = Utc::now();

    tracing::debug!("Soft-deleting product {}", id);

    let product = sqlx::query_as::<_, DbProduct>(&format!(
        r#"
        UPDATE products
        SET is_deleted = TRUE, updated_at = $2
        WHERE id = $1
        RETURNING {PRODUCT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render_update(request: &UpdateProductRequest) -> Result<String> {
        let mut qb = QueryBuilder::new("UPDATE products SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(update) = &request.price {
            push_numeric_update(&mut qb, "price", update)?;
        }
        if let Some(update) = &request.price_max {
            push_numeric_update(&mut qb, "price_max", update)?;
        }
        Ok(qb.into_sql())
    }

    fn price_only(update: NumericUpdate) -> UpdateProductRequest {
        UpdateProductRequest {
            name: None,
            description: None,
            image: None,
            price: Some(update),
            price_max: None,
            tags: None,
        }
    }

    #[test]
    fn set_renders_plain_assignment() {
        let sql = render_update(&price_only(NumericUpdate::Set(120.0))).unwrap();
        assert_eq!(sql, "UPDATE products SET updated_at = $1, price = $2");
    }

    #[test]
    fn increment_renders_self_referencing_assignment() {
        let sql = render_update(&price_only(NumericUpdate::Increment(15.0))).unwrap();
        assert_eq!(sql, "UPDATE products SET updated_at = $1, price = price + $2");
    }

    #[test]
    fn multiply_and_divide_render_arithmetic() {
        let sql = render_update(&price_only(NumericUpdate::Multiply(1.1))).unwrap();
        assert_eq!(sql, "UPDATE products SET updated_at = $1, price = price * $2");

        let sql = render_update(&price_only(NumericUpdate::Divide(2.0))).unwrap();
        assert_eq!(sql, "UPDATE products SET updated_at = $1, price = price / $2");
    }

    #[test]
    fn divide_by_zero_is_rejected() {
        assert!(render_update(&price_only(NumericUpdate::Divide(0.0))).is_err());
    }
}
