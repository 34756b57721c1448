use crate::models::{DbCity, DbCounty};
use chrono::Utc;
use eyre::Result;
use praxis_core::models::geo::{CreateCityRequest, CreateCountyRequest, UpdateCountyRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COUNTY_RETURNING: &str = "id, name, code, created_at, updated_at";
const CITY_RETURNING: &str = "id, county_id, name, created_at, updated_at";

pub async fn create_county(
    pool: &Pool<Postgres>,
    request: &CreateCountyRequest,
) -> Result<DbCounty> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let county = sqlx::query_as::<_, DbCounty>(&format!(
        r#"
        INSERT INTO counties (id, name, code, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING {COUNTY_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(&request.name)
    .bind(&request.code)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(county)
}

pub async fn get_county_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbCounty>> {
    let county = sqlx::query_as::<_, DbCounty>(&format!(
        r#"
        SELECT {COUNTY_RETURNING}
        FROM counties
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(county)
}

pub async fn list_counties(pool: &Pool<Postgres>) -> Result<Vec<DbCounty>> {
    let counties = sqlx::query_as::<_, DbCounty>(&format!(
        r#"
        SELECT {COUNTY_RETURNING}
        FROM counties
        ORDER BY name ASC
        "#,
    ))
    .fetch_all(pool)
    .await?;

    Ok(counties)
}

// Cities reference counties by id, so renames and code changes never
// orphan them.
pub async fn update_county(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateCountyRequest,
) -> Result<Option<DbCounty>> {
    let Some(county) = get_county_by_id(pool, id).await? else {
        return Ok(None);
    };

    let now = Utc::now();

    let updated = sqlx::query_as::<_, DbCounty>(&format!(
        r#"
        UPDATE counties
        SET name = $2, code = $3, updated_at = $4
        WHERE id = $1
        RETURNING {COUNTY_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(request.name.as_deref().unwrap_or(&county.name))
    .bind(request.code.as_deref().unwrap_or(&county.code))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn create_city(
    pool: &Pool<Postgres>,
    county_id: Uuid,
    request: &CreateCityRequest,
) -> Result<DbCity> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let city = sqlx::query_as::<_, DbCity>(&format!(
        r#"
        INSERT INTO cities (id, county_id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING {CITY_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(county_id)
    .bind(&request.name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(city)
}

pub async fn list_cities_by_county_id(
    pool: &Pool<Postgres>,
    county_id: Uuid,
) -> Result<Vec<DbCity>> {
    let cities = sqlx::query_as::<_, DbCity>(&format!(
        r#"
        SELECT {CITY_RETURNING}
        FROM cities
        WHERE county_id = $1
        ORDER BY name ASC
        "#,
    ))
    .bind(county_id)
    .fetch_all(pool)
    .await?;

    Ok(cities)
}
