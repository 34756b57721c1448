use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            "index" BIGSERIAL NOT NULL,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            email_verified TIMESTAMP WITH TIME ZONE NULL,
            phone VARCHAR(64) NULL,
            password_hash VARCHAR(255) NULL,
            role VARCHAR(16) NOT NULL DEFAULT 'USER'
                CHECK (role IN ('USER', 'ADMIN')),
            banned BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create accounts table (external auth linkage; no audit timestamps)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            account_type VARCHAR(64) NOT NULL,
            provider VARCHAR(128) NOT NULL,
            provider_account_id VARCHAR(255) NOT NULL,
            refresh_token TEXT NULL,
            access_token TEXT NULL,
            expires_at BIGINT NULL,
            refresh_token_expires_in BIGINT NULL,
            token_type VARCHAR(64) NULL,
            scope VARCHAR(255) NULL,
            id_token TEXT NULL,
            session_state VARCHAR(255) NULL,
            CONSTRAINT uniq_provider_account UNIQUE (provider, provider_account_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create profiles table (at most one per user)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            avatar VARCHAR(512) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create tokens table (single-use credentials; no audit timestamps)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tokens (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            kind VARCHAR(32) NOT NULL
                CHECK (kind IN ('ACTIVATION', 'PASSWORD_RESET', 'MAGIC_LINK')),
            token VARCHAR(255) NOT NULL UNIQUE,
            expires TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create patients table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            gender VARCHAR(32) NULL,
            dob DATE NULL,
            email VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            city VARCHAR(255) NULL,
            county VARCHAR(255) NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE'
                CHECK (status IN ('ACTIVE', 'INACTIVE')),
            sms_notifications BOOLEAN NOT NULL DEFAULT TRUE,
            email_notifications BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create events table (appointments and day-off blocks)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            date TIMESTAMP WITH TIME ZONE NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NULL,
            end_time TIMESTAMP WITH TIME ZONE NULL,
            all_day BOOLEAN NOT NULL DEFAULT FALSE,
            kind VARCHAR(16) NOT NULL DEFAULT 'APPOINTMENT'
                CHECK (kind IN ('APPOINTMENT', 'DAY_OFF')),
            status VARCHAR(16) NOT NULL DEFAULT 'CREATED'
                CHECK (status IN ('CREATED', 'CONFIRMED', 'COMPLETED', 'CANCELLED', 'RESCHEDULED')),
            patient_id UUID NULL REFERENCES patients(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create proposed_times table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS proposed_times (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            date TIMESTAMP WITH TIME ZONE NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NULL,
            end_time TIMESTAMP WITH TIME ZONE NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'CREATED'
                CHECK (status IN ('CREATED', 'CONFIRMED', 'COMPLETED', 'CANCELLED', 'RESCHEDULED')),
            notified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create products table (soft-deleted, never dropped)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price DOUBLE PRECISION NOT NULL,
            price_max DOUBLE PRECISION NULL,
            image VARCHAR(512) NULL,
            tags TEXT[] NOT NULL DEFAULT '{}',
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create counties table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS counties (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            code VARCHAR(16) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create cities table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cities (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            county_id UUID NOT NULL REFERENCES counties(id),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes (one statement per prepared query)
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_tokens_user_id ON tokens(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_patients_user_id ON patients(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status)",
        "CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_events_patient_id ON events(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)",
        "CREATE INDEX IF NOT EXISTS idx_events_status ON events(status)",
        "CREATE INDEX IF NOT EXISTS idx_proposed_times_event_id ON proposed_times(event_id)",
        "CREATE INDEX IF NOT EXISTS idx_products_event_id ON products(event_id)",
        "CREATE INDEX IF NOT EXISTS idx_cities_county_id ON cities(county_id)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
