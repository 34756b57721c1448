use color_eyre::eyre::Result;
use dotenv::dotenv;
use praxis_api::config::ApiConfig;
use praxis_db::{create_pool, schema::initialize_database};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool and apply the schema
    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    info!("Migration complete");
    Ok(())
}
