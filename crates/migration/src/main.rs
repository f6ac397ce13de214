use sea_orm_migration::prelude::*;

/// Assemble `DATABASE_URL` from the `PRISM_DATABASE_*` variables unless it is already set.
fn database_url_from_env() -> Option<String> {
    let var = |key: &str| std::env::var(key).ok();
    Some(format!(
        "postgres://{}:{}@{}:{}/{}",
        var("PRISM_DATABASE_USER")?,
        var("PRISM_DATABASE_PASSWORD").unwrap_or_default(),
        var("PRISM_DATABASE_HOST").unwrap_or_else(|| "localhost".to_string()),
        var("PRISM_DATABASE_PORT").unwrap_or_else(|| "5432".to_string()),
        var("PRISM_DATABASE_NAME")?,
    ))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        if let Some(url) = database_url_from_env() {
            std::env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
