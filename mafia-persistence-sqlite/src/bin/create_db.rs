use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("MAFIA_DB_PATH").expect("MAFIA_DB_PATH env var not set");
    let parent = std::path::Path::new(&db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        if !parent.exists() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory for DB");
            println!("Created parent directory for DB at {}", parent.display());
        }
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .expect("Failed to create pool");

    mafia_persistence_sqlite::migrate(&pool)
        .await
        .expect("Failed to create tables");
    println!("Database ready at {}", db_path);
}
