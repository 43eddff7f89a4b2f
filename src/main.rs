use std::sync::Arc;

use log::info;
use mafia_club_app::{build_application, domain::access::AdminPolicy};
use mafia_persistence_sqlite::{
    avatars::FsAvatarStorage, create_db_pool, games::SqliteGameRepository, migrate,
    players::SqlitePlayerRepository, users::SqliteUserRepository,
};

mod config;
mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger();

    let settings = config::Settings::from_env();

    let pool = create_db_pool();
    migrate(&pool)
        .await
        .expect("Failed to create the database schema");

    let player_repo = Arc::new(SqlitePlayerRepository::new(pool.clone()));
    let game_repo = Arc::new(SqliteGameRepository::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepository::new(pool));
    let avatar_storage = Arc::new(FsAvatarStorage::new(settings.static_dir.clone()));

    let app = Arc::new(build_application(
        player_repo,
        game_repo,
        user_repo,
        avatar_storage,
        AdminPolicy::new(settings.admin_id),
    ));

    info!("Starting application, admin is {}", settings.admin_id);

    let http_app = {
        let app = app.clone();
        let static_dir = settings.static_dir.clone();
        tokio::spawn(async move {
            mafia_club_api::http::run(app, static_dir, shutdown_signal()).await;
        })
    };

    let bot_app = tokio::spawn(async move {
        mafia_club_api::bot::run(settings.bot_token, app, shutdown_signal()).await;
    });

    let (r1, r2) = tokio::join!(http_app, bot_app);

    if let Err(e) = r1 {
        log::error!("Web view task failed: {}", e);
    }

    if let Err(e) = r2 {
        log::error!("Telegram bot task failed: {}", e);
    }
}
