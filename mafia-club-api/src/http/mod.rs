use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use log::info;
use mafia_club_app::Application;
use tower_http::services::ServeDir;

mod players;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub async fn run(
    app: Arc<Application>,
    static_dir: PathBuf,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let router: Router<AppState> = Router::new()
        .route("/players", get(players::get_table))
        .nest_service("/static", ServeDir::new(&static_dir));

    let port = std::env::var("MAFIA_HTTP_PORT")
        .expect("MAFIA_HTTP_PORT must be set")
        .parse::<u16>()
        .expect("MAFIA_HTTP_PORT must be a valid u16");
    let host = std::env::var("MAFIA_HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .expect("Failed to bind web view listener");

    info!(
        "Web view listening on {}:{}, static files from {}",
        host,
        port,
        static_dir.display()
    );
    if let Err(e) = axum::serve(listener, router.with_state(AppState { app }))
        .with_graceful_shutdown(shutdown_signal)
        .await
    {
        log::error!("Web view stopped with error: {}", e);
        return;
    }

    info!("Web view shut down gracefully");
}
