use std::path::PathBuf;

use mafia_club_app::domain::TelegramId;

/// Startup settings that are not owned by a single component.
pub struct Settings {
    pub bot_token: String,
    pub admin_id: TelegramId,
    pub static_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let bot_token =
            std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
        let admin_id = std::env::var("ADMIN_ID")
            .expect("ADMIN_ID must be set")
            .trim()
            .parse::<i64>()
            .expect("ADMIN_ID must be a Telegram user id");
        let static_dir = std::env::var("MAFIA_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        Self {
            bot_token,
            admin_id: TelegramId(admin_id),
            static_dir: PathBuf::from(static_dir),
        }
    }
}
