use std::sync::Arc;

use dashmap::DashMap;
use log::info;
use mafia_club_app::{
    Application, ServiceResult,
    domain::{PlayerId, TelegramId, seat_draw::SeatPool, user::TelegramUser},
};
use teloxide::{
    dispatching::{UpdateHandler, dialogue::InMemStorage},
    prelude::*,
};

mod args;
mod commands;
mod dialogue;
pub mod render;

pub use commands::Command;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

pub type ClubDialogue = Dialogue<State, InMemStorage<State>>;

/// Seat draws in progress, one per chat.
pub type SeatPools = DashMap<ChatId, SeatPool>;

/// Multi-step conversations with the admin.
#[derive(Clone, Debug, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveFullName,
    ReceiveNickname {
        full_name: Option<String>,
    },
    ReceiveAvatar {
        player_id: PlayerId,
    },
}

pub async fn run(
    token: String,
    app: Arc<Application>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let bot = Bot::new(token);
    let seat_pools: Arc<SeatPools> = Arc::new(DashMap::new());

    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            app,
            seat_pools,
            InMemStorage::<State>::new()
        ])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the bot dispatcher",
        ))
        .build();

    let shutdown_token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal.await;
        match shutdown_token.shutdown() {
            Ok(done) => done.await,
            Err(e) => log::warn!("Bot dispatcher was not running: {}", e),
        }
    });

    info!("Telegram bot started");
    dispatcher.dispatch().await;
    info!("Telegram bot shut down gracefully");
}

fn schema() -> UpdateHandler<HandlerError> {
    use dptree::case;

    Update::filter_message()
        .inspect_async(register_sender)
        .enter_dialogue::<Message, InMemStorage<State>, State>()
        .branch(teloxide::filter_command::<Command, _>().endpoint(commands::handle_command))
        .branch(case![State::ReceiveFullName].endpoint(dialogue::receive_full_name))
        .branch(case![State::ReceiveNickname { full_name }].endpoint(dialogue::receive_nickname))
        .branch(case![State::ReceiveAvatar { player_id }].endpoint(dialogue::receive_avatar))
        .branch(dptree::endpoint(dialogue::unknown_message))
}

/// The Telegram id of whoever sent the message, if anyone.
fn sender_id(msg: &Message) -> Option<TelegramId> {
    msg.from.as_ref().map(|user| TelegramId(user.id.0 as i64))
}

async fn register_sender(bot: Bot, msg: Message, app: Arc<Application>) {
    let Some(from) = msg.from.as_ref() else {
        return;
    };
    let user = TelegramUser {
        telegram_id: TelegramId(from.id.0 as i64),
        first_name: Some(from.first_name.clone()).filter(|n| !n.is_empty()),
        last_name: from.last_name.clone(),
        username: from.username.clone(),
    };

    match app.user_register_use_case.register_user(user.clone()).await {
        Ok(true) if !app.admin_policy.is_admin(user.telegram_id) => {
            let admin_chat = ChatId(app.admin_policy.admin_id().0);
            if let Err(e) = bot.send_message(admin_chat, render::new_user_text(&user)).await {
                log::warn!("Failed to notify the admin about user {}: {}", user.telegram_id, e);
            }
        }
        Ok(_) => {}
        Err(e) => log::warn!("Failed to register user {}: {}", user.telegram_id, e),
    }
}

/// Sends the outcome of an interaction, errors as their user-visible message.
async fn reply(bot: &Bot, chat_id: ChatId, result: ServiceResult<String>) -> HandlerResult {
    let text = match result {
        Ok(text) => text,
        Err(e) => e.to_string(),
    };
    bot.send_message(chat_id, text).await?;
    Ok(())
}
