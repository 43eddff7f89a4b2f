use std::sync::Arc;

use mafia_club_app::{
    Application, ServiceError, ServiceResult,
    domain::{PlayerId, TelegramId},
};
use teloxide::{net::Download, prelude::*};

use crate::bot::{ClubDialogue, HandlerResult, State, reply, sender_id};

/// Typed instead of a name to leave it out.
const SKIP: &str = "-";

fn optional_name(text: &str) -> Option<String> {
    let text = text.trim();
    if text == SKIP || text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// The admin check is repeated on every step, anyone in a group chat can answer.
fn ensure_admin(app: &Application, msg: &Message) -> ServiceResult<TelegramId> {
    let actor = sender_id(msg).unwrap_or(TelegramId(0));
    app.admin_policy.ensure_admin(actor)?;
    Ok(actor)
}

pub async fn receive_full_name(
    bot: Bot,
    msg: Message,
    dialogue: ClubDialogue,
    app: Arc<Application>,
) -> HandlerResult {
    if let Err(e) = ensure_admin(&app, &msg) {
        return reply(&bot, msg.chat.id, Err(e)).await;
    }
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Send the full name as text, or - to skip it.")
            .await?;
        return Ok(());
    };

    dialogue
        .update(State::ReceiveNickname {
            full_name: optional_name(text),
        })
        .await?;
    bot.send_message(msg.chat.id, "Now send the nickname, or - to skip it.")
        .await?;
    Ok(())
}

pub async fn receive_nickname(
    bot: Bot,
    msg: Message,
    dialogue: ClubDialogue,
    app: Arc<Application>,
    full_name: Option<String>,
) -> HandlerResult {
    let actor = match ensure_admin(&app, &msg) {
        Ok(actor) => actor,
        Err(e) => return reply(&bot, msg.chat.id, Err(e)).await,
    };
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Send the nickname as text, or - to skip it.")
            .await?;
        return Ok(());
    };

    let result = app
        .player_create_use_case
        .create_player(actor, full_name, optional_name(text))
        .await;
    match &result {
        // stay in the conversation so the nickname can be sent again
        Err(ServiceError::Validation(_)) => {}
        _ => dialogue.exit().await?,
    }
    let result = result.map(|player| {
        format!(
            "Player #{} created.\n\nFull name: {}\nNickname: {}",
            player.id,
            player.full_name.as_deref().unwrap_or("--"),
            player.nickname.as_deref().unwrap_or("--"),
        )
    });
    reply(&bot, msg.chat.id, result).await
}

pub async fn receive_avatar(
    bot: Bot,
    msg: Message,
    dialogue: ClubDialogue,
    app: Arc<Application>,
    player_id: PlayerId,
) -> HandlerResult {
    let actor = match ensure_admin(&app, &msg) {
        Ok(actor) => actor,
        Err(e) => return reply(&bot, msg.chat.id, Err(e)).await,
    };

    let (file_id, file_name) = if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        (photo.file.id.clone(), format!("player_{}.jpg", player_id))
    } else if let Some(document) = msg.document() {
        let file_name = document
            .file_name
            .clone()
            .unwrap_or_else(|| format!("player_{}.png", player_id));
        (document.file.id.clone(), file_name)
    } else {
        bot.send_message(msg.chat.id, "Send a photo or an image file, or /cancel.")
            .await?;
        return Ok(());
    };

    let file = bot.get_file(file_id).await?;
    let mut bytes = Vec::new();
    bot.download_file(&file.path, &mut bytes).await?;

    let result = app
        .player_set_avatar_use_case
        .set_avatar(actor, player_id, bytes, &file_name)
        .await
        .map(|path| format!("Avatar of player #{} saved as {}.", player_id, path));
    dialogue.exit().await?;
    reply(&bot, msg.chat.id, result).await
}

pub async fn unknown_message(bot: Bot, msg: Message) -> HandlerResult {
    if msg.chat.is_private() && msg.text().is_some() {
        bot.send_message(msg.chat.id, "Unknown command, see /help.")
            .await?;
    }
    Ok(())
}
