use axum::{extract::State, response::Html};
use mafia_club_app::{
    domain::{game::Game, role::MAX_PLAYERS, seat::SeatNumber},
    ports::avatar::DEFAULT_AVATAR_NAME,
};

use crate::{ApiError, http::AppState};

const AVATAR_FOLDER: &str = "img/avatars";

/// Seats of the game currently being set up, for the projector in the club.
pub async fn get_table(State(app_state): State<AppState>) -> Result<Html<String>, ApiError> {
    let game = app_state
        .app
        .game_get_use_case
        .get_last_draft_game()
        .await?;
    Ok(Html(match game {
        Some(game) => render_table(&game),
        None => render_empty(),
    }))
}

fn render_table(game: &Game) -> String {
    let mut rows = String::new();
    for number in SeatNumber::all() {
        let row = match game.seat(number) {
            Some(seat) => {
                let avatar = seat.player.avatar_path.clone().unwrap_or_else(|| {
                    format!("{}/{}", AVATAR_FOLDER, DEFAULT_AVATAR_NAME)
                });
                format!(
                    "<li class=\"seat\"><span class=\"number\">{}</span>\
                     <img src=\"/static/{}\" alt=\"\"><span class=\"nickname\">{}</span></li>\n",
                    number,
                    escape(&avatar),
                    escape(&seat.player.display_name()),
                )
            }
            None => format!(
                "<li class=\"seat empty\"><span class=\"number\">{}</span>\
                 <span class=\"nickname\">--</span></li>\n",
                number
            ),
        };
        rows.push_str(&row);
    }
    page(&format!(
        "<h1>Game {}</h1>\n<p>{} / {} players</p>\n<ol class=\"table\">\n{}</ol>",
        game.created_at.format("%d.%m.%Y %H:%M"),
        game.player_count(),
        MAX_PLAYERS,
        rows
    ))
}

fn render_empty() -> String {
    page("<h1>No game is being prepared</h1>")
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Mafia club</title></head>\n\
         <body>\n{}\n</body>\n</html>\n",
        body
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
