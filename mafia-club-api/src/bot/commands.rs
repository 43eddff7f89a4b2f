use std::sync::Arc;

use chrono::Utc;
use mafia_club_app::{
    Application, ServiceError, ServiceResult,
    domain::{
        GameId, Pagination, PlayerId, TelegramId,
        role::{GameResult, Role},
        seat::SeatNumber,
        seat_draw::SeatPool,
    },
};
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::bot::{
    ClubDialogue, HandlerResult, SeatPools, State, args::Args, render, reply, sender_id,
};

pub const PLAYERS_PER_PAGE: usize = 10;
pub const GAMES_PER_PAGE: usize = 10;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Mafia club bot. These commands are supported:")]
pub enum Command {
    #[command(description = "say hello")]
    Start,
    #[command(description = "show this text")]
    Help,
    #[command(description = "stop the current conversation")]
    Cancel,
    #[command(description = "list players: /players [page]")]
    Players(String),
    #[command(description = "player stats: /player <id>")]
    Player(String),
    #[command(description = "add a player step by step")]
    NewPlayer,
    #[command(description = "change a nickname: /nickname <id> <nickname>")]
    Nickname(String),
    #[command(description = "upload an avatar: /avatar <id>")]
    Avatar(String),
    #[command(description = "remove a player: /deleteplayer <id>")]
    DeletePlayer(String),
    #[command(description = "start setting up a game")]
    NewGame,
    #[command(description = "show a game: /game <id>")]
    Game(String),
    #[command(description = "list ended games: /games [page]")]
    Games(String),
    #[command(description = "seat a player: /seat <game> <seat> <player> <role>")]
    Seat(String),
    #[command(description = "record who was killed first: /firstkilled <game> <seat>")]
    FirstKilled(String),
    #[command(description = "record the best move: /bestmove <game> <s1> <s2> <s3>")]
    BestMove(String),
    #[command(description = "end a game: /endgame <game> <civilians|mafia|draw>")]
    EndGame(String),
    #[command(description = "comment a game: /comment <game> <text>")]
    Comment(String),
    #[command(description = "draw a random free seat")]
    Draw,
    #[command(description = "put all seats back into the draw")]
    ResetDraw,
    #[command(description = "list everyone who wrote to the bot")]
    Users,
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: ClubDialogue,
    app: Arc<Application>,
    seat_pools: Arc<SeatPools>,
) -> HandlerResult {
    let Some(actor) = sender_id(&msg) else {
        return Ok(());
    };
    log::debug!("Command {:?} from {}", cmd, actor);

    let result = match cmd {
        Command::Cancel => {
            dialogue.exit().await?;
            Ok("Cancelled.".to_string())
        }
        Command::NewPlayer => {
            let started = app.admin_policy.ensure_admin(actor);
            if started.is_ok() {
                dialogue.update(State::ReceiveFullName).await?;
            }
            started.map(|_| "Send the player's full name, or - to skip it.".to_string())
        }
        Command::Avatar(text) => match start_avatar_upload(&app, actor, &text).await {
            Ok(player_id) => {
                dialogue.update(State::ReceiveAvatar { player_id }).await?;
                Ok(format!("Send the new avatar of player #{} as a photo or an image file.", player_id))
            }
            Err(e) => Err(e),
        },
        cmd => execute(cmd, actor, msg.chat.id, &app, &seat_pools).await,
    };
    reply(&bot, msg.chat.id, result).await
}

async fn start_avatar_upload(app: &Application, actor: TelegramId, text: &str) -> ServiceResult<PlayerId> {
    app.admin_policy.ensure_admin(actor)?;
    let mut args = Args::new(text, "/avatar <id>");
    let player_id = PlayerId(args.next()?);
    args.finish()?;
    let player = app.player_get_use_case.get_player(player_id).await?;
    Ok(player.id)
}

async fn execute(
    cmd: Command,
    actor: TelegramId,
    chat_id: ChatId,
    app: &Application,
    seat_pools: &SeatPools,
) -> ServiceResult<String> {
    match cmd {
        Command::Start => Ok(format!(
            "Welcome to the mafia club!\n\n{}",
            Command::descriptions()
        )),
        Command::Help => Ok(Command::descriptions().to_string()),
        Command::Players(text) => {
            let pagination = parse_page(&text, "/players [page]", PLAYERS_PER_PAGE)?;
            let players = app.player_list_use_case.list_players(pagination).await?;
            Ok(render::players_page_text(&players, &pagination))
        }
        Command::Player(text) => {
            let mut args = Args::new(&text, "/player <id>");
            let player_id = PlayerId(args.next()?);
            args.finish()?;
            let view = app.player_get_stats_use_case.get_stats(player_id).await?;
            Ok(render::player_stats_text(&view))
        }
        Command::Nickname(text) => {
            let mut args = Args::new(&text, "/nickname <id> <nickname>");
            let player_id = PlayerId(args.next()?);
            let nickname = args.rest().to_string();
            app.player_set_nickname_use_case
                .set_nickname(actor, player_id, nickname.clone())
                .await?;
            Ok(format!("Player #{} is now called {}.", player_id, nickname))
        }
        Command::DeletePlayer(text) => {
            let mut args = Args::new(&text, "/deleteplayer <id>");
            let player_id = PlayerId(args.next()?);
            args.finish()?;
            app.player_delete_use_case
                .delete_player(actor, player_id)
                .await?;
            Ok(format!("Player #{} deleted.", player_id))
        }
        Command::NewGame => {
            let game = app
                .game_create_use_case
                .create_game(actor, Utc::now())
                .await?;
            Ok(format!(
                "{}\n\nSeat players with /seat {} <seat> <player> <role>.",
                render::game_text(&game),
                game.id
            ))
        }
        Command::Game(text) => {
            let mut args = Args::new(&text, "/game <id>");
            let game_id = GameId(args.next()?);
            args.finish()?;
            let game = app.game_get_use_case.get_game(game_id).await?;
            Ok(render::game_text(&game))
        }
        Command::Games(text) => {
            let pagination = parse_page(&text, "/games [page]", GAMES_PER_PAGE)?;
            let games = app
                .game_list_ended_use_case
                .list_ended_games(pagination)
                .await?;
            Ok(render::games_page_text(&games, &pagination))
        }
        Command::Seat(text) => {
            let mut args = Args::new(&text, "/seat <game> <seat> <player> <role>");
            let game_id = GameId(args.next()?);
            let seat = args.next()?;
            let player_id = PlayerId(args.next()?);
            let role = match args.word().map(str::parse::<Role>) {
                Some(Ok(role)) => role,
                Some(Err(e)) => return ServiceError::validation(e),
                None => return args.usage_error(),
            };
            args.finish()?;
            let game = app
                .game_assign_seat_use_case
                .assign_seat(actor, game_id, seat, player_id, role)
                .await?;
            Ok(render::game_text(&game))
        }
        Command::FirstKilled(text) => {
            let mut args = Args::new(&text, "/firstkilled <game> <seat>");
            let game_id = GameId(args.next()?);
            let seat = args.next()?;
            args.finish()?;
            let game = app
                .game_first_killed_use_case
                .assign_first_killed(actor, game_id, seat)
                .await?;
            Ok(render::game_text(&game))
        }
        Command::BestMove(text) => {
            let mut args = Args::new(&text, "/bestmove <game> <s1> <s2> <s3>");
            let game_id = GameId(args.next()?);
            let mut seats = Vec::new();
            while let Some(word) = args.word() {
                match word.parse::<i64>() {
                    Ok(seat) => seats.push(seat),
                    Err(_) => return args.usage_error(),
                }
            }
            let game = app
                .game_best_move_use_case
                .set_best_move(actor, game_id, seats)
                .await?;
            Ok(render::game_text(&game))
        }
        Command::EndGame(text) => {
            let mut args = Args::new(&text, "/endgame <game> <civilians|mafia|draw>");
            let game_id = GameId(args.next()?);
            let result = args
                .word()
                .map(str::parse::<GameResult>)
                .transpose()
                .map_err(ServiceError::Validation)?;
            args.finish()?;
            let game = app
                .game_end_use_case
                .end_game(actor, game_id, result)
                .await?;
            Ok(render::game_text(&game))
        }
        Command::Comment(text) => {
            let mut args = Args::new(&text, "/comment <game> <text>");
            let game_id = GameId(args.next()?);
            let comments = args.rest().to_string();
            app.game_comment_use_case
                .set_comment(actor, game_id, comments)
                .await?;
            Ok(format!("Comment on game #{} saved.", game_id))
        }
        Command::Draw => Ok(match draw_seat(seat_pools, chat_id) {
            Some((seat, remaining)) => format!("Seat {} ({} left)", seat, remaining),
            None => "All seats are drawn. Use /resetdraw to start over.".to_string(),
        }),
        Command::ResetDraw => {
            seat_pools.insert(chat_id, SeatPool::new());
            Ok("All seats are back in the draw.".to_string())
        }
        Command::Users => {
            let users = app.user_list_use_case.list_users(actor).await?;
            Ok(render::users_text(&users))
        }
        Command::Cancel | Command::NewPlayer | Command::Avatar(_) => {
            ServiceError::internal("conversation commands are handled by the dispatcher")
        }
    }
}

fn draw_seat(seat_pools: &SeatPools, chat_id: ChatId) -> Option<(SeatNumber, usize)> {
    let mut pool = seat_pools.entry(chat_id).or_default();
    let seat = pool.draw(&mut rand::rng())?;
    Some((seat, pool.remaining()))
}

/// Window for the one based page number the user typed, the first page when none.
fn parse_page(text: &str, usage: &'static str, per_page: usize) -> ServiceResult<Pagination> {
    let mut args = Args::new(text, usage);
    let page = match args.word() {
        None => Some(0),
        Some(word) => word
            .parse::<usize>()
            .ok()
            .filter(|p| *p > 0)
            .map(|p| p - 1),
    };
    args.finish()?;
    match page.and_then(|page| Pagination::page(page, per_page)) {
        Some(pagination) => Ok(pagination),
        None => ServiceError::validation("Page must be a positive number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/seat 1 2 3 don", "club_bot").ok(),
            Some(Command::Seat("1 2 3 don".to_string()))
        );
        assert_eq!(Command::parse("/draw", "club_bot").ok(), Some(Command::Draw));
        assert_eq!(
            Command::parse("/resetdraw", "club_bot").ok(),
            Some(Command::ResetDraw)
        );
        assert_eq!(
            Command::parse("/newplayer", "club_bot").ok(),
            Some(Command::NewPlayer)
        );
        assert!(Command::parse("/unknown", "club_bot").is_err());
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page("", "/players [page]", 10), Ok(Pagination::page(0, 10).unwrap()));
        assert_eq!(parse_page(" 3 ", "/players [page]", 10), Ok(Pagination::page(2, 10).unwrap()));
        assert!(parse_page("0", "/players [page]", 10).is_err());
        assert!(parse_page("two", "/players [page]", 10).is_err());
        assert!(parse_page("1 2", "/players [page]", 10).is_err());
    }

    #[test]
    fn test_parse_huge_page_is_rejected() {
        assert_eq!(
            parse_page("1844674407370955163", "/players [page]", PLAYERS_PER_PAGE),
            Err(ServiceError::Validation(
                "Page must be a positive number".to_string()
            ))
        );
        assert!(parse_page("18446744073709551615", "/games [page]", GAMES_PER_PAGE).is_err());
        assert!(parse_page("99999999999999999999999", "/games [page]", GAMES_PER_PAGE).is_err());
    }

    #[test]
    fn test_draw_seat_exhausts_pool_per_chat() {
        let pools = SeatPools::new();
        let mut drawn = Vec::new();
        while let Some((seat, remaining)) = draw_seat(&pools, ChatId(1)) {
            assert_eq!(remaining, 10 - drawn.len() - 1);
            assert!(!drawn.contains(&seat));
            drawn.push(seat);
        }
        assert_eq!(drawn.len(), 10);
        assert!(draw_seat(&pools, ChatId(2)).is_some());
        assert!(draw_seat(&pools, ChatId(1)).is_none());
    }
}
