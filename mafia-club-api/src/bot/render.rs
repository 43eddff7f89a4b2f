use mafia_club_app::{
    domain::{
        PaginatedResponse, Pagination,
        game::Game,
        player::Player,
        role::{GameResult, GameStatus, Role, Team},
        seat::SeatNumber,
        stats::WinCount,
        user::TelegramUser,
    },
    workflow::player::get_stats::PlayerStatsView,
};

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn role_emoji(role: Role) -> &'static str {
    match role {
        Role::Mafia => "🔫",
        Role::Civilian => "💛",
        Role::Don => "🤵🏿‍♂️",
        Role::Sheriff => "🕵🏻‍♂️",
    }
}

pub fn team_emoji(team: Team) -> &'static str {
    match team {
        Team::Red => "🔴",
        Team::Black => "⚫️",
    }
}

pub fn result_text(result: GameResult) -> &'static str {
    match result {
        GameResult::CiviliansWon => "civilians won",
        GameResult::MafiaWon => "mafia won",
        GameResult::Draw => "draw",
    }
}

/// `--` when nothing was played yet.
pub fn percent_text(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{}%", value),
        None => "--".to_string(),
    }
}

fn win_line(label: &str, count: &WinCount) -> String {
    format!(
        "{}: {} ({} / {})",
        label,
        percent_text(count.win_percent()),
        count.won,
        count.games
    )
}

pub fn player_stats_text(view: &PlayerStatsView) -> String {
    let stats = &view.stats;
    let mut lines = vec![format!("{} (#{})", view.player.display_name(), view.player.id)];
    if let Some(full_name) = &view.player.full_name {
        lines.push(full_name.clone());
    }
    lines.push(String::new());
    lines.push(format!("Games played: {}", stats.total.games));
    lines.push(format!("Killed first night: {}", stats.first_killed));
    lines.push(win_line("Win rate", &stats.total));
    lines.push(String::new());
    lines.push(win_line(
        &format!("{} Black team", team_emoji(Team::Black)),
        &stats.black,
    ));
    lines.push(win_line(&format!("{} Red team", team_emoji(Team::Red)), &stats.red));
    lines.push(String::new());
    for (role, count) in [
        (Role::Civilian, &stats.civilian),
        (Role::Mafia, &stats.mafia),
        (Role::Don, &stats.don),
        (Role::Sheriff, &stats.sheriff),
    ] {
        lines.push(win_line(&format!("{} {}", role_emoji(role), role), count));
    }

    if stats.best_move.total > 0 {
        lines.push(String::new());
        lines.push("Best move:".to_string());
        lines.push(format!("Total: {}", stats.best_move.total));
        let size = stats.best_move.by_black_count.len() - 1;
        for (black, count) in stats.best_move.by_black_count.iter().enumerate() {
            lines.push(format!("{} / {} black: {}", black, size, count));
        }
    }
    lines.join("\n")
}

pub fn players_page_text(players: &PaginatedResponse<Player>, pagination: &Pagination) -> String {
    let (page, pages) = page_position(players.total_count, pagination);
    if players.items.is_empty() {
        return if page == 0 {
            "No players yet.".to_string()
        } else {
            "No players on this page.".to_string()
        };
    }
    let mut lines = vec![format!("Players (page {} of {}):", page + 1, pages)];
    for player in &players.items {
        lines.push(format!("#{} {}", player.id, player.display_name()));
    }
    if players.has_more(pagination) {
        lines.push(format!("\nNext: /players {}", page + 2));
    }
    lines.join("\n")
}

pub fn game_title(game: &Game) -> String {
    let state = match (game.status, game.result) {
        (GameStatus::Ended, Some(result)) => format!("ended, {}", result_text(result)),
        (GameStatus::Ended, None) => "ended".to_string(),
        (GameStatus::Draft, _) => "draft".to_string(),
    };
    format!(
        "Game #{} {} ({})",
        game.id,
        game.created_at.format(DATE_FORMAT),
        state
    )
}

pub fn game_text(game: &Game) -> String {
    let mut lines = vec![game_title(game), String::new()];
    for number in SeatNumber::all() {
        lines.push(match game.seat(number) {
            Some(seat) => format!(
                "{}. {} {}",
                number,
                seat.player.display_name(),
                role_emoji(seat.role)
            ),
            None => format!("{}. --", number),
        });
    }

    if let Some(seat) = game.first_killed_seat() {
        lines.push(String::new());
        lines.push(format!(
            "Killed first: {} {}",
            seat.number,
            seat.player.display_name()
        ));
    }
    if let Some(best_move) = &game.best_move {
        let seats: Vec<String> = best_move.iter().map(|n| n.to_string()).collect();
        lines.push(format!("Best move: {}", seats.join(", ")));
    }
    if !game.comments.is_empty() {
        lines.push(String::new());
        lines.push(game.comments.clone());
    }
    lines.join("\n")
}

pub fn games_page_text(games: &PaginatedResponse<Game>, pagination: &Pagination) -> String {
    if games.items.is_empty() {
        return "No ended games yet.".to_string();
    }
    let (page, pages) = page_position(games.total_count, pagination);
    let mut lines = vec![format!("Ended games (page {} of {}):", page + 1, pages)];
    lines.extend(games.items.iter().map(game_title));
    if games.has_more(pagination) {
        lines.push(format!("\nNext: /games {}", page + 2));
    }
    lines.join("\n")
}

pub fn users_text(users: &[TelegramUser]) -> String {
    if users.is_empty() {
        return "Nobody wrote to the bot yet.".to_string();
    }
    let mut lines = vec![format!("Bot users ({}):", users.len())];
    for user in users {
        lines.push(format!("{} {}", user.telegram_id, user.display_name()));
    }
    lines.join("\n")
}

pub fn new_user_text(user: &TelegramUser) -> String {
    format!(
        "New bot user:\nID: {}\nName: {}",
        user.telegram_id,
        user.display_name()
    )
}

/// Zero based page index and page count.
fn page_position(total: usize, pagination: &Pagination) -> (usize, usize) {
    let per_page = pagination.limit.unwrap_or(total).max(1);
    let page = pagination.offset.unwrap_or(0) / per_page;
    (page, total.div_ceil(per_page).max(1))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mafia_club_app::domain::{
        GameId, PlayerId, TelegramId,
        seat::Seat,
        stats::{BestMoveStats, PlayerStats},
    };

    use super::*;

    fn player(id: i64, nickname: &str) -> Player {
        Player {
            id: PlayerId(id),
            full_name: Some(format!("Full Name {}", id)),
            nickname: Some(nickname.to_string()),
            avatar_path: None,
        }
    }

    fn stats(player_id: PlayerId) -> PlayerStats {
        PlayerStats {
            player_id,
            total: WinCount { games: 4, won: 3 },
            red: WinCount { games: 3, won: 2 },
            black: WinCount { games: 1, won: 1 },
            civilian: WinCount { games: 3, won: 2 },
            sheriff: WinCount::default(),
            mafia: WinCount { games: 1, won: 1 },
            don: WinCount::default(),
            first_killed: 1,
            best_move: BestMoveStats::default(),
        }
    }

    #[test]
    fn test_percent_text() {
        assert_eq!(percent_text(None), "--");
        assert_eq!(percent_text(Some(75.0)), "75%");
        assert_eq!(percent_text(Some(66.67)), "66.67%");
    }

    #[test]
    fn test_player_stats_text() {
        let view = PlayerStatsView {
            player: player(3, "Ghost"),
            stats: stats(PlayerId(3)),
        };
        let text = player_stats_text(&view);
        assert!(text.starts_with("Ghost (#3)\nFull Name 3"));
        assert!(text.contains("Win rate: 75% (3 / 4)"));
        assert!(text.contains("🔴 Red team: 66.67% (2 / 3)"));
        assert!(text.contains("🕵🏻‍♂️ sheriff: -- (0 / 0)"));
        assert!(!text.contains("Best move"));
    }

    #[test]
    fn test_player_stats_text_with_best_move() {
        let mut stats = stats(PlayerId(3));
        stats.best_move = BestMoveStats {
            total: 2,
            by_black_count: [0, 1, 0, 1],
        };
        let view = PlayerStatsView {
            player: player(3, "Ghost"),
            stats,
        };
        let text = player_stats_text(&view);
        assert!(text.contains("Best move:\nTotal: 2\n0 / 3 black: 0\n1 / 3 black: 1"));
        assert!(text.ends_with("3 / 3 black: 1"));
    }

    #[test]
    fn test_game_text() {
        let mut game = Game {
            id: GameId(5),
            status: GameStatus::Ended,
            result: Some(GameResult::MafiaWon),
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 20, 30, 0).unwrap(),
            comments: "Final table".to_string(),
            seats: vec![Seat::new(
                SeatNumber::new(2).unwrap(),
                player(1, "Fox"),
                Role::Don,
            )],
            first_killed: None,
            best_move: None,
        };
        game.first_killed = SeatNumber::new(2).ok();
        let text = game_text(&game);
        assert!(text.starts_with("Game #5 01.12.2024 20:30 (ended, mafia won)"));
        assert!(text.contains("1. --\n2. Fox 🤵🏿‍♂️\n3. --"));
        assert!(text.contains("Killed first: 2 Fox"));
        assert!(text.ends_with("Final table"));
    }

    #[test]
    fn test_players_page_text() {
        let page = PaginatedResponse {
            total_count: 11,
            items: vec![player(1, "Fox"), player(2, "Ghost")],
        };
        assert_eq!(
            players_page_text(&page, &Pagination::page(1, 10).unwrap()),
            "Players (page 2 of 2):\n#1 Fox\n#2 Ghost"
        );
        let empty = PaginatedResponse {
            total_count: 0,
            items: Vec::new(),
        };
        assert_eq!(
            players_page_text(&empty, &Pagination::page(0, 10).unwrap()),
            "No players yet."
        );
    }

    #[test]
    fn test_players_page_text_points_to_next_page() {
        let page = PaginatedResponse {
            total_count: 3,
            items: vec![player(1, "Fox"), player(2, "Ghost")],
        };
        assert_eq!(
            players_page_text(&page, &Pagination::page(0, 2).unwrap()),
            "Players (page 1 of 2):\n#1 Fox\n#2 Ghost\n\nNext: /players 2"
        );
    }

    #[test]
    fn test_users_text() {
        let users = vec![TelegramUser {
            telegram_id: TelegramId(42),
            first_name: Some("Ann".to_string()),
            last_name: None,
            username: Some("ann".to_string()),
        }];
        assert_eq!(users_text(&users), "Bot users (1):\n42 Ann (@ann)");
        assert_eq!(users_text(&[]), "Nobody wrote to the bot yet.");
    }
}
