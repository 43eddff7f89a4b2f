use crate::domain::{
    PlayerId,
    game::{Game, black_seats_in},
    role::{BLACK_TEAM_SIZE, GameStatus, Role, Team},
};

/// Share of won games in percent, rounded to two decimals with ties to even.
/// `None` without games.
pub fn percent(won: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let value = won as f64 / total as f64 * 100.0;
    Some((value * 100.0).round_ties_even() / 100.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WinCount {
    pub games: u32,
    pub won: u32,
}

impl WinCount {
    pub fn win_percent(&self) -> Option<f64> {
        percent(self.won, self.games)
    }

    fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.won += 1;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BestMoveStats {
    /// First killed games that had a best move recorded.
    pub total: u32,
    /// Indexed by the number of black team seats the guess contained.
    pub by_black_count: [u32; BLACK_TEAM_SIZE + 1],
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub total: WinCount,
    pub red: WinCount,
    pub black: WinCount,
    pub civilian: WinCount,
    pub sheriff: WinCount,
    pub mafia: WinCount,
    pub don: WinCount,
    pub first_killed: u32,
    pub best_move: BestMoveStats,
}

impl PlayerStats {
    /// Aggregates over the ended games the player sat in; other games are skipped.
    pub fn compute<'a>(player_id: PlayerId, games: impl IntoIterator<Item = &'a Game>) -> Self {
        let mut stats = PlayerStats {
            player_id,
            total: WinCount::default(),
            red: WinCount::default(),
            black: WinCount::default(),
            civilian: WinCount::default(),
            sheriff: WinCount::default(),
            mafia: WinCount::default(),
            don: WinCount::default(),
            first_killed: 0,
            best_move: BestMoveStats::default(),
        };

        for game in games {
            if game.status != GameStatus::Ended {
                continue;
            }
            let (Some(seat), Some(won)) = (game.seat_of(player_id), game.has_won(player_id))
            else {
                continue;
            };

            stats.total.record(won);
            match seat.role.team() {
                Team::Red => stats.red.record(won),
                Team::Black => stats.black.record(won),
            }
            match seat.role {
                Role::Civilian => stats.civilian.record(won),
                Role::Sheriff => stats.sheriff.record(won),
                Role::Mafia => stats.mafia.record(won),
                Role::Don => stats.don.record(won),
            }

            if seat.role.team() == Team::Red && game.first_killed == Some(seat.number) {
                stats.first_killed += 1;
                if let Some(best_move) = game.best_move_seats() {
                    let black = black_seats_in(&best_move).min(BLACK_TEAM_SIZE);
                    stats.best_move.total += 1;
                    stats.best_move.by_black_count[black] += 1;
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        game::fixtures::{FULL_TABLE, game_with_roles, seat},
        role::GameResult,
    };

    fn ended(mut game: Game, result: GameResult) -> Game {
        game.end(Some(result)).expect("valid table");
        game
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(0, 3), Some(0.0));
        assert_eq!(percent(2, 3), Some(66.67));
        assert_eq!(percent(1, 3), Some(33.33));
        assert_eq!(percent(4, 4), Some(100.0));
    }

    #[test]
    fn test_percent_rounds_ties_to_even() {
        assert_eq!(percent(1, 32), Some(3.12));
        assert_eq!(percent(5, 32), Some(15.62));
        assert_eq!(percent(3, 32), Some(9.38));
        assert_eq!(percent(1, 160), Some(0.62));
        assert_eq!(percent(1, 8), Some(12.5));
    }

    #[test]
    fn test_stats_without_games() {
        let stats = PlayerStats::compute(PlayerId(1), &[]);
        assert_eq!(stats.total, WinCount::default());
        assert_eq!(stats.total.win_percent(), None);
        assert_eq!(stats.red.win_percent(), None);
        assert_eq!(stats.black.win_percent(), None);
        assert_eq!(stats.don.win_percent(), None);
        assert_eq!(stats.first_killed, 0);
        assert_eq!(stats.best_move, BestMoveStats::default());
    }

    #[test]
    fn test_two_civilian_wins() {
        // player 105 sits on seat 5, a civilian, in both games
        let games = vec![
            ended(game_with_roles(1, 100, &FULL_TABLE), GameResult::CiviliansWon),
            ended(game_with_roles(2, 100, &FULL_TABLE), GameResult::CiviliansWon),
        ];
        let stats = PlayerStats::compute(PlayerId(105), &games);
        assert_eq!(stats.total, WinCount { games: 2, won: 2 });
        assert_eq!(stats.total.win_percent(), Some(100.0));
        assert_eq!(stats.red.win_percent(), Some(100.0));
        assert_eq!(stats.civilian.win_percent(), Some(100.0));
        assert_eq!(stats.black.win_percent(), None);
        assert_eq!(stats.sheriff.win_percent(), None);
        assert_eq!(stats.mafia.win_percent(), None);
        assert_eq!(stats.don.win_percent(), None);
    }

    #[test]
    fn test_mixed_roles() {
        // seats: 1 don, 2 sheriff, 3-4 mafia, 5-10 civilians; player id = 100 + seat
        let games = vec![
            // civilian, won
            ended(game_with_roles(1, 100, &FULL_TABLE), GameResult::CiviliansWon),
            // civilian, lost
            ended(game_with_roles(2, 100, &FULL_TABLE), GameResult::MafiaWon),
            // mafia, won
            ended(game_with_roles(3, 102, &FULL_TABLE), GameResult::MafiaWon),
            // sheriff, won
            ended(game_with_roles(4, 103, &FULL_TABLE), GameResult::CiviliansWon),
            // draft games never count
            game_with_roles(5, 100, &FULL_TABLE),
        ];
        let stats = PlayerStats::compute(PlayerId(105), &games);
        assert_eq!(stats.total, WinCount { games: 4, won: 3 });
        assert_eq!(stats.total.win_percent(), Some(75.0));
        assert_eq!(stats.black.win_percent(), Some(100.0));
        assert_eq!(stats.red.win_percent(), Some(66.67));
        assert_eq!(stats.civilian.win_percent(), Some(50.0));
        assert_eq!(stats.mafia.win_percent(), Some(100.0));
        assert_eq!(stats.sheriff.win_percent(), Some(100.0));
        assert_eq!(stats.don.win_percent(), None);
    }

    #[test]
    fn test_draw_counts_as_played_not_won() {
        let games = vec![ended(game_with_roles(1, 100, &FULL_TABLE), GameResult::Draw)];
        let stats = PlayerStats::compute(PlayerId(101), &games);
        assert_eq!(stats.don, WinCount { games: 1, won: 0 });
        assert_eq!(stats.total.win_percent(), Some(0.0));
    }

    #[test]
    fn test_first_killed_and_best_move_buckets() {
        let with_guess = |id: i64, guess: [i64; 3]| {
            let mut game = game_with_roles(id, 100, &FULL_TABLE);
            game.set_first_killed(seat(5)).expect("first killed");
            game.set_best_move(guess.iter().map(|n| seat(*n)).collect())
                .expect("best move");
            ended(game, GameResult::CiviliansWon)
        };
        let mut no_guess = game_with_roles(4, 100, &FULL_TABLE);
        no_guess.set_first_killed(seat(5)).expect("first killed");
        let mut someone_else_killed = game_with_roles(5, 100, &FULL_TABLE);
        someone_else_killed
            .set_first_killed(seat(6))
            .expect("first killed");

        let games = vec![
            with_guess(1, [1, 3, 4]),
            with_guess(2, [1, 6, 7]),
            with_guess(3, [6, 7, 8]),
            ended(no_guess, GameResult::MafiaWon),
            ended(someone_else_killed, GameResult::MafiaWon),
        ];
        let stats = PlayerStats::compute(PlayerId(105), &games);
        assert_eq!(stats.first_killed, 4);
        assert_eq!(stats.best_move.total, 3);
        assert_eq!(stats.best_move.by_black_count, [1, 1, 0, 1]);
    }

    #[test]
    fn test_black_player_is_never_counted_as_first_killed() {
        let mut game = game_with_roles(1, 100, &FULL_TABLE);
        game.set_first_killed(seat(3)).expect("first killed");
        let games = vec![ended(game, GameResult::CiviliansWon)];
        let stats = PlayerStats::compute(PlayerId(103), &games);
        assert_eq!(stats.first_killed, 0);
        assert_eq!(stats.mafia, WinCount { games: 1, won: 0 });
    }
}
