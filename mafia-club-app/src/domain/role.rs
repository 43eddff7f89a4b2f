use std::str::FromStr;

pub const MIN_PLAYERS: usize = 9;
pub const MAX_PLAYERS: usize = 10;

pub const DON_COUNT: usize = 1;
pub const SHERIFF_COUNT: usize = 1;
pub const MAFIA_COUNT: usize = 2;
pub const CIVILIAN_COUNT: usize = 6;

/// Size of the black team, which is also the size of a best move guess.
pub const BLACK_TEAM_SIZE: usize = DON_COUNT + MAFIA_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Mafia,
    Don,
    Sheriff,
    Civilian,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Mafia, Role::Don, Role::Sheriff, Role::Civilian];

    pub fn team(&self) -> Team {
        match self {
            Role::Civilian | Role::Sheriff => Team::Red,
            Role::Mafia | Role::Don => Team::Black,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mafia => "mafia",
            Role::Don => "don",
            Role::Sheriff => "sheriff",
            Role::Civilian => "civilian",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mafia" => Ok(Role::Mafia),
            "don" => Ok(Role::Don),
            "sheriff" => Ok(Role::Sheriff),
            "civilian" => Ok(Role::Civilian),
            other => Err(format!("Unknown role <{}>", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    Red,
    Black,
}

impl Team {
    /// The game result that counts as a win for this team.
    pub fn winning_result(&self) -> GameResult {
        match self {
            Team::Red => GameResult::CiviliansWon,
            Team::Black => GameResult::MafiaWon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    CiviliansWon,
    MafiaWon,
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::CiviliansWon => "civilians_won",
            GameResult::MafiaWon => "mafia_won",
            GameResult::Draw => "draw",
        }
    }

    pub fn is_win_for(&self, role: Role) -> bool {
        *self == role.team().winning_result()
    }
}

impl FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "civilians_won" | "civilians" | "red" => Ok(GameResult::CiviliansWon),
            "mafia_won" | "mafia" | "black" => Ok(GameResult::MafiaWon),
            "draw" => Ok(GameResult::Draw),
            other => Err(format!("Game result <{}> is invalid", other)),
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Draft,
    Ended,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Draft => "draft",
            GameStatus::Ended => "ended",
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(GameStatus::Draft),
            "ended" => Ok(GameStatus::Ended),
            other => Err(format!("Game status <{}> is invalid", other)),
        }
    }
}
