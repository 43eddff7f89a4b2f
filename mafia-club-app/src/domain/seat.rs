use crate::domain::{
    player::Player,
    role::{MAX_PLAYERS, Role},
};

/// A seat at the table, numbered 1 through 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatNumber(u8);

impl SeatNumber {
    pub fn new(number: i64) -> Result<Self, InvalidSeatNumber> {
        if (1..=MAX_PLAYERS as i64).contains(&number) {
            Ok(SeatNumber(number as u8))
        } else {
            Err(InvalidSeatNumber(number))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SeatNumber> {
        (1..=MAX_PLAYERS as u8).map(SeatNumber)
    }
}

impl std::fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SeatNumber {
    type Err = InvalidSeatNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "2.5" or "ten" never name a seat
        let number = s.trim().parse::<i64>().map_err(|_| InvalidSeatNumber(-1))?;
        SeatNumber::new(number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeatNumber(pub i64);

impl std::fmt::Display for InvalidSeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Seat number must be an integer between 1 and {}",
            MAX_PLAYERS
        )
    }
}

/// A player's participation in one game.
#[derive(Clone, Debug, PartialEq)]
pub struct Seat {
    pub number: SeatNumber,
    pub player: Player,
    pub role: Role,
}

impl Seat {
    pub fn new(number: SeatNumber, player: Player, role: Role) -> Self {
        Self {
            number,
            player,
            role,
        }
    }
}
