use rand::Rng;

use crate::domain::seat::SeatNumber;

/// Seats not handed out yet in an offline seating round.
#[derive(Clone, Debug)]
pub struct SeatPool {
    seats: Vec<SeatNumber>,
}

impl SeatPool {
    pub fn new() -> Self {
        Self {
            seats: SeatNumber::all().collect(),
        }
    }

    pub fn from_seats(seats: impl IntoIterator<Item = SeatNumber>) -> Self {
        let mut seats: Vec<SeatNumber> = seats.into_iter().collect();
        seats.sort();
        seats.dedup();
        Self { seats }
    }

    /// Takes a random seat out of the pool. `None` once every seat is drawn.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SeatNumber> {
        if self.seats.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.seats.len());
        Some(self.seats.swap_remove(index))
    }

    pub fn remaining(&self) -> usize {
        self.seats.len()
    }
}

impl Default for SeatPool {
    fn default() -> Self {
        Self::new()
    }
}
