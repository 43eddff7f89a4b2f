pub mod assign_seat;
pub mod best_move;
pub mod comment;
pub mod create;
pub mod end;
pub mod first_killed;
pub mod get;
pub mod list_ended;
