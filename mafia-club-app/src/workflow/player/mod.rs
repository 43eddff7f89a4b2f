pub mod create;
pub mod delete;
pub mod get;
pub mod get_stats;
pub mod list;
pub mod set_avatar;
pub mod set_nickname;
