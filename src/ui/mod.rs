pub mod app;
pub mod race_list;
pub mod race_player;
