pub mod player;
pub mod ron;
pub mod settings;
