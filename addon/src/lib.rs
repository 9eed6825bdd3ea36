pub mod addon;
pub mod banner;
pub mod config;
pub mod drops;
pub mod event;
pub mod host;
pub mod paths;
pub mod scoreboard;
pub mod session;
pub mod status;
