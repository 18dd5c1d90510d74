pub mod actor;
pub mod collision;
pub mod config;
pub mod input;
pub mod obstacle;
pub mod replay;
pub mod session;
pub mod time;
