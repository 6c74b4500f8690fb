pub mod cmd;
pub mod config;
pub mod logger;
pub mod observer;
pub mod util;
