pub mod config;
pub mod outline;
