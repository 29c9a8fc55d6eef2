pub mod config;
pub mod config_log;
pub mod playlist;
pub mod probe;
pub mod stats;
