pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod init;
pub mod log;
pub mod problems;
pub mod sessions;
pub mod shell;
pub mod status;
