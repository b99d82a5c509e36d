pub mod backup;
pub mod export;
pub mod log;
pub mod review;
pub mod session_timer;
pub mod timer;
pub mod totals;
