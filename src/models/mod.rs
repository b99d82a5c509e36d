pub mod category;
pub mod problem;
pub mod session;
