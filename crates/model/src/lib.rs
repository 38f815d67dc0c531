pub mod attendance;
pub mod decimal;
pub mod errors;
pub mod member;
pub mod payment;
pub mod session;
pub mod statistics;
