pub mod platform;
pub mod session;
