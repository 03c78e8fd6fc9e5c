pub mod record_store;
pub mod recorder;
pub mod session_store;
