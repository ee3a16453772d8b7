pub mod registration;
pub mod session;
pub mod sinks;
