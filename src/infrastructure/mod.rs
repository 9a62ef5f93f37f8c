pub mod config;
pub mod driven;
pub mod driving;
