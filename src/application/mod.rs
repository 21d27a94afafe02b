// Application layer - Use cases over the vitals source
pub mod error;
pub mod monitor_service;
pub mod monitoring_session;
pub mod simulator_service;
pub mod vitals_source;
