// Export modules for testing and the service binary
pub mod api;
pub mod cache;
pub mod chains;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod queries;
pub mod state;
pub mod transport;
