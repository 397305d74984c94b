pub mod app;
pub mod config;
pub mod handlers;
pub mod state;
