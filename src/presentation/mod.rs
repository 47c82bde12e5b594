// Presentation layer - HTTP surface standing in for the plugin host
pub mod app_state;
pub mod handlers;
