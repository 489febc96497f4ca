pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod movement;
pub mod network;
pub mod record;
pub mod state;
