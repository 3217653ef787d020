pub mod commands;
pub mod config;
pub mod state;

pub use config::ShellConfig;
pub use state::ShellState;
