pub mod command;
pub mod core;
pub mod error;
pub mod flags;
pub mod highlight;
pub mod logger;
pub mod parser;
pub mod path;
pub mod process;
pub mod shell;
