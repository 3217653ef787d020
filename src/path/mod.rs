mod expander;
mod search;

pub use expander::PathExpander;
pub use search::SearchPath;
