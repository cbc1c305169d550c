mod cli;
pub mod prompt;

pub use cli::CommandArgs;
pub use prompt::{parse_threshold, prompt_threshold};
