use crate::history::DEFAULT_CAPACITY;
use argh::FromArgs;
use std::num::NonZeroUsize;
use tracing::Level;

pub const DEFAULT_PROMPT: &str = "[INPUT]: ";

#[derive(FromArgs, Debug, Clone, PartialEq)]
/// A primitive line-oriented shell with pipelines and a short history.
pub struct Config {
    #[argh(option, default = "DEFAULT_CAPACITY")]
    /// number of input lines remembered by `history` (default 10)
    pub history_size: NonZeroUsize,

    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before every input line
    pub prompt: String,

    #[argh(switch, short = 'q')]
    /// do not print the start-up banner
    pub quiet: bool,

    #[argh(option, default = "Level::WARN")]
    /// maximum level of diagnostics written to stderr (error, warn, info, debug, trace)
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_CAPACITY,
            prompt: DEFAULT_PROMPT.to_string(),
            quiet: false,
            log_level: Level::WARN,
        }
    }
}
