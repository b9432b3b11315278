use std::io;
use thiserror::Error;

/// Everything that can go wrong while handling one segment of a line.
///
/// None of these abort the interpreter: the driver reports the message and
/// moves on to the next segment or line.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A segment with no program name, e.g. the middle of `ls || wc`.
    #[error("Error: Arguments are invalid!")]
    ParseEmpty,

    /// The OS refused to create a pipe or a process.
    #[error("Error: Forking problem: {0}")]
    SpawnFailure(#[source] io::Error),

    /// The program could not be located or executed.
    #[error("Error: Not a command: {name}")]
    ExecFailure {
        name: String,
        #[source]
        source: Option<io::Error>,
    },

    /// A builtin was given a missing or unusable argument.
    #[error("Error: {0}")]
    BuiltinArgument(String),

    /// An OS query made by a builtin failed.
    #[error("Error: {context}")]
    BuiltinState {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    pub fn not_a_command(name: impl Into<String>) -> Self {
        ShellError::ExecFailure {
            name: name.into(),
            source: None,
        }
    }
}
