//! A primitive line-oriented shell.
//!
//! Each input line is split on `|` into a pipeline of commands. Commands named
//! `cd`, `pwd`, `history` or `exit` run inside the interpreter; every other one
//! becomes a child process whose standard streams are chained to its neighbours
//! through pipes. The interpreter waits for the whole pipeline before reading the
//! next line, and remembers a fixed number of past lines.
//!
//! The main entry point is [`Interpreter`]. The lower layers are public too:
//! [`lexer`] and [`parser`] turn text into a [`Pipeline`], [`pipeline`] spawns it,
//! [`wait`] reaps it.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
pub mod history;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod signals;
pub mod wait;

pub use builtin::{Dispatch, default_builtins, try_builtin};
pub use config::Config;
pub use error::ShellError;
pub use external::{ChildHandle, find_command_path};
pub use history::HistoryRing;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, LineReport};
pub use parser::{Pipeline, Role, Segment};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that read or change the process working directory.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
