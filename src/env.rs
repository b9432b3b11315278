use crate::error::ShellError;
use crate::history::HistoryRing;
use std::env as stdenv;
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// State that outlives a single input line.
///
/// The working directory and variables belong to the OS process and are queried
/// on demand; only the history and the exit request live here.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Previously entered lines.
    pub history: HistoryRing,
    /// Set by `exit`; the driver stops dispatching once it is raised.
    pub should_exit: bool,
}

impl Environment {
    pub fn new(history_capacity: NonZeroUsize) -> Self {
        Self {
            history: HistoryRing::new(history_capacity),
            should_exit: false,
        }
    }

    /// The interpreter's current working directory.
    pub fn current_dir(&self) -> Result<PathBuf, ShellError> {
        stdenv::current_dir().map_err(|source| ShellError::BuiltinState {
            context: "Directory is invalid!",
            source,
        })
    }

    /// Changes the interpreter's working directory. Children spawned later inherit it.
    pub fn set_current_dir(&self, path: &Path) -> Result<(), ShellError> {
        stdenv::set_current_dir(path)
            .map_err(|_| ShellError::BuiltinArgument("Path is invalid!".to_string()))
    }

    /// Value of `PATH`, used to resolve program names.
    pub fn search_paths(&self) -> Option<OsString> {
        stdenv::var_os("PATH")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_starts_clean() {
        let env = Environment::new(NonZeroUsize::new(4).unwrap());
        assert!(!env.should_exit);
        assert_eq!(env.history.capacity(), 4);
        assert!(env.history.is_empty());
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::default();
        assert!(env.search_paths().is_some());
        assert!(env.current_dir().is_ok());
    }
}
