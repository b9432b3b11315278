use crate::env::Environment;
use anyhow::Result;
use std::io::{PipeReader, PipeWriter, Write};
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Children killed by a signal are reported as `128 + signal`.
pub type ExitCode = i32;

/// Where a spawned segment reads its standard input from.
#[derive(Debug)]
pub enum StdinSource {
    /// The interpreter's own standard input.
    Inherit,
    /// Immediate end-of-file. Used when the upstream segment produced no child.
    Null,
    /// The read end of the pipe fed by the previous segment.
    FromPipe(PipeReader),
}

impl StdinSource {
    /// Hands the descriptor over to a [`Stdio`] for `std::process::Command`.
    ///
    /// The parent's copy is closed when the `Command` holding it is dropped.
    pub fn stdio(self) -> Stdio {
        match self {
            StdinSource::Inherit => Stdio::inherit(),
            StdinSource::Null => Stdio::null(),
            StdinSource::FromPipe(reader) => reader.into(),
        }
    }
}

/// Where a spawned segment writes its standard output to.
#[derive(Debug)]
pub enum StdoutSink {
    /// The interpreter's own standard output.
    Inherit,
    /// The write end of a pipe read by the next segment.
    ToPipe(PipeWriter),
}

impl StdoutSink {
    pub fn stdio(self) -> Stdio {
        match self {
            StdoutSink::Inherit => Stdio::inherit(),
            StdoutSink::ToPipe(writer) => writer.into(),
        }
    }
}

/// Stream redirections applied to one child process.
#[derive(Debug)]
pub struct Streams {
    pub stdin: StdinSource,
    pub stdout: StdoutSink,
}

impl Streams {
    pub fn inherit() -> Self {
        Self {
            stdin: StdinSource::Inherit,
            stdout: StdoutSink::Inherit,
        }
    }
}

/// Object-safe trait for a command run inside the interpreter's own process.
pub trait ExecutableCommand {
    /// Executes the command, writing any report to `stdout`.
    ///
    /// Errors are returned rather than printed so the caller decides how to report them.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment)
    -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
