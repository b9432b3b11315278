//! Turns the segments of a parsed line into a chain of child processes.
//!
//! The [`Orchestrator`] is fed one segment at a time, in order. It owns every pipe
//! endpoint it creates until that endpoint is either handed to a child's stream
//! configuration or dropped; between two calls the only descriptor it keeps is the
//! read end destined for the next segment.

use crate::command::{ExitCode, StdinSource, StdoutSink, Streams};
use crate::error::ShellError;
use crate::external::{self, ChildHandle};
use crate::parser::{Role, Segment};
use crate::wait;
use std::ffi::OsStr;
use std::io::{self, PipeReader, PipeWriter};
use std::path::Path;
use tracing::debug;

/// What became of a segment handed to [`Orchestrator::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawned {
    /// A `Sole` segment: the child was waited on straight away.
    Waited(ExitCode),
    /// Part of a longer pipeline: the child is running and will be waited on later.
    Running,
}

#[derive(Debug)]
pub struct Orchestrator {
    segment_count: usize,
    /// Read end of the pipe written by the previous segment.
    upstream: Option<PipeReader>,
    /// Replaces the inherited stdout of the final segment when set.
    final_stdout: Option<PipeWriter>,
    children: Vec<ChildHandle>,
}

impl Orchestrator {
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count,
            upstream: None,
            final_stdout: None,
            children: Vec::with_capacity(segment_count),
        }
    }

    /// Like [`Orchestrator::new`], but the `Sole` or `Last` segment writes into `output`
    /// instead of the interpreter's standard output.
    pub fn with_output(segment_count: usize, output: PipeWriter) -> Self {
        Self {
            final_stdout: Some(output),
            ..Self::new(segment_count)
        }
    }

    /// Spawns `segment` as a child process wired according to its role.
    ///
    /// Whatever happens, the upstream read end retained for this position is
    /// consumed: given to the child on success, closed on failure. A new pipe is
    /// only retained once its writer is safely inside a running child.
    pub fn spawn(
        &mut self,
        segment: &Segment,
        search_paths: Option<&OsStr>,
    ) -> Result<Spawned, ShellError> {
        debug_assert_eq!(segment.role, Role::assign(segment.index, self.segment_count));
        let upstream = self.upstream.take();

        let name = segment.program().ok_or(ShellError::ParseEmpty)?;
        let program = external::find_command_path(search_paths, Path::new(name))
            .ok_or_else(|| ShellError::not_a_command(name))?
            .into_owned();

        let stdin = match upstream {
            Some(reader) if segment.role.reads_pipe() => StdinSource::FromPipe(reader),
            _ if segment.role.reads_pipe() => StdinSource::Null,
            _ => StdinSource::Inherit,
        };
        let (stdout, downstream) = if segment.role.writes_pipe() {
            let (reader, writer) = io::pipe().map_err(ShellError::SpawnFailure)?;
            (StdoutSink::ToPipe(writer), Some(reader))
        } else {
            (self.final_sink(), None)
        };
        debug!(
            index = segment.index,
            role = ?segment.role,
            program = %program.display(),
            ?stdin,
            ?stdout,
            "wiring segment"
        );

        let child = external::spawn(&program, name, segment.args(), Streams { stdin, stdout })?;
        self.upstream = downstream;

        if segment.role == Role::Sole {
            let code = wait::wait_all(vec![child]).pop().unwrap_or(-1);
            return Ok(Spawned::Waited(code));
        }
        self.children.push(child);
        Ok(Spawned::Running)
    }

    /// Gives up the segment at a position that spawns no child (builtins, errors).
    ///
    /// The upstream read end is closed; the segment after it will see end-of-file.
    pub fn release(&mut self, role: Role) {
        if self.upstream.take().is_some() {
            debug!(?role, "closed unused upstream pipe");
        }
        if !role.writes_pipe() {
            self.final_stdout = None;
        }
    }

    #[cfg(test)]
    fn holds_pipe_endpoint(&self) -> bool {
        self.upstream.is_some()
    }

    /// Ends the spawn phase, closing anything left over, and hands the children
    /// to the caller in spawn order.
    pub fn finish(self) -> Vec<ChildHandle> {
        self.children
    }

    fn final_sink(&mut self) -> StdoutSink {
        match self.final_stdout.take() {
            Some(writer) => StdoutSink::ToPipe(writer),
            None => StdoutSink::Inherit,
        }
    }
}
