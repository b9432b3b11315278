use crate::builtin::{self, Dispatch};
use crate::command::{CommandFactory, ExitCode};
use crate::config::Config;
use crate::env::Environment;
use crate::parser::{Pipeline, Role, Segment};
use crate::pipeline::{Orchestrator, Spawned};
use crate::wait;
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::ffi::OsStr;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtins defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// What happened to one input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineReport {
    /// Number of pipeline segments on the line.
    pub segments: usize,
    /// Segments handled in-process.
    pub builtins: usize,
    /// Exit codes of every child spawned for the line, in spawn order.
    pub exit_codes: Vec<ExitCode>,
    /// Segments that failed and were reported.
    pub errors: usize,
}

enum Step {
    Builtin,
    Child(Spawned),
}

/// A line-oriented shell: reads a line, runs its pipeline, waits for it, repeats.
///
/// The interpreter owns the only state that survives between lines: the
/// [`Environment`] with its history. Everything derived from a line lives for
/// that line only.
///
/// Example
/// ```
/// use pipesh::{Config, Interpreter};
/// let mut sh = Interpreter::new(&Config::default());
/// let mut out = Vec::new();
/// let report = sh.execute_line("true | true", &mut out).unwrap();
/// assert_eq!(report.exit_codes, vec![0, 0]);
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    prompt: String,
}

impl Interpreter {
    pub fn new(config: &Config) -> Self {
        Self::with_builtins(config, builtin::default_builtins())
    }

    /// Create a new interpreter with a custom set of builtin factories.
    pub fn with_builtins(config: &Config, builtins: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(config.history_size),
            builtins,
            prompt: config.prompt.clone(),
        }
    }

    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    pub fn print_banner(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "pipesh - a primitive shell")?;
        writeln!(
            out,
            "Builtins: cd <dir>, pwd, history, exit. Join commands with '|'."
        )?;
        writeln!(out)
    }

    /// Records `line` in the history, then runs it to completion.
    ///
    /// Segments are dispatched in order, builtins first, everything else as a
    /// child process. Per-segment errors are written to `out` and counted; they
    /// never stop the line. Once every segment is dispatched, or `exit` has run,
    /// all children of the line are waited on. Only a failure to write to `out`
    /// is returned as an error, and only after the children spawned so far have
    /// been waited on.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> anyhow::Result<LineReport> {
        self.env.history.record(line);

        let pipeline = Pipeline::parse(line);
        let search_paths = self.env.search_paths();
        let mut orchestrator = Orchestrator::new(pipeline.segment_count());
        let mut report = LineReport {
            segments: pipeline.segment_count(),
            ..LineReport::default()
        };
        let mut failed_write = None;

        for segment in pipeline.segments() {
            if self.env.should_exit {
                debug!(index = segment.index, "exit requested, skipping the rest of the line");
                break;
            }
            match self.dispatch(segment, &mut orchestrator, search_paths.as_deref(), out) {
                Ok(Step::Builtin) => report.builtins += 1,
                Ok(Step::Child(Spawned::Waited(code))) => report.exit_codes.push(code),
                Ok(Step::Child(Spawned::Running)) => {}
                Err(e) => {
                    report.errors += 1;
                    if let Err(write_error) = writeln!(out, "{}", e) {
                        failed_write = Some(write_error);
                        break;
                    }
                }
            }
        }

        report
            .exit_codes
            .extend(wait::wait_all(orchestrator.finish()));
        if let Some(e) = failed_write {
            return Err(e).context("failed to report a segment error");
        }
        debug!(?report, "line done");
        Ok(report)
    }

    fn dispatch(
        &mut self,
        segment: &Segment,
        orchestrator: &mut Orchestrator,
        search_paths: Option<&OsStr>,
        out: &mut dyn Write,
    ) -> anyhow::Result<Step> {
        let dispatched = builtin::try_builtin(&self.builtins, &segment.argv, out, &mut self.env);
        if !matches!(dispatched, Ok(Dispatch::NotBuiltin)) {
            if segment.role != Role::Sole {
                warn!(
                    index = segment.index,
                    role = ?segment.role,
                    "builtin inside a pipeline is not connected to its pipes"
                );
            }
            orchestrator.release(segment.role);
            return dispatched.map(|_| Step::Builtin);
        }

        match orchestrator.spawn(segment, search_paths) {
            Ok(spawned) => Ok(Step::Child(spawned)),
            Err(e) => {
                orchestrator.release(segment.role);
                Err(e.into())
            }
        }
    }

    /// The read-eval loop. Returns after `exit` or at end of input.
    ///
    /// An interrupt at the prompt discards the partial line and prompts again.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new().context("failed to set up line editor")?;
        let mut stdout = io::stdout();

        while !self.env.should_exit {
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.execute_line(&line, &mut stdout)?;
                    writeln!(stdout)?;
                    stdout.flush()?;
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("interrupted at prompt");
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    break;
                }
                Err(err) => return Err(err).context("failed to read input line"),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
