use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use std::path::Path;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "pwd" or "cd".
    fn name() -> &'static str;

    /// Executes the command, reporting to `stdout`.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        <T as BuiltinCommand>::execute(*self, stdout, env)
    }
}

/// Result of argument parsing that did not produce a command: `--help` output or a usage error.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        if self.is_error {
            return Err(ShellError::BuiltinArgument(self.output.trim_end().to_string()).into());
        }
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(0)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// Outcome of offering a command to the builtin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A builtin ran in-process, successfully or not.
    Handled,
    /// No builtin has this name; the command must be spawned.
    NotBuiltin,
}

/// Runs `argv` in-process if its name belongs to one of `builtins`.
///
/// Errors raised by the builtin are returned, not printed.
pub fn try_builtin(
    builtins: &[Box<dyn CommandFactory>],
    argv: &[String],
    stdout: &mut dyn Write,
    env: &mut Environment,
) -> Result<Dispatch> {
    let Some((name, rest)) = argv.split_first() else {
        return Ok(Dispatch::NotBuiltin);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    match builtins.iter().find_map(|f| f.try_create(name, &args)) {
        Some(cmd) => {
            cmd.execute(stdout, env)?;
            Ok(Dispatch::Handled)
        }
        None => Ok(Dispatch::NotBuiltin),
    }
}

/// All builtins, in lookup order.
pub fn default_builtins() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Pwd>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<History>::default()),
    ]
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let dir = env.current_dir()?;
        writeln!(stdout, "{}", dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory and print the new one.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(
                    ShellError::BuiltinArgument("Argument for path is invalid!".to_string()).into(),
                );
            }
        };
        env.set_current_dir(Path::new(&target))?;
        let dir = env.current_dir()?;
        writeln!(stdout, "Changed directory to:")?;
        writeln!(stdout, "{}", dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit shell process
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; the shell always exits with status 0
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List the most recently entered lines, newest first.
pub struct History {}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let capacity = env.history.capacity();
        writeln!(stdout, "Last {} inputted commands:", capacity)?;
        for (i, entry) in env.history.recent(capacity).into_iter().enumerate() {
            writeln!(stdout, "{}. {}", i + 1, entry)?;
        }
        Ok(0)
    }
}
