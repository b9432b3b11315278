use crate::command::{ExitCode, Streams};
use crate::error::ShellError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use tracing::debug;

/// A running child process spawned for one pipeline segment.
#[derive(Debug)]
pub struct ChildHandle {
    name: String,
    child: Child,
}

impl ChildHandle {
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until this particular child has terminated.
    pub fn wait(mut self) -> io::Result<ExitCode> {
        let status = self.child.wait()?;
        Ok(exit_code(status))
    }
}

/// Launches `program` with the typed `name` as `argv[0]` and `args` after it.
///
/// The descriptors inside `streams` are moved into the child's configuration and
/// closed in the parent when this function returns, whether or not the spawn
/// succeeded. Descriptors the parent still holds elsewhere are close-on-exec, so
/// the child never sees pipe ends it does not use.
pub fn spawn(
    program: &Path,
    name: &str,
    args: &[String],
    streams: Streams,
) -> Result<ChildHandle, ShellError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(streams.stdin.stdio())
        .stdout(streams.stdout.stdio());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.arg0(name);
    }

    match command.spawn() {
        Ok(child) => {
            debug!(pid = child.id(), program = %program.display(), "spawned child");
            Ok(ChildHandle {
                name: name.to_string(),
                child,
            })
        }
        Err(e) => Err(classify_spawn_error(name, e)),
    }
}

/// Missing or non-executable programs are the user's problem; anything else is the OS's.
fn classify_spawn_error(name: &str, e: io::Error) -> ShellError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ShellError::ExecFailure {
            name: name.to_string(),
            source: Some(e),
        },
        _ => ShellError::SpawnFailure(e),
    }
}

/// Normalises a wait status into a shell-style exit code.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a program name the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it names a file.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it names a file.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first match. Without a PATH nothing is searched.
/// - Trailing separator (e.g., `ls/`): never searched in PATH, only looked up as written.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(
    search_paths: Option<&OsStr>,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() || ends_with_separator(path) {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        // Single component -> search in PATH
        (Some(x), None) => {
            search_paths.and_then(|paths| find_in_path(paths, x.as_os_str()).map(Cow::Owned))
        }
        // Multiple components -> relative to the current dir
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

/// `components()` drops a trailing separator, so it has to be checked on the raw text.
fn ends_with_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .next_back()
        .is_some_and(std::path::is_separator)
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| find_by_path(candidate).is_some())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{StdinSource, StdoutSink};
    use crate::test_support::lock_current_dir;
    use std::fs::{self, File};
    use std::io::Read;

    #[cfg(unix)]
    fn osstr(s: &str) -> Option<&OsStr> {
        Some(OsStr::new(s))
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing_true() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/bin"), path).expect("Expected to find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let res = find_command_path(osstr("/bin"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn directory_is_not_a_program() {
        assert!(find_command_path(osstr("/"), Path::new("/tmp")).is_none());
        assert!(find_command_path(osstr("/"), Path::new("tmp")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let res = find_command_path(osstr("/nonexistent:/bin"), Path::new("sh"));
        let found = res.expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn single_component_not_found_in_path() {
        let res = find_command_path(osstr("/bin"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn multiple_components_relative_existing() {
        let _lock = lock_current_dir();
        let cwd_before = std::env::current_dir().expect("cwd");
        let tmp = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(tmp.path().join("bin")).expect("create bin dir");
        File::create(tmp.path().join("bin").join("sh")).expect("touch bin/sh");

        std::env::set_current_dir(tmp.path()).expect("set cwd");
        let res = find_command_path(osstr("/does/not/matter"), Path::new("bin/sh"))
            .map(|p| p.into_owned());
        std::env::set_current_dir(&cwd_before).ok();

        let found = res.expect("Expected to find relative 'bin/sh' in current dir");
        assert!(found.ends_with("bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn current_dir_with_dot_prefix() {
        let _lock = lock_current_dir();
        let cwd_before = std::env::current_dir().expect("cwd");
        let tmp = tempfile::tempdir().expect("temp dir");
        File::create(tmp.path().join("foo")).expect("touch foo");

        std::env::set_current_dir(tmp.path()).expect("set cwd");
        let res = find_command_path(osstr("/bin"), Path::new("./foo")).map(|p| p.into_owned());
        std::env::set_current_dir(&cwd_before).ok();

        assert_eq!(res.as_deref(), Some(Path::new("./foo")));
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(Some(OsStr::new("/bin")), Path::new("")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn trailing_slash_is_not_searched_in_path() {
        assert!(find_command_path(osstr("/bin"), Path::new("sh/")).is_none());
        assert!(find_command_path(osstr("/bin"), Path::new("/bin/sh/")).is_none());
        assert!(find_command_path(osstr("/bin"), Path::new("sh")).is_some());
    }

    #[test]
    #[cfg(unix)]
    fn no_path_variable_searches_nothing() {
        let _lock = lock_current_dir();
        let cwd_before = std::env::current_dir().expect("cwd");
        let tmp = tempfile::tempdir().expect("temp dir");
        File::create(tmp.path().join("foo")).expect("touch foo");

        std::env::set_current_dir(tmp.path()).expect("set cwd");
        let without_path = find_command_path(None, Path::new("foo")).map(|p| p.into_owned());
        let empty_path = find_command_path(osstr(""), Path::new("foo")).map(|p| p.into_owned());
        std::env::set_current_dir(&cwd_before).ok();

        assert!(without_path.is_none());
        assert!(find_command_path(None, Path::new("sh")).is_none());
        // an explicitly empty PATH entry still means the current directory
        assert!(empty_path.is_some());
    }

    #[test]
    #[cfg(unix)]
    fn spawn_reports_exit_code() {
        let child = spawn(Path::new("/bin/sh"), "sh", &["-c".into(), "exit 3".into()], Streams::inherit())
            .expect("spawn sh");
        assert_eq!(child.name(), "sh");
        assert_eq!(child.wait().unwrap(), 3);
    }

    #[test]
    #[cfg(unix)]
    fn spawn_signal_maps_to_128_plus() {
        let child = spawn(
            Path::new("/bin/sh"),
            "sh",
            &["-c".into(), "kill -TERM $$".into()],
            Streams::inherit(),
        )
        .expect("spawn sh");
        assert_eq!(child.wait().unwrap(), 128 + 15);
    }

    #[test]
    #[cfg(unix)]
    fn spawn_writes_into_pipe() {
        let (mut reader, writer) = io::pipe().unwrap();
        let streams = Streams {
            stdin: StdinSource::Null,
            stdout: StdoutSink::ToPipe(writer),
        };
        let child = spawn(Path::new("/bin/sh"), "sh", &["-c".into(), "echo piped".into()], streams)
            .expect("spawn sh");
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "piped\n");
        assert_eq!(child.wait().unwrap(), 0);
    }

    #[test]
    fn spawn_missing_program_is_exec_failure() {
        let err = spawn(
            Path::new("/definitely/not/here"),
            "here",
            &[],
            Streams::inherit(),
        )
        .unwrap_err();
        assert!(matches!(err, ShellError::ExecFailure { ref name, .. } if name == "here"));
    }
}
