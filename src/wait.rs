use crate::command::ExitCode;
use crate::external::ChildHandle;
use tracing::{debug, warn};

/// Waits for every child of a pipeline, in spawn order.
///
/// Each handle is waited on exactly once. A child that finishes early simply
/// stays a zombie until its turn comes. The returned codes are in the same order
/// as the handles; a failed wait is reported as `-1`.
pub fn wait_all(children: Vec<ChildHandle>) -> Vec<ExitCode> {
    children
        .into_iter()
        .map(|child| {
            let pid = child.pid();
            let name = child.name().to_string();
            match child.wait() {
                Ok(code) => {
                    debug!(pid, name = %name, code, "child exited");
                    code
                }
                Err(e) => {
                    warn!(pid, name = %name, error = %e, "wait failed");
                    -1
                }
            }
        })
        .collect()
}
