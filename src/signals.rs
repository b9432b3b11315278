//! Interrupt policy of the interpreter process.
//!
//! A user interrupt must never kill the interpreter, neither at the prompt nor
//! while it is blocked waiting for a pipeline. SIGINT is mapped to a handler
//! that does nothing rather than to `SIG_IGN`, so children get the default
//! disposition back on `exec` and `^C` still stops them.

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::ffi::c_int;

extern "C" fn swallow(_signal: c_int) {}

/// Installs the no-op SIGINT handler. Call once, before the first prompt.
pub fn swallow_interrupts() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(swallow),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler touches no state, so it is async-signal-safe.
    unsafe { signal::sigaction(Signal::SIGINT, &action) }?;
    Ok(())
}
