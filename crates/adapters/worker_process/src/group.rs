//! Teardown of the worker's whole process group.
//!
//! The worker is spawned as the leader of a fresh process group, so every
//! process it starts (interpreter, browser driver, browser) can be signalled
//! at once. Dropping an armed [`GroupGuard`] sends `SIGTERM` to the group,
//! then `SIGKILL` after the grace period for anything still alive.

use std::time::Duration;

use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

/// Signals the worker's process group when dropped while armed.
#[derive(Debug)]
pub(crate) struct GroupGuard {
    group: Option<Pid>,
    grace: Duration,
}

impl GroupGuard {
    /// Guard for the group led by the process `pid`.
    pub(crate) fn new(pid: Option<u32>, grace: Duration) -> Self {
        let group = pid
            .and_then(|pid| i32::try_from(pid).ok())
            .map(Pid::from_raw);
        Self { group, grace }
    }

    /// The worker finished on its own; leave the group alone.
    pub(crate) fn disarm(&mut self) {
        self.group = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        let Some(group) = self.group.take() else {
            return;
        };
        tracing::warn!(pgid = group.as_raw(), "terminating worker process group");
        send(group, Signal::SIGTERM);

        let grace = self.grace;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(grace).await;
                    send(group, Signal::SIGKILL);
                });
            }
            Err(_) => send(group, Signal::SIGKILL),
        }
    }
}

fn send(group: Pid, signal: Signal) {
    match killpg(group, signal) {
        // The whole group is already gone.
        Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
        Err(err) => tracing::warn!(
            pgid = group.as_raw(),
            signal = signal.as_str(),
            error = %err,
            "failed to signal worker group"
        ),
    }
}
