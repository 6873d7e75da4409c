// chromashift/src/utils/signals.rs
//! Relays signals received by the wrapper to the wrapped command.
//!
//! On unix a relay thread listens for SIGINT, SIGTERM and SIGHUP and forwards
//! each one, unchanged, to the tracked child. Elsewhere a ctrlc handler only
//! keeps the wrapper alive, since console control events already reach every
//! attached process. Either way the wrapper keeps running so it can drain the
//! child's remaining output and report its exit status; the child decides how
//! to react.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::sync::Once;
use std::sync::atomic::{AtomicU32, Ordering};

/// PID of the running child, 0 when none.
static CHILD_PID: AtomicU32 = AtomicU32::new(0);

static INSTALL: Once = Once::new();

/// Starts relaying. Only the first call per process does anything.
pub fn install_relay() {
    INSTALL.call_once(start_relay);
}

/// Makes `pid` the target of relayed signals.
pub fn track_child(pid: u32) {
    CHILD_PID.store(pid, Ordering::SeqCst);
}

/// Stops relaying, once the child has been reaped.
pub fn untrack_child() {
    CHILD_PID.store(0, Ordering::SeqCst);
}

#[cfg(unix)]
fn start_relay() {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT, SIGTERM, SIGHUP]) {
        Ok(signals) => signals,
        Err(e) => {
            debug!("Signal relay not installed: {}", e);
            return;
        }
    };
    let spawned = std::thread::Builder::new()
        .name("signal-relay".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                let pid = CHILD_PID.load(Ordering::SeqCst);
                if pid != 0 {
                    relay(pid, signal);
                }
            }
        });
    if let Err(e) = spawned {
        debug!("Signal relay thread not started: {}", e);
    }
}

#[cfg(unix)]
fn relay(pid: u32, signal: i32) {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    debug!("Relaying signal {} to child {}", signal, pid);
    // SAFETY: kill(2) has no memory-safety preconditions.
    unsafe {
        libc::kill(pid, signal);
    }
}

#[cfg(not(unix))]
fn start_relay() {
    if let Err(e) = ctrlc::set_handler(|| {}) {
        debug!("Interrupt handler not installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_child_pid() {
        track_child(4242);
        assert_eq!(CHILD_PID.load(Ordering::SeqCst), 4242);
        untrack_child();
        assert_eq!(CHILD_PID.load(Ordering::SeqCst), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_relay_forwards_the_received_signal() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::Command;

        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        relay(child.id(), libc::SIGTERM);
        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(libc::SIGTERM));
    }
}
