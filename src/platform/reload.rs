//! Reload requests to running desktop components
//!
//! Fire-and-forget: commands are spawned and never awaited, signals are sent
//! once. Failures are logged and otherwise ignored.

use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{Backend, ProcessProbe};
use crate::constants::process;

/// Component to reload after its files changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reload {
    /// pcmanfm desktop
    Desktop,
    Panel,
    WindowManager,
    /// lxsession settings broadcast
    Session,
    SettingsDaemon,
    /// Re-apply the GTK theme once earlier reloads have settled
    Theme,
}

impl Reload {
    pub const ALL: [Reload; 6] = [
        Reload::Desktop,
        Reload::Panel,
        Reload::WindowManager,
        Reload::Session,
        Reload::SettingsDaemon,
        Reload::Theme,
    ];
}

pub trait Reloader {
    fn reload(&self, target: Reload);

    /// Wait for deferred reloads
    fn flush(&self) {}
}

/// One concrete side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Run(&'static [&'static str]),
    Hangup(&'static str),
}

fn actions(backend: Backend, target: Reload) -> Vec<Action> {
    match (target, backend) {
        (Reload::Desktop, _) => vec![Action::Run(&["pcmanfm", "--reconfigure"])],
        (Reload::Panel, Backend::X11) => vec![Action::Run(&["lxpanelctl", "refresh"])],
        // wf-panel-pi watches its own config
        (Reload::Panel, _) => Vec::new(),
        (Reload::WindowManager, Backend::X11) => vec![Action::Run(&["openbox", "--reconfigure"])],
        (Reload::WindowManager, Backend::Labwc) => vec![Action::Run(&["labwc", "--reconfigure"])],
        // wayfire reloads wayfire.ini on change
        (Reload::WindowManager, Backend::Wayfire) => Vec::new(),
        (Reload::Session, Backend::X11) => vec![Action::Run(&["lxsession", "-r"])],
        (Reload::Session, _) => Vec::new(),
        (Reload::SettingsDaemon, _) => vec![Action::Hangup(process::XSETTINGSD)],
        (Reload::Theme, _) => {
            let mut theme = actions(backend, Reload::Session);
            theme.extend(actions(backend, Reload::SettingsDaemon));
            theme
        }
    }
}

pub struct SystemReloader {
    backend: Backend,
    processes: Arc<dyn ProcessProbe + Send + Sync>,
    theme_delay: Duration,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl SystemReloader {
    pub fn new(
        backend: Backend,
        processes: Arc<dyn ProcessProbe + Send + Sync>,
        theme_delay: Duration,
    ) -> Self {
        Self {
            backend,
            processes,
            theme_delay,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn perform(processes: &dyn ProcessProbe, action: Action) {
        match action {
            Action::Run(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    return;
                };
                match Command::new(program)
                    .args(args)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                {
                    Ok(_) => info!(command = %argv.join(" "), "Requested reload"),
                    Err(e) => warn!(command = %argv.join(" "), error = %e, "Failed to run reload command"),
                }
            }
            Action::Hangup(name) => {
                let pids = processes.pids(name);
                if pids.is_empty() {
                    debug!(process = name, "Not running, nothing to signal");
                }
                for pid in pids {
                    hangup(name, pid);
                }
            }
        }
    }
}

#[cfg(unix)]
fn hangup(name: &str, pid: i32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid), Signal::SIGHUP) {
        Ok(()) => info!(process = name, pid, "Sent SIGHUP"),
        Err(e) => warn!(process = name, pid, error = %e, "Failed to send SIGHUP"),
    }
}

#[cfg(not(unix))]
fn hangup(name: &str, pid: i32) {
    warn!(process = name, pid, "Signals not supported on this platform");
}

impl Reloader for SystemReloader {
    fn reload(&self, target: Reload) {
        let actions = actions(self.backend, target);
        if actions.is_empty() {
            debug!(target = ?target, backend = ?self.backend, "No reload needed");
            return;
        }

        if target != Reload::Theme {
            for action in actions {
                Self::perform(self.processes.as_ref(), action);
            }
            return;
        }

        let processes = Arc::clone(&self.processes);
        let delay = self.theme_delay;
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling theme reload");
        let handle = thread::spawn(move || {
            thread::sleep(delay);
            for action in actions {
                Self::perform(processes.as_ref(), action);
            }
        });
        match self.pending.lock() {
            Ok(mut pending) => pending.push(handle),
            Err(e) => warn!(error = %e, "Reload queue poisoned, theme reload left detached"),
        }
    }

    fn flush(&self) {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(e) => {
                warn!(error = %e, "Reload queue poisoned");
                return;
            }
        };
        for handle in handles {
            if handle.join().is_err() {
                warn!("Deferred theme reload panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x11_commands() {
        assert_eq!(
            actions(Backend::X11, Reload::WindowManager),
            vec![Action::Run(&["openbox", "--reconfigure"])]
        );
        assert_eq!(
            actions(Backend::X11, Reload::Panel),
            vec![Action::Run(&["lxpanelctl", "refresh"])]
        );
        assert_eq!(
            actions(Backend::X11, Reload::Session),
            vec![Action::Run(&["lxsession", "-r"])]
        );
    }

    #[test]
    fn test_wayland_components_reload_themselves() {
        assert!(actions(Backend::Wayfire, Reload::Panel).is_empty());
        assert!(actions(Backend::Wayfire, Reload::WindowManager).is_empty());
        assert_eq!(
            actions(Backend::Labwc, Reload::WindowManager),
            vec![Action::Run(&["labwc", "--reconfigure"])]
        );
    }

    #[test]
    fn test_theme_reapplies_session_and_daemon() {
        assert_eq!(
            actions(Backend::X11, Reload::Theme),
            vec![
                Action::Run(&["lxsession", "-r"]),
                Action::Hangup("xsettingsd")
            ]
        );
        assert_eq!(
            actions(Backend::Labwc, Reload::Theme),
            vec![Action::Hangup("xsettingsd")]
        );
    }
}
