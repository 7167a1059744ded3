//! Collaborators outside the filesystem model
//!
//! Session backend detection plus thin probes for outputs, processes and
//! fonts, and the reload commands. Every probe sits behind a trait so the
//! engine can be driven with fakes.

pub mod fonts;
pub mod outputs;
pub mod processes;
pub mod reload;

use serde::Serialize;
use tracing::info;

use crate::constants::{outputs as output_limits, process};
use crate::types::NamingScheme;

pub use fonts::{FontProbe, FontconfigProbe};
pub use outputs::clamp_outputs;
pub use processes::{ProcessProbe, ProcScanner};
pub use reload::{Reload, Reloader, SystemReloader};

/// Desktop session flavour; decides which files exist and which reloads apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Backend {
    /// openbox + lxpanel
    X11,
    /// wayfire + wf-panel-pi
    Wayfire,
    /// labwc + wf-panel-pi
    Labwc,
}

impl Backend {
    /// Detect from the process environment
    pub fn detect(processes: &dyn ProcessProbe) -> Self {
        let backend = Self::from_session(
            std::env::var("WAYLAND_DISPLAY").ok().as_deref(),
            std::env::var("XDG_SESSION_TYPE").ok().as_deref(),
            processes,
        );
        info!(backend = ?backend, "Detected session backend");
        backend
    }

    pub fn from_session(
        wayland_display: Option<&str>,
        session_type: Option<&str>,
        processes: &dyn ProcessProbe,
    ) -> Self {
        let wayland = wayland_display.is_some_and(|d| !d.is_empty())
            || session_type == Some("wayland");
        if !wayland {
            Backend::X11
        } else if processes.is_running(process::LABWC) {
            Backend::Labwc
        } else {
            Backend::Wayfire
        }
    }

    pub fn is_wayland(self) -> bool {
        self != Backend::X11
    }

    /// Naming used when the app config does not force one
    pub fn default_naming(self) -> NamingScheme {
        if self.is_wayland() {
            NamingScheme::OutputName
        } else {
            NamingScheme::Index
        }
    }

    pub fn max_desktops(self) -> usize {
        match self {
            Backend::Wayfire => output_limits::WAYFIRE_MAX_DESKTOPS,
            Backend::X11 | Backend::Labwc => output_limits::MAX_DESKTOPS,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::FakeProcesses;
    use super::*;

    #[test]
    fn test_x11_when_no_wayland_markers() {
        let procs = FakeProcesses::with(&["labwc"]);
        assert_eq!(Backend::from_session(None, Some("x11"), &procs), Backend::X11);
        assert_eq!(Backend::from_session(Some(""), None, &procs), Backend::X11);
    }

    #[test]
    fn test_wayland_compositor_choice() {
        let none = FakeProcesses::default();
        let labwc = FakeProcesses::with(&["labwc"]);
        assert_eq!(Backend::from_session(Some("wayland-0"), None, &none), Backend::Wayfire);
        assert_eq!(Backend::from_session(None, Some("wayland"), &labwc), Backend::Labwc);
    }

    #[test]
    fn test_backend_naming_and_caps() {
        assert_eq!(Backend::X11.default_naming(), NamingScheme::Index);
        assert_eq!(Backend::Labwc.default_naming(), NamingScheme::OutputName);
        assert_eq!(Backend::Wayfire.max_desktops(), 2);
        assert_eq!(Backend::X11.max_desktops(), 9);
    }
}
