//! Output (monitor) detection
//!
//! X11 sessions ask RandR for the active monitors; Wayland sessions read the
//! connector state exported by the kernel DRM drivers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as RandrExt;
use x11rb::protocol::xproto::ConnectionExt as XprotoExt;

use super::Backend;
use crate::constants::outputs;

pub trait OutputProbe {
    /// Names of the connected outputs, primary first where known
    fn output_names(&self) -> Result<Vec<String>>;
}

/// Number of per-output desktop records for `reported` outputs
pub fn clamp_outputs(reported: usize, backend: Backend) -> usize {
    reported.clamp(1, backend.max_desktops())
}

/// Probe matching the session backend
pub fn probe_for(backend: Backend) -> Box<dyn OutputProbe> {
    match backend {
        Backend::X11 => Box::new(RandrOutputs),
        Backend::Wayfire | Backend::Labwc => Box::new(DrmOutputs::new()),
    }
}

/// Ask `probe` for the connected outputs. A failed probe is logged and
/// treated as a single unnamed output.
pub fn detect_outputs(probe: &dyn OutputProbe) -> Vec<String> {
    probe.output_names().unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Output detection failed, assuming a single output");
        Vec::new()
    })
}

/// RandR 1.5 monitor list from the default display
pub struct RandrOutputs;

impl OutputProbe for RandrOutputs {
    fn output_names(&self) -> Result<Vec<String>> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11")?;
        let root = conn.setup().roots[screen_num].root;

        let monitors = conn
            .randr_get_monitors(root, true)
            .context("Failed to query RandR monitors")?
            .reply()
            .context("Failed to get reply for RandR monitors query")?
            .monitors;

        let mut names = Vec::with_capacity(monitors.len());
        // primary first, then in server order
        let mut ordered: Vec<_> = monitors.iter().collect();
        ordered.sort_by_key(|m| !m.primary);
        for monitor in ordered {
            let name = conn
                .get_atom_name(monitor.name)
                .context("Failed to request monitor name")?
                .reply()
                .context("Failed to get reply for monitor name")?
                .name;
            names.push(String::from_utf8_lossy(&name).into_owned());
        }
        info!(count = names.len(), names = ?names, "Detected X11 monitors");
        Ok(names)
    }
}

/// Connected connectors under `/sys/class/drm`
pub struct DrmOutputs {
    root: PathBuf,
}

impl DrmOutputs {
    pub fn new() -> Self {
        Self::with_root(Path::new(outputs::DRM_CLASS_DIR))
    }

    pub fn with_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Default for DrmOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputProbe for DrmOutputs {
    fn output_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            // card1-HDMI-A-1 -> HDMI-A-1; bare cards have no status file
            let Some((_, connector)) = file_name.split_once('-') else {
                continue;
            };
            let status = match fs::read_to_string(entry.path().join("status")) {
                Ok(status) => status,
                Err(e) => {
                    debug!(connector, error = %e, "Connector status not readable");
                    continue;
                }
            };
            if status.trim() == "connected" {
                names.push(connector.to_string());
            }
        }
        names.sort();
        info!(count = names.len(), names = ?names, "Detected DRM outputs");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::platform::fakes::FakeOutputs;
    use tempfile::TempDir;

    #[test]
    fn test_clamp_to_backend_caps() {
        assert_eq!(clamp_outputs(0, Backend::X11), 1);
        assert_eq!(clamp_outputs(3, Backend::X11), 3);
        assert_eq!(clamp_outputs(12, Backend::X11), 9);
        assert_eq!(clamp_outputs(12, Backend::Labwc), 9);
        assert_eq!(clamp_outputs(3, Backend::Wayfire), 2);
        assert_eq!(clamp_outputs(1, Backend::Wayfire), 1);
    }

    #[test]
    fn test_drm_reads_connected_connectors() {
        let dir = TempDir::new().unwrap();
        for (name, status) in [
            ("card1-HDMI-A-2", "connected"),
            ("card1-HDMI-A-1", "connected\n"),
            ("card1-DSI-1", "disconnected"),
        ] {
            let path = dir.path().join(name);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("status"), status).unwrap();
        }
        fs::create_dir_all(dir.path().join("card1")).unwrap();
        fs::create_dir_all(dir.path().join("card0-Writeback-1")).unwrap();

        let names = DrmOutputs::with_root(dir.path()).output_names().unwrap();
        assert_eq!(names, vec!["HDMI-A-1", "HDMI-A-2"]);
    }

    struct FailingOutputs;

    impl OutputProbe for FailingOutputs {
        fn output_names(&self) -> Result<Vec<String>> {
            anyhow::bail!("no display")
        }
    }

    #[test]
    fn test_detected_outputs_drive_layout() {
        let three = FakeOutputs(vec!["HDMI-A-1".into(), "HDMI-A-2".into(), "DSI-1".into()]);
        let layout = Layout::new(Backend::Wayfire, "LXDE-pi", None, detect_outputs(&three));
        assert_eq!(layout.desktops, 2);
        assert_eq!(layout.output_name(2), Some("DSI-1"));

        let layout = Layout::new(Backend::X11, "LXDE-pi", None, detect_outputs(&FailingOutputs));
        assert!(layout.outputs.is_empty());
        assert_eq!(layout.desktops, 1);
    }

    #[test]
    fn test_drm_missing_root_is_error() {
        assert!(DrmOutputs::with_root(Path::new("/nonexistent/drm")).output_names().is_err());
    }
}
