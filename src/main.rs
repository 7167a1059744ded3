#![forbid(unsafe_code)]

mod backup;
mod color;
mod config;
mod constants;
mod font;
mod formats;
mod platform;
mod settings;
mod sync;
mod types;

#[cfg(test)]
mod testutil;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

use backup::BackupManager;
use color::Rgb;
use config::{AppConfig, Layout, Paths, ReadScope};
use font::FontDesc;
use platform::outputs::{detect_outputs, probe_for};
use platform::{Backend, FontconfigProbe, ProcScanner, Reload, Reloader, SystemReloader};
use settings::fields;
use settings::{Loader, Presets, Settings};
use sync::{Change, Editor, Engine, ModeChange, WriteFailure};
use types::{PanelEdge, PresetTier, WallpaperMode};

#[derive(Parser)]
#[command(name = "appearance-sync", version, about = "Keep desktop appearance settings in sync across applications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current settings and the presets as JSON
    Show,
    /// Rewrite every managed file from the current settings
    Apply,
    /// Reset everything to a preset
    Reset {
        #[arg(value_enum)]
        tier: PresetTier,
    },
    /// Change one setting
    Set {
        #[command(subcommand)]
        change: SetCommand,
    },
    /// Start an editing session (backs up every managed file)
    Begin {
        /// Replace the backup of a session that was never cancelled or committed
        #[arg(long)]
        force: bool,
    },
    /// Undo everything since `begin`
    Cancel,
    /// Keep everything since `begin`
    Commit,
}

#[derive(Subcommand)]
enum SetCommand {
    /// Highlight colour of the active theme
    Accent {
        #[arg(value_parser = fields::color)]
        color: Rgb,
        #[arg(long, value_parser = fields::color)]
        text: Option<Rgb>,
    },
    /// Taskbar colour of the active theme
    Bar {
        #[arg(value_parser = fields::color)]
        color: Rgb,
        #[arg(long, value_parser = fields::color)]
        text: Option<Rgb>,
    },
    DesktopFont {
        #[arg(value_parser = fields::font)]
        font: FontDesc,
    },
    TerminalFont {
        #[arg(value_parser = fields::font)]
        font: FontDesc,
    },
    /// Switch between the light and dark theme
    Dark {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    Cursor {
        #[arg(value_parser = fields::cursor_size)]
        size: u32,
    },
    ToolbarIcons {
        #[arg(value_parser = fields::toolbar_icon_size)]
        size: u32,
    },
    FolderIcons {
        #[arg(value_parser = fields::folder_icon_size)]
        size: u32,
    },
    ThumbnailSize {
        #[arg(value_parser = fields::thumbnail_size)]
        size: u32,
    },
    PaneIcons {
        #[arg(value_parser = fields::small_icon_size)]
        size: u32,
    },
    SideIcons {
        #[arg(value_parser = fields::small_icon_size)]
        size: u32,
    },
    OfficeIcons {
        #[arg(value_parser = fields::office_icon_tier)]
        tier: u8,
    },
    TaskbarPosition {
        #[arg(value_parser = parse_edge)]
        edge: PanelEdge,
    },
    TaskbarSize {
        #[arg(value_parser = fields::taskbar_icon_size)]
        size: u32,
    },
    TaskbarWidth {
        #[arg(value_parser = fields::taskbar_item_width)]
        width: u32,
    },
    TaskbarMonitor {
        index: usize,
    },
    HandleWidth {
        #[arg(value_parser = fields::handle_width)]
        width: u32,
    },
    ScrollbarWidth {
        #[arg(value_parser = fields::scrollbar_width)]
        width: u32,
    },
    /// Use desktop 0's settings on every output
    CommonBackground {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    Wallpaper {
        #[arg(value_parser = fields::path)]
        path: PathBuf,
        #[arg(long, default_value_t = 0)]
        desktop: usize,
    },
    WallpaperMode {
        #[arg(value_parser = parse_wallpaper_mode)]
        mode: WallpaperMode,
        #[arg(long, default_value_t = 0)]
        desktop: usize,
    },
    DesktopColors {
        #[arg(value_parser = fields::color)]
        background: Rgb,
        #[arg(value_parser = fields::color)]
        foreground: Rgb,
        #[arg(long, default_value_t = 0)]
        desktop: usize,
    },
    DesktopItems {
        #[arg(long, action = clap::ArgAction::Set, default_value_t = false)]
        documents: bool,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        trash: bool,
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        mounts: bool,
        #[arg(long, default_value_t = 0)]
        desktop: usize,
    },
    DesktopFolder {
        #[arg(value_parser = fields::path)]
        path: PathBuf,
        #[arg(long, default_value_t = 0)]
        desktop: usize,
    },
}

fn parse_edge(raw: &str) -> Result<PanelEdge, fields::Invalid> {
    raw.parse()
}

fn parse_wallpaper_mode(raw: &str) -> Result<WallpaperMode, fields::Invalid> {
    raw.parse()
}

impl SetCommand {
    fn into_changes(self) -> Vec<Change> {
        match self {
            SetCommand::Accent { color, text } => {
                let mut changes = vec![Change::AccentColor(color)];
                changes.extend(text.map(Change::AccentTextColor));
                changes
            }
            SetCommand::Bar { color, text } => {
                let mut changes = vec![Change::BarColor(color)];
                changes.extend(text.map(Change::BarTextColor));
                changes
            }
            SetCommand::DesktopFont { font } => vec![Change::DesktopFont(font)],
            SetCommand::TerminalFont { font } => vec![Change::TerminalFont(font)],
            SetCommand::Dark { enabled } => vec![Change::DarkMode(enabled)],
            SetCommand::Cursor { size } => vec![Change::CursorSize(size)],
            SetCommand::ToolbarIcons { size } => vec![Change::ToolbarIconSize(size)],
            SetCommand::FolderIcons { size } => vec![Change::FolderIconSize(size)],
            SetCommand::ThumbnailSize { size } => vec![Change::ThumbnailSize(size)],
            SetCommand::PaneIcons { size } => vec![Change::PaneIconSize(size)],
            SetCommand::SideIcons { size } => vec![Change::SideIconSize(size)],
            SetCommand::OfficeIcons { tier } => vec![Change::OfficeIconTier(tier)],
            SetCommand::TaskbarPosition { edge } => vec![Change::TaskbarPosition(edge)],
            SetCommand::TaskbarSize { size } => vec![Change::TaskbarIconSize(size)],
            SetCommand::TaskbarWidth { width } => vec![Change::TaskbarItemWidth(width)],
            SetCommand::TaskbarMonitor { index } => vec![Change::TaskbarMonitor(index)],
            SetCommand::HandleWidth { width } => vec![Change::HandleWidth(width)],
            SetCommand::ScrollbarWidth { width } => vec![Change::ScrollbarWidth(width)],
            SetCommand::CommonBackground { enabled } => vec![Change::CommonBackground(enabled)],
            SetCommand::Wallpaper { path, desktop } => vec![Change::Wallpaper { desktop, path }],
            SetCommand::WallpaperMode { mode, desktop } => vec![Change::WallpaperMode { desktop, mode }],
            SetCommand::DesktopColors {
                background,
                foreground,
                desktop,
            } => vec![Change::DesktopColors {
                desktop,
                background,
                foreground,
            }],
            SetCommand::DesktopItems {
                documents,
                trash,
                mounts,
                desktop,
            } => vec![Change::DesktopItems {
                desktop,
                documents,
                trash,
                mounts,
            }],
            SetCommand::DesktopFolder { path, desktop } => vec![Change::DesktopFolder { desktop, path }],
        }
    }
}

/// Everything detected about the running session
struct Environment {
    app: AppConfig,
    paths: Paths,
    layout: Layout,
    processes: Arc<ProcScanner>,
}

impl Environment {
    fn detect(app: AppConfig) -> Result<Self> {
        let paths = Paths::from_env(&app)?;
        let processes = Arc::new(ProcScanner::new());
        let backend = Backend::detect(processes.as_ref());
        let outputs = detect_outputs(probe_for(backend).as_ref());
        let layout = Layout::new(backend, &app.session_profile, app.desktop_naming, outputs);
        info!(
            backend = ?layout.backend,
            outputs = ?layout.outputs,
            desktops = layout.desktops,
            "Session layout"
        );
        Ok(Self {
            app,
            paths,
            layout,
            processes,
        })
    }

    fn load(&self, scope: ReadScope) -> Settings {
        Loader::new(&self.paths, &self.layout, scope).load()
    }

    fn presets(&self, live: &Settings) -> Presets {
        Presets::build(&self.load(ReadScope::System), live, &FontconfigProbe)
    }

    fn reloader(&self) -> SystemReloader {
        SystemReloader::new(
            self.layout.backend,
            self.processes.clone(),
            Duration::from_millis(self.app.theme_reload_delay_ms),
        )
    }

    fn engine(&self) -> Engine {
        Engine::new(self.paths.clone(), self.layout.clone())
    }

    fn backup_files(&self) -> Vec<config::Location> {
        self.engine()
            .managed_files()
            .into_iter()
            .map(|file| file.location)
            .collect()
    }
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    backend: Backend,
    outputs: &'a [String],
    settings: &'a Settings,
    presets: &'a Presets,
}

fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Level to switch to once the app config is loaded. `LOG_LEVEL` always wins.
fn configured_level(env_level: Option<&str>, config_level: &str) -> Option<LevelFilter> {
    match env_level {
        Some(_) => None,
        None => Some(parse_level(config_level)),
    }
}

fn check_failures(failures: &[WriteFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    for failure in failures {
        eprintln!("could not write {}: {}", failure.path.display(), failure.error);
    }
    bail!("{} file(s) could not be written", failures.len())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // installed before the config is read so its load errors are logged
    let env_level = std::env::var("LOG_LEVEL").ok();
    let (filter, log_filter) =
        tracing_subscriber::reload::Layer::new(parse_level(env_level.as_deref().unwrap_or("info")));
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
    )
    .context("Failed to install log subscriber")?;

    let app = AppConfig::load();
    if let Some(level) = configured_level(env_level.as_deref(), &app.log_level) {
        log_filter
            .reload(level)
            .context("Failed to apply configured log level")?;
    }

    let env = Environment::detect(app)?;
    match cli.command {
        Command::Show => {
            let live = env.load(ReadScope::User);
            let presets = env.presets(&live);
            let output = ShowOutput {
                backend: env.layout.backend,
                outputs: &env.layout.outputs,
                settings: &live,
                presets: &presets,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialize settings")?
            );
            Ok(())
        }
        Command::Begin { force } => {
            let mut manager = BackupManager::new(env.paths.clone(), env.backup_files());
            let snapshot = manager.start(force)?;
            for failure in &snapshot.failures {
                eprintln!(
                    "could not back up {}: {} (cancel will leave it as it is)",
                    failure.path.display(),
                    failure.error
                );
            }
            println!("session started, {} file(s) backed up", snapshot.copied);
            Ok(())
        }
        Command::Cancel => {
            let manager = BackupManager::resume(env.paths.clone(), env.backup_files())?;
            let outcome = manager
                .cancel_in_background()?
                .recv()
                .context("Restore worker exited without a result")??;
            if outcome.changed {
                let reloader = env.reloader();
                for target in Reload::ALL {
                    reloader.reload(target);
                }
                reloader.flush();
                println!("session cancelled, files restored");
            } else {
                println!("session cancelled, nothing to restore");
            }
            check_failures(&outcome.failures)
        }
        Command::Commit => {
            BackupManager::resume(env.paths.clone(), env.backup_files())?.commit()?;
            println!("session committed");
            Ok(())
        }
        edit => run_edit(&env, edit),
    }
}

/// `apply`, `reset` and `set`: one editor session
fn run_edit(env: &Environment, command: Command) -> Result<()> {
    let live = env.load(ReadScope::User);
    let presets = env.presets(&live);
    let reloader = env.reloader();
    let mut editor = Editor::new(
        live,
        presets,
        env.engine(),
        &reloader,
        env.processes.as_ref(),
        env.app.guarded_apps.clone(),
    );

    match command {
        Command::Apply => editor.apply_all(),
        Command::Reset { tier } => editor.reset(tier),
        Command::Set { change } => {
            for change in change.into_changes() {
                match editor.apply(change) {
                    ModeChange::Applied => {}
                    ModeChange::Unchanged => println!("already set"),
                    ModeChange::Blocked { app } => {
                        println!("cannot switch theme while {app} is running; close it and try again");
                    }
                }
            }
        }
        Command::Show | Command::Begin { .. } | Command::Cancel | Command::Commit => {}
    }
    check_failures(editor.finish().failures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::FmtSubscriber;

    #[test]
    fn test_log_level_names() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("verbose"), LevelFilter::INFO);
    }

    #[test]
    fn test_env_level_beats_config_level() {
        assert_eq!(configured_level(None, "debug"), Some(LevelFilter::DEBUG));
        assert_eq!(configured_level(Some("error"), "debug"), None);
    }

    #[test]
    fn test_config_errors_reach_the_subscriber() {
        use std::io::Write;
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(LevelFilter::INFO)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let app = tracing::subscriber::with_default(subscriber, || AppConfig::load_from(&path));

        assert_eq!(app.log_level, AppConfig::default().log_level);
        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Using default config"), "{logged}");
    }
}
