//! Configuration and file locations
//!
//! - **app**: this tool's own JSON config
//! - **paths**: user/system/backup path resolution and the per-backend file layout

pub mod app;
pub mod paths;

pub use app::AppConfig;
pub use paths::{Layout, Location, Paths, ReadScope};
