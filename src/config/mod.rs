//! Configuration module for AuditPro.
//!
//! Provides `AppConfig` (top-level settings), the analysis and UI sub-configs,
//! `AppPaths` for the platform config directory, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AnalysisConfig, AppConfig, UiConfig};
