//! Session configuration.
//!
//! [`SessionConfig`] carries everything a [`crate::PageSession`] needs; its
//! serializable subset [`ConfigFile`] can be loaded from JSON.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::breakpoint::BreakpointTable;
use crate::error::Result;
use crate::geometry::GridSpacing;
use crate::logging::Logger;
use crate::metrics::SessionMetrics;
use crate::registry::SectionDefaults;
use crate::wizard::WizardLimits;

/// JSON-loadable portion of the configuration. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub breakpoints: BreakpointTable,
    pub spacing: GridSpacing,
    pub section_defaults: SectionDefaults,
    pub wizard: WizardLimits,
    /// Viewport width assumed until the host reports one.
    pub initial_width: u32,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            spacing: GridSpacing::default(),
            section_defaults: SectionDefaults::default(),
            wizard: WizardLimits::default(),
            initial_width: 1200,
        }
    }
}

/// Configuration knobs for a page session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub breakpoints: BreakpointTable,
    pub spacing: GridSpacing,
    pub section_defaults: SectionDefaults,
    pub wizard: WizardLimits,
    pub initial_width: u32,
    /// Optional structured logger used by the session.
    pub logger: Option<Logger>,
    /// Metrics accumulator; snapshots are logged when the session stops.
    pub metrics: Option<Arc<Mutex<SessionMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(ConfigFile::default())
    }
}

impl From<ConfigFile> for SessionConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            breakpoints: file.breakpoints,
            spacing: file.spacing,
            section_defaults: file.section_defaults,
            wizard: file.wizard,
            initial_width: file.initial_width,
            logger: None,
            metrics: None,
            metrics_target: "gridpage::session.metrics".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw)?;
        Ok(file.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SessionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SessionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageError;

    #[test]
    fn defaults_cover_five_breakpoints() {
        let config = SessionConfig::default();
        assert_eq!(config.breakpoints.len(), 5);
        assert_eq!(config.breakpoints.resolve(config.initial_width).columns, 24);
        assert_eq!(config.spacing.row_height, 20);
        assert_eq!(config.section_defaults.w, 6);
        assert!(config.logger.is_none());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = SessionConfig::from_json(
            r#"{
                "breakpoints": [
                    {"name": "desktop", "min_width": 900, "columns": 12},
                    {"name": "phone", "min_width": 0, "columns": 2}
                ],
                "spacing": {"row_height": 30},
                "initial_width": 400
            }"#,
        )
        .unwrap();

        assert_eq!(config.breakpoints.resolve(config.initial_width).name, "phone");
        assert_eq!(config.spacing.row_height, 30);
        assert_eq!(config.spacing.margin, [5, 5]);
        assert_eq!(config.section_defaults.min_h, 2);
        assert_eq!(config.wizard.max_dimension, 32);
    }

    #[test]
    fn invalid_breakpoints_are_config_errors() {
        let err = SessionConfig::from_json(r#"{"breakpoints": []}"#).unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
    }

    #[test]
    fn metrics_toggle() {
        let mut config = SessionConfig::default();
        config.enable_metrics();
        assert!(config.metrics_handle().is_some());
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
