use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::SessionConfig;
use crate::error::WizardError;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

use super::{ContentSink, generate_content};

const LOG_TARGET: &str = "gridpage::wizard";

/// Rows and columns of placeholder cells for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridShape {
    fn default() -> Self {
        Self { rows: 1, cols: 1 }
    }
}

impl GridShape {
    pub fn cell_count(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }
}

/// Upper bounds applied after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardLimits {
    pub max_sections: u32,
    pub max_dimension: u32,
}

impl Default for WizardLimits {
    fn default() -> Self {
        Self {
            max_sections: 64,
            max_dimension: 32,
        }
    }
}

/// Dialog state. Only one prompt can be open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WizardState {
    #[default]
    Idle,
    CountPrompt {
        count: u32,
    },
    GridPrompt {
        configs: Vec<GridShape>,
        cursor: usize,
    },
}

impl WizardState {
    fn label(&self) -> &'static str {
        match self {
            WizardState::Idle => "idle",
            WizardState::CountPrompt { .. } => "count",
            WizardState::GridPrompt { .. } => "grid",
        }
    }
}

/// Where the wizard stands after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Showing the grid prompt for section `index` of `total`.
    GridPrompt { index: usize, total: usize },
    /// Markup for `sections` sections was handed to the editor.
    Finished { sections: usize },
}

/// Parse a numeric dialog input the way a lenient number field does: leading
/// whitespace and sign allowed, digits up to the first non-digit. Anything
/// unparsable or not positive becomes `1`; the result is capped at `max`.
pub fn coerce_positive(input: &str, max: u32) -> u32 {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if negative || digits.is_empty() {
        return 1;
    }
    // Overflowing input is still a large positive number.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    if value == 0 {
        return 1;
    }
    value.min(max.max(1) as u64) as u32
}

/// Sequential configuration dialog:
/// `Idle -> CountPrompt -> GridPrompt(0..n) -> Idle`.
#[derive(Debug, Default)]
pub struct Wizard {
    state: WizardState,
    limits: WizardLimits,
    logger: Option<Logger>,
}

impl Wizard {
    pub fn new(limits: WizardLimits) -> Self {
        Self {
            state: WizardState::Idle,
            limits,
            logger: None,
        }
    }

    /// Wizard bounded by the configured limits, logging through the
    /// configured logger if there is one.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            state: WizardState::Idle,
            limits: config.wizard,
            logger: config.logger.clone(),
        }
    }

    pub fn limits(&self) -> WizardLimits {
        self.limits
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, WizardState::Idle)
    }

    /// Open the count prompt with a default of one section. Any flow already
    /// in progress is discarded.
    pub fn start(&mut self) {
        self.state = WizardState::CountPrompt { count: 1 };
        self.log(LogLevel::Info, "wizard_started", []);
    }

    /// Update the section count from raw input, returning the coerced value.
    pub fn set_count(&mut self, input: &str) -> Result<u32, WizardError> {
        let max = self.limits.max_sections;
        match &mut self.state {
            WizardState::CountPrompt { count } => {
                *count = coerce_positive(input, max);
                Ok(*count)
            }
            other => Err(unexpected("count", other)),
        }
    }

    pub fn submit_count(&mut self) -> Result<WizardStep, WizardError> {
        let count = match &self.state {
            WizardState::CountPrompt { count } => (*count).clamp(1, self.limits.max_sections.max(1)),
            other => return Err(unexpected("count", other)),
        };

        let total = count as usize;
        self.state = WizardState::GridPrompt {
            configs: vec![GridShape::default(); total],
            cursor: 0,
        };
        self.log(
            LogLevel::Debug,
            "wizard_advanced",
            [json_kv("sections", json!(total)), json_kv("cursor", json!(0))],
        );
        Ok(WizardStep::GridPrompt { index: 0, total })
    }

    pub fn set_rows(&mut self, input: &str) -> Result<u32, WizardError> {
        let value = coerce_positive(input, self.limits.max_dimension);
        self.current_shape_mut()?.rows = value;
        Ok(value)
    }

    pub fn set_cols(&mut self, input: &str) -> Result<u32, WizardError> {
        let value = coerce_positive(input, self.limits.max_dimension);
        self.current_shape_mut()?.cols = value;
        Ok(value)
    }

    /// The shape being edited in the current grid prompt.
    pub fn current_shape(&self) -> Option<GridShape> {
        match &self.state {
            WizardState::GridPrompt { configs, cursor } => configs.get(*cursor).copied(),
            _ => None,
        }
    }

    /// Advance to the next section, or on the last one hand the generated
    /// markup to `sink` and return to idle.
    pub fn submit_grid(&mut self, sink: &mut dyn ContentSink) -> Result<WizardStep, WizardError> {
        let (total, cursor) = match &mut self.state {
            WizardState::GridPrompt { configs, cursor } => {
                if *cursor + 1 < configs.len() {
                    *cursor += 1;
                    (configs.len(), Some(*cursor))
                } else {
                    (configs.len(), None)
                }
            }
            other => return Err(unexpected("grid", other)),
        };

        if let Some(index) = cursor {
            self.log(
                LogLevel::Debug,
                "wizard_advanced",
                [json_kv("sections", json!(total)), json_kv("cursor", json!(index))],
            );
            return Ok(WizardStep::GridPrompt { index, total });
        }

        let WizardState::GridPrompt { configs, .. } = std::mem::take(&mut self.state) else {
            return Err(WizardError::NotActive);
        };
        let content = generate_content(&configs);
        self.log(
            LogLevel::Info,
            "wizard_finished",
            [
                json_kv("sections", json!(configs.len())),
                json_kv("bytes", json!(content.len())),
            ],
        );
        sink.set_value(content);
        Ok(WizardStep::Finished {
            sections: configs.len(),
        })
    }

    /// Close whichever dialog is open and discard everything collected.
    /// Returns `false` when the wizard was already idle.
    pub fn cancel(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let from = self.state.label();
        self.state = WizardState::Idle;
        self.log(LogLevel::Info, "wizard_cancelled", [json_kv("from", json!(from))]);
        true
    }

    fn current_shape_mut(&mut self) -> Result<&mut GridShape, WizardError> {
        match &mut self.state {
            WizardState::GridPrompt { configs, cursor } => {
                configs.get_mut(*cursor).ok_or(WizardError::NotActive)
            }
            other => Err(unexpected("grid", other)),
        }
    }

    fn log<const N: usize>(&self, level: LogLevel, message: &str, fields: [(String, serde_json::Value); N]) {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

fn unexpected(expected: &'static str, state: &WizardState) -> WizardError {
    match state {
        WizardState::Idle => WizardError::NotActive,
        other => WizardError::UnexpectedStep {
            expected,
            actual: other.label(),
        },
    }
}
