use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};

/// A named viewport-width threshold with its grid column count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    /// Smallest viewport width (in pixels) at which this breakpoint applies.
    pub min_width: u32,
    pub columns: u16,
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, min_width: u32, columns: u16) -> Self {
        Self {
            name: name.into(),
            min_width,
            columns,
        }
    }
}

/// Breakpoint change detected between two viewport widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointTransition {
    pub from: String,
    pub to: String,
}

/// Ordered breakpoint table, widest first.
///
/// Invariants enforced at construction:
/// 1. At least one entry.
/// 2. Names are unique.
/// 3. Every entry has at least one column.
/// 4. Entries are sorted descending by `min_width`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self {
            entries: vec![
                Breakpoint::new("lg", 1200, 24),
                Breakpoint::new("md", 996, 20),
                Breakpoint::new("sm", 768, 12),
                Breakpoint::new("xs", 480, 8),
                Breakpoint::new("xxs", 0, 4),
            ],
        }
    }
}

impl TryFrom<Vec<Breakpoint>> for BreakpointTable {
    type Error = PageError;

    fn try_from(entries: Vec<Breakpoint>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.entries
    }
}

impl BreakpointTable {
    pub fn new(mut entries: Vec<Breakpoint>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PageError::InvalidBreakpointTable(
                "at least one breakpoint is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.columns == 0 {
                return Err(PageError::InvalidBreakpointTable(format!(
                    "breakpoint `{}` has zero columns",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(PageError::InvalidBreakpointTable(format!(
                    "duplicate breakpoint `{}`",
                    entry.name
                )));
            }
        }

        entries.sort_by(|a, b| b.min_width.cmp(&a.min_width));
        Ok(Self { entries })
    }

    /// Resolve the active breakpoint for a viewport width.
    ///
    /// Returns the first entry whose `min_width` does not exceed `width`,
    /// falling back to the narrowest entry.
    pub fn resolve(&self, width: u32) -> &Breakpoint {
        self.entries
            .iter()
            .find(|bp| bp.min_width <= width)
            .unwrap_or_else(|| self.narrowest())
    }

    pub fn narrowest(&self) -> &Breakpoint {
        // Construction guarantees a non-empty table.
        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, name: &str) -> Option<&Breakpoint> {
        self.entries.iter().find(|bp| bp.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Breakpoint> {
        self.get(name)
            .ok_or_else(|| PageError::UnknownBreakpoint(name.to_string()))
    }

    pub fn columns_for(&self, name: &str) -> Option<u16> {
        self.get(name).map(|bp| bp.columns)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Other breakpoints ordered by how good a source they are when
    /// synthesizing a layout for `name`: wider ones nearest first, then
    /// narrower ones nearest first.
    pub fn fallback_order(&self, name: &str) -> Vec<&Breakpoint> {
        let Some(idx) = self.entries.iter().position(|bp| bp.name == name) else {
            return Vec::new();
        };
        let wider = self.entries[..idx].iter().rev();
        let narrower = self.entries[idx + 1..].iter();
        wider.chain(narrower).collect()
    }

    /// Report a breakpoint change between two widths, if any.
    pub fn detect_transition(&self, old_width: u32, new_width: u32) -> Option<BreakpointTransition> {
        let from = self.resolve(old_width);
        let to = self.resolve(new_width);
        if from.name != to.name {
            Some(BreakpointTransition {
                from: from.name.clone(),
                to: to.name.clone(),
            })
        } else {
            None
        }
    }
}
