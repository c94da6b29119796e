use crate::geometry::limits;
use serde::{Deserialize, Serialize};

/// Number of selection groups available in list modes.
pub const GROUP_COUNT: usize = 4;

/// Construction parameters of a chip lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipConfig {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "useOriginAsQubit")]
    pub origin_is_qubit: bool,
    #[serde(rename = "qubitStartIdx")]
    pub start_index: u32,
    #[serde(rename = "qubitNameLength")]
    pub name_length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("chip size {width}x{height} out of range (1..={max_w} x 1..={max_h})")]
    Size { width: u32, height: u32, max_w: u32, max_h: u32 },
    #[error("name length {0} exceeds {1}")]
    NameLength(usize, usize),
    #[error("qubit ids starting at {start} overflow for a {width}x{height} lattice")]
    StartIndex { start: u32, width: u32, height: u32 },
}

impl ChipConfig {
    pub fn new(width: u32, height: u32, origin_is_qubit: bool, start_index: u32, name_length: usize) -> Self {
        ChipConfig { width, height, origin_is_qubit, start_index, name_length }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !limits::in_size_bounds(self.width, self.height) {
            return Err(ConfigError::Size {
                width: self.width,
                height: self.height,
                max_w: limits::MAX_WIDTH,
                max_h: limits::MAX_HEIGHT,
            });
        }
        if self.name_length > limits::MAX_NAME_LENGTH {
            return Err(ConfigError::NameLength(self.name_length, limits::MAX_NAME_LENGTH));
        }
        if self.max_start_index().map_or(true, |max| self.start_index > max) {
            return Err(ConfigError::StartIndex { start: self.start_index, width: self.width, height: self.height });
        }
        Ok(())
    }

    /// Largest start index whose ids, plus the generator's next-id counter,
    /// still fit in `u32`.
    pub fn max_start_index(&self) -> Option<u32> {
        self.width.checked_mul(self.height).and_then(|n| u32::MAX.checked_sub(n))
    }
}

/// Per-element editing state shared by qubits and couplers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub disabled: bool,
    pub group: Option<u8>,
    pub attribute: Option<String>,
}

impl Mark {
    pub fn is_selected(&self) -> bool {
        self.group.is_some()
    }

    pub(crate) fn toggle_disabled(&mut self) {
        self.disabled = !self.disabled;
    }

    // A plain click on a selected element deselects it; a drag (replace) never does.
    pub(crate) fn select(&mut self, group: u8, replace: bool) -> bool {
        if self.disabled || group as usize >= GROUP_COUNT {
            return false;
        }
        if !replace && self.is_selected() {
            self.group = None;
        } else {
            self.group = Some(group);
        }
        true
    }

    pub(crate) fn set_attribute(&mut self, text: Option<&str>) -> bool {
        if self.disabled {
            return false;
        }
        match text {
            None => false,
            Some("") => {
                self.reset();
                true
            }
            Some(t) => {
                self.group = Some(0);
                self.attribute = Some(t.to_string());
                true
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.group = None;
        self.attribute = None;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qubit {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub mark: Mark,
}

/// A coupler between two qubits, referenced by id. `a` sits on the lower row
/// for generated couplers; identity is the unordered pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupler {
    pub a: u32,
    pub b: u32,
    pub mark: Mark,
}

impl Coupler {
    pub fn connects(&self, a: u32, b: u32) -> bool {
        (self.a == a && self.b == b) || (self.a == b && self.b == a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Qubit,
    Coupler,
}

/// Addresses one element of a chip by stable id(s).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Qubit(u32),
    Coupler(u32, u32),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Qubit(_) => ElementKind::Qubit,
            Element::Coupler(..) => ElementKind::Coupler,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipStats {
    pub qubits: usize,
    pub couplers: usize,
    pub active_qubits: usize,
    pub active_couplers: usize,
    pub disabled_qubits: usize,
    pub disabled_couplers: usize,
    pub selected_qubits: usize,
    pub selected_couplers: usize,
}
