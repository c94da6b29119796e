//! Editing session: one chip plus the interaction context (mode, active
//! groups, preset) that pointer and keyboard events are interpreted in.

use crate::algorithms::picking::{PickFilter, PickTolerance};
use crate::model::{ChipConfig, ChipStats, ConfigError, ElementKind, GROUP_COUNT};
use crate::presets::Preset;
use crate::selection::{ExportStyle, ImportError, ImportReport};
use crate::{Chip, PersistError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Topology,
    Qubit,
    Coupler,
    QubitAttr,
    CouplerAttr,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Topology, Mode::Qubit, Mode::Coupler, Mode::QubitAttr, Mode::CouplerAttr];

    pub fn next(self) -> Mode {
        let i = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(i + 1) % Mode::ALL.len()]
    }

    pub fn prev(self) -> Mode {
        let i = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(i + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }

    pub fn is_list(self) -> bool {
        matches!(self, Mode::Qubit | Mode::Coupler)
    }

    pub fn is_attr(self) -> bool {
        matches!(self, Mode::QubitAttr | Mode::CouplerAttr)
    }

    /// Element kind a selecting mode works on; `None` for topology editing.
    pub fn kind(self) -> Option<ElementKind> {
        match self {
            Mode::Topology => None,
            Mode::Qubit | Mode::QubitAttr => Some(ElementKind::Qubit),
            Mode::Coupler | Mode::CouplerAttr => Some(ElementKind::Coupler),
        }
    }

    pub fn style(self) -> ExportStyle {
        if self.is_attr() { ExportStyle::Attributes } else { ExportStyle::Groups }
    }

    pub fn selecting(kind: ElementKind, style: ExportStyle) -> Mode {
        match (kind, style) {
            (ElementKind::Qubit, ExportStyle::Groups) => Mode::Qubit,
            (ElementKind::Coupler, ExportStyle::Groups) => Mode::Coupler,
            (ElementKind::Qubit, ExportStyle::Attributes) => Mode::QubitAttr,
            (ElementKind::Coupler, ExportStyle::Attributes) => Mode::CouplerAttr,
        }
    }

    fn pick_filter(self) -> PickFilter {
        self.kind().map_or(PickFilter::ALL, PickFilter::only)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Topology => "Topology",
            Mode::Qubit => "Qubit",
            Mode::Coupler => "Coupler",
            Mode::QubitAttr => "QubitAttr",
            Mode::CouplerAttr => "CouplerAttr",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL.into_iter().find(|m| m.as_str() == s).ok_or_else(|| UnknownMode(s.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    chip: Chip,
    mode: Mode,
    // active group per kind: [qubit, coupler]
    groups: [u8; 2],
    preset: Option<Preset>,
    tolerance: PickTolerance,
    version: u64,
}

fn group_slot(kind: ElementKind) -> usize {
    match kind {
        ElementKind::Qubit => 0,
        ElementKind::Coupler => 1,
    }
}

impl Session {
    pub fn new(chip: Chip) -> Self {
        Session { chip, mode: Mode::Topology, groups: [0; 2], preset: None, tolerance: PickTolerance::default(), version: 1 }
    }

    pub fn from_config(config: &ChipConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Session::new(Chip::generate(config)))
    }

    pub fn from_preset(preset: Preset) -> Self {
        let mut s = Session::new(preset.build());
        s.preset = Some(preset);
        s
    }

    pub fn chip(&self) -> &Chip {
        &self.chip
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn preset(&self) -> Option<Preset> {
        self.preset
    }
    pub fn stats(&self) -> ChipStats {
        self.chip.stats()
    }

    /// Bumped on every state change; collaborators persist when it moves.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Moves the counter past `prev`, for a session that replaces another.
    pub fn continue_from(&mut self, prev: u64) {
        self.version = self.version.max(prev).wrapping_add(1);
    }

    pub fn set_tolerance(&mut self, tolerance: PickTolerance) {
        self.tolerance = tolerance;
    }

    /// Switches mode. Selections are cleared when leaving topology editing or
    /// when crossing between group and attribute modes.
    pub fn set_mode(&mut self, mode: Mode) {
        let prev = self.mode;
        if prev == Mode::Topology || prev.is_attr() != mode.is_attr() {
            self.chip.reset();
        }
        self.mode = mode;
        self.bump();
    }

    pub fn next_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    pub fn prev_mode(&mut self) {
        self.set_mode(self.mode.prev());
    }

    pub fn active_group(&self, kind: ElementKind) -> u8 {
        self.groups[group_slot(kind)]
    }

    /// Sets the group new selections go into; only meaningful in list modes.
    pub fn set_active_group(&mut self, group: u8) -> bool {
        if !self.mode.is_list() || group as usize >= GROUP_COUNT {
            return false;
        }
        let Some(kind) = self.mode.kind() else { return false };
        self.groups[group_slot(kind)] = group;
        self.bump();
        true
    }

    /// Single click at a lattice-space point. In attribute modes `prompt` is
    /// asked for the new value with the element name and current attribute;
    /// `None` means the user cancelled.
    pub fn activate<F>(&mut self, x: f32, y: f32, prompt: F) -> bool
    where
        F: FnOnce(&str, Option<&str>) -> Option<String>,
    {
        let Some(hit) = self.chip.pick(x, y, self.mode.pick_filter(), self.tolerance) else {
            return false;
        };
        let el = hit.element();
        let changed = match self.mode {
            Mode::Topology => self.chip.toggle_disabled(el),
            Mode::Qubit | Mode::Coupler => {
                let group = self.active_group(el.kind());
                self.chip.select(el, group, false)
            }
            Mode::QubitAttr | Mode::CouplerAttr => {
                let Some(mark) = self.chip.mark(el) else { return false };
                if mark.disabled {
                    return false;
                }
                let current = mark.attribute.clone();
                let name = self.chip.name_of(el).unwrap_or_default();
                let answer = prompt(&name, current.as_deref());
                self.chip.set_attribute(el, answer.as_deref())
            }
        };
        if changed {
            self.bump();
        }
        changed
    }

    /// Double click: deletes the qubit under the point in topology mode.
    pub fn double_activate(&mut self, x: f32, y: f32) -> bool {
        if self.mode != Mode::Topology {
            return false;
        }
        let filter = PickFilter::only(ElementKind::Qubit);
        let Some(crate::Pick::Qubit { id, .. }) = self.chip.pick(x, y, filter, self.tolerance) else {
            return false;
        };
        let removed = self.chip.delete_qubit(id);
        if removed {
            self.bump();
        }
        removed
    }

    /// Rubber-band selection in list modes. Corners may come in any order.
    pub fn drag(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> usize {
        let Some(kind) = self.mode.kind().filter(|_| self.mode.is_list()) else {
            return 0;
        };
        let group = self.active_group(kind);
        let hit = self.chip.select_in_box(kind, x0, y0, x1, y1, group);
        if hit > 0 {
            self.bump();
        }
        hit
    }

    pub fn reset_selections(&mut self) {
        self.chip.reset();
        self.bump();
    }

    /// Exports `kind` in the style of the current mode.
    pub fn export(&self, kind: ElementKind) -> String {
        self.chip.export_selection(kind, self.mode.style())
    }

    /// Exports the kind the current mode selects; `None` in topology mode.
    pub fn export_current(&self) -> Option<String> {
        self.mode.kind().map(|k| self.export(k))
    }

    /// Imports a selection literal and switches to the mode it implies.
    pub fn import(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        let report = self.chip.import_selection(text)?;
        self.mode = Mode::selecting(report.kind, report.style);
        self.bump();
        Ok(report)
    }

    pub fn rebuild(&mut self, config: &ChipConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.chip = Chip::generate(config);
        self.preset = None;
        self.bump();
        Ok(())
    }

    pub fn load_preset(&mut self, preset: Preset) {
        self.chip = preset.build();
        self.preset = Some(preset);
        self.bump();
    }

    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "chip": self.chip.to_json_value(),
            "mode": self.mode,
            "preset": self.preset.map_or("NULL", Preset::as_str),
            "groups": self.groups,
        })
    }

    pub fn from_json_value(v: Value) -> Result<Session, PersistError> {
        #[derive(Deserialize)]
        struct Doc {
            chip: Value,
            mode: Mode,
            #[serde(default)]
            preset: Option<String>,
            #[serde(default)]
            groups: [u8; 2],
        }
        let doc: Doc = serde_json::from_value(v)?;
        let chip = Chip::from_json_value(doc.chip)?;
        let preset = match doc.preset.as_deref() {
            None | Some("NULL") => None,
            Some(name) => Some(name.parse::<Preset>()?),
        };
        let groups = doc.groups.map(|g| g.min(GROUP_COUNT as u8 - 1));
        Ok(Session { chip, mode: doc.mode, groups, preset, tolerance: PickTolerance::default(), version: 1 })
    }
}
