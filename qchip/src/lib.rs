pub mod model;
pub mod naming;
pub mod literal;
pub mod selection;
pub mod session;
pub mod presets;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod lattice;
    pub mod picking;
}
mod json;

pub use json::PersistError;
pub use model::{ChipConfig, ChipStats, ConfigError, Coupler, Element, ElementKind, Mark, Qubit, GROUP_COUNT};
pub use selection::{ExportStyle, ImportError, ImportReport};
pub use presets::Preset;
pub use session::{Mode, Session};

use algorithms::picking::{PickFilter, PickTolerance};
use geometry::math::{normalize_box, point_in_box};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Pick {
    #[serde(rename = "qubit")]
    Qubit { id: u32, dist: f32 },
    #[serde(rename = "coupler")]
    Coupler { a: u32, b: u32, t: f32, dist: f32 },
}

impl Pick {
    pub fn element(&self) -> Element {
        match *self {
            Pick::Qubit { id, .. } => Element::Qubit(id),
            Pick::Coupler { a, b, .. } => Element::Coupler(a, b),
        }
    }
}

/// A qubit lattice and its editing state. Qubit ids always form the
/// contiguous range `start_index..start_index + len` for generated chips;
/// couplers refer to qubits by id only.
#[derive(Clone, Debug, PartialEq)]
pub struct Chip {
    pub(crate) config: ChipConfig,
    pub(crate) qubits: Vec<Qubit>,
    pub(crate) couplers: Vec<Coupler>,
}

impl Chip {
    pub fn generate(config: &ChipConfig) -> Self {
        algorithms::lattice::generate(config)
    }

    pub fn config(&self) -> &ChipConfig {
        &self.config
    }
    pub fn name_length(&self) -> usize {
        self.config.name_length
    }
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }
    pub fn couplers(&self) -> &[Coupler] {
        &self.couplers
    }

    pub fn qubit(&self, id: u32) -> Option<&Qubit> {
        self.qubit_index(id).map(|i| &self.qubits[i])
    }
    pub fn coupler(&self, a: u32, b: u32) -> Option<&Coupler> {
        self.couplers.iter().find(|c| c.connects(a, b))
    }

    fn qubit_index(&self, id: u32) -> Option<usize> {
        // Dense ids map straight to positions; restored snapshots may not be dense.
        let guess = id.checked_sub(self.config.start_index).map(|d| d as usize);
        if let Some(i) = guess {
            if self.qubits.get(i).map_or(false, |q| q.id == id) {
                return Some(i);
            }
        }
        self.qubits.iter().position(|q| q.id == id)
    }

    fn mark_mut(&mut self, el: Element) -> Option<&mut Mark> {
        match el {
            Element::Qubit(id) => {
                let i = self.qubit_index(id)?;
                Some(&mut self.qubits[i].mark)
            }
            Element::Coupler(a, b) => self.couplers.iter_mut().find(|c| c.connects(a, b)).map(|c| &mut c.mark),
        }
    }

    pub fn mark(&self, el: Element) -> Option<&Mark> {
        match el {
            Element::Qubit(id) => self.qubit(id).map(|q| &q.mark),
            Element::Coupler(a, b) => self.coupler(a, b).map(|c| &c.mark),
        }
    }

    // Naming
    pub fn qubit_name(&self, id: u32) -> String {
        naming::qubit_name(id, self.config.name_length)
    }
    pub fn coupler_name(&self, c: &Coupler) -> String {
        naming::coupler_name(c.a, c.b, self.config.name_length)
    }
    pub fn name_of(&self, el: Element) -> Option<String> {
        match el {
            Element::Qubit(id) => self.qubit(id).map(|q| self.qubit_name(q.id)),
            Element::Coupler(a, b) => self.coupler(a, b).map(|c| self.coupler_name(c)),
        }
    }

    /// Looks a canonical name up among qubits, then couplers.
    pub fn resolve_name(&self, name: &str) -> Option<Element> {
        if let Some(id) = naming::parse_qubit_name(name) {
            if self.qubit(id).map_or(false, |q| self.qubit_name(q.id) == name) {
                return Some(Element::Qubit(id));
            }
        }
        self.couplers
            .iter()
            .find(|c| self.coupler_name(c) == name)
            .map(|c| Element::Coupler(c.a, c.b))
    }

    // Mutators. All of them are no-ops on absent or disabled elements.
    pub fn toggle_disabled(&mut self, el: Element) -> bool {
        match self.mark_mut(el) {
            Some(m) => {
                m.toggle_disabled();
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, el: Element, group: u8, replace_existing: bool) -> bool {
        self.mark_mut(el).map_or(false, |m| m.select(group, replace_existing))
    }

    pub fn set_attribute(&mut self, el: Element, text: Option<&str>) -> bool {
        self.mark_mut(el).map_or(false, |m| m.set_attribute(text))
    }

    pub fn reset(&mut self) {
        self.qubits.iter_mut().for_each(|q| q.mark.reset());
        self.couplers.iter_mut().for_each(|c| c.mark.reset());
    }

    pub fn delete_qubit(&mut self, id: u32) -> bool {
        self.delete_qubits(&[id]) == 1
    }

    /// Removes qubits and their couplers, then shifts every surviving id down
    /// by the number of removed ids below it. Returns how many were removed.
    pub fn delete_qubits(&mut self, ids: &[u32]) -> usize {
        let mut removed: Vec<u32> = ids.iter().copied().filter(|&id| self.qubit_index(id).is_some()).collect();
        removed.sort_unstable();
        removed.dedup();
        if removed.is_empty() {
            return 0;
        }
        let gone = |id: u32| removed.binary_search(&id).is_ok();
        self.qubits.retain(|q| !gone(q.id));
        self.couplers.retain(|c| !gone(c.a) && !gone(c.b));
        let renumber = |id: u32| id - removed.partition_point(|&r| r < id) as u32;
        for q in &mut self.qubits {
            q.id = renumber(q.id);
        }
        for c in &mut self.couplers {
            c.a = renumber(c.a);
            c.b = renumber(c.b);
        }
        log::debug!("deleted qubits {:?}; {} remain", removed, self.qubits.len());
        removed.len()
    }

    /// Selects every element of `kind` with a qubit inside the box (couplers:
    /// either endpoint). Never deselects. Returns how many were selected.
    pub fn select_in_box(&mut self, kind: ElementKind, x0: f32, y0: f32, x1: f32, y1: f32, group: u8) -> usize {
        let (minx, miny, maxx, maxy) = normalize_box(x0, y0, x1, y1);
        let inside = |x: i32, y: i32| point_in_box(x as f32, y as f32, minx, miny, maxx, maxy);
        let hits: Vec<Element> = match kind {
            ElementKind::Qubit => self.qubits.iter().filter(|q| inside(q.x, q.y)).map(|q| Element::Qubit(q.id)).collect(),
            ElementKind::Coupler => self
                .couplers
                .iter()
                .filter(|c| {
                    let hit = |id: u32| self.qubit(id).map_or(false, |q| inside(q.x, q.y));
                    hit(c.a) || hit(c.b)
                })
                .map(|c| Element::Coupler(c.a, c.b))
                .collect(),
        };
        hits.into_iter().filter(|&el| self.select(el, group, true)).count()
    }

    pub fn pick(&self, x: f32, y: f32, filter: PickFilter, tol: PickTolerance) -> Option<Pick> {
        algorithms::picking::pick_impl(self, x, y, filter, tol)
    }

    // Queries
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }
    pub fn num_couplers(&self) -> usize {
        self.couplers.len()
    }
    pub fn num_active_qubits(&self) -> usize {
        self.qubits.iter().filter(|q| !q.mark.disabled).count()
    }
    pub fn num_active_couplers(&self) -> usize {
        self.couplers.iter().filter(|c| !c.mark.disabled).count()
    }
    pub fn num_selected_qubits(&self) -> usize {
        self.qubits.iter().filter(|q| q.mark.is_selected()).count()
    }
    pub fn num_selected_couplers(&self) -> usize {
        self.couplers.iter().filter(|c| c.mark.is_selected()).count()
    }

    pub fn stats(&self) -> ChipStats {
        let active_qubits = self.num_active_qubits();
        let active_couplers = self.num_active_couplers();
        ChipStats {
            qubits: self.num_qubits(),
            couplers: self.num_couplers(),
            active_qubits,
            active_couplers,
            disabled_qubits: self.num_qubits() - active_qubits,
            disabled_couplers: self.num_couplers() - active_couplers,
            selected_qubits: self.num_selected_qubits(),
            selected_couplers: self.num_selected_couplers(),
        }
    }

    /// Mean qubit position, used by renderers to center the lattice.
    pub fn center(&self) -> Option<(f32, f32)> {
        if self.qubits.is_empty() {
            return None;
        }
        let n = self.qubits.len() as f32;
        let sx: f32 = self.qubits.iter().map(|q| q.x as f32).sum();
        let sy: f32 = self.qubits.iter().map(|q| q.y as f32).sum();
        Some((sx / n, sy / n))
    }

    // Selection literal codec
    pub fn export_selection(&self, kind: ElementKind, style: ExportStyle) -> String {
        selection::export(self, kind, style)
    }
    pub fn import_selection(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        selection::import(self, text)
    }

    // Persistence
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
    pub fn from_json_value(v: serde_json::Value) -> Result<Chip, PersistError> {
        json::from_json_impl(v).map_err(|e| {
            log::warn!("rejected chip snapshot: {}", e);
            e
        })
    }
}
