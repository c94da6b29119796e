use crate::geometry::math::{dist_sq, seg_distance_sq};
use crate::model::ElementKind;
use crate::{Chip, Pick};

/// Which element kinds a pick may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickFilter {
    pub qubits: bool,
    pub couplers: bool,
}

impl PickFilter {
    pub const ALL: PickFilter = PickFilter { qubits: true, couplers: true };

    pub fn only(kind: ElementKind) -> Self {
        PickFilter { qubits: kind == ElementKind::Qubit, couplers: kind == ElementKind::Coupler }
    }
}

/// Hit radii in lattice units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickTolerance {
    pub qubit: f32,
    pub coupler: f32,
}

impl Default for PickTolerance {
    fn default() -> Self {
        use crate::geometry::tolerance::{COUPLER_HIT_TOL, QUBIT_HIT_RADIUS};
        PickTolerance { qubit: QUBIT_HIT_RADIUS, coupler: COUPLER_HIT_TOL }
    }
}

pub fn pick_impl(chip: &Chip, x: f32, y: f32, filter: PickFilter, tol: PickTolerance) -> Option<Pick> {
    // Qubits first: they are drawn on top of couplers.
    if filter.qubits {
        let tol2 = tol.qubit * tol.qubit;
        let mut best: Option<(u32, f32)> = None;
        for q in &chip.qubits {
            let d2 = dist_sq(q.x as f32, q.y as f32, x, y);
            if d2 < tol2 && best.map_or(true, |(_, bd)| d2 < bd) {
                best = Some((q.id, d2));
            }
        }
        if let Some((id, d2)) = best {
            return Some(Pick::Qubit { id, dist: d2.sqrt() });
        }
    }
    if filter.couplers {
        let tol2 = tol.coupler * tol.coupler;
        let mut best: Option<(u32, u32, f32, f32)> = None;
        for c in &chip.couplers {
            let (Some(qa), Some(qb)) = (chip.qubit(c.a), chip.qubit(c.b)) else { continue };
            let (d2, t) = seg_distance_sq(x, y, qa.x as f32, qa.y as f32, qb.x as f32, qb.y as f32);
            if d2 < tol2 && best.map_or(true, |(_, _, bd, _)| d2 < bd) {
                best = Some((c.a, c.b, d2, t));
            }
        }
        if let Some((a, b, d2, t)) = best {
            return Some(Pick::Coupler { a, b, t, dist: d2.sqrt() });
        }
    }
    None
}
