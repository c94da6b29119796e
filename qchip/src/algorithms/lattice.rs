use crate::model::{ChipConfig, Coupler, Mark, Qubit};
use crate::Chip;
use std::collections::HashMap;

/// Row offset for the brick pattern: even rows sit on the origin column when
/// the origin is a qubit, odd rows otherwise.
#[inline]
pub fn row_offset(y: u32, origin_is_qubit: bool) -> i32 {
    let even_row = y % 2 == 0;
    if even_row == origin_is_qubit { 0 } else { 1 }
}

pub fn generate(cfg: &ChipConfig) -> Chip {
    let mut qubits = Vec::new();
    let mut index: HashMap<(i32, i32), u32> = HashMap::new();
    let mut qid = cfg.start_index;
    for y in 0..cfg.height {
        let offset = row_offset(y, cfg.origin_is_qubit);
        let cols = cfg.width.saturating_sub(offset as u32);
        for col in 0..cols {
            let x = col as i32 * 2 + offset;
            let y = y as i32;
            qubits.push(Qubit { id: qid, x, y, mark: Mark::default() });
            index.insert((x, y), qid);
            qid += 1;
        }
    }
    // Only probe the next row so every coupler is emitted once, lower row first.
    let mut couplers = Vec::new();
    for q in &qubits {
        for probe in [(q.x - 1, q.y + 1), (q.x + 1, q.y + 1)] {
            if let Some(&other) = index.get(&probe) {
                couplers.push(Coupler { a: q.id, b: other, mark: Mark::default() });
            }
        }
    }
    log::debug!(
        "generated {}x{} lattice: {} qubits, {} couplers",
        cfg.width,
        cfg.height,
        qubits.len(),
        couplers.len()
    );
    Chip { config: *cfg, qubits, couplers }
}
