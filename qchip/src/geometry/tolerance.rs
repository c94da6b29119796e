// Hit-test tolerances, in lattice units (one unit = one row step).

/// Qubits are drawn as discs two thirds of the lattice spacing wide.
pub const QUBIT_DIAMETER: f32 = 2.0 / 3.0;
pub const QUBIT_HIT_RADIUS: f32 = QUBIT_DIAMETER / 2.0;
pub const COUPLER_HIT_TOL: f32 = 0.15;

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }
