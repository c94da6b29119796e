// Centralized caps to harden against untrusted input (form values, pasted text, snapshots)

// Lattice construction
pub const MAX_WIDTH: u32 = 512;
pub const MAX_HEIGHT: u32 = 512;
pub const MAX_NAME_LENGTH: usize = 12;

// Snapshot caps
pub const MAX_QUBITS: usize = MAX_WIDTH as usize * MAX_HEIGHT as usize;
pub const MAX_COUPLERS: usize = 2 * MAX_QUBITS;
pub const MAX_ATTRIBUTE_LEN: usize = 64 * 1024;

// Literal import
pub const MAX_IMPORT_LEN: usize = 4 * 1024 * 1024;
pub const MAX_LITERAL_DEPTH: usize = 32;

#[inline]
pub fn in_size_bounds(width: u32, height: u32) -> bool {
    width > 0 && height > 0 && width <= MAX_WIDTH && height <= MAX_HEIGHT
}
