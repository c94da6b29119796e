//! Canonical external names.
//!
//! Qubits are `Q` followed by the zero-padded id. Couplers are `G` followed by
//! both endpoint suffixes, the lexicographically larger first, so the name is
//! the same whichever endpoint is stored as `a`.

pub const QUBIT_PREFIX: char = 'Q';
pub const COUPLER_PREFIX: char = 'G';

fn suffix(id: u32, len: usize) -> String {
    format!("{:0>width$}", id, width = len)
}

pub fn qubit_name(id: u32, len: usize) -> String {
    format!("{}{}", QUBIT_PREFIX, suffix(id, len))
}

pub fn coupler_name(a: u32, b: u32, len: usize) -> String {
    let sa = suffix(a, len);
    let sb = suffix(b, len);
    if sa > sb {
        format!("{}{}{}", COUPLER_PREFIX, sa, sb)
    } else {
        format!("{}{}{}", COUPLER_PREFIX, sb, sa)
    }
}

/// Parses `Q<digits>` back into an id. Padding is not checked.
pub fn parse_qubit_name(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(QUBIT_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
