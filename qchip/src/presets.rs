use crate::model::ChipConfig;
use crate::Chip;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known device layouts: a generated lattice with a fixed set of qubits removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "ZCZ3")]
    Zcz3,
    #[serde(rename = "ZCZ2")]
    Zcz2,
    Sycamore,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Zcz3, Preset::Zcz2, Preset::Sycamore];

    pub fn config(self) -> ChipConfig {
        match self {
            Preset::Zcz3 => ChipConfig::new(8, 15, true, 1, 3),
            Preset::Zcz2 => ChipConfig::new(7, 11, false, 0, 2),
            Preset::Sycamore => ChipConfig::new(7, 9, true, 1, 2),
        }
    }

    pub fn removed_qubits(self) -> &'static [u32] {
        match self {
            Preset::Zcz3 => &[1, 31, 61, 91, 23, 53, 83, 113],
            Preset::Zcz2 => &[12, 25, 38, 51, 64],
            Preset::Sycamore => &[7, 20, 33, 46, 59],
        }
    }

    pub fn build(self) -> Chip {
        let mut chip = Chip::generate(&self.config());
        chip.delete_qubits(self.removed_qubits());
        log::info!("loaded preset {}: {} qubits, {} couplers", self, chip.num_qubits(), chip.num_couplers());
        chip
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Zcz3 => "ZCZ3",
            Preset::Zcz2 => "ZCZ2",
            Preset::Sycamore => "Sycamore",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}'")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_stay_dense() {
        for p in Preset::ALL {
            let chip = p.build();
            let start = p.config().start_index;
            let ids: Vec<u32> = chip.qubits().iter().map(|q| q.id).collect();
            let expected: Vec<u32> = (start..start + ids.len() as u32).collect();
            assert_eq!(ids, expected, "{}", p);
        }
    }

    #[test]
    fn sycamore_qubit_count() {
        let chip = Preset::Sycamore.build();
        // 5 rows of 7 plus 4 rows of 6, minus 5
        assert_eq!(chip.num_qubits(), 35 + 24 - 5);
    }

    #[test]
    fn names_parse() {
        assert_eq!("ZCZ2".parse::<Preset>(), Ok(Preset::Zcz2));
        assert!("NULL".parse::<Preset>().is_err());
    }
}
