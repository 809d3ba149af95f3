//! Height advantage engine (stateless)
//!
//! Elevation difference between attacker and target scales damage; extreme
//! differences also gate line of sight.

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::LOS_LOW_TO_HIGH_CHANCE;
use crate::core::types::GridPos;

/// Elevation bands, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightLevel {
    #[default]
    Ground,
    Low,
    Elevated,
    High,
}

impl HeightLevel {
    /// Ordinal used for level-difference lookups
    pub fn ordinal(&self) -> i32 {
        match self {
            HeightLevel::Ground => 0,
            HeightLevel::Low => 1,
            HeightLevel::Elevated => 2,
            HeightLevel::High => 3,
        }
    }

    pub fn all() -> [HeightLevel; 4] {
        [
            HeightLevel::Ground,
            HeightLevel::Low,
            HeightLevel::Elevated,
            HeightLevel::High,
        ]
    }
}

/// Elevation lookup per grid position; unmapped positions are ground level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeightMap {
    levels: AHashMap<GridPos, HeightLevel>,
}

impl HeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_level(&mut self, position: GridPos, level: HeightLevel) {
        self.levels.insert(position, level);
    }

    pub fn height_level(&self, position: GridPos) -> HeightLevel {
        self.levels.get(&position).copied().unwrap_or_default()
    }
}

/// Damage multiplier for attacking from `attacker` level onto `target` level
///
/// Keyed on ordinal difference; anything outside the table is neutral.
pub fn calculate_bonus(attacker: HeightLevel, target: HeightLevel) -> f32 {
    match attacker.ordinal() - target.ordinal() {
        3 => 1.5,
        2 => 1.3,
        1 => 1.1,
        0 => 1.0,
        -1 => 0.9,
        -2 => 0.7,
        -3 => 0.5,
        _ => 1.0,
    }
}

/// Reciprocal of the bonus for the same level pair
pub fn calculate_penalty(attacker: HeightLevel, target: HeightLevel) -> f32 {
    1.0 / calculate_bonus(attacker, target)
}

/// Line of sight across elevation bands
///
/// Ground never sees High; Low sees High 70% of the time; every other pair
/// has clear sight. Consumes the random source once at most.
pub fn has_line_of_sight(from: HeightLevel, to: HeightLevel, rng: &mut impl Rng) -> bool {
    match (from, to) {
        (HeightLevel::Ground, HeightLevel::High) => false,
        (HeightLevel::Low, HeightLevel::High) => rng.gen_bool(LOS_LOW_TO_HIGH_CHANCE),
        _ => true,
    }
}

/// Descriptive entry of the static height-modifier table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeightModifier {
    pub from: HeightLevel,
    pub to: HeightLevel,
    pub multiplier: f32,
    pub description: &'static str,
}

/// Every unequal level pair with its multiplier; read-only for the lifetime
/// of the system
const HEIGHT_MODIFIERS: [HeightModifier; 12] = [
    HeightModifier {
        from: HeightLevel::Low,
        to: HeightLevel::Ground,
        multiplier: 1.1,
        description: "Slight rise over ground level",
    },
    HeightModifier {
        from: HeightLevel::Elevated,
        to: HeightLevel::Ground,
        multiplier: 1.3,
        description: "Commanding position over ground level",
    },
    HeightModifier {
        from: HeightLevel::High,
        to: HeightLevel::Ground,
        multiplier: 1.5,
        description: "Dominant overlook, maximum advantage",
    },
    HeightModifier {
        from: HeightLevel::Elevated,
        to: HeightLevel::Low,
        multiplier: 1.1,
        description: "Shallow advantage over a low rise",
    },
    HeightModifier {
        from: HeightLevel::High,
        to: HeightLevel::Low,
        multiplier: 1.3,
        description: "Strong overlook onto a low rise",
    },
    HeightModifier {
        from: HeightLevel::High,
        to: HeightLevel::Elevated,
        multiplier: 1.1,
        description: "Narrow edge over an elevated position",
    },
    HeightModifier {
        from: HeightLevel::Ground,
        to: HeightLevel::Low,
        multiplier: 0.9,
        description: "Firing up a slight rise",
    },
    HeightModifier {
        from: HeightLevel::Ground,
        to: HeightLevel::Elevated,
        multiplier: 0.7,
        description: "Firing up at a commanding position",
    },
    HeightModifier {
        from: HeightLevel::Ground,
        to: HeightLevel::High,
        multiplier: 0.5,
        description: "Firing up a dominant overlook, maximum penalty",
    },
    HeightModifier {
        from: HeightLevel::Low,
        to: HeightLevel::Elevated,
        multiplier: 0.9,
        description: "Firing up from a low rise",
    },
    HeightModifier {
        from: HeightLevel::Low,
        to: HeightLevel::High,
        multiplier: 0.7,
        description: "Firing well uphill from a low rise",
    },
    HeightModifier {
        from: HeightLevel::Elevated,
        to: HeightLevel::High,
        multiplier: 0.9,
        description: "Firing up at the high ground",
    },
];

/// The full descriptive table, unchanged for the system's lifetime
pub fn height_modifiers() -> &'static [HeightModifier; 12] {
    &HEIGHT_MODIFIERS
}
