//! Combatant state consumed by the modifier engines
//!
//! The turn engine owns the real roster; this is the per-combatant slice the
//! engines read (position, skill, trait flags) and mutate (suppressed flag,
//! concealment status, named status effects).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, UnitId};

/// Concealment status mirrored onto the combatant
///
/// `Broken` is terminal for an episode; a fresh establish re-enters
/// `Concealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcealmentStatus {
    #[default]
    Exposed,
    Concealed,
    Broken,
}

/// A combatant as seen by the modifier engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: UnitId,
    pub name: String,
    pub position: GridPos,

    // Skill attributes
    pub skill: f32,
    pub weapon_bonus: f32,

    // Trait flags (fixed per loadout)
    pub has_suppression_weapon: bool,
    pub has_flanking_weapon: bool,
    pub has_cover: bool,
    pub flanking_specialist: bool,

    // Mutable status
    pub suppressed: bool,
    pub concealment: ConcealmentStatus,
    /// Named status effects with remaining duration in turns
    pub status_effects: AHashMap<String, u32>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, position: GridPos) -> Self {
        Self {
            id: UnitId::new(),
            name: name.into(),
            position,
            skill: 0.0,
            weapon_bonus: 0.0,
            has_suppression_weapon: false,
            has_flanking_weapon: false,
            has_cover: false,
            flanking_specialist: false,
            suppressed: false,
            concealment: ConcealmentStatus::Exposed,
            status_effects: AHashMap::new(),
        }
    }

    /// Apply (or refresh) a named status effect for `turns` turns
    pub fn apply_status_effect(&mut self, name: impl Into<String>, turns: u32) {
        self.status_effects.insert(name.into(), turns);
    }

    pub fn has_status_effect(&self, name: &str) -> bool {
        self.status_effects.contains_key(name)
    }

    /// Decrement all status effects by one turn, dropping expired ones
    pub fn tick_status_effects(&mut self) {
        self.status_effects.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    /// Clear the mirrored suppression flag (after a sweep expires the effect)
    pub fn clear_suppressed(&mut self) {
        self.suppressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_combatant_is_unmarked() {
        let unit = Combatant::new("rifleman", GridPos::new(0, 0));
        assert!(!unit.suppressed);
        assert_eq!(unit.concealment, ConcealmentStatus::Exposed);
        assert!(unit.status_effects.is_empty());
    }

    #[test]
    fn test_status_effect_counts_down_and_expires() {
        let mut unit = Combatant::new("scout", GridPos::new(1, 1));
        unit.apply_status_effect("DETECTED", 2);

        assert!(unit.has_status_effect("DETECTED"));

        unit.tick_status_effects();
        assert!(unit.has_status_effect("DETECTED"));

        unit.tick_status_effects();
        assert!(!unit.has_status_effect("DETECTED"));
    }

    #[test]
    fn test_reapplying_status_effect_refreshes_duration() {
        let mut unit = Combatant::new("scout", GridPos::new(1, 1));
        unit.apply_status_effect("MOVEMENT_PENALTY", 1);
        unit.tick_status_effects();
        assert!(!unit.has_status_effect("MOVEMENT_PENALTY"));

        unit.apply_status_effect("MOVEMENT_PENALTY", 3);
        unit.tick_status_effects();
        assert!(unit.has_status_effect("MOVEMENT_PENALTY"));
    }
}
