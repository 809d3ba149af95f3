//! Tactical configuration with documented defaults
//!
//! Tunables are looked up by dotted key with a default value; a lookup never
//! fails. The config object is constructed explicitly and passed into the
//! service that needs it — there is no process-wide config.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TacticsError};

/// Keyed tunables for the modifier engines
///
/// Defaults are the shipped balance values. Callers override individual keys
/// via [`TacticalConfig::set`] or by deserializing an override map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TacticalConfig {
    /// Per-key overrides; any key not present resolves to its default
    overrides: AHashMap<String, f64>,
}

/// Turn-counted suppression duration (turns)
///
/// Used by the turn-counted duration model. At 2 turns, suppression applied
/// this turn wears off after the next turn boundary.
pub const DEFAULT_SUPPRESSION_TURNS: f64 = 2.0;

/// Chance a suppressed unit shakes off the effect on a willpower roll
pub const DEFAULT_SUPPRESSION_BREAK_CHANCE: f64 = 0.30;

/// Flat accuracy penalty while the attacker is suppressed
pub const DEFAULT_SUPPRESSION_ACCURACY_PENALTY: f64 = 30.0;

/// Movement-point reduction while suppressed
pub const DEFAULT_SUPPRESSION_MOVEMENT_PENALTY: f64 = 50.0;

/// Base per-observer detection chance against a concealed unit
///
/// The full detection chance multiplies this by cover, distance-band and
/// lighting modifiers, so the effective ceiling at stock values is 0.40.
pub const DEFAULT_DETECTION_BASE_CHANCE: f64 = 0.5;

impl TacticalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a tunable, falling back to the supplied default
    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.overrides.get(key).copied().unwrap_or(default)
    }

    /// Override a tunable
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.overrides.insert(key.into(), value);
    }

    // Typed getters for the keys the engines consume.

    pub fn suppression_turns(&self) -> u32 {
        self.get("combat.suppression.duration", DEFAULT_SUPPRESSION_TURNS) as u32
    }

    pub fn suppression_break_chance(&self) -> f64 {
        self.get(
            "combat.suppression.break.chance",
            DEFAULT_SUPPRESSION_BREAK_CHANCE,
        )
    }

    pub fn suppression_accuracy_penalty(&self) -> i32 {
        self.get(
            "combat.suppression.accuracy.penalty",
            DEFAULT_SUPPRESSION_ACCURACY_PENALTY,
        ) as i32
    }

    pub fn suppression_movement_penalty(&self) -> u32 {
        self.get(
            "combat.suppression.movement.penalty",
            DEFAULT_SUPPRESSION_MOVEMENT_PENALTY,
        ) as u32
    }

    pub fn detection_base_chance(&self) -> f64 {
        self.get(
            "combat.concealment.detection.base",
            DEFAULT_DETECTION_BASE_CHANCE,
        )
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let break_chance = self.suppression_break_chance();
        if !(0.0..=1.0).contains(&break_chance) {
            return Err(TacticsError::InvalidConfig(format!(
                "combat.suppression.break.chance ({}) must be within [0, 1]",
                break_chance
            )));
        }

        let detection = self.detection_base_chance();
        if !(0.0..=1.0).contains(&detection) {
            return Err(TacticsError::InvalidConfig(format!(
                "combat.concealment.detection.base ({}) must be within [0, 1]",
                detection
            )));
        }

        if self.suppression_turns() == 0 {
            return Err(TacticsError::InvalidConfig(
                "combat.suppression.duration must be at least 1 turn".into(),
            ));
        }

        Ok(())
    }
}
