//! Tactical modifier constants - all fixed balance values in one place
//!
//! Values that callers are expected to tune live in `core::config` instead;
//! everything here is part of the combat model itself.

use crate::core::Tick;

// Suppression strength (strength = base + weapon bonus + skill * factor, clamped to [0, 1])
pub const SUPPRESSION_STRENGTH_BASE: f32 = 0.5;
pub const SUPPRESSION_STRENGTH_SKILL_FACTOR: f32 = 0.1;

// Suppression wall-clock duration (ticks)
pub const SUPPRESSION_BASE_DURATION: Tick = 15_000;
pub const SUPPRESSION_DURATION_PER_SKILL: Tick = 1_000;

// Suppression chance (additive terms, clamped to [MIN, MAX])
pub const SUPPRESSION_BASE_CHANCE: f32 = 0.60;
pub const SUPPRESSION_WEAPON_BONUS: f32 = 0.20;
pub const SUPPRESSION_CLOSE_RANGE_BONUS: f32 = 0.10; // distance <= 3
pub const SUPPRESSION_LONG_RANGE_PENALTY: f32 = 0.20; // distance > 8
pub const SUPPRESSION_COVER_PENALTY: f32 = 0.15;
pub const SUPPRESSION_SKILL_FACTOR: f32 = 0.05;
pub const SUPPRESSION_CHANCE_MIN: f32 = 0.10;
pub const SUPPRESSION_CHANCE_MAX: f32 = 0.95;

// Advanced suppression chance (multiplicative: base * skill scale * range band)
pub const ADV_SUPPRESSION_BASE_CHANCE: f32 = 0.70;
pub const ADV_BAND_CLOSE: f32 = 1.2; // distance <= 3
pub const ADV_BAND_MID: f32 = 1.0; // distance <= 6
pub const ADV_BAND_FAR: f32 = 0.8; // distance <= 10
pub const ADV_BAND_EXTREME: f32 = 0.6;

// Concealment
pub const CONCEALMENT_DURATION: Tick = 30;
pub const CONCEALMENT_STRENGTH: f32 = 1.0;
pub const DETECTION_BREAK_THRESHOLD: f32 = 0.80;
pub const DETECTION_COVER_MODIFIER: f32 = 0.7;
pub const DETECTION_LIGHTING_MODIFIER: f32 = 0.8;

// Concealment combat bonus (applied at most once per action)
pub const CONCEALMENT_DAMAGE_MULTIPLIER: f32 = 1.5;
pub const CONCEALMENT_ACCURACY_BONUS: i32 = 25;
pub const CONCEALMENT_CRIT_BONUS: f32 = 0.30;

// Flanking bonus factor (base + trait additions, capped)
pub const FLANKING_BASE_BONUS: f32 = 1.3;
pub const FLANKING_SPECIALIST_BONUS: f32 = 0.2;
pub const FLANKING_WEAPON_BONUS: f32 = 0.1;
pub const FLANKING_BONUS_CAP: f32 = 2.0;

// Flanking action modifiers
pub const FLANKING_DAMAGE_MULTIPLIER: f32 = 1.3;
pub const FLANKING_ACCURACY_BONUS: i32 = 25;
pub const FLANKING_CRIT_BONUS: f32 = 0.25;
pub const FLANKING_MAX_DISTANCE: i32 = 3;

// Flanking position heuristic
pub const FLANK_HEURISTIC_DISTANCE_WEIGHT: f32 = 0.1;
pub const FLANK_HEURISTIC_COVER_BONUS: f32 = 2.0;
pub const FLANK_HEURISTIC_HEIGHT_BONUS: f32 = 1.5;
pub const FLANK_HEURISTIC_ROLL_CHANCE: f64 = 0.5;

// Line of sight across elevation
pub const LOS_LOW_TO_HIGH_CHANCE: f64 = 0.70;
