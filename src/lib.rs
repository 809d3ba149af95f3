//! Fireline - tactical modifier engines for turn-based squad combat
//!
//! Four per-combatant modifier engines (suppression, concealment, flanking,
//! height advantage) plus the compositor that folds their outputs onto a
//! pending combat action in a fixed order. In-process library: no I/O, no
//! wire protocol; the turn engine owns units and drives turn boundaries.

pub mod action;
pub mod compositor;
pub mod concealment;
pub mod constants;
pub mod core;
pub mod effects;
pub mod elevation;
pub mod flanking;
pub mod service;
pub mod suppression;
pub mod unit;

// Re-exports for convenient access
pub use action::{ActionType, CombatAction};
pub use compositor::apply_modifiers;
pub use concealment::{ConcealmentBreakReason, ConcealmentEngine};
pub use crate::core::{GridPos, Result, TacticalConfig, TacticsError, Tick, UnitId};
pub use effects::{
    ConcealmentEffect, ConcealmentState, EffectStore, EffectTimer, SuppressionEffect,
};
pub use elevation::{
    calculate_bonus, calculate_penalty, has_line_of_sight, height_modifiers, HeightLevel,
    HeightMap, HeightModifier,
};
pub use flanking::{
    apply_flanking_bonuses, find_flanking_position, flanking_bonus, flanking_positions,
    is_flanking,
};
pub use service::{SuppressionVariant, SweepResult, TacticalModifiers};
pub use suppression::{
    AdvancedSuppressionEngine, DurationModel, SuppressionEngine, SuppressionStrategy,
};
pub use unit::{Combatant, ConcealmentStatus};
