//! Concealment engine - two-state stealth per unit
//!
//! A concealment episode runs CONCEALED -> BROKEN; broken is terminal until
//! a fresh establish starts a new episode. Breaking dispatches a named
//! status effect keyed on the reason for the break.

use std::sync::Arc;

use crate::action::CombatAction;
use crate::constants::{
    CONCEALMENT_ACCURACY_BONUS, CONCEALMENT_CRIT_BONUS, CONCEALMENT_DAMAGE_MULTIPLIER,
    DETECTION_BREAK_THRESHOLD, DETECTION_COVER_MODIFIER, DETECTION_LIGHTING_MODIFIER,
};
use crate::core::config::TacticalConfig;
use crate::core::types::{GridPos, Tick, UnitId};
use crate::effects::{ConcealmentEffect, ConcealmentState, EffectStore};
use crate::unit::{Combatant, ConcealmentStatus};

/// Why a unit lost concealment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcealmentBreakReason {
    Attack,
    Detected,
    Movement,
    AbilityUse,
    /// Any reason the system has no dedicated handling for
    Other,
}

impl ConcealmentBreakReason {
    /// Status effect applied when breaking for this reason (name, turns)
    pub fn status_effect(&self) -> (&'static str, u32) {
        match self {
            ConcealmentBreakReason::Attack => ("CONCEALMENT_BREAK_PENALTY", 3),
            ConcealmentBreakReason::Detected => ("DETECTED", 2),
            ConcealmentBreakReason::Movement => ("MOVEMENT_PENALTY", 1),
            ConcealmentBreakReason::AbilityUse => ("ABILITY_COOLDOWN", 2),
            ConcealmentBreakReason::Other => ("CONCEALMENT_LOSS", 1),
        }
    }
}

pub struct ConcealmentEngine {
    store: Arc<EffectStore<ConcealmentEffect>>,
    config: Arc<TacticalConfig>,
}

impl ConcealmentEngine {
    pub fn new(store: Arc<EffectStore<ConcealmentEffect>>, config: Arc<TacticalConfig>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &EffectStore<ConcealmentEffect> {
        &self.store
    }

    /// Start a fresh concealment episode at full strength
    pub fn establish_concealment(&self, unit: &mut Combatant, now: Tick) {
        let effect = ConcealmentEffect::new(unit.id, now);
        self.store.insert(unit.id, effect);
        unit.concealment = ConcealmentStatus::Concealed;
        tracing::debug!(target_unit = %unit.name, "concealment established");
    }

    /// True iff a live effect exists and the episode has not broken
    pub fn is_concealed(&self, unit: &Combatant) -> bool {
        self.store
            .get(unit.id)
            .map(|e| e.status == ConcealmentState::Concealed)
            .unwrap_or(false)
    }

    /// End the episode: dispatch the reason's status effect, drop the stored
    /// effect, and mark the unit BROKEN
    pub fn break_concealment(&self, unit: &mut Combatant, reason: ConcealmentBreakReason) {
        let (status_name, turns) = reason.status_effect();
        unit.apply_status_effect(status_name, turns);

        self.store.update(unit.id, |effect| {
            effect.status = ConcealmentState::Broken;
        });
        self.store.remove(unit.id);
        unit.concealment = ConcealmentStatus::Broken;

        tracing::debug!(
            target_unit = %unit.name,
            ?reason,
            status = status_name,
            "concealment broken"
        );
    }

    /// Chance an observer spots the concealed unit
    ///
    /// Multiplier chain: base * cover * distance band * lighting. Never an
    /// error; unknown inputs attenuate toward zero.
    pub fn detection_chance(&self, unit: &Combatant, observer: &Combatant) -> f32 {
        let base = self.config.detection_base_chance() as f32;
        let cover = if unit.has_cover {
            DETECTION_COVER_MODIFIER
        } else {
            1.0
        };
        let distance = observer.position.distance(&unit.position);
        let band = if distance <= 3 {
            1.0
        } else if distance <= 6 {
            0.8
        } else if distance <= 10 {
            0.6
        } else {
            0.4
        };

        base * cover * band * DETECTION_LIGHTING_MODIFIER
    }

    /// Move the unit and re-check detection against an observer
    ///
    /// While concealed, a detection chance above the break threshold ends
    /// the episode with reason `Detected`. Returns true if concealment broke.
    pub fn update_concealment(
        &self,
        unit: &mut Combatant,
        new_position: GridPos,
        observer: &Combatant,
    ) -> bool {
        unit.position = new_position;

        if !self.is_concealed(unit) {
            return false;
        }

        let chance = self.detection_chance(unit, observer);
        if chance > DETECTION_BREAK_THRESHOLD {
            self.break_concealment(unit, ConcealmentBreakReason::Detected);
            return true;
        }
        false
    }

    /// Apply the concealed-attacker bonus to a pending action
    ///
    /// The compositor calls this at most once per action; a non-concealed
    /// attacker leaves the action untouched.
    pub fn apply_concealment_bonus(&self, attacker: &Combatant, action: &mut CombatAction) {
        if !self.is_concealed(attacker) {
            return;
        }

        action.damage = (action.damage as f32 * CONCEALMENT_DAMAGE_MULTIPLIER) as u32;
        action.accuracy += CONCEALMENT_ACCURACY_BONUS;
        action.crit_chance += CONCEALMENT_CRIT_BONUS;
        action.tag("CONCEALMENT_BONUS");
    }

    /// Per-turn expiry sweep for concealment durations
    pub fn update_effects(&self, now: Tick) -> Vec<UnitId> {
        let expired = self.store.sweep(|effect| effect.is_expired(now));
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "concealment effects expired");
        }
        expired
    }
}
