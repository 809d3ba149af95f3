//! Suppression engine - pinning units down under fire
//!
//! Suppression is a timed per-unit effect whose strength gates which actions
//! the unit may still attempt. Two duration models exist and are never
//! merged: the basic engine uses wall-clock ticks scaled by suppressor
//! skill, the advanced variant uses a configured turn count decremented at
//! each turn boundary.

use std::sync::Arc;

use rand::Rng;

use crate::action::ActionType;
use crate::constants::{
    ADV_BAND_CLOSE, ADV_BAND_EXTREME, ADV_BAND_FAR, ADV_BAND_MID, ADV_SUPPRESSION_BASE_CHANCE,
    SUPPRESSION_BASE_CHANCE, SUPPRESSION_BASE_DURATION, SUPPRESSION_CHANCE_MAX,
    SUPPRESSION_CHANCE_MIN, SUPPRESSION_CLOSE_RANGE_BONUS, SUPPRESSION_COVER_PENALTY,
    SUPPRESSION_DURATION_PER_SKILL, SUPPRESSION_LONG_RANGE_PENALTY, SUPPRESSION_SKILL_FACTOR,
    SUPPRESSION_STRENGTH_BASE, SUPPRESSION_STRENGTH_SKILL_FACTOR, SUPPRESSION_WEAPON_BONUS,
};
use crate::core::config::TacticalConfig;
use crate::core::types::{EffectId, Tick, UnitId};
use crate::effects::{EffectStore, EffectTimer, SuppressionEffect};
use crate::unit::Combatant;

/// Which lifetime strategy newly created effects use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationModel {
    /// Wall-clock ticks: 15000 + skill * 1000
    WallClock,
    /// Configured turn count, decremented once per turn update
    TurnCounted,
}

pub struct SuppressionEngine {
    store: Arc<EffectStore<SuppressionEffect>>,
    config: Arc<TacticalConfig>,
    model: DurationModel,
}

impl SuppressionEngine {
    pub fn new(
        store: Arc<EffectStore<SuppressionEffect>>,
        config: Arc<TacticalConfig>,
        model: DurationModel,
    ) -> Self {
        Self {
            store,
            config,
            model,
        }
    }

    pub fn store(&self) -> &EffectStore<SuppressionEffect> {
        &self.store
    }

    /// Pin the target down; replaces any prior suppression on it
    ///
    /// Strength scales with the suppressor's weapon bonus and skill, clamped
    /// to [0, 1]. Also raises the target's mirrored `suppressed` flag and
    /// emits the stateless visual cue.
    pub fn apply_suppression(
        &self,
        target: &mut Combatant,
        suppressor: &Combatant,
        now: Tick,
    ) -> EffectId {
        let strength = (SUPPRESSION_STRENGTH_BASE
            + suppressor.weapon_bonus
            + suppressor.skill * SUPPRESSION_STRENGTH_SKILL_FACTOR)
            .clamp(0.0, 1.0);

        let timer = match self.model {
            DurationModel::WallClock => EffectTimer::WallClock {
                duration: SUPPRESSION_BASE_DURATION
                    + (suppressor.skill * SUPPRESSION_DURATION_PER_SKILL as f32) as Tick,
            },
            DurationModel::TurnCounted => EffectTimer::Turns {
                remaining: self.config.suppression_turns(),
            },
        };

        let effect = SuppressionEffect::new(target.id, suppressor.id, now, timer, strength);
        let id = effect.id;
        let replaced = self.store.insert(target.id, effect);
        target.suppressed = true;

        tracing::debug!(
            target_unit = %target.name,
            suppressor = %suppressor.name,
            strength,
            replaced = replaced.is_some(),
            "suppression applied (visual cue)"
        );
        id
    }

    /// True iff an active, non-expired suppression effect exists
    pub fn is_suppressed(&self, unit: &Combatant, now: Tick) -> bool {
        self.store
            .get(unit.id)
            .map(|e| !e.is_expired(now))
            .unwrap_or(false)
    }

    /// Drop suppression from the unit and clear its mirrored flag
    pub fn remove_suppression(&self, unit: &mut Combatant) {
        if self.store.remove(unit.id).is_some() {
            tracing::debug!(target_unit = %unit.name, "suppression removed (visual cue)");
        }
        unit.suppressed = false;
    }

    /// Per-turn expiry sweep
    ///
    /// Turn-counted timers are decremented first, then every expired effect
    /// is deactivated and removed in one atomic pass. Returns the unit ids
    /// whose effects expired so the caller can clear mirrored flags.
    pub fn update_suppression(&self, now: Tick) -> Vec<UnitId> {
        let model = self.model;
        let expired = self.store.sweep(|effect| {
            if model == DurationModel::TurnCounted {
                effect.timer.advance_turn();
            }
            if effect.is_expired(now) {
                effect.active = false;
                true
            } else {
                false
            }
        });
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "suppression effects expired");
        }
        expired
    }

    /// Chance that an attack suppresses the target (additive model)
    pub fn calculate_suppression_chance(&self, attacker: &Combatant, target: &Combatant) -> f32 {
        let mut chance = SUPPRESSION_BASE_CHANCE;

        if attacker.has_suppression_weapon {
            chance += SUPPRESSION_WEAPON_BONUS;
        }

        let distance = attacker.position.distance(&target.position);
        if distance <= 3 {
            chance += SUPPRESSION_CLOSE_RANGE_BONUS;
        } else if distance > 8 {
            chance -= SUPPRESSION_LONG_RANGE_PENALTY;
        }

        if target.has_cover {
            chance -= SUPPRESSION_COVER_PENALTY;
        }

        chance += attacker.skill * SUPPRESSION_SKILL_FACTOR;

        chance.clamp(SUPPRESSION_CHANCE_MIN, SUPPRESSION_CHANCE_MAX)
    }

    /// Can the unit still perform this action under its current suppression?
    ///
    /// Unsuppressed units always may. Otherwise the effect strength must be
    /// below the action's threshold; action types without a threshold are
    /// always permitted.
    pub fn can_perform_action(&self, unit: &Combatant, action: ActionType, now: Tick) -> bool {
        let effect = match self.store.get(unit.id) {
            Some(e) if !e.is_expired(now) => e,
            _ => return true,
        };

        match action.suppression_threshold() {
            Some(threshold) => effect.strength < threshold,
            None => true,
        }
    }

    /// Willpower roll to shake off suppression
    pub fn attempt_suppression_break(&self, unit: &mut Combatant, rng: &mut impl Rng) -> bool {
        if !self.store.contains(unit.id) {
            return false;
        }

        if rng.gen::<f64>() < self.config.suppression_break_chance() {
            self.remove_suppression(unit);
            tracing::debug!(target_unit = %unit.name, "suppression broken by willpower");
            return true;
        }
        false
    }

    /// Movement-point reduction while suppressed, zero otherwise
    pub fn movement_penalty(&self, unit: &Combatant, now: Tick) -> u32 {
        if self.is_suppressed(unit, now) {
            self.config.suppression_movement_penalty()
        } else {
            0
        }
    }
}

/// Advanced suppression variant
///
/// Owns one base engine by composition and mutates it across calls; it is
/// never rebuilt per call. Differs from the base engine in its chance
/// formula (multiplicative with range bands) and its turn-counted effect
/// lifetime.
pub struct AdvancedSuppressionEngine {
    base: SuppressionEngine,
}

impl AdvancedSuppressionEngine {
    pub fn new(store: Arc<EffectStore<SuppressionEffect>>, config: Arc<TacticalConfig>) -> Self {
        Self {
            base: SuppressionEngine::new(store, config, DurationModel::TurnCounted),
        }
    }

    /// The owned base engine; all lifecycle operations delegate to it
    pub fn base(&self) -> &SuppressionEngine {
        &self.base
    }

    pub fn apply_suppression(
        &self,
        target: &mut Combatant,
        suppressor: &Combatant,
        now: Tick,
    ) -> EffectId {
        self.base.apply_suppression(target, suppressor, now)
    }

    /// Multiplicative chance model: base * skill scale * range band
    pub fn calculate_suppression_chance(&self, attacker: &Combatant, target: &Combatant) -> f32 {
        let distance = attacker.position.distance(&target.position);
        let band = if distance <= 3 {
            ADV_BAND_CLOSE
        } else if distance <= 6 {
            ADV_BAND_MID
        } else if distance <= 10 {
            ADV_BAND_FAR
        } else {
            ADV_BAND_EXTREME
        };

        (ADV_SUPPRESSION_BASE_CHANCE * (1.0 + attacker.skill / 100.0) * band)
            .clamp(SUPPRESSION_CHANCE_MIN, SUPPRESSION_CHANCE_MAX)
    }

    /// Decrement all turn-counted effects and expire those at <= 1 remaining
    pub fn update_suppression(&self, now: Tick) -> Vec<UnitId> {
        self.base.update_suppression(now)
    }
}

/// Suppression model selected when the service is composed
///
/// A tagged variant rather than ad hoc subclassing; both delegate queries to
/// the engine that owns the shared store.
pub enum SuppressionStrategy {
    Basic(SuppressionEngine),
    Advanced(AdvancedSuppressionEngine),
}

impl SuppressionStrategy {
    pub fn engine(&self) -> &SuppressionEngine {
        match self {
            SuppressionStrategy::Basic(engine) => engine,
            SuppressionStrategy::Advanced(advanced) => advanced.base(),
        }
    }

    pub fn apply_suppression(
        &self,
        target: &mut Combatant,
        suppressor: &Combatant,
        now: Tick,
    ) -> EffectId {
        self.engine().apply_suppression(target, suppressor, now)
    }

    pub fn calculate_suppression_chance(&self, attacker: &Combatant, target: &Combatant) -> f32 {
        match self {
            SuppressionStrategy::Basic(engine) => {
                engine.calculate_suppression_chance(attacker, target)
            }
            SuppressionStrategy::Advanced(advanced) => {
                advanced.calculate_suppression_chance(attacker, target)
            }
        }
    }

    pub fn update_suppression(&self, now: Tick) -> Vec<UnitId> {
        self.engine().update_suppression(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine(model: DurationModel) -> SuppressionEngine {
        SuppressionEngine::new(
            Arc::new(EffectStore::new()),
            Arc::new(TacticalConfig::new()),
            model,
        )
    }

    fn combatant(name: &str, x: i32, y: i32) -> Combatant {
        Combatant::new(name, GridPos::new(x, y))
    }

    #[test]
    fn test_apply_sets_strength_and_duration_from_skill() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let mut suppressor = combatant("mg team", 5, 0);
        suppressor.skill = 4.0;
        suppressor.weapon_bonus = 0.1;

        engine.apply_suppression(&mut target, &suppressor, 0);

        let effect = engine.store().get(target.id).unwrap();
        // 0.5 + 0.1 + 4 * 0.1 = 1.0 exactly at the clamp
        assert_eq!(effect.strength, 1.0);
        assert_eq!(
            effect.timer,
            EffectTimer::WallClock { duration: 19_000 }
        );
        assert!(target.suppressed);
    }

    #[test]
    fn test_full_strength_blocks_grenade() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let mut suppressor = combatant("mg team", 5, 0);
        suppressor.skill = 4.0;
        suppressor.weapon_bonus = 0.1;

        engine.apply_suppression(&mut target, &suppressor, 0);

        // strength 1.0 is not < 0.2
        assert!(!engine.can_perform_action(&target, ActionType::Grenade, 100));
        // 1.0 is not < 0.9 either, but unknown actions pass
        assert!(!engine.can_perform_action(&target, ActionType::Defend, 100));
        assert!(engine.can_perform_action(&target, ActionType::Other, 100));
    }

    #[test]
    fn test_unsuppressed_unit_can_do_anything() {
        let engine = engine(DurationModel::WallClock);
        let target = combatant("target", 0, 0);
        assert!(engine.can_perform_action(&target, ActionType::Dash, 0));
        assert!(engine.can_perform_action(&target, ActionType::Grenade, 0));
    }

    #[test]
    fn test_reapply_replaces_prior_effect() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let weak = combatant("rifleman", 2, 0);
        let mut strong = combatant("mg team", 2, 0);
        strong.skill = 3.0;

        engine.apply_suppression(&mut target, &weak, 0);
        engine.apply_suppression(&mut target, &strong, 10);

        assert_eq!(engine.store().len(), 1);
        let effect = engine.store().get(target.id).unwrap();
        assert_eq!(effect.suppressor, strong.id);
        assert_eq!(effect.created_at, 10);
    }

    #[test]
    fn test_not_suppressed_after_removal() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);

        engine.apply_suppression(&mut target, &suppressor, 0);
        assert!(engine.is_suppressed(&target, 1));

        engine.remove_suppression(&mut target);
        assert!(!engine.is_suppressed(&target, 1));
        assert!(!target.suppressed);
    }

    #[test]
    fn test_sweep_expires_past_duration() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);

        engine.apply_suppression(&mut target, &suppressor, 0);
        // duration = 15000 with zero skill

        assert!(engine.update_suppression(15_000).is_empty());
        assert!(engine.is_suppressed(&target, 15_000));

        let expired = engine.update_suppression(15_001);
        assert_eq!(expired, vec![target.id]);
        assert!(!engine.is_suppressed(&target, 15_001));
    }

    #[test]
    fn test_chance_scenario_clamped_high() {
        let engine = engine(DurationModel::WallClock);
        let mut attacker = combatant("mg team", 0, 0);
        attacker.has_suppression_weapon = true;
        attacker.skill = 3.0;
        let target = combatant("target", 2, 0);

        // 0.60 + 0.20 + 0.10 + 0 + 0.15 = 1.05, clamped to 0.95
        let chance = engine.calculate_suppression_chance(&attacker, &target);
        assert!((chance - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_chance_long_range_and_cover_penalties() {
        let engine = engine(DurationModel::WallClock);
        let attacker = combatant("rifleman", 0, 0);
        let mut target = combatant("target", 9, 0);
        target.has_cover = true;

        // 0.60 - 0.20 - 0.15 = 0.25
        let chance = engine.calculate_suppression_chance(&attacker, &target);
        assert!((chance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_break_attempt_deterministic_with_seed() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);
        engine.apply_suppression(&mut target, &suppressor, 0);

        let mut rng = StdRng::seed_from_u64(42);
        let mut attempts = 0;
        while !engine.attempt_suppression_break(&mut target, &mut rng) {
            attempts += 1;
            assert!(attempts < 1_000, "break chance 0.30 should succeed eventually");
        }
        assert!(!engine.is_suppressed(&target, 0));

        // No effect left: further attempts always fail
        assert!(!engine.attempt_suppression_break(&mut target, &mut rng));
    }

    #[test]
    fn test_movement_penalty_only_while_suppressed() {
        let engine = engine(DurationModel::WallClock);
        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);

        assert_eq!(engine.movement_penalty(&target, 0), 0);
        engine.apply_suppression(&mut target, &suppressor, 0);
        assert_eq!(engine.movement_penalty(&target, 0), 50);
    }

    #[test]
    fn test_advanced_turn_counted_lifetime() {
        let store = Arc::new(EffectStore::new());
        let advanced = AdvancedSuppressionEngine::new(store, Arc::new(TacticalConfig::new()));
        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);

        advanced.apply_suppression(&mut target, &suppressor, 0);
        assert!(advanced.base().is_suppressed(&target, 0));

        // Default 2 turns: first update drops remaining to 1, which expires
        let expired = advanced.update_suppression(0);
        assert_eq!(expired, vec![target.id]);
        assert!(!advanced.base().is_suppressed(&target, 0));
    }

    #[test]
    fn test_advanced_chance_band_multipliers() {
        let store = Arc::new(EffectStore::new());
        let advanced = AdvancedSuppressionEngine::new(store, Arc::new(TacticalConfig::new()));
        let attacker = combatant("mg team", 0, 0);

        // 0.70 * 1.0 * 1.2 = 0.84 at close range
        let close = advanced.calculate_suppression_chance(&attacker, &combatant("a", 3, 0));
        assert!((close - 0.84).abs() < 1e-6);

        // 0.70 * 1.0 * 0.6 = 0.42 at extreme range
        let extreme = advanced.calculate_suppression_chance(&attacker, &combatant("b", 14, 0));
        assert!((extreme - 0.42).abs() < 1e-6);
    }

    #[test]
    fn test_strategy_variants_share_lifecycle() {
        let store = Arc::new(EffectStore::new());
        let config = Arc::new(TacticalConfig::new());
        let strategy = SuppressionStrategy::Advanced(AdvancedSuppressionEngine::new(
            Arc::clone(&store),
            config,
        ));

        let mut target = combatant("target", 0, 0);
        let suppressor = combatant("mg team", 2, 0);
        strategy.apply_suppression(&mut target, &suppressor, 0);

        assert!(strategy.engine().is_suppressed(&target, 0));
        assert_eq!(strategy.update_suppression(0), vec![target.id]);
    }

    proptest! {
        #[test]
        fn prop_basic_chance_always_in_bounds(
            ax in -20i32..20, ay in -20i32..20,
            tx in -20i32..20, ty in -20i32..20,
            skill in -5.0f32..15.0,
            weapon in proptest::bool::ANY,
            cover in proptest::bool::ANY,
        ) {
            let engine = engine(DurationModel::WallClock);
            let mut attacker = combatant("attacker", ax, ay);
            attacker.skill = skill;
            attacker.has_suppression_weapon = weapon;
            let mut target = combatant("target", tx, ty);
            target.has_cover = cover;

            let chance = engine.calculate_suppression_chance(&attacker, &target);
            prop_assert!((SUPPRESSION_CHANCE_MIN..=SUPPRESSION_CHANCE_MAX).contains(&chance));
        }

        #[test]
        fn prop_advanced_chance_always_in_bounds(
            distance in 0i32..40,
            skill in -5.0f32..50.0,
        ) {
            let store = Arc::new(EffectStore::new());
            let advanced = AdvancedSuppressionEngine::new(store, Arc::new(TacticalConfig::new()));
            let mut attacker = combatant("attacker", 0, 0);
            attacker.skill = skill;
            let target = combatant("target", distance, 0);

            let chance = advanced.calculate_suppression_chance(&attacker, &target);
            prop_assert!((SUPPRESSION_CHANCE_MIN..=SUPPRESSION_CHANCE_MAX).contains(&chance));
        }
    }
}
