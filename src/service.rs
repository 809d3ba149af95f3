//! Tactical modifier service - one explicitly constructed object per battle
//!
//! Owns the configuration, both effect stores, the engines, the height map
//! and a seeded RNG. Built once by the turn engine and passed where needed;
//! there is no process-wide singleton. The same seed replays the same
//! probabilistic outcomes.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::action::CombatAction;
use crate::compositor::apply_modifiers;
use crate::concealment::ConcealmentEngine;
use crate::core::config::TacticalConfig;
use crate::core::error::Result;
use crate::core::types::{GridPos, Tick, UnitId};
use crate::effects::EffectStore;
use crate::elevation::{self, HeightMap};
use crate::flanking;
use crate::suppression::{
    AdvancedSuppressionEngine, DurationModel, SuppressionEngine, SuppressionStrategy,
};
use crate::unit::Combatant;

/// Which suppression implementation the service composes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionVariant {
    /// Wall-clock durations, additive chance model
    #[default]
    Basic,
    /// Turn-counted durations, multiplicative chance model
    Advanced,
}

/// Unit ids whose effects expired during a turn-boundary sweep
///
/// The caller owns the roster and clears the mirrored flags.
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub suppression_expired: Vec<UnitId>,
    pub concealment_expired: Vec<UnitId>,
}

pub struct TacticalModifiers {
    config: Arc<TacticalConfig>,
    suppression: SuppressionStrategy,
    concealment: ConcealmentEngine,
    heights: HeightMap,
    rng: ChaCha8Rng,
}

impl TacticalModifiers {
    /// Build the service; validates configuration up front
    pub fn new(config: TacticalConfig, variant: SuppressionVariant, seed: u64) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let suppression_store = Arc::new(EffectStore::new());
        let suppression = match variant {
            SuppressionVariant::Basic => SuppressionStrategy::Basic(SuppressionEngine::new(
                suppression_store,
                Arc::clone(&config),
                DurationModel::WallClock,
            )),
            SuppressionVariant::Advanced => SuppressionStrategy::Advanced(
                AdvancedSuppressionEngine::new(suppression_store, Arc::clone(&config)),
            ),
        };

        let concealment =
            ConcealmentEngine::new(Arc::new(EffectStore::new()), Arc::clone(&config));

        Ok(Self {
            config,
            suppression,
            concealment,
            heights: HeightMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &TacticalConfig {
        &self.config
    }

    pub fn suppression(&self) -> &SuppressionStrategy {
        &self.suppression
    }

    pub fn concealment(&self) -> &ConcealmentEngine {
        &self.concealment
    }

    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    pub fn heights_mut(&mut self) -> &mut HeightMap {
        &mut self.heights
    }

    /// Willpower roll against the configured break chance
    pub fn attempt_suppression_break(&mut self, unit: &mut Combatant) -> bool {
        self.suppression
            .engine()
            .attempt_suppression_break(unit, &mut self.rng)
    }

    /// Best reachable flank position, rolled with the service RNG
    pub fn find_flanking_position(
        &mut self,
        attacker: &Combatant,
        target: &Combatant,
    ) -> Option<GridPos> {
        flanking::find_flanking_position(attacker, target, &mut self.rng)
    }

    /// Line of sight between two map positions across elevation bands
    pub fn has_line_of_sight(&mut self, from: GridPos, to: GridPos) -> bool {
        let from_level = self.heights.height_level(from);
        let to_level = self.heights.height_level(to);
        elevation::has_line_of_sight(from_level, to_level, &mut self.rng)
    }

    /// Compose all four engines onto a pending action, in fixed order
    pub fn apply_to_action(
        &self,
        action: &mut CombatAction,
        attacker: &Combatant,
        target: &Combatant,
        now: Tick,
    ) {
        apply_modifiers(
            action,
            attacker,
            target,
            self.suppression.engine(),
            &self.concealment,
            &self.heights,
            &self.config,
            now,
        );
    }

    /// Turn-boundary trigger: run both expiry sweeps
    pub fn on_turn_boundary(&self, now: Tick) -> SweepResult {
        SweepResult {
            suppression_expired: self.suppression.update_suppression(now),
            concealment_expired: self.concealment.update_effects(now),
        }
    }
}
