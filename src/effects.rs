//! Timed per-unit effects and the shared concurrent store
//!
//! Suppression and concealment both keep at most one live effect per unit.
//! The store allows concurrent readers during single-writer mutation; a
//! reader sees an entry fully present or fully absent, never mid-removal.

use std::sync::{PoisonError, RwLock};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::constants::{CONCEALMENT_DURATION, CONCEALMENT_STRENGTH};
use crate::core::types::{EffectId, Tick, UnitId};

/// Effect lifetime strategy
///
/// Two incompatible duration models coexist for suppression: wall-clock
/// ticks and turn counts. They are distinct strategies selected when an
/// engine is built, never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectTimer {
    /// Expires once elapsed simulation time exceeds `duration`
    WallClock { duration: Tick },
    /// Decrements once per explicit turn update; expired at remaining <= 1
    Turns { remaining: u32 },
}

impl EffectTimer {
    pub fn is_expired(&self, created_at: Tick, now: Tick) -> bool {
        match self {
            EffectTimer::WallClock { duration } => now.saturating_sub(created_at) > *duration,
            EffectTimer::Turns { remaining } => *remaining <= 1,
        }
    }

    /// Advance a turn-counted timer by one turn; wall-clock timers ignore this
    pub fn advance_turn(&mut self) {
        if let EffectTimer::Turns { remaining } = self {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

/// Active suppression on a single unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionEffect {
    pub id: EffectId,
    pub target: UnitId,
    pub suppressor: UnitId,
    pub created_at: Tick,
    pub timer: EffectTimer,
    /// Pin-down intensity in [0, 1]; gates which actions remain possible
    pub strength: f32,
    pub active: bool,
}

impl SuppressionEffect {
    pub fn new(
        target: UnitId,
        suppressor: UnitId,
        created_at: Tick,
        timer: EffectTimer,
        strength: f32,
    ) -> Self {
        Self {
            id: EffectId::new(),
            target,
            suppressor,
            created_at,
            timer,
            strength: strength.clamp(0.0, 1.0),
            active: true,
        }
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        !self.active || self.timer.is_expired(self.created_at, now)
    }
}

/// Concealment episode state carried on the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcealmentState {
    Concealed,
    Broken,
}

/// Active concealment on a single unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcealmentEffect {
    pub id: EffectId,
    pub unit: UnitId,
    pub created_at: Tick,
    pub duration: Tick,
    pub status: ConcealmentState,
    pub strength: f32,
}

impl ConcealmentEffect {
    pub fn new(unit: UnitId, created_at: Tick) -> Self {
        Self {
            id: EffectId::new(),
            unit,
            created_at,
            duration: CONCEALMENT_DURATION,
            status: ConcealmentState::Concealed,
            strength: CONCEALMENT_STRENGTH,
        }
    }

    pub fn is_expired(&self, now: Tick) -> bool {
        now.saturating_sub(self.created_at) > self.duration
    }
}

/// Concurrent keyed map of one live effect per unit
///
/// `RwLock` gives many-readers / one-writer semantics; the per-turn sweep
/// removes entries under the write lock so removal is atomic per entry.
/// Serializing create/replace for the *same* unit id is the caller's
/// responsibility.
#[derive(Debug, Default)]
pub struct EffectStore<E> {
    effects: RwLock<AHashMap<UnitId, E>>,
}

impl<E: Clone> EffectStore<E> {
    pub fn new() -> Self {
        Self {
            effects: RwLock::new(AHashMap::new()),
        }
    }

    /// Insert an effect, replacing (and returning) any prior one for the unit
    pub fn insert(&self, unit: UnitId, effect: E) -> Option<E> {
        self.effects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit, effect)
    }

    pub fn get(&self, unit: UnitId) -> Option<E> {
        self.effects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&unit)
            .cloned()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.effects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&unit)
    }

    pub fn remove(&self, unit: UnitId) -> Option<E> {
        self.effects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&unit)
    }

    /// Mutate the effect for a unit in place, if present
    pub fn update<R>(&self, unit: UnitId, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        self.effects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&unit)
            .map(f)
    }

    /// Remove every effect `expired` flags, returning the affected unit ids
    ///
    /// Runs entirely under the write lock: iteration and removal are a single
    /// atomic pass with respect to readers.
    pub fn sweep(&self, mut expired: impl FnMut(&mut E) -> bool) -> Vec<UnitId> {
        let mut removed = Vec::new();
        self.effects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|unit, effect| {
                if expired(effect) {
                    removed.push(*unit);
                    false
                } else {
                    true
                }
            });
        removed
    }

    pub fn len(&self) -> usize {
        self.effects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
