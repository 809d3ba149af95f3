//! Combat actions and the per-action-type suppression gate

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;

/// Action categories a combatant can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Move,
    Attack,
    SpecialAbility,
    Overwatch,
    Reload,
    Heal,
    Grenade,
    Defend,
    Dash,
    Hack,
    /// Anything the modifier system has no opinion about
    Other,
}

impl ActionType {
    /// Suppression strength below which this action is still permitted
    ///
    /// A suppressed unit may act iff effect strength < threshold. `Other`
    /// returns `None`: unknown action types are always permitted.
    pub fn suppression_threshold(&self) -> Option<f32> {
        match self {
            ActionType::Move => Some(0.7),
            ActionType::Attack => Some(0.5),
            ActionType::SpecialAbility => Some(0.3),
            ActionType::Overwatch => Some(0.6),
            ActionType::Reload => Some(0.8),
            ActionType::Heal => Some(0.4),
            ActionType::Grenade => Some(0.2),
            ActionType::Defend => Some(0.9),
            ActionType::Dash => Some(0.1),
            ActionType::Hack => Some(0.3),
            ActionType::Other => None,
        }
    }
}

/// A pending combat action, mutated in place by the modifier compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatAction {
    pub attacker: UnitId,
    pub target: UnitId,
    pub damage: u32,
    /// Accuracy in percent; clamped to [0, 100] at the end of composition
    pub accuracy: i32,
    /// Critical chance; clamped to [0.0, 1.0] at the end of composition
    pub crit_chance: f32,
    /// Append-only names of modifiers applied to this action
    pub applied_effects: Vec<String>,
}

impl CombatAction {
    pub fn new(attacker: UnitId, target: UnitId, damage: u32, accuracy: i32) -> Self {
        Self {
            attacker,
            target,
            damage,
            accuracy,
            crit_chance: 0.0,
            applied_effects: Vec::new(),
        }
    }

    /// Record an applied modifier by name
    pub fn tag(&mut self, effect: impl Into<String>) {
        self.applied_effects.push(effect.into());
    }

    pub fn has_tag(&self, effect: &str) -> bool {
        self.applied_effects.iter().any(|e| e == effect)
    }

    /// Final range clamps: accuracy [0, 100], crit chance [0, 1]
    ///
    /// Damage is `u32`, already floored at zero by construction.
    pub fn clamp_ranges(&mut self) {
        self.accuracy = self.accuracy.clamp(0, 100);
        self.crit_chance = self.crit_chance.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_cover_all_known_actions() {
        for action in [
            ActionType::Move,
            ActionType::Attack,
            ActionType::SpecialAbility,
            ActionType::Overwatch,
            ActionType::Reload,
            ActionType::Heal,
            ActionType::Grenade,
            ActionType::Defend,
            ActionType::Dash,
            ActionType::Hack,
        ] {
            let threshold = action.suppression_threshold().unwrap();
            assert!(threshold > 0.0 && threshold <= 1.0);
        }
        assert!(ActionType::Other.suppression_threshold().is_none());
    }

    #[test]
    fn test_dash_is_hardest_under_suppression() {
        let dash = ActionType::Dash.suppression_threshold().unwrap();
        for action in [ActionType::Move, ActionType::Attack, ActionType::Defend] {
            assert!(dash < action.suppression_threshold().unwrap());
        }
    }

    #[test]
    fn test_clamp_ranges() {
        let mut action = CombatAction::new(UnitId::new(), UnitId::new(), 10, 130);
        action.crit_chance = 1.7;
        action.clamp_ranges();
        assert_eq!(action.accuracy, 100);
        assert_eq!(action.crit_chance, 1.0);

        action.accuracy = -15;
        action.crit_chance = -0.5;
        action.clamp_ranges();
        assert_eq!(action.accuracy, 0);
        assert_eq!(action.crit_chance, 0.0);
    }

    #[test]
    fn test_tags_append_only() {
        let mut action = CombatAction::new(UnitId::new(), UnitId::new(), 10, 80);
        action.tag("FLANKING_BONUS");
        action.tag("CONCEALMENT_BONUS");
        assert!(action.has_tag("FLANKING_BONUS"));
        assert_eq!(action.applied_effects.len(), 2);
    }
}
