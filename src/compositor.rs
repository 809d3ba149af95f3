//! Modifier compositor - fixed, non-commutative application order
//!
//! Suppression penalty, then height, then flanking, then concealment. Each
//! stage runs exactly once per action; the order prevents double-counting.
//! Final values are clamped to their legal ranges.

use crate::action::CombatAction;
use crate::concealment::ConcealmentEngine;
use crate::core::config::TacticalConfig;
use crate::core::types::Tick;
use crate::elevation::{calculate_bonus, HeightMap};
use crate::flanking::{apply_flanking_bonuses, is_flanking};
use crate::suppression::SuppressionEngine;
use crate::unit::Combatant;

/// Tag recorded when the suppression accuracy penalty lands
pub const SUPPRESSION_PENALTY_TAG: &str = "SUPPRESSION_PENALTY";
/// Tags recorded for non-neutral elevation
pub const HEIGHT_ADVANTAGE_TAG: &str = "HEIGHT_ADVANTAGE";
pub const HEIGHT_PENALTY_TAG: &str = "HEIGHT_PENALTY";

/// Apply every modifier engine's output onto the pending action
pub fn apply_modifiers(
    action: &mut CombatAction,
    attacker: &Combatant,
    target: &Combatant,
    suppression: &SuppressionEngine,
    concealment: &ConcealmentEngine,
    heights: &HeightMap,
    config: &TacticalConfig,
    now: Tick,
) {
    // 1. Suppressed attackers shoot worse
    if suppression.is_suppressed(attacker, now) {
        action.accuracy -= config.suppression_accuracy_penalty();
        action.tag(SUPPRESSION_PENALTY_TAG);
    }

    // 2. Elevation difference scales damage
    let attacker_level = heights.height_level(attacker.position);
    let target_level = heights.height_level(target.position);
    let height_multiplier = calculate_bonus(attacker_level, target_level);
    if height_multiplier != 1.0 {
        action.damage = (action.damage as f32 * height_multiplier) as u32;
        action.tag(if height_multiplier > 1.0 {
            HEIGHT_ADVANTAGE_TAG
        } else {
            HEIGHT_PENALTY_TAG
        });
    }

    // 3. Flanking geometry
    if is_flanking(attacker.position, target.position) {
        apply_flanking_bonuses(action);
    }

    // 4. Concealed attackers strike from hiding
    concealment.apply_concealment_bonus(attacker, action);

    action.clamp_ranges();

    tracing::trace!(
        attacker = %attacker.name,
        target = %target.name,
        damage = action.damage,
        accuracy = action.accuracy,
        crit = action.crit_chance,
        effects = ?action.applied_effects,
        "modifiers composed"
    );
}
