//! Flanking geometry and bonuses (stateless)
//!
//! Facing is a hardcoded constant (north); it is never derived from actual
//! unit orientation. Flank positions sit perpendicular to that facing at
//! distances 1..=3 on either side of the target.

use rand::Rng;

use crate::action::CombatAction;
use crate::constants::{
    FLANKING_ACCURACY_BONUS, FLANKING_BASE_BONUS, FLANKING_BONUS_CAP, FLANKING_CRIT_BONUS,
    FLANKING_DAMAGE_MULTIPLIER, FLANKING_MAX_DISTANCE, FLANKING_SPECIALIST_BONUS,
    FLANKING_WEAPON_BONUS, FLANK_HEURISTIC_COVER_BONUS, FLANK_HEURISTIC_DISTANCE_WEIGHT,
    FLANK_HEURISTIC_HEIGHT_BONUS, FLANK_HEURISTIC_ROLL_CHANCE,
};
use crate::core::types::GridPos;
use crate::unit::Combatant;

/// Constant facing for all targets
const FACING_NORTH: GridPos = GridPos { x: 0, y: 1 };

/// Offset perpendicular to a facing direction
fn perpendicular(facing: GridPos) -> GridPos {
    GridPos::new(facing.y, -facing.x)
}

/// All flanking positions around a target (full geometric set)
///
/// Left and right of the constant north facing at each distance 1..=3.
pub fn flanking_positions(target: GridPos) -> Vec<GridPos> {
    let side = perpendicular(FACING_NORTH);
    let mut positions = Vec::with_capacity(2 * FLANKING_MAX_DISTANCE as usize);
    for distance in 1..=FLANKING_MAX_DISTANCE {
        positions.push(target + side * distance);
        positions.push(target - side * distance);
    }
    positions
}

/// Is the attacker standing on a flanking position of the target?
pub fn is_flanking(attacker_pos: GridPos, target_pos: GridPos) -> bool {
    flanking_positions(target_pos).contains(&attacker_pos)
}

/// Damage multiplier a flanking attacker earns from traits
pub fn flanking_bonus(attacker: &Combatant) -> f32 {
    let mut bonus = FLANKING_BASE_BONUS;
    if attacker.flanking_specialist {
        bonus += FLANKING_SPECIALIST_BONUS;
    }
    if attacker.has_flanking_weapon {
        bonus += FLANKING_WEAPON_BONUS;
    }
    bonus.min(FLANKING_BONUS_CAP)
}

/// Apply the flat flanking modifiers to a pending action
pub fn apply_flanking_bonuses(action: &mut CombatAction) {
    action.damage = (action.damage as f32 * FLANKING_DAMAGE_MULTIPLIER) as u32;
    action.accuracy = (action.accuracy + FLANKING_ACCURACY_BONUS).min(100);
    action.crit_chance = (action.crit_chance + FLANKING_CRIT_BONUS).min(1.0);
    action.tag("FLANKING_BONUS");
}

/// Pick the most promising flank position to move to
///
/// Scores each reachable (non-negative coordinate) candidate by closeness to
/// the attacker plus probabilistic cover and height bonuses, one roll each
/// per candidate. Ties keep the earliest candidate; no reachable candidate
/// yields `None`.
pub fn find_flanking_position(
    attacker: &Combatant,
    target: &Combatant,
    rng: &mut impl Rng,
) -> Option<GridPos> {
    let candidates: Vec<GridPos> = flanking_positions(target.position)
        .into_iter()
        .filter(GridPos::is_non_negative)
        .collect();

    let mut best: Option<(GridPos, f32)> = None;
    for candidate in candidates {
        let distance = attacker.position.distance(&candidate) as f32;
        let mut value = (10.0 - distance) * FLANK_HEURISTIC_DISTANCE_WEIGHT;
        if rng.gen_bool(FLANK_HEURISTIC_ROLL_CHANCE) {
            value += FLANK_HEURISTIC_COVER_BONUS;
        }
        if rng.gen_bool(FLANK_HEURISTIC_ROLL_CHANCE) {
            value += FLANK_HEURISTIC_HEIGHT_BONUS;
        }

        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((candidate, value)),
        }
    }

    best.map(|(position, _)| position)
}
