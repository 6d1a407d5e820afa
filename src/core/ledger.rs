//! Progress Ledger business logic
//!
//! Pure bookkeeping for the eco-garden. Every eco action advances an odometer
//! of badges → seeds → plants → fruits, and eco-points drive the garden level.
//! Storage adapters load the current counters, run them through these
//! functions, and persist the result inside one atomic unit.

use crate::{
    core::money,
    entities::user,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Badges needed to earn a seed.
pub const BADGES_PER_SEED: i32 = 10;
/// Seeds needed to grow a plant.
pub const SEEDS_PER_PLANT: i32 = 3;
/// Plants needed to bear a fruit.
pub const PLANTS_PER_FRUIT: i32 = 3;
/// Eco-points required per garden level (`level * 200` to leave `level`).
pub const POINTS_PER_LEVEL: i32 = 200;
/// Highest reachable garden level; keeps `level * 200` inside `i32`.
pub const MAX_GARDEN_LEVEL: i32 = i32::MAX / POINTS_PER_LEVEL;
/// Eco-points awarded when an organic or local product is added to the cart.
pub const ORGANIC_OR_LOCAL_BONUS: i32 = 10;

/// The four gamification counters of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoProgress {
    /// Badges towards the next seed
    pub eco_badges: i32,
    /// Seeds towards the next plant
    pub seeds: i32,
    /// Plants towards the next fruit
    pub plants: i32,
    /// Fruits harvested
    pub fruits: i32,
}

impl EcoProgress {
    /// Applies one eco action.
    ///
    /// Each tier is checked in order within the same call, so one action can
    /// roll several tiers at once (9/2/2/0 becomes 0/0/0/1).
    #[must_use]
    pub const fn after_eco_action(self) -> Self {
        let mut next = self;
        next.eco_badges += 1;

        if next.eco_badges >= BADGES_PER_SEED {
            next.eco_badges = 0;
            next.seeds += 1;
        }

        if next.seeds >= SEEDS_PER_PLANT {
            next.seeds = 0;
            next.plants += 1;
        }

        if next.plants >= PLANTS_PER_FRUIT {
            next.plants = 0;
            next.fruits += 1;
        }

        next
    }

    /// Writes the counters back onto a user row.
    pub fn apply_to(self, user: &mut user::Model) {
        user.eco_badges = self.eco_badges;
        user.seeds = self.seeds;
        user.plants = self.plants;
        user.fruits = self.fruits;
    }
}

impl From<&user::Model> for EcoProgress {
    fn from(user: &user::Model) -> Self {
        Self {
            eco_badges: user.eco_badges,
            seeds: user.seeds,
            plants: user.plants,
            fruits: user.fruits,
        }
    }
}

/// Eco-points and the garden level they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStanding {
    /// Accumulated eco-points
    pub eco_points: i32,
    /// Current garden level
    pub garden_level: i32,
}

impl GardenStanding {
    /// Adds `delta` eco-points and levels up as many times as the new total allows.
    ///
    /// Points never drop below zero and the level never drops below 1.
    /// Levels are never taken away when points are deducted.
    #[must_use]
    pub fn with_points(self, delta: i32) -> Self {
        let eco_points = self.eco_points.saturating_add(delta).max(0);
        let mut garden_level = self.garden_level.max(1);

        while garden_level < MAX_GARDEN_LEVEL && eco_points >= level_threshold(garden_level) {
            garden_level += 1;
        }

        Self {
            eco_points,
            garden_level,
        }
    }

    /// Writes the standing back onto a user row.
    pub fn apply_to(self, user: &mut user::Model) {
        user.eco_points = self.eco_points;
        user.garden_level = self.garden_level;
    }
}

impl From<&user::Model> for GardenStanding {
    fn from(user: &user::Model) -> Self {
        Self {
            eco_points: user.eco_points,
            garden_level: user.garden_level,
        }
    }
}

/// Eco-points at which a user leaves `level`.
#[must_use]
pub const fn level_threshold(level: i32) -> i32 {
    level.saturating_mul(POINTS_PER_LEVEL)
}

/// Validates a budget string and returns it normalized to two decimal places.
///
/// # Errors
/// Returns [`Error::Validation`] unless the value is a non-negative number
/// with at most two decimal places.
pub fn validate_budget(budget: &str) -> Result<String> {
    money::normalize(budget).map_err(|_| {
        Error::validation(format!(
            "Budget must be a valid decimal number, got '{budget}'"
        ))
    })
}

/// Adds a CO₂ saving to the running total. Totals can only grow.
///
/// # Errors
/// Returns [`Error::Validation`] if `saving` is negative or malformed.
pub fn add_co2_saving(current: &str, saving: &str) -> Result<String> {
    money::parse_cents(saving).map_err(|_| {
        Error::validation(format!(
            "CO2 saving must be a non-negative decimal, got '{saving}'"
        ))
    })?;
    money::add(current, saving)
}

/// Returns whether adding this product to the cart earns the organic/local bonus.
#[must_use]
pub const fn earns_cart_bonus(is_organic: bool, is_local: bool) -> bool {
    is_organic || is_local
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn simulate(actions: u32) -> EcoProgress {
        (0..actions).fold(EcoProgress::default(), |p, _| p.after_eco_action())
    }

    #[test]
    fn test_single_action_only_adds_a_badge() {
        let next = EcoProgress::default().after_eco_action();
        assert_eq!(
            next,
            EcoProgress {
                eco_badges: 1,
                ..EcoProgress::default()
            }
        );
    }

    #[test]
    fn test_tenth_badge_becomes_a_seed() {
        let start = EcoProgress {
            eco_badges: 9,
            ..EcoProgress::default()
        };
        let next = start.after_eco_action();
        assert_eq!(next.eco_badges, 0);
        assert_eq!(next.seeds, 1);
        assert_eq!(next.plants, 0);
    }

    #[test]
    fn test_triple_cascade_in_one_action() {
        let start = EcoProgress {
            eco_badges: 9,
            seeds: 2,
            plants: 2,
            fruits: 0,
        };
        assert_eq!(
            start.after_eco_action(),
            EcoProgress {
                eco_badges: 0,
                seeds: 0,
                plants: 0,
                fruits: 1,
            }
        );
    }

    #[test]
    fn test_counters_match_odometer_for_many_actions() {
        for n in [0_u32, 1, 9, 10, 29, 30, 89, 90, 91, 250, 1_000, 12_345] {
            let p = simulate(n);
            let n = i32::try_from(n).unwrap();
            let seeds_total = n / BADGES_PER_SEED;
            let plants_total = seeds_total / SEEDS_PER_PLANT;
            assert_eq!(p.eco_badges, n % BADGES_PER_SEED, "badges after {n}");
            assert_eq!(p.seeds, seeds_total % SEEDS_PER_PLANT, "seeds after {n}");
            assert_eq!(p.plants, plants_total % PLANTS_PER_FRUIT, "plants after {n}");
            assert_eq!(p.fruits, plants_total / PLANTS_PER_FRUIT, "fruits after {n}");
        }
    }

    #[test]
    fn test_counters_stay_within_bounds() {
        let mut p = EcoProgress::default();
        for _ in 0..500 {
            p = p.after_eco_action();
            assert!((0..BADGES_PER_SEED).contains(&p.eco_badges));
            assert!((0..SEEDS_PER_PLANT).contains(&p.seeds));
            assert!((0..PLANTS_PER_FRUIT).contains(&p.plants));
        }
    }

    #[test]
    fn test_points_level_up_cascades() {
        let start = GardenStanding {
            eco_points: 0,
            garden_level: 1,
        };
        let next = start.with_points(450);
        assert_eq!(next.eco_points, 450);
        // 450 >= 200 (level 1) and >= 400 (level 2), but < 600 (level 3)
        assert_eq!(next.garden_level, 3);
    }

    #[test]
    fn test_points_below_threshold_keep_level() {
        let start = GardenStanding {
            eco_points: 1240,
            garden_level: 7,
        };
        let next = start.with_points(ORGANIC_OR_LOCAL_BONUS);
        assert_eq!(next.eco_points, 1250);
        assert_eq!(next.garden_level, 7);
    }

    #[test]
    fn test_negative_points_floor_at_zero_and_keep_level() {
        let start = GardenStanding {
            eco_points: 30,
            garden_level: 2,
        };
        let next = start.with_points(-100);
        assert_eq!(next.eco_points, 0);
        assert_eq!(next.garden_level, 2);
    }

    #[test]
    fn test_level_up_terminates_at_max_points() {
        let next = GardenStanding {
            eco_points: 0,
            garden_level: 1,
        }
        .with_points(i32::MAX);
        assert_eq!(next.garden_level, MAX_GARDEN_LEVEL);
    }

    #[test]
    fn test_validate_budget() {
        assert_eq!(validate_budget("42.50").unwrap(), "42.50");
        assert_eq!(validate_budget("42.5").unwrap(), "42.50");
        assert!(matches!(
            validate_budget("-5.00"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            validate_budget("12.345"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_co2_saving_only_grows() {
        assert_eq!(add_co2_saving("12.40", "1.2").unwrap(), "13.60");
        assert!(add_co2_saving("12.40", "-1.00").is_err());
    }

    #[test]
    fn test_cart_bonus_rule() {
        assert!(earns_cart_bonus(true, false));
        assert!(earns_cart_bonus(false, true));
        assert!(!earns_cart_bonus(false, false));
    }
}
