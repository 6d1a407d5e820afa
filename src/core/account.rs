//! Account business logic - creating shoppers and recording garden history.

use crate::{
    core::{ledger, money},
    entities::user,
    errors::{Error, Result},
};
use serde::Deserialize;

/// Starting budget for new accounts.
pub const DEFAULT_BUDGET: &str = "100.00";

/// Input for a new user. Ledger counters always start from zero.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login/display name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Starting budget, defaults to [`DEFAULT_BUDGET`]
    #[serde(default)]
    pub budget: Option<String>,
}

impl NewUser {
    /// Validates the input and builds a fresh row with the given id.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for a blank username, an email without `@`,
    /// or an invalid budget.
    pub fn into_model(self, id: i64) -> Result<user::Model> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(Error::validation("Username cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(Error::validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }

        let budget = match self.budget {
            Some(budget) => ledger::validate_budget(&budget)?,
            None => DEFAULT_BUDGET.to_string(),
        };

        Ok(user::Model {
            id,
            username,
            email: self.email,
            budget,
            eco_points: 0,
            garden_level: 1,
            co2_saved: money::format_cents(0),
            eco_badges: 0,
            seeds: 0,
            plants: 0,
            fruits: 0,
        })
    }
}

/// Validates a garden log entry, returning the trimmed plant type and action.
///
/// # Errors
/// Returns [`Error::Validation`] if either field is blank.
pub fn validate_garden_entry(plant_type: &str, eco_action: &str) -> Result<(String, String)> {
    let plant_type = plant_type.trim();
    let eco_action = eco_action.trim();
    if plant_type.is_empty() || eco_action.is_empty() {
        return Err(Error::validation(
            "Garden progress needs both a plant type and an eco action",
        ));
    }
    Ok((plant_type.to_string(), eco_action.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_new_user_starts_at_level_one() {
        let user = NewUser {
            username: " eco_shopper ".to_string(),
            email: "eco@example.com".to_string(),
            budget: None,
        }
        .into_model(1)
        .unwrap();

        assert_eq!(user.username, "eco_shopper");
        assert_eq!(user.budget, DEFAULT_BUDGET);
        assert_eq!(user.co2_saved, "0.00");
        assert_eq!(user.garden_level, 1);
        assert_eq!(user.eco_points, 0);
    }

    #[test]
    fn test_new_user_validation() {
        let bad_email = NewUser {
            username: "a".to_string(),
            email: "nope".to_string(),
            budget: None,
        };
        assert!(bad_email.into_model(1).is_err());

        let bad_budget = NewUser {
            username: "a".to_string(),
            email: "a@b.c".to_string(),
            budget: Some("-1".to_string()),
        };
        assert!(matches!(
            bad_budget.into_model(1),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_garden_entry_requires_both_fields() {
        assert!(validate_garden_entry("sunflower", "bought local").is_ok());
        assert!(validate_garden_entry("", "bought local").is_err());
        assert!(validate_garden_entry("sunflower", "  ").is_err());
    }
}
