//! Notification business logic - the closed set of notification kinds.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Eco achievements and tips about greener choices
    Eco,
    /// Order placed or updated
    Order,
    /// General shopping tip
    Tip,
    /// Promotion
    Promo,
    /// Badge earned
    Badge,
    /// Time-limited deal
    Deal,
    /// Stock alert
    Stock,
    /// Budget warning
    Budget,
}

impl NotificationKind {
    /// Value stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eco => "eco",
            Self::Order => "order",
            Self::Tip => "tip",
            Self::Promo => "promo",
            Self::Badge => "badge",
            Self::Deal => "deal",
            Self::Stock => "stock",
            Self::Budget => "budget",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eco" => Ok(Self::Eco),
            "order" => Ok(Self::Order),
            "tip" => Ok(Self::Tip),
            "promo" => Ok(Self::Promo),
            "badge" => Ok(Self::Badge),
            "deal" => Ok(Self::Deal),
            "stock" => Ok(Self::Stock),
            "budget" => Ok(Self::Budget),
            other => Err(Error::validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

/// Input for a new notification. The recipient comes from the caller identity.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    /// Notification kind
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
}

impl NewNotification {
    /// Rejects blank titles.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the title is empty.
    pub fn validate(self) -> Result<Self> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Notification title cannot be empty"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_kind_parses_every_documented_value() {
        for raw in ["eco", "order", "tip", "promo", "badge", "deal", "stock", "budget"] {
            let kind: NotificationKind = raw.parse().unwrap();
            assert_eq!(kind.as_str(), raw);
        }
        assert!(matches!(
            "spam".parse::<NotificationKind>(),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_new_notification_deserializes_type_field() {
        let parsed: NewNotification =
            serde_json::from_str(r#"{"type":"deal","title":"50% off","message":"Today only"}"#)
                .unwrap();
        assert_eq!(parsed.kind, NotificationKind::Deal);
        assert!(parsed.validate().is_ok());
    }
}
