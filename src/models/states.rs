//! Domain state enums for the string-typed columns the dashboard mutates.
//!
//! Rows coming out of the store keep their `String` fields; these enums carry
//! the transition logic so a toggle is a total function over whatever value
//! the column currently holds.

use serde::{Deserialize, Serialize};

/// Account status toggled by the block/unblock action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    /// Anything that is not literally "blocked" counts as active, so a toggle
    /// on an unexpected value lands on a known state.
    pub fn from_db(value: &str) -> Self {
        match value {
            "blocked" => UserStatus::Blocked,
            _ => UserStatus::Active,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Blocked,
            UserStatus::Blocked => UserStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Blocked => "blocked",
        }
    }
}

/// Subscription tier toggled by the promote/demote action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Premium,
}

impl UserRole {
    pub fn from_db(value: &str) -> Self {
        match value {
            "premium" => UserRole::Premium,
            _ => UserRole::User,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserRole::User => UserRole::Premium,
            UserRole::Premium => UserRole::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Premium => "premium",
        }
    }
}

/// Ledger entry types this service reads or writes. The column itself is an
/// open set; rows created elsewhere (e.g. `send`) pass through untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    TopUp,
    AdminTopUp,
}

impl TransactionType {
    /// The types that count toward revenue.
    pub const REVENUE: [TransactionType; 2] = [TransactionType::TopUp, TransactionType::AdminTopUp];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::TopUp => "top_up",
            TransactionType::AdminTopUp => "admin_top_up",
        }
    }
}

/// Broadcast announcement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementType {
    General,
    Maintenance,
    Update,
    Promotion,
    Warning,
}

impl AnnouncementType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(AnnouncementType::General),
            "maintenance" => Some(AnnouncementType::Maintenance),
            "update" => Some(AnnouncementType::Update),
            "promotion" => Some(AnnouncementType::Promotion),
            "warning" => Some(AnnouncementType::Warning),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementType::General => "general",
            AnnouncementType::Maintenance => "maintenance",
            AnnouncementType::Update => "update",
            AnnouncementType::Promotion => "promotion",
            AnnouncementType::Warning => "warning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle_is_involution() {
        assert_eq!(UserStatus::Active.toggled().toggled(), UserStatus::Active);
        assert_eq!(UserStatus::Blocked.toggled().toggled(), UserStatus::Blocked);
    }

    #[test]
    fn test_role_toggle_is_involution() {
        assert_eq!(UserRole::User.toggled().toggled(), UserRole::User);
        assert_eq!(UserRole::Premium.toggled().toggled(), UserRole::Premium);
    }

    #[test]
    fn test_unknown_status_toggles_to_blocked() {
        assert_eq!(UserStatus::from_db("suspended"), UserStatus::Active);
        assert_eq!(UserStatus::from_db("suspended").toggled(), UserStatus::Blocked);
    }

    #[test]
    fn test_unknown_role_toggles_to_premium() {
        assert_eq!(UserRole::from_db(""), UserRole::User);
        assert_eq!(UserRole::from_db("").toggled(), UserRole::Premium);
    }

    #[test]
    fn test_db_round_trip() {
        assert_eq!(UserStatus::from_db(UserStatus::Blocked.as_str()), UserStatus::Blocked);
        assert_eq!(UserRole::from_db(UserRole::Premium.as_str()), UserRole::Premium);
    }

    #[test]
    fn test_announcement_type_parse() {
        assert_eq!(AnnouncementType::parse("maintenance"), Some(AnnouncementType::Maintenance));
        assert_eq!(AnnouncementType::parse("promotion"), Some(AnnouncementType::Promotion));
        assert_eq!(AnnouncementType::parse("urgent"), None);
    }
}
