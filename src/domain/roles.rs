//! Account and zone role levels.
//!
//! Stored as integers; the highest privilege must be the lowest value so that
//! `MIN(zone_role)` over a user's assignments yields their effective role.

use serde::{Deserialize, Serialize};

/// Account-wide privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Admin = 10,
    User = 20,
    Blocked = 90,
    /// Pseudo-account used as a group container, never logs in.
    Group = 100,
}

impl AccountType {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            10 => Some(AccountType::Admin),
            20 => Some(AccountType::User),
            90 => Some(AccountType::Blocked),
            100 => Some(AccountType::Group),
            _ => None,
        }
    }

    pub fn level(self) -> i64 {
        self as i64
    }

    /// Lower level means more privilege.
    pub fn grants_at_least(self, required: AccountType) -> bool {
        self.level() <= required.level()
    }
}

/// Per-zone privilege level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneRole {
    Admin = 10,
    User = 20,
    Viewer = 30,
}

impl ZoneRole {
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            10 => Some(ZoneRole::Admin),
            20 => Some(ZoneRole::User),
            30 => Some(ZoneRole::Viewer),
            _ => None,
        }
    }

    pub fn level(self) -> i64 {
        self as i64
    }

    pub fn grants_at_least(self, required: ZoneRole) -> bool {
        self.level() <= required.level()
    }
}
