use std::fmt;

use serde::{Deserialize, Serialize};

/// AccessLevel is the role a membership record grants on a group or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
}

impl AccessLevel {
    /// Stored integer representation (gaps left for future levels).
    pub const fn as_i64(self) -> i64 {
        match self {
            AccessLevel::Guest => 10,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Maintainer => 40,
            AccessLevel::Owner => 50,
        }
    }

    pub const fn from_i64(v: i64) -> Option<AccessLevel> {
        match v {
            10 => Some(AccessLevel::Guest),
            20 => Some(AccessLevel::Reporter),
            30 => Some(AccessLevel::Developer),
            40 => Some(AccessLevel::Maintainer),
            50 => Some(AccessLevel::Owner),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Guest => "guest",
            AccessLevel::Reporter => "reporter",
            AccessLevel::Developer => "developer",
            AccessLevel::Maintainer => "maintainer",
            AccessLevel::Owner => "owner",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UserState is the account lifecycle state.
///
/// `Active` is the initial state; `Blocked` revokes non-exclusive access
/// (see [`crate::lifecycle`]) and is left via an explicit reactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    #[default]
    Active,
    Blocked,
}

impl UserState {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserState::Active => "active",
            UserState::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<UserState> {
        match s {
            "active" => Some(UserState::Active),
            "blocked" => Some(UserState::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_roundtrip() {
        for level in [
            AccessLevel::Guest,
            AccessLevel::Reporter,
            AccessLevel::Developer,
            AccessLevel::Maintainer,
            AccessLevel::Owner,
        ] {
            assert_eq!(AccessLevel::from_i64(level.as_i64()), Some(level));
        }
        assert_eq!(AccessLevel::from_i64(15), None);
    }

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::Owner > AccessLevel::Maintainer);
        assert!(AccessLevel::Guest < AccessLevel::Reporter);
    }

    #[test]
    fn test_user_state_parse() {
        assert_eq!(UserState::parse("active"), Some(UserState::Active));
        assert_eq!(UserState::parse("blocked"), Some(UserState::Blocked));
        assert_eq!(UserState::parse("banned"), None);
        assert_eq!(UserState::default(), UserState::Active);
    }
}
