//! Role model.
//!
//! Roles are a closed set. The auth API reports them as kebab-case strings;
//! anything outside the set is carried as an unrecognized [`RoleClaim`] so the
//! console can still render a fallback title and an empty menu for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A console role. Roles are independent; none implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    President,
    VicePresident,
    Accountant,
    Secretary,
    Finance,
    Member,
    Music,
    Education,
    Maintenance,
    Youth,
    Audit,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 12] = [
        Role::Admin,
        Role::President,
        Role::VicePresident,
        Role::Accountant,
        Role::Secretary,
        Role::Finance,
        Role::Member,
        Role::Music,
        Role::Education,
        Role::Maintenance,
        Role::Youth,
        Role::Audit,
    ];

    /// Wire identifier, as sent by the auth API.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::President => "president",
            Role::VicePresident => "vice-president",
            Role::Accountant => "accountant",
            Role::Secretary => "secretary",
            Role::Finance => "finance",
            Role::Member => "member",
            Role::Music => "music",
            Role::Education => "education",
            Role::Maintenance => "maintenance",
            Role::Youth => "youth",
            Role::Audit => "audit",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known role identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// The role reported for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleClaim {
    Known(Role),
    /// A role string outside the closed set, kept verbatim.
    Unrecognized(String),
}

impl RoleClaim {
    /// Parse a raw role string; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => RoleClaim::Known(role),
            Err(_) => RoleClaim::Unrecognized(raw.trim().to_string()),
        }
    }

    /// The known role, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unrecognized(_) => None,
        }
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        match self {
            RoleClaim::Known(role) => role.as_str(),
            RoleClaim::Unrecognized(raw) => raw,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Known(role)
    }
}

impl fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoleClaim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoleClaim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RoleClaim::parse(&raw))
    }
}
