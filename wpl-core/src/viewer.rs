//! The current user as seen by the calendar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WplError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Athlete,
}

impl FromStr for Role {
    type Err = WplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coach" => Ok(Role::Coach),
            "athlete" => Ok(Role::Athlete),
            _ => Err(WplError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coach => write!(f, "coach"),
            Role::Athlete => write!(f, "athlete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub role: Role,
    pub name: String,
}

impl Viewer {
    pub fn coach(name: impl Into<String>) -> Self {
        Viewer {
            role: Role::Coach,
            name: name.into(),
        }
    }

    pub fn athlete(name: impl Into<String>) -> Self {
        Viewer {
            role: Role::Athlete,
            name: name.into(),
        }
    }

    pub fn is_coach(&self) -> bool {
        self.role == Role::Coach
    }
}

/// Supplies whoever is looking at the calendar right now.
///
/// The profile/session layer owns this; the calendar only asks.
pub trait ViewerSource {
    fn viewer(&self) -> Viewer;
}

impl ViewerSource for Viewer {
    fn viewer(&self) -> Viewer {
        self.clone()
    }
}

impl<F> ViewerSource for F
where
    F: Fn() -> Viewer,
{
    fn viewer(&self) -> Viewer {
        self()
    }
}
