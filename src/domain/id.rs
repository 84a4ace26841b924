//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Application identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppGuid(String);

impl AppGuid {
    /// Create a new `AppGuid` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the application GUID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the GUID is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AppGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AppGuid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AppGuid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Space identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceGuid(String);

impl SpaceGuid {
    /// Create a new `SpaceGuid` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the space GUID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SpaceGuid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SpaceGuid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Route identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteGuid(String);

impl RouteGuid {
    /// Create a new `RouteGuid` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the route GUID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RouteGuid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RouteGuid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_guid_round_trips_through_str() {
        let guid = AppGuid::new("some-app-guid");
        assert_eq!(guid.as_str(), "some-app-guid");
        assert_eq!(guid.to_string(), "some-app-guid");
        assert_eq!(AppGuid::from("some-app-guid"), guid);
    }

    #[test]
    fn default_app_guid_is_empty() {
        assert!(AppGuid::default().is_empty());
    }

    #[test]
    fn distinct_guids_compare_unequal() {
        assert_ne!(RouteGuid::new("route-1"), RouteGuid::new("route-2"));
        assert_ne!(SpaceGuid::new("space-1"), SpaceGuid::new("space-2"));
    }
}
