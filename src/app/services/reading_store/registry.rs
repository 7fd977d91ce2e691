//! Dam profile registry
//!
//! Indexes the static attributes of every dam by location. The first reading
//! seen for a location defines its profile; any later disagreement is a
//! consistency error rather than a silent overwrite.

use crate::app::models::DamProfile;
use crate::{Error, Result};
use std::collections::HashMap;

/// Registry of dam profiles keyed by location
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, DamProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the profile for a location (O(1) lookup)
    pub fn get(&self, location: &str) -> Option<&DamProfile> {
        self.profiles.get(location)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.profiles.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Check a profile against the registered one without modifying the registry
    pub fn check(&self, profile: &DamProfile) -> Result<()> {
        let Some(known) = self.profiles.get(&profile.location) else {
            return Ok(());
        };

        let mismatched = known.mismatches(profile);
        if mismatched.is_empty() {
            return Ok(());
        }

        Err(Error::consistency(
            &profile.location,
            format!(
                "static attributes differ from the registered profile ({})",
                mismatched.join(", ")
            ),
        ))
    }

    /// Register a profile
    ///
    /// Returns `Ok(true)` when the location is new, `Ok(false)` when an
    /// identical profile was already registered.
    pub fn register(&mut self, profile: DamProfile) -> Result<bool> {
        self.check(&profile)?;

        if self.profiles.contains_key(&profile.location) {
            return Ok(false);
        }

        self.profiles.insert(profile.location.clone(), profile);
        Ok(true)
    }

    /// All profiles sorted by location
    pub fn profiles(&self) -> Vec<&DamProfile> {
        let mut profiles: Vec<&DamProfile> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.location.cmp(&b.location));
        profiles
    }
}
