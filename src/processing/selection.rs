//! Set of bodies the user has chosen to track

use std::collections::BTreeSet;

use log::debug;

/// Tracked body names.
///
/// Membership only; iteration is alphabetical so frames draw in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodySelection {
    bodies: BTreeSet<String>,
}

impl BodySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for name in names {
            selection.insert(name);
        }
        selection
    }

    /// Returns true if the body was not tracked before
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return false;
        }
        self.bodies.insert(name)
    }

    /// Returns true if the body was tracked
    pub fn remove(&mut self, name: &str) -> bool {
        self.bodies.remove(name.trim())
    }

    /// Mirror a checkbox: track or untrack the body
    pub fn set_tracked(&mut self, name: &str, tracked: bool) -> bool {
        let changed = if tracked { self.insert(name) } else { self.remove(name) };
        if changed {
            debug!("{} {}", if tracked { "Tracking" } else { "No longer tracking" }, name.trim());
        }
        changed
    }

    /// Flip membership; returns the new state
    pub fn toggle(&mut self, name: &str) -> bool {
        let tracked = !self.contains(name);
        self.set_tracked(name, tracked);
        tracked
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains(name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}
