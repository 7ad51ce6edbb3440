// Copyright (c) 2025 - Cowboy AI, Inc.
//! Focused zone / environment

use super::zone::{Environment, Zone};

/// The currently focused zone and environment
///
/// # Invariant
///
/// `environment` is `Some` only if an environment with the same name is
/// present in `zone.environments`. The constructors below are the only way
/// the synchronizer builds a selection, so the invariant holds by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    zone: Option<Zone>,
    environment: Option<Environment>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Select a zone with no environment focused
    pub fn zone(zone: Zone) -> Self {
        Self {
            zone: Some(zone),
            environment: None,
        }
    }

    /// Select a zone and, if present in it, the named environment
    pub fn resolve(zone: Zone, environment: Option<&str>) -> Self {
        let environment = environment.and_then(|name| zone.environment(name).cloned());
        Self {
            zone: Some(zone),
            environment,
        }
    }

    pub fn selected_zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn selected_environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_ref().map(|z| z.name.as_str())
    }

    pub fn environment_name(&self) -> Option<&str> {
        self.environment.as_ref().map(|e| e.name.as_str())
    }

    /// Whether the given zone name is the selected zone
    pub fn is_zone(&self, name: &str) -> bool {
        self.zone_name() == Some(name)
    }

    /// Focus an environment of the selected zone; returns `false` if absent
    pub fn focus_environment(&mut self, name: &str) -> bool {
        match self.zone.as_ref().and_then(|z| z.environment(name)) {
            Some(env) => {
                self.environment = Some(env.clone());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Zone {
        Zone::new("core").with_environments(vec![Environment::new("dev"), Environment::new("prod")])
    }

    #[test]
    fn test_resolve_keeps_present_environment() {
        let selection = Selection::resolve(zone(), Some("prod"));
        assert_eq!(selection.zone_name(), Some("core"));
        assert_eq!(selection.environment_name(), Some("prod"));
    }

    #[test]
    fn test_resolve_drops_absent_environment() {
        let selection = Selection::resolve(zone(), Some("stage"));
        assert!(selection.is_zone("core"));
        assert!(selection.selected_environment().is_none());
    }

    #[test]
    fn test_focus_environment_requires_zone() {
        let mut selection = Selection::empty();
        assert!(!selection.focus_environment("dev"));

        let mut selection = Selection::zone(zone());
        assert!(selection.focus_environment("dev"));
        assert!(!selection.focus_environment("missing"));
        assert_eq!(selection.environment_name(), Some("dev"));
    }
}
