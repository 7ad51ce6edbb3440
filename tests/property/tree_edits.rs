// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Tree Edits
//!
//! Verifies properties of the pure edit handlers and the revisioned store
//! that must hold for all edit sequences, not just hand-picked ones.

use proptest::prelude::*;
use std::collections::HashSet;

use zone_inventory::aggregate::{apply_edit, TreeEdit};
use zone_inventory::domain::{Environment, Selection, Server, ServerStatus, Zone};
use zone_inventory::store::{next_revision, InMemoryZoneStore};
use zone_inventory::ResourceClient;

// ============================================================================
// Strategies
// ============================================================================

fn env_name() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn fqdn() -> impl Strategy<Value = String> {
    "[a-f]{1,2}\\.example\\.com"
}

fn server() -> impl Strategy<Value = Server> {
    (fqdn(), any::<bool>(), "(web|db|cache)").prop_map(|(fqdn, up, server_type)| {
        let status = if up {
            ServerStatus::Available
        } else {
            ServerStatus::Unavailable
        };
        Server::new(fqdn, "10.0.0.1", status, server_type)
    })
}

fn edit() -> impl Strategy<Value = TreeEdit> {
    prop_oneof![
        env_name().prop_map(|name| TreeEdit::AddEnvironment(Environment::new(name))),
        (env_name(), env_name()).prop_map(|(name, renamed)| TreeEdit::ReplaceEnvironment {
            name,
            environment: Environment::new(renamed),
        }),
        env_name().prop_map(|name| TreeEdit::RemoveEnvironment { name }),
        (env_name(), server()).prop_map(|(environment, server)| TreeEdit::AddServer {
            environment,
            server
        }),
        (env_name(), fqdn(), server()).prop_map(|(environment, fqdn, server)| {
            TreeEdit::ReplaceServer {
                environment,
                fqdn,
                server,
            }
        }),
        (env_name(), fqdn()).prop_map(|(environment, fqdn)| TreeEdit::RemoveServer {
            environment,
            fqdn
        }),
    ]
}

/// Fold edits over an empty zone, skipping the ones that are rejected
fn build(edits: &[TreeEdit]) -> Zone {
    edits.iter().fold(Zone::new("core"), |zone, edit| {
        apply_edit(&zone, edit).unwrap_or(zone)
    })
}

fn distinct_fqdns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,8}\\.example\\.com", 1..8)
        .prop_map(|set| set.into_iter().collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: sibling keys stay unique under any edit sequence
    #[test]
    fn prop_sibling_keys_stay_unique(edits in prop::collection::vec(edit(), 0..40)) {
        let zone = build(&edits);

        let names: HashSet<&str> = zone.environments.iter().map(|e| e.name.as_str()).collect();
        prop_assert_eq!(names.len(), zone.environments.len());

        for environment in &zone.environments {
            let fqdns: HashSet<&str> = environment.servers.iter().map(|s| s.fqdn.as_str()).collect();
            prop_assert_eq!(fqdns.len(), environment.servers.len());
        }
    }

    /// Property: edits never touch store identity
    #[test]
    fn prop_edits_preserve_identity(edits in prop::collection::vec(edit(), 1..20)) {
        let mut zone = build(&edits);
        zone.id = Some("zone:core".to_string());
        zone.revision = Some("7-abc".to_string());

        for edit in &edits {
            if let Ok(next) = apply_edit(&zone, edit) {
                prop_assert_eq!(&next.id, &zone.id);
                prop_assert_eq!(&next.revision, &zone.revision);
                prop_assert_eq!(&next.name, &zone.name);
            }
        }
    }

    /// Property: a rejected edit is an error, never a silent change
    #[test]
    fn prop_rejected_edit_reports_error(edits in prop::collection::vec(edit(), 0..20), candidate in edit()) {
        let zone = build(&edits);
        match apply_edit(&zone, &candidate) {
            Ok(_) => {}
            Err(err) => {
                let expected = err.is_not_found()
                    || matches!(err, zone_inventory::InventoryError::Duplicate { .. });
                prop_assert!(expected, "unexpected error {:?}", err);
            }
        }
    }

    /// Property: removing a server by fqdn keeps every other server in its
    /// current relative order, whatever that order is
    #[test]
    fn prop_remove_server_by_key(
        (fqdns, victim) in distinct_fqdns().prop_flat_map(|fqdns| {
            let len = fqdns.len();
            (Just(fqdns), 0..len)
        }).prop_flat_map(|(fqdns, idx)| (Just(fqdns).prop_shuffle(), Just(idx)))
          .prop_map(|(fqdns, idx)| {
              let victim = fqdns[idx].clone();
              (fqdns, victim)
          })
    ) {
        let servers: Vec<Server> = fqdns
            .iter()
            .map(|f| Server::new(f.clone(), "10.0.0.1", ServerStatus::Available, "web"))
            .collect();
        let zone = Zone::new("core")
            .with_environments(vec![Environment::new("prod").with_servers(servers)]);

        let next = apply_edit(&zone, &TreeEdit::RemoveServer {
            environment: "prod".to_string(),
            fqdn: victim.clone(),
        }).unwrap();

        let remaining: Vec<String> = next.environments[0].servers.iter().map(|s| s.fqdn.clone()).collect();
        let expected: Vec<String> = fqdns.into_iter().filter(|f| *f != victim).collect();
        prop_assert_eq!(remaining, expected);
    }

    /// Property: replacing an environment keeps its index and its siblings
    #[test]
    fn prop_replace_environment_is_positional(
        names in prop::collection::hash_set("[a-z]{1,6}", 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let zone = Zone::new("core")
            .with_environments(names.iter().map(Environment::new).collect());
        let idx = pick.index(names.len());

        let replacement = Environment::new("REPLACED");
        let next = apply_edit(&zone, &TreeEdit::ReplaceEnvironment {
            name: names[idx].clone(),
            environment: replacement.clone(),
        }).unwrap();

        prop_assert_eq!(next.environments.len(), zone.environments.len());
        for (i, environment) in next.environments.iter().enumerate() {
            if i == idx {
                prop_assert_eq!(environment, &replacement);
            } else {
                prop_assert_eq!(environment, &zone.environments[i]);
            }
        }
    }

    /// Property: a resolved selection only focuses environments that exist
    #[test]
    fn prop_selection_focus_exists(edits in prop::collection::vec(edit(), 0..30), wanted in env_name()) {
        let zone = build(&edits);
        let selection = Selection::resolve(zone.clone(), Some(&wanted));

        match selection.selected_environment() {
            Some(environment) => prop_assert_eq!(Some(environment), zone.environment(&wanted)),
            None => prop_assert!(zone.environment(&wanted).is_none()),
        }
    }

    /// Property: revision generations strictly increase
    #[test]
    fn prop_revision_generation_increases(writes in 1usize..20) {
        let mut revision: Option<String> = None;
        let mut last_generation = 0u64;
        for _ in 0..writes {
            let next = next_revision(revision.as_deref());
            let generation: u64 = next.split('-').next().unwrap().parse().unwrap();
            prop_assert_eq!(generation, last_generation + 1);
            prop_assert_ne!(Some(&next), revision.as_ref());
            last_generation = generation;
            revision = Some(next);
        }
    }

    /// Property: every successful write yields a token that makes all
    /// earlier tokens stale
    #[test]
    fn prop_store_rejects_every_stale_token(edits in prop::collection::vec(edit(), 1..15)) {
        let outcome: Result<(), TestCaseError> = tokio_test::block_on(async {
            let store = InMemoryZoneStore::new();
            let mut seen = vec![store.create_zone(&Zone::new("core")).await.unwrap()];

            for edit in &edits {
                let Some(current) = seen.last().cloned() else { break };
                if let Ok(next) = apply_edit(&current, edit) {
                    let written = store.update_zone(&next).await.unwrap();
                    prop_assert_ne!(&written.revision, &current.revision);
                    seen.push(written);
                }
            }

            let latest = seen.pop().unwrap();
            for stale in seen {
                let err = store.update_zone(&stale).await.unwrap_err();
                prop_assert!(err.is_conflict());
            }
            prop_assert_eq!(store.get_zone("core").await.unwrap(), latest);
            Ok(())
        });
        outcome?;
    }
}
