//!
//! Entity resolution by id suffix.
//!
//! The host's namespace is flat, so the card finds a sensor by scanning for
//! the first entity id that ends with the wanted suffix. When several ids
//! share a suffix the first one in the snapshot's enumeration order wins; the
//! result therefore depends on the host's ordering. This includes bare
//! suffixes such as `1_destination`, which also match `x_11_destination`.

use crate::addressing::{candidate_suffixes, AddressingMode, Field};
use crate::primitives::StateSnapshot;
use crate::registry::DeviceScope;
use crate::types::EntityId;

/// Finds the first entity id in `snapshot` ending with `suffix`.
///
/// With a `scope`, only ids that are also members of the scope are considered.
/// The match is exact and case-sensitive.
pub fn resolve<'a>(
    snapshot: &'a StateSnapshot,
    scope: Option<&DeviceScope>,
    suffix: &str,
) -> Option<&'a EntityId> {
    snapshot
        .entity_ids()
        .filter(|entity_id| match scope {
            Some(scope) => scope.contains(entity_id),
            None => true,
        })
        .find(|entity_id| entity_id.ends_with(suffix))
}

/// What a registry-scoped resolver currently knows about its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeView<'a> {
    /// The device's entity list has not arrived yet.
    Pending,
    /// The fetch failed; behaves as an empty scope.
    Failed,
    Ready(&'a DeviceScope),
}

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Prefix(&'a str),
    Scope(ScopeView<'a>),
}

/// Resolves [`Field`]s for one recomputation pass under a single addressing mode.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    snapshot: &'a StateSnapshot,
    lookup: Lookup<'a>,
}

impl<'a> Resolver<'a> {
    /// Legacy addressing: `{prefix}_{suffix}` with a bare `{suffix}` fallback.
    pub fn legacy(snapshot: &'a StateSnapshot, prefix: &'a str) -> Self {
        Resolver { snapshot, lookup: Lookup::Prefix(prefix) }
    }

    /// Registry addressing: bare suffixes within the device's entities only.
    pub fn scoped(snapshot: &'a StateSnapshot, scope: ScopeView<'a>) -> Self {
        Resolver { snapshot, lookup: Lookup::Scope(scope) }
    }

    /// Builds the resolver for `mode`. `scope` is only consulted for
    /// registry-scoped modes.
    pub fn for_mode(snapshot: &'a StateSnapshot, mode: &'a AddressingMode, scope: ScopeView<'a>) -> Self {
        match mode {
            AddressingMode::LegacyPrefix(prefix) => Self::legacy(snapshot, prefix),
            AddressingMode::RegistryScoped(_) => Self::scoped(snapshot, scope),
        }
    }

    pub fn snapshot(&self) -> &'a StateSnapshot {
        self.snapshot
    }

    /// True while a registry-scoped resolver is waiting for its scope.
    pub fn is_pending(&self) -> bool {
        matches!(self.lookup, Lookup::Scope(ScopeView::Pending))
    }

    /// Entity id holding `field` for service `index` (ignored for board-level fields).
    pub fn find(&self, field: Field, index: u32) -> Option<&'a EntityId> {
        let found = match self.lookup {
            Lookup::Prefix(prefix) => candidate_suffixes(Some(prefix), field, index)
                .iter()
                .find_map(|suffix| resolve(self.snapshot, None, suffix)),
            Lookup::Scope(ScopeView::Ready(scope)) => candidate_suffixes(None, field, index)
                .iter()
                .find_map(|suffix| resolve(self.snapshot, Some(scope), suffix)),
            Lookup::Scope(ScopeView::Pending | ScopeView::Failed) => None,
        };
        tracing::trace!(?field, index, entity_id = ?found, "Resolved field");
        found
    }

    /// State value of `field` for service `index`; `None` when unresolved.
    pub fn value(&self, field: Field, index: u32) -> Option<&'a str> {
        self.find(field, index).and_then(|entity_id| self.snapshot.value(entity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StateSnapshot {
        StateSnapshot::new()
            .with("sensor.york_max_services", "4")
            .with("sensor.leeds_max_services", "2")
            .with("sensor.leeds_1_destination", "Leeds")
            .with("sensor.other_1_destination", "Hull")
    }

    #[test]
    fn test_resolve_first_match_in_order() {
        let snapshot = snapshot();
        assert_eq!(
            resolve(&snapshot, None, "max_services").map(String::as_str),
            Some("sensor.york_max_services")
        );
        assert_eq!(resolve(&snapshot, None, "MAX_SERVICES"), None);
        assert_eq!(resolve(&snapshot, None, "platform"), None);
    }

    #[test]
    fn test_resolve_respects_scope() {
        let snapshot = snapshot();
        let scope: DeviceScope = ["sensor.leeds_max_services", "sensor.not_in_snapshot"].into_iter().collect();
        assert_eq!(
            resolve(&snapshot, Some(&scope), "max_services").map(String::as_str),
            Some("sensor.leeds_max_services")
        );
        assert_eq!(resolve(&snapshot, Some(&scope), "1_destination"), None);
        assert_eq!(resolve(&snapshot, Some(&DeviceScope::empty()), "max_services"), None);
    }

    #[test]
    fn test_legacy_prefers_prefixed_then_falls_back() {
        let snapshot = snapshot();
        let leeds = Resolver::legacy(&snapshot, "leeds");
        assert_eq!(leeds.value(Field::MaxServices, 0), Some("2"));

        let unknown = Resolver::legacy(&snapshot, "derby");
        assert_eq!(unknown.value(Field::MaxServices, 0), Some("4"));
        assert_eq!(unknown.value(Field::Destination, 1), Some("Leeds"));
        assert_eq!(unknown.value(Field::Destination, 2), None);
    }

    #[test]
    fn test_scoped_resolver_gates_on_scope() {
        let snapshot = snapshot();
        let scope: DeviceScope = ["sensor.other_1_destination"].into_iter().collect();

        let pending = Resolver::scoped(&snapshot, ScopeView::Pending);
        assert!(pending.is_pending());
        assert_eq!(pending.value(Field::Destination, 1), None);

        let failed = Resolver::scoped(&snapshot, ScopeView::Failed);
        assert!(!failed.is_pending());
        assert_eq!(failed.value(Field::Destination, 1), None);

        let ready = Resolver::scoped(&snapshot, ScopeView::Ready(&scope));
        assert_eq!(ready.value(Field::Destination, 1), Some("Hull"));
        assert_eq!(ready.value(Field::MaxServices, 0), None);
    }

    #[test]
    fn test_for_mode_ignores_scope_in_legacy_mode() {
        let snapshot = snapshot();
        let mode = AddressingMode::LegacyPrefix("leeds".into());
        let resolver = Resolver::for_mode(&snapshot, &mode, ScopeView::Pending);
        assert!(!resolver.is_pending());
        assert_eq!(resolver.value(Field::MaxServices, 0), Some("2"));
    }
}
