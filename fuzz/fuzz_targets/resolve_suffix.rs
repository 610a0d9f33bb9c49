#![no_main]

// Harness: resolve never returns an id outside the scope or one that does not
// end with the requested suffix.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rail_card_core::primitives::StateSnapshot;
use rail_card_core::registry::DeviceScope;
use rail_card_core::resolver::resolve;

#[derive(Arbitrary, Debug)]
struct ResolveInput {
    entries: Vec<(String, String)>,
    scope: Option<Vec<String>>,
    suffix: String,
}

fuzz_target!(|input: ResolveInput| {
    let snapshot: StateSnapshot = input.entries.into_iter().collect();
    let scope: Option<DeviceScope> = input.scope.map(|ids| ids.into_iter().collect());

    if let Some(entity_id) = resolve(&snapshot, scope.as_ref(), &input.suffix) {
        assert!(entity_id.ends_with(input.suffix.as_str()));
        assert!(snapshot.get(entity_id).is_some());
        if let Some(scope) = &scope {
            assert!(scope.contains(entity_id));
        }
    }
});
