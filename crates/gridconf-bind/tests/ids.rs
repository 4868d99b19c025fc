use gridconf_bind::{bind, normalize_ids, validate};
use gridconf_common::{Page, has_errors};
use gridconf_parse::parse;
use gridconf_types::TypeRegistry;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

fn page(ids: &[Option<i64>]) -> Page {
    let mut rows = vec![
        vec!["id".to_string(), "hp".to_string()],
        vec![String::new(), "int".to_string()],
    ];
    for id in ids {
        rows.push(vec![id.map(|n| n.to_string()).unwrap_or_default(), "10".to_string()]);
    }
    Page::from_rows("Units", rows)
}

proptest! {
    #[test]
    fn ids_are_unique_after_normalization(ids in prop::collection::vec(prop::option::of(0i64..12), 1..40)) {
        let (mut tables, _) = parse(&page(&ids)).into_parts();
        normalize_ids(&mut tables);

        let registry = TypeRegistry::with_builtins();
        let diags = validate(&tables, &registry);
        prop_assert!(!has_errors(&diags), "{:?}", diags);

        let model = bind(&tables, &registry).unwrap();
        let units = model.table("Units").unwrap();
        prop_assert_eq!(units.len(), ids.len());

        let seen: FxHashSet<_> = units.iter().map(|i| i.id.clone()).collect();
        prop_assert_eq!(seen.len(), ids.len());

        // an explicit ID that is not yet taken keeps its value
        if let Some(Some(n)) = ids.first() {
            prop_assert_eq!(&units.items()[0].id, &n.to_string());
        }
    }

    #[test]
    fn normalization_is_idempotent(ids in prop::collection::vec(prop::option::of(0i64..12), 1..40)) {
        let (mut once, _) = parse(&page(&ids)).into_parts();
        normalize_ids(&mut once);
        let mut twice = once.clone();
        normalize_ids(&mut twice);
        prop_assert_eq!(once, twice);
    }
}
