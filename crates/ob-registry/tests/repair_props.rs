use ob_registry::{PartitionRule, Registry, RegistryConfig, RegistryParts};
use ob_test_utils::{objects, TestObject};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Option<&'static str>),
    Kill(usize),
    Rekey(&'static str, &'static str),
    RekeyFromList(Vec<&'static str>),
    Replace(&'static str, usize),
    Partition(PartitionRule),
    ReplaceMany(&'static str, Vec<Option<usize>>),
    ReplaceAll(Vec<Option<usize>>, Option<&'static str>),
    Clear(Option<&'static str>),
}

const KEYS: [&str; 4] = ["a", "b", "ab", ""];
const REF_KEYS: [&str; 4] = ["a", "a1", "b", ""];
const POOL: usize = 8;

fn key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(KEYS.to_vec())
}

fn slots() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(0..POOL), 0..4)
}

fn rule() -> impl Strategy<Value = PartitionRule> {
    prop_oneof![
        Just(PartitionRule::Odd),
        Just(PartitionRule::Even),
        (0..4usize).prop_map(PartitionRule::MultipleOf),
        (0..4usize).prop_map(PartitionRule::ExceptIndex),
        (0..4usize).prop_map(PartitionRule::ExceptMultipleOf),
        Just(PartitionRule::All),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..POOL, prop::option::of(key())).prop_map(|(i, k)| Op::Add(i, k)),
        1 => (0..POOL).prop_map(Op::Kill),
        1 => (key(), key()).prop_map(|(p, n)| Op::Rekey(p, n)),
        1 => prop::collection::vec(prop::sample::select(REF_KEYS.to_vec()), 0..14)
            .prop_map(Op::RekeyFromList),
        1 => (key(), 0..POOL).prop_map(|(k, i)| Op::Replace(k, i)),
        1 => rule().prop_map(Op::Partition),
        1 => (key(), slots()).prop_map(|(k, slots)| Op::ReplaceMany(k, slots)),
        1 => (slots(), prop::option::of(key())).prop_map(|(s, e)| Op::ReplaceAll(s, e)),
        1 => prop::option::of(key()).prop_map(Op::Clear),
    ]
}

fn handles(pool: &[TestObject], slots: &[Option<usize>]) -> Vec<Option<TestObject>> {
    slots.iter().map(|slot| slot.map(|i| pool[i].clone())).collect()
}

fn apply(registry: &mut Registry<TestObject>, pool: &[TestObject], op: &Op) {
    match op {
        Op::Add(i, k) => {
            registry.add(pool[*i].clone(), *k);
        }
        Op::Kill(i) => pool[*i].kill(),
        Op::Rekey(prefix, needle) => registry.rekey(prefix, *needle),
        Op::Partition(rule) => registry.rekey_by_partition("p", *rule),
        Op::RekeyFromList(refs) => registry.rekey_from_list(refs.as_slice()),
        Op::Replace(key, i) => {
            registry.replace(key, pool[*i].clone());
        }
        Op::ReplaceMany(keyword, slots) => {
            registry.replace_many(keyword, &handles(pool, slots));
        }
        Op::ReplaceAll(slots, except) => {
            registry.replace_all(&handles(pool, slots), *except);
        }
        Op::Clear(except) => {
            registry.clear(*except, drop);
        }
    }
}

proptest! {
    #[test]
    fn prop_repair_restores_invariants(ops in prop::collection::vec(op(), 0..40)) {
        let pool = objects(&["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"]);
        let mut registry = Registry::new();

        for op in &ops {
            apply(&mut registry, &pool, op);
        }
        registry.check_and_repair();

        prop_assert!(registry.is_consistent());
        prop_assert_eq!(registry.items().len(), registry.keys().len());
        for (key, item) in registry.iter() {
            prop_assert_eq!(registry.index_get(key), Some(item));
        }
    }

    #[test]
    fn prop_repair_is_idempotent(ops in prop::collection::vec(op(), 0..40)) {
        let pool = objects(&["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"]);
        let mut registry = Registry::new();

        for op in &ops {
            apply(&mut registry, &pool, op);
        }
        registry.check_and_repair();

        prop_assert!(!registry.check_and_repair());
    }

    #[test]
    fn prop_imported_parts_are_repaired(
        items in prop::collection::vec("[a-d]", 0..8),
        keys in prop::collection::vec("[x-z]{0,1}", 0..8),
        pairs in prop::collection::vec(("[x-z]", "[a-d]"), 0..4),
    ) {
        let parts = RegistryParts {
            items,
            keys,
            pairs: pairs.into_iter().collect(),
        };

        let mut registry = Registry::from_parts(parts, RegistryConfig::default());

        prop_assert!(registry.is_consistent());
        prop_assert!(!registry.check_and_repair());
    }

    #[test]
    fn prop_partition_keys_follow_rule(n in 0..12usize, partition in rule()) {
        let names: Vec<String> = (0..n).map(|i| format!("o{i}")).collect();
        let mut registry = Registry::from_items(names);

        registry.rekey_by_partition("E", partition);

        for (i, key) in registry.keys().iter().enumerate() {
            let expected = if partition.selects(i) { format!("E{i}") } else { i.to_string() };
            prop_assert_eq!(key, &expected);
        }
        prop_assert!(registry.is_consistent());
    }
}
