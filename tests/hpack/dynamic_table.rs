//! Dynamic table eviction (spec §4.3, §8 concrete scenario 5).

use h2_core::hpack::DynamicTable;

#[test]
fn inserting_past_capacity_evicts_the_oldest_entry() {
    let mut table = DynamicTable::new(64);
    table.add("custom-key".into(), "custom-value".into()); // 11 + 12 + 32 = 55
    table.add("cookie".into(), "value".into()); // 6 + 5 + 32 = 43

    assert_eq!(table.len(), 1);
    assert_eq!(table.size(), 43);
    assert_eq!(table.get(1).unwrap().name, "cookie");
}

#[test]
fn current_size_tracks_sum_of_entries_after_any_sequence_of_ops() {
    let mut table = DynamicTable::new(4096);
    table.add("a".into(), "1".into());
    table.add("bb".into(), "22".into());
    table.set_max_size(1024);
    table.add("ccc".into(), "333".into());

    let expected: usize = (1..=table.len())
        .map(|i| {
            let e = table.get(i).unwrap();
            e.name.len() + e.value.len() + h2_core::hpack::ENTRY_OVERHEAD
        })
        .sum();
    assert_eq!(table.size(), expected);
    assert!(table.size() <= table.max_size());
}

#[test]
fn entry_larger_than_max_size_leaves_table_empty() {
    let mut table = DynamicTable::new(32);
    table.add("this-name-alone-already-exceeds-the-table".into(), "v".into());
    assert!(table.is_empty());
    assert_eq!(table.size(), 0);
}
