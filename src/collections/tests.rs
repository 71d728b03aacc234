//! Tests for Grid, PersistentMap and OrderedSet

use super::*;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Grid
// ============================================================================

#[test]
fn test_grid_new_is_all_default() {
    for (w, h) in [(0, 0), (0, 4), (1, 1), (3, 3), (5, 2)] {
        let grid = Grid::<i32>::new(w, h).unwrap();
        assert_eq!(grid.len(), w * h);
        for y in 0..h {
            for x in 0..w {
                assert_eq!(*grid.get(x, y).unwrap(), 0, "cell ({}, {}) should be default", x, y);
            }
        }
    }
}

#[test]
fn test_grid_rejects_overflowing_dimensions() {
    let result = Grid::<u8>::new(usize::MAX, 2);
    assert_eq!(
        result.unwrap_err(),
        CollectionError::InvalidDimension { width: usize::MAX, height: 2 }
    );
}

#[test]
fn test_grid_row_major_addressing() {
    let mut grid = Grid::<u32>::new(4, 3).unwrap();
    grid.set(1, 2, 9).unwrap();

    // offset = y * width + x
    assert_eq!(grid.cells()[2 * 4 + 1], 9);
    assert_eq!(grid.extent(Axis::X), 4);
    assert_eq!(grid.extent(Axis::Y), 3);
}

#[test]
fn test_grid_out_of_range_access() {
    let mut grid = Grid::<u8>::new(2, 2).unwrap();

    assert!(matches!(grid.get(2, 0), Err(CollectionError::CellOutOfRange { x: 2, y: 0, .. })));
    assert!(grid.get(0, 2).is_err());
    assert!(grid.set(5, 5, 1).is_err());
    assert!(grid.cells().iter().all(|c| *c == 0), "Failed set must not touch cells");
}

#[test]
fn test_grid_set_returns_previous() {
    let mut grid = Grid::<String>::new(2, 1).unwrap();
    assert_eq!(grid.set(1, 0, "a".into()).unwrap(), "");
    assert_eq!(grid.set(1, 0, "b".into()).unwrap(), "a");
    *grid.get_mut(0, 0).unwrap() = "c".into();
    assert_eq!(grid.get(0, 0).unwrap(), "c");
}

#[test]
fn test_grid_find_exists_scan_row_major() {
    let mut grid = Grid::<i32>::new(3, 2).unwrap();
    grid.set(2, 0, 5).unwrap();
    grid.set(0, 1, 7).unwrap();

    assert_eq!(grid.find(|v| *v > 0), Some(&5), "Row 0 is scanned before row 1");
    assert!(grid.exists(|v| *v == 7));
    assert!(!grid.exists(|v| *v == 42));
    assert_eq!(grid.find(|v| *v == 42), None);
}

#[test]
fn test_grid_index_of() {
    let mut grid = Grid::<i32>::new(3, 3).unwrap();
    grid.set(1, 2, 4).unwrap();
    grid.set(2, 2, 4).unwrap();

    assert_eq!(grid.index_of(&4), Some((1, 2)));
    assert_eq!(grid.index_of(&0), Some((0, 0)));
    assert_eq!(grid.index_of(&99), None);
}

#[test]
fn test_grid_iter_yields_coordinates() {
    let mut grid = Grid::<u8>::new(2, 2).unwrap();
    grid.fill(1);
    let coords: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
    assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn test_grid_round_trip_preserves_cells() {
    let mut grid = Grid::<i32>::new(3, 2).unwrap();
    grid.set(2, 1, -3).unwrap();

    let mut restored = Grid::<i32>::default();
    restored.rehydrate(grid.flatten());
    assert_eq!(restored, grid);
}

#[test]
fn test_grid_rehydrate_heals_truncated_buffer() {
    let mut grid = Grid::<i32>::new(3, 3).unwrap();
    grid.set(1, 1, 8).unwrap();

    let mut record = grid.flatten();
    record.cells.as_mut().unwrap().truncate(4);
    grid.rehydrate(record);

    assert_eq!(grid.len(), 9);
    assert!(grid.cells().iter().all(|c| *c == 0), "Healed buffer should be all default");
}

#[test]
fn test_grid_rehydrate_heals_missing_buffer() {
    // Grid(3,3), write "x", then lose the buffer: dimensions alone do not
    // carry content across the round trip.
    let mut grid = Grid::<String>::new(3, 3).unwrap();
    grid.set(1, 2, "x".to_string()).unwrap();

    let mut record = grid.flatten();
    record.cells = None;
    grid.rehydrate(record);

    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.get(1, 2).unwrap(), "");
}

#[test]
fn test_grid_rehydrate_overflowing_dimensions_resets() {
    let mut grid = Grid::<u8>::new(2, 2).unwrap();
    grid.rehydrate(GridRecord {
        width: usize::MAX,
        height: usize::MAX,
        cells: None,
    });
    assert_eq!((grid.width(), grid.height(), grid.len()), (0, 0, 0));
}

#[test]
fn test_grid_new_rejects_unallocatable_dimensions() {
    // Cell count fits in usize but the byte size does not
    assert_eq!(
        Grid::<u32>::new(usize::MAX / 2, 2),
        Err(CollectionError::InvalidDimension {
            width: usize::MAX / 2,
            height: 2
        })
    );
}

#[test]
fn test_grid_rehydrate_unallocatable_dimensions_resets() {
    let mut grid = Grid::<u32>::new(2, 2).unwrap();
    grid.rehydrate(GridRecord {
        width: usize::MAX / 2,
        height: 2,
        cells: Some(vec![1, 2, 3]),
    });
    assert_eq!((grid.width(), grid.height(), grid.len()), (0, 0, 0));

    let json = format!(r#"{{"width":{},"height":2}}"#, usize::MAX / 2);
    let restored: Grid<u32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty(), "Huge persisted dimensions heal to an empty grid");
}

#[test]
fn test_grid_equality_is_deep() {
    let a = Grid::<i32>::new(2, 3).unwrap();
    let b = Grid::<i32>::new(3, 2).unwrap();
    assert_ne!(a, b, "Same cell count but different dimensions");

    let mut c = a.clone();
    assert_eq!(a, c);
    c.set(0, 0, 1).unwrap();
    assert_ne!(a, c);

    let hashes: HashSet<Grid<i32>> = [a.clone(), a.clone(), c].into_iter().collect();
    assert_eq!(hashes.len(), 2);
}

// ============================================================================
// PersistentMap
// ============================================================================

#[test]
fn test_map_indexer_upserts() {
    let mut map = PersistentMap::new();
    assert_eq!(map.insert("k", 1), None);
    assert_eq!(map.insert("k", 2), Some(1));
    assert_eq!(map.get("k"), Some(&2));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_map_add_is_strict() {
    let mut map = PersistentMap::new();
    map.add("k", 1).unwrap();
    assert_eq!(map.add("k", 2), Err(CollectionError::DuplicateKey));
    assert_eq!(map.get("k"), Some(&1), "Rejected add must not overwrite");
}

#[test]
fn test_map_get_or_default_on_miss() {
    let mut map: PersistentMap<String, f32> = PersistentMap::new();
    map.insert("speed".into(), 3.5);
    assert_eq!(map.get_or_default("speed"), 3.5);
    assert_eq!(map.get_or_default("missing"), 0.0);
    assert_eq!(map.get("missing"), None);
}

#[test]
fn test_map_remove_and_contains() {
    let mut map: PersistentMap<u32, &str> = [(1, "a"), (2, "b")].into_iter().collect();

    assert!(map.contains_key(&1));
    assert!(map.contains_entry(&2, &"b"));
    assert!(!map.contains_entry(&2, &"z"));

    assert!(!map.remove_entry_if_matches(&2, &"z"));
    assert!(map.remove_entry_if_matches(&2, &"b"));
    assert_eq!(map.remove(&1), Some("a"));
    assert_eq!(map.remove(&1), None);
    assert!(map.is_empty());
}

#[test]
fn test_map_views_and_iteration() {
    let mut map: PersistentMap<u32, u32> = (0..5).map(|i| (i, i * 10)).collect();
    for value in map.values_mut() {
        *value += 1;
    }

    let mut keys: Vec<_> = map.keys().copied().collect();
    keys.sort();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);

    let total: u32 = map.values().sum();
    assert_eq!(total, 105);

    let pairs = (&map).into_iter().filter(|(k, v)| **v == **k * 10 + 1).count();
    assert_eq!(pairs, 5);

    map.clear();
    assert_eq!(map.len(), 0);
}

#[test]
fn test_map_flatten_matches_table() {
    let map: PersistentMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let record = map.flatten();

    assert_eq!(record.len(), 3);
    for entry in &record {
        let key = entry.key.unwrap();
        assert_eq!(map.get(key), Some(&entry.value));
    }
    assert_eq!(map.len(), 3, "Flatten must not touch the table");
}

#[test]
fn test_map_rehydrate_first_occurrence_wins() {
    let mut map = PersistentMap::new();
    map.insert("stale", 0);

    map.rehydrate(vec![
        MapEntry::new("k", 1),
        MapEntry::new("k", 2),
        MapEntry::new("k2", 3),
    ]);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("k"), Some(&1));
    assert_eq!(map.get("k2"), Some(&3));
    assert!(!map.contains_key("stale"), "Rehydrate replaces prior contents");
}

#[test]
fn test_map_rehydrate_drops_keyless_entries() {
    let map = PersistentMap::from_record(vec![
        MapEntry { key: None, value: 9 },
        MapEntry::new(1u8, 1),
    ]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some(&1));
}

#[test]
fn test_map_native_conversions_copy() {
    let mut native = HashMap::new();
    native.insert("a".to_string(), 1);
    native.insert("b".to_string(), 2);

    let mut map = PersistentMap::from_native(&native);
    assert_eq!(map.len(), 2);

    map.insert("c".to_string(), 3);
    assert_eq!(native.len(), 2, "Source map is independent");

    let mut copy = map.to_native();
    copy.remove("a");
    assert!(map.contains_key("a"), "Native copy is independent");
}

// ============================================================================
// OrderedSet
// ============================================================================

#[test]
fn test_set_add_is_unique() {
    let mut set = OrderedSet::new();
    assert!(set.add(3));
    assert!(!set.add(3));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_set_add_at_inserts_at_position() {
    let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();

    assert_eq!(set.add_at(9, 1), Ok(true));
    assert_eq!(set.get(1), Ok(&9));
    assert_eq!(set.items(), &[1, 9, 2, 3]);

    // Appending at len is allowed
    assert_eq!(set.add_at(10, 4), Ok(true));
    assert_eq!(set.items().last(), Some(&10));
}

#[test]
fn test_set_add_at_checks_duplicate_before_bounds() {
    let mut set: OrderedSet<i32> = [1, 2].into_iter().collect();

    assert_eq!(set.add_at(1, 99), Ok(false));
    assert_eq!(
        set.add_at(5, 3),
        Err(CollectionError::IndexOutOfRange { index: 3, len: 2 })
    );
    assert_eq!(set.items(), &[1, 2]);
}

#[test]
fn test_set_positional_set_rejects_duplicates() {
    let mut set: OrderedSet<&str> = ["a", "b", "c"].into_iter().collect();

    assert_eq!(set.set(0, "c"), Err(CollectionError::DuplicateValue));
    assert_eq!(set.items(), &["a", "b", "c"], "Rejected set leaves the set unchanged");

    // Re-assigning the same value to its own slot is fine
    assert_eq!(set.set(1, "b"), Ok("b"));
    assert_eq!(set.set(1, "z"), Ok("b"));
    assert_eq!(set.items(), &["a", "z", "c"]);
}

#[test]
fn test_set_positional_bounds() {
    let mut set: OrderedSet<u8> = [1].into_iter().collect();
    assert!(matches!(set.get(1), Err(CollectionError::IndexOutOfRange { index: 1, len: 1 })));
    assert!(set.set(1, 5).is_err());
}

#[test]
fn test_set_remove_and_remove_all() {
    let mut set: OrderedSet<i32> = (1..=10).collect();

    assert!(set.remove(&5));
    assert!(!set.remove(&5));

    let removed = set.remove_all(|v| v % 2 == 0);
    assert_eq!(removed, 5);
    assert!(!set.iter().any(|v| v % 2 == 0));
    assert_eq!(set.items(), &[1, 3, 7, 9]);
}

#[test]
fn test_set_find_and_contains() {
    let set: OrderedSet<f32> = [0.5, 1.5, 2.5].into_iter().collect();
    assert_eq!(set.find(|v| *v > 1.0), Some(&1.5));
    assert_eq!(set.find(|v| *v > 10.0), None);
    assert!(set.contains(&2.5));
}

#[test]
fn test_set_from_iter_drops_later_duplicates() {
    let set: OrderedSet<i32> = [3, 1, 3, 2, 1].into_iter().collect();
    assert_eq!(set.to_vec(), vec![3, 1, 2]);
}

#[test]
fn test_set_rehydrate_restores_uniqueness() {
    let mut set: OrderedSet<i32> = [7].into_iter().collect();
    set.rehydrate(vec![4, 4, 5, 4, 6]);
    assert_eq!(set.items(), &[4, 5, 6]);
    assert_eq!(set.flatten(), vec![4, 5, 6]);
}

#[test]
fn test_set_native_conversions() {
    let native: HashSet<u32> = [1, 2, 3].into_iter().collect();
    let set = OrderedSet::from_native(&native);
    assert_eq!(set.len(), 3);

    let back = set.to_native();
    assert_eq!(back.len(), 3);
    assert!(back.contains(&2));
}
