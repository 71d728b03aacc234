use std::path::PathBuf;

use persisted_collections::collections::{Grid, PersistentMap, PersistentQueue};
use persisted_collections::storage::{self, PersistError, PersistFormat};

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("persisted_collections_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn test_save_and_load_files() {
    let mut grid = Grid::<i16>::new(16, 16).unwrap();
    grid.set(15, 0, -1).unwrap();

    for (format, name) in [(PersistFormat::Ron, "grid.ron"), (PersistFormat::Bincode, "grid.bin")] {
        let path = scratch_path(name);
        storage::save(&path, &grid, format).unwrap();
        let loaded: Grid<i16> = storage::load(&path, format).unwrap();
        assert_eq!(loaded, grid, "{:?} file round trip", format);
        std::fs::remove_file(&path).unwrap();
    }
}

#[test]
fn test_ron_file_is_human_editable() {
    let path = scratch_path("queue.ron");
    let queue: PersistentQueue<u32> = [1, 2, 3].into_iter().collect();
    storage::save(&path, &queue, PersistFormat::Ron).unwrap();

    // Hand-edit the saved list: drop the head, append a repeat
    std::fs::write(&path, "[2, 3, 3]").unwrap();
    let mut loaded: PersistentQueue<u32> = storage::load(&path, PersistFormat::Ron).unwrap();

    assert_eq!(loaded.len(), 3);
    assert!(loaded.is_in_sync());
    assert_eq!(loaded.dequeue(), Some(2));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let path = scratch_path("does_not_exist.bin");
    let result: Result<PersistentMap<String, u8>, _> = storage::load(&path, PersistFormat::Bincode);
    assert!(matches!(result, Err(PersistError::Io(_))));
}
