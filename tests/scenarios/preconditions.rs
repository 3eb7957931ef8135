//! Precondition and tombstone scenarios, plus config-driven behaviour.

use crate::common::*;
use kvmodel::{ErrorCode, ModelConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn insert_requires_absent_key() {
    let (_db, table) = db_with_table();
    table.insert(key("k"), int(1), ts(1), false).unwrap();
    assert_eq!(
        table.insert(key("k"), int(2), ts(2), false).unwrap_err().code(),
        ErrorCode::Conflict(ConflictKind::DuplicateKey)
    );
    table.insert(key("k"), int(2), ts(2), true).unwrap();
    assert_eq!(table.get(&key("k"), ts(2)), int(2));
}

#[test]
fn update_requires_live_key() {
    let (_db, table) = db_with_table();
    assert_eq!(
        table.update(key("k"), int(1), ts(1), false).unwrap_err().code(),
        ErrorCode::Conflict(ConflictKind::KeyMissing)
    );
    // A failed first write leaves no chain behind
    assert!(table.is_empty());
    table.update(key("k"), int(1), ts(1), true).unwrap();
    table.update(key("k"), int(2), ts(2), false).unwrap();
}

#[test]
fn none_value_is_not_a_delete() {
    let (db, table) = db_with_table();
    table.insert(key("k"), int(1), ts(1), false).unwrap();
    assert_eq!(
        table.insert(key("k"), NONE, ts(2), true).unwrap_err().code(),
        ErrorCode::InvalidOperation
    );
    let txn = db.begin_latest();
    assert_eq!(
        table.update_txn(&*txn, key("k"), NONE, false).unwrap_err().code(),
        ErrorCode::InvalidOperation
    );
    assert_eq!(txn.write_set_len(), 0);
    assert_eq!(table.get(&key("k"), latest()), int(1));

    table.remove(&key("k"), ts(3)).unwrap();
    assert_eq!(table.get(&key("k"), latest()), NONE);
}

#[test]
fn tombstone_hides_until_rewritten() {
    let (_db, table) = db_with_table();
    table.insert(key("k"), int(1), ts(1), true).unwrap();
    table.remove(&key("k"), ts(3)).unwrap();
    for t in 3..8 {
        assert_eq!(table.get(&key("k"), ts(t)), NONE);
    }
    assert_eq!(table.remove(&key("k"), ts(8)), Err(ModelError::NotFound));

    table.insert(key("k"), int(2), ts(8), false).unwrap();
    assert_eq!(table.get(&key("k"), ts(7)), NONE);
    assert_eq!(table.get(&key("k"), ts(8)), int(2));
}

#[test]
fn transactional_remove_of_missing_key_is_not_found() {
    let (db, table) = db_with_table();
    let txn = db.begin_latest();
    assert_eq!(
        table.remove_txn(&*txn, &key("ghost")).unwrap_err().code(),
        ErrorCode::NotFound
    );
    assert_eq!(txn.write_set_len(), 0);
}

#[test]
fn config_file_drives_database() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "write_conflicts = false\non_misuse = \"error\"\n").unwrap();

    let db = KvDatabase::with_config(ModelConfig::from_file(&path).unwrap());
    let table = db.create_table("loose").unwrap();
    let t1 = db.begin_latest();
    let t2 = db.begin_latest();
    table.insert_txn(&*t1, key("k"), int(1), true).unwrap();
    table.insert_txn(&*t2, key("k"), int(2), true).unwrap();

    t1.commit_at(ts(1)).unwrap();
    t2.commit_at(ts(2)).unwrap();
    assert_eq!(table.get(&key("k"), latest()), int(2));

    assert!(matches!(t1.commit(), Err(ModelError::InvalidState(_))));
}
