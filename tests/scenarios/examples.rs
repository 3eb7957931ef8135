//! Worked examples
//!
//! The two canonical walkthroughs of the model: a timestamped insert/remove
//! sequence and a single transaction committed at a later timestamp.

use crate::common::*;

#[test]
fn timestamped_insert_conflict_and_tombstone() {
    let (_db, table) = db_with_table();

    table.insert(key("a"), int(1), ts(5), true).unwrap();
    let err = table.insert(key("a"), int(2), ts(5), false).unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateKey));
    assert_eq!(table.get(&key("a"), ts(5)), int(1));

    table.remove(&key("a"), ts(10)).unwrap();
    assert_eq!(table.get(&key("a"), ts(10)), NONE);
    assert_eq!(table.get(&key("a"), ts(5)), int(1));
}

#[test]
fn transaction_commit_at_later_timestamp() {
    let (db, table) = db_with_table();

    let t1 = db.begin_latest();
    table.insert_txn(&*t1, key("b"), int(9), false).unwrap();
    assert_eq!(read(&table, &t1, &key("b")), int(9));
    assert_eq!(table.get(&key("b"), latest()), NONE);

    t1.set_timestamp(ts(20)).unwrap();
    t1.commit().unwrap();
    assert_eq!(table.get(&key("b"), ts(20)), int(9));
    assert_eq!(table.get(&key("b"), ts(19)), NONE);
}

#[test]
fn engine_scan_matches_after_examples() {
    let (db, table) = db_with_table();

    table.insert(key("a"), int(1), ts(5), true).unwrap();
    table.remove(&key("a"), ts(10)).unwrap();
    let t1 = db.begin_latest();
    table.insert_txn(&*t1, key("b"), int(9), false).unwrap();
    t1.commit_at(ts(20)).unwrap();

    table.verify(vec![(key("b"), int(9))]).unwrap();

    let mut cursor = table.verify_cursor();
    assert!(cursor.has_next());
    assert!(cursor.verify_next(&key("b"), &int(9)));
    assert!(!cursor.has_next());
}
