//! Isolation scenarios
//!
//! Read-your-writes, snapshot isolation by read timestamp, commit
//! finalization and rollback erasure, with several transactions in flight.

use crate::common::*;

#[test]
fn read_your_writes_regardless_of_committed_versions() {
    let (db, table) = db_with_table();
    for (i, t) in [3u64, 7, 11].iter().enumerate() {
        table.insert(key("k"), int(i as i64), ts(*t), true).unwrap();
    }

    let txn = db.begin_transaction(ts(11));
    table.update_txn(&*txn, key("k"), int(100), false).unwrap();
    assert_eq!(read(&table, &txn, &key("k")), int(100));
    table.update_txn(&*txn, key("k"), int(200), false).unwrap();
    assert_eq!(read(&table, &txn, &key("k")), int(200));
    assert_eq!(txn.write_set_len(), 1);
}

#[test]
fn snapshot_isolation_by_read_timestamp() {
    let (db, table) = db_with_table();
    table.insert(key("a"), int(1), ts(10), true).unwrap();
    table.insert(key("b"), int(2), ts(30), true).unwrap();

    let txn = db.begin_transaction(ts(20));
    assert_eq!(read(&table, &txn, &key("a")), int(1));
    assert_eq!(read(&table, &txn, &key("b")), NONE);

    // A later commit by someone else stays invisible
    db.transaction(latest(), ts(15), |other| {
        table.update_txn(&**other, key("a"), int(5), false)
    })
    .unwrap();
    assert_eq!(read(&table, &txn, &key("a")), int(1));
}

#[test]
fn commit_finalizes_what_the_transaction_saw() {
    let (db, table) = db_with_table();
    table.insert(key("x"), int(1), ts(1), true).unwrap();

    let txn = db.begin_latest();
    table.update_txn(&*txn, key("x"), int(2), false).unwrap();
    table.insert_txn(&*txn, key("y"), int(3), false).unwrap();
    table.remove_txn(&*txn, &key("y")).unwrap();

    let keys = [key("x"), key("y")];
    let before: Vec<_> = keys.iter().map(|k| read(&table, &txn, k)).collect();
    txn.commit_at(ts(50)).unwrap();
    let after: Vec<_> = keys.iter().map(|k| table.get(k, ts(50))).collect();
    assert_eq!(before, after);
    assert_eq!(after, vec![int(2), NONE]);
}

#[test]
fn rollback_restores_other_committed_versions() {
    let (db, table) = db_with_table();
    table.insert(key("x"), int(1), ts(1), true).unwrap();

    let winner = db.begin_latest();
    let loser = db.begin_latest();
    table.insert_txn(&*winner, key("w"), int(10), false).unwrap();
    table.update_txn(&*loser, key("x"), int(99), false).unwrap();
    table.insert_txn(&*loser, key("z"), int(98), false).unwrap();

    loser.rollback().unwrap();
    winner.commit_at(ts(5)).unwrap();

    assert_eq!(table.get(&key("x"), latest()), int(1));
    assert_eq!(table.get(&key("z"), latest()), NONE);
    assert_eq!(table.get(&key("w"), latest()), int(10));
    table
        .verify(vec![(key("w"), int(10)), (key("x"), int(1))])
        .unwrap();
}

#[test]
fn concurrent_writer_blocked_until_reset() {
    let (db, table) = db_with_table();
    let t1 = db.begin_latest();
    let t2 = db.begin_latest();

    table.insert_txn(&*t1, key("k"), int(1), false).unwrap();
    let err = table.insert_txn(&*t2, key("k"), int(2), true).unwrap_err();
    assert!(err.is_conflict(ConflictKind::WriteConflict));

    t1.commit_at(ts(4)).unwrap();
    assert!(table
        .update_txn(&*t2, key("k"), int(2), false)
        .unwrap_err()
        .is_conflict(ConflictKind::WriteConflict));

    t2.reset_snapshot().unwrap();
    table.update_txn(&*t2, key("k"), int(2), false).unwrap();
    t2.commit_at(ts(6)).unwrap();
    assert_eq!(table.get(&key("k"), ts(5)), int(1));
    assert_eq!(table.get(&key("k"), ts(6)), int(2));
}
