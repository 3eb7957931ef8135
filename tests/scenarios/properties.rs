//! Property-based scenarios
//!
//! Each written value encodes the timestamp it was committed at, so a read
//! can be checked against the read timestamp that produced it.

use crate::common::*;
use proptest::prelude::*;

fn encode(commit: u64, seq: usize) -> DataValue {
    int((commit as i64) * 1000 + seq as i64)
}

fn commit_of(value: &DataValue) -> u64 {
    match value {
        DataValue::Int(v) => (*v / 1000) as u64,
        other => panic!("unexpected value {}", other),
    }
}

proptest! {
    /// A transaction with read timestamp R never sees a commit after R
    #[test]
    fn prop_snapshot_never_sees_future_commits(
        writes in prop::collection::vec((0usize..4, 1u64..60), 1..30),
        read_ts in 1u64..60,
    ) {
        let (db, table) = db_with_table();
        let keys = ["a", "b", "c", "d"];
        for (seq, (k, commit)) in writes.iter().enumerate() {
            db.transaction(latest(), ts(*commit), |txn| {
                table.insert_txn(&**txn, key(keys[*k]), encode(*commit, seq), true)
            })
            .unwrap();
        }

        let reader = db.begin_transaction(ts(read_ts));
        for k in keys {
            let value = read(&table, &reader, &key(k));
            if !value.is_none() {
                prop_assert!(commit_of(&value) <= read_ts);
            }
            prop_assert_eq!(value, table.get(&key(k), ts(read_ts)));
        }
    }

    /// Interleaved transactions: rolled-back ones leave no trace
    #[test]
    fn prop_rollback_leaves_no_trace(
        plan in prop::collection::vec((0usize..4, any::<bool>()), 1..25),
    ) {
        let (db, table) = db_with_table();
        let keys = ["a", "b", "c", "d"];
        let mut expected: [Option<DataValue>; 4] = Default::default();

        for (seq, (k, keep)) in plan.iter().enumerate() {
            let commit = seq as u64 + 1;
            let value = encode(commit, seq);
            let txn = db.begin_latest();
            table.insert_txn(&*txn, key(keys[*k]), value.clone(), true).unwrap();
            if *keep {
                txn.commit_at(ts(commit)).unwrap();
                expected[*k] = Some(value);
            } else {
                txn.rollback().unwrap();
            }
        }

        for (i, k) in keys.iter().enumerate() {
            let want = expected[i].clone().unwrap_or(NONE);
            prop_assert_eq!(table.get(&key(k), latest()), want);
        }
        prop_assert_eq!(db.transaction_manager().active_count(), 0);
    }
}
