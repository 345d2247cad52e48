//! Tests for the unsynchronized numeric maps.
//!
//! These maps are unsynchronized, not lock-free: the tests only share them
//! across threads in the two ways the borrow checker allows, read-only after
//! population, or writers owning disjoint buckets.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use crate::config;
    use crate::support::VecEngine;
    use crate::txmap::{ErrorKind, SingleWriterMap, SplitSingleWriterMap, TxMapError};

    #[test]
    fn test_single_writer_map() {
        let mut m: SingleWriterMap = SingleWriterMap::new(100);
        m.put(1, 1).unwrap();

        assert!(m.exists(1));
        assert_eq!(m.get(1), Some(1));
        assert!(!m.exists(2));
        assert_eq!(m.length(), 1);
        assert_eq!(m.map().len(), 1);
    }

    #[test]
    fn test_single_writer_map_get_value() {
        let mut m: SingleWriterMap = SingleWriterMap::new(10);
        m.put(1, 5).unwrap();
        assert_eq!(m.get(1), Some(5));
        // missing keys report no value
        assert_eq!(m.get(2), None);
    }

    #[test]
    fn test_single_writer_map_duplicate_put() {
        let mut m: SingleWriterMap<VecEngine<u64, u64>> = SingleWriterMap::new(10);
        m.put(7, 1).unwrap();
        let err = m.put(7, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HashAlreadyExists);
        assert_eq!(m.get(7), Some(1));
        assert_eq!(m.length(), 1);
    }

    #[test]
    fn test_split_single_writer_map() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::new(100);
        assert_eq!(m.buckets(), 1024);
        assert_eq!(m.map().len(), 1025);

        m.put(1, 1).unwrap();
        assert!(m.exists(1));
        assert_eq!(m.get(1), Some(1));
        assert!(!m.exists(2));
        assert_eq!(m.length(), 1);

        assert_eq!(m.put(1, 9).unwrap_err().kind(), ErrorKind::HashAlreadyExists);
        assert_eq!(m.length(), 1);
    }

    #[test]
    fn test_split_single_writer_map_routing() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(100, 10);
        for key in 0..100u64 {
            m.put(key, key * 2).unwrap();
        }
        assert_eq!(m.length(), 100);
        for (idx, shard) in m.map().iter().enumerate() {
            let expected = if idx < 10 { 10 } else { 0 };
            assert_eq!(shard.length(), expected, "bucket {idx}");
        }
        assert_eq!(m.bucket_for(1234), 4);
        assert_eq!(m.get(42), Some(84));
    }

    #[test]
    fn test_split_single_writer_map_from_config() {
        let cfg = config::new_test_config();
        let m: SplitSingleWriterMap = SplitSingleWriterMap::from_config(cfg.single_writer());
        assert_eq!(m.buckets(), 32);

        let m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(10, 0);
        assert_eq!(m.buckets(), 1);
    }

    #[test]
    fn test_split_single_writer_map_populate_then_read_concurrently() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(10_000, 64);
        for key in 0..10_000u64 {
            m.put(key, key + 1).unwrap();
        }

        let m = Arc::new(m);
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let m = Arc::clone(&m);
                thread::spawn(move || {
                    for key in (t..10_000).step_by(4) {
                        assert!(m.exists(key));
                        assert_eq!(m.get(key), Some(key + 1));
                    }
                    assert!(!m.exists(10_000 + t));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(m.length(), 10_000);
    }

    #[test]
    fn test_split_single_writer_map_disjoint_bucket_writers() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(8_000, 8);
        let buckets = m.buckets();

        thread::scope(|s| {
            for mut writer in m.buckets_mut() {
                s.spawn(move || {
                    // each writer owns one bucket and only puts keys routed to it
                    let mut key = writer.bucket();
                    while key < 8_000 {
                        writer.put(key, key).unwrap();
                        key += buckets;
                    }
                });
            }
        });

        assert_eq!(m.length(), 8_000);
        assert_eq!(m.map()[8].length(), 0);
        for key in 0..8_000u64 {
            assert_eq!(m.get(key), Some(key));
        }
    }

    #[test]
    fn test_bucket_writers_cover_routed_buckets_only() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(100, 4);
        let writers = m.buckets_mut();
        assert_eq!(writers.len(), 4);
        let owned: Vec<u64> = writers.iter().map(|w| w.bucket()).collect();
        assert_eq!(owned, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bucket_writer_rejects_keys_routed_elsewhere() {
        let mut m: SplitSingleWriterMap = SplitSingleWriterMap::with_buckets(100, 4);
        {
            let mut writers = m.buckets_mut();
            let writer = &mut writers[1];
            assert!(writer.owns(5));
            assert!(!writer.owns(6));

            let err = writer.put(6, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::KeyNotInBucket);
            assert_eq!(err, TxMapError::KeyNotInBucket { key: 6, bucket: 1, routed: 2 });

            writer.put(5, 1).unwrap();
            assert_eq!(writer.length(), 1);
            assert_eq!(writer.put(5, 2).unwrap_err().kind(), ErrorKind::HashAlreadyExists);
        }

        // the rejected key never reached any bucket
        assert!(!m.exists(6));
        assert_eq!(m.get(5), Some(1));
        assert_eq!(m.length(), 1);
    }
}
