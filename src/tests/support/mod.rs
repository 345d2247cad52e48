//! Shared helpers for map tests.

use std::ops::ControlFlow;

use rand::Rng;

use crate::hash::Hash;
use crate::txmap::{Engine, ErrorKind, TxMap};

/// Hash with the given leading bytes, zero-filled after.
pub fn h(prefix: &[u8]) -> Hash {
    Hash::from_prefix(prefix)
}

/// `n` distinct random hashes.
pub fn random_hashes(n: usize) -> Vec<Hash> {
    let mut rng = rand::thread_rng();
    let mut seen = std::collections::HashSet::with_capacity(n);
    while seen.len() < n {
        seen.insert(Hash::new(rng.gen::<[u8; 32]>()));
    }
    seen.into_iter().collect()
}

/// Counts entries visited by `iter`.
pub fn count_iter(m: &dyn TxMap) -> usize {
    let mut n = 0;
    m.iter(&mut |_, _| {
        n += 1;
        ControlFlow::Continue(())
    });
    n
}

/// Exercises the basic put/get/exists/keys/delete contract on an empty map.
pub fn assert_tx_map(m: &dyn TxMap) {
    m.put(h(&[0x00, 0x01]), 1).unwrap();
    assert!(m.exists(&h(&[0x00, 0x01])));
    assert_eq!(m.get(&h(&[0x00, 0x01])), Some(1));
    assert!(!m.exists(&h(&[0x01, 0x01])));
    assert_eq!(m.length(), 1);

    m.put_multi(&[h(&[0x02, 0x01]), h(&[0x03, 0x01]), h(&[0x04, 0x01])], 2)
        .unwrap();
    assert!(m.exists(&h(&[0x02, 0x01])));
    assert!(m.exists(&h(&[0x03, 0x01])));
    assert!(m.exists(&h(&[0x04, 0x01])));

    let keys = m.keys();
    assert_eq!(keys.len(), 4);
    for prefix in [[0x00, 0x01], [0x02, 0x01], [0x03, 0x01], [0x04, 0x01]] {
        assert!(keys.contains(&h(&prefix)), "missing key {:?}", prefix);
    }

    assert_eq!(m.get(&h(&[0x02, 0x01])), Some(2));
    assert_eq!(m.get(&h(&[0x03, 0x01])), Some(2));
    assert_eq!(m.get(&h(&[0x04, 0x01])), Some(2));
    assert_eq!(m.length(), 4);
    assert_eq!(count_iter(m), 4);

    m.delete(&h(&[0x02, 0x01])).unwrap();
    assert!(!m.exists(&h(&[0x02, 0x01])));
    assert_eq!(m.length(), 3);

    let err = m.delete(&h(&[0x02, 0x01])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashDoesNotExist);
    assert_eq!(m.length(), 3);
}

/// Exercises the update operations on an empty map.
pub fn assert_tx_map_updates(m: &dyn TxMap) {
    let a = h(&[0x10, 0x01]);
    let b = h(&[0x20, 0x02]);

    let err = m.set(a, 5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashDoesNotExist);
    assert!(!m.exists(&a));

    assert!(!m.set_if_exists(a, 5));
    assert!(!m.exists(&a));

    assert!(m.set_if_not_exists(a, 5));
    assert_eq!(m.get(&a), Some(5));
    assert!(!m.set_if_not_exists(a, 6));
    assert_eq!(m.get(&a), Some(5));

    assert!(m.set_if_exists(a, 7));
    assert_eq!(m.get(&a), Some(7));

    m.set(a, 8).unwrap();
    assert_eq!(m.get(&a), Some(8));

    m.put(b, 1).unwrap();
    let err = m.put(b, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HashAlreadyExists);
    assert_eq!(m.get(&b), Some(1));
    assert_eq!(m.length(), 2);
}

/// Linear-scan table used to check that maps only rely on the engine contract.
pub struct VecEngine<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for VecEngine<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> Engine<K, V> for VecEngine<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.swap_remove(idx).1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}
