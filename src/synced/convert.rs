//! Conversions from concurrent maps to flat vectors.

use std::hash::Hash;

use dashmap::DashMap;

use super::SyncedMap;

/// Collects the keys of a concurrent map into a vector.
/// The flag reports whether the map had any entries.
pub fn convert_dashmap_to_u32_vec<V>(m: &DashMap<u32, V>) -> (Vec<u32>, bool) {
    let keys: Vec<u32> = m.iter().map(|entry| *entry.key()).collect();
    let has_any = !keys.is_empty();
    (keys, has_any)
}

/// Flattens the values of a synced map into one vector.
/// The flag reports whether the map had any entries.
pub fn convert_synced_map_to_u32_vec<K>(m: &SyncedMap<K, Vec<u32>>) -> (Vec<u32>, bool)
where
    K: Eq + Hash,
{
    let mut out = Vec::new();
    let mut has_any = false;
    m.iterate(|_, values| {
        has_any = true;
        out.extend_from_slice(values);
        true
    });
    (out, has_any)
}
