//! Non-sharded synchronized containers.

pub mod convert;
pub mod map;
pub mod slice;


pub use convert::{convert_dashmap_to_u32_vec, convert_synced_map_to_u32_vec};
pub use map::SyncedMap;
pub use slice::SyncedSlice;
