//! Crate-level scenario tests.
//!
//! These drive the maps from many threads at once and check what must hold
//! once the writers are done.


pub mod support;
