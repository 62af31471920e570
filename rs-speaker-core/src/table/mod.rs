//! Open-addressing hash table used to store n-gram counts.
//!
//! - String keys, `usize` values, configurable default value on miss
//! - Linear probing with tombstones
//! - Synchronous growth when the load factor is exceeded

/// The table itself, its iterator and the polynomial string hash.
pub mod hash_table;

/// Construction parameters and their defaults.
pub mod config;

/// Three-state slot (`Empty`, `Tombstone`, `Occupied`).
///
/// Not exposed
mod slot;
