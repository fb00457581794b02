#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod cfg;

/// Construction parameters and resize thresholds.
pub mod config;

/// The crate's error type.
pub mod error;

/// A key-value map over the open-addressing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and compares
/// entries by key alone.
pub mod hash_map;

pub mod hash_table;

/// A hash set over the open-addressing table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a set interface with configurable hashers.
pub mod hash_set;

/// Hasher builders: a deterministic identity hasher and the default.
pub mod hasher;

pub mod prime;

pub mod probe;

pub mod slot;

pub use config::TableConfig;
pub use error::Error;
pub use error::Result;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hasher::DefaultHashBuilder;
pub use hasher::IdentityBuildHasher;
pub use hasher::IdentityHasher;
pub use probe::ProbeStrategy;
pub use slot::Slot;
pub use slot::Status;
