#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compress;

/// Per-table construction parameters.
///
/// This module provides the [`TableConfig`](config::TableConfig) builder and
/// the crate-wide defaults it starts from.
pub mod config;

pub mod error;

/// A primitive map over the shared probe table.
///
/// This module provides `PrimitiveMap`, a key-value map over the open-addressing
/// `PrimitiveTable`, along with aliases for common width combinations.
pub mod hash_map;

/// A primitive set over the shared probe table.
pub mod hash_set;

/// The open-addressing engine shared by maps and sets.
pub mod hash_table;

/// Capacity and occupancy policy.
pub mod hashing_strategy;

pub mod progress;

/// Integer widths that can be stored in a table, and their sentinels.
pub mod scalar;

pub mod scalar_map;

pub use compress::Compressible;
pub use compress::Method;
pub use config::TableConfig;
pub use error::Error;
pub use hash_map::IntToByteMap;
pub use hash_map::IntToIntMap;
pub use hash_map::LongToIntMap;
pub use hash_map::LongToLongMap;
pub use hash_map::PrimitiveMap;
pub use hash_set::IntSet;
pub use hash_set::LongSet;
pub use hash_set::PrimitiveSet;
pub use hash_table::PrimitiveTable;
pub use hashing_strategy::HashingStrategy;
pub use scalar::Scalar;
pub use scalar_map::PrimitiveScalarMap;
