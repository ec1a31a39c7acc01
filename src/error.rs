//! Error types for the `primap` crate

/// Errors raised while configuring or mutating a primitive table.
///
/// Scalars are reported widened to `i64` regardless of the table's key and
/// value widths.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The null sentinel and the tombstone sentinel are the same scalar.
    ///
    /// A table configured this way could not tell a never-used slot from a
    /// deleted one, so this is rejected when the sentinels are built.
    #[error("null and tombstone sentinels must differ, both are {0}")]
    SentinelCollision(i64),

    /// A key equal to one of the table's key sentinels was offered.
    #[error("key {0} is reserved as a null or tombstone sentinel")]
    ReservedKey(i64),

    /// A map value equal to the map's null value was offered.
    #[error("value {0} is reserved as the null value")]
    ReservedValue(i64),

    /// The maximum occupancy is not within `1..=100` percent.
    #[error("maximum occupancy must be within 1..=100 percent, got {0}")]
    InvalidOccupancy(u8),

    /// The table has been frozen into a sorted array and can no longer be
    /// modified.
    #[error("table is frozen and can no longer be modified")]
    Frozen,

    /// A widened scalar does not fit into the table's narrower width.
    #[error("scalar {value} does not fit in {bits} bits")]
    OutOfRange {
        /// The offending widened value.
        value: i64,
        /// The bit width of the destination type.
        bits: u32,
    },
}
