use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Debug;

use crate::error::Error;
use crate::hashing_strategy::Occupancy;
use crate::progress::ProgressObserver;
use crate::scalar::Scalar;
use crate::scalar::Sentinels;

cfg_if::cfg_if! {
    if #[cfg(feature = "occupancy-ninety")] {
        pub(crate) const DEFAULT_MAXIMUM_OCCUPANCY: u8 = 90;
    } else if #[cfg(feature = "occupancy-eighty")] {
        pub(crate) const DEFAULT_MAXIMUM_OCCUPANCY: u8 = 80;
    } else {
        pub(crate) const DEFAULT_MAXIMUM_OCCUPANCY: u8 = 70;
    }
}

/// Element estimate used when no initial capacity is configured.
pub const DEFAULT_INITIAL_CAPACITY: usize = 2_048;

/// Tables holding more live entries than this report rehash progress.
pub const DEFAULT_LARGE_REHASH_THRESHOLD: usize = 10_000_000;

/// Construction parameters for a [`PrimitiveMap`] or [`PrimitiveSet`].
///
/// Every setter consumes and returns the config. Nothing is validated until
/// the table is built, at which point sentinel collisions and out-of-range
/// occupancies are reported as an [`Error`].
///
/// # Examples
///
/// ```rust
/// use primap::Error;
/// use primap::PrimitiveMap;
/// use primap::TableConfig;
///
/// let config = TableConfig::<i32, i8>::new()
///     .name("speed-limits")
///     .initial_capacity(100)
///     .maximum_occupancy(80)
///     .null_key(-1)
///     .tombstone_key(-2);
/// let map = PrimitiveMap::with_config(config).unwrap();
/// assert!(map.capacity() >= 100);
///
/// let clash = TableConfig::<i32, i8>::new().null_key(5).tombstone_key(5);
/// assert_eq!(
///     PrimitiveMap::with_config(clash).unwrap_err(),
///     Error::SentinelCollision(5)
/// );
/// ```
///
/// [`PrimitiveMap`]: crate::hash_map::PrimitiveMap
/// [`PrimitiveSet`]: crate::hash_set::PrimitiveSet
#[derive(Clone)]
pub struct TableConfig<K, V> {
    pub(crate) name: String,
    pub(crate) initial_capacity: usize,
    pub(crate) maximum_occupancy: u8,
    pub(crate) null_key: K,
    pub(crate) tombstone_key: K,
    pub(crate) null_value: V,
    pub(crate) large_rehash_threshold: usize,
    pub(crate) progress: Option<Arc<dyn ProgressObserver>>,
}

impl<K: Debug, V: Debug> Debug for TableConfig<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableConfig")
            .field("name", &self.name)
            .field("initial_capacity", &self.initial_capacity)
            .field("maximum_occupancy", &self.maximum_occupancy)
            .field("null_key", &self.null_key)
            .field("tombstone_key", &self.tombstone_key)
            .field("null_value", &self.null_value)
            .field("large_rehash_threshold", &self.large_rehash_threshold)
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}

impl<K: Scalar, V: Default> Default for TableConfig<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Scalar, V: Default> TableConfig<K, V> {
    /// Creates a config with the default sentinels (null `0`, tombstone
    /// `MIN + 1`), a null value of zero and the default occupancy.
    pub fn new() -> Self {
        let sentinels = Sentinels::<K>::default();
        Self {
            name: String::from("primitive-table"),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            maximum_occupancy: DEFAULT_MAXIMUM_OCCUPANCY,
            null_key: sentinels.null(),
            tombstone_key: sentinels.tombstone(),
            null_value: V::default(),
            large_rehash_threshold: DEFAULT_LARGE_REHASH_THRESHOLD,
            progress: None,
        }
    }
}

impl<K: Scalar, V> TableConfig<K, V> {
    /// Name used when logging about the table.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Estimated number of slots to start with.
    pub fn initial_capacity(mut self, estimate: usize) -> Self {
        self.initial_capacity = estimate;
        self
    }

    /// Maximum occupancy in percent, `1..=100`.
    pub fn maximum_occupancy(mut self, percent: u8) -> Self {
        self.maximum_occupancy = percent;
        self
    }

    /// Key marking never-used slots, also returned by lookups that miss.
    pub fn null_key(mut self, key: K) -> Self {
        self.null_key = key;
        self
    }

    /// Key marking deleted slots.
    pub fn tombstone_key(mut self, key: K) -> Self {
        self.tombstone_key = key;
        self
    }

    /// Value returned by lookups that miss. It may not be stored.
    pub fn null_value(mut self, value: V) -> Self {
        self.null_value = value;
        self
    }

    /// Live-entry count above which rehashes report progress.
    pub fn large_rehash_threshold(mut self, entries: usize) -> Self {
        self.large_rehash_threshold = entries;
        self
    }

    /// Observer receiving progress of large rehashes. Without one, large
    /// rehashes are reported through [`LogProgress`](crate::progress::LogProgress).
    pub fn progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    pub(crate) fn validate(&self) -> Result<(Sentinels<K>, Occupancy), Error> {
        let sentinels = Sentinels::new(self.null_key, self.tombstone_key)?;
        let occupancy = Occupancy::new(self.maximum_occupancy)?;
        Ok((sentinels, occupancy))
    }
}
