use core::fmt::Debug;

use crate::compress::Compressible;
use crate::compress::Method;
use crate::config::DEFAULT_INITIAL_CAPACITY;
use crate::config::TableConfig;
use crate::error::Error;
use crate::hash_table::Iter as TableIter;
use crate::hash_table::PrimitiveTable;
use crate::hashing_strategy::HashingStrategy;
use crate::scalar::Scalar;
use crate::scalar::Sentinels;

/// A set of 32 bit integers.
pub type IntSet = PrimitiveSet<i32>;

/// A set of 64 bit integers.
pub type LongSet = PrimitiveSet<i64>;

/// A set of primitive scalars, stored unboxed in a single probe array.
///
/// `PrimitiveSet<T>` is a [`PrimitiveTable`] with no values. It shares the
/// map's sentinels (null `0` and tombstone `MIN + 1` by default), growth
/// policy and compression lifecycle.
///
/// # Performance Characteristics
///
/// - **Memory**: `size_of::<T>()` bytes per slot.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PrimitiveSet<T> {
    table: PrimitiveTable<T, ()>,
}

impl<T: Scalar> PartialEq for PrimitiveSet<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T: Scalar> Eq for PrimitiveSet<T> {}

impl<T: Scalar> Debug for PrimitiveSet<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Scalar> PrimitiveSet<T> {
    /// Creates an empty set with the default configuration.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty set sized for about `estimate` slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveSet;
    ///
    /// let set: PrimitiveSet<i32> = PrimitiveSet::with_capacity(20);
    /// assert_eq!(set.capacity(), 23);
    /// ```
    pub fn with_capacity(estimate: usize) -> Self {
        Self {
            table: PrimitiveTable::with_capacity(estimate, ()),
        }
    }

    /// Creates an empty set from a [`TableConfig`].
    pub fn with_config(config: TableConfig<T, ()>) -> Result<Self, Error> {
        Ok(Self {
            table: PrimitiveTable::with_config(config)?,
        })
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The strategy currently sizing the set.
    pub fn hashing_strategy(&self) -> &HashingStrategy {
        self.table.hashing_strategy()
    }

    /// The reserved scalars of this set.
    pub fn sentinels(&self) -> &Sentinels<T> {
        self.table.sentinels()
    }

    /// Returns `true` once the set has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.table.is_frozen()
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: T) -> bool {
        self.table.contains(value)
    }

    /// Adds `value` to the set, returning `true` if it was not present.
    ///
    /// Fails if the set is frozen or `value` is a sentinel.
    pub fn try_add(&mut self, value: T) -> Result<bool, Error> {
        Ok(self.table.try_insert(value, ())?.is_none())
    }

    /// Adds `value` to the set, returning `true` if it was not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveSet;
    ///
    /// let mut set: PrimitiveSet<i64> = PrimitiveSet::new();
    /// assert!(set.add(3));
    /// assert!(!set.add(3));
    /// assert!(set.contains(3));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics under the same conditions [`try_add`](Self::try_add) fails.
    pub fn add(&mut self, value: T) -> bool {
        self.try_add(value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Removes `value` from the set, returning `true` if it was present.
    ///
    /// Fails if the set is frozen.
    pub fn try_remove(&mut self, value: T) -> Result<bool, Error> {
        Ok(self.table.try_remove(value)?.is_some())
    }

    /// Removes `value` from the set, returning `true` if it was present.
    ///
    /// # Panics
    ///
    /// Panics if the set is frozen.
    pub fn remove(&mut self, value: T) -> bool {
        self.try_remove(value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Removes every value, keeping the allocated capacity.
    ///
    /// Fails if the set is frozen.
    pub fn try_clear(&mut self) -> Result<(), Error> {
        self.table.try_clear()
    }

    /// Removes every value, keeping the allocated capacity.
    ///
    /// # Panics
    ///
    /// Panics if the set is frozen.
    pub fn clear(&mut self) {
        self.try_clear().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Grows the set so that `additional` more values fit without a rehash.
    ///
    /// Fails if the set is frozen.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Grows the set so that `additional` more values fit without a rehash.
    ///
    /// # Panics
    ///
    /// Panics if the set is frozen.
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns an iterator over the values of the set.
    ///
    /// Frozen sets iterate in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Only available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::TableStats {
        self.table.debug_stats()
    }
}

impl<T: Scalar> Compressible for PrimitiveSet<T> {
    fn compress(&mut self, method: Method) -> Method {
        self.table.compress(method)
    }

    fn compression_method(&self) -> Method {
        self.table.compression_method()
    }
}

impl<T: Scalar> Default for PrimitiveSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Extend<T> for PrimitiveSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for value in iter {
            self.add(value);
        }
    }
}

impl<T: Scalar> FromIterator<T> for PrimitiveSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T: Scalar> IntoIterator for &'a PrimitiveSet<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Scalar> TableConfig<T, ()> {
    /// Validates the configuration and builds an empty set from it.
    pub fn build_set(self) -> Result<PrimitiveSet<T>, Error> {
        PrimitiveSet::with_config(self)
    }
}

/// An iterator over the values of a [`PrimitiveSet`].
pub struct Iter<'a, T> {
    inner: TableIter<'a, T, ()>,
}

impl<T: Scalar> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }
}
