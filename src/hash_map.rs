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

/// A map from 32 bit keys to 8 bit values.
pub type IntToByteMap = PrimitiveMap<i32, i8>;

/// A map from 32 bit keys to 32 bit values.
pub type IntToIntMap = PrimitiveMap<i32, i32>;

/// A map from 64 bit keys to 32 bit values.
pub type LongToIntMap = PrimitiveMap<i64, i32>;

/// A map from 64 bit keys to 64 bit values.
pub type LongToLongMap = PrimitiveMap<i64, i64>;

/// A map from primitive scalar keys to primitive scalar values, stored
/// unboxed in parallel arrays.
///
/// `PrimitiveMap<K, V>` is a thin wrapper over [`PrimitiveTable`], which owns
/// the probing, growth and freezing logic. Every key and value width
/// combination is the same generic type. The aliases in this module
/// ([`IntToByteMap`], [`LongToLongMap`], ...) only name common ones.
///
/// Two key scalars and one value scalar are reserved:
///
/// - the null key (default `0`) marks empty slots,
/// - the tombstone key (default `MIN + 1`) marks deleted slots,
/// - the null value (default `0`) is what [`get`](Self::get) returns for a
///   missing key, and so can never be stored.
///
/// Use a [`TableConfig`] to pick different sentinels.
///
/// # Performance Characteristics
///
/// - **Memory**: `size_of::<K>() + size_of::<V>()` bytes per slot, with about
///   30% of the slots left empty at the default occupancy. A frozen map holds
///   no empty slots at all.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PrimitiveMap<K, V> {
    table: PrimitiveTable<K, V>,
}

impl<K, V> Debug for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&k, &v);
        }
        map.finish()
    }
}

impl<K, V> PartialEq for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.find(k) == Some(v))
    }
}

impl<K, V> Eq for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
}

impl<K, V> PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    /// Creates an empty map with the default capacity estimate, sentinels and
    /// occupancy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let map: PrimitiveMap<i32, i64> = PrimitiveMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty map sized for about `estimate` slots.
    ///
    /// The actual capacity is the next prime at or above the estimate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let map: PrimitiveMap<i64, i8> = PrimitiveMap::with_capacity(100);
    /// assert_eq!(map.capacity(), 101);
    /// ```
    pub fn with_capacity(estimate: usize) -> Self {
        Self {
            table: PrimitiveTable::with_capacity(estimate, V::ZERO),
        }
    }

    /// Creates an empty map from a [`TableConfig`].
    ///
    /// Returns an error if the key sentinels collide or the occupancy is out
    /// of range.
    pub fn with_config(config: TableConfig<K, V>) -> Result<Self, Error> {
        Ok(Self {
            table: PrimitiveTable::with_config(config)?,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots currently allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    /// use primap::compress::Compressible;
    /// use primap::compress::Method;
    ///
    /// let mut map: PrimitiveMap<i32, i32> = PrimitiveMap::with_capacity(10);
    /// assert_eq!(map.capacity(), 11);
    ///
    /// map.put(1, 1);
    /// map.put(2, 2);
    /// map.compress(Method::Freeze);
    /// assert_eq!(map.capacity(), 2);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The strategy currently sizing the map.
    pub fn hashing_strategy(&self) -> &HashingStrategy {
        self.table.hashing_strategy()
    }

    /// The reserved key scalars of this map.
    pub fn sentinels(&self) -> &Sentinels<K> {
        self.table.sentinels()
    }

    /// The value returned by [`get`](Self::get) for missing keys.
    pub fn null_value(&self) -> V {
        self.table.null_value()
    }

    /// Returns `true` if `value` is this map's null value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let map: PrimitiveMap<i32, i32> = PrimitiveMap::new();
    /// assert!(map.is_null_value(map.get(42)));
    /// ```
    pub fn is_null_value(&self, value: V) -> bool {
        value == self.table.null_value()
    }

    /// Returns `true` once the map has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.table.is_frozen()
    }

    /// Returns the value stored under `key`, or the null value if there is
    /// none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i32, i8> = PrimitiveMap::new();
    /// map.put(7, 3);
    /// assert_eq!(map.get(7), 3);
    /// assert_eq!(map.get(8), 0);
    /// ```
    pub fn get(&self, key: K) -> V {
        self.table.get(key).unwrap_or(self.table.null_value())
    }

    /// Returns the value stored under `key`, or `None` if there is none.
    pub fn find(&self, key: K) -> Option<V> {
        self.table.get(key)
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: K) -> bool {
        self.table.contains(key)
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Fails if the map is frozen, if `key` is one of the key sentinels, or if
    /// `value` is the null value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::Error;
    /// use primap::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i64, i64> = PrimitiveMap::new();
    /// assert_eq!(map.try_put(1, 10), Ok(None));
    /// assert_eq!(map.try_put(1, 11), Ok(Some(10)));
    /// assert_eq!(map.try_put(0, 1), Err(Error::ReservedKey(0)));
    /// assert_eq!(map.try_put(2, 0), Err(Error::ReservedValue(0)));
    /// ```
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if self.is_null_value(value) {
            return Err(Error::ReservedValue(value.widen()));
        }
        self.table.try_insert(key, value)
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions [`try_put`](Self::try_put) fails.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.try_put(key, value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Adds one to the value stored under `key`, treating a missing key as
    /// holding the null value, and returns the new value.
    ///
    /// Fails if the new value does not fit `V` or is the null value, in
    /// addition to every way [`try_put`](Self::try_put) fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let mut counts: PrimitiveMap<i32, i8> = PrimitiveMap::new();
    /// assert_eq!(counts.try_increment(4), Ok(1));
    /// assert_eq!(counts.try_increment(4), Ok(2));
    ///
    /// counts.put(5, i8::MAX);
    /// assert!(counts.try_increment(5).is_err());
    /// ```
    pub fn try_increment(&mut self, key: K) -> Result<V, Error> {
        let current = self.get(key).widen();
        let next = current
            .checked_add(1)
            .and_then(V::narrow)
            .ok_or(Error::OutOfRange {
                value: current,
                bits: V::BITS,
            })?;
        self.try_put(key, next)?;
        Ok(next)
    }

    /// Adds one to the value stored under `key` and returns the new value.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions [`try_increment`](Self::try_increment)
    /// fails.
    pub fn increment(&mut self, key: K) -> V {
        self.try_increment(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// Fails if the map is frozen.
    pub fn try_remove(&mut self, key: K) -> Result<Option<V>, Error> {
        self.table.try_remove(key)
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i16, i16> = PrimitiveMap::new();
    /// map.put(1, 2);
    /// assert_eq!(map.remove(1), Some(2));
    /// assert_eq!(map.remove(1), None);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the map is frozen.
    pub fn remove(&mut self, key: K) -> Option<V> {
        self.try_remove(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Removes every entry, keeping the allocated capacity.
    ///
    /// Fails if the map is frozen.
    pub fn try_clear(&mut self) -> Result<(), Error> {
        self.table.try_clear()
    }

    /// Removes every entry, keeping the allocated capacity.
    ///
    /// # Panics
    ///
    /// Panics if the map is frozen.
    pub fn clear(&mut self) {
        self.try_clear().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Grows the map so that `additional` more entries fit without a rehash.
    ///
    /// Fails if the map is frozen.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Grows the map so that `additional` more entries fit without a rehash.
    ///
    /// # Panics
    ///
    /// Panics if the map is frozen.
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns an iterator over the entries of the map.
    ///
    /// Frozen maps iterate in ascending key order. Otherwise the order is
    /// unspecified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let mut map: PrimitiveMap<i32, i32> = PrimitiveMap::new();
    /// map.put(1, 10);
    /// map.put(2, 20);
    ///
    /// let mut entries: Vec<_> = map.iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, [(1, 10), (2, 20)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Calls `visitor` with every entry of the map.
    pub fn entries(&self, mut visitor: impl FnMut(K, V)) {
        for (k, v) in self.table.iter() {
            visitor(k, v);
        }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Only available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::TableStats {
        self.table.debug_stats()
    }

    /// Computes a histogram of probe lengths for the current map state.
    ///
    /// Only available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }
}

impl<K, V> Compressible for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    fn compress(&mut self, method: Method) -> Method {
        self.table.compress(method)
    }

    fn compression_method(&self) -> Method {
        self.table.compression_method()
    }
}

impl<K, V> Default for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    /// Creates an empty map with the default configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::PrimitiveMap;
    ///
    /// let map: PrimitiveMap<i8, i8> = PrimitiveMap::default();
    /// assert!(map.is_empty());
    /// ```
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    /// # Panics
    ///
    /// Panics if any entry would make [`PrimitiveMap::try_put`] fail.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower);
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    type Item = (K, V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> TableConfig<K, V>
where
    K: Scalar,
    V: Scalar,
{
    /// Validates the configuration and builds an empty map from it.
    pub fn build_map(self) -> Result<PrimitiveMap<K, V>, Error> {
        PrimitiveMap::with_config(self)
    }
}

/// An iterator over the entries of a [`PrimitiveMap`].
pub struct Iter<'a, K, V> {
    inner: TableIter<'a, K, V>,
}

impl<K, V> Iterator for Iter<'_, K, V>
where
    K: Scalar,
    V: Scalar,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An iterator over the keys of a [`PrimitiveMap`].
pub struct Keys<'a, K, V> {
    inner: TableIter<'a, K, V>,
}

impl<K, V> Iterator for Keys<'_, K, V>
where
    K: Scalar,
    V: Scalar,
{
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a [`PrimitiveMap`].
pub struct Values<'a, K, V> {
    inner: TableIter<'a, K, V>,
}

impl<K, V> Iterator for Values<'_, K, V>
where
    K: Scalar,
    V: Scalar,
{
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}
