use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::compress::Compressible;
use crate::compress::Method;
use crate::config::DEFAULT_LARGE_REHASH_THRESHOLD;
use crate::config::TableConfig;
use crate::error::Error;
use crate::hashing_strategy::HashingStrategy;
use crate::hashing_strategy::Occupancy;
use crate::progress::LogProgress;
use crate::progress::ProgressObserver;
use crate::scalar::Scalar;
use crate::scalar::Sentinels;

/// Debug statistics for hash table analysis.
///
/// Only available in tests or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct TableStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of deleted slots not yet reclaimed
    pub tombstones: usize,
    /// Total number of slots allocated
    pub slots: usize,
    /// Live-entry count at which the table grows
    pub rehash_threshold: usize,
    /// Load factor (populated / slots)
    pub load_factor: f64,
    /// Longest distance between a key and its home slot
    pub longest_probe: usize,
    /// Total memory in bytes used by the key and value arrays
    pub total_bytes: usize,
    /// Bytes held by slots that are not live
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl TableStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Primitive Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor)",
            self.populated,
            self.slots,
            self.load_factor * 100.0
        );
        println!("Rehash Threshold: {}", self.rehash_threshold);
        println!("Tombstones: {}", self.tombstones);
        println!("Longest Probe: {}", self.longest_probe);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing table of primitive keys with a parallel array of
/// values, resolved with linear probing.
///
/// `PrimitiveTable<K, V>` is the engine shared by [`PrimitiveMap`] (scalar
/// values) and [`PrimitiveSet`] (`V = ()`). Every slot is either empty (the
/// null key sentinel), live, or a tombstone (the tombstone key sentinel).
///
/// Lookups probe forward from the key's home slot. Insertions reuse the first
/// tombstone passed on the way to an empty slot. The table grows to a larger
/// prime capacity whenever its live count reaches the rehash threshold of its
/// [`HashingStrategy`], and rebuilds itself at the same capacity once live
/// entries and tombstones together fill half of the remaining slack.
///
/// After [`compress`](Compressible::compress) with [`Method::Freeze`] the
/// table holds exactly its live entries, sorted by key, and lookups use
/// binary search.
///
/// The table performs no synchronization. Share it across threads only behind
/// external locking.
///
/// ## Example
///
/// ```rust
/// use primap::hash_table::PrimitiveTable;
///
/// let mut table: PrimitiveTable<i32, i64> = PrimitiveTable::with_capacity(10, 0);
/// assert_eq!(table.try_insert(5, 500), Ok(None));
/// assert_eq!(table.try_insert(5, 501), Ok(Some(500)));
/// assert_eq!(table.get(5), Some(501));
/// assert_eq!(table.try_remove(5), Ok(Some(501)));
/// assert!(table.is_empty());
/// ```
///
/// [`PrimitiveMap`]: crate::hash_map::PrimitiveMap
/// [`PrimitiveSet`]: crate::hash_set::PrimitiveSet
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveTable<K, V> {
    keys: Vec<K>,
    values: Vec<V>,

    populated: usize,
    tombstones: usize,
    strategy: HashingStrategy,

    sentinels: Sentinels<K>,
    null_value: V,
    method: Method,

    name: String,
    large_rehash_threshold: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl<K, V> Debug for PrimitiveTable<K, V>
where
    K: Scalar,
    V: Copy + PartialEq + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("PrimitiveTable")
            .field("name", &self.name)
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.keys.len())
            .field("threshold", &self.strategy.rehash_threshold())
            .field("method", &self.method)
            .field(
                "slots",
                &self
                    .keys
                    .iter()
                    .zip(self.values.iter())
                    .map(|(&key, value)| {
                        if self.sentinels.is_null(key) {
                            "..".to_string()
                        } else if self.sentinels.is_tombstone(key) {
                            "xx".to_string()
                        } else {
                            format!("{key:?}={value:?}")
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K, V> PrimitiveTable<K, V>
where
    K: Scalar,
    V: Copy + PartialEq,
{
    /// Creates a table sized for about `estimate` slots, with the default
    /// key sentinels and occupancy, returning `null_value` for misses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::hash_table::PrimitiveTable;
    ///
    /// let table: PrimitiveTable<i64, ()> = PrimitiveTable::with_capacity(100, ());
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(estimate: usize, null_value: V) -> Self {
        Self::allocate(
            HashingStrategy::with_capacity(estimate),
            Sentinels::default(),
            null_value,
            String::from("primitive-table"),
            DEFAULT_LARGE_REHASH_THRESHOLD,
            None,
        )
    }

    /// Creates a table from a validated [`TableConfig`].
    pub fn with_config(config: TableConfig<K, V>) -> Result<Self, Error> {
        let (sentinels, occupancy) = config.validate()?;
        let strategy =
            HashingStrategy::with_capacity_and_occupancy(config.initial_capacity, occupancy);
        Ok(Self::allocate(
            strategy,
            sentinels,
            config.null_value,
            config.name,
            config.large_rehash_threshold,
            config.progress,
        ))
    }

    fn allocate(
        strategy: HashingStrategy,
        sentinels: Sentinels<K>,
        null_value: V,
        name: String,
        large_rehash_threshold: usize,
        progress: Option<Arc<dyn ProgressObserver>>,
    ) -> Self {
        let slots = strategy.recommended_size();
        Self {
            keys: vec![sentinels.null(); slots],
            values: vec![null_value; slots],
            populated: 0,
            tombstones: 0,
            strategy,
            sentinels,
            null_value,
            method: Method::None,
            name,
            large_rehash_threshold,
            progress,
        }
    }

    /// A structurally empty table with this table's configuration and the
    /// given strategy.
    fn empty_like(&self, strategy: HashingStrategy) -> Self {
        let mut table = Self::allocate(
            strategy,
            self.sentinels,
            self.null_value,
            self.name.clone(),
            self.large_rehash_threshold,
            self.progress.clone(),
        );
        table.method = self.method;
        table
    }

    /// Returns the number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the backing arrays.
    ///
    /// For a probe table this is the prime recommended by the current
    /// [`HashingStrategy`]. For a frozen table it equals [`len`](Self::len).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// The strategy currently sizing this table.
    #[inline]
    pub fn hashing_strategy(&self) -> &HashingStrategy {
        &self.strategy
    }

    /// The key sentinels of this table.
    #[inline]
    pub fn sentinels(&self) -> &Sentinels<K> {
        &self.sentinels
    }

    /// The value reported for missing keys.
    #[inline]
    pub fn null_value(&self) -> V {
        self.null_value
    }

    /// The name used when logging about this table.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once the table has been frozen.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.method == Method::Freeze
    }

    #[inline(always)]
    fn is_live(&self, key: K) -> bool {
        !self.sentinels.is_reserved(key)
    }

    #[inline(always)]
    fn home_slot(&self, key: K) -> usize {
        key.slot_hash() as usize % self.keys.len()
    }

    /// Resolves `key` to the slot holding it, or to the slot an insertion of
    /// `key` should use.
    ///
    /// The first tombstone passed before reaching an empty slot is preferred
    /// over the empty slot itself.
    fn probe(&self, key: K) -> usize {
        let slots = self.keys.len();
        let start = self.home_slot(key);
        let searching_null = self.sentinels.is_null(key);
        let mut tombstone = None;

        for offset in 0..slots {
            let at = (start + offset) % slots;
            let current = self.keys[at];
            if current == key {
                return at;
            }

            if !searching_null && self.sentinels.is_null(current) {
                return tombstone.unwrap_or(at);
            }

            if tombstone.is_none() && self.sentinels.is_tombstone(current) {
                tombstone = Some(at);
            }
        }

        match tombstone {
            Some(at) => at,
            None => self.probe_exhausted(start),
        }
    }

    #[cold]
    #[inline(never)]
    fn probe_exhausted(&self, start: usize) -> ! {
        panic!(
            "internal error: probing all {} slots of {} from {start} found no free slot \
             (populated = {}, tombstones = {}); check the null key used to configure the table",
            self.keys.len(),
            self.name,
            self.populated,
            self.tombstones,
        )
    }

    /// Returns the slot holding `key`, if it is live in the table.
    fn find_slot(&self, key: K) -> Option<usize> {
        if self.populated == 0 || !self.is_live(key) {
            return None;
        }

        if self.is_frozen() {
            return self.keys.binary_search(&key).ok();
        }

        let at = self.probe(key);
        (self.keys[at] == key).then_some(at)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: K) -> Option<V> {
        self.find_slot(key).map(|at| self.values[at])
    }

    /// Returns `true` if `key` is live in the table.
    pub fn contains(&self, key: K) -> bool {
        self.find_slot(key).is_some()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Fails with [`Error::Frozen`] on a frozen table and with
    /// [`Error::ReservedKey`] if `key` is a sentinel.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if self.is_frozen() {
            return Err(Error::Frozen);
        }
        if !self.is_live(key) {
            return Err(Error::ReservedKey(key.widen()));
        }
        Ok(self.insert_live(key, value))
    }

    fn insert_live(&mut self, key: K, value: V) -> Option<V> {
        let at = self.probe(key);
        let current = self.keys[at];
        if current == key {
            return Some(core::mem::replace(&mut self.values[at], value));
        }

        if self.sentinels.is_tombstone(current) {
            self.tombstones -= 1;
        }
        self.keys[at] = key;
        self.values[at] = value;
        self.populated += 1;

        self.maybe_rehash();
        None
    }

    /// Removes `key`, returning its value. The slot becomes a tombstone until
    /// the next rehash.
    ///
    /// Fails with [`Error::Frozen`] on a frozen table.
    pub fn try_remove(&mut self, key: K) -> Result<Option<V>, Error> {
        if self.is_frozen() {
            return Err(Error::Frozen);
        }

        let Some(at) = self.find_slot(key) else {
            return Ok(None);
        };

        let value = core::mem::replace(&mut self.values[at], self.null_value);
        self.keys[at] = self.sentinels.tombstone();
        self.populated -= 1;
        self.tombstones += 1;
        Ok(Some(value))
    }

    /// Removes every entry while keeping the current capacity.
    ///
    /// Fails with [`Error::Frozen`] on a frozen table.
    pub fn try_clear(&mut self) -> Result<(), Error> {
        if self.is_frozen() {
            return Err(Error::Frozen);
        }

        self.keys.fill(self.sentinels.null());
        self.values.fill(self.null_value);
        self.populated = 0;
        self.tombstones = 0;
        Ok(())
    }

    /// Grows the table, if needed, so that `additional` more entries fit
    /// without another rehash.
    ///
    /// Fails with [`Error::Frozen`] on a frozen table.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        if self.is_frozen() {
            return Err(Error::Frozen);
        }

        let required = self.populated.saturating_add(additional);
        if required >= self.strategy.rehash_threshold() {
            let target =
                HashingStrategy::for_occupants(required, self.strategy.maximum_occupancy());
            self.rehash(target);
        }
        Ok(())
    }

    /// Returns an iterator over the live entries.
    ///
    /// Probe tables yield entries in slot order. Frozen tables yield them in
    /// ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            index: 0,
        }
    }

    #[inline]
    fn maybe_rehash(&mut self) {
        let threshold = self.strategy.rehash_threshold();
        if self.populated >= threshold {
            let mut target = self.strategy.with_increased_capacity();
            while target.rehash_threshold() <= self.populated {
                target = target.with_increased_capacity();
            }
            self.rehash(target);
        } else if self.populated + self.tombstones >= self.purge_threshold() {
            self.rehash(self.strategy);
        }
    }

    /// Live plus tombstone count at which the table is rebuilt in place.
    ///
    /// Halfway between the rehash threshold and the slot count, and never
    /// above `slots - 1`, so at least one slot stays empty.
    #[inline]
    fn purge_threshold(&self) -> usize {
        let slots = self.keys.len();
        let threshold = self.strategy.rehash_threshold();
        (threshold + (slots - threshold) / 2).min(slots - 1)
    }

    /// Rebuilds the table under `target`, discarding tombstones.
    ///
    /// Entries are migrated into a fresh table that temporarily allows full
    /// occupancy, so the migration itself can never trigger another rehash.
    /// This table is only replaced once migration has completed.
    #[cold]
    fn rehash(&mut self, target: HashingStrategy) {
        let mut copy = self.empty_like(target.with_occupancy(Occupancy::FULL));
        copy.copy_entries(self);
        copy.strategy = target;

        #[cfg(debug_assertions)]
        if !copy.same_entries(self) {
            log::warn!(
                "unable to rehash {}: {} entries before, {} after",
                self.name,
                self.populated,
                copy.populated
            );
        }

        log::debug!(
            "rehashed {}: {} -> {} slots ({} entries, {} tombstones dropped)",
            self.name,
            self.keys.len(),
            copy.keys.len(),
            self.populated,
            self.tombstones
        );

        *self = copy;
    }

    fn copy_entries(&mut self, source: &Self) {
        let steps = source.populated;
        let observer = source.rehash_observer();
        if let Some(observer) = observer {
            observer.start(&source.name, steps);
        }

        for (done, (key, value)) in source.iter().enumerate() {
            self.insert_live(key, value);
            if let Some(observer) = observer {
                observer.step(done + 1, steps);
            }
        }

        if let Some(observer) = observer {
            observer.end(&source.name, steps);
        }
    }

    fn rehash_observer(&self) -> Option<&dyn ProgressObserver> {
        if self.populated <= self.large_rehash_threshold {
            return None;
        }
        match &self.progress {
            Some(observer) => Some(observer.as_ref()),
            None => Some(&LogProgress),
        }
    }

    fn same_entries(&self, other: &Self) -> bool {
        self.populated == other.populated
            && other.iter().all(|(key, value)| self.get(key) == Some(value))
    }

    fn freeze(&mut self) {
        let mut entries: Vec<(K, V)> = self.iter().collect();
        entries.sort_unstable_by_key(|&(key, _)| key);
        let (keys, values): (Vec<K>, Vec<V>) = entries.into_iter().unzip();

        log::debug!(
            "froze {}: {} -> {} slots",
            self.name,
            self.keys.len(),
            keys.len()
        );

        self.keys = keys;
        self.values = values;
        self.tombstones = 0;
        self.method = Method::Freeze;
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Only available in tests or with the `stats` feature.
    ///
    /// Entry `i` counts the live keys stored `i` slots past their home slot.
    /// Frozen tables do not probe and return an empty histogram.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        if self.is_frozen() {
            return hist;
        }

        let slots = self.keys.len();
        for (at, &key) in self.keys.iter().enumerate() {
            if !self.is_live(key) {
                continue;
            }

            let distance = (at + slots - self.home_slot(key)) % slots;
            if hist.len() <= distance {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Only available in tests or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> TableStats {
        let slots = self.keys.len();
        let slot_bytes = core::mem::size_of::<K>() + core::mem::size_of::<V>();

        TableStats {
            populated: self.populated,
            tombstones: self.tombstones,
            slots,
            rehash_threshold: self.strategy.rehash_threshold(),
            load_factor: if slots == 0 {
                0.0
            } else {
                self.populated as f64 / slots as f64
            },
            longest_probe: self.probe_histogram().len().saturating_sub(1),
            total_bytes: slots * slot_bytes,
            wasted_bytes: (slots - self.populated) * slot_bytes,
        }
    }
}

impl<K, V> Compressible for PrimitiveTable<K, V>
where
    K: Scalar,
    V: Copy + PartialEq,
{
    fn compress(&mut self, method: Method) -> Method {
        if self.is_frozen() {
            return Method::Freeze;
        }

        match method {
            Method::None => Method::None,
            Method::Resize => {
                let target = HashingStrategy::for_occupants(
                    self.populated,
                    self.strategy.maximum_occupancy(),
                );
                self.rehash(target);
                self.method = Method::Resize;
                Method::Resize
            }
            Method::Freeze => {
                self.freeze();
                Method::Freeze
            }
        }
    }

    fn compression_method(&self) -> Method {
        self.method
    }
}

/// An iterator over the live entries of a [`PrimitiveTable`].
///
/// Created by [`PrimitiveTable::iter`].
pub struct Iter<'a, K, V> {
    table: &'a PrimitiveTable<K, V>,
    index: usize,
}

impl<K, V> Iterator for Iter<'_, K, V>
where
    K: Scalar,
    V: Copy + PartialEq,
{
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.keys.len() {
            let at = self.index;
            self.index += 1;

            let key = self.table.keys[at];
            if self.table.is_live(key) {
                return Some((key, self.table.values[at]));
            }
        }
        None
    }
}
