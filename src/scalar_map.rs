//! A width-erased view of every [`PrimitiveMap`].
//!
//! Each concrete map keeps its narrow storage. [`PrimitiveScalarMap`] widens
//! keys and values to `i64` at the call boundary only, so generic code such as
//! [`copy_scalars`] or [`summarize`] can work over any combination of widths
//! without being written once per width.

use alloc::vec::Vec;

use crate::error::Error;
use crate::hash_map::PrimitiveMap;
use crate::scalar::Scalar;

/// A map viewed as an `i64 -> i64` map.
pub trait PrimitiveScalarMap {
    /// Returns the value stored under `key`, widened, or the widened null
    /// value if there is none.
    ///
    /// A key that does not fit the map's key width can never be present.
    fn get_scalar(&self, key: i64) -> i64;

    /// Stores `value` under `key`, narrowing both to the map's widths.
    ///
    /// Returns the widened value that was replaced, if any.
    fn put_scalar(&mut self, key: i64, value: i64) -> Result<Option<i64>, Error>;

    /// Returns `true` if `key` is the map's null key.
    fn is_scalar_key_null(&self, key: i64) -> bool;

    /// Returns `true` if `value` is the map's null value.
    fn is_scalar_value_null(&self, value: i64) -> bool;

    /// Returns the number of entries in the map.
    fn scalar_len(&self) -> usize;

    /// Calls `visitor` with every entry of the map, widened.
    fn for_each_scalar(&self, visitor: &mut dyn FnMut(i64, i64));
}

impl<K, V> PrimitiveScalarMap for PrimitiveMap<K, V>
where
    K: Scalar,
    V: Scalar,
{
    fn get_scalar(&self, key: i64) -> i64 {
        match K::narrow(key) {
            Some(key) => self.get(key).widen(),
            None => self.null_value().widen(),
        }
    }

    fn put_scalar(&mut self, key: i64, value: i64) -> Result<Option<i64>, Error> {
        let key = K::try_narrow(key)?;
        let value = V::try_narrow(value)?;
        Ok(self.try_put(key, value)?.map(V::widen))
    }

    fn is_scalar_key_null(&self, key: i64) -> bool {
        K::narrow(key).is_some_and(|key| self.sentinels().is_null(key))
    }

    fn is_scalar_value_null(&self, value: i64) -> bool {
        V::narrow(value).is_some_and(|value| self.is_null_value(value))
    }

    fn scalar_len(&self) -> usize {
        self.len()
    }

    fn for_each_scalar(&self, visitor: &mut dyn FnMut(i64, i64)) {
        for (k, v) in self.iter() {
            visitor(k.widen(), v.widen());
        }
    }
}

/// Copies every entry of `source` into `destination`, returning the number of
/// entries copied.
///
/// Stops at the first entry `destination` rejects, for instance because it
/// does not fit its narrower widths.
///
/// # Examples
///
/// ```rust
/// use primap::PrimitiveMap;
/// use primap::scalar_map::PrimitiveScalarMap;
/// use primap::scalar_map::copy_scalars;
///
/// let mut narrow: PrimitiveMap<i16, i8> = PrimitiveMap::new();
/// narrow.put(300, -4);
/// let mut wide: PrimitiveMap<i64, i64> = PrimitiveMap::new();
///
/// assert_eq!(copy_scalars(&narrow, &mut wide), Ok(1));
/// assert_eq!(wide.get_scalar(300), -4);
/// ```
pub fn copy_scalars<S, D>(source: &S, destination: &mut D) -> Result<usize, Error>
where
    S: PrimitiveScalarMap + ?Sized,
    D: PrimitiveScalarMap + ?Sized,
{
    let mut copied = 0;
    let mut failure = None;
    source.for_each_scalar(&mut |key, value| {
        if failure.is_some() {
            return;
        }
        match destination.put_scalar(key, value) {
            Ok(_) => copied += 1,
            Err(err) => failure = Some(err),
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(copied),
    }
}

/// Returns every entry of `map`, widened and sorted by key.
pub fn scalar_entries<M>(map: &M) -> Vec<(i64, i64)>
where
    M: PrimitiveScalarMap + ?Sized,
{
    let mut entries = Vec::with_capacity(map.scalar_len());
    map.for_each_scalar(&mut |key, value| entries.push((key, value)));
    entries.sort_unstable();
    entries
}

/// Summary statistics over the values of a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarSummary {
    /// Number of entries.
    pub count: usize,
    /// Smallest value, or `None` for an empty map.
    pub min: Option<i64>,
    /// Largest value, or `None` for an empty map.
    pub max: Option<i64>,
    /// Sum of all values.
    pub sum: i128,
}

/// Computes a [`ScalarSummary`] over the values of `map`.
///
/// # Examples
///
/// ```rust
/// use primap::PrimitiveMap;
/// use primap::scalar_map::summarize;
///
/// let map: PrimitiveMap<i32, i8> = [(1, 5), (2, -3), (3, 9)].into_iter().collect();
/// let summary = summarize(&map);
/// assert_eq!(summary.count, 3);
/// assert_eq!(summary.min, Some(-3));
/// assert_eq!(summary.max, Some(9));
/// assert_eq!(summary.sum, 11);
/// ```
pub fn summarize<M>(map: &M) -> ScalarSummary
where
    M: PrimitiveScalarMap + ?Sized,
{
    let mut summary = ScalarSummary::default();
    map.for_each_scalar(&mut |_, value| {
        summary.count += 1;
        summary.sum += value as i128;
        summary.min = Some(summary.min.map_or(value, |min| min.min(value)));
        summary.max = Some(summary.max.map_or(value, |max| max.max(value)));
    });
    summary
}
