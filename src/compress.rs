//! The compression lifecycle shared by every table.
//!
//! A table starts out as a mutable probe table. Its owner may later
//! [`compress`](Compressible::compress) it, either by shrinking it to the
//! tightest prime capacity ([`Method::Resize`]) or by irreversibly freezing it
//! into a sorted array searched with binary search ([`Method::Freeze`]).

/// A way of reducing a collection's memory footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// No compression has been, or could be, applied.
    #[default]
    None,

    /// Shrink the probe table to the smallest capacity that still respects
    /// its maximum occupancy. The table stays mutable.
    Resize,

    /// Replace the probe table with sorted arrays holding exactly the live
    /// entries. Lookups switch to binary search and every later mutation is
    /// rejected.
    Freeze,
}

/// A collection that can trade mutability or slack for memory.
pub trait Compressible {
    /// Compresses the collection with `method` if possible, returning the
    /// method actually applied.
    ///
    /// Frozen collections are left alone and keep reporting
    /// [`Method::Freeze`], which makes freezing idempotent.
    fn compress(&mut self, method: Method) -> Method;

    /// The last compression applied to this collection.
    fn compression_method(&self) -> Method;

    /// Returns `true` if some compression has been applied.
    fn is_compressed(&self) -> bool {
        self.compression_method() != Method::None
    }
}

/// Reports that the collection at `index` was compressed with `method`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionEvent {
    /// Position of the collection in the sequence given to [`compress_all`].
    pub index: usize,
    /// The method the collection applied.
    pub method: Method,
}

/// Compresses every collection in `collections` with `method`.
///
/// Collections that are already frozen are skipped. `on_event` is called for
/// every collection that applied some compression. Returns the number of
/// collections compressed.
///
/// # Examples
///
/// ```rust
/// use primap::PrimitiveMap;
/// use primap::PrimitiveSet;
/// use primap::compress::Compressible;
/// use primap::compress::Method;
/// use primap::compress::compress_all;
///
/// let mut map: PrimitiveMap<i32, i32> = PrimitiveMap::with_capacity(100);
/// map.put(1, 10);
/// let mut set: PrimitiveSet<i64> = PrimitiveSet::with_capacity(100);
/// set.add(7);
///
/// let mut frozen = Vec::new();
/// let collections: [&mut dyn Compressible; 2] = [&mut map, &mut set];
/// let count = compress_all(collections, Method::Freeze, |event| frozen.push(event.index));
/// assert_eq!(count, 2);
/// assert_eq!(frozen, [0, 1]);
/// assert_eq!(map.get(1), 10);
/// ```
pub fn compress_all<'a, I>(
    collections: I,
    method: Method,
    mut on_event: impl FnMut(CompressionEvent),
) -> usize
where
    I: IntoIterator<Item = &'a mut dyn Compressible>,
{
    let mut compressed = 0;
    for (index, collection) in collections.into_iter().enumerate() {
        if collection.compression_method() == Method::Freeze {
            continue;
        }

        let applied = collection.compress(method);
        if applied != Method::None {
            compressed += 1;
            on_event(CompressionEvent {
                index,
                method: applied,
            });
        }
    }
    compressed
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::hash_map::PrimitiveMap;
    use crate::hash_set::PrimitiveSet;

    #[test]
    fn test_default_is_uncompressed() {
        let map: PrimitiveMap<i32, i32> = PrimitiveMap::with_capacity(10);
        assert_eq!(map.compression_method(), Method::None);
        assert!(!map.is_compressed());
    }

    #[test]
    fn test_compress_all_skips_frozen_collections() {
        let mut first: PrimitiveMap<i64, i64> = PrimitiveMap::with_capacity(50);
        let mut second: PrimitiveSet<i16> = PrimitiveSet::with_capacity(50);
        let mut third: PrimitiveMap<i32, i8> = PrimitiveMap::with_capacity(50);
        first.put(1, 2);
        second.add(3);
        third.put(4, 5);
        third.compress(Method::Freeze);

        let mut events = Vec::new();
        let collections: [&mut dyn Compressible; 3] = [&mut first, &mut second, &mut third];
        let count = compress_all(collections, Method::Resize, |event| events.push(event));

        assert_eq!(count, 2);
        assert_eq!(
            events,
            [
                CompressionEvent {
                    index: 0,
                    method: Method::Resize
                },
                CompressionEvent {
                    index: 1,
                    method: Method::Resize
                },
            ]
        );
        assert_eq!(first.compression_method(), Method::Resize);
        assert_eq!(third.compression_method(), Method::Freeze);
    }

    #[test]
    fn test_method_none_changes_nothing() {
        let mut set: PrimitiveSet<i32> = PrimitiveSet::with_capacity(10);
        set.add(1);
        let capacity = set.capacity();
        assert_eq!(set.compress(Method::None), Method::None);
        assert_eq!(set.capacity(), capacity);
        assert!(!set.is_compressed());
    }
}
