use core::fmt::Debug;
use core::hash::Hash;

use crate::error::Error;

/// A large prime used to spread 8, 16 and 32 bit keys.
const SEED: i32 = 536_870_909;

/// Knuth's multiplicative constant, used for folded 64 bit keys.
const KNUTH_SEED: i64 = 2_654_435_761;

mod sealed {
    pub trait Sealed {}
}

/// A primitive integer width that can be stored directly in a table slot.
///
/// Implemented for `i8`, `i16`, `i32` and `i64`. Every width can be widened
/// losslessly to `i64`, which is what lets [`PrimitiveScalarMap`] treat any
/// concrete map as a `long -> long` map.
///
/// [`PrimitiveScalarMap`]: crate::scalar_map::PrimitiveScalarMap
pub trait Scalar:
    sealed::Sealed + Copy + Default + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Bit width of the type.
    const BITS: u32;

    /// The default null sentinel.
    const ZERO: Self;

    /// The default tombstone sentinel, `MIN + 1`.
    const DEFAULT_TOMBSTONE: Self;

    /// Widens the scalar to an `i64`.
    fn widen(self) -> i64;

    /// Narrows an `i64` to this width, or `None` if it does not fit.
    fn narrow(value: i64) -> Option<Self>;

    /// Non-negative hash used to pick the home slot of a key.
    fn slot_hash(self) -> u32;

    /// Narrows `value`, reporting [`Error::OutOfRange`] when it does not fit.
    #[inline]
    fn try_narrow(value: i64) -> Result<Self, Error> {
        Self::narrow(value).ok_or(Error::OutOfRange {
            value,
            bits: Self::BITS,
        })
    }
}

macro_rules! narrow_scalar {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const BITS: u32 = <$ty>::BITS;
            const ZERO: Self = 0;
            const DEFAULT_TOMBSTONE: Self = <$ty>::MIN + 1;

            #[inline(always)]
            fn widen(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn narrow(value: i64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline(always)]
            fn slot_hash(self) -> u32 {
                (self as i32).wrapping_mul(SEED).unsigned_abs()
            }
        }
    )*};
}

narrow_scalar!(i8, i16, i32);

impl sealed::Sealed for i64 {}

impl Scalar for i64 {
    const BITS: u32 = i64::BITS;
    const ZERO: Self = 0;
    const DEFAULT_TOMBSTONE: Self = i64::MIN + 1;

    #[inline(always)]
    fn widen(self) -> i64 {
        self
    }

    #[inline(always)]
    fn narrow(value: i64) -> Option<Self> {
        Some(value)
    }

    #[inline(always)]
    fn slot_hash(self) -> u32 {
        // Fold the high word into the low word before mixing, then keep the
        // low 32 bits of the product.
        let folded = self ^ ((self as u64) >> 32) as i64;
        (folded.wrapping_mul(KNUTH_SEED) as i32).unsigned_abs()
    }
}

/// The two reserved scalars of a key array: one marking never-used slots and
/// one marking deleted slots.
///
/// The two must differ. Neither may be stored as a live key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentinels<T> {
    null: T,
    tombstone: T,
}

impl<T: Scalar> Default for Sentinels<T> {
    fn default() -> Self {
        Self {
            null: T::ZERO,
            tombstone: T::DEFAULT_TOMBSTONE,
        }
    }
}

impl<T: Scalar> Sentinels<T> {
    /// Creates a sentinel pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::Error;
    /// use primap::scalar::Sentinels;
    ///
    /// let sentinels = Sentinels::new(-1i32, -2).unwrap();
    /// assert!(sentinels.is_reserved(-1));
    /// assert!(!sentinels.is_reserved(0));
    ///
    /// assert_eq!(Sentinels::new(7i8, 7), Err(Error::SentinelCollision(7)));
    /// ```
    pub fn new(null: T, tombstone: T) -> Result<Self, Error> {
        if null == tombstone {
            return Err(Error::SentinelCollision(null.widen()));
        }
        Ok(Self { null, tombstone })
    }

    /// The scalar marking a never-occupied slot.
    #[inline(always)]
    pub fn null(&self) -> T {
        self.null
    }

    /// The scalar marking a deleted slot.
    #[inline(always)]
    pub fn tombstone(&self) -> T {
        self.tombstone
    }

    /// Returns `true` if `value` is the null sentinel.
    #[inline(always)]
    pub fn is_null(&self, value: T) -> bool {
        value == self.null
    }

    /// Returns `true` if `value` is the tombstone sentinel.
    #[inline(always)]
    pub fn is_tombstone(&self, value: T) -> bool {
        value == self.tombstone
    }

    /// Returns `true` if `value` is either sentinel, and so can never be a
    /// live key.
    #[inline(always)]
    pub fn is_reserved(&self, value: T) -> bool {
        self.is_null(value) || self.is_tombstone(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinels_per_width() {
        assert_eq!(Sentinels::<i8>::default().tombstone(), -127);
        assert_eq!(Sentinels::<i16>::default().tombstone(), i16::MIN + 1);
        assert_eq!(Sentinels::<i32>::default().tombstone(), i32::MIN + 1);
        assert_eq!(Sentinels::<i64>::default().tombstone(), i64::MIN + 1);
        assert_eq!(Sentinels::<i64>::default().null(), 0);
    }

    #[test]
    fn test_colliding_sentinels_are_rejected() {
        assert_eq!(
            Sentinels::new(-5i16, -5),
            Err(Error::SentinelCollision(-5))
        );
        assert!(Sentinels::new(0i64, 1).is_ok());
    }

    #[test]
    fn test_narrowing_checks_range() {
        assert_eq!(i8::narrow(127), Some(127));
        assert_eq!(i8::narrow(128), None);
        assert_eq!(i16::narrow(-32768), Some(i16::MIN));
        assert_eq!(
            i32::try_narrow(i64::MAX),
            Err(Error::OutOfRange {
                value: i64::MAX,
                bits: 32
            })
        );
        assert_eq!(i64::narrow(i64::MIN), Some(i64::MIN));
    }

    #[test]
    fn test_widening_is_lossless() {
        assert_eq!((-128i8).widen(), -128);
        assert_eq!(i32::MAX.widen(), i32::MAX as i64);
    }

    #[test]
    fn test_narrow_widths_share_a_hash() {
        // Narrow keys are widened to 32 bits before mixing, so equal values
        // hash equally regardless of width.
        assert_eq!(5i8.slot_hash(), 5i32.slot_hash());
        assert_eq!((-3i16).slot_hash(), (-3i32).slot_hash());
        assert_eq!(
            5i32.slot_hash(),
            5i32.wrapping_mul(SEED).unsigned_abs()
        );
    }

    #[test]
    fn test_wide_hash_folds_high_word() {
        let low = 0x0000_0000_1234_5678i64;
        let high = 0x0000_0001_1234_5678i64;
        assert_ne!(low.slot_hash(), high.slot_hash());
        assert_eq!(
            i64::MIN.slot_hash(),
            ((i64::MIN ^ ((i64::MIN as u64) >> 32) as i64).wrapping_mul(KNUTH_SEED) as i32)
                .unsigned_abs()
        );
    }
}
