use crate::config::DEFAULT_MAXIMUM_OCCUPANCY;
use crate::error::Error;

/// The fraction of a table's slots that may hold live entries before the
/// table grows, in whole percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupancy(u8);

impl Default for Occupancy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Occupancy {
    /// Every slot may be used. Only used while migrating entries during a
    /// rehash.
    pub const FULL: Occupancy = Occupancy(100);

    /// The crate-wide default, selected by the `occupancy-*` features.
    pub const DEFAULT: Occupancy = Occupancy(DEFAULT_MAXIMUM_OCCUPANCY);

    /// Creates an occupancy of `percent` percent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use primap::Error;
    /// use primap::hashing_strategy::Occupancy;
    ///
    /// assert_eq!(Occupancy::new(75).unwrap().percent(), 75);
    /// assert_eq!(Occupancy::new(0), Err(Error::InvalidOccupancy(0)));
    /// assert_eq!(Occupancy::new(120), Err(Error::InvalidOccupancy(120)));
    /// ```
    pub fn new(percent: u8) -> Result<Self, Error> {
        if percent == 0 || percent > 100 {
            return Err(Error::InvalidOccupancy(percent));
        }
        Ok(Self(percent))
    }

    /// The occupancy in whole percent.
    pub fn percent(self) -> u8 {
        self.0
    }

    #[inline(always)]
    fn of(self, slots: usize) -> usize {
        ((slots as u128 * self.0 as u128) / 100) as usize
    }

    #[inline(always)]
    fn inverse(self, count: usize) -> usize {
        (count as u128 * 100).div_ceil(self.0 as u128) as usize
    }
}

/// Returns `true` if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut divisor = 5usize;
    while divisor <= n / divisor {
        if n % divisor == 0 || n % (divisor + 2) == 0 {
            return false;
        }
        divisor += 6;
    }
    true
}

/// Returns the smallest prime greater than or equal to `n`.
///
/// # Panics
///
/// Panics if no such prime fits in a `usize`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1).expect("capacity overflow");
    }
    candidate
}

/// Sizing policy of a table: how many slots to allocate and how many live
/// entries the table may hold before it must grow.
///
/// Strategies are immutable. Every capacity change produces a new strategy.
///
/// # Examples
///
/// ```rust
/// use primap::hashing_strategy::HashingStrategy;
/// use primap::hashing_strategy::Occupancy;
///
/// let strategy = HashingStrategy::with_capacity_and_occupancy(10, Occupancy::new(70).unwrap());
/// assert_eq!(strategy.recommended_size(), 11);
/// assert_eq!(strategy.rehash_threshold(), 7);
///
/// let grown = strategy.with_increased_capacity();
/// assert!(grown.recommended_size() > strategy.recommended_size());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashingStrategy {
    recommended_size: usize,
    maximum_occupancy: Occupancy,
    rehash_threshold: usize,
}

impl Default for HashingStrategy {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl HashingStrategy {
    /// Creates a strategy for about `estimate` slots at the default maximum
    /// occupancy.
    pub fn with_capacity(estimate: usize) -> Self {
        Self::with_capacity_and_occupancy(estimate, Occupancy::default())
    }

    /// Creates a strategy for about `estimate` slots at the given maximum
    /// occupancy.
    ///
    /// The slot count is the next prime at or above `estimate` (and at least
    /// 2). The threshold is `slots * occupancy`, rounded down and clamped so
    /// that at least one slot always stays empty.
    pub fn with_capacity_and_occupancy(estimate: usize, maximum_occupancy: Occupancy) -> Self {
        let recommended_size = next_prime(estimate);
        let rehash_threshold = maximum_occupancy
            .of(recommended_size)
            .clamp(1, recommended_size - 1);

        Self {
            recommended_size,
            maximum_occupancy,
            rehash_threshold,
        }
    }

    /// Creates the smallest strategy whose threshold still leaves room for
    /// `count` live entries at the given occupancy.
    pub fn for_occupants(count: usize, maximum_occupancy: Occupancy) -> Self {
        let mut strategy = Self::with_capacity_and_occupancy(
            maximum_occupancy.inverse(count.saturating_add(1)),
            maximum_occupancy,
        );
        while strategy.rehash_threshold <= count {
            strategy = Self::with_capacity_and_occupancy(
                strategy.recommended_size + 1,
                maximum_occupancy,
            );
        }
        strategy
    }

    /// Returns a strategy with roughly double the slots and the same
    /// occupancy.
    pub fn with_increased_capacity(&self) -> Self {
        Self::with_capacity_and_occupancy(
            self.recommended_size.saturating_mul(2),
            self.maximum_occupancy,
        )
    }

    /// Returns a strategy with the same slot count and a different occupancy.
    pub fn with_occupancy(&self, maximum_occupancy: Occupancy) -> Self {
        Self::with_capacity_and_occupancy(self.recommended_size, maximum_occupancy)
    }

    /// Number of slots to allocate. Always prime.
    #[inline(always)]
    pub fn recommended_size(&self) -> usize {
        self.recommended_size
    }

    /// Occupancy the threshold was derived from.
    #[inline(always)]
    pub fn maximum_occupancy(&self) -> Occupancy {
        self.maximum_occupancy
    }

    /// Live-entry count at which the table grows. Always smaller than
    /// [`recommended_size`](Self::recommended_size).
    #[inline(always)]
    pub fn rehash_threshold(&self) -> usize {
        self.rehash_threshold
    }
}
