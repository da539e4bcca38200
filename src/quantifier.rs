/// A repetition bound of a repeated grammar node.
///
/// `min == max` requests an exact count, a `max` of [`Quantifier::UNBOUNDED`] allows any number of
/// repetitions and `min == 0` makes the node optional.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantifier {
    min: usize,
    max: usize,
}

impl Quantifier {
    /// The upper bound of an unbounded quantifier.
    pub const UNBOUNDED: usize = usize::MAX;

    /// Exactly `n` repetitions.
    pub fn count(n: usize) -> Self {
        Self::between(n, n)
    }

    /// Between `min` and `max` repetitions, both inclusive.
    ///
    /// # Panics
    /// Panics if `min > max`.
    pub fn between(min: usize, max: usize) -> Self {
        if min > max {
            fatal!("invalid quantifier: min {} is greater than max {}", min, max);
        }
        Self { min, max }
    }

    /// At least `min` repetitions.
    pub fn at_least(min: usize) -> Self {
        Self::between(min, Self::UNBOUNDED)
    }

    /// Zero or one repetition.
    pub fn optional() -> Self {
        Self::between(0, 1)
    }

    /// Any number of repetitions including none.
    pub fn any() -> Self {
        Self::between(0, Self::UNBOUNDED)
    }

    /// The lower bound.
    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    /// The upper bound.
    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns true if `count` satisfies the bounds.
    #[inline]
    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }

    /// Returns true if `count` repetitions leave room for another one.
    #[inline]
    pub fn wants_more(&self, count: usize) -> bool {
        count < self.max
    }
}

impl From<usize> for Quantifier {
    fn from(n: usize) -> Self {
        Quantifier::count(n)
    }
}

impl From<std::ops::RangeInclusive<usize>> for Quantifier {
    fn from(range: std::ops::RangeInclusive<usize>) -> Self {
        Quantifier::between(*range.start(), *range.end())
    }
}

impl From<std::ops::RangeFrom<usize>> for Quantifier {
    fn from(range: std::ops::RangeFrom<usize>) -> Self {
        Quantifier::at_least(range.start)
    }
}

impl std::fmt::Display for Quantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (min, max) if min == max => write!(f, "{{{}}}", min),
            (min, Self::UNBOUNDED) => write!(f, "{{{},}}", min),
            (min, max) => write!(f, "{{{},{}}}", min, max),
        }
    }
}
