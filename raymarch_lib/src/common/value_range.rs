use std::ops::Range;

/// Represents a range of floating-point values.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ValueRange {
    /// Lower bound
    pub low: f32,
    /// Upper bound
    pub high: f32,
}

impl ValueRange {
    /// Constructs new, empty range.
    pub fn empty() -> ValueRange {
        ValueRange {
            low: f32::NAN,
            high: f32::NAN,
        }
    }

    /// Constructs minimal range, where all finite samples from an iterator
    /// are inside the range. Non-finite samples are skipped.
    pub fn from_samples(iter: impl IntoIterator<Item = f32>) -> ValueRange {
        let mut range = ValueRange::empty();
        for val in iter {
            range.extend(val);
        }
        range
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_nan() || self.high.is_nan()
    }

    /// Extend the range with new value.
    /// Non-finite values are ignored.
    pub fn extend(&mut self, val: f32) {
        if !val.is_finite() {
            return;
        }

        if self.is_empty() {
            self.low = val;
            self.high = val;
        }

        if val > self.high {
            self.high = val;
        }

        if val < self.low {
            self.low = val;
        }
    }

    /// Check if value is inside the range, bounds included.
    pub fn contains(&self, val: f32) -> bool {
        self.low <= val && val <= self.high
    }

    /// Check if value is strictly between the bounds.
    pub fn contains_exclusive(&self, val: f32) -> bool {
        self.low < val && val < self.high
    }

    pub fn width(&self) -> f32 {
        self.high - self.low
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::empty()
    }
}

/// Conversion from standard library type.
/// Unlocks simple syntax:
/// ```
/// # use raymarch_lib::common::ValueRange;
/// let range: ValueRange = (0.2..0.8).into();
/// ```
impl From<Range<f32>> for ValueRange {
    fn from(range: Range<f32>) -> Self {
        ValueRange {
            low: range.start,
            high: range.end,
        }
    }
}
