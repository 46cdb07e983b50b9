/// A score interval with independently inclusive or exclusive ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    /// Whether `min` itself is excluded.
    pub min_exclusive: bool,
    /// Whether `max` itself is excluded.
    pub max_exclusive: bool,
}

impl ScoreRange {
    /// `[min, max]`
    pub fn inclusive(min: f64, max: f64) -> Self {
        ScoreRange {
            min,
            max,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    /// `(min, max)`
    pub fn exclusive(min: f64, max: f64) -> Self {
        ScoreRange {
            min,
            max,
            min_exclusive: true,
            max_exclusive: true,
        }
    }

    /// Returns true if `score` is at or past the lower end of the range.
    pub fn above_min(&self, score: f64) -> bool {
        if self.min_exclusive {
            score > self.min
        } else {
            score >= self.min
        }
    }

    /// Returns true if `score` is at or before the upper end of the range.
    pub fn below_max(&self, score: f64) -> bool {
        if self.max_exclusive {
            score < self.max
        } else {
            score <= self.max
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.above_min(score) && self.below_max(score)
    }

    /// Returns true if no score can satisfy the range.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
            || (self.min == self.max && (self.min_exclusive || self.max_exclusive))
            || self.min.is_nan()
            || self.max.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_ranges_contain_their_ends() {
        let range = ScoreRange::inclusive(1.0, 3.0);
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(0.5));
        assert!(!range.contains(3.5));
    }

    #[test]
    fn exclusive_ranges_skip_their_ends() {
        let range = ScoreRange::exclusive(1.0, 3.0);
        assert!(!range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(!range.contains(3.0));
    }

    #[test]
    fn is_empty_detects_unsatisfiable_ranges() {
        assert!(ScoreRange::inclusive(2.0, 1.0).is_empty());
        assert!(ScoreRange::exclusive(1.0, 1.0).is_empty());
        assert!(ScoreRange::inclusive(f64::NAN, 1.0).is_empty());
        assert!(!ScoreRange::inclusive(1.0, 1.0).is_empty());
    }
}
