/// A closed range of scalar values, used for ray parameter bounds and
/// box extents alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within [min, max].
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly inside (min, max).
    ///
    /// Intersection routines use this so that roots sitting exactly on a
    /// bound are rejected. NaN is never surrounded.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Linear interpolation from min (at 0) to max (at 1).
    pub fn lerp(&self, s: f32) -> f32 {
        self.min + s * (self.max - self.min)
    }

    /// Contains nothing (min > max).
    pub const EMPTY: Interval = Interval::new(f32::INFINITY, f32::NEG_INFINITY);

    /// Contains everything.
    pub const UNIVERSE: Interval = Interval::new(f32::NEG_INFINITY, f32::INFINITY);

    /// Default shutter window for motion blur.
    pub const UNIT: Interval = Interval::new(0.0, 1.0);
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains_vs_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
        assert!(!interval.surrounds(f32::NAN));
    }

    #[test]
    fn test_interval_lerp() {
        let shutter = Interval::new(1.0, 3.0);
        assert_eq!(shutter.lerp(0.0), 1.0);
        assert_eq!(shutter.lerp(0.5), 2.0);
        assert_eq!(shutter.lerp(1.0), 3.0);
    }

    #[test]
    fn test_interval_empty_and_universe() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(1e10));
        assert!(Interval::UNIVERSE.contains(-1e10));
    }
}
