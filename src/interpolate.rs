//! Incremental-error stepping for animated values.
//!
//! This is the line rasterization idea applied to time: the "x axis" is the
//! tick counter and the "y axis" is the animated value. Each tick the
//! accumulated error decides whether the value moves, so rounding is spread
//! evenly over the whole transition instead of bunching up at either end.

use crate::types::{HUE_MAX, HueDirection};

/// Fractional bits used for the per-step increment.
pub const FIXED_POINT_BITS: u32 = 8;

/// Stepping state for one animated dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interpolation {
    base: i32,
    delta: i64,
    steps: i64,
    increment: i64,
    error: i64,
    count: i64,
    current: i32,
}

impl Interpolation {
    /// Prepares a walk from `base` to `target` over `steps` ticks.
    ///
    /// `steps` below one is treated as one.
    pub fn new(base: i32, target: i32, steps: u32) -> Self {
        let direction = if target < base { -1 } else { 1 };
        Self::with_delta(base, (target as i64 - base as i64).abs(), direction, steps)
    }

    /// Prepares a hue walk around the wheel in the requested direction.
    ///
    /// Values produced by [`Interpolation::step_hue`] are wrapped into
    /// `[0, HUE_MAX)`.
    pub fn hue(base: u16, target: u16, direction: HueDirection, steps: u32) -> Self {
        let wheel = HUE_MAX as i64;
        let (base, target) = (base as i64 % wheel, target as i64 % wheel);
        let down = (base - target).rem_euclid(wheel);
        let up = (target - base).rem_euclid(wheel);

        let shortest_down = down < up;
        let go_down = match direction {
            HueDirection::Shortest => shortest_down,
            HueDirection::Longest => !shortest_down,
        };

        let (delta, sign) = if go_down { (down, -1) } else { (up, 1) };
        Self::with_delta(base as i32, delta, sign, steps)
    }

    fn with_delta(base: i32, delta: i64, sign: i64, steps: u32) -> Self {
        let steps = steps.max(1) as i64;
        let increment = if delta < steps {
            1 << FIXED_POINT_BITS
        } else {
            (delta << FIXED_POINT_BITS) / steps
        };

        Self {
            base,
            delta,
            steps,
            increment: increment * sign,
            error: -steps,
            count: 0,
            current: base,
        }
    }

    /// Advances one tick and returns the new value.
    pub fn step(&mut self) -> i32 {
        self.error += 2 * self.delta;
        if self.error > 0 {
            self.count += 1;
            self.error -= 2 * self.steps;
            self.current =
                (self.base as i64 + ((self.count * self.increment) >> FIXED_POINT_BITS)) as i32;
        }
        self.current
    }

    /// Advances one tick and returns the new hue, wrapped onto the wheel.
    pub fn step_hue(&mut self) -> u16 {
        wrap_hue(self.step())
    }

    /// The most recent value, unwrapped.
    pub fn current(&self) -> i32 {
        self.current
    }

    /// Absolute distance the walk covers.
    pub fn delta(&self) -> i64 {
        self.delta
    }
}

/// Wraps any hue onto the wheel using circular modulo.
#[inline]
pub fn wrap_hue(hue: i32) -> u16 {
    hue.rem_euclid(HUE_MAX as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(mut interpolation: Interpolation, steps: u32) -> i32 {
        for _ in 0..steps {
            interpolation.step();
        }
        interpolation.current()
    }

    #[test]
    fn reaches_target_when_delta_exceeds_steps() {
        assert_eq!(walk(Interpolation::new(0, 1000, 10), 10), 1000);
        assert_eq!(walk(Interpolation::new(1000, 0, 10), 10), 0);
    }

    #[test]
    fn reaches_target_when_delta_is_below_steps() {
        assert_eq!(walk(Interpolation::new(100, 107, 50), 50), 107);
        assert_eq!(walk(Interpolation::new(107, 100, 50), 50), 100);
    }

    #[test]
    fn spreads_small_deltas_evenly() {
        let mut i = Interpolation::new(0, 5, 10);
        let mut moves = heapless::Vec::<u32, 10>::new();
        let mut last = 0;
        for tick in 0..10 {
            let v = i.step();
            if v != last {
                moves.push(tick).unwrap();
                last = v;
            }
        }
        assert_eq!(moves.len(), 5);
        assert!(moves.windows(2).all(|w| w[1] - w[0] == 2));
    }

    #[test]
    fn value_is_monotonic() {
        let mut i = Interpolation::new(20, 900, 37);
        let mut last = 20;
        for _ in 0..37 {
            let v = i.step();
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn zero_steps_is_treated_as_one() {
        assert_eq!(walk(Interpolation::new(0, 300, 0), 1), 300);
    }

    #[test]
    fn hue_shortest_path_crosses_zero() {
        let mut i = Interpolation::hue(10, HUE_MAX - 10, HueDirection::Shortest, 10);
        assert_eq!(i.delta(), 20);
        for _ in 0..10 {
            let h = i.step_hue();
            assert!(h < HUE_MAX);
            assert!(h <= 10 || h >= HUE_MAX - 10);
        }
        assert_eq!(wrap_hue(i.current()), HUE_MAX - 10);
    }

    #[test]
    fn hue_longest_path_goes_around() {
        let i = Interpolation::hue(10, HUE_MAX - 10, HueDirection::Longest, 10);
        assert_eq!(i.delta(), HUE_MAX as i64 - 20);
    }

    #[test]
    fn equal_hues_stay_put_in_either_direction() {
        for direction in [HueDirection::Shortest, HueDirection::Longest] {
            let mut i = Interpolation::hue(1200, 1200, direction, 25);
            assert_eq!(i.delta(), 0);
            for _ in 0..25 {
                assert_eq!(i.step_hue(), 1200);
            }
        }
    }

    #[test]
    fn wrap_hue_is_circular() {
        assert_eq!(wrap_hue(-1), HUE_MAX - 1);
        assert_eq!(wrap_hue(HUE_MAX as i32), 0);
        assert_eq!(wrap_hue(5), 5);
    }
}
