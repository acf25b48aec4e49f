//! Correctable six-sector hue wheel.
//!
//! The wheel is split into six sectors, each blending two of the red, green and
//! blue channels. By default every sector is `SCALE_MAX` wide, which matches
//! textbook 60° HSV math. Real LEDs rarely mix that evenly, so each of the six
//! primary/secondary hue boundaries can be shifted by up to ±30°. Shifting a
//! boundary grows one neighbouring sector and shrinks the other by the same
//! amount, so the total width always stays `HUE_MAX`.

use crate::types::{HUE_MAX, SCALE_MAX};

/// Largest correction in degrees accepted for a single boundary.
pub const MAX_CORRECTION_DEGREES: f32 = 30.0;

/// Per-boundary hue corrections in degrees.
///
/// A positive value moves the boundary towards lower hues, widening the
/// sector that ends at it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HueCorrection {
    pub red: f32,
    pub yellow: f32,
    pub green: f32,
    pub cyan: f32,
    pub blue: f32,
    pub magenta: f32,
}

impl HueCorrection {
    /// Creates a correction set from six degree offsets.
    pub fn new(red: f32, yellow: f32, green: f32, cyan: f32, blue: f32, magenta: f32) -> Self {
        Self {
            red,
            yellow,
            green,
            cyan,
            blue,
            magenta,
        }
    }

    /// Offsets indexed by boundary, red first.
    fn to_array(self) -> [f32; 6] {
        [
            self.red,
            self.yellow,
            self.green,
            self.cyan,
            self.blue,
            self.magenta,
        ]
    }
}

/// Sector boundaries and widths of the hue wheel.
///
/// Sector `i` covers hues in `(boundary[i], boundary[i + 1]]`. `boundary[0]`
/// may be negative and `boundary[6]` may exceed `HUE_MAX` when red is
/// corrected; `boundary[6] == boundary[0] + HUE_MAX` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HueWheel {
    boundaries: [i32; 7],
    widths: [i32; 6],
}

impl Default for HueWheel {
    fn default() -> Self {
        Self::uniform()
    }
}

impl HueWheel {
    /// Creates a wheel with six sectors of equal width.
    pub fn uniform() -> Self {
        let sector = SCALE_MAX as i32;
        Self {
            boundaries: core::array::from_fn(|i| i as i32 * sector),
            widths: [sector; 6],
        }
    }

    /// Resets the wheel and applies a new set of boundary corrections.
    ///
    /// Each offset is clamped to `±MAX_CORRECTION_DEGREES`. Corrections are
    /// never cumulative: the wheel is rebuilt from uniform sectors first.
    pub fn set_correction(&mut self, correction: HueCorrection) {
        *self = Self::uniform();

        for (k, degrees) in correction.to_array().into_iter().enumerate() {
            let shift = degrees_to_units(degrees);
            let before = (k + 5) % 6;

            self.boundaries[k] += shift;
            if k == 0 {
                self.boundaries[6] += shift;
            }
            self.widths[before] += shift;
            self.widths[k] -= shift;
        }
    }

    /// Returns the correction currently applied, in degrees.
    ///
    /// Reproduces the values passed to [`HueWheel::set_correction`] to within
    /// one internal hue unit (60/1023 of a degree), after clamping.
    pub fn correction(&self) -> HueCorrection {
        let degrees = |k: usize| {
            let shift = self.boundaries[k] - k as i32 * SCALE_MAX as i32;
            -(shift as f32) / SCALE_MAX as f32 * 60.0
        };

        HueCorrection {
            red: degrees(0),
            yellow: degrees(1),
            green: degrees(2),
            cyan: degrees(3),
            blue: degrees(4),
            magenta: degrees(5),
        }
    }

    /// Sector boundaries, `boundaries()[6]` closes the wheel.
    pub fn boundaries(&self) -> &[i32; 7] {
        &self.boundaries
    }

    /// Sector widths in hue units.
    pub fn widths(&self) -> &[i32; 6] {
        &self.widths
    }

    /// Locates `hue` on the wheel.
    ///
    /// Returns the sector index and the position inside that sector scaled to
    /// `[0, SCALE_MAX]`, relative to the sector's own width.
    pub fn locate(&self, hue: u16) -> (usize, u16) {
        let mut h = hue as i32 % HUE_MAX as i32;
        if h <= self.boundaries[0] {
            h += HUE_MAX as i32;
        }
        if h > self.boundaries[6] {
            h -= HUE_MAX as i32;
        }

        let sector = (0..6)
            .find(|&i| h <= self.boundaries[i + 1])
            .unwrap_or(5);
        let width = self.widths[sector].max(1);
        let offset = (h - self.boundaries[sector]).clamp(0, width);
        let fraction = offset * SCALE_MAX as i32 / width;

        (sector, fraction as u16)
    }
}

/// Converts a boundary shift in degrees into hue units, rounded to nearest.
///
/// Positive degrees widen the sector ending at the boundary, which moves the
/// boundary down the wheel, hence the sign flip. The result stays within half
/// a sector so two opposing shifts never collapse the sector between them.
fn degrees_to_units(degrees: f32) -> i32 {
    let limit = SCALE_MAX as i32 / 2;
    let degrees = degrees.clamp(-MAX_CORRECTION_DEGREES, MAX_CORRECTION_DEGREES);
    let units = degrees / 60.0 * SCALE_MAX as f32;
    let rounded = if units >= 0.0 { units + 0.5 } else { units - 0.5 };
    -(rounded as i32).clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_sum(wheel: &HueWheel) -> i32 {
        wheel.widths().iter().sum()
    }

    fn assert_consistent(wheel: &HueWheel) {
        let b = wheel.boundaries();
        for i in 0..6 {
            assert_eq!(b[i + 1] - b[i], wheel.widths()[i]);
            assert!(wheel.widths()[i] > 0);
        }
        assert_eq!(b[6] - b[0], HUE_MAX as i32);
    }

    #[test]
    fn uniform_wheel_has_equal_sectors() {
        let wheel = HueWheel::uniform();
        assert_eq!(wheel.widths(), &[SCALE_MAX as i32; 6]);
        assert_eq!(width_sum(&wheel), HUE_MAX as i32);
        assert_consistent(&wheel);
    }

    #[test]
    fn correction_redistributes_width() {
        let mut wheel = HueWheel::uniform();
        wheel.set_correction(HueCorrection::new(10.0, -5.0, 20.0, 0.0, -30.0, 30.0));

        assert_eq!(width_sum(&wheel), HUE_MAX as i32);
        assert_consistent(&wheel);
        assert_ne!(wheel.widths()[0], SCALE_MAX as i32);
    }

    #[test]
    fn correction_is_not_cumulative() {
        let mut once = HueWheel::uniform();
        once.set_correction(HueCorrection::new(10.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        let mut twice = HueWheel::uniform();
        twice.set_correction(HueCorrection::new(10.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        twice.set_correction(HueCorrection::new(10.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        assert_eq!(once, twice);
    }

    #[test]
    fn correction_round_trips_within_one_unit() {
        let unit = 60.0 / SCALE_MAX as f32;
        let applied = HueCorrection::new(12.5, -7.25, 3.0, -29.9, 0.1, 18.0);
        let mut wheel = HueWheel::uniform();
        wheel.set_correction(applied);

        let read = wheel.correction();
        for (a, r) in applied.to_array().iter().zip(read.to_array().iter()) {
            let diff = a - r;
            assert!(diff < unit && diff > -unit, "applied {a}, read back {r}");
        }
    }

    #[test]
    fn out_of_range_corrections_are_clamped() {
        let mut wheel = HueWheel::uniform();
        wheel.set_correction(HueCorrection::new(90.0, -45.0, 0.0, 0.0, 0.0, 0.0));

        let read = wheel.correction();
        assert!(read.red <= MAX_CORRECTION_DEGREES && read.red > 29.9);
        assert!(read.yellow >= -MAX_CORRECTION_DEGREES && read.yellow < -29.9);
        assert_consistent(&wheel);
    }

    #[test]
    fn locate_handles_red_wraparound() {
        let mut wheel = HueWheel::uniform();
        wheel.set_correction(HueCorrection::new(10.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        // red boundary moved below zero: the top of the wheel now belongs to sector 0
        let (sector, _) = wheel.locate(HUE_MAX - 10);
        assert_eq!(sector, 0);

        wheel.set_correction(HueCorrection::new(-10.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        // red boundary moved above zero: the bottom of the wheel belongs to sector 5
        let (sector, _) = wheel.locate(10);
        assert_eq!(sector, 5);
    }

    #[test]
    fn locate_uses_sector_width_for_fraction() {
        let wheel = HueWheel::uniform();
        assert_eq!(wheel.locate(SCALE_MAX / 2), (0, SCALE_MAX / 2));
        assert_eq!(wheel.locate(SCALE_MAX), (0, SCALE_MAX));
        assert_eq!(wheel.locate(SCALE_MAX + 1).0, 1);
    }
}
