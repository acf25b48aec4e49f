//! Core color types and fixed-point scale constants.

use palette::{RgbHue, Srgb};

/// Bit depth of every output channel.
pub const PWM_DEPTH: u32 = 10;

/// Largest channel, saturation and value level (`2^PWM_DEPTH - 1`).
pub const SCALE_MAX: u16 = (1 << PWM_DEPTH) - 1;

/// Size of the fixed-point hue wheel: six sectors of `SCALE_MAX` each.
pub const HUE_MAX: u16 = 6 * SCALE_MAX;

/// Logical tick period. Animation step counts are derived from it.
pub const TICK_PERIOD_MS: u32 = 20;

/// Default warm white color temperature in Kelvin.
pub const DEFAULT_WARM_KELVIN: i32 = 2700;

/// Default cold white color temperature in Kelvin.
pub const DEFAULT_COLD_KELVIN: i32 = 6000;

/// Upper bound applied to kelvin values given through the float constructors.
pub const MAX_KELVIN: i32 = 10_000;

/// A color in hue/saturation/value space plus a white color temperature.
///
/// All components are fixed-point: `hue` in `[0, HUE_MAX)`, `saturation` and
/// `value` in `[0, SCALE_MAX]`. The kelvin value only affects how the white
/// remainder is split between the warm and cold channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HsvColor {
    pub hue: u16,
    pub saturation: u16,
    pub value: u16,
    pub kelvin: i32,
}

impl HsvColor {
    /// Creates a color from raw fixed-point components.
    ///
    /// Hue is wrapped onto the wheel, saturation and value are clamped to
    /// `SCALE_MAX`.
    #[inline]
    pub fn new(hue: u16, saturation: u16, value: u16, kelvin: i32) -> Self {
        Self {
            hue: hue % HUE_MAX,
            saturation: saturation.min(SCALE_MAX),
            value: value.min(SCALE_MAX),
            kelvin,
        }
    }

    /// Creates a color from hue in degrees and saturation/value in percent.
    ///
    /// Hue is normalized into `[0, 360)`, so `-90.0` and `270.0` are the same
    /// color. Saturation and value are clamped to `[0, 100]`.
    pub fn from_degrees(hue: f32, saturation: f32, value: f32) -> Self {
        Self::with_kelvin(hue, saturation, value, 0)
    }

    /// Like [`HsvColor::from_degrees`] with a white color temperature,
    /// clamped to `[0, MAX_KELVIN]`.
    pub fn with_kelvin(hue: f32, saturation: f32, value: f32, kelvin: i32) -> Self {
        let degrees = RgbHue::from_degrees(hue).into_positive_degrees();
        let hue = (degrees / 360.0 * HUE_MAX as f32) as u16 % HUE_MAX;

        Self {
            hue,
            saturation: percent_to_scale(saturation),
            value: percent_to_scale(value),
            kelvin: kelvin.clamp(0, MAX_KELVIN),
        }
    }

    /// Returns `(hue°, saturation%, value%)`.
    pub fn to_degrees(&self) -> (f32, f32, f32) {
        (
            self.hue as f32 / HUE_MAX as f32 * 360.0,
            self.saturation as f32 / SCALE_MAX as f32 * 100.0,
            self.value as f32 / SCALE_MAX as f32 * 100.0,
        )
    }
}

fn percent_to_scale(percent: f32) -> u16 {
    (percent.clamp(0.0, 100.0) / 100.0 * SCALE_MAX as f32) as u16
}

/// Intermediate result of an HSV conversion, before white balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbwColor {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub white: u16,
    pub kelvin: i32,
}

/// The five output channel levels, each in `[0, SCALE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelOutput {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub warm_white: u16,
    pub cold_white: u16,
}

impl ChannelOutput {
    /// All channels off.
    pub const OFF: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        warm_white: 0,
        cold_white: 0,
    };

    /// Creates a channel output, clamping every level to `SCALE_MAX`.
    #[inline]
    pub fn new(red: u16, green: u16, blue: u16, warm_white: u16, cold_white: u16) -> Self {
        Self::from_array([red, green, blue, warm_white, cold_white])
    }

    /// Channels in `[red, green, blue, warm_white, cold_white]` order.
    #[inline]
    pub fn to_array(self) -> [u16; 5] {
        [
            self.red,
            self.green,
            self.blue,
            self.warm_white,
            self.cold_white,
        ]
    }

    /// Inverse of [`ChannelOutput::to_array`], clamping to `SCALE_MAX`.
    #[inline]
    pub fn from_array(channels: [u16; 5]) -> Self {
        let [red, green, blue, warm_white, cold_white] = channels.map(|c| c.min(SCALE_MAX));
        Self {
            red,
            green,
            blue,
            warm_white,
            cold_white,
        }
    }

    /// Returns the RGB part as an `Srgb` in the 0.0-1.0 range.
    pub fn to_srgb(&self) -> Srgb {
        let scale = SCALE_MAX as f32;
        Srgb::new(
            self.red as f32 / scale,
            self.green as f32 / scale,
            self.blue as f32 / scale,
        )
    }
}

/// The last color written to the output, as the caller expressed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// An HSV color converted through the color model.
    Hsv(HsvColor),
    /// Raw channel levels that bypassed HSV conversion.
    Raw(ChannelOutput),
}

/// Which output channels the fixture has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorMode {
    /// Red, green and blue only. Gray is produced by the RGB channels.
    #[default]
    Rgb,
    /// RGB plus a warm white channel.
    RgbWarmWhite,
    /// RGB plus a cold white channel.
    RgbColdWhite,
    /// RGB plus warm and cold white, mixed by color temperature.
    RgbWarmColdWhite,
}

impl ColorMode {
    /// Returns true if the white remainder goes to a dedicated white channel.
    #[inline]
    pub fn has_white(self) -> bool {
        self != ColorMode::Rgb
    }
}

/// HSV to channel conversion algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HsvModel {
    /// Sector-linear conversion on the configurable, correctable hue wheel.
    #[default]
    Corrected,
    /// Textbook conversion with six uniform 60° sectors. Ignores hue correction.
    Reference,
}

/// What happens to the white remainder `value - chroma` in [`ColorMode::Rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RgbWhitePolicy {
    /// Add the remainder to red, green and blue.
    #[default]
    MixIntoRgb,
    /// Drop the remainder.
    Discard,
}

/// Which way around the hue wheel a transition travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HueDirection {
    /// Take the shorter arc.
    #[default]
    Shortest,
    /// Take the longer arc.
    Longest,
}
