//! HSV to five-channel conversion with hue, white balance and brightness correction.
//!
//! [`ColorModel`] owns every piece of color configuration and is read on each
//! conversion. The conversion pipeline is:
//!
//! 1. [`ColorModel::hsv_to_rgbw`]: dimming curve, sector lookup on the
//!    [`HueWheel`], white remainder extraction.
//! 2. [`ColorModel::white_balance`]: split the white remainder between the warm
//!    and cold channels according to [`ColorMode`] and color temperature.
//! 3. [`ColorModel::correct`]: per-channel brightness scaling, applied last and
//!    also to raw channel output.

use crate::gamma::{dim, dim_inverted};
use crate::hue_wheel::{HueCorrection, HueWheel};
use crate::types::{
    ChannelOutput, ColorMode, DEFAULT_COLD_KELVIN, DEFAULT_WARM_KELVIN, HUE_MAX, HsvColor,
    HsvModel, RgbWhitePolicy, RgbwColor, SCALE_MAX,
};
use palette::{FromColor, Hsv, Srgb};

/// Per-channel maximum brightness, each factor in `[0, SCALE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrightnessFactors {
    factors: [u16; 5],
}

impl Default for BrightnessFactors {
    fn default() -> Self {
        Self {
            factors: [SCALE_MAX; 5],
        }
    }
}

impl BrightnessFactors {
    /// Creates factors from percentages in `[red, green, blue, warm, cold]`
    /// order. Values above 100 are clamped.
    pub fn from_percent(percent: [u8; 5]) -> Self {
        Self {
            factors: percent.map(|p| (p.min(100) as u32 * SCALE_MAX as u32 / 100) as u16),
        }
    }

    /// Returns the factors as percentages, rounded to the nearest percent.
    pub fn to_percent(&self) -> [u8; 5] {
        self.factors
            .map(|f| ((f as u32 * 100 + SCALE_MAX as u32 / 2) / SCALE_MAX as u32) as u8)
    }

    /// Raw factors in `[0, SCALE_MAX]`.
    pub fn factors(&self) -> [u16; 5] {
        self.factors
    }

    /// Scales every channel by its factor. A full factor leaves the channel
    /// unchanged, a zero factor mutes it.
    pub fn apply(&self, output: ChannelOutput) -> ChannelOutput {
        let channels = output.to_array();
        ChannelOutput::from_array(core::array::from_fn(|i| {
            (channels[i] as u32 * self.factors[i] as u32 / SCALE_MAX as u32) as u16
        }))
    }
}

/// Color temperature range spanned by the warm and cold white channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WhiteBalance {
    pub warm_kelvin: i32,
    pub cold_kelvin: i32,
}

impl Default for WhiteBalance {
    fn default() -> Self {
        Self {
            warm_kelvin: DEFAULT_WARM_KELVIN,
            cold_kelvin: DEFAULT_COLD_KELVIN,
        }
    }
}

impl WhiteBalance {
    /// Creates a range. The bounds are swapped if given in reverse order.
    pub fn new(warm_kelvin: i32, cold_kelvin: i32) -> Self {
        Self {
            warm_kelvin: warm_kelvin.min(cold_kelvin),
            cold_kelvin: warm_kelvin.max(cold_kelvin),
        }
    }

    /// Splits `white` between warm and cold by linear interpolation over the
    /// range. Outside the range, or for an empty range, the split is 50/50.
    /// The two parts always add up to `white`.
    pub fn mix(&self, white: u16, kelvin: i32) -> (u16, u16) {
        let span = self.cold_kelvin as i64 - self.warm_kelvin as i64;
        let warm = if span > 0 && (self.warm_kelvin..=self.cold_kelvin).contains(&kelvin) {
            let warm_factor = (self.cold_kelvin as i64 - kelvin as i64) * SCALE_MAX as i64 / span;
            (white as i64 * warm_factor / SCALE_MAX as i64) as u16
        } else {
            white / 2
        };
        (warm, white - warm)
    }
}

/// A plain snapshot of the full color configuration, suitable for persisting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorSettings {
    pub mode: ColorMode,
    pub model: HsvModel,
    pub rgb_white_policy: RgbWhitePolicy,
    pub hue_correction: HueCorrection,
    pub brightness_percent: [u8; 5],
    pub white_balance: WhiteBalance,
}

impl Default for ColorSettings {
    fn default() -> Self {
        ColorModel::new().settings()
    }
}

/// Color conversion engine and its configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorModel {
    mode: ColorMode,
    model: HsvModel,
    rgb_white_policy: RgbWhitePolicy,
    hue_wheel: HueWheel,
    brightness: BrightnessFactors,
    white_balance: WhiteBalance,
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorModel {
    /// Creates a model for an RGB-only fixture with a uniform hue wheel,
    /// full brightness and the default 2700 K - 6000 K white range.
    pub fn new() -> Self {
        Self {
            mode: ColorMode::default(),
            model: HsvModel::default(),
            rgb_white_policy: RgbWhitePolicy::default(),
            hue_wheel: HueWheel::uniform(),
            brightness: BrightnessFactors::default(),
            white_balance: WhiteBalance::default(),
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    pub fn color_mode(&self) -> ColorMode {
        self.mode
    }

    pub fn set_hsv_model(&mut self, model: HsvModel) {
        self.model = model;
    }

    pub fn hsv_model(&self) -> HsvModel {
        self.model
    }

    /// Selects what [`ColorMode::Rgb`] does with the white remainder.
    pub fn set_rgb_white_policy(&mut self, policy: RgbWhitePolicy) {
        self.rgb_white_policy = policy;
    }

    pub fn rgb_white_policy(&self) -> RgbWhitePolicy {
        self.rgb_white_policy
    }

    /// Rebuilds the hue wheel with the given boundary corrections.
    pub fn set_hue_correction(&mut self, correction: HueCorrection) {
        self.hue_wheel.set_correction(correction);
    }

    pub fn hue_correction(&self) -> HueCorrection {
        self.hue_wheel.correction()
    }

    pub fn hue_wheel(&self) -> &HueWheel {
        &self.hue_wheel
    }

    /// Sets per-channel brightness in percent, `[red, green, blue, warm, cold]`.
    pub fn set_brightness(&mut self, percent: [u8; 5]) {
        self.brightness = BrightnessFactors::from_percent(percent);
    }

    pub fn brightness(&self) -> &BrightnessFactors {
        &self.brightness
    }

    pub fn set_white_balance_range(&mut self, warm_kelvin: i32, cold_kelvin: i32) {
        self.white_balance = WhiteBalance::new(warm_kelvin, cold_kelvin);
    }

    pub fn white_balance_range(&self) -> WhiteBalance {
        self.white_balance
    }

    /// Returns a snapshot of the whole configuration.
    pub fn settings(&self) -> ColorSettings {
        ColorSettings {
            mode: self.mode,
            model: self.model,
            rgb_white_policy: self.rgb_white_policy,
            hue_correction: self.hue_correction(),
            brightness_percent: self.brightness.to_percent(),
            white_balance: self.white_balance,
        }
    }

    /// Restores a configuration previously returned by [`ColorModel::settings`].
    pub fn apply_settings(&mut self, settings: &ColorSettings) {
        self.mode = settings.mode;
        self.model = settings.model;
        self.rgb_white_policy = settings.rgb_white_policy;
        self.hue_wheel.set_correction(settings.hue_correction);
        self.brightness = BrightnessFactors::from_percent(settings.brightness_percent);
        self.white_balance = settings.white_balance;
    }

    /// Converts HSV to channel levels before brightness correction.
    pub fn convert(&self, hsv: &HsvColor) -> ChannelOutput {
        let rgbw = self.hsv_to_rgbw(hsv);
        let (warm_white, cold_white) = self.white_balance(rgbw.white, rgbw.kelvin);
        ChannelOutput {
            red: rgbw.red,
            green: rgbw.green,
            blue: rgbw.blue,
            warm_white,
            cold_white,
        }
    }

    /// Converts HSV to channel levels including brightness correction, ready
    /// for the hardware.
    pub fn to_output(&self, hsv: &HsvColor) -> ChannelOutput {
        self.correct(self.convert(hsv))
    }

    /// Applies per-channel brightness correction.
    #[inline]
    pub fn correct(&self, output: ChannelOutput) -> ChannelOutput {
        self.brightness.apply(output)
    }

    /// Splits a white amount into `(warm, cold)` for the current mode.
    ///
    /// Only [`ColorMode::RgbWarmColdWhite`] mixes by color temperature. Single
    /// white modes route everything to their one channel, RGB mode has already
    /// folded white into the color channels and returns zeros.
    pub fn white_balance(&self, white: u16, kelvin: i32) -> (u16, u16) {
        match self.mode {
            ColorMode::RgbWarmColdWhite => self.white_balance.mix(white, kelvin),
            ColorMode::RgbWarmWhite => (white, 0),
            ColorMode::RgbColdWhite => (0, white),
            ColorMode::Rgb => (0, 0),
        }
    }

    /// Converts HSV to red, green, blue and a white remainder.
    pub fn hsv_to_rgbw(&self, hsv: &HsvColor) -> RgbwColor {
        let value = dim(hsv.value);
        let saturation = dim_inverted(hsv.saturation);

        if saturation == 0 {
            return self.grayscale(value, hsv.kelvin);
        }

        let (red, green, blue) = match self.model {
            HsvModel::Corrected => self.sector_rgb(hsv.hue, saturation, value),
            HsvModel::Reference => reference_rgb(hsv.hue, saturation, value),
        };
        let white = value - (saturation as u32 * value as u32 / SCALE_MAX as u32) as u16;

        self.distribute_white(red, green, blue, white, hsv.kelvin)
    }

    /// Reverse conversion from channel levels to HSV.
    ///
    /// Not supported: always returns `None` and leaves the model untouched.
    pub fn rgb_to_hsv(&self, _rgbw: &RgbwColor) -> Option<HsvColor> {
        None
    }

    fn grayscale(&self, value: u16, kelvin: i32) -> RgbwColor {
        if self.mode.has_white() {
            RgbwColor {
                red: 0,
                green: 0,
                blue: 0,
                white: value,
                kelvin,
            }
        } else {
            RgbwColor {
                red: value,
                green: value,
                blue: value,
                white: 0,
                kelvin,
            }
        }
    }

    fn distribute_white(&self, red: u16, green: u16, blue: u16, white: u16, kelvin: i32) -> RgbwColor {
        if self.mode.has_white() {
            return RgbwColor {
                red,
                green,
                blue,
                white,
                kelvin,
            };
        }

        let added = match self.rgb_white_policy {
            RgbWhitePolicy::MixIntoRgb => white,
            RgbWhitePolicy::Discard => 0,
        };
        RgbwColor {
            red: (red + added).min(SCALE_MAX),
            green: (green + added).min(SCALE_MAX),
            blue: (blue + added).min(SCALE_MAX),
            white: 0,
            kelvin,
        }
    }

    /// Chroma-only channels for the sector `hue` falls in on the corrected wheel.
    fn sector_rgb(&self, hue: u16, saturation: u16, value: u16) -> (u16, u16, u16) {
        let chroma = (saturation as u32 * value as u32 / SCALE_MAX as u32) as u16;
        let (sector, fraction) = self.hue_wheel.locate(hue);

        let rising = scale(chroma, fraction);
        let falling = scale(chroma, SCALE_MAX - fraction);

        match sector {
            0 => (chroma, rising, 0),
            1 => (falling, chroma, 0),
            2 => (0, chroma, rising),
            3 => (0, falling, chroma),
            4 => (rising, 0, chroma),
            _ => (chroma, 0, falling),
        }
    }
}

#[inline]
fn scale(level: u16, factor: u16) -> u16 {
    (level as u32 * factor as u32 / SCALE_MAX as u32) as u16
}

/// Chroma-only channels from a uniform-sector conversion.
fn reference_rgb(hue: u16, saturation: u16, value: u16) -> (u16, u16, u16) {
    let scale_max = SCALE_MAX as f32;
    let degrees = hue as f32 / HUE_MAX as f32 * 360.0;
    let hsv = Hsv::new(degrees, saturation as f32 / scale_max, value as f32 / scale_max);
    let rgb = Srgb::from_color(hsv);

    let to_level = |c: f32| (c.clamp(0.0, 1.0) * scale_max + 0.5) as u16;
    let (red, green, blue) = (to_level(rgb.red), to_level(rgb.green), to_level(rgb.blue));
    let floor = red.min(green).min(blue);

    (red - floor, green - floor, blue - floor)
}
