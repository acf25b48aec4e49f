//! PWM output abstraction and the stage that feeds it.

use crate::color::ColorModel;
use crate::types::{ChannelOutput, Color, HsvColor};

/// Trait for abstracting the five-channel PWM hardware.
///
/// Implement this for your timer/PWM peripheral. Pin setup and PWM frequency
/// belong in the implementor's constructor.
pub trait PwmOutput {
    /// Writes all five channel levels, each in `[0, SCALE_MAX]`.
    ///
    /// Handle hardware errors internally, this method cannot fail.
    fn set_output(&mut self, output: ChannelOutput);

    /// Reads back the levels last applied to the hardware, if supported.
    fn output(&self) -> Option<ChannelOutput> {
        None
    }
}

/// Color model plus driver, remembering the last color that went out.
///
/// Animations write through this type. HSV colors are converted by the
/// model, raw channel levels bypass conversion, and both receive per-channel
/// brightness correction just before they reach the driver.
pub struct LedOutput<O: PwmOutput> {
    model: ColorModel,
    driver: O,
    hsv: HsvColor,
    raw: ChannelOutput,
    output: ChannelOutput,
    last: Color,
}

impl<O: PwmOutput> LedOutput<O> {
    /// Wraps a driver. Nothing is written until the first color is set.
    pub fn new(driver: O, model: ColorModel) -> Self {
        Self {
            model,
            driver,
            hsv: HsvColor::default(),
            raw: ChannelOutput::OFF,
            output: ChannelOutput::OFF,
            last: Color::Raw(ChannelOutput::OFF),
        }
    }

    /// Converts and writes an HSV color.
    pub fn set_hsv(&mut self, hsv: HsvColor) {
        self.hsv = hsv;
        self.raw = self.model.convert(&hsv);
        self.last = Color::Hsv(hsv);
        self.write();
    }

    /// Writes raw channel levels without HSV conversion.
    pub fn set_raw(&mut self, output: ChannelOutput) {
        self.raw = output;
        self.last = Color::Raw(output);
        self.write();
    }

    /// Writes either kind of color.
    pub fn set_color(&mut self, color: Color) {
        match color {
            Color::Hsv(hsv) => self.set_hsv(hsv),
            Color::Raw(output) => self.set_raw(output),
        }
    }

    /// Re-emits the last color through the current configuration.
    pub fn refresh(&mut self) {
        self.set_color(self.last);
    }

    /// Last HSV color written. Raw writes leave it untouched.
    pub fn current_hsv(&self) -> HsvColor {
        self.hsv
    }

    /// Channel levels of the last write, before brightness correction.
    pub fn current_raw(&self) -> ChannelOutput {
        self.raw
    }

    /// Channel levels the driver received on the last write.
    ///
    /// Configuration changes show up here only after the next write.
    pub fn current_output(&self) -> ChannelOutput {
        self.output
    }

    /// The last color written, as it was requested.
    pub fn last_color(&self) -> Color {
        self.last
    }

    pub fn model(&self) -> &ColorModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ColorModel {
        &mut self.model
    }

    pub fn driver(&self) -> &O {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut O {
        &mut self.driver
    }

    fn write(&mut self) {
        self.output = self.model.correct(self.raw);
        self.driver.set_output(self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorMode, HUE_MAX, SCALE_MAX};

    #[derive(Default)]
    struct Recorder {
        last: Option<ChannelOutput>,
        writes: usize,
    }

    impl PwmOutput for Recorder {
        fn set_output(&mut self, output: ChannelOutput) {
            self.last = Some(output);
            self.writes += 1;
        }

        fn output(&self) -> Option<ChannelOutput> {
            self.last
        }
    }

    #[test]
    fn nothing_written_before_first_color() {
        let led = LedOutput::new(Recorder::default(), ColorModel::new());
        assert_eq!(led.driver().writes, 0);
        assert_eq!(led.driver().output(), None);
    }

    #[test]
    fn hsv_write_is_converted_and_corrected() {
        let mut model = ColorModel::new();
        model.set_brightness([50, 100, 100, 100, 100]);
        let mut led = LedOutput::new(Recorder::default(), model);

        led.set_hsv(HsvColor::new(0, SCALE_MAX, SCALE_MAX, 0));

        assert_eq!(led.current_raw().red, SCALE_MAX);
        assert_eq!(led.current_output().red, 511);
        assert_eq!(led.driver().output().map(|o| o.red), Some(511));
        assert!(matches!(led.last_color(), Color::Hsv(_)));
    }

    #[test]
    fn raw_write_keeps_last_hsv() {
        let mut led = LedOutput::new(Recorder::default(), ColorModel::new());
        let hsv = HsvColor::new(HUE_MAX / 3, SCALE_MAX, SCALE_MAX, 0);
        led.set_hsv(hsv);
        led.set_raw(ChannelOutput::new(1, 2, 3, 4, 5));

        assert_eq!(led.current_hsv(), hsv);
        assert_eq!(led.last_color(), Color::Raw(ChannelOutput::new(1, 2, 3, 4, 5)));
    }

    #[test]
    fn current_output_is_what_was_sent() {
        let mut led = LedOutput::new(Recorder::default(), ColorModel::new());
        led.set_raw(ChannelOutput::new(800, 0, 0, 0, 0));

        led.model_mut().set_brightness([50, 100, 100, 100, 100]);
        assert_eq!(led.current_output().red, 800);
        assert_eq!(led.driver().output(), Some(led.current_output()));

        led.refresh();
        assert_eq!(led.current_output().red, 399);
        assert_eq!(led.driver().output(), Some(led.current_output()));
    }

    #[test]
    fn refresh_applies_new_configuration() {
        let mut led = LedOutput::new(Recorder::default(), ColorModel::new());
        led.set_hsv(HsvColor::new(0, 0, SCALE_MAX, 4000));
        assert_eq!(led.current_output().warm_white, 0);

        led.model_mut().set_color_mode(ColorMode::RgbWarmWhite);
        led.refresh();

        assert_eq!(led.driver().writes, 2);
        assert_eq!(led.current_output().warm_white, SCALE_MAX);
        assert_eq!(led.current_output().red, 0);
    }
}
