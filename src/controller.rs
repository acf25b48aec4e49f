//! Tick-driven RGBWW LED controller.
//!
//! Provides [`RgbwwController`], which owns the output stage, a queue of
//! pending animations and at most one active animation. Requests are cheap
//! and non-blocking. All visible change happens inside [`RgbwwController::tick`],
//! which the application calls from its main loop or a timer.

use crate::animation::{Animation, RawTransition, SetOutput, Transition};
use crate::color::{ColorModel, ColorSettings, WhiteBalance};
use crate::command::ControllerAction;
use crate::hue_wheel::HueCorrection;
use crate::output::{LedOutput, PwmOutput};
use crate::queue::AnimationQueue;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{
    ChannelOutput, Color, ColorMode, HsvColor, HsvModel, HueDirection, RgbWhitePolicy,
    TICK_PERIOD_MS,
};

/// What a call to [`RgbwwController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Less than one tick period since the last accepted tick. Nothing advanced.
    Throttled,
    /// No active animation and nothing queued.
    Idle,
    /// The active animation advanced one step and is still running.
    Running,
    /// The active animation finished on this tick. The completion callback
    /// has been invoked.
    Finished,
}

/// Errors that can occur when requesting animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// The animation queue is full. The request was dropped.
    QueueFull,
}

impl core::fmt::Display for ControllerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControllerError::QueueFull => write!(f, "animation queue is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ControllerError {}

/// Drives one RGBWW fixture through queued color animations.
///
/// Requests with `queue == false` replace everything: the queue and the
/// active animation are dropped before the new animation is queued. Requests
/// with `queue == true` wait their turn.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and completion callback
/// * `I` - Time instant type
/// * `O` - PWM output implementation type
/// * `T` - Time source implementation type
/// * `Q` - Capacity of the animation queue
/// * `S` - Maximum number of animations in an [`AnimationSet`](crate::AnimationSet)
pub struct RgbwwController<
    't,
    I: TimeInstant,
    O: PwmOutput,
    T: TimeSource<I>,
    const Q: usize,
    const S: usize,
> {
    led: LedOutput<O>,
    time_source: &'t T,
    queue: AnimationQueue<Animation<S>, Q>,
    active: Option<Animation<S>>,
    cancel_pending: bool,
    clear_pending: bool,
    last_tick: Option<I>,
    callback: Option<&'t mut dyn FnMut(Color)>,
}

impl<'t, I: TimeInstant, O: PwmOutput, T: TimeSource<I>, const Q: usize, const S: usize>
    RgbwwController<'t, I, O, T, Q, S>
{
    /// Creates an idle controller with the default color configuration.
    ///
    /// Nothing is written to the output until the first animation runs.
    pub fn new(output: O, time_source: &'t T) -> Self {
        Self::with_model(output, ColorModel::new(), time_source)
    }

    /// Creates an idle controller with a preconfigured color model.
    pub fn with_model(output: O, model: ColorModel, time_source: &'t T) -> Self {
        Self {
            led: LedOutput::new(output, model),
            time_source,
            queue: AnimationQueue::new(),
            active: None,
            cancel_pending: false,
            clear_pending: false,
            last_tick: None,
            callback: None,
        }
    }

    /// Handles a controller action by dispatching to the matching method.
    pub fn handle_action(&mut self, action: ControllerAction<S>) -> Result<(), ControllerError> {
        match action {
            ControllerAction::SetColor { color, queue } => self.set_color(color, queue),
            ControllerAction::SetColorHeld {
                color,
                hold_ms,
                queue,
            } => self.set_color_held(color, hold_ms, queue),
            ControllerAction::FadeColor {
                to,
                duration_ms,
                direction,
                queue,
            } => self.fade_color(to, duration_ms, direction, queue),
            ControllerAction::FadeColorFrom {
                from,
                to,
                duration_ms,
                direction,
                queue,
            } => self.fade_color_from(from, to, duration_ms, direction, queue),
            ControllerAction::SetRaw { output, queue } => self.set_raw(output, queue),
            ControllerAction::FadeRaw {
                to,
                duration_ms,
                queue,
            } => self.fade_raw(to, duration_ms, queue),
            ControllerAction::FadeRawFrom {
                from,
                to,
                duration_ms,
                queue,
            } => self.fade_raw_from(from, to, duration_ms, queue),
            ControllerAction::Push { animation, queue } => self.push_animation(animation, queue),
            ControllerAction::Skip => {
                self.skip_current();
                Ok(())
            }
            ControllerAction::ClearQueue => {
                self.clear_queue();
                Ok(())
            }
            ControllerAction::SetAnimationSpeed(duration_ms) => {
                self.set_animation_speed(duration_ms);
                Ok(())
            }
            ControllerAction::SetAnimationBrightness(percent) => {
                self.set_animation_brightness(percent);
                Ok(())
            }
            ControllerAction::Refresh => {
                self.refresh();
                Ok(())
            }
        }
    }

    /// Shows an HSV color on the next tick.
    ///
    /// A replacing request for the color already showing, with nothing
    /// active or queued, is ignored.
    pub fn set_color(&mut self, color: HsvColor, queue: bool) -> Result<(), ControllerError> {
        if !queue && self.is_settled_on(color) {
            return Ok(());
        }
        self.enqueue(SetOutput::new(Color::Hsv(color)).into(), queue)
    }

    /// Shows an HSV color and keeps the animation active for `hold_ms`, so
    /// queued animations wait behind it.
    pub fn set_color_held(
        &mut self,
        color: HsvColor,
        hold_ms: u32,
        queue: bool,
    ) -> Result<(), ControllerError> {
        self.enqueue(SetOutput::held(Color::Hsv(color), hold_ms).into(), queue)
    }

    /// Fades from the color showing when the fade starts to `to`.
    ///
    /// A replacing request for the color already showing, with nothing
    /// active or queued, is ignored. Durations shorter than one tick set the
    /// color directly.
    pub fn fade_color(
        &mut self,
        to: HsvColor,
        duration_ms: u32,
        direction: HueDirection,
        queue: bool,
    ) -> Result<(), ControllerError> {
        if !queue && self.is_settled_on(to) {
            return Ok(());
        }
        let animation = if duration_ms < TICK_PERIOD_MS {
            SetOutput::new(Color::Hsv(to)).into()
        } else {
            Transition::new(to, duration_ms, direction).into()
        };
        self.enqueue(animation, queue)
    }

    /// Fades from an explicit start color to `to`.
    pub fn fade_color_from(
        &mut self,
        from: HsvColor,
        to: HsvColor,
        duration_ms: u32,
        direction: HueDirection,
        queue: bool,
    ) -> Result<(), ControllerError> {
        let animation = if duration_ms < TICK_PERIOD_MS {
            SetOutput::new(Color::Hsv(to)).into()
        } else {
            Transition::from_to(from, to, duration_ms, direction).into()
        };
        self.enqueue(animation, queue)
    }

    /// Writes raw channel levels on the next tick, bypassing HSV conversion.
    pub fn set_raw(&mut self, output: ChannelOutput, queue: bool) -> Result<(), ControllerError> {
        self.enqueue(SetOutput::new(Color::Raw(output)).into(), queue)
    }

    /// Fades every channel from its current level to `to`.
    pub fn fade_raw(
        &mut self,
        to: ChannelOutput,
        duration_ms: u32,
        queue: bool,
    ) -> Result<(), ControllerError> {
        let animation = if duration_ms < TICK_PERIOD_MS {
            SetOutput::new(Color::Raw(to)).into()
        } else {
            RawTransition::new(to, duration_ms).into()
        };
        self.enqueue(animation, queue)
    }

    /// Fades every channel from `from` to `to`.
    pub fn fade_raw_from(
        &mut self,
        from: ChannelOutput,
        to: ChannelOutput,
        duration_ms: u32,
        queue: bool,
    ) -> Result<(), ControllerError> {
        let animation = if duration_ms < TICK_PERIOD_MS {
            SetOutput::new(Color::Raw(to)).into()
        } else {
            RawTransition::from_to(from, to, duration_ms).into()
        };
        self.enqueue(animation, queue)
    }

    /// Queues any prebuilt animation, including an [`AnimationSet`](crate::AnimationSet).
    pub fn push_animation(
        &mut self,
        animation: impl Into<Animation<S>>,
        queue: bool,
    ) -> Result<(), ControllerError> {
        self.enqueue(animation.into(), queue)
    }

    /// Drops the active animation on the next tick. The queue keeps going.
    pub fn skip_current(&mut self) {
        if self.active.is_some() {
            self.cancel_pending = true;
        }
    }

    /// Drops every queued animation on the next tick. The active animation
    /// keeps running.
    pub fn clear_queue(&mut self) {
        self.clear_pending = true;
    }

    pub fn is_queue_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Number of animations waiting behind the active one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Returns true while an animation is running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The animation currently running, if any.
    pub fn active_animation(&self) -> Option<&Animation<S>> {
        self.active.as_ref()
    }

    /// The animation that will start next, if any.
    pub fn next_animation(&self) -> Option<&Animation<S>> {
        self.queue.peek()
    }

    /// Registers a closure called once each time an animation finishes,
    /// with the color the animation left on the output.
    pub fn set_completion_callback(&mut self, callback: &'t mut dyn FnMut(Color)) {
        self.callback = Some(callback);
    }

    pub fn clear_completion_callback(&mut self) {
        self.callback = None;
    }

    /// Changes the duration of the active animation.
    pub fn set_animation_speed(&mut self, duration_ms: u32) {
        if let Some(active) = self.active.as_mut() {
            active.set_speed(duration_ms);
        }
    }

    /// Overrides the target brightness of the active animation, in percent.
    pub fn set_animation_brightness(&mut self, percent: u8) {
        if let Some(active) = self.active.as_mut() {
            active.set_brightness(percent);
        }
    }

    /// Advances the active animation by one step.
    ///
    /// Pending skip and clear requests are honored first. Calls less than
    /// [`TICK_PERIOD_MS`] after the last accepted tick return
    /// [`TickOutcome::Throttled`] without advancing anything. Late ticks never
    /// catch up: every accepted tick is exactly one step.
    pub fn tick(&mut self) -> TickOutcome {
        if self.cancel_pending {
            self.cancel_pending = false;
            self.active = None;
            #[cfg(feature = "defmt")]
            defmt::debug!("rgbww: active animation skipped");
        }
        if self.clear_pending {
            self.clear_pending = false;
            self.queue.clear();
            #[cfg(feature = "defmt")]
            defmt::debug!("rgbww: animation queue cleared");
        }

        let now = self.time_source.now();
        if let Some(last) = self.last_tick {
            if now.duration_since(last).as_millis() < TICK_PERIOD_MS as u64 {
                return TickOutcome::Throttled;
            }
        }
        self.last_tick = Some(now);

        if self.active.is_none() {
            let Some(next) = self.queue.pop() else {
                return TickOutcome::Idle;
            };
            #[cfg(feature = "defmt")]
            defmt::trace!("rgbww: starting animation, {} queued", self.queue.len());
            self.active = Some(next);
        }

        let Some(active) = self.active.as_mut() else {
            return TickOutcome::Idle;
        };
        if !active.run(&mut self.led) {
            return TickOutcome::Running;
        }

        self.active = None;
        let color = self.led.last_color();
        #[cfg(feature = "defmt")]
        defmt::trace!("rgbww: animation finished at {}", color);
        if let Some(callback) = self.callback.as_mut() {
            callback(color);
        }
        TickOutcome::Finished
    }

    /// Re-emits the current color through the current configuration.
    ///
    /// Configuration changes do not touch the output by themselves.
    pub fn refresh(&mut self) {
        self.led.refresh();
    }

    /// Last HSV color written. Raw writes leave it untouched.
    pub fn current_color(&self) -> HsvColor {
        self.led.current_hsv()
    }

    /// Channel levels the output received on the last write.
    pub fn current_output(&self) -> ChannelOutput {
        self.led.current_output()
    }

    /// The last color written, HSV or raw.
    pub fn last_color(&self) -> Color {
        self.led.last_color()
    }

    pub fn color_model(&self) -> &ColorModel {
        self.led.model()
    }

    pub fn output(&self) -> &O {
        self.led.driver()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.led.driver_mut()
    }

    pub fn set_hue_correction(&mut self, correction: HueCorrection) {
        #[cfg(feature = "defmt")]
        defmt::debug!("rgbww: hue correction {}", correction);
        self.led.model_mut().set_hue_correction(correction);
    }

    pub fn hue_correction(&self) -> HueCorrection {
        self.led.model().hue_correction()
    }

    /// Sets per-channel brightness in percent, `[red, green, blue, warm, cold]`.
    pub fn set_brightness(&mut self, percent: [u8; 5]) {
        #[cfg(feature = "defmt")]
        defmt::debug!("rgbww: brightness {}", percent);
        self.led.model_mut().set_brightness(percent);
    }

    pub fn brightness(&self) -> [u8; 5] {
        self.led.model().brightness().to_percent()
    }

    pub fn set_white_balance_range(&mut self, warm_kelvin: i32, cold_kelvin: i32) {
        #[cfg(feature = "defmt")]
        defmt::debug!("rgbww: white range {}K-{}K", warm_kelvin, cold_kelvin);
        self.led
            .model_mut()
            .set_white_balance_range(warm_kelvin, cold_kelvin);
    }

    pub fn white_balance_range(&self) -> WhiteBalance {
        self.led.model().white_balance_range()
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.led.model_mut().set_color_mode(mode);
    }

    pub fn set_hsv_model(&mut self, model: HsvModel) {
        self.led.model_mut().set_hsv_model(model);
    }

    pub fn set_rgb_white_policy(&mut self, policy: RgbWhitePolicy) {
        self.led.model_mut().set_rgb_white_policy(policy);
    }

    pub fn settings(&self) -> ColorSettings {
        self.led.model().settings()
    }

    pub fn apply_settings(&mut self, settings: &ColorSettings) {
        self.led.model_mut().apply_settings(settings);
    }

    fn is_settled_on(&self, color: HsvColor) -> bool {
        self.active.is_none()
            && self.queue.is_empty()
            && self.led.last_color() == Color::Hsv(color)
    }

    fn enqueue(&mut self, animation: Animation<S>, queue: bool) -> Result<(), ControllerError> {
        if !queue {
            self.queue.clear();
            self.active = None;
            self.cancel_pending = false;
            self.clear_pending = false;
        }

        self.queue.push(animation).map_err(|_rejected| {
            #[cfg(feature = "defmt")]
            defmt::debug!("rgbww: queue full, request dropped");
            ControllerError::QueueFull
        })
    }
}
