//! Tick-driven animations.
//!
//! Every animation advances by exactly one logical step per call to `run`.
//! Durations are converted to step counts using [`TICK_PERIOD_MS`], so a
//! 1000 ms fade always takes 50 runs no matter how late individual ticks are.
//!
//! [`AnimationStep`] holds the leaf animations. [`AnimationSet`] plays a list
//! of them in order, and [`Animation`] is what the controller queues.

use heapless::Vec;

use crate::interpolate::Interpolation;
use crate::output::{LedOutput, PwmOutput};
use crate::types::{ChannelOutput, Color, HsvColor, HueDirection, SCALE_MAX, TICK_PERIOD_MS};

/// Converts a duration into a step count, never less than one.
#[inline]
pub fn steps_for(duration_ms: u32) -> u32 {
    (duration_ms / TICK_PERIOD_MS).max(1)
}

fn brightness_to_value(percent: u8) -> u16 {
    (percent.min(100) as u32 * SCALE_MAX as u32 / 100) as u16
}

fn scale_channels(output: ChannelOutput, percent: u8) -> ChannelOutput {
    let percent = percent.min(100) as u32;
    ChannelOutput::from_array(output.to_array().map(|c| (c as u32 * percent / 100) as u16))
}

fn scale_color(color: Color, brightness: Option<u8>) -> Color {
    match (color, brightness) {
        (Color::Hsv(hsv), Some(percent)) => Color::Hsv(HsvColor {
            value: brightness_to_value(percent),
            ..hsv
        }),
        (Color::Raw(output), Some(percent)) => Color::Raw(scale_channels(output, percent)),
        (color, None) => color,
    }
}

/// Writes a color once, then optionally holds it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetOutput {
    target: Color,
    hold_ticks: u32,
    elapsed: u32,
    written: bool,
    finished: bool,
    brightness: Option<u8>,
}

impl SetOutput {
    /// Writes `target` and finishes on the same run.
    pub fn new(target: Color) -> Self {
        Self::held(target, 0)
    }

    /// Writes `target` and keeps the animation active for `hold_ms`.
    pub fn held(target: Color, hold_ms: u32) -> Self {
        Self {
            target,
            hold_ticks: hold_ms / TICK_PERIOD_MS,
            elapsed: 0,
            written: false,
            finished: false,
            brightness: None,
        }
    }

    pub fn target(&self) -> Color {
        scale_color(self.target, self.brightness)
    }

    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        if self.finished {
            return true;
        }

        if self.written {
            self.elapsed += 1;
        } else {
            led.set_color(self.target());
            self.written = true;
        }

        self.finished = self.elapsed >= self.hold_ticks;
        self.finished
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.written = false;
        self.finished = false;
    }

    /// Changes the hold time. Ticks already held count towards the new one.
    pub fn set_speed(&mut self, hold_ms: u32) {
        self.hold_ticks = hold_ms / TICK_PERIOD_MS;
    }

    pub fn set_brightness(&mut self, percent: u8) {
        self.brightness = Some(percent.min(100));
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct HsvWalk {
    hue: Interpolation,
    saturation: Interpolation,
    value: Interpolation,
    kelvin: Interpolation,
    current: HsvColor,
}

impl HsvWalk {
    fn new(base: HsvColor, target: HsvColor, direction: HueDirection, steps: u32) -> Self {
        Self {
            hue: Interpolation::hue(base.hue, target.hue, direction, steps),
            saturation: Interpolation::new(base.saturation as i32, target.saturation as i32, steps),
            value: Interpolation::new(base.value as i32, target.value as i32, steps),
            kelvin: Interpolation::new(base.kelvin, target.kelvin, steps),
            current: base,
        }
    }

    fn step(&mut self) -> HsvColor {
        self.current = HsvColor {
            hue: self.hue.step_hue(),
            saturation: to_level(self.saturation.step()),
            value: to_level(self.value.step()),
            kelvin: self.kelvin.step(),
        };
        self.current
    }
}

fn to_level(value: i32) -> u16 {
    value.clamp(0, SCALE_MAX as i32) as u16
}

/// Fades between two HSV colors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    from: Option<HsvColor>,
    anchor: Option<HsvColor>,
    to: HsvColor,
    direction: HueDirection,
    duration_ms: u32,
    steps: u32,
    step: u32,
    walk: Option<HsvWalk>,
    finished: bool,
    brightness: Option<u8>,
}

impl Transition {
    /// Fades from whatever color is showing when the transition starts.
    pub fn new(to: HsvColor, duration_ms: u32, direction: HueDirection) -> Self {
        Self {
            from: None,
            anchor: None,
            to,
            direction,
            duration_ms,
            steps: steps_for(duration_ms),
            step: 0,
            walk: None,
            finished: false,
            brightness: None,
        }
    }

    /// Fades from an explicit start color.
    pub fn from_to(from: HsvColor, to: HsvColor, duration_ms: u32, direction: HueDirection) -> Self {
        Self {
            from: Some(from),
            ..Self::new(to, duration_ms, direction)
        }
    }

    /// Target color, including any brightness override.
    pub fn target(&self) -> HsvColor {
        match self.brightness {
            Some(percent) => HsvColor {
                value: brightness_to_value(percent),
                ..self.to
            },
            None => self.to,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        if self.finished {
            return true;
        }

        let target = self.target();
        if self.walk.is_none() {
            let base = self
                .anchor
                .or(self.from)
                .unwrap_or_else(|| led.current_hsv());
            if base == target {
                led.set_hsv(target);
                self.finished = true;
                return true;
            }
            self.step = 0;
            self.walk = Some(HsvWalk::new(base, target, self.direction, self.steps));
        }

        self.step += 1;
        if self.step >= self.steps {
            led.set_hsv(target);
            self.finished = true;
            return true;
        }

        if let Some(walk) = self.walk.as_mut() {
            led.set_hsv(walk.step());
        }
        false
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        self.walk = None;
        self.step = 0;
        self.finished = false;
    }

    /// Changes the duration. A running fade continues from its current color
    /// with the new step count.
    pub fn set_speed(&mut self, duration_ms: u32) {
        if let Some(walk) = self.walk.take() {
            if !self.finished {
                self.anchor = Some(walk.current);
            }
        }
        self.duration_ms = duration_ms;
        self.steps = steps_for(duration_ms);
        self.step = 0;
    }

    pub fn set_brightness(&mut self, percent: u8) {
        self.brightness = Some(percent.min(100));
        if let Some(walk) = self.walk.take() {
            if !self.finished {
                self.anchor = Some(walk.current);
                self.step = 0;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Fades all five raw channels, bypassing HSV conversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTransition {
    from: Option<ChannelOutput>,
    anchor: Option<ChannelOutput>,
    to: ChannelOutput,
    duration_ms: u32,
    steps: u32,
    step: u32,
    walk: Option<([Interpolation; 5], ChannelOutput)>,
    finished: bool,
    brightness: Option<u8>,
}

impl RawTransition {
    /// Fades from the channel levels showing when the transition starts.
    pub fn new(to: ChannelOutput, duration_ms: u32) -> Self {
        Self {
            from: None,
            anchor: None,
            to,
            duration_ms,
            steps: steps_for(duration_ms),
            step: 0,
            walk: None,
            finished: false,
            brightness: None,
        }
    }

    /// Fades from explicit start levels.
    pub fn from_to(from: ChannelOutput, to: ChannelOutput, duration_ms: u32) -> Self {
        Self {
            from: Some(from),
            ..Self::new(to, duration_ms)
        }
    }

    pub fn target(&self) -> ChannelOutput {
        match self.brightness {
            Some(percent) => scale_channels(self.to, percent),
            None => self.to,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        if self.finished {
            return true;
        }

        let target = self.target();
        if self.walk.is_none() {
            let base = self
                .anchor
                .or(self.from)
                .unwrap_or_else(|| led.current_raw());
            if base == target {
                led.set_raw(target);
                self.finished = true;
                return true;
            }
            let (from, to) = (base.to_array(), target.to_array());
            let steps = self.steps;
            let channels =
                core::array::from_fn(|i| Interpolation::new(from[i] as i32, to[i] as i32, steps));
            self.step = 0;
            self.walk = Some((channels, base));
        }

        self.step += 1;
        if self.step >= self.steps {
            led.set_raw(target);
            self.finished = true;
            return true;
        }

        if let Some((channels, current)) = self.walk.as_mut() {
            *current = ChannelOutput::from_array(channels.each_mut().map(|c| to_level(c.step())));
            led.set_raw(*current);
        }
        false
    }

    pub fn reset(&mut self) {
        self.anchor = None;
        self.walk = None;
        self.step = 0;
        self.finished = false;
    }

    pub fn set_speed(&mut self, duration_ms: u32) {
        if let Some((_, current)) = self.walk.take() {
            if !self.finished {
                self.anchor = Some(current);
            }
        }
        self.duration_ms = duration_ms;
        self.steps = steps_for(duration_ms);
        self.step = 0;
    }

    pub fn set_brightness(&mut self, percent: u8) {
        self.brightness = Some(percent.min(100));
        if let Some((_, current)) = self.walk.take() {
            if !self.finished {
                self.anchor = Some(current);
                self.step = 0;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// A single animation that can be queued on its own or inside a set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationStep {
    SetOutput(SetOutput),
    Transition(Transition),
    RawTransition(RawTransition),
}

impl AnimationStep {
    /// Advances one tick. Returns true once the animation has finished.
    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        match self {
            AnimationStep::SetOutput(a) => a.run(led),
            AnimationStep::Transition(a) => a.run(led),
            AnimationStep::RawTransition(a) => a.run(led),
        }
    }

    /// Rewinds to the state before the first run.
    pub fn reset(&mut self) {
        match self {
            AnimationStep::SetOutput(a) => a.reset(),
            AnimationStep::Transition(a) => a.reset(),
            AnimationStep::RawTransition(a) => a.reset(),
        }
    }

    /// Changes the duration (hold time for [`SetOutput`]).
    pub fn set_speed(&mut self, duration_ms: u32) {
        match self {
            AnimationStep::SetOutput(a) => a.set_speed(duration_ms),
            AnimationStep::Transition(a) => a.set_speed(duration_ms),
            AnimationStep::RawTransition(a) => a.set_speed(duration_ms),
        }
    }

    /// Overrides the target brightness, in percent.
    pub fn set_brightness(&mut self, percent: u8) {
        match self {
            AnimationStep::SetOutput(a) => a.set_brightness(percent),
            AnimationStep::Transition(a) => a.set_brightness(percent),
            AnimationStep::RawTransition(a) => a.set_brightness(percent),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            AnimationStep::SetOutput(a) => a.is_finished(),
            AnimationStep::Transition(a) => a.is_finished(),
            AnimationStep::RawTransition(a) => a.is_finished(),
        }
    }
}

impl From<SetOutput> for AnimationStep {
    fn from(a: SetOutput) -> Self {
        AnimationStep::SetOutput(a)
    }
}

impl From<Transition> for AnimationStep {
    fn from(a: Transition) -> Self {
        AnimationStep::Transition(a)
    }
}

impl From<RawTransition> for AnimationStep {
    fn from(a: RawTransition) -> Self {
        AnimationStep::RawTransition(a)
    }
}

/// Plays up to `S` animations one after another, optionally looping.
///
/// Speed and brightness overrides are handed to each animation as it becomes
/// active. An empty set finishes on its first run; a looping set never
/// finishes on its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationSet<const S: usize> {
    steps: Vec<AnimationStep, S>,
    index: usize,
    looping: bool,
    activated: bool,
    finished: bool,
    speed: Option<u32>,
    brightness: Option<u8>,
}

impl<const S: usize> Default for AnimationSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const S: usize> AnimationSet<S> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            index: 0,
            looping: false,
            activated: false,
            finished: false,
            speed: None,
            brightness: None,
        }
    }

    /// Restart from the first animation after the last one finishes.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Appends an animation. Hands it back if the set is full.
    pub fn push(&mut self, step: impl Into<AnimationStep>) -> Result<(), AnimationStep> {
        self.steps.push(step.into())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Index of the animation currently playing.
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        if self.finished {
            return true;
        }
        let count = self.steps.len();
        let Some(current) = self.steps.get_mut(self.index) else {
            self.finished = true;
            return true;
        };

        if !self.activated {
            current.reset();
            if let Some(ms) = self.speed {
                current.set_speed(ms);
            }
            if let Some(percent) = self.brightness {
                current.set_brightness(percent);
            }
            self.activated = true;
        }

        if !current.run(led) {
            return false;
        }

        self.activated = false;
        self.index += 1;
        if self.index < count {
            return false;
        }
        if self.looping {
            self.index = 0;
            return false;
        }
        self.finished = true;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.activated = false;
        self.finished = false;
    }

    /// Sets the duration of every animation in the set, including the one
    /// currently playing.
    pub fn set_speed(&mut self, duration_ms: u32) {
        self.speed = Some(duration_ms);
        if self.activated {
            if let Some(current) = self.steps.get_mut(self.index) {
                current.set_speed(duration_ms);
            }
        }
    }

    pub fn set_brightness(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.brightness = Some(percent);
        if self.activated {
            if let Some(current) = self.steps.get_mut(self.index) {
                current.set_brightness(percent);
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Anything the controller can queue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Animation<const S: usize> {
    Step(AnimationStep),
    Set(AnimationSet<S>),
}

impl<const S: usize> Animation<S> {
    /// Advances one tick. Returns true once the animation has finished.
    pub fn run<O: PwmOutput>(&mut self, led: &mut LedOutput<O>) -> bool {
        match self {
            Animation::Step(a) => a.run(led),
            Animation::Set(a) => a.run(led),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Animation::Step(a) => a.reset(),
            Animation::Set(a) => a.reset(),
        }
    }

    pub fn set_speed(&mut self, duration_ms: u32) {
        match self {
            Animation::Step(a) => a.set_speed(duration_ms),
            Animation::Set(a) => a.set_speed(duration_ms),
        }
    }

    pub fn set_brightness(&mut self, percent: u8) {
        match self {
            Animation::Step(a) => a.set_brightness(percent),
            Animation::Set(a) => a.set_brightness(percent),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Animation::Step(a) => a.is_finished(),
            Animation::Set(a) => a.is_finished(),
        }
    }
}

impl<const S: usize> From<AnimationStep> for Animation<S> {
    fn from(a: AnimationStep) -> Self {
        Animation::Step(a)
    }
}

impl<const S: usize> From<SetOutput> for Animation<S> {
    fn from(a: SetOutput) -> Self {
        Animation::Step(a.into())
    }
}

impl<const S: usize> From<Transition> for Animation<S> {
    fn from(a: Transition) -> Self {
        Animation::Step(a.into())
    }
}

impl<const S: usize> From<RawTransition> for Animation<S> {
    fn from(a: RawTransition) -> Self {
        Animation::Step(a.into())
    }
}

impl<const S: usize> From<AnimationSet<S>> for Animation<S> {
    fn from(a: AnimationSet<S>) -> Self {
        Animation::Set(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorModel;
    use crate::types::HUE_MAX;

    struct Sink;

    impl PwmOutput for Sink {
        fn set_output(&mut self, _output: ChannelOutput) {}
    }

    fn led() -> LedOutput<Sink> {
        LedOutput::new(Sink, ColorModel::new())
    }

    fn runs_until_finished<const S: usize>(anim: &mut Animation<S>, led: &mut LedOutput<Sink>) -> u32 {
        let mut runs = 0;
        loop {
            runs += 1;
            if anim.run(led) {
                return runs;
            }
            assert!(runs < 10_000, "animation never finished");
        }
    }

    #[test]
    fn step_count_is_derived_from_tick_period() {
        assert_eq!(steps_for(1000), 50);
        assert_eq!(steps_for(19), 1);
        assert_eq!(steps_for(0), 1);
    }

    #[test]
    fn set_output_without_hold_finishes_immediately() {
        let mut led = led();
        let red = HsvColor::new(0, SCALE_MAX, SCALE_MAX, 0);
        let mut anim = SetOutput::new(Color::Hsv(red));

        assert!(anim.run(&mut led));
        assert_eq!(led.current_hsv(), red);
    }

    #[test]
    fn set_output_holds_for_ticks() {
        let mut led = led();
        let target = Color::Raw(ChannelOutput::new(5, 0, 0, 0, 0));
        let mut anim: Animation<1> = SetOutput::held(target, 100).into();
        assert_eq!(runs_until_finished(&mut anim, &mut led), 6);
        assert_eq!(led.current_raw().red, 5);
    }

    #[test]
    fn transition_lands_exactly_on_nth_run() {
        let mut led = led();
        let from = HsvColor::new(100, 200, 300, 2700);
        let to = HsvColor::new(2000, 900, 50, 6000);
        let mut anim: Animation<1> = Transition::from_to(from, to, 200, HueDirection::Shortest).into();

        assert_eq!(runs_until_finished(&mut anim, &mut led), 10);
        assert_eq!(led.current_hsv(), to);
    }

    #[test]
    fn transition_starts_from_current_color() {
        let mut led = led();
        let start = HsvColor::new(0, SCALE_MAX, SCALE_MAX, 0);
        led.set_hsv(start);

        let mut anim = Transition::new(HsvColor::new(0, SCALE_MAX, 0, 0), 100, HueDirection::Shortest);
        anim.run(&mut led);
        let first = led.current_hsv();
        assert_eq!(first.hue, 0);
        assert!(first.value < SCALE_MAX && first.value > 0);
    }

    #[test]
    fn transition_to_current_color_finishes_at_once() {
        let mut led = led();
        let color = HsvColor::new(10, 20, 30, 0);
        let mut anim = Transition::from_to(color, color, 1000, HueDirection::Shortest);
        assert!(anim.run(&mut led));
        assert_eq!(led.current_hsv(), color);
    }

    #[test]
    fn hue_never_leaves_the_wheel() {
        let mut led = led();
        let from = HsvColor::new(10, SCALE_MAX, SCALE_MAX, 0);
        let to = HsvColor::new(HUE_MAX - 10, SCALE_MAX, SCALE_MAX, 0);
        let mut anim = Transition::from_to(from, to, 400, HueDirection::Shortest);

        while !anim.run(&mut led) {
            let hue = led.current_hsv().hue;
            assert!(hue <= 10 || hue >= HUE_MAX - 10, "hue {hue} left the short arc");
        }
    }

    #[test]
    fn raw_transition_lands_on_target() {
        let mut led = led();
        let to = ChannelOutput::new(1023, 0, 512, 7, 300);
        let mut anim: Animation<1> = RawTransition::from_to(ChannelOutput::OFF, to, 300).into();

        assert_eq!(runs_until_finished(&mut anim, &mut led), 15);
        assert_eq!(led.current_raw(), to);
        assert_eq!(led.last_color(), Color::Raw(to));
    }

    #[test]
    fn speed_change_reanchors_running_fade() {
        let mut led = led();
        let to = ChannelOutput::new(1000, 0, 0, 0, 0);
        let mut anim = RawTransition::from_to(ChannelOutput::OFF, to, 1000);
        for _ in 0..10 {
            anim.run(&mut led);
        }
        let reached = led.current_raw().red;
        assert!(reached > 0 && reached < 1000);

        anim.set_speed(100);
        let mut runs = 0;
        while !anim.run(&mut led) {
            runs += 1;
            assert!(led.current_raw().red >= reached);
        }
        assert_eq!(runs + 1, 5);
        assert_eq!(led.current_raw(), to);
    }

    #[test]
    fn brightness_overrides_target() {
        let mut led = led();
        let mut hsv = Transition::from_to(
            HsvColor::new(0, SCALE_MAX, 0, 0),
            HsvColor::new(0, SCALE_MAX, SCALE_MAX, 0),
            20,
            HueDirection::Shortest,
        );
        hsv.set_brightness(50);
        assert!(hsv.run(&mut led));
        assert_eq!(led.current_hsv().value, 511);

        let mut raw = SetOutput::new(Color::Raw(ChannelOutput::new(1000, 200, 0, 0, 0)));
        raw.set_brightness(50);
        raw.run(&mut led);
        assert_eq!(led.current_raw(), ChannelOutput::new(500, 100, 0, 0, 0));
    }

    #[test]
    fn set_plays_in_order_then_finishes() {
        let mut led = led();
        let mut set = AnimationSet::<4>::new();
        set.push(SetOutput::new(Color::Raw(ChannelOutput::new(1, 0, 0, 0, 0)))).unwrap();
        set.push(RawTransition::new(ChannelOutput::new(0, 0, 100, 0, 0), 60)).unwrap();
        let mut anim: Animation<4> = set.into();

        assert!(!anim.run(&mut led));
        assert_eq!(led.current_raw().red, 1);
        // three runs for the 60 ms fade
        assert!(!anim.run(&mut led));
        assert!(!anim.run(&mut led));
        assert!(anim.run(&mut led));
        assert_eq!(led.current_raw(), ChannelOutput::new(0, 0, 100, 0, 0));
        assert!(anim.is_finished());
    }

    #[test]
    fn empty_set_finishes_immediately() {
        let mut led = led();
        let mut anim: Animation<2> = AnimationSet::new().into();
        assert!(anim.run(&mut led));
    }

    #[test]
    fn looping_set_restarts() {
        let mut led = led();
        let mut set = AnimationSet::<2>::new().looping(true);
        set.push(SetOutput::new(Color::Raw(ChannelOutput::new(1, 0, 0, 0, 0)))).unwrap();
        set.push(SetOutput::new(Color::Raw(ChannelOutput::new(2, 0, 0, 0, 0)))).unwrap();

        for round in 0..6 {
            assert!(!set.run(&mut led));
            assert_eq!(led.current_raw().red, round % 2 + 1);
        }
        assert!(!set.is_finished());
    }

    #[test]
    fn set_propagates_speed_override() {
        let mut led = led();
        let mut set = AnimationSet::<2>::new();
        set.push(RawTransition::from_to(ChannelOutput::OFF, ChannelOutput::new(9, 9, 9, 9, 9), 1000))
            .unwrap();
        set.set_speed(40);

        let mut anim: Animation<2> = set.into();
        assert_eq!(runs_until_finished(&mut anim, &mut led), 2);
    }

    #[test]
    fn full_set_rejects_push() {
        let mut set = AnimationSet::<1>::new();
        set.push(SetOutput::new(Color::Raw(ChannelOutput::OFF))).unwrap();
        assert!(set.push(SetOutput::new(Color::Raw(ChannelOutput::OFF))).is_err());
        assert_eq!(set.len(), 1);
    }
}
