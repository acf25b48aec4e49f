//! Shared test infrastructure for rgbww-led integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use rgbww_led::{
    ChannelOutput, HsvColor, PwmOutput, RgbwwController, SCALE_MAX, TICK_PERIOD_MS, TickOutcome,
    TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock PWM Output
// ============================================================================

/// Mock PWM output that records every write for testing
pub struct MockOutput {
    current: Option<ChannelOutput>,
    history: heapless::Vec<ChannelOutput, 128>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            current: None,
            history: heapless::Vec::new(),
        }
    }

    pub fn last(&self) -> Option<ChannelOutput> {
        self.current
    }

    pub fn history(&self) -> &[ChannelOutput] {
        &self.history
    }

    pub fn writes(&self) -> usize {
        self.history.len()
    }
}

impl PwmOutput for MockOutput {
    fn set_output(&mut self, output: ChannelOutput) {
        self.current = Some(output);
        let _ = self.history.push(output);
    }

    fn output(&self) -> Option<ChannelOutput> {
        self.current
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Controller Helpers
// ============================================================================

/// Controller type used across integration tests: 50 queued animations,
/// sets of up to 8.
pub type TestController<'t> = RgbwwController<'t, TestInstant, MockOutput, MockTimeSource, 50, 8>;

pub fn controller(timer: &MockTimeSource) -> TestController<'_> {
    TestController::new(MockOutput::new(), timer)
}

/// Advances the clock by one tick period and ticks once.
pub fn tick(controller: &mut TestController<'_>, timer: &MockTimeSource) -> TickOutcome {
    timer.advance(TestDuration(TICK_PERIOD_MS as u64));
    controller.tick()
}

/// Ticks until the active animation finishes. Returns the number of ticks,
/// including the finishing one.
pub fn run_to_completion(controller: &mut TestController<'_>, timer: &MockTimeSource) -> u32 {
    let mut ticks = 0;
    loop {
        ticks += 1;
        match tick(controller, timer) {
            TickOutcome::Finished => return ticks,
            TickOutcome::Running => {}
            other => panic!("unexpected tick outcome {other:?} after {ticks} ticks"),
        }
        assert!(ticks < 10_000, "animation never finished");
    }
}

// ============================================================================
// Colors
// ============================================================================

pub const RED: HsvColor = HsvColor {
    hue: 0,
    saturation: SCALE_MAX,
    value: SCALE_MAX,
    kelvin: 0,
};

pub const CYAN: HsvColor = HsvColor {
    hue: 3 * SCALE_MAX,
    saturation: SCALE_MAX,
    value: SCALE_MAX,
    kelvin: 0,
};

pub const WHITE: HsvColor = HsvColor {
    hue: 0,
    saturation: 0,
    value: SCALE_MAX,
    kelvin: 4000,
};

/// Compare two channel outputs with a per-channel tolerance
pub fn outputs_close(a: ChannelOutput, b: ChannelOutput, tolerance: u16) -> bool {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .all(|(x, y)| x.abs_diff(*y) <= tolerance)
}
