//! Time abstraction traits for platform-agnostic tick throttling.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations on wrapping hardware timers should saturate or wrap
    /// rather than panic; the controller only compares the result against
    /// the tick period.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}
