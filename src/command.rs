//! Command-based control for controllers.
//!
//! Useful when requests arrive over a channel or a wire protocol and are
//! routed to one of several fixtures.

use crate::animation::Animation;
use crate::types::{ChannelOutput, HsvColor, HueDirection};

/// Actions for controlling a [`RgbwwController`](crate::RgbwwController).
///
/// `queue: false` replaces the queue and the active animation, `queue: true`
/// appends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerAction<const S: usize> {
    /// Show an HSV color.
    SetColor { color: HsvColor, queue: bool },
    /// Show an HSV color and hold it.
    SetColorHeld {
        color: HsvColor,
        hold_ms: u32,
        queue: bool,
    },
    /// Fade from the current color.
    FadeColor {
        to: HsvColor,
        duration_ms: u32,
        direction: HueDirection,
        queue: bool,
    },
    /// Fade between two explicit colors.
    FadeColorFrom {
        from: HsvColor,
        to: HsvColor,
        duration_ms: u32,
        direction: HueDirection,
        queue: bool,
    },
    /// Write raw channel levels.
    SetRaw { output: ChannelOutput, queue: bool },
    /// Fade raw channels from their current levels.
    FadeRaw {
        to: ChannelOutput,
        duration_ms: u32,
        queue: bool,
    },
    /// Fade raw channels between explicit levels.
    FadeRawFrom {
        from: ChannelOutput,
        to: ChannelOutput,
        duration_ms: u32,
        queue: bool,
    },
    /// Queue a prebuilt animation or set.
    Push { animation: Animation<S>, queue: bool },
    /// Skip the active animation.
    Skip,
    /// Drop all queued animations.
    ClearQueue,
    /// Change the duration of the active animation.
    SetAnimationSpeed(u32),
    /// Override the brightness of the active animation, in percent.
    SetAnimationBrightness(u8),
    /// Re-emit the current color.
    Refresh,
}

/// Command targeting a specific LED fixture.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedCommand<Id, const S: usize> {
    pub led_id: Id,
    pub action: ControllerAction<S>,
}

impl<Id, const S: usize> LedCommand<Id, S> {
    /// Creates command.
    pub fn new(led_id: Id, action: ControllerAction<S>) -> Self {
        Self { led_id, action }
    }
}
