#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`HsvColor`**: Fixed-point hue/saturation/value plus a white color temperature
//! - **`ChannelOutput`**: The five PWM levels: red, green, blue, warm white, cold white
//! - **`ColorModel`**: HSV to channel conversion with hue wheel correction, white balance and per-channel brightness
//! - **`HueWheel`**: Six-sector hue wheel whose boundaries can be shifted by up to ±30°
//! - **`Animation`**: A queued unit of work: `SetOutput`, `Transition`, `RawTransition` or an `AnimationSet`
//! - **`RgbwwController`**: Owns the output, a bounded animation queue and the active animation
//! - **`PwmOutput`**: Trait to implement for your PWM hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`ControllerAction`**: Commands that can be sent to control a controller
//!
//! All levels use a 10-bit scale (`0..=SCALE_MAX`). Hue uses six sectors of
//! `SCALE_MAX` units each, for a wheel of `HUE_MAX` units.

pub mod animation;
pub mod color;
pub mod command;
pub mod controller;
pub mod gamma;
pub mod hue_wheel;
pub mod interpolate;
pub mod output;
pub mod queue;
pub mod time;
pub mod types;

pub use animation::{Animation, AnimationSet, AnimationStep, RawTransition, SetOutput, Transition};
pub use color::{BrightnessFactors, ColorModel, ColorSettings, WhiteBalance};
pub use command::{ControllerAction, LedCommand};
pub use controller::{ControllerError, RgbwwController, TickOutcome};
pub use hue_wheel::{HueCorrection, HueWheel};
pub use interpolate::Interpolation;
pub use output::{LedOutput, PwmOutput};
pub use queue::AnimationQueue;
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{
    ChannelOutput, Color, ColorMode, HUE_MAX, HsvColor, HsvModel, HueDirection, PWM_DEPTH,
    RgbWhitePolicy, RgbwColor, SCALE_MAX, TICK_PERIOD_MS,
};
