//! Board-agnostic core logic for flip-dot displays
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Configuration types and validation
//! - Bit lookup and FP2800A column-code tables
//! - Dot-matrix snapshots (current and desired state)
//! - Shift-register image assembly and diagnostics
//! - The display engine: diff paint, clear, fill, inverse, magnetize
//! - The [`traits::ShiftOut`] seam to the hardware

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod image;
pub mod matrix;
pub mod tables;
pub mod traits;

pub use config::{ConfigError, DisplayConfig, Indicator, IndicatorMode, LineMap, ModuleConfig};
pub use engine::{DisplayError, FlipDot};
pub use image::{DotState, Indicators, ShiftImage};
pub use matrix::{DotMatrix, MatrixError};
pub use traits::ShiftOut;
