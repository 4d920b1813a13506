//! dotflip Hardware Abstraction Layer
//!
//! This crate defines the two hardware primitives the flip-dot driver
//! needs: push-pull output lines and blocking delays. Chip-specific code
//! (or the `embedded-hal` adapters in `dotflip-drivers`) implements them,
//! so the driver logic runs unchanged on a microcontroller or in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  dotflip-core (engine, image assembly)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dotflip-drivers (GPIO shift register)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dotflip-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output lines (clock, data, latch, ...)
//! - [`delay::DelayUs`] - Blocking microsecond/millisecond waits

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;

pub use delay::DelayUs;
pub use gpio::OutputPin;
