//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in dotflip-core:
//!
//! - Bit-banged shift-register bus (clock, data, latch, clear, enable)
//! - Adapters from `embedded-hal` 1.0 pins and delays to the dotflip HAL

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod embedded;
pub mod shift_register;

pub use embedded::{EmbeddedDelay, EmbeddedOutput};
pub use shift_register::{GpioShiftRegister, ShiftRegisterPins};
