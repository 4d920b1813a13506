//! Hardware abstraction traits
//!
//! These traits define the interface between the display engine and the
//! hardware that moves bits onto the shift-register chain.

pub mod shift;

pub use shift::ShiftOut;
