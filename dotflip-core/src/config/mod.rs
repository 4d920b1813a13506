//! Configuration types
//!
//! Board-agnostic description of the sign, optionally stored as postcard
//! binary data (`serde` feature).

pub mod display;
pub mod lines;

pub use display::*;
pub use lines::*;
