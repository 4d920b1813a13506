//! Logging shims
//!
//! Engine progress messages go through `defmt` when the feature is enabled
//! and the configuration asks for verbose output; otherwise they compile
//! away.

#[cfg(feature = "defmt")]
macro_rules! verbose {
    ($on:expr, $level:ident, $($arg:tt)*) => {
        if $on {
            defmt::$level!($($arg)*);
        }
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! verbose {
    ($on:expr, $level:ident, $($arg:tt)*) => {
        let _ = $on;
    };
}
