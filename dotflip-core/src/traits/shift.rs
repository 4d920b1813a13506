//! Shift-register output trait

use crate::image::ShiftImage;

/// Serial output of a shift-register image
///
/// Implementations own the direct I/O lines (clock, data, latch, clear,
/// enable) and the delay source. Every call blocks until the image is
/// latched and, when requested, the coil pulse has finished.
pub trait ShiftOut {
    /// Shift `image` out highest line first and latch it
    ///
    /// With `pulse_enable` the module enable line is raised for the coil
    /// energize time afterwards; this is the only point where a dot moves.
    fn transmit(&mut self, image: &ShiftImage, pulse_enable: bool);

    /// Block for `ms` milliseconds
    fn pause_ms(&mut self, ms: u32);
}

impl<T: ShiftOut + ?Sized> ShiftOut for &mut T {
    fn transmit(&mut self, image: &ShiftImage, pulse_enable: bool) {
        (**self).transmit(image, pulse_enable);
    }

    fn pause_ms(&mut self, ms: u32) {
        (**self).pause_ms(ms);
    }
}
