//! GPIO pin abstractions
//!
//! The shift-register chain is driven through a handful of plain output
//! lines. Writes are infallible: a failed GPIO write is not something the
//! driver can recover from mid-stream.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Drive the pin high then immediately low
    ///
    /// Used for clock and latch strobes; the pin ends low.
    fn pulse_high(&mut self) {
        self.set_high();
        self.set_low();
    }

    /// Drive the pin low then immediately high
    ///
    /// Used for active-low strobes such as the register clear; the pin
    /// ends high.
    fn pulse_low(&mut self) {
        self.set_low();
        self.set_high();
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
        edges: u8,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.edges += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.edges += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_set_state() {
        let mut pin = MockPin { high: false, edges: 0 };
        pin.set_state(true);
        assert!(pin.is_set_high());
        pin.set_state(false);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_pulses_end_in_idle_level() {
        let mut pin = MockPin { high: false, edges: 0 };
        pin.pulse_high();
        assert!(pin.is_set_low());
        assert_eq!(pin.edges, 2);

        pin.pulse_low();
        assert!(pin.is_set_high());
        assert_eq!(pin.edges, 4);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn drive<P: OutputPin>(mut pin: P) {
            pin.set_high();
        }

        let mut pin = MockPin { high: false, edges: 0 };
        drive(&mut pin);
        assert!(pin.is_set_high());
    }
}
