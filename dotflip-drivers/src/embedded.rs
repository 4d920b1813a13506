//! `embedded-hal` 1.0 adapters
//!
//! Lets any chip HAL that implements the `embedded-hal` digital and delay
//! traits drive the shift-register bus. Only pins whose writes cannot fail
//! are accepted, which covers the GPIO outputs of the common HALs
//! (`embassy-rp`, `rp2040-hal`, `stm32*-hal`).

use core::convert::Infallible;

use dotflip_hal::{DelayUs, OutputPin};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin as HalOutputPin, PinState};

fn infallible(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}

/// Output pin adapter that also remembers the last driven level
pub struct EmbeddedOutput<P> {
    pin: P,
    high: bool,
}

impl<P: HalOutputPin<Error = Infallible>> EmbeddedOutput<P> {
    /// Wrap `pin`, driving it to the given level
    pub fn new(mut pin: P, high: bool) -> Self {
        infallible(pin.set_state(PinState::from(high)));
        Self { pin, high }
    }

    /// Unwrap the HAL pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: HalOutputPin<Error = Infallible>> OutputPin for EmbeddedOutput<P> {
    fn set_high(&mut self) {
        infallible(self.pin.set_high());
        self.high = true;
    }

    fn set_low(&mut self) {
        infallible(self.pin.set_low());
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Blocking delay adapter
pub struct EmbeddedDelay<D>(pub D);

impl<D: DelayNs> DelayUs for EmbeddedDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct HalPin {
        writes: Vec<bool>,
    }

    impl ErrorType for HalPin {
        type Error = Infallible;
    }

    impl HalOutputPin for HalPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.writes.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.writes.push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct HalDelay {
        total_ns: u64,
    }

    impl DelayNs for HalDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_output_initial_level() {
        let output = EmbeddedOutput::new(HalPin::default(), false);
        assert!(output.is_set_low());
        assert_eq!(output.into_inner().writes, [false]);

        let output = EmbeddedOutput::new(HalPin::default(), true);
        assert!(output.is_set_high());
        assert_eq!(output.into_inner().writes, [true]);
    }

    #[test]
    fn test_output_tracks_level() {
        let mut output = EmbeddedOutput::new(HalPin::default(), false);
        output.set_high();
        assert!(output.is_set_high());
        output.pulse_low();
        assert!(output.is_set_high());
        output.set_state(false);
        assert!(output.is_set_low());
        assert_eq!(
            output.into_inner().writes,
            [false, true, false, true, false]
        );
    }

    #[test]
    fn test_delay_forwards() {
        let mut delay = EmbeddedDelay(HalDelay::default());
        delay.delay_us(500);
        delay.delay_ms(2);
        assert_eq!(delay.0.total_ns, 500_000 + 2_000_000);
    }
}
