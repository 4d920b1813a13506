//! Bit-banged shift-register bus
//!
//! Drives a chain of 74HC595-style serial-in/parallel-out registers from
//! five GPIO lines plus the module enable. One call to
//! [`ShiftOut::transmit`] clears the chain, clocks every line out highest
//! first, latches, and optionally energizes the selected module's coils.
//!
//! # Usage
//!
//! ```ignore
//! let pins = ShiftRegisterPins { clock, data, latch, clear, enable, output_enable };
//! let bus = GpioShiftRegister::new(pins, delay);
//! let mut display = FlipDot::new(config, bus)?;
//! ```

use dotflip_core::{ShiftImage, ShiftOut};
use dotflip_hal::{DelayUs, OutputPin};

/// Time the module enable is held high to flip one dot
pub const COIL_ACTIVE_TIME_US: u32 = 500;

/// Hold time of the register clear strobe at power-up
pub const CLEAR_TIME_US: u32 = 10;

/// Direct I/O lines of the shift-register bus
pub struct ShiftRegisterPins<P> {
    /// Shift clock (SRCLK)
    pub clock: P,
    /// Serial data (SER)
    pub data: P,
    /// Storage register latch (RCLK)
    pub latch: P,
    /// Shift register clear, active low (SRCLR)
    pub clear: P,
    /// FP2800A enable of the addressed module
    pub enable: P,
    /// Register output enable, active low (OE)
    pub output_enable: P,
}

/// Shift-register bus driven through plain GPIO
pub struct GpioShiftRegister<P, D> {
    pins: ShiftRegisterPins<P>,
    delay: D,
}

impl<P: OutputPin, D: DelayUs> GpioShiftRegister<P, D> {
    /// Take ownership of the lines and bring them to a known state
    ///
    /// Outputs stay disabled while the chain is cleared so the modules
    /// never see random power-up data.
    pub fn new(pins: ShiftRegisterPins<P>, delay: D) -> Self {
        let mut bus = Self { pins, delay };
        bus.power_up();
        bus
    }

    fn power_up(&mut self) {
        let pins = &mut self.pins;
        pins.output_enable.set_high();
        pins.enable.set_low();
        pins.clock.set_low();
        pins.data.set_low();
        pins.latch.set_low();

        pins.clear.set_low();
        self.delay.delay_us(CLEAR_TIME_US);
        pins.clear.set_high();

        pins.output_enable.set_low();

        #[cfg(feature = "defmt")]
        defmt::debug!("Shift register bus ready");
    }

    /// Direct I/O lines
    pub fn pins(&self) -> &ShiftRegisterPins<P> {
        &self.pins
    }

    /// Give the lines and delay back
    pub fn release(self) -> (ShiftRegisterPins<P>, D) {
        (self.pins, self.delay)
    }
}

impl<P: OutputPin, D: DelayUs> ShiftOut for GpioShiftRegister<P, D> {
    fn transmit(&mut self, image: &ShiftImage, pulse_enable: bool) {
        let pins = &mut self.pins;
        pins.clock.set_low();
        pins.clear.pulse_low();

        for high in image.shift_order() {
            pins.data.set_state(high);
            pins.clock.pulse_high();
        }

        pins.latch.pulse_high();

        if pulse_enable {
            pins.enable.set_high();
            self.delay.delay_us(COIL_ACTIVE_TIME_US);
            pins.enable.set_low();
        }
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
