//! dotflip - Flip-Dot Display Firmware
//!
//! Main firmware binary for RP2040-based flip-dot controllers. The display
//! geometry and shift-register wiring come from display.toml, validated
//! and embedded at build time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use dotflip_core::{DisplayConfig, DotMatrix, FlipDot, MatrixError};
use dotflip_drivers::{EmbeddedDelay, EmbeddedOutput, GpioShiftRegister, ShiftRegisterPins};

mod tasks;

use crate::tasks::{display_task, Display, FRAME_SIGNAL};

/// Display configuration encoded by build.rs
static DISPLAY_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/display.bin"));

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("dotflip firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = match DisplayConfig::from_postcard(DISPLAY_CONFIG) {
        Ok(config) => config,
        Err(e) => defmt::panic!("Invalid embedded display configuration: {}", e),
    };
    info!(
        "Display: {} rows x {} modules, {} dots, {} shift-register lines",
        config.row_count(),
        config.module_count(),
        config.dot_count(),
        config.line_count
    );

    // GP2..GP7: SRCLK, SER, RCLK, SRCLR, module enable, OE
    let pins = ShiftRegisterPins {
        clock: EmbeddedOutput::new(Output::new(p.PIN_2, Level::Low), false),
        data: EmbeddedOutput::new(Output::new(p.PIN_3, Level::Low), false),
        latch: EmbeddedOutput::new(Output::new(p.PIN_4, Level::Low), false),
        clear: EmbeddedOutput::new(Output::new(p.PIN_5, Level::High), true),
        enable: EmbeddedOutput::new(Output::new(p.PIN_6, Level::Low), false),
        output_enable: EmbeddedOutput::new(Output::new(p.PIN_7, Level::High), true),
    };
    let bus = GpioShiftRegister::new(pins, EmbeddedDelay(Delay));

    let display: Display = match FlipDot::new(config, bus) {
        Ok(display) => display,
        Err(e) => defmt::panic!("Display setup failed: {}", e),
    };

    let rows = display.config().row_count();
    let modules = display.config().module_count();
    spawner.spawn(display_task(display)).unwrap();
    info!("All tasks spawned");

    match checkerboard(rows, modules) {
        Ok(frame) => FRAME_SIGNAL.signal(frame),
        Err(e) => warn!("Startup pattern skipped: {}", e),
    }
}

/// Alternating dots, shifted by one column on every row
fn checkerboard(rows: usize, modules: usize) -> Result<DotMatrix, MatrixError> {
    let mut frame = DotMatrix::new(rows, modules)?;
    for row in 0..rows {
        let mask = if row % 2 == 0 { 0x5555_5555 } else { 0xAAAA_AAAA };
        for module in 0..modules {
            frame.set(row, module, mask);
        }
    }
    Ok(frame)
}
