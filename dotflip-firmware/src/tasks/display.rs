//! Display task
//!
//! Owns the flip-dot engine. After the power-up self-test and a full
//! clear it waits for new frames and, while idle, periodically re-fires
//! the set dots so they keep their magnetisation.

use defmt::*;
use dotflip_core::{DotMatrix, FlipDot};
use dotflip_drivers::{EmbeddedDelay, EmbeddedOutput, GpioShiftRegister};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Ticker};

/// Interval between magnetize passes
pub const MAGNETIZE_INTERVAL_S: u64 = 600;

/// Pulses per dot in each magnetize pass
pub const MAGNETIZE_REPEATS: u32 = 1;

/// Engine type used by the firmware
pub type Display = FlipDot<GpioShiftRegister<EmbeddedOutput<Output<'static>>, EmbeddedDelay<Delay>>>;

/// Next frame to paint; later frames replace pending ones
pub static FRAME_SIGNAL: Signal<CriticalSectionRawMutex, DotMatrix> = Signal::new();

/// Display task - self-test, clear, then paint frames as they arrive
#[embassy_executor::task]
pub async fn display_task(mut display: Display) {
    info!("Display task started");

    display.initialize();
    display.clear();
    info!("Display cleared");

    let mut ticker = Ticker::every(Duration::from_secs(MAGNETIZE_INTERVAL_S));

    loop {
        match select(FRAME_SIGNAL.wait(), ticker.next()).await {
            Either::First(frame) => match display.paint(&frame) {
                Ok(flipped) => debug!("Frame painted, {} dots flipped", flipped),
                Err(e) => warn!("Frame rejected: {}", e),
            },
            Either::Second(()) => {
                let fired = display.magnetize(MAGNETIZE_REPEATS);
                debug!("Magnetized {} dots", fired);
            }
        }
    }
}
