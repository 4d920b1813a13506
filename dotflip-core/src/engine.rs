//! Flip-dot display engine
//!
//! The engine owns two snapshots: `dots` (what the panel physically shows)
//! and `next_dots` (what the caller wants). Painting walks every dot within
//! the configured bounds, fires only the ones that differ, then commits
//! `next_dots` as the new `dots`.
//!
//! Every actuation rebuilds the shift-register image from zero, shifts it
//! out and pulses the module enable line once. Nothing here runs
//! concurrently: the register chain is a single shared resource, so one
//! image is fully latched and fired before the next is assembled.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = FlipDot::new(config, bus)?;
//! display.initialize();
//! display.clear();
//!
//! let frame = DotMatrix::from_rows(&[[0b0101], [0b0000]])?;
//! display.paint(&frame)?;
//! assert_eq!(display.dots(), &frame);
//! ```

use crate::config::{ConfigError, DisplayConfig, Indicator, IndicatorMode};
use crate::image::{DotSelect, DotState, Indicators, ShiftImage};
use crate::matrix::{DotMatrix, DotView, MatrixError};
use crate::tables::column_code_index;
use crate::traits::ShiftOut;

/// Self-test flash cycles run by [`FlipDot::initialize`]
pub const SELF_TEST_CYCLES: u8 = 3;

/// Indicator on time per self-test cycle
pub const SELF_TEST_ON_MS: u32 = 100;

/// Indicator off time per self-test cycle
pub const SELF_TEST_OFF_MS: u32 = 700;

/// Display engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Configuration rejected at construction
    Config(ConfigError),
    /// Snapshot shape does not match the display
    Matrix(MatrixError),
}

impl From<ConfigError> for DisplayError {
    fn from(e: ConfigError) -> Self {
        DisplayError::Config(e)
    }
}

impl From<MatrixError> for DisplayError {
    fn from(e: MatrixError) -> Self {
        DisplayError::Matrix(e)
    }
}

/// Flip-dot display driven through a shift-register chain
pub struct FlipDot<B> {
    config: DisplayConfig,
    bus: B,
    image: ShiftImage,
    dots: DotMatrix,
    next_dots: DotMatrix,
    indicators: Indicators,
}

impl<B: ShiftOut> FlipDot<B> {
    /// Validate `config` and set up zeroed snapshots
    ///
    /// No hardware is touched until [`initialize`](Self::initialize) or a
    /// paint operation runs.
    pub fn new(config: DisplayConfig, bus: B) -> Result<Self, DisplayError> {
        config.validate()?;

        let dots = DotMatrix::new(config.row_count(), config.module_count())?;
        let next_dots = dots.clone();
        let image = ShiftImage::new(config.line_count as usize);

        Ok(Self {
            config,
            bus,
            image,
            dots,
            next_dots,
            indicators: Indicators::default(),
        })
    }

    /// Run the power-up self-test
    ///
    /// Flashes all three indicators on and off [`SELF_TEST_CYCLES`] times.
    /// The images are latched without the enable pulse, so no dot moves.
    pub fn initialize(&mut self) {
        for _ in 0..SELF_TEST_CYCLES {
            self.show_indicators(Indicators::all(true));
            self.bus.pause_ms(SELF_TEST_ON_MS);
            self.show_indicators(Indicators::all(false));
            self.bus.pause_ms(SELF_TEST_OFF_MS);
        }
        verbose!(self.config.verbose, info, "Self-test finished");
    }

    fn show_indicators(&mut self, indicators: Indicators) {
        self.indicators = indicators;
        self.image.clear();
        self.image.set_indicators(&self.config.lines, &self.indicators);
        self.bus.transmit(&self.image, false);
    }

    /// Display configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Current (physically committed) snapshot
    pub fn dots(&self) -> &DotMatrix {
        &self.dots
    }

    /// Desired snapshot for the next paint
    pub fn desired(&self) -> &DotMatrix {
        &self.next_dots
    }

    /// Render the current snapshot as text
    pub fn view(&self) -> DotView<'_> {
        self.dots.view(&self.config.modules)
    }

    /// Shift-register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the shift-register bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the engine and hand back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Replace the desired snapshot verbatim
    pub fn set_desired(&mut self, dots: &DotMatrix) -> Result<(), DisplayError> {
        self.next_dots.copy_from(dots)?;
        Ok(())
    }

    /// Set the desired snapshot and paint only the dots that changed
    ///
    /// Returns the number of dots actuated.
    pub fn paint(&mut self, dots: &DotMatrix) -> Result<usize, DisplayError> {
        self.set_desired(dots)?;
        Ok(self.repaint())
    }

    /// Paint the desired snapshot, actuating only changed dots
    pub fn repaint(&mut self) -> usize {
        self.paint_with(false)
    }

    /// Paint the desired snapshot
    ///
    /// With `force_all` every dot is actuated regardless of the current
    /// state. The desired snapshot is committed as current afterwards, even
    /// when nothing changed. Returns the number of dots actuated.
    pub fn paint_with(&mut self, force_all: bool) -> usize {
        let mut fired = 0;
        for row in 0..self.config.row_count() {
            for module in 0..self.config.module_count() {
                let columns = self.config.modules[module].columns as usize;
                for column in 0..columns {
                    let want = self.next_dots.is_set(row, module, column);
                    if force_all || self.dots.is_set(row, module, column) != want {
                        self.actuate(row, module, column, DotState::from_bit(want));
                        fired += 1;
                    }
                }
            }
        }
        self.cycle();
        verbose!(self.config.verbose, debug, "Painted {} dots", fired);
        fired
    }

    /// Re-fire every set dot `repeats` times
    ///
    /// Counteracts weakened magnetisation. Snapshots are not modified apart
    /// from the closing commit of desired into current.
    pub fn magnetize(&mut self, repeats: u32) -> usize {
        let mut fired = 0;
        for _ in 0..repeats {
            for row in 0..self.config.row_count() {
                for module in 0..self.config.module_count() {
                    let columns = self.config.modules[module].columns as usize;
                    for column in 0..columns {
                        if self.dots.is_set(row, module, column) {
                            self.actuate(row, module, column, DotState::Set);
                            fired += 1;
                        }
                    }
                }
            }
        }
        self.cycle();
        verbose!(self.config.verbose, debug, "Magnetized display {} times", repeats);
        fired
    }

    /// Reset every dot
    pub fn clear(&mut self) {
        self.dots.fill_with(|_| 0);
        self.next_dots.fill_with(|_| 0);
        self.fire_all(DotState::Reset);
        verbose!(self.config.verbose, debug, "Cleared display");
    }

    /// Set every dot
    ///
    /// Masks are limited to each module's width.
    pub fn fill(&mut self) {
        let modules = &self.config.modules;
        self.dots.fill_with(|m| modules[m].column_mask());
        self.next_dots.fill_with(|m| modules[m].column_mask());
        self.fire_all(DotState::Set);
        verbose!(self.config.verbose, debug, "Filled display");
    }

    /// Invert every dot
    ///
    /// The complemented state becomes the desired snapshot and is fired.
    /// The current snapshot is only updated when the configuration sets
    /// `inverse_resync`; otherwise it keeps the pre-inverse state until the
    /// next paint, clear, fill or magnetize.
    pub fn inverse(&mut self) {
        for row in 0..self.config.row_count() {
            for module in 0..self.config.module_count() {
                self.next_dots.set(row, module, !self.dots.get(row, module));
                let columns = self.config.modules[module].columns as usize;
                for column in 0..columns {
                    let want = self.next_dots.is_set(row, module, column);
                    self.actuate(row, module, column, DotState::from_bit(want));
                }
            }
        }
        if self.config.inverse_resync {
            self.cycle();
        }
        verbose!(self.config.verbose, debug, "Inverted display");
    }

    fn fire_all(&mut self, state: DotState) {
        for row in 0..self.config.row_count() {
            for module in 0..self.config.module_count() {
                let columns = self.config.modules[module].columns as usize;
                for column in 0..columns {
                    self.actuate(row, module, column, state);
                }
            }
        }
    }

    fn cycle(&mut self) {
        self.dots.clone_from(&self.next_dots);
    }

    /// Assemble the image for one dot and fire it
    ///
    /// `row`, `module` and `column` must lie within the configured
    /// dimensions; bulk operations guarantee this.
    pub fn actuate(&mut self, row: usize, module: usize, column: usize, state: DotState) {
        let module_config = self.config.modules[module];
        let dot = DotSelect {
            row,
            code_index: column_code_index(module_config.columns as usize, column),
            address: module_config.address,
            state,
        };

        if self.config.indicator_mode == IndicatorMode::Flashing {
            self.indicators.toggle(Indicator::C);
        }

        self.image.stage_dot(&self.config.lines, &dot, &self.indicators);
        self.bus.transmit(&self.image, true);
        verbose!(self.config.verbose, trace, "* {}", self.image.bits());
    }

    /// Indicator flags folded into every image
    pub fn indicators(&self) -> Indicators {
        self.indicators
    }

    /// Switch one indicator; takes effect with the next transmitted image
    pub fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.indicators.set(indicator, on);
    }

    /// Currently staged image
    pub fn image(&self) -> &ShiftImage {
        &self.image
    }

    /// Zero the staged image, optionally shifting it out without enable
    pub fn reset_image(&mut self, transmit: bool) {
        self.image.clear();
        if transmit {
            self.fire_staged(false);
        }
    }

    /// Shift the staged image out as-is
    pub fn fire_staged(&mut self, pulse_enable: bool) {
        self.bus.transmit(&self.image, pulse_enable);
        verbose!(
            self.config.verbose,
            trace,
            "{} {}",
            if pulse_enable { "*" } else { "." },
            self.image.bits()
        );
    }

    /// Stage row `row` with set polarity
    pub fn set_row_set(&mut self, row: usize) {
        self.image.set_row_set(&self.config.lines, row);
    }

    /// Row staged with set polarity, if any
    pub fn row_set(&self) -> Option<usize> {
        self.image.row_set(&self.config.lines)
    }

    /// Stage row `row` with reset polarity
    pub fn set_row_reset(&mut self, row: usize) {
        self.image.set_row_reset(&self.config.lines, row);
    }

    /// Row staged with reset polarity, if any
    pub fn row_reset(&self) -> Option<usize> {
        self.image.row_reset(&self.config.lines)
    }

    /// Stage column-code table entry `code_index`
    pub fn set_column(&mut self, code_index: usize) {
        self.image.set_column(&self.config.lines, code_index);
    }

    /// Column-code table entry currently staged, if any
    pub fn column(&self) -> Option<usize> {
        self.image.column(&self.config.lines)
    }

    /// Stage a module address
    pub fn set_address(&mut self, address: u8) {
        self.image.set_address(&self.config.lines, address);
    }

    /// Module address currently staged
    pub fn address(&self) -> u8 {
        self.image.address(&self.config.lines)
    }

    /// Stage the direction line
    pub fn set_direction(&mut self, high: bool) {
        self.image.set_direction(&self.config.lines, high);
    }

    /// Staged direction line state
    pub fn direction(&self) -> bool {
        self.image.direction(&self.config.lines)
    }
}
