//! Shift-register line assignments
//!
//! Every logical control signal of the display lives on one output of the
//! daisy-chained shift registers. A [`LineMap`] records which output
//! (counted from 0 at the first register's QA) carries which signal.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tables::COLUMN_CODE_LINES;

/// Maximum rows per display
pub const MAX_ROWS: usize = 16;

/// Module address lines carrying address data (ADDR1-ADDR7)
///
/// The eighth address position is the FP2800A enable and is driven
/// directly, never through the shift register.
pub const ADDRESS_LINES: usize = 7;

/// Number of indicator (status LED) lines
pub const INDICATOR_LINES: usize = 3;

/// Maximum shift-register outputs (sixteen 8-bit registers)
pub const MAX_LINES: usize = 128;

/// Maximum shift-register image size in bytes
pub const MAX_IMAGE_BYTES: usize = MAX_LINES / 8;

/// Line position within the shift-register chain
pub type Line = u8;

/// Status indicator selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Indicator {
    A = 0,
    B = 1,
    /// Toggled on every actuation in flashing mode
    C = 2,
}

impl Indicator {
    /// All indicators in line order
    pub const ALL: [Indicator; INDICATOR_LINES] = [Indicator::A, Indicator::B, Indicator::C];

    /// Index into the indicator line table
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Assignment of logical signals to shift-register lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineMap {
    /// Row select lines for the "set" polarity, one per row
    pub row_set: Vec<Line, MAX_ROWS>,
    /// Row select lines for the "reset" polarity, one per row
    pub row_reset: Vec<Line, MAX_ROWS>,
    /// Column code lines in `[A0, A1, A2, B0, B1]` order
    pub column_code: [Line; COLUMN_CODE_LINES],
    /// Module address lines, least significant bit first
    pub address: [Line; ADDRESS_LINES],
    /// FP2800A data/direction input (high = reset polarity)
    pub direction: Line,
    /// Status indicator lines A, B and C
    pub indicators: [Line; INDICATOR_LINES],
}

impl LineMap {
    /// Iterate over every assigned line
    pub fn iter(&self) -> impl Iterator<Item = Line> + '_ {
        self.row_set
            .iter()
            .chain(self.row_reset.iter())
            .chain(self.column_code.iter())
            .chain(self.address.iter())
            .chain(core::iter::once(&self.direction))
            .chain(self.indicators.iter())
            .copied()
    }

    /// Indicator line for `indicator`
    pub fn indicator(&self, indicator: Indicator) -> Line {
        self.indicators[indicator.index()]
    }

    /// Find the first line assigned to more than one signal
    pub fn first_conflict(&self) -> Option<Line> {
        let mut seen: u128 = 0;
        for line in self.iter() {
            if line as usize >= MAX_LINES {
                continue;
            }
            let bit = 1u128 << line;
            if seen & bit != 0 {
                return Some(line);
            }
            seen |= bit;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LineMap {
        LineMap {
            row_set: Vec::from_slice(&[0, 1]).unwrap(),
            row_reset: Vec::from_slice(&[2, 3]).unwrap(),
            column_code: [4, 5, 6, 7, 8],
            address: [9, 10, 11, 12, 13, 14, 15],
            direction: 16,
            indicators: [17, 18, 19],
        }
    }

    #[test]
    fn test_iter_visits_every_line() {
        let map = sample();
        assert_eq!(map.iter().count(), 2 + 2 + 5 + 7 + 1 + 3);
        assert!(map.iter().eq(0..20));
    }

    #[test]
    fn test_no_conflict() {
        assert_eq!(sample().first_conflict(), None);
    }

    #[test]
    fn test_conflict_detected() {
        let mut map = sample();
        map.direction = 5;
        assert_eq!(map.first_conflict(), Some(5));
    }

    #[test]
    fn test_indicator_lookup() {
        let map = sample();
        assert_eq!(map.indicator(Indicator::A), 17);
        assert_eq!(map.indicator(Indicator::C), 19);
    }
}
