//! Shift-register image
//!
//! The image holds one bit per shift-register output. It is rebuilt from
//! zero for every actuation so no line keeps stale state from the previous
//! dot; the row, column, address, direction and indicator encoders below
//! each touch only the lines their signal owns.
//!
//! Line `n` lives in byte `n / 8`, bit `n % 8`.

use core::fmt;

use heapless::Vec;

use crate::config::{Indicator, LineMap, INDICATOR_LINES, MAX_IMAGE_BYTES, MAX_LINES};
use crate::tables::{bit_is_set, BYTE_BITS, COLUMN_CODES, COLUMN_CODE_LINES};

/// Target orientation of a dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DotState {
    /// Dark face, driven through the row-reset line with direction high
    Reset,
    /// Bright face, driven through the row-set line
    Set,
}

impl DotState {
    /// State encoded by a bitmask bit
    pub const fn from_bit(set: bool) -> Self {
        if set {
            DotState::Set
        } else {
            DotState::Reset
        }
    }

    /// True for [`DotState::Set`]
    pub const fn is_set(self) -> bool {
        matches!(self, DotState::Set)
    }
}

/// Status indicator flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators([bool; INDICATOR_LINES]);

impl Indicators {
    /// All indicators in the same state
    pub const fn all(on: bool) -> Self {
        Self([on; INDICATOR_LINES])
    }

    /// State of one indicator
    pub fn get(&self, indicator: Indicator) -> bool {
        self.0[indicator.index()]
    }

    /// Switch one indicator
    pub fn set(&mut self, indicator: Indicator, on: bool) {
        self.0[indicator.index()] = on;
    }

    /// Invert one indicator
    pub fn toggle(&mut self, indicator: Indicator) {
        self.0[indicator.index()] ^= true;
    }
}

/// Everything needed to stage a single-dot actuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DotSelect {
    /// Row index
    pub row: usize,
    /// Index into the column-code table (already window-adjusted)
    pub code_index: usize,
    /// Module address
    pub address: u8,
    /// Target orientation
    pub state: DotState,
}

/// Bit image of every shift-register output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShiftImage {
    line_count: usize,
    bytes: Vec<u8, MAX_IMAGE_BYTES>,
}

impl ShiftImage {
    /// Create an all-low image with `line_count` outputs
    ///
    /// Counts above [`MAX_LINES`] are clamped.
    pub fn new(line_count: usize) -> Self {
        let line_count = line_count.min(MAX_LINES);
        let mut bytes = Vec::new();
        // Cannot fail: line_count is clamped to the buffer capacity.
        let _ = bytes.resize(line_count.div_ceil(8), 0);
        Self { line_count, bytes }
    }

    /// Number of outputs
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Raw bytes, line 0 in bit 0 of byte 0
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Drive every output low
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// State of one output
    pub fn line(&self, line: u8) -> bool {
        let line = line as usize;
        (self.bytes[line / 8] & BYTE_BITS[line % 8]) == BYTE_BITS[line % 8]
    }

    /// Drive one output high
    pub fn set_line(&mut self, line: u8) {
        let line = line as usize;
        self.bytes[line / 8] |= BYTE_BITS[line % 8];
    }

    /// Drive one output low
    pub fn clear_line(&mut self, line: u8) {
        let line = line as usize;
        self.bytes[line / 8] &= !BYTE_BITS[line % 8];
    }

    /// Drive one output to `high`
    pub fn write_line(&mut self, line: u8, high: bool) {
        if high {
            self.set_line(line);
        } else {
            self.clear_line(line);
        }
    }

    /// Iterate over outputs in transmission order (highest line first)
    pub fn shift_order(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.line_count).rev().map(move |l| self.line(l as u8))
    }

    /// Select `row` with set polarity, releasing every reset line
    pub fn set_row_set(&mut self, lines: &LineMap, row: usize) {
        for &line in &lines.row_reset {
            self.clear_line(line);
        }
        self.set_line(lines.row_set[row]);
    }

    /// Select `row` with reset polarity, releasing every set line
    pub fn set_row_reset(&mut self, lines: &LineMap, row: usize) {
        for &line in &lines.row_set {
            self.clear_line(line);
        }
        self.set_line(lines.row_reset[row]);
    }

    /// First row whose set line is active
    pub fn row_set(&self, lines: &LineMap) -> Option<usize> {
        lines.row_set.iter().position(|&line| self.line(line))
    }

    /// First row whose reset line is active
    pub fn row_reset(&self, lines: &LineMap) -> Option<usize> {
        lines.row_reset.iter().position(|&line| self.line(line))
    }

    /// Drive the column-code lines with table entry `code_index`
    pub fn set_column(&mut self, lines: &LineMap, code_index: usize) {
        let code = &COLUMN_CODES[code_index];
        for (bit, &line) in code.iter().zip(lines.column_code.iter()) {
            self.write_line(line, *bit == 1);
        }
    }

    /// Table entry matching the column-code lines, if any
    pub fn column(&self, lines: &LineMap) -> Option<usize> {
        let mut staged = [0u8; COLUMN_CODE_LINES];
        for (bit, &line) in staged.iter_mut().zip(lines.column_code.iter()) {
            *bit = self.line(line) as u8;
        }
        COLUMN_CODES.iter().position(|code| *code == staged)
    }

    /// Drive the address lines with the low bits of `address`
    pub fn set_address(&mut self, lines: &LineMap, address: u8) {
        for (bit, &line) in lines.address.iter().enumerate() {
            self.write_line(line, bit_is_set(address as u32, bit));
        }
    }

    /// Address currently on the address lines
    pub fn address(&self, lines: &LineMap) -> u8 {
        lines
            .address
            .iter()
            .enumerate()
            .filter(|&(_, &line)| self.line(line))
            .fold(0u8, |acc, (bit, _)| acc | BYTE_BITS[bit])
    }

    /// Drive the direction line (high selects reset polarity)
    pub fn set_direction(&mut self, lines: &LineMap, high: bool) {
        self.write_line(lines.direction, high);
    }

    /// State of the direction line
    pub fn direction(&self, lines: &LineMap) -> bool {
        self.line(lines.direction)
    }

    /// Fold the indicator flags into their lines
    pub fn set_indicators(&mut self, lines: &LineMap, indicators: &Indicators) {
        for indicator in Indicator::ALL {
            self.write_line(lines.indicator(indicator), indicators.get(indicator));
        }
    }

    /// Rebuild the image for one dot actuation
    ///
    /// Starts from an all-low image; indices are not range checked here.
    pub fn stage_dot(&mut self, lines: &LineMap, dot: &DotSelect, indicators: &Indicators) {
        self.clear();

        match dot.state {
            DotState::Set => self.set_line(lines.row_set[dot.row]),
            DotState::Reset => self.set_line(lines.row_reset[dot.row]),
        }

        for (i, &line) in lines.column_code.iter().enumerate() {
            if COLUMN_CODES[dot.code_index][i] == 1 {
                self.set_line(line);
            }
        }

        for (bit, &line) in lines.address.iter().enumerate() {
            if bit_is_set(dot.address as u32, bit) {
                self.set_line(line);
            }
        }

        if dot.state == DotState::Reset {
            self.set_line(lines.direction);
        }

        self.set_indicators(lines, indicators);
    }

    /// Human-readable table, highest line first
    ///
    /// ```text
    /// SRA: 2222222211111111...   (register index, hex)
    /// SRA: 7654321076543210...   (bit within register)
    /// SRD: LLLHLLLLLLLLLLLH...   (output level)
    /// ```
    pub fn table(&self) -> ImageTable<'_> {
        ImageTable(self)
    }

    /// Compact `0`/`1` string, line 0 first
    pub fn bits(&self) -> ImageBits<'_> {
        ImageBits(self)
    }
}

/// Verbose rendering returned by [`ShiftImage::table`]
pub struct ImageTable<'a>(&'a ShiftImage);

impl fmt::Display for ImageTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = (0..self.0.line_count).rev();

        f.write_str("SRA: ")?;
        for line in lines.clone() {
            write!(f, "{:X}", line / 8)?;
        }
        f.write_str("\nSRA: ")?;
        for line in lines.clone() {
            write!(f, "{}", line % 8)?;
        }
        f.write_str("\nSRD: ")?;
        for line in lines {
            f.write_str(if self.0.line(line as u8) { "H" } else { "L" })?;
        }
        f.write_str("\n")
    }
}

/// Compact rendering returned by [`ShiftImage::bits`]
pub struct ImageBits<'a>(&'a ShiftImage);

impl fmt::Display for ImageBits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in 0..self.0.line_count {
            f.write_str(if self.0.line(line as u8) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ImageBits<'_> {
    fn format(&self, f: defmt::Formatter) {
        for line in 0..self.0.line_count {
            defmt::write!(f, "{=u8}", self.0.line(line as u8) as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ADDRESS_LINES;
    use crate::tables::MAX_COLUMNS;
    use proptest::prelude::*;

    fn lines() -> LineMap {
        LineMap {
            row_set: Vec::from_slice(&[0, 1]).unwrap(),
            row_reset: Vec::from_slice(&[2, 3]).unwrap(),
            column_code: [4, 5, 6, 7, 8],
            address: [9, 10, 11, 12, 13, 14, 15],
            direction: 16,
            indicators: [17, 18, 19],
        }
    }

    fn high_lines(image: &ShiftImage) -> std::vec::Vec<usize> {
        (0..image.line_count())
            .filter(|&l| image.line(l as u8))
            .collect()
    }

    #[test]
    fn test_new_image_size() {
        let image = ShiftImage::new(20);
        assert_eq!(image.line_count(), 20);
        assert_eq!(image.as_bytes(), &[0, 0, 0]);

        let clamped = ShiftImage::new(1000);
        assert_eq!(clamped.line_count(), MAX_LINES);
        assert_eq!(clamped.as_bytes().len(), MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_line_storage_layout() {
        let mut image = ShiftImage::new(16);
        image.set_line(0);
        image.set_line(9);
        assert_eq!(image.as_bytes(), &[0b0000_0001, 0b0000_0010]);
        image.clear_line(0);
        assert_eq!(image.as_bytes(), &[0, 0b0000_0010]);
        image.clear();
        assert_eq!(image.as_bytes(), &[0, 0]);
    }

    #[test]
    fn test_row_set_and_reset_are_exclusive() {
        let lines = lines();
        let mut image = ShiftImage::new(24);

        image.set_row_reset(&lines, 1);
        assert_eq!(image.row_reset(&lines), Some(1));
        assert_eq!(image.row_set(&lines), None);

        image.set_row_set(&lines, 0);
        assert_eq!(image.row_set(&lines), Some(0));
        assert_eq!(image.row_reset(&lines), None);
    }

    #[test]
    fn test_row_lookup_returns_first_active() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        image.set_line(1);
        image.set_line(0);
        assert_eq!(image.row_set(&lines), Some(0));
    }

    #[test]
    fn test_column_roundtrip_every_entry() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        for index in 0..MAX_COLUMNS {
            image.set_column(&lines, index);
            assert_eq!(image.column(&lines), Some(index));
        }
    }

    #[test]
    fn test_column_none_when_no_code() {
        let lines = lines();
        let image = ShiftImage::new(24);
        assert_eq!(image.column(&lines), None);
    }

    #[test]
    fn test_address_every_bit_position() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        for bit in 0..ADDRESS_LINES {
            let address = 1u8 << bit;
            image.set_address(&lines, address);
            assert_eq!(image.address(&lines), address);
            assert_eq!(high_lines(&image), [lines.address[bit] as usize]);
        }
    }

    #[test]
    fn test_direction() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        image.set_direction(&lines, true);
        assert!(image.direction(&lines));
        image.set_direction(&lines, false);
        assert!(!image.direction(&lines));
    }

    #[test]
    fn test_stage_set_dot() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        image.set_line(23);

        let dot = DotSelect {
            row: 1,
            code_index: 0,
            address: 0b101,
            state: DotState::Set,
        };
        image.stage_dot(&lines, &dot, &Indicators::default());

        // row-set line 1, code [1,0,0,0,0] -> line 4, address bits 0 and 2
        assert_eq!(high_lines(&image), [1, 4, 9, 11]);
    }

    #[test]
    fn test_stage_reset_dot_sets_direction() {
        let lines = lines();
        let mut image = ShiftImage::new(24);
        let mut indicators = Indicators::default();
        indicators.set(Indicator::B, true);

        let dot = DotSelect {
            row: 0,
            code_index: 27,
            address: 0,
            state: DotState::Reset,
        };
        image.stage_dot(&lines, &dot, &indicators);

        assert_eq!(high_lines(&image), [2, 4, 5, 6, 7, 8, 16, 18]);
        assert_eq!(image.row_reset(&lines), Some(0));
        assert_eq!(image.column(&lines), Some(27));
        assert!(image.direction(&lines));
    }

    #[test]
    fn test_shift_order_is_reversed() {
        let mut image = ShiftImage::new(4);
        image.set_line(0);
        image.set_line(1);
        let order: std::vec::Vec<bool> = image.shift_order().collect();
        assert_eq!(order, [false, false, true, true]);
    }

    #[test]
    fn test_table_rendering() {
        let mut image = ShiftImage::new(10);
        image.set_line(0);
        image.set_line(9);
        assert_eq!(
            image.table().to_string(),
            "SRA: 1100000000\nSRA: 1076543210\nSRD: HLLLLLLLLH\n"
        );
    }

    #[test]
    fn test_bits_rendering() {
        let mut image = ShiftImage::new(10);
        image.set_line(1);
        image.set_line(8);
        assert_eq!(image.bits().to_string(), "0100000010");
    }

    #[test]
    fn test_indicators() {
        let mut indicators = Indicators::default();
        assert!(!indicators.get(Indicator::C));
        indicators.toggle(Indicator::C);
        assert!(indicators.get(Indicator::C));
        indicators.toggle(Indicator::C);
        assert!(!indicators.get(Indicator::C));
        assert!(Indicators::all(true).get(Indicator::A));
    }

    proptest! {
        #[test]
        fn prop_address_roundtrip(address in 0u8..128) {
            let lines = lines();
            let mut image = ShiftImage::new(24);
            image.set_address(&lines, address);
            prop_assert_eq!(image.address(&lines), address);
        }

        #[test]
        fn prop_staging_touches_only_owned_lines(
            row in 0usize..2,
            code_index in 0usize..MAX_COLUMNS,
            address in 0u8..128,
            set in any::<bool>(),
        ) {
            let lines = lines();
            let mut image = ShiftImage::new(24);
            let dot = DotSelect { row, code_index, address, state: DotState::from_bit(set) };
            image.stage_dot(&lines, &dot, &Indicators::default());

            prop_assert_eq!(image.address(&lines), address);
            prop_assert_eq!(image.column(&lines), Some(code_index));
            prop_assert_eq!(image.direction(&lines), !set);
            if set {
                prop_assert_eq!(image.row_set(&lines), Some(row));
                prop_assert_eq!(image.row_reset(&lines), None);
            } else {
                prop_assert_eq!(image.row_reset(&lines), Some(row));
                prop_assert_eq!(image.row_set(&lines), None);
            }
            for line in 20..24u8 {
                prop_assert!(!image.line(line));
            }
        }
    }
}
