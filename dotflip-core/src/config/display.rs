//! Display configuration
//!
//! Describes the physical sign: how many rows, which modules sit on the
//! bus (with their column width and jumpered address), and where every
//! control signal lives in the shift-register chain. Configuration is
//! validated once at engine construction and never mutated afterwards.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::lines::{LineMap, ADDRESS_LINES, MAX_LINES, MAX_ROWS};
use crate::tables::{column_mask, MAX_COLUMNS};

/// Maximum modules per display
pub const MAX_MODULES: usize = 16;

/// Highest module address representable on the address lines
pub const MAX_ADDRESS: u8 = (1 << ADDRESS_LINES) - 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Row count is zero or above [`MAX_ROWS`]
    InvalidRowCount(u8),
    /// No modules configured
    NoModules,
    /// Row-set or row-reset line table length differs from the row count
    RowLinesMismatch,
    /// Module has zero columns or more than [`MAX_COLUMNS`]
    InvalidModuleWidth { module: u8, columns: u8 },
    /// Module address does not fit the address lines
    AddressOutOfRange { module: u8, address: u8 },
    /// Line count is zero or above [`MAX_LINES`]
    InvalidLineCount(u16),
    /// A mapped line lies beyond the configured line count
    LineOutOfRange(u8),
    /// A line is assigned to more than one signal
    LineConflict(u8),
    /// Binary configuration could not be decoded
    Deserialize,
    /// Binary configuration could not be encoded
    Serialize,
}

/// Indicator behaviour during painting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndicatorMode {
    /// Indicators only change when set explicitly
    #[default]
    Static,
    /// Indicator C toggles on every single-dot actuation
    Flashing,
}

/// One flip-dot module on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleConfig {
    /// Physical address (0-127)
    pub address: u8,
    /// Number of columns on this module (1-28)
    pub columns: u8,
}

impl ModuleConfig {
    /// Create a new module entry
    pub const fn new(address: u8, columns: u8) -> Self {
        Self { address, columns }
    }

    /// Mask covering every column of this module
    pub const fn column_mask(&self) -> u32 {
        column_mask(self.columns as usize)
    }
}

/// Complete display configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Number of dot rows shared by all modules
    pub rows: u8,
    /// Modules in bus order
    pub modules: Vec<ModuleConfig, MAX_MODULES>,
    /// Total number of shift-register outputs in the chain
    pub line_count: u16,
    /// Signal-to-line assignments
    pub lines: LineMap,
    /// Log every actuation
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,
    /// Indicator behaviour
    #[cfg_attr(feature = "serde", serde(default))]
    pub indicator_mode: IndicatorMode,
    /// Commit the inverted state as current after `inverse()`
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverse_resync: bool,
}

impl DisplayConfig {
    /// Check the configuration for anything that would produce an invalid
    /// shift-register image
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.rows as usize > MAX_ROWS {
            return Err(ConfigError::InvalidRowCount(self.rows));
        }
        if self.modules.is_empty() {
            return Err(ConfigError::NoModules);
        }
        if self.lines.row_set.len() != self.rows as usize
            || self.lines.row_reset.len() != self.rows as usize
        {
            return Err(ConfigError::RowLinesMismatch);
        }

        for (index, module) in self.modules.iter().enumerate() {
            if module.columns == 0 || module.columns as usize > MAX_COLUMNS {
                return Err(ConfigError::InvalidModuleWidth {
                    module: index as u8,
                    columns: module.columns,
                });
            }
            if module.address > MAX_ADDRESS {
                return Err(ConfigError::AddressOutOfRange {
                    module: index as u8,
                    address: module.address,
                });
            }
        }

        if self.line_count == 0 || self.line_count as usize > MAX_LINES {
            return Err(ConfigError::InvalidLineCount(self.line_count));
        }
        if let Some(line) = self.lines.iter().find(|&l| l as u16 >= self.line_count) {
            return Err(ConfigError::LineOutOfRange(line));
        }
        if let Some(line) = self.lines.first_conflict() {
            return Err(ConfigError::LineConflict(line));
        }

        Ok(())
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows as usize
    }

    /// Number of modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Shift-register image length in bytes
    pub fn image_len(&self) -> usize {
        (self.line_count as usize).div_ceil(8)
    }

    /// Sum of columns across all modules
    pub fn total_columns(&self) -> usize {
        self.modules.iter().map(|m| m.columns as usize).sum()
    }

    /// Number of dots on the display
    pub fn dot_count(&self) -> usize {
        self.row_count() * self.total_columns()
    }

    /// Decode a postcard-encoded configuration and validate it
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode this configuration with postcard into `buf`
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}
