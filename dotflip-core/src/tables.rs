//! Bit lookup and column-code tables
//!
//! Everything here is `const` data: single-bit masks so the hot paths never
//! recompute shifts, and the FP2800A column-driver code table.

/// Maximum columns per module (FP2800A drives 28 outputs)
pub const MAX_COLUMNS: usize = 28;

/// Number of column-code lines (A0, A1, A2, B0, B1)
pub const COLUMN_CODE_LINES: usize = 5;

/// Single-bit masks for 32-bit words, indexed by bit position
pub const INT_BITS: [u32; 32] = {
    let mut bits = [0u32; 32];
    let mut i = 0;
    while i < 32 {
        bits[i] = 1 << i;
        i += 1;
    }
    bits
};

/// Single-bit masks for bytes, indexed by bit position
pub const BYTE_BITS: [u8; 8] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

/// Column codes, one row per column: `[A0, A1, A2, B0, B1]`
///
/// The FP2800A selects one of 28 outputs with a 3-bit A group (1-7, zero
/// selects nothing) and a 2-bit B group (0-3). Column `n` maps to
/// `A = n % 7 + 1`, `B = n / 7`.
pub const COLUMN_CODES: [[u8; COLUMN_CODE_LINES]; MAX_COLUMNS] = {
    let mut codes = [[0u8; COLUMN_CODE_LINES]; MAX_COLUMNS];
    let mut column = 0;
    while column < MAX_COLUMNS {
        let a = column % 7 + 1;
        let b = column / 7;
        codes[column] = [
            (a & 1) as u8,
            ((a >> 1) & 1) as u8,
            ((a >> 2) & 1) as u8,
            (b & 1) as u8,
            ((b >> 1) & 1) as u8,
        ];
        column += 1;
    }
    codes
};

/// Mask with the low `columns` bits set
///
/// Saturates at a full word for 32 or more columns.
pub const fn column_mask(columns: usize) -> u32 {
    if columns >= 32 {
        u32::MAX
    } else {
        INT_BITS[columns] - 1
    }
}

/// Index into [`COLUMN_CODES`] for a column of a module `module_columns` wide
///
/// Narrower modules are right-aligned against the full code space, so the
/// last column of any module always uses the last table entry.
pub const fn column_code_index(module_columns: usize, column: usize) -> usize {
    (MAX_COLUMNS - module_columns) + column
}

/// Test whether bit `bit` of `value` is set
pub const fn bit_is_set(value: u32, bit: usize) -> bool {
    ((value >> bit) & 1) == 1
}
