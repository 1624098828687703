//! Lookup table for the reflected Modbus polynomial.
//!
//! The table is a `const` evaluation, so it is baked into the binary and
//! never rebuilt at runtime.

/// Register value before the first byte is folded in.
pub const SEED: u16 = 0xFFFF;

/// Bit-reflected form of the Modbus generator polynomial 0x8005.
pub const POLY: u16 = 0xA001;

pub const TABLE_SIZE: usize = 256;

/// Process-wide lookup table, indexed by `(register ^ byte) & 0xFF`.
pub static TABLE: [u16; TABLE_SIZE] = build_table();

/// Runs the 8 bit-level shift/XOR steps for every possible byte value.
pub const fn build_table() -> [u16; TABLE_SIZE] {
    let mut table = [0u16; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        let mut r = i as u16;
        let mut bit = 0;
        while bit < 8 {
            if (r & 1) != 0 {
                r = (r >> 1) ^ POLY;
            } else {
                r >>= 1;
            }
            bit += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
}

pub fn table() -> &'static [u16; TABLE_SIZE] {
    &TABLE
}
