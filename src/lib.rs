//! CRC16 Modbus checksum.
//!
//! Reflected polynomial 0xA001, seed 0xFFFF, no final XOR. The checksum can be
//! computed in one call or fed in arbitrary chunks; both give the same value.
//!
//! ```
//! assert_eq!(modbus_crc16::compute(b"123456789"), 0x4B37);
//! ```

pub mod crc;
pub mod source;
pub mod table;

pub use crate::crc::{compute, compute_with, update, Crc16};
pub use crate::table::{table, POLY, SEED, TABLE, TABLE_SIZE};
