use std::io;

use crate::table::{SEED, TABLE};

/// Folds one byte into the register.
#[inline]
pub fn update(register: u16, byte: u8) -> u16 {
    let index = ((register ^ byte as u16) & 0xFF) as usize;
    (register >> 8) ^ TABLE[index]
}

/// CRC16 Modbus of `data`. An empty slice yields the seed, 0xFFFF.
pub fn compute(data: &[u8]) -> u16 {
    compute_with(data, SEED)
}

/// Continues a computation from `initial`.
///
/// Modbus has no final XOR, so a checksum returned earlier is also a valid
/// register: `compute_with(b, compute(a)) == compute(a ++ b)`.
pub fn compute_with(data: &[u8], initial: u16) -> u16 {
    data.iter().fold(initial, |crc, &byte| update(crc, byte))
}

/// Streaming handle around a single register.
///
/// ```
/// use modbus_crc16::Crc16;
///
/// let mut crc = Crc16::new();
/// crc.feed(b"1234");
/// crc.feed(b"56789");
/// assert_eq!(crc.result(), 0x4B37);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Self::with_initial(SEED)
    }

    pub fn with_initial(register: u16) -> Self {
        Self { register }
    }

    pub fn feed(&mut self, data: &[u8]) {
        self.register = compute_with(data, self.register);
    }

    /// Current register value. Does not reset, so feeding may continue.
    pub fn result(&self) -> u16 {
        self.register
    }

    pub fn reset(&mut self) {
        self.register = SEED;
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for Crc16 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
