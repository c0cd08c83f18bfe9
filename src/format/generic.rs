//! Atmel Generic byte source: reads `AAAAAA:DDDD` records, a 24-bit word
//! address and a 16-bit data word, and expands each into two little-endian
//! bytes at byte addresses `address*2` and `address*2 + 1`.

use std::io::BufRead;

use crate::decoder::ByteSource;
use crate::error::DisasmError;

pub struct GenericSource<R: BufRead> {
    reader: R,
    address: u32,
    data: u16,
    avail: u8,
    eof: bool,
}

impl<R: BufRead> GenericSource<R> {
    pub fn new(reader: R) -> Self {
        GenericSource {
            reader,
            address: 0,
            data: 0,
            avail: 0,
            eof: false,
        }
    }

    fn next_record(&mut self) -> Result<bool, DisasmError> {
        loop {
            let mut line = String::new();
            let n = self
                .reader
                .read_line(&mut line)
                .map_err(|e| DisasmError::Input(e.to_string()))?;
            if n == 0 {
                return Ok(false);
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (addr_str, data_str) = line.split_once(':').ok_or_else(|| {
                DisasmError::Input("invalid Atmel Generic record".to_string())
            })?;
            let address = u32::from_str_radix(addr_str, 16)
                .map_err(|_| DisasmError::Input("invalid Atmel Generic record".to_string()))?;
            let data = u16::from_str_radix(data_str, 16)
                .map_err(|_| DisasmError::Input("invalid Atmel Generic record".to_string()))?;
            self.address = address;
            self.data = data;
            self.avail = 2;
            return Ok(true);
        }
    }
}

impl<R: BufRead> ByteSource for GenericSource<R> {
    fn init(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError> {
        if self.eof {
            return Ok(None);
        }
        if self.avail == 0 {
            if !self.next_record()? {
                self.eof = true;
                return Ok(None);
            }
        }
        let result = if self.avail == 2 {
            ((self.data & 0xff) as u8, self.address * 2)
        } else {
            (((self.data >> 8) & 0xff) as u8, self.address * 2 + 1)
        };
        self.avail -= 1;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn expands_one_word_record_into_two_bytes() {
        let text = "000000:C000\n000001:EF0F\n";
        let mut src = GenericSource::new(Cursor::new(text));
        src.init().unwrap();
        assert_eq!(src.read().unwrap(), Some((0x00, 0)));
        assert_eq!(src.read().unwrap(), Some((0xC0, 1)));
        assert_eq!(src.read().unwrap(), Some((0x0F, 2)));
        assert_eq!(src.read().unwrap(), Some((0xEF, 3)));
        assert_eq!(src.read().unwrap(), None);
    }
}
