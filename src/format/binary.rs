//! raw binary byte source: every byte of the input, addresses counted up
//! from zero.

use std::io::Read;

use crate::decoder::ByteSource;
use crate::error::DisasmError;

pub struct BinarySource<R: Read> {
    reader: R,
    address: u32,
}

impl<R: Read> BinarySource<R> {
    pub fn new(reader: R) -> Self {
        BinarySource { reader, address: 0 }
    }
}

impl<R: Read> ByteSource for BinarySource<R> {
    fn init(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => {
                let addr = self.address;
                self.address += 1;
                Ok(Some((byte[0], addr)))
            }
            Err(e) => Err(DisasmError::Input(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn yields_every_byte_with_incrementing_address() {
        let mut src = BinarySource::new(Cursor::new(vec![0x00, 0xC0, 0x0F]));
        src.init().unwrap();
        assert_eq!(src.read().unwrap(), Some((0x00, 0)));
        assert_eq!(src.read().unwrap(), Some((0xC0, 1)));
        assert_eq!(src.read().unwrap(), Some((0x0F, 2)));
        assert_eq!(src.read().unwrap(), None);
    }
}
