//! ASCII hex byte source: whitespace-delimited hex byte pairs, e.g.
//! `"00 c0 0f ef"`, addresses counted up from zero.

use std::io::Read;

use crate::decoder::ByteSource;
use crate::error::DisasmError;

pub struct AsciiHexSource<R: Read> {
    reader: R,
    buf: String,
    pos: usize,
    address: u32,
    loaded: bool,
}

impl<R: Read> AsciiHexSource<R> {
    pub fn new(reader: R) -> Self {
        AsciiHexSource {
            reader,
            buf: String::new(),
            pos: 0,
            address: 0,
            loaded: false,
        }
    }

    fn ensure_loaded(&mut self) -> Result<(), DisasmError> {
        if !self.loaded {
            self.reader
                .read_to_string(&mut self.buf)
                .map_err(|e| DisasmError::Input(e.to_string()))?;
            self.loaded = true;
        }
        Ok(())
    }
}

impl<R: Read> ByteSource for AsciiHexSource<R> {
    fn init(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), DisasmError> {
        Ok(())
    }

    fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError> {
        self.ensure_loaded()?;
        let rest = self.buf[self.pos..].trim_start();
        self.pos = self.buf.len() - rest.len();
        if rest.is_empty() {
            return Ok(None);
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..end];
        if token.len() != 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DisasmError::Input(format!(
                "invalid ASCII hex byte {:?}",
                token
            )));
        }
        let byte = u8::from_str_radix(token, 16).unwrap();
        self.pos += end;
        let addr = self.address;
        self.address += 1;
        Ok(Some((byte, addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_whitespace_delimited_bytes() {
        let mut src = AsciiHexSource::new(Cursor::new(b"00 c0 0f ef\n".to_vec()));
        src.init().unwrap();
        assert_eq!(src.read().unwrap(), Some((0x00, 0)));
        assert_eq!(src.read().unwrap(), Some((0xC0, 1)));
        assert_eq!(src.read().unwrap(), Some((0x0F, 2)));
        assert_eq!(src.read().unwrap(), Some((0xEF, 3)));
        assert_eq!(src.read().unwrap(), None);
    }
}
