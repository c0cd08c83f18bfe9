//! Motorola S-Record byte source: reads `S1`/`S2`/`S3` data records (16/24/32
//! bit addresses respectively) and stops at the first `S9`/`S8`/`S7`
//! termination record, skipping header (`S0`) and count (`S5`/`S6`) records
//! in between.

use std::io::BufRead;

use crate::decoder::ByteSource;
use crate::error::DisasmError;

pub struct SrecSource<R: BufRead> {
    reader: R,
    data: Vec<u8>,
    address: u32,
    pos: usize,
    eof: bool,
}

impl<R: BufRead> SrecSource<R> {
    pub fn new(reader: R) -> Self {
        SrecSource {
            reader,
            data: Vec::new(),
            address: 0,
            pos: 0,
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
                return Err(DisasmError::Input(
                    "unexpected end of file before S-Record termination record".to_string(),
                ));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = parse_record(line)?;
            match record.kind {
                1 | 2 | 3 => {
                    self.data = record.data;
                    self.address = record.address;
                    self.pos = 0;
                    return Ok(true);
                }
                7 | 8 | 9 => return Ok(false),
                _ => continue,
            }
        }
    }
}

struct Record {
    kind: u8,
    address: u32,
    data: Vec<u8>,
}

fn hex_byte(s: &str, at: usize) -> Result<u8, DisasmError> {
    u8::from_str_radix(s.get(at..at + 2).ok_or_else(bad_record)?, 16).map_err(|_| bad_record())
}

fn bad_record() -> DisasmError {
    DisasmError::Input("invalid Motorola S-Record".to_string())
}

fn parse_record(line: &str) -> Result<Record, DisasmError> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'S' || !bytes[1].is_ascii_digit() {
        return Err(bad_record());
    }
    let kind = bytes[1] - b'0';
    let addr_len = match kind {
        1 | 5 | 9 => 2,
        2 | 6 | 8 => 3,
        3 | 7 => 4,
        0 | 4 => 2,
        _ => return Err(bad_record()),
    };
    let body = &line[2..];
    let count = hex_byte(body, 0)? as usize;
    if count < addr_len + 1 {
        return Err(bad_record());
    }
    let mut address: u32 = 0;
    for i in 0..addr_len {
        address = (address << 8) | hex_byte(body, 2 + i * 2)? as u32;
    }
    let data_len = count - addr_len - 1;
    let mut data = Vec::with_capacity(data_len);
    let mut sum: u32 = count as u32;
    for i in 0..addr_len {
        sum += hex_byte(body, 2 + i * 2)? as u32;
    }
    for i in 0..data_len {
        let byte = hex_byte(body, 2 + addr_len * 2 + i * 2)?;
        sum += byte as u32;
        data.push(byte);
    }
    let checksum = hex_byte(body, 2 + addr_len * 2 + data_len * 2)?;
    sum += checksum as u32;
    if sum & 0xff != 0xff {
        return Err(DisasmError::Input(
            "S-Record checksum mismatch".to_string(),
        ));
    }
    Ok(Record { kind, address, data })
}

impl<R: BufRead> ByteSource for SrecSource<R> {
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
        if self.pos >= self.data.len() {
            if !self.next_record()? {
                self.eof = true;
                return Ok(None);
            }
        }
        let byte = self.data[self.pos];
        let addr = self.address + self.pos as u32;
        self.pos += 1;
        Ok(Some((byte, addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_an_s1_data_record() {
        // count=07 (2 addr + 4 data + 1 checksum), addr=0000, data=00 C0 0F EF
        let text = "S1070000".to_string() + "00C00FEF" + "3A\n" + "S9030000FC\n";
        let mut src = SrecSource::new(Cursor::new(text));
        src.init().unwrap();
        assert_eq!(src.read().unwrap(), Some((0x00, 0)));
        assert_eq!(src.read().unwrap(), Some((0xC0, 1)));
        assert_eq!(src.read().unwrap(), Some((0x0F, 2)));
        assert_eq!(src.read().unwrap(), Some((0xEF, 3)));
        assert_eq!(src.read().unwrap(), None);
    }
}
