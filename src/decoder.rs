//! the sliding-window decoder: pulls bytes from a [`ByteSource`], assembles
//! them into opcode words, and matches them against [`crate::table::INSTRUCTION_SET`].
//!
//! the window holds up to four `(byte, address)` pairs. each call to
//! [`Decoder::read`] runs up to five passes of the same decision table the
//! original C disassembler uses: try to decode from what's buffered, and if
//! nothing in the table fires yet, pull one more byte and try again. five
//! passes is exactly enough to go from an empty window to a complete 4-byte
//! instruction one byte at a time.

use crate::error::DisasmError;
use crate::instruction::DisassembledInstruction;
use crate::operand::{extract_bits, needs_second_word, resolve, OperandKind};
use crate::table::{InstructionInfo, INDEX_DB, INDEX_DW, INSTRUCTION_SET};

/// a source of `(byte, address)` pairs, implemented once per input file
/// format. `address` need not be contiguous: the decoder treats gaps as
/// `.org`-worthy discontinuities and a change in address with a pending lone
/// byte as a reason to fall back to `.db`.
pub trait ByteSource {
    fn init(&mut self) -> Result<(), DisasmError>;
    fn close(&mut self) -> Result<(), DisasmError>;
    /// `Ok(None)` signals end of stream; it is not an error.
    fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError>;
}

const WINDOW: usize = 4;

/// the AVR instruction decoder: owns the sliding window and a boxed
/// [`ByteSource`], and produces one [`DisassembledInstruction`] per call to
/// [`Decoder::read`] until the source is exhausted.
pub struct Decoder<S: ByteSource> {
    source: S,
    data: [u8; WINDOW],
    address: [u32; WINDOW],
    len: usize,
    eof: bool,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(mut source: S) -> Result<Self, DisasmError> {
        source.init()?;
        Ok(Decoder {
            source,
            data: [0; WINDOW],
            address: [0; WINDOW],
            len: 0,
            eof: false,
        })
    }

    pub fn close(mut self) -> Result<(), DisasmError> {
        self.source.close()
    }

    /// count of bytes at the front of the window whose addresses form an
    /// unbroken `+1` run. a decoder can only ever assemble a multi-byte
    /// opcode from bytes that are consecutive this way.
    fn len_consecutive(&self) -> usize {
        let mut n = 0;
        for i in 0..self.len {
            if i > 0 && self.address[i].wrapping_sub(self.address[i - 1]) != 1 {
                break;
            }
            n += 1;
        }
        n
    }

    fn shift(&mut self, n: usize) {
        for _ in 0..n {
            for j in 0..WINDOW - 1 {
                self.data[j] = self.data[j + 1];
                self.address[j] = self.address[j + 1];
            }
            self.data[WINDOW - 1] = 0;
            self.address[WINDOW - 1] = 0;
            if self.len > 0 {
                self.len -= 1;
            }
        }
    }

    fn lookup(opcode: u16) -> &'static InstructionInfo {
        for entry in INSTRUCTION_SET {
            let mut bits = opcode;
            for operand in entry.operands {
                bits &= !operand.mask;
            }
            if bits == entry.instruction_mask {
                return entry;
            }
        }
        // unreachable: the .dw/.db sentinels match any opcode.
        &INSTRUCTION_SET[INDEX_DW]
    }

    fn resolve_operands(
        info: &'static InstructionInfo,
        opcode: u16,
        second_word: Option<u16>,
    ) -> [Option<i32>; 2] {
        let mut out = [None, None];
        for (i, operand) in info.operands.iter().enumerate() {
            let mut raw = extract_bits(opcode, operand.mask) as u32;
            if needs_second_word(operand.kind) {
                let hi = raw;
                let lo = second_word.unwrap_or(0) as u32;
                raw = (hi << 16) | lo;
            }
            out[i] = Some(resolve(operand.kind, raw));
        }
        out
    }

    /// decode and return the next instruction, or `Ok(None)` at end of
    /// stream.
    pub fn read(&mut self) -> Result<Option<DisassembledInstruction>, DisasmError> {
        for _ in 0..5 {
            let len_consecutive = self.len_consecutive();

            if len_consecutive == 0 && self.len == 0 && self.eof {
                return Ok(None);
            }

            // a lone byte stranded by an address jump or EOF: emit .db.
            if len_consecutive == 1 && (self.len > 1 || self.eof) {
                let address = self.address[0];
                let byte = self.data[0];
                self.shift(1);
                return Ok(Some(DisassembledInstruction {
                    address,
                    width: 1,
                    bytes: vec![byte],
                    info: &INSTRUCTION_SET[INDEX_DB],
                    operands: [Some(byte as i32), None],
                }));
            }

            if len_consecutive >= 2 {
                let opcode = u16::from_le_bytes([self.data[0], self.data[1]]);
                let info = Self::lookup(opcode);

                if info.width == 2 {
                    let address = self.address[0];
                    let bytes = vec![self.data[0], self.data[1]];
                    let operands = Self::resolve_operands(info, opcode, None);
                    self.shift(2);
                    return Ok(Some(DisassembledInstruction {
                        address,
                        width: 2,
                        bytes,
                        info,
                        operands,
                    }));
                }

                // a 4-byte instruction: need all four bytes consecutive.
                if len_consecutive == 4 {
                    let address = self.address[0];
                    let bytes = vec![self.data[0], self.data[1], self.data[2], self.data[3]];
                    let second_word = u16::from_le_bytes([self.data[2], self.data[3]]);
                    let operands = Self::resolve_operands(info, opcode, Some(second_word));
                    self.shift(4);
                    return Ok(Some(DisassembledInstruction {
                        address,
                        width: 4,
                        bytes,
                        info,
                        operands,
                    }));
                } else if (len_consecutive == 3 && (self.len > 3 || self.eof))
                    || (len_consecutive == 2 && (self.len > 2 || self.eof))
                {
                    // truncated wide instruction: fall back to a raw .dw of
                    // just the first word.
                    let address = self.address[0];
                    let bytes = vec![self.data[0], self.data[1]];
                    let dw = &INSTRUCTION_SET[INDEX_DW];
                    let operands = Self::resolve_operands(dw, opcode, None);
                    self.shift(2);
                    return Ok(Some(DisassembledInstruction {
                        address,
                        width: 2,
                        bytes,
                        info: dw,
                        operands,
                    }));
                }
                // otherwise fall through and pull another byte.
            }

            match self.source.read()? {
                Some((byte, addr)) => {
                    if self.len == WINDOW {
                        return Err(DisasmError::Decoder(
                            "opcode buffer overflow".to_string(),
                        ));
                    }
                    self.data[self.len] = byte;
                    self.address[self.len] = addr;
                    self.len += 1;
                }
                None => {
                    self.eof = true;
                }
            }
        }

        Err(DisasmError::Decoder(
            "no decoding logic invoked after five attempts".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct VecSource {
        bytes: VecDeque<(u8, u32)>,
    }

    impl VecSource {
        fn new(bytes: &[u8]) -> Self {
            VecSource {
                bytes: bytes.iter().enumerate().map(|(i, b)| (*b, i as u32)).collect(),
            }
        }

        fn with_gap(pairs: &[(u8, u32)]) -> Self {
            VecSource {
                bytes: pairs.iter().cloned().collect(),
            }
        }
    }

    impl ByteSource for VecSource {
        fn init(&mut self) -> Result<(), DisasmError> {
            Ok(())
        }
        fn close(&mut self) -> Result<(), DisasmError> {
            Ok(())
        }
        fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError> {
            Ok(self.bytes.pop_front())
        }
    }

    #[test]
    fn decodes_scenario_one() {
        // 00 C0 0F EF 07 BB 08 BB 0A 95 FD CF
        let bytes = [0x00, 0xC0, 0x0F, 0xEF, 0x07, 0xBB, 0x08, 0xBB, 0x0A, 0x95, 0xFD, 0xCF];
        let mut dec = Decoder::new(VecSource::new(&bytes)).unwrap();

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "rjmp");
        assert_eq!(i.operands[0], Some(0));

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "ser");
        assert_eq!(i.operands[0], Some(16));

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "out");
        assert_eq!(i.operands, [Some(0x17), Some(16)]);

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "out");
        assert_eq!(i.operands, [Some(0x18), Some(16)]);

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "dec");
        assert_eq!(i.operands[0], Some(16));

        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), "rjmp");
        assert_eq!(i.operands[0], Some(-6));

        assert!(dec.read().unwrap().is_none());
    }

    #[test]
    fn lone_byte_before_address_jump_falls_back_to_db() {
        // byte at address 0, then a jump to address 5: lone byte -> .db
        let src = VecSource::with_gap(&[(0xFF, 0), (0x00, 5), (0x00, 6)]);
        let mut dec = Decoder::new(src).unwrap();
        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), ".db");
        assert_eq!(i.width, 1);
        assert_eq!(i.operands[0], Some(0xFF));
    }

    #[test]
    fn ld_and_ldd_share_an_encoding_distinguished_only_by_displacement() {
        // LD Rd,Z / LDD Rd,Z+q alias at q=0: the plain "ld" variant must win
        // when q is literally zero, and "ldd" must win for any nonzero q.
        let ld_z = Decoder::<VecSource>::lookup(0x8000);
        assert_eq!(ld_z.mnemonic, "ld");

        let ldd_z_q1 = Decoder::<VecSource>::lookup(0x8002); // q=1
        assert_eq!(ldd_z_q1.mnemonic, "ldd");

        let st_z = Decoder::<VecSource>::lookup(0x8200);
        assert_eq!(st_z.mnemonic, "st");

        let std_z_q1 = Decoder::<VecSource>::lookup(0x8202); // q=1
        assert_eq!(std_z_q1.mnemonic, "std");
    }

    #[test]
    fn truncated_four_byte_instruction_falls_back_to_dw() {
        // jmp opcode 0x940C with only its first word present before EOF
        let bytes = [0x0C, 0x94];
        let mut dec = Decoder::new(VecSource::new(&bytes)).unwrap();
        let i = dec.read().unwrap().unwrap();
        assert_eq!(i.mnemonic(), ".dw");
        assert_eq!(i.width, 2);
    }
}
