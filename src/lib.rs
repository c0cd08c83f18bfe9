//! `avrdisasm`, a table-driven disassembler for 8-bit AVR program images.
//!
//! the decoder in this crate works the way the assembly manual's opcode
//! tables read: each entry in [`table::INSTRUCTION_SET`] names a mnemonic, a
//! width, the bits that must be fixed for that entry to match, and where its
//! operands live in the remaining bits. decoding an opcode is a linear scan
//! of that table, not a hand-written tree of matches, so growing the
//! instruction set is a matter of adding rows, not branches.
//!
//! ```
//! use avrdisasm::decoder::{ByteSource, Decoder};
//! use avrdisasm::error::DisasmError;
//!
//! struct Bytes(std::vec::IntoIter<u8>, u32);
//! impl ByteSource for Bytes {
//!     fn init(&mut self) -> Result<(), DisasmError> { Ok(()) }
//!     fn close(&mut self) -> Result<(), DisasmError> { Ok(()) }
//!     fn read(&mut self) -> Result<Option<(u8, u32)>, DisasmError> {
//!         Ok(self.0.next().map(|b| { let a = self.1; self.1 += 1; (b, a) }))
//!     }
//! }
//!
//! let mut decoder = Decoder::new(Bytes(vec![0x0c, 0x94, 0x34, 0x12].into_iter(), 0)).unwrap();
//! let instr = decoder.read().unwrap().unwrap();
//! assert_eq!(instr.mnemonic(), "jmp");
//! ```
//!
//! the pieces: [`decoder`] turns a byte stream into [`instruction::DisassembledInstruction`]s,
//! [`display`] renders their pieces to text, and [`printer`] assembles those
//! pieces into lines, inserting `.org` directives at address discontinuities.
//! [`format`] holds the program-image file readers that feed the decoder,
//! and `src/bin/avrdisasm.rs` wires all of it into a command line tool.

pub mod decoder;
pub mod display;
pub mod error;
pub mod format;
pub mod instruction;
pub mod operand;
pub mod printer;
pub mod table;

pub use decoder::{ByteSource, Decoder};
pub use error::DisasmError;
pub use instruction::DisassembledInstruction;
pub use printer::{Flags, PrinterState};
