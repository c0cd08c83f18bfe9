//! assembling a [`DisassembledInstruction`] into one line of disassembly
//! text, and tracking the running address so `.org` directives land exactly
//! on the first instruction and on every address discontinuity after it.

use bitflags::bitflags;
use std::io::Write;

use crate::display;
use crate::error::DisasmError;
use crate::instruction::DisassembledInstruction;

bitflags! {
    /// which pieces of a line to emit, and how to render data operands.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// address labels (`A_0004:`) and `.org` directives, instead of a
        /// bare hex address column.
        const ASSEMBLY            = 1 << 0;
        /// a bare hex address column (ignored if `ASSEMBLY` is also set).
        const ADDRESSES            = 1 << 1;
        /// a trailing `; 0xNNNN` comment on branch/relative instructions.
        const DESTINATION_COMMENT = 1 << 2;
        const DATA_HEX            = 1 << 3;
        const DATA_BIN            = 1 << 4;
        const DATA_DEC            = 1 << 5;
        /// the raw opcode byte column.
        const OPCODES             = 1 << 6;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::ASSEMBLY | Flags::DESTINATION_COMMENT | Flags::DATA_HEX
    }
}

/// drives line-by-line formatting of a stream of [`DisassembledInstruction`]s.
///
/// holds just enough state to know when a `.org` directive is owed: the
/// first instruction always gets one, and any instruction whose address
/// isn't immediately after the previous one's does too.
pub struct PrinterState {
    flags: Flags,
    origin_initialized: bool,
    next_address: u32,
}

impl PrinterState {
    pub fn new(flags: Flags) -> Self {
        PrinterState {
            flags,
            origin_initialized: false,
            next_address: 0,
        }
    }

    /// format and write one instruction's line(s) to `out`.
    pub fn write_instruction<W: Write>(
        &mut self,
        out: &mut W,
        instr: &DisassembledInstruction,
    ) -> Result<(), DisasmError> {
        if !self.origin_initialized || instr.address != self.next_address {
            if self.flags.contains(Flags::ASSEMBLY) {
                writeln!(out, "{}", display::render_origin(instr))?;
            }
            self.origin_initialized = true;
        }
        self.next_address = instr.address + instr.width as u32;

        if self.flags.contains(Flags::ASSEMBLY) {
            write!(out, "{}\t", display::render_address_label(instr))?;
        } else if self.flags.contains(Flags::ADDRESSES) {
            write!(out, "{}\t", display::render_address(instr))?;
        }

        if self.flags.contains(Flags::OPCODES) {
            write!(out, "{}\t", display::render_opcodes(instr))?;
        }

        write!(out, "{}\t", display::render_mnemonic(instr))?;

        let num_operands = instr.info.operands.len();
        for i in 0..num_operands {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}", display::render_operand(instr, i, self.flags))?;
        }

        if self.flags.contains(Flags::DESTINATION_COMMENT) {
            if let Some(comment) = display::render_comment(instr) {
                write!(out, "\t{}", comment)?;
            }
        }

        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::INSTRUCTION_SET;

    fn find(mnemonic: &str) -> &'static crate::table::InstructionInfo {
        INSTRUCTION_SET.iter().find(|e| e.mnemonic == mnemonic).unwrap()
    }

    #[test]
    fn emits_origin_on_first_instruction_and_on_gap() {
        let mut printer = PrinterState::new(Flags::ASSEMBLY);
        let nop = find("nop");

        let i1 = DisassembledInstruction {
            address: 0,
            width: 2,
            bytes: vec![0, 0],
            info: nop,
            operands: [None, None],
        };
        let mut out = Vec::new();
        printer.write_instruction(&mut out, &i1).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(".org 0x0000"));

        let i2 = DisassembledInstruction {
            address: 2,
            width: 2,
            bytes: vec![0, 0],
            info: nop,
            operands: [None, None],
        };
        let mut out2 = Vec::new();
        printer.write_instruction(&mut out2, &i2).unwrap();
        assert!(!String::from_utf8(out2).unwrap().contains(".org"));

        let i3 = DisassembledInstruction {
            address: 10,
            width: 2,
            bytes: vec![0, 0],
            info: nop,
            operands: [None, None],
        };
        let mut out3 = Vec::new();
        printer.write_instruction(&mut out3, &i3).unwrap();
        assert!(String::from_utf8(out3).unwrap().starts_with(".org 0x000a"));
    }

    #[test]
    fn renders_ser_operand_with_register_from_16() {
        let mut printer = PrinterState::new(Flags::ASSEMBLY);
        let ser = find("ser");
        let instr = DisassembledInstruction {
            address: 2,
            width: 2,
            bytes: vec![0x0F, 0xEF],
            info: ser,
            operands: [Some(31), None],
        };
        let mut out = Vec::new();
        printer.write_instruction(&mut out, &instr).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ser\tR31"));
    }
}
