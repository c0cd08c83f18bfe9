//! rendering a [`DisassembledInstruction`] into the small pieces of text the
//! printer assembles into a line: mnemonic, operands, opcode bytes, address,
//! address label, `.org` directive, and the destination-address comment.
//!
//! every `render_*` function here returns a `String` rather than writing
//! through a sink, the "get-string" style, as opposed to the alternative
//! direct-to-`fprintf` formatter this crate's prior art also shows. only
//! [`crate::printer`] writes bytes anywhere.

use crate::instruction::DisassembledInstruction;
use crate::operand::OperandKind;
use crate::printer::Flags;

const ADDRESS_WIDTH: usize = 4;

const PREFIX_REGISTER: &str = "R";
const PREFIX_IO_REGISTER: &str = "$";
const PREFIX_DATA_HEX: &str = "0x";
const PREFIX_DATA_BIN: &str = "0b";
const PREFIX_DATA_DEC: &str = "";
const PREFIX_BIT: &str = "";
const PREFIX_ABSOLUTE_ADDRESS: &str = "0x";
const PREFIX_RELATIVE_ADDRESS: &str = ".";
const PREFIX_DES_ROUND: &str = "0x";
const PREFIX_RAW_WORD: &str = "0x";
const PREFIX_RAW_BYTE: &str = "0x";
const PREFIX_ADDRESS_LABEL: &str = "A_";

pub fn render_origin(instr: &DisassembledInstruction) -> String {
    format!(
        ".org {}{:0width$x}",
        PREFIX_ABSOLUTE_ADDRESS,
        instr.address,
        width = ADDRESS_WIDTH
    )
}

pub fn render_address_label(instr: &DisassembledInstruction) -> String {
    format!(
        "{}{:0width$x}:",
        PREFIX_ADDRESS_LABEL,
        instr.address,
        width = ADDRESS_WIDTH
    )
}

pub fn render_address(instr: &DisassembledInstruction) -> String {
    format!("{:width$x}:", instr.address, width = ADDRESS_WIDTH)
}

pub fn render_opcodes(instr: &DisassembledInstruction) -> String {
    match instr.width {
        1 => format!("{:02x}         ", instr.bytes[0]),
        2 => format!("{:02x} {:02x}      ", instr.bytes[1], instr.bytes[0]),
        4 => format!(
            "{:02x} {:02x} {:02x} {:02x}",
            instr.bytes[3], instr.bytes[2], instr.bytes[1], instr.bytes[0]
        ),
        _ => String::new(),
    }
}

pub fn render_mnemonic(instr: &DisassembledInstruction) -> String {
    instr.mnemonic().to_string()
}

/// render operand `index`. `flags` only affects [`OperandKind::Data`] (hex,
/// binary, or decimal) and [`OperandKind::BranchAddress`]/
/// [`OperandKind::RelativeAddress`] (address label vs. signed displacement).
pub fn render_operand(instr: &DisassembledInstruction, index: usize, flags: Flags) -> String {
    let Some(spec) = instr.info.operands.get(index) else {
        return String::new();
    };
    let Some(value) = instr.operands[index] else {
        return String::new();
    };

    match spec.kind {
        OperandKind::None => String::new(),
        OperandKind::Register
        | OperandKind::RegisterFrom16
        | OperandKind::RegisterEvenPair
        | OperandKind::RegisterEvenPairFrom24 => format!("{}{}", PREFIX_REGISTER, value),
        OperandKind::IoRegister => format!("{}{:02x}", PREFIX_IO_REGISTER, value),
        OperandKind::Bit => format!("{}{}", PREFIX_BIT, value),
        OperandKind::DesRound => format!("{}{}", PREFIX_DES_ROUND, value),
        OperandKind::RawWord => format!("{}{:04x}", PREFIX_RAW_WORD, value),
        OperandKind::RawByte => format!("{}{:02x}", PREFIX_RAW_BYTE, value),
        OperandKind::X => "X".to_string(),
        OperandKind::Xp => "X+".to_string(),
        OperandKind::Mx => "-X".to_string(),
        OperandKind::Y => "Y".to_string(),
        OperandKind::Yp => "Y+".to_string(),
        OperandKind::My => "-Y".to_string(),
        OperandKind::Z => "Z".to_string(),
        OperandKind::Zp => "Z+".to_string(),
        OperandKind::Mz => "-Z".to_string(),
        OperandKind::Ypq => format!("Y+{}", value),
        OperandKind::Zpq => format!("Z+{}", value),
        OperandKind::Data => {
            if flags.contains(Flags::DATA_BIN) {
                format!("{}{:08b}", PREFIX_DATA_BIN, value)
            } else if flags.contains(Flags::DATA_DEC) {
                format!("{}{}", PREFIX_DATA_DEC, value)
            } else {
                format!("{}{:02x}", PREFIX_DATA_HEX, value)
            }
        }
        OperandKind::LongAbsoluteAddress => format!(
            "{}{:0width$x}",
            PREFIX_ABSOLUTE_ADDRESS,
            value / 2,
            width = ADDRESS_WIDTH
        ),
        OperandKind::DataAddress16 => {
            format!("{}{:0width$x}", PREFIX_ABSOLUTE_ADDRESS, value, width = ADDRESS_WIDTH)
        }
        OperandKind::BranchAddress | OperandKind::RelativeAddress => {
            if flags.contains(Flags::ASSEMBLY) {
                let target = value + instr.address as i32 + instr.width as i32;
                format!(
                    "{}{:0width$x}",
                    PREFIX_ADDRESS_LABEL,
                    target,
                    width = ADDRESS_WIDTH
                )
            } else if value >= 0 {
                format!("{}+{}", PREFIX_RELATIVE_ADDRESS, value)
            } else {
                format!("{}{}", PREFIX_RELATIVE_ADDRESS, value)
            }
        }
    }
}

/// the destination-address comment for branch/relative operands, e.g.
/// `; 0x0004`. empty if this instruction has no such operand.
pub fn render_comment(instr: &DisassembledInstruction) -> Option<String> {
    for (i, spec) in instr.info.operands.iter().enumerate() {
        if matches!(
            spec.kind,
            OperandKind::BranchAddress | OperandKind::RelativeAddress
        ) {
            let value = instr.operands[i]?;
            let target = value + instr.address as i32 + instr.width as i32;
            return Some(format!("; {}{:x}", PREFIX_ABSOLUTE_ADDRESS, target));
        }
    }
    None
}
