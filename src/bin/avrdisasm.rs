//! command line front-end: picks a byte source (explicit `-t` or
//! auto-detected from the first byte), builds a [`PrinterState`] from the
//! output flags, and drives the decode/print pipeline to completion.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use avrdisasm::decoder::Decoder;
use avrdisasm::error::DisasmError;
use avrdisasm::format::{detect, AsciiHexSource, BinarySource, FileType, GenericSource, IhexSource, SrecSource};
use avrdisasm::printer::{Flags, PrinterState};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FileTypeArg {
    Generic,
    Ihex,
    Srec,
    Binary,
    Ascii,
}

/// a table-driven disassembler for 8-bit AVR program images.
#[derive(Parser, Debug)]
#[command(name = "avrdisasm", version, about)]
struct Args {
    /// input file, or `-` for stdin.
    input: String,

    /// output file (default stdout; `-` means stdout).
    #[arg(short = 'o', long = "out-file", default_value = "-")]
    out_file: String,

    /// input file format; default is to auto-detect from the first byte.
    #[arg(short = 't', long = "file-type", value_enum)]
    file_type: Option<FileTypeArg>,

    /// enable assembly output mode, with address labels using this prefix.
    #[arg(short = 'l', long = "address-label")]
    address_label: Option<String>,

    /// render data operands in hexadecimal (default).
    #[arg(long = "data-base-hex")]
    data_base_hex: bool,

    /// render data operands in binary.
    #[arg(long = "data-base-bin")]
    data_base_bin: bool,

    /// render data operands in decimal.
    #[arg(long = "data-base-dec")]
    data_base_dec: bool,

    /// suppress the address column.
    #[arg(long = "no-addresses")]
    no_addresses: bool,

    /// suppress the opcode byte column.
    #[arg(long = "no-opcodes")]
    no_opcodes: bool,

    /// suppress destination-address comments on branch instructions.
    #[arg(long = "no-destination-comments")]
    no_destination_comments: bool,
}

fn build_flags(args: &Args) -> Flags {
    let mut flags = Flags::empty();

    if args.address_label.is_some() {
        flags |= Flags::ASSEMBLY;
    } else if !args.no_addresses {
        flags |= Flags::ADDRESSES;
    }

    if !args.no_opcodes {
        flags |= Flags::OPCODES;
    }
    if !args.no_destination_comments {
        flags |= Flags::DESTINATION_COMMENT;
    }

    if args.data_base_bin {
        flags |= Flags::DATA_BIN;
    } else if args.data_base_dec {
        flags |= Flags::DATA_DEC;
    } else {
        flags |= Flags::DATA_HEX;
    }

    flags
}

fn open_input(path: &str) -> Result<Box<dyn Read>, DisasmError> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path).map_err(|e| {
            DisasmError::Input(format!("opening {}: {}", path, e))
        })?))
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>, DisasmError> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(path).map_err(DisasmError::Output)?))
    }
}

fn run(args: Args) -> Result<(), DisasmError> {
    let mut raw = open_input(&args.input)?;
    let mut buf = Vec::new();
    raw.read_to_end(&mut buf)
        .map_err(|e| DisasmError::Input(e.to_string()))?;
    let input: Box<dyn Read> = Box::new(io::Cursor::new(buf.clone()));

    let resolved_type = match args.file_type {
        Some(t) => t,
        None => match detect(*buf.first().unwrap_or(&0)) {
            Some(FileType::Ihex) => FileTypeArg::Ihex,
            Some(FileType::Srec) => FileTypeArg::Srec,
            Some(FileType::Generic) => FileTypeArg::Generic,
            _ => {
                return Err(DisasmError::Input(
                    "could not auto-detect file type; pass -t explicitly".to_string(),
                ))
            }
        },
    };

    let mut out = open_output(&args.out_file)?;
    let flags = build_flags(&args);
    let mut printer = PrinterState::new(flags);

    macro_rules! drive {
        ($source:expr) => {{
            let mut decoder = Decoder::new($source)?;
            loop {
                match decoder.read()? {
                    Some(instr) => printer.write_instruction(&mut out, &instr)?,
                    None => break,
                }
            }
        }};
    }

    match resolved_type {
        FileTypeArg::Generic => drive!(GenericSource::new(BufReader::new(input))),
        FileTypeArg::Ihex => drive!(IhexSource::new(BufReader::new(input))),
        FileTypeArg::Srec => drive!(SrecSource::new(BufReader::new(input))),
        FileTypeArg::Binary => drive!(BinarySource::new(input)),
        FileTypeArg::Ascii => drive!(AsciiHexSource::new(input)),
    }

    out.flush().map_err(DisasmError::Output)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("avrdisasm: {}", e);
            ExitCode::FAILURE
        }
    }
}
