//! auto-detecting a file format from its first non-whitespace byte, used
//! when the CLI isn't given an explicit `-t`.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileType {
    Ihex,
    Srec,
    Generic,
    Binary,
    AsciiHex,
}

/// `:` -> Intel HEX, `S` -> S-Record, an ASCII hex digit -> Atmel Generic.
/// binary and whitespace-delimited ASCII hex both start with an arbitrary
/// byte, so they can't be told apart this way and must be requested
/// explicitly.
pub fn detect(first_byte: u8) -> Option<FileType> {
    match first_byte {
        b':' => Some(FileType::Ihex),
        b'S' => Some(FileType::Srec),
        b if b.is_ascii_hexdigit() => Some(FileType::Generic),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_ihex_and_srec_by_leading_byte() {
        assert_eq!(detect(b':'), Some(FileType::Ihex));
        assert_eq!(detect(b'S'), Some(FileType::Srec));
    }

    #[test]
    fn detects_generic_from_a_leading_hex_digit() {
        assert_eq!(detect(b'0'), Some(FileType::Generic));
        assert_eq!(detect(b'a'), Some(FileType::Generic));
    }

    #[test]
    fn refuses_to_guess_binary_vs_ascii() {
        assert_eq!(detect(0xFF), None);
    }
}
