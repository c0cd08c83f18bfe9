//! byte sources: one [`crate::decoder::ByteSource`] implementation per
//! program-image file format the original tool accepted, plus
//! auto-detection from the first non-whitespace byte of the input.

pub mod asciihex;
pub mod binary;
pub mod detect;
pub mod generic;
pub mod ihex;
pub mod srec;

pub use asciihex::AsciiHexSource;
pub use binary::BinarySource;
pub use detect::{detect, FileType};
pub use generic::GenericSource;
pub use ihex::IhexSource;
pub use srec::SrecSource;
