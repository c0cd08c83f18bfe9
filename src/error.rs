//! the error taxonomy for the whole pipeline: byte source, decoder, and
//! output all report through this one sum type rather than each inventing
//! their own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisasmError {
    #[error("allocation failure")]
    Alloc,

    #[error("input error: {0}")]
    Input(String),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("decoder error: {0}")]
    Decoder(String),
}
