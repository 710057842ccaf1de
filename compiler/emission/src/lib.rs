use thiserror::Error;

pub use emission::{emit, output};

mod emission;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("unable to write assembly: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal Error: pseudo-register '{0}' reached assembly emission")]
    PseudoOperand(String),
}
