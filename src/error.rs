use crate::Utxo;
use thiserror::Error;

/// Errors returned by `UtxoPool` lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtxoPoolError {
    #[error("UTXO {0} is not in the pool")]
    NotFound(Utxo),
}

/// Reasons a transaction is rejected, or cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Input {index} claims UTXO {utxo} which is not in the pool")]
    MissingUtxo { index: usize, utxo: Utxo },

    #[error("Input {index} has a missing or invalid signature")]
    InvalidSignature { index: usize },

    #[error("Input {index} claims UTXO {utxo} which is already claimed by an earlier input")]
    DuplicateInput { index: usize, utxo: Utxo },

    #[error("Output {index} has a negative value: {value}")]
    NegativeOutput { index: usize, value: i64 },

    #[error("Outputs total {output_value} but inputs only total {input_value}")]
    InsufficientInputValue {
        input_value: i128,
        output_value: i128,
    },

    #[error("Input index {index} is out of range for a transaction with {len} inputs")]
    InputIndexOutOfRange { index: usize, len: usize },

    #[error("Failed to encode transaction data: {0}")]
    Encoding(String),
}

impl From<bincode::Error> for TransactionError {
    fn from(error: bincode::Error) -> Self {
        TransactionError::Encoding(error.to_string())
    }
}
