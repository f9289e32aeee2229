pub mod error;
pub mod hash;
pub mod public_key;
pub mod signature;
pub mod transaction;
pub mod tx_handler;
pub mod utxo_pool;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use self::{
    error::*, hash::*, public_key::*, signature::*, transaction::*, tx_handler::*, utxo_pool::*,
    validation::*,
};

pub use secp256k1::SecretKey;
