//! Helpers shared by the unit tests.
use crate::{
    OutputIndex, PublicKey, Sha256, Transaction, TransactionBuilder, TransactionId,
    TransactionOutput, Utxo, UtxoPool,
};
use secp256k1::SecretKey;

pub const ALICE: u8 = 1;
pub const BOB: u8 = 2;
pub const CAROL: u8 = 3;
pub const DAVE: u8 = 4;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn secret_key(owner: u8) -> SecretKey {
    SecretKey::from_slice(&[owner; 32]).unwrap()
}

pub fn public_key(owner: u8) -> PublicKey {
    PublicKey::from_secret_key(&secret_key(owner))
}

/// A UTXO of a transaction that isn't part of any test batch.
pub fn funding_utxo(name: &str) -> Utxo {
    Utxo::new(
        TransactionId::new(Sha256::digest(name.as_bytes())),
        OutputIndex::new(0),
    )
}

pub fn output_utxo(transaction: &Transaction, index: u32) -> Utxo {
    Utxo::new(*transaction.id(), OutputIndex::new(index))
}

/// Builds a pool from `(utxo, value, owner)` entries.
pub fn pool_with(entries: &[(Utxo, i64, u8)]) -> UtxoPool {
    entries
        .iter()
        .map(|(utxo, value, owner)| (*utxo, TransactionOutput::new(*value, public_key(*owner))))
        .collect()
}

/// Builds a transaction spending `(utxo, signer)` inputs into `(value, owner)` outputs.
/// Each input is signed by its signer, who may or may not own the claimed output.
pub fn spend(inputs: &[(Utxo, u8)], outputs: &[(i64, u8)]) -> Transaction {
    let mut builder = TransactionBuilder::new();
    for (utxo, _) in inputs {
        builder.add_input(*utxo.transaction_id(), *utxo.output_index());
    }
    for (value, owner) in outputs {
        builder.add_output(*value, public_key(*owner));
    }
    for (index, (_, signer)) in inputs.iter().enumerate() {
        builder.sign_input(index, &secret_key(*signer)).unwrap();
    }
    builder.build().unwrap()
}
