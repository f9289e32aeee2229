use crate::{
    PublicKey, SignatureVerifier, Transaction, TransactionError, TransactionInput, UtxoPool,
};
use std::collections::HashSet;

// Responsible for checking a single transaction against the current state of the UTXO pool.
// The checks don't modify the pool; whether the transaction is accepted is up to the caller.
pub struct TransactionValidator {}

impl TransactionValidator {
    /// Returns Ok if all of the following hold:
    ///   - All UTXOs claimed by the transaction are in the pool.
    ///   - The signature on each input is valid for the owner of the claimed output.
    ///   - No UTXO is claimed more than once by the transaction.
    ///   - All output values are non-negative.
    ///   - The sum of input values is greater than or equal to the sum of output values.
    pub fn validate<V: SignatureVerifier>(
        transaction: &Transaction,
        utxo_pool: &UtxoPool,
        verifier: &V,
    ) -> Result<(), TransactionError> {
        let input_value = Self::validate_inputs(transaction, utxo_pool, verifier)?;
        let output_value = Self::validate_outputs_are_non_negative(transaction)?;
        Self::validate_input_value_covers_outputs(input_value, output_value)
    }

    /// Validates every input and returns the total value of the claimed outputs.
    fn validate_inputs<V: SignatureVerifier>(
        transaction: &Transaction,
        utxo_pool: &UtxoPool,
        verifier: &V,
    ) -> Result<i128, TransactionError> {
        let mut claimed_utxos = HashSet::new();
        let mut input_value = 0i128;
        for (index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            let claimed_output = utxo_pool
                .get_output(&utxo)
                .map_err(|_| TransactionError::MissingUtxo { index, utxo })?;

            if !claimed_utxos.insert(utxo) {
                return Err(TransactionError::DuplicateInput { index, utxo });
            }

            Self::validate_signature(
                transaction,
                index,
                input,
                claimed_output.owner(),
                verifier,
            )?;
            input_value += claimed_output.value() as i128;
        }
        Ok(input_value)
    }

    fn validate_signature<V: SignatureVerifier>(
        transaction: &Transaction,
        index: usize,
        input: &TransactionInput,
        owner: &PublicKey,
        verifier: &V,
    ) -> Result<(), TransactionError> {
        let signature = input
            .signature()
            .ok_or(TransactionError::InvalidSignature { index })?;
        let message = transaction.raw_data_to_sign(index)?;
        if verifier.verify(&message, signature, owner) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignature { index })
        }
    }

    /// Validates that no output is negative and returns the total value of outputs.
    fn validate_outputs_are_non_negative(
        transaction: &Transaction,
    ) -> Result<i128, TransactionError> {
        match transaction
            .outputs()
            .iter()
            .enumerate()
            .find(|(_, output)| output.value() < 0)
        {
            Some((index, output)) => Err(TransactionError::NegativeOutput {
                index,
                value: output.value(),
            }),
            None => Ok(transaction.total_output_value()),
        }
    }

    fn validate_input_value_covers_outputs(
        input_value: i128,
        output_value: i128,
    ) -> Result<(), TransactionError> {
        // The difference, if any, is an implicit fee.
        if input_value >= output_value {
            Ok(())
        } else {
            Err(TransactionError::InsufficientInputValue {
                input_value,
                output_value,
            })
        }
    }
}
