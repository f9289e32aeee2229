use crate::{OutputIndex, TransactionId, TransactionOutput, UtxoPoolError};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::iter::FromIterator;

/// Identifies an unspent transaction output by the transaction that created it and the index
/// of the output in that transaction.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

/// A pool of confirmed and unspent transaction outputs.
///
/// Cloning the pool produces an independent copy: changes to the clone are never visible in
/// the original and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoPool {
    // Unspent transaction outputs, indexed by their transaction ID and their index in the
    // transaction.
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Returns whether or not the given UTXO is unspent.
    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    /// Returns the output for the given UTXO.
    /// Callers that haven't checked `contains` get `UtxoPoolError::NotFound` for spent or unknown
    /// outputs.
    pub fn get_output(&self, utxo: &Utxo) -> Result<&TransactionOutput, UtxoPoolError> {
        self.utxos
            .get(utxo)
            .ok_or(UtxoPoolError::NotFound(*utxo))
    }

    /// Adds the output to the pool, replacing any output stored for the same UTXO.
    pub fn add_output(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    /// Removes the UTXO from the pool and returns its output.
    /// Removing a UTXO that isn't in the pool is a no-op that returns `None`.
    pub fn remove_output(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    /// Returns a copy of all UTXOs in the pool in no particular order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        self.utxos.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Returns the sum of the values of all unspent outputs.
    pub fn total_value(&self) -> i128 {
        self.utxos
            .values()
            .map(|output| output.value() as i128)
            .sum()
    }
}

impl FromIterator<(Utxo, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (Utxo, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
