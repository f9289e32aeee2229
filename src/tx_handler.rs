use crate::{
    Secp256k1Verifier, SignatureVerifier, Transaction, TransactionError, TransactionId,
    TransactionValidator, UtxoPool,
};
use log::{debug, info, log_enabled, trace, Level};
use std::collections::HashSet;

/// The outcome of resolving one batch of candidate transactions.
#[derive(Debug, Clone)]
pub struct BatchResolution {
    /// Accepted transactions in the order they were accepted.
    pub accepted: Vec<Transaction>,
    /// Distinct candidates that were not accepted, in submission order, with the reason they
    /// were invalid against the final state of the pool.
    pub rejected: Vec<(Transaction, TransactionError)>,
    /// Number of scans over the pending candidates.
    pub passes: usize,
}

/// Processes batches of proposed transactions against a public ledger, whose current state is
/// a pool of unspent transaction outputs.
///
/// The handler owns its pool. It is a copy of the pool it was created with, so changes to the
/// caller's pool are never visible to the handler and vice versa.
pub struct TxHandler<V = Secp256k1Verifier> {
    utxo_pool: UtxoPool,
    verifier: V,
}

impl TxHandler {
    /// Creates a handler over a copy of the given pool that verifies ECDSA signatures over
    /// secp256k1.
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self::with_verifier(utxo_pool, Secp256k1Verifier)
    }
}

impl<V: SignatureVerifier> TxHandler<V> {
    /// Creates a handler over a copy of the given pool that authorizes spends with the given
    /// signature verifier.
    pub fn with_verifier(utxo_pool: &UtxoPool, verifier: V) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
            verifier,
        }
    }

    /// Returns whether the transaction is valid against the current pool.
    pub fn is_valid(&self, transaction: &Transaction) -> bool {
        self.validate(transaction).is_ok()
    }

    /// Same as `is_valid`, but returns the reason the transaction is invalid.
    pub fn validate(&self, transaction: &Transaction) -> Result<(), TransactionError> {
        TransactionValidator::validate(transaction, &self.utxo_pool, &self.verifier)
    }

    /// Accepts a mutually valid subset of the candidates and updates the pool accordingly.
    /// Returns the accepted transactions in the order they were accepted.
    ///
    /// See `resolve` for how candidates are picked.
    pub fn resolve_batch(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        self.resolve(candidates).accepted
    }

    /// Accepts a mutually valid subset of the candidates and updates the pool accordingly.
    ///
    /// A transaction may spend outputs created by other candidates in the same batch, in any
    /// submission order. Pending candidates are scanned repeatedly in submission order, and each
    /// candidate that is valid against the pool at that moment is accepted and applied right
    /// away. Scanning stops once a scan accepts nothing or no candidate is pending.
    ///
    /// When candidates conflict, e.g. two of them spend the same output, the one that comes
    /// first in submission order among those valid in the same scan wins. The other one becomes
    /// invalid as soon as the winner is applied.
    ///
    /// Candidates with the same id are the same transaction and are considered once.
    /// Resolution never fails: invalid candidates are reported in `rejected` and leave the pool
    /// untouched.
    pub fn resolve(&mut self, candidates: &[Transaction]) -> BatchResolution {
        let mut seen = HashSet::new();
        let mut pending = candidates
            .iter()
            .filter(|transaction| seen.insert(*transaction.id()))
            .collect::<Vec<&Transaction>>();
        let mut accepted = vec![];
        let mut passes = 0;

        while !pending.is_empty() {
            passes += 1;
            let mut accepted_in_pass: HashSet<TransactionId> = HashSet::new();
            for transaction in &pending {
                if self.is_valid(transaction) {
                    self.apply(transaction);
                    accepted_in_pass.insert(*transaction.id());
                    accepted.push((*transaction).clone());
                }
            }
            debug!(
                "Pass {} accepted {} of {} pending transactions",
                passes,
                accepted_in_pass.len(),
                pending.len()
            );

            if accepted_in_pass.is_empty() {
                // Nothing changed in the pool, so another pass can't accept anything either.
                break;
            }
            pending.retain(|transaction| !accepted_in_pass.contains(transaction.id()));
        }

        let rejected = pending
            .into_iter()
            .filter_map(|transaction| match self.validate(transaction) {
                Ok(()) => None,
                Err(error) => Some((transaction.clone(), error)),
            })
            .collect::<Vec<_>>();

        if log_enabled!(Level::Trace) {
            for (transaction, error) in &rejected {
                trace!("Rejected transaction {}: {}", transaction.id(), error);
            }
        }
        info!(
            "Resolved batch of {} transactions: {} accepted, {} rejected in {} passes",
            candidates.len(),
            accepted.len(),
            rejected.len(),
            passes
        );

        BatchResolution {
            accepted,
            rejected,
            passes,
        }
    }

    /// Returns a copy of the current pool.
    pub fn current_pool(&self) -> UtxoPool {
        self.utxo_pool.clone()
    }

    /// Returns a read-only view of the current pool.
    pub fn pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    /// Spends the transaction's inputs and adds its outputs to the pool.
    ///
    /// Preconditions:
    ///   - The transaction is valid against the current pool.
    fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxo_pool.remove_output(&input.utxo());
        }
        for (utxo, output) in transaction.created_utxos() {
            self.utxo_pool.add_output(utxo, output.clone());
        }
        debug!("Accepted transaction {}", transaction);
    }
}
