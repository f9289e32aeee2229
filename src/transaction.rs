use crate::{PublicKey, Sha256, Signature, TransactionError, Utxo};
use secp256k1::SecretKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A double SHA-256 hash of the raw transaction data.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub const fn new(data: Sha256) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// The index of the transaction output.
#[derive(Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionInput {
    // A pointer to the transaction containing the UTXO to be spent.
    utxo_id: TransactionId,
    // The number of UTXO to be spent, the first one is 0.
    output_index: OutputIndex,
    // Signature by the owner of the referenced output over `raw_data_to_sign` for the position
    // of this input.
    signature: Option<Signature>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            utxo_id,
            output_index,
            signature: None,
        }
    }

    pub fn with_signature(
        utxo_id: TransactionId,
        output_index: OutputIndex,
        signature: Signature,
    ) -> Self {
        Self {
            utxo_id,
            output_index,
            signature: Some(signature),
        }
    }

    pub fn utxo_id(&self) -> &TransactionId {
        &self.utxo_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// The unspent output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.utxo_id, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionOutput {
    value: i64,
    owner: PublicKey,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value, self.owner)
    }
}

impl TransactionOutput {
    pub fn new(value: i64, owner: PublicKey) -> Self {
        Self { value, owner }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }
}

// Wire shapes used to derive the bytes that are signed and hashed.
// Public keys are encoded in the compressed SEC1 form.

#[derive(Serialize)]
struct EncodedOutput {
    value: i64,
    owner: Vec<u8>,
}

#[derive(Serialize)]
struct SignableData<'a> {
    input_index: u64,
    utxo_id: &'a TransactionId,
    output_index: &'a OutputIndex,
    outputs: Vec<EncodedOutput>,
}

#[derive(Serialize)]
struct EncodedInput<'a> {
    utxo_id: &'a TransactionId,
    output_index: &'a OutputIndex,
    signature: Option<&'a Signature>,
}

#[derive(Serialize)]
struct RawTransaction<'a> {
    inputs: Vec<EncodedInput<'a>>,
    outputs: Vec<EncodedOutput>,
}

fn encode_outputs(outputs: &[TransactionOutput]) -> Vec<EncodedOutput> {
    outputs
        .iter()
        .map(|output| EncodedOutput {
            value: output.value,
            owner: output.owner.serialize().to_vec(),
        })
        .collect()
}

/// Returns the bytes the owner of the UTXO claimed by the input at `index` has to sign.
/// The data covers the claimed UTXO, the position of the input and all outputs, so a signature
/// can't be moved to another input or reused with different outputs.
fn raw_data_to_sign(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    index: usize,
) -> Result<Vec<u8>, TransactionError> {
    let input = inputs
        .get(index)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index,
            len: inputs.len(),
        })?;
    let data = SignableData {
        input_index: index as u64,
        utxo_id: &input.utxo_id,
        output_index: &input.output_index,
        outputs: encode_outputs(outputs),
    };
    Ok(bincode::serialize(&data)?)
}

fn raw_tx(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
) -> Result<Vec<u8>, TransactionError> {
    let data = RawTransaction {
        inputs: inputs
            .iter()
            .map(|input| EncodedInput {
                utxo_id: &input.utxo_id,
                output_index: &input.output_index,
                signature: input.signature.as_ref(),
            })
            .collect(),
        outputs: encode_outputs(outputs),
    };
    Ok(bincode::serialize(&data)?)
}

/// A transaction is identified by its id: two transactions with the same id are the same
/// transaction, regardless of how they were obtained.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} inputs, {} outputs)",
            self.id,
            self.inputs.len(),
            self.outputs.len()
        )
    }
}

impl Transaction {
    /// Creates a transaction and computes its id from the raw transaction data.
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        let id = TransactionId::new(Sha256::double_digest(&raw_tx(&inputs, &outputs)?));
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    /// Creates a transaction whose id has been computed elsewhere.
    /// The caller is responsible for the id being stable for the given data.
    pub fn with_id(
        id: TransactionId,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Self {
        Self {
            id,
            inputs,
            outputs,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    pub fn raw_data_to_sign(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        raw_data_to_sign(&self.inputs, &self.outputs, index)
    }

    pub fn raw_tx(&self) -> Result<Vec<u8>, TransactionError> {
        raw_tx(&self.inputs, &self.outputs)
    }

    pub fn total_output_value(&self) -> i128 {
        self.outputs
            .iter()
            .map(|output| output.value as i128)
            .sum()
    }

    /// Returns the UTXOs this transaction creates once accepted, paired with their outputs.
    pub fn created_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> + '_ {
        self.outputs.iter().enumerate().map(move |(index, output)| {
            (
                Utxo::new(self.id, OutputIndex::new(index as u32)),
                output,
            )
        })
    }
}

/// Assembles a transaction, signs its inputs and computes its id.
///
/// ```
/// use utxo_handler::{PublicKey, TransactionBuilder, TransactionId, OutputIndex, Sha256};
/// use secp256k1::SecretKey;
///
/// let alice = SecretKey::from_slice(&[1; 32]).unwrap();
/// let bob = PublicKey::from_secret_key(&SecretKey::from_slice(&[2; 32]).unwrap());
/// let funding = TransactionId::new(Sha256::digest(b"funding"));
///
/// let mut builder = TransactionBuilder::new();
/// builder.add_input(funding, OutputIndex::new(0));
/// builder.add_output(10, bob);
/// builder.sign_input(0, &alice).unwrap();
/// let transaction = builder.build().unwrap();
/// assert_eq!(transaction.inputs().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, utxo_id: TransactionId, output_index: OutputIndex) -> &mut Self {
        self.inputs
            .push(TransactionInput::new(utxo_id, output_index));
        self
    }

    pub fn add_output(&mut self, value: i64, owner: PublicKey) -> &mut Self {
        self.outputs.push(TransactionOutput::new(value, owner));
        self
    }

    pub fn raw_data_to_sign(&self, index: usize) -> Result<Vec<u8>, TransactionError> {
        raw_data_to_sign(&self.inputs, &self.outputs, index)
    }

    /// Attaches an externally produced signature to the input at `index`.
    pub fn add_signature(
        &mut self,
        index: usize,
        signature: Signature,
    ) -> Result<&mut Self, TransactionError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputIndexOutOfRange { index, len })?;
        input.signature = Some(signature);
        Ok(self)
    }

    /// Signs the input at `index` with the given secret key.
    /// Outputs must be added before signing, since the signature covers them.
    pub fn sign_input(
        &mut self,
        index: usize,
        secret_key: &SecretKey,
    ) -> Result<&mut Self, TransactionError> {
        let signature = Signature::sign(&self.raw_data_to_sign(index)?, secret_key);
        self.add_signature(index, signature)
    }

    pub fn build(&self) -> Result<Transaction, TransactionError> {
        Transaction::new(self.inputs.clone(), self.outputs.clone())
    }
}
