//! Transaction Building and Signing
//!
//! Hand-encodes the legacy transaction wire format: compact-u16 length
//! prefixes, a compiled message (header, account keys, recent blockhash,
//! compiled instructions), and an ed25519 signature over the serialized
//! message bytes. The only instruction this wallet produces is a System
//! Program lamport transfer. All signing happens locally; secret keys never
//! leave the process.

use ed25519_dalek::{Signer, SigningKey, SIGNATURE_LENGTH};

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// The System Program id (base-58 `11111111111111111111111111111111`)
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program instruction index for a lamport transfer
const TRANSFER_INDEX: u32 = 2;

/// How one account participates in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

/// An instruction before account references are compiled to indices.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction with account references resolved to message key indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indexes: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled legacy message, ready to be serialized and signed.
#[derive(Debug, Clone)]
pub struct Message {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub account_keys: Vec<[u8; 32]>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Serialize to the signable wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);

        out.push(self.num_required_signatures);
        out.push(self.num_readonly_signed);
        out.push(self.num_readonly_unsigned);

        encode_compact_u16(self.account_keys.len() as u16, &mut out);
        for key in &self.account_keys {
            out.extend_from_slice(key);
        }

        out.extend_from_slice(&self.recent_blockhash);

        encode_compact_u16(self.instructions.len() as u16, &mut out);
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_compact_u16(ix.account_indexes.len() as u16, &mut out);
            out.extend_from_slice(&ix.account_indexes);
            encode_compact_u16(ix.data.len() as u16, &mut out);
            out.extend_from_slice(&ix.data);
        }

        out
    }
}

/// A signed transaction ready for submission.
pub struct SignedTransaction {
    signatures: Vec<[u8; SIGNATURE_LENGTH]>,
    message_bytes: Vec<u8>,
}

impl SignedTransaction {
    /// Base-58 of the first signature; this is the transaction id.
    pub fn signature(&self) -> String {
        bs58::encode(&self.signatures[0]).into_string()
    }

    /// Full wire encoding: compact-u16 signature count, signatures, message.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.message_bytes.len() + 72);

        encode_compact_u16(self.signatures.len() as u16, &mut out);
        for sig in &self.signatures {
            out.extend_from_slice(sig);
        }
        out.extend_from_slice(&self.message_bytes);

        out
    }

    /// Wire encoding as base64, the format `sendTransaction` expects.
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        STANDARD.encode(self.serialize())
    }
}

/// Encode a length as compact-u16: 7 bits per byte, little-endian, high bit
/// set while more bytes follow.
pub fn encode_compact_u16(value: u16, out: &mut Vec<u8>) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if rem == 0 {
            break;
        }
    }
}

/// Build the System Program transfer instruction.
///
/// Instruction data is the u32 transfer index followed by the lamport
/// amount, both little-endian.
pub fn transfer_instruction(from: [u8; 32], to: [u8; 32], lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta {
                pubkey: from,
                is_signer: true,
                is_writable: true,
            },
            AccountMeta {
                pubkey: to,
                is_signer: false,
                is_writable: true,
            },
        ],
        data,
    }
}

/// Compile instructions into a message with `fee_payer` as the only signer.
///
/// Account ordering follows the wire format rules: writable signers, then
/// readonly signers, then writable non-signers, then readonly non-signers.
/// Duplicate keys are merged and keep their strongest privileges, so a
/// self-transfer compiles to a two-key message.
pub fn compile_message(
    fee_payer: [u8; 32],
    instructions: &[Instruction],
    recent_blockhash: [u8; 32],
) -> Message {
    let mut metas: Vec<AccountMeta> = vec![AccountMeta {
        pubkey: fee_payer,
        is_signer: true,
        is_writable: true,
    }];

    for ix in instructions {
        for meta in &ix.accounts {
            match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                Some(existing) => {
                    existing.is_signer |= meta.is_signer;
                    existing.is_writable |= meta.is_writable;
                }
                None => metas.push(meta.clone()),
            }
        }
        if !metas.iter().any(|m| m.pubkey == ix.program_id) {
            metas.push(AccountMeta {
                pubkey: ix.program_id,
                is_signer: false,
                is_writable: false,
            });
        }
    }

    fn rank(meta: &AccountMeta) -> u8 {
        match (meta.is_signer, meta.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
    // Stable sort keeps the fee payer first within the writable signers
    metas.sort_by_key(rank);

    let account_keys: Vec<[u8; 32]> = metas.iter().map(|m| m.pubkey).collect();

    let index_of = |key: &[u8; 32]| -> u8 {
        account_keys
            .iter()
            .position(|k| k == key)
            .expect("compiled account key missing from message") as u8
    };

    let compiled = instructions
        .iter()
        .map(|ix| CompiledInstruction {
            program_id_index: index_of(&ix.program_id),
            account_indexes: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
            data: ix.data.clone(),
        })
        .collect();

    Message {
        num_required_signatures: metas.iter().filter(|m| m.is_signer).count() as u8,
        num_readonly_signed: metas
            .iter()
            .filter(|m| m.is_signer && !m.is_writable)
            .count() as u8,
        num_readonly_unsigned: metas
            .iter()
            .filter(|m| !m.is_signer && !m.is_writable)
            .count() as u8,
        account_keys,
        recent_blockhash,
        instructions: compiled,
    }
}

/// Sign a compiled message with the fee payer's key.
pub fn sign_transaction(message: &Message, signing_key: &SigningKey) -> SignedTransaction {
    let message_bytes = message.serialize();
    let signature = signing_key.sign(&message_bytes);

    SignedTransaction {
        signatures: vec![signature.to_bytes()],
        message_bytes,
    }
}

/// Build and sign a lamport transfer from `signing_key` to `recipient`.
pub fn build_transfer(
    signing_key: &SigningKey,
    recipient: [u8; 32],
    lamports: u64,
    recent_blockhash: [u8; 32],
) -> SignedTransaction {
    let from = signing_key.verifying_key().to_bytes();
    let instruction = transfer_instruction(from, recipient, lamports);
    let message = compile_message(from, &[instruction], recent_blockhash);
    sign_transaction(&message, signing_key)
}

/// Convert a SOL amount to lamports, truncating below one lamport.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64) as u64
}

/// Convert lamports to a SOL amount.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Format lamports as SOL for display.
pub fn format_amount(lamports: u64) -> String {
    format!("{:.4} SOL", lamports_to_sol(lamports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};

    fn test_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn test_compact_u16_encoding() {
        let cases: &[(u16, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (255, &[0xff, 0x01]),
            (16383, &[0xff, 0x7f]),
            (16384, &[0x80, 0x80, 0x01]),
        ];

        for (value, expected) in cases {
            let mut out = Vec::new();
            encode_compact_u16(*value, &mut out);
            assert_eq!(out.as_slice(), *expected, "encoding of {}", value);
        }
    }

    #[test]
    fn test_transfer_instruction_data() {
        let ix = transfer_instruction([1; 32], [2; 32], 42_000_000);

        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.data.len(), 12);
        assert_eq!(ix.data[..4], [2, 0, 0, 0]);
        assert_eq!(ix.data[4..], 42_000_000u64.to_le_bytes());
    }

    #[test]
    fn test_transfer_message_layout() {
        let from = [1u8; 32];
        let to = [2u8; 32];
        let blockhash = [9u8; 32];

        let message = compile_message(from, &[transfer_instruction(from, to, 1)], blockhash);

        assert_eq!(message.account_keys, vec![from, to, SYSTEM_PROGRAM_ID]);
        assert_eq!(message.num_required_signatures, 1);
        assert_eq!(message.num_readonly_signed, 0);
        assert_eq!(message.num_readonly_unsigned, 1);
        assert_eq!(message.recent_blockhash, blockhash);

        assert_eq!(message.instructions.len(), 1);
        let ix = &message.instructions[0];
        assert_eq!(ix.program_id_index, 2);
        assert_eq!(ix.account_indexes, vec![0, 1]);
    }

    #[test]
    fn test_self_transfer_dedupes_keys() {
        let from = [1u8; 32];

        let message = compile_message(from, &[transfer_instruction(from, from, 1)], [0; 32]);

        assert_eq!(message.account_keys, vec![from, SYSTEM_PROGRAM_ID]);
        assert_eq!(message.num_required_signatures, 1);
        assert_eq!(message.instructions[0].account_indexes, vec![0, 0]);
        assert_eq!(message.instructions[0].program_id_index, 1);
    }

    #[test]
    fn test_message_serialization_layout() {
        let from = [1u8; 32];
        let to = [2u8; 32];
        let blockhash = [9u8; 32];

        let message = compile_message(from, &[transfer_instruction(from, to, 7)], blockhash);
        let bytes = message.serialize();

        // header(3) + key count(1) + keys(96) + blockhash(32)
        // + ix count(1) + program index(1) + account count(1) + indexes(2)
        // + data length(1) + data(12)
        assert_eq!(bytes.len(), 150);

        assert_eq!(bytes[..3], [1, 0, 1]);
        assert_eq!(bytes[3], 3);
        assert_eq!(bytes[4..36], from);
        assert_eq!(bytes[36..68], to);
        assert_eq!(bytes[68..100], SYSTEM_PROGRAM_ID);
        assert_eq!(bytes[100..132], blockhash);
        assert_eq!(bytes[132], 1);
        assert_eq!(bytes[133], 2);
        assert_eq!(bytes[134], 2);
        assert_eq!(bytes[135..137], [0, 1]);
        assert_eq!(bytes[137], 12);
        assert_eq!(bytes[138..142], [2, 0, 0, 0]);
        assert_eq!(bytes[142..150], 7u64.to_le_bytes());
    }

    #[test]
    fn test_signed_transaction_wire_format() {
        let key = test_key(3);
        let tx = build_transfer(&key, [2; 32], 5_000, [9; 32]);

        let wire = tx.serialize();
        assert_eq!(wire[0], 1);
        assert_eq!(wire.len(), 1 + 64 + 150);

        // The signature must verify over the trailing message bytes
        let signature = Signature::from_bytes(wire[1..65].try_into().unwrap());
        key.verifying_key()
            .verify(&wire[65..], &signature)
            .expect("signature verifies over message bytes");

        // The transaction id is the base-58 first signature
        let decoded = bs58::decode(tx.signature()).into_vec().unwrap();
        assert_eq!(decoded.as_slice(), &wire[1..65]);
    }

    #[test]
    fn test_to_base64_round_trip() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let tx = build_transfer(&test_key(5), [8; 32], 123, [7; 32]);
        let decoded = STANDARD.decode(tx.to_base64()).unwrap();
        assert_eq!(decoded, tx.serialize());
    }

    #[test]
    fn test_amount_conversions() {
        assert_eq!(sol_to_lamports(1.0), LAMPORTS_PER_SOL);
        assert_eq!(sol_to_lamports(0.5), 500_000_000);
        assert_eq!(sol_to_lamports(2.25), 2_250_000_000);
        assert_eq!(sol_to_lamports(0.0), 0);

        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
        assert_eq!(lamports_to_sol(0), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(LAMPORTS_PER_SOL), "1.0000 SOL");
        assert_eq!(format_amount(500_000_000), "0.5000 SOL");
        assert_eq!(format_amount(1_234_567_890), "1.2346 SOL");
        assert_eq!(format_amount(0), "0.0000 SOL");
    }
}
