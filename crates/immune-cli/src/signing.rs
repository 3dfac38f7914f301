//! # `keygen` / `sign` Subcommands
//!
//! Test-key generation and offline Ed25519 signing over an envelope's
//! canonical input, for exercising the admission pipeline without a real
//! key-management system — key management itself is a Non-goal of the
//! core (trust is established purely by signature verification).

use std::fs;
use std::path::PathBuf;

use base64::Engine as _;
use clap::Args;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use immune_core::{canonical::canonicalize, digest, Envelope, Value};

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Where to write the 32-byte hex-encoded signing seed.
    #[arg(long)]
    pub seed_out: PathBuf,
}

pub fn run_keygen(args: KeygenArgs) -> anyhow::Result<()> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let seed_hex = hex_encode(&signing_key.to_bytes());
    fs::write(&args.seed_out, &seed_hex)?;
    let public_hex = hex_encode(&signing_key.verifying_key().to_bytes());
    println!("source_agent: {public_hex}");
    Ok(())
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Path to a JSON envelope document (`{header, meta, payload}` or the
    /// full envelope — only these three regions are hashed).
    #[arg(long)]
    pub envelope: PathBuf,

    /// Path to a 32-byte hex-encoded signing seed, as written by `keygen`.
    #[arg(long)]
    pub seed: PathBuf,
}

pub fn run_sign(args: SignArgs) -> anyhow::Result<()> {
    let seed_hex = fs::read_to_string(&args.seed)?;
    let seed_bytes = hex_decode(seed_hex.trim())?;
    let seed: [u8; 32] = seed_bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("seed file must contain exactly 32 bytes of hex"))?;
    let signing_key = SigningKey::from_bytes(&seed);

    let raw_text = fs::read_to_string(&args.envelope)?;
    let raw: serde_json::Value = serde_json::from_str(&raw_text)?;
    let envelope = Envelope::new(Value::from(raw));
    let canonical_bytes = canonicalize(&envelope.canonical_input()?)?;
    let content_digest = digest::hash(&canonical_bytes);
    let signature = signing_key.sign(&content_digest.bytes);
    let signature_b64 =
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature.to_bytes());
    println!("{signature_b64}");
    Ok(())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(hex: &str) -> anyhow::Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        anyhow::bail!("hex string must have even length");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| anyhow::anyhow!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn keygen_then_sign_produces_a_verifiable_signature() {
        let dir = std::env::temp_dir().join(format!("immune-cli-test-{:?}", std::thread::current().id()));
        fs::create_dir_all(&dir).unwrap();
        let seed_path = dir.join("seed.hex");
        run_keygen(KeygenArgs { seed_out: seed_path.clone() }).unwrap();

        let envelope_path = dir.join("envelope.json");
        let mut file = fs::File::create(&envelope_path).unwrap();
        write!(
            file,
            r#"{{"header":{{"id":"e1","timestamp":1,"source_agent":"{}","type":"t","version":"1"}},"meta":{{}},"payload":{{"x":1}},"signature":""}}"#,
            "0".repeat(64)
        )
        .unwrap();

        run_sign(SignArgs { envelope: envelope_path, seed: seed_path }).unwrap();
    }
}
