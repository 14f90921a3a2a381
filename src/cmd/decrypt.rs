use std::io::Read;

use anyhow::{Context, Result};
use serde_json::Value;

use cinemaos::envelope::{self, EncryptedEnvelope};
use cinemaos::stream::try_normalize;

pub fn cmd_decrypt(input: &str) -> Result<()> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };

    let json: Value = serde_json::from_str(&raw).context("input is not JSON")?;
    // Accept a full provider response or the bare envelope.
    let envelope_json = json.get("data").cloned().unwrap_or(json);
    let envelope: EncryptedEnvelope =
        serde_json::from_value(envelope_json).context("input has no encrypted envelope")?;

    let plaintext = envelope::decrypt(&envelope)?;
    let entries = try_normalize(&plaintext)?;
    eprintln!("🔓 {} source entries", entries.len());

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
