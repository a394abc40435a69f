use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::{SAVE_VERSION, SaveData};

pub fn save_to_json_string(save_data: &SaveData) -> Result<String> {
    serde_json::to_string(save_data).context("failed to serialize snapshot to JSON")
}

pub fn load_from_json_string(json: &str) -> Result<SaveData> {
    let save: SaveData = serde_json::from_str(json).context("failed to parse snapshot JSON")?;
    if save.version != SAVE_VERSION {
        bail!(
            "unsupported snapshot version {} (expected {SAVE_VERSION})",
            save.version
        );
    }
    Ok(save)
}

/// Opaque string form handed to whoever stores the snapshot.
pub fn export_to_base64(save_data: &SaveData) -> Result<String> {
    let json = save_to_json_string(save_data)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn import_from_base64(encoded: &str) -> Result<SaveData> {
    let raw = STANDARD
        .decode(encoded.trim())
        .context("failed to decode base64 snapshot")?;
    let json = String::from_utf8(raw).context("decoded snapshot is not UTF-8")?;
    load_from_json_string(&json)
}
