use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::archive::{is_computers_entry, COMPUTERS_ENTRY_SUFFIX};

/// Reads the computers document out of a SharpHound archive.
///
/// Returns empty content when the archive has no such entry; the caller
/// finds out when parsing. With several candidates the last one is returned.
pub fn extract_computers_document(zip_file: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let zip_file = zip_file.as_ref();
    let file = std::fs::File::open(zip_file)
        .with_context(|| format!("open {}", zip_file.display()))?;
    let reader = std::io::BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader)
        .with_context(|| format!("open zip {}", zip_file.display()))?;
    log::debug!("Scanning {} entries of {}", archive.len(), zip_file.display());

    let mut content = Vec::new();
    let mut found: Option<String> = None;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).context("zip entry")?;
        if !is_computers_entry(entry.name()) {
            continue;
        }
        let name = entry.name().to_string();
        if let Some(previous) = found.as_ref() {
            log::warn!("Found several computer documents, {} replaces {}", name, previous);
        }
        content.clear();
        entry.read_to_end(&mut content)
            .with_context(|| format!("read {}", name))?;
        found = Some(name);
    }

    match found {
        Some(name) => log::info!("Read {} ({} bytes)", name, content.len()),
        None => log::warn!("No *{} entry in {}", COMPUTERS_ENTRY_SUFFIX, zip_file.display()),
    }
    Ok(content)
}
