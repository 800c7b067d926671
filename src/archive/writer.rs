use std::io::Write;
use std::path::Path;

use anyhow::Context;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::archive::is_computers_entry;

/// Writes a copy of `original` to `destination` where the computers document
/// is replaced by `computers`. Every other entry is copied without being
/// recompressed.
///
/// The archive is assembled in a temporary file next to `destination` and
/// only renamed into place once it is complete.
pub fn write_compatible_archive(computers: &[u8],
                                original: impl AsRef<Path>,
                                destination: impl AsRef<Path>) -> anyhow::Result<()> {
    let original = original.as_ref();
    let destination = destination.as_ref();
    let file = std::fs::File::open(original)
        .with_context(|| format!("open {}", original.display()))?;
    let mut archive = zip::ZipArchive::new(std::io::BufReader::new(file))
        .with_context(|| format!("open zip {}", original.display()))?;

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temporary = tempfile::NamedTempFile::new_in(directory)
        .with_context(|| format!("create temporary file in {}", directory.display()))?;

    let mut writer = zip::ZipWriter::new(temporary.as_file_mut());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).context("zip entry")?;
        let name = entry.name().to_string();
        if !is_computers_entry(&name) {
            writer.raw_copy_file(entry)
                .with_context(|| format!("copy {}", name))?;
            continue;
        }
        // Only stored and deflated entries can be written back.
        let method = match entry.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(computers.len() as u64 >= u32::MAX as u64);
        writer.start_file(name.as_str(), options)
            .with_context(|| format!("create {}", name))?;
        writer.write_all(computers)
            .with_context(|| format!("write {}", name))?;
        log::debug!("Replaced {} ({} bytes)", name, computers.len());
    }
    writer.finish().context("finish zip")?;

    temporary.as_file().sync_all()?;
    temporary.persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("rename into {}", destination.display()))?;
    println!("[+] Wrote {}", destination.display());
    Ok(())
}
