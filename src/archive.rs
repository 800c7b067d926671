pub mod reader;
pub mod writer;

/// Suffix of the archive entry holding the computer records.
pub const COMPUTERS_ENTRY_SUFFIX: &str = "_computers.json";

pub fn is_computers_entry(name: &str) -> bool {
    name.ends_with(COMPUTERS_ENTRY_SUFFIX)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::Path;

    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    /// Writes a zip archive with the given entries, alternating between
    /// deflated and stored compression.
    pub fn build_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (i, (name, content)) in entries.iter().enumerate() {
            let method = if i % 2 == 0 { CompressionMethod::Deflated } else { CompressionMethod::Stored };
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    /// Names and raw (still compressed) bytes of every entry, in archive order.
    pub fn raw_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        use std::io::Read;

        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index_raw(i).unwrap();
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).unwrap();
                (entry.name().to_string(), bytes)
            })
            .collect()
    }

    pub fn read_entry(path: &Path, name: &str) -> Vec<u8> {
        use std::io::Read;

        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }
}
