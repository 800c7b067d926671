use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const ZIP_EXTENSION: &str = ".zip";
pub const COMPATIBLE_SUFFIX: &str = "_Compatible";

pub trait ArchivePath {
    /// `<stem>_Compatible.zip` in the same directory.
    fn compatible_sibling(&self) -> PathBuf;

    /// The path itself if it ends with `.zip`, otherwise the path with
    /// `.zip` appended.
    fn with_zip_suffix(&self) -> PathBuf;
}

impl ArchivePath for Path {
    fn compatible_sibling(&self) -> PathBuf {
        let name = self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = name.strip_suffix(ZIP_EXTENSION).unwrap_or(name.as_str());
        self.with_file_name(format!("{}{}{}", stem, COMPATIBLE_SUFFIX, ZIP_EXTENSION))
    }

    fn with_zip_suffix(&self) -> PathBuf {
        if self.as_os_str().to_string_lossy().ends_with(ZIP_EXTENSION) {
            return self.to_path_buf();
        }
        let mut path = OsString::from(self.as_os_str());
        path.push(ZIP_EXTENSION);
        PathBuf::from(path)
    }
}

impl ArchivePath for PathBuf {
    fn compatible_sibling(&self) -> PathBuf {
        self.as_path().compatible_sibling()
    }

    fn with_zip_suffix(&self) -> PathBuf {
        self.as_path().with_zip_suffix()
    }
}

pub fn resolve_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(output) => output.with_zip_suffix(),
        None => input.compatible_sibling(),
    }
}
