use std::path::PathBuf;

use anyhow::Context;

use crate::archive::reader::extract_computers_document;
use crate::archive::writer::write_compatible_archive;
use crate::computers::schema::LEGACY_GROUP_KEYS;
use crate::computers::transform::fix_computers;
use crate::utils::paths::resolve_output_path;

/// Fixes the computers document of `input` and writes the compatible archive.
/// Returns the path that was written.
pub fn fix_archive(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let destination = resolve_output_path(&input, output.as_deref());
    log::info!("Reading computers from {}", input.display());
    log::info!("Writing compatible archive to {}", destination.display());

    let unfixed = extract_computers_document(&input)?;
    let fixed = fix_computers(&unfixed, LEGACY_GROUP_KEYS)
        .with_context(|| format!("fix computers document of {}", input.display()))?;
    if fixed.summary.records == 0 {
        log::warn!("{} contains no computers", input.display());
    }
    write_compatible_archive(&fixed.content, &input, &destination)?;
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::{build_archive, raw_entries, read_entry};
    use crate::errors::DocumentError;
    use serde_json::{json, Value};

    const COMPUTERS: &[u8] = br#"{
  "data": [
    {
      "Properties": {"name": "WEB01", "domain": "CORP.LOCAL"},
      "IsDC": false,
      "Aces": [],
      "LocalGroups": [
        {"Name": "ADMINISTRATORS@WEB01", "Collected": true, "FailureReason": null, "Results": ["S-1-5-21-42-500"]}
      ],
      "ObjectIdentifier": "S-1-5-21-42-1105"
    },
    {
      "Properties": {"name": "DC01"},
      "IsDC": true,
      "Aces": [],
      "LocalGroups": []
    }
  ],
  "meta": {"methods": 46067, "type": "computers", "count": 2, "version": 5}
}"#;

    #[test]
    fn writes_compatible_archive_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("20240101_BloodHound.zip");
        build_archive(&input, &[
            ("20240101_users.json", br#"{"data": []}"#),
            ("20240101_computers.json", COMPUTERS),
            ("20240101_gpos.json", br#"{"data": [], "meta": {"type": "gpos"}}"#),
        ]);

        let written = fix_archive(input.clone(), None).unwrap();
        assert_eq!(written, dir.path().join("20240101_BloodHound_Compatible.zip"));

        let fixed: Value = serde_json::from_slice(&read_entry(&written, "20240101_computers.json")).unwrap();
        let web = &fixed["data"][0];
        assert_eq!(web["LocalAdmins"]["Results"], json!(["S-1-5-21-42-500"]));
        assert_eq!(web["RemoteDesktopUsers"], json!({"Collected": true, "FailureReason": null, "Results": []}));
        assert_eq!(web["Properties"]["highvalue"], json!(true));
        assert_eq!(fixed["data"][1]["Properties"]["highvalue"], json!(true));
        assert_eq!(fixed["meta"]["count"], json!(2));

        let before = raw_entries(&input);
        let after = raw_entries(&written);
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0], after[0]);
        assert_eq!(before[2], after[2]);
    }

    #[test]
    fn explicit_output_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.zip");
        build_archive(&input, &[("export_computers.json", COMPUTERS)]);

        let written = fix_archive(input, Some(dir.path().join("upgraded"))).unwrap();
        assert_eq!(written, dir.path().join("upgraded.zip"));
        assert!(written.exists());
    }

    #[test]
    fn running_on_own_output_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.zip");
        build_archive(&input, &[("export_computers.json", COMPUTERS)]);

        let once = fix_archive(input, None).unwrap();
        let twice = fix_archive(once.clone(), Some(dir.path().join("again.zip"))).unwrap();
        assert_eq!(
            read_entry(&once, "export_computers.json"),
            read_entry(&twice, "export_computers.json")
        );
    }

    #[test]
    fn structural_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.zip");
        build_archive(&input, &[("export_computers.json", br#"{"data": "oops"}"#)]);

        let err = fix_archive(input, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DocumentError>(),
            Some(DocumentError::DataNotSequence { .. })
        ));
        assert!(!dir.path().join("export_Compatible.zip").exists());
    }

    #[test]
    fn archive_without_computers_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.zip");
        build_archive(&input, &[("export_users.json", br#"{"data": []}"#)]);

        assert!(fix_archive(input, None).is_err());
        assert!(!dir.path().join("export_Compatible.zip").exists());
    }
}
