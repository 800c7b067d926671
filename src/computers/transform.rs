use crate::computers::high_value;
use crate::computers::schema::{ComputerDocument, HostEntry, HostRecord, LegacyGroupKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub records: usize,
    pub skipped: usize,
    pub high_value: usize,
    pub populated_blocks: usize,
}

#[derive(Debug, Clone)]
pub struct FixedDocument {
    pub content: Vec<u8>,
    pub summary: TransformSummary,
}

/// Rebuilds the legacy group keys and the `highvalue` flag of every computer
/// in `content`. The whole document is validated before anything changes.
pub fn fix_computers(content: &[u8], legacy_keys: &[LegacyGroupKey]) -> anyhow::Result<FixedDocument> {
    let mut document = ComputerDocument::from_slice(content)?;
    let mut summary = TransformSummary::default();

    for entry in document.entries.iter_mut() {
        let record = match entry {
            HostEntry::Record(record) => record,
            HostEntry::Opaque(_) => {
                summary.skipped += 1;
                continue;
            }
        };
        summary.records += 1;
        for legacy_key in legacy_keys {
            if fix_local_group(record, legacy_key) {
                summary.populated_blocks += 1;
            }
        }
        let reason = high_value::classify(record);
        match &reason {
            Some(reason) => {
                log::debug!("{} is high value: {}", record.hostname(), reason);
                summary.high_value += 1;
            }
            None => log::debug!("{} is not high value", record.hostname()),
        }
        record.set_high_value(reason.is_some());
    }

    log::info!(
        "Fixed {} computers ({} high value, {} group blocks from LocalGroups, {} entries skipped)",
        summary.records, summary.high_value, summary.populated_blocks, summary.skipped
    );
    let content = document.to_pretty_bytes()?;
    Ok(FixedDocument { content, summary })
}

/// Sets `legacy_key` on `record`; returns whether a matching group was found.
fn fix_local_group(record: &mut HostRecord, legacy_key: &LegacyGroupKey) -> bool {
    let member_name = legacy_key.member_name(record.hostname());
    let block = record.local_groups()
        .iter()
        .find(|group| group.name.as_deref() == Some(member_name.as_str()))
        .map(|group| group.to_block());
    let found = block.is_some();
    record.set_legacy_block(legacy_key.key, block.unwrap_or_default());
    found
}
