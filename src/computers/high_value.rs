use std::fmt;

use crate::computers::schema::HostRecord;

/// ACE rights that make a computer a high value target.
pub const DANGEROUS_RIGHTS: [&str; 4] = ["GenericAll", "Owns", "WriteDacl", "WriteOwner"];

/// Lowercase fragments of administrative group names.
pub const ADMIN_GROUP_MARKERS: [&str; 3] = ["domain admin", "enterprise admin", "administrator"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighValueReason {
    DomainController,
    DangerousRight(String),
    AdminGroup(String),
}

impl fmt::Display for HighValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighValueReason::DomainController => write!(f, "domain controller"),
            HighValueReason::DangerousRight(right) => write!(f, "ACE grants {}", right),
            HighValueReason::AdminGroup(group) => write!(f, "has administrative group {}", group),
        }
    }
}

/// Returns why `record` is high value, or `None` if it is not.
/// Rules are checked in order and the first match is reported.
pub fn classify(record: &HostRecord) -> Option<HighValueReason> {
    if record.is_dc() {
        return Some(HighValueReason::DomainController);
    }
    let dangerous = record.aces()
        .iter()
        .filter_map(|ace| ace.right_name.as_deref())
        .find(|right| DANGEROUS_RIGHTS.contains(right));
    if let Some(right) = dangerous {
        return Some(HighValueReason::DangerousRight(right.to_string()));
    }
    record.local_groups()
        .iter()
        .filter_map(|group| group.name.as_deref())
        .filter(|name| !name.is_empty())
        .find(|name| is_admin_group(name))
        .map(|name| HighValueReason::AdminGroup(name.to_string()))
}

fn is_admin_group(name: &str) -> bool {
    let lowercase = name.to_lowercase();
    ADMIN_GROUP_MARKERS.iter().any(|marker| lowercase.contains(marker))
}
