use serde_json::{Map, Value};

use crate::errors::{json_kind, DocumentError};

pub const DATA_FIELD: &str = "data";
pub const PROPERTIES_FIELD: &str = "Properties";
pub const LOCAL_GROUPS_FIELD: &str = "LocalGroups";
pub const HIGH_VALUE_PROPERTY: &str = "highvalue";

////////////////////////////////////////////////////////////////////////////////
////////////////////////////////////////////////////////////////////////////////
// Legacy keys
////////////////////////////////////////////////////////////////////////////////

/// A legacy computer key and the local group label it is rebuilt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyGroupKey {
    pub key: &'static str,
    pub label: &'static str,
}

impl LegacyGroupKey {
    /// Name of the `LocalGroups` entry holding this group for `hostname`.
    pub fn member_name(&self, hostname: &str) -> String {
        format!("{}@{}", self.label, hostname)
    }
}

pub const LEGACY_GROUP_KEYS: &[LegacyGroupKey] = &[
    LegacyGroupKey { key: "DcomUsers", label: "DISTRIBUTED COM USERS" },
    LegacyGroupKey { key: "LocalAdmins", label: "ADMINISTRATORS" },
    LegacyGroupKey { key: "PSRemoteUsers", label: "REMOTE MANAGEMENT USERS" },
    LegacyGroupKey { key: "RemoteDesktopUsers", label: "REMOTE DESKTOP USERS" },
];

////////////////////////////////////////////////////////////////////////////////
////////////////////////////////////////////////////////////////////////////////
// Group memberships
////////////////////////////////////////////////////////////////////////////////

/// Value stored under a legacy key. Fields are copied from the raw entry as
/// they are, whatever their JSON type.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipBlock {
    pub collected: Value,
    pub failure_reason: Value,
    pub results: Value,
}

// NOTE: a label that was never collected still reports `Collected: true`.
impl Default for MembershipBlock {
    fn default() -> Self {
        Self {
            collected: Value::Bool(true),
            failure_reason: Value::Null,
            results: Value::Array(Vec::new()),
        }
    }
}

impl From<MembershipBlock> for Value {
    fn from(block: MembershipBlock) -> Self {
        let mut map = Map::new();
        map.insert("Collected".to_string(), block.collected);
        map.insert("FailureReason".to_string(), block.failure_reason);
        map.insert("Results".to_string(), block.results);
        Value::Object(map)
    }
}

/// One entry of a computer's `LocalGroups` list. Missing fields read as `null`;
/// a `Name` that is not a string counts as no name.
#[derive(Debug, Clone)]
pub struct RawGroupMembership {
    pub name: Option<String>,
    pub collected: Value,
    pub failure_reason: Value,
    pub results: Value,
}

impl RawGroupMembership {
    pub fn parse(host: &str, position: usize, item: &Value) -> Result<Self, DocumentError> {
        let entry = item.as_object().ok_or_else(|| DocumentError::MalformedLocalGroup {
            host: host.to_string(),
            position,
            reason: format!("expected an object, found {}", json_kind(item)),
        })?;
        let field = |key: &str| entry.get(key).cloned().unwrap_or(Value::Null);
        Ok(Self {
            name: entry.get("Name").and_then(Value::as_str).map(str::to_string),
            collected: field("Collected"),
            failure_reason: field("FailureReason"),
            results: field("Results"),
        })
    }

    pub fn to_block(&self) -> MembershipBlock {
        MembershipBlock {
            collected: self.collected.clone(),
            failure_reason: self.failure_reason.clone(),
            results: self.results.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessControlEntry {
    pub right_name: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////
////////////////////////////////////////////////////////////////////////////////
// Computers
////////////////////////////////////////////////////////////////////////////////

/// A computer record. The parsed views are read-only; writes go to the
/// original field maps so that unknown fields keep their value and position.
#[derive(Debug, Clone)]
pub struct HostRecord {
    fields: Map<String, Value>,
    properties: Map<String, Value>,
    hostname: String,
    is_dc: bool,
    aces: Vec<AccessControlEntry>,
    local_groups: Vec<RawGroupMembership>,
}

impl HostRecord {
    pub fn parse(index: usize, mut fields: Map<String, Value>) -> Result<Self, DocumentError> {
        // The slot stays in `fields` so the object keeps its position on output.
        let properties = match fields.get_mut(PROPERTIES_FIELD).map(Value::take) {
            Some(Value::Object(properties)) => properties,
            _ => return Err(DocumentError::MissingProperties { index }),
        };
        let hostname = properties
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let local_groups = match fields.get(LOCAL_GROUPS_FIELD) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(position, item)| RawGroupMembership::parse(&hostname, position, item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(DocumentError::LocalGroupsNotSequence {
                    host: hostname,
                    found: json_kind(other),
                })
            }
            None => return Err(DocumentError::MissingLocalGroups { host: hostname }),
        };
        let is_dc = fields.get("IsDC").and_then(Value::as_bool).unwrap_or(false);
        let aces = fields
            .get("Aces")
            .and_then(Value::as_array)
            .map(|aces| {
                aces.iter()
                    .filter_map(Value::as_object)
                    .map(|ace| AccessControlEntry {
                        right_name: ace.get("RightName").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { fields, properties, hostname, is_dc, aces, local_groups })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn is_dc(&self) -> bool {
        self.is_dc
    }

    pub fn aces(&self) -> &[AccessControlEntry] {
        &self.aces
    }

    pub fn local_groups(&self) -> &[RawGroupMembership] {
        &self.local_groups
    }

    pub fn set_legacy_block(&mut self, key: &str, block: MembershipBlock) {
        self.fields.insert(key.to_string(), block.into());
    }

    pub fn set_high_value(&mut self, high_value: bool) {
        self.properties.insert(HIGH_VALUE_PROPERTY.to_string(), Value::Bool(high_value));
    }

    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        fields.insert(PROPERTIES_FIELD.to_string(), Value::Object(self.properties));
        Value::Object(fields)
    }
}

/// An item of the `data` list: either a computer or something we leave alone.
#[derive(Debug, Clone)]
pub enum HostEntry {
    Record(HostRecord),
    Opaque(Value),
}

impl HostEntry {
    pub fn into_value(self) -> Value {
        match self {
            HostEntry::Record(record) => record.into_value(),
            HostEntry::Opaque(value) => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComputerDocument {
    fields: Map<String, Value>,
    pub entries: Vec<HostEntry>,
}

impl ComputerDocument {
    pub fn from_slice(content: &[u8]) -> anyhow::Result<Self> {
        let root: Value = serde_json::from_slice(content)?;
        let mut fields = match root {
            Value::Object(fields) => fields,
            other => return Err(DocumentError::DocumentNotObject { found: json_kind(&other) }.into()),
        };
        let data = fields
            .get_mut(DATA_FIELD)
            .map(Value::take)
            .ok_or_else(|| DocumentError::MissingData { field: DATA_FIELD.to_string() })?;
        let items = match data {
            Value::Array(items) => items,
            other => return Err(DocumentError::DataNotSequence { found: json_kind(&other) }.into()),
        };
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => HostRecord::parse(index, fields).map(HostEntry::Record),
                other => Ok(HostEntry::Opaque(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields, entries })
    }

    /// Serializes the document with two-space indentation.
    pub fn to_pretty_bytes(self) -> anyhow::Result<Vec<u8>> {
        let mut fields = self.fields;
        let data = self.entries.into_iter().map(HostEntry::into_value).collect();
        fields.insert(DATA_FIELD.to_string(), Value::Array(data));
        Ok(serde_json::to_vec_pretty(&Value::Object(fields))?)
    }
}
