use error_set::error_set;

error_set!{
    DocumentError = {
        #[display("Computers document is not a JSON object (found {found})")]
        DocumentNotObject{found: String},
        #[display("Computers document has no `{field}` field")]
        MissingData{field: String},
        #[display("Field `data` has no list (found {found})")]
        DataNotSequence{found: String},
        #[display("Computer #{index} has no Properties object")]
        MissingProperties{index: usize},
        #[display("Computer {host} has no LocalGroups")]
        MissingLocalGroups{host: String},
        #[display("LocalGroups of computer {host} is not a list (found {found})")]
        LocalGroupsNotSequence{host: String, found: String},
        #[display("LocalGroups entry #{position} of computer {host} is malformed: {reason}")]
        MalformedLocalGroup{host: String, position: usize, reason: String},
    };
}

/// Short name of a JSON value's type, used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> String {
    let kind = match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    };
    kind.to_string()
}
