use serde_json::Value;

/// A lead as submitted through the contact form.
///
/// A field is `None` whenever the form sent something falsy for it (absent,
/// `null`, `""`, `false` or `0`), so downstream code only sees real values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub store_url: Option<String>,
    pub role: Option<String>,
    pub subscribers: Option<String>,
    pub message: Option<String>,
}

impl SubmissionInput {
    /// Pick the known fields out of a parsed request body. Unknown keys are ignored.
    pub fn from_value(raw: &Value) -> Self {
        Self {
            name: text_field(raw, "name"),
            email: text_field(raw, "email"),
            store_url: text_field(raw, "storeUrl"),
            role: text_field(raw, "role"),
            subscribers: text_field(raw, "subscribers"),
            message: text_field(raw, "message"),
        }
    }

    /// Name and email, if both are present.
    pub fn contact(&self) -> Option<(&str, &str)> {
        Some((self.name.as_deref()?, self.email.as_deref()?))
    }

    /// Store URL with surrounding whitespace removed, or `None` if nothing is left.
    pub fn trimmed_store_url(&self) -> Option<&str> {
        self.store_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn text_field(raw: &Value, field: &str) -> Option<String> {
    match raw.get(field)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
