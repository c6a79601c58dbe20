use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Identifier the backend assigns to every user profile.
pub type UserId = u64;

/// A profile record eligible to be shown to the viewer as a match.
///
/// Records are immutable once received; a new fetch replaces the whole set.
/// Fields the backend sends that are not modelled here are kept in `extra`
/// so they stay filterable by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caste: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Candidate {
    /// Creates a candidate with only an id and a first name set.
    pub fn new(id: UserId, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: None,
            profession: None,
            marital_status: None,
            date_of_birth: None,
            gender: None,
            religion: None,
            caste: None,
            age: None,
            bio: None,
            location: None,
            extra: BTreeMap::new(),
        }
    }

    /// Looks up a field by its wire name (`firstName`, `maritalStatus`, ...).
    ///
    /// Numbers and booleans are rendered as text. Returns `None` when the
    /// field is absent, null, or structured (array/object).
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let known = match name {
            "id" => return Some(Cow::Owned(self.id.to_string())),
            "firstName" => return Some(Cow::Borrowed(self.first_name.as_str())),
            "age" => return self.age.map(|age| Cow::Owned(age.to_string())),
            "lastName" => &self.last_name,
            "profession" => &self.profession,
            "maritalStatus" => &self.marital_status,
            "dateOfBirth" => &self.date_of_birth,
            "gender" => &self.gender,
            "religion" => &self.religion,
            "caste" => &self.caste,
            "bio" => &self.bio,
            "location" => &self.location,
            other => return self.extra.get(other).and_then(value_text),
        };
        known.as_deref().map(Cow::Borrowed)
    }
}

fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
