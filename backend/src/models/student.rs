//! Student record and its enumerated group.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic group a student belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Science,
    Arts,
    Commerce,
}

impl Group {
    /// All accepted groups, in the order they are listed to clients.
    pub const ALL: [Group; 3] = [Group::Science, Group::Arts, Group::Commerce];

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Science => "Science",
            Group::Arts => "Arts",
            Group::Commerce => "Commerce",
        }
    }

    /// Whether `value` names one of the accepted groups (case-sensitive).
    pub fn is_valid(value: &str) -> bool {
        value.parse::<Group>().is_ok()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| format!("Unknown group: {}", s))
    }
}

/// A student record as exchanged over the API and persisted by repositories.
///
/// Every field falls back to its zero value when absent from the JSON input,
/// so partially filled bodies decode and are rejected by validation instead.
/// `group` is kept as the raw client string; use [`Student::group`] for the
/// typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub city: String,
    pub email: String,
    #[serde(rename = "group")]
    pub group_name: String,
    pub phone: String,
    pub address: String,
    #[serde(alias = "tution_fee")]
    pub tuition_fee: f64,
    pub enrolled: bool,
    pub mentor: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub subjects: Vec<String>,
}

impl Student {
    /// Create a student with the two required fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Typed group, `None` when unset or not one of the accepted values.
    pub fn group(&self) -> Option<Group> {
        self.group_name.parse().ok()
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.group_name = group.as_str().to_string();
        self
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
