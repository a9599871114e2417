use crate::PatchError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// What to do with one field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "Option<RawFieldValue>", into = "Option<String>")
)]
pub enum FieldEdit {
    /// Leave the field as it is (also if it doesn't exist).
    Unchanged,
    /// Overwrite the first value of the field line or insert the line if it doesn't exist.
    Set(String),
}

impl FieldEdit {
    pub fn value(&self) -> Option<&str> {
        match self {
            FieldEdit::Unchanged => None,
            FieldEdit::Set(v) => Some(v),
        }
    }
}

impl<T: Display> From<Option<T>> for FieldEdit {
    fn from(value: Option<T>) -> Self {
        match value {
            None => FieldEdit::Unchanged,
            Some(v) => FieldEdit::Set(v.to_string()),
        }
    }
}

impl From<FieldEdit> for Option<String> {
    fn from(value: FieldEdit) -> Self {
        match value {
            FieldEdit::Unchanged => None,
            FieldEdit::Set(v) => Some(v),
        }
    }
}

/// Field values as they arrive from JSON: `"x"`, `1`, `0.5` or `null` (unchanged).
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

#[cfg(feature = "serde")]
impl Display for RawFieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawFieldValue::Text(v) => f.write_str(v),
            RawFieldValue::Integer(v) => v.fmt(f),
            RawFieldValue::Float(v) => v.fmt(f),
        }
    }
}

/// A set of field edits, keyed by token.
///
/// Fields which need to be inserted are inserted in token order.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ChunkEdits {
    fields: BTreeMap<String, FieldEdit>,
}

impl ChunkEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the given field to the given value, replacing a previous edit of the same token.
    pub fn set(&mut self, token: impl Into<String>, value: impl Display) -> &mut Self {
        self.fields.insert(token.into(), FieldEdit::Set(value.to_string()));
        self
    }

    /// Explicitly marks the given field as unchanged.
    pub fn leave_unchanged(&mut self, token: impl Into<String>) -> &mut Self {
        self.fields.insert(token.into(), FieldEdit::Unchanged);
        self
    }

    pub fn get(&self, token: &str) -> Option<&FieldEdit> {
        self.fields.get(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEdit)> {
        self.fields.iter().map(|(t, e)| (t.as_str(), e))
    }

    /// Returns all edits which actually provide a value.
    pub fn provided(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter_map(|(token, edit)| Some((token, edit.value()?)))
    }

    /// Returns `true` if no edit provides a value.
    pub fn is_empty(&self) -> bool {
        self.provided().next().is_none()
    }

    /// Checks that applying these edits can't break the line structure of a chunk.
    ///
    /// This looks at the shape of tokens and values only, never at their meaning. A value must be
    /// one single field (one word or one quoted string), otherwise patching twice wouldn't give
    /// the same result as patching once.
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.is_empty() {
            return Err(PatchError::EmptyEditSet);
        }
        for (token, edit) in self.iter() {
            validate_token(token)?;
            if let Some(value) = edit.value() {
                validate_value(token, value)?;
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, E: Into<FieldEdit>> FromIterator<(K, E)> for ChunkEdits {
    fn from_iter<T: IntoIterator<Item = (K, E)>>(iter: T) -> Self {
        ChunkEdits {
            fields: iter
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        }
    }
}

fn validate_token(token: &str) -> Result<(), PatchError> {
    let reason = if token.is_empty() {
        "token is empty"
    } else if token.contains(char::is_whitespace) {
        "token contains whitespace"
    } else if token.starts_with(['<', '>']) {
        "token starts with a block delimiter"
    } else {
        return Ok(());
    };
    Err(PatchError::InvalidToken {
        token: token.to_string(),
        reason,
    })
}

fn validate_value(token: &str, value: &str) -> Result<(), PatchError> {
    let reason = if value.is_empty() {
        "value is empty"
    } else if value.contains(['\n', '\r']) {
        "value contains a line break"
    } else if let Some(quoted) = value.strip_prefix('"') {
        match quoted.find('"') {
            Some(p) if p == quoted.len() - 1 => return Ok(()),
            _ => "quoted value must be one single quoted string",
        }
    } else if value.contains(char::is_whitespace) {
        "unquoted value contains whitespace"
    } else if value.contains('"') {
        "unquoted value contains a quote"
    } else {
        return Ok(());
    };
    Err(PatchError::InvalidValue {
        token: token.to_string(),
        value: value.to_string(),
        reason,
    })
}
