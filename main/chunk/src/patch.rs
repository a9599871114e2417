use crate::{Chunk, ChunkEdits, PatchError};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::HashMap;

/// How an edit ended up in the chunk.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "snake_case"))]
pub enum FieldAction {
    /// Existing field line(s) got their first value overwritten.
    Replaced { line_count: usize },
    /// The field didn't exist and was inserted before the closing delimiter.
    Inserted,
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AppliedField {
    pub token: String,
    pub value: String,
    pub action: FieldAction,
}

/// The result of [`patch`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PatchedChunk {
    content: String,
    applied_fields: Vec<AppliedField>,
    inserted_count: usize,
}

impl PatchedChunk {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn applied_fields(&self) -> &[AppliedField] {
        &self.applied_fields
    }

    /// Number of lines which have been added to the chunk.
    pub fn inserted_count(&self) -> usize {
        self.inserted_count
    }
}

/// Applies all given edits to the chunk in one pass.
///
/// For each edit which provides a value:
///
/// - If the chunk has top-level field lines for the token, the first value of each of them is
///   overwritten. Everything else on these lines stays as it is.
/// - Otherwise a line `<token> <value>` is inserted right before the closing delimiter.
///
/// All other bytes of the chunk are preserved. Patching is idempotent: patching the result again
/// with the same edits doesn't change it anymore.
pub fn patch(source: &str, edits: &ChunkEdits) -> Result<PatchedChunk, PatchError> {
    edits.validate()?;
    if source.trim().is_empty() {
        return Err(PatchError::EmptyChunk);
    }
    let chunk = Chunk::parse(source);
    // Index field lines by their token in one pass
    let mut line_indexes: HashMap<&str, Vec<usize>> =
        edits.provided().map(|(token, _)| (token, vec![])).collect();
    for line in chunk.field_lines() {
        if let Some(indexes) = line
            .field_token()
            .and_then(|token| line_indexes.get_mut(token))
        {
            indexes.push(line.index());
        }
    }
    let mut replacements: HashMap<usize, &str> = HashMap::new();
    let mut insertions: Vec<(&str, &str)> = vec![];
    let mut applied_fields = vec![];
    for (token, value) in edits.provided() {
        let indexes = &line_indexes[token];
        let action = if indexes.is_empty() {
            insertions.push((token, value));
            FieldAction::Inserted
        } else {
            for i in indexes {
                replacements.insert(*i, value);
            }
            FieldAction::Replaced {
                line_count: indexes.len(),
            }
        };
        tracing::debug!(token, value, ?action, "patching chunk field");
        applied_fields.push(AppliedField {
            token: token.to_string(),
            value: value.to_string(),
            action,
        });
    }
    let closing_delimiter = chunk.closing_delimiter();
    if !insertions.is_empty() && closing_delimiter.is_none() {
        return Err(PatchError::MissingClosingDelimiter {
            tokens: insertions.iter().map(|(t, _)| t.to_string()).collect(),
        });
    }
    let inserted_line_terminator = closing_delimiter
        .and_then(|d| d.index().checked_sub(1))
        .map(|i| chunk.lines()[i].terminator())
        .filter(|t| !t.is_empty())
        .unwrap_or("\n");
    let mut content = String::with_capacity(source.len() + 32 * insertions.len());
    for line in chunk.lines() {
        if Some(line.index()) == closing_delimiter.map(|d| d.index()) {
            for (token, value) in &insertions {
                content.push_str(token);
                content.push(' ');
                content.push_str(value);
                content.push_str(inserted_line_terminator);
            }
        }
        match (replacements.get(&line.index()), line.first_value_range()) {
            (Some(value), Some(range)) => {
                let line_content = line.content();
                content.push_str(&line_content[..range.start]);
                content.push_str(value);
                content.push_str(&line_content[range.end..]);
            }
            _ => content.push_str(line.content()),
        }
        content.push_str(line.terminator());
    }
    Ok(PatchedChunk {
        content,
        applied_fields,
        inserted_count: insertions.len(),
    })
}
