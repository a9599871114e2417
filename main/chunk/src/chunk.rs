use crate::{Element, Item};
use std::ops::Range;

/// A state chunk, split into lines and indexed by structure.
///
/// Parsing never fails and never allocates per line content: each [`ChunkLine`] borrows from the
/// source. Concatenating the raw text of all lines yields the source again, byte for byte.
///
/// Structure as far as we care about it:
///
/// - The first line is the *opening line* if it starts with `<` (e.g. `<VOLENV2`). It's not part
///   of the body.
/// - Each further line starting with `<` opens a nested block, each line starting with `>` closes
///   one.
/// - The first `>` line which doesn't close a nested block is the *closing delimiter* of the
///   chunk. Lines after it are trailing lines.
/// - Body lines outside of nested blocks are *top-level* lines. Only they can be field lines.
#[derive(Clone, Debug)]
pub struct Chunk<'a> {
    lines: Vec<ChunkLine<'a>>,
    closing_delimiter_index: Option<usize>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LineRole {
    Opening,
    TopLevel,
    Nested,
    ClosingDelimiter,
    Trailing,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ChunkLine<'a> {
    index: usize,
    content: &'a str,
    terminator: &'a str,
    role: LineRole,
}

impl<'a> Chunk<'a> {
    pub fn parse(source: &'a str) -> Chunk<'a> {
        let mut lines = Vec::new();
        let mut closing_delimiter_index = None;
        let mut open_levels_count = 0usize;
        for (index, raw) in source.split_inclusive('\n').enumerate() {
            let terminator = if raw.ends_with("\r\n") {
                "\r\n"
            } else if raw.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            let content = &raw[..raw.len() - terminator.len()];
            let item = Item::parse_from_line(content);
            let role = if closing_delimiter_index.is_some() {
                LineRole::Trailing
            } else if index == 0 && item.opens_block() {
                LineRole::Opening
            } else if item.opens_block() {
                open_levels_count += 1;
                LineRole::Nested
            } else if item.closes_block() {
                if open_levels_count == 0 {
                    closing_delimiter_index = Some(index);
                    LineRole::ClosingDelimiter
                } else {
                    open_levels_count -= 1;
                    LineRole::Nested
                }
            } else if open_levels_count > 0 {
                LineRole::Nested
            } else {
                LineRole::TopLevel
            };
            lines.push(ChunkLine {
                index,
                content,
                terminator,
                role,
            });
        }
        Chunk {
            lines,
            closing_delimiter_index,
        }
    }

    pub fn lines(&self) -> &[ChunkLine<'a>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn first_line(&self) -> Option<&ChunkLine<'a>> {
        self.lines.first()
    }

    pub fn last_line(&self) -> Option<&ChunkLine<'a>> {
        self.lines.last()
    }

    pub fn closing_delimiter(&self) -> Option<&ChunkLine<'a>> {
        self.closing_delimiter_index.map(|i| &self.lines[i])
    }

    /// Returns all top-level lines of the form `<token> <value>`.
    pub fn field_lines(&self) -> impl Iterator<Item = &ChunkLine<'a>> {
        self.lines.iter().filter(|l| l.field_token().is_some())
    }

    /// Returns the first field line for the given token.
    ///
    /// Matching is anchored at the line start and requires the token to be followed by a space,
    /// so `ACT` matches neither `SUBACT 1` nor `ACTIVE 1`.
    pub fn find_line_starting_with(&self, token: &str) -> Option<&ChunkLine<'a>> {
        self.field_lines().find(|l| l.field_token() == Some(token))
    }

    /// Returns the values of the first field line for the given token.
    pub fn field(&self, token: &str) -> Option<Element<'a>> {
        let line = self.find_line_starting_with(token)?;
        match Item::parse_from_line(line.content) {
            Item::Attribute(el) => Some(el),
            _ => None,
        }
    }
}

impl<'a> ChunkLine<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The line without its terminator.
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// `"\n"`, `"\r\n"` or `""` (last line without line break).
    pub fn terminator(&self) -> &'a str {
        self.terminator
    }

    pub fn role(&self) -> LineRole {
        self.role
    }

    /// Returns the token if this is a top-level line of the form `<token> <value>`.
    pub fn field_token(&self) -> Option<&'a str> {
        if self.role != LineRole::TopLevel {
            return None;
        }
        let (token, _) = self.content.split_once(' ')?;
        if token.is_empty() || token.contains(char::is_whitespace) {
            return None;
        }
        Some(token)
    }

    /// Returns the byte range (relative to [`content`]) of the first value of a field line.
    ///
    /// A value in double quotes counts as one value. If the line has no value at all, the
    /// returned range is empty and points to the end of the line.
    ///
    /// [`content`]: #method.content
    pub fn first_value_range(&self) -> Option<Range<usize>> {
        let token = self.field_token()?;
        let after_token = token.len() + 1;
        let rest = &self.content[after_token..];
        let value_start = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let value = &rest[value_start..];
        let value_len = if let Some(quoted) = value.strip_prefix('"') {
            quoted.find('"').map(|p| p + 2).unwrap_or(value.len())
        } else {
            value.find(char::is_whitespace).unwrap_or(value.len())
        };
        let start = after_token + value_start;
        Some(start..start + value_len)
    }
}
