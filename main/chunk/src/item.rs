use splitty::SplitUnquotedChar;
use std::fmt::{Debug, Formatter};

/// What a single chunk line represents, judged by the line alone.
#[derive(Debug)]
pub enum Item<'a> {
    /// `<NAME values...`, opens a block.
    StartTag(Element<'a>),
    /// `>`, closes the innermost open block.
    EndTag,
    /// `NAME values...`
    Attribute(Element<'a>),
    /// Anything else, e.g. base64 encoded plug-in state.
    Content(&'a str),
    Empty,
}

impl<'a> Item<'a> {
    pub fn parse_from_line(line: &'a str) -> Self {
        let line = line.trim();
        if let Some(remainder) = line.strip_prefix('<') {
            if let Some(el) = Element::parse(remainder) {
                Item::StartTag(el)
            } else {
                Item::Content(line)
            }
        } else if line.starts_with('>') {
            Item::EndTag
        } else if line.is_empty() {
            Item::Empty
        } else if let Some(el) = Element::parse(line).filter(|el| is_attribute_name(el.name())) {
            Item::Attribute(el)
        } else {
            Item::Content(line)
        }
    }

    /// Returns whether this line opens a nested block.
    pub fn opens_block(&self) -> bool {
        matches!(self, Item::StartTag(_))
    }

    /// Returns whether this line closes the innermost open block.
    pub fn closes_block(&self) -> bool {
        matches!(self, Item::EndTag)
    }
}

fn is_attribute_name(name: &str) -> bool {
    name.chars()
        .all(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Name and values of a start tag or attribute line.
pub struct Element<'a>(&'a str, SplitUnquotedChar<'a>);

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        self.0
    }

    /// Values with surrounding quotes removed.
    pub fn into_values(self) -> SplitUnquotedChar<'a> {
        self.1
    }

    fn parse(remainder: &'a str) -> Option<Self> {
        let mut split = splitty::split_unquoted_whitespace(remainder).unwrap_quotes(true);
        let first_word = split.next()?;
        if first_word.is_empty() {
            return None;
        }
        Some(Element(first_word, split))
    }
}

impl<'a> Debug for Element<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.0).finish()
    }
}
