//! Tag references
//!
//! Entries reference their tags with a delimited list of tag ids, e.g.
//! `2|3|`. The list is parsed here and resolved to tag labels by the tag
//! repository.

/// Separator used by the blogger add-on when storing tag ids
pub const DEFAULT_TAG_DELIMITER: char = '|';

/// Parsed tag reference of one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIds {
    /// Distinct tag ids in first-seen order
    pub ids: Vec<i64>,
    /// Non-empty tokens that were not tag ids
    pub discarded: Vec<String>,
}

impl TagIds {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Parse a delimited tag id list.
///
/// Empty tokens (`2||3|`) are skipped silently. Tokens that are not
/// integers are skipped and reported in `discarded`. Duplicate ids are
/// collapsed.
pub fn parse_tag_ids(value: &str, delimiter: char) -> TagIds {
    let mut parsed = TagIds::default();

    for token in value.split(delimiter).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<i64>() {
            Ok(id) => {
                if !parsed.ids.contains(&id) {
                    parsed.ids.push(id);
                }
            }
            Err(_) => parsed.discarded.push(token.to_string()),
        }
    }

    parsed
}
