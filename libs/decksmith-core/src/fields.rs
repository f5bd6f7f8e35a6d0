//! Note field helpers: sort field, checksum and on-disk joining.

use crate::error::{CoreError, Result};
use crate::types::{Note, Notetype};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sha1::{Digest, Sha1};

/// Separator between field values in the stored `flds` column.
pub const FIELD_SEPARATOR: char = '\x1f';

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static MEDIA_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']?([^"'>]+)["']?[^>]*>|\[sound:([^\]]+)\]|\[anki:sound:([^\]]+)\]"#)
        .expect("valid media regex")
});

/// Remove HTML tags, keeping the file names of media references.
pub fn strip_html(text: &str) -> String {
    let with_media = MEDIA_REFERENCE.replace_all(text, |caps: &Captures| {
        caps.iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().to_string())
            .next()
            .unwrap_or_default()
    });
    HTML_TAG.replace_all(&with_media, "").into_owned()
}

/// First 32 bits of the SHA-1 of `text`, big-endian.
pub fn field_checksum(text: &str) -> u32 {
    let digest = Sha1::digest(text.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Derived values written alongside a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFields {
    /// Stripped text of the sort field.
    pub sort_field: String,
    /// Checksum of the stripped first field.
    pub checksum: u32,
}

/// Validate a note against its notetype and derive its sort field and checksum.
pub fn prepare_note_fields(note: &Note, notetype: &Notetype) -> Result<PreparedFields> {
    let first = note.fields.first().ok_or(CoreError::EmptyNote)?;
    if note.fields.len() != notetype.fields.len() {
        return Err(CoreError::FieldCountMismatch {
            expected: notetype.fields.len(),
            found: note.fields.len(),
        });
    }

    let first = strip_html(first);
    let index = notetype.config.sort_field_idx;
    let sort_field = if index == 0 {
        first.clone()
    } else {
        let text = note
            .fields
            .get(index as usize)
            .ok_or(CoreError::SortFieldOutOfBounds {
                index,
                field_count: note.fields.len(),
            })?;
        strip_html(text)
    };

    Ok(PreparedFields {
        checksum: field_checksum(&first),
        sort_field,
    })
}

pub fn join_fields(fields: &[String]) -> String {
    fields.join(&FIELD_SEPARATOR.to_string())
}

pub fn split_fields(joined: &str) -> Vec<String> {
    joined.split(FIELD_SEPARATOR).map(str::to_string).collect()
}

/// Tags are stored space separated with a leading and trailing space.
pub fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    format!(" {} ", tags.join(" "))
}

pub fn split_tags(joined: &str) -> Vec<String> {
    joined
        .split(|c| c == ' ' || c == '\u{3000}')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotetypeKind;
    use pretty_assertions::assert_eq;

    fn notetype(fields: &[&str], sort_idx: u32) -> Notetype {
        let mut notetype = Notetype::new("Basic", NotetypeKind::Normal);
        for name in fields {
            notetype.add_field(*name);
        }
        notetype.config.sort_field_idx = sort_idx;
        notetype
    }

    fn note(fields: &[&str]) -> Note {
        Note::new(1, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn strip_html_keeps_media_names() {
        assert_eq!(strip_html("<b>bold</b> text"), "bold text");
        assert_eq!(strip_html(r#"see <img src="cat.jpg">"#), "see cat.jpg");
        assert_eq!(strip_html("[sound:hello.mp3] there"), "hello.mp3 there");
    }

    #[test]
    fn checksum_is_stable() {
        // sha1("hello") = aaf4c61d...
        assert_eq!(field_checksum("hello"), 0xaaf4_c61d);
    }

    #[test]
    fn prepare_uses_first_field_by_default() {
        let prepared = prepare_note_fields(&note(&["<i>one</i>", "two"]), &notetype(&["A", "B"], 0))
            .unwrap();
        assert_eq!(prepared.sort_field, "one");
        assert_eq!(prepared.checksum, field_checksum("one"));
    }

    #[test]
    fn prepare_uses_configured_sort_field() {
        let prepared = prepare_note_fields(&note(&["one", "<u>two</u>"]), &notetype(&["A", "B"], 1))
            .unwrap();
        assert_eq!(prepared.sort_field, "two");
        assert_eq!(prepared.checksum, field_checksum("one"));
    }

    #[test]
    fn prepare_rejects_empty_note() {
        let result = prepare_note_fields(&note(&[]), &notetype(&["A"], 0));
        assert!(matches!(result, Err(CoreError::EmptyNote)));
    }

    #[test]
    fn prepare_rejects_field_count_mismatch() {
        let result = prepare_note_fields(&note(&["a"]), &notetype(&["A", "B"], 0));
        assert!(matches!(
            result,
            Err(CoreError::FieldCountMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn prepare_rejects_sort_index_out_of_bounds() {
        let result = prepare_note_fields(&note(&["a", "b"]), &notetype(&["A", "B"], 5));
        assert!(matches!(
            result,
            Err(CoreError::SortFieldOutOfBounds { index: 5, field_count: 2 })
        ));
    }

    #[test]
    fn fields_split_on_unit_separator() {
        let fields = vec!["a".to_string(), String::new(), "c".to_string()];
        let joined = join_fields(&fields);
        assert_eq!(joined, "a\x1f\x1fc");
        assert_eq!(split_fields(&joined), fields);
    }

    #[test]
    fn tags_are_space_padded() {
        let tags = vec!["one".to_string(), "two".to_string()];
        assert_eq!(join_tags(&tags), " one two ");
        assert_eq!(join_tags(&[]), "");
        assert_eq!(split_tags(" one\u{3000}two  "), tags);
    }
}
