//! MARC subfield extraction

use crate::model::VariableField;

/// Which subfields of a matching field to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subfield<'a> {
    /// Every subfield, space-joined into one value per field.
    Any,
    /// Only subfields with this code. If a field repeats the code, the last
    /// occurrence wins.
    Code(&'a str),
}

/// Drop one trailing `:`, `/` or `.` (ISBD punctuation) and the whitespace
/// it leaves behind.
pub fn strip_trailing_punctuation(value: &str) -> String {
    match value.strip_suffix(&[':', '/', '.'][..]) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Values of `tag` in record order, one per matching field instance.
///
/// Every subfield content is punctuation-stripped; fields that end up empty
/// are left out.
pub fn extract(fields: &[VariableField], tag: &str, subfield: Subfield<'_>) -> Vec<String> {
    fields
        .iter()
        .filter(|field| field.marc_tag == tag)
        .filter_map(|field| {
            let mut value = String::new();
            for sub in &field.subfields {
                match subfield {
                    Subfield::Any => {
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(&strip_trailing_punctuation(&sub.content));
                    }
                    Subfield::Code(code) if sub.tag == code => {
                        value = strip_trailing_punctuation(&sub.content);
                    }
                    Subfield::Code(_) => {}
                }
            }
            (!value.is_empty()).then_some(value)
        })
        .collect()
}

/// First value of `tag`, if any.
pub fn extract_first(fields: &[VariableField], tag: &str, subfield: Subfield<'_>) -> Option<String> {
    extract(fields, tag, subfield).into_iter().next()
}
