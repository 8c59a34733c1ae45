//! Bib record → pool record fields
//!
//! Output order is fixed: identifier, locations, publication data, title
//! block, identifiers, people and subjects, notes, then online access and
//! availability.

use jmrl_pool_models::RecordField;

use crate::error::{Error, Result};
use crate::extract::{extract, extract_first, Subfield};
use crate::model::{BibRecord, CodeValue};

pub const LIBRARY_NAME: &str = "Jefferson-Madison Regional Library";

/// Subject tags, read in this order.
pub const SUBJECT_TAGS: [&str; 4] = ["600", "650", "651", "647"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Online,
    OnShelfNow,
    CheckedOut,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Online => "Online",
            Availability::OnShelfNow => "On Shelf Now",
            Availability::CheckedOut => "Checked Out",
        }
    }

    /// Unavailable items are checked out whether or not they have an online
    /// link.
    fn derive(has_online_access: bool, available: bool) -> Self {
        match (has_online_access, available) {
            (true, true) => Availability::Online,
            (false, true) => Availability::OnShelfNow,
            (_, false) => Availability::CheckedOut,
        }
    }
}

pub fn normalize(bib: &BibRecord) -> Result<Vec<RecordField>> {
    let vars = &bib.var_fields;
    let mut fields = Vec::new();

    fields.push(
        RecordField::new("id", "Identifier", bib.id.as_str())
            .with_kind("identifier")
            .display("optional")
            .citation("id"),
    );

    for location in &bib.locations {
        fields.push(RecordField::new("location", "Location", location_label(location)));
    }

    fields.push(
        RecordField::new(
            "published_date",
            "Publication Date",
            bib.publish_year.to_string(),
        )
        .citation("published_date"),
    );
    fields.push(
        RecordField::new("format", "Format", bib.material_type.value_or_empty()).citation("format"),
    );
    fields.push(
        RecordField::new("language", "Language", bib.lang.value_or_empty())
            .detailed()
            .citation("language"),
    );

    let title = extract_first(vars, "245", Subfield::Code("a")).ok_or_else(|| {
        Error::MissingRequiredField {
            id: bib.id.clone(),
            field: "title",
        }
    })?;
    fields.push(RecordField::new("title", "Title", unescape(&title)).citation("title"));

    if let Some(subtitle) = extract_first(vars, "245", Subfield::Code("b")) {
        fields.push(RecordField::new("subtitle", "Subtitle", unescape(&subtitle)).citation("subtitle"));
    }

    for isbn in extract(vars, "020", Subfield::Code("a")) {
        fields.push(
            RecordField::new("isbn", "ISBN", isbn)
                .detailed()
                .citation("serial_number"),
        );
    }

    for call_number in extract(vars, "092", Subfield::Any) {
        fields.push(
            RecordField::new("call_number", "Call Number", call_number)
                .detailed()
                .citation("call_number"),
        );
    }

    for author in extract(vars, "100", Subfield::Code("a")) {
        fields.push(RecordField::new("author", "Author", unescape(&author)).citation("author"));
    }

    for tag in SUBJECT_TAGS {
        for subject in extract(vars, tag, Subfield::Code("a")) {
            fields.push(
                RecordField::new("subject", "Subject", subject)
                    .detailed()
                    .citation("subject"),
            );
        }
    }

    if let Some(contents) = extract_first(vars, "505", Subfield::Code("a")) {
        fields.push(RecordField::new("contents", "Contents", contents).detailed());
    }

    if let Some(summary) = extract_first(vars, "520", Subfield::Code("a")) {
        fields.push(RecordField::new("summary", "Summary", summary).citation("abstract"));
    }

    if let Some(publisher) = extract_first(vars, "776", Subfield::Code("d")) {
        fields.push(
            RecordField::new("published", "Published", publisher)
                .detailed()
                .citation("publisher"),
        );
    }

    let access_url = extract_first(vars, "856", Subfield::Code("u"));
    let availability = Availability::derive(access_url.is_some(), bib.available);
    if let Some(url) = access_url {
        let provider = if url.contains("overdrive") {
            "overdrive"
        } else {
            "freading"
        };
        fields.push(
            RecordField::new("access_url", "Online Access", url)
                .with_kind("url")
                .provider(provider),
        );
    }
    fields.push(RecordField::new(
        "availability",
        "Availability",
        availability.as_str(),
    ));

    Ok(fields)
}

fn location_label(location: &CodeValue) -> String {
    if location.code == "none" || location.name_or_empty() == "none" {
        LIBRARY_NAME.to_string()
    } else {
        format!("{LIBRARY_NAME} - {}", location.name_or_empty())
    }
}

fn unescape(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}
