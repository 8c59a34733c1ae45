//! Localized pool strings

use phf::phf_map;

static EN: phf::Map<&'static str, &'static str> = phf_map! {
    "PoolName" => "Jefferson-Madison Regional Library",
    "PoolDescription" => "Books, movies, audiobooks and e-books from the Jefferson-Madison Regional Library, the public library of Charlottesville and surrounding counties.",
};

static ES: phf::Map<&'static str, &'static str> = phf_map! {
    "PoolName" => "Biblioteca Regional Jefferson-Madison",
    "PoolDescription" => "Libros, películas, audiolibros y libros electrónicos de la Biblioteca Regional Jefferson-Madison, la biblioteca pública de Charlottesville y los condados vecinos.",
};

pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, Copy)]
pub struct Localizer {
    language: &'static str,
    messages: &'static phf::Map<&'static str, &'static str>,
}

impl Localizer {
    /// Pick a bundle from the first tag of an `Accept-Language` header.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let tag = header
            .and_then(|h| h.split(',').next())
            .map(|t| t.split(';').next().unwrap_or_default().trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        let primary = tag.split('-').next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("es") {
            Self {
                language: "es",
                messages: &ES,
            }
        } else {
            Self {
                language: "en",
                messages: &EN,
            }
        }
    }

    /// Language of the selected bundle, for `Content-Language`.
    pub fn language(&self) -> &'static str {
        self.language
    }

    /// Message text, falling back to English and then to the id itself.
    pub fn localize(&self, id: &str) -> String {
        self.messages
            .get(id)
            .or_else(|| EN.get(id))
            .map(|s| s.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
