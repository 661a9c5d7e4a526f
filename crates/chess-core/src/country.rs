//! Country resolution for Chess.com profile country fields.
//!
//! Profiles carry a country as a URL such as
//! `https://api.chess.com/pub/country/US`; the trailing segment is an
//! ISO 3166-1 alpha-2 code or one of Chess.com's own `X?` codes.

use isocountry::CountryCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryError {
    #[error("Malformed country field: {0:?}")]
    Malformed(String),

    #[error("Unknown country code: {0}")]
    UnknownCode(String),
}

/// Codes Chess.com assigns to regions outside ISO 3166-1.
const SPECIAL_CODES: &[(&str, &str)] = &[
    ("XA", "Canary Islands"),
    ("XB", "Basque Country"),
    ("XC", "Catalonia"),
    ("XE", "England"),
    ("XG", "Galicia"),
    ("XK", "Kosovo"),
    ("XP", "Palestine"),
    ("XS", "Scotland"),
    ("XW", "Wales"),
    ("XX", "International"),
];

/// Trailing path segment of a profile's country field.
pub fn country_code(field: &str) -> Result<&str, CountryError> {
    let code = field
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(CountryError::Malformed(field.to_string()))
    }
}

/// Display name for a two-letter code. Chess.com's own codes take
/// precedence over the ISO 3166-1 registry.
pub fn country_name(code: &str) -> Result<&'static str, CountryError> {
    if let Some(&(_, name)) = SPECIAL_CODES.iter().find(|(c, _)| *c == code) {
        return Ok(name);
    }
    CountryCode::for_alpha2(code)
        .map(|country| country.name())
        .map_err(|_| CountryError::UnknownCode(code.to_string()))
}

/// Resolve a profile country field straight to its display name.
pub fn resolve_country(field: &str) -> Result<&'static str, CountryError> {
    country_name(country_code(field)?)
}
