//! SQL dialect flag and identifier rules.
//!
//! The two supported backends disagree on how unquoted identifiers are
//! folded: H2 stores them upper-case, PostgreSQL lower-case. Anything that
//! builds SQL text or compares names against catalog rows goes through
//! [`Dialect::fold_case`] and [`Dialect::quote_identifier`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// H2 with the H2GIS extension. Catalog carries an integer geometry type code.
    H2,
    /// PostgreSQL with PostGIS. Catalog carries a textual base type name.
    PostGis,
}

impl Dialect {
    /// Fold an unquoted identifier the way the backend stores it.
    pub fn fold_case(&self, ident: &str) -> String {
        match self {
            Dialect::H2 => ident.to_uppercase(),
            Dialect::PostGis => ident.to_lowercase(),
        }
    }

    /// Quote `ident` when the backend would not resolve it verbatim.
    ///
    /// Plain identifiers already in the backend's folded case are returned
    /// unchanged; everything else is wrapped in double quotes with embedded
    /// quotes doubled.
    pub fn quote_identifier(&self, ident: &str) -> String {
        if is_plain_identifier(ident) && self.fold_case(ident) == ident {
            ident.to_string()
        } else {
            format!("\"{}\"", ident.replace('"', "\"\""))
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::H2 => f.write_str("H2GIS"),
            Dialect::PostGis => f.write_str("PostGIS"),
        }
    }
}

fn is_plain_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_identifiers() {
        assert_eq!(Dialect::H2.quote_identifier("THE_GEOM"), "THE_GEOM");
        assert_eq!(Dialect::PostGis.quote_identifier("the_geom"), "the_geom");
    }

    #[test]
    fn test_quote_mixed_case() {
        assert_eq!(Dialect::H2.quote_identifier("the_geom"), "\"the_geom\"");
        assert_eq!(Dialect::PostGis.quote_identifier("TheGeom"), "\"TheGeom\"");
    }

    #[test]
    fn test_quote_special_chars() {
        assert_eq!(Dialect::H2.quote_identifier("MY TABLE"), "\"MY TABLE\"");
        assert_eq!(Dialect::PostGis.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::PostGis.quote_identifier("1abc"), "\"1abc\"");
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(Dialect::H2.fold_case("geom"), "GEOM");
        assert_eq!(Dialect::PostGis.fold_case("GEOM"), "geom");
    }
}
