use std::str::FromStr;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::record::{ProductRecord, RawRecord, CANONICAL_COLUMNS};

/// Header aliases seen in catalog exports, keyed by the trimmed lowercase
/// source name.
const COLUMN_ALIASES: [(&str, &str); 3] = [
    ("variant title", "variant_title"),
    ("product type", "product_type"),
    ("image src", "image_src"),
];

/// Project raw rows onto the canonical nine-field schema.
///
/// Header matching is whitespace- and case-insensitive, with the alias map
/// applied first. Canonical fields absent from a row come out as `None`;
/// columns outside the canonical set are dropped. Pure and infallible: a bad
/// price becomes `None` rather than rejecting the row.
pub fn normalize(rows: &[RawRecord]) -> Vec<ProductRecord> {
    rows.iter().map(normalize_row).collect()
}

fn normalize_row(row: &RawRecord) -> ProductRecord {
    // canonical name -> first non-empty cell for that name
    let mut cells: IndexMap<String, &str> = IndexMap::new();
    for (name, value) in row {
        let canon = canonical_name(name);
        if !CANONICAL_COLUMNS.contains(&canon.as_str()) {
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        cells.entry(canon).or_insert(value);
    }

    let text = |key: &str| cells.get(key).map(|v| (*v).to_string());
    ProductRecord {
        title: text("title"),
        product_type: text("product_type"),
        vendor: text("vendor"),
        tags: text("tags"),
        handle: text("handle"),
        variant_title: text("variant_title"),
        sku: text("sku"),
        price: cells.get("price").and_then(|v| parse_price(v)),
        image_src: text("image_src"),
    }
}

fn canonical_name(raw: &str) -> String {
    let key = raw.trim().to_ascii_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canon)| (*canon).to_string())
        .unwrap_or(key)
}

/// Decimal parse of a price cell; anything unparseable is null, never an error.
pub fn parse_price(raw: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn aliases_match_case_and_whitespace_insensitively() {
        let spaced = normalize(&[raw(&[("  Variant Title ", "S"), ("Product Type", "Tops")])]);
        let plain = normalize(&[raw(&[("variant_title", "S"), ("product_type", "Tops")])]);
        assert_eq!(spaced, plain);
        assert_eq!(spaced[0].variant_title.as_deref(), Some("S"));
        assert_eq!(spaced[0].product_type.as_deref(), Some("Tops"));
    }

    #[test]
    fn absent_fields_become_null() {
        let out = normalize(&[raw(&[("title", "Shirt")])]);
        assert_eq!(out[0].title.as_deref(), Some("Shirt"));
        assert_eq!(out[0].vendor, None);
        assert_eq!(out[0].price, None);
        assert_eq!(out[0].image_src, None);
    }

    #[test]
    fn non_canonical_columns_are_dropped() {
        let out = normalize(&[raw(&[("title", "Shirt"), ("inventory_quantity", "7")])]);
        assert_eq!(out[0], normalize(&[raw(&[("title", "Shirt")])])[0]);
    }

    #[test]
    fn price_coercion() {
        assert_eq!(parse_price("19.99"), Some("19.99".parse().unwrap()));
        assert_eq!(parse_price("N/A"), None);
        let out = normalize(&[raw(&[("price", "N/A")]), raw(&[("price", "12.50")])]);
        assert_eq!(out[0].price, None);
        assert_eq!(out[1].price, Some("12.50".parse().unwrap()));
    }

    #[test]
    fn normalizing_a_canonical_rendering_is_idempotent() {
        let first = normalize(&[raw(&[
            ("Title", "Shirt"),
            ("Product Type", "Tops"),
            ("price", "19.99"),
            ("sku", "GS-1"),
        ])]);
        let rendered = raw(&[
            ("title", "Shirt"),
            ("product_type", "Tops"),
            ("price", "19.99"),
            ("sku", "GS-1"),
        ]);
        assert_eq!(normalize(&[rendered]), first);
    }
}
