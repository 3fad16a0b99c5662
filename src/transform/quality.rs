use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};
use tracing::info;

use crate::record::ProductRecord;

/// Data-quality pass over normalized records: substitute defaults, drop rows
/// with a non-positive price, and drop exact duplicates (first occurrence
/// wins). Records with no price at all are kept.
pub fn clean(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let zero = BigDecimal::zero();
    let mut seen: HashSet<ProductRecord> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());

    for mut rec in records {
        rec.fill_defaults();
        if let Some(price) = &rec.price {
            if *price <= zero {
                continue;
            }
        }
        if seen.insert(rec.clone()) {
            out.push(rec);
        }
    }

    info!(rows = out.len(), "rows after cleaning");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DEFAULT_IMAGE_SRC, DEFAULT_PRODUCT_TYPE};

    fn priced(sku: &str, price: Option<&str>) -> ProductRecord {
        ProductRecord {
            title: Some("Shirt".into()),
            sku: Some(sku.into()),
            price: price.map(|p| p.parse().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_substituted_and_idempotent() {
        let once = clean(vec![priced("GS-1", Some("10"))]);
        assert_eq!(once[0].product_type.as_deref(), Some(DEFAULT_PRODUCT_TYPE));
        assert_eq!(once[0].image_src.as_deref(), Some(DEFAULT_IMAGE_SRC));
        assert_eq!(clean(once.clone()), once);
    }

    #[test]
    fn non_positive_prices_are_dropped_null_is_kept() {
        let out = clean(vec![
            priced("a", Some("0")),
            priced("b", Some("-5")),
            priced("c", None),
            priced("d", Some("12.50")),
        ]);
        let skus: Vec<_> = out.iter().map(|r| r.sku.clone().unwrap()).collect();
        assert_eq!(skus, vec!["c", "d"]);
    }

    #[test]
    fn exact_duplicates_collapse_to_first_occurrence() {
        let out = clean(vec![
            priced("a", Some("10")),
            priced("b", Some("10")),
            priced("a", Some("10")),
        ]);
        let skus: Vec<_> = out.iter().map(|r| r.sku.clone().unwrap()).collect();
        assert_eq!(skus, vec!["a", "b"]);
    }

    #[test]
    fn records_differing_only_by_sku_are_distinct() {
        let out = clean(vec![priced("a", Some("10")), priced("b", Some("10"))]);
        assert_eq!(out.len(), 2);
    }
}
