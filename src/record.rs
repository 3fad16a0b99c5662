use bigdecimal::BigDecimal;
use indexmap::IndexMap;

/// One row as it came out of the source CSV: column name -> raw cell text,
/// in source order. No shape guarantees; any column may be missing.
pub type RawRecord = IndexMap<String, String>;

/// The canonical column set, in table order. The persisted table carries these
/// nine columns after a surrogate `id` key.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "title",
    "product_type",
    "vendor",
    "tags",
    "handle",
    "variant_title",
    "sku",
    "price",
    "image_src",
];

pub const DEFAULT_PRODUCT_TYPE: &str = "Unknown";
pub const DEFAULT_IMAGE_SRC: &str = "No-Image";

/// A fully-populated catalog row. Every field is present (possibly null)
/// regardless of which columns existed in the source.
///
/// Equality and hashing cover all nine fields, which is what the content-based
/// dedup in the quality filter relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductRecord {
    pub title: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub tags: Option<String>,
    pub handle: Option<String>,
    pub variant_title: Option<String>,
    pub sku: Option<String>,
    pub price: Option<BigDecimal>,
    pub image_src: Option<String>,
}

impl ProductRecord {
    /// Substitute the documented defaults for missing descriptive fields.
    /// Applying this twice yields the same record.
    pub fn fill_defaults(&mut self) {
        self.product_type
            .get_or_insert_with(|| DEFAULT_PRODUCT_TYPE.to_string());
        self.image_src
            .get_or_insert_with(|| DEFAULT_IMAGE_SRC.to_string());
    }
}
