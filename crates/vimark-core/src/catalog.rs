use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A sellable product from the shop catalog.
///
/// Prices are whole Vietnamese đồng (`price_vnd`) — VND has no minor unit, so
/// an integer is exact. `tags` mix Vietnamese and English keywords and drive
/// trend-to-product matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier, e.g. `"PROD001"`.
    pub id: String,
    /// Vietnamese display name.
    pub name: String,
    /// English display name.
    pub name_en: String,
    pub category: String,
    pub price_vnd: i64,
    pub description: String,
    pub tags: Vec<String>,
    pub inventory: u32,
    /// Average customer rating on a 0–5 scale.
    pub rating: f64,
    pub image_url: Option<String>,
}

impl Product {
    /// Returns `true` if any product tag matches the given keyword,
    /// case-insensitively.
    #[must_use]
    pub fn has_tag(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == keyword)
    }

    /// Returns `true` if the product is currently in stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.inventory > 0
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<Product>,
}

/// Load and validate the product catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for product in &catalog.products {
        if product.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product id must be non-empty".to_string(),
            ));
        }

        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product '{}' has an empty name",
                product.id
            )));
        }

        if product.price_vnd < 0 {
            return Err(ConfigError::Validation(format!(
                "product '{}' has negative price {}",
                product.id, product.price_vnd
            )));
        }

        if !(0.0..=5.0).contains(&product.rating) {
            return Err(ConfigError::Validation(format!(
                "product '{}' has rating {} outside [0, 5]",
                product.id, product.rating
            )));
        }

        if !seen_ids.insert(product.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: '{}'",
                product.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Son Lì Bền Màu 24H".to_string(),
            name_en: "Long-lasting Matte Lipstick 24H".to_string(),
            category: "beauty".to_string(),
            price_vnd: 259_000,
            description: "Son lì bền màu, giữ màu 24 giờ".to_string(),
            tags: vec![
                "beauty".to_string(),
                "makeup".to_string(),
                "làm đẹp".to_string(),
            ],
            inventory: 450,
            rating: 4.8,
            image_url: None,
        }
    }

    #[test]
    fn has_tag_is_case_insensitive() {
        let product = make_product("PROD001");
        assert!(product.has_tag("Beauty"));
        assert!(product.has_tag("làm đẹp"));
        assert!(!product.has_tag("fashion"));
    }

    #[test]
    fn in_stock_false_at_zero_inventory() {
        let mut product = make_product("PROD001");
        product.inventory = 0;
        assert!(!product.in_stock());
    }

    #[test]
    fn validate_accepts_well_formed_catalog() {
        let catalog = CatalogFile {
            products: vec![make_product("PROD001"), make_product("PROD002")],
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let catalog = CatalogFile {
            products: vec![make_product("PROD001"), make_product("PROD001")],
        };
        let result = validate_catalog(&catalog);
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")),
            "expected duplicate-id validation error, got: {result:?}"
        );
    }

    #[test]
    fn validate_rejects_out_of_range_rating() {
        let mut product = make_product("PROD001");
        product.rating = 5.5;
        let catalog = CatalogFile {
            products: vec![product],
        };
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn validate_rejects_negative_price() {
        let mut product = make_product("PROD001");
        product.price_vnd = -1;
        let catalog = CatalogFile {
            products: vec![product],
        };
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn catalog_yaml_parses() {
        let yaml = r"
products:
  - id: PROD001
    name: Son Lì Bền Màu 24H
    name_en: Long-lasting Matte Lipstick 24H
    category: beauty
    price_vnd: 259000
    description: Son lì bền màu
    tags: [beauty, makeup]
    inventory: 450
    rating: 4.8
";
        let catalog: CatalogFile = serde_yaml::from_str(yaml).expect("parse catalog");
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].id, "PROD001");
        assert!(catalog.products[0].image_url.is_none());
        assert!(validate_catalog(&catalog).is_ok());
    }
}
