//! Product catalog matching.
//!
//! The original design reserved this seam for vector-similarity search; the
//! reference behavior is a keyword overlap over catalog tags, which is what
//! ships here. Swapping in a semantic index means implementing
//! [`ProductCatalog`] against it.

use vimark_core::Product;

/// Searchable product catalog collaborator.
pub trait ProductCatalog {
    /// Return up to `limit` products matching the query, best match first.
    /// When `category` is given only products in that category are
    /// considered.
    fn search(&self, query: &str, category: Option<&str>, limit: usize) -> Vec<Product>;
}

/// In-memory catalog backed by the YAML catalog file.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    products: Vec<Product>,
}

impl CatalogIndex {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct product categories, sorted, for use as scan defaults.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Count how many lowercased query terms appear among the product's
    /// lowercased tags. Multi-word tags match when the whole query contains
    /// them.
    fn match_score(product: &Product, query_lower: &str, terms: &[&str]) -> usize {
        product
            .tags
            .iter()
            .map(|tag| tag.to_lowercase())
            .filter(|tag| {
                if tag.contains(' ') {
                    query_lower.contains(tag.as_str())
                } else {
                    terms.contains(&tag.as_str())
                }
            })
            .count()
    }
}

impl ProductCatalog for CatalogIndex {
    fn search(&self, query: &str, category: Option<&str>, limit: usize) -> Vec<Product> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();

        let mut matches: Vec<(usize, &Product)> = self
            .products
            .iter()
            .filter(|p| p.in_stock())
            .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c)))
            .map(|p| (Self::match_score(p, &query_lower, &terms), p))
            .collect();

        // Stable sort: equal scores keep catalog order.
        matches.sort_by(|a, b| b.0.cmp(&a.0));

        matches
            .into_iter()
            .take(limit)
            .map(|(_, p)| p.clone())
            .collect()
    }
}
