use rust_decimal::Decimal;

use crate::models::Product;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/250x200?text=";

/// The fixed product list. Seeded once, never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn seeded() -> Self {
        let seed = [
            (1, "Laptop", 99999, "Laptop", "High-performance laptop"),
            (2, "Smartphone", 69999, "Phone", "Latest smartphone"),
            (3, "Headphones", 19999, "Headphones", "Wireless headphones"),
            (4, "Tablet", 39999, "Tablet", "10-inch tablet"),
            (5, "Watch", 29999, "Watch", "Smart watch"),
            (6, "Camera", 79999, "Camera", "Digital camera"),
        ];

        let products = seed
            .into_iter()
            .map(|(id, name, cents, label, description)| Product {
                id,
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                image: format!("{PLACEHOLDER_IMAGE}{label}"),
                description: description.to_string(),
            })
            .collect();

        Self::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_has_unique_ids() {
        let catalog = Catalog::seeded();
        let mut ids: Vec<i64> = catalog.products().iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 6);
        assert_eq!(catalog.find(3).map(|p| p.price), Some(Decimal::new(19999, 2)));
        assert!(catalog.find(42).is_none());
    }
}
