//! Product models

use serde::{Deserialize, Serialize};

/// Product stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// A product that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            description: description.into(),
        }
    }

    /// Attach the row ID assigned by the store
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_product_keeps_fields() {
        let product = NewProduct::new("Lamp", 12.5, "A desk lamp").into_product(3);

        assert_eq!(product.id, 3);
        assert_eq!(product.name, "Lamp");
        assert!((product.price - 12.5).abs() < f64::EPSILON);
        assert_eq!(product.description, "A desk lamp");
    }
}
