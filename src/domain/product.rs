use serde::{Deserialize, Serialize};

/// A purchasable catalog entry.
///
/// Products are produced once by a `CatalogSource` and never mutated afterwards.
/// `price` is a whole currency amount; `rating` lies in `[3.0, 5.0]`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: u64,
    pub rating: f64,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_json_shape() {
        let product = Product {
            id: 7,
            name: "Nova Mobiles Model 1007".to_string(),
            category: "Mobiles".to_string(),
            brand: "Nova".to_string(),
            price: 12_500,
            rating: 4.2,
            image: "/images/phone.svg".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["price"], 12_500);
        assert_eq!(json["image"], "/images/phone.svg");

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }
}
