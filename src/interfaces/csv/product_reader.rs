use crate::domain::product::Product;
use crate::error::{Result, StoreError};
use std::io::Read;

/// Reads products from a CSV source with the header
/// `id,name,category,brand,price,rating,image`.
///
/// Whitespace around fields is trimmed.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes products.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StoreError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "id, name, category, brand, price, rating, image\n\
                    1, Nova Mobiles Model 1001, Mobiles, Nova, 12000, 4.5, /images/phone.svg\n\
                    2, TuneX Audio Model 1002, Audio, TuneX, 1800, 3.9, /images/headphones.svg";
        let reader = ProductReader::new(data.as_bytes());
        let results: Vec<Result<Product>> = reader.products().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.brand, "Nova");
        assert_eq!(first.price, 12_000);
        assert_eq!(first.rating, 4.5);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "id, name, category, brand, price, rating, image\n\
                    x, Broken, Audio, TuneX, cheap, 4.0, /images/headphones.svg";
        let reader = ProductReader::new(data.as_bytes());
        let results: Vec<Result<Product>> = reader.products().collect();

        assert!(results[0].is_err());
    }
}
