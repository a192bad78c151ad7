use crate::domain::ports::CatalogSource;
use crate::domain::product::Product;
use crate::error::Result;
use crate::interfaces::csv::product_reader::ProductReader;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CATALOG_SIZE: usize = 1000;
pub const DEFAULT_CATALOG_SEED: u64 = 42;

const CATEGORIES: [&str; 5] = ["Mobiles", "Computers", "Audio", "TVs", "Accessories"];

fn brands(category: &str) -> &'static [&'static str] {
    match category {
        "Mobiles" => &["RealTech", "Zenfone", "Nova", "Pixelon"],
        "Computers" => &["ProBook", "MegaTech", "Ultra", "NoteMax"],
        "Audio" => &["SoundBeat", "TuneX", "BassPro", "AudioLyft"],
        "TVs" => &["ViewMax", "CinemaV", "ScreenPro", "VisionX"],
        "Accessories" => &["ChargeIt", "SafeCase", "PowerUp", "Gizmo"],
        _ => &["BrandX"],
    }
}

fn image(category: &str) -> &'static str {
    match category {
        "Computers" => "/images/laptop.svg",
        "Audio" => "/images/headphones.svg",
        "TVs" => "/images/tv.svg",
        "Accessories" => "/images/charger.svg",
        _ => "/images/phone.svg",
    }
}

fn base_price(category: &str) -> f64 {
    match category {
        "Accessories" => 200.0,
        "Audio" => 1500.0,
        "TVs" => 20000.0,
        "Computers" => 35000.0,
        _ => 10000.0,
    }
}

/// A synthetic catalog: categories and brands rotate with the product id, prices
/// and ratings are drawn from a seeded generator so a given seed always yields the
/// same products.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedCatalog {
    size: usize,
    seed: u64,
}

impl Default for GeneratedCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_SIZE, DEFAULT_CATALOG_SEED)
    }
}

impl GeneratedCatalog {
    pub fn new(size: usize, seed: u64) -> Self {
        Self { size, seed }
    }

    pub fn generate(&self) -> Vec<Product> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (1..=self.size as u64)
            .map(|id| {
                let index = (id - 1) as usize;
                let category = CATEGORIES[index % CATEGORIES.len()];
                let brand_list = brands(category);
                let brand = brand_list[index % brand_list.len()];
                let base = base_price(category);
                let price = (base + rng.gen_range(0.0..1.0) * base * 1.5).round() as u64;
                let rating = ((3.0_f64 + rng.gen_range(0.0..1.0) * 2.0) * 10.0).round() / 10.0;
                Product {
                    id,
                    name: format!("{brand} {category} Model {}", 1000 + id),
                    category: category.to_string(),
                    brand: brand.to_string(),
                    price,
                    rating,
                    image: image(category).to_string(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl CatalogSource for GeneratedCatalog {
    async fn load(&self) -> Result<Vec<Product>> {
        Ok(self.generate())
    }
}

/// Loads products from a CSV file. Rows that fail to parse are skipped with a warning.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load(&self) -> Result<Vec<Product>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Product>> {
            let file = std::fs::File::open(&path)?;
            let mut products = Vec::new();
            for (row, result) in ProductReader::new(file).products().enumerate() {
                match result {
                    Ok(product) => products.push(product),
                    Err(e) => warn!(path = %path.display(), row = row + 1, error = %e, "skipping catalog row"),
                }
            }
            Ok(products)
        })
        .await?
    }
}
