//! Property tests for catalog filtering, sorting and pagination.

mod common;

use proptest::prelude::*;
use std::collections::HashSet;
use storefront::application::catalog;
use storefront::domain::catalog::{PriceRange, QuerySpec, SortKey};
use storefront::domain::product::Product;
use storefront::infrastructure::catalog::GeneratedCatalog;

const CATEGORIES: [&str; 4] = ["Phone", "Laptop", "Watch", "Camera"];
const BRANDS: [&str; 4] = ["Nova", "Pixelate", "Zento", "Lumos"];

fn products_strategy(max: usize) -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((0..4usize, 0..4usize, 100u64..50_000, 30u32..=50), 0..max).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (c, b, price, rating))| {
                    common::product(
                        i as u64 + 1,
                        CATEGORIES[c],
                        BRANDS[b],
                        price,
                        f64::from(rating) / 10.0,
                    )
                })
                .collect()
        },
    )
}

fn everything(sort: SortKey) -> QuerySpec {
    QuerySpec {
        sort,
        page_size: usize::MAX,
        ..QuerySpec::default()
    }
}

fn ids(products: &[Product]) -> Vec<u64> {
    products.iter().map(|p| p.id).collect()
}

proptest! {
    #[test]
    fn unsorted_query_keeps_catalog_order(products in products_strategy(60)) {
        let page = catalog::query(&products, &everything(SortKey::None));
        prop_assert_eq!(ids(&page.items), ids(&products));
    }

    #[test]
    fn price_desc_reverses_price_asc_for_distinct_prices(prices in prop::collection::hash_set(1u64..1_000_000, 0..40)) {
        let products: Vec<Product> = prices
            .into_iter()
            .enumerate()
            .map(|(i, price)| common::product(i as u64 + 1, "Phone", "Nova", price, 4.0))
            .collect();

        let asc = catalog::query(&products, &everything(SortKey::PriceAsc)).items;
        let mut desc = catalog::query(&products, &everything(SortKey::PriceDesc)).items;
        desc.reverse();

        prop_assert_eq!(ids(&asc), ids(&desc));
        prop_assert!(asc.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn rating_sort_is_descending_and_stable(products in products_strategy(60)) {
        let items = catalog::query(&products, &everything(SortKey::RatingDesc)).items;
        for w in items.windows(2) {
            prop_assert!(w[0].rating >= w[1].rating);
            if w[0].rating == w[1].rating {
                prop_assert!(w[0].id < w[1].id);
            }
        }
    }

    #[test]
    fn pagination_covers_every_match_once(
        products in products_strategy(80),
        page_size in 1usize..20,
    ) {
        let spec = QuerySpec { page_size, ..QuerySpec::default() };
        let first = catalog::query(&products, &spec);
        let expected_pages = products.len().div_ceil(page_size).max(1);
        prop_assert_eq!(first.total_pages, expected_pages);
        prop_assert_eq!(first.total_items, products.len());

        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            let result = catalog::query(&products, &QuerySpec { page, ..spec.clone() });
            prop_assert_eq!(result.page, page);
            prop_assert!(result.items.len() <= page_size);
            seen.extend(ids(&result.items));
        }
        prop_assert_eq!(seen, ids(&products));
    }

    #[test]
    fn out_of_range_page_is_clamped(products in products_strategy(40), page in 0usize..1_000) {
        let result = catalog::query(&products, &QuerySpec { page, ..QuerySpec::default() });
        prop_assert!(result.page >= 1);
        prop_assert!(result.page <= result.total_pages);
    }

    #[test]
    fn every_match_satisfies_every_filter(
        products in products_strategy(80),
        category in 0..4usize,
        brand in 0..4usize,
        min in 0u64..25_000,
        span in 0u64..25_000,
    ) {
        let range = PriceRange::new(min, min + span).unwrap();
        let spec = QuerySpec {
            category: Some(CATEGORIES[category].to_string()),
            brand: Some(BRANDS[brand].to_string()),
            price_range: Some(range),
            page_size: usize::MAX,
            ..QuerySpec::default()
        };
        let result = catalog::query(&products, &spec);

        let expected = products
            .iter()
            .filter(|p| p.category == CATEGORIES[category] && p.brand == BRANDS[brand])
            .filter(|p| range.contains(p.price))
            .count();
        prop_assert_eq!(result.total_items, expected);
        for p in &result.items {
            prop_assert_eq!(&p.category, CATEGORIES[category]);
            prop_assert_eq!(&p.brand, BRANDS[brand]);
            prop_assert!(p.price >= min && p.price <= min + span);
        }
    }
}

#[test]
fn test_generated_catalog_first_page() {
    let products = GeneratedCatalog::default().generate();
    let page = catalog::query(&products, &QuerySpec::default());

    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 12);
    assert_eq!(page.total_items, 1000);
    assert_eq!(page.total_pages, 84);
    assert_eq!(ids(&page.items), (1..=12).collect::<Vec<_>>());
}

#[test]
fn test_search_matches_name_or_brand_case_insensitively() {
    let products = GeneratedCatalog::default().generate();
    let brand = products[0].brand.clone();
    let spec = QuerySpec {
        search: Some(format!("  {}  ", brand.to_uppercase())),
        page_size: usize::MAX,
        ..QuerySpec::default()
    };

    let result = catalog::query(&products, &spec);

    assert!(result.total_items > 0);
    let needle = brand.to_lowercase();
    assert!(result.items.iter().all(|p| {
        p.name.to_lowercase().contains(&needle) || p.brand.to_lowercase().contains(&needle)
    }));
}

#[test]
fn test_facets_are_sorted_and_distinct() {
    let products = GeneratedCatalog::default().generate();
    let facets = catalog::facets(&products);

    let mut sorted = facets.categories.clone();
    sorted.sort();
    assert_eq!(facets.categories, sorted);
    let unique: HashSet<&String> = facets.brands.iter().collect();
    assert_eq!(unique.len(), facets.brands.len());
}
