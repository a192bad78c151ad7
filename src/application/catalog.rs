use crate::domain::catalog::{CatalogPage, Facets, QuerySpec, SortKey};
use crate::domain::product::Product;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Filters, sorts and paginates `products` according to `spec`.
///
/// Stages run in a fixed order: category, search term, brand, price range, sort, page.
/// The sort is stable, so ties and `SortKey::None` keep the filter-stage order.
/// Out-of-range pages are clamped and never panic.
pub fn query(products: &[Product], spec: &QuerySpec) -> CatalogPage {
    let category = spec.category_filter();
    let term = spec.search_term();

    let mut filtered: Vec<&Product> = products
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| {
            term.as_deref().is_none_or(|t| {
                p.name.to_lowercase().contains(t) || p.brand.to_lowercase().contains(t)
            })
        })
        .filter(|p| spec.brand.as_deref().is_none_or(|b| p.brand == b))
        .filter(|p| spec.price_range.is_none_or(|range| range.contains(p.price)))
        .collect();

    match spec.sort {
        SortKey::None => {}
        SortKey::PriceAsc => filtered.sort_by_key(|p| p.price),
        SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::RatingDesc => filtered.sort_by(|a, b| {
            b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
        }),
    }

    let page_size = spec.page_size();
    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = spec.page.clamp(1, total_pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    CatalogPage {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// Sorted, de-duplicated categories and brands present in `products`.
pub fn facets(products: &[Product]) -> Facets {
    let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
    let brands: BTreeSet<&str> = products.iter().map(|p| p.brand.as_str()).collect();
    Facets {
        categories: categories.into_iter().map(str::to_string).collect(),
        brands: brands.into_iter().map(str::to_string).collect(),
    }
}
