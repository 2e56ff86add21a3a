//! Multi-level aggregation of the enriched long table.

use crate::metrics::{mean, std_dev, summarize_by};
use crate::models::{
    CountryCategoryMetrics, CountryMetrics, EnrichedObservation, ProductMetrics, RegionalAggregate,
};
use std::collections::BTreeMap;
use tracing::info;

/// The five output tables of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTables {
    pub clean_long: Vec<EnrichedObservation>,
    pub country: Vec<CountryMetrics>,
    pub product: Vec<ProductMetrics>,
    pub regional: Vec<RegionalAggregate>,
    pub country_category: Vec<CountryCategoryMetrics>,
}

/// Build every output table from the enriched long table.
///
/// Region and category are functions of the area and item names, so carrying
/// them in the grouping key never splits a group.
pub fn aggregate(enriched: Vec<EnrichedObservation>) -> AggregateTables {
    let country = summarize_by(&enriched, |o| (o.area.clone(), o.region.clone()))
        .into_iter()
        .map(|((area, region), summary)| CountryMetrics {
            area,
            region,
            summary,
        })
        .collect();

    let product = summarize_by(&enriched, |o| (o.item.clone(), o.product_category.clone()))
        .into_iter()
        .map(|((item, product_category), summary)| ProductMetrics {
            item,
            product_category,
            summary,
        })
        .collect();

    let country_category = summarize_by(&enriched, |o| {
        (o.area.clone(), o.region.clone(), o.product_category.clone())
    })
    .into_iter()
    .map(|((area, region, product_category), summary)| CountryCategoryMetrics {
        area,
        region,
        product_category,
        summary,
    })
    .collect();

    let tables = AggregateTables {
        regional: regional_aggregates(&enriched),
        clean_long: enriched,
        country,
        product,
        country_category,
    };

    info!(
        "Aggregated {} observations: {} countries, {} products, {} regional groups, {} country-category groups",
        tables.clean_long.len(),
        tables.country.len(),
        tables.product.len(),
        tables.regional.len(),
        tables.country_category.len()
    );

    tables
}

/// Price distribution per (region, year, category)
pub fn regional_aggregates(enriched: &[EnrichedObservation]) -> Vec<RegionalAggregate> {
    let mut groups: BTreeMap<(&str, i32, &str), Vec<f64>> = BTreeMap::new();
    for obs in enriched {
        groups
            .entry((obs.region.as_str(), obs.year, obs.product_category.as_str()))
            .or_default()
            .push(obs.price);
    }

    groups
        .into_iter()
        .map(|((region, year, product_category), prices)| RegionalAggregate {
            region: region.to_string(),
            year,
            product_category: product_category.to_string(),
            avg_price: mean(&prices),
            std_price: (prices.len() > 1).then(|| std_dev(&prices, 1)),
            min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: prices.len(),
        })
        .collect()
}
