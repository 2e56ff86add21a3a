//! Region and product category labelling plus year-over-year change.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::lookup::LabelIndex;
use crate::metrics::percent_change;
use crate::models::{EnrichedObservation, EnrichmentStats, Observation};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Attaches derived labels and YoY change to clean observations
#[derive(Debug, Clone)]
pub struct Enricher {
    regions: LabelIndex,
    categories: LabelIndex,
}

impl Enricher {
    pub fn new(regions: LabelIndex, categories: LabelIndex) -> Self {
        Self {
            regions,
            categories,
        }
    }

    /// Build the reverse indexes from the configured lookup tables
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let regions = LabelIndex::from_groups(&config.regions)?;
        let categories = LabelIndex::from_groups(&config.categories)?;
        debug!(
            "Lookup indexes: {} area names in {} regions, {} item names in {} categories",
            regions.member_count(),
            regions.labels().len(),
            categories.member_count(),
            categories.labels().len()
        );
        Ok(Self::new(regions, categories))
    }

    pub fn regions(&self) -> &LabelIndex {
        &self.regions
    }

    pub fn categories(&self) -> &LabelIndex {
        &self.categories
    }

    /// Label every observation and compute its YoY change.
    ///
    /// The output is ordered by (area, item, year). YoY compares each
    /// observation with the one before it in that order for the same
    /// (area, item), whatever calendar year that predecessor has.
    pub fn enrich(&self, mut observations: Vec<Observation>) -> (Vec<EnrichedObservation>, EnrichmentStats) {
        observations.sort_by(|a, b| {
            (a.area.as_str(), a.item.as_str(), a.year).cmp(&(b.area.as_str(), b.item.as_str(), b.year))
        });

        let mut enriched: Vec<EnrichedObservation> = Vec::with_capacity(observations.len());
        for obs in observations {
            let yoy_change = match enriched.last() {
                Some(prev) if prev.area == obs.area && prev.item == obs.item => {
                    percent_change(prev.price, obs.price)
                }
                _ => None,
            };

            enriched.push(EnrichedObservation {
                region: self.regions.label_for(&obs.area).to_string(),
                product_category: self.categories.label_for(&obs.item).to_string(),
                area: obs.area,
                item: obs.item,
                element: obs.element,
                year: obs.year,
                price: obs.price,
                yoy_change,
            });
        }

        let stats = enrichment_stats(&enriched);
        info!(
            "Enrichment: {} observations, {} regions, {} categories, {} valid YoY values",
            enriched.len(),
            stats.areas_per_region.len(),
            stats.observations_per_category.len(),
            stats.valid_yoy
        );

        (enriched, stats)
    }
}

fn enrichment_stats(enriched: &[EnrichedObservation]) -> EnrichmentStats {
    let mut areas: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut observations_per_category = BTreeMap::new();

    for obs in enriched {
        areas.entry(&obs.region).or_default().insert(&obs.area);
        *observations_per_category
            .entry(obs.product_category.clone())
            .or_insert(0) += 1;
    }

    EnrichmentStats {
        areas_per_region: areas
            .into_iter()
            .map(|(region, names)| (region.to_string(), names.len()))
            .collect(),
        observations_per_category,
        valid_yoy: enriched.iter().filter(|o| o.yoy_change.is_some()).count(),
    }
}
