//! Headless helpers behind the `footprint` binary.

use std::error::Error;
use std::fs;
use std::path::Path;

use formats::{RegionDataset, VisitedPlaces};
use foundation::math::project;
use scene::{GlobeConfig, RegionBuilder, RegionPicker, RegionRegistry};
use serde::Serialize;
use tracing::info;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Datasets read from disk.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub base: RegionDataset,
    pub detailed: Option<RegionDataset>,
    pub visited: VisitedPlaces,
}

impl Inputs {
    pub fn load(base: &Path, detailed: Option<&Path>, visited: Option<&Path>) -> CliResult<Self> {
        let base = read_dataset(base)?;
        let detailed = detailed.map(read_dataset).transpose()?;
        let visited = match visited {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
                VisitedPlaces::from_json_str(&text)?
            }
            None => VisitedPlaces::new(),
        };
        Ok(Self {
            base,
            detailed,
            visited,
        })
    }

    pub fn build(&self, config: &GlobeConfig) -> RegionRegistry {
        RegionBuilder::new(config.build.clone()).build(
            &self.base,
            self.detailed.as_ref(),
            &self.visited,
        )
    }
}

fn read_dataset(path: &Path) -> CliResult<RegionDataset> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let dataset = RegionDataset::from_geojson_str(&text)?;
    info!(
        path = %path.display(),
        features = dataset.len(),
        skipped = dataset.skipped,
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn load_config(path: Option<&Path>) -> CliResult<GlobeConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
            Ok(GlobeConfig::from_json_str(&text)?)
        }
        None => Ok(GlobeConfig::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub regions: usize,
    pub visited_regions: usize,
    pub filled_regions: usize,
    pub subdivisions: usize,
    pub primitives: usize,
    pub features_seen: usize,
    pub features_skipped: usize,
    pub degenerate_rings: usize,
    pub fallback_discs: usize,
    /// Visited ids that name no built region.
    pub unmatched_visited: Vec<String>,
}

pub fn summarize(
    registry: &RegionRegistry,
    visited: &VisitedPlaces,
    config: &GlobeConfig,
) -> Summary {
    let stats = registry.stats();
    let country = config.build.detailed_country.as_str();
    Summary {
        regions: registry.len(),
        visited_regions: registry.visited_count(),
        filled_regions: registry.iter().filter(|(_, r)| r.has_fill()).count(),
        subdivisions: registry.subdivisions_of(country).len(),
        primitives: registry.primitive_count(),
        features_seen: stats.features_seen,
        features_skipped: stats.features_skipped,
        degenerate_rings: stats.degenerate_rings,
        fallback_discs: stats.fallback_discs,
        unmatched_visited: visited
            .iter()
            .filter(|id| !registry.contains(id))
            .map(str::to_string)
            .collect(),
    }
}

/// Resolves the region at a geographic position on the globe surface.
pub fn pick_at<'a>(
    registry: &'a RegionRegistry,
    config: &GlobeConfig,
    lat_deg: f64,
    lon_deg: f64,
) -> Option<&'a str> {
    let radius = config.build.globe_radius;
    let picker = RegionPicker::new(config.pick.clone(), radius);
    let hit = picker.resolve_point(registry, project(lat_deg, lon_deg, radius))?;
    registry.get(hit.region).map(|r| r.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::{Inputs, pick_at, summarize};
    use formats::{RegionDataset, VisitedPlaces};
    use pretty_assertions::assert_eq;
    use scene::GlobeConfig;

    const BASE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "中国"},
             "geometry": {"type": "Polygon", "coordinates": [[[80,20],[130,20],[130,50],[80,50],[80,20]]]}},
            {"type": "Feature", "properties": {"name": "Japan"},
             "geometry": {"type": "Polygon", "coordinates": [[[130,31],[145,31],[145,45],[130,45],[130,31]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
        ]
    }"#;

    const DETAILED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "中国"},
             "geometry": {"type": "Polygon", "coordinates": [[[80,20],[130,20],[130,50],[80,50],[80,20]]]}},
            {"type": "Feature", "properties": {"name": "北京", "cp": [116.4, 39.9]},
             "geometry": {"type": "Polygon", "coordinates": [[[115.9,39.4],[116.9,39.4],[116.9,40.4],[115.9,40.4],[115.9,39.4]]]}}
        ]
    }"#;

    fn inputs(visited: &[&str]) -> Inputs {
        Inputs {
            base: RegionDataset::from_geojson_str(BASE).expect("base"),
            detailed: Some(RegionDataset::from_geojson_str(DETAILED).expect("detailed")),
            visited: visited.iter().copied().collect::<VisitedPlaces>(),
        }
    }

    #[test]
    fn summary_counts_regions_and_unmatched_ids() {
        let config = GlobeConfig::default();
        let inputs = inputs(&["Japan", "中国-北京", "Atlantis"]);
        let registry = inputs.build(&config);
        let summary = summarize(&registry, &inputs.visited, &config);

        assert_eq!(summary.regions, 3);
        assert_eq!(summary.visited_regions, 2);
        assert_eq!(summary.filled_regions, 2);
        assert_eq!(summary.subdivisions, 1);
        assert_eq!(summary.features_skipped, 1);
        assert_eq!(summary.unmatched_visited, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn pick_resolves_subdivision_and_neighbors() {
        let config = GlobeConfig::default();
        let registry = inputs(&[]).build(&config);

        assert_eq!(pick_at(&registry, &config, 39.9, 116.4), Some("中国-北京"));
        assert_eq!(pick_at(&registry, &config, 38.0, 140.0), Some("Japan"));
        assert_eq!(pick_at(&registry, &config, 30.0, 100.0), Some("中国"));
    }
}
