//! GeoJSON region datasets.
//!
//! Only what the globe needs is kept: a region name, its polygon rings and an
//! optional centroid hint (`properties.cp`). Malformed features are skipped and
//! counted; they never fail the whole dataset.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::DatasetError;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Ordered ring of points; open or implicitly closed.
pub type Ring = Vec<GeoPoint>;

/// Outer ring first, holes after it.
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub name: String,
    pub polygons: Vec<Polygon>,
    pub centroid_hint: Option<GeoPoint>,
}

impl RegionFeature {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            polygons,
            centroid_hint: None,
        }
    }

    pub fn with_centroid_hint(mut self, hint: GeoPoint) -> Self {
        self.centroid_hint = Some(hint);
        self
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }

    pub fn point_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionDataset {
    pub features: Vec<RegionFeature>,
    /// Features dropped during parsing (no name, unsupported geometry, bad shape).
    pub skipped: usize,
}

impl RegionDataset {
    pub fn new(features: Vec<RegionFeature>) -> Self {
        Self {
            features,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, name: &str) -> Option<&RegionFeature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| DatasetError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, DatasetError> {
        let obj = value
            .as_object()
            .ok_or(DatasetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(DatasetError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureCollection)?;

        let mut out = RegionDataset::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            match parse_feature(feat_val) {
                Ok(feature) => out.features.push(feature),
                Err(reason) => {
                    warn!(index, %reason, "skipping region feature");
                    out.skipped += 1;
                }
            }
        }
        debug!(
            features = out.features.len(),
            skipped = out.skipped,
            "parsed region dataset"
        );
        Ok(out)
    }
}

fn parse_feature(value: &Value) -> Result<RegionFeature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;
    let properties = obj.get("properties").and_then(|v| v.as_object());

    let name = feature_name(obj, properties).ok_or("feature has no name".to_string())?;

    let polygons = match obj.get("geometry") {
        None | Some(Value::Null) => Vec::new(),
        Some(geometry) => parse_geometry(geometry)?,
    };

    let centroid_hint = properties
        .and_then(|p| p.get("cp"))
        .and_then(parse_point);

    Ok(RegionFeature {
        name,
        polygons,
        centroid_hint,
    })
}

fn feature_name(
    obj: &Map<String, Value>,
    properties: Option<&Map<String, Value>>,
) -> Option<String> {
    properties
        .and_then(|p| p.get("name"))
        .or_else(|| obj.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn parse_geometry(value: &Value) -> Result<Vec<Polygon>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(vec![parse_polygon(coords)?]),
        "MultiPolygon" => parse_multi_polygon(coords),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

/// `[lon, lat, ...]`; extra ordinates (altitude) are ignored.
fn parse_point(value: &Value) -> Option<GeoPoint> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    let lon = arr[0].as_f64()?;
    let lat = arr[1].as_f64()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    Some(GeoPoint::new(lon, lat))
}

fn parse_ring(value: &Value) -> Result<Ring, String> {
    let arr = value
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let ring: Ring = arr.iter().filter_map(parse_point).collect();
    if ring.len() != arr.len() {
        debug!(
            dropped = arr.len() - ring.len(),
            "dropped malformed positions from ring"
        );
    }
    Ok(ring)
}

fn parse_polygon(coords: &Value) -> Result<Polygon, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_ring).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Polygon>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_polygon).collect()
}
