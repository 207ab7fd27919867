//! Leaflet markers and map extent.

use geo::{BoundingRect, Centroid};
use geo_types::{MultiPoint, Point};
use serde::Serialize;

use crate::classify::SeverityTier;
use crate::constants::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM};
use crate::render::palette::tier_color;
use crate::sample::SampleId;
use crate::view::DatasetView;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: SampleId,
    pub latitude: f64,
    pub longitude: f64,
    pub pollution_index: Option<f64>,
    pub tier: SeverityTier,
    pub color: &'static str,
}

impl MapMarker {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// One marker per sample with a known location, in view order.
pub fn markers(view: &DatasetView) -> Vec<MapMarker> {
    view.rows()
        .iter()
        .filter_map(|row| {
            let p = row.location().point()?;
            let tier = row.worst_tier();
            Some(MapMarker {
                id: row.id().clone(),
                latitude: p.y(),
                longitude: p.x(),
                pollution_index: row.pollution_index(),
                tier,
                color: tier_color(tier),
            })
        })
        .collect()
}

/// `[lat, lng]` pairs as Leaflet expects them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapExtent {
    pub center: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f64; 2]; 2]>,
}

impl Default for MapExtent {
    fn default() -> Self {
        MapExtent {
            center: [DEFAULT_MAP_CENTER.0, DEFAULT_MAP_CENTER.1],
            zoom: Some(DEFAULT_MAP_ZOOM),
            bounds: None,
        }
    }
}

/// Centroid and bounding rectangle of the markers; the default view when none exist.
/// A zoom is only suggested for the default; otherwise the client fits `bounds`.
pub fn extent(markers: &[MapMarker]) -> MapExtent {
    let points: MultiPoint<f64> = markers.iter().map(MapMarker::point).collect();
    let (Some(center), Some(rect)) = (points.centroid(), points.bounding_rect()) else {
        return MapExtent::default();
    };
    MapExtent {
        center: [center.y(), center.x()],
        zoom: None,
        bounds: Some([[rect.min().y, rect.min().x], [rect.max().y, rect.max().x]]),
    }
}
