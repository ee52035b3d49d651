//! Ring-encoded polygons to GeoJSON polygons.

use geo::{BoundingRect, Contains};
use geo_types::{Coord, LineString, Point, Polygon};

use crate::error::LookupError;
use crate::models::{Coordinate, PolygonGeometry};

/// Reinterpret upstream rings as polygon rings.
///
/// Ring 0 becomes the outer boundary and later rings become holes. Coordinate
/// order and winding are kept exactly as received.
pub fn rings_to_polygon(rings: Option<Vec<Vec<Vec<f64>>>>) -> Result<PolygonGeometry, LookupError> {
    let rings = rings.unwrap_or_default();

    match rings.first() {
        None => {
            return Err(LookupError::LookupFailed(
                "matched feature has no rings".to_string(),
            ))
        }
        Some(outer) if outer.is_empty() => {
            return Err(LookupError::LookupFailed(
                "matched feature has an empty outer ring".to_string(),
            ))
        }
        Some(_) => {}
    }

    if rings.iter().flatten().any(|position| position.len() < 2) {
        return Err(LookupError::LookupFailed(
            "ring position with fewer than two ordinates".to_string(),
        ));
    }

    Ok(PolygonGeometry::new(rings))
}

fn ring_to_line_string(ring: &[Vec<f64>]) -> LineString<f64> {
    ring.iter()
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect::<Vec<_>>()
        .into()
}

/// Planar polygon for spatial predicates. Not used for output, since
/// `Polygon::new` closes open rings.
pub fn to_geo_polygon(geometry: &PolygonGeometry) -> Option<Polygon<f64>> {
    let outer = geometry.outer_ring()?;
    if outer.iter().any(|p| p.len() < 2) {
        return None;
    }
    let interiors = geometry
        .holes()
        .iter()
        .filter(|ring| ring.iter().all(|p| p.len() >= 2))
        .map(|ring| ring_to_line_string(ring))
        .collect();
    Some(Polygon::new(ring_to_line_string(outer), interiors))
}

/// `[minX, minY, maxX, maxY]` of the outer ring
pub fn outer_bbox(geometry: &PolygonGeometry) -> Option<[f64; 4]> {
    let polygon = to_geo_polygon(geometry)?;
    let rect = polygon.exterior().bounding_rect()?;
    Some([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

/// Whether the polygon covers the query point (holes excluded)
pub fn contains_point(geometry: &PolygonGeometry, coord: &Coordinate) -> bool {
    to_geo_polygon(geometry)
        .map(|polygon| polygon.contains(&Point::new(coord.lng, coord.lat)))
        .unwrap_or(false)
}
