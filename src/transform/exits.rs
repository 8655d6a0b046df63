//! Synthetic exit points for stations without authored entrances.
//!
//! Many stations in the source data carry no entrance/exit geometry at all.
//! The output schema requires at least one of each, so we derive walkable
//! points from the station's platform geometry instead: flatten the platform
//! into its constituent nodes, then thin them out so the surviving points
//! are spatially distinct.

use std::collections::HashMap;

use geo::Point;
use tracing::debug;

use crate::model::{Element, ElementKind, ElementRef};
use crate::transform::travel::distance;

/// A platform node usable as a synthetic entrance/exit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformNode {
    pub id: u64,
    pub lon: f64,
    pub lat: f64,
}

impl PlatformNode {
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// Flattens a platform element into its ordered point geometry.
///
/// A node is a single point; a way contributes its nodes in order; a
/// relation contributes the nodes of its way members in member order.
/// References that cannot be resolved in the element table degrade to
/// fewer points rather than failing: incomplete platform geometry is
/// common in the source data.
pub fn flatten_platform(
    platform: &Element,
    elements: &HashMap<ElementRef, Element>,
) -> Vec<PlatformNode> {
    match platform {
        Element::Node { id, lon, lat } => vec![PlatformNode {
            id: *id,
            lon: *lon,
            lat: *lat,
        }],
        Element::Way { nodes, .. } => resolve_nodes(nodes, elements),
        Element::Relation { members, .. } => {
            let mut points = Vec::new();
            for member in members {
                if member.kind != ElementKind::Way {
                    continue;
                }
                let way_ref = ElementRef::new(ElementKind::Way, member.id);
                match elements.get(&way_ref) {
                    Some(Element::Way { nodes, .. }) => {
                        points.extend(resolve_nodes(nodes, elements));
                    }
                    _ => {
                        debug!(way = %way_ref, "platform member way missing from element table");
                    }
                }
            }
            points
        }
    }
}

fn resolve_nodes(ids: &[u64], elements: &HashMap<ElementRef, Element>) -> Vec<PlatformNode> {
    let mut points = Vec::with_capacity(ids.len());
    for &id in ids {
        match elements.get(&ElementRef::node(id)) {
            Some(Element::Node { id, lon, lat }) => points.push(PlatformNode {
                id: *id,
                lon: *lon,
                lat: *lat,
            }),
            _ => {
                debug!(node = id, "platform node missing from element table");
            }
        }
    }
    points
}

/// Greedy spatial thinning of platform points into a minimal exit set.
///
/// The first point is always kept and fixes the minimum separation radius
/// at 2/3 of its distance from the station center. Later points are dropped
/// when they sit closer to the center than that radius, or within the
/// radius of an already-accepted exit. The 2/3 factor is historical; keep
/// it as-is unless the client's expectations change.
pub fn synthesize_exits(center: Point, nodes: &[PlatformNode]) -> Vec<PlatformNode> {
    let Some((first, rest)) = nodes.split_first() else {
        return Vec::new();
    };
    let mut exits = vec![*first];

    let radius = distance(center, first.point()) * 2.0 / 3.0;
    if radius == 0.0 {
        // Center coincides with the first point: no meaningful threshold,
        // keep just the one representative.
        return exits;
    }

    for node in rest {
        if distance(center, node.point()) < radius {
            continue;
        }
        let too_close = exits
            .iter()
            .any(|e| distance(e.point(), node.point()) < radius);
        if !too_close {
            exits.push(*node);
        }
    }
    exits
}
