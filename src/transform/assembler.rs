//! Assembly of the output graph: networks, routes, itineraries, stops,
//! and transfer edges.
//!
//! One pass over cities -> routes -> variants -> stop visits builds the
//! network records and registers every referenced stop area; a second pass
//! over the registry emits the station records, reusing exits synthesized
//! during the first pass for stations without authored entrance geometry.

use std::collections::HashMap;

use geo::Point;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::CityCache;
use crate::model::{City, ElementKind, ElementRef, StopArea, Transfer};
use crate::schema::{
    EntranceRecord, ItineraryRecord, NetworkRecord, RouteRecord, StationRecord, TransferEdge,
    TransitSchema,
};
use crate::transform::exits::{PlatformNode, flatten_platform, synthesize_exits};
use crate::transform::ids::{InvalidReference, encode, encode_typed};
use crate::transform::travel::{ENTRANCE_ALLOWANCE_SECONDS, SpeedProfiles};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    InvalidReference(#[from] InvalidReference),

    #[error("stop area {stoparea} referenced by a route is missing from city {city:?}")]
    UnknownStopArea { stoparea: ElementRef, city: String },
}

/// Insertion-ordered registry of stop areas referenced by at least one
/// route variant. First registration wins; iteration order is the order
/// of first reference, which keeps the stop list deterministic.
#[derive(Default)]
struct StopRegistry {
    order: Vec<ElementRef>,
    areas: HashMap<ElementRef, StopArea>,
}

impl StopRegistry {
    fn register(&mut self, area: &StopArea) {
        if !self.areas.contains_key(&area.id) {
            self.order.push(area.id);
            self.areas.insert(area.id, area.clone());
        }
    }

    fn get(&self, id: &ElementRef) -> Option<&StopArea> {
        self.areas.get(id)
    }

    fn iter(&self) -> impl Iterator<Item = &StopArea> {
        self.order.iter().filter_map(|id| self.areas.get(id))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Per-run state threaded through the pipeline.
struct Context {
    speeds: SpeedProfiles,
    registry: StopRegistry,
    /// Synthesized exits, computed at most once per platform.
    platform_exits: HashMap<ElementRef, Vec<PlatformNode>>,
}

impl Context {
    fn new(speeds: SpeedProfiles) -> Self {
        Self {
            speeds,
            registry: StopRegistry::default(),
            platform_exits: HashMap::new(),
        }
    }
}

/// Transforms a validated city set into the routing client's schema.
///
/// The optional cache is the merge point for cross-run incremental
/// processing; its entries are currently read but not spliced into the
/// output, so every run recomputes all cities.
pub fn process(
    cities: &[City],
    transfers: &[Transfer],
    cache: Option<&CityCache>,
) -> Result<TransitSchema, ProcessError> {
    if let Some(cache) = cache {
        for city_name in cache.unprocessed(cities) {
            // TODO: splice this city's cached network, stops and transfers
            // into the output instead of dropping them.
            debug!(city = city_name, "cached city not in current run, entry unused");
        }
    }

    let mut ctx = Context::new(SpeedProfiles::default());

    let mut networks = Vec::with_capacity(cities.len());
    for city in cities {
        let network = assemble_network(city, &mut ctx)?;
        info!(
            city = %city.name,
            routes = network.routes.len(),
            "assembled network"
        );
        networks.push(network);
    }

    let stops = assemble_stops(&ctx);
    let transfer_edges = assemble_transfers(transfers, &ctx);

    info!(
        stops = stops.len(),
        transfers = transfer_edges.len(),
        networks = networks.len(),
        "assembly complete"
    );

    Ok(TransitSchema {
        stops,
        transfers: transfer_edges,
        networks,
    })
}

/// Strips the leading `#` from an authored colour.
fn format_colour(colour: Option<&str>) -> Option<String> {
    colour.map(|c| c.strip_prefix('#').unwrap_or(c).to_string())
}

fn assemble_network(city: &City, ctx: &mut Context) -> Result<NetworkRecord, ProcessError> {
    let mut routes = Vec::with_capacity(city.routes.len());

    for route in &city.routes {
        let mut colour = format_colour(route.colour.as_deref());
        let mut casing = None;
        if let Some(infill) = route.infill.as_deref() {
            // Dual-coloured shared track: the infill becomes the primary
            // colour and the original colour becomes the casing.
            casing = colour.take();
            colour = format_colour(Some(infill));
        }

        let mut itineraries = Vec::with_capacity(route.variants.len());
        for variant in &route.variants {
            let mut stops = Vec::with_capacity(variant.stops.len());
            let mut prev_distance = None;

            for visit in &variant.stops {
                let area = city.stop_areas.get(&visit.stoparea).ok_or_else(|| {
                    ProcessError::UnknownStopArea {
                        stoparea: visit.stoparea,
                        city: city.name.clone(),
                    }
                })?;
                ctx.registry.register(area);

                let leg_meters = match prev_distance {
                    Some(prev) => visit.distance - prev,
                    None => visit.distance,
                };
                prev_distance = Some(visit.distance);
                stops.push((encode(area.id), ctx.speeds.line_seconds(leg_meters)));

                if !area.has_authored_exits() {
                    synthesize_platform_exits(city, area, ctx);
                }
            }

            itineraries.push(ItineraryRecord {
                stops,
                interval: ctx.speeds.interval_seconds(variant.interval),
            });
        }

        routes.push(RouteRecord {
            mode: route.mode.clone(),
            ref_: route.ref_.clone(),
            name: route.name.clone(),
            colour,
            casing,
            route_id: encode_typed(route.id, ElementKind::Relation)?,
            itineraries,
        });
    }

    Ok(NetworkRecord {
        network: city.name.clone(),
        routes,
        agency_id: city.id,
    })
}

/// Resolves each of the stop area's platforms to point geometry and runs
/// exit synthesis, once per platform across the whole run.
fn synthesize_platform_exits(city: &City, area: &StopArea, ctx: &mut Context) {
    for platform in &area.platforms {
        if ctx.platform_exits.contains_key(platform) {
            continue;
        }
        let nodes = match city.elements.get(platform) {
            Some(element) => flatten_platform(element, &city.elements),
            None => {
                // Missing platform geometry is common in noisy input;
                // degrade to the station-center fallback at stop assembly.
                debug!(platform = %platform, stop = %area.id, "platform missing from element table");
                Vec::new()
            }
        };
        let center = area
            .centers
            .get(platform)
            .map(|c| Point::new(c[0], c[1]))
            .unwrap_or_else(|| area.center_point());
        ctx.platform_exits
            .insert(*platform, synthesize_exits(center, &nodes));
    }
}

fn assemble_stops(ctx: &Context) -> Vec<StationRecord> {
    let mut records = Vec::with_capacity(ctx.registry.len());

    for area in ctx.registry.iter() {
        let center = area.center_point();

        let walkable = |refs: &[ElementRef]| -> Vec<EntranceRecord> {
            refs.iter()
                .filter(|r| r.kind == ElementKind::Node)
                .filter_map(|r| {
                    let coords = area.centers.get(r)?;
                    let point = Point::new(coords[0], coords[1]);
                    Some(EntranceRecord {
                        osm_type: ElementKind::Node,
                        osm_id: r.id,
                        lon: coords[0],
                        lat: coords[1],
                        distance: ctx.speeds.entrance_seconds(point, center),
                    })
                })
                .collect()
        };

        let mut entrances = walkable(&area.entrances);
        let mut exits = walkable(&area.exits);

        if entrances.is_empty() && exits.is_empty() {
            // The synthesized set serves both directions.
            let synthetic = synthetic_records(area, center, ctx);
            entrances = synthetic.clone();
            exits = synthetic;
        }

        records.push(StationRecord {
            id: encode(area.id),
            name: area.name.clone(),
            int_name: area.int_name.clone(),
            lat: area.center[1],
            lon: area.center[0],
            osm_type: area.station.kind,
            osm_id: area.station.id,
            entrances,
            exits,
        });
    }

    records
}

/// Entrance records from synthesized platform exits, falling back to a
/// single record at the station's own center when no platform yields any.
fn synthetic_records(area: &StopArea, center: Point, ctx: &Context) -> Vec<EntranceRecord> {
    let mut records = Vec::new();
    for platform in &area.platforms {
        let Some(nodes) = ctx.platform_exits.get(platform) else {
            continue;
        };
        for node in nodes {
            records.push(EntranceRecord {
                osm_type: ElementKind::Node,
                osm_id: node.id,
                lon: node.lon,
                lat: node.lat,
                distance: ctx.speeds.entrance_seconds(node.point(), center),
            });
        }
    }

    if records.is_empty() {
        let coords = area.centers.get(&area.id).copied().unwrap_or(area.center);
        records.push(EntranceRecord {
            osm_type: area.station.kind,
            osm_id: area.station.id,
            lon: coords[0],
            lat: coords[1],
            distance: ENTRANCE_ALLOWANCE_SECONDS,
        });
    }

    records
}

fn assemble_transfers(transfers: &[Transfer], ctx: &Context) -> Vec<TransferEdge> {
    let mut edges = Vec::new();

    for set in transfers {
        for (i, a) in set.iter().enumerate() {
            for b in &set[i + 1..] {
                if a == b {
                    continue;
                }
                let (Some(area_a), Some(area_b)) = (ctx.registry.get(a), ctx.registry.get(b))
                else {
                    // Transfers may reference stations no route uses.
                    continue;
                };
                edges.push(TransferEdge(
                    encode(*a),
                    encode(*b),
                    ctx.speeds
                        .transfer_seconds(area_a.center_point(), area_b.center_point()),
                ));
            }
        }
    }

    edges
}
