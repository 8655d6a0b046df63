//! Output document consumed by the routing client.

use serde::{Deserialize, Serialize};

use crate::model::ElementKind;

/// One entrance or exit of a station, real or synthesized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntranceRecord {
    pub osm_type: ElementKind,
    pub osm_id: u64,
    pub lon: f64,
    pub lat: f64,
    /// Walking time to the station center, in seconds.
    pub distance: u64,
}

/// One station referenced by at least one route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: u64,
    pub name: String,
    pub int_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub osm_type: ElementKind,
    pub osm_id: u64,
    pub entrances: Vec<EntranceRecord>,
    pub exits: Vec<EntranceRecord>,
}

/// One concrete stop sequence of a route. Stop entries are
/// `[encoded id, seconds from previous stop]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRecord {
    pub stops: Vec<(u64, u64)>,
    /// Headway in seconds.
    pub interval: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(rename = "type")]
    pub mode: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub name: String,
    pub colour: Option<String>,
    /// Secondary casing colour for shared-track sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub casing: Option<String>,
    pub route_id: u64,
    pub itineraries: Vec<ItineraryRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub network: String,
    pub routes: Vec<RouteRecord>,
    pub agency_id: Option<i64>,
}

/// A walkable transfer between two stations: `[id_a, id_b, seconds]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEdge(pub u64, pub u64, pub u64);

/// The complete export for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitSchema {
    pub stops: Vec<StationRecord>,
    pub transfers: Vec<TransferEdge>,
    pub networks: Vec<NetworkRecord>,
}
