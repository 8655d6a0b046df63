//! Validated input model for a processed city set.
//!
//! Everything here is read-only for the duration of a run. The upstream
//! extractor/validator is responsible for producing a consistent document;
//! this crate only transforms it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::transform::ids::InvalidReference;

/// Kind of a raw geographic element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'n' => Some(Self::Node),
            'w' => Some(Self::Way),
            'r' => Some(Self::Relation),
            _ => None,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Self::Node => 'n',
            Self::Way => 'w',
            Self::Relation => 'r',
        }
    }

    /// Full lowercase name as used in the output schema.
    pub fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    /// Low-bit tag used by the identifier codec.
    pub fn tag(self) -> u64 {
        match self {
            Self::Node => 0,
            Self::Way => 2,
            Self::Relation => 3,
        }
    }
}

/// A typed reference to a raw element, parsed once from its `"n123"` /
/// `"w45"` / `"r6"` string form at the document boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: u64,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn node(id: u64) -> Self {
        Self::new(ElementKind::Node, id)
    }
}

impl FromStr for ElementRef {
    type Err = InvalidReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = chars
            .next()
            .and_then(ElementKind::from_prefix)
            .ok_or_else(|| InvalidReference::Malformed(s.to_string()))?;
        let id = chars
            .as_str()
            .parse::<u64>()
            .map_err(|_| InvalidReference::Malformed(s.to_string()))?;
        Ok(Self { kind, id })
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}

// Serialized as the compact string form so refs can key JSON maps.
impl Serialize for ElementRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A raw geographic primitive from the source extract.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node { id: u64, lon: f64, lat: f64 },
    Way { id: u64, nodes: Vec<u64> },
    Relation { id: u64, members: Vec<Member> },
}

impl Element {
    pub fn reference(&self) -> ElementRef {
        match self {
            Element::Node { id, .. } => ElementRef::new(ElementKind::Node, *id),
            Element::Way { id, .. } => ElementRef::new(ElementKind::Way, *id),
            Element::Relation { id, .. } => ElementRef::new(ElementKind::Relation, *id),
        }
    }
}

/// A member entry of a relation element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(rename = "ref")]
    pub id: u64,
}

/// A station aggregate: the physical station element plus its platforms
/// and any authored entrance/exit geometry.
#[derive(Clone, Debug, Deserialize)]
pub struct StopArea {
    pub id: ElementRef,
    pub name: String,
    #[serde(default)]
    pub int_name: Option<String>,
    /// `[lon, lat]` of the aggregate center.
    pub center: [f64; 2],
    /// The physical station element.
    pub station: ElementRef,
    #[serde(default)]
    pub platforms: Vec<ElementRef>,
    #[serde(default)]
    pub entrances: Vec<ElementRef>,
    #[serde(default)]
    pub exits: Vec<ElementRef>,
    /// Center coordinates for every sub-element, including the stop area
    /// itself under its own ref.
    #[serde(default)]
    pub centers: HashMap<ElementRef, [f64; 2]>,
}

impl StopArea {
    pub fn center_point(&self) -> Point {
        Point::new(self.center[0], self.center[1])
    }

    pub fn has_authored_exits(&self) -> bool {
        !self.entrances.is_empty() || !self.exits.is_empty()
    }
}

/// One stop-visit of a route variant.
#[derive(Clone, Debug, Deserialize)]
pub struct StopVisit {
    pub stoparea: ElementRef,
    /// Cumulative distance from the variant start, in meters.
    pub distance: f64,
}

/// One concrete ordered path of stops for a route.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteVariant {
    pub stops: Vec<StopVisit>,
    /// Headway in minutes, if the variant specifies one.
    #[serde(default)]
    pub interval: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Route {
    /// The route master relation.
    pub id: ElementRef,
    pub mode: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub name: String,
    #[serde(default)]
    pub colour: Option<String>,
    /// Secondary colour for shared-track sections.
    #[serde(default)]
    pub infill: Option<String>,
    pub variants: Vec<RouteVariant>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct City {
    pub name: String,
    /// Agency id, when the source network has one.
    #[serde(default)]
    pub id: Option<i64>,
    pub routes: Vec<Route>,
    /// Raw element table used to resolve platform geometry.
    #[serde(default)]
    pub elements: HashMap<ElementRef, Element>,
    /// Stop areas referenced by this city's route variants.
    #[serde(default)]
    pub stop_areas: HashMap<ElementRef, StopArea>,
}

/// A set of stop areas considered walkably interchangeable.
pub type Transfer = Vec<ElementRef>;

/// The whole validated input document for one run.
#[derive(Clone, Debug, Deserialize)]
pub struct InputDocument {
    pub cities: Vec<City>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}
