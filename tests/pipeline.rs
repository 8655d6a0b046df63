//! End-to-end pipeline tests over an inline input document.

use serde_json::json;

use subway_export::model::InputDocument;
use subway_export::schema::TransitSchema;
use subway_export::transform::assembler::process;

/// A small two-line city: one station with a way platform and no authored
/// entrances, one with a real entrance node, one bare station, plus a
/// transfer set that also names a station no route uses.
fn sample_document() -> InputDocument {
    let doc = json!({
        "cities": [
            {
                "name": "Testograd",
                "id": 77,
                "elements": {
                    "w40": {"type": "way", "id": 40, "nodes": [41, 42, 43]},
                    "n41": {"type": "node", "id": 41, "lon": 0.003, "lat": 0.0},
                    "n42": {"type": "node", "id": 42, "lon": 0.0031, "lat": 0.0},
                    "n43": {"type": "node", "id": 43, "lon": 0.009, "lat": 0.0}
                },
                "stop_areas": {
                    "r1": {
                        "id": "r1",
                        "name": "Alpha",
                        "center": [0.0, 0.0],
                        "station": "n100",
                        "platforms": ["w40"],
                        "centers": {"r1": [0.0, 0.0], "w40": [0.0, 0.0]}
                    },
                    "r2": {
                        "id": "r2",
                        "name": "Beta",
                        "int_name": "Beta Intl",
                        "center": [0.01, 0.0],
                        "station": "n200",
                        "entrances": ["n201"],
                        "centers": {"r2": [0.01, 0.0], "n201": [0.0105, 0.0]}
                    },
                    "r3": {
                        "id": "r3",
                        "name": "Gamma",
                        "center": [0.02, 0.0],
                        "station": "n300",
                        "centers": {"r3": [0.02, 0.0]}
                    }
                },
                "routes": [
                    {
                        "id": "r500",
                        "mode": "subway",
                        "ref": "1",
                        "name": "First Line",
                        "colour": "#112233",
                        "infill": "#AABBCC",
                        "variants": [
                            {
                                "stops": [
                                    {"stoparea": "r1", "distance": 0.0},
                                    {"stoparea": "r2", "distance": 1200.0},
                                    {"stoparea": "r3", "distance": 2400.0}
                                ],
                                "interval": 4.0
                            },
                            {
                                "stops": [
                                    {"stoparea": "r3", "distance": 0.0},
                                    {"stoparea": "r2", "distance": 1200.0},
                                    {"stoparea": "r1", "distance": 2400.0}
                                ]
                            }
                        ]
                    }
                ]
            }
        ],
        "transfers": [["r1", "r2", "r9"]]
    });
    serde_json::from_value(doc).expect("sample document deserializes")
}

fn run(doc: &InputDocument) -> TransitSchema {
    process(&doc.cities, &doc.transfers, None).expect("pipeline succeeds")
}

#[test]
fn test_every_station_has_entrances_and_exits() {
    let schema = run(&sample_document());

    assert_eq!(schema.stops.len(), 3);
    for stop in &schema.stops {
        assert!(
            !(stop.entrances.is_empty() && stop.exits.is_empty()),
            "{} has neither entrances nor exits",
            stop.name
        );
    }
}

#[test]
fn test_platform_exits_synthesized_for_alpha() {
    let schema = run(&sample_document());

    let alpha = schema.stops.iter().find(|s| s.name == "Alpha").unwrap();
    // Way platform nodes thinned: node 41 anchors the set, node 42 sits
    // within the separation radius, node 43 survives.
    let ids: Vec<_> = alpha.entrances.iter().map(|e| e.osm_id).collect();
    assert_eq!(ids, vec![41, 43]);
    assert_eq!(alpha.entrances, alpha.exits);
    for e in &alpha.entrances {
        assert!(e.distance > 60);
    }
}

#[test]
fn test_real_entrance_preserved_for_beta() {
    let schema = run(&sample_document());

    let beta = schema.stops.iter().find(|s| s.name == "Beta").unwrap();
    assert_eq!(beta.int_name.as_deref(), Some("Beta Intl"));
    assert_eq!(beta.entrances.len(), 1);
    assert_eq!(beta.entrances[0].osm_id, 201);
    // With an authored entrance present, no synthesis runs; the exits list
    // stays empty because none were authored.
    assert!(beta.exits.is_empty());
}

#[test]
fn test_bare_station_falls_back_to_center() {
    let schema = run(&sample_document());

    let gamma = schema.stops.iter().find(|s| s.name == "Gamma").unwrap();
    assert_eq!(gamma.entrances.len(), 1);
    assert_eq!(gamma.entrances[0].osm_id, 300);
    assert_eq!(gamma.entrances[0].distance, 60);
}

#[test]
fn test_network_and_itineraries() {
    let schema = run(&sample_document());

    assert_eq!(schema.networks.len(), 1);
    let network = &schema.networks[0];
    assert_eq!(network.network, "Testograd");
    assert_eq!(network.agency_id, Some(77));

    let route = &network.routes[0];
    assert_eq!(route.mode, "subway");
    assert_eq!(route.colour.as_deref(), Some("AABBCC"));
    assert_eq!(route.casing.as_deref(), Some("112233"));
    // Relation 500 in the typed namespace.
    assert_eq!(route.route_id, 1000);

    assert_eq!(route.itineraries.len(), 2);
    let forward = &route.itineraries[0];
    // 1200 m legs at 40 km/h are 108 s each.
    let seconds: Vec<_> = forward.stops.iter().map(|(_, s)| *s).collect();
    assert_eq!(seconds, vec![0, 108, 108]);
    assert_eq!(forward.interval, 240);
    // Second variant has no headway: 2.5 min default.
    assert_eq!(route.itineraries[1].interval, 150);
}

#[test]
fn test_transfers_skip_stations_without_routes() {
    let schema = run(&sample_document());

    // r9 never appears in a route, so only the r1-r2 pair survives.
    assert_eq!(schema.transfers.len(), 1);
    let edge = schema.transfers[0];
    assert_ne!(edge.0, edge.1);
    assert!(edge.2 > 30);
}

#[test]
fn test_runs_are_deterministic() {
    let doc = sample_document();
    let first = serde_json::to_string(&run(&doc)).unwrap();
    let second = serde_json::to_string(&run(&doc)).unwrap();
    assert_eq!(first, second);
}
