use gwpp::generate::paper_network;
use gwpp::length::{arc_length, assign_lengths, min_length, shift_to_non_negative};
use gwpp::rewrite::{DisplacedArc, contract};
use gwpp::saturation::most_saturated_arc;
use gwpp::{Arc, Error, Network};

fn path(nodes: &[&str]) -> Vec<String> {
    nodes.iter().map(|s| s.to_string()).collect()
}

fn lengths(network: &Network) -> Vec<f64> {
    network.arcs().map(|(_, a)| a.length()).collect()
}

#[test]
fn length_assignment_is_idempotent() {
    let mut network = paper_network().unwrap();
    assign_lengths(&mut network);
    let first = lengths(&network);
    assign_lengths(&mut network);
    assert_eq!(first, lengths(&network));

    let s4 = network.arc("S", "4").unwrap().length();
    assert!((s4 - -(8.2f64).ln()).abs() < 1e-12);
    let n45 = network.arc("4", "5").unwrap().length();
    assert!((n45 - -(0.68f64).ln()).abs() < 1e-12);
}

#[test]
fn shifting_makes_every_length_positive() {
    let mut network = paper_network().unwrap();
    assign_lengths(&mut network);
    let min = min_length(&network).unwrap();
    assert!(min < 0.0);

    let shift = shift_to_non_negative(&mut network);
    assert!((shift - (1.0 - min)).abs() < 1e-12);
    assert!(lengths(&network).iter().all(|&l| l >= 1.0 - 1e-12));
}

#[test]
fn contraction_replaces_the_saturated_arc_with_a_source_arc() {
    let mut network = paper_network().unwrap();
    assign_lengths(&mut network);
    let arcs_before = network.arc_count();

    let p = path(&["S", "4", "3", "5", "6", "T"]);
    let saturated = most_saturated_arc(&network, &p).unwrap();
    assert_eq!((saturated.from.as_str(), saturated.to.as_str()), ("5", "6"));

    let displaced = contract(&mut network, &p, &saturated, 0.0).unwrap();
    assert_eq!(
        displaced,
        vec![DisplacedArc {
            from: "5".to_string(),
            to: "6".to_string(),
            capacity: 1,
            loss: 0.9,
        }]
    );
    assert_eq!(network.arc_count(), arcs_before);
    assert!(network.arc("5", "6").is_none());

    match network.arc("S", "6").unwrap() {
        Arc::Artificial {
            capacity,
            loss,
            length,
            stored_prefix,
        } => {
            assert_eq!(*capacity, 1);
            assert_eq!(*loss, 0.9);
            assert!((length - arc_length(true, 1, 0.9)).abs() < 1e-12);
            assert_eq!(stored_prefix, &path(&["S", "4", "3", "5", "6"]));
        }
        other => panic!("expected an artificial arc, got {other:?}"),
    }
}

#[test]
fn prefixes_through_artificial_arcs_are_expanded() {
    let mut network = paper_network().unwrap();
    assign_lengths(&mut network);

    let first = path(&["S", "4", "3", "5", "6", "T"]);
    let saturated = most_saturated_arc(&network, &first).unwrap();
    contract(&mut network, &first, &saturated, 0.0).unwrap();

    let second = path(&["S", "6", "T"]);
    let saturated = most_saturated_arc(&network, &second).unwrap();
    assert_eq!((saturated.from.as_str(), saturated.to.as_str()), ("S", "6"));

    // Force the downstream arc instead, to exercise prefix expansion.
    let downstream = gwpp::SaturatedArc {
        from: "6".to_string(),
        to: "T".to_string(),
        capacity: 3,
        position: 1,
    };
    contract(&mut network, &second, &downstream, 0.0).unwrap();
    assert_eq!(
        network.arc("S", "T").unwrap().stored_prefix(),
        ["S", "4", "3", "5", "6", "T"]
    );
}

#[test]
fn overwritten_real_source_arcs_are_reported() {
    let mut network = paper_network().unwrap();
    assign_lengths(&mut network);

    let three = path(&["S", "2", "3"]);
    let into_three = most_saturated_arc(&network, &three).unwrap();
    assert_eq!((into_three.from.as_str(), into_three.to.as_str()), ("2", "3"));

    let displaced = contract(&mut network, &three, &into_three, 0.0).unwrap();
    assert_eq!(displaced.len(), 2);
    assert_eq!((displaced[0].from.as_str(), displaced[0].to.as_str()), ("S", "3"));
    assert_eq!(displaced[0].capacity, 8);
    assert_eq!((displaced[1].from.as_str(), displaced[1].to.as_str()), ("2", "3"));
    assert!(network.arc("S", "3").unwrap().is_artificial());
    assert_eq!(network.arc("S", "3").unwrap().capacity(), 6);
}

#[test]
fn source_arcs_cannot_be_contracted() {
    let mut network = paper_network().unwrap();
    let p = path(&["S", "4", "5", "T"]);
    let saturated = gwpp::SaturatedArc {
        from: "S".to_string(),
        to: "4".to_string(),
        capacity: 10,
        position: 0,
    };
    assert!(matches!(
        contract(&mut network, &p, &saturated, 0.0),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn walking_reports_bottleneck_and_loss() {
    let network = paper_network().unwrap();
    let metrics = network.walk(&path(&["S", "4", "5", "T"])).unwrap();
    assert_eq!(metrics.bottleneck, 4);
    assert!((metrics.loss - 0.82 * 0.68 * 0.5).abs() < 1e-12);

    assert!(matches!(
        network.walk(&path(&["S", "5"])),
        Err(Error::MissingArc { .. })
    ));
}

#[test]
fn arcs_outside_the_domain_are_rejected() {
    let mut network = Network::new("S", "T").unwrap();
    assert!(matches!(
        network.add_arc("S", "a", 0, 0.5),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(network.add_arc("S", "a", 1, 0.0).is_err());
    assert!(network.add_arc("S", "a", 1, 1.5).is_err());
    assert!(network.add_arc("a", "a", 1, 0.5).is_err());
    assert!(network.add_arc("S", "a", 1, 1.0).is_ok());
    assert!(Network::new("S", "S").is_err());
}
