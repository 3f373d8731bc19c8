use std::cell::Cell;
use std::collections::HashSet;
use std::time::Duration;

use gwpp::generate::{RandomNetworkOptions, paper_network, random_network_seeded};
use gwpp::{Dijkstra, Error, Gwpp, Network, ShortestPathOracle, SolveOptions, solve};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn bottleneck_on_the_source_arc_finishes_in_one_iteration() {
    let mut network =
        Network::from_arcs("S", "T", [("S", "a", 1, 0.9), ("a", "T", 5, 0.8)]).unwrap();
    let solution = solve(&mut network).unwrap();

    assert_eq!(solution.iterations, 1);
    assert_eq!(solution.contractions(), 0);
    assert_eq!(solution.path, ["S", "a", "T"]);
    assert_eq!(solution.bottleneck, 1);
    assert!(close(solution.loss, 0.72));
    assert_eq!(network.artificial_arc_count(), 0);
}

#[test]
fn exhausted_budget_is_reported_as_a_suspected_cycle() {
    let mut network = paper_network().unwrap();
    let solver = Gwpp::from_options(SolveOptions::default().with_max_iterations(1));
    assert!(matches!(
        solver.solve(&mut network),
        Err(Error::CycleSuspected { iterations: 1 })
    ));
}

#[test]
fn zero_budget_is_rejected() {
    let mut network = paper_network().unwrap();
    let solver = Gwpp::from_options(SolveOptions::default().with_max_iterations(0));
    assert!(matches!(
        solver.solve(&mut network),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn unreachable_sink_is_fatal() {
    let mut network = Network::from_arcs("S", "T", [("S", "a", 1, 0.5)]).unwrap();
    match solve(&mut network) {
        Err(Error::Unreachable { from, to }) => {
            assert_eq!(from, "S");
            assert_eq!(to, "T");
        }
        other => panic!("expected Unreachable, got {other:?}"),
    }
}

#[test]
fn networks_with_cycles_still_converge() {
    let mut network = Network::from_arcs(
        "S",
        "T",
        [
            ("S", "a", 5, 0.9),
            ("a", "b", 2, 0.9),
            ("b", "a", 2, 0.9),
            ("b", "T", 3, 0.9),
        ],
    )
    .unwrap();
    let solution = solve(&mut network).unwrap();

    assert_eq!(solution.path, ["S", "a", "b", "T"]);
    assert_eq!(solution.bottleneck, 2);
    assert_eq!(solution.iterations, 2);
    assert!(close(solution.loss, 0.9 * 0.9 * 0.9));
}

#[test]
fn random_networks_converge_to_original_paths() {
    let options = RandomNetworkOptions {
        nodes: 30,
        probability: 0.15,
        paths: 2,
    };
    for seed in 0..8 {
        let pristine = random_network_seeded(&options, seed).unwrap();
        let (solution, _) = Gwpp::new().solve_cloned(&pristine).unwrap();

        assert_eq!(solution.path.first().map(String::as_str), Some("S"));
        assert_eq!(solution.path.last().map(String::as_str), Some("T"));
        let distinct: HashSet<&str> = solution.path.iter().map(String::as_str).collect();
        assert_eq!(distinct.len(), solution.path.len(), "seed {seed}: path repeats a node");

        let metrics = pristine.walk(&solution.path).unwrap();
        assert_eq!(metrics.bottleneck, solution.bottleneck, "seed {seed}");
        assert!(close(metrics.loss, solution.loss));
        assert!(solution.iterations <= pristine.arc_count() + 1);
    }
}

struct SlowOracle(Duration);

impl ShortestPathOracle for SlowOracle {
    fn shortest_path(
        &self,
        network: &Network,
        source: &str,
        sink: &str,
    ) -> gwpp::Result<Vec<String>> {
        std::thread::sleep(self.0);
        Dijkstra::default().shortest_path(network, source, sink)
    }
}

#[test]
fn slow_oracle_calls_miss_the_deadline() {
    let mut network = paper_network().unwrap();
    let solver = Gwpp::with_oracle(
        SlowOracle(Duration::from_millis(25)),
        SolveOptions::default().with_oracle_deadline_ms(1),
    );
    match solver.solve(&mut network) {
        Err(Error::OracleDeadline { elapsed, deadline }) => {
            assert_eq!(deadline, Duration::from_millis(1));
            assert!(elapsed >= Duration::from_millis(25));
        }
        other => panic!("expected OracleDeadline, got {other:?}"),
    }
}

#[derive(Default)]
struct CountingOracle {
    calls: Cell<usize>,
}

impl ShortestPathOracle for CountingOracle {
    fn shortest_path(
        &self,
        network: &Network,
        source: &str,
        sink: &str,
    ) -> gwpp::Result<Vec<String>> {
        self.calls.set(self.calls.get() + 1);
        Dijkstra::default().shortest_path(network, source, sink)
    }
}

#[test]
fn the_oracle_is_queried_once_per_iteration() {
    let oracle = CountingOracle::default();
    let mut network = paper_network().unwrap();
    let solution = Gwpp::with_oracle(&oracle, SolveOptions::default())
        .solve(&mut network)
        .unwrap();
    assert_eq!(oracle.calls.get(), solution.iterations);
    assert_eq!(oracle.calls.get(), 4);
}

struct WrongEndpoints;

impl ShortestPathOracle for WrongEndpoints {
    fn shortest_path(&self, _: &Network, source: &str, _: &str) -> gwpp::Result<Vec<String>> {
        Ok(vec![source.to_string(), "2".to_string()])
    }
}

#[test]
fn paths_that_miss_the_sink_are_rejected() {
    let mut network = paper_network().unwrap();
    let solver = Gwpp::with_oracle(WrongEndpoints, SolveOptions::default());
    assert!(matches!(
        solver.solve(&mut network),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn options_load_from_json() {
    let options =
        SolveOptions::from_json_str(r#"{ "max_iterations": 3, "strict_oracle": true }"#).unwrap();
    assert_eq!(options.max_iterations, Some(3));
    assert_eq!(options.oracle_deadline(), None);
    assert!(options.strict_oracle);
    assert!(Gwpp::from_options(options).oracle().is_strict());

    assert_eq!(
        SolveOptions::from_json_str("{}").unwrap(),
        SolveOptions::default()
    );
    assert!(matches!(
        SolveOptions::from_json_str(r#"{ "max_iters": 3 }"#),
        Err(Error::Json(_))
    ));
    assert!(matches!(
        SolveOptions::from_json_str(r#"{ "max_iterations": 0 }"#),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn solutions_serialize_for_reporting() {
    let mut network = paper_network().unwrap();
    let solution = solve(&mut network).unwrap();
    let json = serde_json::to_value(&solution).unwrap();

    assert_eq!(json["path"], serde_json::json!(["S", "4", "5", "T"]));
    assert_eq!(json["bottleneck"], 4);
    assert_eq!(json["iterations"], 4);
    assert_eq!(json["trace"][0]["saturated"]["from"], "5");
    assert_eq!(json["trace"][3]["contracted"], false);
}
