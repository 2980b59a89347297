//! Property tests for classification and load aggregation.

use proptest::prelude::*;

use spool_tracekit::{
    build_route_graph, classify, compute_load, InspectionLoad, SpoolRecord, Topology,
};

const QUALITIES: [&str; 3] = ["Q1", "Q2", "Q3"];
const PRESSURES: [&str; 3] = ["I", "II", "III"];

fn spool_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["TK", "SW", "KRB o.", "KRB m.", "Y", "", "tk"])
}

fn quality() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Q1", "Q2", "Q3", "", "Q4", "q1"])
}

fn pressure() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["I", "II", "III", "", "IV"])
}

fn record() -> impl Strategy<Value = SpoolRecord> {
    (spool_type(), quality(), pressure()).prop_map(|(t, q, p)| SpoolRecord::new(t, q, p))
}

fn population() -> impl Strategy<Value = Vec<SpoolRecord>> {
    prop::collection::vec(record(), 0..60)
}

fn grand_total(load: &InspectionLoad) -> u64 {
    load.iter().map(|(_, c)| c.total()).sum()
}

proptest! {
    #[test]
    fn prop_classify_outside_recognised_set_is_false(q in ".{0,4}", p in ".{0,4}") {
        let c = classify(&q, &p);
        if !(QUALITIES.contains(&q.as_str()) && PRESSURES.contains(&p.as_str())) {
            prop_assert!(!c.red_label);
            prop_assert!(!c.hold_eligible);
        }
    }

    #[test]
    fn prop_hold_eligible_implies_red_label(q in quality(), p in pressure()) {
        let c = classify(q, p);
        prop_assert!(!c.hold_eligible || c.red_label);
    }

    #[test]
    fn prop_load_is_order_independent(
        (spools, shuffled) in population().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let topology = Topology::default();
        let a = compute_load(&topology, &spools);
        let b = compute_load(&topology, &shuffled);
        prop_assert_eq!(grand_total(&a), grand_total(&b));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_unroutable_spools_contribute_nothing(q in quality(), p in pressure(), n in 1usize..10) {
        let topology = Topology::default();
        let spools = vec![SpoolRecord::new("Y", q, p); n];
        let load = compute_load(&topology, &spools);
        prop_assert_eq!(load.len(), 14);
        prop_assert_eq!(grand_total(&load), 0);
    }

    #[test]
    fn prop_non_red_label_spools_contribute_nothing(t in spool_type(), p in pressure()) {
        let topology = Topology::default();
        let spools = [SpoolRecord::new(t, "", p), SpoolRecord::new(t, "Q1", "")];
        prop_assert_eq!(grand_total(&compute_load(&topology, &spools)), 0);
    }

    #[test]
    fn prop_partitioned_loads_merge_to_whole(spools in population(), split in 0usize..60) {
        let topology = Topology::default();
        let split = split.min(spools.len());
        let (head, tail) = spools.split_at(split);

        let mut merged = compute_load(&topology, head);
        merged.merge(&compute_load(&topology, tail)).unwrap();
        prop_assert_eq!(merged, compute_load(&topology, &spools));
    }

    #[test]
    fn prop_route_graph_is_a_simple_path(
        stations in prop::collection::vec("[A-Z]{1,3}", 0..20),
        spools in population(),
    ) {
        let load = compute_load(&Topology::default(), &spools);
        let graph = build_route_graph(&stations, &load);
        prop_assert_eq!(graph.nodes.len(), stations.len());
        prop_assert_eq!(graph.edges.len(), stations.len().saturating_sub(1));
        for (edge, pair) in graph.edges.iter().zip(stations.windows(2)) {
            prop_assert_eq!(&edge.source, &pair[0]);
            prop_assert_eq!(&edge.target, &pair[1]);
        }
    }
}
