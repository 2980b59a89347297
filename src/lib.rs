//! Spool routing and inspection-load classification.
//!
//! A station topology maps every spool type to its route through the
//! shopfloor. Each spool's quality class and pressure-risk category decide
//! whether it is red label and hold eligible; walking red-label spools along
//! their routes yields the witness and hold demand at every station.
//!
//! With the `python` feature the crate builds the `_core` extension module.

pub mod classifier;
pub mod error;
pub mod flow;
pub mod load;
pub mod loader;
pub mod logging;
pub mod route_graph;
pub mod schema;
pub mod shopfloor;
pub mod topology;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

pub use classifier::{classify, classify_record, Classification, InspectionKind, PressureRisk, QualityClass};
pub use error::SpoolError;
pub use flow::FlowGraph;
pub use load::{
    compute_load, compute_load_from_frame, compute_load_with_report, InspectionLoad, LoadReport,
    SpoolRecord, StationLoad,
};
pub use loader::{load_spools_csv, load_tasks_csv, DuplicateSpool, SpoolBatch, SpoolRow, TaskRow};
pub use route_graph::{
    build_route_graph, canonical_route_graph, route_graph_for_type, RouteEdge, RouteGraph,
    RouteNode,
};
pub use shopfloor::{station_occupancy, StationOccupancy};
pub use topology::{Topology, TopologyConfig};
