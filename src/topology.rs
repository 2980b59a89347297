//! Station topology: the canonical station order, the witness and hold
//! inspection sets, and the route each spool type takes through the shop.
//!
//! A [`Topology`] can only be obtained through validation, so every route
//! station, witness station and hold station is guaranteed to exist in the
//! canonical list and no route visits a station twice.
//!
//! ## Loading Order
//!
//! 1. `SPOOL_TOPOLOGY` environment variable (path to TOML file)
//! 2. `topology.toml` in the current working directory
//! 3. Built-in shopfloor defaults

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SpoolError;

pub const TOPOLOGY_ENV: &str = "SPOOL_TOPOLOGY";
pub const TOPOLOGY_FILE: &str = "topology.toml";

// ── Built-in shopfloor ──────────────────────────────────────────────────────

pub mod shopfloor {
    pub const WORK_PREPARATION: &str = "Work Preparation";
    pub const PPS: &str = "PPS";
    pub const FITTING_MATERIAL_PREPARATION: &str = "Fitting Material Preparation";
    pub const PIPE_MATERIAL_PREPARATION: &str = "Pipe Material Preparation";
    pub const CUTTING: &str = "Cutting";
    pub const MECHANICAL_FABRICATION: &str = "Mechanical Fabrication";
    pub const FITUP: &str = "Fitup";
    pub const WELDING: &str = "Welding";
    pub const COLD_BENDING: &str = "Cold Bending";
    pub const INDUCTION_BENDING: &str = "Induction Bending";
    pub const NDT: &str = "NDT";
    pub const RT: &str = "RT";
    pub const TECHNICAL_CONTROL: &str = "Technical Control";
    pub const DOCUMENTATION: &str = "Documentation";

    pub const STATIONS: [&str; 14] = [
        WORK_PREPARATION,
        PPS,
        FITTING_MATERIAL_PREPARATION,
        PIPE_MATERIAL_PREPARATION,
        CUTTING,
        MECHANICAL_FABRICATION,
        FITUP,
        WELDING,
        COLD_BENDING,
        INDUCTION_BENDING,
        NDT,
        RT,
        TECHNICAL_CONTROL,
        DOCUMENTATION,
    ];

    pub const WITNESS_STATIONS: [&str; 9] = [
        CUTTING,
        MECHANICAL_FABRICATION,
        FITUP,
        WELDING,
        COLD_BENDING,
        INDUCTION_BENDING,
        NDT,
        RT,
        TECHNICAL_CONTROL,
    ];

    pub const HOLD_STATIONS: [&str; 1] = [TECHNICAL_CONTROL];

    pub const ROUTE_TK: &[&str] = &[
        WORK_PREPARATION,
        PPS,
        PIPE_MATERIAL_PREPARATION,
        MECHANICAL_FABRICATION,
        FITUP,
        TECHNICAL_CONTROL,
        DOCUMENTATION,
    ];

    pub const ROUTE_SW: &[&str] = &[
        WORK_PREPARATION,
        PPS,
        FITTING_MATERIAL_PREPARATION,
        PIPE_MATERIAL_PREPARATION,
        CUTTING,
        MECHANICAL_FABRICATION,
        FITUP,
        WELDING,
        NDT,
        RT,
        TECHNICAL_CONTROL,
        DOCUMENTATION,
    ];

    pub const ROUTE_KRB_O: &[&str] = &[
        WORK_PREPARATION,
        PPS,
        PIPE_MATERIAL_PREPARATION,
        CUTTING,
        COLD_BENDING,
        FITUP,
        NDT,
        TECHNICAL_CONTROL,
        DOCUMENTATION,
    ];

    pub const ROUTE_KRB_M: &[&str] = &[
        WORK_PREPARATION,
        PPS,
        FITTING_MATERIAL_PREPARATION,
        PIPE_MATERIAL_PREPARATION,
        CUTTING,
        COLD_BENDING,
        MECHANICAL_FABRICATION,
        FITUP,
        WELDING,
        NDT,
        RT,
        TECHNICAL_CONTROL,
        DOCUMENTATION,
    ];

    pub const ROUTES: [(&str, &[&str]); 4] = [
        ("TK", ROUTE_TK),
        ("SW", ROUTE_SW),
        ("KRB o.", ROUTE_KRB_O),
        ("KRB m.", ROUTE_KRB_M),
    ];

    /// Technical Control has no short label: "TK" is taken by the spool type.
    pub const LABELS: [(&str, &str); 4] = [
        (WORK_PREPARATION, "Work Prep"),
        (FITTING_MATERIAL_PREPARATION, "Fitting Prep"),
        (PIPE_MATERIAL_PREPARATION, "Pipe Prep"),
        (MECHANICAL_FABRICATION, "Mech Fab"),
    ];
}

// ── Config (TOML) ───────────────────────────────────────────────────────────

/// Unvalidated topology description, as read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Canonical station order.
    pub stations: Vec<String>,

    #[serde(default)]
    pub witness_stations: Vec<String>,

    #[serde(default)]
    pub hold_stations: Vec<String>,

    /// Spool type code -> ordered stations.
    #[serde(default)]
    pub routes: BTreeMap<String, Vec<String>>,

    /// Optional short display labels, keyed by station.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            stations: owned(&shopfloor::STATIONS[..]),
            witness_stations: owned(&shopfloor::WITNESS_STATIONS[..]),
            hold_stations: owned(&shopfloor::HOLD_STATIONS[..]),
            routes: shopfloor::ROUTES
                .iter()
                .map(|(spool_type, route)| (spool_type.to_string(), owned(*route)))
                .collect(),
            labels: shopfloor::LABELS
                .iter()
                .map(|(station, label)| (station.to_string(), label.to_string()))
                .collect(),
        }
    }
}

// ── Validated topology ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Topology {
    stations: Vec<String>,
    index: HashMap<String, usize>,
    witness: Vec<bool>,
    hold: Vec<bool>,
    routes: BTreeMap<String, Vec<usize>>,
    labels: Vec<Option<String>>,
}

impl Default for Topology {
    fn default() -> Self {
        // Static tables; see `default_topology_is_valid`.
        match Self::from_config(TopologyConfig::default()) {
            Ok(topology) => topology,
            Err(e) => unreachable!("built-in shopfloor topology is invalid: {e}"),
        }
    }
}

impl Topology {
    /// Validate a config and build the registry.
    pub fn from_config(config: TopologyConfig) -> Result<Self, SpoolError> {
        let mut index = HashMap::with_capacity(config.stations.len());
        for (i, station) in config.stations.iter().enumerate() {
            if station.trim().is_empty() {
                return Err(SpoolError::EmptyStationName);
            }
            if index.insert(station.clone(), i).is_some() {
                return Err(SpoolError::DuplicateStation(station.clone()));
            }
        }

        let mark = |set: &'static str, names: &[String]| -> Result<Vec<bool>, SpoolError> {
            let mut marks = vec![false; config.stations.len()];
            for name in names {
                let i = *index
                    .get(name)
                    .ok_or_else(|| SpoolError::UnknownInspectionStation {
                        set,
                        station: name.clone(),
                    })?;
                marks[i] = true;
            }
            Ok(marks)
        };
        let witness = mark("witness", &config.witness_stations)?;
        let hold = mark("hold", &config.hold_stations)?;

        let mut routes = BTreeMap::new();
        for (spool_type, stops) in &config.routes {
            let mut seen = HashSet::with_capacity(stops.len());
            let mut resolved = Vec::with_capacity(stops.len());
            for stop in stops {
                let i = *index.get(stop).ok_or_else(|| SpoolError::UnknownStation {
                    route: spool_type.clone(),
                    station: stop.clone(),
                })?;
                if !seen.insert(i) {
                    return Err(SpoolError::DuplicateRouteStation {
                        route: spool_type.clone(),
                        station: stop.clone(),
                    });
                }
                resolved.push(i);
            }
            routes.insert(spool_type.clone(), resolved);
        }

        let mut labels = vec![None; config.stations.len()];
        for (station, label) in &config.labels {
            let i = *index
                .get(station)
                .ok_or_else(|| SpoolError::UnknownLabelStation(station.clone()))?;
            labels[i] = Some(label.clone());
        }

        debug!(
            stations = config.stations.len(),
            routes = routes.len(),
            "Topology validated"
        );

        Ok(Self {
            stations: config.stations,
            index,
            witness,
            hold,
            routes,
            labels,
        })
    }

    /// Parse and validate a TOML topology.
    pub fn from_toml_str(contents: &str) -> Result<Self, SpoolError> {
        let config: TopologyConfig = toml::from_str(contents)?;
        Self::from_config(config)
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, SpoolError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SpoolError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents)
    }

    /// Load the topology using the standard search order.
    ///
    /// A file that is found but does not validate is an error; only the
    /// absence of any file falls back to the built-in shopfloor.
    pub fn load() -> Result<Self, SpoolError> {
        if let Ok(path) = std::env::var(TOPOLOGY_ENV) {
            let p = PathBuf::from(&path);
            let topology = Self::load_from_file(&p)?;
            info!(path = %p.display(), routes = topology.routes.len(), "Loaded topology from {TOPOLOGY_ENV}");
            return Ok(topology);
        }

        let local = PathBuf::from(TOPOLOGY_FILE);
        if local.exists() {
            let topology = Self::load_from_file(&local)?;
            info!(routes = topology.routes.len(), "Loaded topology from ./{TOPOLOGY_FILE}");
            return Ok(topology);
        }

        info!("No {TOPOLOGY_FILE} found, using built-in shopfloor topology");
        Ok(Self::default())
    }

    /// Reconstruct the config this topology was built from.
    pub fn to_config(&self) -> TopologyConfig {
        let names = |flags: &[bool]| -> Vec<String> {
            flags
                .iter()
                .zip(&self.stations)
                .filter(|(flag, _)| **flag)
                .map(|(_, s)| s.clone())
                .collect()
        };
        TopologyConfig {
            stations: self.stations.clone(),
            witness_stations: names(&self.witness),
            hold_stations: names(&self.hold),
            routes: self
                .routes
                .iter()
                .map(|(t, stops)| {
                    (t.clone(), stops.iter().map(|&i| self.stations[i].clone()).collect())
                })
                .collect(),
            labels: self
                .labels
                .iter()
                .zip(&self.stations)
                .filter_map(|(label, s)| label.as_ref().map(|l| (s.clone(), l.clone())))
                .collect(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Canonical station order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn station_index(&self, station: &str) -> Option<usize> {
        self.index.get(station).copied()
    }

    pub fn is_witness_station(&self, station: &str) -> bool {
        self.station_index(station).is_some_and(|i| self.witness[i])
    }

    pub fn is_hold_station(&self, station: &str) -> bool {
        self.station_index(station).is_some_and(|i| self.hold[i])
    }

    pub fn witness_stations(&self) -> impl Iterator<Item = &str> + '_ {
        self.flagged(&self.witness)
    }

    pub fn hold_stations(&self) -> impl Iterator<Item = &str> + '_ {
        self.flagged(&self.hold)
    }

    /// Known spool type codes, sorted.
    pub fn spool_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.routes.keys().map(String::as_str)
    }

    pub fn is_routable(&self, spool_type: &str) -> bool {
        self.routes.contains_key(spool_type)
    }

    /// Ordered stations of a spool type's route, `None` when the type is unroutable.
    pub fn route(&self, spool_type: &str) -> Option<Vec<&str>> {
        self.routes
            .get(spool_type)
            .map(|stops| stops.iter().map(|&i| self.stations[i].as_str()).collect())
    }

    /// Display label for a station; falls back to the station name.
    pub fn label<'a>(&'a self, station: &'a str) -> &'a str {
        self.station_index(station)
            .and_then(|i| self.labels[i].as_deref())
            .unwrap_or(station)
    }

    pub(crate) fn route_indices(&self, spool_type: &str) -> Option<&[usize]> {
        self.routes.get(spool_type).map(Vec::as_slice)
    }

    pub(crate) fn routes_by_index(&self) -> impl Iterator<Item = (&str, &[usize])> + '_ {
        self.routes
            .iter()
            .map(|(t, stops)| (t.as_str(), stops.as_slice()))
    }

    pub(crate) fn is_witness_at(&self, i: usize) -> bool {
        self.witness[i]
    }

    pub(crate) fn is_hold_at(&self, i: usize) -> bool {
        self.hold[i]
    }

    fn flagged<'a>(&'a self, flags: &'a [bool]) -> impl Iterator<Item = &'a str> + 'a {
        flags
            .iter()
            .zip(&self.stations)
            .filter(|(flag, _)| **flag)
            .map(|(_, s)| s.as_str())
    }
}
