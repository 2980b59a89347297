//! Inspection load aggregation.
//!
//! Walks every red-label spool along its type's route and counts, per
//! station, how many witness and hold inspections the population demands.
//! Counters only ever grow during a pass, so partial loads computed over
//! disjoint slices of the population can be merged by addition.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::{classify, Classification, InspectionKind};
use crate::error::SpoolError;
use crate::loader::require_columns;
use crate::schema::{load as columns, spool};
use crate::topology::Topology;

/// One spool as seen by the classification engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoolRecord {
    pub spool_type: String,
    pub quality: String,
    pub pressure: String,
}

impl SpoolRecord {
    pub fn new(
        spool_type: impl Into<String>,
        quality: impl Into<String>,
        pressure: impl Into<String>,
    ) -> Self {
        Self {
            spool_type: spool_type.into(),
            quality: quality.into(),
            pressure: pressure.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationLoad {
    pub witness: u64,
    pub hold: u64,
}

impl StationLoad {
    pub fn total(&self) -> u64 {
        self.witness + self.hold
    }

    fn record(&mut self, kind: InspectionKind) {
        match kind {
            InspectionKind::Witness => self.witness += 1,
            InspectionKind::Hold => self.hold += 1,
        }
    }
}

// ── Inspection load ─────────────────────────────────────────────────────────

/// Per-station witness/hold counters in canonical station order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionLoad {
    stations: Vec<String>,
    counts: Vec<StationLoad>,
}

impl InspectionLoad {
    /// Zero counters for every station of the topology.
    pub fn zeroed(topology: &Topology) -> Self {
        Self {
            stations: topology.stations().to_vec(),
            counts: vec![StationLoad::default(); topology.stations().len()],
        }
    }

    pub fn get(&self, station: &str) -> Option<StationLoad> {
        self.stations
            .iter()
            .position(|s| s == station)
            .map(|i| self.counts[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StationLoad)> + '_ {
        self.stations
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Sum over all stations.
    pub fn totals(&self) -> StationLoad {
        self.counts.iter().fold(StationLoad::default(), |acc, c| StationLoad {
            witness: acc.witness + c.witness,
            hold: acc.hold + c.hold,
        })
    }

    /// Add another partial load computed over the same station list.
    pub fn merge(&mut self, other: &InspectionLoad) -> Result<(), SpoolError> {
        if self.stations != other.stations {
            return Err(SpoolError::Validation(
                "cannot merge inspection loads over different station lists".into(),
            ));
        }
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            mine.witness += theirs.witness;
            mine.hold += theirs.hold;
        }
        Ok(())
    }

    /// Columns: station, witness, hold.
    pub fn to_frame(&self) -> Result<DataFrame, SpoolError> {
        let witness: Vec<u64> = self.counts.iter().map(|c| c.witness).collect();
        let hold: Vec<u64> = self.counts.iter().map(|c| c.hold).collect();

        let df = DataFrame::new(vec![
            Column::new(columns::STATION.into(), &self.stations),
            Column::new(columns::WITNESS.into(), &witness),
            Column::new(columns::HOLD.into(), &hold),
        ])?;
        Ok(df)
    }

    /// Apply one spool; returns how it was treated.
    fn accumulate(
        &mut self,
        topology: &Topology,
        spool_type: &str,
        quality: &str,
        pressure: &str,
    ) -> Outcome {
        let Some(route) = topology.route_indices(spool_type) else {
            return Outcome::Unroutable;
        };

        let classification = classify(quality, pressure);
        if !classification.red_label {
            return Outcome::NotRedLabel;
        }

        for &i in route {
            let demand =
                classification.demand_at(topology.is_witness_at(i), topology.is_hold_at(i));
            if let Some(kind) = demand {
                self.counts[i].record(kind);
            }
        }

        Outcome::Counted(classification)
    }
}

impl Serialize for InspectionLoad {
    /// Serialized as a map keyed by station, in canonical order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

enum Outcome {
    Unroutable,
    NotRedLabel,
    Counted(Classification),
}

// ── Load report ─────────────────────────────────────────────────────────────

/// An inspection load plus what happened to the population on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub load: InspectionLoad,
    /// Spools seen.
    pub total: usize,
    /// Spools whose type has a route.
    pub routed: usize,
    /// Routed spools that are red label.
    pub red_label: usize,
    /// Routed red-label spools that are hold eligible.
    pub hold_eligible: usize,
    /// Unroutable spool type -> number of spools.
    pub unroutable: BTreeMap<String, usize>,
}

impl LoadReport {
    fn new(topology: &Topology) -> Self {
        Self {
            load: InspectionLoad::zeroed(topology),
            total: 0,
            routed: 0,
            red_label: 0,
            hold_eligible: 0,
            unroutable: BTreeMap::new(),
        }
    }

    fn add(&mut self, topology: &Topology, spool_type: &str, quality: &str, pressure: &str) {
        self.total += 1;
        match self.load.accumulate(topology, spool_type, quality, pressure) {
            Outcome::Unroutable => {
                debug!(spool_type, "Skipping spool with unroutable type");
                *self.unroutable.entry(spool_type.to_string()).or_default() += 1;
            }
            Outcome::NotRedLabel => self.routed += 1,
            Outcome::Counted(classification) => {
                self.routed += 1;
                self.red_label += 1;
                if classification.hold_eligible {
                    self.hold_eligible += 1;
                }
            }
        }
    }

    fn finish(self) -> Self {
        let totals = self.load.totals();
        info!(
            spools = self.total,
            routed = self.routed,
            red_label = self.red_label,
            hold_eligible = self.hold_eligible,
            unroutable = self.total - self.routed,
            witness = totals.witness,
            hold = totals.hold,
            "Inspection load computed"
        );
        self
    }
}

impl Serialize for LoadReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("LoadReport", 6)?;
        s.serialize_field("load", &self.load)?;
        s.serialize_field("total", &self.total)?;
        s.serialize_field("routed", &self.routed)?;
        s.serialize_field("red_label", &self.red_label)?;
        s.serialize_field("hold_eligible", &self.hold_eligible)?;
        s.serialize_field("unroutable", &self.unroutable)?;
        s.end()
    }
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Per-station witness/hold demand over a spool population.
///
/// Spools with an unroutable type or without red-label status contribute
/// nothing. Every station of the topology appears, with zero counts if
/// nothing passes through it.
pub fn compute_load<'a, I>(topology: &Topology, spools: I) -> InspectionLoad
where
    I: IntoIterator<Item = &'a SpoolRecord>,
{
    let mut load = InspectionLoad::zeroed(topology);
    for spool in spools {
        load.accumulate(topology, &spool.spool_type, &spool.quality, &spool.pressure);
    }
    load
}

/// Like [`compute_load`], also counting how the population was treated.
pub fn compute_load_with_report<'a, I>(topology: &Topology, spools: I) -> LoadReport
where
    I: IntoIterator<Item = &'a SpoolRecord>,
{
    let mut report = LoadReport::new(topology);
    for spool in spools {
        report.add(topology, &spool.spool_type, &spool.quality, &spool.pressure);
    }
    report.finish()
}

/// Compute the load from a normalized spool frame.
///
/// Required columns: var_workBookType, quality_class, pressure_risk.
/// Null cells are treated as empty codes.
pub fn compute_load_from_frame(topology: &Topology, df: &DataFrame) -> Result<LoadReport, SpoolError> {
    require_columns(
        df,
        &[spool::SPOOL_TYPE, spool::QUALITY_CLASS, spool::PRESSURE_RISK],
    )?;

    let types = df.column(spool::SPOOL_TYPE)?.str()?;
    let qualities = df.column(spool::QUALITY_CLASS)?.str()?;
    let pressures = df.column(spool::PRESSURE_RISK)?.str()?;

    let mut report = LoadReport::new(topology);
    for i in 0..df.height() {
        report.add(
            topology,
            types.get(i).unwrap_or(""),
            qualities.get(i).unwrap_or(""),
            pressures.get(i).unwrap_or(""),
        );
    }
    Ok(report.finish())
}
