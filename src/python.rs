use std::collections::BTreeMap;
use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::classifier;
use crate::error::SpoolError;
use crate::load::{compute_load, compute_load_with_report, InspectionLoad};
use crate::loader::{self, SpoolBatch, TaskRow};
use crate::route_graph::{canonical_route_graph, route_graph_for_type};
use crate::schema;
use crate::shopfloor;
use crate::topology::Topology;
use crate::visualization::{self, VisualizationConfig};

#[pyclass]
pub struct SpoolModel {
    base_path: PathBuf,
    topology: Topology,
    batch: Option<SpoolBatch>,
    tasks: Option<Vec<TaskRow>>,
}

#[pymethods]
impl SpoolModel {
    /// Create a model rooted at `base_path`.
    ///
    /// `topology_file` is resolved against `base_path`; without it the
    /// topology comes from `$SPOOL_TOPOLOGY`, `./topology.toml` or the
    /// built-in shopfloor, in that order.
    #[new]
    #[pyo3(signature = (base_path, topology_file=None))]
    fn new(base_path: String, topology_file: Option<&str>) -> PyResult<Self> {
        crate::logging::try_init();

        let base_path = PathBuf::from(base_path);
        let topology = match topology_file {
            Some(file) => Topology::load_from_file(&base_path.join(file))?,
            None => Topology::load()?,
        };
        Ok(Self {
            base_path,
            topology,
            batch: None,
            tasks: None,
        })
    }

    // ── Topology ────────────────────────────────────────────────────────────

    fn stations(&self) -> Vec<String> {
        self.topology.stations().to_vec()
    }

    fn spool_types(&self) -> Vec<String> {
        self.topology.spool_types().map(str::to_string).collect()
    }

    /// Stations of one spool type's route; None for an unroutable type.
    fn route(&self, spool_type: &str) -> Option<Vec<String>> {
        self.topology
            .route(spool_type)
            .map(|r| r.into_iter().map(str::to_string).collect())
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load and normalize the MES spool export.
    ///
    /// Returns the active spools with normalized columns (see `schema.spool`).
    /// Duplicate and archive-conflict findings are kept on the model.
    #[pyo3(signature = (filename=None))]
    fn load_spools(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or("spools.csv");
        let mut batch = loader::load_spools_csv(&self.base_path.join(fname))?;
        if let Some(tasks) = &self.tasks {
            batch.attach_task_counts(tasks);
        }
        let df = batch.active_frame()?;
        self.batch = Some(batch);
        Ok(PyDataFrame(df))
    }

    /// Load the OP1 task export.
    ///
    /// Sets `task_count` on already loaded spools; spools loaded later pick
    /// the counts up as well.
    #[pyo3(signature = (filename=None))]
    fn load_tasks(&mut self, filename: Option<&str>) -> PyResult<PyDataFrame> {
        let fname = filename.unwrap_or("tasks.csv");
        let tasks = loader::load_tasks_csv(&self.base_path.join(fname))?;
        if let Some(batch) = self.batch.as_mut() {
            batch.attach_task_counts(&tasks);
        }
        let df = loader::tasks_frame(&tasks)?;
        self.tasks = Some(tasks);
        Ok(PyDataFrame(df))
    }

    /// OP1 tasks of one spool (by spool `id`), in export order.
    fn tasks_for_spool(&self, spool_id: &str) -> PyResult<PyDataFrame> {
        let tasks = self
            .tasks
            .as_ref()
            .ok_or_else(|| SpoolError::NotLoaded("tasks".into()))?;
        let selected: Vec<TaskRow> = loader::tasks_for_spool(tasks, spool_id)
            .into_iter()
            .cloned()
            .collect();
        Ok(PyDataFrame(loader::tasks_frame(&selected)?))
    }

    /// Active spools matching any search term in any column.
    ///
    /// Terms are separated by commas or whitespace and matched case-insensitively.
    fn search_spools(&self, text: &str) -> PyResult<PyDataFrame> {
        let df = self.batch()?.active_frame()?;
        Ok(PyDataFrame(loader::search_frame(&df, text)?))
    }

    /// Active spools per state, for the status filter.
    fn state_counts(&self) -> PyResult<BTreeMap<String, usize>> {
        Ok(loader::state_counts(&self.batch()?.active))
    }

    /// Get loaded active spools DataFrame.
    fn spools_df(&self) -> PyResult<Option<PyDataFrame>> {
        self.batch
            .as_ref()
            .map(|b| b.active_frame().map(PyDataFrame))
            .transpose()
            .map_err(PyErr::from)
    }

    /// ISO workbooks active more than once, with their stations.
    fn duplicates_df(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.batch()?.duplicates_frame()?))
    }

    /// Archived completed ISO workbooks that are active again.
    fn archive_conflicts_df(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.batch()?.archive_conflicts_frame()?))
    }

    // ── Inspection load ─────────────────────────────────────────────────────

    /// Witness/hold counts per station (columns: station, witness, hold).
    fn inspection_load(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.current_load()?.to_frame()?))
    }

    /// Load report as JSON: load, totals and unroutable spool types.
    fn inspection_report_json(&self) -> PyResult<String> {
        let records = self.batch()?.records();
        let report = compute_load_with_report(&self.topology, &records);
        Ok(serde_json::to_string(&report).map_err(SpoolError::from)?)
    }

    /// Canonical route graph as `{"nodes": [...], "edges": [...]}`.
    fn route_graph_json(&self) -> PyResult<String> {
        let load = self.current_load()?;
        Ok(canonical_route_graph(&self.topology, &load).to_json()?)
    }

    fn route_graph_for_type_json(&self, spool_type: &str) -> PyResult<String> {
        let load = self.current_load()?;
        Ok(route_graph_for_type(&self.topology, spool_type, &load).to_json()?)
    }

    /// Distinct spools and red-label spools at each station.
    fn station_occupancy(&self) -> PyResult<PyDataFrame> {
        let occupancy = shopfloor::station_occupancy(&self.batch()?.active, self.topology.stations());
        Ok(PyDataFrame(shopfloor::occupancy_frame(&occupancy)?))
    }

    // ── Visualization ───────────────────────────────────────────────────────

    /// Generate an interactive HTML diagram of the inspection flow.
    ///
    /// Args:
    ///     spool_type: Restrict the diagram to one type's route (default: all stations)
    ///     height_px: Height of the diagram area (default: 520)
    ///     x_step: Horizontal distance between stations (default: 220)
    #[pyo3(signature = (spool_type = None, height_px = 520, x_step = 220.0))]
    fn visualize_inspection(
        &self,
        spool_type: Option<&str>,
        height_px: u32,
        x_step: f64,
    ) -> PyResult<String> {
        let load = self.current_load()?;
        let graph = match spool_type {
            Some(t) => route_graph_for_type(&self.topology, t, &load),
            None => canonical_route_graph(&self.topology, &load),
        };

        let config = VisualizationConfig {
            height_px,
            x_step,
            ..VisualizationConfig::default()
        };

        visualization::generate_inspection_html(&self.topology, &graph, &config)
            .map_err(|e| e.into())
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl SpoolModel {
    fn batch(&self) -> Result<&SpoolBatch, SpoolError> {
        self.batch
            .as_ref()
            .ok_or_else(|| SpoolError::NotLoaded("spools".into()))
    }

    fn current_load(&self) -> Result<InspectionLoad, SpoolError> {
        let records = self.batch()?.records();
        Ok(compute_load(&self.topology, &records))
    }
}

/// Classify a (quality, pressure) pair: returns (red_label, hold_eligible).
#[pyfunction]
fn classify(quality: &str, pressure: &str) -> (bool, bool) {
    let c = classifier::classify(quality, pressure);
    (c.red_label, c.hold_eligible)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // MES export
    let mes = PyModule::new(m.py(), "mes")?;
    mes.add("ID", schema::mes::ID)?;
    mes.add("NAME", schema::mes::NAME)?;
    mes.add("STATE", schema::mes::STATE)?;
    mes.add("ARCHIVED", schema::mes::ARCHIVED)?;
    mes.add("STATION", schema::mes::STATION)?;
    mes.add("ISO_WORKBOOK_ID", schema::mes::ISO_WORKBOOK_ID)?;
    mes.add("WORKBOOK_TYPE", schema::mes::WORKBOOK_TYPE)?;
    mes.add("QUALITY_CLASS", schema::mes::QUALITY_CLASS)?;
    mes.add("PRESSURE_RISK", schema::mes::PRESSURE_RISK)?;
    mes.add("INTERNAL_REV", schema::mes::INTERNAL_REV)?;
    m.add_submodule(&mes)?;

    // Spool
    let spool = PyModule::new(m.py(), "spool")?;
    spool.add("ID", schema::spool::ID)?;
    spool.add("ISO_WORKBOOK_ID", schema::spool::ISO_WORKBOOK_ID)?;
    spool.add("SPOOL_TYPE", schema::spool::SPOOL_TYPE)?;
    spool.add("STATION", schema::spool::STATION)?;
    spool.add("STATE", schema::spool::STATE)?;
    spool.add("QUALITY_CLASS", schema::spool::QUALITY_CLASS)?;
    spool.add("PRESSURE_RISK", schema::spool::PRESSURE_RISK)?;
    spool.add("LABEL_TYPE", schema::spool::LABEL_TYPE)?;
    spool.add("IS_RED_LABEL", schema::spool::IS_RED_LABEL)?;
    spool.add("INTERNAL_REV", schema::spool::INTERNAL_REV)?;
    spool.add("TASK_COUNT", schema::spool::TASK_COUNT)?;
    m.add_submodule(&spool)?;

    // Task
    let task = PyModule::new(m.py(), "task")?;
    task.add("ORDER_ID", schema::task::ORDER_ID)?;
    task.add("TASK_NAME", schema::task::TASK_NAME)?;
    task.add("TASK_DESCRIPTION", schema::task::TASK_DESCRIPTION)?;
    task.add("STATE", schema::task::STATE)?;
    task.add("ASSIGNED_GROUPS", schema::task::ASSIGNED_GROUPS)?;
    m.add_submodule(&task)?;

    // LabelType
    let label_type = PyModule::new(m.py(), "label_type")?;
    label_type.add("RED_LABEL", schema::label_type::RED_LABEL)?;
    label_type.add("STANDARD", schema::label_type::STANDARD)?;
    m.add_submodule(&label_type)?;

    // Load
    let load = PyModule::new(m.py(), "load")?;
    load.add("STATION", schema::load::STATION)?;
    load.add("WITNESS", schema::load::WITNESS)?;
    load.add("HOLD", schema::load::HOLD)?;
    m.add_submodule(&load)?;

    // Data quality
    let quality = PyModule::new(m.py(), "quality")?;
    quality.add("ISO_WORKBOOK_ID", schema::quality::ISO_WORKBOOK_ID)?;
    quality.add("STATIONS", schema::quality::STATIONS)?;
    m.add_submodule(&quality)?;

    // Occupancy
    let occupancy = PyModule::new(m.py(), "occupancy")?;
    occupancy.add("STATION", schema::occupancy::STATION)?;
    occupancy.add("TOTAL_SPOOLS", schema::occupancy::TOTAL_SPOOLS)?;
    occupancy.add("RED_LABEL_SPOOLS", schema::occupancy::RED_LABEL_SPOOLS)?;
    m.add_submodule(&occupancy)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SpoolModel>()?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
