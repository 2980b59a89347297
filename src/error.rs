use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpoolError {
    #[error("Station name must not be blank")]
    EmptyStationName,

    #[error("Station listed more than once: {0}")]
    DuplicateStation(String),

    #[error("Route '{route}' references unknown station '{station}'")]
    UnknownStation { route: String, station: String },

    #[error("Route '{route}' visits station '{station}' more than once")]
    DuplicateRouteStation { route: String, station: String },

    #[error("{set} set references unknown station '{station}'")]
    UnknownInspectionStation { set: &'static str, station: String },

    #[error("Label given for unknown station '{0}'")]
    UnknownLabelStation(String),

    #[error("Data not loaded: {0}. Call the corresponding load method first.")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation: {0}")]
    Validation(String),
}

impl SpoolError {
    /// True for faults in the station topology itself, as opposed to data or I/O problems.
    pub fn is_topology_fault(&self) -> bool {
        matches!(
            self,
            SpoolError::EmptyStationName
                | SpoolError::DuplicateStation(_)
                | SpoolError::UnknownStation { .. }
                | SpoolError::DuplicateRouteStation { .. }
                | SpoolError::UnknownInspectionStation { .. }
                | SpoolError::UnknownLabelStation(_)
        )
    }
}

#[cfg(feature = "python")]
impl From<SpoolError> for pyo3::PyErr {
    fn from(err: SpoolError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};

        if err.is_topology_fault() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}
