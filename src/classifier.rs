//! Spool classification from quality class and pressure-risk category.
//!
//! Inputs are expected to be normalized upstream (trimmed, exact case);
//! anything outside the recognised codes simply does not qualify.

use serde::Serialize;

use crate::load::SpoolRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualityClass {
    Q1,
    Q2,
    Q3,
}

impl QualityClass {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PressureRisk {
    I,
    II,
    III,
}

impl PressureRisk {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "I" => Some(Self::I),
            "II" => Some(Self::II),
            "III" => Some(Self::III),
            _ => None,
        }
    }
}

/// What a station requires of a spool passing through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionKind {
    Witness,
    Hold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub red_label: bool,
    pub hold_eligible: bool,
}

impl Classification {
    pub fn from_classes(quality: Option<QualityClass>, pressure: Option<PressureRisk>) -> Self {
        let (Some(quality), Some(pressure)) = (quality, pressure) else {
            return Self::default();
        };

        let hold_eligible = matches!(quality, QualityClass::Q2 | QualityClass::Q3)
            && matches!(pressure, PressureRisk::II | PressureRisk::III);

        Self {
            red_label: true,
            hold_eligible,
        }
    }

    /// Inspection demand at a station with the given flags.
    ///
    /// Hold is checked first: a hold-eligible spool at a station that is both
    /// witness- and hold-requiring counts as hold only.
    pub fn demand_at(&self, witness_station: bool, hold_station: bool) -> Option<InspectionKind> {
        if !self.red_label {
            return None;
        }
        if self.hold_eligible && hold_station {
            Some(InspectionKind::Hold)
        } else if witness_station {
            Some(InspectionKind::Witness)
        } else {
            None
        }
    }
}

/// Classify a (quality, pressure) code pair. Never fails.
pub fn classify(quality: &str, pressure: &str) -> Classification {
    Classification::from_classes(QualityClass::parse(quality), PressureRisk::parse(pressure))
}

pub fn classify_record(spool: &SpoolRecord) -> Classification {
    classify(&spool.quality, &spool.pressure)
}
