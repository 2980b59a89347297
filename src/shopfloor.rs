use std::collections::{HashMap, HashSet};

use polars::prelude::*;
use serde::Serialize;

use crate::error::SpoolError;
use crate::loader::SpoolRow;
use crate::schema::occupancy;

/// Spools currently sitting at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationOccupancy {
    pub station: String,
    /// Distinct ISO workbooks at the station.
    pub total_spools: usize,
    /// Distinct red-label ISO workbooks at the station.
    pub red_label_spools: usize,
}

/// Occupancy for each station in `stations`, in that order.
///
/// Rows at stations outside `stations` are ignored.
pub fn station_occupancy<S: AsRef<str>>(rows: &[SpoolRow], stations: &[S]) -> Vec<StationOccupancy> {
    let mut all: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut red: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in rows {
        let id = row.iso_workbook_id.as_str();
        all.entry(row.station.as_str()).or_default().insert(id);
        if row.is_red_label {
            red.entry(row.station.as_str()).or_default().insert(id);
        }
    }

    let distinct = |map: &HashMap<&str, HashSet<&str>>, station: &str| {
        map.get(station).map_or(0, HashSet::len)
    };

    stations
        .iter()
        .map(|s| {
            let station = s.as_ref();
            StationOccupancy {
                station: station.to_string(),
                total_spools: distinct(&all, station),
                red_label_spools: distinct(&red, station),
            }
        })
        .collect()
}

/// Columns: station, total_spools, red_label_spools.
pub fn occupancy_frame(occupancy: &[StationOccupancy]) -> Result<DataFrame, SpoolError> {
    let stations: Vec<&str> = occupancy.iter().map(|o| o.station.as_str()).collect();
    let totals: Vec<u64> = occupancy.iter().map(|o| o.total_spools as u64).collect();
    let red: Vec<u64> = occupancy.iter().map(|o| o.red_label_spools as u64).collect();

    let df = DataFrame::new(vec![
        Column::new(occupancy::STATION.into(), stations),
        Column::new(occupancy::TOTAL_SPOOLS.into(), &totals),
        Column::new(occupancy::RED_LABEL_SPOOLS.into(), &red),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(iso: &str, station: &str, red: bool) -> SpoolRow {
        SpoolRow {
            iso_workbook_id: iso.into(),
            station: station.into(),
            is_red_label: red,
            ..Default::default()
        }
    }

    #[test]
    fn counts_distinct_workbooks_per_station() {
        let rows = vec![
            at("1", "Welding", true),
            at("1", "Welding", true),
            at("2", "Welding", false),
            at("3", "NDT", true),
            at("4", "Unknown", true),
        ];
        let occ = station_occupancy(&rows, &["Cutting", "Welding", "NDT"]);

        assert_eq!(
            occ,
            vec![
                StationOccupancy {
                    station: "Cutting".into(),
                    total_spools: 0,
                    red_label_spools: 0,
                },
                StationOccupancy {
                    station: "Welding".into(),
                    total_spools: 2,
                    red_label_spools: 1,
                },
                StationOccupancy {
                    station: "NDT".into(),
                    total_spools: 1,
                    red_label_spools: 1,
                },
            ]
        );

        let df = occupancy_frame(&occ).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }
}
