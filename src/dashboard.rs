//! Loaded registry plus the derived views each dashboard page renders.
//! Tables are built once per process; views are recomputed on every call.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, DashboardConfig};
use crate::data::loader::{load_registry, LoadError};
use crate::data::normalize::{
    drop_incomplete, rename_columns, BUSINESS_NAME, COLUMN_LABELS, EQUITY_PROGRAM, LATITUDE,
    LICENSE_STATUS, LICENSE_TYPE, LONGITUDE, ZIP_CODE,
};
use crate::data::Table;
use crate::query::{
    column_mean, equity_split, exact_filter, filter_eq, select, sort_by, value_counts,
    EquitySplit, FilterResult, QueryError, ValueCounts,
};

pub const ACTIVE_STATUS: &str = "Active";
pub const DEFAULT_LICENSE_TYPE: &str = "Retail";
pub const MAP_ZOOM: u8 = 11;

/// Choices for the "What type of store are you looking for?" select box.
pub const LICENSE_TYPE_OPTIONS: [&str; 9] = [
    "Retail",
    "Co-Located",
    "Operator",
    "Courier",
    "Manufact",
    "Cultivate",
    "Medical",
    "TestLab",
    "Transport",
];

const ACTIVE_COLUMNS: [&str; 4] = [BUSINESS_NAME, LICENSE_TYPE, ZIP_CODE, LICENSE_STATUS];
const EQUITY_COLUMNS: [&str; 2] = [BUSINESS_NAME, EQUITY_PROGRAM];

pub const FOUND_MESSAGE: &str = "Here is a list of dispensaries in your area!";
pub const NOT_FOUND_MESSAGE: &str = "There are no stores that match this criteria!";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub business_name: String,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Option<MapCenter>,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityView {
    pub members: Table,
    pub split: EquitySplit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupView {
    pub license_type: String,
    pub zip_code: String,
    pub found: bool,
    pub message: &'static str,
    pub dispensaries: Table,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    source_path: String,
    history_path: PathBuf,
    loaded_at: String,
    registry: Table,
    cleaned: Table,
}

impl Dashboard {
    pub fn load(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let raw = load_registry(&config.registry_path)?;
        let dashboard = Self::from_source_table(
            raw,
            &config.registry_path.display().to_string(),
            &config.history_path,
        )?;
        tracing::info!(
            source = %dashboard.source_path,
            rows = dashboard.registry.len(),
            complete_rows = dashboard.cleaned.len(),
            "registry ready"
        );
        Ok(dashboard)
    }

    /// Normalize a table still keyed by source column names.
    pub fn from_source_table(
        raw: Table,
        source_path: &str,
        history_path: &Path,
    ) -> Result<Self, DashboardError> {
        let registry = rename_columns(raw, &COLUMN_LABELS)?;
        let cleaned = drop_incomplete(&registry);
        Ok(Self {
            source_path: source_path.to_string(),
            history_path: history_path.to_path_buf(),
            loaded_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            registry,
            cleaned,
        })
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn loaded_at(&self) -> &str {
        &self.loaded_at
    }

    pub fn registry(&self) -> &Table {
        &self.registry
    }

    pub fn cleaned(&self) -> &Table {
        &self.cleaned
    }

    /// Active licenses in file order.
    fn active_rows(&self) -> Result<Table, QueryError> {
        let active = select(&self.registry, &ACTIVE_COLUMNS)?;
        filter_eq(&active, &[(LICENSE_STATUS, ACTIVE_STATUS)])
    }

    /// Active licenses, sorted by business name.
    pub fn active_listing(&self) -> Result<Table, QueryError> {
        sort_by(&self.active_rows()?, BUSINESS_NAME)
    }

    /// Matches come back in file order, not the listing's sorted order.
    pub fn lookup(&self, license_type: &str, zip_code: &str) -> Result<LookupView, QueryError> {
        let FilterResult { subset, found } =
            exact_filter(&self.active_rows()?, license_type, zip_code)?;
        Ok(LookupView {
            license_type: license_type.to_string(),
            zip_code: zip_code.to_string(),
            found,
            message: if found { FOUND_MESSAGE } else { NOT_FOUND_MESSAGE },
            dispensaries: subset,
        })
    }

    pub fn license_status_counts(&self) -> Result<ValueCounts, QueryError> {
        value_counts(&self.registry, LICENSE_STATUS)
    }

    pub fn license_type_counts(&self) -> Result<ValueCounts, QueryError> {
        value_counts(&self.registry, LICENSE_TYPE)
    }

    /// Markers come from complete rows only; the center averages every row with coordinates.
    pub fn map_view(&self) -> Result<MapView, QueryError> {
        let points = select(&self.cleaned, &[BUSINESS_NAME, LONGITUDE, LATITUDE])?;
        let markers = points
            .rows()
            .iter()
            .filter_map(|row| {
                Some(MapMarker {
                    business_name: row[0].as_text()?.into_owned(),
                    longitude: row[1].as_f64()?,
                    latitude: row[2].as_f64()?,
                })
            })
            .collect();

        let center = match (
            column_mean(&self.registry, LATITUDE)?,
            column_mean(&self.registry, LONGITUDE)?,
        ) {
            (Some(latitude), Some(longitude)) => Some(MapCenter {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Ok(MapView {
            center,
            zoom: MAP_ZOOM,
            markers,
        })
    }

    pub fn equity_view(&self) -> Result<EquityView, QueryError> {
        let equity = select(&self.cleaned, &EQUITY_COLUMNS)?;
        let members = filter_eq(&equity, &[(EQUITY_PROGRAM, "Y")])?;
        Ok(EquityView {
            members: sort_by(&members, BUSINESS_NAME)?,
            split: equity_split(&equity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_registry_from_reader;
    use crate::data::Cell;

    const REGISTRY: &str = "\
id_name_first,id_name_last,id_full_name,app_license_category,app_business_name,app_license_status,equity_program_designation,facility_address,facility_zip_code,longitude,latitude
Ava,Reyes,Ava Reyes,Retail,Green Harbor,Active,Y,12 Tremont St,02118,-71.0,42.0
Liam,Chen,Liam Chen,Retail,Beacon Leaf,Inactive,N,3 Beacon St,02108,-71.2,42.2
Zoe,Kim,Zoe Kim,Courier,Roxbury Runners,Active,,15 Warren St,02119,,
";

    fn dashboard() -> Dashboard {
        let raw = load_registry_from_reader(REGISTRY.as_bytes(), "inline").expect("load");
        Dashboard::from_source_table(raw, "inline", Path::new("history.csv")).expect("normalize")
    }

    #[test]
    fn active_listing_projects_and_filters() {
        let active = dashboard().active_listing().expect("active");
        assert_eq!(active.columns().len(), 4);
        assert_eq!(active.len(), 2);
        assert_eq!(active.cell(0, BUSINESS_NAME), Some(&Cell::text("Green Harbor")));
        assert_eq!(active.cell(1, BUSINESS_NAME), Some(&Cell::text("Roxbury Runners")));
    }

    #[test]
    fn lookup_only_sees_active_licenses() {
        let dashboard = dashboard();
        let hit = dashboard.lookup("Retail", "02118").expect("lookup");
        assert!(hit.found);
        assert_eq!(hit.message, FOUND_MESSAGE);

        let inactive = dashboard.lookup("Retail", "02108").expect("lookup");
        assert!(!inactive.found);
        assert_eq!(inactive.message, NOT_FOUND_MESSAGE);
    }

    #[test]
    fn lookup_keeps_file_order() {
        let registry = "\
id_name_first,id_name_last,id_full_name,app_license_category,app_business_name,app_license_status,equity_program_designation,facility_address,facility_zip_code,longitude,latitude
Ada,Moss,Ada Moss,Retail,Zeta Leaf,Active,N,1 Main St,02118,-71.0,42.0
Ben,Hale,Ben Hale,Retail,Alpha Leaf,Active,Y,2 Main St,02118,-71.0,42.0
";
        let raw = load_registry_from_reader(registry.as_bytes(), "inline").expect("load");
        let dashboard = Dashboard::from_source_table(raw, "inline", Path::new("history.csv"))
            .expect("normalize");

        let hit = dashboard.lookup("Retail", "02118").expect("lookup");
        let names: Vec<_> = (0..hit.dispensaries.len())
            .filter_map(|row| hit.dispensaries.cell(row, BUSINESS_NAME))
            .collect();
        assert_eq!(names, [&Cell::text("Zeta Leaf"), &Cell::text("Alpha Leaf")]);

        let listing = dashboard.active_listing().expect("active");
        assert_eq!(listing.cell(0, BUSINESS_NAME), Some(&Cell::text("Alpha Leaf")));
    }

    #[test]
    fn map_uses_complete_rows_and_full_table_center() {
        let map = dashboard().map_view().expect("map");
        assert_eq!(map.markers.len(), 2);
        let center = map.center.expect("center");
        assert!((center.latitude - 42.1).abs() < 1e-9);
        assert!((center.longitude + 71.1).abs() < 1e-9);
    }
}
