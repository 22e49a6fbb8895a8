// Repository trait and table types for dashboard data access
//
// Every dashboard reads one or more small tables keyed by a geographic code
// (UF or CIR) with one numeric value per year. Tables are loaded once at
// startup and never mutated afterwards, so the trait hands out references.
use std::collections::BTreeMap;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown key '{key}' in table '{table}'")]
    UnknownKey { table: String, key: String },
    #[error("year {year} not present in table '{table}'")]
    MissingYear { table: String, year: i32 },
}

/// One row of a year-columned table: a geographic key plus a value per year.
#[derive(Debug, Clone)]
pub struct YearRow {
    pub key: String,
    pub values: BTreeMap<i32, f64>,
}

/// A flat table keyed by geographic code with year columns, the common shape
/// of every CSV the dashboards consume.
#[derive(Debug, Clone)]
pub struct YearTable {
    name: String,
    rows: Vec<YearRow>,
    index: HashMap<String, usize>,
}

impl YearTable {
    pub fn new(name: impl Into<String>, rows: Vec<YearRow>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.key.clone(), i))
            .collect();
        Self {
            name: name.into(),
            rows,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Row keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.key.as_str())
    }

    pub fn rows(&self) -> &[YearRow] {
        &self.rows
    }

    pub fn value(&self, key: &str, year: i32) -> Option<f64> {
        let idx = *self.index.get(key)?;
        self.rows[idx].values.get(&year).copied()
    }

    /// Like `value` but reports which half of the lookup failed.
    pub fn require(&self, key: &str, year: i32) -> Result<f64, DataError> {
        let idx = *self.index.get(key).ok_or_else(|| DataError::UnknownKey {
            table: self.name.clone(),
            key: key.to_string(),
        })?;
        self.rows[idx]
            .values
            .get(&year)
            .copied()
            .ok_or_else(|| DataError::MissingYear {
                table: self.name.clone(),
                year,
            })
    }

    /// Sorted union of all year columns present in any row.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .rows
            .iter()
            .flat_map(|row| row.values.keys().copied())
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.rows.iter().any(|row| row.values.contains_key(&year))
    }

    /// Min and max value across all rows for one year.
    pub fn year_extent(&self, year: i32) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for row in &self.rows {
            if let Some(v) = row.values.get(&year) {
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                    None => (*v, *v),
                });
            }
        }
        extent
    }

    /// Multiply every value by a factor (proportion columns arrive as 0..1
    /// and are rescaled to percentages once at startup).
    pub fn scale_values(&mut self, factor: f64) {
        for row in &mut self.rows {
            for value in row.values.values_mut() {
                *value *= factor;
            }
        }
    }
}

/// Prenatal-appointment count bands of the immunization dashboard, matching
/// the `<year>_N` / `<year>_1_6` / `<year>_7_mais` column suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentBand {
    NoAppointments,
    OneToSix,
    SevenPlus,
}

impl AppointmentBand {
    pub const ALL: [AppointmentBand; 3] = [
        AppointmentBand::NoAppointments,
        AppointmentBand::OneToSix,
        AppointmentBand::SevenPlus,
    ];

    pub fn column_suffix(&self) -> &'static str {
        match self {
            AppointmentBand::NoAppointments => "_N",
            AppointmentBand::OneToSix => "_1_6",
            AppointmentBand::SevenPlus => "_7_mais",
        }
    }

    pub fn subplot_title(&self) -> &'static str {
        match self {
            AppointmentBand::NoAppointments => "No appointments",
            AppointmentBand::OneToSix => "1 to 6 appointments",
            AppointmentBand::SevenPlus => "7 or more appointments",
        }
    }
}

/// Long-format row of the cause-of-death table (one row per UF, year and
/// CID-10 cause).
#[derive(Debug, Clone)]
pub struct CauseRow {
    pub uf: String,
    pub year: i32,
    pub cause: String,
    pub total: u64,
}

/// Tidy per-UF-per-year record built from the delivery workbook's three
/// sheets at startup.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub uf_code: u8,
    pub year: i32,
    pub caesarean_pct: f64,
    pub hospital_pct: f64,
    pub mortality: f64,
    pub radius: f64,
}

/// Read access to every loaded dataset, grouped by dashboard.
pub trait DatasetRepository: Send + Sync {
    // prenatal dashboard (CIR keyed)
    fn prenatal_first_trimester(&self) -> &YearTable;
    fn prenatal_vaccination(&self) -> &YearTable;
    fn prenatal_mortality(&self) -> &YearTable;

    // immunization dashboard (UF-code keyed)
    fn immunization_coverage(&self) -> &YearTable;
    fn immunization_mortality(&self) -> &YearTable;
    fn appointment_band(&self, band: AppointmentBand) -> &YearTable;

    // mortality-profile dashboard (UF-abbreviation keyed)
    fn death_causes(&self) -> &[CauseRow];
    fn gdp(&self) -> &YearTable;
    fn hdi(&self) -> &YearTable;
    fn uf_mortality(&self) -> &YearTable;

    // delivery dashboard
    fn delivery_records(&self) -> &[DeliveryRecord];

    // water dashboard (UF-code keyed, years 2000 and 2010)
    fn water_supply(&self) -> &YearTable;
    fn water_mortality(&self) -> &YearTable;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> YearTable {
        YearTable::new(
            "fixture",
            vec![
                YearRow {
                    key: "11".to_string(),
                    values: BTreeMap::from([(2000, 1.5), (2001, 2.5)]),
                },
                YearRow {
                    key: "12".to_string(),
                    values: BTreeMap::from([(2000, 4.0)]),
                },
            ],
        )
    }

    #[test]
    fn test_value_lookup() {
        let t = table();
        assert_eq!(t.value("11", 2001), Some(2.5));
        assert_eq!(t.value("12", 2001), None);
        assert_eq!(t.value("99", 2000), None);
    }

    #[test]
    fn test_require_error_kinds() {
        let t = table();
        assert!(matches!(
            t.require("99", 2000),
            Err(DataError::UnknownKey { .. })
        ));
        assert!(matches!(
            t.require("12", 2001),
            Err(DataError::MissingYear { year: 2001, .. })
        ));
        assert_eq!(t.require("12", 2000).unwrap(), 4.0);
    }

    #[test]
    fn test_years_and_extent() {
        let t = table();
        assert_eq!(t.years(), vec![2000, 2001]);
        assert_eq!(t.year_range(), Some((2000, 2001)));
        assert_eq!(t.year_extent(2000), Some((1.5, 4.0)));
        assert_eq!(t.year_extent(2005), None);
    }

    #[test]
    fn test_scale_values() {
        let mut t = table();
        t.scale_values(100.0);
        assert_eq!(t.value("11", 2000), Some(150.0));
        assert_eq!(t.value("12", 2000), Some(400.0));
    }
}
