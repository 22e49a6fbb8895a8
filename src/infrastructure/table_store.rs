// File-backed dataset store - CSV/XLSX ingestion into in-memory tables
use crate::application::dataset_repository::{
    AppointmentBand, CauseRow, DatasetRepository, DeliveryRecord, YearRow, YearTable,
};
use crate::domain::stats::log_radius;
use crate::infrastructure::config::DatasetsConfig;
use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

/// Header cells that denote a year column. Anything else (key columns,
/// abbreviation columns, region columns) is ignored by the loaders.
fn parse_year(header: &str) -> Option<i32> {
    let year: i32 = header.trim().parse().ok()?;
    (1900..=2100).contains(&year).then_some(year)
}

fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse().ok()
}

/// Read a year-columned CSV: one row per geographic key, one column per
/// year. Cells that are empty or "-" become missing values.
pub fn read_year_table<R: std::io::Read>(
    reader: R,
    name: &str,
    key_column: &str,
) -> Result<YearTable> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let key_idx = headers
        .iter()
        .position(|h| h.trim() == key_column)
        .with_context(|| format!("table '{name}': missing key column '{key_column}'"))?;

    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| parse_year(h).map(|y| (i, y)))
        .collect();
    anyhow::ensure!(
        !year_columns.is_empty(),
        "table '{name}': no year columns in header"
    );

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("table '{name}': record {line}"))?;
        let key = record
            .get(key_idx)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .with_context(|| format!("table '{name}': record {line} has no key"))?
            .to_string();

        let mut values = BTreeMap::new();
        for (idx, year) in &year_columns {
            if let Some(raw) = record.get(*idx) {
                if let Some(value) = parse_cell(raw) {
                    values.insert(*year, value);
                }
            }
        }
        rows.push(YearRow { key, values });
    }

    Ok(YearTable::new(name, rows))
}

/// Read one appointment band out of a CSV whose year columns carry a band
/// suffix (`2000_N`, `2000_1_6`, `2000_7_mais`).
pub fn read_banded_year_table<R: std::io::Read>(
    reader: R,
    name: &str,
    key_column: &str,
    band: AppointmentBand,
) -> Result<YearTable> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let key_idx = headers
        .iter()
        .position(|h| h.trim() == key_column)
        .with_context(|| format!("table '{name}': missing key column '{key_column}'"))?;

    let suffix = band.column_suffix();
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let h = h.trim();
            let stem = h.strip_suffix(suffix)?;
            // "_1_6" is a suffix of "_7_mais"-free stems only when the rest
            // is a bare year, which also keeps "_N" from matching "_1_6".
            parse_year(stem).map(|y| (i, y))
        })
        .collect();
    anyhow::ensure!(
        !year_columns.is_empty(),
        "table '{name}': no '{suffix}' columns in header"
    );

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("table '{name}': record {line}"))?;
        let key = record
            .get(key_idx)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .with_context(|| format!("table '{name}': record {line} has no key"))?
            .to_string();

        let mut values = BTreeMap::new();
        for (idx, year) in &year_columns {
            if let Some(raw) = record.get(*idx) {
                if let Some(value) = parse_cell(raw) {
                    values.insert(*year, value);
                }
            }
        }
        rows.push(YearRow { key, values });
    }

    Ok(YearTable::new(name, rows))
}

#[derive(Debug, Deserialize)]
struct CauseRecord {
    #[serde(rename = "UF")]
    uf: String,
    #[serde(rename = "Ano")]
    year: i32,
    #[serde(rename = "CID10")]
    cause: String,
    #[serde(rename = "Total")]
    total: u64,
}

/// Read the long-format cause-of-death CSV (UF, Ano, CID10, Total).
pub fn read_cause_rows<R: std::io::Read>(reader: R, name: &str) -> Result<Vec<CauseRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (line, record) in csv_reader.deserialize::<CauseRecord>().enumerate() {
        let record = record.with_context(|| format!("table '{name}': record {line}"))?;
        rows.push(CauseRow {
            uf: record.uf.trim().to_string(),
            year: record.year,
            cause: record.cause.trim().to_string(),
            total: record.total,
        });
    }
    Ok(rows)
}

fn load_year_table(path: &str, key_column: &str) -> Result<YearTable> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    read_year_table(BufReader::new(file), path, key_column)
        .with_context(|| format!("reading {path}"))
}

fn load_banded_year_table(path: &str, key_column: &str, band: AppointmentBand) -> Result<YearTable> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    read_banded_year_table(BufReader::new(file), path, key_column, band)
        .with_context(|| format!("reading {path}"))
}

fn load_cause_rows(path: &str) -> Result<Vec<CauseRow>> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    read_cause_rows(BufReader::new(file), path).with_context(|| format!("reading {path}"))
}

fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_key(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Float(f) => Some((*f as i64).to_string()),
        Data::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// Convert one workbook sheet (key column + year columns) to a `YearTable`.
fn sheet_year_table(
    workbook: &mut Xlsx<BufReader<File>>,
    sheet_index: usize,
    name: &str,
) -> Result<YearTable> {
    let range = workbook
        .worksheet_range_at(sheet_index)
        .with_context(|| format!("workbook has no sheet {sheet_index} ({name})"))?
        .with_context(|| format!("reading sheet {sheet_index} ({name})"))?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .with_context(|| format!("sheet '{name}' is empty"))?;

    let year_columns: Vec<(usize, i32)> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(i, cell)| {
            let year = cell_f64(cell)? as i32;
            (1900..=2100).contains(&year).then_some((i, year))
        })
        .collect();
    anyhow::ensure!(
        !year_columns.is_empty(),
        "sheet '{name}': no year columns in header"
    );

    let mut rows = Vec::new();
    for cells in rows_iter {
        let Some(key) = cells.first().and_then(cell_key) else {
            continue;
        };
        let mut values = BTreeMap::new();
        for (idx, year) in &year_columns {
            if let Some(value) = cells.get(*idx).and_then(cell_f64) {
                values.insert(*year, value);
            }
        }
        rows.push(YearRow { key, values });
    }

    Ok(YearTable::new(name, rows))
}

/// Join the three delivery sheets into tidy per-UF-per-year records:
/// proportions rescaled to percentages, mortality rounded to one decimal
/// before the marker radius is derived from it.
pub fn build_delivery_records(
    caesarean: &YearTable,
    hospital: &YearTable,
    mortality: &YearTable,
) -> Vec<DeliveryRecord> {
    let mut records = Vec::new();
    for year in caesarean.years() {
        for key in caesarean.keys() {
            let Ok(uf_code) = key.parse::<u8>() else {
                tracing::debug!("delivery workbook: non-numeric UF key '{key}' skipped");
                continue;
            };
            let (Some(c), Some(h), Some(m)) = (
                caesarean.value(key, year),
                hospital.value(key, year),
                mortality.value(key, year),
            ) else {
                continue;
            };

            let rounded = (m * 10.0).round() / 10.0;
            records.push(DeliveryRecord {
                uf_code,
                year,
                caesarean_pct: c * 100.0,
                hospital_pct: h * 100.0,
                mortality: rounded,
                radius: log_radius(rounded),
            });
        }
    }
    records
}

fn load_delivery_records(path: &str) -> Result<Vec<DeliveryRecord>> {
    let mut workbook: Xlsx<BufReader<File>> =
        open_workbook(path).with_context(|| format!("opening {path}"))?;
    let caesarean = sheet_year_table(&mut workbook, 0, "caesarean")?;
    let hospital = sheet_year_table(&mut workbook, 1, "hospital")?;
    let mortality = sheet_year_table(&mut workbook, 2, "mortality")?;
    Ok(build_delivery_records(&caesarean, &hospital, &mortality))
}

/// All datasets, loaded once at startup and shared read-only.
pub struct FileDatasetStore {
    prenatal_first_trimester: YearTable,
    prenatal_vaccination: YearTable,
    prenatal_mortality: YearTable,
    immunization_coverage: YearTable,
    immunization_mortality: YearTable,
    appointments_none: YearTable,
    appointments_one_to_six: YearTable,
    appointments_seven_plus: YearTable,
    death_causes: Vec<CauseRow>,
    gdp: YearTable,
    hdi: YearTable,
    uf_mortality: YearTable,
    delivery_records: Vec<DeliveryRecord>,
    water_supply: YearTable,
    water_mortality: YearTable,
}

impl FileDatasetStore {
    pub fn load(cfg: &DatasetsConfig) -> Result<Self> {
        // Proportion tables ship as 0..1 fractions and are rescaled to
        // percentages here, once, instead of on every callback.
        let mut prenatal_first_trimester =
            load_year_table(&cfg.prenatal.first_trimester_csv, "CIR")?;
        prenatal_first_trimester.scale_values(100.0);
        let mut prenatal_vaccination = load_year_table(&cfg.prenatal.vaccination_csv, "CIR")?;
        prenatal_vaccination.scale_values(100.0);
        let prenatal_mortality = load_year_table(&cfg.prenatal.mortality_csv, "CIR")?;

        let immunization_coverage = load_year_table(&cfg.immunization.coverage_csv, "UF")?;
        let immunization_mortality = load_year_table(&cfg.immunization.mortality_csv, "UF")?;
        let appointments_none = load_banded_year_table(
            &cfg.immunization.appointments_csv,
            "UF",
            AppointmentBand::NoAppointments,
        )?;
        let appointments_one_to_six = load_banded_year_table(
            &cfg.immunization.appointments_csv,
            "UF",
            AppointmentBand::OneToSix,
        )?;
        let appointments_seven_plus = load_banded_year_table(
            &cfg.immunization.appointments_csv,
            "UF",
            AppointmentBand::SevenPlus,
        )?;

        let death_causes = load_cause_rows(&cfg.mortality_profile.causes_csv)?;
        let gdp = load_year_table(&cfg.mortality_profile.gdp_csv, "Nome")?;
        let hdi = load_year_table(&cfg.mortality_profile.hdi_csv, "Nome")?;
        let uf_mortality = load_year_table(&cfg.mortality_profile.mortality_csv, "UF")?;

        let delivery_records = load_delivery_records(&cfg.delivery.workbook_xlsx)?;

        let water_supply = load_year_table(&cfg.water.supply_csv, "UF")?;
        let water_mortality = load_year_table(&cfg.water.mortality_csv, "UF")?;

        tracing::info!(
            cirs = prenatal_first_trimester.len(),
            ufs = immunization_coverage.len(),
            causes = death_causes.len(),
            delivery_rows = delivery_records.len(),
            "datasets loaded"
        );

        Ok(Self {
            prenatal_first_trimester,
            prenatal_vaccination,
            prenatal_mortality,
            immunization_coverage,
            immunization_mortality,
            appointments_none,
            appointments_one_to_six,
            appointments_seven_plus,
            death_causes,
            gdp,
            hdi,
            uf_mortality,
            delivery_records,
            water_supply,
            water_mortality,
        })
    }
}

impl DatasetRepository for FileDatasetStore {
    fn prenatal_first_trimester(&self) -> &YearTable {
        &self.prenatal_first_trimester
    }

    fn prenatal_vaccination(&self) -> &YearTable {
        &self.prenatal_vaccination
    }

    fn prenatal_mortality(&self) -> &YearTable {
        &self.prenatal_mortality
    }

    fn immunization_coverage(&self) -> &YearTable {
        &self.immunization_coverage
    }

    fn immunization_mortality(&self) -> &YearTable {
        &self.immunization_mortality
    }

    fn appointment_band(&self, band: AppointmentBand) -> &YearTable {
        match band {
            AppointmentBand::NoAppointments => &self.appointments_none,
            AppointmentBand::OneToSix => &self.appointments_one_to_six,
            AppointmentBand::SevenPlus => &self.appointments_seven_plus,
        }
    }

    fn death_causes(&self) -> &[CauseRow] {
        &self.death_causes
    }

    fn gdp(&self) -> &YearTable {
        &self.gdp
    }

    fn hdi(&self) -> &YearTable {
        &self.hdi
    }

    fn uf_mortality(&self) -> &YearTable {
        &self.uf_mortality
    }

    fn delivery_records(&self) -> &[DeliveryRecord] {
        &self.delivery_records
    }

    fn water_supply(&self) -> &YearTable {
        &self.water_supply
    }

    fn water_mortality(&self) -> &YearTable {
        &self.water_mortality
    }
}
