// Application layer - Use cases building figures from the loaded tables
pub mod catalog_service;
pub mod dataset_repository;
pub mod delivery_service;
pub mod immunization_service;
pub mod mortality_profile_service;
pub mod prenatal_service;
pub mod water_service;

#[cfg(test)]
pub mod test_fixtures {
    //! A small in-memory repository shared by the service tests: three CIRs,
    //! a handful of UFs across two regions, two years per table.
    use crate::application::dataset_repository::{
        AppointmentBand, CauseRow, DatasetRepository, DeliveryRecord, YearRow, YearTable,
    };
    use crate::domain::stats::log_radius;
    use std::sync::Arc;

    fn year_table(name: &str, rows: &[(&str, &[(i32, f64)])]) -> YearTable {
        YearTable::new(
            name,
            rows.iter()
                .map(|(key, values)| YearRow {
                    key: key.to_string(),
                    values: values.iter().copied().collect(),
                })
                .collect(),
        )
    }

    pub struct FixtureRepository {
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

    pub fn fixture_repository() -> Arc<dyn DatasetRepository> {
        let delivery = |uf_code: u8, year: i32, c: f64, h: f64, m: f64| DeliveryRecord {
            uf_code,
            year,
            caesarean_pct: c,
            hospital_pct: h,
            mortality: m,
            radius: log_radius(m),
        };

        Arc::new(FixtureRepository {
            prenatal_first_trimester: year_table(
                "prenatal_first_trimester",
                &[
                    ("11001", &[(2000, 70.0), (2001, 72.0)]),
                    ("11002", &[(2000, 50.0), (2001, 52.0)]),
                    ("11003", &[(2000, 40.0), (2001, 45.0)]),
                ],
            ),
            prenatal_vaccination: year_table(
                "prenatal_vaccination",
                &[
                    ("11001", &[(2000, 80.0), (2001, 81.0)]),
                    ("11002", &[(2000, 0.0), (2001, 20.0)]),
                    ("11003", &[(2000, 60.0), (2001, 61.0)]),
                ],
            ),
            prenatal_mortality: year_table(
                "prenatal_mortality",
                &[
                    ("11001", &[(2000, 12.0), (2001, 11.5)]),
                    ("11002", &[(2000, 15.0), (2001, 14.0)]),
                    ("11003", &[(2000, 18.0), (2001, 17.0)]),
                ],
            ),
            immunization_coverage: year_table(
                "immunization_coverage",
                &[
                    ("11", &[(2000, 95.0), (2001, 96.0)]),
                    ("12", &[(2000, 90.0), (2001, 91.0)]),
                    ("35", &[(2000, 99.0), (2001, 99.5)]),
                ],
            ),
            immunization_mortality: year_table(
                "immunization_mortality",
                &[
                    ("11", &[(2000, 20.0), (2001, 19.0)]),
                    ("12", &[(2000, 18.0), (2001, 17.5)]),
                    ("35", &[(2000, 10.0), (2001, 9.5)]),
                ],
            ),
            appointments_none: year_table(
                "appointments_none",
                &[
                    ("11", &[(2000, 10.0), (2001, 9.0)]),
                    ("12", &[(2000, 12.0), (2001, 11.0)]),
                    ("35", &[(2000, 5.0), (2001, 4.5)]),
                ],
            ),
            appointments_one_to_six: year_table(
                "appointments_one_to_six",
                &[
                    ("11", &[(2000, 60.0), (2001, 58.0)]),
                    ("12", &[(2000, 55.0), (2001, 54.0)]),
                    ("35", &[(2000, 40.0), (2001, 39.0)]),
                ],
            ),
            appointments_seven_plus: year_table(
                "appointments_seven_plus",
                &[
                    ("11", &[(2000, 30.0), (2001, 33.0)]),
                    ("12", &[(2000, 33.0), (2001, 35.0)]),
                    ("35", &[(2000, 55.0), (2001, 56.5)]),
                ],
            ),
            death_causes: vec![
                CauseRow {
                    uf: "RO".to_string(),
                    year: 2010,
                    cause: "P22 Respiratory distress of newborn".to_string(),
                    total: 60,
                },
                CauseRow {
                    uf: "RO".to_string(),
                    year: 2010,
                    cause: "P36 Bacterial sepsis of newborn".to_string(),
                    total: 40,
                },
            ],
            gdp: year_table(
                "gdp",
                &[("RO", &[(2010, 23_561_000.0), (2011, 27_839_000.0)])],
            ),
            hdi: year_table("hdi", &[("RO", &[(2010, 0.690), (2011, 0.700)])]),
            uf_mortality: year_table(
                "uf_mortality",
                &[("RO", &[(2010, 12.34), (2011, 11.90)])],
            ),
            delivery_records: vec![
                delivery(11, 2000, 25.0, 95.0, 17.3),
                delivery(35, 2000, 45.0, 99.0, 10.0),
                delivery(11, 2001, 27.0, 95.5, 16.8),
            ],
            water_supply: year_table(
                "water_supply",
                &[
                    ("11", &[(2000, 75.0), (2010, 85.0)]),
                    ("35", &[(2000, 95.0), (2010, 98.0)]),
                ],
            ),
            water_mortality: year_table(
                "water_mortality",
                &[
                    ("11", &[(2000, 20.0), (2010, 15.0)]),
                    ("35", &[(2000, 10.0), (2010, 8.0)]),
                ],
            ),
        })
    }

    impl DatasetRepository for FixtureRepository {
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
}
