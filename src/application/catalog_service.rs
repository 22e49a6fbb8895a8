// Catalog service - dashboard list and per-dashboard control layouts
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::dashboard::{
    Control, DashboardInfo, DashboardLayout, DropdownControl, DropdownOption, SliderControl,
    SliderMark,
};
use crate::domain::geo::ALL_UFS;
use std::sync::Arc;

pub const PRENATAL_ID: &str = "prenatal";
pub const IMMUNIZATION_ID: &str = "immunization";
pub const MORTALITY_PROFILE_ID: &str = "mortality-profile";
pub const DELIVERY_ID: &str = "delivery";
pub const WATER_ID: &str = "water";

const PRENATAL_TITLE: &str =
    "Relationship between immunization of pregnant women, prenatal care and mortality";
const IMMUNIZATION_TITLE: &str =
    "Relationship between pre-natal appointments, immunizations and neonatal mortality";
const MORTALITY_PROFILE_TITLE: &str = "Relations between neonatal mortality, GDP and HDI";
const DELIVERY_TITLE: &str = "Relationship between delivery type and neonatal mortality";
const WATER_TITLE: &str = "Relationship between water supply and neonatal mortality";

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn DatasetRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    pub fn list_dashboards(&self) -> Vec<DashboardInfo> {
        vec![
            DashboardInfo::new(PRENATAL_ID, PRENATAL_TITLE),
            DashboardInfo::new(IMMUNIZATION_ID, IMMUNIZATION_TITLE),
            DashboardInfo::new(MORTALITY_PROFILE_ID, MORTALITY_PROFILE_TITLE),
            DashboardInfo::new(DELIVERY_ID, DELIVERY_TITLE),
            DashboardInfo::new(WATER_ID, WATER_TITLE),
        ]
    }

    /// Control layout for one dashboard; slider ranges come from the loaded
    /// tables so the UI can never ask for a year the data does not have.
    pub fn dashboard_layout(&self, id: &str) -> Option<DashboardLayout> {
        match id {
            PRENATAL_ID => {
                let (first, last) = self.repository.prenatal_first_trimester().year_range()?;
                Some(DashboardLayout {
                    id: id.to_string(),
                    title: PRENATAL_TITLE.to_string(),
                    controls: vec![Control::Slider(SliderControl::years(
                        "year",
                        "Year:",
                        first as i64,
                        last as i64,
                    ))],
                })
            }
            IMMUNIZATION_ID => {
                let (first, last) = self.repository.immunization_coverage().year_range()?;
                Some(DashboardLayout {
                    id: id.to_string(),
                    title: IMMUNIZATION_TITLE.to_string(),
                    controls: vec![Control::Slider(SliderControl::years(
                        "year",
                        "Year:",
                        first as i64,
                        last as i64,
                    ))],
                })
            }
            MORTALITY_PROFILE_ID => {
                let range = intersect_ranges(&[
                    self.repository.gdp().year_range(),
                    self.repository.hdi().year_range(),
                    self.repository.uf_mortality().year_range(),
                ])?;
                Some(DashboardLayout {
                    id: id.to_string(),
                    title: MORTALITY_PROFILE_TITLE.to_string(),
                    controls: vec![
                        Control::Dropdown(DropdownControl {
                            id: "uf".to_string(),
                            label: "Federative Unit selector".to_string(),
                            value: "RO".to_string(),
                            options: ALL_UFS
                                .iter()
                                .map(|uf| DropdownOption {
                                    label: uf.abbreviation.to_string(),
                                    value: uf.abbreviation.to_string(),
                                })
                                .collect(),
                        }),
                        Control::Slider(SliderControl::years(
                            "year",
                            "Year:",
                            range.0 as i64,
                            range.1 as i64,
                        )),
                    ],
                })
            }
            DELIVERY_ID => {
                let years: Vec<i32> = self
                    .repository
                    .delivery_records()
                    .iter()
                    .map(|r| r.year)
                    .collect();
                let first = *years.iter().min()?;
                let last = *years.iter().max()?;
                Some(DashboardLayout {
                    id: id.to_string(),
                    title: DELIVERY_TITLE.to_string(),
                    controls: vec![
                        Control::Slider(SliderControl::years(
                            "year",
                            "Year:",
                            first as i64,
                            last as i64,
                        )),
                        Control::Slider(transition_slider()),
                    ],
                })
            }
            WATER_ID => Some(DashboardLayout {
                id: id.to_string(),
                title: WATER_TITLE.to_string(),
                controls: vec![Control::Dropdown(DropdownControl {
                    id: "highlight".to_string(),
                    label: "Select a Federative Unit to highlight:".to_string(),
                    value: "*".to_string(),
                    options: std::iter::once(DropdownOption {
                        label: "All federative units".to_string(),
                        value: "*".to_string(),
                    })
                    .chain(ALL_UFS.iter().map(|uf| DropdownOption {
                        label: uf.abbreviation.to_string(),
                        value: uf.code.to_string(),
                    }))
                    .collect(),
                })],
            }),
            _ => None,
        }
    }
}

fn transition_slider() -> SliderControl {
    SliderControl {
        id: "transition_ms".to_string(),
        label: "Transition delay (ms):".to_string(),
        min: 0,
        max: 1000,
        step: 100,
        value: 500,
        marks: (0..=1000)
            .step_by(100)
            .map(|ms| SliderMark {
                position: ms,
                label: format!("{ms} ms"),
            })
            .collect(),
    }
}

/// Inclusive intersection of year ranges; `None` when any table is empty or
/// the ranges do not overlap.
fn intersect_ranges(ranges: &[Option<(i32, i32)>]) -> Option<(i32, i32)> {
    let mut merged: Option<(i32, i32)> = None;
    for range in ranges {
        let (lo, hi) = (*range)?;
        merged = Some(match merged {
            Some((mlo, mhi)) => (mlo.max(lo), mhi.min(hi)),
            None => (lo, hi),
        });
    }
    merged.filter(|(lo, hi)| lo <= hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_fixtures::fixture_repository;
    use crate::domain::dashboard::Control;

    #[test]
    fn test_list_dashboards() {
        let service = CatalogService::new(fixture_repository());
        let infos = service.list_dashboards();
        assert_eq!(infos.len(), 5);
        assert_eq!(infos[0].id, "prenatal");
        assert_eq!(infos[4].id, "water");
    }

    #[test]
    fn test_prenatal_layout_years_from_table() {
        let service = CatalogService::new(fixture_repository());
        let layout = service.dashboard_layout(PRENATAL_ID).unwrap();
        let Control::Slider(slider) = &layout.controls[0] else {
            panic!("expected a year slider");
        };
        assert_eq!(slider.min, 2000);
        assert_eq!(slider.max, 2001);
    }

    #[test]
    fn test_mortality_profile_layout_has_dropdown_and_slider() {
        let service = CatalogService::new(fixture_repository());
        let layout = service.dashboard_layout(MORTALITY_PROFILE_ID).unwrap();
        assert_eq!(layout.controls.len(), 2);
        let Control::Dropdown(dropdown) = &layout.controls[0] else {
            panic!("expected a UF dropdown");
        };
        assert_eq!(dropdown.value, "RO");
        assert_eq!(dropdown.options.len(), 27);
    }

    #[test]
    fn test_water_layout_has_wildcard_option() {
        let service = CatalogService::new(fixture_repository());
        let layout = service.dashboard_layout(WATER_ID).unwrap();
        let Control::Dropdown(dropdown) = &layout.controls[0] else {
            panic!("expected a highlight dropdown");
        };
        assert_eq!(dropdown.options[0].value, "*");
        assert_eq!(dropdown.options.len(), 28);
        // UF options use the numeric code as the value
        assert_eq!(dropdown.options[1].value, "11");
        assert_eq!(dropdown.options[1].label, "RO");
    }

    #[test]
    fn test_unknown_dashboard() {
        let service = CatalogService::new(fixture_repository());
        assert!(service.dashboard_layout("nope").is_none());
    }

    #[test]
    fn test_intersect_ranges() {
        assert_eq!(
            intersect_ranges(&[Some((2000, 2016)), Some((2010, 2015))]),
            Some((2010, 2015))
        );
        assert_eq!(intersect_ranges(&[Some((2000, 2005)), None]), None);
        assert_eq!(
            intersect_ranges(&[Some((2000, 2005)), Some((2010, 2015))]),
            None
        );
    }
}
