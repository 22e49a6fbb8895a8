// Mortality-profile dashboard service - causes of death vs GDP and HDI
//
// A donut of neonatal deaths by CID-10 cause for one UF and year, with the
// UF's totals, GDP, HDI and mortality rate written in the hole.
use crate::application::dataset_repository::{DataError, DatasetRepository};
use crate::domain::figure::{Annotation, Axis, Figure, Layout, Legend, PieTrace, Trace};
use crate::domain::geo::Uf;
use crate::domain::stats::format_gdp_brl;
use std::sync::Arc;

#[derive(Clone)]
pub struct MortalityProfileService {
    repository: Arc<dyn DatasetRepository>,
}

impl MortalityProfileService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    /// Initial slider value when the request carries no year.
    pub fn default_year(&self) -> i32 {
        self.repository
            .gdp()
            .year_range()
            .map(|(first, _)| first)
            .unwrap_or(2010)
    }

    pub fn figure(&self, uf_abbr: &str, year: i32) -> Result<Figure, DataError> {
        let uf = Uf::from_abbreviation(uf_abbr).ok_or_else(|| DataError::UnknownKey {
            table: "federative units".to_string(),
            key: uf_abbr.to_string(),
        })?;

        let causes: Vec<_> = self
            .repository
            .death_causes()
            .iter()
            .filter(|row| row.uf == uf.abbreviation && row.year == year)
            .collect();
        let total_deaths: u64 = causes.iter().map(|row| row.total).sum();

        let gdp = self.repository.gdp().require(uf.abbreviation, year)?;
        let hdi = self.repository.hdi().require(uf.abbreviation, year)?;
        let mortality = self
            .repository
            .uf_mortality()
            .require(uf.abbreviation, year)?;

        let mut labels = Vec::new();
        let mut values = Vec::new();
        let mut hover = Vec::new();
        for row in &causes {
            labels.push(row.cause.clone());
            values.push(row.total as f64);
            let share = row.total as f64 * 100.0 / total_deaths as f64;
            hover.push(format!(
                "{}<br>Deaths: {} ({share:.1}%)",
                row.cause, row.total
            ));
        }

        let annotation_text = format!(
            "Federative Unit: {}<br>Total number of deaths: {total_deaths}<br>\
             GDP: {}<br>HDI: {hdi:.3}<br>Neonatal mortality: {mortality:.2}\u{2030}",
            uf.abbreviation,
            format_gdp_brl(gdp.round() as u64),
        );

        Ok(Figure {
            data: vec![Trace::Pie(PieTrace {
                labels,
                values,
                hole: Some(0.6),
                hoverinfo: Some("text".to_string()),
                hovertext: Some(hover),
            })],
            layout: Layout {
                hovermode: Some("closest".to_string()),
                height: Some(700),
                plot_bgcolor: Some("white".to_string()),
                xaxis: Some(Axis::hidden()),
                yaxis: Some(Axis::hidden()),
                annotations: vec![Annotation::centered(annotation_text, 18)],
                legend: Some(Legend {
                    orientation: "v".to_string(),
                }),
                ..Layout::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_fixtures::fixture_repository;
    use crate::domain::figure::Trace;

    #[test]
    fn test_donut_slices_and_shares() {
        let service = MortalityProfileService::new(fixture_repository());
        let figure = service.figure("RO", 2010).unwrap();

        let Trace::Pie(pie) = &figure.data[0] else {
            panic!("expected a pie trace");
        };
        assert_eq!(pie.hole, Some(0.6));
        // fixture: 60 + 40 deaths
        assert_eq!(pie.values, vec![60.0, 40.0]);
        let hover = pie.hovertext.as_ref().unwrap();
        assert!(hover[0].contains("Deaths: 60 (60.0%)"));
        assert!(hover[1].contains("(40.0%)"));
    }

    #[test]
    fn test_center_annotation() {
        let service = MortalityProfileService::new(fixture_repository());
        let figure = service.figure("RO", 2010).unwrap();

        let annotation = &figure.layout.annotations[0];
        assert!(annotation.text.contains("Federative Unit: RO"));
        assert!(annotation.text.contains("Total number of deaths: 100"));
        // fixture GDP is 23_561_000 thousand BRL
        assert!(annotation.text.contains("GDP: R$23.5 billion"));
        assert!(annotation.text.contains("HDI: 0.690"));
        assert!(annotation.text.contains("Neonatal mortality: 12.34\u{2030}"));
        assert_eq!(annotation.x, 0.5);
        assert!(!annotation.showarrow);
    }

    #[test]
    fn test_unknown_uf() {
        let service = MortalityProfileService::new(fixture_repository());
        assert!(matches!(
            service.figure("XX", 2010),
            Err(DataError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_year_missing_from_gdp_table() {
        let service = MortalityProfileService::new(fixture_repository());
        assert!(matches!(
            service.figure("RO", 1990),
            Err(DataError::MissingYear { .. })
        ));
    }

    #[test]
    fn test_hidden_axes_and_white_background() {
        let service = MortalityProfileService::new(fixture_repository());
        let figure = service.figure("RO", 2010).unwrap();
        assert_eq!(figure.layout.plot_bgcolor.as_deref(), Some("white"));
        assert_eq!(
            figure.layout.xaxis.as_ref().unwrap().showticklabels,
            Some(false)
        );
    }
}
