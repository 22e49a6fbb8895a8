// Immunization dashboard service - appointments vs immunizations per UF
//
// Three subplots, one per prenatal-appointment band, each a scatter of
// appointment coverage (x) against immunization coverage (y) with marker
// radius scaled from neonatal mortality and one trace per region.
use crate::application::dataset_repository::{AppointmentBand, DataError, DatasetRepository};
use crate::domain::figure::{
    subplot_domains, Annotation, Axis, Figure, Layout, Marker, MarkerColor, MarkerSize,
    ScatterTrace, Trace, Transition,
};
use crate::domain::geo::{Region, Uf};
use crate::domain::stats::log_radius;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const SUBPLOT_SPACING: f64 = 0.025;
const LOCKED_X_RANGE: [f64; 2] = [-9.0, 109.0];
const LOCKED_Y_RANGE: [f64; 2] = [-9.0, 119.0];

/// Whether the subplot axes are pinned to fixed ranges. Transitions are only
/// animated once both axes are pinned, otherwise the renderer would tween
/// the axes along with the points.
#[derive(Debug, Clone, Copy)]
pub struct AxisLock {
    pub x: bool,
    pub y: bool,
}

pub struct ImmunizationService {
    repository: Arc<dyn DatasetRepository>,
    axis_lock: AxisLock,
    first_render: AtomicBool,
}

impl ImmunizationService {
    pub fn new(repository: Arc<dyn DatasetRepository>, axis_lock: AxisLock) -> Self {
        Self {
            repository,
            axis_lock,
            first_render: AtomicBool::new(true),
        }
    }

    /// Initial slider value when the request carries no year.
    pub fn default_year(&self) -> i32 {
        self.repository
            .immunization_coverage()
            .year_range()
            .map(|(first, _)| first)
            .unwrap_or(2000)
    }

    pub fn figure(&self, year: i32) -> Result<Figure, DataError> {
        let coverage = self.repository.immunization_coverage();
        let mortality = self.repository.immunization_mortality();

        if !coverage.has_year(year) {
            return Err(DataError::MissingYear {
                table: coverage.name().to_string(),
                year,
            });
        }

        let mut traces = Vec::new();
        for (band_idx, band) in AppointmentBand::ALL.iter().enumerate() {
            let appointments = self.repository.appointment_band(*band);

            for region in Region::ALL {
                let mut xs = Vec::new();
                let mut ys = Vec::new();
                let mut labels = Vec::new();
                let mut hover = Vec::new();
                let mut sizes = Vec::new();

                for uf in Uf::in_region(region) {
                    let key = uf.code.to_string();
                    let (Some(x), Some(y), Some(m)) = (
                        appointments.value(&key, year),
                        coverage.value(&key, year),
                        mortality.value(&key, year),
                    ) else {
                        continue;
                    };

                    // Debug float formatting keeps the trailing .0 on
                    // integral mortality rates.
                    hover.push(format!(
                        "Federative Unit: {}<br>Percentage of appointments: {x:.2}%<br>\
                         Percentage of immunizations: {y:.2}%<br>\
                         Neonatal mortality: {m:?} in every 1000",
                        uf.abbreviation
                    ));
                    xs.push(x);
                    ys.push(y);
                    labels.push(uf.abbreviation.to_string());
                    sizes.push(log_radius(m));
                }

                if xs.is_empty() {
                    continue;
                }

                traces.push(Trace::Scatter(ScatterTrace {
                    textposition: Some("middle right".to_string()),
                    hoverinfo: Some("text".to_string()),
                    hovertext: Some(hover),
                    marker: Some(Marker {
                        size: Some(MarkerSize::PerPoint(sizes)),
                        color: Some(MarkerColor::Fixed(region.color().to_string())),
                        ..Marker::default()
                    }),
                    name: Some(region.label().to_string()),
                    showlegend: Some(band_idx == 0),
                    xaxis: Some(subplot_axis_ref("x", band_idx)),
                    yaxis: Some(subplot_axis_ref("y", band_idx)),
                    ..ScatterTrace::labeled_markers(xs, ys, labels)
                }));
            }
        }

        let was_first = self.first_render.swap(false, Ordering::Relaxed);
        let transition = (self.axis_lock.x && self.axis_lock.y && !was_first)
            .then_some(Transition { duration: 500 });

        Ok(Figure {
            data: traces,
            layout: self.subplot_layout(transition),
        })
    }

    fn subplot_layout(&self, transition: Option<Transition>) -> Layout {
        let domains = subplot_domains(AppointmentBand::ALL.len(), SUBPLOT_SPACING);
        let x_range = self.axis_lock.x.then_some(LOCKED_X_RANGE);
        let y_range = self.axis_lock.y.then_some(LOCKED_Y_RANGE);

        let x_axis = |idx: usize, title: Option<&str>| Axis {
            title: title.map(str::to_string),
            range: x_range,
            domain: Some(domains[idx]),
            anchor: Some(subplot_axis_ref("y", idx)),
            ..Axis::default()
        };
        let y_axis = |idx: usize, title: Option<&str>| Axis {
            title: title.map(str::to_string),
            range: y_range,
            anchor: Some(subplot_axis_ref("x", idx)),
            ..Axis::default()
        };

        Layout {
            height: Some(700),
            hovermode: Some("closest".to_string()),
            transition,
            xaxis: Some(x_axis(0, None)),
            xaxis2: Some(x_axis(1, Some("Coverage of prenatal appointments (%)"))),
            xaxis3: Some(x_axis(2, None)),
            yaxis: Some(y_axis(0, Some("Immunizations (%)"))),
            yaxis2: Some(y_axis(1, None)),
            yaxis3: Some(y_axis(2, None)),
            annotations: AppointmentBand::ALL
                .iter()
                .enumerate()
                .map(|(idx, band)| Annotation::subplot_title(band.subplot_title(), domains[idx]))
                .collect(),
            ..Layout::default()
        }
    }
}

/// Plotly subplot axis reference: "x"/"y" for the first subplot, "x2"/"y2"
/// for the second, and so on.
fn subplot_axis_ref(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_fixtures::fixture_repository;
    use crate::domain::figure::Trace;

    fn scatter_traces(figure: &Figure) -> Vec<&ScatterTrace> {
        figure
            .data
            .iter()
            .map(|t| match t {
                Trace::Scatter(s) => s,
                _ => panic!("expected scatter traces"),
            })
            .collect()
    }

    #[test]
    fn test_legend_only_on_first_band() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        let figure = service.figure(2000).unwrap();
        let traces = scatter_traces(&figure);

        assert!(!traces.is_empty());
        for trace in &traces {
            let on_first_band = trace.xaxis.as_deref() == Some("x");
            assert_eq!(trace.showlegend, Some(on_first_band));
        }
    }

    #[test]
    fn test_marker_radius_from_mortality() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        let figure = service.figure(2000).unwrap();
        let traces = scatter_traces(&figure);

        let Some(Marker {
            size: Some(MarkerSize::PerPoint(sizes)),
            ..
        }) = &traces[0].marker
        else {
            panic!("expected per-point sizes");
        };
        // fixture: RO mortality 2000 is 20.0
        assert!((sizes[0] - log_radius(20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_transition_needs_lock_and_prior_render() {
        let locked = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        // first render: never animated
        assert!(locked.figure(2000).unwrap().layout.transition.is_none());
        // second render: animated
        assert_eq!(
            locked.figure(2000).unwrap().layout.transition.map(|t| t.duration),
            Some(500)
        );

        let unlocked =
            ImmunizationService::new(fixture_repository(), AxisLock { x: false, y: true });
        unlocked.figure(2000).unwrap();
        assert!(unlocked.figure(2000).unwrap().layout.transition.is_none());
    }

    #[test]
    fn test_locked_ranges() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        let figure = service.figure(2000).unwrap();
        assert_eq!(figure.layout.xaxis.as_ref().unwrap().range, Some(LOCKED_X_RANGE));
        assert_eq!(figure.layout.yaxis3.as_ref().unwrap().range, Some(LOCKED_Y_RANGE));

        let free = ImmunizationService::new(fixture_repository(), AxisLock { x: false, y: false });
        let figure = free.figure(2000).unwrap();
        assert_eq!(figure.layout.xaxis.as_ref().unwrap().range, None);
    }

    #[test]
    fn test_hover_keeps_trailing_zero_on_integral_mortality() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        let figure = service.figure(2000).unwrap();
        let traces = scatter_traces(&figure);

        // fixture: RO mortality 2000 is 20.0 and must not flatten to "20"
        let hover = &traces[0].hovertext.as_ref().unwrap()[0];
        assert!(hover.contains("Neonatal mortality: 20.0 in every 1000"));
    }

    #[test]
    fn test_subplot_titles() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        let figure = service.figure(2000).unwrap();
        let titles: Vec<&str> = figure
            .layout
            .annotations
            .iter()
            .map(|a| a.text.as_str())
            .collect();
        assert_eq!(
            titles,
            vec!["No appointments", "1 to 6 appointments", "7 or more appointments"]
        );
    }

    #[test]
    fn test_missing_year() {
        let service = ImmunizationService::new(fixture_repository(), AxisLock { x: true, y: true });
        assert!(matches!(
            service.figure(1980),
            Err(DataError::MissingYear { .. })
        ));
    }
}
