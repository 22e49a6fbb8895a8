// Prenatal dashboard service - vaccination vs first-trimester care per CIR
//
// One point per health region (CIR): x is the share of pregnant women
// vaccinated, y the share starting prenatal care in the first trimester,
// color the neonatal mortality rate, plus an OLS trend line over the year.
use crate::application::dataset_repository::{DataError, DatasetRepository};
use crate::domain::figure::{
    Axis, ColorBar, Figure, Layout, Marker, MarkerColor, MarkerSize, ScatterTrace, Shape, Trace,
    Transition,
};
use crate::domain::stats::linear_fit;
use std::sync::Arc;

const TREND_LINE_END_X: f64 = 103.0;

#[derive(Clone)]
pub struct PrenatalService {
    repository: Arc<dyn DatasetRepository>,
}

impl PrenatalService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    /// Initial slider value when the request carries no year.
    pub fn default_year(&self) -> i32 {
        self.repository
            .prenatal_first_trimester()
            .year_range()
            .map(|(first, _)| first)
            .unwrap_or(2000)
    }

    pub fn figure(&self, year: i32) -> Result<Figure, DataError> {
        let first_trimester = self.repository.prenatal_first_trimester();
        let vaccination = self.repository.prenatal_vaccination();
        let mortality = self.repository.prenatal_mortality();

        if !first_trimester.has_year(year) {
            return Err(DataError::MissingYear {
                table: first_trimester.name().to_string(),
                year,
            });
        }

        let (mortality_min, mortality_max) = mortality.year_extent(year).unwrap_or((0.0, 0.0));

        // The fit runs over every CIR, zeros included; only the plotted
        // points drop the zero entries. That asymmetry is deliberate and
        // matches the published charts.
        let mut fit_points = Vec::new();
        let mut min_nonzero_x = 100.0f64;
        for cir in first_trimester.keys() {
            let (Some(x), Some(y)) = (vaccination.value(cir, year), first_trimester.value(cir, year))
            else {
                continue;
            };
            fit_points.push((x, y));
            if x != 0.0 {
                min_nonzero_x = min_nonzero_x.min(x);
            }
        }

        let first_cir = first_trimester.keys().next().map(str::to_string);
        let mut traces = Vec::new();
        for cir in first_trimester.keys() {
            let (Some(x), Some(y)) = (vaccination.value(cir, year), first_trimester.value(cir, year))
            else {
                continue;
            };
            if x == 0.0 || y == 0.0 {
                continue;
            }

            let colorbar = (Some(cir) == first_cir.as_deref()).then(|| ColorBar {
                title: "Neonatal mortality (per thousand)".to_string(),
            });
            let mortality_value = mortality.value(cir, year).unwrap_or(0.0);

            traces.push(Trace::Scatter(ScatterTrace {
                hoverinfo: Some("text".to_string()),
                hovertext: Some(vec![format!(
                    "CIR: {cir}<br>Vaccinated pregnant women: {x:.2}%<br>\
                     Prenatal care started in the 1st trimester: {y:.2}%<br>\
                     Neonatal mortality: {mortality_value:.2} per thousand"
                )]),
                marker: Some(Marker {
                    size: Some(MarkerSize::Uniform(10.0)),
                    color: Some(MarkerColor::Values(vec![mortality_value])),
                    cmin: Some(mortality_min),
                    cmax: Some(mortality_max),
                    colorscale: Some("bluered".to_string()),
                    colorbar,
                    ..Marker::default()
                }),
                showlegend: Some(false),
                ..ScatterTrace::markers(vec![x], vec![y])
            }));
        }

        let trend_start_x = min_nonzero_x - 5.0;
        let shapes = match linear_fit(&fit_points) {
            Some(fit) => vec![Shape::line(
                trend_start_x,
                fit.at(trend_start_x),
                TREND_LINE_END_X,
                fit.at(TREND_LINE_END_X),
                "LightSeaGreen",
                5.0,
            )],
            None => {
                tracing::debug!(year, "degenerate trend line omitted");
                Vec::new()
            }
        };

        Ok(Figure {
            data: traces,
            layout: Layout {
                xaxis: Some(Axis {
                    title: Some("Vaccinated pregnant women (%)".to_string()),
                    range: Some([-5.0, 105.0]),
                    ..Axis::default()
                }),
                yaxis: Some(Axis {
                    title: Some(
                        "Pregnant women starting prenatal care in the 1st trimester (%)"
                            .to_string(),
                    ),
                    range: Some([-5.0, 105.0]),
                    ..Axis::default()
                }),
                hovermode: Some("closest".to_string()),
                height: Some(800),
                width: Some(1500),
                transition: Some(Transition { duration: 600 }),
                shapes,
                ..Layout::default()
            },
        })
    }
}
