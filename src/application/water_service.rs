// Water dashboard service - water-supply coverage vs neonatal mortality
//
// Two subplots (2000 and 2010). Each UF is one marker whose y is the
// water-supply coverage and whose radius grows with mortality scaled by the
// inverse of the supply fraction. The x coordinate is synthetic: UFs are
// lined up around the year value, grouped by region, so the chart reads as
// a labeled strip rather than a true scatter.
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::figure::{
    subplot_domains, Annotation, Axis, Figure, Layout, Marker, MarkerColor, MarkerLine,
    MarkerSize, ScatterTrace, Trace,
};
use crate::domain::geo::{Region, Uf, ALL_UFS};
use crate::domain::stats::supply_scaled_radius;
use std::collections::HashSet;
use std::sync::Arc;

const POSITION_STEP: f64 = 0.15;
const REGION_SKIP: f64 = 0.5;
const SUBPLOT_YEARS: [i32; 2] = [2000, 2010];
const DIMMED_OPACITY: f64 = 0.25;

/// Dropdown sentinel for "no UF highlighted".
pub const HIGHLIGHT_ALL: &str = "*";

#[derive(Clone)]
pub struct WaterService {
    repository: Arc<dyn DatasetRepository>,
}

impl WaterService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    pub fn figure(&self, highlight: &str) -> Figure {
        let supply = self.repository.water_supply();
        let mortality = self.repository.water_mortality();
        let offsets = position_offsets();
        let domains = subplot_domains(SUBPLOT_YEARS.len(), 0.025);

        let mut traces = Vec::new();
        for (subplot, year) in SUBPLOT_YEARS.iter().enumerate() {
            let mut regions_in_legend: HashSet<Region> = HashSet::new();

            for region in Region::ALL {
                for uf in Uf::in_region(region) {
                    let key = uf.code.to_string();
                    let (Some(coverage), Some(rate)) =
                        (supply.value(&key, *year), mortality.value(&key, *year))
                    else {
                        continue;
                    };

                    let position = *year as f64 + offsets[&uf.code];
                    let dimmed =
                        highlight != HIGHLIGHT_ALL && highlight != uf.code.to_string();
                    // One legend entry per region, wired to the first subplot.
                    let in_legend = subplot == 0 && regions_in_legend.insert(region);

                    traces.push(Trace::Scatter(ScatterTrace {
                        textposition: Some("top center".to_string()),
                        hoverinfo: Some("text".to_string()),
                        // Debug float formatting keeps the trailing .0 on
                        // integral coverage values.
                        hovertext: Some(vec![format!(
                            "Federative Unit: {}<br>Neonatal mortality: {rate:.2} in every 1000<br>\
                             Water supply: {coverage:?}%",
                            uf.abbreviation
                        )]),
                        marker: Some(Marker {
                            size: Some(MarkerSize::PerPoint(vec![supply_scaled_radius(
                                rate, coverage,
                            )])),
                            color: Some(MarkerColor::Fixed(region.color().to_string())),
                            line: Some(MarkerLine {
                                color: "black".to_string(),
                                width: 1.0,
                            }),
                            ..Marker::default()
                        }),
                        name: Some(region.label().to_string()),
                        showlegend: Some(in_legend),
                        legendgroup: in_legend.then(|| "legendgroup-1".to_string()),
                        opacity: dimmed.then_some(DIMMED_OPACITY),
                        xaxis: Some(if subplot == 0 { "x".into() } else { "x2".into() }),
                        yaxis: Some(if subplot == 0 { "y".into() } else { "y2".into() }),
                        ..ScatterTrace::labeled_markers(
                            vec![position],
                            vec![coverage],
                            vec![uf.abbreviation.to_string()],
                        )
                    }));
                }
            }
        }

        Figure {
            data: traces,
            layout: Layout {
                height: Some(800),
                hovermode: Some("closest".to_string()),
                showlegend: Some(true),
                xaxis: Some(Axis {
                    domain: Some(domains[0]),
                    anchor: Some("y".to_string()),
                    tickvals: Some(vec![SUBPLOT_YEARS[0] as f64]),
                    ..Axis::default()
                }),
                xaxis2: Some(Axis {
                    domain: Some(domains[1]),
                    anchor: Some("y2".to_string()),
                    tickvals: Some(vec![SUBPLOT_YEARS[1] as f64]),
                    ..Axis::default()
                }),
                yaxis: Some(Axis {
                    title: Some("Water supply (%)".to_string()),
                    range: Some([70.0, 104.0]),
                    anchor: Some("x".to_string()),
                    ..Axis::default()
                }),
                yaxis2: Some(Axis {
                    anchor: Some("x2".to_string()),
                    ..Axis::default()
                }),
                annotations: SUBPLOT_YEARS
                    .iter()
                    .enumerate()
                    .map(|(idx, year)| Annotation::subplot_title(&year.to_string(), domains[idx]))
                    .collect(),
                ..Layout::default()
            },
        }
    }
}

/// Year-independent x offset per UF: a centered strip advancing one STEP per
/// UF and one extra SKIP between regions, walked in region order.
fn position_offsets() -> std::collections::HashMap<u8, f64> {
    let uf_count = ALL_UFS.len() as f64;
    let gap_count = (Region::ALL.len() - 1) as f64;
    // Only the four between-region gaps count towards centering; the skip
    // added after the last region never lands under a marker.
    let mut offset = -((uf_count * POSITION_STEP) + (gap_count * REGION_SKIP)) / 2.0;

    let mut offsets = std::collections::HashMap::new();
    for region in Region::ALL {
        for uf in Uf::in_region(region) {
            offsets.insert(uf.code, offset);
            offset += POSITION_STEP;
        }
        offset += REGION_SKIP;
    }
    offsets
}
