// Delivery dashboard service - caesarean vs hospital births per UF
use crate::application::dataset_repository::{DataError, DatasetRepository, DeliveryRecord};
use crate::domain::figure::{
    Axis, Figure, Layout, Marker, MarkerSize, ScatterTrace, Trace, Transition,
};
use crate::domain::geo::{Region, Uf};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeliveryService {
    repository: Arc<dyn DatasetRepository>,
}

impl DeliveryService {
    pub fn new(repository: Arc<dyn DatasetRepository>) -> Self {
        Self { repository }
    }

    /// Initial slider value when the request carries no year.
    pub fn default_year(&self) -> i32 {
        self.repository
            .delivery_records()
            .iter()
            .map(|r| r.year)
            .min()
            .unwrap_or(2000)
    }

    /// One trace per region for the requested year. The transition duration
    /// is itself a UI control on this dashboard, so it arrives with the
    /// request instead of being a layout constant.
    pub fn figure(&self, year: i32, transition_ms: u64) -> Result<Figure, DataError> {
        let records: Vec<&DeliveryRecord> = self
            .repository
            .delivery_records()
            .iter()
            .filter(|r| r.year == year)
            .collect();
        if records.is_empty() {
            return Err(DataError::MissingYear {
                table: "delivery workbook".to_string(),
                year,
            });
        }

        let mut traces = Vec::new();
        for region in Region::ALL {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            let mut labels = Vec::new();
            let mut hover = Vec::new();
            let mut sizes = Vec::new();

            for record in &records {
                let Some(uf) = Uf::from_code(record.uf_code) else {
                    continue;
                };
                if uf.region() != region {
                    continue;
                }

                hover.push(format!(
                    "Federative Unit: {}<br>Caesarean births: {:.2}%<br>\
                     Hospital births: {:.2}%<br>Neonatal mortality: {:.2}% in every 1000",
                    uf.abbreviation, record.caesarean_pct, record.hospital_pct, record.mortality
                ));
                xs.push(record.caesarean_pct);
                ys.push(record.hospital_pct);
                labels.push(uf.abbreviation.to_string());
                sizes.push(record.radius);
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
                    ..Marker::default()
                }),
                name: Some(region.label().to_string()),
                ..ScatterTrace::labeled_markers(xs, ys, labels)
            }));
        }

        Ok(Figure {
            data: traces,
            layout: Layout {
                xaxis: Some(Axis {
                    title: Some("Caesarean births (%)".to_string()),
                    ..Axis::default()
                }),
                yaxis: Some(Axis {
                    title: Some("Hospital births (%)".to_string()),
                    ..Axis::default()
                }),
                height: Some(800),
                hovermode: Some("closest".to_string()),
                transition: Some(Transition {
                    duration: transition_ms,
                }),
                ..Layout::default()
            },
        })
    }
}
