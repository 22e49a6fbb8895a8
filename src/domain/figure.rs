// Chart description domain model - Plotly-shaped figure specs
//
// The service never renders anything; it hands these objects to the front
// end as JSON. Optional fields are omitted from the output entirely so the
// figure stays the sparse object the renderer expects.
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Default)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ScatterTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

impl ScatterTrace {
    pub fn markers(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            mode: Some("markers".to_string()),
            ..Self::default()
        }
    }

    pub fn labeled_markers(x: Vec<f64>, y: Vec<f64>, labels: Vec<String>) -> Self {
        Self {
            x,
            y,
            mode: Some("markers+text".to_string()),
            text: Some(labels),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
}

/// Marker size: one radius for the whole trace or one per point.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MarkerSize {
    Uniform(f64),
    PerPoint(Vec<f64>),
}

/// Marker color: a fixed CSS color or per-point numeric values mapped
/// through a colorscale.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Fixed(String),
    Values(Vec<f64>),
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<MarkerSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<MarkerLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis3: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis3: Option<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub duration: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub orientation: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
}

impl Axis {
    /// Axis with all decoration (ticks, grid, zero line) switched off, for
    /// layouts that only carry a centered annotation.
    pub fn hidden() -> Self {
        Self {
            showticklabels: Some(false),
            showgrid: Some(false),
            zeroline: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub line: ShapeLine,
}

impl Shape {
    pub fn line(x0: f64, y0: f64, x1: f64, y1: f64, color: &str, width: f64) -> Self {
        Self {
            shape_type: "line".to_string(),
            x0,
            y0,
            x1,
            y1,
            line: ShapeLine {
                color: color.to_string(),
                width,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeLine {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub showarrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Annotation {
    /// Free-standing text centered over a point in data coordinates (the
    /// donut-center annotation).
    pub fn centered(text: String, font_size: u32) -> Self {
        Self {
            text,
            x: 0.5,
            y: 0.5,
            showarrow: false,
            font: Some(Font { size: font_size }),
            ..Self::default()
        }
    }

    /// Subplot title pinned to paper coordinates above an x-domain.
    pub fn subplot_title(text: &str, domain: [f64; 2]) -> Self {
        Self {
            text: text.to_string(),
            x: (domain[0] + domain[1]) / 2.0,
            y: 1.0,
            showarrow: false,
            xref: Some("paper".to_string()),
            yref: Some("paper".to_string()),
            font: Some(Font { size: 16 }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
}

/// Horizontal subplot domains for a 1×n grid with the given spacing between
/// columns, mirroring how the figure factory splits paper coordinates.
pub fn subplot_domains(cols: usize, spacing: f64) -> Vec<[f64; 2]> {
    if cols == 0 {
        return Vec::new();
    }
    let width = (1.0 - spacing * (cols as f64 - 1.0)) / cols as f64;
    (0..cols)
        .map(|i| {
            let start = i as f64 * (width + spacing);
            [start, start + width]
        })
        .collect()
}
