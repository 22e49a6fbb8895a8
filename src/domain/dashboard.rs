// Dashboard domain model - catalog entries and UI control descriptors
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardInfo {
    pub id: String,
    pub title: String,
}

impl DashboardInfo {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// Everything the front end needs to draw one dashboard page: the heading
/// plus the input controls whose values feed the figure endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardLayout {
    pub id: String,
    pub title: String,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Slider(SliderControl),
    Dropdown(DropdownControl),
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderControl {
    pub id: String,
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub value: i64,
    /// Tick positions with their captions, in ascending order.
    pub marks: Vec<SliderMark>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliderMark {
    pub position: i64,
    pub label: String,
}

impl SliderControl {
    /// Year slider over an inclusive range, one mark per year, starting at
    /// the first year.
    pub fn years(id: &str, label: &str, first: i64, last: i64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            min: first,
            max: last,
            step: 1,
            value: first,
            marks: (first..=last)
                .map(|y| SliderMark {
                    position: y,
                    label: y.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownControl {
    pub id: String,
    pub label: String,
    pub value: String,
    pub options: Vec<DropdownOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_slider_marks() {
        let slider = SliderControl::years("year", "Year:", 2000, 2015);
        assert_eq!(slider.min, 2000);
        assert_eq!(slider.max, 2015);
        assert_eq!(slider.value, 2000);
        assert_eq!(slider.marks.len(), 16);
        assert_eq!(slider.marks[0].label, "2000");
        assert_eq!(slider.marks[15].position, 2015);
    }

    #[test]
    fn test_control_json_tag() {
        let control = Control::Slider(SliderControl::years("year", "Year:", 2000, 2001));
        let json = serde_json::to_value(&control).unwrap();
        assert_eq!(json["kind"], "slider");
        assert_eq!(json["id"], "year");
    }
}
