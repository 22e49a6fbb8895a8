// Closed-form arithmetic shared by the dashboards
/// Slope/intercept of an ordinary-least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line through `(x, y)` pairs. `None` for fewer than two
/// points or zero variance in x (vertical line).
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len() as f64;
    if points.len() < 2 {
        return None;
    }

    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxy = 0.0;
    let mut sx2 = 0.0;
    for (x, y) in points {
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }

    let denom = n * sx2 - sx * sx;
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    Some(LinearFit { slope, intercept })
}

/// Marker radius for a mortality rate: `(log10(2^m))^2 + 15`, computed as
/// `(m * log10(2))^2 + 15` so large rates cannot overflow the pow.
pub fn log_radius(mortality: f64) -> f64 {
    let l = mortality * std::f64::consts::LOG10_2;
    l * l + 15.0
}

/// Marker radius for the water dashboard: mortality doubled and inflated by
/// the inverse of the water-supply fraction, so poorly supplied UFs with the
/// same mortality draw bigger.
pub fn supply_scaled_radius(mortality: f64, supply_pct: f64) -> f64 {
    2.0 * mortality / (supply_pct / 100.0)
}

/// Decimal digit groups of `n`, most significant first, in runs of three
/// counted from the right ("1234567" -> ["1", "234", "567"]).
pub fn thousand_groups(n: u64) -> Vec<String> {
    let digits = n.to_string();
    let mut groups = Vec::new();
    let bytes = digits.as_bytes();
    let first = bytes.len() % 3;
    if first > 0 {
        groups.push(digits[..first].to_string());
    }
    let mut i = first;
    while i < bytes.len() {
        groups.push(digits[i..i + 3].to_string());
        i += 3;
    }
    groups
}

/// Human-readable GDP string. Input is the raw table value, which is in
/// thousands of BRL; output is e.g. "R$1.8 trillion" or "R$764 million",
/// keeping one decimal digit only when it is nonzero.
pub fn format_gdp_brl(gdp_thousands: u64) -> String {
    let value = gdp_thousands * 1000;
    let digits = value.to_string().len();
    let suffix = if digits >= 13 {
        "trillion"
    } else if digits >= 10 {
        "billion"
    } else if digits >= 7 {
        "million"
    } else {
        "thousand"
    };

    let groups = thousand_groups(value);
    let lead = groups[0].clone();
    let decimal = groups
        .get(1)
        .map(|g| &g[..1])
        .filter(|d| *d != "0")
        .map(|d| format!(".{d}"))
        .unwrap_or_default();

    format!("R${lead}{decimal} {suffix}")
}
