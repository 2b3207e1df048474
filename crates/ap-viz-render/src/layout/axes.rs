use ap_viz::PanelAxis;

/// Axis configuration with tick generation and data→pixel mapping.
///
/// Heatmap axes span exactly the outermost bin edges; ticks falling outside
/// are dropped rather than extending the range.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    /// Cell boundaries in axis coordinates.
    pub edges: Vec<f64>,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Axis for one binning dimension: categorical if the bins are named,
    /// logarithmic if the binning is log-spaced, linear otherwise.
    pub fn from_panel_axis(axis: &PanelAxis, target_ticks: usize) -> Self {
        let ax = match &axis.bin_names {
            Some(names) => Self::categorical(names),
            None => Self::from_edges(&axis.bin_edges, axis.is_log, target_ticks),
        };
        ax.with_label(axis.label.clone())
    }

    pub fn from_edges(edges: &[f64], log: bool, target_ticks: usize) -> Self {
        let min = edges.first().copied().unwrap_or(0.0);
        let max = edges.last().copied().unwrap_or(1.0);
        let mut ax = if log && min > 0.0 {
            Self::log_within(min, max)
        } else {
            Self::linear_within(min, max, target_ticks)
        };
        ax.edges = edges.to_vec();
        ax
    }

    /// Linear axis over exactly `[min, max]` with "nice number" ticks inside.
    pub fn linear_within(min: f64, max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(min, max, target_ticks);
        let tol = step * 1e-6;
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();
        let minor_step = step / 5.0;
        let n_major = ((nice_max - nice_min) / step).round() as i64;
        for i in 0..=n_major {
            let v = nice_min + i as f64 * step;
            if v >= min - tol && v <= max + tol {
                ticks.push(v);
                labels.push(format_tick(v, step));
            }
            for j in 1..5 {
                let mv = v + j as f64 * minor_step;
                if mv > min && mv < max {
                    minor.push(mv);
                }
            }
        }
        let (min, max) = if (max - min).abs() < 1e-15 { (min - 1.0, max + 1.0) } else { (min, max) };

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            edges: vec![min, max],
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis over exactly `[min, max]` (both positive).
    pub fn log_within(min: f64, max: f64) -> Self {
        let log_min = min.log10().floor() as i32;
        let log_max = max.log10().ceil() as i32;
        let tol = 1e-9;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();

        for exp in log_min..=log_max {
            let v = 10.0_f64.powi(exp);
            if v >= min * (1.0 - tol) && v <= max * (1.0 + tol) {
                ticks.push(v);
                labels.push(format!("10{}", superscript(exp)));
            }
            for m in 2..=9 {
                let mv = m as f64 * v;
                if mv > min && mv < max {
                    minor.push(mv);
                }
            }
        }

        // Less than a decade: label the ends instead.
        if ticks.len() < 2 {
            ticks = vec![min, max];
            labels = vec![format_sig(min), format_sig(max)];
        }

        Self {
            min,
            max,
            log: true,
            label: String::new(),
            edges: vec![min, max],
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// One unit-width cell per name, ticks at the cell centers.
    pub fn categorical(names: &[String]) -> Self {
        let n = names.len();
        Self {
            min: 0.0,
            max: n.max(1) as f64,
            log: false,
            label: String::new(),
            edges: (0..=n).map(|i| i as f64).collect(),
            tick_positions: (0..n).map(|i| i as f64 + 0.5).collect(),
            tick_labels: names.to_vec(),
            minor_ticks: Vec::new(),
        }
    }

    /// Single unlabeled cell (the row of a 1-D heatmap).
    pub fn single_row() -> Self {
        let mut ax = Self::categorical(&[String::new()]);
        ax.tick_positions.clear();
        ax.tick_labels.clear();
        ax
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn num_cells(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Pixel span `(start, end)` of cell `i`.
    pub fn cell_span(&self, i: usize, px_min: f64, px_max: f64) -> (f64, f64) {
        (self.data_to_pixel(self.edges[i], px_min, px_max), self.data_to_pixel(self.edges[i + 1], px_min, px_max))
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let log_val = value.max(1e-300).ln();
            let log_min = self.min.max(1e-300).ln();
            let log_max = self.max.max(1e-300).ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

pub(crate) fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", v, prec = decimals)
    }
}

fn format_sig(value: f64) -> String {
    let s = format!("{value:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            '9' => '\u{2079}',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_ticks_stay_inside() {
        let ax = Axis::linear_within(-0.3, 10.7, 6);
        assert_eq!(ax.min, -0.3);
        assert_eq!(ax.max, 10.7);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.tick_positions.iter().all(|t| *t >= -0.3 && *t <= 10.7));
        assert_eq!(ax.tick_labels[0], "0");
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::linear_within(0.0, 100.0, 5);
        assert_relative_eq!(ax.data_to_pixel(50.0, 0.0, 500.0), 250.0);
    }

    #[test]
    fn log_axis_over_edges() {
        let ax = Axis::from_edges(&[1.0, 3.0, 10.0, 100.0], true, 5);
        assert!(ax.log);
        assert_eq!(ax.num_cells(), 3);
        assert_eq!(ax.tick_labels, vec!["10\u{2070}", "10\u{00B9}", "10\u{00B2}"]);
        assert_relative_eq!(ax.data_to_pixel(10.0, 0.0, 200.0), 100.0, epsilon = 1e-9);
        let (a, b) = ax.cell_span(2, 0.0, 200.0);
        assert_relative_eq!(a, 100.0, epsilon = 1e-9);
        assert_relative_eq!(b, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn log_axis_under_a_decade_labels_ends() {
        let ax = Axis::log_within(2.0, 8.0);
        assert_eq!(ax.tick_labels, vec!["2", "8"]);
    }

    #[test]
    fn non_positive_log_edges_fall_back_to_linear() {
        let ax = Axis::from_edges(&[0.0, 1.0, 2.0], true, 5);
        assert!(!ax.log);
    }

    #[test]
    fn categorical_cells() {
        let names = vec!["cscd".to_string(), "trck".to_string()];
        let ax = Axis::categorical(&names);
        assert_eq!(ax.num_cells(), 2);
        assert_eq!(ax.tick_positions, vec![0.5, 1.5]);
        assert_eq!(ax.tick_labels, names);
    }

    #[test]
    fn nice_step_values() {
        assert!((nice_step(3.2) - 2.0).abs() < 1e-9);
        assert!((nice_step(0.7) - 0.5).abs() < 1e-9);
        assert!((nice_step(15.0) - 10.0).abs() < 1e-9);
        assert!((nice_step(4.5) - 5.0).abs() < 1e-9);
        assert!((nice_step(1.2) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tick_format_avoids_negative_zero() {
        assert_eq!(format_tick(-1e-12, 0.5), "0.0");
        assert_eq!(format_tick(2.5, 0.5), "2.5");
    }
}
