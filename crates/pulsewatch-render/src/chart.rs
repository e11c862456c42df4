//! Chart model built from the rolling history.

use crate::history::RollingHistory;

/// How a sink should apply a chart update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawMode {
    /// Entrance animation. Used only for the first frame.
    Animated,
    /// Swap in the new data with no transition.
    Immediate,
}

/// One named line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    /// Stroke color, CSS hex.
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// Everything a sink needs to draw the line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    /// X-axis time labels, oldest first.
    pub labels: Vec<String>,
    /// CPU, memory, and load, in that order.
    pub series: [Series; 3],
}

/// Percent axes read best against a 0–100 scale.
const SUGGESTED_MAX: f64 = 100.0;

impl ChartFrame {
    pub fn from_history(history: &RollingHistory) -> Self {
        let mut labels = Vec::with_capacity(history.len());
        let mut cpu = Vec::with_capacity(history.len());
        let mut memory = Vec::with_capacity(history.len());
        let mut load = Vec::with_capacity(history.len());

        for point in history.iter() {
            labels.push(point.label.clone());
            cpu.push(point.cpu);
            memory.push(point.memory);
            load.push(point.load);
        }

        Self {
            labels,
            series: [
                Series {
                    name: "CPU Usage (%)",
                    color: "#ff6384",
                    values: cpu,
                },
                Series {
                    name: "Memory Usage (%)",
                    color: "#36a2eb",
                    values: memory,
                },
                Series {
                    name: "Load Avg",
                    color: "#4bc0c0",
                    values: load,
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Top of the y-axis. The axis always starts at zero.
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(SUGGESTED_MAX, f64::max)
    }
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a unicode sparkline scaled to `0..=max`.
pub fn sparkline(values: &[f64], max: f64) -> String {
    if max <= 0.0 {
        return SPARK_LEVELS[0].to_string().repeat(values.len());
    }
    values
        .iter()
        .map(|v| {
            let ratio = (v / max).clamp(0.0, 1.0);
            let idx = (ratio * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[idx]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryPoint;

    fn history(values: &[(f64, f64, f64)]) -> RollingHistory {
        let mut h = RollingHistory::new(10).unwrap();
        for (i, (cpu, memory, load)) in values.iter().enumerate() {
            h.push(HistoryPoint {
                label: format!("12:00:{i:02}"),
                cpu: *cpu,
                memory: *memory,
                load: *load,
            });
        }
        h
    }

    #[test]
    fn frame_mirrors_history_order() {
        let frame = ChartFrame::from_history(&history(&[(1.0, 2.0, 0.1), (3.0, 4.0, 0.2)]));
        assert_eq!(frame.labels, vec!["12:00:00", "12:00:01"]);
        assert_eq!(frame.series[0].name, "CPU Usage (%)");
        assert_eq!(frame.series[0].values, vec![1.0, 3.0]);
        assert_eq!(frame.series[1].values, vec![2.0, 4.0]);
        assert_eq!(frame.series[2].name, "Load Avg");
        assert_eq!(frame.series[2].values, vec![0.1, 0.2]);
    }

    #[test]
    fn y_max_defaults_to_hundred_and_grows() {
        let frame = ChartFrame::from_history(&history(&[(10.0, 20.0, 0.5)]));
        assert_eq!(frame.y_max(), 100.0);

        let frame = ChartFrame::from_history(&history(&[(10.0, 20.0, 140.0)]));
        assert_eq!(frame.y_max(), 140.0);
    }

    #[test]
    fn sparkline_scales_to_max() {
        assert_eq!(sparkline(&[0.0, 50.0, 100.0], 100.0), "▁▅█");
        assert_eq!(sparkline(&[250.0], 100.0), "█");
        assert_eq!(sparkline(&[], 100.0), "");
    }
}
