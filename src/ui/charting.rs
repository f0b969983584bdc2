use crate::time_series::TimeSeriesPoint;

/// X (question count) and Y (slowest answer, seconds) bounds for the response chart
pub fn compute_chart_params(points: &[TimeSeriesPoint]) -> (f64, f64) {
    let slowest = points
        .iter()
        .map(|p| p.seconds)
        .fold(0.0_f64, f64::max);

    let questions = match points.last() {
        Some(p) => p.question,
        None => 1.0,
    };

    (questions.max(1.0), slowest.ceil().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Stopwatch text as `m:ss:mmm`.
pub fn format_stopwatch(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0) as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = total_ms / 60_000;
    format!("{m}:{s:02}:{ms:03}")
}
