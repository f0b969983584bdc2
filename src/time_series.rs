/// One point on the response-time chart: question number against seconds taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub question: f64,
    pub seconds: f64,
}

impl TimeSeriesPoint {
    pub fn new(question: f64, seconds: f64) -> Self {
        Self { question, seconds }
    }
}

impl From<(f64, f64)> for TimeSeriesPoint {
    fn from(v: (f64, f64)) -> Self {
        TimeSeriesPoint {
            question: v.0,
            seconds: v.1,
        }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.question, p.seconds)
    }
}
