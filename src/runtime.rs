use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the stopwatch is redrawn while a puzzle is on screen.
pub const TICK_RATE_MS: u64 = 100;

/// Events the drill loop reacts to
#[derive(Clone, Debug)]
pub enum DrillEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Anything that can hand the drill loop its next terminal event.
pub trait DrillEventSource: Send + 'static {
    /// Wait up to `timeout` for an event; `Err(Timeout)` when none arrives.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread.
pub struct CrosstermEventSource {
    rx: Receiver<DrillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => DrillEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => DrillEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed source for headless tests
pub struct TestEventSource {
    rx: Receiver<DrillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: DrillEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: DrillEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one tick interval; a timeout becomes `Tick`.
    pub fn step(&self) -> DrillEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => DrillEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        match runner.step() {
            DrillEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(DrillEvent::Resize).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(10)),
        );

        match runner.step() {
            DrillEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn default_ticker_uses_tick_rate() {
        assert_eq!(
            FixedTicker::default().interval(),
            Duration::from_millis(TICK_RATE_MS)
        );
    }
}
