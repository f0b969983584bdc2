use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};

/// A UI screen boundary: draws one application state into the frame buffer
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Name entry and starting level
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_setup(app, area, buf);
    }
}

/// Puzzle, answer field, stopwatch and running session figures
pub struct DrillScreen;

impl Screen for DrillScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_drill(app, area, buf);
    }
}

/// End-of-session charts and export
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        super::render_summary(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Setup => Box::new(SetupScreen),
        AppState::Drill => Box::new(DrillScreen),
        AppState::Summary => Box::new(SummaryScreen),
    }
}
