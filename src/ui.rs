pub mod charting;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, BarChart, Block, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::difficulty::DifficultyLevel;
use crate::ui::charting::{compute_chart_params, format_label, format_stopwatch};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;
const NAME_FIELD_WIDTH: usize = 24;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn level_color(level: DifficultyLevel) -> Color {
    match level {
        DifficultyLevel::Easy => Color::Green,
        DifficultyLevel::Medium => Color::Yellow,
        DifficultyLevel::Hard => Color::Red,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}

fn centered_rows(area: Rect, rows: u16) -> std::rc::Rc<[Rect]> {
    let pad = area.height.saturating_sub(rows) / 2;
    let mut constraints = vec![Constraint::Length(pad)];
    constraints.extend((0..rows).map(|_| Constraint::Length(1)));
    constraints.push(Constraint::Min(0));

    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(constraints)
        .split(area)
}

pub(crate) fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let rows = centered_rows(area, 11);
    let form = &app.setup;

    Paragraph::new(Span::styled("Adaptive Math Tutor", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(rows[1], buf);

    let name_pad = NAME_FIELD_WIDTH.saturating_sub(form.user_name.width());
    Paragraph::new(Line::from(vec![
        Span::styled("Name: ", bold()),
        Span::styled(form.user_name.clone(), bold().fg(Color::White)),
        Span::styled("_".repeat(name_pad.max(1)), dim_bold()),
    ]))
    .alignment(Alignment::Center)
    .render(rows[3], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("Start difficulty: ", bold()),
        Span::styled("< ", dim_bold()),
        Span::styled(
            form.difficulty.to_string(),
            bold().fg(level_color(form.difficulty)),
        ),
        Span::styled(" >", dim_bold()),
    ]))
    .alignment(Alignment::Center)
    .render(rows[5], buf);

    if let Some(err) = &form.error {
        Paragraph::new(Span::styled(err.clone(), bold().fg(Color::Red)))
            .alignment(Alignment::Center)
            .render(rows[7], buf);
    }

    if let Some(session) = app.session.as_ref().filter(|s| !s.tracker().is_empty()) {
        let metrics = session.tracker().metrics();
        Paragraph::new(Span::styled(
            format!(
                "Previous session: Final Accuracy: {:.1}%",
                metrics.accuracy_percent
            ),
            bold().fg(Color::Green),
        ))
        .alignment(Alignment::Center)
        .render(rows[9], buf);
    }

    Paragraph::new(Span::styled(
        "(enter) start / (←→) difficulty / (esc)ape",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(rows[11], buf);
}

pub(crate) fn render_drill(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);

    let rows = centered_rows(columns[0], 9);

    if let Some(fb) = session.last_feedback() {
        let (text, style) = if fb.correct {
            (
                format!("Correct! Took {:.2}s", fb.time_taken),
                bold().fg(Color::Green),
            )
        } else {
            (
                format!("Incorrect. Answer was {}", fb.expected_answer),
                bold().fg(Color::Red),
            )
        };
        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
    }

    let level = session.difficulty();
    Paragraph::new(Line::from(vec![
        Span::styled("Level: ", dim_bold()),
        Span::styled(level.to_string(), bold().fg(level_color(level))),
    ]))
    .alignment(Alignment::Center)
    .render(rows[3], buf);

    if let Some(puzzle) = session.peek_puzzle() {
        Paragraph::new(Span::styled(
            format!("{} = ?", puzzle.question_text()),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(rows[4], buf);
    }

    Paragraph::new(Span::styled(
        format!("Time: {}", format_stopwatch(app.elapsed_secs())),
        dim_bold(),
    ))
    .alignment(Alignment::Center)
    .render(rows[6], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("> ", dim_bold()),
        Span::styled(app.answer_input.clone(), bold().fg(Color::Magenta)),
        Span::styled("_", bold().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .alignment(Alignment::Center)
    .render(rows[7], buf);

    Paragraph::new(Span::styled(
        "type answer and press (enter) / (esc) end session",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(rows[9], buf);

    let metrics = session.tracker().metrics();
    let sidebar = vec![
        Line::from(Span::styled(session.user_name().to_string(), bold())),
        Line::from(""),
        Line::from(format!("Total questions: {}", metrics.total_attempts)),
        Line::from(format!("Accuracy: {:.1}%", metrics.accuracy_percent)),
        Line::from(format!("Avg time: {:.2}s", metrics.average_response_time)),
        Line::from(vec![
            Span::raw("Level: "),
            Span::styled(level.to_string(), Style::default().fg(level_color(level))),
        ]),
    ];
    Paragraph::new(sidebar)
        .block(Block::bordered().title("Session Info"))
        .wrap(Wrap { trim: true })
        .render(columns[1], buf);
}

pub(crate) fn render_summary(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // headline
            Constraint::Length(1), // details
            Constraint::Length(1), // padding
            Constraint::Min(3),    // charts
            Constraint::Length(1), // export status
            Constraint::Length(1), // legend
        ])
        .split(area);

    let legend = Paragraph::new(Span::styled(
        "(e)xport csv / (n)ew session / (esc)ape",
        italic(),
    ));

    let Some(session) = app
        .session
        .as_ref()
        .filter(|s| !s.tracker().is_empty())
    else {
        Paragraph::new(Span::styled("No questions answered this session", bold()))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
        legend.render(chunks[5], buf);
        return;
    };
    let tracker = session.tracker();

    let metrics = tracker.metrics();
    Paragraph::new(Span::styled(
        format!(
            "Session Completed! Final Accuracy: {:.1}%",
            metrics.accuracy_percent
        ),
        bold().fg(Color::Green),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "{} / started {} / {} questions / {:.2}s avg / finished at {}",
            session.user_name(),
            session.started_at().format("%H:%M"),
            metrics.total_attempts,
            metrics.average_response_time,
            session.difficulty(),
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[3]);

    let points = tracker.response_times();
    let (questions, slowest) = compute_chart_params(&points);
    let tuples: Vec<(f64, f64)> = points.iter().map(|p| (*p).into()).collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .block(Block::bordered().title("Response Time per Question"))
        .x_axis(
            Axis::default()
                .title("question")
                .bounds([1.0, questions])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(format_label(questions), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, slowest])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(format_label(slowest), bold()),
                ]),
        )
        .render(charts[0], buf);

    let breakdown = tracker.accuracy_by_difficulty();
    let labels: Vec<String> = breakdown.iter().map(|b| b.difficulty.to_string()).collect();
    let bars: Vec<(&str, u64)> = labels
        .iter()
        .zip(&breakdown)
        .map(|(label, b)| (label.as_str(), b.accuracy_percent.round() as u64))
        .collect();

    BarChart::default()
        .block(Block::bordered().title("Accuracy by Difficulty (%)"))
        .bar_width(8)
        .bar_gap(2)
        .max(100)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(bold().fg(Color::Black).bg(Color::Cyan))
        .data(bars.as_slice())
        .render(charts[1], buf);

    if let Some(status) = &app.export_status {
        Paragraph::new(Span::styled(status.clone(), italic().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    legend.render(chunks[5], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn drilling_app() -> App {
        let mut app = App::new(&Config::default());
        for c in "ada".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        app
    }

    fn answer_current(app: &mut App, correct: bool) {
        let answer = app
            .session
            .as_ref()
            .and_then(|s| s.peek_puzzle())
            .map(|p| p.answer())
            .unwrap();
        let typed = if correct { answer } else { answer + 1 };
        app.answer_input = typed.to_string();
        app.submit(1.5);
    }

    #[test]
    fn setup_screen_renders_title_and_error() {
        let mut app = App::new(&Config::default());
        press(&mut app, KeyCode::Enter);
        let rendered = render_to_string(&app, 80, 24);
        assert!(rendered.contains("Adaptive Math Tutor"));
        assert!(rendered.contains("Please enter a name."));
        assert!(rendered.contains("Easy"));
    }

    #[test]
    fn setup_screen_shows_previous_result() {
        let mut app = drilling_app();
        answer_current(&mut app, true);
        answer_current(&mut app, false);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Setup);

        let rendered = render_to_string(&app, 80, 24);
        assert!(rendered.contains("Previous session: Final Accuracy: 50.0%"));
    }

    #[test]
    fn first_setup_has_no_previous_result() {
        let app = App::new(&Config::default());
        let rendered = render_to_string(&app, 80, 24);
        assert!(!rendered.contains("Previous session"));
    }

    #[test]
    fn drill_screen_shows_question_and_sidebar() {
        let app = drilling_app();
        let question = app
            .session
            .as_ref()
            .and_then(|s| s.peek_puzzle())
            .map(|p| format!("{} = ?", p.question_text()))
            .unwrap();
        let rendered = render_to_string(&app, 100, 24);
        assert!(rendered.contains(&question));
        assert!(rendered.contains("Session Info"));
        assert!(rendered.contains("Total questions: 0"));
    }

    #[test]
    fn drill_screen_shows_feedback() {
        let mut app = drilling_app();
        answer_current(&mut app, false);
        let rendered = render_to_string(&app, 100, 24);
        assert!(rendered.contains("Incorrect. Answer was"));

        answer_current(&mut app, true);
        let rendered = render_to_string(&app, 100, 24);
        assert!(rendered.contains("Correct! Took 1.50s"));
    }

    #[test]
    fn summary_screen_renders_charts() {
        let mut app = drilling_app();
        answer_current(&mut app, true);
        answer_current(&mut app, false);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Summary);

        let rendered = render_to_string(&app, 100, 30);
        assert!(rendered.contains("Final Accuracy: 50.0%"));
        assert!(rendered.contains("Response Time per Question"));
        assert!(rendered.contains("(e)xport csv"));
    }

    #[test]
    fn empty_summary_does_not_panic() {
        let mut app = drilling_app();
        press(&mut app, KeyCode::Esc);
        let rendered = render_to_string(&app, 80, 24);
        assert!(rendered.contains("No questions answered"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let app = drilling_app();
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 2);
    }
}
