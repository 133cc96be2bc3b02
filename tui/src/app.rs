//! Application State and Main Loop
//!
//! Reads terminal events, forwards them to the lookup controller through the
//! [`LookupClient`], applies the messages that come back to the
//! [`DisplayState`], and renders each screen region into its own compositor
//! layer.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};
use ratatui::Terminal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use bizlookup_core::{
    AggregateResult, BusinessRecord, DetailState, HttpRegistry, RegistryBackend, ResultTag,
    SearchMode, View,
};

use crate::compositor::{Compositor, LayerId};
use crate::display::{DisplayState, DisplayToast};
use crate::lookup_client::LookupClient;
use crate::theme;

/// Frame interval when no terminal events arrive
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Widest a toast gets
const TOAST_MAX_WIDTH: u16 = 50;

/// Width of the label column in record tables
const LABEL_WIDTH: usize = 20;

/// Text of the optional disclaimer panel
pub const DISCLAIMER: &str = "Registry data is provided as published and may lag recent filings. \
     Confirm details with the registry before relying on them.";

/// Rows reserved for the disclaimer panel
const DISCLAIMER_HEIGHT: u16 = 2;

/// Which part of the screen receives keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// Typing into the search box
    Input,
    /// Moving through a result list or detail pane
    Results,
}

/// Layer ids for each screen region
struct Layers {
    header: LayerId,
    input: LayerId,
    results: LayerId,
    disclaimer: LayerId,
    status: LayerId,
    toast: LayerId,
}

/// Screen regions for a given terminal size
struct ScreenLayout {
    header: Rect,
    input: Rect,
    results: Rect,
    disclaimer: Rect,
    status: Rect,
}

impl ScreenLayout {
    fn new(area: Rect, show_disclaimer: bool) -> Self {
        let disclaimer_height = if show_disclaimer { DISCLAIMER_HEIGHT } else { 0 };
        let [header, input, results, disclaimer, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(disclaimer_height),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            header,
            input,
            results,
            disclaimer,
            status,
        }
    }
}

/// The terminal application
pub struct App<B: RegistryBackend + 'static = HttpRegistry> {
    running: bool,
    client: LookupClient<B>,
    display: DisplayState,
    compositor: Compositor,
    layers: Layers,
    /// Text of the search box, mirrored to the controller on every edit
    input_buffer: String,
    focus: Focus,
    show_disclaimer: bool,
    area: Rect,
}

impl<B: RegistryBackend + 'static> App<B> {
    /// Build the app for a terminal of size `area`
    pub fn new(client: LookupClient<B>, area: Rect, show_disclaimer: bool) -> Self {
        let layout = ScreenLayout::new(area, show_disclaimer);
        let mut compositor = Compositor::new(area);

        let layers = Layers {
            header: compositor.create_layer(layout.header, 0, true),
            input: compositor.create_layer(layout.input, 0, true),
            results: compositor.create_layer(layout.results, 0, true),
            disclaimer: compositor.create_layer(layout.disclaimer, 0, true),
            status: compositor.create_layer(layout.status, 0, true),
            toast: compositor.create_layer(Rect::default(), 100, true),
        };
        compositor.set_visible(layers.toast, false);
        compositor.set_visible(layers.disclaimer, show_disclaimer);

        Self {
            running: true,
            client,
            display: DisplayState::new(),
            compositor,
            layers,
            input_buffer: String::new(),
            focus: Focus::Input,
            show_disclaimer,
            area,
        }
    }

    /// Run until the user quits
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        self.client.connect().await?;
        let mut events = EventStream::new();

        while self.running {
            tokio::select! {
                biased;

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => self.handle_key(key).await?,
                    Some(Ok(Event::Resize(width, height))) => self.resize(width, height),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        self.running = false;
                    }
                    None => self.running = false,
                },

                () = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.tick().await;
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Apply finished requests and timers, then any messages they produced
    pub async fn tick(&mut self) {
        self.client.poll_responses().await;
        self.process_messages();
    }

    /// Apply every pending controller message to the display
    pub fn process_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
        if self.display.quitting {
            self.running = false;
        }
        if self.focus == Focus::Results
            && !self.display.list_visible()
            && !self.display.detail_open()
        {
            self.focus = Focus::Input;
        }
    }

    /// Translate one key press into controller events
    pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return self.client.request_quit().await,
            KeyCode::Char('x') if ctrl => return self.client.dismiss_notification().await,
            KeyCode::Char('o') if ctrl => return self.client.open_notification_link().await,
            KeyCode::F(n @ 1..=3) => {
                let mode = SearchMode::ALL[usize::from(n - 1)];
                return self.client.select_mode(mode).await;
            }
            KeyCode::Tab => return self.client.cycle_mode(true).await,
            KeyCode::BackTab => return self.client.cycle_mode(false).await,
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key).await,
            Focus::Results => self.handle_results_key(key).await,
        }
    }

    async fn handle_input_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        match key.code {
            KeyCode::Esc => self.client.request_quit().await?,
            KeyCode::Enter => self.client.submit().await?,
            KeyCode::Backspace => {
                if self.input_buffer.pop().is_some() {
                    self.client.set_input(self.input_buffer.clone()).await?;
                }
            }
            KeyCode::Down => {
                if self.display.list_visible() || self.display.detail_open() {
                    self.focus = Focus::Results;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.input_buffer.push(c);
                self.client.set_input(self.input_buffer.clone()).await?;
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_results_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let detail_open = self.display.detail_open();
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                if detail_open {
                    self.client.close_detail().await?;
                } else {
                    self.focus = Focus::Input;
                }
            }
            KeyCode::Up => {
                if !detail_open && !self.display.cursor_up() {
                    self.focus = Focus::Input;
                }
            }
            KeyCode::Down => self.display.cursor_down(),
            KeyCode::Enter => {
                if let Some(index) = self.display.selected_index() {
                    self.client.select_row(index).await?;
                }
            }
            KeyCode::Left | KeyCode::Char('[') => self.client.prev_page().await?,
            KeyCode::Right | KeyCode::Char(']') => self.client.next_page().await?,
            KeyCode::Char(c @ '1'..='9') => {
                let page = c.to_digit(10).map_or(1, |d| d as usize);
                self.client.go_to_page(page).await?;
            }
            KeyCode::Char('x') => self.client.dismiss_notification().await?,
            KeyCode::Char('o') => self.client.open_notification_link().await?,
            KeyCode::Char(c) => {
                // Any other character goes back to the search box
                self.focus = Focus::Input;
                self.input_buffer.push(c);
                self.client.set_input(self.input_buffer.clone()).await?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle a terminal resize
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        self.compositor.resize(self.area);

        let layout = ScreenLayout::new(self.area, self.show_disclaimer);
        self.compositor.set_bounds(self.layers.header, layout.header);
        self.compositor.set_bounds(self.layers.input, layout.input);
        self.compositor.set_bounds(self.layers.results, layout.results);
        self.compositor
            .set_bounds(self.layers.disclaimer, layout.disclaimer);
        self.compositor.set_bounds(self.layers.status, layout.status);
    }

    fn render<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        let output = self.render_frame();
        terminal.draw(|frame| frame.buffer_mut().merge(output))?;
        Ok(())
    }

    /// Render every layer and return the composited screen
    pub fn render_frame(&mut self) -> &Buffer {
        let toast_bounds = self
            .display
            .toast
            .as_ref()
            .map(|toast| toast_bounds(self.area, toast));
        match toast_bounds {
            Some(bounds) => {
                self.compositor.set_bounds(self.layers.toast, bounds);
                self.compositor.set_visible(self.layers.toast, true);
            }
            None => self.compositor.set_visible(self.layers.toast, false),
        }

        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) {
            buf.reset();
            render_header(&self.display, buf);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.input) {
            buf.reset();
            render_input(&self.display, &self.input_buffer, self.focus, buf);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.results) {
            buf.reset();
            render_results(&self.display, self.focus, buf);
        }
        if self.show_disclaimer {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.disclaimer) {
                buf.reset();
                render_disclaimer(buf);
            }
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            render_status(&self.display, self.focus, buf);
        }
        if let Some(toast) = &self.display.toast {
            if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.toast) {
                buf.reset();
                render_toast(toast, buf);
            }
        }

        self.compositor.composite()
    }

    /// Whether the main loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Where keys currently go
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Render-side state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The embedded controller client
    pub fn client_mut(&mut self) -> &mut LookupClient<B> {
        &mut self.client
    }

    /// Farewell text to print after the terminal is restored
    pub fn goodbye(&self) -> Option<&str> {
        self.display.goodbye.as_deref()
    }
}

// ============================================================================
// Region renderers
// ============================================================================

/// Write `text` at (x, y), cut to `width` columns
fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, width: usize, style: Style) {
    if y >= buf.area.height || x >= buf.area.width {
        return;
    }
    buf.set_string(x, y, fit(text, width), style);
}

/// Truncate to `width` display columns, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn render_header(display: &DisplayState, buf: &mut Buffer) {
    let width = usize::from(buf.area.width);
    let mut x = 0u16;
    let title = " Business Lookup  ";
    put(buf, x, 0, title, width, theme::heading());
    x = x.saturating_add(title.width() as u16);

    for (i, mode) in SearchMode::ALL.iter().enumerate() {
        let selected = *mode == display.snapshot.mode;
        let label = if selected {
            format!("[F{} {}]", i + 1, mode.label())
        } else {
            format!(" F{} {} ", i + 1, mode.label())
        };
        let style = if selected {
            theme::heading().add_modifier(Modifier::REVERSED)
        } else {
            theme::dim()
        };
        let remaining = width.saturating_sub(usize::from(x));
        put(buf, x, 0, &label, remaining, style);
        x = x.saturating_add(label.width() as u16 + 1);
    }
}

fn render_input(display: &DisplayState, input: &str, focus: Focus, buf: &mut Buffer) {
    let mode = display.snapshot.mode;
    let border = if focus == Focus::Input {
        theme::ACCENT
    } else {
        theme::DIM_GRAY
    };
    let line = if input.is_empty() {
        Line::styled(mode.placeholder(), theme::dim())
    } else if focus == Focus::Input {
        Line::styled(format!("{input}_"), theme::text())
    } else {
        Line::styled(input.to_string(), theme::text())
    };

    let area = buf.area;
    Paragraph::new(line)
        .block(
            Block::bordered()
                .title(format!(" Search by {} ", mode.label()))
                .border_style(Style::default().fg(border)),
        )
        .render(area, buf);
}

fn render_results(display: &DisplayState, focus: Focus, buf: &mut Buffer) {
    let width = usize::from(buf.area.width);
    match &display.snapshot.view {
        View::Idle => {
            put(
                buf,
                1,
                1,
                "Pick a mode with Tab, type a search term and press Enter.",
                width.saturating_sub(2),
                theme::dim(),
            );
        }
        View::Loading => {
            let term = display
                .snapshot
                .last_query
                .as_ref()
                .map_or(String::new(), |q| format!(" for \"{}\"", q.text()));
            put(
                buf,
                1,
                1,
                &format!("Searching the registry{term}..."),
                width.saturating_sub(2),
                theme::text(),
            );
        }
        View::Error(message) => {
            put(buf, 1, 0, "Error", width, Style::default().fg(theme::ERROR_RED));
            put(
                buf,
                1,
                1,
                message,
                width.saturating_sub(2),
                Style::default().fg(theme::ERROR_RED),
            );
        }
        View::Single { record, tag } => render_record(buf, tag.heading(), record, None),
        View::Aggregate(aggregate) => render_aggregate(buf, aggregate),
        View::List { records, detail } => match detail {
            DetailState::None => render_list(display, records.len(), focus, buf),
            DetailState::Loading { uen } => {
                put(buf, 1, 0, ResultTag::Single.heading(), width, theme::heading());
                put(
                    buf,
                    1,
                    2,
                    &format!("Loading details for {uen}..."),
                    width.saturating_sub(2),
                    theme::text(),
                );
            }
            DetailState::Loaded(record) => render_record(
                buf,
                ResultTag::Single.heading(),
                record,
                Some("Esc: back to the list"),
            ),
        },
    }
}

fn render_record(buf: &mut Buffer, heading: &str, record: &BusinessRecord, hint: Option<&str>) {
    let width = usize::from(buf.area.width);
    put(buf, 1, 0, heading, width, theme::heading());

    let mut y = 2u16;
    for (label, value) in record.fields() {
        put(buf, 1, y, label, LABEL_WIDTH, theme::dim());
        let value = if value.is_empty() { "-" } else { value };
        put(
            buf,
            1 + LABEL_WIDTH as u16,
            y,
            value,
            width.saturating_sub(LABEL_WIDTH + 2),
            theme::text(),
        );
        y += 1;
    }
    if let Some(hint) = hint {
        put(buf, 1, y + 1, hint, width, theme::dim());
    }
}

fn render_aggregate(buf: &mut Buffer, aggregate: &AggregateResult) {
    let width = usize::from(buf.area.width);
    put(buf, 1, 0, ResultTag::Aggregate.heading(), width, theme::heading());
    put(buf, 1, 2, "SSIC Code", LABEL_WIDTH, theme::dim());
    put(buf, 1 + LABEL_WIDTH as u16, 2, &aggregate.code, width, theme::text());
    put(buf, 1, 3, "Live Companies", LABEL_WIDTH, theme::dim());
    put(
        buf,
        1 + LABEL_WIDTH as u16,
        3,
        &aggregate.count.to_string(),
        width,
        theme::text(),
    );
}

fn render_list(display: &DisplayState, total: usize, focus: Focus, buf: &mut Buffer) {
    let width = usize::from(buf.area.width);
    let heading = format!("{} ({total})", ResultTag::List.heading());
    put(buf, 1, 0, &heading, width, theme::heading());

    if total == 0 {
        put(buf, 1, 2, "No companies matched.", width, theme::dim());
        return;
    }

    let uen_width = 14;
    let status_width = 18;
    let name_width = width.saturating_sub(uen_width + status_width + 4);
    let name_x = 3 + uen_width as u16;
    let status_x = name_x + name_width as u16 + 1;

    put(buf, 3, 2, "UEN", uen_width, theme::dim());
    put(buf, name_x, 2, "Entity Name", name_width, theme::dim());
    put(buf, status_x, 2, "Status", status_width, theme::dim());

    for (i, record) in display.page_rows().iter().enumerate() {
        let y = 3 + i as u16;
        let selected = i == display.cursor;
        let style = if selected && focus == Focus::Results {
            theme::text().bg(theme::SELECTED_BG)
        } else {
            theme::text()
        };
        if selected {
            put(buf, 1, y, ">", 1, theme::heading());
        }
        put(buf, 3, y, &record.uen, uen_width, style);
        put(buf, name_x, y, &record.entity_name, name_width, style);
        put(buf, status_x, y, &record.status, status_width, style);
    }

    let footer_y = 4 + display.page_rows().len() as u16;
    let footer = format!(
        "Page {} of {}",
        display.snapshot.pagination.current_page(),
        display.snapshot.total_pages()
    );
    put(buf, 3, footer_y, &footer, width, theme::dim());
}

fn render_disclaimer(buf: &mut Buffer) {
    let width = usize::from(buf.area.width).saturating_sub(2).max(1);
    for (y, line) in textwrap::wrap(DISCLAIMER, width)
        .iter()
        .take(usize::from(DISCLAIMER_HEIGHT))
        .enumerate()
    {
        put(buf, 1, y as u16, line, width, theme::dim().add_modifier(Modifier::ITALIC));
    }
}

fn render_status(display: &DisplayState, focus: Focus, buf: &mut Buffer) {
    let width = usize::from(buf.area.width);
    let status = format!(" {}", display.status_text());
    put(buf, 0, 0, &status, width, theme::text());

    let hints = match focus {
        Focus::Input => "Enter search | Tab mode | Down results | Esc quit ",
        Focus::Results if display.detail_open() => "Esc back | x/o notice ",
        Focus::Results => "Up/Down select | Enter open | [ ] page | Esc search ",
    };
    let hint_width = hints.width();
    if status.width() + hint_width < width {
        put(buf, (width - hint_width) as u16, 0, hints, hint_width, theme::dim());
    }
}

/// Lines of a toast body wrapped to `width`
fn toast_lines(toast: &DisplayToast, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = textwrap::wrap(&toast.message, width)
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if let Some(link) = &toast.link {
        lines.push(String::new());
        lines.push(fit(&format!("o: open {link}"), width));
    }
    lines.push(fit("x: dismiss", width));
    lines
}

/// Bottom-right box sized to fit the toast text
fn toast_bounds(area: Rect, toast: &DisplayToast) -> Rect {
    let width = TOAST_MAX_WIDTH.min(area.width.saturating_sub(2));
    let inner = usize::from(width.saturating_sub(2));
    let lines = toast_lines(toast, inner).len() as u16;
    let height = (lines + 2).min(area.height.saturating_sub(2));
    Rect::new(
        area.width.saturating_sub(width + 1),
        area.height.saturating_sub(height + 1),
        width,
        height,
    )
}

fn render_toast(toast: &DisplayToast, buf: &mut Buffer) {
    let area = buf.area;
    let inner = usize::from(area.width.saturating_sub(2));
    let lines: Vec<Line> = toast_lines(toast, inner)
        .into_iter()
        .map(|l| Line::styled(l, theme::text()))
        .collect();

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .title(" Notice ")
                .border_style(Style::default().fg(theme::level_color(toast.level))),
        )
        .render(area, buf);
}
