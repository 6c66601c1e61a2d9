use anyhow::Result;
use chrono::{DateTime, Utc, Weekday};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::AppConfig;
use crate::db::{KvStore, PrayerStorage};
use crate::models::{
    Category, PrayerData, PrayerRequest, RequestPatch, RequestStats, RequestStatus,
};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme::Theme;
use crate::tui::widgets::{detail, header, requests, statusbar, tabs};
use crate::utils::format::plural;
use crate::views::{current_week_start, RequestFilter, RequestGroups, Tab};

/// Ticks a flash message stays on screen.
const FLASH_TICKS: u8 = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    ConfirmDelete(String),
}

pub struct App {
    pub view: View,
    pub input_mode: InputMode,
    pub tab: Tab,
    pub selected: usize,
    pub filter: RequestFilter,
    pub should_quit: bool,
    pub dark_mode: bool,
    pub flash: Option<String>,
    flash_ticks: u8,
    first_day: Weekday,

    // Cached state (refreshed on load)
    pub data: PrayerData,
    pub week_start: DateTime<Utc>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let first_day = config.tracker.first_weekday().unwrap_or_else(|e| {
            log::warn!("{:#}, using Sunday", e);
            Weekday::Sun
        });

        App {
            view: View::Dashboard,
            input_mode: InputMode::Normal,
            tab: Tab::ThisWeek,
            selected: 0,
            filter: RequestFilter::default(),
            should_quit: false,
            dark_mode: false,
            flash: None,
            flash_ticks: 0,
            first_day,
            data: PrayerData::default(),
            week_start: current_week_start(first_day),
        }
    }

    pub fn load<S: KvStore>(&mut self, storage: &PrayerStorage<S>) {
        self.data = storage.get_data();
        self.dark_mode = storage.dark_mode();
        self.week_start = current_week_start(self.first_day);
        self.clamp_selection();
    }

    pub fn tick(&mut self) {
        // Picks up the week boundary if the dashboard stays open past midnight
        self.week_start = current_week_start(self.first_day);

        if self.flash_ticks > 0 {
            self.flash_ticks -= 1;
            if self.flash_ticks == 0 {
                self.flash = None;
            }
        }
    }

    fn set_flash(&mut self, message: impl Into<String>) {
        self.flash = Some(message.into());
        self.flash_ticks = FLASH_TICKS;
    }

    // ─── Derived views ───────────────────────────────────────────────────────

    pub fn visible(&self) -> Vec<&PrayerRequest> {
        self.filter
            .apply(&self.data.requests)
            .into_iter()
            .filter(|r| self.tab.includes(r, self.week_start))
            .collect()
    }

    pub fn selected_request(&self) -> Option<&PrayerRequest> {
        self.visible().get(self.selected).copied()
    }

    fn groups(&self) -> RequestGroups<'_> {
        let filtered = self.filter.apply(&self.data.requests);
        RequestGroups::build(&filtered, self.week_start)
    }

    pub fn tab_counts(&self) -> [usize; 5] {
        let groups = self.groups();
        Tab::all().map(|tab| groups.get(tab).len())
    }

    pub fn stats(&self) -> RequestStats {
        RequestStats::compute(&self.data.requests, self.groups().this_week.len())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected = 0;
    }

    // ─── Input ───────────────────────────────────────────────────────────────

    pub fn handle_key<S: KvStore>(&mut self, key: KeyEvent, storage: &PrayerStorage<S>) {
        // Some terminals also report key release and repeat
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode.clone() {
            InputMode::Search => self.handle_search_key(key),
            InputMode::ConfirmDelete(id) => self.handle_confirm_key(key, &id, storage),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, storage),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key<S: KvStore>(&mut self, key: KeyEvent, storage: &PrayerStorage<S>) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Right | KeyCode::Char('l') => self.switch_tab(self.tab.next()),
            KeyCode::Left | KeyCode::Char('h') => self.switch_tab(self.tab.prev()),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.switch_tab(Tab::all()[idx]);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('c') => {
                self.filter.category = next_category(self.filter.category);
                self.clamp_selection();
            }
            KeyCode::Char('m') => {
                self.filter.member = next_member(&self.data.members, self.filter.member.as_deref());
                self.clamp_selection();
            }
            KeyCode::Char('C') => {
                self.filter = RequestFilter::default();
                self.clamp_selection();
            }
            KeyCode::Char('p') => self.set_selected_status(RequestStatus::Praying, storage),
            KeyCode::Char('a') => self.set_selected_status(RequestStatus::Answered, storage),
            KeyCode::Char('x') => self.set_selected_status(RequestStatus::Archived, storage),
            KeyCode::Char('*') => self.toggle_selected_highlight(storage),
            KeyCode::Char('D') => {
                if let Some(id) = self.selected_request().map(|r| r.id.clone()) {
                    self.input_mode = InputMode::ConfirmDelete(id);
                }
            }
            KeyCode::Char('t') => {
                self.dark_mode = !self.dark_mode;
                storage.set_dark_mode(self.dark_mode);
            }
            KeyCode::Char('r') => {
                self.load(storage);
                self.set_flash("Reloaded");
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.filter.search.pop();
            }
            KeyCode::Char(c) => {
                self.filter.search.push(c);
            }
            _ => {}
        }
        self.clamp_selection();
    }

    fn handle_confirm_key<S: KvStore>(
        &mut self,
        key: KeyEvent,
        id: &str,
        storage: &PrayerStorage<S>,
    ) {
        self.input_mode = InputMode::Normal;
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            if storage.delete_request(id) {
                self.set_flash("Prayer request deleted");
            }
            self.load(storage);
        }
    }

    fn set_selected_status<S: KvStore>(&mut self, status: RequestStatus, storage: &PrayerStorage<S>) {
        let Some(request) = self.selected_request() else {
            return;
        };
        if request.status == status {
            return;
        }
        let id = request.id.clone();
        let member = request.member_name.clone();
        let patch = request.status_patch(status, Utc::now());

        if storage.update_request(&id, &patch) {
            self.set_flash(format!("{} {} → {}", status.icon(), member, status));
        }
        self.load(storage);
    }

    fn toggle_selected_highlight<S: KvStore>(&mut self, storage: &PrayerStorage<S>) {
        let Some(request) = self.selected_request() else {
            return;
        };
        let id = request.id.clone();
        let on = !request.is_highlighted();
        let patch = RequestPatch {
            highlight: Some(on.then_some(true)),
            ..RequestPatch::default()
        };

        if storage.update_request(&id, &patch) {
            self.set_flash(if on { "★ Marked for sharing" } else { "Sharing mark removed" });
        }
        self.load(storage);
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        let theme = Theme::for_mode(self.dark_mode);

        self.draw_dashboard(frame, &theme);

        if self.view == View::Help {
            self.draw_help_overlay(frame, &theme);
        }
        if let InputMode::ConfirmDelete(id) = &self.input_mode {
            self.draw_confirm_delete(frame, &theme, id);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, theme: &Theme) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme.base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Length(2), // tabs
                Constraint::Length(1), // filter line
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], theme, &self.stats());
        tabs::render(frame, outer_chunks[1], theme, self.tab, self.tab_counts());
        self.draw_filter_line(frame, outer_chunks[2], theme);
        statusbar::render(frame, outer_chunks[4], theme, self.flash.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(outer_chunks[3]);

        let visible = self.visible();
        requests::render(
            frame,
            columns[0],
            theme,
            &visible,
            self.selected,
            self.tab.empty_message(),
        );
        detail::render(frame, columns[1], theme, visible.get(self.selected).copied());
    }

    fn draw_filter_line(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let searching = self.input_mode == InputMode::Search;
        let search_style = if searching { theme.bold() } else { theme.dim() };

        let mut spans = vec![
            Span::styled("  Search: ", theme.dim()),
            Span::styled(self.filter.search.clone(), search_style),
        ];
        if searching {
            spans.push(Span::styled("█", theme.accent())); // block cursor
        }

        let category = self
            .filter
            .category
            .map(|c| c.display_name())
            .unwrap_or("All Categories");
        let member = self.filter.member.as_deref().unwrap_or("All Members");
        let results = self.filter.apply(&self.data.requests).len();

        spans.extend([
            Span::styled("   Category: ", theme.dim()),
            Span::styled(category, theme.accent()),
            Span::styled("   Member: ", theme.dim()),
            Span::styled(member.to_string(), theme.accent()),
            Span::styled(format!("   {}", plural(results, "result")), theme.dim()),
        ]);

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, theme: &Theme) {
        let area = frame.area();

        let popup_area = centered(area, area.width / 2, (area.height * 2 / 3).min(20));

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[← →] / 1-5", "Switch tab"),
            ("[↑ ↓]", "Navigate requests"),
            ("[/]", "Search (Enter keeps, Esc clears)"),
            ("[c]", "Cycle category filter"),
            ("[m]", "Cycle member filter"),
            ("[C]", "Clear all filters"),
            ("[p]", "Mark praying"),
            ("[a]", "Mark answered"),
            ("[x]", "Archive"),
            ("[*]", "Mark for sharing"),
            ("[D]", "Delete request"),
            ("[t]", "Toggle dark mode"),
            ("[r]", "Reload from disk"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme.accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<14}", key), theme.accent()),
                Span::styled(action, theme.dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme.accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border(true))
            .style(theme.surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, theme: &Theme, id: &str) {
        let area = frame.area();
        let popup_area = centered(area, area.width / 2, 6);

        frame.render_widget(Clear, popup_area);

        let who = self
            .data
            .find(id)
            .map(|r| r.member_name.as_str())
            .unwrap_or("this request");

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Delete the prayer request for {}?", who),
                theme.bold(),
            )),
            Line::from(""),
            Line::from(Span::styled("  [y] delete  ·  any other key cancels", theme.dim())),
        ];

        let block = Block::default()
            .title(Span::styled(" Delete ", theme.red()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.red())
            .style(theme.surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// A `width` x `height` box centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn next_category(current: Option<Category>) -> Option<Category> {
    let all = Category::all();
    match current {
        None => all.first().copied(),
        Some(c) => {
            let idx = all.iter().position(|x| *x == c).unwrap_or(0);
            all.get(idx + 1).copied()
        }
    }
}

fn next_member(members: &[String], current: Option<&str>) -> Option<String> {
    match current {
        None => members.first().cloned(),
        Some(m) => {
            let idx = members.iter().position(|x| x == m);
            idx.and_then(|i| members.get(i + 1)).cloned()
        }
    }
}

/// Run the TUI event loop.
pub fn run<S: KvStore>(storage: &PrayerStorage<S>, config: &AppConfig) -> Result<()> {
    let mut app = App::new(config);
    app.load(storage);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(config.tui.tick_rate_ms);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key, storage);
                    if app.should_quit {
                        break;
                    }
                }
                Event::Resize => {}
                Event::Tick => {
                    app.tick();
                }
            }
        }
        Ok(())
    })();

    ratatui::restore();
    result
}
