use crate::database::{Database, ItemEdit};
use crate::error::GoalResult;
use crate::reorder::MoveDirection;
use crate::session::{GoalSession, Snapshot, SubscriptionHandle};
use crate::theme::{self, Palette};
use crate::tree::TreeManager;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    List,
    Create,
    Edit,
    ConfirmDelete,
    Help,
}

pub struct App {
    pub session: GoalSession<Database>,
    pub tree_manager: TreeManager,
    pub trail_titles: Vec<String>,
    pub list_state: ListState,
    pub scrollbar_state: ScrollbarState,
    pub mode: AppMode,
    pub input: String,
    pub editing_id: Option<i64>,
    pub should_quit: bool,
    pub error_message: Option<String>,
    latest: Rc<RefCell<Option<Snapshot>>>,
    subscription: Option<SubscriptionHandle>,
}

impl App {
    pub fn new(database: Database) -> anyhow::Result<Self> {
        let mut session = GoalSession::new(database);
        let latest = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&latest);
        let subscription = session.subscribe(move |snapshot: &Snapshot| {
            *sink.borrow_mut() = Some(snapshot.clone());
        });
        let initial = session.snapshot()?;

        let mut app = App {
            session,
            tree_manager: TreeManager::new(),
            trail_titles: Vec::new(),
            list_state: ListState::default(),
            scrollbar_state: ScrollbarState::default(),
            mode: AppMode::List,
            input: String::new(),
            editing_id: None,
            should_quit: false,
            error_message: None,
            latest,
            subscription: Some(subscription),
        };
        app.apply_snapshot(initial, None);
        Ok(app)
    }

    /// Releases the session subscription before shutdown.
    pub fn close(&mut self) -> anyhow::Result<()> {
        if let Some(handle) = self.subscription.take() {
            self.session.unsubscribe(handle);
        }
        self.session.store().checkpoint_and_close()?;
        Ok(())
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot, keep_id: Option<i64>) {
        self.trail_titles = snapshot.trail.iter().map(|i| i.title.clone()).collect();
        self.tree_manager.rebuild(snapshot.rows);

        let len = self.tree_manager.get_rendered_lines().len();
        let selection = keep_id
            .and_then(|id| self.tree_manager.get_line_index_for_item(id))
            .or_else(|| self.list_state.selected().map(|i| i.min(len.saturating_sub(1))))
            .or(Some(0))
            .filter(|_| len > 0);
        self.list_state.select(selection);
    }

    /// Pulls the snapshot published by the session, if anything changed.
    fn sync(&mut self, keep_id: Option<i64>) {
        let pending = self.latest.borrow_mut().take();
        if let Some(snapshot) = pending {
            self.apply_snapshot(snapshot, keep_id);
        }
    }

    fn selected_id(&self) -> Option<i64> {
        let selected = self.list_state.selected()?;
        self.tree_manager
            .get_rendered_lines()
            .get(selected)
            .map(|line| line.item_id)
    }

    fn report<T>(&mut self, result: GoalResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error_message = Some(e.to_string());
                None
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> anyhow::Result<()> {
        self.error_message = None;

        match self.mode {
            AppMode::List => self.handle_list_key(key)?,
            AppMode::Create | AppMode::Edit => self.handle_input_key(key)?,
            AppMode::ConfirmDelete => self.handle_delete_key(key)?,
            AppMode::Help => self.mode = AppMode::List,
        }
        Ok(())
    }

    fn handle_list_key(&mut self, key: KeyCode) -> anyhow::Result<()> {
        let selected = self.selected_id();

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Down | KeyCode::Char('j') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => {
                if let Some(id) = selected {
                    let result = self.session.enter(id);
                    self.report(result);
                    self.list_state.select(Some(0));
                    self.sync(None);
                }
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => {
                let previous_scope = self.session.scope();
                let result = self.session.go_back();
                self.report(result);
                self.sync(previous_scope);
            }
            KeyCode::Char('0') => {
                let result = self.session.go_to_root();
                self.report(result);
                self.sync(None);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let result = self.session.go_to_breadcrumb(index);
                self.report(result);
                self.sync(None);
            }
            KeyCode::Char('n') => {
                self.mode = AppMode::Create;
                self.input.clear();
            }
            KeyCode::Char('e') => {
                if let Some(id) = selected {
                    if let Some(item) = self.tree_manager.get_item_by_id(id) {
                        self.input = item.title.clone();
                        self.editing_id = Some(id);
                        self.mode = AppMode::Edit;
                    }
                }
            }
            KeyCode::Char('d') => {
                if selected.is_some() {
                    self.mode = AppMode::ConfirmDelete;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = selected {
                    let result = self.session.toggle_complete(id);
                    self.report(result);
                    self.sync(Some(id));
                }
            }
            KeyCode::Char('t') => {
                if let Some(id) = selected {
                    let result = self.session.toggle_expanded(id);
                    self.report(result);
                    self.sync(Some(id));
                }
            }
            KeyCode::Char('K') => self.move_selected(MoveDirection::SiblingUp),
            KeyCode::Char('J') => self.move_selected(MoveDirection::SiblingDown),
            KeyCode::Char('>') => self.move_selected(MoveDirection::DemoteUnderPrecedingSibling),
            KeyCode::Char('<') => self.move_selected(MoveDirection::PromoteToParentLevel),
            _ => {}
        }
        Ok(())
    }

    fn move_selected(&mut self, direction: MoveDirection) {
        let Some(id) = self.selected_id() else {
            return;
        };
        // Declined moves are logged by the session and otherwise ignored
        if let Err(e) = self.session.reorder(id, direction) {
            if !e.is_declined() {
                self.error_message = Some(e.to_string());
            }
        }
        self.sync(Some(id));
    }

    fn handle_input_key(&mut self, key: KeyCode) -> anyhow::Result<()> {
        match key {
            KeyCode::Esc => {
                self.mode = AppMode::List;
                self.editing_id = None;
            }
            KeyCode::Enter => {
                if self.input.trim().is_empty() {
                    self.error_message = Some("Title cannot be empty".to_string());
                    return Ok(());
                }
                let title = self.input.trim().to_string();
                let touched = match self.editing_id.take() {
                    Some(id) => {
                        let edit = ItemEdit {
                            title: Some(title),
                            ..Default::default()
                        };
                        let result = self.session.edit(id, edit);
                        self.report(result).map(|item| item.id)
                    }
                    None => {
                        let result = self.session.add_item(&title);
                        self.report(result).map(|item| item.id)
                    }
                };
                self.sync(touched);
                self.input.clear();
                self.mode = AppMode::List;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_delete_key(&mut self, key: KeyCode) -> anyhow::Result<()> {
        match key {
            KeyCode::Char('y') => {
                if let Some(id) = self.selected_id() {
                    let result = self.session.delete(id);
                    self.report(result);
                    self.sync(None);
                }
                self.mode = AppMode::List;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = AppMode::List,
            _ => {}
        }
        Ok(())
    }

    fn next_item(&mut self) {
        let len = self.tree_manager.get_rendered_lines().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_item(&mut self) {
        let len = self.tree_manager.get_rendered_lines().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn draw(&mut self, f: &mut Frame) {
        if self.mode == AppMode::Help {
            self.draw_help_page(f, f.area());
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        self.draw_breadcrumbs(f, chunks[0]);
        self.draw_goal_list(f, chunks[1]);
        self.draw_status(f, chunks[2]);

        match self.mode {
            AppMode::Create => self.draw_input_popup(f, chunks[1], "New Goal"),
            AppMode::Edit => self.draw_input_popup(f, chunks[1], "Edit Title"),
            AppMode::ConfirmDelete => self.draw_confirm_delete(f, chunks[1]),
            _ => {}
        }
    }

    fn draw_breadcrumbs(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("0 Root", theme::breadcrumb(self.trail_titles.is_empty()))];
        for (i, title) in self.trail_titles.iter().enumerate() {
            spans.push(Span::styled(" › ", Style::default().fg(Palette::SUBTEXT)));
            let active = i + 1 == self.trail_titles.len();
            spans.push(Span::styled(format!("{} {}", i + 1, title), theme::breadcrumb(active)));
        }

        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Scope")
                .border_style(theme::border()),
        );
        f.render_widget(bar, area);
    }

    fn draw_goal_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .tree_manager
            .get_rendered_lines()
            .iter()
            .map(|line| {
                ListItem::new(Line::from(vec![
                    Span::styled(line.prefix.clone(), Style::default().fg(Palette::SURFACE)),
                    Span::styled(line.display_text.clone(), theme::row(line.completed, line.depth)),
                ]))
            })
            .collect();

        let title = match self.trail_titles.last() {
            Some(scope) => format!("Goals in {}", scope),
            None => "Goals".to_string(),
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(theme::border()),
            )
            .highlight_style(theme::selected())
            .highlight_symbol("▶ ");

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.tree_manager.get_rendered_lines().len())
            .position(self.list_state.selected().unwrap_or(0));
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .style(Style::default().fg(Palette::SURFACE));
        f.render_stateful_widget(scrollbar, chunks[1], &mut self.scrollbar_state);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let (text, style) = match &self.error_message {
            Some(error) => (error.clone(), theme::error()),
            None => (
                "? help | n new | l/h in/out | K/J up/down | >/< demote/promote | q quit".to_string(),
                Style::default().fg(Palette::SUBTEXT),
            ),
        };
        let status = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(theme::border()));
        f.render_widget(status, area);
    }

    fn draw_input_popup(&self, f: &mut Frame, area: Rect, title: &str) {
        let popup_area = centered_rect(60, 20, area);
        f.render_widget(Clear, popup_area);

        let input = Paragraph::new(format!("{}▏", self.input))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Palette::BLUE)),
            )
            .style(theme::popup())
            .wrap(Wrap { trim: false });
        f.render_widget(input, popup_area);
    }

    fn draw_confirm_delete(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 20, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .border_style(theme::error());

        let paragraph = Paragraph::new("Delete this goal and everything under it?\n\nPress 'y' to confirm, 'n' to cancel")
            .block(block)
            .style(theme::popup())
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, popup_area);
    }

    fn draw_help_page(&self, f: &mut Frame, area: Rect) {
        let bindings = [
            ("j / k", "Move selection"),
            ("l / Enter", "Open the selected goal"),
            ("h / Backspace", "Back to the previous scope"),
            ("0", "Back to the root"),
            ("1-9", "Jump to a breadcrumb"),
            ("n", "Add a goal to the current scope"),
            ("e", "Edit the selected title"),
            ("space", "Toggle completion"),
            ("t", "Show or hide children"),
            ("K / J", "Move up / down among siblings"),
            (">", "Nest under the goal above"),
            ("<", "Move out next to its parent"),
            ("d", "Delete with all sub-goals"),
            ("q", "Quit"),
        ];

        let lines: Vec<Line> = bindings
            .iter()
            .map(|(key, description)| {
                Line::from(vec![
                    Span::styled(format!("{:>14}  ", key), Style::default().fg(Palette::PEACH)),
                    Span::styled(*description, Style::default().fg(Palette::TEXT)),
                ])
            })
            .collect();

        let help = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Keys (any key to close)")
                .border_style(theme::border()),
        );
        f.render_widget(help, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
