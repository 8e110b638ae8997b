use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use gamelist_core::{PlatformFilter, RatingTier};

use super::{Control, GameListApp};

const TITLE: &str = "Список игр";
const RATING_LABEL: &str = "Сортировать по рейтингу:";
const PLATFORM_LABEL: &str = "Платформа:";
const LOCALIZED_LABEL: &str = "Только с русским языком";
const MULTIPLAYER_LABEL: &str = "Только мультиплеер";
const SUBMIT_LABEL: &str = "Поиск";
const EMPTY_NOTICE: &str = "По вашему запросу ничего не найдено";
const JUMP_DOWN: &str = "Смотреть список вниз ↓";
const JUMP_UP: &str = "Смотреть список вверх ↑";
const HEADERS: [&str; 6] = [
    "Название",
    "Рейтинг",
    "Платформы",
    "Мультиплеер",
    "Язык",
    "Обложка",
];
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone)]
pub(super) struct Theme {
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    danger: Color,
    link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            danger: Color::Red,
            link: Color::Blue,
        }
    }
}

fn rating_label(tier: RatingTier) -> &'static str {
    match tier {
        RatingTier::Highest => "Высокий рейтинг",
        RatingTier::Lowest => "Низкий рейтинг",
    }
}

fn platform_label(platform: PlatformFilter) -> &'static str {
    platform.platform_name().unwrap_or("Все")
}

impl GameListApp {
    pub(super) fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ])
            .split(size);

        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(30)])
            .split(chunks[1]);
        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(4)])
            .split(body[0]);

        self.render_form(frame, sidebar[0]);
        self.render_details(frame, sidebar[1]);
        if self.workflow.is_loading() {
            self.render_loader(frame, body[1]);
        } else {
            self.render_results(frame, body[1]);
        }
        self.render_status(frame, chunks[2]);
    }

    fn control_line(&self, control: Control, content: Vec<Span<'static>>) -> Line<'static> {
        let focused = self.focus == control;
        let marker = if focused {
            Span::styled(
                "▶ ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("  ")
        };
        let mut spans = vec![marker];
        spans.extend(content);
        let mut line = Line::from(spans);
        if focused {
            line.style = Style::default().bg(self.theme.selection_bg);
        }
        line
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let criteria = self.workflow.criteria();
        let checkbox = |checked: bool| if checked { "[x] " } else { "[ ] " };
        let lines = vec![
            Line::from(Span::styled(RATING_LABEL, Style::default().fg(self.theme.muted))),
            self.control_line(
                Control::Rating,
                vec![Span::raw(format!("< {} >", rating_label(criteria.rating)))],
            ),
            Line::from(Span::styled(PLATFORM_LABEL, Style::default().fg(self.theme.muted))),
            self.control_line(
                Control::Platform,
                vec![Span::raw(format!("< {} >", platform_label(criteria.platform)))],
            ),
            self.control_line(
                Control::Localized,
                vec![
                    Span::raw(checkbox(criteria.require_localized_language)),
                    Span::raw(LOCALIZED_LABEL),
                ],
            ),
            self.control_line(
                Control::Multiplayer,
                vec![
                    Span::raw(checkbox(criteria.require_multiplayer)),
                    Span::raw(MULTIPLAYER_LABEL),
                ],
            ),
            self.control_line(
                Control::Submit,
                vec![Span::styled(
                    format!("[ {SUBMIT_LABEL} ]"),
                    Style::default().add_modifier(Modifier::BOLD),
                )],
            ),
        ];
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Фильтры"));
        frame.render_widget(paragraph, area);
    }

    fn render_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let Some(game) = self.selected_game() else {
            let paragraph = Paragraph::new(Span::styled(
                "No game selected",
                Style::default().fg(self.theme.muted),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let released = game
            .release_date_parsed()
            .map(|date| date.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| game.release_date.clone());
        let mut lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(game.short_description.clone()),
            Line::from(format!("Genre: {}", game.genre)),
            Line::from(format!("Publisher: {}", game.publisher)),
            Line::from(format!("Developer: {}", game.developer)),
            Line::from(format!("Released: {released}")),
        ];
        if !game.players.is_empty() {
            lines.push(Line::from(format!("Players: {}", game.players)));
        }
        lines.push(Line::from(Span::styled(
            game.freetogame_profile_url.clone(),
            Style::default().fg(self.theme.link),
        )));
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_loader(&self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER[self.ticks % SPINNER.len()];
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{spinner} Загрузка {spinner}"),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let jumps = self.workflow.show_jump_controls();
        let empty = self.workflow.show_empty_notice();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(u16::from(jumps)),
                Constraint::Min(3),
                Constraint::Length(u16::from(jumps) + u16::from(empty)),
            ])
            .split(area);

        let hint_style = Style::default().fg(self.theme.link);
        if jumps {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("{JUMP_DOWN}  (b)"), hint_style)),
                chunks[0],
            );
        }

        let header = Row::new(HEADERS.iter().map(|title| {
            Cell::from(*title).style(Style::default().add_modifier(Modifier::BOLD))
        }));
        let rows: Vec<Row> = self
            .workflow
            .result()
            .map(|result| {
                result
                    .records(&self.catalog)
                    .map(|game| {
                        let multiplayer = if game.multiplayer {
                            Cell::from("✔").style(Style::default().fg(self.theme.success))
                        } else {
                            Cell::from("✘").style(Style::default().fg(self.theme.danger))
                        };
                        Row::new(vec![
                            Cell::from(game.title.clone()),
                            Cell::from(game.rating.clone()),
                            Cell::from(game.platform_label()),
                            multiplayer,
                            Cell::from(game.languages_label()),
                            Cell::from(game.thumbnail.clone())
                                .style(Style::default().fg(self.theme.link)),
                        ])
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut title = match self.workflow.result() {
            Some(result) => format!("Games ({})", result.len()),
            None => "Games".to_string(),
        };
        if self.workflow.is_stale() {
            title.push_str(" · stale");
        }
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(24),
                Constraint::Length(8),
                Constraint::Percentage(22),
                Constraint::Length(12),
                Constraint::Percentage(16),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(self.theme.selection_bg))
        .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, chunks[1], &mut self.table);

        let mut footer = Vec::new();
        if jumps {
            footer.push(Line::from(Span::styled(format!("{JUMP_UP}  (t)"), hint_style)));
        }
        if empty {
            footer.push(Line::from(Span::styled(
                EMPTY_NOTICE,
                Style::default()
                    .fg(self.theme.danger)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if !footer.is_empty() {
            frame.render_widget(Paragraph::new(footer), chunks[2]);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let help = "Tab/↑↓ focus · ←→/Space change · Enter search · j/k scroll · t/b jump · q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
