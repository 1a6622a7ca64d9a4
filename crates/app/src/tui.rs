use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*};
use services::{QuizError, QuizRun, QuizService};
use tokio::task::JoinHandle;
use ui::vm::{EMPTY_MESSAGE, LoadTicket, OptionFeedback, QuizIntent, QuizScreen, QuizVm};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PLAY_HELP: &str = "A-D / ↑↓ choose · Enter confirm/next · r restart · n new questions · q quit";
const IDLE_HELP: &str = "r restart · n new questions · q quit";

/// Interactive quiz screen.
pub struct PlayScreen {
    quiz: Arc<QuizService>,
    vm: QuizVm,
    greeting: Option<String>,
    cursor: usize,
    status: Option<String>,
    loads: Vec<(LoadTicket, JoinHandle<Result<QuizRun, QuizError>>)>,
    should_quit: bool,
}

impl PlayScreen {
    #[must_use]
    pub fn new(quiz: Arc<QuizService>, greeting: Option<String>) -> Self {
        Self {
            quiz,
            vm: QuizVm::new(),
            greeting,
            cursor: 0,
            status: None,
            loads: Vec::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<()> {
        self.spawn_load();

        while !self.should_quit {
            self.collect_loads().await;
            terminal.draw(|f| self.draw(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        for (_, handle) in self.loads.drain(..) {
            handle.abort();
        }
        Ok(())
    }

    /// Start fetching a new deck in the background. Earlier loads keep
    /// running but their results are discarded.
    fn spawn_load(&mut self) {
        let ticket = self.vm.begin_load();
        let quiz = Arc::clone(&self.quiz);
        let handle = tokio::spawn(async move { quiz.start().await });
        self.loads.push((ticket, handle));
        self.cursor = 0;
        self.status = None;
    }

    async fn collect_loads(&mut self) {
        let mut pending = Vec::with_capacity(self.loads.len());
        for (ticket, handle) in self.loads.drain(..) {
            if !handle.is_finished() {
                pending.push((ticket, handle));
                continue;
            }
            let result = handle
                .await
                .unwrap_or_else(|err| Err(QuizError::Fetch(err.to_string())));
            self.vm.finish_load(ticket, result);
        }
        self.loads = pending;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') => self.spawn_load(),
            KeyCode::Char('r') => {
                if matches!(self.vm.screen(), QuizScreen::Playing | QuizScreen::Finished) {
                    self.intent(QuizIntent::Restart);
                    self.cursor = 0;
                } else {
                    self.spawn_load();
                }
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Char(c @ ('a'..='d' | 'A'..='D')) => {
                let index = usize::from(c.to_ascii_uppercase() as u8 - b'A');
                if index < self.vm.options().len() {
                    self.cursor = index;
                    self.intent(QuizIntent::Select(index));
                }
            }
            KeyCode::Enter => self.enter(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let count = self.vm.options().len();
        if count == 0 || self.vm.can_advance() {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
        self.intent(QuizIntent::Select(self.cursor));
    }

    fn enter(&mut self) {
        if *self.vm.screen() != QuizScreen::Playing {
            return;
        }
        if self.vm.can_advance() {
            self.intent(QuizIntent::Next);
            self.cursor = 0;
        } else if self.vm.can_confirm() {
            self.intent(QuizIntent::Confirm);
        } else {
            self.intent(QuizIntent::Select(self.cursor));
        }
    }

    fn intent(&mut self, intent: QuizIntent) {
        self.status = self
            .vm
            .apply(intent, &self.quiz)
            .err()
            .map(|err| err.message().to_string());
    }

    fn draw(&self, f: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .areas(f.area());

        self.draw_header(f, header);
        match self.vm.screen() {
            QuizScreen::Loading => centered(f, body, "Loading questions…", Style::default()),
            QuizScreen::Failed(message) => centered(
                f,
                body,
                &format!("Could not load questions: {message}"),
                Style::default().fg(Color::Red),
            ),
            QuizScreen::Empty => centered(f, body, EMPTY_MESSAGE, Style::default()),
            QuizScreen::Playing => self.draw_question(f, body),
            QuizScreen::Finished => self.draw_result(f, body),
        }
        self.draw_footer(f, footer);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let title = match &self.greeting {
            Some(greeting) => format!(" Quiz · {greeting} "),
            None => " Quiz ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let label = match (self.vm.header(), self.vm.progress_label()) {
            (Some(header), Some(progress)) => format!("{header} · {progress}"),
            _ => format!("{}% complete", self.vm.progress_percent()),
        };
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan))
            .percent(u16::from(self.vm.progress_percent()))
            .label(label);
        f.render_widget(gauge, area);
    }

    fn draw_question(&self, f: &mut Frame, area: Rect) {
        let feedback = self.vm.feedback();
        let [prompt_area, options_area, feedback_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(if feedback.is_some() { 5 } else { 0 }),
        ])
        .areas(area);

        let prompt = Paragraph::new(self.vm.prompt().unwrap_or_default())
            .wrap(Wrap { trim: true })
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Question"));
        f.render_widget(prompt, prompt_area);

        let items: Vec<ListItem> = self
            .vm
            .options()
            .into_iter()
            .map(|option| {
                let marker = if option.selected { "●" } else { "○" };
                let style = match option.feedback {
                    Some(OptionFeedback::Correct) => Style::default().fg(Color::Green),
                    Some(OptionFeedback::Wrong) => Style::default().fg(Color::Red),
                    None if option.selected => Style::default().fg(Color::Yellow),
                    None if option.disabled => Style::default().fg(Color::DarkGray),
                    None => Style::default(),
                };
                ListItem::new(format!("{marker} {}) {}", option.label, option.text)).style(style)
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Options"));
        f.render_widget(list, options_area);

        if let Some(feedback) = feedback {
            let color = if feedback.correct { Color::Green } else { Color::Red };
            let text = vec![
                Line::from(feedback.headline).style(Style::default().fg(color).bold()),
                Line::from(feedback.explanation),
            ];
            let panel = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Answer"));
            f.render_widget(panel, feedback_area);
        }
    }

    fn draw_result(&self, f: &mut Frame, area: Rect) {
        let Some(result) = self.vm.result() else {
            return;
        };
        let mut lines = vec![
            Line::from(format!("{} 🎉", result.headline)).bold(),
            Line::from(format!("Final score: {}", result.score)),
            Line::from(format!("Time: {}", result.duration)),
            Line::from(format!("Finished at {}", result.completed_at)).dim(),
        ];
        if let Some(notice) = self.vm.skipped_notice() {
            lines.push(Line::from(notice).fg(Color::Yellow));
        }
        let panel = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Result"));
        f.render_widget(panel, area);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let help = if *self.vm.screen() == QuizScreen::Playing {
            PLAY_HELP
        } else {
            IDLE_HELP
        };
        let line = match &self.status {
            Some(status) => Line::from(status.as_str()).fg(Color::Red),
            None => Line::from(help).dim(),
        };
        f.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

fn centered(f: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
