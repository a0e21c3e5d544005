//! Discover window: state and Iced Application implementation
//!
//! Owns the tag selection and the backend client. Searches run as async
//! tasks; whichever `SearchFinished` arrives last is what stays on screen.

use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{keyboard, Background, Border, Element, Event, Length, Padding, Subscription, Task, Theme};
use iced::keyboard::Key;
use uuid::Uuid;

use crate::backend::api::{BackendClient, SearchAttempt};
use crate::backend::types::TagInfo;
use crate::commands::Command;
use crate::error::ApiError;
use crate::search::render::{render, DisplayRecord, ThreadCard};
use crate::search::{SearchOutcome, SearchQuery, TagSelection, REJECTION_WARNING};
use crate::ui::{search_bar, theme::DarkTheme};

/// Tags shown as clickable chips under the search bar.
const CATALOGUE_CHIPS: usize = 24;

// ============================================================================
// UI State Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UIMode {
    #[default]
    Idle,
    Results,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One-line status message under the search bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct Discover {
    prompt: String,
    selection: TagSelection,
    catalogue: Vec<TagInfo>,
    records: Vec<DisplayRecord>,
    headline: Option<String>,
    notice: Option<Notice>,
    mode: UIMode,
    loading: bool,
    latest_request: Option<Uuid>,
    backend: BackendClient,
}

#[derive(Debug, Clone)]
pub enum Message {
    PromptChanged(String),
    PromptSubmit,
    ToggleTag(String),
    RemoveTag(String),
    ClearSearch,
    TagsLoaded(Result<Vec<TagInfo>, ApiError>),
    SearchFinished {
        request_id: Uuid,
        query: SearchQuery,
        outcome: SearchOutcome,
    },
    IcedEvent(Event),
}

impl Discover {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            prompt: String::new(),
            selection: TagSelection::new(),
            catalogue: Vec::new(),
            records: Vec::new(),
            headline: None,
            notice: None,
            mode: UIMode::Idle,
            loading: false,
            latest_request: None,
            backend,
        }
    }

    /// Initial state plus the one-off tag catalogue fetch.
    pub fn boot(backend: BackendClient) -> (Self, Task<Message>) {
        let app = Self::new(backend);
        let task = app.load_tags();
        (app, task)
    }

    pub fn title(&self) -> String {
        String::from("Rythm'it - Discover")
    }

    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn mode(&self) -> UIMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PromptChanged(new_prompt) => {
                self.prompt = new_prompt;
                Task::none()
            }

            Message::PromptSubmit => {
                let input = std::mem::take(&mut self.prompt);
                match Command::parse(&input) {
                    Command::Search { text } => {
                        self.prompt = text.clone();
                        self.search(&text)
                    }
                    Command::Tag { name } => self.add_tag(&name),
                    Command::Untag { name } => self.remove_tag(&name),
                    Command::Clear => self.update(Message::ClearSearch),
                    Command::Tags => {
                        let names: Vec<&str> = self.catalogue.iter().map(|t| t.name.as_str()).collect();
                        self.notice = Some(if names.is_empty() {
                            Notice::info("No tags available")
                        } else {
                            Notice::info(format!("Tags: {}", names.join(", ")))
                        });
                        Task::none()
                    }
                    Command::Help => {
                        self.mode = UIMode::Help;
                        Task::none()
                    }
                    Command::Invalid { message } => {
                        self.prompt = input;
                        self.notice = Some(Notice::warning(message));
                        Task::none()
                    }
                }
            }

            Message::ToggleTag(name) => {
                if self.selection.contains(&name) {
                    self.remove_tag(&name)
                } else {
                    self.add_tag(&name)
                }
            }

            Message::RemoveTag(name) => self.remove_tag(&name),

            Message::ClearSearch => {
                // In-flight searches are not cancelled: a late response
                // still lands and brings the results panel back.
                self.latest_request = None;
                self.prompt.clear();
                self.selection.clear();
                self.records.clear();
                self.headline = None;
                self.loading = false;
                self.mode = UIMode::Idle;
                self.notice = Some(Notice::info("Search cleared"));
                Task::none()
            }

            Message::TagsLoaded(Ok(tags)) => {
                tracing::info!("Tag catalogue ready ({} tags)", tags.len());
                self.catalogue = tags;
                Task::none()
            }

            Message::TagsLoaded(Err(err)) => {
                tracing::error!(kind = err.kind(), "Failed to load tags: {}", err);
                self.notice = Some(Notice::error("Could not load tags"));
                Task::none()
            }

            Message::SearchFinished { request_id, query, outcome } => {
                if self.latest_request == Some(request_id) {
                    self.loading = false;
                } else {
                    tracing::debug!(%request_id, "Superseded search response applied");
                }

                self.notice = Some(match &outcome {
                    SearchOutcome::Success(threads) => {
                        Notice::info(format!("{} thread(s) found", threads.len()))
                    }
                    SearchOutcome::Empty => Notice::warning("No thread found"),
                    SearchOutcome::Failure(_) => Notice::error("Search failed"),
                });
                self.records = render(&outcome, &query, chrono::Utc::now());
                self.headline = Some(query.headline());
                self.mode = UIMode::Results;
                Task::none()
            }

            Message::IcedEvent(event) => {
                if let Event::Keyboard(keyboard::Event::KeyPressed {
                    key: Key::Named(keyboard::key::Named::Escape),
                    ..
                }) = event
                {
                    return self.update(Message::ClearSearch);
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let search_bar = search_bar::view(&self.prompt, Message::PromptChanged, Message::PromptSubmit);

        let notice: Element<'_, Message> = match &self.notice {
            Some(notice) => text(&notice.text)
                .size(13)
                .color(match notice.level {
                    NoticeLevel::Info => DarkTheme::TEXT_MUTED,
                    NoticeLevel::Warning => DarkTheme::WARNING,
                    NoticeLevel::Error => DarkTheme::ERROR,
                })
                .into(),
            None => Space::with_height(0).into(),
        };

        let body: Element<'_, Message> = match self.mode {
            UIMode::Idle => container(
                text("Type to search threads, or pick tags to filter...")
                    .size(14)
                    .color(DarkTheme::TEXT_MUTED),
            )
            .width(Length::Fill)
            .center_x(Length::Fill)
            .into(),
            UIMode::Results => self.view_results(),
            UIMode::Help => text(Command::help_text()).size(14).color(DarkTheme::TEXT).into(),
        };

        let content = column![
            search_bar,
            Space::with_height(8),
            self.view_selected_tags(),
            self.view_catalogue(),
            notice,
            Space::with_height(12),
            body
        ]
        .spacing(6);

        container(
            container(content)
                .padding(16)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::BACKGROUND)),
            border: Border {
                color: DarkTheme::BORDER,
                width: 1.0,
                radius: 16.0.into(),
            },
            ..Default::default()
        })
        .into()
    }

    fn view_selected_tags(&self) -> Element<'_, Message> {
        if self.selection.is_empty() {
            return text("No tag selected").size(12).color(DarkTheme::TEXT_MUTED).into();
        }

        let chips: Vec<Element<'_, Message>> = self
            .selection
            .as_slice()
            .iter()
            .map(|tag| {
                button(text(format!("{} ×", tag)).size(12))
                    .on_press(Message::RemoveTag(tag.clone()))
                    .style(button::primary)
                    .into()
            })
            .collect();
        row(chips).spacing(6).into()
    }

    fn view_catalogue(&self) -> Element<'_, Message> {
        let chips: Vec<Element<'_, Message>> = self
            .catalogue
            .iter()
            .take(CATALOGUE_CHIPS)
            .map(|tag| {
                let style: fn(&Theme, button::Status) -> button::Style =
                    if self.selection.contains(&tag.name) {
                        button::primary
                    } else {
                        button::secondary
                    };
                button(text(&tag.name).size(12))
                    .on_press(Message::ToggleTag(tag.name.clone()))
                    .style(style)
                    .into()
            })
            .collect();
        scrollable(row(chips).spacing(6))
            .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::new()))
            .into()
    }

    fn view_results(&self) -> Element<'_, Message> {
        let title = match (&self.headline, self.loading) {
            (_, true) => "Searching...".to_string(),
            (Some(headline), false) => format!("Results for {}", headline),
            (None, false) => String::new(),
        };

        let items: Vec<Element<'_, Message>> = self
            .records
            .iter()
            .map(|record| match record {
                DisplayRecord::Thread(card) => view_card(card),
                DisplayRecord::NoResults { headline, suggestions, .. } => {
                    let mut lines = column![
                        text("No thread found").size(16).color(DarkTheme::TEXT),
                        text(format!("Nothing matches {}.", headline))
                            .size(13)
                            .color(DarkTheme::TEXT_MUTED),
                        text("Suggestions:").size(13).color(DarkTheme::TEXT)
                    ]
                    .spacing(4);
                    for suggestion in suggestions {
                        lines = lines.push(text(format!("• {}", suggestion)).size(12).color(DarkTheme::TEXT_MUTED));
                    }
                    lines.into()
                }
                DisplayRecord::Error { message, detail, .. } => column![
                    text(message).size(15).color(DarkTheme::ERROR),
                    text(detail).size(11).color(DarkTheme::TEXT_MUTED)
                ]
                .spacing(2)
                .into(),
            })
            .collect();

        column![
            text(title).size(15).color(DarkTheme::TEXT),
            scrollable(column(items).spacing(8)).height(Length::Fill)
        ]
        .spacing(8)
        .height(Length::FillPortion(1))
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::event::listen().map(Message::IcedEvent)
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ========================================================================
    // Business Logic
    // ========================================================================

    fn add_tag(&mut self, name: &str) -> Task<Message> {
        if !self.selection.add(name) {
            return Task::none();
        }
        self.notice = Some(Notice::info(format!("Tag \"{}\" added", name)));
        self.apply_tag_filters()
    }

    fn remove_tag(&mut self, name: &str) -> Task<Message> {
        if !self.selection.remove(name) {
            return Task::none();
        }
        self.notice = Some(Notice::info(format!("Tag \"{}\" removed", name)));
        self.apply_tag_filters()
    }

    /// Re-run the search whenever the selection changes; with no tags left,
    /// go back to the idle panel.
    fn apply_tag_filters(&mut self) -> Task<Message> {
        if self.selection.is_empty() {
            self.latest_request = None;
            self.loading = false;
            self.records.clear();
            self.headline = None;
            self.mode = UIMode::Idle;
            return Task::none();
        }
        let text = self.prompt.clone();
        self.search(&text)
    }

    fn search(&mut self, text: &str) -> Task<Message> {
        match self.backend.prepare_search(text, &self.selection) {
            SearchAttempt::Rejected => {
                self.notice = Some(Notice::warning(REJECTION_WARNING));
                Task::none()
            }
            SearchAttempt::Pending(pending) => {
                let request_id = pending.request_id();
                let query = pending.query().clone();
                self.latest_request = Some(request_id);
                self.loading = true;
                self.mode = UIMode::Results;
                self.notice = Some(Notice::info(format!("Searching {}", query.headline())));

                Task::perform(pending.send(), move |outcome| Message::SearchFinished {
                    request_id,
                    query: query.clone(),
                    outcome,
                })
            }
        }
    }

    fn load_tags(&self) -> Task<Message> {
        let backend = self.backend.clone();
        Task::perform(async move { backend.list_tags().await }, Message::TagsLoaded)
    }
}

fn view_card(card: &ThreadCard) -> Element<'_, Message> {
    let header = row![
        container(text(&card.initials).size(14).color(DarkTheme::TEXT))
            .padding(8)
            .style(|_theme| container::Style {
                background: Some(Background::Color(DarkTheme::TAG)),
                border: Border::default().rounded(16),
                ..Default::default()
            }),
        column![
            text(&card.author).size(13).color(DarkTheme::TEXT),
            text(&card.time_ago).size(11).color(DarkTheme::TEXT_MUTED)
        ]
        .spacing(2)
    ]
    .spacing(10)
    .align_y(iced::Alignment::Center);

    let stats = format!(
        "♥ {}   💬 {}   {}",
        card.likes,
        card.comments,
        card.link.as_deref().unwrap_or("")
    );

    container(
        column![
            header,
            text(&card.title).size(16).color(DarkTheme::TEXT),
            text(&card.preview).size(13).color(DarkTheme::TEXT_MUTED),
            text(card.tags.join("  ")).size(11).color(DarkTheme::PRIMARY),
            text(stats).size(11).color(DarkTheme::TEXT_MUTED)
        ]
        .spacing(6),
    )
    .padding(Padding::from([10.0, 12.0]))
    .width(Length::Fill)
    .style(|_theme| container::Style {
        background: Some(Background::Color(DarkTheme::SURFACE)),
        border: Border::default().rounded(8),
        ..Default::default()
    })
    .into()
}
