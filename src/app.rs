use std::time::{Duration, Instant};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::config::{Config, ConfigOverrides};
use crate::engine::game::{GameEvent, GameState, WordQueue};
use crate::keyboard::layout::KeyboardLayout;
use crate::provider::worker::{Dispatcher, ProviderReply, ProviderRequest, ProviderResponse, Ticket};
use crate::provider::{CoachingRequest, PracticeTextRequest};
use crate::session::input::KeyAction;
use crate::session::result::SessionResult;
use crate::session::state::{SessionKind, Transition, TypingSession};
use crate::ui::components::menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Lesson,
    Zen,
    Arcade,
    Result,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StartMode {
    Lesson,
    Zen,
    Arcade,
}

pub const MENU_ITEMS: usize = menu::ITEMS.len();
pub const SETTINGS_FIELDS: usize = 4;

pub struct App {
    pub screen: AppScreen,
    /// Effective config for this run, command-line overrides included.
    pub config: Config,
    pub theme: Theme,
    pub keyboard_layout: KeyboardLayout,
    pub session: TypingSession,
    pub game: Option<GameState>,
    pub last_result: Option<SessionResult>,
    pub focus_keys: Vec<char>,
    pub text_pending: bool,
    pub tip_pending: bool,
    pub words_pending: bool,
    /// The most recent provider reply was fallback content.
    pub using_fallback: bool,
    pub menu_selected: usize,
    pub settings_selected: usize,
    pub should_quit: bool,
    /// What the config file holds; only Settings edits land here.
    saved_config: Config,
    generation: u64,
    last_tick: Option<Instant>,
    rng: SmallRng,
    dispatcher: Dispatcher,
}

impl App {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self::with_rng(config, dispatcher, SmallRng::from_entropy())
    }

    pub fn with_rng(config: Config, dispatcher: Dispatcher, rng: SmallRng) -> Self {
        let theme = Theme::load_or_default(&config.theme);
        let keyboard_layout = KeyboardLayout::from_name(&config.keyboard_layout);
        Self {
            screen: AppScreen::Menu,
            saved_config: config.clone(),
            config,
            theme,
            keyboard_layout,
            session: TypingSession::lesson(""),
            game: None,
            last_result: None,
            focus_keys: Vec::new(),
            text_pending: false,
            tip_pending: false,
            words_pending: false,
            using_fallback: false,
            menu_selected: 0,
            settings_selected: 0,
            should_quit: false,
            generation: 0,
            last_tick: None,
            rng,
            dispatcher,
        }
    }

    /// Layer run-only overrides on top of the loaded config.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        self.config = overrides.apply(&self.saved_config);
        self.theme = Theme::load_or_default(&self.config.theme);
        self.keyboard_layout = KeyboardLayout::from_name(&self.config.keyboard_layout);
        self
    }

    pub fn saved_config(&self) -> &Config {
        &self.saved_config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn provider_name(&self) -> &'static str {
        self.dispatcher.provider_name()
    }

    /// Invalidates every request still in flight.
    fn next_generation(&mut self) -> Ticket {
        self.generation += 1;
        self.text_pending = false;
        self.tip_pending = false;
        self.words_pending = false;
        Ticket {
            generation: self.generation,
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }

    pub fn start(&mut self, mode: StartMode) {
        match mode {
            StartMode::Lesson => self.start_lesson(),
            StartMode::Zen => self.start_zen(),
            StartMode::Arcade => self.start_arcade(),
        }
    }

    /// New lesson text, biased toward `focus_keys`.
    pub fn start_lesson(&mut self) {
        let ticket = self.next_generation();
        self.game = None;
        self.session = TypingSession::lesson("");
        self.text_pending = true;
        self.screen = AppScreen::Lesson;
        info!(generation = ticket.generation, focus = ?self.focus_keys, "starting lesson");

        self.dispatcher.dispatch(
            ticket,
            ProviderRequest::PracticeText(PracticeTextRequest {
                focus_keys: self.focus_keys.clone(),
                difficulty: self.config.difficulty,
                topic: self.config.topic.clone(),
            }),
        );
    }

    /// Lesson focused on the weak keys of the last result.
    pub fn next_lesson(&mut self) {
        self.focus_keys = self
            .last_result
            .as_ref()
            .map(|r| r.weak_keys.clone())
            .unwrap_or_default();
        self.start_lesson();
    }

    /// Same text again. Zen retries start a fresh zen session.
    pub fn retry(&mut self) {
        self.next_generation();
        self.session.reset();
        self.screen = match self.session.kind() {
            SessionKind::Lesson => AppScreen::Lesson,
            SessionKind::Zen => AppScreen::Zen,
        };
        info!(generation = self.generation, "retrying session");
    }

    pub fn start_zen(&mut self) {
        self.next_generation();
        self.game = None;
        self.session = TypingSession::zen();
        self.screen = AppScreen::Zen;
        info!(generation = self.generation, "starting zen session");
    }

    pub fn start_arcade(&mut self) {
        self.next_generation();
        let low_water = (self.config.arcade_word_batch / 4).max(1);
        self.game = Some(GameState::new(WordQueue::new(low_water)));
        self.last_tick = None;
        self.screen = AppScreen::Arcade;
        info!(generation = self.generation, "starting arcade");
        self.request_words();
    }

    fn request_words(&mut self) {
        self.words_pending = true;
        if let Some(game) = self.game.as_mut() {
            game.set_awaiting_words(true);
        }
        self.dispatcher.dispatch(
            self.ticket(),
            ProviderRequest::PracticeWords {
                count: self.config.arcade_word_batch,
                difficulty: self.config.difficulty,
            },
        );
    }

    pub fn go_to_menu(&mut self) {
        self.next_generation();
        self.game = None;
        self.last_tick = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    /// A typing keystroke on the lesson or zen screen.
    pub fn type_key(&mut self, action: KeyAction, now: Instant) {
        if self.text_pending || !matches!(self.screen, AppScreen::Lesson | AppScreen::Zen) {
            return;
        }
        match self.session.apply(action, now) {
            Some(Transition::Finished(_)) => self.finish_session(now),
            Some(Transition::Started) => debug!(generation = self.generation, "session started"),
            None => {}
        }
    }

    /// Esc in zen. An untouched zen session just goes back to the menu.
    pub fn end_zen(&mut self, now: Instant) {
        if self.session.finish(now).is_some() {
            self.finish_session(now);
        } else {
            self.go_to_menu();
        }
    }

    fn finish_session(&mut self, now: Instant) {
        let stats = self.session.stats(now);
        let weak_keys = self
            .session
            .heatmap()
            .weak_keys(self.config.weak_key_min_attempts, self.config.weak_key_error_rate);
        info!(
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            mistakes = stats.mistakes,
            "session finished"
        );

        self.last_result = Some(SessionResult::from_session(
            &self.session,
            stats,
            weak_keys.clone(),
        ));
        self.screen = AppScreen::Result;
        self.tip_pending = true;
        self.dispatcher.dispatch(
            self.ticket(),
            ProviderRequest::CoachingTip(CoachingRequest {
                wpm: stats.wpm,
                accuracy: stats.accuracy,
                weak_keys,
            }),
        );
    }

    /// A keystroke in the arcade. Returns the game events it produced.
    pub fn arcade_key(&mut self, action: KeyAction) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        let events = match action {
            KeyAction::Char(ch) => game.type_char(ch),
            KeyAction::Delete => {
                game.backspace();
                Vec::new()
            }
            KeyAction::Ignored => Vec::new(),
        };
        log_game_events(&events);
        events
    }

    /// Drives the arcade by the wall-clock time since the previous tick.
    pub fn handle_tick(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.screen != AppScreen::Arcade {
            return Vec::new();
        }
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.advance_game(dt)
    }

    /// One simulation step of `dt`, independent of the clock.
    pub fn advance_game(&mut self, dt: Duration) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        if game.is_over() {
            return Vec::new();
        }
        let events = game.tick(dt, &mut self.rng);
        let refill = game.queue().needs_refill();
        log_game_events(&events);

        if refill && !self.words_pending {
            self.request_words();
        }
        events
    }

    /// Applies a provider reply. Returns false when the reply was stale or
    /// no longer wanted.
    pub fn handle_provider_response(&mut self, response: ProviderResponse) -> bool {
        if response.ticket.generation != self.generation {
            debug!(
                reply_generation = response.ticket.generation,
                current = self.generation,
                "discarding stale provider reply"
            );
            return false;
        }
        self.using_fallback = response.degraded;

        match response.reply {
            ProviderReply::PracticeText(text) => {
                if !self.text_pending {
                    return false;
                }
                self.text_pending = false;
                self.session = TypingSession::lesson(&text);
                info!(chars = self.session.reference().len(), fallback = response.degraded, "lesson text ready");
            }
            ProviderReply::CoachingTip(tip) => {
                if !self.tip_pending {
                    return false;
                }
                self.tip_pending = false;
                self.session.set_advice(tip.clone());
                if let Some(result) = self.last_result.as_mut() {
                    result.coaching_tip = Some(tip);
                }
            }
            ProviderReply::PracticeWords(words) => {
                if !self.words_pending {
                    return false;
                }
                self.words_pending = false;
                let Some(game) = self.game.as_mut() else {
                    return false;
                };
                game.set_awaiting_words(false);
                let added = game.queue_mut().push_batch(words);
                debug!(added, queued = game.queue().len(), "arcade words queued");
            }
        }
        true
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = (self.menu_selected + 1) % MENU_ITEMS;
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = (self.menu_selected + MENU_ITEMS - 1) % MENU_ITEMS;
    }

    pub fn activate_menu_item(&mut self) {
        match self.menu_selected {
            0 => self.start_lesson(),
            1 => self.start_zen(),
            2 => self.start_arcade(),
            _ => self.go_to_settings(),
        }
    }

    pub fn settings_next(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SETTINGS_FIELDS;
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = (self.settings_selected + SETTINGS_FIELDS - 1) % SETTINGS_FIELDS;
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                self.config.difficulty = if forward {
                    self.config.difficulty.next()
                } else {
                    self.config.difficulty.prev()
                };
                self.saved_config.difficulty = self.config.difficulty;
            }
            1 => {
                self.config.cycle_topic(forward);
                self.saved_config.topic = self.config.topic.clone();
            }
            2 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let next = match themes.iter().position(|t| *t == self.config.theme) {
                    Some(idx) if forward => (idx + 1) % themes.len(),
                    Some(idx) => (idx + themes.len() - 1) % themes.len(),
                    None => 0,
                };
                self.config.theme = themes[next].clone();
                self.saved_config.theme = self.config.theme.clone();
                self.theme = Theme::load_or_default(&self.config.theme);
            }
            _ => {
                self.config.cycle_keyboard_layout(forward);
                self.saved_config.keyboard_layout = self.config.keyboard_layout.clone();
                self.keyboard_layout = KeyboardLayout::from_name(&self.config.keyboard_layout);
            }
        }
    }

    /// Current value of each settings field, in display order.
    pub fn settings_fields(&self) -> [(&'static str, String); SETTINGS_FIELDS] {
        [
            ("Difficulty", self.config.difficulty.to_string()),
            ("Topic", self.config.topic.clone()),
            ("Theme", self.config.theme.clone()),
            ("Keyboard Layout", self.config.keyboard_layout.clone()),
        ]
    }

    /// Leave settings, writing the config file. Command-line overrides the
    /// user did not touch here stay out of it.
    pub fn save_settings(&mut self) -> Result<()> {
        self.screen = AppScreen::Menu;
        self.saved_config.save()
    }
}

fn log_game_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LevelUp { level } => info!(level, "arcade level up"),
            GameEvent::GameOver { score } => info!(score, "arcade game over"),
            GameEvent::LifeLost { remaining } => debug!(remaining, "arcade life lost"),
            _ => {}
        }
    }
}
