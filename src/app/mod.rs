// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the capture and
//! adjust screens.
//!
//! The `App` struct wires the screens to the shared card state, the
//! session poller, the capture region and the export pipeline. Policy
//! decisions (poll cadence, window sizing, save directory resolution)
//! stay close to the main update loop so user-facing behavior is easy to
//! audit.

mod message;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::capture::RegionCapture;
use crate::config;
use crate::media::{compose, ImageData, QuarterTurns};
use crate::session::{poller, ListenerState};
use crate::ui::capture_page;
use crate::ui::media_card;
use crate::ui::theming::{AccentState, ThemeMode};
use crate::ui::adjust_page;
use iced::{window, Element, Subscription, Task, Theme};
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

pub const WINDOW_DEFAULT_WIDTH: u32 = 480;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const MIN_WINDOW_WIDTH: u32 = 360;
pub const MIN_WINDOW_HEIGHT: u32 = 640;

/// Decoded artwork kept around between polls, keyed by art URL.
const ARTWORK_CACHE_ENTRIES: usize = 16;

/// A capture waiting for its overlay snapshot to come back from the
/// renderer.
#[derive(Debug)]
pub(crate) struct PendingCapture {
    pub base: ImageData,
    pub rotation: QuarterTurns,
    pub adjust: bool,
}

/// Root Iced application state.
pub struct App {
    pub(crate) screen: Screen,
    pub(crate) capture_page: capture_page::State,
    pub(crate) adjust: Option<adjust_page::State>,
    pub(crate) card: media_card::State,
    pub(crate) accent: AccentState,
    pub(crate) listener: ListenerState,
    pub(crate) region: RegionCapture,
    pub(crate) pending_capture: Option<PendingCapture>,
    pub(crate) artwork_cache: LruCache<String, ImageData>,
    pub(crate) artwork_in_flight: HashSet<String>,
    pub(crate) artwork_failed: HashSet<String>,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) theme_mode: ThemeMode,
    pub(crate) last_tick: Option<Instant>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("sessions", &self.card.len())
            .field("listener", &self.listener)
            .finish()
    }
}

impl App {
    /// Initializes application state and kicks off the gallery scan, the
    /// first session poll and the first bounds query.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = config::load().unwrap_or_default();

        let gallery_dir = flags.gallery_dir.or(config.gallery_dir);
        let output_override = flags.output_dir.or(config.output_dir);
        let camera_index = flags.camera_index.or(config.camera_index).unwrap_or(0);

        let (capture_page, scan_task) = capture_page::State::new(camera_index, gallery_dir);

        let app = App {
            screen: Screen::Capture,
            capture_page,
            adjust: None,
            card: media_card::State::new(),
            accent: AccentState::new(),
            listener: ListenerState::Unknown,
            region: RegionCapture::new(),
            pending_capture: None,
            artwork_cache: LruCache::new(
                NonZeroUsize::new(ARTWORK_CACHE_ENTRIES).expect("cache capacity is non-zero"),
            ),
            artwork_in_flight: HashSet::new(),
            artwork_failed: HashSet::new(),
            output_dir: compose::resolve_output_dir(output_override.as_deref()),
            theme_mode: config.theme_mode,
            last_tick: None,
        };

        let boot = Task::batch([
            scan_task.map(Message::CapturePage),
            Task::perform(poller::poll_sessions(), Message::SessionsPolled),
            update::card_bounds_task(),
        ]);

        (app, boot)
    }

    fn title(&self) -> String {
        String::from("Spectre")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        update::handle(self, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::subscription(self)
    }
}

/// Builds the window settings: portrait, phone-shaped.
fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy the Fn trait
    // requirement while only consuming flags once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}
