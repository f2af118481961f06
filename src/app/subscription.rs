// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Three concerns: the 1-second session poll cadence, a fast tick while
//! anything animates or decodes, and keyboard routing for the adjust
//! screen.

use super::{App, Message, Screen};
use crate::ui::adjust_page;
use iced::{event, keyboard, time, Subscription};
use std::time::Duration;

pub(crate) fn subscription(app: &App) -> Subscription<Message> {
    let mut subscriptions = vec![
        time::every(Duration::from_secs(1)).map(Message::PollTick),
        keyboard_subscription(app.screen),
    ];

    if app.screen == Screen::Capture {
        subscriptions.push(app.capture_page.subscription().map(Message::CapturePage));
    }

    if needs_animation_tick(app) {
        subscriptions.push(time::every(Duration::from_millis(100)).map(Message::AnimationTick));
    }

    Subscription::batch(subscriptions)
}

/// The fast tick runs only while something on screen changes without
/// input: wave drift, the accent blend, or gallery decodes landing.
fn needs_animation_tick(app: &App) -> bool {
    !app.card.is_empty() || app.accent.is_animating() || app.capture_page.is_decoding()
}

fn keyboard_subscription(screen: Screen) -> Subscription<Message> {
    match screen {
        // Escape returns from the adjust screen, arrows nudge the
        // overlay offset.
        Screen::Adjust => event::listen_with(|event, status, _window| {
            if status == event::Status::Captured {
                return None;
            }

            let event::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) = event else {
                return None;
            };

            match key {
                keyboard::Key::Named(keyboard::key::Named::Escape) => {
                    Some(Message::EscapePressed)
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                    Some(Message::AdjustPage(adjust_page::Message::Nudge(-1.0, 0.0)))
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
                    Some(Message::AdjustPage(adjust_page::Message::Nudge(1.0, 0.0)))
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowUp) => {
                    Some(Message::AdjustPage(adjust_page::Message::Nudge(0.0, -1.0)))
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowDown) => {
                    Some(Message::AdjustPage(adjust_page::Message::Nudge(0.0, 1.0)))
                }
                _ => None,
            }
        }),
        Screen::Capture => Subscription::none(),
    }
}
