// SPDX-License-Identifier: MPL-2.0
/// The two screens of the application.
///
/// `Capture` is the boot screen; a capture with "adjust after capture"
/// enabled moves to `Adjust`, and Escape returns without saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Capture,
    Adjust,
}
