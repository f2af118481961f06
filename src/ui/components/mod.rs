// SPDX-License-Identifier: MPL-2.0
//! Reusable UI components.

pub mod permission_prompt;

pub use permission_prompt::PermissionPrompt;
