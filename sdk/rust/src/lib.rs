//! Typed client for the settings service REST API.

mod client;

pub use client::{ApiErrorBody, SdkError, SettingsClient, UpdateResult};
