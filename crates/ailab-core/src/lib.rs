//! # AI Lab Core Library
//!
//! Core logic for the AI lab samples. The centerpiece is the clock intent
//! dispatcher: it takes a recognized intent with entities and answers
//! questions about the time, the day of a date, or the date of a weekday.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Clock**: intent dispatch plus the pure time and calendar functions,
//!   parameterized over a [`Clock`] so answers are reproducible in tests
//! - **Services**: REST clients for conversation analysis, text analytics,
//!   question answering, text classification, translation and speech
//! - **Labs**: the console samples that drive those clients
//! - **Storage**: TOML-based settings
//!
//! ## Key Components
//!
//! - [`IntentDispatcher`]: routes a [`RecognitionResult`] to an answer
//! - [`ConversationClient`]: an [`IntentRecognizer`] backed by the cloud
//! - [`Settings`]: endpoints, keys and deployment names

pub mod clock;
pub mod error;
pub mod labs;
pub mod services;
pub mod storage;

pub use clock::{
    date_for_weekday, day_for_date, dispatch, time_for_location, Clock, Entity, EntityCategory,
    FixedClock, Intent, IntentDispatcher, IntentRecognizer, RecognitionResult, SystemClock,
};
pub use error::{ConfigError, CoreError, ServiceError};
pub use services::{CognitiveService, ConversationClient};
pub use storage::Settings;
