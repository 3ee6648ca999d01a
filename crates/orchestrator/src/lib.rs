//! Turn orchestrator for the Murmur chat service.
//!
//! This crate provides the [`Orchestrator`] type which carries a
//! user-submitted turn through its full lifecycle:
//!
//! ```text
//! HTTP request (api crate)
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ORCHESTRATOR                         │
//! │                                                          │
//! │  1. Validate payload                                     │
//! │  2. Admit against the credit balance                     │
//! │  3. Resolve or create the conversation                   │
//! │  4. Persist the user message                             │
//! │  5. Route to the profile-selected backend                │
//! │  6. Persist the reply (or the error text)                │
//! │  7. Debit credits on success only                        │
//! │  8. Summarize the opening exchange                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures never abort a text turn: the error text is stored as
//! the assistant message and returned in a normal [`TurnResponse`], so
//! the conversation keeps its alternating shape. Image turns instead
//! persist a fixed failure message and surface
//! [`OrchestratorError::ImageGeneration`].
//!
//! Routing, summarization and image generation sit behind the
//! [`BackendRouter`], [`Summarizer`] and [`ImageGenerator`] traits;
//! production wiring comes from [`Orchestrator::from_env`].

mod config;
mod error;
mod image;
mod media;
mod orchestrator;
mod router;
mod summary;

pub use config::{
    OrchestratorConfig, DEFAULT_IMAGE_TURN_COST, DEFAULT_MEDIA_ROOT, DEFAULT_STARTING_CREDITS,
    DEFAULT_SUMMARY_MODEL, DEFAULT_TEXT_TURN_COST,
};
pub use error::OrchestratorError;
pub use image::ImageGenerator;
pub use media::{media_url, MediaStore, MEDIA_MOUNT};
pub use orchestrator::{ImageTurnResponse, Orchestrator, TurnResponse};
pub use router::{BackendRouter, BackendSet};
pub use summary::{BackendSummarizer, Summarizer, SUMMARY_PLACEHOLDER};
