#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Headless core of a desktop client for a transactional-email provider:
//! the asynchronous send pipeline, file-backed persistence for history,
//! drafts, and templates, and the event bus that reflects send progress
//! back to the embedding presenter.

pub mod app;
pub mod domain;
pub mod infrastructure;
