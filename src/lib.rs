//! PDF Tutor Server library
//!
//! Extracts positioned text from uploaded PDFs and resolves tutor
//! references back to highlight regions on the page.
//!
//! # Modules
//!
//! - `pdf`: Page decoding boundary over MuPDF
//! - `extract`: Reading-order reconstruction and full-text cleanup
//! - `annotations`: Highlight and saved annotation types
//! - `resolve`: Phrase to highlight resolution over stored fragments
//! - `db`: SQLite persistence
//! - `routes`: HTTP API

pub mod annotations;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod pdf;
pub mod resolve;
pub mod routes;
pub mod state;
