//! Shared test utilities for pdfaudit integration tests.
//!
//! This module provides:
//! - `TestHarness` for building a corpus in a temp directory
//! - Builders for synthetic PDFs and scripted OCR output

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
