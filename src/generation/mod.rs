//! Generation service collaborator
//!
//! The [`Generator`] trait is the only seam between BrandMeld and the
//! hosted model. Each operation either returns text or fails with a single
//! user-facing [`Error::GenerationFailed`]; the underlying cause is logged,
//! not returned.

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use crate::error::{Error, Result};
use std::fmt;
use tracing::error;

/// The three operations the generation service provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Analyze,
    Audit,
}

impl Operation {
    /// Stable name used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Analyze => "analyze",
            Operation::Audit => "audit",
        }
    }

    /// Message shown to the user when the operation fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Generate => {
                "Failed to generate content from AI. Please check your connection or API key."
            }
            Operation::Analyze => {
                "Failed to analyze brand voice due to a technical issue. Please check your connection and try again."
            }
            Operation::Audit => "Failed to audit content from AI.",
        }
    }

    /// Log `cause` and turn it into the generic failure for this operation
    pub fn fail(self, cause: &dyn fmt::Display) -> Error {
        error!(operation = self.name(), error = %cause, "generation service call failed");
        Error::generation_failed(self.name(), self.failure_message())
    }
}

/// Hosted text generation
pub trait Generator {
    /// Write content for `request` in the voice described by `brand_voice`
    fn generate(&self, brand_voice: &str, request: &str) -> Result<String>;

    /// Describe the writing voice of a person or company (name or URL)
    fn analyze_voice(&self, identifier: &str) -> Result<String>;

    /// Produce a Markdown report on how well `content` matches `brand_voice`
    fn audit(&self, brand_voice: &str, content: &str) -> Result<String>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, brand_voice: &str, request: &str) -> Result<String> {
        (**self).generate(brand_voice, request)
    }

    fn analyze_voice(&self, identifier: &str) -> Result<String> {
        (**self).analyze_voice(identifier)
    }

    fn audit(&self, brand_voice: &str, content: &str) -> Result<String> {
        (**self).audit(brand_voice, content)
    }
}
