//! Domain models for revguard.
//!
//! Canonical definitions for the core entities:
//! - `UpstreamError` / `FailureKind`: what went wrong upstream
//! - `Strategy`: how the engine recovers
//! - `StructuredReviewResult`: the review contract every path produces

pub mod error;
pub mod failure;
pub mod review;
pub mod strategy;

pub use error::{Result, RevguardError};
pub use failure::{FailureKind, UpstreamError};
pub use review::{
    Issue, ReviewContext, ReviewFile, ReviewMetadata, ReviewSummary, Severity,
    StructuredReviewResult,
};
pub use strategy::{FallbackType, Strategy};
