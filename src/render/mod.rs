//! Renderers turning expectation configurations and results into report
//! content blocks.
//!
//! Render functions are registered per expectation kind in a static
//! registry built once at process start; adding a kind means adding its
//! entry here, there is no runtime reflection.

pub mod content;
pub mod diagnostic;
pub mod prescriptive;

pub use content::RenderedContent;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::{ExpectationConfig, ExpectationKind};
use crate::results::ValidationResult;

type PrescriptiveRenderer = fn(&ExpectationConfig) -> RenderedContent;
type DiagnosticRenderer = fn(&ExpectationConfig, &ValidationResult) -> Option<RenderedContent>;

struct RendererRegistry {
    prescriptive: HashMap<ExpectationKind, PrescriptiveRenderer>,
    diagnostic: HashMap<ExpectationKind, DiagnosticRenderer>,
}

static REGISTRY: Lazy<RendererRegistry> = Lazy::new(|| {
    let mut prescriptive: HashMap<ExpectationKind, PrescriptiveRenderer> = HashMap::new();
    prescriptive.insert(ExpectationKind::LengthMatch, prescriptive::length_match);
    prescriptive.insert(ExpectationKind::ApproxLeq, prescriptive::approx_leq);
    prescriptive.insert(ExpectationKind::IdentityRule, prescriptive::identity_rule);

    let mut diagnostic: HashMap<ExpectationKind, DiagnosticRenderer> = HashMap::new();
    diagnostic.insert(ExpectationKind::LengthMatch, diagnostic::unexpected_table);
    diagnostic.insert(ExpectationKind::ApproxLeq, diagnostic::unexpected_table);
    diagnostic.insert(ExpectationKind::IdentityRule, diagnostic::unexpected_table);

    RendererRegistry {
        prescriptive,
        diagnostic,
    }
});

/// Render the prescriptive statement for an expectation configuration.
pub fn prescriptive(config: &ExpectationConfig) -> Option<RenderedContent> {
    REGISTRY
        .prescriptive
        .get(&config.kind)
        .map(|render| render(config))
}

/// Render the diagnostic unexpected-value table for a result. `None` when
/// the kind has no diagnostic renderer or there is nothing to show.
pub fn diagnostic(
    config: &ExpectationConfig,
    result: &ValidationResult,
) -> Option<RenderedContent> {
    REGISTRY
        .diagnostic
        .get(&config.kind)
        .and_then(|render| render(config, result))
}
