//! Heuristic parser turning a free-text idea description into a
//! [`ParsedInput`]. Keyword tables for the domain, positional phrases
//! for audience ("for ...") and features ("with ... and ...").
//!
//! Deliberately rule-based so the rule-driven survey mode needs no
//! model at all. Unrecognized domains stay empty and downstream code
//! falls back to a generic label.

use marketscout_core::input::ParsedInput;

/// Domain label and the keywords that signal it. First match wins, in
/// table order.
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "fintech",
        &[
            "fintech", "finance", "financial", "payment", "banking", "budget", "invoice",
            "invoicing", "lending", "credit", "bookkeeping",
        ],
    ),
    (
        "health",
        &[
            "health", "fitness", "medical", "wellness", "medication", "patient", "workout",
        ],
    ),
    (
        "e-commerce",
        &[
            "e-commerce", "ecommerce", "shopping", "retail", "marketplace", "storefront", "cart",
        ],
    ),
    (
        "education",
        &["education", "learning", "tutoring", "course", "teaching", "classroom"],
    ),
    (
        "logistics",
        &["logistics", "delivery", "shipping", "freight", "fleet", "courier", "warehouse"],
    ),
];

/// Phrases that end an audience or feature clause.
const CLAUSE_TERMINATORS: &[&str] = &[" with ", " that ", ",", "."];

/// Parse a free-text idea into structured fields. Never fails; fields
/// that cannot be inferred stay empty.
pub fn parse_idea(text: &str) -> ParsedInput {
    let core_idea = text.trim().to_string();
    let lower = core_idea.to_lowercase();

    ParsedInput {
        domain: detect_domain(&lower),
        target_audience: extract_audience(&lower),
        key_features: extract_features(&lower),
        core_idea,
    }
}

fn detect_domain(lower: &str) -> String {
    for (domain, keywords) in DOMAIN_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return (*domain).to_string();
        }
    }
    String::new()
}

/// The clause after the first " for ", cut at the next terminator.
fn extract_audience(lower: &str) -> String {
    let Some(idx) = lower.find(" for ") else {
        return String::new();
    };
    let rest = &lower[idx + " for ".len()..];

    let end = CLAUSE_TERMINATORS
        .iter()
        .filter_map(|t| rest.find(t))
        .min()
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// The clause after the first " with ", split on " and " and commas.
fn extract_features(lower: &str) -> Vec<String> {
    let Some(idx) = lower.find(" with ") else {
        return Vec::new();
    };
    let rest = lower[idx + " with ".len()..]
        .trim_end_matches('.')
        .trim();

    rest.split(" and ")
        .flat_map(|part| part.split(','))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
