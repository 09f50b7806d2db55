// ABOUTME: Match-confidence estimation shared by all source adapters
// ABOUTME: Exact match, containment, and token-overlap tiers with a completeness boost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

//! Confidence tiers, highest to lowest:
//!
//! 1. exact normalized-name match: 0.95,
//! 2. substring containment either way: 0.80,
//! 3. token overlap (fraction of query words found in the candidate name),
//!    linearly mapped into the lowest accepted tier, optionally boosted for
//!    more complete records, capped below the containment tier.
//!
//! Below the minimum overlap ratio the candidate is rejected outright.

use crate::cache::normalize_name;

/// Confidence for an exact normalized-name match
pub const EXACT_MATCH_CONFIDENCE: f64 = 0.95;
/// Confidence for a substring containment match
pub const CONTAINMENT_CONFIDENCE: f64 = 0.80;
/// Minimum fraction of query tokens that must appear in the candidate name
pub const MIN_TOKEN_OVERLAP: f64 = 0.34;
/// Ceiling for overlap-tier scores (must stay below the containment tier)
const OVERLAP_TIER_CAP: f64 = 0.78;

/// Estimate how well a candidate record name matches the query.
///
/// `completeness_boost` (0.0-0.05) rewards records known to be more complete
/// (e.g., curated reference entries over crowd-sourced labels); it only
/// applies within the token-overlap tier and never lifts a score past the
/// containment tier. Returns `None` when the overlap is below the minimum
/// ratio.
#[must_use]
pub fn match_confidence(query: &str, candidate: &str, completeness_boost: f64) -> Option<f64> {
    let query_norm = normalize_name(query);
    let candidate_norm = normalize_name(candidate);

    if query_norm.is_empty() || candidate_norm.is_empty() {
        return None;
    }

    if query_norm == candidate_norm {
        return Some(EXACT_MATCH_CONFIDENCE);
    }

    if candidate_norm.contains(&query_norm) || query_norm.contains(&candidate_norm) {
        return Some(CONTAINMENT_CONFIDENCE);
    }

    let query_tokens: Vec<&str> = query_norm.split(' ').collect();
    let matched = query_tokens
        .iter()
        .filter(|token| candidate_norm.split(' ').any(|c| c == **token))
        .count();
    let overlap = matched as f64 / query_tokens.len() as f64;

    if overlap < MIN_TOKEN_OVERLAP {
        return None;
    }

    let base = overlap.mul_add(0.35, 0.40);
    let boost = completeness_boost.clamp(0.0, 0.05);
    Some((base + boost).min(OVERLAP_TIER_CAP))
}
