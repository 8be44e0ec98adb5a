// src/services/ranking.rs
use crate::models::{Profile, RankedProfile};
use std::cmp::Ordering;

/// Orders profiles by views, then by upload time, both descending, and
/// numbers them from 1. Uses a stable sort, so profiles with equal
/// `(views, uploaded_at)` keep their relative input order.
pub fn rank(profiles: &[Profile]) -> Vec<RankedProfile> {
    let mut ordered: Vec<&Profile> = profiles.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, profile)| RankedProfile {
            profile: profile.clone(),
            rank: index + 1,
        })
        .collect()
}

/// The top `limit` entries of [`rank`].
pub fn leaderboard(profiles: &[Profile], limit: usize) -> Vec<RankedProfile> {
    let mut ranked = rank(profiles);
    ranked.truncate(limit);
    ranked
}

fn compare(a: &Profile, b: &Profile) -> Ordering {
    b.views
        .cmp(&a.views)
        .then_with(|| b.uploaded_at.cmp(&a.uploaded_at))
}
