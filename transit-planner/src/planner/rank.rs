//! Journey ranking for planner results.
//!
//! Orders journeys fastest-first and drops near-duplicates. This is a
//! usability filter, not a correctness guarantee: it is lossy and
//! heuristic, and two genuinely different journeys with the same leg count
//! and similar durations will be collapsed into one.

use crate::domain::Journey;

/// Rank journeys by total duration, shortest first.
///
/// The sort is stable, so journeys with equal durations keep the order in
/// which they were constructed.
pub fn rank_journeys(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.sort_by_key(Journey::total_duration_minutes);
    journeys
}

/// Remove near-duplicate journeys from a ranked list.
///
/// A journey is dropped if any journey before it in the list (whether or
/// not that one survived) has the same number of legs and a duration less
/// than `window_minutes` apart. The first of each such run wins.
pub fn deduplicate(journeys: Vec<Journey>, window_minutes: u32) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    let mut seen: Vec<(usize, u32)> = Vec::with_capacity(journeys.len());
    let mut result = Vec::with_capacity(journeys.len());

    for journey in journeys {
        let legs = journey.leg_count();
        let duration = journey.total_duration_minutes();

        let duplicate = seen
            .iter()
            .any(|&(l, d)| l == legs && d.abs_diff(duration) < window_minutes);
        seen.push((legs, duration));

        if !duplicate {
            result.push(journey);
        }
    }

    result
}

/// Rank, deduplicate and truncate to at most `max_results`.
pub fn rank_and_dedup(journeys: Vec<Journey>, window_minutes: u32, max_results: usize) -> Vec<Journey> {
    let mut journeys = deduplicate(rank_journeys(journeys), window_minutes);
    journeys.truncate(max_results);
    journeys
}
