//! Trending Aggregator — ranks badges by how many classes for them appear in
//! a bounded sample of the most-viewed events.
//!
//! The count is a popularity proxy within the sample, not a true per-badge
//! tally across the whole table.

use crate::models::event::{EventRow, TrendingBadge};

/// How many of the most-viewed events feed the ranking.
pub const TRENDING_SAMPLE_SIZE: i64 = 20;
/// Maximum number of ranked badges returned.
pub const TRENDING_LIMIT: usize = 6;

/// Groups the view-ranked sample by badge name and returns the top badges by
/// within-sample count.
///
/// Grouping preserves first-seen order, so after the stable descending sort,
/// count ties rank the badge whose events were viewed more first. The eagle
/// flag and subject area come from the badge's first occurrence in the
/// sample.
pub fn rank_trending(rows: &[EventRow]) -> Vec<TrendingBadge> {
    let mut groups: Vec<TrendingBadge> = Vec::new();

    for row in rows {
        match groups.iter_mut().find(|g| g.name == row.badge_name) {
            Some(group) => group.class_count += 1,
            None => groups.push(TrendingBadge {
                name: row.badge_name.clone(),
                class_count: 1,
                is_eagle: row.is_eagle_required,
                subject_area: row.subject_area.clone(),
            }),
        }
    }

    groups.sort_by(|a, b| b.class_count.cmp(&a.class_count));
    groups.truncate(TRENDING_LIMIT);
    groups
}
