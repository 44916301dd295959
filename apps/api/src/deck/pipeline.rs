//! Build pipeline — one deterministic pass from a raw form request to a
//! render-ready `DeckPlan`.
//!
//! Steps: flatten rows into a pool → drop zero-priority entries → compute the
//! kept total (half the pool, floored at 1) → apportion per-category caps →
//! tiered selection → derive the slide-facing lists. No step retries or
//! recovers; everything here is total.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::deck::{normalize_rows, BulletEntry, Category, DeckRequest};
use crate::selection::quota::{allocate_quota, CategoryQuota};
use crate::selection::selector::{select_bullets, Selection};

/// Fraction of the filtered pool that survives selection.
pub const KEEP_FRACTION: f64 = 0.50;

/// At most this many downsides make the slide.
pub const DOWNSIDES_CAP: usize = 3;

/// Shown on the downsides slide when the user supplied none.
pub const DOWNSIDES_FALLBACK: &str =
    "The cost of plasma-based fertilizers compared to synthetic fertilizers.";

/// Default blurb for the team slide.
pub const TEAM_BLURB_FALLBACK: &str = "Diverse, resourceful, motivated team, \
battle-hardened by 31 years of combined entrepreneurial experience.";

/// How many WHAT bullets the headline slide shows.
const WHAT_HEADLINE_COUNT: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Selection accounting, surfaced by the plan-preview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionStats {
    pub pool_size: usize,
    pub kept_total: usize,
    pub caps: Vec<(Category, usize)>,
    pub selected: Vec<(Category, usize)>,
}

/// Everything the deck assembler needs, already selected and ordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckPlan {
    pub title: String,
    pub author: String,
    pub place: String,
    pub date: String,
    pub hook: String,
    pub story: String,
    pub team_blurb: String,
    /// Top WHAT bullets for the headline slide.
    pub what_top3: Vec<String>,
    /// Remaining WHAT selection (computed for parity; no slide consumes it yet).
    pub what_rest: Vec<String>,
    pub how: Vec<String>,
    pub downsides: Vec<String>,
    pub sure_texts: Vec<String>,
    /// Deduplicated link URLs from the SURE selection, first-seen order.
    pub sure_links: Vec<String>,
    pub cydi: Vec<String>,
    pub stats: SelectionStats,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full selection pipeline on a request snapshot.
pub fn build_plan(request: &DeckRequest) -> DeckPlan {
    let pool = build_pool(request);
    let kept_total = kept_total(pool.len());
    let caps = allocate_quota(kept_total);
    let selection = select_bullets(&pool, &caps);

    debug!(
        pool = pool.len(),
        kept = kept_total,
        "selection pipeline complete"
    );

    derive_plan(request, &pool, kept_total, &caps, &selection)
}

/// Flattens all four categories into the filtered pool: non-empty text,
/// priority above None, original per-category indices attached.
pub fn build_pool(request: &DeckRequest) -> Vec<BulletEntry> {
    Category::ALL
        .into_iter()
        .flat_map(|category| normalize_rows(request.rows_for(category), category))
        .filter(|entry| entry.priority.weight() > 0)
        .collect()
}

/// Half the pool, rounded half-away-from-zero, floored at 1.
///
/// An odd pool size rounds up (e.g. 7 → 4). The floor guarantees the rest of
/// the pipeline always works with a positive total, even on an empty pool.
pub fn kept_total(pool_size: usize) -> usize {
    ((pool_size as f64 * KEEP_FRACTION).round() as usize).max(1)
}

fn derive_plan(
    request: &DeckRequest,
    pool: &[BulletEntry],
    kept: usize,
    caps: &CategoryQuota,
    selection: &Selection,
) -> DeckPlan {
    let what = selection.texts(Category::What);
    let (what_top3, what_rest) = split_headline(&what);

    let sure_entries = selection.entries(Category::Sure);
    let sure_texts: Vec<String> = sure_entries.iter().map(|e| e.text.clone()).collect();
    let sure_links = dedup_links(sure_entries);

    let mut downsides: Vec<String> = request
        .downsides
        .iter()
        .map(|row| row.text.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(DOWNSIDES_CAP)
        .collect();
    if downsides.is_empty() {
        downsides.push(DOWNSIDES_FALLBACK.to_string());
    }

    let stats = SelectionStats {
        pool_size: pool.len(),
        kept_total: kept,
        caps: Category::ALL
            .into_iter()
            .map(|c| (c, caps.get(&c).copied().unwrap_or(0)))
            .collect(),
        selected: Category::ALL
            .into_iter()
            .map(|c| (c, selection.selected_count(c)))
            .collect(),
    };

    DeckPlan {
        title: request.title.trim().to_string(),
        author: request.author.trim().to_string(),
        place: request.place.trim().to_string(),
        date: request
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().date_naive().to_string()),
        hook: request.hook.trim().to_string(),
        story: request.story.trim().to_string(),
        team_blurb: request
            .team_blurb
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| TEAM_BLURB_FALLBACK.to_string()),
        what_top3,
        what_rest,
        how: selection.texts(Category::How),
        downsides,
        sure_texts,
        sure_links,
        cydi: selection.texts(Category::Cydi),
        stats,
    }
}

fn split_headline(what: &[String]) -> (Vec<String>, Vec<String>) {
    let top = what.iter().take(WHAT_HEADLINE_COUNT).cloned().collect();
    let rest = what.iter().skip(WHAT_HEADLINE_COUNT).cloned().collect();
    (top, rest)
}

/// First-seen, exact-string deduplication of the SURE selection's links.
fn dedup_links(entries: &[BulletEntry]) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for entry in entries {
        if let Some(link) = entry.link.as_deref() {
            if !link.is_empty() && !links.iter().any(|l| l == link) {
                links.push(link.to_string());
            }
        }
    }
    links
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deck::BulletRow;

    fn high(text: &str) -> BulletRow {
        BulletRow {
            text: text.to_string(),
            high: true,
            ..BulletRow::default()
        }
    }

    fn medium(text: &str) -> BulletRow {
        BulletRow {
            text: text.to_string(),
            medium: true,
            ..BulletRow::default()
        }
    }

    fn linked(text: &str, link: &str) -> BulletRow {
        BulletRow {
            text: text.to_string(),
            high: true,
            link: Some(link.to_string()),
            ..BulletRow::default()
        }
    }

    /// The reference scenario: 10 WHAT (6 high, 4 medium), 6 HOW, 4 SURE,
    /// 2 CYDI, all priority > 0 → pool 22, kept 11, caps {5, 3, 2, 1}.
    fn reference_request() -> DeckRequest {
        DeckRequest {
            what: (0..6)
                .map(|i| high(&format!("what high {i}")))
                .chain((0..4).map(|i| medium(&format!("what med {i}"))))
                .collect(),
            how: (0..6).map(|i| high(&format!("how {i}"))).collect(),
            sure: (0..4).map(|i| high(&format!("sure {i}"))).collect(),
            cydi: (0..2).map(|i| high(&format!("cydi {i}"))).collect(),
            ..DeckRequest::default()
        }
    }

    #[test]
    fn test_kept_total_rounding_pinned_half_up() {
        assert_eq!(kept_total(0), 1, "empty pool floors at 1");
        assert_eq!(kept_total(1), 1);
        assert_eq!(kept_total(7), 4, "odd pool rounds up");
        assert_eq!(kept_total(22), 11);
    }

    #[test]
    fn test_reference_scenario_caps_and_selection() {
        let plan = build_plan(&reference_request());
        assert_eq!(plan.stats.pool_size, 22);
        assert_eq!(plan.stats.kept_total, 11);

        let caps: Vec<usize> = plan.stats.caps.iter().map(|(_, c)| *c).collect();
        assert_eq!(caps, vec![5, 3, 2, 1]);

        // WHAT cap of 5 is filled entirely from the 6 highs
        assert_eq!(plan.what_top3.len(), 3);
        assert_eq!(plan.what_rest.len(), 2);
        assert!(plan
            .what_top3
            .iter()
            .chain(plan.what_rest.iter())
            .all(|t| t.starts_with("what high")));
        assert_eq!(plan.how.len(), 3);
        assert_eq!(plan.sure_texts.len(), 2);
        assert_eq!(plan.cydi.len(), 1);
    }

    #[test]
    fn test_empty_request_builds_without_error() {
        let plan = build_plan(&DeckRequest::default());
        assert_eq!(plan.stats.pool_size, 0);
        assert_eq!(plan.stats.kept_total, 1);
        let total_selected: usize = plan.stats.selected.iter().map(|(_, n)| n).sum();
        assert!(total_selected <= 1);
        assert_eq!(plan.downsides, vec![DOWNSIDES_FALLBACK.to_string()]);
        assert!(!plan.date.is_empty(), "date defaults to today");
    }

    #[test]
    fn test_zero_priority_rows_excluded_from_pool() {
        let request = DeckRequest {
            what: vec![
                high("kept"),
                BulletRow {
                    text: "dropped".to_string(),
                    none: true,
                    ..BulletRow::default()
                },
            ],
            ..DeckRequest::default()
        };
        let pool = build_pool(&request);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].text, "kept");
    }

    #[test]
    fn test_sure_links_deduplicated_first_seen() {
        let request = DeckRequest {
            // enough SURE rows to give the category a real cap
            what: (0..4).map(|i| high(&format!("w{i}"))).collect(),
            sure: vec![
                linked("a", "https://x.test"),
                linked("b", "https://y.test"),
                linked("c", "https://x.test"),
            ],
            ..DeckRequest::default()
        };
        let pool = build_pool(&request);
        let caps = CategoryQuota::from([
            (Category::What, 0),
            (Category::How, 0),
            (Category::Sure, 3),
            (Category::Cydi, 0),
        ]);
        let selection = select_bullets(&pool, &caps);
        let links = dedup_links(selection.entries(Category::Sure));
        assert_eq!(links, vec!["https://x.test".to_string(), "https://y.test".to_string()]);
    }

    #[test]
    fn test_downsides_capped_at_three() {
        let request = DeckRequest {
            downsides: (0..5).map(|i| medium(&format!("risk {i}"))).collect(),
            ..DeckRequest::default()
        };
        let plan = build_plan(&request);
        assert_eq!(plan.downsides.len(), 3);
        assert_eq!(plan.downsides[0], "risk 0");
    }

    #[test]
    fn test_team_blurb_falls_back_when_missing() {
        let plan = build_plan(&DeckRequest::default());
        assert_eq!(plan.team_blurb, TEAM_BLURB_FALLBACK);

        let custom = DeckRequest {
            team_blurb: Some("Two founders, one mission.".to_string()),
            ..DeckRequest::default()
        };
        assert_eq!(build_plan(&custom).team_blurb, "Two founders, one mission.");
    }
}
