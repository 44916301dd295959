//! Request payload and bullet domain model.
//!
//! A deck request carries free-text header fields plus one row list per
//! category. Rows come in exactly as the form editor produced them (text +
//! three priority checkboxes + optional link); normalization into
//! `BulletEntry` happens here so the selection pipeline only ever sees clean,
//! trimmed, priority-tagged entries.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Categories and priorities
// ────────────────────────────────────────────────────────────────────────────

/// The four WHAC categories. Enumeration order is fixed and doubles as the
/// tie-break order in the quota allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// "What is it?"
    What,
    /// "How does it work?"
    How,
    /// "Are you sure?" — the only category whose rows carry links.
    Sure,
    /// "Can you do it?"
    Cydi,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::What, Category::How, Category::Sure, Category::Cydi];

    /// Fixed share of the kept total this category may claim.
    pub fn ratio(self) -> f64 {
        match self {
            Category::What => 0.50,
            Category::How => 0.27,
            Category::Sure => 0.15,
            Category::Cydi => 0.08,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::What => "what",
            Category::How => "how",
            Category::Sure => "sure",
            Category::Cydi => "cydi",
        }
    }
}

/// Bullet priority. The numeric weights (0/3/5) match the form labels;
/// ordering is what the selector actually relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    None,
    Medium,
    High,
}

impl Priority {
    pub fn weight(self) -> u8 {
        match self {
            Priority::None => 0,
            Priority::Medium => 3,
            Priority::High => 5,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Form rows
// ────────────────────────────────────────────────────────────────────────────

/// One raw row from the form editor. All fields defaulted so sparse JSON rows
/// deserialize without ceremony.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulletRow {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub high: bool,
    #[serde(default)]
    pub medium: bool,
    #[serde(default)]
    pub none: bool,
    #[serde(default)]
    pub link: Option<String>,
}

impl BulletRow {
    /// Derives the single priority from the three checkboxes.
    /// Precedence: high > medium > none-or-unset.
    pub fn priority(&self) -> Priority {
        if self.high {
            Priority::High
        } else if self.medium {
            Priority::Medium
        } else {
            Priority::None
        }
    }
}

/// A normalized candidate bullet. Never materialized with empty text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletEntry {
    pub text: String,
    pub priority: Priority,
    pub category: Category,
    /// Only meaningful for `Category::Sure`.
    pub link: Option<String>,
    /// Position within the category's materialized rows — the stable sort key
    /// inside a priority tier.
    pub original_index: usize,
}

/// Converts a category's rows into entries: trims text, drops empty rows, and
/// indexes the survivors in input order. Links are trimmed and kept only when
/// non-empty.
pub fn normalize_rows(rows: &[BulletRow], category: Category) -> Vec<BulletEntry> {
    rows.iter()
        .filter_map(|row| {
            let text = row.text.trim();
            if text.is_empty() {
                return None;
            }
            let link = row
                .link
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string);
            Some((text.to_string(), row.priority(), link))
        })
        .enumerate()
        .map(|(original_index, (text, priority, link))| BulletEntry {
            text,
            priority,
            category,
            link,
            original_index,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Deck request
// ────────────────────────────────────────────────────────────────────────────

/// Full build request, one per build click. All fields optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub place: String,
    /// Free-text date; defaults to today when absent.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub hook: String,
    /// Short real-world story for the narrative slide.
    #[serde(default)]
    pub story: String,
    /// One-liner for the team slide, rendered two words per line.
    #[serde(default)]
    pub team_blurb: Option<String>,
    #[serde(default)]
    pub what: Vec<BulletRow>,
    #[serde(default)]
    pub how: Vec<BulletRow>,
    #[serde(default)]
    pub sure: Vec<BulletRow>,
    #[serde(default)]
    pub cydi: Vec<BulletRow>,
    #[serde(default)]
    pub downsides: Vec<BulletRow>,
}

impl DeckRequest {
    pub fn rows_for(&self, category: Category) -> &[BulletRow] {
        match category {
            Category::What => &self.what,
            Category::How => &self.how,
            Category::Sure => &self.sure,
            Category::Cydi => &self.cydi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str, high: bool, medium: bool, none: bool) -> BulletRow {
        BulletRow {
            text: text.to_string(),
            high,
            medium,
            none,
            link: None,
        }
    }

    #[test]
    fn test_priority_precedence_high_wins() {
        // all three checked — high wins
        assert_eq!(row("x", true, true, true).priority(), Priority::High);
        assert_eq!(row("x", false, true, true).priority(), Priority::Medium);
        assert_eq!(row("x", false, false, true).priority(), Priority::None);
        assert_eq!(row("x", false, false, false).priority(), Priority::None);
    }

    #[test]
    fn test_priority_weights_match_form_labels() {
        assert_eq!(Priority::High.weight(), 5);
        assert_eq!(Priority::Medium.weight(), 3);
        assert_eq!(Priority::None.weight(), 0);
    }

    #[test]
    fn test_normalize_drops_empty_text_rows() {
        let rows = vec![row("", true, false, false), row("  ", true, false, false), row("keep", true, false, false)];
        let entries = normalize_rows(&rows, Category::What);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "keep");
        assert_eq!(entries[0].original_index, 0, "index counts materialized rows only");
    }

    #[test]
    fn test_normalize_indexes_in_input_order() {
        let rows = vec![
            row("a", true, false, false),
            row("b", false, true, false),
            row("c", false, false, false),
        ];
        let entries = normalize_rows(&rows, Category::How);
        let indices: Vec<usize> = entries.iter().map(|e| e.original_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        // zero-priority rows ARE materialized; the pool filter drops them later
        assert_eq!(entries[2].priority, Priority::None);
    }

    #[test]
    fn test_normalize_trims_links_and_drops_blank_ones() {
        let rows = vec![
            BulletRow {
                text: "source".to_string(),
                high: true,
                link: Some("  https://example.com  ".to_string()),
                ..BulletRow::default()
            },
            BulletRow {
                text: "no link".to_string(),
                medium: true,
                link: Some("   ".to_string()),
                ..BulletRow::default()
            },
        ];
        let entries = normalize_rows(&rows, Category::Sure);
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com"));
        assert_eq!(entries[1].link, None);
    }

    #[test]
    fn test_category_ratios_sum_to_one() {
        let sum: f64 = Category::ALL.iter().map(|c| c.ratio()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sparse_request_deserializes() {
        let req: DeckRequest = serde_json::from_str(r#"{"title":"Uber for cats"}"#).unwrap();
        assert_eq!(req.title, "Uber for cats");
        assert!(req.what.is_empty());
        assert!(req.date.is_none());
    }
}
