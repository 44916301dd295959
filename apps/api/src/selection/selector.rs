//! Bullet Selector — fills each category's cap from its priority tiers.
//!
//! High-priority entries go first, in original input order; if the cap is not
//! exhausted, medium-priority entries fill the remainder, also in input order.
//! A category with fewer entries than its cap is simply under-filled — the
//! shortfall is never redistributed to other categories.

use std::collections::BTreeMap;

use crate::models::deck::{BulletEntry, Category, Priority};
use crate::selection::quota::CategoryQuota;

/// The selected subset, per category, in render order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub by_category: BTreeMap<Category, Vec<BulletEntry>>,
}

impl Selection {
    pub fn entries(&self, category: Category) -> &[BulletEntry] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn texts(&self, category: Category) -> Vec<String> {
        self.entries(category).iter().map(|e| e.text.clone()).collect()
    }

    pub fn selected_count(&self, category: Category) -> usize {
        self.entries(category).len()
    }
}

/// Selects up to `caps[category]` entries per category from the pool.
///
/// The pool is expected to be pre-filtered to priority > None; zero-priority
/// entries that do slip through are ignored here as well.
pub fn select_bullets(pool: &[BulletEntry], caps: &CategoryQuota) -> Selection {
    let mut selection = Selection::default();

    for category in Category::ALL {
        let cap = caps.get(&category).copied().unwrap_or(0);

        let mut highs: Vec<&BulletEntry> = Vec::new();
        let mut mediums: Vec<&BulletEntry> = Vec::new();
        for entry in pool.iter().filter(|e| e.category == category) {
            match entry.priority {
                Priority::High => highs.push(entry),
                Priority::Medium => mediums.push(entry),
                Priority::None => {}
            }
        }
        // Input order is the only order inside a tier.
        highs.sort_by_key(|e| e.original_index);
        mediums.sort_by_key(|e| e.original_index);

        let mut taken: Vec<BulletEntry> = highs.into_iter().take(cap).cloned().collect();
        if taken.len() < cap {
            let need = cap - taken.len();
            taken.extend(mediums.into_iter().take(need).cloned());
        }

        selection.by_category.insert(category, taken);
    }

    selection
}
