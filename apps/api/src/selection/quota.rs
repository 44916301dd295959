//! Quota Allocator — largest-remainder (Hamilton) apportionment of the kept
//! total across the four categories.
//!
//! Caps are non-negative integers that sum exactly to the requested total, and
//! each cap differs from the ideal proportional share by less than one unit.

use std::collections::BTreeMap;

use crate::models::deck::Category;

/// Per-category bullet caps for one build.
pub type CategoryQuota = BTreeMap<Category, usize>;

/// Apportions `total` units across the categories by their fixed ratios.
///
/// 1. `raw = total × ratio`, floored per category.
/// 2. The rounding remainder (`total − Σ floor`) is handed out one unit at a
///    time in descending fractional-part order; ties fall back to the fixed
///    `Category` enumeration order.
pub fn allocate_quota(total: usize) -> CategoryQuota {
    let mut caps: CategoryQuota = CategoryQuota::new();
    let mut fractions: Vec<(f64, Category)> = Vec::with_capacity(Category::ALL.len());
    let mut allocated = 0usize;

    for category in Category::ALL {
        let raw = total as f64 * category.ratio();
        let floor = raw.floor() as usize;
        caps.insert(category, floor);
        allocated += floor;
        fractions.push((raw - floor as f64, category));
    }

    // Descending fractional part; Category's Ord breaks exact ties.
    fractions.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));

    let remainder = total - allocated;
    for i in 0..remainder {
        let (_, category) = fractions[i % fractions.len()];
        *caps.entry(category).or_insert(0) += 1;
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_sum(caps: &CategoryQuota) -> usize {
        caps.values().sum()
    }

    #[test]
    fn test_caps_sum_exactly_to_total() {
        for total in 0..=60 {
            let caps = allocate_quota(total);
            assert_eq!(caps_sum(&caps), total, "drift at total={total}");
        }
    }

    #[test]
    fn test_each_cap_within_one_of_ideal_share() {
        for total in 0..=60 {
            let caps = allocate_quota(total);
            for category in Category::ALL {
                let ideal = total as f64 * category.ratio();
                let cap = caps[&category] as f64;
                assert!(
                    cap == ideal.floor() || cap == ideal.floor() + 1.0,
                    "total={total} {category:?}: cap {cap} vs ideal {ideal}"
                );
            }
        }
    }

    #[test]
    fn test_zero_total_gives_all_zero_caps() {
        let caps = allocate_quota(0);
        assert!(caps.values().all(|&c| c == 0));
    }

    #[test]
    fn test_kept_total_eleven_distribution() {
        // raw shares: what 5.50, how 2.97, sure 1.65, cydi 0.88
        // floors 5+2+1+0 = 8, remainder 3 → how (.97), cydi (.88), sure (.65)
        let caps = allocate_quota(11);
        assert_eq!(caps[&Category::What], 5);
        assert_eq!(caps[&Category::How], 3);
        assert_eq!(caps[&Category::Sure], 2);
        assert_eq!(caps[&Category::Cydi], 1);
    }

    #[test]
    fn test_kept_total_one_goes_to_largest_fraction() {
        // raw: what 0.50, how 0.27, sure 0.15, cydi 0.08 → the single unit
        // lands on What (largest fractional part)
        let caps = allocate_quota(1);
        assert_eq!(caps[&Category::What], 1);
        assert_eq!(caps_sum(&caps), 1);
    }

    #[test]
    fn test_exact_shares_need_no_remainder() {
        // 100 × ratios are all whole numbers
        let caps = allocate_quota(100);
        assert_eq!(caps[&Category::What], 50);
        assert_eq!(caps[&Category::How], 27);
        assert_eq!(caps[&Category::Sure], 15);
        assert_eq!(caps[&Category::Cydi], 8);
    }
}
