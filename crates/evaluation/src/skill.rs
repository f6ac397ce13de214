//! Canonical skill ordering.
//!
//! Every sorted view lists skills as Soft, then Execution, then Strategy.
//! Sort through [`compare_skill`] or [`sort_by_skill`] instead of matching on
//! the variants at the call site.

use std::cmp::Ordering;

pub use entity::sea_orm_active_enums::SkillType;

/// Skills in display order.
pub const SKILL_ORDER: [SkillType; 3] = [SkillType::Soft, SkillType::Execution, SkillType::Strategy];

/// Position of a skill in [`SKILL_ORDER`].
#[inline]
pub const fn skill_rank(skill: SkillType) -> usize {
    match skill {
        SkillType::Soft => 0,
        SkillType::Execution => 1,
        SkillType::Strategy => 2,
    }
}

/// Comparator for the canonical skill order.
#[inline]
pub fn compare_skill(a: &SkillType, b: &SkillType) -> Ordering { skill_rank(*a).cmp(&skill_rank(*b)) }

/// Stable sort of `items` by the skill returned from `key`.
///
/// Items of the same skill keep their relative order.
pub fn sort_by_skill<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> SkillType,
{
    items.sort_by(|a, b| compare_skill(&key(a), &key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_order() {
        for (index, skill) in SKILL_ORDER.iter().enumerate() {
            assert_eq!(skill_rank(*skill), index);
        }
    }

    #[test]
    fn test_sort_arbitrary_input() {
        let mut skills = vec![SkillType::Strategy, SkillType::Soft, SkillType::Execution];
        skills.sort_by(compare_skill);
        assert_eq!(skills, SKILL_ORDER.to_vec());
    }

    #[test]
    fn test_sort_by_skill_is_stable() {
        let mut items = vec![
            ("s1", SkillType::Strategy),
            ("e1", SkillType::Execution),
            ("s2", SkillType::Strategy),
            ("o1", SkillType::Soft),
        ];
        sort_by_skill(&mut items, |(_, skill)| *skill);
        let labels = items.iter().map(|(label, _)| *label).collect::<Vec<_>>();
        assert_eq!(labels, vec!["o1", "e1", "s1", "s2"]);
    }
}
