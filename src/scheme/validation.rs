use std::collections::HashSet;

use super::types::{MainComponent, SubComponent};
use crate::error::SchemeViolation;

/// Check a sub-component list on its own: names present and unique within
/// the parent, weights summing to 100. An empty list is valid.
pub fn validate_sub_components(
    parent: &str,
    subs: &[SubComponent],
) -> Result<(), SchemeViolation> {
    if subs.is_empty() {
        return Ok(());
    }

    let mut seen = HashSet::new();
    for sub in subs {
        let name = sub.name.trim();
        if name.is_empty() {
            return Err(SchemeViolation::EmptyName);
        }
        if !seen.insert(name) {
            return Err(SchemeViolation::DuplicateName(format!("{}/{}", parent, name)));
        }
    }

    let total: u64 = subs.iter().map(|s| u64::from(s.weight)).sum();
    if total != 100 {
        return Err(SchemeViolation::SubWeightTotal {
            component: parent.to_string(),
            total,
        });
    }
    Ok(())
}

/// Check a full component list against both weighting invariants.
pub fn validate_scheme(components: &[MainComponent]) -> Result<(), SchemeViolation> {
    let mut seen = HashSet::new();
    for main in components {
        let name = main.name.trim();
        if name.is_empty() {
            return Err(SchemeViolation::EmptyName);
        }
        if !seen.insert(name) {
            return Err(SchemeViolation::DuplicateName(name.to_string()));
        }
        if main.is_exam() && !main.is_leaf() {
            return Err(SchemeViolation::ExamWithSubComponents);
        }
        validate_sub_components(&main.name, &main.sub_components)?;
    }

    let total: u64 = components.iter().map(|c| u64::from(c.weight)).sum();
    if total != 100 {
        return Err(SchemeViolation::MainWeightTotal { total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ca(subs: Vec<SubComponent>) -> MainComponent {
        MainComponent::new("CA", 40, subs)
    }

    #[test]
    fn test_valid_scheme() {
        let components = vec![
            MainComponent::exam(60),
            ca(vec![SubComponent::new("Quiz", 30), SubComponent::new("Assignment", 70)]),
        ];
        assert!(validate_scheme(&components).is_ok());
    }

    #[test]
    fn test_main_weights_must_total_100() {
        let components = vec![MainComponent::exam(60), ca(vec![])];
        let components = [components, vec![MainComponent::new("Lab", 5, vec![])]].concat();
        assert_eq!(
            validate_scheme(&components),
            Err(SchemeViolation::MainWeightTotal { total: 105 })
        );
    }

    #[test]
    fn test_sub_weights_are_share_of_parent() {
        // 30 + 60 of the parent's share, not of the course total
        let components = vec![
            MainComponent::exam(60),
            ca(vec![SubComponent::new("Quiz", 30), SubComponent::new("Assignment", 60)]),
        ];
        assert_eq!(
            validate_scheme(&components),
            Err(SchemeViolation::SubWeightTotal {
                component: "CA".to_string(),
                total: 90
            })
        );
    }

    #[test]
    fn test_duplicate_main_name() {
        let components = vec![
            MainComponent::new("CA", 50, vec![]),
            MainComponent::new("CA", 50, vec![]),
        ];
        assert_eq!(
            validate_scheme(&components),
            Err(SchemeViolation::DuplicateName("CA".to_string()))
        );
    }

    #[test]
    fn test_sub_names_unique_only_within_parent() {
        let components = vec![
            MainComponent::new(
                "Lab",
                50,
                vec![SubComponent::new("Report", 50), SubComponent::new("Demo", 50)],
            ),
            MainComponent::new(
                "Project",
                50,
                vec![SubComponent::new("Report", 100)],
            ),
        ];
        assert!(validate_scheme(&components).is_ok());

        let dup = vec![SubComponent::new("Report", 50), SubComponent::new("Report", 50)];
        assert_eq!(
            validate_sub_components("Lab", &dup),
            Err(SchemeViolation::DuplicateName("Lab/Report".to_string()))
        );
    }

    #[test]
    fn test_exam_cannot_have_sub_components() {
        let components = vec![MainComponent::new(
            "Exam",
            100,
            vec![SubComponent::new("Paper 1", 100)],
        )];
        assert_eq!(
            validate_scheme(&components),
            Err(SchemeViolation::ExamWithSubComponents)
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let components = vec![MainComponent::new("  ", 100, vec![])];
        assert_eq!(validate_scheme(&components), Err(SchemeViolation::EmptyName));
    }

    #[test]
    fn test_empty_scheme_rejected() {
        assert_eq!(
            validate_scheme(&[]),
            Err(SchemeViolation::MainWeightTotal { total: 0 })
        );
    }
    #[test]
    fn test_sub_weights_near_u32_limit_do_not_wrap() {
        let subs = vec![SubComponent::new("A", u32::MAX), SubComponent::new("B", 101)];
        assert_eq!(
            validate_sub_components("CA", &subs),
            Err(SchemeViolation::SubWeightTotal {
                component: "CA".to_string(),
                total: u64::from(u32::MAX) + 101
            })
        );
    }

    #[test]
    fn test_main_weights_near_u32_limit_do_not_wrap() {
        let components = vec![
            MainComponent::new("A", u32::MAX, vec![]),
            MainComponent::new("B", 101, vec![]),
        ];
        assert_eq!(
            validate_scheme(&components),
            Err(SchemeViolation::MainWeightTotal {
                total: u64::from(u32::MAX) + 101
            })
        );
    }

    #[test]
    fn test_deserialized_scheme_with_huge_weights_rejected() {
        let json = r#"[{"name": "A", "weight": 4294967295}, {"name": "B", "weight": 101}]"#;
        assert!(serde_json::from_str::<crate::scheme::AssessmentScheme>(json).is_err());
    }
}
