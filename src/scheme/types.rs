use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::validate_scheme;
use crate::error::SchemeViolation;

/// Reserved name of the final exam component.
pub const EXAM: &str = "Exam";

/// A graded component nested under a main component.
/// `weight` is a percentage of the parent's share.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SubComponent {
    pub name: String,
    pub weight: u32,
}

impl SubComponent {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// A top-level graded component, weighted as a percentage of the course mark.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MainComponent {
    pub name: String,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_components: Vec<SubComponent>,
}

impl MainComponent {
    pub fn new(name: impl Into<String>, weight: u32, sub_components: Vec<SubComponent>) -> Self {
        Self {
            name: name.into(),
            weight,
            sub_components,
        }
    }

    pub fn exam(weight: u32) -> Self {
        Self::new(EXAM, weight, Vec::new())
    }

    pub fn is_exam(&self) -> bool {
        self.name == EXAM
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_components.is_empty()
    }

    pub fn sub_component(&self, name: &str) -> Option<&SubComponent> {
        self.sub_components.iter().find(|s| s.name == name)
    }
}

/// Address of a single scored leaf: a main component without sub-components,
/// or one sub-component of a main component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafKey {
    pub main: String,
    pub sub: Option<String>,
}

impl LeafKey {
    pub fn main(main: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            sub: None,
        }
    }

    pub fn sub(main: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            main: main.into(),
            sub: Some(sub.into()),
        }
    }

    /// Parse `"Main"` or `"Main/Sub"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.split_once('/') {
            Some((main, sub)) => {
                let (main, sub) = (main.trim(), sub.trim());
                if main.is_empty() || sub.is_empty() {
                    None
                } else {
                    Some(Self::sub(main, sub))
                }
            }
            None => Some(Self::main(s)),
        }
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{}/{}", self.main, sub),
            None => write!(f, "{}", self.main),
        }
    }
}

/// Result of resolving a component name across both tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentRef<'a> {
    Sub {
        parent: &'a MainComponent,
        sub: &'a SubComponent,
    },
    Main(&'a MainComponent),
}

/// Validated, immutable weighting hierarchy of one course.
///
/// Main weights sum to 100 and every non-empty sub-component list sums to
/// 100. Deserialization re-runs the same validation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "Vec<MainComponent>", into = "Vec<MainComponent>")]
pub struct AssessmentScheme {
    components: Vec<MainComponent>,
}

impl AssessmentScheme {
    pub fn new(components: Vec<MainComponent>) -> Result<Self, SchemeViolation> {
        validate_scheme(&components)?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[MainComponent] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&MainComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn exam(&self) -> Option<&MainComponent> {
        self.components.iter().find(|c| c.is_exam())
    }

    /// Every scored leaf in scheme order.
    pub fn leaves(&self) -> impl Iterator<Item = LeafKey> + '_ {
        self.components.iter().flat_map(|main| {
            let subs: Vec<LeafKey> = if main.is_leaf() {
                vec![LeafKey::main(main.name.clone())]
            } else {
                main.sub_components
                    .iter()
                    .map(|s| LeafKey::sub(main.name.clone(), s.name.clone()))
                    .collect()
            };
            subs.into_iter()
        })
    }

    pub fn has_leaf(&self, key: &LeafKey) -> bool {
        let Some(main) = self.component(&key.main) else {
            return false;
        };
        match &key.sub {
            Some(sub) => main.sub_component(sub).is_some(),
            None => main.is_leaf(),
        }
    }

    /// Look a name up across both tiers.
    ///
    /// Sub-components are searched first, across main components in scheme
    /// order; main components are consulted only when no sub-component has
    /// that name. Sub and main names may collide, so this order is part of
    /// the contract.
    pub fn resolve(&self, name: &str) -> Option<ComponentRef<'_>> {
        for parent in &self.components {
            if let Some(sub) = parent.sub_component(name) {
                return Some(ComponentRef::Sub { parent, sub });
            }
        }
        self.component(name).map(ComponentRef::Main)
    }

    /// Main components for presentation: stored order, with the exam moved
    /// to the end.
    pub fn reporting_order(&self) -> Vec<&MainComponent> {
        let (exam, rest): (Vec<&MainComponent>, Vec<&MainComponent>) =
            self.components.iter().partition(|c| c.is_exam());
        rest.into_iter().chain(exam).collect()
    }
}

impl TryFrom<Vec<MainComponent>> for AssessmentScheme {
    type Error = SchemeViolation;

    fn try_from(components: Vec<MainComponent>) -> Result<Self, Self::Error> {
        Self::new(components)
    }
}

impl From<AssessmentScheme> for Vec<MainComponent> {
    fn from(scheme: AssessmentScheme) -> Self {
        scheme.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scheme() -> AssessmentScheme {
        AssessmentScheme::new(vec![
            MainComponent::exam(60),
            MainComponent::new(
                "CA",
                40,
                vec![SubComponent::new("Quiz", 30), SubComponent::new("Assignment", 70)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_leaves_in_scheme_order() {
        let leaves: Vec<LeafKey> = sample_scheme().leaves().collect();
        assert_eq!(
            leaves,
            vec![
                LeafKey::main("Exam"),
                LeafKey::sub("CA", "Quiz"),
                LeafKey::sub("CA", "Assignment"),
            ]
        );
    }

    #[test]
    fn test_has_leaf_rejects_parent_with_subs() {
        let scheme = sample_scheme();
        assert!(scheme.has_leaf(&LeafKey::sub("CA", "Quiz")));
        assert!(!scheme.has_leaf(&LeafKey::main("CA")));
        assert!(!scheme.has_leaf(&LeafKey::sub("Exam", "Quiz")));
    }

    #[test]
    fn test_reporting_order_defers_exam() {
        let scheme = sample_scheme();
        let names: Vec<&str> = scheme
            .reporting_order()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["CA", "Exam"]);
    }

    #[test]
    fn test_resolve_prefers_sub_tier() {
        let scheme = AssessmentScheme::new(vec![
            MainComponent::new("Lab", 50, vec![]),
            MainComponent::new(
                "Project",
                50,
                vec![SubComponent::new("Lab", 40), SubComponent::new("Report", 60)],
            ),
        ])
        .unwrap();

        match scheme.resolve("Lab") {
            Some(ComponentRef::Sub { parent, sub }) => {
                assert_eq!(parent.name, "Project");
                assert_eq!(sub.weight, 40);
            }
            other => panic!("expected sub-component, got {:?}", other),
        }
        assert!(matches!(scheme.resolve("Project"), Some(ComponentRef::Main(_))));
        assert!(scheme.resolve("Missing").is_none());
    }

    #[test]
    fn test_parse_leaf_key() {
        assert_eq!(LeafKey::parse("Exam"), Some(LeafKey::main("Exam")));
        assert_eq!(LeafKey::parse(" CA / Quiz "), Some(LeafKey::sub("CA", "Quiz")));
        assert_eq!(LeafKey::parse("CA/"), None);
        assert_eq!(LeafKey::parse(""), None);
        assert_eq!(LeafKey::sub("CA", "Quiz").to_string(), "CA/Quiz");
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let ok = r#"[{"name":"Exam","weight":100}]"#;
        let scheme: AssessmentScheme = serde_json::from_str(ok).unwrap();
        assert_eq!(scheme.components().len(), 1);

        let bad = r#"[{"name":"Exam","weight":90}]"#;
        assert!(serde_json::from_str::<AssessmentScheme>(bad).is_err());
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let scheme = sample_scheme();
        let json = serde_json::to_string(&scheme).unwrap();
        let parsed: AssessmentScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(scheme, parsed);
    }
}
