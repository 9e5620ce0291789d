use super::types::Mark;
use crate::error::EngineResult;
use crate::scheme::{AssessmentScheme, LeafKey, MainComponent};

/// One main component's share of the overall mark.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentContribution {
    pub name: String,
    pub weight: u32,
    /// Component mark on a 0-100 scale.
    pub mark: f64,
    /// `mark * weight / 100`, the points it adds to the overall mark.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkBreakdown {
    pub overall: f64,
    pub components: Vec<ComponentContribution>,
}

/// Mark of one main component on a 0-100 scale: the sub-weighted average of
/// its sub-components, or the raw value when it has none.
pub fn compute_main_component_mark(mark: &Mark, component: &MainComponent) -> EngineResult<f64> {
    if component.is_leaf() {
        return mark
            .main_value(&component.name)
            .ok_or_else(|| mark.missing(component.name.clone()));
    }

    let mut total = 0.0;
    for sub in &component.sub_components {
        let value = mark
            .sub_value(&component.name, &sub.name)
            .ok_or_else(|| mark.missing(LeafKey::sub(&component.name, &sub.name).to_string()))?;
        total += value * f64::from(sub.weight) / 100.0;
    }
    Ok(total)
}

/// Overall course mark on a 0-100 scale. Unrounded.
pub fn compute_overall_mark(mark: &Mark, scheme: &AssessmentScheme) -> EngineResult<f64> {
    let mut total = 0.0;
    for component in scheme.components() {
        total += compute_main_component_mark(mark, component)? * f64::from(component.weight) / 100.0;
    }
    Ok(total)
}

/// Per-component view of `compute_overall_mark`, in scheme order.
pub fn breakdown(mark: &Mark, scheme: &AssessmentScheme) -> EngineResult<MarkBreakdown> {
    let mut overall = 0.0;
    let mut components = Vec::with_capacity(scheme.components().len());
    for component in scheme.components() {
        let value = compute_main_component_mark(mark, component)?;
        let contribution = value * f64::from(component.weight) / 100.0;
        overall += contribution;
        components.push(ComponentContribution {
            name: component.name.clone(),
            weight: component.weight,
            mark: value,
            contribution,
        });
    }
    Ok(MarkBreakdown {
        overall,
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::scheme::SubComponent;

    fn scheme() -> AssessmentScheme {
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

    fn mark(exam: f64, quiz: f64, assignment: f64) -> Mark {
        Mark::record(
            &scheme(),
            "U1",
            "CZ2002",
            vec![
                (LeafKey::main("Exam"), exam),
                (LeafKey::sub("CA", "Quiz"), quiz),
                (LeafKey::sub("CA", "Assignment"), assignment),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_coursework_and_overall() {
        let scheme = scheme();
        let mark = mark(80.0, 90.0, 70.0);

        let ca = compute_main_component_mark(&mark, scheme.component("CA").unwrap()).unwrap();
        assert!((ca - 76.0).abs() < 1e-9);

        let overall = compute_overall_mark(&mark, &scheme).unwrap();
        assert!((overall - 78.4).abs() < 1e-9);
    }

    #[test]
    fn test_leaf_component_is_identity() {
        let scheme = scheme();
        let mark = mark(63.25, 0.0, 0.0);
        let exam = compute_main_component_mark(&mark, scheme.exam().unwrap()).unwrap();
        assert_eq!(exam, 63.25);
    }

    #[test]
    fn test_incomplete_mark_fails_loudly() {
        // a mark recorded under a different scheme is missing the CA leaves here
        let exam_only = AssessmentScheme::new(vec![MainComponent::exam(100)]).unwrap();
        let mark = Mark::record(&exam_only, "U1", "CZ2002", vec![(LeafKey::main("Exam"), 50.0)])
            .unwrap();

        let err = compute_overall_mark(&mark, &scheme()).unwrap_err();
        assert_eq!(
            err,
            EngineError::IncompleteMark {
                course_id: "CZ2002".to_string(),
                student_id: "U1".to_string(),
                component: "CA/Quiz".to_string(),
            }
        );
    }

    #[test]
    fn test_breakdown_sums_to_overall() {
        let scheme = scheme();
        let mark = mark(80.0, 90.0, 70.0);
        let result = breakdown(&mark, &scheme).unwrap();

        assert_eq!(result.components.len(), 2);
        assert_eq!(result.components[0].name, "Exam");
        assert!((result.components[0].contribution - 48.0).abs() < 1e-9);
        assert!((result.components[1].contribution - 30.4).abs() < 1e-9);
        let sum: f64 = result.components.iter().map(|c| c.contribution).sum();
        assert!((sum - result.overall).abs() < 1e-9);
    }

    #[test]
    fn test_no_intermediate_rounding() {
        let scheme = AssessmentScheme::new(vec![MainComponent::new(
            "CA",
            100,
            vec![
                SubComponent::new("A", 33),
                SubComponent::new("B", 33),
                SubComponent::new("C", 34),
            ],
        )])
        .unwrap();
        let mark = Mark::record(
            &scheme,
            "U1",
            "X",
            vec![
                (LeafKey::sub("CA", "A"), 66.7),
                (LeafKey::sub("CA", "B"), 66.7),
                (LeafKey::sub("CA", "C"), 66.6),
            ],
        )
        .unwrap();
        let overall = compute_overall_mark(&mark, &scheme).unwrap();
        let expected = 66.7 * 0.33 + 66.7 * 0.33 + 66.6 * 0.34;
        assert!((overall - expected).abs() < 1e-9);
    }
}
