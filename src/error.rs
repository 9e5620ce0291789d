use thiserror::Error;

/// Why a scheme (or a piece of one) was rejected during building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeViolation {
    #[error("main component weights sum to {total}, expected 100")]
    MainWeightTotal { total: u64 },

    #[error("sub-components of '{component}' sum to {total}, expected 100")]
    SubWeightTotal { component: String, total: u64 },

    #[error("weights allocated {allocated} of a {budget} budget; re-enter all components")]
    BudgetMismatch { budget: u32, allocated: u32 },

    #[error("weight {weight} exceeds the remaining budget of {remaining}")]
    OverBudget { weight: u32, remaining: u32 },

    #[error("exam weight {0} exceeds 100")]
    ExamWeight(u32),

    #[error("no further components requested but exam only carries {exam_weight}")]
    NothingToAllocate { exam_weight: u32 },

    #[error("component name must not be empty")]
    EmptyName,

    #[error("component '{0}' is already used")]
    DuplicateName(String),

    #[error("exam component must not have sub-components")]
    ExamWithSubComponents,
}

/// Every failure the engine can report. Callers match on the variant; none of
/// them stands in for a numeric default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid assessment scheme: {0}")]
    SchemeValidation(#[from] SchemeViolation),

    #[error("course {course_id} already has an assessment scheme")]
    SchemeAlreadySet { course_id: String },

    #[error("course {course_id} has no assessment scheme")]
    MissingScheme { course_id: String },

    #[error("mark for {student_id} in {course_id} has no score for '{component}'")]
    IncompleteMark {
        course_id: String,
        student_id: String,
        component: String,
    },

    #[error("score {value} for '{component}' is outside 0-100")]
    ScoreOutOfRange { component: String, value: f64 },

    #[error("'{0}' was scored more than once")]
    DuplicateScore(String),

    #[error("no component named '{0}'")]
    UnknownComponent(String),

    #[error("no course with id {0}")]
    UnknownCourse(String),

    #[error("no marks to aggregate")]
    EmptyCohort,

    #[error("student {student_id} has zero total academic units")]
    ZeroAcademicUnits { student_id: String },

    #[error("scheme builder cannot {action} while {state}")]
    InvalidState { action: &'static str, state: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_converts_into_engine_error() {
        let err: EngineError = SchemeViolation::BudgetMismatch {
            budget: 50,
            allocated: 40,
        }
        .into();
        assert!(matches!(
            err,
            EngineError::SchemeValidation(SchemeViolation::BudgetMismatch { .. })
        ));
        assert!(err.to_string().contains("40 of a 50 budget"));
    }

    #[test]
    fn test_incomplete_mark_names_component() {
        let err = EngineError::IncompleteMark {
            course_id: "CZ2002".to_string(),
            student_id: "U1800001A".to_string(),
            component: "CA/Quiz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "mark for U1800001A in CZ2002 has no score for 'CA/Quiz'"
        );
    }
}
