use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::mark::Mark;
use crate::scheme::AssessmentScheme;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Academic units, the GPA weight of this course.
    pub academic_units: u32,
    #[serde(default)]
    scheme: Option<AssessmentScheme>,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>, academic_units: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            academic_units,
            scheme: None,
        }
    }

    /// The attached scheme, if one has been built
    pub fn scheme(&self) -> Option<&AssessmentScheme> {
        self.scheme.as_ref()
    }

    /// The scheme, or `MissingScheme` if none has been built yet.
    pub fn require_scheme(&self) -> EngineResult<&AssessmentScheme> {
        self.scheme.as_ref().ok_or_else(|| EngineError::MissingScheme {
            course_id: self.id.clone(),
        })
    }

    /// Whether a scheme is attached
    pub fn has_scheme(&self) -> bool {
        self.scheme.is_some()
    }

    /// Attach a scheme once. A course that already has one keeps it.
    pub fn attach_scheme(&mut self, scheme: AssessmentScheme) -> EngineResult<()> {
        if self.scheme.is_some() {
            return Err(EngineError::SchemeAlreadySet {
                course_id: self.id.clone(),
            });
        }
        self.scheme = Some(scheme);
        Ok(())
    }
}

/// Course lookup provided by the records collaborator.
pub trait CourseLookup {
    fn course(&self, course_id: &str) -> Option<&Course>;
}

/// Mark lookup provided by the records collaborator.
pub trait MarkStore {
    fn marks_for_course(&self, course_id: &str) -> Vec<&Mark>;
    fn marks_for_student(&self, student_id: &str) -> Vec<&Mark>;
}

impl CourseLookup for [Course] {
    fn course(&self, course_id: &str) -> Option<&Course> {
        self.iter().find(|c| c.id == course_id)
    }
}

impl CourseLookup for Vec<Course> {
    fn course(&self, course_id: &str) -> Option<&Course> {
        self.as_slice().course(course_id)
    }
}
