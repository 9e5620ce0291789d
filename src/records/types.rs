use serde::{Deserialize, Serialize};

use crate::course::{Course, CourseLookup, MarkStore, Student};
use crate::error::{EngineError, EngineResult};
use crate::mark::Mark;

/// Everything the records file holds, loaded into memory at once and
/// passed to the engine explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Records {
    pub version: u32,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub marks: Vec<Mark>,
}

impl Default for Records {
    fn default() -> Self {
        Self::new()
    }
}

impl Records {
    /// Create a new empty record set with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            students: Vec::new(),
            courses: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Find a student by id
    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    pub fn course_mut(&mut self, course_id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == course_id)
    }

    /// Add a course. Returns false if the id is taken.
    pub fn add_course(&mut self, course: Course) -> bool {
        if self.course(&course.id).is_some() {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Add a student. Returns false if the id is taken.
    pub fn add_student(&mut self, student: Student) -> bool {
        if self.student(&student.id).is_some() {
            return false;
        }
        self.students.push(student);
        true
    }

    /// Store a mark, replacing any earlier mark for the same student and
    /// course. Returns the replaced mark.
    pub fn put_mark(&mut self, mark: Mark) -> Option<Mark> {
        let existing = self
            .marks
            .iter()
            .position(|m| m.student_id() == mark.student_id() && m.course_id() == mark.course_id());
        match existing {
            Some(i) => Some(std::mem::replace(&mut self.marks[i], mark)),
            None => {
                self.marks.push(mark);
                None
            }
        }
    }

    /// Check every mark against its course's scheme: the course exists, has
    /// a scheme, and the mark scores each leaf once within 0-100.
    pub fn check_marks(&self) -> EngineResult<()> {
        for mark in &self.marks {
            let course = self
                .course(mark.course_id())
                .ok_or_else(|| EngineError::UnknownCourse(mark.course_id().to_string()))?;
            mark.check(course.require_scheme()?)?;
        }
        Ok(())
    }

    /// The stored mark for one student in one course
    pub fn mark_for(&self, student_id: &str, course_id: &str) -> Option<&Mark> {
        self.marks
            .iter()
            .find(|m| m.student_id() == student_id && m.course_id() == course_id)
    }
}

impl CourseLookup for Records {
    fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.course(course_id)
    }
}

impl MarkStore for Records {
    fn marks_for_course(&self, course_id: &str) -> Vec<&Mark> {
        self.marks
            .iter()
            .filter(|m| m.course_id() == course_id)
            .collect()
    }

    fn marks_for_student(&self, student_id: &str) -> Vec<&Mark> {
        self.marks
            .iter()
            .filter(|m| m.student_id() == student_id)
            .collect()
    }
}
