use std::borrow::Borrow;

use super::policy::{classify_honours, grade_mark, weighted_gpa, GradeScale, Honours};
use crate::course::CourseLookup;
use crate::error::EngineResult;
use crate::mark::Mark;

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    pub course_id: String,
    pub course_name: String,
    pub academic_units: u32,
    pub overall_mark: f64,
    pub grade: String,
    pub grade_points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub student_id: String,
    pub rows: Vec<TranscriptRow>,
    pub semester_gpa: f64,
    pub honours: Honours,
}

/// Per-course results, GPA and honours for one student. Rows follow the
/// order of `marks`.
pub fn transcript<M, C>(
    student_id: &str,
    marks: &[M],
    courses: &C,
    scale: &GradeScale,
) -> EngineResult<Transcript>
where
    M: Borrow<Mark>,
    C: CourseLookup + ?Sized,
{
    let mut rows = Vec::with_capacity(marks.len());
    for mark in marks {
        let mark: &Mark = mark.borrow();
        let graded = grade_mark(mark, courses, scale)?;
        rows.push(TranscriptRow {
            course_id: graded.course.id.clone(),
            course_name: graded.course.name.clone(),
            academic_units: graded.course.academic_units,
            overall_mark: graded.overall_mark,
            grade: graded.band.grade.clone(),
            grade_points: graded.band.points,
        });
    }

    let semester_gpa = weighted_gpa(
        student_id,
        rows.iter().map(|r| (r.grade_points, r.academic_units)),
    )?;

    Ok(Transcript {
        student_id: student_id.to_string(),
        rows,
        semester_gpa,
        honours: classify_honours(semester_gpa),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Course;
    use crate::error::EngineError;
    use crate::grading::GradeBand;
    use crate::scheme::{AssessmentScheme, LeafKey, MainComponent, SubComponent};

    fn scale() -> GradeScale {
        GradeScale::new(vec![
            GradeBand::new("A", 80.0, 5.0),
            GradeBand::new("B", 70.0, 4.0),
            GradeBand::new("C", 50.0, 3.0),
            GradeBand::new("F", 0.0, 0.0),
        ])
        .unwrap()
    }

    fn fixture() -> (Vec<Course>, Vec<Mark>) {
        let coursework = AssessmentScheme::new(vec![
            MainComponent::exam(60),
            MainComponent::new(
                "CA",
                40,
                vec![SubComponent::new("Quiz", 30), SubComponent::new("Assignment", 70)],
            ),
        ])
        .unwrap();
        let exam_only = AssessmentScheme::new(vec![MainComponent::exam(100)]).unwrap();

        let mut a = Course::new("CZ2002", "Object Oriented Design", 4);
        a.attach_scheme(coursework.clone()).unwrap();
        let mut b = Course::new("CZ2001", "Algorithms", 3);
        b.attach_scheme(exam_only.clone()).unwrap();

        let marks = vec![
            Mark::record(
                &coursework,
                "U1",
                "CZ2002",
                vec![
                    (LeafKey::main("Exam"), 80.0),
                    (LeafKey::sub("CA", "Quiz"), 90.0),
                    (LeafKey::sub("CA", "Assignment"), 70.0),
                ],
            )
            .unwrap(),
            Mark::record(&exam_only, "U1", "CZ2001", vec![(LeafKey::main("Exam"), 55.0)])
                .unwrap(),
        ];
        (vec![a, b], marks)
    }

    #[test]
    fn test_transcript_rows_and_gpa() {
        let (courses, marks) = fixture();
        let t = transcript("U1", &marks, &courses, &scale()).unwrap();

        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].grade, "B");
        assert!((t.rows[0].overall_mark - 78.4).abs() < 1e-9);
        assert_eq!(t.rows[1].grade, "C");
        // (4.0 * 4 + 3.0 * 3) / 7
        assert!((t.semester_gpa - 25.0 / 7.0).abs() < 1e-9);
        assert_eq!(t.honours, Honours::SecondLower);
    }

    #[test]
    fn test_transcript_gpa_matches_semester_gpa() {
        let (courses, marks) = fixture();
        let t = transcript("U1", &marks, &courses, &scale()).unwrap();
        let gpa = crate::grading::semester_gpa("U1", &marks, &courses, &scale()).unwrap();
        assert_eq!(t.semester_gpa, gpa);
    }

    #[test]
    fn test_transcript_unknown_course() {
        let (_, marks) = fixture();
        let courses: Vec<Course> = Vec::new();
        assert_eq!(
            transcript("U1", &marks, &courses, &scale()).unwrap_err(),
            EngineError::UnknownCourse("CZ2002".to_string())
        );
    }

    #[test]
    fn test_transcript_without_marks() {
        let (courses, _) = fixture();
        let marks: Vec<Mark> = Vec::new();
        assert_eq!(
            transcript("U9", &marks, &courses, &scale()).unwrap_err(),
            EngineError::ZeroAcademicUnits {
                student_id: "U9".to_string()
            }
        );
    }
}
