use std::borrow::Borrow;
use std::fmt;

use super::config::{GradeBand, GradingConfig};
use super::validation::validate_grade_bands;
use crate::course::{Course, CourseLookup};
use crate::error::{EngineError, EngineResult};
use crate::mark::{compute_overall_mark, Mark};

/// Slack for overall marks that land a rounding error above 100.
const MARK_EPSILON: f64 = 1e-9;

/// Validated band table: the mark-to-grade-point step function.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    /// Sorted by `min_mark`, highest first.
    bands: Vec<GradeBand>,
}

impl GradeScale {
    pub fn new(mut bands: Vec<GradeBand>) -> Result<Self, Vec<String>> {
        validate_grade_bands(&bands)?;
        bands.sort_by(|a, b| b.min_mark.total_cmp(&a.min_mark));
        Ok(Self { bands })
    }

    pub fn from_config(config: &GradingConfig) -> Result<Self, Vec<String>> {
        Self::new(config.effective_bands())
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// Band earned by an overall mark.
    pub fn band_for(&self, overall_mark: f64) -> EngineResult<&GradeBand> {
        let out_of_range = || EngineError::ScoreOutOfRange {
            component: "overall".to_string(),
            value: overall_mark,
        };
        if !overall_mark.is_finite() || overall_mark < 0.0 || overall_mark > 100.0 + MARK_EPSILON {
            return Err(out_of_range());
        }
        self.bands
            .iter()
            .find(|b| overall_mark >= b.min_mark)
            .ok_or_else(out_of_range)
    }

    pub fn grade_points(&self, overall_mark: f64) -> EngineResult<f64> {
        self.band_for(overall_mark).map(|b| b.points)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        let mut bands = super::config::default_bands();
        bands.sort_by(|a, b| b.min_mark.total_cmp(&a.min_mark));
        Self { bands }
    }
}

/// Honours classification of a semester GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Honours {
    FirstClass,
    SecondUpper,
    SecondLower,
    ThirdClass,
    /// Below every threshold. Advisory only.
    Unclassified,
}

/// Highest threshold first; the first one reached wins.
const HONOURS_THRESHOLDS: [(f64, Honours); 4] = [
    (4.50, Honours::FirstClass),
    (4.00, Honours::SecondUpper),
    (3.50, Honours::SecondLower),
    (3.00, Honours::ThirdClass),
];

impl fmt::Display for Honours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Honours::FirstClass => "First Class Honours",
            Honours::SecondUpper => "Second Class Upper Honours",
            Honours::SecondLower => "Second Class Lower Honours",
            Honours::ThirdClass => "Third Class Honours",
            Honours::Unclassified => "No honours classification",
        };
        write!(f, "{}", label)
    }
}

pub fn classify_honours(semester_gpa: f64) -> Honours {
    HONOURS_THRESHOLDS
        .iter()
        .find(|(threshold, _)| semester_gpa >= *threshold)
        .map(|(_, honours)| *honours)
        .unwrap_or(Honours::Unclassified)
}

/// Σ(points × AU) / Σ AU over `(points, academic_units)` pairs.
pub fn weighted_gpa<I>(student_id: &str, results: I) -> EngineResult<f64>
where
    I: IntoIterator<Item = (f64, u32)>,
{
    let mut weighted = 0.0;
    let mut total_units: u64 = 0;
    for (points, units) in results {
        weighted += points * f64::from(units);
        total_units += u64::from(units);
    }
    if total_units == 0 {
        return Err(EngineError::ZeroAcademicUnits {
            student_id: student_id.to_string(),
        });
    }
    Ok(weighted / total_units as f64)
}

/// One mark resolved against its course and graded.
pub(crate) struct GradedMark<'a> {
    pub course: &'a Course,
    pub overall_mark: f64,
    pub band: &'a GradeBand,
}

/// Look up the mark's course, aggregate the mark, and find its band.
pub(crate) fn grade_mark<'a, C>(
    mark: &Mark,
    courses: &'a C,
    scale: &'a GradeScale,
) -> EngineResult<GradedMark<'a>>
where
    C: CourseLookup + ?Sized,
{
    let course = courses
        .course(mark.course_id())
        .ok_or_else(|| EngineError::UnknownCourse(mark.course_id().to_string()))?;
    let overall_mark = compute_overall_mark(mark, course.require_scheme()?)?;
    Ok(GradedMark {
        course,
        overall_mark,
        band: scale.band_for(overall_mark)?,
    })
}

/// AU-weighted GPA over all of a student's marks for the semester.
pub fn semester_gpa<M, C>(
    student_id: &str,
    marks: &[M],
    courses: &C,
    scale: &GradeScale,
) -> EngineResult<f64>
where
    M: Borrow<Mark>,
    C: CourseLookup + ?Sized,
{
    let results = marks
        .iter()
        .map(|mark| {
            let mark: &Mark = mark.borrow();
            let graded = grade_mark(mark, courses, scale)?;
            Ok((graded.band.points, graded.course.academic_units))
        })
        .collect::<EngineResult<Vec<_>>>()?;
    weighted_gpa(student_id, results)
}
