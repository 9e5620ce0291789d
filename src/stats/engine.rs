use std::borrow::Borrow;
use tracing::debug;

use crate::course::Course;
use crate::error::{EngineError, EngineResult};
use crate::mark::{compute_main_component_mark, compute_overall_mark, Mark};
use crate::scheme::{AssessmentScheme, ComponentRef, LeafKey, MainComponent, SubComponent};

#[derive(Debug, Clone, PartialEq)]
pub struct SubComponentStats {
    pub name: String,
    pub weight: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStats {
    pub name: String,
    pub weight: u32,
    pub average: f64,
    pub sub_components: Vec<SubComponentStats>,
}

/// Cohort report for one course. `components` holds the non-exam main
/// components in reporting order; the exam is reported separately.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseStatistics {
    pub course_id: String,
    pub course_name: String,
    pub cohort_size: usize,
    pub components: Vec<ComponentStats>,
    pub exam: Option<ComponentStats>,
    pub overall_average: f64,
}

fn mean<M, F>(marks: &[M], value: F) -> EngineResult<f64>
where
    M: Borrow<Mark>,
    F: Fn(&Mark) -> EngineResult<f64>,
{
    if marks.is_empty() {
        return Err(EngineError::EmptyCohort);
    }
    let mut sum = 0.0;
    for mark in marks {
        let mark: &Mark = mark.borrow();
        sum += value(mark)?;
    }
    Ok(sum / marks.len() as f64)
}

/// Cohort mean of a main component's mark.
pub fn average_for_main<M: Borrow<Mark>>(
    marks: &[M],
    component: &MainComponent,
) -> EngineResult<f64> {
    mean(marks, |m| compute_main_component_mark(m, component))
}

/// Cohort mean of one sub-component's raw score.
pub fn average_for_sub<M: Borrow<Mark>>(
    marks: &[M],
    parent: &MainComponent,
    sub: &SubComponent,
) -> EngineResult<f64> {
    mean(marks, |m| {
        m.sub_value(&parent.name, &sub.name)
            .ok_or_else(|| m.missing(LeafKey::sub(&parent.name, &sub.name).to_string()))
    })
}

/// Cohort mean of the component called `name`, resolved with
/// `AssessmentScheme::resolve`: a sub-component of that name wins over a
/// main component of the same name.
pub fn average_for_component<M: Borrow<Mark>>(
    marks: &[M],
    scheme: &AssessmentScheme,
    name: &str,
) -> EngineResult<f64> {
    match scheme.resolve(name) {
        Some(ComponentRef::Sub { parent, sub }) => average_for_sub(marks, parent, sub),
        Some(ComponentRef::Main(component)) => average_for_main(marks, component),
        None => Err(EngineError::UnknownComponent(name.to_string())),
    }
}

/// Cohort mean of the overall course mark.
pub fn overall_average<M: Borrow<Mark>>(
    marks: &[M],
    scheme: &AssessmentScheme,
) -> EngineResult<f64> {
    mean(marks, |m| compute_overall_mark(m, scheme))
}

fn component_stats<M: Borrow<Mark>>(
    marks: &[M],
    component: &MainComponent,
) -> EngineResult<ComponentStats> {
    let sub_components = component
        .sub_components
        .iter()
        .map(|sub| {
            Ok(SubComponentStats {
                name: sub.name.clone(),
                weight: sub.weight,
                average: average_for_sub(marks, component, sub)?,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(ComponentStats {
        name: component.name.clone(),
        weight: component.weight,
        average: average_for_main(marks, component)?,
        sub_components,
    })
}

/// Full cohort report for `course` over `marks`, which the caller has
/// already narrowed to this course.
pub fn course_statistics<M: Borrow<Mark>>(
    course: &Course,
    marks: &[M],
) -> EngineResult<CourseStatistics> {
    let scheme = course.require_scheme()?;
    if marks.is_empty() {
        return Err(EngineError::EmptyCohort);
    }

    let mut components = Vec::new();
    let mut exam = None;
    for component in scheme.reporting_order() {
        let stats = component_stats(marks, component)?;
        if component.is_exam() {
            exam = Some(stats);
        } else {
            components.push(stats);
        }
    }

    let overall_average = overall_average(marks, scheme)?;
    debug!(
        course = %course.id,
        cohort = marks.len(),
        overall_average,
        "course statistics computed"
    );

    Ok(CourseStatistics {
        course_id: course.id.clone(),
        course_name: course.name.clone(),
        cohort_size: marks.len(),
        components,
        exam,
        overall_average,
    })
}
