use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::course::Course;
use crate::grading::Transcript;
use crate::mark::MarkBreakdown;
use crate::stats::{ComponentStats, CourseStatistics};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a mark or average to one decimal place (78.4, 100.0)
pub fn format_mark(value: f64) -> String {
    format!("{:.1}", value)
}

/// Format a GPA to two decimal places
pub fn format_gpa(value: f64) -> String {
    format!("{:.2}", value)
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

/// List the components of a course's scheme, exam last.
/// Sub-component weights are shown as a share of their parent.
pub fn format_scheme(course: &Course, use_colors: bool) -> String {
    let title = format!("{} {}", course.id, course.name);
    let Some(scheme) = course.scheme() else {
        return format!("{}\n  No assessment scheme.", heading(&title, use_colors));
    };

    let mut lines = vec![heading(&title, use_colors)];
    for component in scheme.reporting_order() {
        let name = if use_colors {
            component.name.cyan().to_string()
        } else {
            component.name.clone()
        };
        lines.push(format!("  {} ({}%)", name, component.weight));
        for sub in &component.sub_components {
            lines.push(format!("    {} ({}% of {})", sub.name, sub.weight, component.name));
        }
    }
    if scheme.exam().is_none() {
        lines.push("  No exam.".to_string());
    }
    lines.join("\n")
}

fn component_lines(stats: &ComponentStats, use_colors: bool) -> Vec<String> {
    let average = format_mark(stats.average);
    let mut lines = vec![if use_colors {
        format!(
            "  {} ({}%): {}",
            stats.name.cyan(),
            stats.weight,
            average.green()
        )
    } else {
        format!("  {} ({}%): {}", stats.name, stats.weight, average)
    }];
    for sub in &stats.sub_components {
        lines.push(format!(
            "    {} ({}%): {}",
            sub.name,
            sub.weight,
            format_mark(sub.average)
        ));
    }
    lines
}

/// Course statistics report: components in reporting order, then the exam
/// (or a "No exam." line), then overall performance.
pub fn format_course_statistics(stats: &CourseStatistics, use_colors: bool) -> String {
    let mut lines = vec![
        heading(&format!("{} {}", stats.course_id, stats.course_name), use_colors),
        format!("  Students: {}", stats.cohort_size),
    ];
    for component in &stats.components {
        lines.extend(component_lines(component, use_colors));
    }
    match &stats.exam {
        Some(exam) => lines.extend(component_lines(exam, use_colors)),
        None => lines.push("  No exam.".to_string()),
    }

    let overall = format_mark(stats.overall_average);
    if use_colors {
        lines.push(format!("  Overall performance: {}", overall.bold()));
    } else {
        lines.push(format!("  Overall performance: {}", overall));
    }
    lines.join("\n")
}

/// Per-component contributions of one recorded mark
pub fn format_breakdown(breakdown: &MarkBreakdown, use_colors: bool) -> String {
    let mut lines: Vec<String> = breakdown
        .components
        .iter()
        .map(|c| {
            format!(
                "  {} ({}%): {} -> {}",
                c.name,
                c.weight,
                format_mark(c.mark),
                format_mark(c.contribution)
            )
        })
        .collect();
    let overall = format_mark(breakdown.overall);
    if use_colors {
        lines.push(format!("  Overall: {}", overall.bold()));
    } else {
        lines.push(format!("  Overall: {}", overall));
    }
    lines.join("\n")
}

/// Student transcript: one row per course, then GPA and honours
pub fn format_transcript(
    transcript: &Transcript,
    student_name: Option<&str>,
    use_colors: bool,
) -> String {
    let title = match student_name {
        Some(name) => format!("{} {}", transcript.student_id, name),
        None => transcript.student_id.clone(),
    };
    let mut lines = vec![heading(&title, use_colors)];

    let id_width = transcript
        .rows
        .iter()
        .map(|r| r.course_id.chars().count())
        .max()
        .unwrap_or(0);

    for row in &transcript.rows {
        let grade = if use_colors {
            format!("{:<2}", row.grade).yellow().to_string()
        } else {
            format!("{:<2}", row.grade)
        };
        lines.push(format!(
            "  {:<width$}  {:>5}  {}  {:.1} pts  {} AU  {}",
            row.course_id,
            format_mark(row.overall_mark),
            grade,
            row.grade_points,
            row.academic_units,
            row.course_name,
            width = id_width
        ));
    }

    lines.push(format!("  Semester GPA: {}", format_gpa(transcript.semester_gpa)));
    lines.push(format!("  Honours: {}", transcript.honours));
    lines.join("\n")
}
