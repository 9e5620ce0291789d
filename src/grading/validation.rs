use super::config::{GradeBand, GradingConfig};

/// Validate a band table.
/// Returns all validation errors at once (not just the first).
pub fn validate_grade_bands(bands: &[GradeBand]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if bands.is_empty() {
        errors.push("grading.bands: at least one band is required".to_string());
        return Err(errors);
    }

    for (i, band) in bands.iter().enumerate() {
        if band.grade.trim().is_empty() {
            errors.push(format!("grading.bands[{}].grade: must not be empty", i));
        }
        if !band.min_mark.is_finite() || !(0.0..=100.0).contains(&band.min_mark) {
            errors.push(format!(
                "grading.bands[{}].min_mark: {} is outside 0-100",
                i, band.min_mark
            ));
        }
        if !band.points.is_finite() || band.points < 0.0 {
            errors.push(format!(
                "grading.bands[{}].points: must be a non-negative number",
                i
            ));
        }
    }

    for (i, band) in bands.iter().enumerate() {
        if bands[..i].iter().any(|b| b.min_mark == band.min_mark) {
            errors.push(format!(
                "grading.bands[{}].min_mark: {} is used by another band",
                i, band.min_mark
            ));
        }
    }

    if !bands.iter().any(|b| b.min_mark == 0.0) {
        errors.push("grading.bands: no band starts at 0, low marks would have no grade".to_string());
    }

    // Monotonic: a higher cut-off never awards fewer points.
    let mut ordered: Vec<(usize, &GradeBand)> = bands.iter().enumerate().collect();
    ordered.sort_by(|a, b| a.1.min_mark.total_cmp(&b.1.min_mark));
    for pair in ordered.windows(2) {
        let (_, lower) = pair[0];
        let (i, higher) = pair[1];
        if higher.points < lower.points {
            errors.push(format!(
                "grading.bands[{}].points: {} at {} is below {} at {}",
                i, higher.points, higher.min_mark, lower.points, lower.min_mark
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate grading configuration at startup.
pub fn validate_grading(config: &GradingConfig) -> Result<(), Vec<String>> {
    match &config.bands {
        Some(bands) => validate_grade_bands(bands),
        None => Ok(()),
    }
}
