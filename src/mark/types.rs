use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::scheme::{AssessmentScheme, LeafKey};

/// Raw score of a main component that has no sub-components.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MainComponentMark {
    pub component: String,
    pub value: f64,
}

/// Raw score of one sub-component.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SubComponentMark {
    pub parent: String,
    pub component: String,
    pub value: f64,
}

/// A student's recorded leaf scores for one course.
///
/// Only `record` and `with_score` create marks, and both check the scores
/// against the course scheme. There are no setters: a correction is a new
/// mark. The overall mark is never stored, see `mark::compute_overall_mark`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Mark {
    student_id: String,
    course_id: String,
    #[serde(default)]
    main_marks: Vec<MainComponentMark>,
    #[serde(default)]
    sub_marks: Vec<SubComponentMark>,
    recorded_at: DateTime<Utc>,
}

impl Mark {
    /// Record a complete mark. Every leaf of `scheme` must be scored exactly
    /// once with a value in 0-100.
    pub fn record<I>(
        scheme: &AssessmentScheme,
        student_id: impl Into<String>,
        course_id: impl Into<String>,
        scores: I,
    ) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (LeafKey, f64)>,
    {
        let mut by_leaf: BTreeMap<LeafKey, f64> = BTreeMap::new();
        for (key, value) in scores {
            if !scheme.has_leaf(&key) {
                return Err(EngineError::UnknownComponent(key.to_string()));
            }
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(EngineError::ScoreOutOfRange {
                    component: key.to_string(),
                    value,
                });
            }
            if by_leaf.contains_key(&key) {
                return Err(EngineError::DuplicateScore(key.to_string()));
            }
            by_leaf.insert(key, value);
        }

        let student_id = student_id.into();
        let course_id = course_id.into();

        let mut main_marks = Vec::new();
        let mut sub_marks = Vec::new();
        for leaf in scheme.leaves() {
            let Some(value) = by_leaf.get(&leaf).copied() else {
                return Err(EngineError::IncompleteMark {
                    course_id,
                    student_id,
                    component: leaf.to_string(),
                });
            };
            match leaf.sub {
                Some(sub) => sub_marks.push(SubComponentMark {
                    parent: leaf.main,
                    component: sub,
                    value,
                }),
                None => main_marks.push(MainComponentMark {
                    component: leaf.main,
                    value,
                }),
            }
        }

        Ok(Self {
            student_id,
            course_id,
            main_marks,
            sub_marks,
            recorded_at: Utc::now(),
        })
    }

    /// A replacement mark with one leaf re-scored.
    pub fn with_score(
        &self,
        scheme: &AssessmentScheme,
        key: LeafKey,
        value: f64,
    ) -> EngineResult<Self> {
        if !scheme.has_leaf(&key) {
            return Err(EngineError::UnknownComponent(key.to_string()));
        }
        let mut scores: BTreeMap<LeafKey, f64> = self.leaf_scores().collect();
        scores.insert(key, value);
        Self::record(scheme, self.student_id.clone(), self.course_id.clone(), scores)
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn main_marks(&self) -> &[MainComponentMark] {
        &self.main_marks
    }

    pub fn sub_marks(&self) -> &[SubComponentMark] {
        &self.sub_marks
    }

    /// Raw value recorded directly against a main component.
    pub fn main_value(&self, component: &str) -> Option<f64> {
        self.main_marks
            .iter()
            .find(|m| m.component == component)
            .map(|m| m.value)
    }

    pub fn sub_value(&self, parent: &str, component: &str) -> Option<f64> {
        self.sub_marks
            .iter()
            .find(|m| m.parent == parent && m.component == component)
            .map(|m| m.value)
    }

    pub fn leaf_value(&self, key: &LeafKey) -> Option<f64> {
        match &key.sub {
            Some(sub) => self.sub_value(&key.main, sub),
            None => self.main_value(&key.main),
        }
    }

    /// All recorded leaf values.
    pub fn leaf_scores(&self) -> impl Iterator<Item = (LeafKey, f64)> + '_ {
        let mains = self
            .main_marks
            .iter()
            .map(|m| (LeafKey::main(m.component.clone()), m.value));
        let subs = self
            .sub_marks
            .iter()
            .map(|m| (LeafKey::sub(m.parent.clone(), m.component.clone()), m.value));
        mains.chain(subs)
    }

    /// Re-run the `record` checks against `scheme`. Used for marks that
    /// did not come through `record`, such as ones read from disk.
    pub fn check(&self, scheme: &AssessmentScheme) -> EngineResult<()> {
        Self::record(
            scheme,
            self.student_id.clone(),
            self.course_id.clone(),
            self.leaf_scores(),
        )
        .map(|_| ())
    }

    pub(crate) fn missing(&self, component: impl Into<String>) -> EngineError {
        EngineError::IncompleteMark {
            course_id: self.course_id.clone(),
            student_id: self.student_id.clone(),
            component: component.into(),
        }
    }
}
