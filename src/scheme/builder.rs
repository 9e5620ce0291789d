use anyhow::Result;
use std::fmt;
use tracing::{debug, warn};

use super::types::{AssessmentScheme, MainComponent, SubComponent, EXAM};
use super::validation::validate_sub_components;
use crate::course::Course;
use crate::error::{EngineError, EngineResult, SchemeViolation};

/// Where the builder is in the collection protocol.
///
/// `CollectingExam -> CollectingMain(0..n) -> Validating -> Committed`, with
/// `Validating -> CollectingMain(0)` when the batch does not use up the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    CollectingExam,
    CollectingMain(usize),
    Validating,
    Committed,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderState::CollectingExam => write!(f, "collecting the exam"),
            BuilderState::CollectingMain(i) => write!(f, "collecting main component {}", i + 1),
            BuilderState::Validating => write!(f, "validating"),
            BuilderState::Committed => write!(f, "committed"),
        }
    }
}

/// Collects one course's scheme. Nothing is visible outside the builder
/// until `validate` returns the committed scheme.
#[derive(Debug)]
pub struct SchemeBuilder {
    course_id: String,
    state: BuilderState,
    exam_weight: Option<u32>,
    requested: usize,
    collected: Vec<MainComponent>,
    restarts: u32,
}

impl SchemeBuilder {
    /// Start building for `course`. Fails with `SchemeAlreadySet` if the
    /// course already has a scheme.
    pub fn for_course(course: &Course) -> EngineResult<Self> {
        if course.has_scheme() {
            warn!(course = %course.id, "scheme already set, refusing to rebuild");
            return Err(EngineError::SchemeAlreadySet {
                course_id: course.id.clone(),
            });
        }
        Ok(Self {
            course_id: course.id.clone(),
            state: BuilderState::CollectingExam,
            exam_weight: None,
            requested: 0,
            collected: Vec::new(),
            restarts: 0,
        })
    }

    /// Current step of the protocol
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Chosen exam weight, `None` before the choice or when there is no exam
    pub fn exam_weight(&self) -> Option<u32> {
        self.exam_weight
    }

    /// Weight available to the non-exam components.
    pub fn budget(&self) -> u32 {
        100 - self.exam_weight.unwrap_or(0)
    }

    /// Budget not yet consumed by the current batch.
    pub fn remaining(&self) -> u32 {
        self.budget().saturating_sub(self.allocated())
    }

    /// How many times the batch was thrown away.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Number of non-exam main components asked for
    pub fn requested(&self) -> usize {
        self.requested
    }

    fn allocated(&self) -> u32 {
        self.collected.iter().map(|c| c.weight).sum()
    }

    fn expect_state(&self, action: &'static str, ok: bool) -> EngineResult<()> {
        if ok {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                action,
                state: self.state.to_string(),
            })
        }
    }

    /// Fix the exam weight (if any) and the number of further main components.
    pub fn choose_exam(
        &mut self,
        exam_weight: Option<u32>,
        main_count: usize,
    ) -> EngineResult<BuilderState> {
        self.expect_state(
            "choose the exam",
            self.state == BuilderState::CollectingExam,
        )?;

        if let Some(weight) = exam_weight {
            if weight > 100 {
                return Err(SchemeViolation::ExamWeight(weight).into());
            }
        }
        let exam = exam_weight.unwrap_or(0);
        if main_count == 0 && exam != 100 {
            return Err(SchemeViolation::NothingToAllocate { exam_weight: exam }.into());
        }

        self.exam_weight = exam_weight;
        self.requested = main_count;
        self.state = if main_count == 0 {
            BuilderState::Validating
        } else {
            BuilderState::CollectingMain(0)
        };
        debug!(
            course = %self.course_id,
            exam = ?exam_weight,
            main_count,
            budget = self.budget(),
            "exam chosen"
        );
        Ok(self.state)
    }

    /// Check a main component's name and weight before its sub-components
    /// are collected.
    pub fn check_header(
        &self,
        name: &str,
        weight: u32,
        sub_count: usize,
    ) -> EngineResult<()> {
        self.expect_state(
            "check a component",
            matches!(self.state, BuilderState::CollectingMain(_)),
        )?;

        let name = name.trim();
        if name.is_empty() {
            return Err(SchemeViolation::EmptyName.into());
        }
        let taken = self.collected.iter().any(|c| c.name == name)
            || (name == EXAM && self.exam_weight.is_some());
        if taken {
            return Err(SchemeViolation::DuplicateName(name.to_string()).into());
        }
        if name == EXAM && sub_count > 0 {
            return Err(SchemeViolation::ExamWithSubComponents.into());
        }
        let remaining = self.remaining();
        if weight > remaining {
            return Err(SchemeViolation::OverBudget { weight, remaining }.into());
        }
        Ok(())
    }

    /// Accept the current main component. A sub-component problem rejects
    /// only this component; earlier siblings stay collected.
    pub fn add_main(
        &mut self,
        name: &str,
        weight: u32,
        sub_components: Vec<SubComponent>,
    ) -> EngineResult<BuilderState> {
        let BuilderState::CollectingMain(index) = self.state else {
            return Err(EngineError::InvalidState {
                action: "add a component",
                state: self.state.to_string(),
            });
        };
        self.check_header(name, weight, sub_components.len())?;

        let name = name.trim();
        validate_sub_components(name, &sub_components)?;

        self.collected
            .push(MainComponent::new(name, weight, sub_components));
        debug!(
            course = %self.course_id,
            index,
            component = name,
            weight,
            remaining = self.remaining(),
            "main component collected"
        );

        self.state = if index + 1 >= self.requested {
            BuilderState::Validating
        } else {
            BuilderState::CollectingMain(index + 1)
        };
        Ok(self.state)
    }

    /// Validate the batch. On a budget mismatch every non-exam component is
    /// discarded and the builder returns to `CollectingMain(0)`; the exam
    /// weight is kept.
    pub fn validate(&mut self) -> EngineResult<AssessmentScheme> {
        self.expect_state("validate", self.state == BuilderState::Validating)?;

        let budget = self.budget();
        let allocated = self.allocated();
        if allocated != budget {
            self.restart();
            return Err(SchemeViolation::BudgetMismatch { budget, allocated }.into());
        }

        let mut components = Vec::with_capacity(self.collected.len() + 1);
        if let Some(weight) = self.exam_weight {
            components.push(MainComponent::exam(weight));
        }
        components.extend(self.collected.iter().cloned());

        match AssessmentScheme::new(components) {
            Ok(scheme) => {
                self.collected.clear();
                self.state = BuilderState::Committed;
                debug!(
                    course = %self.course_id,
                    components = scheme.components().len(),
                    restarts = self.restarts,
                    "scheme committed"
                );
                Ok(scheme)
            }
            Err(violation) => {
                self.restart();
                Err(violation.into())
            }
        }
    }

    fn restart(&mut self) {
        self.collected.clear();
        self.restarts += 1;
        self.state = if self.requested == 0 {
            BuilderState::CollectingExam
        } else {
            BuilderState::CollectingMain(0)
        };
        debug!(
            course = %self.course_id,
            restarts = self.restarts,
            "weights did not tally, discarding batch"
        );
    }
}

/// Name, weight and sub-component count of one main component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainHeader {
    pub name: String,
    pub weight: u32,
    pub sub_count: usize,
}

/// Source of the answers the builder needs: an interactive prompt, or a
/// script in tests.
pub trait SchemeInput {
    /// `None` when the course has no final exam.
    fn exam_weight(&mut self) -> Result<Option<u32>>;

    fn main_count(&mut self) -> Result<usize>;

    fn main_header(&mut self, index: usize, remaining: u32) -> Result<MainHeader>;

    fn sub_components(&mut self, parent: &str, count: usize) -> Result<Vec<SubComponent>>;

    /// Called for every rejected answer before it is asked for again.
    fn rejected(&mut self, _violation: &SchemeViolation) -> Result<()> {
        Ok(())
    }
}

fn recoverable(err: EngineError) -> Result<SchemeViolation> {
    match err {
        EngineError::SchemeValidation(v) => Ok(v),
        other => Err(other.into()),
    }
}

/// Run the whole collection protocol against `input` and return the
/// committed scheme. The caller attaches it to the course.
pub fn build_scheme<I: SchemeInput + ?Sized>(
    mut builder: SchemeBuilder,
    input: &mut I,
) -> Result<AssessmentScheme> {
    loop {
        match builder.state() {
            BuilderState::CollectingExam => {
                let exam = input.exam_weight()?;
                let count = input.main_count()?;
                if let Err(e) = builder.choose_exam(exam, count) {
                    input.rejected(&recoverable(e)?)?;
                }
            }
            BuilderState::CollectingMain(index) => {
                let header = loop {
                    let header = input.main_header(index, builder.remaining())?;
                    match builder.check_header(&header.name, header.weight, header.sub_count) {
                        Ok(()) => break header,
                        Err(e) => input.rejected(&recoverable(e)?)?,
                    }
                };
                loop {
                    let subs = if header.sub_count == 0 {
                        Vec::new()
                    } else {
                        input.sub_components(&header.name, header.sub_count)?
                    };
                    match builder.add_main(&header.name, header.weight, subs) {
                        Ok(_) => break,
                        Err(e) => input.rejected(&recoverable(e)?)?,
                    }
                }
            }
            BuilderState::Validating => match builder.validate() {
                Ok(scheme) => return Ok(scheme),
                Err(e) => input.rejected(&recoverable(e)?)?,
            },
            BuilderState::Committed => {
                anyhow::bail!("scheme builder was already committed")
            }
        }
    }
}
