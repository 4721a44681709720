use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::wizard::definition::{StepContext, StepDefinition, WizardDefinition};
use crate::wizard::list::BoundedList;
use crate::wizard::state::{WizardState, WizardStatus};

/// Body of `POST /api/v1/wizards/:flow/submit`.
#[derive(Debug, Default, Deserialize)]
pub struct StepSubmission {
    /// The step the client believes it is on.
    pub step: u32,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Whole-list replacements for lists the step edits.
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<String>>,
}

impl WizardDefinition {
    /// A fresh wizard on step 1. `seed` may prefill any field the flow
    /// declares, e.g. the job post id carried by an application link.
    pub fn start(&self, seed: BTreeMap<String, String>) -> Result<WizardState, AppError> {
        if let Some(unknown) = seed.keys().find(|name| !self.declares_field(name)) {
            return Err(AppError::Validation(format!(
                "Unknown field '{unknown}' for {}",
                self.kind.as_str()
            )));
        }

        let lists = self
            .list_specs()
            .map(|spec| (spec.name.to_string(), BoundedList::new(spec.max_items)))
            .collect();

        Ok(WizardState {
            kind: self.kind,
            current_step: 1,
            total_steps: self.total_steps(),
            fields: seed,
            lists,
            status: WizardStatus::InProgress,
            artifact: None,
            refs: BTreeMap::new(),
        })
    }

    /// Validates the current step and, when it passes, runs the step's action
    /// and advances by one.
    ///
    /// All changes are applied to a draft; `state` is only replaced once the
    /// action has succeeded, so a rejected or failed submit leaves it as it was.
    pub async fn submit_step(
        &self,
        state: &mut WizardState,
        submission: StepSubmission,
        ctx: &StepContext<'_>,
    ) -> Result<(), AppError> {
        state.ensure_editable()?;
        if submission.step != state.current_step {
            return Err(AppError::Validation(format!(
                "Step {} was submitted but the wizard is on step {}",
                submission.step, state.current_step
            )));
        }

        let step = self.step(state.current_step)?;
        check_declared(step, &submission)?;

        let mut draft = state.clone();
        draft.fields.extend(submission.fields);
        for (name, items) in submission.lists {
            // check_declared guarantees the spec exists
            let max = step.list_spec(&name).map(|l| l.max_items).unwrap_or(1);
            draft.lists.insert(name, BoundedList::from_items(items, max)?);
        }

        let missing = step.missing_fields(&draft);
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }
        let malformed = step.malformed_fields(&draft);
        if !malformed.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid value for: {}",
                malformed.join(", ")
            )));
        }

        if let Some(action) = &step.action {
            if let Err(e) = action.perform(ctx, &mut draft).await {
                warn!(
                    "{} step {} action {} failed: {e}",
                    self.kind.as_str(),
                    state.current_step,
                    action.name()
                );
                return Err(e);
            }
        }

        if draft.current_step < draft.total_steps {
            draft.current_step += 1;
        }
        let reached = self.step(draft.current_step)?;
        if reached.terminal || draft.current_step == state.current_step {
            draft.status = WizardStatus::Complete;
        }

        info!(
            "{} wizard for user {} moved to step {} ({:?})",
            self.kind.as_str(),
            ctx.session.user_id,
            draft.current_step,
            draft.status
        );
        *state = draft;
        Ok(())
    }

    /// Returns to the previous step. No-op on step 1 and on a complete wizard.
    pub fn go_back(&self, state: &mut WizardState) {
        if state.is_complete() || state.current_step <= 1 {
            return;
        }
        state.current_step -= 1;
    }

    pub fn add_item(
        &self,
        state: &mut WizardState,
        list: &str,
        value: String,
    ) -> Result<(), AppError> {
        self.editable_list(state, list)?.add(value)?;
        Ok(())
    }

    pub fn remove_item(
        &self,
        state: &mut WizardState,
        list: &str,
        index: usize,
    ) -> Result<String, AppError> {
        Ok(self.editable_list(state, list)?.remove(index)?)
    }

    pub fn update_item(
        &self,
        state: &mut WizardState,
        list: &str,
        index: usize,
        value: String,
    ) -> Result<(), AppError> {
        self.editable_list(state, list)?.update(index, value)?;
        Ok(())
    }

    /// The named list, provided the wizard is editable and the current step
    /// edits it.
    fn editable_list<'s>(
        &self,
        state: &'s mut WizardState,
        list: &str,
    ) -> Result<&'s mut BoundedList, AppError> {
        state.ensure_editable()?;
        let spec = self
            .step(state.current_step)?
            .list_spec(list)
            .copied()
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "List '{list}' cannot be edited on step {}",
                    state.current_step
                ))
            })?;
        Ok(state
            .lists
            .entry(spec.name.to_string())
            .or_insert_with(|| BoundedList::new(spec.max_items)))
    }
}

fn check_declared(step: &StepDefinition, submission: &StepSubmission) -> Result<(), AppError> {
    let unknown: Vec<&str> = submission
        .fields
        .keys()
        .filter(|name| step.field_spec(name).is_none())
        .chain(
            submission
                .lists
                .keys()
                .filter(|name| step.list_spec(name).is_none()),
        )
        .map(String::as_str)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Step '{}' does not accept: {}",
            step.name,
            unknown.join(", ")
        )))
    }
}
