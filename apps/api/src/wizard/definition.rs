use async_trait::async_trait;
use serde::Serialize;

use crate::auth::Session;
use crate::errors::AppError;
use crate::links::LinkIssuer;
use crate::store::RecruitmentStore;
use crate::validation::is_valid_email;
use crate::wizard::state::{WizardKind, WizardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    Any,
    Email,
}

impl FieldRule {
    fn check(self, value: &str) -> bool {
        match self {
            FieldRule::Any => true,
            FieldRule::Email => is_valid_email(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            rule: FieldRule::Any,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            rule: FieldRule::Any,
        }
    }

    pub const fn email(self) -> Self {
        Self {
            rule: FieldRule::Email,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSpec {
    pub name: &'static str,
    pub max_items: usize,
}

/// Collaborators a step action may call. Built per request from `AppState`
/// and the caller's session.
pub struct StepContext<'a> {
    pub session: &'a Session,
    pub store: &'a dyn RecruitmentStore,
    pub links: &'a dyn LinkIssuer,
}

/// Side effect run when a step is submitted, before the wizard advances.
///
/// Works on a draft of the state: if it fails, the draft is discarded and
/// the wizard stays where it was.
#[async_trait]
pub trait StepAction: Send + Sync {
    fn name(&self) -> &'static str;

    async fn perform(&self, ctx: &StepContext<'_>, draft: &mut WizardState)
        -> Result<(), AppError>;
}

pub struct StepDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
    pub lists: Vec<ListSpec>,
    pub action: Option<Box<dyn StepAction>>,
    /// Reaching this step completes the wizard.
    pub terminal: bool,
}

impl StepDefinition {
    pub fn new(name: &'static str, title: &'static str) -> Self {
        Self {
            name,
            title,
            fields: Vec::new(),
            lists: Vec::new(),
            action: None,
            terminal: false,
        }
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn list(mut self, name: &'static str, max_items: usize) -> Self {
        self.lists.push(ListSpec { name, max_items });
        self
    }

    pub fn action(mut self, action: impl StepAction + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn list_spec(&self, name: &str) -> Option<&ListSpec> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Required fields that are blank in `state`, in declaration order.
    pub fn missing_fields(&self, state: &WizardState) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && state.field(f.name).is_empty())
            .map(|f| f.name.to_string())
            .collect()
    }

    /// Fields whose non-blank value breaks their format rule.
    pub fn malformed_fields(&self, state: &WizardState) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| {
                let value = state.field(f.name);
                !value.is_empty() && !f.rule.check(value)
            })
            .map(|f| f.name.to_string())
            .collect()
    }
}

/// An ordered, configuration-driven wizard.
pub struct WizardDefinition {
    pub kind: WizardKind,
    pub steps: Vec<StepDefinition>,
}

impl WizardDefinition {
    pub fn total_steps(&self) -> u32 {
        self.steps.len() as u32
    }

    /// The step with 1-based number `number`.
    pub fn step(&self, number: u32) -> Result<&StepDefinition, AppError> {
        number
            .checked_sub(1)
            .and_then(|i| self.steps.get(i as usize))
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "{} wizard has no step {number}",
                    self.kind.as_str()
                ))
            })
    }

    pub fn declares_field(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s.field_spec(name).is_some())
    }

    pub fn list_specs(&self) -> impl Iterator<Item = &ListSpec> {
        self.steps.iter().flat_map(|s| s.lists.iter())
    }
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub number: u32,
    pub name: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
    pub lists: Vec<ListSpec>,
    pub terminal: bool,
}

impl StepView {
    pub fn of(number: u32, step: &StepDefinition) -> Self {
        Self {
            number,
            name: step.name,
            title: step.title,
            fields: step.fields.clone(),
            lists: step.lists.clone(),
            terminal: step.terminal,
        }
    }
}
