use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserType;
use crate::routes::pages::Page;
use crate::wizard::list::BoundedList;

/// The flows built on the wizard engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardKind {
    OrganizationIntake,
    CvIntake,
}

impl WizardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardKind::OrganizationIntake => "organization-intake",
            WizardKind::CvIntake => "cv-intake",
        }
    }

    /// The only role allowed to drive this flow.
    pub fn role(self) -> UserType {
        match self {
            WizardKind::OrganizationIntake => UserType::Organization,
            WizardKind::CvIntake => UserType::Candidate,
        }
    }

    /// Where the client goes once the flow is complete.
    pub fn completion_page(self) -> Page {
        match self {
            WizardKind::OrganizationIntake => Page::OrganizationDashboard,
            WizardKind::CvIntake => Page::Interview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub kind: WizardKind,
    /// 1-based; always within `1..=total_steps`.
    pub current_step: u32,
    pub total_steps: u32,
    pub fields: BTreeMap<String, String>,
    pub lists: BTreeMap<String, BoundedList>,
    pub status: WizardStatus,
    /// Produced by the terminal step, e.g. the application link.
    pub artifact: Option<String>,
    /// Ids of records created by earlier steps, keyed by record name.
    pub refs: BTreeMap<String, Uuid>,
}

impl WizardState {
    pub fn is_complete(&self) -> bool {
        self.status == WizardStatus::Complete
    }

    pub fn ensure_editable(&self) -> Result<(), AppError> {
        if self.is_complete() {
            return Err(AppError::Validation(format!(
                "The {} wizard is complete and can no longer be edited",
                self.kind.as_str()
            )));
        }
        Ok(())
    }

    /// Trimmed value of a field; empty when unset.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// `None` when the field is unset or blank.
    pub fn optional_field(&self, name: &str) -> Option<String> {
        Some(self.field(name))
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WizardState {
        WizardState {
            kind: WizardKind::CvIntake,
            current_step: 1,
            total_steps: 3,
            fields: BTreeMap::from([
                ("name".to_string(), "  Jane  ".to_string()),
                ("phone".to_string(), "   ".to_string()),
            ]),
            lists: BTreeMap::new(),
            status: WizardStatus::InProgress,
            artifact: None,
            refs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_field_accessors_trim() {
        let s = state();
        assert_eq!(s.field("name"), "Jane");
        assert_eq!(s.field("missing"), "");
        assert_eq!(s.optional_field("phone"), None);
        assert_eq!(s.optional_field("name").as_deref(), Some("Jane"));
    }

    #[test]
    fn test_complete_wizard_is_not_editable() {
        let mut s = state();
        assert!(s.ensure_editable().is_ok());
        s.status = WizardStatus::Complete;
        assert!(matches!(s.ensure_editable(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_kind_path_names() {
        let kind: WizardKind = serde_json::from_str("\"organization-intake\"").unwrap();
        assert_eq!(kind, WizardKind::OrganizationIntake);
        assert_eq!(WizardKind::CvIntake.as_str(), "cv-intake");
        assert_eq!(WizardKind::CvIntake.role(), UserType::Candidate);
    }
}
