use once_cell::sync::Lazy;

use crate::models::job_post::MAX_ASSESSMENT_QUESTIONS;
use crate::wizard::actions::{PublishJobPost, SubmitApplication, UpsertOrganization, QUESTIONS_LIST};
use crate::wizard::definition::{FieldSpec, StepDefinition, WizardDefinition};
use crate::wizard::state::WizardKind;

static ORGANIZATION_INTAKE: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    kind: WizardKind::OrganizationIntake,
    steps: vec![
        StepDefinition::new("organization", "Organization details")
            .fields([
                FieldSpec::required("organization_name"),
                FieldSpec::required("address"),
                FieldSpec::required("contact_person"),
                FieldSpec::required("contact_number"),
                FieldSpec::optional("website_link"),
                FieldSpec::optional("company_description"),
                FieldSpec::optional("legal_document_url"),
            ])
            .action(UpsertOrganization),
        StepDefinition::new("job_details", "Job details").fields([
            FieldSpec::required("job_title"),
            FieldSpec::required("job_description"),
            FieldSpec::required("required_skills"),
            FieldSpec::optional("experience_required"),
            FieldSpec::optional("qualification"),
            FieldSpec::optional("responsibilities"),
            FieldSpec::optional("employment_type"),
            FieldSpec::optional("location"),
            FieldSpec::optional("salary_range"),
            FieldSpec::optional("benefits"),
        ]),
        StepDefinition::new("assessment", "Pre-assessment questions")
            .list(QUESTIONS_LIST, MAX_ASSESSMENT_QUESTIONS)
            .action(PublishJobPost),
        StepDefinition::new("published", "Application link").terminal(),
    ],
});

static CV_INTAKE: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    kind: WizardKind::CvIntake,
    steps: vec![
        StepDefinition::new("upload", "Upload your CV").fields([FieldSpec::optional("cv_url")]),
        StepDefinition::new("review", "Review your details")
            .fields([
                FieldSpec::required("job_post_id"),
                FieldSpec::required("name"),
                FieldSpec::required("email").email(),
                FieldSpec::optional("phone"),
                FieldSpec::optional("address"),
                FieldSpec::optional("education"),
                FieldSpec::optional("experience"),
                FieldSpec::optional("skills"),
            ])
            .action(SubmitApplication),
        StepDefinition::new("submitted", "Application submitted").terminal(),
    ],
});

impl WizardKind {
    pub fn definition(self) -> &'static WizardDefinition {
        match self {
            WizardKind::OrganizationIntake => &ORGANIZATION_INTAKE,
            WizardKind::CvIntake => &CV_INTAKE,
        }
    }
}
