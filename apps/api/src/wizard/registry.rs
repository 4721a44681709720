use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::wizard::state::{WizardKind, WizardState};

pub type SharedWizard = Arc<Mutex<WizardState>>;

/// In-memory wizard drafts keyed by (user id, flow).
///
/// Each draft sits behind its own mutex, which serializes requests against
/// one wizard while leaving other users' wizards independent.
#[derive(Default)]
pub struct WizardRegistry {
    wizards: RwLock<HashMap<(Uuid, WizardKind), SharedWizard>>,
}

impl WizardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh draft, replacing any existing one for the same flow.
    pub async fn start(
        &self,
        user_id: Uuid,
        kind: WizardKind,
        seed: BTreeMap<String, String>,
    ) -> Result<SharedWizard, AppError> {
        let wizard = Arc::new(Mutex::new(kind.definition().start(seed)?));
        let replaced = self
            .wizards
            .write()
            .await
            .insert((user_id, kind), wizard.clone())
            .is_some();

        info!(
            "Started {} wizard for user {user_id}{}",
            kind.as_str(),
            if replaced { " (replaced draft)" } else { "" }
        );
        Ok(wizard)
    }

    pub async fn get(&self, user_id: Uuid, kind: WizardKind) -> Result<SharedWizard, AppError> {
        self.wizards
            .read()
            .await
            .get(&(user_id, kind))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No {} wizard in progress", kind.as_str())))
    }

    /// Returns whether a draft existed.
    pub async fn discard(&self, user_id: Uuid, kind: WizardKind) -> bool {
        self.wizards.write().await.remove(&(user_id, kind)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_replaces_existing_draft() {
        let registry = WizardRegistry::new();
        let user = Uuid::new_v4();
        let kind = WizardKind::OrganizationIntake;

        let first = registry.start(user, kind, BTreeMap::new()).await.unwrap();
        first.lock().await.current_step = 2;

        registry.start(user, kind, BTreeMap::new()).await.unwrap();
        let current = registry.get(user, kind).await.unwrap();
        assert_eq!(current.lock().await.current_step, 1);
    }

    #[tokio::test]
    async fn test_drafts_are_per_user_and_flow() {
        let registry = WizardRegistry::new();
        let user = Uuid::new_v4();
        registry
            .start(user, WizardKind::CvIntake, BTreeMap::new())
            .await
            .unwrap();

        assert!(registry.get(user, WizardKind::CvIntake).await.is_ok());
        assert!(matches!(
            registry.get(user, WizardKind::OrganizationIntake).await,
            Err(AppError::NotFound(_))
        ));
        assert!(registry
            .get(Uuid::new_v4(), WizardKind::CvIntake)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_discard() {
        let registry = WizardRegistry::new();
        let user = Uuid::new_v4();
        registry
            .start(user, WizardKind::CvIntake, BTreeMap::new())
            .await
            .unwrap();

        assert!(registry.discard(user, WizardKind::CvIntake).await);
        assert!(!registry.discard(user, WizardKind::CvIntake).await);
        assert!(registry.get(user, WizardKind::CvIntake).await.is_err());
    }
}
