use tracing::info;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserType};
use crate::store::RecruitmentStore;

/// Hashes the password and creates the account.
pub async fn register(
    store: &dyn RecruitmentStore,
    email: &str,
    password: String,
    user_type: UserType,
) -> Result<ProfileRow, AppError> {
    let hash = hash_password_blocking(password).await?;
    let profile = store.create_account(email, &hash, user_type).await?;

    info!("Created {} account {}", user_type.as_str(), profile.id);
    Ok(profile)
}

/// Unknown email, wrong password and the other role's portal all fail with
/// the same `Unauthorized`.
pub async fn authenticate(
    store: &dyn RecruitmentStore,
    email: &str,
    password: String,
    portal: Option<UserType>,
) -> Result<ProfileRow, AppError> {
    let Some(account) = store.find_account(email).await? else {
        info!("Rejected sign-in for {email}: unknown account");
        return Err(AppError::Unauthorized);
    };

    if !verify_password_blocking(password, account.password_hash).await {
        info!("Rejected sign-in for {email}: wrong password");
        return Err(AppError::Unauthorized);
    }

    if portal.is_some_and(|portal| portal != account.profile.user_type) {
        info!("Rejected sign-in for {email}: wrong portal");
        return Err(AppError::Unauthorized);
    }

    Ok(account.profile)
}
