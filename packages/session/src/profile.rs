//! Lawyer profile load and save.

use crate::error::SessionError;
use crate::models::{Profile, ProfileUpdate, UserId};
use crate::provider::DataStore;

/// The caller's profile row, if the backend has one yet.
pub async fn load_profile<D: DataStore>(
    data: &D,
    user_id: UserId,
) -> Result<Option<Profile>, SessionError> {
    data.profile_for_user(user_id).await
}

/// Update the caller's row when it exists, insert it otherwise.
pub async fn save_lawyer_profile<D: DataStore>(
    data: &D,
    user_id: UserId,
    update: &ProfileUpdate,
) -> Result<Profile, SessionError> {
    let saved = match data.profile_for_user(user_id).await? {
        Some(_) => data.update_profile(user_id, update).await?,
        None => data.insert_profile(user_id, update).await?,
    };
    tracing::info!(%user_id, "lawyer profile saved");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::models::Role;
    use uuid::Uuid;

    fn update(name: &str) -> ProfileUpdate {
        ProfileUpdate {
            full_name: name.to_string(),
            enrollment_number: "KAR/88/2012".to_string(),
            law_degree_university: "NLSIU".to_string(),
            practice_areas: vec!["Corporate".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_updates_existing_row() {
        let backend = MemoryBackend::new();
        let id = backend.seed_user("l@x.com", "secret1", Some(Role::Lawyer), Some("Old Name"));

        let saved = save_lawyer_profile(&backend, id, &update("New Name")).await.unwrap();
        assert_eq!(saved.full_name.as_deref(), Some("New Name"));
        // Email from the original row is kept.
        assert_eq!(saved.email.as_deref(), Some("l@x.com"));

        let profiles = backend.list_profiles().await.unwrap();
        assert_eq!(profiles.iter().filter(|p| p.user_id == id).count(), 1);
    }

    #[tokio::test]
    async fn test_save_inserts_missing_row() {
        let backend = MemoryBackend::new();
        let id = Uuid::new_v4();
        assert!(load_profile(&backend, id).await.unwrap().is_none());

        save_lawyer_profile(&backend, id, &update("Fresh")).await.unwrap();
        let loaded = load_profile(&backend, id).await.unwrap().unwrap();
        assert_eq!(loaded.enrollment_number.as_deref(), Some("KAR/88/2012"));
        assert_eq!(loaded.practice_areas, Some(vec!["Corporate".to_string()]));
    }

    #[tokio::test]
    async fn test_load_error_propagates() {
        let backend = MemoryBackend::new();
        backend.fail_profile_lookups(true);
        assert!(matches!(
            save_lawyer_profile(&backend, Uuid::new_v4(), &update("X")).await,
            Err(SessionError::Store(_))
        ));
    }
}
