//! Admin user directory: every profile joined with its role row.
//!
//! The join happens client-side from two list reads. A user with more than one role
//! row is listed as unresolved and reported in [`Directory::conflicts`].

use std::collections::HashMap;

use crate::error::SessionError;
use crate::models::{Profile, Role, RoleAssignment, UserId};
use crate::provider::DataStore;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub profile: Profile,
    pub role: RoleAssignment,
}

impl DirectoryEntry {
    pub fn display_name(&self) -> &str {
        self.profile.full_name.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    pub entries: Vec<DirectoryEntry>,
    pub conflicts: Vec<UserId>,
}

impl Directory {
    pub async fn load<D: DataStore>(data: &D) -> Result<Self, SessionError> {
        let (profiles, rows) = tokio::join!(data.list_profiles(), data.list_role_rows());
        let (profiles, rows) = (profiles?, rows?);

        let mut roles: HashMap<UserId, Vec<Role>> = HashMap::new();
        for row in rows {
            roles.entry(row.user_id).or_default().push(row.role);
        }

        let mut conflicts = Vec::new();
        let entries = profiles
            .into_iter()
            .map(|profile| {
                let role = match roles.get(&profile.user_id).map(Vec::as_slice) {
                    Some([role]) => RoleAssignment::from(*role),
                    Some([]) | None => RoleAssignment::Unresolved,
                    Some(_) => {
                        tracing::error!(user_id = %profile.user_id, "multiple role rows");
                        conflicts.push(profile.user_id);
                        RoleAssignment::Unresolved
                    }
                };
                DirectoryEntry { profile, role }
            })
            .collect();

        Ok(Self { entries, conflicts })
    }

    pub fn with_role(&self, role: RoleAssignment) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter().filter(move |entry| entry.role == role)
    }

    pub fn clients(&self) -> Vec<&DirectoryEntry> {
        self.with_role(RoleAssignment::Client).collect()
    }

    pub fn lawyers(&self) -> Vec<&DirectoryEntry> {
        self.with_role(RoleAssignment::Lawyer).collect()
    }

    pub fn admins(&self) -> Vec<&DirectoryEntry> {
        self.with_role(RoleAssignment::Admin).collect()
    }

    pub fn unresolved(&self) -> Vec<&DirectoryEntry> {
        self.with_role(RoleAssignment::Unresolved).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[tokio::test]
    async fn test_directory_partitions_by_role() {
        let backend = MemoryBackend::new();
        backend.seed_user("c1@x.com", "secret1", Some(Role::Client), Some("C One"));
        backend.seed_user("c2@x.com", "secret1", Some(Role::Client), None);
        backend.seed_user("l@x.com", "secret1", Some(Role::Lawyer), Some("Lawyer"));
        backend.seed_user("a@x.com", "secret1", Some(Role::Admin), Some("Admin"));
        backend.seed_user("n@x.com", "secret1", None, None);

        let directory = Directory::load(&backend).await.unwrap();
        assert_eq!(directory.entries.len(), 5);
        assert_eq!(directory.clients().len(), 2);
        assert_eq!(directory.lawyers()[0].display_name(), "Lawyer");
        assert_eq!(directory.admins().len(), 1);
        assert_eq!(directory.unresolved()[0].display_name(), "N/A");
        assert!(directory.conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_role_rows_are_conflicts() {
        let backend = MemoryBackend::new();
        let id = backend.seed_user("d@x.com", "secret1", Some(Role::Client), Some("Dup"));
        backend.add_role_row(id, Role::Lawyer);

        let directory = Directory::load(&backend).await.unwrap();
        assert_eq!(directory.conflicts, vec![id]);
        assert!(directory.lawyers().is_empty());
        assert_eq!(directory.unresolved().len(), 1);
    }

    #[tokio::test]
    async fn test_directory_load_error() {
        let backend = MemoryBackend::new();
        backend.fail_role_lookups(true);
        assert!(Directory::load(&backend).await.is_err());
    }
}
