//! crates/portfolio_core/src/store.rs
//!
//! The profile store: every operation the service layer can perform on the
//! aggregate, expressed as a read-modify-write of the whole document.
//!
//! Writes are compare-and-swap on the repository revision. When another writer
//! got there first the mutation is re-applied to the fresh document, so two
//! concurrent "add skill" calls both land instead of the later one silently
//! dropping the earlier.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{ListKind, NewProject, NewWork, Profile, ProfilePatch, Project, WorkExperience};
use crate::ports::{PortError, PortResult, ProfileRepository, Revision, PROFILE_KEY};

const MAX_WRITE_ATTEMPTS: usize = 3;

/// Whether `upsert_profile` created the document or merged into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

fn no_profile() -> PortError {
    PortError::NotFound("No profile found".to_string())
}

/// Maps a client-supplied position to the entry's current position.
///
/// The first attempt pins the id of the entry at `index`. Retries look that id
/// up again, so a list reshuffled by another writer never redirects the change
/// to a different entry. If the pinned entry is gone the write is a conflict.
fn locate(
    pinned: &mut Option<Uuid>,
    mut ids: impl Iterator<Item = Uuid>,
    index: usize,
    list: ListKind,
) -> PortResult<usize> {
    match *pinned {
        None => {
            let id = ids.nth(index).ok_or(PortError::InvalidIndex(list))?;
            *pinned = Some(id);
            Ok(index)
        }
        Some(id) => ids.position(|candidate| candidate == id).ok_or_else(|| {
            PortError::Conflict(format!("the {list} at index {index} was removed concurrently"))
        }),
    }
}

#[derive(Clone)]
pub struct ProfileStore {
    repo: Arc<dyn ProfileRepository>,
    key: String,
}

impl ProfileStore {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self {
            repo,
            key: PROFILE_KEY.to_string(),
        }
    }

    async fn load(&self) -> PortResult<Revision<Profile>> {
        self.repo.fetch(&self.key).await?.ok_or_else(no_profile)
    }

    /// Applies `change` to the stored profile and persists the result.
    ///
    /// `change` may run more than once if the document is modified concurrently,
    /// and its error aborts the write.
    async fn mutate<T, F>(&self, mut change: F) -> PortResult<(T, Profile)>
    where
        F: FnMut(&mut Profile) -> PortResult<T> + Send,
        T: Send,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let Revision {
                value: mut profile,
                revision,
            } = self.load().await?;
            let output = change(&mut profile)?;
            profile.updated_at = Utc::now();

            match self.repo.save(&self.key, &profile, Some(revision)).await {
                Ok(new_revision) => {
                    debug!(revision = new_revision, "profile saved");
                    return Ok((output, profile));
                }
                Err(PortError::Conflict(reason)) => {
                    warn!(attempt, %reason, "profile changed while writing, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(PortError::Conflict(format!(
            "profile kept changing after {MAX_WRITE_ATTEMPTS} attempts"
        )))
    }

    // --- Profile ---

    pub async fn get_profile(&self) -> PortResult<Profile> {
        Ok(self.load().await?.value)
    }

    /// Creates the profile if none exists, otherwise merges `patch` into it.
    pub async fn upsert_profile(&self, patch: ProfilePatch) -> PortResult<(Profile, Upserted)> {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let now = Utc::now();
            let (profile, expected, outcome) = match self.repo.fetch(&self.key).await? {
                None => (Profile::create(patch.clone(), now)?, None, Upserted::Created),
                Some(Revision {
                    value: mut profile,
                    revision,
                }) => {
                    profile.apply(patch.clone());
                    profile.updated_at = now;
                    (profile, Some(revision), Upserted::Updated)
                }
            };

            match self.repo.save(&self.key, &profile, expected).await {
                Ok(_) => {
                    info!(?outcome, "profile saved");
                    return Ok((profile, outcome));
                }
                Err(PortError::Conflict(reason)) => {
                    warn!(attempt, %reason, "profile changed while upserting, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(PortError::Conflict(format!(
            "profile kept changing after {MAX_WRITE_ATTEMPTS} attempts"
        )))
    }

    pub async fn delete_profile(&self) -> PortResult<Profile> {
        let removed = self.repo.remove(&self.key).await?.ok_or_else(no_profile)?;
        info!("profile deleted");
        Ok(removed)
    }

    // --- Projects ---

    pub async fn list_projects(&self, skill: Option<&str>) -> PortResult<Vec<Project>> {
        Ok(self.get_profile().await?.projects_with_skill(skill))
    }

    pub async fn search_projects(&self, query: &str) -> PortResult<Vec<Project>> {
        Ok(self.get_profile().await?.search_projects(query))
    }

    pub async fn add_project(&self, project: NewProject) -> PortResult<(Project, Vec<Project>)> {
        let project = Project::new(project);
        let (added, profile) = self
            .mutate(|profile| {
                profile.projects.push(project.clone());
                Ok(project.clone())
            })
            .await?;
        info!(title = %added.title, "project added");
        Ok((added, profile.projects))
    }

    pub async fn update_project_at(
        &self,
        index: usize,
        project: NewProject,
    ) -> PortResult<(Project, Vec<Project>)> {
        let mut pinned = None;
        let (updated, profile) = self
            .mutate(|profile| {
                let ids = profile.projects.iter().map(|p| p.id);
                let at = locate(&mut pinned, ids, index, ListKind::Projects)?;
                profile.replace_project(at, project.clone())
            })
            .await?;
        info!(index, title = %updated.title, "project updated");
        Ok((updated, profile.projects))
    }

    pub async fn delete_project_at(&self, index: usize) -> PortResult<(Project, Vec<Project>)> {
        let mut pinned = None;
        let (removed, profile) = self
            .mutate(|profile| {
                let ids = profile.projects.iter().map(|p| p.id);
                let at = locate(&mut pinned, ids, index, ListKind::Projects)?;
                profile.remove_project(at)
            })
            .await?;
        info!(index, title = %removed.title, "project deleted");
        Ok((removed, profile.projects))
    }

    // --- Work experience ---

    pub async fn list_work(&self) -> PortResult<Vec<WorkExperience>> {
        Ok(self.get_profile().await?.work)
    }

    pub async fn add_work(&self, work: NewWork) -> PortResult<(WorkExperience, Vec<WorkExperience>)> {
        let work = WorkExperience::new(work);
        let (added, profile) = self
            .mutate(|profile| {
                profile.work.push(work.clone());
                Ok(work.clone())
            })
            .await?;
        info!(company = %added.company, "work experience added");
        Ok((added, profile.work))
    }

    pub async fn update_work_at(
        &self,
        index: usize,
        work: NewWork,
    ) -> PortResult<(WorkExperience, Vec<WorkExperience>)> {
        let mut pinned = None;
        let (updated, profile) = self
            .mutate(|profile| {
                let ids = profile.work.iter().map(|w| w.id);
                let at = locate(&mut pinned, ids, index, ListKind::Work)?;
                profile.replace_work(at, work.clone())
            })
            .await?;
        info!(index, company = %updated.company, "work experience updated");
        Ok((updated, profile.work))
    }

    pub async fn delete_work_at(
        &self,
        index: usize,
    ) -> PortResult<(WorkExperience, Vec<WorkExperience>)> {
        let mut pinned = None;
        let (removed, profile) = self
            .mutate(|profile| {
                let ids = profile.work.iter().map(|w| w.id);
                let at = locate(&mut pinned, ids, index, ListKind::Work)?;
                profile.remove_work(at)
            })
            .await?;
        info!(index, company = %removed.company, "work experience deleted");
        Ok((removed, profile.work))
    }

    // --- Skills ---

    pub async fn list_skills(&self) -> PortResult<Vec<String>> {
        Ok(self.get_profile().await?.sorted_skills())
    }

    pub async fn add_skill(&self, name: &str) -> PortResult<Vec<String>> {
        let ((), profile) = self.mutate(|profile| profile.add_skill(name)).await?;
        info!(skill = name, "skill added");
        Ok(profile.sorted_skills())
    }

    /// Removes a skill by case-insensitive name. Returns the stored spelling
    /// and the remaining skills.
    pub async fn delete_skill(&self, name: &str) -> PortResult<(String, Vec<String>)> {
        let (removed, profile) = self.mutate(|profile| profile.remove_skill(name)).await?;
        info!(skill = %removed, "skill deleted");
        Ok((removed, profile.sorted_skills()))
    }

    pub async fn replace_skills(&self, names: &[String]) -> PortResult<Vec<String>> {
        let ((), profile) = self
            .mutate(|profile| {
                profile.replace_skills(names);
                Ok(())
            })
            .await?;
        info!(count = profile.skills.len(), "skills replaced");
        Ok(profile.sorted_skills())
    }

    /// Whether the backing repository answers.
    pub async fn health(&self) -> bool {
        match self.repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "profile repository unreachable");
                false
            }
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A repository kept in a map that can be told to lose the next N races,
    /// or to let another writer change the document right before the next save.
    #[derive(Default)]
    struct MapRepository {
        docs: Mutex<HashMap<String, Revision<Profile>>>,
        conflicts: Mutex<usize>,
        saves: Mutex<usize>,
        interleave: Mutex<Option<fn(&mut Profile)>>,
    }

    impl MapRepository {
        fn losing(conflicts: usize) -> Self {
            Self {
                conflicts: Mutex::new(conflicts),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ProfileRepository for MapRepository {
        async fn fetch(&self, key: &str) -> PortResult<Option<Revision<Profile>>> {
            Ok(self.docs.lock().unwrap().get(key).cloned())
        }

        async fn save(&self, key: &str, profile: &Profile, expected: Option<i64>) -> PortResult<i64> {
            let other_writer = self.interleave.lock().unwrap().take();
            if let Some(other_writer) = other_writer {
                if let Some(doc) = self.docs.lock().unwrap().get_mut(key) {
                    other_writer(&mut doc.value);
                    doc.revision += 1;
                }
            }
            {
                let mut conflicts = self.conflicts.lock().unwrap();
                if *conflicts > 0 {
                    *conflicts -= 1;
                    return Err(PortError::Conflict("simulated".into()));
                }
            }
            let mut docs = self.docs.lock().unwrap();
            let current = docs.get(key).map(|d| d.revision);
            if current != expected {
                return Err(PortError::Conflict("revision mismatch".into()));
            }
            let revision = current.unwrap_or(0) + 1;
            docs.insert(
                key.to_string(),
                Revision {
                    value: profile.clone(),
                    revision,
                },
            );
            *self.saves.lock().unwrap() += 1;
            Ok(revision)
        }

        async fn remove(&self, key: &str) -> PortResult<Option<Profile>> {
            Ok(self.docs.lock().unwrap().remove(key).map(|d| d.value))
        }

        async fn ping(&self) -> PortResult<()> {
            Ok(())
        }
    }

    fn jo() -> ProfilePatch {
        ProfilePatch {
            name: Some("Jo".into()),
            email: Some("jo@x.com".into()),
            ..Default::default()
        }
    }

    fn new_project(title: &str) -> NewProject {
        NewProject {
            title: title.into(),
            description: "Something worth ten characters".into(),
            ..Default::default()
        }
    }

    async fn seeded() -> (Arc<MapRepository>, ProfileStore) {
        let repo = Arc::new(MapRepository::default());
        let store = ProfileStore::new(repo.clone());
        store.upsert_profile(jo()).await.unwrap();
        (repo, store)
    }

    #[tokio::test]
    async fn upsert_creates_then_updates() {
        let store = ProfileStore::new(Arc::new(MapRepository::default()));

        let (created, outcome) = store.upsert_profile(jo()).await.unwrap();
        assert_eq!(outcome, Upserted::Created);
        assert_eq!(created.name, "Jo");

        let (updated, outcome) = store
            .upsert_profile(ProfilePatch {
                name: Some("Jo Two".into()),
                bio: Some("Hello".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(outcome, Upserted::Updated);
        assert_eq!(updated.email, "jo@x.com");
        assert_eq!(store.get_profile().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn list_operations_need_a_profile() {
        let store = ProfileStore::new(Arc::new(MapRepository::default()));
        assert!(matches!(store.list_skills().await, Err(PortError::NotFound(_))));
        assert!(matches!(
            store.add_project(new_project("Atlas")).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(store.delete_profile().await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn failed_mutation_writes_nothing() {
        let (repo, store) = seeded().await;
        store.add_project(new_project("Atlas")).await.unwrap();
        let saves = *repo.saves.lock().unwrap();

        let err = store.delete_project_at(3).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidIndex(ListKind::Projects)));
        assert_eq!(*repo.saves.lock().unwrap(), saves);
        assert_eq!(store.list_projects(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lost_races_are_retried() {
        let repo = Arc::new(MapRepository::default());
        let store = ProfileStore::new(repo.clone());
        store.upsert_profile(jo()).await.unwrap();

        *repo.conflicts.lock().unwrap() = MAX_WRITE_ATTEMPTS - 1;
        let skills = store.add_skill("Rust").await.unwrap();
        assert_eq!(skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn persistent_conflicts_surface_as_conflict() {
        let store = ProfileStore::new(Arc::new(MapRepository::losing(MAX_WRITE_ATTEMPTS)));
        assert!(matches!(
            store.upsert_profile(jo()).await,
            Err(PortError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn project_lifecycle_by_index() {
        let (_, store) = seeded().await;
        let (atlas, projects) = store.add_project(new_project("Atlas")).await.unwrap();
        assert_eq!(projects, vec![atlas.clone()]);

        let (updated, _) = store
            .update_project_at(0, new_project("Atlas Two"))
            .await
            .unwrap();
        assert_eq!(updated.id, atlas.id);

        let (removed, projects) = store.delete_project_at(0).await.unwrap();
        assert_eq!(removed.title, "Atlas Two");
        assert!(projects.is_empty());
    }

    fn drop_first_project(profile: &mut Profile) {
        profile.projects.remove(0);
    }

    fn drop_first_work(profile: &mut Profile) {
        profile.work.remove(0);
    }

    fn titles(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.title.as_str()).collect()
    }

    async fn seeded_with(names: &[&str]) -> (Arc<MapRepository>, ProfileStore) {
        let (repo, store) = seeded().await;
        for name in names {
            store.add_project(new_project(name)).await.unwrap();
        }
        (repo, store)
    }

    #[tokio::test]
    async fn retried_update_follows_the_entry_not_the_index() {
        let (repo, store) = seeded_with(&["Atlas", "Beacon", "Comet"]).await;
        *repo.interleave.lock().unwrap() = Some(drop_first_project);

        let (updated, projects) = store
            .update_project_at(1, new_project("Beacon Two"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Beacon Two");
        assert_eq!(titles(&projects), vec!["Beacon Two", "Comet"]);
        assert_eq!(
            titles(&store.list_projects(None).await.unwrap()),
            vec!["Beacon Two", "Comet"]
        );
    }

    #[tokio::test]
    async fn retried_delete_follows_the_entry_not_the_index() {
        let (repo, store) = seeded_with(&["Atlas", "Beacon", "Comet"]).await;
        *repo.interleave.lock().unwrap() = Some(drop_first_project);

        let (removed, projects) = store.delete_project_at(2).await.unwrap();
        assert_eq!(removed.title, "Comet");
        assert_eq!(titles(&projects), vec!["Beacon"]);
    }

    #[tokio::test]
    async fn entry_removed_by_another_writer_is_a_conflict() {
        let (repo, store) = seeded_with(&["Atlas", "Beacon"]).await;
        *repo.interleave.lock().unwrap() = Some(drop_first_project);

        let err = store
            .update_project_at(0, new_project("Atlas Two"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict(_)));
        assert_eq!(
            titles(&store.list_projects(None).await.unwrap()),
            vec!["Beacon"]
        );
    }

    #[tokio::test]
    async fn retried_work_delete_keeps_its_target() {
        let (repo, store) = seeded().await;
        for company in ["Acme", "Initech"] {
            store
                .add_work(NewWork {
                    company: company.into(),
                    title: "Engineer".into(),
                    duration: "1 year".into(),
                    description: "Shipped things".into(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        *repo.interleave.lock().unwrap() = Some(drop_first_work);

        let (removed, remaining) = store.delete_work_at(1).await.unwrap();
        assert_eq!(removed.company, "Initech");
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn skills_round_trip() {
        let (_, store) = seeded().await;
        store.add_skill("rust").await.unwrap();
        store.add_skill("Go").await.unwrap();
        assert!(matches!(
            store.add_skill("RUST").await,
            Err(PortError::DuplicateSkill(_))
        ));
        assert_eq!(store.list_skills().await.unwrap(), vec!["Go", "rust"]);

        let (removed, remaining) = store.delete_skill("GO").await.unwrap();
        assert_eq!(removed, "Go");
        assert_eq!(remaining, vec!["rust"]);

        let names = vec!["a".to_string(), "A".to_string(), "bb".to_string()];
        assert_eq!(store.replace_skills(&names).await.unwrap(), vec!["bb"]);
    }

    #[tokio::test]
    async fn deleting_the_profile_discards_lists() {
        let (_, store) = seeded().await;
        store.add_skill("Rust").await.unwrap();
        let removed = store.delete_profile().await.unwrap();
        assert_eq!(removed.skills, vec!["Rust"]);
        assert!(matches!(store.get_profile().await, Err(PortError::NotFound(_))));
    }
}
