//! crates/portfolio_core/src/domain.rs
//!
//! The profile aggregate: the single `Profile` document and the lists it owns.
//!
//! Everything here is pure. The rules for merging a profile update, keeping the
//! skill list unique, and addressing projects and work entries by position live
//! on the types themselves so that every storage adapter gets them for free.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ports::{PortError, PortResult};

/// Shortest skill name accepted, counted in characters after trimming.
pub const MIN_SKILL_LEN: usize = 2;

//=========================================================================================
// Profile
//=========================================================================================

/// The portfolio owner's profile together with its embedded collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    #[serde(default)]
    pub links: ProfileLinks,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub work: Vec<WorkExperience>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Social and personal site links. Every link is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub public_profile: bool,
    pub show_email: bool,
    pub show_phone: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            public_profile: true,
            show_email: true,
            show_phone: false,
        }
    }
}

/// A partial update of the preference flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub public_profile: Option<bool>,
    pub show_email: Option<bool>,
    pub show_phone: Option<bool>,
}

/// The fields a create-or-update request may carry.
///
/// `None` leaves the stored value untouched. For optional text fields an empty
/// string clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub links: Option<ProfileLinks>,
    pub preferences: Option<PreferencesPatch>,
}

/// Overwrites `slot` when `value` is supplied; an empty value clears it.
fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = if value.is_empty() { None } else { Some(value) };
    }
}

impl ProfileLinks {
    /// Merges `patch` into these links one key at a time.
    pub fn merge(&mut self, patch: ProfileLinks) {
        overlay(&mut self.github, patch.github);
        overlay(&mut self.linkedin, patch.linkedin);
        overlay(&mut self.portfolio, patch.portfolio);
        overlay(&mut self.twitter, patch.twitter);
        overlay(&mut self.website, patch.website);
    }
}

impl Preferences {
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(value) = patch.public_profile {
            self.public_profile = value;
        }
        if let Some(value) = patch.show_email {
            self.show_email = value;
        }
        if let Some(value) = patch.show_phone {
            self.show_phone = value;
        }
    }
}

impl Profile {
    /// Builds a brand new profile from a patch. `name` and `email` are mandatory,
    /// every list starts empty.
    pub fn create(patch: ProfilePatch, now: DateTime<Utc>) -> PortResult<Self> {
        let name = patch.name.clone().filter(|n| !n.is_empty()).ok_or(PortError::Validation {
            field: "name",
            message: "Name is required to create a profile".to_string(),
        })?;
        let email = patch.email.clone().filter(|e| !e.is_empty()).ok_or(PortError::Validation {
            field: "email",
            message: "Email is required to create a profile".to_string(),
        })?;

        let mut profile = Self {
            name,
            email,
            phone: None,
            location: None,
            bio: None,
            education: None,
            links: ProfileLinks::default(),
            preferences: Preferences::default(),
            skills: Vec::new(),
            projects: Vec::new(),
            work: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        profile.apply(patch);
        Ok(profile)
    }

    /// Merges a patch into the profile. Skills, projects and work are never
    /// touched here.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name.filter(|n| !n.is_empty()) {
            self.name = name;
        }
        if let Some(email) = patch.email.filter(|e| !e.is_empty()) {
            self.email = email;
        }
        overlay(&mut self.phone, patch.phone);
        overlay(&mut self.location, patch.location);
        overlay(&mut self.bio, patch.bio);
        overlay(&mut self.education, patch.education);
        if let Some(links) = patch.links {
            self.links.merge(links);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences.merge(preferences);
        }
    }

    // --- Skills ---

    /// The skill list in ascending order.
    pub fn sorted_skills(&self) -> Vec<String> {
        let mut skills = self.skills.clone();
        skills.sort();
        skills
    }

    fn skill_position(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.skills.iter().position(|s| s.to_lowercase() == needle)
    }

    pub fn add_skill(&mut self, name: &str) -> PortResult<()> {
        if self.skill_position(name).is_some() {
            return Err(PortError::DuplicateSkill(name.to_string()));
        }
        self.skills.push(name.to_string());
        self.skills.sort();
        Ok(())
    }

    /// Removes the skill matching `name` case-insensitively and returns the
    /// stored spelling.
    pub fn remove_skill(&mut self, name: &str) -> PortResult<String> {
        let index = self
            .skill_position(name)
            .ok_or_else(|| PortError::NotFound("Skill not found".to_string()))?;
        Ok(self.skills.remove(index))
    }

    pub fn replace_skills(&mut self, names: &[String]) {
        self.skills = normalize_skills(names);
    }

    // --- Projects ---

    /// Projects having at least one skill that contains `filter`, ignoring case.
    /// A missing or blank filter selects every project.
    pub fn projects_with_skill(&self, filter: Option<&str>) -> Vec<Project> {
        match filter.map(str::trim).filter(|f| !f.is_empty()) {
            None => self.projects.clone(),
            Some(filter) => {
                let needle = filter.to_lowercase();
                self.projects
                    .iter()
                    .filter(|p| p.skills.iter().any(|s| s.to_lowercase().contains(&needle)))
                    .cloned()
                    .collect()
            }
        }
    }

    /// Free-text search over project titles and descriptions. A blank query
    /// matches nothing.
    pub fn search_projects(&self, query: &str) -> Vec<Project> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.projects
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn replace_project(&mut self, index: usize, project: NewProject) -> PortResult<Project> {
        let slot = self
            .projects
            .get_mut(index)
            .ok_or(PortError::InvalidIndex(ListKind::Projects))?;
        *slot = Project::with_id(slot.id, project);
        Ok(slot.clone())
    }

    pub fn remove_project(&mut self, index: usize) -> PortResult<Project> {
        if index >= self.projects.len() {
            return Err(PortError::InvalidIndex(ListKind::Projects));
        }
        Ok(self.projects.remove(index))
    }

    // --- Work experience ---

    pub fn replace_work(&mut self, index: usize, work: NewWork) -> PortResult<WorkExperience> {
        let slot = self
            .work
            .get_mut(index)
            .ok_or(PortError::InvalidIndex(ListKind::Work))?;
        *slot = WorkExperience::with_id(slot.id, work);
        Ok(slot.clone())
    }

    pub fn remove_work(&mut self, index: usize) -> PortResult<WorkExperience> {
        if index >= self.work.len() {
            return Err(PortError::InvalidIndex(ListKind::Work));
        }
        Ok(self.work.remove(index))
    }
}

/// Trims every candidate, drops the ones that are too short, and keeps only the
/// first spelling of names that collide case-insensitively. The result is sorted.
pub fn normalize_skills(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut skills: Vec<String> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| name.chars().count() >= MIN_SKILL_LEN)
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect();
    skills.sort();
    skills
}

//=========================================================================================
// Embedded lists
//=========================================================================================

/// Names the positional list an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Projects,
    Work,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Projects => f.write_str("project"),
            ListKind::Work => f.write_str("work experience"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Completed,
    InProgress,
    Planned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProjectLinks {
    pub repo: Option<String>,
    pub demo: Option<String>,
    pub live: Option<String>,
}

/// A portfolio project. Addressed by its position in `Profile::projects`; the
/// `id` only keeps an entry recognisable across updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// The client-supplied content of a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub links: ProjectLinks,
    pub skills: Vec<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Project {
    pub fn new(project: NewProject) -> Self {
        Self::with_id(Uuid::new_v4(), project)
    }

    pub fn with_id(id: Uuid, project: NewProject) -> Self {
        Self {
            id,
            title: project.title,
            description: project.description,
            links: project.links,
            skills: project.skills,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub company: String,
    pub title: String,
    pub duration: String,
    pub description: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWork {
    pub company: String,
    pub title: String,
    pub duration: String,
    pub description: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
}

impl WorkExperience {
    pub fn new(work: NewWork) -> Self {
        Self::with_id(Uuid::new_v4(), work)
    }

    pub fn with_id(id: Uuid, work: NewWork) -> Self {
        Self {
            id,
            company: work.company,
            title: work.title,
            duration: work.duration,
            description: work.description,
            location: work.location.filter(|l| !l.is_empty()),
            start_date: work.start_date,
            end_date: work.end_date,
            current: work.current,
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn jo() -> Profile {
        Profile::create(
            ProfilePatch {
                name: Some("Jo".into()),
                email: Some("jo@x.com".into()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn project(title: &str, skills: &[&str]) -> Project {
        Project::new(NewProject {
            title: title.into(),
            description: format!("{title} is a long enough description"),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn create_requires_name_and_email() {
        let err = Profile::create(
            ProfilePatch {
                name: Some("Jo".into()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, PortError::Validation { field: "email", .. }));
    }

    #[test]
    fn create_starts_with_empty_lists_and_default_preferences() {
        let profile = jo();
        assert!(profile.skills.is_empty());
        assert!(profile.projects.is_empty());
        assert!(profile.work.is_empty());
        assert_eq!(profile.preferences, Preferences::default());
        assert_eq!(profile.links, ProfileLinks::default());
    }

    #[test]
    fn apply_merges_links_and_preferences_per_key() {
        let mut profile = jo();
        profile.apply(ProfilePatch {
            links: Some(ProfileLinks {
                github: Some("https://github.com/jo".into()),
                website: Some("https://jo.dev".into()),
                ..Default::default()
            }),
            preferences: Some(PreferencesPatch {
                show_phone: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        profile.apply(ProfilePatch {
            links: Some(ProfileLinks {
                website: Some(String::new()),
                twitter: Some("@jo".into()),
                ..Default::default()
            }),
            preferences: Some(PreferencesPatch {
                public_profile: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(profile.links.github.as_deref(), Some("https://github.com/jo"));
        assert_eq!(profile.links.twitter.as_deref(), Some("@jo"));
        assert_eq!(profile.links.website, None);
        assert!(!profile.preferences.public_profile);
        assert!(profile.preferences.show_email);
        assert!(profile.preferences.show_phone);
    }

    #[test]
    fn apply_keeps_lists_and_omitted_scalars() {
        let mut profile = jo();
        profile.bio = Some("Builder".into());
        profile.add_skill("Rust").unwrap();
        profile.projects.push(project("Atlas", &["Rust"]));

        profile.apply(ProfilePatch {
            name: Some("Jo Two".into()),
            email: Some("two@x.com".into()),
            ..Default::default()
        });

        assert_eq!(profile.name, "Jo Two");
        assert_eq!(profile.bio.as_deref(), Some("Builder"));
        assert_eq!(profile.skills, vec!["Rust"]);
        assert_eq!(profile.projects.len(), 1);
    }

    #[test]
    fn add_skill_rejects_case_insensitive_duplicates() {
        let mut profile = jo();
        profile.add_skill("go").unwrap();
        let err = profile.add_skill("GO").unwrap_err();
        assert!(matches!(err, PortError::DuplicateSkill(_)));
        assert_eq!(profile.skills, vec!["go"]);
    }

    #[test]
    fn skills_stay_sorted() {
        let mut profile = jo();
        for skill in ["TypeScript", "Go", "Python", "C#"] {
            profile.add_skill(skill).unwrap();
        }
        assert_eq!(profile.sorted_skills(), vec!["C#", "Go", "Python", "TypeScript"]);
    }

    #[test]
    fn remove_skill_matches_ignoring_case() {
        let mut profile = jo();
        profile.add_skill("Docker").unwrap();
        assert_eq!(profile.remove_skill("docker").unwrap(), "Docker");
        assert!(matches!(
            profile.remove_skill("docker"),
            Err(PortError::NotFound(_))
        ));
    }

    #[test]
    fn normalize_skills_trims_filters_and_dedups() {
        let input: Vec<String> = ["a", "A", "bb", "  Rust ", "rust", "Go", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(normalize_skills(&input), vec!["Go", "Rust", "bb"]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut profile = jo();
        profile.projects.push(project("Atlas", &[]));
        let before = profile.projects.clone();

        let err = profile.remove_project(1).unwrap_err();
        assert!(matches!(err, PortError::InvalidIndex(ListKind::Projects)));
        let err = profile
            .replace_project(5, NewProject::default())
            .unwrap_err();
        assert!(matches!(err, PortError::InvalidIndex(ListKind::Projects)));
        assert_eq!(profile.projects, before);

        assert!(matches!(
            profile.remove_work(0),
            Err(PortError::InvalidIndex(ListKind::Work))
        ));
    }

    #[test]
    fn replace_project_keeps_the_entry_id() {
        let mut profile = jo();
        profile.projects.push(project("Atlas", &[]));
        let id = profile.projects[0].id;

        let updated = profile
            .replace_project(
                0,
                NewProject {
                    title: "Atlas v2".into(),
                    description: "Rewritten from scratch".into(),
                    status: ProjectStatus::InProgress,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(profile.projects[0].title, "Atlas v2");
        assert_eq!(profile.projects[0].status, ProjectStatus::InProgress);
    }

    #[test]
    fn deleting_only_project_empties_the_list() {
        let mut profile = jo();
        let atlas = project("Atlas", &[]);
        profile.projects.push(atlas.clone());
        assert_eq!(profile.remove_project(0).unwrap(), atlas);
        assert!(profile.projects.is_empty());
    }

    #[test]
    fn skill_filter_is_a_case_insensitive_substring_match() {
        let mut profile = jo();
        profile.projects.push(project("Shop", &["React", "Node.js"]));
        profile.projects.push(project("Cli", &["Rust"]));
        profile.projects.push(project("Native", &["react-native"]));

        let titles = |ps: Vec<Project>| ps.into_iter().map(|p| p.title).collect::<Vec<_>>();
        assert_eq!(titles(profile.projects_with_skill(Some("REACT"))), vec!["Shop", "Native"]);
        assert_eq!(profile.projects_with_skill(None).len(), 3);
        assert_eq!(profile.projects_with_skill(Some("  ")).len(), 3);
    }

    #[test]
    fn search_matches_title_or_description_and_ignores_blank_queries() {
        let mut profile = jo();
        profile.projects.push(project("Shop", &[]));
        profile.projects.push(project("Ledger", &[]));
        profile.projects.push(project("Tracker", &[]));

        assert!(profile.search_projects("").is_empty());
        assert!(profile.search_projects("   ").is_empty());
        assert_eq!(profile.search_projects("LEDGER").len(), 1);
        assert_eq!(profile.search_projects("description").len(), 3);
    }

    #[test]
    fn profile_serializes_with_camel_case_keys() {
        let mut profile = jo();
        profile.projects.push(Project::new(NewProject {
            title: "Atlas".into(),
            description: "A mapping tool for teams".into(),
            status: ProjectStatus::InProgress,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        }));

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["preferences"]["publicProfile"], true);
        assert_eq!(json["projects"][0]["status"], "in-progress");
        assert_eq!(json["projects"][0]["startDate"], "2024-03-01");
        assert!(json.get("createdAt").is_some());
    }
}
