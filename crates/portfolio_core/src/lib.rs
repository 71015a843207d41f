pub mod domain;
pub mod ports;
pub mod store;

pub use domain::{
    ListKind, NewProject, NewWork, Preferences, PreferencesPatch, Profile, ProfileLinks,
    ProfilePatch, Project, ProjectLinks, ProjectStatus, WorkExperience,
};
pub use ports::{PortError, PortResult, ProfileRepository, Revision, PROFILE_KEY};
pub use store::{ProfileStore, Upserted};
