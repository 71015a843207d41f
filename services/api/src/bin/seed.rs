//! services/api/src/bin/seed.rs
//!
//! Replaces the stored profile with a sample portfolio so the UI has something
//! to show. Uses the same configuration as the server.

use api_lib::{
    adapters::build_repository,
    config::{Config, StoreBackend},
    error::ApiError,
};
use chrono::NaiveDate;
use portfolio_core::domain::{
    NewProject, NewWork, PreferencesPatch, ProfileLinks, ProfilePatch, ProjectLinks, ProjectStatus,
};
use portfolio_core::ports::PortError;
use portfolio_core::store::ProfileStore;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn sample_profile() -> ProfilePatch {
    ProfilePatch {
        name: Some("Sam Rivera".to_string()),
        email: Some("sam.rivera@example.com".to_string()),
        phone: Some("+1 (555) 010-2030".to_string()),
        location: Some("Portland, OR".to_string()),
        bio: Some(
            "Full-stack developer who enjoys building small, fast web services and the tools around them."
                .to_string(),
        ),
        education: Some("BSc in Computer Science".to_string()),
        links: Some(ProfileLinks {
            github: Some("https://github.com/example".to_string()),
            linkedin: Some("https://linkedin.com/in/example".to_string()),
            portfolio: Some("https://example.dev".to_string()),
            twitter: None,
            website: Some("https://example.com".to_string()),
        }),
        preferences: Some(PreferencesPatch {
            public_profile: Some(true),
            show_email: Some(true),
            show_phone: Some(false),
        }),
    }
}

fn sample_skills() -> Vec<String> {
    ["Rust", "TypeScript", "React", "PostgreSQL", "Docker", "Axum", "Git", "AWS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn sample_projects() -> Vec<NewProject> {
    vec![
        NewProject {
            title: "Portfolio API".to_string(),
            description: "A profile management service with CRUD endpoints for projects, work history and skills."
                .to_string(),
            links: ProjectLinks {
                repo: Some("https://github.com/example/portfolio-api".to_string()),
                demo: None,
                live: None,
            },
            skills: vec!["Rust".to_string(), "Axum".to_string(), "PostgreSQL".to_string()],
            status: ProjectStatus::Completed,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 2, 15),
        },
        NewProject {
            title: "Storefront".to_string(),
            description: "An online shop with a product catalog, cart and checkout flow.".to_string(),
            links: ProjectLinks {
                repo: Some("https://github.com/example/storefront".to_string()),
                demo: Some("https://storefront.example.com".to_string()),
                live: None,
            },
            skills: vec!["React".to_string(), "TypeScript".to_string(), "Stripe API".to_string()],
            status: ProjectStatus::Completed,
            start_date: date(2023, 9, 1),
            end_date: date(2023, 12, 20),
        },
        NewProject {
            title: "Team Board".to_string(),
            description: "A collaborative task board with live updates and progress tracking.".to_string(),
            links: ProjectLinks::default(),
            skills: vec!["TypeScript".to_string(), "React".to_string(), "WebSockets".to_string()],
            status: ProjectStatus::InProgress,
            start_date: date(2024, 3, 1),
            end_date: None,
        },
    ]
}

fn sample_work() -> Vec<NewWork> {
    vec![
        NewWork {
            company: "Northwind Labs".to_string(),
            title: "Software Engineer".to_string(),
            duration: "Jan 2023 - Present".to_string(),
            description: "Builds and runs the customer-facing web services and their deployment pipeline."
                .to_string(),
            location: Some("Portland, OR".to_string()),
            start_date: date(2023, 1, 15),
            end_date: None,
            current: true,
        },
        NewWork {
            company: "Contoso".to_string(),
            title: "Frontend Developer Intern".to_string(),
            duration: "Jun 2022 - Dec 2022".to_string(),
            description: "Implemented responsive UI components and cut page load times.".to_string(),
            location: Some("Remote".to_string()),
            start_date: date(2022, 6, 1),
            end_date: date(2022, 12, 31),
            current: false,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    if config.store_backend == StoreBackend::Memory {
        warn!("Seeding the in-memory store; the data disappears when this process exits.");
    }

    let store = ProfileStore::new(build_repository(&config).await?);

    match store.delete_profile().await {
        Ok(_) => info!("Cleared existing profile data"),
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let (profile, _) = store.upsert_profile(sample_profile()).await?;
    let skills = store.replace_skills(&sample_skills()).await?;
    for project in sample_projects() {
        store.add_project(project).await?;
    }
    for work in sample_work() {
        store.add_work(work).await?;
    }

    let projects = store.list_projects(None).await?;
    let work = store.list_work().await?;
    info!(
        name = %profile.name,
        projects = projects.len(),
        work = work.len(),
        skills = skills.len(),
        "Database seeded"
    );
    Ok(())
}
