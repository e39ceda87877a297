use crate::output::print_json;
use anyhow::Context;
use coddy_core::{
    config::Config,
    io, paths,
    roadmap::{Phase, RoadmapDocument, Task},
    types::SubscriptionTier,
};
use std::path::Path;

pub fn run(root: &Path, tier: Option<&str>, json: bool) -> anyhow::Result<()> {
    let tier: SubscriptionTier = match tier {
        Some(name) => name.parse().with_context(|| {
            format!(
                "invalid --tier; valid: {}",
                SubscriptionTier::names().join(", ")
            )
        })?,
        None => SubscriptionTier::Free,
    };

    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    let config_created = if paths::config_path(root).exists() {
        false
    } else {
        let mut cfg = Config::new(&project_name);
        cfg.set_tier(tier);
        cfg.save(root).context("failed to write settings.yaml")?;
        true
    };

    let roadmap = starter_roadmap(&project_name);
    let roadmap_created =
        io::create_new(&paths::roadmap_path(root), &roadmap.render())
            .context("failed to write roadmap.md")?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": config_created,
            "roadmap_created": roadmap_created,
        }))?;
        return Ok(());
    }

    println!("Initializing coddy in: {}", root.display());
    println!(
        "  {} {}",
        if config_created { "created:" } else { "exists: " },
        paths::CONFIG_FILE
    );
    println!(
        "  {} {}",
        if roadmap_created { "created:" } else { "exists: " },
        paths::ROADMAP_FILE
    );
    Ok(())
}

fn starter_roadmap(project_name: &str) -> RoadmapDocument {
    let mut setup = Phase::new("Phase 1: Core Setup & Foundation");
    setup.tasks = vec![
        Task::new("Set up basic project structure"),
        Task::new("Write the README"),
    ];
    let mut build = Phase::new("Phase 2: Core Feature Implementation");
    build.tasks = vec![Task::new("Implement the first core feature")];

    RoadmapDocument {
        preamble: format!("# {project_name} Roadmap\n"),
        phases: vec![setup, build],
    }
}
