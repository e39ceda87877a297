use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use coddy_core::{
    config::{Config, WarnLevel},
    types::SubscriptionTier,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show project settings and the active tier
    Show,

    /// Record the active subscription tier
    SetTier {
        /// Free, Creator, Architect, or Visionary (case-sensitive)
        tier: String,
    },

    /// Validate settings.yaml for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::SetTier { tier } => set_tier(root, &tier, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let tier = config.active_tier();

    if json {
        print_json(&serde_json::json!({
            "project": config.project,
            "tier": tier,
            "configured_tier": config.subscription.tier,
            "custom_tier_table": config.tiers.is_some(),
        }))?;
        return Ok(());
    }

    println!("Project:    {}", config.project.name);
    if let Some(desc) = &config.project.description {
        println!("About:      {desc}");
    }
    if config.subscription.tier == tier.as_str() {
        println!("Tier:       {tier}");
    } else {
        println!(
            "Tier:       {tier} (configured '{}' is not a known tier)",
            config.subscription.tier
        );
    }
    let table = if config.tiers.is_some() { "custom" } else { "built-in" };
    println!("Tier table: {table}");
    Ok(())
}

fn set_tier(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let tier: SubscriptionTier = name.parse().with_context(|| {
        format!("valid tiers: {}", SubscriptionTier::names().join(", "))
    })?;
    let mut config = Config::load(root).context("failed to load config")?;
    config.set_tier(tier);
    config.save(root).context("failed to save config")?;

    if json {
        print_json(&serde_json::json!({ "tier": tier }))?;
    } else {
        println!("Subscription tier set to '{tier}'.");
    }
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
