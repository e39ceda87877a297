use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use coddy_core::{
    config::Config,
    gate::{Entitlement, FeatureGate},
    types::{Feature, SubscriptionTier},
    CoddyError,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum GateSubcommand {
    /// Check one feature; exits non-zero when an upgrade is required
    Check {
        /// Feature name, e.g. ai_suggestion or auto_task_planning
        feature: String,
        /// Check this tier instead of the configured one
        #[arg(long)]
        tier: Option<String>,
    },
    /// List every feature with its minimum tier
    List {
        /// List for this tier instead of the configured one
        #[arg(long)]
        tier: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: GateSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GateSubcommand::Check { feature, tier } => check(root, &feature, tier.as_deref(), json),
        GateSubcommand::List { tier } => list(root, tier.as_deref(), json),
    }
}

/// The gate and tier to evaluate: settings when initialized, otherwise the
/// built-in table and `Free`. An explicit `--tier` must be a valid name.
fn resolve(root: &Path, tier: Option<&str>) -> anyhow::Result<(FeatureGate, SubscriptionTier)> {
    let config = match Config::load(root) {
        Ok(config) => Some(config),
        Err(CoddyError::NotInitialized) => None,
        Err(e) => return Err(e).context("failed to load settings.yaml"),
    };

    let tier = match tier {
        Some(name) => name.parse().with_context(|| {
            format!(
                "invalid --tier; valid: {}",
                SubscriptionTier::names().join(", ")
            )
        })?,
        None => config
            .as_ref()
            .map(Config::active_tier)
            .unwrap_or_default(),
    };
    let gate = config.as_ref().map(Config::gate).unwrap_or_default();
    Ok((gate, tier))
}

fn check(root: &Path, feature: &str, tier: Option<&str>, json: bool) -> anyhow::Result<()> {
    let feature: Feature = feature.parse().with_context(|| {
        let names: Vec<&str> = Feature::all().iter().map(|f| f.as_str()).collect();
        format!("valid features: {}", names.join(", "))
    })?;
    let (gate, tier) = resolve(root, tier)?;
    let entitlement = gate.check(tier, feature);

    if json {
        print_json(&serde_json::json!({
            "feature": feature,
            "tier": tier,
            "entitlement": entitlement,
        }))?;
    } else if entitlement.is_granted() {
        println!("'{}' is available on the {tier} tier.", feature.label());
    }

    match entitlement {
        Entitlement::Granted => Ok(()),
        Entitlement::UpgradeRequired {
            minimum: Some(minimum),
        } => anyhow::bail!(
            "upgrade required: '{}' is available for {minimum}+ subscribers (current tier: {tier})",
            feature.label()
        ),
        Entitlement::UpgradeRequired { minimum: None } => anyhow::bail!(
            "'{}' is not offered by any tier in this project's tier table",
            feature.label()
        ),
    }
}

fn list(root: &Path, tier: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (gate, tier) = resolve(root, tier)?;
    let enabled = gate.enabled_features(tier);

    if json {
        let features: Vec<serde_json::Value> = Feature::all()
            .iter()
            .map(|f| {
                serde_json::json!({
                    "feature": f,
                    "label": f.label(),
                    "minimum_tier": gate.minimum_tier(*f),
                    "enabled": enabled.contains(f),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "tier": tier, "features": features }))?;
        return Ok(());
    }

    println!("Tier: {tier}");
    println!();
    let rows: Vec<Vec<String>> = Feature::all()
        .iter()
        .map(|f| {
            vec![
                f.as_str().to_string(),
                f.label().to_string(),
                gate.minimum_tier(*f)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                if enabled.contains(f) { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["FEATURE", "NAME", "MIN TIER", "ENABLED"], rows);
    Ok(())
}
