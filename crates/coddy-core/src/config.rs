use crate::error::{CoddyError, Result};
use crate::gate::{tier_by_name, FeatureGate, TierTable};
use crate::paths;
use crate::types::SubscriptionTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig / SubscriptionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Display name of the active tier. Kept as a raw string so a hand-edited
    /// or corrupted value still loads and resolves to `Free`.
    #[serde(default = "default_tier_name")]
    pub tier: String,
}

fn default_tier_name() -> String {
    SubscriptionTier::Free.to_string()
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            tier: default_tier_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
    /// Replaces the built-in tier table when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiers: Option<TierTable>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            subscription: SubscriptionConfig::default(),
            tiers: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CoddyError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, &data)
    }

    pub fn active_tier(&self) -> SubscriptionTier {
        tier_by_name(&self.subscription.tier)
    }

    pub fn set_tier(&mut self, tier: SubscriptionTier) {
        self.subscription.tier = tier.to_string();
    }

    pub fn gate(&self) -> FeatureGate {
        FeatureGate::new(self.tiers.clone().unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.subscription.tier.parse::<SubscriptionTier>().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "unknown tier '{}' in subscription.tier (valid: {}); Free will be used",
                    self.subscription.tier,
                    SubscriptionTier::names().join(", ")
                ),
            });
        }

        if let Some(table) = &self.tiers {
            warnings.extend(table.validate());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
