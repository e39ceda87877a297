use crate::config::{ConfigWarning, WarnLevel};
use crate::types::{Feature, SubscriptionTier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// TierTable
// ---------------------------------------------------------------------------

/// Which features each tier newly unlocks, and the order tiers inherit in.
///
/// Only the per-tier increments are stored; what a tier can actually use is
/// always derived by walking `hierarchy` from the bottom up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Lowest to highest privilege.
    pub hierarchy: Vec<SubscriptionTier>,
    #[serde(default)]
    pub unlocks: BTreeMap<SubscriptionTier, BTreeSet<Feature>>,
}

impl Default for TierTable {
    fn default() -> Self {
        let mut unlocks = BTreeMap::new();
        unlocks.insert(SubscriptionTier::Free, BTreeSet::new());
        unlocks.insert(
            SubscriptionTier::Creator,
            BTreeSet::from([Feature::AiSuggestion, Feature::ApplyAiEdit]),
        );
        unlocks.insert(
            SubscriptionTier::Architect,
            BTreeSet::from([Feature::FullRefactor, Feature::AiSessionSummary]),
        );
        unlocks.insert(
            SubscriptionTier::Visionary,
            BTreeSet::from([Feature::AutoTaskPlanning]),
        );
        Self {
            hierarchy: SubscriptionTier::all().to_vec(),
            unlocks,
        }
    }
}

impl TierTable {
    fn unlocked_at(&self, tier: SubscriptionTier, feature: Feature) -> bool {
        self.unlocks
            .get(&tier)
            .is_some_and(|features| features.contains(&feature))
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. A tier listed twice makes its rank ambiguous
        let mut seen = BTreeSet::new();
        for tier in &self.hierarchy {
            if !seen.insert(*tier) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("tier '{tier}' appears more than once in tiers.hierarchy"),
                });
            }
        }

        // 2. Unlocks for a tier outside the hierarchy can never be reached
        for (tier, features) in &self.unlocks {
            if !self.hierarchy.contains(tier) && !features.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "tier '{tier}' unlocks features but is not in tiers.hierarchy"
                    ),
                });
            }
        }

        // 3. Each feature should be introduced by exactly one tier
        for feature in Feature::all() {
            let owners: Vec<String> = seen
                .iter()
                .filter(|t| self.unlocked_at(**t, *feature))
                .map(|t| t.to_string())
                .collect();
            match owners.len() {
                0 => warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("feature '{feature}' is not unlocked by any tier"),
                }),
                1 => {}
                _ => warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "feature '{feature}' is unlocked by several tiers ({}); \
                         only the lowest one matters",
                        owners.join(", ")
                    ),
                }),
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Entitlement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Entitlement {
    Granted,
    /// `minimum` is `None` when no tier in the table offers the feature.
    UpgradeRequired { minimum: Option<SubscriptionTier> },
}

impl Entitlement {
    pub fn is_granted(&self) -> bool {
        matches!(self, Entitlement::Granted)
    }
}

// ---------------------------------------------------------------------------
// FeatureGate
// ---------------------------------------------------------------------------

/// Answers tier/feature entitlement queries over an immutable [`TierTable`].
///
/// Queries never fail: a tier the table does not know is denied everything.
#[derive(Debug, Clone, Default)]
pub struct FeatureGate {
    table: TierTable,
}

impl FeatureGate {
    pub fn new(table: TierTable) -> Self {
        Self { table }
    }

    fn rank_of(&self, tier: SubscriptionTier) -> Option<usize> {
        let rank = self.table.hierarchy.iter().position(|t| *t == tier);
        if rank.is_none() {
            tracing::error!(tier = %tier, "tier is not part of the tier hierarchy; denying");
        }
        rank
    }

    pub fn is_enabled(&self, tier: SubscriptionTier, feature: Feature) -> bool {
        let Some(rank) = self.rank_of(tier) else {
            return false;
        };
        let enabled = self.table.hierarchy[..=rank]
            .iter()
            .any(|t| self.table.unlocked_at(*t, feature));
        tracing::debug!(tier = %tier, feature = %feature, enabled, "feature gate check");
        enabled
    }

    /// Lowest tier that has `feature`, for "upgrade required" prompts.
    pub fn minimum_tier(&self, feature: Feature) -> Option<SubscriptionTier> {
        self.table
            .hierarchy
            .iter()
            .copied()
            .find(|t| self.table.unlocked_at(*t, feature))
    }

    /// Everything `tier` can use, including what it inherits.
    pub fn enabled_features(&self, tier: SubscriptionTier) -> Vec<Feature> {
        let Some(rank) = self.rank_of(tier) else {
            return Vec::new();
        };
        let below = &self.table.hierarchy[..=rank];
        Feature::all()
            .iter()
            .copied()
            .filter(|f| below.iter().any(|t| self.table.unlocked_at(*t, *f)))
            .collect()
    }

    pub fn check(&self, tier: SubscriptionTier, feature: Feature) -> Entitlement {
        if self.is_enabled(tier, feature) {
            Entitlement::Granted
        } else {
            Entitlement::UpgradeRequired {
                minimum: self.minimum_tier(feature),
            }
        }
    }
}

/// Resolve a persisted tier name. Unknown names fall back to `Free`.
pub fn tier_by_name(name: &str) -> SubscriptionTier {
    match name.parse() {
        Ok(tier) => tier,
        Err(_) => {
            tracing::warn!(tier = %name, "unknown tier name, defaulting to Free");
            SubscriptionTier::Free
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_suggestion_by_tier() {
        let gate = FeatureGate::default();
        assert!(!gate.is_enabled(SubscriptionTier::Free, Feature::AiSuggestion));
        assert!(gate.is_enabled(SubscriptionTier::Creator, Feature::AiSuggestion));
        assert!(gate.is_enabled(SubscriptionTier::Visionary, Feature::AiSuggestion));
    }

    #[test]
    fn free_tier_has_nothing() {
        let gate = FeatureGate::default();
        assert!(gate.enabled_features(SubscriptionTier::Free).is_empty());
    }

    #[test]
    fn each_tier_adds_its_own_features() {
        let gate = FeatureGate::default();
        assert!(!gate.is_enabled(SubscriptionTier::Creator, Feature::FullRefactor));
        assert!(gate.is_enabled(SubscriptionTier::Architect, Feature::FullRefactor));
        assert!(gate.is_enabled(SubscriptionTier::Architect, Feature::AiSessionSummary));
        assert!(!gate.is_enabled(SubscriptionTier::Architect, Feature::AutoTaskPlanning));
        assert_eq!(
            gate.enabled_features(SubscriptionTier::Visionary),
            Feature::all().to_vec()
        );
    }

    #[test]
    fn inheritance_is_monotonic() {
        let gate = FeatureGate::default();
        let tiers = SubscriptionTier::all();
        for feature in Feature::all() {
            for (i, low) in tiers.iter().enumerate() {
                for high in &tiers[i + 1..] {
                    if gate.is_enabled(*low, *feature) {
                        assert!(
                            gate.is_enabled(*high, *feature),
                            "{high} lost {feature} held by {low}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tier_missing_from_table_fails_closed() {
        let mut table = TierTable::default();
        table.hierarchy.retain(|t| *t != SubscriptionTier::Architect);
        let gate = FeatureGate::new(table);

        for feature in Feature::all() {
            assert!(!gate.is_enabled(SubscriptionTier::Architect, *feature));
        }
        assert!(gate.enabled_features(SubscriptionTier::Architect).is_empty());
        // Visionary no longer inherits what only Architect unlocked.
        assert!(!gate.is_enabled(SubscriptionTier::Visionary, Feature::FullRefactor));
        assert!(gate.is_enabled(SubscriptionTier::Visionary, Feature::ApplyAiEdit));
    }

    #[test]
    fn minimum_tier_for_upgrade_prompt() {
        let gate = FeatureGate::default();
        assert_eq!(
            gate.minimum_tier(Feature::AutoTaskPlanning),
            Some(SubscriptionTier::Visionary)
        );
        assert_eq!(
            gate.minimum_tier(Feature::AiSessionSummary),
            Some(SubscriptionTier::Architect)
        );
        assert_eq!(
            gate.check(SubscriptionTier::Creator, Feature::AiSessionSummary),
            Entitlement::UpgradeRequired {
                minimum: Some(SubscriptionTier::Architect)
            }
        );
        assert!(gate
            .check(SubscriptionTier::Creator, Feature::ApplyAiEdit)
            .is_granted());
    }

    #[test]
    fn custom_table_without_a_feature() {
        let mut table = TierTable::default();
        table.unlocks.remove(&SubscriptionTier::Visionary);
        let gate = FeatureGate::new(table);
        assert_eq!(gate.minimum_tier(Feature::AutoTaskPlanning), None);
        assert_eq!(
            gate.check(SubscriptionTier::Visionary, Feature::AutoTaskPlanning),
            Entitlement::UpgradeRequired { minimum: None }
        );
    }

    #[test]
    fn tier_by_name_exact_match() {
        assert_eq!(tier_by_name("Creator"), SubscriptionTier::Creator);
        assert_eq!(tier_by_name("Visionary"), SubscriptionTier::Visionary);
    }

    #[test]
    fn tier_by_name_falls_back_to_free() {
        assert_eq!(tier_by_name("creator"), SubscriptionTier::Free);
        assert_eq!(tier_by_name("Platinum"), SubscriptionTier::Free);
        assert_eq!(tier_by_name(""), SubscriptionTier::Free);
    }

    #[test]
    fn default_table_is_clean() {
        assert!(TierTable::default().validate().is_empty());
    }

    #[test]
    fn validate_reports_table_problems() {
        let mut table = TierTable::default();
        table.hierarchy = vec![
            SubscriptionTier::Free,
            SubscriptionTier::Creator,
            SubscriptionTier::Creator,
            SubscriptionTier::Visionary,
        ];
        table
            .unlocks
            .get_mut(&SubscriptionTier::Visionary)
            .unwrap()
            .insert(Feature::AiSuggestion);

        let warnings = table.validate();
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();

        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("more than once")));
        assert!(messages
            .iter()
            .any(|m| m.contains("'Architect' unlocks features but is not in")));
        assert!(messages
            .iter()
            .any(|m| m.contains("'ai_suggestion' is unlocked by several tiers")));
        assert!(messages
            .iter()
            .any(|m| m.contains("'full_refactor' is not unlocked by any tier")));
    }

    #[test]
    fn table_yaml_roundtrip() {
        let table = TierTable::default();
        let yaml = serde_yaml::to_string(&table).unwrap();
        assert!(yaml.contains("Creator"));
        assert!(yaml.contains("ai_suggestion"));
        let parsed: TierTable = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn table_from_hand_written_yaml() {
        let yaml = "\
hierarchy: [Free, Visionary]
unlocks:
  Visionary: [ai_suggestion, auto_task_planning]
";
        let gate = FeatureGate::new(serde_yaml::from_str(yaml).unwrap());
        assert!(gate.is_enabled(SubscriptionTier::Visionary, Feature::AutoTaskPlanning));
        assert!(!gate.is_enabled(SubscriptionTier::Free, Feature::AiSuggestion));
        assert!(!gate.is_enabled(SubscriptionTier::Creator, Feature::AiSuggestion));
    }
}
