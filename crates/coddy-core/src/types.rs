use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SubscriptionTier
// ---------------------------------------------------------------------------

/// Subscription level, lowest to highest privilege. Variant order is the
/// canonical tier ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Creator,
    Architect,
    Visionary,
}

impl SubscriptionTier {
    pub fn all() -> &'static [SubscriptionTier] {
        &[
            SubscriptionTier::Free,
            SubscriptionTier::Creator,
            SubscriptionTier::Architect,
            SubscriptionTier::Visionary,
        ]
    }

    /// Canonical display name, also the persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Creator => "Creator",
            SubscriptionTier::Architect => "Architect",
            SubscriptionTier::Visionary => "Visionary",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionTier {
    type Err = crate::error::CoddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::error::CoddyError::InvalidTier(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AiSuggestion,
    ApplyAiEdit,
    FullRefactor,
    AutoTaskPlanning,
    AiSessionSummary,
}

impl Feature {
    pub fn all() -> &'static [Feature] {
        &[
            Feature::AiSuggestion,
            Feature::ApplyAiEdit,
            Feature::FullRefactor,
            Feature::AutoTaskPlanning,
            Feature::AiSessionSummary,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::AiSuggestion => "ai_suggestion",
            Feature::ApplyAiEdit => "apply_ai_edit",
            Feature::FullRefactor => "full_refactor",
            Feature::AutoTaskPlanning => "auto_task_planning",
            Feature::AiSessionSummary => "ai_session_summary",
        }
    }

    /// Human-readable name for upgrade prompts.
    pub fn label(self) -> &'static str {
        match self {
            Feature::AiSuggestion => "AI code suggestion",
            Feature::ApplyAiEdit => "Apply AI edit",
            Feature::FullRefactor => "Full refactor",
            Feature::AutoTaskPlanning => "Auto-plan roadmap",
            Feature::AiSessionSummary => "AI session summary",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Feature {
    type Err = crate::error::CoddyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai_suggestion" | "ai-suggestion" => Ok(Feature::AiSuggestion),
            "apply_ai_edit" | "apply-ai-edit" => Ok(Feature::ApplyAiEdit),
            "full_refactor" | "full-refactor" => Ok(Feature::FullRefactor),
            "auto_task_planning" | "auto-task-planning" => Ok(Feature::AutoTaskPlanning),
            "ai_session_summary" | "ai-session-summary" => Ok(Feature::AiSessionSummary),
            _ => Err(crate::error::CoddyError::InvalidFeature(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
