use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coaching-tip category, one per scoring factor plus a general bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Safety,
    Compliance,
    Performance,
    General,
}

impl std::fmt::Display for TipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TipCategory::Safety => "safety",
            TipCategory::Compliance => "compliance",
            TipCategory::Performance => "performance",
            TipCategory::General => "general",
        };
        write!(f, "{}", s)
    }
}

/// Tip priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TipPriority {
    High,
    Medium,
    Low,
}

impl TipPriority {
    /// Ordering rank, higher wins candidate selection.
    pub fn rank(&self) -> u8 {
        match self {
            TipPriority::High => 3,
            TipPriority::Medium => 2,
            TipPriority::Low => 1,
        }
    }
}

impl std::fmt::Display for TipPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TipPriority::High => "high",
            TipPriority::Medium => "medium",
            TipPriority::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Structured next-step action attached to a tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipAction {
    pub action_type: String,
    pub data: serde_json::Value,
}

/// Scoring snapshot carried by the inbound event and echoed on the tip.
///
/// Factor scores are 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSnapshot {
    pub total: f64,
    pub safety: f64,
    pub compliance: f64,
    pub performance: f64,
}

/// A generated coaching tip. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoachTip {
    /// Unique tip identifier
    pub id: String,
    /// Parent plan the tip was generated for
    pub plan_id: String,
    /// Owning user
    pub user_id: String,
    pub category: TipCategory,
    pub priority: TipPriority,
    pub message: String,
    pub action: TipAction,
    pub scoring: ScoringSnapshot,
    pub generated_at: DateTime<Utc>,
    /// Fixed at generation time, never recomputed
    pub expires_at: DateTime<Utc>,
}

/// A tip as persisted, with its storage timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredCoachTip {
    #[serde(flatten)]
    pub tip: CoachTip,
    pub stored_at: DateTime<Utc>,
}

impl StoredCoachTip {
    /// Expiry is computed at read time, never persisted.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.tip.expires_at
    }
}

/// Store-wide counts for the diagnostics endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipStats {
    pub total_tips: usize,
    pub expired_tips: usize,
    pub active_tips: usize,
    pub timestamp: DateTime<Utc>,
}

/// Result of a cleanup sweep
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    pub cleaned_count: usize,
    pub timestamp: DateTime<Utc>,
}
