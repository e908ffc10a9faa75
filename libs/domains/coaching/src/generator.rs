//! Deterministic coach-tip generation.
//!
//! One tip at most per event. Rules fire independently per scoring factor;
//! the highest-priority candidate wins, ties broken by how far the score
//! sits below its threshold. No scoring snapshot means no tip at all, which
//! is distinct from "scores present but nothing to improve" (fallback tip).

use crate::events::WebhookEvent;
use crate::models::{CoachTip, ScoringSnapshot, TipAction, TipCategory, TipPriority};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

const SAFETY_THRESHOLD: f64 = 70.0;
const COMPLIANCE_THRESHOLD: f64 = 75.0;
const PERFORMANCE_THRESHOLD: f64 = 60.0;
const TOTAL_THRESHOLD: f64 = 65.0;

/// Tip validity window, fixed at generation time.
const TIP_TTL_DAYS: i64 = 7;

struct Candidate {
    category: TipCategory,
    priority: TipPriority,
    message: String,
    action_type: &'static str,
    action_data: serde_json::Value,
    improvement_potential: f64,
}

/// Generate zero or one tip for an event.
pub fn generate_tip(event: &WebhookEvent) -> Option<CoachTip> {
    generate_tip_at(event, Utc::now())
}

/// Generation with an explicit clock, for deterministic tests.
pub fn generate_tip_at(event: &WebhookEvent, now: DateTime<Utc>) -> Option<CoachTip> {
    let scoring = event.scoring.as_ref()?;

    let candidate = evaluate_rules(scoring)
        .into_iter()
        .max_by(|a, b| {
            (a.priority.rank(), a.improvement_potential)
                .partial_cmp(&(b.priority.rank(), b.improvement_potential))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(|| fallback(scoring));

    Some(CoachTip {
        id: Uuid::new_v4().to_string(),
        plan_id: event.plan_id.clone(),
        user_id: event.user_id.clone(),
        category: candidate.category,
        priority: candidate.priority,
        message: candidate.message,
        action: TipAction {
            action_type: candidate.action_type.to_string(),
            data: candidate.action_data,
        },
        scoring: *scoring,
        generated_at: now,
        expires_at: now + Duration::days(TIP_TTL_DAYS),
    })
}

fn evaluate_rules(scoring: &ScoringSnapshot) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    if scoring.safety < SAFETY_THRESHOLD {
        candidates.push(Candidate {
            category: TipCategory::Safety,
            priority: TipPriority::High,
            message: format!(
                "Your safety score is {:.0}. Review your form and recovery before the next session.",
                scoring.safety
            ),
            action_type: "review_safety",
            action_data: serde_json::json!({ "score": scoring.safety }),
            improvement_potential: SAFETY_THRESHOLD - scoring.safety,
        });
    }

    if scoring.compliance < COMPLIANCE_THRESHOLD {
        candidates.push(Candidate {
            category: TipCategory::Compliance,
            priority: TipPriority::High,
            message: format!(
                "Your compliance score is {:.0}. Adjusting your schedule could help you stay on plan.",
                scoring.compliance
            ),
            action_type: "adjust_schedule",
            action_data: serde_json::json!({ "score": scoring.compliance }),
            improvement_potential: COMPLIANCE_THRESHOLD - scoring.compliance,
        });
    }

    if scoring.performance < PERFORMANCE_THRESHOLD {
        candidates.push(Candidate {
            category: TipCategory::Performance,
            priority: TipPriority::Medium,
            message: format!(
                "Your performance score is {:.0}. Consider increasing session intensity gradually.",
                scoring.performance
            ),
            action_type: "increase_intensity",
            action_data: serde_json::json!({ "score": scoring.performance }),
            improvement_potential: PERFORMANCE_THRESHOLD - scoring.performance,
        });
    }

    if scoring.total < TOTAL_THRESHOLD {
        candidates.push(Candidate {
            category: TipCategory::General,
            priority: TipPriority::Medium,
            message: format!(
                "Your overall score is {:.0}. A plan review with your coach could get you back on track.",
                scoring.total
            ),
            action_type: "review_plan",
            action_data: serde_json::json!({ "score": scoring.total }),
            improvement_potential: TOTAL_THRESHOLD - scoring.total,
        });
    }

    candidates
}

fn fallback(scoring: &ScoringSnapshot) -> Candidate {
    Candidate {
        category: TipCategory::General,
        priority: TipPriority::Low,
        message: "Great work! Keep up your current routine.".to_string(),
        action_type: "keep_going",
        action_data: serde_json::json!({ "score": scoring.total }),
        improvement_potential: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_scoring(scoring: Option<ScoringSnapshot>) -> WebhookEvent {
        WebhookEvent {
            event_id: "evt-1".to_string(),
            event_type: "session.scored".to_string(),
            vendor: "garmin".to_string(),
            user_id: "user-1".to_string(),
            plan_id: "plan-1".to_string(),
            occurred_at: Utc::now(),
            scoring,
        }
    }

    fn scoring(total: f64, safety: f64, compliance: f64, performance: f64) -> ScoringSnapshot {
        ScoringSnapshot {
            total,
            safety,
            compliance,
            performance,
        }
    }

    #[test]
    fn test_low_compliance_wins() {
        // safety 95 and performance 70 fire nothing; compliance 45 fires high.
        let event = event_with_scoring(Some(scoring(70.0, 95.0, 45.0, 70.0)));
        let tip = generate_tip(&event).unwrap();

        assert_eq!(tip.category, TipCategory::Compliance);
        assert_eq!(tip.priority, TipPriority::High);
        assert_eq!(tip.action.action_type, "adjust_schedule");
    }

    #[test]
    fn test_missing_scoring_produces_no_tip() {
        let event = event_with_scoring(None);
        assert!(generate_tip(&event).is_none());
    }

    #[test]
    fn test_good_scores_produce_fallback() {
        let event = event_with_scoring(Some(scoring(90.0, 95.0, 90.0, 85.0)));
        let tip = generate_tip(&event).unwrap();

        assert_eq!(tip.category, TipCategory::General);
        assert_eq!(tip.priority, TipPriority::Low);
        assert_eq!(tip.action.action_type, "keep_going");
    }

    #[test]
    fn test_priority_dominates_improvement_potential() {
        // performance (medium) is 40 below threshold; safety (high) only 5 below.
        let event = event_with_scoring(Some(scoring(80.0, 65.0, 90.0, 20.0)));
        let tip = generate_tip(&event).unwrap();

        assert_eq!(tip.category, TipCategory::Safety);
        assert_eq!(tip.priority, TipPriority::High);
    }

    #[test]
    fn test_tie_broken_by_improvement_potential() {
        // safety 65 (5 below 70) and compliance 40 (35 below 75) are both high.
        let event = event_with_scoring(Some(scoring(80.0, 65.0, 40.0, 90.0)));
        let tip = generate_tip(&event).unwrap();

        assert_eq!(tip.category, TipCategory::Compliance);
    }

    #[test]
    fn test_expiry_is_seven_days_from_generation() {
        let now = Utc::now();
        let event = event_with_scoring(Some(scoring(90.0, 95.0, 90.0, 85.0)));
        let tip = generate_tip_at(&event, now).unwrap();

        assert_eq!(tip.generated_at, now);
        assert_eq!(tip.expires_at, now + Duration::days(7));
    }
}
