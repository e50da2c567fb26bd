//! Decision value objects

use serde::{Deserialize, Serialize};

/// Recommendation for a matched pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Proceed,
    #[default]
    MoreInfo,
    NotAFit,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Proceed => "proceed",
            DecisionKind::MoreInfo => "more_info",
            DecisionKind::NotAFit => "not_a_fit",
        }
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "proceed" => Ok(DecisionKind::Proceed),
            "more_info" | "needs_more_info" => Ok(DecisionKind::MoreInfo),
            "not_a_fit" | "not_fit" | "reject" => Ok(DecisionKind::NotAFit),
            _ => Err(format!(
                "Unknown decision: {}. Valid: proceed, more_info, not_a_fit",
                s
            )),
        }
    }
}

/// A decision with rationale and confidence.
///
/// Used both for the reviewer's advisory proposal and for the final,
/// gated decision.
///
/// # Example
///
/// ```
/// use matchmaker_domain::assessment::{Decision, DecisionKind};
///
/// let d = Decision::new(DecisionKind::Proceed, "Strong overlap", 1.4);
/// assert_eq!(d.confidence, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: DecisionKind,
    pub rationale: String,
    pub confidence: f64,
}

impl Decision {
    /// Create a decision; confidence is clamped to [0, 1]
    pub fn new(decision: DecisionKind, rationale: impl Into<String>, confidence: f64) -> Self {
        Self {
            decision,
            rationale: rationale.into(),
            confidence: clamp_confidence(confidence),
        }
    }

    /// Conservative stand-in used when no usable reviewer output exists
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::new(DecisionKind::MoreInfo, reason, 0.3)
    }
}

/// Advisory decision returned by the reviewer, before gating
pub type ProposedDecision = Decision;

/// Clamp to [0, 1]; NaN maps to 0
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision_kind() {
        assert_eq!("proceed".parse::<DecisionKind>().ok(), Some(DecisionKind::Proceed));
        assert_eq!("More Info".parse::<DecisionKind>().ok(), Some(DecisionKind::MoreInfo));
        assert_eq!("not-a-fit".parse::<DecisionKind>().ok(), Some(DecisionKind::NotAFit));
        assert!("maybe".parse::<DecisionKind>().is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Decision::new(DecisionKind::Proceed, "", -0.2).confidence, 0.0);
        assert_eq!(Decision::new(DecisionKind::Proceed, "", f64::NAN).confidence, 0.0);
        assert_eq!(Decision::fallback("x").confidence, 0.3);
    }

    #[test]
    fn test_serde_shape() {
        let d = Decision::new(DecisionKind::NotAFit, "Budget mismatch", 0.35);
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["decision"], "not_a_fit");
        assert_eq!(v["rationale"], "Budget mismatch");
    }
}
