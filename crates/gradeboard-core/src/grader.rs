//! Grading orchestrator
//!
//! One request, one pass: admission check, graph extraction, oracle call,
//! typed result. The admission check runs first so a rejected request never
//! reaches the metered oracle; an empty board is detected after admission
//! and therefore still costs its quota unit. No retries happen here - a
//! failed oracle call costs one unit and the user decides whether to try
//! again.

use crate::collaborators::{BoardStore, Identity};
use crate::error::{AccessError, ConfigError, GradeError};
use crate::types::{GradeResult, GraderConfig, UserId};
use gradeboard_admission::RateLimiter;
use gradeboard_oracle::{build_grading_prompt, GeminiOracle, GradeVerdict, Oracle};
use gradeboard_snapshot::extract;
use serde_json::Value;
use uuid::Uuid;

const EMPTY_BOARD_MESSAGE: &str =
    "No components found on the board. Add some system design shapes first.";
const RETRY_MESSAGE: &str = "Grading failed. Please try again.";

/// The grading pipeline, composed once and shared across requests.
///
/// Holds no mutable state of its own; the only shared mutable resource is
/// the limiter's external counter store.
#[derive(Debug)]
pub struct Grader {
    limiter: RateLimiter,
    oracle: Box<dyn Oracle>,
    config: GraderConfig,
}

impl Grader {
    /// Compose a grader from injected collaborators.
    #[must_use]
    pub fn new(limiter: RateLimiter, oracle: impl Oracle + 'static, config: GraderConfig) -> Self {
        Self {
            limiter,
            oracle: Box::new(oracle),
            config,
        }
    }

    /// Compose from the environment.
    ///
    /// Missing counter-store credentials disable admission (fail-open);
    /// missing oracle credentials are a hard configuration error because
    /// nothing can be graded without them.
    pub fn from_env(config: GraderConfig) -> Result<Self, ConfigError> {
        let limiter = RateLimiter::from_env(config.policy());
        let oracle = GeminiOracle::from_env()
            .ok_or(ConfigError::MissingOracleCredentials)?
            .with_model(config.model.clone());
        Ok(Self::new(limiter, oracle, config))
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Grade a snapshot for an already-authenticated user.
    ///
    /// # Workflow
    /// 1. Admission check (charges one quota unit, admitted or not)
    /// 2. Snapshot-to-graph extraction, empty boards turned away
    /// 3. Prompt build and oracle call
    /// 4. Schema validation of the oracle's output
    ///
    /// Every recoverable condition returns as a [`GradeResult::Rejected`]
    /// value; the signature is infallible by design.
    pub async fn grade(&self, user: &UserId, snapshot: &Value, problem_statement: &str) -> GradeResult {
        tracing::info!(user = %user, "grading request received");
        match self.try_grade(user, snapshot, problem_statement).await {
            Ok((verdict, remaining)) => {
                tracing::info!(user = %user, score = verdict.score, "grading complete");
                GradeResult::Graded { result: verdict, remaining }
            }
            Err(error) => self.reject(user, error),
        }
    }

    /// Resolve the caller and board through the collaborator seams, then
    /// grade the board's current snapshot.
    pub async fn grade_board(
        &self,
        identity: &dyn Identity,
        boards: &dyn BoardStore,
        board_id: Uuid,
        problem_statement: &str,
    ) -> Result<GradeResult, AccessError> {
        let user = identity.current_user().await?;
        let board = boards.get(&user, board_id).await?;
        Ok(self.grade(&user, &board.snapshot, problem_statement).await)
    }

    async fn try_grade(
        &self,
        user: &UserId,
        snapshot: &Value,
        problem_statement: &str,
    ) -> Result<(GradeVerdict, u32), GradeError> {
        let admission = self.limiter.check(user.as_str()).await;
        if !admission.admitted {
            return Err(GradeError::QuotaExceeded { reset_at: admission.reset_at });
        }

        let graph = extract(snapshot);
        if graph.is_empty() {
            return Err(GradeError::EmptyDiagram);
        }
        tracing::debug!(
            user = %user,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "extracted logical graph"
        );

        let prompt = build_grading_prompt(problem_statement, &graph);
        let raw = self.oracle.generate(&prompt).await?;
        let verdict = GradeVerdict::from_value(raw)?;
        Ok((verdict, admission.remaining))
    }

    /// Map an internal failure to its caller-facing shape.
    ///
    /// Expected conditions keep their specifics; oracle detail is logged
    /// here and never crosses the boundary.
    fn reject(&self, user: &UserId, error: GradeError) -> GradeResult {
        match error {
            GradeError::QuotaExceeded { reset_at } => {
                tracing::info!(user = %user, reset_at, "admission rejected");
                GradeResult::Rejected {
                    error: format!(
                        "Rate limit exceeded. You've used all {} grades this hour.",
                        self.config.quota
                    ),
                    reset_at: Some(reset_at),
                }
            }
            GradeError::EmptyDiagram => GradeResult::Rejected {
                error: EMPTY_BOARD_MESSAGE.to_string(),
                reset_at: None,
            },
            GradeError::Oracle(error) => {
                tracing::error!(user = %user, %error, "grading failed");
                GradeResult::Rejected {
                    error: RETRY_MESSAGE.to_string(),
                    reset_at: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeboard_oracle::OracleError;
    use gradeboard_test_utils::{interview_snapshot, sample_verdict, ScriptedOracle};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn grader_with(oracle: ScriptedOracle) -> Grader {
        Grader::new(RateLimiter::disabled(), oracle, GraderConfig::default())
    }

    #[tokio::test]
    async fn successful_grade_carries_verdict_and_remaining() {
        let oracle = ScriptedOracle::new().with_response(sample_verdict());
        let grader = grader_with(oracle);
        let result = grader.grade(&UserId::from("user-1"), &interview_snapshot(), "URL shortener").await;
        let GradeResult::Graded { result: verdict, remaining } = result else {
            panic!("expected graded result, got {result:?}");
        };
        assert!((1..=10).contains(&verdict.score));
        assert_eq!(remaining, gradeboard_admission::FAIL_OPEN_REMAINING);
    }

    #[tokio::test]
    async fn empty_board_is_rejected_without_oracle_call() {
        let oracle = ScriptedOracle::new().with_response(sample_verdict());
        let calls = oracle.call_counter();
        let grader = grader_with(oracle);
        let result = grader.grade(&UserId::from("user-1"), &json!({ "store": {} }), "p").await;
        assert_eq!(
            result,
            GradeResult::Rejected { error: EMPTY_BOARD_MESSAGE.to_string(), reset_at: None }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oracle_failure_surfaces_generic_message() {
        let oracle = ScriptedOracle::new().with_error(OracleError::MissingContent);
        let grader = grader_with(oracle);
        let result = grader.grade(&UserId::from("user-1"), &interview_snapshot(), "p").await;
        assert_eq!(
            result,
            GradeResult::Rejected { error: RETRY_MESSAGE.to_string(), reset_at: None }
        );
    }

    #[tokio::test]
    async fn schema_violation_surfaces_generic_message() {
        let oracle = ScriptedOracle::new().with_response(json!({ "score": 99 }));
        let grader = grader_with(oracle);
        let result = grader.grade(&UserId::from("user-1"), &interview_snapshot(), "p").await;
        let GradeResult::Rejected { error, .. } = result else {
            panic!("schema-violating output must not grade");
        };
        assert_eq!(error, RETRY_MESSAGE);
    }
}
