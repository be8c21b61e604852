//! # Design Search Driver
//!
//! The single-threaded loop that ties the pieces together: ask the
//! search engine for the next candidate, evaluate it, append the result
//! to the iteration log (best-effort), feed it back, repeat until a
//! terminal outcome. The engine, evaluator, and log store are all
//! usable on their own; this loop is the reference composition for
//! callers that just want a sized joint.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{JointError, JointResult};
use crate::evaluator::Evaluate;
use crate::joint::JointConfiguration;
use crate::logstore::{IterationLog, IterationRecord};
use crate::search::{next_candidate, Evaluation, SearchOutcome, SearchSettings, SearchStep};

/// Full record of one design run.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Identifier shared by every logged iteration of this run
    pub run_id: String,
    pub outcome: SearchOutcome,
    /// Every candidate tried, in evaluation order
    pub history: Vec<Evaluation>,
}

/// Run the design search to a terminal outcome.
///
/// A domain error from the evaluator aborts the run with the offending
/// candidate attached; the aborted step is still logged so the audit
/// trail stays an accurate record of what was tried. Log writes never
/// abort a step.
pub fn run_design_search(
    config: &JointConfiguration,
    evaluator: &dyn Evaluate,
    settings: &SearchSettings,
    log: Option<&IterationLog>,
) -> JointResult<SearchReport> {
    config.validate()?;

    let run_id = Uuid::new_v4().to_string();
    let mut history: Vec<Evaluation> = Vec::new();

    loop {
        match next_candidate(&history, config, settings) {
            SearchStep::Terminal(outcome) => {
                debug!(
                    run_id = %run_id,
                    status = ?outcome.status,
                    steps = outcome.steps,
                    "design search finished"
                );
                return Ok(SearchReport {
                    run_id,
                    outcome,
                    history,
                });
            }
            SearchStep::Evaluate(candidate) => {
                let iteration_no = history.len() as i64;
                let start_time = Utc::now();
                let evaluation = evaluator.evaluate(&candidate, config);
                let end_time = Utc::now();

                if let Some(store) = log {
                    store.log(&IterationRecord {
                        run_id: run_id.clone(),
                        agent_id: evaluator.id().to_string(),
                        iteration_no,
                        start_time,
                        end_time,
                        candidate,
                        result: evaluation.as_ref().ok().copied(),
                        error_message: evaluation.as_ref().err().map(|e| e.to_string()),
                        raw_output: evaluation.as_ref().ok().map(|r| r.summary()),
                    });
                }

                match evaluation {
                    Ok(result) => {
                        debug!(
                            run_id = %run_id,
                            iteration_no,
                            candidate = %candidate,
                            bolt_fos = result.bolt_fos,
                            plate_fos = result.plate_fos,
                            "candidate evaluated"
                        );
                        history.push(Evaluation::new(candidate, result));
                    }
                    Err(e) => {
                        return Err(JointError::during_evaluation(
                            candidate.num_bolts,
                            candidate.bolt_diameter_mm,
                            &e,
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::AnalyticalEvaluator;
    use crate::joint::{Candidate, SafetyFactorResult};
    use crate::search::SearchStatus;

    fn reference_config() -> JointConfiguration {
        JointConfiguration {
            load_n: 60_000.0,
            desired_safety_factor: 3.0,
            preload_n: 150_000.0,
            pitch_mm: 1.5,
            plate_thickness_mm: 10.0,
            bolt_yield_strength_mpa: 940.0,
            plate_yield_strength_mpa: 250.0,
            bolt_elastic_modulus_gpa: 210.0,
            plate_elastic_modulus_gpa: 210.0,
        }
    }

    #[test]
    fn test_end_to_end_without_log() {
        let config = reference_config();
        let report = run_design_search(
            &config,
            &AnalyticalEvaluator::default(),
            &SearchSettings::default(),
            None,
        )
        .unwrap();

        assert_eq!(report.outcome.status, SearchStatus::Converged);
        assert_eq!(report.history.len(), report.outcome.steps);
        assert!(report.outcome.final_candidate.is_some());
    }

    #[test]
    fn test_end_to_end_logs_every_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.db");
        let store = IterationLog::attach(&path).unwrap();

        let config = reference_config();
        let report = run_design_search(
            &config,
            &AnalyticalEvaluator::default(),
            &SearchSettings::default(),
            Some(&store),
        )
        .unwrap();

        let rows = IterationLog::read_run(&path, &report.run_id).unwrap();
        assert_eq!(rows.len(), report.history.len());
        for (row, evaluation) in rows.iter().zip(&report.history) {
            assert_eq!(row.candidate, evaluation.candidate);
            assert_eq!(row.agent_id, "analytical_fos_calculation");
            assert!(row.end_time >= row.start_time);
            assert!(row.raw_output.as_deref().unwrap().contains("factor of safety"));
        }

        store.detach(true).unwrap();
    }

    /// Evaluator that always fails with a domain error.
    struct BrokenEvaluator;

    impl Evaluate for BrokenEvaluator {
        fn evaluate(
            &self,
            _candidate: &Candidate,
            _config: &JointConfiguration,
        ) -> crate::errors::JointResult<SafetyFactorResult> {
            Err(JointError::domain("stub", "always fails"))
        }

        fn id(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_domain_error_aborts_with_candidate_attached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abort.db");
        let store = IterationLog::attach(&path).unwrap();

        let config = reference_config();
        let error = run_design_search(
            &config,
            &BrokenEvaluator,
            &SearchSettings::default(),
            Some(&store),
        )
        .unwrap_err();

        match error {
            JointError::EvaluationFailed { num_bolts, .. } => assert!(num_bolts >= 2),
            other => panic!("expected EvaluationFailed, got {other:?}"),
        }

        // The failed step is still on the audit trail (run_id is
        // generated inside the driver, so scan the lone table)
        let conn = rusqlite::Connection::open(&path).unwrap();
        let rows = conn
            .prepare("SELECT error_message FROM iterations")
            .unwrap()
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].as_deref().unwrap().contains("always fails"));
        drop(conn);

        store.detach(true).unwrap();
    }

    #[test]
    fn test_invalid_configuration_rejected_before_searching() {
        let mut config = reference_config();
        config.plate_thickness_mm = 0.0;
        let result = run_design_search(
            &config,
            &AnalyticalEvaluator::default(),
            &SearchSettings::default(),
            None,
        );
        assert!(matches!(result, Err(JointError::InvalidInput { .. })));
    }
}
