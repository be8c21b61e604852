//! # Design Search Engine
//!
//! A deterministic two-phase bracket-and-bisect procedure that proposes
//! successive `(num_bolts, bolt_diameter)` candidates until both safety
//! factors fall within tolerance or the search limits are exhausted.
//!
//! Plate bearing capacity depends only on the product
//! `num_bolts * bolt_diameter`, while the bolt factor additionally
//! depends on preload and moduli. The plate constraint is therefore
//! decoupled and resolved first (bracket on the bolt count, then
//! bisect), after which the bolt factor is tuned by trading diameter
//! against bolt count along the constant-capacity curve.
//!
//! The engine is a pure state-transition function, not a service:
//! [`next_candidate`] consumes the ordered evaluation history and the
//! configuration, and returns either the next candidate to evaluate or
//! a terminal outcome. It holds no state of its own - every call
//! replays the history, so a driver can checkpoint, fork, or resume a
//! search by storing the history alone.
//!
//! State machine: `NoBracket -> Bracketing -> Bisecting(plate) ->
//! Tuning(bolt) -> Converged | Exhausted | Stalled`.

use serde::{Deserialize, Serialize};

use crate::joint::{Candidate, JointConfiguration, SafetyFactorResult, Tolerances};

/// One entry of the search history: a candidate and its evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub candidate: Candidate,
    pub result: SafetyFactorResult,
}

impl Evaluation {
    pub fn new(candidate: Candidate, result: SafetyFactorResult) -> Self {
        Evaluation { candidate, result }
    }
}

/// Search variant: the full two-phase procedure, or the reduced
/// fixed-diameter mode that resolves the plate constraint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Bracket/bisect the plate constraint, then tune the bolt factor
    /// along the constant `n * d` curve.
    TwoPhase,
    /// Bracket/bisect on `num_bolts` at a fixed diameter; terminate as
    /// soon as the plate factor is within tolerance.
    FixedDiameter,
}

/// Tunable limits of the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Acceptance bands for bolt and plate factors
    pub tolerances: Tolerances,

    /// Coarse bracketing step on the bolt count
    pub bolt_jump: u32,

    /// Maximum number of evaluations before giving up
    pub step_budget: usize,

    /// Bolt-count domain (inclusive)
    pub min_bolts: u32,
    pub max_bolts: u32,

    /// Diameter domain (mm, inclusive)
    pub min_diameter_mm: f64,
    pub max_diameter_mm: f64,

    /// Diameter used for the initial candidate and held fixed through
    /// the plate phase
    pub initial_diameter_mm: f64,

    pub mode: SearchMode,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            tolerances: Tolerances::default(),
            bolt_jump: 6,
            step_budget: 40,
            min_bolts: 2,
            max_bolts: 40,
            min_diameter_mm: 3.0,
            max_diameter_mm: 40.0,
            initial_diameter_mm: 10.0,
            mode: SearchMode::TwoPhase,
        }
    }
}

impl SearchSettings {
    fn clamp_bolts(&self, n: i64) -> u32 {
        n.clamp(self.min_bolts as i64, self.max_bolts as i64) as u32
    }

    fn clamp_diameter(&self, d: f64) -> f64 {
        d.clamp(self.min_diameter_mm, self.max_diameter_mm)
    }
}

/// How a finished search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Both factors within tolerance simultaneously
    Converged,
    /// Step budget reached without convergence
    Exhausted,
    /// No sign change within the bolt-count domain, or the bracket
    /// collapsed without entering tolerance
    Stalled,
}

/// Terminal result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Converged candidate, or the best candidate seen on failure
    pub final_candidate: Option<Candidate>,
    /// Number of evaluations consumed
    pub steps: usize,
}

/// Output of one transition: either a candidate to evaluate next, or a
/// terminal outcome for the driver to branch on. Failing to converge is
/// an expected result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SearchStep {
    Evaluate(Candidate),
    Terminal(SearchOutcome),
}

/// Capacity product `n * d` needed to satisfy the plate constraint
/// alone: `(desired_fos * load) / (1.5 * sigma_y * t)`.
pub fn target_capacity_product(config: &JointConfiguration) -> f64 {
    (config.desired_safety_factor * config.load_n)
        / (1.5 * config.plate_yield_strength_mpa * config.plate_thickness_mm)
}

/// Propose the next candidate given the evaluation history, or report a
/// terminal outcome.
///
/// Pure function: the same `(history, config, settings)` always yields
/// the same step. Never proposes an exact `(num_bolts, bolt_diameter)`
/// pair already present in the history.
pub fn next_candidate(
    history: &[Evaluation],
    config: &JointConfiguration,
    settings: &SearchSettings,
) -> SearchStep {
    let tol = settings.tolerances;

    if history.is_empty() {
        return SearchStep::Evaluate(initial_candidate(config, settings));
    }

    // Convergence is checked against the full history, not just the tail,
    // so a driver that keeps evaluating past success still terminates.
    if let Some(hit) = history.iter().find(|e| converged(e, settings)) {
        return SearchStep::Terminal(SearchOutcome {
            status: SearchStatus::Converged,
            final_candidate: Some(hit.candidate),
            steps: history.len(),
        });
    }

    if history.len() >= settings.step_budget {
        return terminal(SearchStatus::Exhausted, history, settings);
    }

    let last = &history[history.len() - 1];

    // Plate phase until some evaluation lands inside the plate band
    let tuning_start = history
        .iter()
        .position(|e| e.result.plate_diff.abs() <= tol.plate);

    match tuning_start {
        None => plate_phase(history, last, settings),
        Some(start) => match settings.mode {
            // In fixed-diameter mode a within-band plate would have been
            // caught by the convergence scan; reaching here with a plate
            // hit but no convergence means the mode's criteria are the
            // plate band only, so this is unreachable for FixedDiameter.
            SearchMode::FixedDiameter => terminal(SearchStatus::Stalled, history, settings),
            SearchMode::TwoPhase => tuning_phase(history, start, last, config, settings),
        },
    }
}

/// Initial candidate: diameter from the settings, bolt count sized so
/// that `n * d` approximates the plate capacity target.
fn initial_candidate(config: &JointConfiguration, settings: &SearchSettings) -> Candidate {
    let d = settings.clamp_diameter(settings.initial_diameter_mm);
    let n = settings.clamp_bolts((target_capacity_product(config) / d).round() as i64);
    Candidate::new(n, d)
}

fn converged(eval: &Evaluation, settings: &SearchSettings) -> bool {
    let tol = settings.tolerances;
    let plate_ok = eval.result.plate_diff.abs() <= tol.plate;
    match settings.mode {
        SearchMode::TwoPhase => plate_ok && eval.result.bolt_diff.abs() <= tol.bolt,
        SearchMode::FixedDiameter => plate_ok,
    }
}

fn terminal(status: SearchStatus, history: &[Evaluation], settings: &SearchSettings) -> SearchStep {
    SearchStep::Terminal(SearchOutcome {
        status,
        final_candidate: best_candidate(history, settings),
        steps: history.len(),
    })
}

/// Best candidate seen so far: smallest combined distance from the
/// target bands, each diff scaled by its tolerance.
fn best_candidate(history: &[Evaluation], settings: &SearchSettings) -> Option<Candidate> {
    let tol = settings.tolerances;
    let score = |e: &Evaluation| match settings.mode {
        SearchMode::TwoPhase => {
            e.result.bolt_diff.abs() / tol.bolt + e.result.plate_diff.abs() / tol.plate
        }
        SearchMode::FixedDiameter => e.result.plate_diff.abs() / tol.plate,
    };
    history
        .iter()
        .min_by(|a, b| score(a).total_cmp(&score(b)))
        .map(|e| e.candidate)
}

fn already_tried(history: &[Evaluation], candidate: &Candidate) -> bool {
    history.iter().any(|e| {
        e.candidate.num_bolts == candidate.num_bolts
            && e.candidate.bolt_diameter_mm == candidate.bolt_diameter_mm
    })
}

/// Bracketing and bisection on `num_bolts` with the diameter held fixed.
fn plate_phase(history: &[Evaluation], last: &Evaluation, settings: &SearchSettings) -> SearchStep {
    let diameter = last.candidate.bolt_diameter_mm;

    // A bracket is two consecutive evaluations with opposite-sign plate
    // error. Everything after the bracketing pair is a bisection step.
    let bracket_at = history
        .windows(2)
        .position(|pair| pair[0].result.plate_diff.signum() != pair[1].result.plate_diff.signum());

    let Some(pair_index) = bracket_at else {
        // Still bracketing: walk the bolt count by the coarse jump,
        // upward when under-strength, downward when over-strength.
        let step = settings.bolt_jump as i64;
        let current = last.candidate.num_bolts as i64;
        let next_n = if last.result.plate_diff < 0.0 {
            settings.clamp_bolts(current + step)
        } else {
            settings.clamp_bolts(current - step)
        };
        if next_n == last.candidate.num_bolts {
            // Clamped against the domain edge with no sign change in sight
            return terminal(SearchStatus::Stalled, history, settings);
        }
        let candidate = Candidate::new(next_n, diameter);
        if already_tried(history, &candidate) {
            return terminal(SearchStatus::Stalled, history, settings);
        }
        return SearchStep::Evaluate(candidate);
    };

    // Replay the bisection: fold every post-bracket evaluation into the
    // bracket by replacing the endpoint that shares its sign.
    let (mut below, mut above) = orient_bracket(&history[pair_index], &history[pair_index + 1]);
    for eval in &history[pair_index + 2..] {
        if eval.result.plate_diff < 0.0 {
            below = (eval.candidate.num_bolts, eval.result.plate_diff);
        } else {
            above = (eval.candidate.num_bolts, eval.result.plate_diff);
        }
    }

    let mid = (below.0 + above.0) / 2;
    if mid == below.0 || mid == above.0 {
        // Bracket width collapsed without entering the plate band
        return terminal(SearchStatus::Stalled, history, settings);
    }
    let candidate = Candidate::new(mid, diameter);
    if already_tried(history, &candidate) {
        return terminal(SearchStatus::Stalled, history, settings);
    }
    SearchStep::Evaluate(candidate)
}

/// Order a bracketing pair as (negative-error endpoint, positive-error
/// endpoint), each as `(num_bolts, plate_diff)`.
fn orient_bracket(a: &Evaluation, b: &Evaluation) -> ((u32, f64), (u32, f64)) {
    let a_pair = (a.candidate.num_bolts, a.result.plate_diff);
    let b_pair = (b.candidate.num_bolts, b.result.plate_diff);
    if a_pair.1 < 0.0 {
        (a_pair, b_pair)
    } else {
        (b_pair, a_pair)
    }
}

/// Bolt tuning: trade diameter against bolt count along the constant
/// `n * d` capacity curve, with a single corrective bolt-count step
/// whenever the plate factor drifts back out of its band.
fn tuning_phase(
    history: &[Evaluation],
    tuning_start: usize,
    last: &Evaluation,
    config: &JointConfiguration,
    settings: &SearchSettings,
) -> SearchStep {
    let tol = settings.tolerances;
    let plate_drifted = last.result.plate_diff.abs() > tol.plate;

    if plate_drifted {
        let index = history.len() - 1;
        // Was the move into `last` already the corrective step? A
        // corrective step keeps the diameter and follows a drifted
        // evaluation. If it was and the plate is still out, resume
        // diameter tuning rather than walking the bolt count again.
        let was_corrective = index > tuning_start && {
            let prev = &history[index - 1];
            prev.candidate.bolt_diameter_mm == last.candidate.bolt_diameter_mm
                && prev.result.plate_diff.abs() > tol.plate
        };

        if !was_corrective {
            let current = last.candidate.num_bolts as i64;
            let next_n = if last.result.plate_diff < 0.0 {
                settings.clamp_bolts(current + 1)
            } else {
                settings.clamp_bolts(current - 1)
            };
            let candidate = Candidate::new(next_n, last.candidate.bolt_diameter_mm);
            if next_n != last.candidate.num_bolts && !already_tried(history, &candidate) {
                return SearchStep::Evaluate(candidate);
            }
            // Pinned against the domain edge; fall through to a
            // diameter move instead of stalling outright.
        }
    }

    // Diameter move sized from the bolt error: factor of safety scales
    // roughly with the tensile area, so correct by sqrt of the ratio.
    let bolt_fos = last.result.bolt_fos;
    if bolt_fos <= 0.0 {
        return terminal(SearchStatus::Stalled, history, settings);
    }
    let factor = (config.desired_safety_factor / bolt_fos)
        .sqrt()
        .clamp(0.5, 2.0);
    let target_dn = target_capacity_product(config);

    let mut diameter = round_tenth(settings.clamp_diameter(last.candidate.bolt_diameter_mm * factor));
    // Hold n * d near the plate target as the diameter moves
    let mut candidate = Candidate::new(
        settings.clamp_bolts((target_dn / diameter).round() as i64),
        diameter,
    );

    // Nudge the diameter past any already-tried pair; a handful of
    // tenths is enough before the search is genuinely going in circles.
    let nudge = if factor >= 1.0 { 0.1 } else { -0.1 };
    let mut attempts = 0;
    while already_tried(history, &candidate) {
        attempts += 1;
        if attempts > 5 {
            return terminal(SearchStatus::Stalled, history, settings);
        }
        diameter = round_tenth(settings.clamp_diameter(diameter + nudge));
        candidate = Candidate::new(
            settings.clamp_bolts((target_dn / diameter).round() as i64),
            diameter,
        );
    }

    SearchStep::Evaluate(candidate)
}

/// Diameters are proposed on a 0.1 mm grid; finer moves are below
/// manufacturing relevance and would defeat duplicate detection.
fn round_tenth(d: f64) -> f64 {
    (d * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{AnalyticalEvaluator, Evaluate};
    use crate::joint::FosComparison;

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

    /// Build a history entry with explicit diffs (factors derived).
    fn eval(n: u32, d: f64, bolt_diff: f64, plate_diff: f64) -> Evaluation {
        let desired = 3.0;
        Evaluation::new(
            Candidate::new(n, d),
            SafetyFactorResult::from_factors(
                desired + bolt_diff,
                desired + plate_diff,
                desired,
                Tolerances::default(),
            ),
        )
    }

    #[test]
    fn test_initial_candidate_sizes_to_plate_target() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // target n*d = 3*60000 / (1.5*250*10) = 48
        assert!((target_capacity_product(&config) - 48.0).abs() < 1e-9);
        match next_candidate(&[], &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert_eq!(c.bolt_diameter_mm, 10.0);
                assert_eq!(c.num_bolts, 5);
            }
            other => panic!("expected initial candidate, got {other:?}"),
        }
    }

    #[test]
    fn test_bracketing_steps_upward_when_under_strength() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(10, 10.0, -1.0, -2.0)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert_eq!(c.num_bolts, 16);
                assert_eq!(c.bolt_diameter_mm, 10.0);
            }
            other => panic!("expected bracketing step, got {other:?}"),
        }
    }

    #[test]
    fn test_bracketing_steps_downward_when_over_strength() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(20, 10.0, 1.0, 2.0)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => assert_eq!(c.num_bolts, 14),
            other => panic!("expected bracketing step, got {other:?}"),
        }
    }

    #[test]
    fn test_bracketing_clamps_and_stalls_at_domain_edge() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // Already at the maximum bolt count and still under-strength
        let history = [eval(40, 10.0, -2.0, -3.0)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Terminal(outcome) => {
                assert_eq!(outcome.status, SearchStatus::Stalled);
                assert_eq!(outcome.final_candidate, Some(Candidate::new(40, 10.0)));
            }
            other => panic!("expected stall, got {other:?}"),
        }
    }

    #[test]
    fn test_bisection_proposes_midpoint() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(10, 10.0, -1.0, -2.0), eval(22, 10.0, 1.0, 2.0)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert_eq!(c.num_bolts, 16);
                assert_eq!(c.bolt_diameter_mm, 10.0);
            }
            other => panic!("expected bisection midpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_bisection_narrows_toward_sign_change() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // Midpoint 16 came back over-strength: replaces the upper endpoint
        let history = [
            eval(10, 10.0, -1.0, -2.0),
            eval(22, 10.0, 1.0, 2.0),
            eval(16, 10.0, 0.5, 1.0),
        ];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => assert_eq!(c.num_bolts, 13),
            other => panic!("expected narrowed midpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_bisection_stalls_when_bracket_collapses() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(10, 10.0, -1.0, -2.0), eval(11, 10.0, 1.0, 2.0)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Terminal(outcome) => assert_eq!(outcome.status, SearchStatus::Stalled),
            other => panic!("expected stall, got {other:?}"),
        }
    }

    #[test]
    fn test_tuning_grows_diameter_for_weak_bolt() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // Plate satisfied, bolt under target: expect a larger diameter
        // with the bolt count resized to hold n*d near 48
        let history = [eval(5, 10.0, -1.33, 0.125)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert!(c.bolt_diameter_mm > 10.0);
                let product = c.num_bolts as f64 * c.bolt_diameter_mm;
                assert!((product - 48.0).abs() < 48.0 * 0.35, "product {product}");
            }
            other => panic!("expected tuning step, got {other:?}"),
        }
    }

    #[test]
    fn test_tuning_shrinks_diameter_for_strong_bolt() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(5, 10.0, 2.0, 0.125)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => assert!(c.bolt_diameter_mm < 10.0),
            other => panic!("expected tuning step, got {other:?}"),
        }
    }

    #[test]
    fn test_plate_drift_triggers_single_corrective_step() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // Tuning entered at step 0, then the diameter move drifted the
        // plate under its band: one bolt-count step, diameter fixed.
        let history = [eval(5, 10.0, -1.33, 0.125), eval(4, 13.4, -0.5, -0.7)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert_eq!(c.num_bolts, 5);
                assert_eq!(c.bolt_diameter_mm, 13.4);
            }
            other => panic!("expected corrective step, got {other:?}"),
        }
    }

    #[test]
    fn test_corrective_step_is_not_repeated() {
        let config = reference_config();
        let settings = SearchSettings::default();
        // Corrective step already taken (same diameter, drifted
        // predecessor) and the plate is still out: resume tuning with a
        // diameter move instead of another bolt-count walk.
        let history = [
            eval(5, 10.0, -1.33, 0.125),
            eval(4, 13.4, -0.5, -0.7),
            eval(5, 13.4, -0.5, -0.6),
        ];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Evaluate(c) => {
                assert_ne!(c.bolt_diameter_mm, 13.4, "expected a diameter move");
            }
            other => panic!("expected tuning step, got {other:?}"),
        }
    }

    #[test]
    fn test_converged_history_terminates() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let history = [eval(5, 10.0, -1.0, 0.1), eval(3, 16.5, 0.07, 0.09)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Terminal(outcome) => {
                assert_eq!(outcome.status, SearchStatus::Converged);
                assert_eq!(outcome.final_candidate, Some(Candidate::new(3, 16.5)));
                assert_eq!(outcome.steps, 2);
            }
            other => panic!("expected convergence, got {other:?}"),
        }
    }

    #[test]
    fn test_step_budget_exhaustion() {
        let config = reference_config();
        let settings = SearchSettings {
            step_budget: 3,
            ..SearchSettings::default()
        };
        let history = [
            eval(10, 10.0, -1.0, -2.0),
            eval(16, 10.0, -0.9, -1.5),
            eval(22, 10.0, -0.8, -1.0),
        ];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Terminal(outcome) => {
                assert_eq!(outcome.status, SearchStatus::Exhausted);
                // Best candidate is the closest one, not the last one
                assert_eq!(outcome.final_candidate, Some(Candidate::new(22, 10.0)));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_diameter_mode_stops_on_plate_band() {
        let config = reference_config();
        let settings = SearchSettings {
            mode: SearchMode::FixedDiameter,
            ..SearchSettings::default()
        };
        // Bolt factor far off target, plate inside its band: the reduced
        // mode is satisfied regardless of the bolt factor.
        let history = [eval(5, 10.0, -1.33, 0.125)];
        match next_candidate(&history, &config, &settings) {
            SearchStep::Terminal(outcome) => assert_eq!(outcome.status, SearchStatus::Converged),
            other => panic!("expected plate-only convergence, got {other:?}"),
        }
    }

    /// Drive the engine against the real analytical evaluator.
    fn run_to_terminal(
        config: &JointConfiguration,
        settings: &SearchSettings,
    ) -> (SearchOutcome, Vec<Evaluation>) {
        let evaluator = AnalyticalEvaluator::new(settings.tolerances);
        let mut history = Vec::new();
        loop {
            match next_candidate(&history, config, settings) {
                SearchStep::Evaluate(candidate) => {
                    let result = evaluator.evaluate(&candidate, config).unwrap();
                    history.push(Evaluation::new(candidate, result));
                }
                SearchStep::Terminal(outcome) => return (outcome, history),
            }
        }
    }

    #[test]
    fn test_feasible_search_converges_within_budget() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let (outcome, history) = run_to_terminal(&config, &settings);

        assert_eq!(outcome.status, SearchStatus::Converged, "history: {history:?}");
        assert!(history.len() <= settings.step_budget);

        let final_candidate = outcome.final_candidate.unwrap();
        let result = AnalyticalEvaluator::default()
            .evaluate(&final_candidate, &config)
            .unwrap();
        assert!(result.bolt_diff.abs() <= settings.tolerances.bolt);
        assert!(result.plate_diff.abs() <= settings.tolerances.plate);
        assert_eq!(
            result.bolt_comparison,
            FosComparison::WithinAcceptableRange
        );
    }

    #[test]
    fn test_search_never_repeats_a_candidate() {
        let config = reference_config();
        let settings = SearchSettings::default();
        let (_, history) = run_to_terminal(&config, &settings);
        for (i, a) in history.iter().enumerate() {
            for b in &history[i + 1..] {
                assert!(
                    a.candidate.num_bolts != b.candidate.num_bolts
                        || a.candidate.bolt_diameter_mm != b.candidate.bolt_diameter_mm,
                    "duplicate candidate {}",
                    a.candidate
                );
            }
        }
    }

    #[test]
    fn test_infeasible_search_never_reports_success() {
        // Target capacity needs n*d = 8000: far beyond 40 bolts
        let config = JointConfiguration {
            load_n: 10_000_000.0,
            ..reference_config()
        };
        let settings = SearchSettings::default();
        let (outcome, _) = run_to_terminal(&config, &settings);
        assert!(
            matches!(
                outcome.status,
                SearchStatus::Exhausted | SearchStatus::Stalled
            ),
            "false convergence: {outcome:?}"
        );
    }
}
