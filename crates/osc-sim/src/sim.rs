//! Simulation runners and run bookkeeping.

use osc_core::BatchState;
use osc_model::OscillatorModel;
use tracing::{debug, trace, warn};

use crate::controller::StepController;
use crate::error::{SimError, SimResult};
use crate::integrator::{Rk4, Rk45};
use crate::options::{FixedStepOptions, IntegrateOptions};
use crate::progress::SimProgress;
use crate::trajectory::Trajectory;

/// Counters collected during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Accepted steps (including forced acceptances at h_min)
    pub accepted: usize,
    /// Rejected step attempts
    pub rejected: usize,
    /// Steps accepted at h_min although their error exceeded the tolerance
    pub forced_accepts: usize,
    /// Model derivative evaluations
    pub stage_evals: usize,
    /// Size of the last accepted step
    pub h_last: f64,
}

impl RunStats {
    pub fn attempts(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunStatus {
    /// Reached t_end.
    Completed,
    /// Aborted; the trajectory holds every step accepted before the failure.
    Failed(SimError),
}

/// Result of a run that passed configuration checks.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub trajectory: Trajectory,
    pub stats: RunStats,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, RunStatus::Completed)
    }

    pub fn error(&self) -> Option<&SimError> {
        match &self.status {
            RunStatus::Completed => None,
            RunStatus::Failed(e) => Some(e),
        }
    }

    /// Trajectory of a completed run, or the fatal error (dropping the partial trajectory).
    pub fn into_result(self) -> SimResult<Trajectory> {
        match self.status {
            RunStatus::Completed => Ok(self.trajectory),
            RunStatus::Failed(e) => Err(e),
        }
    }
}

fn check_initial<M: OscillatorModel + ?Sized>(model: &M, initial: &BatchState) -> SimResult<()> {
    initial.expect_shape("initial state", model.batch_len(), model.dim())?;
    if let Some((oscillator, component)) = initial.first_non_finite() {
        return Err(SimError::config(format!(
            "initial state of oscillator {oscillator}, component {component} is not finite"
        )));
    }
    Ok(())
}

/// Integrate `model` from `initial` over `[opts.t0, opts.t_end]` with adaptive RKF45.
///
/// Returns `Err` only for configuration errors, before any model
/// evaluation. Divergence and step-limit failures are reported in
/// [`RunOutcome::status`] together with the samples accepted so far.
pub fn integrate<M: OscillatorModel + ?Sized>(
    model: &M,
    initial: &BatchState,
    opts: &IntegrateOptions,
) -> SimResult<RunOutcome> {
    integrate_with_progress(model, initial, opts, None)
}

/// Same as [`integrate`], calling `progress` after every accepted step.
pub fn integrate_with_progress<M: OscillatorModel + ?Sized>(
    model: &M,
    initial: &BatchState,
    opts: &IntegrateOptions,
    mut progress: Option<&mut dyn FnMut(&SimProgress)>,
) -> SimResult<RunOutcome> {
    opts.validate()?;
    check_initial(model, initial)?;

    let controller = StepController::new(opts.safety);
    let mut stepper = Rk45::new(model.batch_len(), model.dim())?;
    let mut trajectory = Trajectory::new(opts.t0, initial.clone());
    let mut stats = RunStats::default();

    let mut t = opts.t0;
    let mut y = initial.clone();
    let mut h = opts.h_initial.clamp(opts.h_min, opts.h_max);
    let mut attempts = 0usize;
    let mut unrecorded = 0usize;
    // Remaining spans this close to h are merged into the final step.
    let end_slack = 4.0 * f64::EPSILON * opts.t_end.abs().max(1.0);

    debug!(
        oscillators = model.batch_len(),
        dim = model.dim(),
        t0 = opts.t0,
        t_end = opts.t_end,
        tolerance = opts.tolerance,
        "starting adaptive integration"
    );

    let status = loop {
        if t >= opts.t_end {
            break RunStatus::Completed;
        }
        if attempts >= opts.max_steps {
            warn!(attempts, t, "step limit exceeded");
            break RunStatus::Failed(SimError::StepLimitExceeded { attempts, t });
        }
        attempts += 1;

        let remaining = opts.t_end - t;
        let last = h >= remaining - end_slack;
        let h_try = if last { remaining } else { h };

        let error = match stepper.attempt(model, t, &y, h_try) {
            Ok(error) => error,
            Err(e) => {
                warn!(t, h = h_try, error = %e, "aborting integration");
                break RunStatus::Failed(e);
            }
        };
        let h_next = controller.next_step(h_try, error, opts.tolerance, opts.h_min, opts.h_max);

        if error <= opts.tolerance || h_try <= opts.h_min {
            let t_new = if last { opts.t_end } else { t + h_try };
            if t_new <= t {
                warn!(t, h = h_try, "step too small to advance time");
                break RunStatus::Failed(SimError::StepLimitExceeded { attempts, t });
            }
            if error > opts.tolerance {
                stats.forced_accepts += 1;
                warn!(
                    t,
                    h = h_try,
                    error,
                    tolerance = opts.tolerance,
                    "accepting step at h_min above tolerance"
                );
            }
            t = t_new;
            y.copy_from(stepper.high_order());
            stats.accepted += 1;
            stats.h_last = h_try;

            unrecorded += 1;
            if unrecorded == opts.record_every || t >= opts.t_end {
                trajectory.push(t, y.clone());
                unrecorded = 0;
            }

            if let Some(cb) = progress.as_mut() {
                let mut event = SimProgress::new(opts.t0, t, opts.t_end);
                event.accepted = stats.accepted;
                event.rejected = stats.rejected;
                event.h = h_try;
                cb(&event);
            }
        } else {
            stats.rejected += 1;
            trace!(t, h = h_try, error, h_next, "step rejected");
        }

        h = h_next;
    };

    // Keep the last accepted state when decimation skipped it.
    if unrecorded > 0 {
        trajectory.push(t, y);
    }
    stats.stage_evals = stepper.stage_evals();

    debug!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        forced = stats.forced_accepts,
        completed = matches!(status, RunStatus::Completed),
        "adaptive integration finished"
    );

    Ok(RunOutcome {
        trajectory,
        stats,
        status,
    })
}

/// Run `opts.steps` fixed RK4 steps of size `opts.dt`, recording every step.
pub fn run_fixed<M: OscillatorModel + ?Sized>(
    model: &M,
    initial: &BatchState,
    opts: &FixedStepOptions,
) -> SimResult<RunOutcome> {
    opts.validate()?;
    check_initial(model, initial)?;

    let mut stepper = Rk4::new(model.batch_len(), model.dim())?;
    let mut trajectory = Trajectory::new(opts.t0, initial.clone());
    let mut stats = RunStats::default();
    let mut y = initial.clone();
    let mut status = RunStatus::Completed;

    debug!(steps = opts.steps, dt = opts.dt, "starting fixed-step integration");

    for n in 0..opts.steps {
        let t = opts.t0 + n as f64 * opts.dt;
        if let Err(e) = stepper.step(model, t, &mut y, opts.dt) {
            warn!(t, error = %e, "aborting integration");
            status = RunStatus::Failed(e);
            break;
        }
        stats.accepted += 1;
        stats.h_last = opts.dt;
        trajectory.push(opts.t0 + (n + 1) as f64 * opts.dt, y.clone());
    }
    stats.stage_evals = stepper.stage_evals();

    Ok(RunOutcome {
        trajectory,
        stats,
        status,
    })
}
