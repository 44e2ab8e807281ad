//! End-to-end runs of the reference CRVDO batch.

use osc_core::BatchState;
use osc_model::{CRVDO_DIM, OscillatorModel, reference_batch};
use osc_sim::{FixedStepOptions, IntegrateOptions, SimConfig, Trajectory, integrate, run_fixed};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn adaptive(t_end: f64, tolerance: f64) -> IntegrateOptions {
    IntegrateOptions {
        t_end,
        tolerance,
        ..Default::default()
    }
}

#[test]
fn adaptive_run_agrees_with_fixed_step_rk4() {
    init_tracing();
    let batch = reference_batch(10).unwrap();
    let fixed = run_fixed(&batch.model, &batch.initial, &FixedStepOptions::default())
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(fixed.len(), 2001);
    assert_eq!(fixed.final_time(), 15.625);

    let out = integrate(&batch.model, &batch.initial, &adaptive(15.625, 1e-8)).unwrap();
    assert!(out.is_completed(), "{:?}", out.status);
    assert_eq!(out.stats.forced_accepts, 0);

    let a = out.trajectory.final_state().unwrap();
    let b = fixed.final_state().unwrap();
    let diff = a.max_abs_diff(b);
    assert!(diff < 1e-5, "adaptive and fixed-step runs differ by {diff}");
    assert!(out.stats.accepted < 2000);
}

#[test]
fn undriven_imaginary_parts_stay_zero() {
    let batch = reference_batch(4).unwrap();
    let tr = integrate(&batch.model, &batch.initial, &adaptive(5.0, 1e-6))
        .unwrap()
        .into_result()
        .unwrap();
    for (_, state) in &tr {
        for row in state.rows() {
            assert_eq!(row[1], 0.0);
            assert_eq!(row[3], 0.0);
        }
    }
    // The real parts are driven away from the origin.
    assert!(tr.final_state().unwrap().row(0)[0].abs() > 1e-3);
}

#[test]
fn parallel_rows_give_identical_trajectory() {
    let batch = reference_batch(16).unwrap();
    let parallel = batch.model.clone().with_parallel(true);
    let opts = adaptive(3.0, 1e-7);

    let serial = integrate(&batch.model, &batch.initial, &opts).unwrap();
    let threaded = integrate(&parallel, &batch.initial, &opts).unwrap();
    assert_eq!(serial.trajectory, threaded.trajectory);
    assert_eq!(serial.stats, threaded.stats);
}

const RUN_YAML: &str = r#"
oscillators:
  - coefficients: { a: 1.25, b: 2.0, c: 0.0625, d: 1.0, e: 0.25 }
    control:
      - { type: constant, value: 0.5 }
      - { type: zero }
      - { type: sinusoid, amplitude: 0.5, omega: 2.0 }
      - { type: zero }
  - coefficients: { a: 1.25, b: 2.0, c: 0.05, d: 1.0, e: 0.25 }
    initial: [0.1, 0.0, 0.0, 0.0]
  - coefficients: { a: 1.25, b: 2.0, c: 0.04, d: 1.0, e: 0.25 }
    control:
      - { type: step, before: 0.0, after: 0.25, at: 1.0 }
      - { type: zero }
      - { type: zero }
      - { type: zero }
coupling: { type: diffusive, strength: 0.1 }
options:
  t_end: 2.0
  tolerance: 1.0e-7
  record_every: 4
"#;

#[test]
fn yaml_config_builds_and_runs() {
    init_tracing();
    let cfg: SimConfig = serde_yaml::from_str(RUN_YAML).unwrap();
    assert_eq!(cfg.oscillators.len(), 3);
    assert!(!cfg.parallel);

    let (model, initial, opts) = cfg.build().unwrap();
    assert_eq!(model.batch_len(), 3);
    assert_eq!(initial.row(1), &[0.1, 0.0, 0.0, 0.0]);
    assert_eq!(opts.h_max, IntegrateOptions::default().h_max);

    let out = integrate(&model, &initial, &opts).unwrap();
    assert!(out.is_completed(), "{:?}", out.status);
    assert_eq!(out.trajectory.final_time(), 2.0);
    assert!(out.trajectory.len() < out.stats.accepted + 1);
    assert!(out.trajectory.final_state().unwrap().first_non_finite().is_none());
}

#[test]
fn yaml_with_bad_options_is_rejected_by_build() {
    let yaml = RUN_YAML.replace("tolerance: 1.0e-7", "tolerance: -1.0");
    let cfg: SimConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(cfg.build().is_err());
}

#[test]
fn trajectory_exports_as_json() {
    let batch = reference_batch(2).unwrap();
    let tr = integrate(&batch.model, &batch.initial, &adaptive(0.5, 1e-6))
        .unwrap()
        .into_result()
        .unwrap();

    let json = serde_json::to_value(&tr).unwrap();
    let times = json["times"].as_array().unwrap();
    assert_eq!(times.len(), tr.len());
    assert_eq!(json["states"][0]["dim"], CRVDO_DIM);
    assert_eq!(json["states"][0]["len"], 2);

    let back: Trajectory = serde_json::from_value(json).unwrap();
    assert_eq!(back.times(), tr.times());
    assert_eq!(back.final_state(), tr.final_state());
}

#[test]
fn single_oscillator_matches_its_row_in_batch() {
    let batch = reference_batch(3).unwrap();
    let solo = reference_batch(1).unwrap();
    let opts = IntegrateOptions {
        t_end: 2.0,
        h_initial: 1.0 / 64.0,
        h_min: 1.0 / 64.0,
        h_max: 1.0 / 64.0,
        ..Default::default()
    };
    let a = integrate(&batch.model, &batch.initial, &opts).unwrap();
    let b = integrate(&solo.model, &BatchState::zeros(1, CRVDO_DIM).unwrap(), &opts).unwrap();
    assert_eq!(a.trajectory.times(), b.trajectory.times());
    for (sa, sb) in a.trajectory.states().iter().zip(b.trajectory.states()) {
        assert_eq!(sa.row(0), sb.row(0));
    }
}
