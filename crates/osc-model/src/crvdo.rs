//! Complex Rayleigh–van der Pol–Duffing (CRVDO) oscillator batch.

use osc_core::BatchState;
use serde::{Deserialize, Serialize};

use crate::control::ControlInput;
use crate::error::{ModelError, ModelResult};
use crate::model::{OscillatorModel, RowModel, evaluate_rows};
use crate::params::ParameterSet;

/// Coordinates per CRVDO oscillator: `[z1, z2, z3, z4]`.
pub const CRVDO_DIM: usize = 4;

/// Scalar coefficients of one CRVDO oscillator.
///
/// With position `z = z1 + i z2` and velocity `w = z3 + i z4`:
///
/// ```text
/// z' = w + (u1 + i u2)
/// w' = z - a z³ + e (b w - c z² w - d w³ + (u3 + i u4))
/// ```
///
/// - `a`: Duffing (cubic stiffness) coefficient
/// - `b`: linear damping gain
/// - `c`: van der Pol damping coefficient
/// - `d`: Rayleigh damping coefficient
/// - `e`: overall scale of the damping/forcing bracket
///
/// The imaginary channels mirror the real ones: `u2` adds directly to `z2'`
/// and `u4` enters the bracket of `z4'`. The velocity cube expands to
/// `Re(w³) = z3³ - 3 z3 z4²` and `Im(w³) = 3 z3² z4 - z4³`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrvdoCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl CrvdoCoefficients {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        Self { a, b, c, d, e }
    }

    fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("d", self.d),
            ("e", self.e),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Parameters of one oscillator in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrvdoOscillator {
    pub coefficients: CrvdoCoefficients,
    /// Absent control means zero input on every channel.
    #[serde(default)]
    pub control: Option<ControlInput>,
}

impl CrvdoOscillator {
    pub fn new(coefficients: CrvdoCoefficients) -> Self {
        Self {
            coefficients,
            control: None,
        }
    }

    pub fn with_control(mut self, control: ControlInput) -> Self {
        self.control = Some(control);
        self
    }
}

/// Cross-oscillator coupling.
///
/// `Diffusive` couples each oscillator to its ring neighbours `i-1` and
/// `i+1` (mod N) through the position components:
///
/// ```text
/// z3' += k * Σ_j (z1_j - z1_i)
/// z4' += k * Σ_j (z2_j - z2_i)
/// ```
///
/// A batch of one has no neighbours; a batch of two counts its single
/// neighbour once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Coupling {
    #[default]
    None,
    Diffusive { strength: f64 },
}

/// Batch of independently parameterized CRVDO oscillators.
#[derive(Debug, Clone)]
pub struct CrvdoModel {
    params: ParameterSet<CrvdoOscillator>,
    coupling: Coupling,
    parallel: bool,
}

impl CrvdoModel {
    /// Build a model, rejecting non-finite coefficients, controls or coupling.
    pub fn new(params: ParameterSet<CrvdoOscillator>, coupling: Coupling) -> ModelResult<Self> {
        for (index, osc) in params.iter().enumerate() {
            if let Some(what) = osc.coefficients.first_non_finite() {
                return Err(ModelError::NonFinite { what, index });
            }
            if osc.control.is_some_and(|c| !c.is_finite()) {
                return Err(ModelError::NonFinite {
                    what: "control",
                    index,
                });
            }
        }
        if let Coupling::Diffusive { strength } = coupling
            && !strength.is_finite()
        {
            return Err(ModelError::InvalidArg {
                what: "coupling strength must be finite",
            });
        }
        Ok(Self {
            params,
            coupling,
            parallel: false,
        })
    }

    /// Evaluate rows on the rayon pool. Results are unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn params(&self) -> &ParameterSet<CrvdoOscillator> {
        &self.params
    }

    pub fn coupling(&self) -> Coupling {
        self.coupling
    }

    fn coupling_terms(&self, index: usize, state: &BatchState) -> (f64, f64) {
        let Coupling::Diffusive { strength } = self.coupling else {
            return (0.0, 0.0);
        };
        let n = state.len();
        if n < 2 {
            return (0.0, 0.0);
        }
        let me = state.row(index);
        let prev = (index + n - 1) % n;
        let next = (index + 1) % n;
        let mut s1 = state.row(prev)[0] - me[0];
        let mut s2 = state.row(prev)[1] - me[1];
        if next != prev {
            s1 += state.row(next)[0] - me[0];
            s2 += state.row(next)[1] - me[1];
        }
        (strength * s1, strength * s2)
    }
}

impl RowModel for CrvdoModel {
    fn row_derivative(&self, t: f64, index: usize, state: &BatchState, out: &mut [f64]) {
        let osc = &self.params.as_slice()[index];
        let CrvdoCoefficients { a, b, c, d, e } = osc.coefficients;
        let [u1, u2, u3, u4] = osc.control.map(|ctl| ctl.evaluate(t)).unwrap_or([0.0; 4]);

        let y = state.row(index);
        let (z1, z2, z3, z4) = (y[0], y[1], y[2], y[3]);

        // z^3
        let z_cubed_re = z1 * z1 * z1 - 3.0 * z1 * z2 * z2;
        let z_cubed_im = 3.0 * z1 * z1 * z2 - z2 * z2 * z2;
        // z^2 w
        let z_sq_re = z1 * z1 - z2 * z2;
        let z_sq_im = 2.0 * z1 * z2;
        let z_sq_w_re = z_sq_re * z3 - z_sq_im * z4;
        let z_sq_w_im = z_sq_re * z4 + z_sq_im * z3;
        // w^3
        let w_cubed_re = z3 * z3 * z3 - 3.0 * z3 * z4 * z4;
        let w_cubed_im = 3.0 * z3 * z3 * z4 - z4 * z4 * z4;

        let (k3, k4) = self.coupling_terms(index, state);

        out[0] = z3 + u1;
        out[1] = z4 + u2;
        out[2] = z1 - a * z_cubed_re + e * (b * z3 - c * z_sq_w_re - d * w_cubed_re + u3) + k3;
        out[3] = z2 - a * z_cubed_im + e * (b * z4 - c * z_sq_w_im - d * w_cubed_im + u4) + k4;
    }
}

impl OscillatorModel for CrvdoModel {
    fn dim(&self) -> usize {
        CRVDO_DIM
    }

    fn batch_len(&self) -> usize {
        self.params.len()
    }

    fn derivative(&self, t: f64, state: &BatchState, out: &mut BatchState) {
        evaluate_rows(self, t, state, out, self.parallel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlSignal;

    fn coeffs() -> CrvdoCoefficients {
        CrvdoCoefficients::new(1.25, 2.0, 1.0 / 16.0, 1.0, 0.25)
    }

    fn single(osc: CrvdoOscillator) -> CrvdoModel {
        CrvdoModel::new(ParameterSet::new(vec![osc]).unwrap(), Coupling::None).unwrap()
    }

    fn eval(model: &CrvdoModel, t: f64, rows: &[[f64; 4]]) -> BatchState {
        let state = BatchState::from_rows(rows).unwrap();
        let mut out = BatchState::zeros(rows.len(), CRVDO_DIM).unwrap();
        model.derivative(t, &state, &mut out);
        out
    }

    #[test]
    fn real_axis_matches_scalar_equations() {
        // z2 = z4 = 0 reduces to the real Rayleigh–van der Pol–Duffing form.
        let model = single(CrvdoOscillator::new(coeffs()));
        let (z1, z3) = (0.5, -0.3);
        let out = eval(&model, 0.0, &[[z1, 0.0, z3, 0.0]]);
        let c = coeffs();
        let expected = z1 - c.a * z1.powi(3)
            + c.e * (c.b * z3 - c.c * z1 * z1 * z3 - c.d * z3.powi(3));
        assert_eq!(out.row(0)[0], z3);
        assert_eq!(out.row(0)[1], 0.0);
        assert!((out.row(0)[2] - expected).abs() < 1e-15);
        assert_eq!(out.row(0)[3], 0.0);
    }

    #[test]
    fn imaginary_parts_follow_complex_powers() {
        let c = coeffs();
        let model = single(CrvdoOscillator::new(c));
        let (z1, z2, z3, z4) = (0.4, -0.7, 0.2, 0.9);
        let out = eval(&model, 0.0, &[[z1, z2, z3, z4]]);

        // Im(z^3) = 3 z1^2 z2 - z2^3, Im(z^2 w) = (z1^2 - z2^2) z4 + 2 z1 z2 z3,
        // Im(w^3) = 3 z3^2 z4 - z4^3
        let im_z3 = 3.0 * z1 * z1 * z2 - z2 * z2 * z2;
        let im_z2w = (z1 * z1 - z2 * z2) * z4 + 2.0 * z1 * z2 * z3;
        let im_w3 = 3.0 * z3 * z3 * z4 - z4 * z4 * z4;
        let expected = z2 - c.a * im_z3 + c.e * (c.b * z4 - c.c * im_z2w - c.d * im_w3);
        assert!((out.row(0)[3] - expected).abs() < 1e-14);
    }

    #[test]
    fn control_is_evaluated_at_stage_time() {
        let step = ControlSignal::Step {
            before: 0.0,
            after: 1.0,
            at: 0.5,
        };
        let osc = CrvdoOscillator::new(coeffs()).with_control(ControlInput::new([
            step,
            ControlSignal::Zero,
            step,
            ControlSignal::Zero,
        ]));
        let model = single(osc);

        let early = eval(&model, 0.25, &[[0.0; 4]]);
        let late = eval(&model, 0.75, &[[0.0; 4]]);
        assert_eq!(early.row(0), &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(late.row(0)[0], 1.0);
        assert_eq!(late.row(0)[2], 0.25); // e * u3
    }

    #[test]
    fn imaginary_controls_drive_imaginary_coordinates() {
        let osc = CrvdoOscillator::new(coeffs())
            .with_control(ControlInput::constant([0.0, 0.75, 0.0, 2.0]));
        let out = eval(&single(osc), 0.0, &[[0.0; 4]]);
        assert_eq!(out.row(0), &[0.0, 0.75, 0.0, 0.5]); // e * u4 = 0.25 * 2
    }

    #[test]
    fn uncoupled_rows_are_independent() {
        let params = ParameterSet::new(vec![
            CrvdoOscillator::new(coeffs()),
            CrvdoOscillator::new(CrvdoCoefficients::new(0.5, 1.0, 0.1, 0.2, 0.3)),
        ])
        .unwrap();
        let model = CrvdoModel::new(params, Coupling::None).unwrap();
        let row = [0.1, 0.2, 0.3, 0.4];
        let batch = eval(&model, 0.0, &[row, [5.0, -5.0, 2.0, 1.0]]);
        let alone = eval(&single(CrvdoOscillator::new(coeffs())), 0.0, &[row]);
        assert_eq!(batch.row(0), alone.row(0));
    }

    #[test]
    fn diffusive_coupling_on_ring() {
        let params = ParameterSet::new(vec![CrvdoOscillator::new(coeffs()); 3]).unwrap();
        let uncoupled = CrvdoModel::new(params.clone(), Coupling::None).unwrap();
        let coupled = CrvdoModel::new(params, Coupling::Diffusive { strength: 0.5 }).unwrap();
        let rows = [[1.0, 0.0, 0.0, 0.0], [0.0, 2.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]];

        let a = eval(&uncoupled, 0.0, &rows);
        let b = eval(&coupled, 0.0, &rows);
        // Oscillator 0 neighbours 2 and 1.
        assert!((b.row(0)[2] - a.row(0)[2] - 0.5 * ((0.0 - 1.0) + (0.0 - 1.0))).abs() < 1e-15);
        assert!((b.row(0)[3] - a.row(0)[3] - 0.5 * 2.0).abs() < 1e-15);
        // Position derivatives are untouched.
        assert_eq!(a.row(1)[0], b.row(1)[0]);
    }

    #[test]
    fn pair_counts_single_neighbour_once() {
        let params = ParameterSet::new(vec![CrvdoOscillator::new(coeffs()); 2]).unwrap();
        let plain = CrvdoModel::new(params.clone(), Coupling::None).unwrap();
        let coupled = CrvdoModel::new(params, Coupling::Diffusive { strength: 1.0 }).unwrap();
        let rows = [[0.0; 4], [1.0, 0.0, 0.0, 0.0]];
        let a = eval(&plain, 0.0, &rows);
        let b = eval(&coupled, 0.0, &rows);
        assert!((b.row(0)[2] - a.row(0)[2] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn parallel_evaluation_is_bit_identical() {
        let params = ParameterSet::new(
            (0..32)
                .map(|i| {
                    let c = 1.0 / (16.0 + i as f64);
                    CrvdoOscillator::new(CrvdoCoefficients::new(1.25, 2.0, c, 1.0, 0.25))
                })
                .collect(),
        )
        .unwrap();
        let serial = CrvdoModel::new(params.clone(), Coupling::Diffusive { strength: 0.1 }).unwrap();
        let parallel = serial.clone().with_parallel(true);
        let rows: Vec<[f64; 4]> = (0..32)
            .map(|i| {
                let x = i as f64 * 0.1;
                [x.sin(), x.cos(), 0.5 - x, x * x]
            })
            .collect();
        assert_eq!(eval(&serial, 0.3, &rows), eval(&parallel, 0.3, &rows));
    }

    #[test]
    fn rejects_non_finite_parameters() {
        let mut bad = coeffs();
        bad.d = f64::NAN;
        let err = CrvdoModel::new(
            ParameterSet::new(vec![
                CrvdoOscillator::new(coeffs()),
                CrvdoOscillator::new(bad),
            ])
            .unwrap(),
            Coupling::None,
        )
        .unwrap_err();
        assert_eq!(err, ModelError::NonFinite { what: "d", index: 1 });

        let err = CrvdoModel::new(
            ParameterSet::new(vec![CrvdoOscillator::new(coeffs())]).unwrap(),
            Coupling::Diffusive {
                strength: f64::INFINITY,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidArg { .. }));
    }
}
