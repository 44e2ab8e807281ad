//! Runge–Kutta–Fehlberg 4(5) coefficients.
//!
//! Six stages shared by an embedded 4th-order and 5th-order solution from:
//! Fehlberg, E. (1969). "Low-order classical Runge-Kutta formulas with
//! stepsize control and their application to some heat transfer problems"
//! NASA TR R-315, Table III.

/// Number of stage evaluations per step
pub const STAGES: usize = 6;

/// Order of the lower-order solution (drives the step-size exponent)
pub const LOW_ORDER: u8 = 4;

/// Node coefficients: stage i is evaluated at t + C[i] * h
pub const C: [f64; STAGES] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];

/// Lower-triangular Runge-Kutta matrix:
/// k_i = f(t + c_i h, y + h * Σ_{j<i} A[i][j] k_j)
pub const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

/// 4th-order weights
pub const B4: [f64; STAGES] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

/// 5th-order weights (the solution carried forward)
pub const B5: [f64; STAGES] = [
    16.0 / 135.0,
    0.0,
    6656.0 / 12825.0,
    28561.0 / 56430.0,
    -9.0 / 50.0,
    2.0 / 55.0,
];
