//! Dense N×D state buffer for a batch of oscillators.

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// State of `len` oscillators with `dim` coordinates each.
///
/// Stored row-major: row `i` holds the coordinates of oscillator `i`.
/// The shape is fixed at construction; every arithmetic helper requires
/// operands of identical shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBatchState"))]
pub struct BatchState {
    len: usize,
    dim: usize,
    data: Vec<Real>,
}

/// Unchecked wire form; converted through the shape checks on load.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBatchState {
    len: usize,
    dim: usize,
    data: Vec<Real>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBatchState> for BatchState {
    type Error = CoreError;

    fn try_from(raw: RawBatchState) -> CoreResult<Self> {
        let expected = checked_size(raw.len, raw.dim)?;
        if raw.data.len() != expected {
            return Err(CoreError::ShapeMismatch {
                what: "serialized state",
                expected: (raw.len, raw.dim),
                actual: (raw.data.len() / raw.dim, raw.dim),
            });
        }
        Ok(Self {
            len: raw.len,
            dim: raw.dim,
            data: raw.data,
        })
    }
}

/// `len * dim` for a non-empty shape.
fn checked_size(len: usize, dim: usize) -> CoreResult<usize> {
    if len == 0 {
        return Err(CoreError::InvalidArg {
            what: "batch must contain at least one oscillator",
        });
    }
    if dim == 0 {
        return Err(CoreError::InvalidArg {
            what: "oscillator state must have at least one coordinate",
        });
    }
    len.checked_mul(dim).ok_or(CoreError::InvalidArg {
        what: "batch shape overflows usize",
    })
}

impl BatchState {
    /// All-zero state with `len` rows of `dim` coordinates.
    pub fn zeros(len: usize, dim: usize) -> CoreResult<Self> {
        let size = checked_size(len, dim)?;
        Ok(Self {
            len,
            dim,
            data: vec![0.0; size],
        })
    }

    /// Build from explicit rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[Real]>>(rows: &[R]) -> CoreResult<Self> {
        let dim = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut state = Self::zeros(rows.len(), dim)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(CoreError::ShapeMismatch {
                    what: "state row",
                    expected: (i, dim),
                    actual: (i, row.len()),
                });
            }
            state.row_mut(i).copy_from_slice(row);
        }
        Ok(state)
    }

    /// Same row repeated `len` times.
    pub fn broadcast(row: &[Real], len: usize) -> CoreResult<Self> {
        let mut state = Self::zeros(len, row.len())?;
        for r in state.rows_mut() {
            r.copy_from_slice(row);
        }
        Ok(state)
    }

    /// Number of oscillators (N).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a batch holds at least one oscillator.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Coordinates per oscillator (D).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `(N, D)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.len, self.dim)
    }

    pub fn same_shape(&self, other: &BatchState) -> bool {
        self.shape() == other.shape()
    }

    pub fn row(&self, i: usize) -> &[Real] {
        let start = i * self.dim;
        &self.data[start..start + self.dim]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [Real] {
        let start = i * self.dim;
        &mut self.data[start..start + self.dim]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Real]> {
        self.data.chunks_exact(self.dim)
    }

    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [Real]> {
        self.data.chunks_exact_mut(self.dim)
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Real] {
        &mut self.data
    }

    /// Checked element access.
    pub fn get(&self, i: usize, j: usize) -> CoreResult<Real> {
        self.check_index(i, j)?;
        Ok(self.data[i * self.dim + j])
    }

    /// Checked element write.
    pub fn set(&mut self, i: usize, j: usize, value: Real) -> CoreResult<()> {
        self.check_index(i, j)?;
        self.data[i * self.dim + j] = value;
        Ok(())
    }

    /// Overwrite with the contents of `other` (shapes must match).
    pub fn copy_from(&mut self, other: &BatchState) {
        debug_assert!(self.same_shape(other));
        self.data.copy_from_slice(&other.data);
    }

    /// Location of the first NaN/Inf as `(row, col)`, if any.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|k| (k / self.dim, k % self.dim))
    }

    /// Infinity norm of `self - other` over all N×D components.
    pub fn max_abs_diff(&self, other: &BatchState) -> Real {
        debug_assert!(self.same_shape(other));
        self.data
            .iter()
            .zip(&other.data)
            .fold(0.0, |acc: Real, (a, b)| acc.max((a - b).abs()))
    }

    /// Ensure this state has shape `(len, dim)`.
    pub fn expect_shape(&self, what: &'static str, len: usize, dim: usize) -> CoreResult<()> {
        if self.shape() != (len, dim) {
            return Err(CoreError::ShapeMismatch {
                what,
                expected: (len, dim),
                actual: self.shape(),
            });
        }
        Ok(())
    }

    fn check_index(&self, i: usize, j: usize) -> CoreResult<()> {
        if i >= self.len {
            return Err(CoreError::IndexOob {
                what: "oscillator",
                index: i,
                len: self.len,
            });
        }
        if j >= self.dim {
            return Err(CoreError::IndexOob {
                what: "coordinate",
                index: j,
                len: self.dim,
            });
        }
        Ok(())
    }
}
