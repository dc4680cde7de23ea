//! Uniform sampling of real functions on a closed interval.

use ndarray::{s, Array1};

/// Return `n` evenly spaced values over the closed interval \[`a`, `b`\].
///
/// Both endpoints are included: the first value is exactly `a` and the
/// last one exactly `b` (when `n` ≥ 2).  If `n` = 1, the result is
/// `[a]`; if `n` = 0, it is empty.
///
/// # Example
///
/// ```
/// let x = sinplot::sampling::linspace(0., 1., 5);
/// assert_eq!(x.to_vec(), [0., 0.25, 0.5, 0.75, 1.]);
/// ```
pub fn linspace(a: f64, b: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, a),
        _ => {
            let mut x = Array1::linspace(a, b, n);
            // Rounding of `a + i * step` must not move the right endpoint.
            x[n - 1] = b;
            x
        }
    }
}

/// A function sampled at evenly spaced points.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Sampling {
    /// Sample `f` at `n` evenly spaced points of \[`a`, `b`\].
    ///
    /// # Example
    ///
    /// ```
    /// use sinplot::sampling::Sampling;
    /// let s = Sampling::fun(f64::sin, 0., 10., 1001);
    /// assert_eq!(s.len(), 1001);
    /// assert_eq!(s.x()[1000], 10.);
    /// ```
    pub fn fun<F>(mut f: F, a: f64, b: f64, n: usize) -> Self
    where F: FnMut(f64) -> f64 {
        let x = linspace(a, b, n);
        let y = x.mapv(|xi| f(xi));
        Sampling { x, y }
    }

    /// The abscissas (domain sequence), in increasing order if `a` ≤ `b`.
    pub fn x(&self) -> &Array1<f64> { &self.x }

    /// The values `f(x[i])`, index-aligned with [`Sampling::x`].
    pub fn y(&self) -> &Array1<f64> { &self.y }

    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    /// Iterate over the sampled points `(x[i], y[i])`.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Largest distance between two consecutive abscissas.
    pub fn max_step(&self) -> f64 {
        if self.len() < 2 {
            return 0.;
        }
        let dx = &self.x.slice(s![1..]) - &self.x.slice(s![..-1]);
        dx.fold(0., |m: f64, &d| m.max(d.abs()))
    }
}
