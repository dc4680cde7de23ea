//! Sine-wave figure for a course handout, drawn with [Matplotlib][].
//!
//! Usage
//! -----
//!
//! The binary `sinplot` samples sin(x) at 1001 evenly spaced points of
//! \[0, 10\] and writes the curve to `./figures/sin.pdf`.  The library
//! exposes the pieces: [`sampling`] for the data, a thin plotting layer
//! ([`Figure`], [`Axes`]) close to Matplotlib's explicit interface, and
//! [`SineFigure`] tying them together.
//!
//! ```no_run
//! use sinplot as plt;
//! let (fig, mut ax) = plt::subplots()?;
//! ax.fun(f64::sin, 0., 10.).n(1001).plot()?;
//! ax.set_xlabel("x")?.set_ylabel("y")?;
//! fig.save().to_file("figures/sin.pdf")?;
//! # Ok::<(), sinplot::Error>(())
//! ```
//!
//! [Matplotlib]: https://matplotlib.org/

use std::{
    fmt::{Display, Formatter},
    mem::swap,
    path::Path,
};
use lazy_static::lazy_static;
use log::debug;
use ndarray::{ArrayBase, Ix1};
use numpy::{PyArray1, ToPyArray};
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};

pub mod sampling;
pub mod handout;

pub use handout::SineFigure;
use sampling::Sampling;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

macro_rules! meth {
    ($obj: expr, $m: ident, $args: expr) => {
        Python::with_gil(|py| {
            $obj.bind(py).call_method1(intern!(py, stringify!($m)), $args)
                .map(|_| ())
                .map_err(Error::Python)
        })
    };
}

/// Possible errors when building or saving a figure.
#[derive(Debug)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.  Carries Python's `FileNotFoundError`.
    FileNotFoundError(PyErr),
    /// Permission denied to access or create the filesystem path.
    /// Carries Python's `PermissionError`.
    PermissionError(PyErr),
    /// The x and y data passed to [`Axes::xy`] have different lengths.
    LengthMismatch(usize, usize),
    /// Other Python errors.
    Python(PyErr),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::NoMatplotlib =>
                write!(f, "The matplotlib library has not been found.\n\
Please install it.  See https://matplotlib.org/\n\
If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554"),
            Error::FileNotFoundError(e) =>
                write!(f, "A path contains an element that is not a \
                           directory or does not exist ({})", e),
            Error::PermissionError(e) =>
                write!(f, "Permission denied to access or create the \
                           filesystem path ({})", e),
            Error::LengthMismatch(nx, ny) =>
                write!(f, "x has {} points but y has {}", nx, ny),
            Error::Python(e) =>
                write!(f, "Python error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileNotFoundError(e)
            | Error::PermissionError(e)
            | Error::Python(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Map an exception raised while writing a file to [`Error`].
    fn from_savefig(py: Python<'_>, e: PyErr) -> Self {
        if e.is_instance_of::<PyFileNotFoundError>(py) {
            Error::FileNotFoundError(e)
        } else if e.is_instance_of::<PyPermissionError>(py) {
            Error::PermissionError(e)
        } else {
            Error::Python(e)
        }
    }
}

impl From<PyErr> for Error {
    fn from(e: PyErr) -> Self { Error::Python(e) }
}

lazy_static! {
    static ref FIGURE: Result<Py<PyModule>, PyErr> = {
        Python::with_gil(|py| {
            PyModule::import_bound(py, intern!(py, "matplotlib.figure"))
                .map(Bound::unbind)
        })
    };
}


/// Trait expressing that `Self` is a 1D sequence of floats that can be
/// handed to Matplotlib as a `numpy.ndarray`.
pub trait Data {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>>;

    /// Number of points in the sequence.
    fn npoints(&self) -> usize;
}

impl Data for [f64] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.to_pyarray_bound(py)
    }

    fn npoints(&self) -> usize { self.len() }
}

impl<const N: usize> Data for [f64; N] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self[..].to_pyarray_bound(py)
    }

    fn npoints(&self) -> usize { N }
}

impl Data for Vec<f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self[..].to_pyarray_bound(py)
    }

    fn npoints(&self) -> usize { self.len() }
}

impl<S> Data for ArrayBase<S, Ix1>
where S: ndarray::Data<Elem = f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.to_pyarray_bound(py)
    }

    fn npoints(&self) -> usize { self.len() }
}

/// A single plotting area of a [`Figure`].
#[derive(Debug)]
pub struct Axes {
    ax: PyObject, // instance of matplotlib.axes.Axes
}

/// The top level container for all the plot elements.
///
/// The underlying Python object is released when the `Figure` is dropped.
#[derive(Debug)]
pub struct Figure {
    fig: PyObject, // instance of matplotlib.figure.Figure
}

impl Figure {
    /// Return a new `Figure` with Matplotlib's default size and DPI.
    ///
    /// The figure is not managed by `pyplot`, so no GUI backend is
    /// involved.  Return an error if Matplotlib is not present on the
    /// system.
    pub fn new() -> Result<Figure, Error> {
        // ⚠ The first access locks the GIL: keep it outside `with_gil`.
        let figure = FIGURE.as_ref().map_err(|_| Error::NoMatplotlib)?;
        Python::with_gil(|py| {
            let fig = figure.bind(py)
                .getattr(intern!(py, "Figure"))?
                .call0()?;
            Ok(Figure { fig: fig.unbind() })
        })
    }

    /// Add a single [`Axes`] filling the figure.
    pub fn subplot(&self) -> Result<Axes, Error> {
        Python::with_gil(|py| {
            let ax = self.fig.bind(py)
                .call_method0(intern!(py, "subplots"))?;
            Ok(Axes { ax: ax.unbind() })
        })
    }

    /// Start a "save" request, see [`Savefig`].
    pub fn save(&self) -> Savefig<'_> {
        Savefig { fig: self, format: None }
    }
}

/// Options of [`Figure::save`].  Options not set use Matplotlib's
/// defaults; the format is then deduced from the file extension.
pub struct Savefig<'a> {
    fig: &'a Figure,
    format: Option<&'a str>,
}

impl<'a> Savefig<'a> {
    /// Set the file format explicitly, e.g. "pdf" or "svg".
    pub fn format(&mut self, format: &'a str) -> &mut Self {
        self.format = Some(format);
        self
    }

    /// Write the figure to `path`, replacing any existing file.
    ///
    /// Missing parent directories are not created: the call then fails
    /// with [`Error::FileNotFoundError`] and nothing is written.  An
    /// unwritable directory gives [`Error::PermissionError`].
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        debug!("savefig {}", path.display());
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            if let Some(format) = self.format {
                kwargs.set_item("format", format)?;
            }
            self.fig.fig.bind(py).call_method(
                intern!(py, "savefig"), (path,), Some(&kwargs)
            ).map_err(|e| Error::from_savefig(py, e))?;
            Ok(())
        })
    }
}


/// Return a new figure together with its single axes.
pub fn subplots() -> Result<(Figure, Axes), Error> {
    let fig = Figure::new()?;
    let ax = fig.subplot()?;
    Ok((fig, ax))
}


impl Axes {
    /// Plot `y` versus `x` as lines and/or markers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sinplot as plt;
    /// let (fig, mut ax) = plt::subplots()?;
    /// ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).plot()?;
    /// fig.save().to_file("target/XY_plot.pdf")?;
    /// # Ok::<(), sinplot::Error>(())
    /// ```
    #[must_use]
    pub fn xy<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        // The chain leading to plot starts with the data so that
        // additional data may be added, sharing common options.  `self`
        // is borrowed mutably because `.plot()` mutates the Python object.
        XY { axes: self,
             options: PlotOptions::new(),
             data: (x, y),
             prev_data: vec![] }
    }

    /// Plot the graph of the function `f` on the interval \[`a`, `b`\],
    /// sampled at evenly spaced points (100 by default, see [`Fun::n`]).
    ///
    /// # Example
    /// ```no_run
    /// use sinplot as plt;
    /// let (fig, mut ax) = plt::subplots()?;
    /// ax.fun(|x| x * x, 0., 1.).plot()?;
    /// fig.save().to_file("target/Fun_plot.pdf")?;
    /// # Ok::<(), sinplot::Error>(())
    /// ```
    #[must_use]
    pub fn fun<'a, F>(&'a mut self, f: F, a: f64, b: f64) -> Fun<'a, F>
    where F: FnMut(f64) -> f64 {
        Fun { axes: self,
              options: PlotOptions::new(),
              f, a, b,
              n: 100 }
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_xlabel, (label,))?;
        Ok(self)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_ylabel, (label,))?;
        Ok(self)
    }

    fn get_str(&self, m: &str) -> Result<String, Error> {
        Python::with_gil(|py| {
            Ok(self.ax.bind(py).call_method0(m)?.extract()?)
        })
    }

    pub fn title(&self) -> Result<String, Error> { self.get_str("get_title") }

    pub fn xlabel(&self) -> Result<String, Error> { self.get_str("get_xlabel") }

    pub fn ylabel(&self) -> Result<String, Error> { self.get_str("get_ylabel") }

    /// Number of lines drawn on these axes.
    pub fn nlines(&self) -> Result<usize, Error> {
        Python::with_gil(|py| {
            Ok(self.ax.bind(py).call_method0(intern!(py, "get_lines"))?.len()?)
        })
    }
}

#[derive(Clone)]
struct PlotOptions<'a> {
    fmt: &'a str,
    label: &'a str,
}

impl<'a> PlotOptions<'a> {
    fn new() -> PlotOptions<'static> {
        PlotOptions { fmt: "", label: "" }
    }

    fn kwargs<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let kwargs = PyDict::new_bound(py);
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label)?;
        }
        Ok(kwargs)
    }

    fn plot_xy<D>(&self, py: Python<'_>, axes: &Axes, x: &D, y: &D)
        -> Result<(), Error>
    where D: Data + ?Sized {
        if x.npoints() != y.npoints() {
            return Err(Error::LengthMismatch(x.npoints(), y.npoints()));
        }
        debug!("plot {} points, fmt {:?}", x.npoints(), self.fmt);
        let xn = x.to_numpy(py);
        let yn = y.to_numpy(py);
        axes.ax.bind(py).call_method(
            intern!(py, "plot"), (xn, yn, self.fmt),
            Some(&self.kwargs(py)?))?;
        Ok(())
    }
}

/// Declare methods to set the options assuming `self.options` exists.
macro_rules! set_plotoptions { () => {
    /// Matplotlib format string, e.g. "-" for a solid line, "r." for
    /// red dots.
    #[must_use]
    pub fn fmt(mut self, fmt: &'a str) -> Self {
        self.options.fmt = fmt;
        self
    }

    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }
}}

#[must_use]
pub struct XY<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    // Latest data and its setting.
    options: PlotOptions<'a>,
    data: (&'a D, &'a D),
    // Previous data with their settings.
    prev_data: Vec<(PlotOptions<'a>, (&'a D, &'a D))>,
}

impl<'a, D> XY<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Plot the data with the options specified in [`XY`].
    ///
    /// Nothing is drawn if one of the datasets has mismatched lengths.
    pub fn plot(self) -> Result<(), Error> {
        let datasets = self.prev_data.iter().map(|(_, d)| *d)
            .chain(std::iter::once(self.data));
        for (x, y) in datasets {
            if x.npoints() != y.npoints() {
                return Err(Error::LengthMismatch(x.npoints(), y.npoints()));
            }
        }
        Python::with_gil(|py| {
            for (opt, (x, y)) in self.prev_data.iter() {
                opt.plot_xy(py, self.axes, *x, *y)?;
            }
            let (x, y) = self.data;
            self.options.plot_xy(py, self.axes, x, y)
        })
    }

    /// Add the dataset (`x`, `y`).  The options set so far apply to the
    /// previous dataset and are carried over to this one.
    pub fn xy(mut self, x: &'a D, y: &'a D) -> Self {
        let mut data = (x, y);
        swap(&mut data, &mut self.data);
        self.prev_data.push((self.options.clone(), data));
        self
    }
}

/// Options to plot functions.
#[must_use]
pub struct Fun<'a, F> {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    f: F,
    a: f64, // [a, b] is the interval on which we want to plot f.
    b: f64,
    n: usize,
}

impl<'a, F> Fun<'a, F>
where F: FnMut(f64) -> f64 {
    set_plotoptions!();

    /// Plot the data with the options specified in [`Fun`].
    pub fn plot(mut self) -> Result<(), Error> {
        let s = Sampling::fun(&mut self.f, self.a, self.b, self.n);
        Python::with_gil(|py| {
            self.options.plot_xy(py, self.axes, s.x(), s.y()) })
    }

    /// Set the number of evaluations of the function.
    /// Panic if `n` < 2.
    pub fn n(mut self, n: usize) -> Self {
        if n < 2 {
            panic!("sinplot::Fun::n: at least two points are required.");
        }
        self.n = n;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_basic_pdf() -> Result<(), Error> {
        let (fig, mut ax) = subplots()?;
        ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).plot()?;
        assert_eq!(ax.nlines()?, 1);
        fig.save().to_file("target/a_basic.pdf")?;
        Ok(())
    }

    #[test]
    fn several_datasets() -> Result<(), Error> {
        let (_fig, mut ax) = subplots()?;
        let x = vec![1., 2., 3.];
        let y1 = vec![1., 4., 2.];
        let y2 = vec![2., 0., 1.];
        ax.xy(&x, &y1).fmt("r").xy(&x, &y2).fmt("b.").plot()?;
        assert_eq!(ax.nlines()?, 2);
        Ok(())
    }

    #[test]
    fn length_mismatch_draws_nothing() -> Result<(), Error> {
        let (_fig, mut ax) = subplots()?;
        let x = vec![1., 2., 3.];
        let y = vec![1., 4.];
        match ax.xy(&x, &y).plot() {
            Err(Error::LengthMismatch(3, 2)) => (),
            r => panic!("unexpected result {:?}", r),
        }
        assert_eq!(ax.nlines()?, 0);
        Ok(())
    }

    #[test]
    fn fun_plot() -> Result<(), Error> {
        let (_fig, mut ax) = subplots()?;
        ax.fun(|x| x * x, 0., 1.).n(5).label("x²").plot()?;
        assert_eq!(ax.nlines()?, 1);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn fun_needs_two_points() {
        let f = |x: f64| x;
        // Build `Fun` directly: no Python needed to reach the check.
        let ax = Axes { ax: Python::with_gil(|py| py.None()) };
        let _ = Fun { axes: &ax, options: PlotOptions::new(),
                      f, a: 0., b: 1., n: 100 }.n(1);
    }

    #[test]
    fn labels() -> Result<(), Error> {
        let (_fig, mut ax) = subplots()?;
        ax.set_xlabel("x")?.set_ylabel("y")?;
        assert_eq!(ax.xlabel()?, "x");
        assert_eq!(ax.ylabel()?, "y");
        assert_eq!(ax.title()?, "");
        Ok(())
    }

    #[test]
    fn missing_directory() -> Result<(), Error> {
        let (fig, _ax) = subplots()?;
        match fig.save().to_file("target/no/such/dir/fig.pdf") {
            Err(Error::FileNotFoundError(_)) => Ok(()),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn savefig_error_kinds() {
        Python::with_gil(|py| {
            let e = PyPermissionError::new_err("[Errno 13] Permission denied");
            let e = Error::from_savefig(py, e);
            assert!(matches!(e, Error::PermissionError(_)));
            assert!(e.to_string().contains("Errno 13"));
            let e = PyFileNotFoundError::new_err("[Errno 2] No such file");
            assert!(matches!(Error::from_savefig(py, e),
                             Error::FileNotFoundError(_)));
            let e = pyo3::exceptions::PyValueError::new_err("bad format");
            assert!(matches!(Error::from_savefig(py, e), Error::Python(_)));
        })
    }

    #[test]
    fn error_display() {
        let e = Error::LengthMismatch(3, 2);
        assert_eq!(e.to_string(), "x has 3 points but y has 2");
        assert!(Error::NoMatplotlib.to_string().contains("matplotlib"));
    }
}
