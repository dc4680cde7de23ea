//! The handout figure: sin(x) on \[0, 10\], saved as `./figures/sin.pdf`.

use std::path::{Path, PathBuf};
use log::{debug, info};
use crate::{sampling::Sampling, subplots, Axes, Error, Figure};

/// Where the binary writes the figure, relative to the working directory.
pub const FIGURE_PATH: &str = "./figures/sin.pdf";

/// Settings of the sine figure.  [`Default`] gives the handout's values.
#[derive(Debug, Clone, PartialEq)]
pub struct SineFigure {
    a: f64,
    b: f64,
    n: usize,
    fmt: String,
    xlabel: String,
    ylabel: String,
    format: String,
    path: PathBuf,
}

impl Default for SineFigure {
    fn default() -> Self {
        SineFigure {
            a: 0.,
            b: 10.,
            n: 1001,
            fmt: "-".into(),
            xlabel: "x".into(),
            ylabel: "y".into(),
            format: "pdf".into(),
            path: PathBuf::from(FIGURE_PATH),
        }
    }
}

impl SineFigure {
    pub fn new() -> Self { Self::default() }

    /// Set the interval \[`a`, `b`\] on which sin is sampled.
    pub fn interval(&mut self, a: f64, b: f64) -> &mut Self {
        self.a = a;
        self.b = b;
        self
    }

    /// Set the number of sample points.
    pub fn n(&mut self, n: usize) -> &mut Self {
        self.n = n;
        self
    }

    pub fn labels(&mut self, x: &str, y: &str) -> &mut Self {
        self.xlabel = x.into();
        self.ylabel = y.into();
        self
    }

    /// Set the output file.  Its directory must exist when rendering.
    pub fn output(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn output_path(&self) -> &Path { &self.path }

    /// Sample sin at `n` evenly spaced points of the interval.
    pub fn sample(&self) -> Sampling {
        debug!("sampling sin at {} points of [{}, {}]", self.n, self.a, self.b);
        Sampling::fun(f64::sin, self.a, self.b, self.n)
    }

    /// Draw the sampled curve on a new figure with labeled axes.
    pub fn draw(&self, s: &Sampling) -> Result<(Figure, Axes), Error> {
        let (fig, mut ax) = subplots()?;
        ax.xy(s.x(), s.y()).fmt(&self.fmt).plot()?;
        ax.set_xlabel(&self.xlabel)?.set_ylabel(&self.ylabel)?;
        Ok((fig, ax))
    }

    /// Sample, draw and save the figure to the output path, replacing
    /// any previous file.  The figure is released once written.
    pub fn render(&self) -> Result<(), Error> {
        let s = self.sample();
        let (fig, _) = self.draw(&s)?;
        fig.save().format(&self.format).to_file(&self.path)?;
        info!("wrote {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let h = SineFigure::default();
        assert_eq!(h.output_path(), Path::new("./figures/sin.pdf"));
        let s = h.sample();
        assert_eq!(s.len(), 1001);
        assert_eq!(s.x()[0], 0.);
        assert_eq!(s.x()[1000], 10.);
    }

    #[test]
    fn setters() {
        let mut h = SineFigure::new();
        h.interval(-1., 1.).n(3).labels("t", "sin t").output("out.pdf");
        assert_eq!(h.sample().x().to_vec(), [-1., 0., 1.]);
        assert_eq!(h.output_path(), Path::new("out.pdf"));
        assert_ne!(h, SineFigure::default());
    }
}
