use std::ops::Index;

use crate::{Error, Point, Result, MIN_CONTROL_POINTS, PADDING};

/// An ordered sequence of control points for a curve.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPolygon<const D: usize> {
    points: Vec<Point<D>>,
}

impl<const D: usize> ControlPolygon<D> {
    pub fn new(points: Vec<Point<D>>) -> Result<Self> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(Error::TooFewControlPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point<D>] {
        &self.points
    }

    pub fn first(&self) -> &Point<D> {
        &self.points[0]
    }

    pub fn last(&self) -> &Point<D> {
        &self.points[self.points.len() - 1]
    }

    /// The sequence with [`PADDING`] extra copies of each end point, which
    /// makes a uniform cubic B-spline pass through both ends.
    pub fn padded(&self) -> Vec<Point<D>> {
        let mut out = Vec::with_capacity(self.points.len() + 2 * PADDING);
        out.extend(std::iter::repeat(*self.first()).take(PADDING));
        out.extend_from_slice(&self.points);
        out.extend(std::iter::repeat(*self.last()).take(PADDING));
        out
    }
}

impl<const D: usize> Index<usize> for ControlPolygon<D> {
    type Output = Point<D>;
    fn index(&self, i: usize) -> &Point<D> {
        &self.points[i]
    }
}

/// A rectangular grid of control points, indexed by `(row, column)`.
///
/// Rows run along the surface's `u` direction and columns along `v`.
/// Points are stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlGrid<const D: usize> {
    rows: usize,
    cols: usize,
    points: Vec<Point<D>>,
}

impl<const D: usize> ControlGrid<D> {
    /// Builds a grid from nested rows, which must all have the same length.
    pub fn new(rows: Vec<Vec<Point<D>>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != cols {
                return Err(Error::RaggedGrid {
                    row,
                    expected: cols,
                    actual: r.len(),
                });
            }
        }
        let n = rows.len();
        Self::from_flat(n, cols, rows.into_iter().flatten().collect())
    }

    /// Builds a grid from row-major points.
    pub fn from_flat(rows: usize, cols: usize, points: Vec<Point<D>>) -> Result<Self> {
        if rows < MIN_CONTROL_POINTS || cols < MIN_CONTROL_POINTS {
            return Err(Error::GridTooSmall { rows, cols });
        }
        if points.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: rows * cols,
                actual: points.len(),
            });
        }
        Ok(Self { rows, cols, points })
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Point<D>,
    {
        if rows < MIN_CONTROL_POINTS || cols < MIN_CONTROL_POINTS {
            return Err(Error::GridTooSmall { rows, cols });
        }
        let mut points = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                points.push(f(i, j));
            }
        }
        Self::from_flat(rows, cols, points)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Point<D>> {
        if row < self.rows && col < self.cols {
            self.points.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> &[Point<D>] {
        &self.points[i * self.cols..(i + 1) * self.cols]
    }

    pub fn column(&self, j: usize) -> Vec<Point<D>> {
        (0..self.rows).map(|i| self[(i, j)]).collect()
    }

    /// Row-major iterator over all points.
    pub fn iter(&self) -> impl Iterator<Item = &Point<D>> {
        self.points.iter()
    }

    /// Applies `f` to every point, keeping the shape.
    pub fn map<const E: usize, F>(&self, f: F) -> ControlGrid<E>
    where
        F: FnMut(&Point<D>) -> Point<E>,
    {
        ControlGrid {
            rows: self.rows,
            cols: self.cols,
            points: self.points.iter().map(f).collect(),
        }
    }

    /// Four corner points, in the order `(0, 0)`, `(0, last)`, `(last, 0)`,
    /// `(last, last)`.
    pub fn corners(&self) -> [Point<D>; 4] {
        let (r, c) = (self.rows - 1, self.cols - 1);
        [self[(0, 0)], self[(0, c)], self[(r, 0)], self[(r, c)]]
    }

    /// Adds a [`PADDING`]-wide clamping border on every side.
    ///
    /// Each border row (column) repeats the nearest edge row (column), and
    /// each `PADDING × PADDING` corner block repeats the nearest corner.
    pub fn padded(&self) -> ControlGrid<D> {
        let rows = self.rows + 2 * PADDING;
        let cols = self.cols + 2 * PADDING;
        let source = |k: usize, n: usize| k.saturating_sub(PADDING).min(n - 1);

        let mut points = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                points.push(self[(source(i, self.rows), source(j, self.cols))]);
            }
        }
        ControlGrid { rows, cols, points }
    }
}

impl<const D: usize> Index<(usize, usize)> for ControlGrid<D> {
    type Output = Point<D>;
    fn index(&self, (row, col): (usize, usize)) -> &Point<D> {
        assert!(col < self.cols, "column {col} out of range ({})", self.cols);
        &self.points[row * self.cols + col]
    }
}
