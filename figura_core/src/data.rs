// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable data sets and their extents.

use std::sync::Arc;

/// An immutable, shared set of 2D or 3D points.
///
/// The coordinate buffer is stored flat (`x0, y0, x1, y1, ...` or
/// `x0, y0, z0, ...`) behind an [`Arc`], so cloning a data set never copies
/// samples. Two data sets compare equal only if they share the same buffer.
#[derive(Clone, Debug)]
pub struct DataSet {
    id: u32,
    dim: u8,
    coords: Arc<[f64]>,
}

impl DataSet {
    /// Creates a 2D data set from `(x, y)` pairs.
    #[must_use]
    pub fn xy(id: u32, points: &[(f64, f64)]) -> Self {
        let coords: Vec<f64> = points.iter().flat_map(|&(x, y)| [x, y]).collect();
        Self {
            id,
            dim: 2,
            coords: coords.into(),
        }
    }

    /// Creates a 3D data set from `(x, y, z)` triples.
    #[must_use]
    pub fn xyz(id: u32, points: &[(f64, f64, f64)]) -> Self {
        let coords: Vec<f64> = points.iter().flat_map(|&(x, y, z)| [x, y, z]).collect();
        Self {
            id,
            dim: 3,
            coords: coords.into(),
        }
    }

    /// Wraps a flat coordinate buffer.
    ///
    /// Returns `None` if `dim` is not 2 or 3, or if the buffer length is not
    /// a multiple of `dim`.
    #[must_use]
    pub fn from_flat(id: u32, dim: u8, coords: Arc<[f64]>) -> Option<Self> {
        if !(2..=3).contains(&dim) || coords.len() % usize::from(dim) != 0 {
            return None;
        }
        Some(Self { id, dim, coords })
    }

    /// The data set's identifier.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of coordinates per point (2 or 3).
    #[must_use]
    pub fn dim(&self) -> u8 {
        self.dim
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / usize::from(self.dim)
    }

    /// Returns whether the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterates over the points; 2D points report `z = 0`.
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.coords.chunks_exact(usize::from(self.dim)).map(|c| {
            [c[0], c[1], c.get(2).copied().unwrap_or(0.0)]
        })
    }

    /// The finite min/max extent, ignoring non-finite coordinates.
    #[must_use]
    pub fn extent(&self) -> DataExtent {
        let mut ext = DataExtent::EMPTY;
        for p in self.points() {
            ext.x.include(p[0]);
            ext.y.include(p[1]);
            if self.dim == 3 {
                ext.z.include(p[2]);
            }
        }
        ext
    }
}

impl PartialEq for DataSet {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.coords, &other.coords)
    }
}

/// A closed interval accumulated from samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Smallest finite sample, or `+inf` if none.
    pub min: f64,
    /// Largest finite sample, or `-inf` if none.
    pub max: f64,
}

impl Span {
    /// An interval containing nothing.
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Returns whether at least one finite sample was included.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Widens the interval to include `v` if it is finite.
    pub fn include(&mut self, v: f64) {
        if v.is_finite() {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    /// Widens the interval to cover `other`.
    pub fn union(&mut self, other: Self) {
        if other.is_valid() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }
}

/// The reported data extent of a plottable node:
/// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataExtent {
    /// X extent.
    pub x: Span,
    /// Y extent.
    pub y: Span,
    /// Z extent; invalid when the node has no Z data.
    pub z: Span,
}

impl DataExtent {
    /// An extent covering nothing.
    pub const EMPTY: Self = Self {
        x: Span::EMPTY,
        y: Span::EMPTY,
        z: Span::EMPTY,
    };

    /// Widens every component to cover `other`.
    pub fn union(&mut self, other: &Self) {
        self.x.union(other.x);
        self.y.union(other.y);
        self.z.union(other.z);
    }
}
