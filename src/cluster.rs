//! Clusters of lattice points, compared up to lattice translation. This is the prim-periodic
//! setting: two clusters are the same orbit member if one is a translate of the other, so every
//! cluster is stored translated so that its smallest point sits at the origin.

use log::debug;

use crate::{
    orbit::{make_orbit, Orbit},
    symop::{LatticePoint, SymOp},
};

/// A set of lattice points, sorted and deduplicated.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cluster {
    points: Vec<LatticePoint>,
}

impl Cluster {
    pub fn new(points: Vec<LatticePoint>) -> Self {
        let mut points = points;
        points.sort_unstable();
        points.dedup();
        Self { points }
    }

    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Translates the cluster so its smallest point is the origin. Translation keeps the points
    /// sorted.
    pub fn translate_to_origin(&self) -> Self {
        match self.points.first() {
            Some(&[x0, y0, z0]) => Self {
                points: self
                    .points
                    .iter()
                    .map(|[x, y, z]| [x - x0, y - y0, z - z0])
                    .collect(),
            },
            None => self.clone(),
        }
    }

    /// Applies `op` to every point, then translates back to the origin.
    pub fn copy_apply(&self, op: &SymOp) -> Self {
        Self::new(self.points.iter().map(|p| op.apply_point(p)).collect()).translate_to_origin()
    }
}

impl FromIterator<LatticePoint> for Cluster {
    fn from_iter<I: IntoIterator<Item = LatticePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn apply_op(op: &SymOp, cluster: &Cluster) -> Cluster {
    cluster.copy_apply(op)
}

/// The orbit of `cluster` under `ops`, with members compared up to lattice translation.
pub fn prim_periodic_orbit(cluster: &Cluster, ops: &[SymOp]) -> Orbit<Cluster> {
    let orbit = make_orbit(&cluster.translate_to_origin(), ops, &apply_op);
    debug!(
        "Cluster of {} points has {} translationally distinct images",
        cluster.len(),
        orbit.len()
    );
    orbit
}

/// The orbit of a single lattice point under `ops`, without translation equivalence.
pub fn site_orbit(point: &LatticePoint, ops: &[SymOp]) -> Orbit<LatticePoint> {
    make_orbit(point, ops, &|op: &SymOp, p: &LatticePoint| op.apply_point(p))
}
