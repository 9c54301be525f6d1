//! Symmetry operations on an integer lattice, in fractional coordinates. Rotations are unimodular
//! integer matrices, so composition and inversion stay exact and operations can be compared with
//! `==`.

use std::{fmt::Display, ops::Mul, str::FromStr};

use log::debug;
use nalgebra::{Matrix3, Vector3};
use num_traits::Zero;
use thiserror::Error;

use crate::algebra::{generate_elements, FiniteGroup, FinitelyGeneratedGroup, Group};

/// A lattice point in fractional coordinates.
pub type LatticePoint = [i64; 3];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymOpError {
    #[error("Matrix not unimodular: {0}")]
    NotUnimodular(Matrix3<i64>),
    #[error("Cannot parse coordinate: {0}")]
    CoordParse(String),
    #[error("Inverse of {0} does not fit in 64-bit integers")]
    InverseOverflow(Matrix3<i64>),
    #[error("Generators do not close into a finite group of at most {max_order} operations")]
    InfiniteGroup { max_order: usize },
}

/// No finite group of integer 3x3 matrices has more operations than m-3m.
pub const MAX_POINT_GROUP_ORDER: usize = 48;

/// A rotation followed by a translation: x -> Wx + w.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct SymOp {
    rot: Matrix3<i64>,
    tau: Vector3<i64>,
}

impl Mul for SymOp {
    type Output = Self;

    /// `a * b` is "do b, then a".
    fn mul(self, rhs: SymOp) -> Self::Output {
        Self {
            rot: self.rot * rhs.rot,
            tau: self.rot * rhs.tau + self.tau,
        }
    }
}

/// Determinant by cofactor expansion along the first row, or `None` if it overflows.
fn det3x3(m: &Matrix3<i64>) -> Option<i128> {
    let e = |r, c| i128::from(m[(r, c)]);
    e(0, 0)
        .checked_mul(minor(m, 1, 2, 1, 2))?
        .checked_sub(e(0, 1).checked_mul(minor(m, 1, 2, 0, 2))?)?
        .checked_add(e(0, 2).checked_mul(minor(m, 1, 2, 0, 1))?)
}

/// The 2x2 minor on rows (r0, r1) and columns (c0, c1). Products of two i64 always fit in i128.
fn minor(m: &Matrix3<i64>, r0: usize, r1: usize, c0: usize, c1: usize) -> i128 {
    let e = |r, c| i128::from(m[(r, c)]);
    e(r0, c0) * e(r1, c1) - e(r0, c1) * e(r1, c0)
}

fn adjugate(m: &Matrix3<i64>) -> Matrix3<i128> {
    let c = |r0, r1, c0, c1| minor(m, r0, r1, c0, c1);
    Matrix3::new(
        c(1, 2, 1, 2),
        -c(0, 2, 1, 2),
        c(0, 1, 1, 2),
        -c(1, 2, 0, 2),
        c(0, 2, 0, 2),
        -c(0, 1, 0, 2),
        c(1, 2, 0, 1),
        -c(0, 2, 0, 1),
        c(0, 1, 0, 1),
    )
}

impl SymOp {
    /// Creates a new operation. The rotation must have determinant ±1 so that the inverse is
    /// integral, and that inverse must fit in i64.
    pub fn new(rot: Matrix3<i64>, tau: Vector3<i64>) -> Result<Self, SymOpError> {
        match det3x3(&rot) {
            Some(1 | -1) if adjugate(&rot).iter().all(|&x| i64::try_from(x).is_ok()) => {
                Ok(Self { rot, tau })
            }
            Some(1 | -1) => Err(SymOpError::InverseOverflow(rot)),
            _ => Err(SymOpError::NotUnimodular(rot)),
        }
    }

    /// A pure rotation, no translation.
    pub fn new_rot(rot: Matrix3<i64>) -> Result<Self, SymOpError> {
        Self::new(rot, Vector3::zeros())
    }

    pub fn identity() -> Self {
        Self {
            rot: Matrix3::identity(),
            tau: Vector3::zeros(),
        }
    }

    pub fn rot(&self) -> Matrix3<i64> {
        self.rot
    }

    pub fn tau(&self) -> Vector3<i64> {
        self.tau
    }

    /// Determinant of the rotation: 1 for proper operations, -1 for improper ones.
    pub fn det(&self) -> i64 {
        match det3x3(&self.rot) {
            Some(d) if d < 0 => -1,
            _ => 1,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.rot == Matrix3::identity() && self.tau.is_zero()
    }

    pub fn inv(&self) -> Self {
        // det is ±1, so dividing by it is multiplying by it. `new` checked the entries fit.
        let rot = adjugate(&self.rot).map(|x| x as i64) * self.det();
        Self {
            rot,
            tau: -(rot * self.tau),
        }
    }

    pub fn apply_point(&self, p: &LatticePoint) -> LatticePoint {
        let v = self.rot * Vector3::from(*p) + self.tau;
        [v.x, v.y, v.z]
    }
}

/// Parses one row of a triplet, e.g. `x-y+1`.
fn parse_coord(s: &str) -> Result<([i64; 3], i64), SymOpError> {
    let err = || SymOpError::CoordParse(s.to_owned());
    let s_pm = s.replace(' ', "").replace('-', "+-");
    let mut row = [0i64; 3];
    let mut shift = 0i64;
    let mut terms = s_pm.split('+').filter(|t| !t.is_empty()).peekable();
    if terms.peek().is_none() {
        return Err(err());
    }
    for term in terms {
        let var = match term.chars().last() {
            Some('x') => Some(0),
            Some('y') => Some(1),
            Some('z') => Some(2),
            _ => None,
        };
        match var {
            Some(i) => {
                let coef = match &term[..term.len() - 1] {
                    "" => 1,
                    "-" => -1,
                    coef => coef.parse::<i64>().map_err(|_e| err())?,
                };
                row[i] = row[i].checked_add(coef).ok_or_else(err)?;
            }
            None => {
                let t = term.parse::<i64>().map_err(|_e| err())?;
                shift = shift.checked_add(t).ok_or_else(err)?;
            }
        }
    }
    Ok((row, shift))
}

impl FromStr for SymOp {
    type Err = SymOpError;

    /// Parses an operation from a triplet, e.g., `-y, x-y, z+1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(',')
            .map(parse_coord)
            .collect::<Result<Vec<_>, _>>()?;
        match rows[..] {
            [(r0, t0), (r1, t1), (r2, t2)] => Self::new(
                Matrix3::new(
                    r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
                ),
                Vector3::new(t0, t1, t2),
            ),
            _ => Err(SymOpError::CoordParse(s.to_owned())),
        }
    }
}

impl Display for SymOp {
    /// Writes the operation as a triplet, the inverse of [`SymOp::from_str`].
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coords: Vec<String> = (0..3)
            .map(|r| {
                let mut coord = String::new();
                for (c, var) in ["x", "y", "z"].iter().enumerate() {
                    match self.rot[(r, c)] {
                        0 => {}
                        1 if coord.is_empty() => coord.push_str(var),
                        1 => coord.push_str(&format!("+{var}")),
                        -1 => coord.push_str(&format!("-{var}")),
                        k if k > 0 && !coord.is_empty() => coord.push_str(&format!("+{k}{var}")),
                        k => coord.push_str(&format!("{k}{var}")),
                    }
                }
                match self.tau[r] {
                    0 if coord.is_empty() => coord.push('0'),
                    0 => {}
                    t if t > 0 && !coord.is_empty() => coord.push_str(&format!("+{t}")),
                    t => coord.push_str(&format!("{t}")),
                }
                coord
            })
            .collect();
        write!(f, "{}", coords.join(","))
    }
}

/// A finite group of [`SymOp`]s closed under composition, with its elements in a fixed order.
#[derive(Debug, Clone)]
pub struct PointGroup {
    generators: Vec<SymOp>,
    ops: Vec<SymOp>,
}

impl PointGroup {
    /// Generates the whole group from `generators`. The identity is always first and does not need
    /// to be included. Generators of an infinite group, such as a lattice translation or a shear,
    /// are rejected.
    pub fn from_generators(generators: Vec<SymOp>) -> Result<Self, SymOpError> {
        let mut group = Self {
            generators,
            ops: vec![],
        };
        group.ops = generate_elements(&group, MAX_POINT_GROUP_ORDER).ok_or(
            SymOpError::InfiniteGroup {
                max_order: MAX_POINT_GROUP_ORDER,
            },
        )?;
        debug!("Generated point group of order {}", group.ops.len());
        Ok(group)
    }

    /// The full cubic point group m-3m (48 operations) on a simple cubic lattice.
    pub fn cubic() -> Self {
        let four_z = SymOp {
            rot: Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1),
            tau: Vector3::zeros(),
        };
        let three_111 = SymOp {
            rot: Matrix3::new(0, 0, 1, 1, 0, 0, 0, 1, 0),
            tau: Vector3::zeros(),
        };
        let inversion = SymOp {
            rot: -Matrix3::identity(),
            tau: Vector3::zeros(),
        };
        match Self::from_generators(vec![four_z, three_111, inversion]) {
            Ok(group) => group,
            Err(e) => unreachable!("m-3m is finite: {e}"),
        }
    }

    /// The operations, identity first. Equivalence-map indices point into this slice.
    pub fn ops(&self) -> &[SymOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Group<SymOp> for PointGroup {
    fn identity(&self) -> SymOp {
        SymOp::identity()
    }

    fn inv(&self, element: &SymOp) -> SymOp {
        element.inv()
    }

    fn compose(&self, a: &SymOp, b: &SymOp) -> SymOp {
        *a * *b
    }

    fn equiv(&self, a: &SymOp, b: &SymOp) -> bool {
        a == b
    }
}

impl FinitelyGeneratedGroup<SymOp> for PointGroup {
    type Generators = Vec<SymOp>;

    fn generators(&self) -> Self::Generators {
        self.generators.clone()
    }
}

impl FiniteGroup<SymOp> for PointGroup {
    type Elements = Vec<SymOp>;

    fn elements(&self) -> Self::Elements {
        self.ops.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse() {
        assert_eq!("x, y, z".parse::<SymOp>().unwrap(), SymOp::identity());
        let op = "-y,x-y,z+1".parse::<SymOp>().unwrap();
        assert_eq!(op.rot(), Matrix3::new(0, -1, 0, 1, -1, 0, 0, 0, 1));
        assert_eq!(op.tau(), Vector3::new(0, 0, 1));
        assert_eq!(op.to_string(), "-y,x-y,z+1");
        assert_eq!(
            "2x,y,z".parse::<SymOp>(),
            Err(SymOpError::NotUnimodular(Matrix3::new(
                2, 0, 0, 0, 1, 0, 0, 0, 1
            )))
        );
        assert!("x,y".parse::<SymOp>().is_err());
        assert!("x,,z".parse::<SymOp>().is_err());
        assert!("x,q,z".parse::<SymOp>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for op in PointGroup::cubic().ops() {
            assert_eq!(&op.to_string().parse::<SymOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_compose_and_inverse() {
        let op = "-y+1,x,z-2".parse::<SymOp>().unwrap();
        assert!((op * op.inv()).is_identity());
        assert!((op.inv() * op).is_identity());
        let p = [1, 2, 3];
        assert_eq!(op.apply_point(&p), [-1, 1, 1]);
        assert_eq!(op.inv().apply_point(&op.apply_point(&p)), p);
        assert_eq!((op * op).apply_point(&p), op.apply_point(&op.apply_point(&p)));
    }

    #[test]
    fn test_cubic_group() {
        let group = PointGroup::cubic();
        assert_eq!(group.len(), 48);
        assert!(group.ops()[0].is_identity());
        let proper = group.ops().iter().filter(|op| op.det() == 1).count();
        assert_eq!(proper, 24);
        for a in group.ops() {
            assert!(group.contains_equiv(group.ops(), &a.inv()));
            for b in group.ops() {
                assert!(group.contains_equiv(group.ops(), &(*a * *b)));
            }
        }
        let orders: Vec<usize> = group.ops().iter().map(|op| group.order(op)).collect();
        assert_eq!(orders.iter().filter(|&&k| k == 3).count(), 8);
        assert_eq!(orders.iter().filter(|&&k| k == 6).count(), 8);
        assert_eq!(*orders.iter().max().unwrap(), 6);
    }

    #[test]
    fn test_subgroup_generation() {
        let four_z = "-y,x,z".parse::<SymOp>().unwrap();
        let group = PointGroup::from_generators(vec![four_z]).unwrap();
        assert_eq!(group.len(), 4);
        let mirror_z = "x,y,-z".parse::<SymOp>().unwrap();
        let group = PointGroup::from_generators(vec![four_z, mirror_z, four_z]).unwrap();
        assert_eq!(group.len(), 8);
        // A mirror with an offset still has order 2.
        let offset_mirror = "-x+1,y,z".parse::<SymOp>().unwrap();
        assert_eq!(PointGroup::from_generators(vec![offset_mirror]).unwrap().len(), 2);
    }

    #[test]
    fn test_infinite_generators_rejected() {
        let infinite = Err(SymOpError::InfiniteGroup {
            max_order: MAX_POINT_GROUP_ORDER,
        });
        for gens in [
            vec!["x+1,y,z"],
            vec!["x+y,y,z"],
            // Two mirrors whose product is a translation.
            vec!["-x,y,z", "-x+1,y,z"],
        ] {
            let ops = gens.iter().map(|s| s.parse::<SymOp>().unwrap()).collect();
            assert_eq!(PointGroup::from_generators(ops).map(|g| g.len()), infinite);
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(
            "9223372036854775807x+x,y,z".parse::<SymOp>(),
            Err(SymOpError::CoordParse("9223372036854775807x+x".to_owned()))
        );
        assert!("x,y,z+9223372036854775807+1".parse::<SymOp>().is_err());
        // Every coefficient fits, but the determinant does not.
        let m = 9223372036854775807;
        assert_eq!(
            "9223372036854775807x,9223372036854775807y+9223372036854775807z,-9223372036854775807y+9223372036854775807z"
                .parse::<SymOp>(),
            Err(SymOpError::NotUnimodular(Matrix3::new(m, 0, 0, 0, m, m, 0, -m, m)))
        );
        // Unimodular, but the inverse has a 3037000500^2 entry.
        assert_eq!(
            "x+3037000500y,y+3037000500z,z".parse::<SymOp>(),
            Err(SymOpError::InverseOverflow(Matrix3::new(
                1, 3037000500, 0, 0, 1, 3037000500, 0, 0, 1
            )))
        );
    }
}
