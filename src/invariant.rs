//! Invariant (stabilizer) subgroups of orbit members.
//!
//! Two routes are offered. The direct one re-applies every group element to a member and keeps
//! those that land back on it, which needs nothing beyond the action. When the group elements can
//! also be composed and inverted, [`invariant_subgroups_by_conjugation`] derives every member's
//! stabilizer from the canonical member's by conjugating with a coset representative from the
//! equivalence map: if g maps r0 onto ri, then Stab(ri) = g Stab(r0) g^-1.

use std::cmp::Ordering;

use log::debug;

use crate::{
    action::{CopyApply, OrbitOrder},
    algebra::{position_equiv, Group, GroupElement},
    equivalence::{make_equivalence_map, EquivalenceMap},
    error::OrbitError,
    orbit::{make_orbit_by, Orbit},
};

/// Indices of the group elements that leave `element` invariant under `compare`.
pub fn make_invariant_subgroup<T, G, C, A>(
    element: &T,
    group_elements: &[G],
    compare: &C,
    apply: &A,
) -> Vec<usize>
where
    C: OrbitOrder<T> + ?Sized,
    A: CopyApply<G, T> + ?Sized,
{
    group_elements
        .iter()
        .enumerate()
        .filter(|(_, g)| {
            OrbitOrder::cmp(compare, &apply.copy_apply(g, element), element) == Ordering::Equal
        })
        .map(|(k, _)| k)
        .collect()
}

/// The invariant subgroup of every orbit member, by direct application.
pub fn make_invariant_subgroups<T, G, C, A>(
    orbit: &Orbit<T, C>,
    group_elements: &[G],
    apply: &A,
) -> Vec<Vec<usize>>
where
    C: OrbitOrder<T>,
    A: CopyApply<G, T> + ?Sized,
{
    orbit
        .iter()
        .map(|member| make_invariant_subgroup(member, group_elements, orbit.order(), apply))
        .collect()
}

/// The invariant subgroup of every orbit member, computed from the equivalence map by
/// conjugation instead of by re-applying the action. Indices in each subgroup are ascending.
///
/// `group` must compose elements consistently with the action that built `map`, and
/// `group_elements` must be closed under conjugation by its own members.
pub fn invariant_subgroups_by_conjugation<E, G>(
    map: &EquivalenceMap,
    group_elements: &[E],
    group: &G,
) -> Result<Vec<Vec<usize>>, OrbitError>
where
    E: GroupElement,
    G: Group<E>,
{
    let canonical_stabilizer = match map.bucket(0) {
        Some(bucket) => bucket,
        None => return Ok(vec![]),
    };

    map.iter()
        .enumerate()
        .map(|(i, bucket)| -> Result<Vec<usize>, OrbitError> {
            let rep = bucket
                .first()
                .ok_or(OrbitError::UnreachableMember { orbit_index: i })?;
            let g = group_elements
                .get(*rep)
                .ok_or(OrbitError::ElementNotInGroup { index: *rep })?;
            let mut subgroup = canonical_stabilizer
                .iter()
                .map(|&s| {
                    let h = group_elements
                        .get(s)
                        .ok_or(OrbitError::ElementNotInGroup { index: s })?;
                    let conj = group.conjugate(g, h);
                    position_equiv(group, group_elements, &conj)
                        .ok_or(OrbitError::ElementNotInGroup { index: s })
                })
                .collect::<Result<Vec<usize>, OrbitError>>()?;
            subgroup.sort_unstable();
            subgroup.dedup();
            Ok(subgroup)
        })
        .collect()
}

/// Checks the orbit-stabilizer theorem, |G| = |orbit| * |Stab|.
pub fn check_orbit_stabilizer(
    group_len: usize,
    orbit_len: usize,
    stabilizer_len: usize,
) -> Result<(), OrbitError> {
    if group_len == orbit_len * stabilizer_len {
        Ok(())
    } else {
        Err(OrbitError::OrbitStabilizerMismatch {
            group_len,
            orbit_len,
            stabilizer_len,
        })
    }
}

/// An orbit together with its equivalence map and the invariant subgroup of every member.
#[derive(Debug, Clone)]
pub struct OrbitData<T, C> {
    pub orbit: Orbit<T, C>,
    pub equivalence_map: EquivalenceMap,
    pub invariant_subgroups: Vec<Vec<usize>>,
}

impl<T, C> OrbitData<T, C> {
    /// The orbit's multiplicity: the number of distinct symmetry-equivalent objects.
    pub fn multiplicity(&self) -> usize {
        self.orbit.len()
    }

    pub fn canonical(&self) -> Option<&T> {
        self.orbit.as_slice().first()
    }
}

/// Builds the orbit of `seed`, then its equivalence map and invariant subgroups, checking the
/// orbit-stabilizer identity along the way. Every stabilizer and every equivalence-map bucket (a
/// coset of a stabilizer) must hold |G| / |orbit| group elements.
///
/// The equivalence map is built from the orbit's canonical member, which is only guaranteed to
/// work when `group_elements` is closed under composition, i.e. is a whole group.
pub fn make_orbit_data<T, G, C, A>(
    seed: &T,
    group_elements: &[G],
    compare: C,
    apply: &A,
) -> Result<OrbitData<T, C>, OrbitError>
where
    C: OrbitOrder<T>,
    A: CopyApply<G, T> + ?Sized,
{
    let orbit = make_orbit_by(seed, group_elements, compare, apply);
    let equivalence_map = make_equivalence_map(&orbit, group_elements, apply)?;
    let invariant_subgroups = make_invariant_subgroups(&orbit, group_elements, apply);
    let subgroup_lens = invariant_subgroups.iter().map(Vec::len);
    for len in subgroup_lens.chain(equivalence_map.iter().map(<[usize]>::len)) {
        check_orbit_stabilizer(group_elements.len(), orbit.len(), len)?;
    }
    debug!(
        "Orbit of multiplicity {} with {} invariant group elements per member",
        orbit.len(),
        invariant_subgroups.first().map_or(0, Vec::len)
    );
    Ok(OrbitData {
        orbit,
        equivalence_map,
        invariant_subgroups,
    })
}
