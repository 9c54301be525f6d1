//! Equivalence maps: which group elements carry the canonical orbit member onto each member.
//!
//! Buckets hold positions into the caller's group-element sequence rather than the elements
//! themselves, so stabilizer and coset computations downstream can re-index freely.

use std::ops::Index;

use log::{debug, trace};

use crate::{
    action::{CopyApply, OrbitOrder},
    error::OrbitError,
    orbit::Orbit,
};

/// `map.bucket(i)` holds the indices of the group elements that map orbit member 0 onto orbit
/// member i, in ascending order.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct EquivalenceMap(Vec<Vec<usize>>);

impl EquivalenceMap {
    /// Number of buckets, equal to the orbit size.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bucket(&self, i: usize) -> Option<&[usize]> {
        self.0.get(i).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.0
    }

    /// Total number of group-element indices across all buckets. For a map built by
    /// [`make_equivalence_map`] this is the number of group elements.
    pub fn total_len(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    /// The orbit position whose bucket holds group index `k`.
    pub fn orbit_position_of(&self, k: usize) -> Option<usize> {
        self.0.iter().position(|bucket| bucket.binary_search(&k).is_ok())
    }

    /// One group index per orbit member: the first element found that maps the canonical member
    /// there. `None` for a bucket nothing lands in.
    pub fn representatives(&self) -> Vec<Option<usize>> {
        self.0.iter().map(|bucket| bucket.first().copied()).collect()
    }

    /// Whether every bucket has the same size. Holds for any genuine group action, where each
    /// bucket is a coset of the canonical member's stabilizer.
    pub fn is_uniform(&self) -> bool {
        self.0.windows(2).all(|w| w[0].len() == w[1].len())
    }
}

impl Index<usize> for EquivalenceMap {
    type Output = [usize];

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl From<EquivalenceMap> for Vec<Vec<usize>> {
    fn from(map: EquivalenceMap) -> Self {
        map.0
    }
}

/// Makes the equivalence map of `orbit`: for each group element at position k, apply it to the
/// canonical member, find the image in the orbit, and record k in that member's bucket.
///
/// `group_elements` must be the elements (in the same order) that generated `orbit` from its own
/// canonical member. If any image falls outside the orbit this fails immediately with
/// [`OrbitError::ImageNotInOrbit`]; a partially filled map is never returned.
pub fn make_equivalence_map<T, G, C, A>(
    orbit: &Orbit<T, C>,
    group_elements: &[G],
    apply: &A,
) -> Result<EquivalenceMap, OrbitError>
where
    C: OrbitOrder<T>,
    A: CopyApply<G, T> + ?Sized,
{
    let canonical = match orbit.canonical() {
        Some(canonical) => canonical,
        None if group_elements.is_empty() => return Ok(EquivalenceMap::default()),
        None => {
            return Err(OrbitError::EmptyOrbit {
                group_len: group_elements.len(),
            })
        }
    };

    let mut buckets = vec![vec![]; orbit.len()];
    for (k, g) in group_elements.iter().enumerate() {
        let image = apply.copy_apply(g, canonical);
        let i = orbit
            .position(&image)
            .ok_or(OrbitError::ImageNotInOrbit {
                group_index: k,
                orbit_len: orbit.len(),
            })?;
        trace!("Group element {} maps canonical member to {}", k, i);
        buckets[i].push(k);
    }

    debug!(
        "Built equivalence map over {} orbit members from {} group elements",
        buckets.len(),
        group_elements.len()
    );
    Ok(EquivalenceMap(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::{FiniteGroup, ZAddMod},
        orbit::make_orbit,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn add_mod_4(g: &u32, x: &u32) -> u32 {
        (g + x) % 4
    }

    #[test]
    fn test_non_generating_elements_fail() {
        // {0, 1, 3} is the orbit of 3, but applying +2 to its canonical member 0 gives 2.
        let group = [0, 1, 2];
        let orbit = make_orbit(&3, &group, &add_mod_4);
        assert_eq!(orbit.as_slice(), &[0, 1, 3]);
        assert_eq!(
            make_equivalence_map(&orbit, &group, &add_mod_4),
            Err(OrbitError::ImageNotInOrbit {
                group_index: 2,
                orbit_len: 3
            })
        );
    }

    #[test]
    fn test_full_group() {
        let group = [0, 1, 2, 3];
        let orbit = make_orbit(&3, &group, &add_mod_4);
        let map = make_equivalence_map(&orbit, &group, &add_mod_4).unwrap();
        assert_eq!(map.into_inner(), vec![vec![0], vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn test_repeated_images() {
        // Parity under +k mod 4: {0, 2} both fix parity.
        let parity = |g: &u32, x: &u32| (g + x) % 2;
        let group = [0, 1, 2, 3];
        let orbit = make_orbit(&1, &group, &parity);
        let map = make_equivalence_map(&orbit, &group, &parity).unwrap();
        assert_eq!(map.as_slice(), &[vec![0, 2], vec![1, 3]]);
        assert_eq!(map.representatives(), vec![Some(0), Some(1)]);
        assert_eq!(map.orbit_position_of(3), Some(1));
        assert_eq!(map.orbit_position_of(4), None);
        assert!(map.is_uniform());
        assert_eq!(map.total_len(), 4);
        assert_eq!(&map[1], &[1, 3]);
    }

    #[test]
    fn test_empty_orbit() {
        let none: [u32; 0] = [];
        let orbit = make_orbit(&3, &none, &add_mod_4);
        assert_eq!(
            make_equivalence_map(&orbit, &none, &add_mod_4),
            Ok(EquivalenceMap::default())
        );
        assert_eq!(
            make_equivalence_map(&orbit, &[1], &add_mod_4),
            Err(OrbitError::EmptyOrbit { group_len: 1 })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]
        #[test]
        fn test_partition(n in 1usize..30, m in 1usize..10, seed in 0usize..50) {
            // Z_n acting on residues mod m, which is a group action when m divides n.
            let m = if n % m == 0 { m } else { n };
            let group = ZAddMod(n).elements();
            let apply = |g: &usize, x: &usize| (g + x) % m;
            let orbit = make_orbit(&seed, &group, &apply);
            let map = make_equivalence_map(&orbit, &group, &apply).unwrap();

            prop_assert_eq!(map.len(), orbit.len());
            prop_assert_eq!(map.total_len(), group.len());
            let mut seen: Vec<usize> = map.iter().flatten().copied().collect();
            seen.sort();
            prop_assert_eq!(seen, (0..group.len()).collect::<Vec<_>>());

            for (i, bucket) in map.iter().enumerate() {
                for &k in bucket {
                    prop_assert_eq!(apply(&group[k], &orbit[0]), orbit[i]);
                }
            }

            prop_assert!(map.is_uniform());
            prop_assert_eq!(group.len(), orbit.len() * map[0].len());
        }
    }
}
