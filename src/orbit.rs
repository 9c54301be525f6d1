//! Orbits: the distinct images of a seed object under every element of a finite group.
//!
//! An [`Orbit`] is a sorted, deduplicated container keyed by a strict total order. Its first member
//! is the canonical representative of the whole orbit, and that smallest-first rule is the one
//! every consumer relies on when it needs "the" representative of a set of symmetry-equivalent
//! objects.

use std::{cmp::Ordering, fmt::Debug, ops::Index};

use log::{debug, trace};

use crate::action::{CopyApply, NaturalOrder, OrbitOrder};

/// Unique orbit members, in ascending order under `C`.
#[derive(Clone)]
pub struct Orbit<T, C = NaturalOrder> {
    elements: Vec<T>,
    compare: C,
}

impl<T, C: OrbitOrder<T>> Orbit<T, C> {
    /// Builds an orbit from arbitrary elements: sorts them under `compare` and keeps one member per
    /// equality class. Which representative of a class survives is the first one yielded.
    pub fn from_elements_by<I: IntoIterator<Item = T>>(elements: I, compare: C) -> Self {
        let mut elements: Vec<T> = elements.into_iter().collect();
        elements.sort_by(|a, b| OrbitOrder::cmp(&compare, a, b));
        elements.dedup_by(|a, b| OrbitOrder::cmp(&compare, a, b) == Ordering::Equal);
        Self { elements, compare }
    }

    /// The canonical representative: the smallest member. `None` for an empty orbit.
    pub fn canonical(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Position of the member equal to `x` under the orbit's order.
    pub fn position(&self, x: &T) -> Option<usize> {
        self.elements
            .binary_search_by(|member| OrbitOrder::cmp(&self.compare, member, x))
            .ok()
    }

    pub fn contains(&self, x: &T) -> bool {
        self.position(x).is_some()
    }

    /// The comparator the orbit is keyed by.
    pub fn order(&self) -> &C {
        &self.compare
    }
}

impl<T> Orbit<T, NaturalOrder>
where
    T: Ord,
{
    /// Builds an orbit from arbitrary elements using their own [`Ord`].
    pub fn from_elements<I: IntoIterator<Item = T>>(elements: I) -> Self {
        Self::from_elements_by(elements, NaturalOrder)
    }
}

impl<T, C> Orbit<T, C> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.elements.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T, C> Index<usize> for Orbit<T, C> {
    type Output = T;

    fn index(&self, i: usize) -> &Self::Output {
        &self.elements[i]
    }
}

impl<'a, T, C> IntoIterator for &'a Orbit<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: Debug, C> Debug for Orbit<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}

/// Orbits compare by their members only. Two orbits built with different comparators that happen
/// to hold the same sequence are equal.
impl<T: PartialEq, C> PartialEq for Orbit<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: Eq, C> Eq for Orbit<T, C> {}

/// Makes an orbit by applying every group element to `seed`, ordered by `T`'s own [`Ord`].
///
/// The seed is only a member if some group element maps it onto itself. Include the identity in
/// `group_elements` if that must hold; with no group elements the orbit is empty.
pub fn make_orbit<T, G, A>(seed: &T, group_elements: &[G], apply: &A) -> Orbit<T>
where
    T: Ord,
    A: CopyApply<G, T> + ?Sized,
{
    make_orbit_by(seed, group_elements, NaturalOrder, apply)
}

/// Makes an orbit by applying every group element to `seed`, deduplicating and ordering the images
/// under `compare`.
pub fn make_orbit_by<T, G, C, A>(
    seed: &T,
    group_elements: &[G],
    compare: C,
    apply: &A,
) -> Orbit<T, C>
where
    C: OrbitOrder<T>,
    A: CopyApply<G, T> + ?Sized,
{
    let images = group_elements.iter().enumerate().map(|(k, g)| {
        trace!("Applying group element {}", k);
        apply.copy_apply(g, seed)
    });
    let orbit = Orbit::from_elements_by(images, compare);
    debug!(
        "Generated orbit of {} members from {} group elements",
        orbit.len(),
        group_elements.len()
    );
    orbit
}

/// The canonical form of `element`: the smallest of its images under `group_elements`, i.e. the
/// first member of its orbit, without materializing the orbit. `None` with no group elements.
pub fn canonical_form<T, G, C, A>(
    element: &T,
    group_elements: &[G],
    compare: &C,
    apply: &A,
) -> Option<T>
where
    C: OrbitOrder<T> + ?Sized,
    A: CopyApply<G, T> + ?Sized,
{
    // min_by keeps the last of equal minima; the orbit keeps the first. Fold to match.
    group_elements
        .iter()
        .map(|g| apply.copy_apply(g, element))
        .fold(None, |best, image| match best {
            Some(best) if OrbitOrder::cmp(compare, &best, &image) != Ordering::Greater => Some(best),
            _ => Some(image),
        })
}
