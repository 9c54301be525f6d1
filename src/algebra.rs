//! Base traits for the abstract algebra the orbit engine leans on. The engine itself only needs a
//! sequence of group elements and an action, but when the caller can also compose and invert
//! elements, stabilizers of every orbit member follow from the stabilizer of the canonical one by
//! index algebra alone (see [`crate::invariant::invariant_subgroups_by_conjugation`]).

use std::fmt::Debug;

use log::trace;

/// Group element requirements.
pub trait GroupElement: Debug + Clone {}

impl<T: Debug + Clone> GroupElement for T {}

/// A group acting on elements of type `E`. The group, not the element type, decides when two
/// elements are the same, so one element type can carry several groups (symmetry operations taken
/// exactly, or modulo lattice translations).
pub trait Group<E: GroupElement> {
    /// The element e with ae = ea = a for every a.
    fn identity(&self) -> E;

    /// The element b with ab = ba = e.
    fn inv(&self, element: &E) -> E;

    /// The group operation. Must be associative. `g.compose(a, b)` returns `ab`, which is the
    /// operation "do b, then do a". Actions used with the orbit engine must agree with this:
    /// applying `ab` to x is applying b, then a.
    fn compose(&self, a: &E, b: &E) -> E;

    /// Equivalence relation on group elements.
    fn equiv(&self, a: &E, b: &E) -> bool;

    /// "Canonical" or "reduced" representation of an element. If `g.residue(a) == g.residue(b)`
    /// then `g.equiv(a, b)` must hold. Cloning is never wrong.
    fn residue(&self, el: &E) -> E {
        el.clone()
    }

    /// `a b a^-1`. If b fixes x then the conjugate fixes a applied to x.
    fn conjugate(&self, a: &E, b: &E) -> E {
        self.compose(&self.compose(a, b), &self.inv(a))
    }

    /// Whether some member of `elements` is equivalent to `g`.
    fn contains_equiv(&self, elements: &[E], g: &E) -> bool {
        elements.iter().any(|el| self.equiv(el, g))
    }

    fn is_identity(&self, a: &E) -> bool {
        self.equiv(a, &self.identity())
    }
}

/// A group given by a list of generators.
pub trait FinitelyGeneratedGroup<E: GroupElement>: Group<E> {
    type Generators: IntoIterator<Item = E>;
    /// Every group element must be a product of these.
    fn generators(&self) -> Self::Generators;
}

/// A finite group.
pub trait FiniteGroup<E: GroupElement>: FinitelyGeneratedGroup<E> {
    type Elements: IntoIterator<Item = E>;
    /// Every element of the group, in a fixed order. The order matters to the orbit engine: it is
    /// what equivalence-map indices point into.
    fn elements(&self) -> Self::Elements;

    /// Computes the order of an element, the smallest k such that g^k is the identity. Returns 1
    /// for the identity.
    fn order(&self, g: &E) -> usize {
        let mut k = 1;
        let mut el = g.clone();
        while !self.is_identity(&el) {
            k += 1;
            el = self.compose(&el, g);
        }

        k
    }
}

/// Position of the element equivalent to `g` in a group-element sequence, under the group's
/// equivalence relation.
pub fn position_equiv<E: GroupElement, G: Group<E>>(
    group: &G,
    elements: &[E],
    g: &E,
) -> Option<usize> {
    elements.iter().position(|el| group.equiv(el, g))
}

/// Generates every element of a finitely generated group with Dimino's algorithm. The identity
/// comes first, and the output order depends only on the generator order.
///
/// Returns `None` as soon as more than `max_order` elements turn up, so generators of an infinite
/// group are rejected instead of looping forever.
pub fn generate_elements<E: GroupElement, G: FinitelyGeneratedGroup<E>>(
    group: &G,
    max_order: usize,
) -> Option<Vec<E>> {
    let gens: Vec<E> = group
        .generators()
        .into_iter()
        .map(|e| group.residue(&e))
        .collect();
    let mut elements = vec![group.identity()];

    for (i, generator) in gens.iter().enumerate() {
        if group.contains_equiv(&elements, generator) {
            continue;
        }

        // The subgroup generated by gens[..i]. Every new element lies in a right coset of it.
        let subgroup = elements.clone();
        let mut reps = vec![generator.clone()];
        elements.extend(subgroup.iter().map(|d| group.compose(d, generator)));

        while let Some(rep) = reps.pop() {
            if elements.len() > max_order {
                trace!("Generator {} exceeds {} elements", i, max_order);
                return None;
            }
            for s in &gens[..=i] {
                let rs = group.compose(&rep, s);
                if !group.contains_equiv(&elements, &rs) {
                    elements.extend(subgroup.iter().map(|d| group.compose(d, &rs)));
                    reps.push(rs);
                }
            }
        }
        trace!("Generator {} extends group to {} elements", i, elements.len());
    }

    (elements.len() <= max_order).then_some(elements)
}

/// Z/nZ under addition, on the representatives 0..n.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct ZAddMod(pub usize);

#[cfg(test)]
impl Group<usize> for ZAddMod {
    fn identity(&self) -> usize {
        0
    }

    fn inv(&self, element: &usize) -> usize {
        (self.0 - element % self.0) % self.0
    }

    fn compose(&self, a: &usize, b: &usize) -> usize {
        (a + b) % self.0
    }

    fn equiv(&self, a: &usize, b: &usize) -> bool {
        a % self.0 == b % self.0
    }

    fn residue(&self, el: &usize) -> usize {
        el % self.0
    }
}

#[cfg(test)]
impl FinitelyGeneratedGroup<usize> for ZAddMod {
    type Generators = std::ops::Range<usize>;

    fn generators(&self) -> Self::Generators {
        1..2
    }
}

#[cfg(test)]
impl FiniteGroup<usize> for ZAddMod {
    type Elements = Vec<usize>;

    fn elements(&self) -> Self::Elements {
        generate_elements(self, self.0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zadd_n() {
        for n in [1, 7, 10, 256] {
            let grp = ZAddMod(n);
            let mut els = grp.elements();
            assert_eq!(els[0], 0);
            els.sort();
            assert_eq!(els, (0..n).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn test_order_and_inverse() {
        let grp = ZAddMod(12);
        assert_eq!(grp.order(&0), 1);
        assert_eq!(grp.order(&1), 12);
        assert_eq!(grp.order(&4), 3);
        assert_eq!(grp.order(&6), 2);
        for g in 0..12 {
            assert!(grp.is_identity(&grp.compose(&g, &grp.inv(&g))));
        }
    }

    #[test]
    fn test_generation_stops_at_max_order() {
        let grp = ZAddMod(12);
        assert_eq!(generate_elements(&grp, 11), None);
        assert_eq!(generate_elements(&grp, 12).map(|els| els.len()), Some(12));
    }

    #[test]
    fn test_conjugate_in_abelian_group() {
        let grp = ZAddMod(7);
        for a in 0..7 {
            assert_eq!(grp.conjugate(&a, &3), 3);
        }
    }

    #[test]
    fn test_position_equiv() {
        let grp = ZAddMod(5);
        let els = vec![0, 2, 4, 1, 3];
        assert_eq!(position_equiv(&grp, &els, &7), Some(1));
        assert_eq!(position_equiv(&grp, &els[..2], &3), None);
    }
}
