//! The two capabilities the orbit engine consumes: a group action and a strict total order on the
//! objects being acted on. Both have blanket impls for plain closures, so call sites can pass
//! `|g, x| ...` directly.

use std::cmp::Ordering;

/// Applies a group element to an object, returning a new object. Must be pure: no mutation of the
/// input and no hidden state between calls.
pub trait CopyApply<G, T> {
    fn copy_apply(&self, g: &G, x: &T) -> T;
}

impl<G, T, F> CopyApply<G, T> for F
where
    F: Fn(&G, &T) -> T,
{
    fn copy_apply(&self, g: &G, x: &T) -> T {
        self(g, x)
    }
}

/// A strict total order over orbit elements. Two elements are the same orbit member exactly when
/// this returns [`Ordering::Equal`].
pub trait OrbitOrder<T> {
    fn cmp(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> OrbitOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The element type's own [`Ord`].
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> OrbitOrder<T> for NaturalOrder {
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_impls() {
        let add_mod_4 = |g: &u8, x: &u8| (g + x) % 4;
        assert_eq!(add_mod_4.copy_apply(&1, &3), 0);

        let reversed = |a: &u8, b: &u8| b.cmp(a);
        assert_eq!(OrbitOrder::cmp(&reversed, &1, &2), Ordering::Greater);
        assert_eq!(OrbitOrder::cmp(&NaturalOrder, &1, &2), Ordering::Less);
    }
}
