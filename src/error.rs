//! Errors raised when orbit bookkeeping does not line up with the group that supposedly generated
//! it. These are always caller bugs: an orbit built from one group and indexed with another, or a
//! group-element list that is not closed under composition.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrbitError {
    /// Applying a group element to the canonical member produced something outside the orbit.
    #[error(
        "Image of the canonical orbit member under group element {group_index} is not in the orbit \
         ({orbit_len} members): the orbit was not generated by these group elements"
    )]
    ImageNotInOrbit {
        group_index: usize,
        orbit_len: usize,
    },
    /// An equivalence map was requested for an empty orbit with a non-empty group.
    #[error("Cannot map {group_len} group elements onto an empty orbit")]
    EmptyOrbit { group_len: usize },
    /// No group element maps the canonical member onto this orbit member.
    #[error("Orbit member {orbit_index} is not reachable from the canonical member")]
    UnreachableMember { orbit_index: usize },
    /// A conjugate or composition was not found in the group-element sequence.
    #[error("Group element derived from index {index} is not in the group-element sequence")]
    ElementNotInGroup { index: usize },
    /// `|G| != |orbit| * |stabilizer|`.
    #[error("Orbit-stabilizer mismatch: group order {group_len} != {orbit_len} * {stabilizer_len}")]
    OrbitStabilizerMismatch {
        group_len: usize,
        orbit_len: usize,
        stabilizer_len: usize,
    },
}
