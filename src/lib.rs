//! Orbits of objects under finite symmetry groups: the distinct images of a seed object, the map
//! recording which group elements produce each image, and the subgroups that leave each image
//! invariant. The engine only needs a total order on the objects and an action of the group
//! elements on them; [`symop`] and [`cluster`] provide a concrete lattice setting to run it on.

pub mod action;
pub mod algebra;
pub mod cluster;
pub mod equivalence;
pub mod error;
pub mod invariant;
pub mod orbit;
pub mod symop;

pub use action::{CopyApply, NaturalOrder, OrbitOrder};
pub use equivalence::{make_equivalence_map, EquivalenceMap};
pub use error::OrbitError;
pub use invariant::{
    check_orbit_stabilizer, invariant_subgroups_by_conjugation, make_invariant_subgroup,
    make_invariant_subgroups, make_orbit_data, OrbitData,
};
pub use orbit::{canonical_form, make_orbit, make_orbit_by, Orbit};
