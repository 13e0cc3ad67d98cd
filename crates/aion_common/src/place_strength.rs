//! Binding strength for bel/wire/pip assignments.

use serde::{Deserialize, Serialize};

/// How firmly a binding (cell-to-bel, net-to-wire, net-to-pip) is held.
///
/// Higher-strength bindings may displace lower-strength ones during placement
/// and routing; a [`PlaceStrength::Locked`] binding may never be displaced.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub enum PlaceStrength {
    /// No binding / unconstrained.
    #[default]
    None,
    /// A weak suggestion, freely displaced.
    Weak,
    /// Displaceable only by placer/user/locked bindings.
    Strong,
    /// Placed by the placer itself.
    Placer,
    /// Placed by an explicit user constraint.
    User,
    /// May never be displaced.
    Locked,
}

impl PlaceStrength {
    /// Returns `true` if a binding of `self` strength may be displaced by one
    /// of `other` strength.
    ///
    /// The router may displace up to `Strong`; nothing may displace `Locked`.
    pub fn displaceable_by(self, other: PlaceStrength) -> bool {
        self != PlaceStrength::Locked && other >= self
    }
}
