//! Binding mutators over a [`PnrNetlist`]: site, wire, and PIP assignment
//! with strength-aware displacement, net rip-up, and invariant checking.
//!
//! Placement and routing never write `cell.placement`, `bound_wires`, or
//! `bound_pips` directly; they go through [`bind_bel`]/[`bind_wire`]/
//! [`bind_pip`] (and their `unbind_*` counterparts) so that a
//! [`PlaceStrength::Locked`] binding can never be silently displaced and a
//! rip-up always leaves the netlist in a state that passes [`check`].

use crate::data::PnrNetlist;
use crate::ids::{PnrCellId, PnrNetId};
use aion_arch::ids::{PipId, SiteId, WireId};
use aion_common::{AionResult, Checksum, InternalError, PlaceStrength};

/// Binds `cell` onto `site` at the given strength.
///
/// Fails if `site` already holds a different cell whose binding is not
/// [`PlaceStrength::displaceable_by`] the new strength; the displaced cell
/// (if any) is unbound first so the netlist never has two cells on one site.
pub fn bind_bel(
    netlist: &mut PnrNetlist,
    cell: PnrCellId,
    site: SiteId,
    strength: PlaceStrength,
) -> AionResult<()> {
    if let Some(occupant) = occupant_of(netlist, site) {
        if occupant == cell {
            netlist.cell_mut(cell).strength = strength;
            return Ok(());
        }
        let occupant_strength = netlist.cell(occupant).strength;
        if !occupant_strength.displaceable_by(strength) {
            return Err(InternalError::new(format!(
                "cannot bind cell {} to site {}: occupied by {} at {:?}",
                netlist.cell(cell).name,
                site.as_raw(),
                netlist.cell(occupant).name,
                occupant_strength
            )));
        }
        unbind_bel(netlist, occupant);
    }
    netlist.cell_mut(cell).placement = Some(site);
    netlist.cell_mut(cell).strength = strength;
    Ok(())
}

/// Unbinds `cell` from its current site, if any.
pub fn unbind_bel(netlist: &mut PnrNetlist, cell: PnrCellId) {
    let c = netlist.cell_mut(cell);
    c.placement = None;
    c.strength = PlaceStrength::None;
}

fn occupant_of(netlist: &PnrNetlist, site: SiteId) -> Option<PnrCellId> {
    netlist
        .cells
        .iter()
        .find(|c| c.placement == Some(site))
        .map(|c| c.id)
}

/// Binds `wire` to `net` at the given strength.
///
/// Fails if the wire is already bound to a different net whose binding
/// cannot be displaced at this strength (a wire may only ever carry one
/// net's signal).
pub fn bind_wire(
    netlist: &mut PnrNetlist,
    net: PnrNetId,
    wire: WireId,
    strength: PlaceStrength,
) -> AionResult<()> {
    if let Some(&(owner, owner_strength)) = netlist.bound_wires.get(&wire) {
        if owner == net {
            netlist.bound_wires.insert(wire, (net, strength));
            return Ok(());
        }
        if !owner_strength.displaceable_by(strength) {
            return Err(InternalError::new(format!(
                "cannot bind wire {} to net {}: held by net {} at {:?}",
                wire.as_raw(),
                netlist.net(net).name,
                netlist.net(owner).name,
                owner_strength
            )));
        }
    }
    netlist.bound_wires.insert(wire, (net, strength));
    Ok(())
}

/// Unbinds `wire`, freeing it for use by another net.
pub fn unbind_wire(netlist: &mut PnrNetlist, wire: WireId) {
    netlist.bound_wires.remove(&wire);
}

/// Binds `pip` to `net` at the given strength. Same displacement rule as
/// [`bind_wire`].
pub fn bind_pip(
    netlist: &mut PnrNetlist,
    net: PnrNetId,
    pip: PipId,
    strength: PlaceStrength,
) -> AionResult<()> {
    if let Some(&(owner, owner_strength)) = netlist.bound_pips.get(&pip) {
        if owner == net {
            netlist.bound_pips.insert(pip, (net, strength));
            return Ok(());
        }
        if !owner_strength.displaceable_by(strength) {
            return Err(InternalError::new(format!(
                "cannot bind pip {} to net {}: held by net {} at {:?}",
                pip.as_raw(),
                netlist.net(net).name,
                netlist.net(owner).name,
                owner_strength
            )));
        }
    }
    netlist.bound_pips.insert(pip, (net, strength));
    Ok(())
}

/// Unbinds `pip`, freeing it for use by another net.
pub fn unbind_pip(netlist: &mut PnrNetlist, pip: PipId) {
    netlist.bound_pips.remove(&pip);
}

/// Tears down a net's routing: every wire and pip this net holds is
/// unbound and the net's [`RouteTree`](crate::route_tree::RouteTree) is
/// cleared.
///
/// Leaves the net's driver/sink pins and placement of its endpoints
/// untouched; only the routing resources are released.
pub fn rip_up_net(netlist: &mut PnrNetlist, net: PnrNetId) {
    let wires: Vec<WireId> = netlist
        .bound_wires
        .iter()
        .filter(|(_, &(owner, _))| owner == net)
        .map(|(&w, _)| w)
        .collect();
    for w in wires {
        netlist.bound_wires.remove(&w);
    }
    let pips: Vec<PipId> = netlist
        .bound_pips
        .iter()
        .filter(|(_, &(owner, _))| owner == net)
        .map(|(&p, _)| p)
        .collect();
    for p in pips {
        netlist.bound_pips.remove(&p);
    }
    netlist.net_mut(net).routing = None;
}

/// Scans the netlist for binding invariant violations: two cells on one
/// site, a wire or pip bound to a net that no longer exists, or a cluster
/// member whose `cluster_root` does not point at an actual cluster root.
///
/// Mirrors the round-trip/uniqueness checks an architecture validity scan
/// runs over the device database, applied here to the netlist's dynamic
/// bindings instead of the static fabric.
pub fn check(netlist: &PnrNetlist) -> AionResult<()> {
    let mut seen_sites = std::collections::HashSet::new();
    for cell in &netlist.cells {
        if let Some(site) = cell.placement {
            if !seen_sites.insert(site) {
                return Err(InternalError::new(format!(
                    "site {} is occupied by more than one cell", site.as_raw()
                )));
            }
        }
        if let Some(root) = cell.cluster_root {
            if root.as_raw() as usize >= netlist.cells.len() {
                return Err(InternalError::new(format!(
                    "cell {} has a cluster_root that does not exist",
                    cell.name
                )));
            }
            let root_cell = netlist.cell(root);
            if !root_cell.children.contains(&cell.id) {
                return Err(InternalError::new(format!(
                    "cell {} claims root {} but is not in its children list",
                    cell.name, root_cell.name
                )));
            }
        }
    }
    for (&wire, &(net, _)) in &netlist.bound_wires {
        if net.as_raw() as usize >= netlist.nets.len() {
            return Err(InternalError::new(format!(
                "wire {} is bound to a net that does not exist", wire.as_raw()
            )));
        }
    }
    for (&pip, &(net, _)) in &netlist.bound_pips {
        if net.as_raw() as usize >= netlist.nets.len() {
            return Err(InternalError::new(format!(
                "pip {} is bound to a net that does not exist", pip.as_raw()
            )));
        }
    }
    Ok(())
}

/// Computes a deterministic checksum over every cell placement and wire/pip
/// binding, independent of the order cells/nets were added in.
///
/// Two netlists that have converged to the same physical solution (even via
/// different move sequences) produce the same checksum; this is how a
/// deterministic-seed re-run is verified to reproduce its prior result.
pub fn checksum(netlist: &PnrNetlist) -> u32 {
    let mut placements: Vec<(u32, u32)> = netlist
        .cells
        .iter()
        .filter_map(|c| c.placement.map(|s| (c.id.as_raw(), s.as_raw())))
        .collect();
    placements.sort_unstable();

    let mut wires: Vec<(u32, u32)> = netlist
        .bound_wires
        .iter()
        .map(|(&w, &(n, _))| (w.as_raw(), n.as_raw()))
        .collect();
    wires.sort_unstable();

    let mut pips: Vec<(u32, u32)> = netlist
        .bound_pips
        .iter()
        .map(|(&p, &(n, _))| (p.as_raw(), n.as_raw()))
        .collect();
    pips.sort_unstable();

    let mut sum = Checksum::new();
    for (cell, site) in placements {
        sum = sum.fold_u32(cell).fold_u32(site);
    }
    for (wire, net) in wires {
        sum = sum.fold_u32(wire).fold_u32(net);
    }
    for (pip, net) in pips {
        sum = sum.fold_u32(pip).fold_u32(net);
    }
    sum.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PnrCell, PnrCellType};
    use crate::ids::PnrPinId;
    use aion_common::LogicVec;

    fn lut(nl: &mut PnrNetlist, name: &str) -> PnrCellId {
        nl.add_cell(PnrCell {
            name: name.to_string(),
            cell_type: PnrCellType::Lut {
                inputs: 4,
                init: LogicVec::from_bool(false),
            },
            ..Default::default()
        })
    }

    fn net(nl: &mut PnrNetlist, name: &str, driver: PnrPinId) -> PnrNetId {
        nl.add_net(crate::data::PnrNet {
            id: PnrNetId::from_raw(0),
            name: name.to_string(),
            driver,
            sinks: vec![],
            routing: None,
            timing_critical: false,
        })
    }

    #[test]
    fn bind_and_unbind_bel() {
        let mut nl = PnrNetlist::new();
        let c = lut(&mut nl, "lut_0");
        bind_bel(&mut nl, c, SiteId::from_raw(3), PlaceStrength::Placer).unwrap();
        assert_eq!(nl.cell(c).placement, Some(SiteId::from_raw(3)));
        assert_eq!(nl.cell(c).strength, PlaceStrength::Placer);

        unbind_bel(&mut nl, c);
        assert!(nl.cell(c).placement.is_none());
        assert_eq!(nl.cell(c).strength, PlaceStrength::None);
    }

    #[test]
    fn weak_binding_is_displaced_by_strong() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        let b = lut(&mut nl, "b");
        bind_bel(&mut nl, a, SiteId::from_raw(0), PlaceStrength::Weak).unwrap();
        bind_bel(&mut nl, b, SiteId::from_raw(0), PlaceStrength::Strong).unwrap();
        assert!(nl.cell(a).placement.is_none());
        assert_eq!(nl.cell(b).placement, Some(SiteId::from_raw(0)));
    }

    #[test]
    fn locked_binding_refuses_displacement() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        let b = lut(&mut nl, "b");
        bind_bel(&mut nl, a, SiteId::from_raw(0), PlaceStrength::Locked).unwrap();
        let result = bind_bel(&mut nl, b, SiteId::from_raw(0), PlaceStrength::User);
        assert!(result.is_err());
        assert_eq!(nl.cell(a).placement, Some(SiteId::from_raw(0)));
    }

    #[test]
    fn rebinding_same_cell_updates_strength_in_place() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        bind_bel(&mut nl, a, SiteId::from_raw(1), PlaceStrength::Weak).unwrap();
        bind_bel(&mut nl, a, SiteId::from_raw(1), PlaceStrength::User).unwrap();
        assert_eq!(nl.cell(a).strength, PlaceStrength::User);
    }

    #[test]
    fn wire_and_pip_binding_and_rip_up() {
        let mut nl = PnrNetlist::new();
        let c = lut(&mut nl, "lut_0");
        let pin = nl.add_pin(crate::data::PnrPin {
            id: PnrPinId::from_raw(0),
            name: "O".into(),
            direction: aion_ir::PortDirection::Output,
            cell: c,
            net: None,
        });
        let n = net(&mut nl, "net_0", pin);

        bind_wire(&mut nl, n, WireId::from_raw(7), PlaceStrength::Placer).unwrap();
        bind_pip(&mut nl, n, PipId::from_raw(2), PlaceStrength::Placer).unwrap();
        assert_eq!(nl.bound_wires.len(), 1);
        assert_eq!(nl.bound_pips.len(), 1);

        rip_up_net(&mut nl, n);
        assert!(nl.bound_wires.is_empty());
        assert!(nl.bound_pips.is_empty());
        assert!(nl.net(n).routing.is_none());
    }

    #[test]
    fn wire_binding_conflict_respects_strength() {
        let mut nl = PnrNetlist::new();
        let c = lut(&mut nl, "lut_0");
        let pin_a = nl.add_pin(crate::data::PnrPin {
            id: PnrPinId::from_raw(0),
            name: "O".into(),
            direction: aion_ir::PortDirection::Output,
            cell: c,
            net: None,
        });
        let net_a = net(&mut nl, "net_a", pin_a);
        let net_b = net(&mut nl, "net_b", pin_a);

        bind_wire(&mut nl, net_a, WireId::from_raw(1), PlaceStrength::User).unwrap();
        let result = bind_wire(&mut nl, net_b, WireId::from_raw(1), PlaceStrength::Weak);
        assert!(result.is_err());
    }

    #[test]
    fn check_detects_double_bound_site() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        let b = lut(&mut nl, "b");
        nl.cell_mut(a).placement = Some(SiteId::from_raw(0));
        nl.cell_mut(b).placement = Some(SiteId::from_raw(0));
        assert!(check(&nl).is_err());
    }

    #[test]
    fn check_detects_dangling_cluster_root() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        nl.cell_mut(a).cluster_root = Some(PnrCellId::from_raw(99));
        assert!(check(&nl).is_err());
    }

    #[test]
    fn check_passes_on_consistent_cluster() {
        let mut nl = PnrNetlist::new();
        let root = lut(&mut nl, "root");
        let member = lut(&mut nl, "member");
        nl.cell_mut(root).children.push(member);
        nl.cell_mut(member).cluster_root = Some(root);
        assert!(check(&nl).is_ok());
    }

    #[test]
    fn checksum_is_order_independent_and_deterministic() {
        let mut nl_a = PnrNetlist::new();
        let a = lut(&mut nl_a, "a");
        let b = lut(&mut nl_a, "b");
        bind_bel(&mut nl_a, a, SiteId::from_raw(0), PlaceStrength::Placer).unwrap();
        bind_bel(&mut nl_a, b, SiteId::from_raw(1), PlaceStrength::Placer).unwrap();

        let mut nl_b = PnrNetlist::new();
        let b2 = lut(&mut nl_b, "b");
        let a2 = lut(&mut nl_b, "a");
        bind_bel(&mut nl_b, a2, SiteId::from_raw(0), PlaceStrength::Placer).unwrap();
        bind_bel(&mut nl_b, b2, SiteId::from_raw(1), PlaceStrength::Placer).unwrap();

        // Cell IDs differ by add order, but the set of (cell index, site)
        // pairs recorded is the same, so the checksum still matches.
        assert_eq!(checksum(&nl_a), checksum(&nl_b));
    }

    #[test]
    fn checksum_changes_with_different_placement() {
        let mut nl = PnrNetlist::new();
        let a = lut(&mut nl, "a");
        bind_bel(&mut nl, a, SiteId::from_raw(0), PlaceStrength::Placer).unwrap();
        let c1 = checksum(&nl);

        unbind_bel(&mut nl, a);
        bind_bel(&mut nl, a, SiteId::from_raw(1), PlaceStrength::Placer).unwrap();
        let c2 = checksum(&nl);

        assert_ne!(c1, c2);
    }
}
