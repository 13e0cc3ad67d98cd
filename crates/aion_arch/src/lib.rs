//! FPGA device architecture models for the Aion toolchain.
//!
//! This crate provides the [`Architecture`] trait that abstracts over different
//! FPGA device families, and the [`TechMapper`] trait for mapping generic IR
//! cells to device-specific primitives. Concrete implementations are provided
//! for Intel Cyclone IV E, Intel Cyclone V, and Xilinx Artix-7 families.
//!
//! # Usage
//!
//! Use [`load_architecture`] to create an architecture model by family and
//! device name:
//!
//! ```
//! use aion_arch::load_architecture;
//!
//! let arch = load_architecture("cyclone_v", "5CSEMA5F31C6").unwrap();
//! assert_eq!(arch.total_luts(), 32_070);
//! ```
//!
//! # Architecture
//!
//! - Resource-count and tech-mapping methods are implemented per family.
//! - Grid topology, routing, and most graph/lookup/pricing methods are
//!   derived once, generically, from each family's [`grid::SyntheticGrid`]
//!   via [`Architecture`]'s default methods.
//! - Per-family methods (`cell_delay`, `setup_time`, `hold_time`,
//!   `clock_to_out`) carry the family's own timing numbers.

#![warn(missing_docs)]

pub mod grid;
pub mod ids;
pub mod intel;
pub mod tech_map;
pub mod types;
pub mod xilinx;

pub use tech_map::TechMapper;
use types::{
    ClockingInfo, Delay, DelayQuad, RoutingGraph, Site, Tile,
    TimingPortClass,
};
pub use types::ResourceUsage;

pub use grid::SyntheticGrid;
pub use ids::{BelId, PipId, SiteId, WireId};
pub use intel::cyclone_iv::{CycloneIv, CycloneIvMapper};
pub use intel::cyclone_v::{CycloneV, CycloneVMapper};
pub use intel::IntelFamily;
pub use tech_map::{
    ArithmeticPattern, ArithmeticPatternKind, LogicCone, LutMapping, MapResult, MemoryCell,
};
pub use types::{Bel, BelPin, BelType, ClockEdge, Pip, SiteType, TileType, Wire};
pub use xilinx::artix7::{Artix7, Artix7Mapper};
pub use xilinx::XilinxFamily;

use aion_common::{AionResult, InternalError};

/// The core trait for an FPGA device architecture model.
///
/// Provides resource counts, technology mapping, grid topology, routing
/// graph, and timing information. Each supported device family implements
/// the resource-query methods and `grid()`/`tech_mapper()`; everything else
/// has a default implementation built generically on top of `grid()`.
pub trait Architecture: std::fmt::Debug + Send + Sync {
    // --- Resource queries (required) ---

    /// Returns the canonical family name (e.g., "cyclone_v", "artix7").
    fn family_name(&self) -> &str;

    /// Returns the device part number (e.g., "5CSEMA5F31C6").
    fn device_name(&self) -> &str;

    /// Returns the total number of LUTs (or ALMs for Intel) in the device.
    fn total_luts(&self) -> u32;

    /// Returns the total number of flip-flops in the device.
    fn total_ffs(&self) -> u32;

    /// Returns the total number of block RAM tiles in the device.
    fn total_bram(&self) -> u32;

    /// Returns the total number of DSP blocks in the device.
    fn total_dsp(&self) -> u32;

    /// Returns the total number of user I/O pins on the device.
    fn total_io(&self) -> u32;

    /// Returns the total number of PLL/MMCM blocks in the device.
    fn total_pll(&self) -> u32;

    /// Returns the number of inputs per LUT on this device (typically 4 or 6).
    fn lut_input_count(&self) -> u32;

    /// Returns a summary of the total device resources.
    fn resource_summary(&self) -> ResourceUsage;

    /// Creates a technology mapper for this device family.
    fn tech_mapper(&self) -> Box<dyn TechMapper>;

    /// Returns the device's synthetic grid: tiles, sites, BELs and the
    /// routing graph. Every family builds one at construction time via
    /// [`grid::SyntheticGrid::build`].
    fn grid(&self) -> &SyntheticGrid;

    // --- Grid topology (derived from `grid()`) ---

    /// Returns the device grid dimensions as (columns, rows).
    fn grid_dimensions(&self) -> (u32, u32) {
        (self.grid().width, self.grid().height)
    }

    /// Returns the tile at the given grid coordinates, if it exists.
    fn get_tile(&self, col: u32, row: u32) -> Option<&Tile> {
        self.grid().tile(col, row)
    }

    /// Returns the site with the given ID, if it exists.
    fn get_site(&self, id: SiteId) -> Option<&Site> {
        self.grid().site(id)
    }

    /// Returns all sites of the given type.
    fn sites_of_type(&self, site_type: types::SiteType) -> Vec<SiteId> {
        self.grid().sites_of_type(site_type)
    }

    /// Returns the device routing graph.
    fn routing_graph(&self) -> &RoutingGraph {
        &self.grid().routing
    }

    /// Returns all BELs in the device.
    fn bels(&self) -> Vec<BelId> {
        self.grid()
            .sites
            .iter()
            .flat_map(|s| s.bels.iter().map(|b| b.id))
            .collect()
    }

    /// Returns all routing wires in the device.
    fn wires(&self) -> Vec<WireId> {
        self.grid().routing.wires.iter().map(|w| w.id).collect()
    }

    /// Returns all PIPs in the device.
    fn pips(&self) -> Vec<PipId> {
        self.grid().routing.pips.iter().map(|p| p.id).collect()
    }

    /// Looks up a BEL by its instance name.
    fn bel_by_name(&self, name: &str) -> Option<BelId> {
        self.grid()
            .sites
            .iter()
            .flat_map(|s| &s.bels)
            .find(|b| b.name == name)
            .map(|b| b.id)
    }

    /// Looks up a wire by name.
    fn wire_by_name(&self, name: &str) -> Option<WireId> {
        self.grid()
            .routing
            .wires
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.id)
    }

    /// Looks up a PIP by its `src->dst` name form (`"SRC->DST"`).
    fn pip_by_name(&self, name: &str) -> Option<PipId> {
        let (src, dst) = name.split_once("->")?;
        let src = self.wire_by_name(src)?;
        let dst = self.wire_by_name(dst)?;
        self.grid()
            .routing
            .pips
            .iter()
            .find(|p| p.src_wire == src && p.dst_wire == dst)
            .map(|p| p.id)
    }

    /// Returns the BEL at the given site/tile location, if any.
    fn bel_by_location(&self, col: u32, row: u32, z: u32) -> Option<BelId> {
        let tile = self.grid().tile(col, row)?;
        let site_id = *tile.sites.first()?;
        let site = self.grid().site(site_id)?;
        site.bels.get(z as usize).map(|b| b.id)
    }

    // --- Graph ---

    /// Returns a PIP's source wire.
    fn pip_src_wire(&self, pip: PipId) -> Option<WireId> {
        self.grid().routing.pip(pip).map(|p| p.src_wire)
    }

    /// Returns a PIP's destination wire.
    fn pip_dst_wire(&self, pip: PipId) -> Option<WireId> {
        self.grid().routing.pip(pip).map(|p| p.dst_wire)
    }

    /// Returns the PIPs that can drive the given wire.
    fn pips_uphill(&self, wire: WireId) -> Vec<PipId> {
        self.grid()
            .routing
            .wire(wire)
            .map(|w| w.uphill_pips.clone())
            .unwrap_or_default()
    }

    /// Returns the PIPs the given wire can drive.
    fn pips_downhill(&self, wire: WireId) -> Vec<PipId> {
        self.grid()
            .routing
            .wire(wire)
            .map(|w| w.downhill_pips.clone())
            .unwrap_or_default()
    }

    /// Returns the named pins of a BEL.
    fn bel_pins(&self, bel: BelId) -> Vec<BelPin> {
        self.grid()
            .sites
            .iter()
            .flat_map(|s| &s.bels)
            .find(|b| b.id == bel)
            .map(|b| b.pins.clone())
            .unwrap_or_default()
    }

    /// Returns the wire a named BEL pin is wired to.
    fn bel_pin_wire(&self, bel: BelId, pin: &str) -> Option<WireId> {
        self.bel_pins(bel)
            .into_iter()
            .find(|p| p.name == pin)
            .map(|p| p.wire)
    }

    // --- Pricing ---

    /// Returns the delay through a PIP.
    fn pip_delay(&self, pip: PipId) -> Delay {
        self.grid()
            .routing
            .pip(pip)
            .map(|p| p.delay)
            .unwrap_or(Delay::ZERO)
    }

    /// Returns the delay along a wire segment.
    ///
    /// Synthetic wires carry no intrinsic delay of their own (delay is
    /// modelled on the PIPs that drive them); default returns zero.
    fn wire_delay(&self, _wire: WireId) -> Delay {
        Delay::ZERO
    }

    /// An admissible Manhattan-distance delay estimate between two wires,
    /// for the router's A* heuristic.
    fn estimate_delay(&self, from: WireId, to: WireId) -> Delay {
        let grid = self.grid();
        let (fx, fy) = grid
            .routing
            .wire(from)
            .map(|w| (w.x, w.y))
            .unwrap_or((0, 0));
        let (tx, ty) = grid.routing.wire(to).map(|w| (w.x, w.y)).unwrap_or((0, 0));
        let dist = (fx as i64 - tx as i64).unsigned_abs() + (fy as i64 - ty as i64).unsigned_abs();
        Delay::new(
            dist as f64 * 0.08,
            dist as f64 * 0.1,
            dist as f64 * 0.15,
        )
    }

    /// A placement-cost delay prediction between two BEL pins, independent
    /// of any concrete routing.
    fn predict_delay(&self, bel1: BelId, pin1: &str, bel2: BelId, pin2: &str) -> Delay {
        match (
            self.bel_pin_wire(bel1, pin1),
            self.bel_pin_wire(bel2, pin2),
        ) {
            (Some(w1), Some(w2)) => self.estimate_delay(w1, w2),
            _ => Delay::ZERO,
        }
    }

    // --- Validity ---

    /// Returns `true` if a cell of the given type may be placed on the
    /// given BEL.
    ///
    /// Default compares the cell type string against the BEL's
    /// [`BelType`](types::BelType) name, case-insensitively.
    fn is_valid_bel_for_cell_type(&self, cell_type: &str, bel: BelId) -> bool {
        let Some(bel) = self
            .grid()
            .sites
            .iter()
            .flat_map(|s| &s.bels)
            .find(|b| b.id == bel)
        else {
            return false;
        };
        let ct = cell_type.to_ascii_uppercase();
        matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::Lut, s) if s.starts_with("LUT")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::Ff, "DFF" | "FDRE" | "FF")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::Carry, "CARRY")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::BramPrimitive, s) if s.contains("BRAM") || s.contains("RAM")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::DspPrimitive, s) if s.contains("DSP")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::IoBuf, s) if s.contains("IO") || s.contains("BUF")
        ) || matches!(
            (bel.bel_type, ct.as_str()),
            (types::BelType::PllPrimitive, s) if s.contains("PLL")
        )
    }

    /// Post-hoc validity check of the whole tile after binding — used to
    /// catch electrically conflicting BELs sharing a site. The synthetic
    /// device has no such conflicts, so the default always returns `true`.
    fn is_bel_location_valid(&self, _bel: BelId) -> bool {
        true
    }

    // --- Packing hooks ---

    /// Performs technology-specific legalisation before placement. The
    /// synthetic device needs none, so the default is a no-op success.
    fn pack(&self) -> bool {
        true
    }

    // --- Timing ---

    /// Returns the combinational delay through a cell of the given type.
    ///
    /// The `cell_type` parameter is a string identifier (e.g., "LUT6", "CARRY4")
    /// to avoid circular dependencies with downstream crates.
    fn cell_delay(&self, _cell_type: &str) -> Delay {
        Delay::ZERO
    }

    /// Returns the setup time for the given cell type relative to its clock.
    fn setup_time(&self, _cell_type: &str) -> Delay {
        Delay::ZERO
    }

    /// Returns the hold time for the given cell type relative to its clock.
    fn hold_time(&self, _cell_type: &str) -> Delay {
        Delay::ZERO
    }

    /// Returns the clock-to-output delay for the given cell type.
    fn clock_to_out(&self, _cell_type: &str) -> Delay {
        Delay::ZERO
    }

    /// Returns the combinational (or register) delay between two named ports
    /// of a cell type, if one exists.
    fn get_cell_delay(&self, cell_type: &str, from_port: &str, to_port: &str) -> Option<DelayQuad> {
        let _ = (from_port, to_port);
        let ns = self.cell_delay(cell_type).max_ns;
        if ns == 0.0 {
            None
        } else {
            Some(DelayQuad::symmetric((ns * 1000.0) as i64))
        }
    }

    /// Classifies a cell port for static timing analysis.
    ///
    /// Default classifies `"CLK"`/`"CLOCK"` as `ClkIn`, `"D"`/`"Q"` as
    /// register ports, everything else as combinational, by direction.
    fn get_port_timing_class(
        &self,
        _cell_type: &str,
        port: &str,
        direction: aion_ir::PortDirection,
    ) -> TimingPortClass {
        let p = port.to_ascii_uppercase();
        if p == "CLK" || p == "CLOCK" {
            TimingPortClass::ClkIn
        } else if p == "D" {
            TimingPortClass::RegIn
        } else if p == "Q" {
            TimingPortClass::RegOut
        } else {
            match direction {
                aion_ir::PortDirection::Input => TimingPortClass::CombIn,
                aion_ir::PortDirection::Output => TimingPortClass::CombOut,
                aion_ir::PortDirection::InOut => TimingPortClass::CombIn,
            }
        }
    }

    /// Returns clocking information for a register port, if applicable.
    fn get_port_clocking_info(
        &self,
        cell_type: &str,
        port: &str,
        _index: usize,
    ) -> Option<ClockingInfo> {
        let p = port.to_ascii_uppercase();
        if p == "D" {
            Some(ClockingInfo {
                clock_port: "CLK".to_string(),
                edge: types::ClockEdge::Rising,
                setup: Some(DelayQuad::symmetric(
                    (self.setup_time(cell_type).max_ns * 1000.0) as i64,
                )),
                hold: Some(DelayQuad::symmetric(
                    (self.hold_time(cell_type).max_ns * 1000.0) as i64,
                )),
                clock_to_out: None,
            })
        } else if p == "Q" {
            Some(ClockingInfo {
                clock_port: "CLK".to_string(),
                edge: types::ClockEdge::Rising,
                setup: None,
                hold: None,
                clock_to_out: Some(DelayQuad::symmetric(
                    (self.clock_to_out(cell_type).max_ns * 1000.0) as i64,
                )),
            })
        } else {
            None
        }
    }

    // --- Cluster layout ---

    /// Returns the rigid placement of a cluster given its root's proposed
    /// BEL, or `None` if the root is not a cluster root / has no cluster.
    ///
    /// The synthetic device models no rigid macros, so the default is `None`.
    fn get_cluster_placement(&self, _root_bel: BelId) -> Option<Vec<(u32, BelId)>> {
        None
    }

    // --- Self-check ---

    /// Verifies the device database: every BEL/wire/PIP round-trips through
    /// its name, and every BEL location resolves back to that BEL.
    fn archcheck(&self) -> AionResult<()> {
        let grid = self.grid();
        for site in &grid.sites {
            for (z, bel) in site.bels.iter().enumerate() {
                match self.bel_by_name(&bel.name) {
                    Some(id) if id == bel.id => {}
                    _ => {
                        return Err(InternalError::new(format!(
                            "bel {} does not round-trip by name",
                            bel.name
                        )))
                    }
                }
                match self.bel_by_location(site.tile_col, site.tile_row, z as u32) {
                    Some(id) if id == bel.id => {}
                    _ => {
                        return Err(InternalError::new(format!(
                            "bel {} at ({}, {}, {}) does not resolve via location",
                            bel.name, site.tile_col, site.tile_row, z
                        )))
                    }
                }
            }
        }
        for wire in &grid.routing.wires {
            match self.wire_by_name(&wire.name) {
                Some(id) if id == wire.id => {}
                _ => {
                    return Err(InternalError::new(format!(
                        "wire {} does not round-trip by name",
                        wire.name
                    )))
                }
            }
        }
        for (col, row) in (0..grid.width).flat_map(|c| (0..grid.height).map(move |r| (c, r))) {
            if grid.tile(col, row).is_none() {
                return Err(InternalError::new(format!(
                    "tile ({col}, {row}) is in range but missing from the grid"
                )));
            }
        }
        Ok(())
    }
}

/// Loads an architecture model for the given family and device.
///
/// Supported families: `"cyclone_iv"`, `"cyclone_v"`, `"artix7"`.
///
/// If the device part number is not found within the family, falls back to the
/// smallest known device and returns a warning-level result (the `Architecture`
/// is still usable). Returns an error only if the family name is unknown.
///
/// # Errors
///
/// Returns `InternalError` if the family name is not recognized.
pub fn load_architecture(family: &str, device: &str) -> AionResult<Box<dyn Architecture>> {
    match family.to_ascii_lowercase().as_str() {
        "cyclone_iv" | "cycloneiv" | "cyclone-iv" | "cyclone4" | "cyclone_4" => {
            let (arch, _exact) = CycloneIv::new(device);
            Ok(Box::new(arch))
        }
        "cyclone_v" | "cyclonev" | "cyclone-v" => {
            let (arch, _exact) = CycloneV::new(device);
            Ok(Box::new(arch))
        }
        "artix7" | "artix-7" | "artix_7" => {
            let (arch, _exact) = Artix7::new(device);
            Ok(Box::new(arch))
        }
        _ => Err(InternalError::new(format!(
            "unknown FPGA family: {family:?}. Supported: cyclone_iv, cyclone_v, artix7"
        ))),
    }
}
