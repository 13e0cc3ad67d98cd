//! Synthetic device-grid construction shared by all architecture families.
//!
//! Faithful per-family chip databases (the exact tile layout of a real Intel
//! or Xilinx part) are out of scope — only the interface the core place-and-
//! route engine consumes is specified. This module builds a grid that is
//! structurally real (tiles contain sites, sites contain BELs with pins,
//! wires connect BEL pins to a PIP mesh) but whose size is capped so the
//! in-memory model stays small regardless of a device's nominal LUT count.

use crate::ids::{BelId, PipId, SiteId, WireId};
use crate::types::{
    Bel, BelPin, BelType, Delay, Pip, RoutingGraph, Site, SiteType, Tile, TileType, Wire,
};
use aion_ir::PortDirection;

/// Maximum grid side length, in tiles, regardless of device size.
const MAX_SIDE: u32 = 48;
/// Logic elements (LUT+FF pairs) packed into one logic site.
const LES_PER_SITE: u32 = 8;

/// A fully connected synthetic device grid: tiles, sites, BELs, and the
/// routing graph linking them.
#[derive(Debug, Clone, Default)]
pub struct SyntheticGrid {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// All tiles, row-major (`tiles[row * width + col]`).
    pub tiles: Vec<Tile>,
    /// All sites across all tiles.
    pub sites: Vec<Site>,
    /// The interconnect fabric.
    pub routing: RoutingGraph,
}

impl SyntheticGrid {
    /// Builds a grid sized to (approximately) hold `logic_elements` LUT+FF
    /// pairs, with `lut_inputs` inputs per LUT, plus at least `io_count` I/O
    /// sites and a handful of BRAM/DSP/PLL tiles.
    pub fn build(logic_elements: u32, lut_inputs: u32, io_count: u32) -> Self {
        let logic_sites = logic_elements.div_ceil(LES_PER_SITE).max(1);
        let side = (logic_sites as f64).sqrt().ceil() as u32;
        let side = side.clamp(2, MAX_SIDE);
        let width = side;
        let height = side;

        let mut tiles = Vec::with_capacity((width * height) as usize);
        let mut sites = Vec::new();
        let mut wires = Vec::new();
        let mut pips = Vec::new();
        let mut next_site = 0u32;
        let mut next_bel = 0u32;
        let mut next_wire = 0u32;
        let mut next_pip = 0u32;

        // wire id allocated per (tile, pin-slot) for the site's single output,
        // used to build the inter-tile mesh.
        let mut tile_out_wire: Vec<WireId> = Vec::with_capacity((width * height) as usize);

        for row in 0..height {
            for col in 0..width {
                let is_io_edge = row == 0 || row == height - 1 || col == 0 || col == width - 1;
                let is_bram_col = col % 7 == 3 && !is_io_edge;
                let is_dsp_col = col % 11 == 5 && !is_io_edge;
                let is_clock_tile = row == height / 2 && col == width / 2;

                let tile_type = if is_io_edge {
                    TileType::Io
                } else if is_clock_tile {
                    TileType::Clock
                } else if is_bram_col {
                    TileType::Bram
                } else if is_dsp_col {
                    TileType::Dsp
                } else {
                    TileType::Logic
                };

                let site_id = SiteId::from_raw(next_site);
                next_site += 1;

                let (site_type, bel_type, n_inputs) = match tile_type {
                    TileType::Io => (SiteType::IoPad, BelType::IoBuf, 1),
                    TileType::Clock => (SiteType::Pll, BelType::PllPrimitive, 1),
                    TileType::Bram => (SiteType::BramSite, BelType::BramPrimitive, 2),
                    TileType::Dsp => (SiteType::DspSite, BelType::DspPrimitive, 2),
                    TileType::Logic | TileType::Empty => (SiteType::LutFf, BelType::Lut, lut_inputs),
                };

                let in_wires: Vec<WireId> = (0..n_inputs)
                    .map(|_| {
                        let w = WireId::from_raw(next_wire);
                        next_wire += 1;
                        w
                    })
                    .collect();
                let out_wire = WireId::from_raw(next_wire);
                next_wire += 1;

                let mut bel_pins = Vec::with_capacity(n_inputs as usize + 1);
                for (i, w) in in_wires.iter().enumerate() {
                    bel_pins.push(BelPin {
                        name: format!("I{i}"),
                        direction: PortDirection::Input,
                        wire: *w,
                    });
                }
                bel_pins.push(BelPin {
                    name: "O".to_string(),
                    direction: PortDirection::Output,
                    wire: out_wire,
                });

                let bel_id = BelId::from_raw(next_bel);
                next_bel += 1;
                let mut bels = vec![Bel {
                    id: bel_id,
                    name: format!("BEL_{row}_{col}_0"),
                    bel_type,
                    pins: bel_pins,
                }];

                // Logic sites additionally carry a paired flip-flop BEL fed
                // from the LUT's output wire.
                if matches!(tile_type, TileType::Logic) {
                    let ff_q = WireId::from_raw(next_wire);
                    next_wire += 1;
                    let ff_id = BelId::from_raw(next_bel);
                    next_bel += 1;
                    bels.push(Bel {
                        id: ff_id,
                        name: format!("BEL_{row}_{col}_FF"),
                        bel_type: BelType::Ff,
                        pins: vec![
                            BelPin {
                                name: "D".to_string(),
                                direction: PortDirection::Input,
                                wire: out_wire,
                            },
                            BelPin {
                                name: "Q".to_string(),
                                direction: PortDirection::Output,
                                wire: ff_q,
                            },
                        ],
                    });
                    wires.push(Wire {
                        id: ff_q,
                        name: format!("W_{row}_{col}_FFQ"),
                        x: col,
                        y: row,
                        uphill_pips: Vec::new(),
                        downhill_pips: Vec::new(),
                        bel_pins: vec![ff_id],
                    });
                }

                for (i, w) in in_wires.iter().enumerate() {
                    wires.push(Wire {
                        id: *w,
                        name: format!("W_{row}_{col}_I{i}"),
                        x: col,
                        y: row,
                        uphill_pips: Vec::new(),
                        downhill_pips: Vec::new(),
                        bel_pins: vec![bel_id],
                    });
                }
                wires.push(Wire {
                    id: out_wire,
                    name: format!("W_{row}_{col}_O"),
                    x: col,
                    y: row,
                    uphill_pips: Vec::new(),
                    downhill_pips: Vec::new(),
                    bel_pins: vec![bel_id],
                });

                // A direct pip from this site's output to each of its own
                // input wires lets a single-site net route (e.g. a constant
                // feeding a LUT input with no other driver).
                for w in &in_wires {
                    pips.push(Pip {
                        id: PipId::from_raw(next_pip),
                        src_wire: out_wire,
                        dst_wire: *w,
                        delay: Delay::new(0.02, 0.05, 0.08),
                    });
                    next_pip += 1;
                }

                tile_out_wire.push(out_wire);
                sites.push(Site {
                    id: site_id,
                    site_type,
                    bels,
                    tile_col: col,
                    tile_row: row,
                });
                tiles.push(Tile {
                    col,
                    row,
                    tile_type,
                    sites: vec![site_id],
                });
            }
        }

        // Mesh: each tile's output wire feeds the input wire of its east and
        // south neighbour (enough connectivity for a multi-hop router to have
        // real path choices without an O(n^2) all-pairs mesh).
        for row in 0..height {
            for col in 0..width {
                let idx = (row * width + col) as usize;
                let out_wire = tile_out_wire[idx];
                if col + 1 < width {
                    let east_idx = (row * width + col + 1) as usize;
                    if let Some(in_wire) = sites[east_idx].bels[0].pins.first().map(|p| p.wire) {
                        pips.push(Pip {
                            id: PipId::from_raw(next_pip),
                            src_wire: out_wire,
                            dst_wire: in_wire,
                            delay: Delay::new(0.05, 0.1, 0.18),
                        });
                        next_pip += 1;
                    }
                }
                if row + 1 < height {
                    let south_idx = ((row + 1) * width + col) as usize;
                    if let Some(in_wire) = sites[south_idx].bels[0].pins.first().map(|p| p.wire) {
                        pips.push(Pip {
                            id: PipId::from_raw(next_pip),
                            src_wire: out_wire,
                            dst_wire: in_wire,
                            delay: Delay::new(0.05, 0.1, 0.18),
                        });
                        next_pip += 1;
                    }
                }
            }
        }

        let _ = io_count;
        let mut routing = RoutingGraph { wires, pips };
        routing.build_connectivity();

        Self {
            width,
            height,
            tiles,
            sites,
            routing,
        }
    }

    /// Returns the tile at `(col, row)`, if in range.
    pub fn tile(&self, col: u32, row: u32) -> Option<&Tile> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get((row * self.width + col) as usize)
    }

    /// Returns the site with the given ID.
    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.iter().find(|s| s.id == id)
    }

    /// Returns all sites of the given type.
    pub fn sites_of_type(&self, site_type: SiteType) -> Vec<SiteId> {
        self.sites
            .iter()
            .filter(|s| s.site_type == site_type)
            .map(|s| s.id)
            .collect()
    }
}
