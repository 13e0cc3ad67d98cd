//! `aion pnr` — place and route a synthesized design standalone.
//!
//! Runs parse → elaborate → synthesize → place & route without generating a
//! bitstream, so the placer/router can be tuned and iterated on directly.
//! The full pipeline:
//!
//! 1. Find project root and load config
//! 2. Resolve target and load the architecture backend
//! 3. `--test`: run `archcheck()` on the architecture and exit, skipping
//!    everything else
//! 4. `--load <file>`: restore a previously saved project instead of
//!    re-running pack/place/route
//! 5. Otherwise: discover, parse, elaborate, and synthesize sources
//! 6. Place and route with the resolved seed and settings
//! 7. `--save <file>`: persist the result for a future `--load`

use aion_cache::{ChipArgs, PersistedProject, ProjectSettings};
use aion_common::Interner;
use aion_config::{PlacerKind, ProjectConfig, RouterKind};
use aion_diagnostics::DiagnosticSink;

use crate::pipeline::{
    discover_source_files, load_timing_constraints, parse_all_files, resolve_build_target,
    resolve_project_root,
};
use crate::{GlobalArgs, PnrArgs};

/// Runs the `aion pnr` command.
///
/// Exit codes follow spec §7: `0` on success, `1` if routing or timing
/// closure failed but `--force` let the run continue, `-1` on a hard
/// failure (bad config, unreadable sources, a failed load).
pub fn run(args: &PnrArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = aion_config::load_config(&project_dir)?;
    let resolved = resolve_build_target(&config, args.target.as_deref())?;

    let arch = aion_arch::load_architecture(&resolved.family, &resolved.device)
        .map_err(|e| format!("failed to load architecture: {}", e.message))?;

    if args.test {
        return Ok(run_archcheck(&*arch, global));
    }

    let seed = resolve_seed(args);

    if let Some(load_path) = &args.load {
        return run_load(load_path, global);
    }

    let src_dir = project_dir.join("src");
    let source_files = if src_dir.is_dir() {
        discover_source_files(&src_dir)?
    } else {
        Vec::new()
    };
    if source_files.is_empty() {
        eprintln!("error: no HDL source files found in {}", src_dir.display());
        return Ok(-1);
    }

    let mut source_db = aion_source::SourceDb::new();
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let parsed = parse_all_files(&source_files, &mut source_db, &interner, &sink)?;
    if sink.has_errors() {
        crate::pipeline::render_diagnostics(&sink, &source_db, global.color);
        return Ok(-1);
    }

    let design = aion_elaborate::elaborate(&parsed, &config, &source_db, &interner, &sink)?;
    if sink.has_errors() {
        crate::pipeline::render_diagnostics(&sink, &source_db, global.color);
        return Ok(-1);
    }

    let mapped = aion_synth::synthesize(
        &design,
        &interner,
        arch.as_ref(),
        &resolved.build.optimization,
        &sink,
    );

    if !global.quiet {
        let usage = &mapped.resource_usage;
        eprintln!(
            "   Synthesized: {} LUTs, {} FFs, {} BRAM, {} DSP, {} IO",
            usage.luts, usage.ffs, usage.bram, usage.dsp, usage.io
        );
    }

    if args.pack_only {
        crate::pipeline::render_diagnostics(&sink, &source_db, global.color);
        return Ok(if sink.has_errors() { 1 } else { 0 });
    }

    let constraints = load_timing_constraints(&project_dir, &resolved, &interner, &sink);

    let netlist = aion_pnr::place_and_route(&mapped, arch.as_ref(), &constraints, &interner, &sink, seed);
    let netlist = match netlist {
        Ok(nl) => nl,
        Err(e) => {
            eprintln!("error: place and route failed: {}", e.message);
            return Ok(if args.force { 1 } else { -1 });
        }
    };

    if !global.quiet {
        eprintln!(
            "   Placed and routed ({} cells, {} nets)",
            netlist.cells.len(),
            netlist.nets.len()
        );
    }

    if let Err(e) = aion_pnr::check(&netlist) {
        eprintln!("error: netlist consistency check failed: {}", e.message);
        if !args.force {
            return Ok(-1);
        }
    }

    if let Some(save_path) = &args.save {
        let project = PersistedProject::new(
            ChipArgs {
                family: resolved.family.clone(),
                device: resolved.device.clone(),
            },
            settings_from(&config, args, seed),
            netlist,
        );
        project
            .save_to_file(std::path::Path::new(save_path))
            .map_err(|e| format!("failed to save project to {save_path}: {e}"))?;
        if !global.quiet {
            eprintln!("   Saved {save_path}");
        }
    }

    crate::pipeline::render_diagnostics(&sink, &source_db, global.color);
    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Resolves the RNG seed per `--seed`/`--randomize-seed`.
///
/// `--randomize-seed` derives a seed from the current time rather than
/// using a fixed default, trading determinism for variety across runs.
fn resolve_seed(args: &PnrArgs) -> u64 {
    if args.randomize_seed {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed.unwrap_or(1)
    }
}

/// Builds the [`ProjectSettings`] snapshot saved alongside a placed netlist.
///
/// `--ignore-loops` and `--cstrweight`/`--slack-redist-iter` are accepted for
/// compatibility with the settings map (spec §6) but have no placer/router
/// knob to attach to yet, so they are parsed and otherwise unused here.
fn settings_from(config: &ProjectConfig, args: &PnrArgs, seed: u64) -> ProjectSettings {
    ProjectSettings {
        target_freq: args.freq.map(|mhz| mhz * 1_000_000.0),
        timing_driven: !args.no_tmdriv,
        seed,
        placer: match config.pnr.placer {
            PlacerKind::Sa => "sa".to_string(),
            PlacerKind::Heap => "heap".to_string(),
        },
        router: match config.pnr.router {
            RouterKind::Router1 => "router1".to_string(),
            RouterKind::Router2 => "router2".to_string(),
        },
    }
}

/// Runs `--test`: verifies the device database round-trips and exits.
fn run_archcheck(arch: &dyn aion_arch::Architecture, global: &GlobalArgs) -> i32 {
    match arch.archcheck() {
        Ok(()) => {
            if !global.quiet {
                eprintln!("   archcheck passed");
            }
            0
        }
        Err(e) => {
            eprintln!("error: archcheck failed: {}", e.message);
            -1
        }
    }
}

/// Runs `--load`: restores a previously saved project and reports it.
fn run_load(path: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = PersistedProject::load_from_file(std::path::Path::new(path))
        .map_err(|e| format!("failed to load project from {path}: {e}"))?;
    if !global.quiet {
        eprintln!(
            "   Loaded {} ({}), {} cells, {} nets, checksum {:#010x}",
            project.chip_args.family,
            project.chip_args.device,
            project.netlist.cells.len(),
            project.netlist.nets.len(),
            project.checksum,
        );
    }
    Ok(0)
}
