//! Persisted place-and-routed project.
//!
//! Captures enough of a [`PnrNetlist`] and the settings that produced it to
//! skip pack/place/route entirely on a later run (`aion pnr --load`). Stored
//! as a single JSON file, following the same load-returns-`None`-on-any-
//! error, save-creates-directories shape as [`crate::manifest::CacheManifest`].

use std::path::Path;

use aion_pnr::PnrNetlist;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Name of the persisted project file within a build directory.
const PROJECT_FILE: &str = "project.json";

/// Architecture selection a persisted project was placed and routed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipArgs {
    /// Architecture family (e.g. `"cyclone_iv"`).
    pub family: String,
    /// Device part number within the family.
    pub device: String,
}

/// The settings map (spec §6) in effect when the project was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Clock-period assumption for unconstrained clocks, in Hz.
    pub target_freq: Option<f64>,
    /// Whether timing-weighted placement and routing was enabled.
    pub timing_driven: bool,
    /// RNG seed the placer and router were invoked with.
    pub seed: u64,
    /// Selected placer (`"sa"` or `"heap"`).
    pub placer: String,
    /// Selected router (`"router1"` or `"router2"`).
    pub router: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            target_freq: None,
            timing_driven: true,
            seed: 1,
            placer: "sa".to_string(),
            router: "router2".to_string(),
        }
    }
}

/// A persisted project: chip selection, settings, and the full bound
/// netlist (cells with placement/params/attrs, nets with their routed
/// wires and pips), matching spec §6's `{chip_args, settings, cells, nets}`
/// round-trip requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedProject {
    /// The architecture the netlist was placed and routed against.
    pub chip_args: ChipArgs,
    /// The settings map in effect during place and route.
    pub settings: ProjectSettings,
    /// The placed-and-routed netlist (cells, nets, pins, bound wires/pips).
    pub netlist: PnrNetlist,
    /// `context::checksum(&netlist)` at save time, so `load` can detect a
    /// file that was hand-edited or corrupted in transit.
    pub checksum: u32,
}

impl PersistedProject {
    /// Builds a persisted project snapshot from a netlist, computing its
    /// checksum at construction time.
    pub fn new(chip_args: ChipArgs, settings: ProjectSettings, netlist: PnrNetlist) -> Self {
        let checksum = aion_pnr::checksum(&netlist);
        Self {
            chip_args,
            settings,
            netlist,
            checksum,
        }
    }

    /// Saves the project to `<dir>/project.json`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<(), CacheError> {
        std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = dir.join(PROJECT_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Saves the project to an exact file path rather than a directory,
    /// for the CLI's `--save <file>` flag.
    pub fn save_to_file(&self, path: &Path) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Loads a project previously saved to `<dir>/project.json`.
    pub fn load(dir: &Path) -> Result<Self, CacheError> {
        Self::load_from_file(&dir.join(PROJECT_FILE))
    }

    /// Loads a project from an exact file path, for `--load <file>`.
    ///
    /// Re-derives the netlist's checksum and errors with
    /// [`CacheError::ChecksumMismatch`] if it disagrees with the stored
    /// value, rather than silently handing back a corrupted project.
    pub fn load_from_file(path: &Path) -> Result<Self, CacheError> {
        let content = std::fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let project: Self = serde_json::from_str(&content).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        let actual = aion_pnr::checksum(&project.netlist);
        if actual != project.checksum {
            return Err(CacheError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: project.checksum.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_arch::{load_architecture, types::SiteType};
    use aion_common::{LogicVec, PlaceStrength};
    use aion_pnr::{PnrCell, PnrCellId, PnrCellType};

    fn sample_project() -> PersistedProject {
        let arch = load_architecture("cyclone_iv", "EP4CE22F17C6N").unwrap();
        let site = arch.sites_of_type(SiteType::LutFf)[0];
        let mut netlist = PnrNetlist::new();
        netlist.add_cell(PnrCell {
            id: PnrCellId::from_raw(0),
            name: "lut_0".into(),
            cell_type: PnrCellType::Lut {
                inputs: 4,
                init: LogicVec::from_bool(false),
            },
            placement: Some(site),
            is_fixed: false,
            strength: PlaceStrength::Placer,
            ..Default::default()
        });
        PersistedProject::new(
            ChipArgs {
                family: "cyclone_iv".into(),
                device: "EP4CE22F17C6N".into(),
            },
            ProjectSettings::default(),
            netlist,
        )
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let project = sample_project();
        project.save(dir.path()).unwrap();

        let loaded = PersistedProject::load(dir.path()).unwrap();
        assert_eq!(loaded.chip_args, project.chip_args);
        assert_eq!(loaded.settings, project.settings);
        assert_eq!(loaded.checksum, project.checksum);
        assert_eq!(loaded.netlist.cells.len(), project.netlist.cells.len());
        assert_eq!(
            loaded.netlist.cells[0].placement,
            project.netlist.cells[0].placement
        );
    }

    #[test]
    fn save_to_file_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_project.json");
        let project = sample_project();
        project.save_to_file(&path).unwrap();

        let loaded = PersistedProject::load_from_file(&path).unwrap();
        assert_eq!(loaded.checksum, project.checksum);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = PersistedProject::load(dir.path()).unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn load_rejects_tampered_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = sample_project();
        project.save(dir.path()).unwrap();
        project.checksum = project.checksum.wrapping_add(1);
        let json = serde_json::to_string_pretty(&project).unwrap();
        std::fs::write(dir.path().join("project.json"), json).unwrap();

        let err = PersistedProject::load(dir.path()).unwrap_err();
        assert!(matches!(err, CacheError::ChecksumMismatch { .. }));
    }

    #[test]
    fn default_settings_are_timing_driven() {
        let settings = ProjectSettings::default();
        assert!(settings.timing_driven);
        assert_eq!(settings.seed, 1);
    }
}
