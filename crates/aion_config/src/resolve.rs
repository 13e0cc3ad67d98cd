//! Target resolution: merging global and target-specific configurations.

use crate::error::ConfigError;
use crate::types::{BuildConfig, ConstraintConfig, PinAssignment, ProjectConfig};
use std::collections::BTreeMap;

/// A fully resolved target configuration with global and target-specific settings merged.
///
/// Global pin assignments serve as the base, and target-specific pins overlay on top.
/// Target-specific constraints override global constraints entirely.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// The target name.
    pub name: String,
    /// The full device part number.
    pub device: String,
    /// The device family name.
    pub family: String,
    /// Merged pin assignments (global base + target overlay).
    pub pins: BTreeMap<String, PinAssignment>,
    /// Resolved constraint configuration (target overrides global).
    pub constraints: ConstraintConfig,
    /// Build configuration.
    pub build: BuildConfig,
}

/// Resolves a named target by merging global settings with target-specific overrides.
///
/// Pin assignments are merged: global pins form the base, and target-specific pins
/// override any matching entries. Constraints from the target replace global constraints
/// entirely if present.
pub fn resolve_target(
    config: &ProjectConfig,
    target_name: &str,
) -> Result<ResolvedTarget, ConfigError> {
    let target = config
        .targets
        .get(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))?;

    // Merge pins: start with global, overlay target-specific
    let mut pins = config.pins.clone();
    for (name, assignment) in &target.pins {
        pins.insert(name.clone(), assignment.clone());
    }

    // Constraints: target overrides global if present
    let constraints = target
        .constraints
        .clone()
        .unwrap_or_else(|| config.constraints.clone());

    Ok(ResolvedTarget {
        name: target_name.to_string(),
        device: target.device.clone(),
        family: target.family.clone(),
        pins,
        constraints,
        build: BuildConfig {
            optimization: config.build.optimization.clone(),
            target_frequency: config.build.target_frequency.clone(),
            output_formats: config.build.output_formats.clone(),
        },
    })
}

// Implement Clone for OptLevel manually since it's needed
impl Clone for crate::types::OptLevel {
    fn clone(&self) -> Self {
        match self {
            crate::types::OptLevel::Area => crate::types::OptLevel::Area,
            crate::types::OptLevel::Speed => crate::types::OptLevel::Speed,
            crate::types::OptLevel::Balanced => crate::types::OptLevel::Balanced,
        }
    }
}

impl Clone for ConstraintConfig {
    fn clone(&self) -> Self {
        Self {
            timing: self.timing.clone(),
        }
    }
}

impl Clone for BuildConfig {
    fn clone(&self) -> Self {
        Self {
            optimization: self.optimization.clone(),
            target_frequency: self.target_frequency.clone(),
            output_formats: self.output_formats.clone(),
        }
    }
}
