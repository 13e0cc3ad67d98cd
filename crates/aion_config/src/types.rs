//! Configuration types deserialized from `aion.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `aion.toml`.
///
/// Contains all project metadata, target definitions, pin assignments,
/// constraints, clock definitions, dependencies, and build/test/lint settings.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, top module, etc.).
    pub project: ProjectMeta,
    /// Named target configurations (e.g., "de10_nano", "arty_a7").
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
    /// Global pin assignments shared across all targets.
    #[serde(default)]
    pub pins: BTreeMap<String, PinAssignment>,
    /// Global constraint configuration.
    #[serde(default)]
    pub constraints: ConstraintConfig,
    /// Named clock definitions.
    #[serde(default)]
    pub clocks: BTreeMap<String, ClockDef>,
    /// External HDL library dependencies.
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
    /// Build settings (optimization level, target frequency).
    #[serde(default)]
    pub build: BuildConfig,
    /// Test settings (waveform format).
    #[serde(default)]
    pub test: TestConfig,
    /// Lint settings (deny/allow/warn rules, naming conventions).
    #[serde(default)]
    pub lint: LintConfig,
    /// Place-and-route settings (placer/router selection and tuning).
    #[serde(default)]
    pub pnr: PnrConfig,
}

/// Core project metadata required in every `aion.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// List of project authors.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Path to the top-level HDL file.
    pub top: String,
    /// SPDX license identifier.
    #[serde(default)]
    pub license: Option<String>,
}

/// Configuration for a specific hardware target (device + board).
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    /// Full part number (e.g., "5CSEMA5F31C6", "xc7a35ticpg236-1L").
    pub device: String,
    /// Device family name (e.g., "cyclone5", "artix7").
    pub family: String,
    /// Target-specific pin assignments that override/extend global pins.
    #[serde(default)]
    pub pins: BTreeMap<String, PinAssignment>,
    /// Target-specific constraint configuration.
    #[serde(default)]
    pub constraints: Option<ConstraintConfig>,
}

/// A single pin assignment mapping a signal name to a physical pin.
#[derive(Debug, Clone, Deserialize)]
pub struct PinAssignment {
    /// The physical pin identifier (e.g., "PIN_AF14", "E3").
    pub pin: String,
    /// The I/O standard (e.g., "3.3-V LVTTL", "LVCMOS33").
    pub io_standard: String,
}

/// Constraint file paths for timing constraints.
#[derive(Debug, Default, Deserialize)]
pub struct ConstraintConfig {
    /// Paths to SDC or XDC timing constraint files.
    #[serde(default)]
    pub timing: Vec<String>,
}

/// A clock signal definition with frequency and port binding.
#[derive(Debug, Deserialize)]
pub struct ClockDef {
    /// The clock frequency as a string (e.g., "50MHz"), parsed to [`Frequency`](aion_common::Frequency).
    pub frequency: String,
    /// The port name this clock is connected to.
    pub port: String,
}

/// Specification of an external HDL library dependency.
///
/// Uses serde's untagged enum to distinguish between git, path, and registry sources.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// A git repository dependency.
    Git {
        /// The git repository URL.
        git: String,
        /// An optional git tag.
        tag: Option<String>,
        /// An optional git branch.
        branch: Option<String>,
        /// An optional git revision hash.
        rev: Option<String>,
    },
    /// A local filesystem path dependency.
    Path {
        /// The filesystem path to the dependency.
        path: String,
    },
    /// A registry dependency (future use).
    Registry {
        /// The version requirement string.
        version: String,
    },
}

/// Build configuration controlling optimization and synthesis.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// The optimization level for synthesis.
    #[serde(default)]
    pub optimization: OptLevel,
    /// Target clock frequency for timing-driven optimization.
    pub target_frequency: Option<String>,
    /// Output bitstream formats (e.g., `"sof"`, `["sof", "pof"]`, or `"all"`).
    ///
    /// Accepts either a single string or a list of strings. Defaults to an
    /// empty vec, meaning the vendor's primary format will be used.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub output_formats: Vec<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `output_formats = "sof"` (string) and
/// `output_formats = ["sof", "pof"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Optimization level for synthesis passes.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OptLevel {
    /// Optimize for minimum area usage.
    Area,
    /// Optimize for maximum clock speed.
    Speed,
    /// Balance between area and speed (default).
    #[default]
    Balanced,
}

/// Test configuration for simulation.
#[derive(Debug, Default, Deserialize)]
pub struct TestConfig {
    /// The waveform output format for simulation.
    #[serde(default)]
    pub waveform_format: WaveformFormat,
}

/// Waveform output format for simulation dumps.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaveformFormat {
    /// Value Change Dump (IEEE 1364).
    Vcd,
    /// Fast Signal Trace (GTKWave native format, default).
    #[default]
    Fst,
    /// GHDL Waveform format.
    Ghw,
}

/// Lint configuration controlling which rules are enabled or disabled.
#[derive(Debug, Default, Deserialize)]
pub struct LintConfig {
    /// Rule codes to treat as errors.
    #[serde(default)]
    pub deny: Vec<String>,
    /// Rule codes to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Rule codes to treat as warnings.
    #[serde(default)]
    pub warn: Vec<String>,
    /// Naming convention configuration.
    #[serde(default)]
    pub naming: Option<NamingConfig>,
}

/// Naming convention rules for HDL identifiers.
#[derive(Debug, Deserialize)]
pub struct NamingConfig {
    /// Convention for module/entity names.
    pub module: Option<NamingConvention>,
    /// Convention for signal/wire names.
    pub signal: Option<NamingConvention>,
    /// Convention for parameter/generic names.
    pub parameter: Option<NamingConvention>,
    /// Convention for constant names.
    pub constant: Option<NamingConvention>,
}

/// A naming convention for identifiers.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `snake_case` — lowercase with underscores.
    SnakeCase,
    /// `camelCase` — lowercase first word, capitalized subsequent words.
    CamelCase,
    /// `UPPER_SNAKE_CASE` — uppercase with underscores.
    UpperSnakeCase,
    /// `PascalCase` — capitalized words with no separator.
    PascalCase,
}

/// Place-and-route settings, parsed from the `[pnr]` table.
///
/// Mirrors the settings-map keys the original implementation exposes as
/// flat `family/key` strings (`target_freq`, `timing_driven`,
/// `slack_redist_iter`, `placer`, `router`, `router2/*`, `placer1/*`); here
/// each `family/` prefix becomes a nested TOML table instead.
#[derive(Debug, Default, Deserialize)]
pub struct PnrConfig {
    /// Clock-period assumption for unconstrained clocks (e.g., `"100MHz"`).
    pub target_freq: Option<String>,
    /// Enables timing-weighted placement and routing.
    #[serde(default = "default_timing_driven")]
    pub timing_driven: bool,
    /// How often (in router iterations) to re-distribute arc timing budgets.
    pub slack_redist_iter: Option<u32>,
    /// Which detail placer to run.
    #[serde(default)]
    pub placer: PlacerKind,
    /// Which router to run.
    #[serde(default)]
    pub router: RouterKind,
    /// Tuning knobs specific to `router = "router2"`.
    #[serde(default)]
    pub router2: Router2Config,
    /// Tuning knobs specific to `placer = "sa"` (`placer1` in the original).
    #[serde(default)]
    pub placer1: Placer1Config,
}

fn default_timing_driven() -> bool {
    true
}

/// Detail placer selection.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlacerKind {
    /// Simulated-annealing detail placer.
    #[default]
    Sa,
    /// Analytic (HeAP-style) global placer.
    Heap,
}

/// Router selection.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    /// The original timing-naive maze router.
    Router1,
    /// The negotiated-congestion, timing-driven router.
    #[default]
    Router2,
}

/// Negotiated-congestion router tuning (`router2/*` settings-map keys).
#[derive(Debug, Deserialize)]
pub struct Router2Config {
    /// Search bounding-box margin in the X direction, in tiles.
    #[serde(default = "default_bb_margin")]
    pub bb_margin_x: u32,
    /// Search bounding-box margin in the Y direction, in tiles.
    #[serde(default = "default_bb_margin")]
    pub bb_margin_y: u32,
    /// Initial present-congestion cost weight.
    #[serde(default = "default_init_curr_cong_weight")]
    pub init_curr_cong_weight: f64,
    /// History congestion cost weight.
    #[serde(default = "default_hist_cong_weight")]
    pub hist_cong_weight: f64,
    /// Multiplier applied to the present-congestion weight each iteration.
    #[serde(default = "default_curr_cong_weight_mult")]
    pub curr_cong_weight_mult: f64,
    /// Weight of the `togo` (remaining distance) cost estimate.
    #[serde(default = "default_estimate_weight")]
    pub estimate_weight: f64,
    /// Extra cost added per sink pin consumed along a route.
    #[serde(default)]
    pub ipin_cost_adder: f64,
    /// Weight of the bias cost term steering routes toward less-used wires.
    #[serde(default)]
    pub bias_cost_factor: f64,
    /// Maximum backward-search iterations per net.
    #[serde(default = "default_bwd_max_iter")]
    pub bwd_max_iter: u32,
    /// Maximum backward-search iterations across the whole design.
    #[serde(default = "default_glb_bwd_max_iter")]
    pub glb_bwd_max_iter: u32,
    /// Whether timing-driven rip-up is enabled.
    #[serde(default = "default_timing_driven")]
    pub tmg_ripup: bool,
    /// Whether to emit a congestion heatmap after routing.
    #[serde(default)]
    pub heatmap: bool,
}

impl Default for Router2Config {
    fn default() -> Self {
        Self {
            bb_margin_x: default_bb_margin(),
            bb_margin_y: default_bb_margin(),
            init_curr_cong_weight: default_init_curr_cong_weight(),
            hist_cong_weight: default_hist_cong_weight(),
            curr_cong_weight_mult: default_curr_cong_weight_mult(),
            estimate_weight: default_estimate_weight(),
            ipin_cost_adder: 0.0,
            bias_cost_factor: 0.0,
            bwd_max_iter: default_bwd_max_iter(),
            glb_bwd_max_iter: default_glb_bwd_max_iter(),
            tmg_ripup: true,
            heatmap: false,
        }
    }
}

fn default_bb_margin() -> u32 {
    3
}
fn default_init_curr_cong_weight() -> f64 {
    0.5
}
fn default_hist_cong_weight() -> f64 {
    1.0
}
fn default_curr_cong_weight_mult() -> f64 {
    1.1
}
fn default_estimate_weight() -> f64 {
    1.8
}
fn default_bwd_max_iter() -> u32 {
    20
}
fn default_glb_bwd_max_iter() -> u32 {
    100
}

/// Simulated-annealing placer tuning (`placer1/*` settings-map keys).
#[derive(Debug, Deserialize)]
pub struct Placer1Config {
    /// Weight applied to user placement constraints during annealing.
    #[serde(default = "default_constraint_weight")]
    pub constraint_weight: f64,
}

impl Default for Placer1Config {
    fn default() -> Self {
        Self {
            constraint_weight: default_constraint_weight(),
        }
    }
}

fn default_constraint_weight() -> f64 {
    10.0
}
