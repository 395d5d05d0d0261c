#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::SPEED_OF_LIGHT_M_S, prelude::Duration};

mod method;
pub use method::SmoothingMethod;

fn default_interval_s() -> f64 {
    30.0
}

fn default_min_arc_len() -> usize {
    80
}

fn default_p1p2_m() -> f64 {
    30.0
}

fn default_p1c1_m() -> f64 {
    10.0
}

fn default_mw_factor() -> f64 {
    4.0
}

fn default_mw_confirm_cycles() -> f64 {
    1.0
}

fn default_gf_threshold_m() -> f64 {
    0.15
}

fn default_code_noise_m() -> f64 {
    0.3
}

fn default_phase_noise_m() -> f64 {
    0.003
}

fn default_clock_jump() -> bool {
    true
}

fn default_clock_code_noise_m() -> f64 {
    5.0
}

fn default_rounding_tolerance() -> f64 {
    0.1
}

fn default_microsecond_threshold_m() -> f64 {
    0.5E-6 * SPEED_OF_LIGHT_M_S
}

fn default_min_weight() -> f64 {
    0.01
}

fn default_weight_decrement() -> f64 {
    0.02
}

fn default_edge_epochs() -> usize {
    30
}

fn default_shell_height_m() -> f64 {
    450.0E3
}

fn default_elevation_mask_deg() -> f64 {
    15.0
}

/// Pseudo range outlier thresholds. Default values follow
/// the real time quality control of Zhang et al. (2012).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutlierOpts {
    /// Maximal |P1 - P2| (m)
    #[cfg_attr(feature = "serde", serde(default = "default_p1p2_m"))]
    pub p1p2_m: f64,
    /// Maximal |P1 - C1| (m), only used when P2 is missing
    #[cfg_attr(feature = "serde", serde(default = "default_p1c1_m"))]
    pub p1c1_m: f64,
}

impl Default for OutlierOpts {
    fn default() -> Self {
        Self {
            p1p2_m: default_p1p2_m(),
            p1c1_m: default_p1c1_m(),
        }
    }
}

/// Cycle slip detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleSlipOpts {
    /// A wide lane jump larger than this many running standard deviations
    /// is a discontinuity.
    #[cfg_attr(feature = "serde", serde(default = "default_mw_factor"))]
    pub mw_factor: f64,
    /// When the following wide lane value remains within this many cycles,
    /// the discontinuity is a cycle slip, otherwise an outlier.
    #[cfg_attr(feature = "serde", serde(default = "default_mw_confirm_cycles"))]
    pub mw_confirm_cycles: f64,
    /// Maximal geometry free variation between two epochs (m)
    #[cfg_attr(feature = "serde", serde(default = "default_gf_threshold_m"))]
    pub gf_threshold_m: f64,
    /// Pseudo range noise (1 sigma, m), seeds the wide lane deviation
    #[cfg_attr(feature = "serde", serde(default = "default_code_noise_m"))]
    pub code_noise_m: f64,
    /// Phase range noise (1 sigma, m), seeds the wide lane deviation
    #[cfg_attr(feature = "serde", serde(default = "default_phase_noise_m"))]
    pub phase_noise_m: f64,
}

impl Default for CycleSlipOpts {
    fn default() -> Self {
        Self {
            mw_factor: default_mw_factor(),
            mw_confirm_cycles: default_mw_confirm_cycles(),
            gf_threshold_m: default_gf_threshold_m(),
            code_noise_m: default_code_noise_m(),
            phase_noise_m: default_phase_noise_m(),
        }
    }
}

/// Receiver clock jump detection parameters.
/// The default thresholds come from a general noise model
/// and may require tuning for specific receivers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockJumpOpts {
    /// Enables clock jump detection and repair
    #[cfg_attr(feature = "serde", serde(default = "default_clock_jump"))]
    pub enabled: bool,
    /// Code measurement noise (m). Millisecond jumps are declared
    /// above 1E-3 * c - 3 sigma.
    #[cfg_attr(feature = "serde", serde(default = "default_clock_code_noise_m"))]
    pub code_noise_m: f64,
    /// Satellites with a larger geometry free variation (m) are suspected
    /// of cycle slip and do not vote.
    #[cfg_attr(feature = "serde", serde(default = "default_gf_threshold_m"))]
    pub gf_slip_threshold_m: f64,
    /// Maximal distance between the estimated jump and its rounded value,
    /// in milliseconds (resp. microseconds).
    #[cfg_attr(feature = "serde", serde(default = "default_rounding_tolerance"))]
    pub rounding_tolerance: f64,
    /// Code minus phase variation (m) above which a satellite votes
    /// for a microsecond jump. Half a microsecond by default.
    #[cfg_attr(feature = "serde", serde(default = "default_microsecond_threshold_m"))]
    pub microsecond_threshold_m: f64,
}

impl Default for ClockJumpOpts {
    fn default() -> Self {
        Self {
            enabled: default_clock_jump(),
            code_noise_m: default_clock_code_noise_m(),
            gf_slip_threshold_m: default_gf_threshold_m(),
            rounding_tolerance: default_rounding_tolerance(),
            microsecond_threshold_m: default_microsecond_threshold_m(),
        }
    }
}

/// Recursive (bidirectional) Hatch filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HatchOpts {
    /// Code weight floor
    #[cfg_attr(feature = "serde", serde(default = "default_min_weight"))]
    pub min_weight: f64,
    /// Code weight decrement, per epoch
    #[cfg_attr(feature = "serde", serde(default = "default_weight_decrement"))]
    pub weight_decrement: f64,
    /// Number of epochs, on each edge, that only use the converged pass
    #[cfg_attr(feature = "serde", serde(default = "default_edge_epochs"))]
    pub edge_epochs: usize,
}

impl Default for HatchOpts {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
            weight_decrement: default_weight_decrement(),
            edge_epochs: default_edge_epochs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Nominal sampling interval (s)
    #[cfg_attr(feature = "serde", serde(default = "default_interval_s"))]
    pub interval_s: f64,
    /// Minimal arc length (number of epochs). Shorter arcs are dropped.
    #[cfg_attr(feature = "serde", serde(default = "default_min_arc_len"))]
    pub min_arc_len: usize,
    /// [OutlierOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub outliers: OutlierOpts,
    /// [CycleSlipOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub cycle_slip: CycleSlipOpts,
    /// [ClockJumpOpts]
    #[cfg_attr(feature = "serde", serde(default))]
    pub clock_jump: ClockJumpOpts,
    /// [SmoothingMethod] applied to each arc
    #[cfg_attr(feature = "serde", serde(default))]
    pub smoothing: SmoothingMethod,
    /// [HatchOpts] for [SmoothingMethod::BidirectionalHatch]
    #[cfg_attr(feature = "serde", serde(default))]
    pub hatch: HatchOpts,
    /// Single layer ionosphere height (m)
    #[cfg_attr(feature = "serde", serde(default = "default_shell_height_m"))]
    pub shell_height_m: f64,
    /// Records observed below this elevation are not exported
    #[cfg_attr(feature = "serde", serde(default = "default_elevation_mask_deg"))]
    pub elevation_mask_deg: f64,
    /// Polynomial detrending of the vertical TEC, per arc.
    #[cfg_attr(feature = "serde", serde(default))]
    pub detrend_order: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_s: default_interval_s(),
            min_arc_len: default_min_arc_len(),
            outliers: OutlierOpts::default(),
            cycle_slip: CycleSlipOpts::default(),
            clock_jump: ClockJumpOpts::default(),
            smoothing: SmoothingMethod::default(),
            hatch: HatchOpts::default(),
            shell_height_m: default_shell_height_m(),
            elevation_mask_deg: default_elevation_mask_deg(),
            detrend_order: None,
        }
    }
}

impl Config {
    /// Returns the nominal sampling interval as [Duration]
    pub fn interval(&self) -> Duration {
        Duration::from_seconds(self.interval_s)
    }

    /// Returns [Config] with desired sampling interval (s)
    pub fn with_interval_s(&self, interval_s: f64) -> Self {
        let mut s = self.clone();
        s.interval_s = interval_s;
        s
    }

    /// Returns [Config] with desired minimal arc length
    pub fn with_min_arc_len(&self, min_arc_len: usize) -> Self {
        let mut s = self.clone();
        s.min_arc_len = min_arc_len;
        s
    }

    /// Returns [Config] with desired [SmoothingMethod]
    pub fn with_smoothing(&self, smoothing: SmoothingMethod) -> Self {
        let mut s = self.clone();
        s.smoothing = smoothing;
        s
    }
}
