//! Y-axis label inference from an experiment or channel name.
//!
//! Probes are checked in a fixed linear order and are not exclusive: every
//! probe that matches overwrites the label chosen so far, so the **last**
//! matching probe wins. The `cepia` probe carries a nested `MitoTd` check that
//! selects the ratiometric label over the intensity one.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Returned when no probe matches.
pub const PLACEHOLDER_LABEL: &str = "y_axis_label";

pub const CEPIA_MITOTD_LABEL: &str = "CEPIA3mt/MitoTdTomato\n(Relative Mito[Ca2+])";
pub const CEPIA_LABEL: &str = "CEPIA3mt Intensity\n(Relative Mito[Ca2+]";
pub const PERCEVAL_LABEL: &str = "PercevalHR 488/405\n(Relative ATP/ADP)";
pub const SONAR_LABEL: &str = "SoNaR 405/488\n(Relative NADH/NAD+)";
pub const CPYFP_LABEL: &str = "CpYFP 405/488";
pub const MITO_ORP1_LABEL: &str = "MitoRoGFP2_Orp1 405/488\n(Relative Mito[H2O2])";
pub const MITO_GRX_LABEL: &str = "MitoRoGFP2_Grx1 405/488\n(Relative Mito[EGSH])";
pub const CYTO_GRX_LABEL: &str = "CytoRoGFP2_Grx1 405/488\n(Relative Cyto[EGSH])";
pub const MITONAD_LABEL: &str = "MitoNAD+ sensor 405/488\n(Relative Mito[NAD+])";
pub const LACONIC_LABEL: &str = "Laconic Em 480/550\n(Relative [Lactate])";

/// A probe: pattern plus the label it selects.
struct Probe {
    regex: Regex,
    label: &'static str,
    /// Checked only when `regex` matched; a hit selects its label instead.
    refine: Option<Box<Probe>>,
}

impl Probe {
    fn new(pattern: &str, label: &'static str) -> Self {
        Self {
            regex: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("built-in probe {pattern:?} is invalid: {e}")),
            label,
            refine: None,
        }
    }

    fn refined_by(mut self, inner: Probe) -> Self {
        self.refine = Some(Box::new(inner));
        self
    }

    fn label_for(&self, name: &str) -> Option<&'static str> {
        if !self.regex.is_match(name) {
            return None;
        }
        Some(
            self.refine
                .as_ref()
                .and_then(|p| p.label_for(name))
                .unwrap_or(self.label),
        )
    }
}

static PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    vec![
        Probe::new("cepia", CEPIA_LABEL).refined_by(Probe::new("MitoTd", CEPIA_MITOTD_LABEL)),
        Probe::new("Perceval", PERCEVAL_LABEL),
        Probe::new("SoNAR", SONAR_LABEL),
        Probe::new("cpYFP", CPYFP_LABEL),
        Probe::new("Mito.*orp1", MITO_ORP1_LABEL),
        Probe::new("Mito.*Grx", MITO_GRX_LABEL),
        Probe::new("Cyto.*Grx", CYTO_GRX_LABEL),
        Probe::new("MitoNAD", MITONAD_LABEL),
        Probe::new("Lacon", LACONIC_LABEL),
    ]
});

/// Pick a human-readable y-axis label for an experiment name.
///
/// ```
/// use biosensor_plots::labels::infer_axis_label;
/// assert_eq!(infer_axis_label("Perceval_sensor"), "PercevalHR 488/405\n(Relative ATP/ADP)");
/// assert_eq!(infer_axis_label("unknown_probe"), "y_axis_label");
/// ```
pub fn infer_axis_label(name: &str) -> &'static str {
    PROBES
        .iter()
        .rev()
        .find_map(|p| p.label_for(name))
        .unwrap_or(PLACEHOLDER_LABEL)
}
