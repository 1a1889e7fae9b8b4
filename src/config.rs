use anyhow::{Context, Result};
use serde::Deserialize;

/// Knobs for one analyzer. Passed explicitly; nothing here is process-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Skip wait probes on kinds with no held tile within reach when the
    /// oracle reports that such draws can never advance the hand.
    pub prune_floating: bool,
    /// Emit a `trace!` line for every improving (draw, discard) pair.
    pub trace_improvements: bool,
    /// Worker threads for batch analysis. None = rayon default (num CPUs).
    pub threads: Option<usize>,
}

impl AnalysisConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("failed to parse analysis config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = AnalysisConfig::from_json(r#"{"prune_floating": true}"#).unwrap();
        assert_eq!(
            config,
            AnalysisConfig {
                prune_floating: true,
                ..Default::default()
            },
        );
        assert_eq!(AnalysisConfig::from_json("{}").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn rejects_malformed() {
        assert!(AnalysisConfig::from_json(r#"{"threads": "four"}"#).is_err());
    }
}
