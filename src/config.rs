use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    encode::gif::AnimationParams,
    foundation::error::{BongoError, BongoResult},
    render::synth::SynthOpts,
};

/// Full processing configuration: how frames are synthesized and how they are encoded.
///
/// Every field has a default, so a JSON file only needs the keys it overrides:
///
/// ```json
/// { "synth": { "frame_count": 12 }, "animation": { "delay_ms": 100, "repeat": 0 } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BongoConfig {
    pub synth: SynthOpts,
    pub animation: AnimationParams,
}

impl BongoConfig {
    pub fn validate(&self) -> BongoResult<()> {
        self.synth.validate()?;
        self.animation.validate()
    }

    pub fn from_json_str(s: &str) -> BongoResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| BongoError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> BongoResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BongoError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
