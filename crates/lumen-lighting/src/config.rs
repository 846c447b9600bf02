//! Lighting settings parsed from the configuration metadata.

use std::collections::HashMap;

use lumen_processing::ConfigFile;
use serde::Deserialize;
use thiserror::Error;

/// Metadata key under which the lighting settings live.
pub const LIGHTING_META_KEY: &str = "lighting";

#[derive(Debug, Error)]
pub enum LightingError {
    #[error("no \"lighting\" key in configuration metadata")]
    MissingConfig,
    #[error("malformed lighting configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// The portion of the configuration metadata that holds the lighting
/// engine's settings.
///
/// Light levels and diminishing factors are non-negative by construction:
/// the tables deserialize as `u32`, so a negative or fractional value is
/// rejected before the engine ever touches the board.
#[derive(Clone, Debug, Deserialize)]
pub struct LightingConfig {
    /// Terrain written over every unlit tile by the darkening pass.
    pub darkness: String,
    /// Base light emitted by a terrain type.
    pub spaces: HashMap<String, u32>,
    /// Light emitted by a carried item.
    pub items: HashMap<String, u32>,
    /// Light emitted by a token kind.
    pub tokens: HashMap<String, u32>,
    /// Terrain-to-terrain re-broadcast: light received on the key terrain
    /// is retransmitted, attenuated by one, from every tile of the value
    /// terrain, regardless of spatial distance.
    pub adjacency: HashMap<String, String>,
    /// Per-terrain occlusion subtracted from light crossing it.
    pub diminishing: HashMap<String, u32>,
}

impl LightingConfig {
    /// Reads and validates the settings from the config's metadata table.
    /// All validation happens here, before any board mutation.
    pub fn from_meta(config: &ConfigFile) -> Result<Self, LightingError> {
        let value = config
            .meta(LIGHTING_META_KEY)
            .ok_or(LightingError::MissingConfig)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    #[inline]
    pub fn terrain_light(&self, terrain: &str) -> Option<i32> {
        self.spaces.get(terrain).map(|&v| v as i32)
    }

    #[inline]
    pub fn item_light(&self, item: &str) -> Option<i32> {
        self.items.get(item).map(|&v| v as i32)
    }

    #[inline]
    pub fn token_light(&self, kind: &str) -> Option<i32> {
        self.tokens.get(kind).map(|&v| v as i32)
    }

    #[inline]
    pub fn adjacency_target(&self, terrain: &str) -> Option<&str> {
        self.adjacency.get(terrain).map(String::as_str)
    }

    /// Occlusion factor for light crossing the given terrain; 0 when
    /// unconfigured.
    #[inline]
    pub fn diminish_factor(&self, terrain: &str) -> i32 {
        self.diminishing.get(terrain).copied().unwrap_or(0) as i32
    }
}
