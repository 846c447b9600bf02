//! Raw light emitted at a tile, before falloff and occlusion.

use lumen_board::{Board, Position, Token};

use crate::config::LightingConfig;

/// Base light for a terrain type with no `spaces` entry.
pub const DEFAULT_TERRAIN_LIGHT: i32 = 0;
/// Light for a token carrying an item with no `items` entry.
pub const DEFAULT_ITEM_LIGHT: i32 = 1;
/// Light for a plain token with no `tokens` entry.
pub const DEFAULT_TOKEN_LIGHT: i32 = 3;

/// Supplies the raw light level emitted at a board position.
pub trait LightSourceSupplier {
    fn light_source(&self, board: &Board, pos: Position) -> i32;
}

/// Override applied to the terrain component of a tile's light. Receives
/// the board, the position, and the configured terrain light, and returns
/// the value to use instead. Token light is unaffected.
pub type TerrainOverride<'a> = Box<dyn Fn(&Board, Position, i32) -> i32 + 'a>;

/// Light source supplier that reads from the board and the lighting
/// configuration: the maximum of the terrain's base light and the light
/// of every visible token on the tile. Hidden tokens contribute nothing.
pub struct ConfigLightSources<'a> {
    config: &'a LightingConfig,
    terrain_override: Option<TerrainOverride<'a>>,
}

impl<'a> ConfigLightSources<'a> {
    pub fn new(config: &'a LightingConfig) -> Self {
        ConfigLightSources {
            config,
            terrain_override: None,
        }
    }

    pub fn with_terrain_override(config: &'a LightingConfig, f: TerrainOverride<'a>) -> Self {
        ConfigLightSources {
            config,
            terrain_override: Some(f),
        }
    }

    /// The known per-game exception: a tile of `terrain` carrying
    /// `attribute` emits no terrain light.
    pub fn with_attribute_immunity(
        config: &'a LightingConfig,
        terrain: &'a str,
        attribute: &'a str,
    ) -> Self {
        Self::with_terrain_override(
            config,
            Box::new(move |board, pos, base| {
                if board.tile(pos).terrain == terrain && board.tile_has_attribute(pos, attribute) {
                    0
                } else {
                    base
                }
            }),
        )
    }

    fn terrain_light(&self, board: &Board, pos: Position) -> i32 {
        let base = self
            .config
            .terrain_light(&board.tile(pos).terrain)
            .unwrap_or(DEFAULT_TERRAIN_LIGHT);
        match &self.terrain_override {
            Some(f) => f(board, pos, base),
            None => base,
        }
    }

    fn token_light(&self, token: &Token) -> i32 {
        match token {
            Token::Hidden { .. } => 0,
            Token::Visible {
                item: Some(item), ..
            } => self.config.item_light(item).unwrap_or(DEFAULT_ITEM_LIGHT),
            Token::Visible { kind, .. } => {
                self.config.token_light(kind).unwrap_or(DEFAULT_TOKEN_LIGHT)
            }
        }
    }
}

impl LightSourceSupplier for ConfigLightSources<'_> {
    fn light_source(&self, board: &Board, pos: Position) -> i32 {
        let mut best = self.terrain_light(board, pos);
        for token in board.tile_tokens(pos) {
            best = best.max(self.token_light(token));
        }
        best
    }
}
