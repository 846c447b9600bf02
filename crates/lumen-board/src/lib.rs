//! Sparse multi-floor board model: floors, tiles, tokens, attributes.
#![forbid(unsafe_code)]

pub mod floornum;

pub use floornum::FloorNumber;

use std::collections::{BTreeMap, HashMap};


/// A single board position: planar coordinates plus the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub floor: FloorNumber,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32, floor: FloorNumber) -> Self {
        Self { x, y, floor }
    }

    /// Planar offset on the same floor.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// A token occupying a tile. Hidden tokens are markers: they take up a
/// tile slot but are invisible to rendering and to light-source queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Visible {
        /// Kind name, resolved against the game's token definitions.
        kind: String,
        /// Carried item, if any.
        item: Option<String>,
        /// Pixel offset relative to the tile's top-left corner.
        offset: (i32, i32),
    },
    Hidden {
        kind: String,
    },
}

impl Token {
    #[inline]
    pub fn kind(&self) -> &str {
        match self {
            Token::Visible { kind, .. } | Token::Hidden { kind } => kind,
        }
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Token::Hidden { .. })
    }

    #[inline]
    pub fn item(&self) -> Option<&str> {
        match self {
            Token::Visible { item, .. } => item.as_deref(),
            Token::Hidden { .. } => None,
        }
    }
}

/// A named marker attached to tiles via the board's attribute table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Attribute { name: name.into() }
    }
}

/// One grid cell: a terrain name plus ordered token/attribute references.
/// The ids must resolve against the owning board's reference tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub terrain: String,
    pub token_ids: Vec<String>,
    pub attribute_ids: Vec<String>,
}

impl Tile {
    pub fn new(terrain: impl Into<String>) -> Self {
        Tile {
            terrain: terrain.into(),
            token_ids: Vec::new(),
            attribute_ids: Vec::new(),
        }
    }
}

/// One level of the board, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Floor {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Floor {
    /// A floor filled with one terrain and no tokens or attributes.
    pub fn filled(width: usize, height: usize, terrain: &str) -> Self {
        Floor {
            width,
            height,
            tiles: vec![Tile::new(terrain); width * height],
        }
    }

    /// Panics if the tile count does not match the dimensions.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        assert!(
            tiles.len() == width * height,
            "{} tiles do not fill a {width}x{height} floor",
            tiles.len()
        );
        Floor {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> &Tile {
        assert!(
            x < self.width && y < self.height,
            "tile ({x}, {y}) out of bounds on {}x{} floor",
            self.width,
            self.height
        );
        &self.tiles[self.idx(x, y)]
    }

    #[inline]
    pub fn tile_mut(&mut self, x: usize, y: usize) -> &mut Tile {
        assert!(
            x < self.width && y < self.height,
            "tile ({x}, {y}) out of bounds on {}x{} floor",
            self.width,
            self.height
        );
        let i = self.idx(x, y);
        &mut self.tiles[i]
    }
}

/// The board: a sparse stack of floors keyed by [`FloorNumber`], plus the
/// token/attribute reference tables and a string metadata table left by
/// the surrounding pipeline.
///
/// Every floor shares the same width and height; construction checks it.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    floors: BTreeMap<FloorNumber, Floor>,
    tokens: HashMap<String, Token>,
    attributes: HashMap<String, Attribute>,
    meta: HashMap<String, String>,
    width: usize,
    height: usize,
}

impl Board {
    /// Panics if the floors do not all share the same dimensions.
    pub fn new(
        floors: BTreeMap<FloorNumber, Floor>,
        tokens: HashMap<String, Token>,
        attributes: HashMap<String, Attribute>,
        meta: HashMap<String, String>,
    ) -> Self {
        let (width, height) = floors
            .values()
            .next()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0));
        for (num, floor) in &floors {
            assert!(
                floor.width() == width && floor.height() == height,
                "floor {num} is {}x{}, expected {width}x{height}",
                floor.width(),
                floor.height()
            );
        }
        Board {
            floors,
            tokens,
            attributes,
            meta,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Existing floors in ascending order.
    pub fn floors(&self) -> impl Iterator<Item = FloorNumber> + '_ {
        self.floors.keys().copied()
    }

    pub fn floor(&self, num: FloorNumber) -> Option<&Floor> {
        self.floors.get(&num)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && (pos.x as usize) < self.width
            && pos.y >= 0
            && (pos.y as usize) < self.height
            && self.floors.contains_key(&pos.floor)
    }

    /// Panics if the position is out of bounds; guard with
    /// [`Board::in_bounds`].
    pub fn tile(&self, pos: Position) -> &Tile {
        let floor = self
            .floors
            .get(&pos.floor)
            .unwrap_or_else(|| panic!("no floor {} on this board", pos.floor));
        assert!(
            pos.x >= 0 && (pos.x as usize) < self.width && pos.y >= 0 && (pos.y as usize) < self.height,
            "position ({}, {}, {}) out of bounds on {}x{} board",
            pos.x,
            pos.y,
            pos.floor,
            self.width,
            self.height
        );
        floor.tile(pos.x as usize, pos.y as usize)
    }

    /// Panics if the position is out of bounds; guard with
    /// [`Board::in_bounds`].
    pub fn tile_mut(&mut self, pos: Position) -> &mut Tile {
        let width = self.width;
        let height = self.height;
        let floor = self
            .floors
            .get_mut(&pos.floor)
            .unwrap_or_else(|| panic!("no floor {} on this board", pos.floor));
        assert!(
            pos.x >= 0 && (pos.x as usize) < width && pos.y >= 0 && (pos.y as usize) < height,
            "position ({}, {}, {}) out of bounds on {width}x{height} board",
            pos.x,
            pos.y,
            pos.floor
        );
        floor.tile_mut(pos.x as usize, pos.y as usize)
    }

    /// Every position across all floors: floors in ascending order,
    /// row-major within a floor.
    pub fn indices(&self) -> impl Iterator<Item = Position> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        self.floors.keys().copied().flat_map(move |f| {
            (0..h).flat_map(move |y| (0..w).map(move |x| Position::new(x, y, f)))
        })
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.get(id)
    }

    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.attributes.get(id)
    }

    #[inline]
    pub fn meta(&self) -> &HashMap<String, String> {
        &self.meta
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// The tokens on a tile, in tile order. A token id missing from the
    /// reference table is a board-integrity violation and panics.
    pub fn tile_tokens(&self, pos: Position) -> impl Iterator<Item = &Token> + '_ {
        self.tile(pos).token_ids.iter().map(move |id| {
            self.tokens
                .get(id)
                .unwrap_or_else(|| panic!("no such token {id:?} in references table"))
        })
    }

    /// Whether the tile carries an attribute with the given name. A
    /// dangling attribute id panics, like a dangling token id.
    pub fn tile_has_attribute(&self, pos: Position, name: &str) -> bool {
        self.tile(pos).attribute_ids.iter().any(|id| {
            self.attributes
                .get(id)
                .unwrap_or_else(|| panic!("no such attribute {id:?} in references table"))
                .name
                == name
        })
    }
}
