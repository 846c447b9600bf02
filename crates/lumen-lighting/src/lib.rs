//! Fixed-point tile illumination and the darkening pass.
//!
//! Light sources raise a per-tile light grid with Manhattan falloff and
//! line-of-sight occlusion; adjacency rules re-broadcast received light
//! between terrain types; the loop repeats until a full pass changes no
//! cell. Whatever converges at or below zero is then blacked out.
#![forbid(unsafe_code)]

pub mod config;
pub mod source;

pub use config::{LIGHTING_META_KEY, LightingConfig, LightingError};
pub use source::{ConfigLightSources, LightSourceSupplier, TerrainOverride};

use std::collections::{BTreeMap, HashSet};
use std::error::Error;

use lumen_board::{Board, FloorNumber, Position};
use lumen_processing::{BoardProcessor, ConfigFile, ProcessorRegistry};


/// Number of points sampled along the sight line between two tile centers
/// when collecting occluders. Tunable; kept coarse for compatibility with
/// the boards this engine is calibrated against.
const SIGHT_LINE_SAMPLES: u32 = 50;

/// Per-floor light levels plus the convergence dirty bit.
///
/// Values only ever move upward: [`LightGrid::update`] keeps the maximum
/// of the stored value and the candidate, so any set of updates converges
/// to the same grid in any order.
pub struct LightGrid {
    width: usize,
    height: usize,
    levels: BTreeMap<FloorNumber, Vec<i32>>,
    dirty: bool,
}

impl LightGrid {
    /// A zeroed grid with one plane per existing board floor.
    pub fn new(board: &Board) -> Self {
        let levels = board
            .floors()
            .map(|f| (f, vec![0; board.width() * board.height()]))
            .collect();
        LightGrid {
            width: board.width(),
            height: board.height(),
            levels,
            dirty: false,
        }
    }

    #[inline]
    fn offset(&self, pos: Position) -> usize {
        assert!(
            pos.x >= 0
                && (pos.x as usize) < self.width
                && pos.y >= 0
                && (pos.y as usize) < self.height,
            "position ({}, {}) out of bounds in {}x{} lighting grid",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        pos.y as usize * self.width + pos.x as usize
    }

    /// Panics if the floor or coordinate does not exist.
    pub fn get(&self, pos: Position) -> i32 {
        let i = self.offset(pos);
        let plane = self
            .levels
            .get(&pos.floor)
            .unwrap_or_else(|| panic!("no floor {} in lighting grid", pos.floor));
        plane[i]
    }

    /// Raises the stored value to `candidate` if larger, setting the
    /// dirty bit on change. Candidates may be negative; the stored value
    /// starts at zero and never decreases.
    pub fn update(&mut self, pos: Position, candidate: i32) {
        let i = self.offset(pos);
        let plane = self
            .levels
            .get_mut(&pos.floor)
            .unwrap_or_else(|| panic!("no floor {} in lighting grid", pos.floor));
        if candidate > plane[i] {
            plane[i] = candidate;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// Runs light emission over a board to a fixed point, then blacks out
/// whatever stayed unlit. The engine is the only writer of terrain names
/// and defers all terrain writes to [`LightingEngine::darken_board`], so
/// the board is stable for the whole convergence loop.
pub struct LightingEngine<'a, S> {
    board: &'a mut Board,
    config: &'a LightingConfig,
    sources: S,
    grid: LightGrid,
    positions: Vec<Position>,
}

impl<'a, S: LightSourceSupplier> LightingEngine<'a, S> {
    pub fn new(board: &'a mut Board, config: &'a LightingConfig, sources: S) -> Self {
        let grid = LightGrid::new(board);
        let positions = board.indices().collect();
        LightingEngine {
            board,
            config,
            sources,
            grid,
            positions,
        }
    }

    /// The converged light level at a position. Meaningful after
    /// [`LightingEngine::compute_all_lights`] has run.
    pub fn light_level(&self, pos: Position) -> i32 {
        self.grid.get(pos)
    }

    /// Iterates the emission passes until a full pass changes nothing.
    /// Terminates because updates only ever raise cell values and every
    /// emitted power is bounded by the configured light levels.
    pub fn compute_all_lights(&mut self) {
        let cfg = self.config;
        self.grid.mark_dirty();
        let mut iterations = 0u32;
        while self.grid.is_dirty() {
            self.grid.clear_dirty();
            iterations += 1;
            // Standard light sources.
            for i in 0..self.positions.len() {
                let pos = self.positions[i];
                let level = self.sources.light_source(self.board, pos);
                if level > 0 {
                    self.emit_light(pos, level);
                }
            }
            // Adjacency re-broadcast rules.
            for i in 0..self.positions.len() {
                let from = self.positions[i];
                if self.grid.get(from) <= 0 {
                    continue;
                }
                let Some(target) = cfg.adjacency_target(&self.board.tile(from).terrain) else {
                    continue;
                };
                for j in 0..self.positions.len() {
                    let to = self.positions[j];
                    if self.board.tile(to).terrain == target {
                        let power = self.grid.get(from) - 1;
                        self.emit_light(to, power);
                    }
                }
            }
        }
        log::debug!("lighting converged after {iterations} iteration(s)");
    }

    /// Emission from `origin` with the given power: every position within
    /// `power` Manhattan steps (planar axes plus the floor axis) receives
    /// the power minus its distance, minus the diminishing factor of each
    /// tile the sight line crosses on the way.
    fn emit_light(&mut self, origin: Position, power: i32) {
        for distance in 0..power {
            let base = power - distance;
            for target in manhattan_shell(self.board, origin, distance) {
                let mut level = base;
                if !origin.floor.is_infinite() && !target.floor.is_infinite() {
                    for crossed in sight_line_tiles(origin, target) {
                        // The destination never dampens its own incoming
                        // light; the origin does, if crossed.
                        if crossed == target || !self.board.in_bounds(crossed) {
                            continue;
                        }
                        level -= self
                            .config
                            .diminish_factor(&self.board.tile(crossed).terrain);
                    }
                }
                self.grid.update(target, level);
            }
        }
    }

    /// Resets every tile that converged at or below zero light to the
    /// darkness terrain and erases its tokens and attributes. One-way.
    pub fn darken_board(&mut self) {
        let mut darkened = 0usize;
        for i in 0..self.positions.len() {
            let pos = self.positions[i];
            if self.grid.get(pos) <= 0 {
                let tile = self.board.tile_mut(pos);
                tile.terrain = self.config.darkness.clone();
                tile.token_ids.clear();
                tile.attribute_ids.clear();
                darkened += 1;
            }
        }
        log::debug!("darkened {darkened} unlit tile(s)");
    }
}

/// Every in-bounds position at exactly `distance` Manhattan steps from
/// the origin, across x, y, and the floor axis. An infinity-floor origin
/// emits only within its own floor, since cross-floor distance is not
/// meaningful there; finite-floor arithmetic never reaches the infinity
/// floor, so the two never exchange light.
fn manhattan_shell(board: &Board, origin: Position, distance: i32) -> Vec<Position> {
    let mut out = Vec::new();
    if origin.floor.is_infinite() {
        planar_ring(board, origin, distance, &mut out);
    } else {
        for df in -distance..=distance {
            let center = Position::new(origin.x, origin.y, origin.floor + df);
            planar_ring(board, center, distance - df.abs(), &mut out);
        }
    }
    out
}

/// Positions at exactly `radius` planar steps from `center` on its floor.
fn planar_ring(board: &Board, center: Position, radius: i32, out: &mut Vec<Position>) {
    for dx in -radius..=radius {
        let dy = radius - dx.abs();
        let above = center.offset(dx, dy);
        if board.in_bounds(above) {
            out.push(above);
        }
        if dy != 0 {
            let below = center.offset(dx, -dy);
            if board.in_bounds(below) {
                out.push(below);
            }
        }
    }
}

/// The distinct tiles crossed by the straight line between two tile
/// centers, approximated by evenly spaced samples along the segment.
/// Defined only between finite floors; sampled positions may land on
/// floors the board does not have, so callers must bounds-check them.
fn sight_line_tiles(origin: Position, target: Position) -> Vec<Position> {
    let (Some(f0), Some(f1)) = (origin.floor.as_finite(), target.floor.as_finite()) else {
        return Vec::new();
    };
    let start = (
        f64::from(origin.x) + 0.5,
        f64::from(origin.y) + 0.5,
        f64::from(f0) + 0.5,
    );
    let end = (
        f64::from(target.x) + 0.5,
        f64::from(target.y) + 0.5,
        f64::from(f1) + 0.5,
    );
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for i in 0..SIGHT_LINE_SAMPLES {
        let t = f64::from(i) / f64::from(SIGHT_LINE_SAMPLES);
        let pos = Position::new(
            lerp(start.0, end.0, t).floor() as i32,
            lerp(start.1, end.1, t).floor() as i32,
            FloorNumber::Finite(lerp(start.2, end.2, t).floor() as i32),
        );
        if seen.insert(pos) {
            out.push(pos);
        }
    }
    out
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Pipeline entry point: parses the lighting settings from the config
/// metadata, runs the engine to convergence, then darkens the board. All
/// effects are in-place board mutations; a configuration error is
/// reported before the board is touched.
pub struct LightingProcessor;

impl BoardProcessor for LightingProcessor {
    fn run(&self, config: &ConfigFile, board: &mut Board) -> Result<(), Box<dyn Error>> {
        let lighting = LightingConfig::from_meta(config)?;
        let sources = ConfigLightSources::new(&lighting);
        let mut engine = LightingEngine::new(board, &lighting, sources);
        engine.compute_all_lights();
        engine.darken_board();
        Ok(())
    }
}

/// Installs the lighting processor into a registry under its canonical
/// name and the short `lighting` alias.
pub fn register(registry: &mut ProcessorRegistry) {
    registry.register_with_aliases("lumen_lighting::LightingProcessor", &["lighting"], || {
        Box::new(LightingProcessor)
    });
}
