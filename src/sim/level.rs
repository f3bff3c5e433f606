//! Procedural vertical level generation
//!
//! The generator keeps a frontier of floor-block patterns at least 1.25
//! screens above the player, stamping every pattern with a monotonically
//! increasing altitude, and drops patterns that have scrolled well below the
//! camera. Pattern layouts come from a fixed catalog; which one spawns next
//! is the only random decision in the whole simulation.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::ConfigError;

/// Horizontal anchor for every pattern: roughly centered on the arena, on the
/// block grid (block centers sit at odd x coordinates).
const PATTERN_ANCHOR_X: f32 = SCREEN_WIDTH / 2.0 - 1.0;

/// A fixed block-group layout. Offsets are relative to the pattern anchor;
/// each template spans the pattern's two rows (local y 0 and 5).
#[derive(Debug, Clone, Copy)]
pub struct PatternTemplate {
    pub name: &'static str,
    pub blocks: &'static [(f32, f32)],
    pub coins: &'static [(f32, f32)],
}

/// The built-in layout catalog. Coins float 1.5 units above their row so the
/// player sweeps them up while crossing the platform.
pub fn builtin_catalog() -> Vec<PatternTemplate> {
    BUILTIN.to_vec()
}

static BUILTIN: &[PatternTemplate] = &[
    PatternTemplate {
        name: "twin-ledges",
        blocks: &[
            (-7.0, 0.0),
            (-5.0, 0.0),
            (-3.0, 0.0),
            (3.0, 5.0),
            (5.0, 5.0),
            (7.0, 5.0),
        ],
        coins: &[(5.0, 6.5)],
    },
    PatternTemplate {
        name: "stepping-stones",
        blocks: &[(-1.0, 0.0), (1.0, 0.0), (-7.0, 5.0), (-5.0, 5.0)],
        coins: &[(0.0, 1.5)],
    },
    PatternTemplate {
        name: "split-floor",
        blocks: &[
            (-7.0, 0.0),
            (-5.0, 0.0),
            (5.0, 0.0),
            (7.0, 0.0),
            (-1.0, 5.0),
            (1.0, 5.0),
        ],
        coins: &[(0.0, 6.5)],
    },
    PatternTemplate {
        name: "long-shelf",
        blocks: &[
            (-7.0, 0.0),
            (-5.0, 0.0),
            (-3.0, 0.0),
            (-1.0, 0.0),
            (1.0, 5.0),
            (3.0, 5.0),
            (5.0, 5.0),
            (7.0, 5.0),
        ],
        coins: &[],
    },
    PatternTemplate {
        name: "islands",
        blocks: &[(-5.0, 0.0), (-3.0, 0.0), (3.0, 0.0), (5.0, 0.0), (-1.0, 5.0), (1.0, 5.0)],
        coins: &[(-4.0, 1.5), (4.0, 1.5)],
    },
    PatternTemplate {
        name: "bridge-and-posts",
        blocks: &[
            (-3.0, 0.0),
            (-1.0, 0.0),
            (1.0, 0.0),
            (3.0, 0.0),
            (-7.0, 5.0),
            (7.0, 5.0),
        ],
        coins: &[(-7.0, 6.5), (7.0, 6.5)],
    },
];

/// One floor block, stamped with its pattern's altitude
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pos: Vec2,
    pattern: u32,
    altitude: u32,
}

impl Block {
    pub(crate) fn new(pos: Vec2, pattern: u32, altitude: u32) -> Self {
        Self {
            pos,
            pattern,
            altitude,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn altitude(&self) -> u32 {
        self.altitude
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BLOCK_WIDTH / 2.0, BLOCK_HEIGHT / 2.0))
    }
}

/// A collectible coin riding on a pattern
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    pos: Vec2,
    pattern: u32,
}

impl Coin {
    pub(crate) fn new(pos: Vec2, pattern: u32) -> Self {
        Self { pos, pattern }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(COIN_SIZE / 2.0))
    }
}

/// One instantiated pattern: an anchor, a template, and the altitude shared
/// by every block that belongs to it
#[derive(Debug, Clone, Copy)]
pub struct FloorPattern {
    id: u32,
    /// Catalog index; `None` for the seeded start floor
    template: Option<usize>,
    anchor: Vec2,
    altitude: u32,
}

impl FloorPattern {
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn altitude(&self) -> u32 {
        self.altitude
    }

    pub fn template(&self) -> Option<usize> {
        self.template
    }
}

/// The level generator and the content it owns
#[derive(Debug, Clone)]
pub struct Level {
    catalog: Vec<PatternTemplate>,
    rng: Pcg32,
    patterns: Vec<FloorPattern>,
    blocks: Vec<Block>,
    coins: Vec<Coin>,
    /// Frontier: anchor of the most recently generated pattern
    last_anchor: Option<Vec2>,
    /// Altitude stamped onto the next generated pattern (1, 2, 3, ...)
    altitude: u32,
    next_id: u32,
}

impl Level {
    /// Validate the catalog and build a level with the start floor seeded.
    pub fn new(seed: u64, catalog: Vec<PatternTemplate>) -> Result<Self, ConfigError> {
        if catalog.is_empty() {
            return Err(ConfigError::EmptyPatternCatalog);
        }
        for template in &catalog {
            if template.blocks.is_empty() {
                return Err(ConfigError::EmptyPattern(template.name));
            }
        }
        let mut level = Self {
            catalog,
            rng: Pcg32::seed_from_u64(seed),
            patterns: Vec::new(),
            blocks: Vec::new(),
            coins: Vec::new(),
            last_anchor: None,
            altitude: 1,
            next_id: 0,
        };
        level.reset();
        Ok(level)
    }

    /// Clear generated content and reseed the start floor. The RNG is left
    /// where it is so consecutive runs in one session draw fresh layouts.
    pub fn reset(&mut self) {
        self.patterns.clear();
        self.blocks.clear();
        self.coins.clear();
        self.last_anchor = None;
        self.altitude = 1;
        self.spawn_start_floor();
    }

    /// Extend the frontier until the last pattern sits at least 1.25 screens
    /// above the player. Catches up over multiple patterns in one tick if the
    /// player moved unusually fast.
    pub fn tick(&mut self, player_y: f32) {
        let threshold = player_y + SCREEN_HEIGHT * 1.25;
        while self.last_anchor.is_none_or(|a| a.y < threshold) {
            self.spawn_pattern();
        }
    }

    /// Remove every pattern that has scrolled more than half a screen plus
    /// the despawn margin below the camera center, along with its blocks and
    /// coins. Evaluated every tick, independent of generation.
    pub fn despawn_below(&mut self, camera_y: f32) {
        let down_limit = camera_y - SCREEN_HEIGHT / 2.0 - DESPAWN_MARGIN;
        let mut removed: Vec<u32> = Vec::new();
        self.patterns.retain(|p| {
            if p.anchor.y < down_limit {
                removed.push(p.id);
                false
            } else {
                true
            }
        });
        if removed.is_empty() {
            return;
        }
        self.blocks.retain(|b| !removed.contains(&b.pattern));
        self.coins.retain(|c| !removed.contains(&c.pattern));
        log::debug!("despawned {} pattern(s) below y {:.1}", removed.len(), down_limit);
    }

    pub fn patterns(&self) -> &[FloorPattern] {
        &self.patterns
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub(crate) fn coins_mut(&mut self) -> &mut Vec<Coin> {
        &mut self.coins
    }

    /// The altitude the next generated pattern will carry
    pub fn current_altitude(&self) -> u32 {
        self.altitude
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The start floor spans the arena bottom at altitude 0 so the player has
    /// footing before pattern 1 spawns above it.
    fn spawn_start_floor(&mut self) {
        let id = self.next_id();
        let anchor = Vec2::new(SCREEN_WIDTH / 2.0, START_FLOOR_Y);
        self.patterns.push(FloorPattern {
            id,
            template: None,
            anchor,
            altitude: 0,
        });
        let columns = (SCREEN_WIDTH / BLOCK_WIDTH) as u32;
        for i in 0..columns {
            let x = BLOCK_WIDTH / 2.0 + i as f32 * BLOCK_WIDTH;
            self.blocks.push(Block::new(Vec2::new(x, START_FLOOR_Y), id, 0));
        }
    }

    fn spawn_pattern(&mut self) {
        let anchor = match self.last_anchor {
            // First pattern: half a screen down, one row spacing up, plus the
            // half-block start-ground offset
            None => Vec2::new(
                PATTERN_ANCHOR_X,
                -SCREEN_HEIGHT / 2.0 + PATTERN_VERTICAL_DISTANCE + 0.5,
            ),
            // Each pattern is two rows tall, so the next anchor moves up two
            // row spacings
            Some(prev) => prev + Vec2::new(0.0, PATTERN_VERTICAL_DISTANCE * 2.0),
        };

        let template_num = self.rng.random_range(0..self.catalog.len());
        let template = self.catalog[template_num];
        let id = self.next_id();
        let altitude = self.altitude;

        for &(dx, dy) in template.blocks {
            self.blocks
                .push(Block::new(anchor + Vec2::new(dx, dy), id, altitude));
        }
        for &(dx, dy) in template.coins {
            self.coins.push(Coin::new(anchor + Vec2::new(dx, dy), id));
        }
        self.patterns.push(FloorPattern {
            id,
            template: Some(template_num),
            anchor,
            altitude,
        });
        log::debug!(
            "pattern {} '{}' spawned at ({:.1}, {:.1})",
            altitude,
            template.name,
            anchor.x,
            anchor.y
        );

        self.last_anchor = Some(anchor);
        self.altitude += 1;
    }
}
