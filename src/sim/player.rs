//! Player motion state machine
//!
//! Run/Jump with buffered jump input (grace window), variable jump height
//! (short-hop cutoff), wall-bounce direction flips, climb scoring on landing,
//! and one-shot off-screen fall detection. The per-tick protocol runs in a
//! fixed order: timers, input edges, grounding, state transition, jump
//! start, short-hop cutoff, horizontal velocity.

use glam::Vec2;

use super::collision::{self, Aabb, Contact, World};
use super::level::Coin;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::consts::*;
use crate::score::ScoreLedger;
use crate::tuning::Tuning;

/// Horizontal facing; flips on wall hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Run,
    Jump,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    facing: Facing,
    step: Step,
    next_step: Option<Step>,
    grounded: bool,
    fallen: bool,
    /// Seconds since the last state transition
    step_timer: f32,
    /// Seconds since jump was requested; -1.0 means no pending request
    jump_timer: f32,
    jump_held: bool,
    velocity_reduced: bool,
    /// Best height reached so far, for climb scoring
    highest_y: f32,
}

impl Player {
    /// Spawn standing on the start floor, running left
    pub(crate) fn new(tuning: &Tuning) -> Self {
        let pos = Vec2::new(SCREEN_WIDTH / 2.0, START_FLOOR_Y + BLOCK_HEIGHT / 2.0);
        Self {
            pos,
            vel: Vec2::new(-tuning.move_speed, 0.0),
            facing: Facing::Left,
            step: Step::Run,
            next_step: None,
            grounded: true,
            fallen: false,
            step_timer: 0.0,
            jump_timer: -1.0,
            jump_held: false,
            velocity_reduced: false,
            highest_y: pos.y,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn fallen(&self) -> bool {
        self.fallen
    }

    pub fn highest_y(&self) -> f32 {
        self.highest_y
    }

    /// Collider: the position marks the feet, the box sits half a unit up
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.pos + Vec2::new(0.0, COLLIDER_OFFSET_Y),
            Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
        )
    }

    /// Per-tick motion protocol. Velocity is written unconditionally every
    /// tick, whatever the state.
    pub(crate) fn update(
        &mut self,
        input: &TickInput,
        world: &World,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) {
        self.step_timer += dt;
        if self.jump_timer >= 0.0 {
            self.jump_timer += dt;
        }

        if input.jump_pressed {
            self.jump_timer = 0.0;
            self.jump_held = true;
        }
        if input.jump_released {
            self.jump_held = false;
        }

        self.grounded = self.check_grounded(world);

        if self.next_step.is_none() && self.grounded {
            match self.step {
                Step::Run => {
                    // An early press in the air still triggers a jump on
                    // landing, as long as it fell inside the grace window
                    if (0.0..=JUMP_GRACE_TIME).contains(&self.jump_timer) {
                        self.jump_timer = -1.0;
                        self.next_step = Some(Step::Jump);
                    }
                }
                Step::Jump => self.next_step = Some(Step::Run),
            }
        }

        if let Some(next) = self.next_step.take() {
            self.step = next;
            self.step_timer = 0.0;
            if self.step == Step::Jump {
                self.vel.y = tuning.jump_velocity();
                self.velocity_reduced = false;
                events.push(GameEvent::Jumped);
            }
        }

        // Short-hop cutoff: releasing the button mid-ascent scales the launch
        // velocity down, at most once per jump
        if self.step == Step::Jump
            && !self.jump_held
            && !self.velocity_reduced
            && self.vel.y > 0.0
        {
            self.vel.y *= JUMP_RELEASE_REDUCE;
            self.velocity_reduced = true;
        }

        self.vel.x = self.facing.sign() * tuning.move_speed.abs();
    }

    /// Apply gravity while airborne and move with collision, queueing the
    /// tick's contacts for the response pass.
    pub(crate) fn integrate(&mut self, world: &World, dt: f32, contacts: &mut Vec<Contact>) {
        if !self.grounded {
            self.vel.y -= GRAVITY * dt;
        }
        collision::move_and_collide(
            &mut self.pos,
            &mut self.vel,
            Vec2::new(0.0, COLLIDER_OFFSET_Y),
            Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
            world,
            dt,
            contacts,
        );
    }

    /// Contact response, drained once per tick. A side-probe hit flips the
    /// run direction; an airborne contact without a side hit is a ceiling
    /// bonk; anything else is a landing, which scores when the player stands
    /// meaningfully higher than ever before.
    pub(crate) fn handle_contacts(
        &mut self,
        contacts: &[Contact],
        world: &World,
        ledger: &mut ScoreLedger,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let mut side_handled = false;
        for _contact in contacts {
            if !side_handled && self.probe_side(world) {
                self.facing = self.facing.flipped();
                side_handled = true;
                events.push(GameEvent::WallHit);
            } else if !self.check_grounded(world) {
                events.push(GameEvent::WallHit);
            } else if self.pos.y > self.highest_y + CLIMB_EPSILON {
                // The tolerance absorbs floating contact noise; only a real
                // climb past the previous best height scores
                ledger.add_score(tuning.climb_points);
                self.highest_y = self.pos.y;
                events.push(GameEvent::Climbed {
                    points: tuning.climb_points,
                });
            }
        }
    }

    /// Pick up every coin the collider overlaps
    pub(crate) fn collect_coins(
        &self,
        coins: &mut Vec<Coin>,
        ledger: &mut ScoreLedger,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let bb = self.aabb();
        coins.retain(|coin| {
            if coin.aabb().intersects(&bb) {
                ledger.add_score(tuning.coin_points);
                events.push(GameEvent::CoinCollected {
                    points: tuning.coin_points,
                });
                false
            } else {
                true
            }
        });
    }

    /// One-shot off-screen detection: leaving the camera frustum is the sole
    /// fall signal and never resets during a run.
    pub(crate) fn check_visibility(&mut self, frustum: &Aabb) {
        if !self.fallen && !frustum.intersects(&self.aabb()) {
            self.fallen = true;
            log::debug!(
                "player left the screen at ({:.1}, {:.1})",
                self.pos.x,
                self.pos.y
            );
        }
    }

    /// Grounded when the downward probe hits, unless a jump started less than
    /// the liftoff window ago and the collider is still inside the probe zone
    fn check_grounded(&self, world: &World) -> bool {
        if !world.cast_box(&self.aabb(), Vec2::NEG_Y, PROBE_DISTANCE) {
            return false;
        }
        !(self.step == Step::Jump && self.step_timer < JUMP_LIFTOFF_TIME)
    }

    /// Either horizontal probe hitting reads as a side hit
    fn probe_side(&self, world: &World) -> bool {
        let bb = self.aabb();
        world.cast_box(&bb, Vec2::NEG_X, PROBE_DISTANCE)
            || world.cast_box(&bb, Vec2::X, PROBE_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Block;

    fn block_under_feet(x: f32, feet_y: f32) -> Block {
        Block::new(Vec2::new(x, feet_y - BLOCK_HEIGHT / 2.0), 0, 0)
    }

    fn floor_contact() -> Contact {
        Contact { normal: Vec2::Y }
    }

    #[test]
    fn test_grounded_suppressed_right_after_jump_start() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let blocks = [block_under_feet(player.pos.x, player.pos.y)];
        let world = World::new(&blocks);

        player.step = Step::Jump;
        player.step_timer = 0.2;
        assert!(!player.check_grounded(&world));

        player.step_timer = 0.5;
        assert!(player.check_grounded(&world));
    }

    #[test]
    fn test_press_while_grounded_starts_jump() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let blocks = [block_under_feet(player.pos.x, player.pos.y)];
        let world = World::new(&blocks);
        let mut events = Vec::new();

        let input = TickInput {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        player.update(&input, &world, &tuning, &mut events, SIM_DT);

        assert_eq!(player.step(), Step::Jump);
        assert!((player.velocity().y - tuning.jump_velocity()).abs() < 1e-4);
        assert!(events.contains(&GameEvent::Jumped));
        // The buffered request was consumed
        assert_eq!(player.jump_timer, -1.0);
    }

    #[test]
    fn test_short_hop_reduces_velocity_exactly_once() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let blocks = [block_under_feet(player.pos.x, player.pos.y)];
        let world = World::new(&blocks);
        let mut events = Vec::new();

        let press = TickInput {
            jump_pressed: true,
            jump_held: true,
            ..Default::default()
        };
        player.update(&press, &world, &tuning, &mut events, SIM_DT);
        let launch = player.velocity().y;

        let release = TickInput {
            jump_released: true,
            ..Default::default()
        };
        player.update(&release, &world, &tuning, &mut events, SIM_DT);
        assert!((player.velocity().y - launch * JUMP_RELEASE_REDUCE).abs() < 1e-4);

        // A repeated release edge must not reduce again
        let reduced = player.velocity().y;
        player.update(&release, &world, &tuning, &mut events, SIM_DT);
        assert_eq!(player.velocity().y, reduced);
    }

    #[test]
    fn test_landing_scores_only_past_climb_tolerance() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut ledger = ScoreLedger::new();
        let mut events = Vec::new();

        // Highest starts at 0; land at 10, 10.5, then 12
        player.highest_y = 0.0;

        player.pos = Vec2::new(9.0, 10.0);
        let blocks = [block_under_feet(9.0, 10.0)];
        let world = World::new(&blocks);
        player.handle_contacts(&[floor_contact()], &world, &mut ledger, &tuning, &mut events);
        assert_eq!(ledger.score(), tuning.climb_points);
        assert_eq!(player.highest_y(), 10.0);

        // Within the +1.0 tolerance: no points, highest unchanged
        player.pos = Vec2::new(9.0, 10.5);
        let blocks = [block_under_feet(9.0, 10.5)];
        let world = World::new(&blocks);
        player.handle_contacts(&[floor_contact()], &world, &mut ledger, &tuning, &mut events);
        assert_eq!(ledger.score(), tuning.climb_points);
        assert_eq!(player.highest_y(), 10.0);

        player.pos = Vec2::new(9.0, 12.0);
        let blocks = [block_under_feet(9.0, 12.0)];
        let world = World::new(&blocks);
        player.handle_contacts(&[floor_contact()], &world, &mut ledger, &tuning, &mut events);
        assert_eq!(ledger.score(), tuning.climb_points * 2);
        assert_eq!(player.highest_y(), 12.0);
    }

    #[test]
    fn test_side_contact_flips_facing_once() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut ledger = ScoreLedger::new();
        let mut events = Vec::new();

        // Hugging the left wall, mid-air
        player.pos = Vec2::new(0.5, 5.0);
        let world = World::new(&[]);
        assert_eq!(player.facing(), Facing::Left);
        player.handle_contacts(
            &[Contact { normal: Vec2::X }],
            &world,
            &mut ledger,
            &tuning,
            &mut events,
        );
        assert_eq!(player.facing(), Facing::Right);
        assert_eq!(events, vec![GameEvent::WallHit]);
        assert_eq!(ledger.score(), 0);
    }

    #[test]
    fn test_airborne_non_side_contact_is_ceiling_bonk() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut ledger = ScoreLedger::new();
        let mut events = Vec::new();

        // Mid-air, nothing beside or below
        player.pos = Vec2::new(9.0, 5.0);
        let world = World::new(&[]);
        player.handle_contacts(
            &[Contact { normal: Vec2::NEG_Y }],
            &world,
            &mut ledger,
            &tuning,
            &mut events,
        );
        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(events, vec![GameEvent::WallHit]);
    }

    #[test]
    fn test_coin_overlap_collects_and_scores() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let mut ledger = ScoreLedger::new();
        let mut events = Vec::new();

        player.pos = Vec2::new(9.0, 5.0);
        let mut coins = vec![
            Coin::new(Vec2::new(9.0, 5.5), 1),
            Coin::new(Vec2::new(14.0, 5.5), 1),
        ];
        player.collect_coins(&mut coins, &mut ledger, &tuning, &mut events);
        assert_eq!(coins.len(), 1);
        assert_eq!(ledger.score(), tuning.coin_points);
        assert_eq!(
            events,
            vec![GameEvent::CoinCollected {
                points: tuning.coin_points
            }]
        );
    }

    #[test]
    fn test_fallen_is_one_shot() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let frustum = Aabb::new(Vec2::new(9.0, 0.0), Vec2::new(9.0, 15.5));

        player.pos = Vec2::new(9.0, -40.0);
        player.check_visibility(&frustum);
        assert!(player.fallen());

        // Re-entering the frustum does not clear the flag
        player.pos = Vec2::new(9.0, 0.0);
        player.check_visibility(&frustum);
        assert!(player.fallen());
    }
}
