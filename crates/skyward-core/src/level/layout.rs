//! Level geometry and its validated form.
//!
//! A [`LevelLayout`] is plain data, usually loaded from JSON or taken from
//! [`LevelLayout::builtin`]. Before a game starts, every layout is checked
//! and turned into a [`LevelBlueprint`]: a list of ready-made body
//! descriptors and behavior states. Spawning a level from a blueprint can no
//! longer fail.
//!
//! # Example
//!
//! ```
//! use skyward_core::config::Tuning;
//! use skyward_core::level::{LevelBlueprint, LevelId, LevelLayout};
//!
//! let layout = LevelLayout::builtin(LevelId::Two);
//! assert_eq!(layout.patrollers.len(), 2);
//!
//! let blueprint = LevelBlueprint::from_layout(LevelId::Two, &layout, &Tuning::default()).unwrap();
//! assert_eq!(blueprint.collectibles().len(), 4);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::behavior::EntityBehavior;
use crate::config::Tuning;
use crate::engine::{BodyDesc, BodyFlags, Visual};
use crate::entity::{ChaseState, EntityKind, HazardState, OscillationState, PatrolState};
use crate::error::{ConfigError, ConfigResult};

use super::LevelId;

/// Half extents shared by the player and enemy boxes.
pub const ACTOR_HALF_EXTENTS: Vec2 = Vec2::splat(0.25);

// =============================================================================
// Layout data
// =============================================================================

/// An axis-aligned box placed in the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    /// Centre of the box.
    pub position: Vec2,
    /// Half width and half height.
    pub half_extents: Vec2,
}

impl BoxSpec {
    /// Box of half size `(hw, hh)` centred on `(x, y)`.
    #[must_use]
    pub const fn new(hw: f32, hh: f32, x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            half_extents: Vec2::new(hw, hh),
        }
    }
}

/// A patrolling enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolSpec {
    /// Spawn position.
    pub position: Vec2,
    /// Left turning point.
    pub left_limit: f32,
    /// Right turning point.
    pub right_limit: f32,
}

/// A platform shuttling between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverSpec {
    /// Spawn point and first endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
    /// Half width and half height.
    pub half_extents: Vec2,
    /// Distance moved per tick.
    pub speed: f32,
}

/// Geometry and population of one level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Where the player appears.
    pub player_spawn: Vec2,
    /// Static platforms, including the ground.
    pub platforms: Vec<BoxSpec>,
    /// Side walls.
    pub walls: Vec<BoxSpec>,
    /// Chasing enemy spawn positions.
    pub chasers: Vec<Vec2>,
    /// Patrolling enemies.
    pub patrollers: Vec<PatrolSpec>,
    /// Moving platforms.
    pub moving_platforms: Vec<MoverSpec>,
    /// Disappearing platforms.
    pub disappearing_platforms: Vec<BoxSpec>,
    /// Collectible positions.
    pub collectibles: Vec<Vec2>,
}

impl LevelLayout {
    /// The shipped layout of a level.
    #[must_use]
    pub fn builtin(id: LevelId) -> Self {
        match id {
            LevelId::One => level_one(),
            LevelId::Two => level_two(),
            LevelId::Three => level_three(),
        }
    }
}

fn side_walls(half_height: f32) -> Vec<BoxSpec> {
    vec![
        BoxSpec::new(0.5, half_height, -15.5, 0.0),
        BoxSpec::new(0.5, half_height, 15.5, 0.0),
    ]
}

fn level_one() -> LevelLayout {
    LevelLayout {
        player_spawn: Vec2::new(4.0, -5.0),
        platforms: vec![
            BoxSpec::new(30.0, 0.5, 0.0, -11.5),
            BoxSpec::new(3.0, 0.5, -8.0, -4.0),
            BoxSpec::new(1.0, 0.5, 10.0, -7.0),
            BoxSpec::new(2.0, 0.5, 5.0, 3.0),
            BoxSpec::new(1.0, 0.5, -8.0, 7.0),
            BoxSpec::new(3.0, 0.5, 0.0, 14.0),
            BoxSpec::new(2.0, 0.5, 5.0, 20.0),
            BoxSpec::new(10.0, 0.5, -5.0, 25.0),
            BoxSpec::new(4.0, 0.5, 11.0, 25.0),
        ],
        walls: side_walls(60.0),
        chasers: vec![Vec2::new(-14.0, -11.0)],
        patrollers: Vec::new(),
        moving_platforms: Vec::new(),
        disappearing_platforms: Vec::new(),
        collectibles: vec![
            Vec2::new(5.0, 4.0),
            Vec2::new(-7.0, -3.0),
            Vec2::new(-8.0, 8.0),
            Vec2::new(0.0, 15.0),
            Vec2::new(7.0, 21.0),
        ],
    }
}

fn level_two() -> LevelLayout {
    LevelLayout {
        player_spawn: Vec2::new(4.0, -5.0),
        platforms: vec![
            BoxSpec::new(30.0, 0.5, 0.0, -11.5),
            BoxSpec::new(2.0, 0.5, -6.0, -5.0),
            BoxSpec::new(2.0, 0.5, 6.0, 2.0),
            BoxSpec::new(1.0, 0.5, -6.0, 6.0),
            BoxSpec::new(2.0, 0.5, 0.0, 25.0),
            BoxSpec::new(1.0, 0.5, -6.0, 30.0),
            BoxSpec::new(3.0, 0.5, 6.0, 35.0),
        ],
        walls: side_walls(100.0),
        chasers: vec![Vec2::new(2.0, -10.0)],
        patrollers: vec![
            PatrolSpec {
                position: Vec2::new(0.0, 26.0),
                left_limit: -2.0,
                right_limit: 2.0,
            },
            PatrolSpec {
                position: Vec2::new(6.0, 2.5),
                left_limit: 4.0,
                right_limit: 8.0,
            },
        ],
        moving_platforms: vec![
            MoverSpec {
                start: Vec2::new(-4.0, 12.0),
                end: Vec2::new(4.0, 12.0),
                half_extents: Vec2::new(2.0, 0.5),
                speed: 0.1,
            },
            MoverSpec {
                start: Vec2::new(6.0, 18.0),
                end: Vec2::new(6.0, 24.0),
                half_extents: Vec2::new(2.0, 0.5),
                speed: 0.05,
            },
        ],
        disappearing_platforms: Vec::new(),
        collectibles: vec![
            Vec2::new(-6.0, 31.0),
            Vec2::new(-6.0, -4.0),
            Vec2::new(-6.0, 7.0),
            Vec2::new(6.0, 20.0),
        ],
    }
}

fn level_three() -> LevelLayout {
    let upper_patrol = |y: f32| PatrolSpec {
        position: Vec2::new(0.0, y),
        left_limit: -4.5,
        right_limit: 4.5,
    };

    LevelLayout {
        player_spawn: Vec2::new(13.0, -10.0),
        platforms: vec![
            BoxSpec::new(30.0, 0.5, 0.0, -11.5),
            BoxSpec::new(2.0, 0.5, 0.0, -9.0),
            BoxSpec::new(5.0, 0.5, -3.0, 15.0),
            BoxSpec::new(5.0, 0.5, 0.0, 48.0),
            BoxSpec::new(5.0, 0.5, 0.0, 55.0),
            BoxSpec::new(5.0, 0.5, 0.0, 62.0),
        ],
        walls: side_walls(100.0),
        chasers: vec![Vec2::new(-1.0, -10.0)],
        patrollers: vec![
            PatrolSpec {
                position: Vec2::new(-3.0, 16.0),
                left_limit: -7.0,
                right_limit: 1.0,
            },
            upper_patrol(49.0),
            upper_patrol(56.0),
            upper_patrol(63.0),
        ],
        moving_platforms: vec![
            MoverSpec {
                start: Vec2::new(-10.0, -5.0),
                end: Vec2::new(-10.0, 7.0),
                half_extents: Vec2::new(3.0, 0.5),
                speed: 0.05,
            },
            MoverSpec {
                start: Vec2::new(11.0, 1.0),
                end: Vec2::new(9.0, 13.0),
                half_extents: Vec2::new(2.0, 0.5),
                speed: 0.1,
            },
            MoverSpec {
                start: Vec2::new(-9.0, 42.0),
                end: Vec2::new(7.0, 42.0),
                half_extents: Vec2::new(1.0, 0.5),
                speed: 0.05,
            },
        ],
        disappearing_platforms: vec![
            BoxSpec::new(1.0, 0.5, -3.0, 17.0),
            BoxSpec::new(1.0, 0.5, -10.0, 22.0),
            BoxSpec::new(1.0, 0.5, 0.0, 28.0),
            BoxSpec::new(1.0, 0.5, 10.0, 35.0),
        ],
        collectibles: vec![
            Vec2::new(0.0, -8.0),
            Vec2::new(-3.0, 18.0),
            Vec2::new(-10.0, 23.0),
            Vec2::new(-10.0, 3.0),
            Vec2::new(0.0, 29.0),
            Vec2::new(10.0, 36.0),
        ],
    }
}

/// Layouts for the three levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSet {
    /// Level 1.
    pub one: LevelLayout,
    /// Level 2.
    pub two: LevelLayout,
    /// Level 3.
    pub three: LevelLayout,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self {
            one: LevelLayout::builtin(LevelId::One),
            two: LevelLayout::builtin(LevelId::Two),
            three: LevelLayout::builtin(LevelId::Three),
        }
    }
}

impl LevelSet {
    /// Layout of the given level.
    #[must_use]
    pub const fn get(&self, id: LevelId) -> &LevelLayout {
        match id {
            LevelId::One => &self.one,
            LevelId::Two => &self.two,
            LevelId::Three => &self.three,
        }
    }
}

// =============================================================================
// Blueprint
// =============================================================================

/// A body to spawn together with its kind and behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintBody {
    /// Engine descriptor.
    pub desc: BodyDesc,
    /// Gameplay classification.
    pub kind: EntityKind,
    /// Initial behavior state, if the body is ticked.
    pub behavior: Option<EntityBehavior>,
}

/// A validated level, ready to be spawned any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBlueprint {
    id: LevelId,
    player: BodyDesc,
    bodies: Vec<BlueprintBody>,
    collectibles: Vec<Vec2>,
}

impl LevelBlueprint {
    /// Validates `layout` against `tuning`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for non-finite positions, degenerate box
    /// extents, or behavior parameters rejected by the state constructors.
    pub fn from_layout(id: LevelId, layout: &LevelLayout, tuning: &Tuning) -> ConfigResult<Self> {
        check_point("player spawn", layout.player_spawn)?;
        let player = BodyDesc::dynamic(layout.player_spawn, ACTOR_HALF_EXTENTS)
            .with_flags(BodyFlags::FIXED_ROTATION)
            .with_visual(Visual::Player);

        let mut bodies = Vec::new();

        for spec in layout.platforms.iter().chain(&layout.walls) {
            check_box("platform", spec)?;
            bodies.push(BlueprintBody {
                desc: BodyDesc::fixed(spec.position, spec.half_extents),
                kind: EntityKind::Platform,
                behavior: None,
            });
        }

        for spec in &layout.moving_platforms {
            check_point("moving platform", spec.start)?;
            check_extents("moving platform", spec.half_extents)?;
            let state =
                OscillationState::new(spec.start, spec.end, spec.speed, tuning.arrival_epsilon)?;
            bodies.push(BlueprintBody {
                desc: BodyDesc::kinematic(spec.start, spec.half_extents)
                    .with_visual(Visual::Platform),
                kind: EntityKind::MovingPlatform,
                behavior: Some(EntityBehavior::OscillatingPlatform(state)),
            });
        }

        for spec in &layout.disappearing_platforms {
            check_box("disappearing platform", spec)?;
            let state = HazardState::new(tuning.flicker_interval, tuning.flicker_duration)?;
            bodies.push(BlueprintBody {
                desc: BodyDesc::fixed(spec.position, spec.half_extents).with_visual(Visual::Platform),
                kind: EntityKind::DisappearingPlatform,
                behavior: Some(EntityBehavior::DisappearingHazard(state)),
            });
        }

        for &position in &layout.chasers {
            check_point("chaser", position)?;
            bodies.push(BlueprintBody {
                desc: BodyDesc::dynamic(position, ACTOR_HALF_EXTENTS).with_visual(Visual::Enemy),
                kind: EntityKind::Chaser,
                behavior: Some(EntityBehavior::Chaser(ChaseState::new(tuning.chaser_speed)?)),
            });
        }

        for spec in &layout.patrollers {
            check_point("patroller", spec.position)?;
            let state = PatrolState::new(spec.left_limit, spec.right_limit, tuning.patrol_speed)?;
            bodies.push(BlueprintBody {
                desc: BodyDesc::dynamic(spec.position, ACTOR_HALF_EXTENTS)
                    .with_visual(Visual::Enemy),
                kind: EntityKind::Patroller,
                behavior: Some(EntityBehavior::Patroller(state)),
            });
        }

        for &position in &layout.collectibles {
            check_point("collectible", position)?;
        }

        Ok(Self {
            id,
            player,
            bodies,
            collectibles: layout.collectibles.clone(),
        })
    }

    /// Which level this blueprint builds.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Player body descriptor.
    #[must_use]
    pub const fn player(&self) -> &BodyDesc {
        &self.player
    }

    /// Every non-player, non-collectible body.
    #[must_use]
    pub fn bodies(&self) -> &[BlueprintBody] {
        &self.bodies
    }

    /// Collectible positions.
    #[must_use]
    pub fn collectibles(&self) -> &[Vec2] {
        &self.collectibles
    }
}

fn check_point(field: &'static str, point: Vec2) -> ConfigResult<()> {
    if point.is_finite() {
        Ok(())
    } else {
        let value = if point.x.is_finite() { point.y } else { point.x };
        Err(ConfigError::NonFinite { field, value })
    }
}

fn check_extents(entity: &'static str, half_extents: Vec2) -> ConfigResult<()> {
    if half_extents.is_finite() && half_extents.x > 0.0 && half_extents.y > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::DegenerateShape { entity })
    }
}

fn check_box(entity: &'static str, spec: &BoxSpec) -> ConfigResult<()> {
    check_point(entity, spec.position)?;
    check_extents(entity, spec.half_extents)
}
