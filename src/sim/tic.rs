use glam::IVec2;
use hecs::{Entity, World};
use std::time::{Duration, Instant};
use tracing::debug;

use super::components::{
    ActorFlags, Class, Facing, InputCmd, Player, Position, Target, Velocity,
};
use super::spacial::ThingGrid;
use super::systems;
use crate::automap::{AutomapWorld, MAXPLAYERS, PlayerView};
use crate::defs::{SpawnOptions, ThingKind, by_doomednum};
use crate::fixed::{Angle, FRACUNIT, Fixed};
use crate::world::Level;

pub const SIM_FPS: u32 = 35;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);
/// Never run more than this many tics to catch up after a stall.
const MAX_CATCHUP: u32 = 8;

/// Owns the ECS world and drives all game-logic systems.
pub struct TicRunner {
    world: World,
    grid: ThingGrid,
    last: Instant,
    players: [Option<Entity>; MAXPLAYERS],
    console: usize,
    cmd: InputCmd,
    gametic: u32,
}

impl TicRunner {
    pub fn new(level: &Level) -> Self {
        Self {
            world: World::new(),
            grid: ThingGrid::new(level.blockmap_origin),
            last: Instant::now(),
            players: [None; MAXPLAYERS],
            console: 0,
            cmd: InputCmd::default(),
            gametic: 0,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn grid(&self) -> &ThingGrid {
        &self.grid
    }

    #[inline]
    pub fn gametic(&self) -> u32 {
        self.gametic
    }

    pub fn console_entity(&self) -> Option<Entity> {
        self.players[self.console]
    }

    /// Spawn the map's things for a single-player game on the middle
    /// skill.  Returns how many entities were created.
    pub fn spawn_level_things(&mut self, level: &Level) -> usize {
        let mut spawned = 0;
        for thing in &level.things {
            if thing.options.contains(SpawnOptions::NOT_SINGLE)
                || !thing.options.contains(SpawnOptions::MEDIUM)
            {
                continue;
            }
            let Some(info) = by_doomednum(thing.type_id) else {
                debug!(type_id = thing.type_id, "unknown thing skipped");
                continue;
            };
            if info.kind() == ThingKind::Player {
                self.spawn_player(usize::from(thing.type_id - 1), thing.pos, thing.angle);
            } else {
                let mut e = hecs::EntityBuilder::new();
                e.add(Position::at(thing.pos))
                    .add(Facing::at(thing.angle))
                    .add(Velocity::default())
                    .add(Class(info))
                    .add(ActorFlags(info.flags));
                if info.kind() == ThingKind::Monster {
                    e.add(Target::default());
                }
                self.world.spawn(e.build());
            }
            spawned += 1;
        }
        self.refresh();
        debug!(spawned, "level things spawned");
        spawned
    }

    /// Put player `index` in the game, replacing any earlier body.
    pub fn spawn_player(&mut self, index: usize, pos: IVec2, angle: Angle) -> Option<Entity> {
        let slot = self.players.get_mut(index)?;
        if let Some(old) = slot.take() {
            let _ = self.world.despawn(old);
        }
        let info = by_doomednum(index as u16 + 1)?;
        let e = self.world.spawn((
            Position::at(pos),
            Facing::at(angle),
            Velocity::default(),
            Class(info),
            Player {
                index,
                invisible: false,
                allmap: false,
            },
        ));
        self.players[index] = Some(e);
        Some(e)
    }

    /// Command applied to the console player from the next tic on.
    pub fn set_input(&mut self, cmd: InputCmd) {
        self.cmd = cmd;
    }

    /// Advance enough tics to synchronise simulation with real time;
    /// `after_tic` runs after each one.  Returns the number of tics run.
    pub fn pump<F>(&mut self, level: &mut Level, mut after_tic: F) -> u32
    where
        F: FnMut(&TicRunner, &Level),
    {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            if ran == MAX_CATCHUP {
                self.last = Instant::now();
                break;
            }
            self.tick(level);
            after_tic(self, level);
            self.last += TIC;
            ran += 1;
        }
        ran
    }

    /// Fraction of the next tic already elapsed, 16.16.
    pub fn frac(&self) -> Fixed {
        let e = self.last.elapsed().as_micros().min(TIC.as_micros()) as i64;
        ((e << 16) / TIC.as_micros() as i64).clamp(0, FRACUNIT as i64) as Fixed
    }

    /* ---------------------------------------------------------------- */
    /* run one fixed-rate game tic                                       */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, level: &mut Level) {
        systems::save_previous(&mut self.world);
        if let Some(p) = self.console_entity() {
            systems::player_input(&mut self.world, p, self.cmd);
        }
        systems::wake_monsters(&mut self.world);
        systems::movement(&mut self.world, level);
        systems::lifetimes(&mut self.world);
        systems::reveal(&self.world, level);
        self.refresh();
        self.gametic += 1;
    }

    fn refresh(&mut self) {
        systems::refresh_grid(&self.world, &mut self.grid);
    }

    /// What the automap needs to see this tic.
    pub fn automap_world<'a>(&'a self, level: &'a Level) -> AutomapWorld<'a> {
        let mut view = AutomapWorld::new(level);
        view.console = self.console;
        view.things = Some(&self.grid);
        for (slot, ent) in view.players.iter_mut().zip(self.players) {
            let Some(ent) = ent else { continue };
            let Ok(mut q) = self.world.query_one::<(&Position, &Facing, &Player)>(ent) else {
                continue;
            };
            if let Some((pos, facing, player)) = q.get() {
                *slot = Some(PlayerView {
                    pos: pos.cur,
                    prev_pos: pos.prev,
                    angle: facing.cur,
                    prev_angle: facing.prev,
                    invisible: player.invisible,
                    allmap: player.allmap,
                });
            }
        }
        view.netgame = view.players.iter().flatten().count() > 1;
        view
    }
}
