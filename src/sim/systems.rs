use glam::IVec2;
use hecs::{Entity, World};
use tracing::{debug, info};

use super::components::{
    ActorFlags, Class, Facing, InputCmd, Lifetime, Player, Position, Target, Velocity,
};
use super::spacial::{ThingGrid, ThingSpatial};
use crate::defs::{MobjFlags, PROJECTILE, ThingKind, kind_of};
use crate::fixed::{Angle, Fixed, fixed_mul, from_int};
use crate::world::Level;

pub const MOVE_SPEED: Fixed = from_int(8); // units / tic
pub const RUN_SPEED: Fixed = from_int(16);
pub const TURN_SPEED: u32 = 640 << 16; // BAM / tic
pub const RUN_TURN_SPEED: u32 = 1280 << 16;
pub const MISSILE_SPEED: Fixed = from_int(20);
pub const MISSILE_LIFETIME: u32 = 70;
/// Monsters notice a player this close.
pub const WAKE_RADIUS: Fixed = from_int(512);
pub const CHASE_SPEED: Fixed = from_int(4);
/// Lines this close to a player count as seen.
pub const REVEAL_RADIUS: Fixed = from_int(768);

/* ── Bookkeeping ──────────────────────────────────────────────────── */

/// Start-of-tic snapshot for interpolation.
pub fn save_previous(world: &mut World) {
    for (_, (pos, facing)) in world.query_mut::<(&mut Position, Option<&mut Facing>)>() {
        pos.prev = pos.cur;
        if let Some(f) = facing {
            f.prev = f.cur;
        }
    }
}

/// Unit vector (16.16) for `a`.
#[inline]
fn heading(a: Angle) -> IVec2 {
    IVec2::new(a.cos(), a.sin())
}

#[inline]
fn scaled(dir: IVec2, len: Fixed) -> IVec2 {
    IVec2::new(fixed_mul(dir.x, len), fixed_mul(dir.y, len))
}

/// Direction from `from` to `to`.
pub fn angle_to(from: IVec2, to: IVec2) -> Angle {
    let dx = to.x as f64 - from.x as f64;
    let dy = to.y as f64 - from.y as f64;
    let turns = dy.atan2(dx) / std::f64::consts::TAU;
    Angle((turns * 4_294_967_296.0) as i64 as u32)
}

/* ── Player ───────────────────────────────────────────────────────── */

pub fn player_input(world: &mut World, player: Entity, cmd: InputCmd) {
    let mut shot = None;
    if let Ok(mut q) = world.query_one::<(&Position, &mut Facing, &mut Velocity)>(player) {
        if let Some((pos, facing, vel)) = q.get() {
            /* 1. turn, right is clockwise */
            if cmd.turn != 0 {
                let rate = if cmd.run { RUN_TURN_SPEED } else { TURN_SPEED };
                let step = Angle(rate);
                facing.cur = if cmd.turn > 0 {
                    facing.cur - step
                } else {
                    facing.cur + step
                };
            }

            /* 2. walk */
            let speed = if cmd.run { RUN_SPEED } else { MOVE_SPEED };
            let fwd = heading(facing.cur);
            let right = IVec2::new(fwd.y, -fwd.x);
            vel.0 = scaled(fwd, speed * cmd.forward.signum())
                + scaled(right, speed * cmd.strafe.signum());

            if cmd.fire {
                shot = Some((pos.cur, facing.cur));
            }
        }
    }

    if let Some((at, angle)) = shot {
        world.spawn((
            Position::at(at),
            Facing::at(angle),
            Velocity(scaled(heading(angle), MISSILE_SPEED)),
            Class(&PROJECTILE),
            ActorFlags(PROJECTILE.flags),
            Lifetime(MISSILE_LIFETIME),
        ));
        debug!(?at, "player fired");
    }
}

/* ── Monsters ─────────────────────────────────────────────────────── */

/// Idle monsters pick up a nearby player; awake ones head for theirs.
pub fn wake_monsters(world: &mut World) {
    let players: Vec<(Entity, IVec2)> = world
        .query::<(&Position, &Player)>()
        .iter()
        .map(|(e, (pos, _))| (e, pos.cur))
        .collect();

    for (_, (pos, facing, vel, flags, target)) in world.query_mut::<(
        &Position,
        &mut Facing,
        &mut Velocity,
        &ActorFlags,
        &mut Target,
    )>() {
        if !flags.0.contains(MobjFlags::COUNTKILL) || flags.0.contains(MobjFlags::CORPSE) {
            continue;
        }
        if target.0.is_none() {
            target.0 = players
                .iter()
                .find(|(_, p)| {
                    let d = (p.as_i64vec2() - pos.cur.as_i64vec2()).abs();
                    d.max_element() <= WAKE_RADIUS as i64
                })
                .map(|&(e, _)| e);
        }
        let goal = target
            .0
            .and_then(|t| players.iter().find(|(e, _)| *e == t))
            .map(|&(_, p)| p);
        match goal {
            Some(p) if p != pos.cur => {
                facing.cur = angle_to(pos.cur, p);
                vel.0 = scaled(heading(facing.cur), CHASE_SPEED);
            }
            _ => vel.0 = IVec2::ZERO,
        }
    }
}

/* ── Motion ───────────────────────────────────────────────────────── */

/// Apply velocities.  Moves that would leave the map are refused;
/// missiles that try are removed.
pub fn movement(world: &mut World, level: &Level) {
    let mut gone = Vec::new();
    for (e, (pos, vel, flags)) in
        world.query_mut::<(&mut Position, &Velocity, Option<&ActorFlags>)>()
    {
        if vel.0 == IVec2::ZERO {
            continue;
        }
        let next = pos.cur.saturating_add(vel.0);
        if level.sector_at(next).is_some() {
            pos.cur = next;
        } else if flags.is_some_and(|f| f.0.contains(MobjFlags::MISSILE)) {
            gone.push(e);
        }
    }
    for e in gone {
        let _ = world.despawn(e);
    }
}

/// Count down and remove expired entities.
pub fn lifetimes(world: &mut World) {
    let mut expired = Vec::new();
    for (e, life) in world.query_mut::<&mut Lifetime>() {
        life.0 = life.0.saturating_sub(1);
        if life.0 == 0 {
            expired.push(e);
        }
    }
    for e in expired {
        let _ = world.despawn(e);
    }
}

/* ── Map bookkeeping ──────────────────────────────────────────────── */

/// Players see the lines around them and find secrets they stand in.
pub fn reveal(world: &World, level: &mut Level) {
    for (_, (pos, player)) in world.query::<(&Position, &Player)>().iter() {
        level.reveal_around(pos.cur, REVEAL_RADIUS);
        if let Some(sector) = level.sector_at(pos.cur) {
            if level.discover_secret(sector) {
                info!(player = player.index, sector, "secret found");
            }
        }
    }
}

/// Copy every positioned entity into the spatial grid.
pub fn refresh_grid(world: &World, grid: &mut ThingGrid) {
    let mut query =
        world.query::<(&Position, Option<&Facing>, &Class, Option<&ActorFlags>, Option<&Target>, Option<&Player>)>();
    let stubs = query.iter().map(|(ent, (pos, facing, class, flags, target, player))| {
        let flags = flags.map_or(class.0.flags, |f| f.0);
        let kind = kind_of(player.is_some(), flags);
        let (angle, prev_angle) = facing.map_or((Angle::ZERO, Angle::ZERO), |f| (f.cur, f.prev));
        ThingSpatial {
            ent,
            pos: pos.cur,
            prev_pos: pos.prev,
            angle,
            prev_angle,
            radius: class.0.radius_fixed(),
            kind,
            active: kind == ThingKind::Monster && target.is_some_and(|t| t.0.is_some()),
        }
    });
    grid.rebuild(stubs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::by_id;
    use crate::fixed::{ANG90, ANG180};
    use crate::world::LevelBuilder;

    fn arena() -> Level {
        let mut b = LevelBuilder::new("ARENA");
        let s = b.sector(0, 128);
        b.room((0, 0), (2048, 2048), s);
        b.build()
    }

    fn pt(x: i32, y: i32) -> IVec2 {
        IVec2::new(from_int(x), from_int(y))
    }

    fn spawn_player(world: &mut World, at: IVec2, angle: Angle) -> Entity {
        world.spawn((
            Position::at(at),
            Facing::at(angle),
            Velocity::default(),
            Class(by_id("PLAYER").unwrap()),
            Player {
                index: 0,
                invisible: false,
                allmap: false,
            },
        ))
    }

    fn spawn_monster(world: &mut World, at: IVec2) -> Entity {
        let info = by_id("TROOP").unwrap();
        world.spawn((
            Position::at(at),
            Facing::at(Angle::ZERO),
            Velocity::default(),
            Class(info),
            ActorFlags(info.flags),
            Target::default(),
        ))
    }

    #[test]
    fn angles_toward_points() {
        assert_eq!(angle_to(pt(0, 0), pt(10, 0)), Angle::ZERO);
        assert_eq!(angle_to(pt(0, 0), pt(0, 10)), ANG90);
        assert_eq!(angle_to(pt(0, 0), pt(-10, 0)), ANG180);
    }

    #[test]
    fn walking_and_turning() {
        let level = arena();
        let mut world = World::new();
        let p = spawn_player(&mut world, pt(100, 100), Angle::ZERO);

        player_input(&mut world, p, InputCmd { forward: 1, ..Default::default() });
        save_previous(&mut world);
        movement(&mut world, &level);
        let pos = *world.get::<&Position>(p).unwrap();
        assert_eq!(pos.cur, pt(108, 100));
        assert_eq!(pos.prev, pt(100, 100));

        player_input(&mut world, p, InputCmd { turn: 1, ..Default::default() });
        assert_eq!(world.get::<&Facing>(p).unwrap().cur, Angle(0u32.wrapping_sub(TURN_SPEED)));
        assert_eq!(world.get::<&Velocity>(p).unwrap().0, IVec2::ZERO);
    }

    #[test]
    fn cannot_walk_out_of_the_map() {
        let level = arena();
        let mut world = World::new();
        let p = spawn_player(&mut world, pt(4, 100), ANG180);
        player_input(&mut world, p, InputCmd { forward: 1, ..Default::default() });
        movement(&mut world, &level);
        assert_eq!(world.get::<&Position>(p).unwrap().cur, pt(4, 100));
    }

    #[test]
    fn missiles_fly_and_expire() {
        let level = arena();
        let mut world = World::new();
        let p = spawn_player(&mut world, pt(1000, 1000), Angle::ZERO);
        player_input(&mut world, p, InputCmd { fire: true, ..Default::default() });
        let shots: Vec<Entity> = world.query::<&Lifetime>().iter().map(|(e, _)| e).collect();
        assert_eq!(shots.len(), 1);

        movement(&mut world, &level);
        assert_eq!(world.get::<&Position>(shots[0]).unwrap().cur, pt(1020, 1000));
        for _ in 0..MISSILE_LIFETIME {
            lifetimes(&mut world);
        }
        assert!(!world.contains(shots[0]));
    }

    #[test]
    fn monsters_wake_and_chase() {
        let level = arena();
        let mut world = World::new();
        let p = spawn_player(&mut world, pt(1000, 1000), Angle::ZERO);
        let near = spawn_monster(&mut world, pt(1300, 1000));
        let far = spawn_monster(&mut world, pt(1000, 1800));

        wake_monsters(&mut world);
        assert_eq!(world.get::<&Target>(near).unwrap().0, Some(p));
        assert_eq!(world.get::<&Target>(far).unwrap().0, None);
        assert_eq!(world.get::<&Facing>(near).unwrap().cur, ANG180);

        movement(&mut world, &level);
        assert_eq!(world.get::<&Position>(near).unwrap().cur, pt(1296, 1000));

        let mut grid = ThingGrid::new(level.blockmap_origin);
        refresh_grid(&world, &mut grid);
        assert_eq!(grid.len(), 3);
        let everything = crate::world::Aabb { min: pt(0, 0), max: pt(2048, 2048) };
        let mut active = 0;
        grid.for_each_in_bbox(everything, |t| {
            active += usize::from(t.active);
            assert_eq!(t.kind == ThingKind::Player, t.ent == p);
            true
        });
        assert_eq!(active, 1);
    }

    #[test]
    fn players_reveal_nearby_lines() {
        let mut level = arena();
        let mut world = World::new();
        spawn_player(&mut world, pt(100, 100), Angle::ZERO);
        reveal(&world, &mut level);
        // the two walls meeting at the origin corner
        assert_eq!(level.linedefs.iter().filter(|l| l.is_mapped()).count(), 2);
    }
}
