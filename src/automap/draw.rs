//! Frame composition: background, grid, walls, overlay, players, things,
//! crosshair, marks and the level name, back to front.

use bitflags::bitflags;
use glam::{I64Vec2, IVec2};

use super::clip::{MapLine, clip_frame, clip_mline};
use super::colors::*;
use super::font::{CELL_H, digit_lines, put_string};
use super::glyphs::{CHEAT_PLAYER_ARROW, PLAYER_ARROW, THINTRIANGLE_GUY, TRIANGLE_GUY, place};
use super::overlay::{LineDrawer, Overlay};
use super::raster::FrameBuffer;
use super::scene::AutomapWorld;
use super::transform::{RotationFrame, RotationMode, to_frame};
use super::viewport::Viewport;
use super::Automap;
use crate::defs::ThingKind;
use crate::fixed::{Angle, FRACTOMAPBITS, FRACUNIT, Fixed, MAPUNIT, map_to_world, world_to_map};
use crate::world::{Aabb, Level, Linedef, LinedefFlags, TELEPORT_SPECIAL};

bitflags! {
    /// Passes of one frame, in drawing order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Layers: u16 {
        const BACKGROUND = 1 << 0;
        const GRID       = 1 << 1;
        const WALLS      = 1 << 2;
        const OVERLAY    = 1 << 3;
        const PLAYERS    = 1 << 4;
        const THINGS     = 1 << 5;
        const SPECTATOR  = 1 << 6;
        const CROSSHAIR  = 1 << 7;
        const MARKS      = 1 << 8;
        const TITLE      = 1 << 9;
    }
}

/// Grid spacing: one blockmap block.
const GRID_STEP: i64 = 128 * MAPUNIT;
/// Seven-segment digit footprint.
const MARK_W: i32 = 5;
const MARK_H: i32 = 6;

/// How a linedef shows up on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallClass {
    Hidden,
    SecretSector,
    FoundSecret,
    OneSided,
    Teleporter,
    SecretDoor,
    FloorStep,
    CeilingStep,
    /// Two-sided, same heights; shown only while cheating.
    Flat,
    /// Not yet seen, shown by the computer map.
    Revealed,
}

impl WallClass {
    pub fn color(self) -> Option<u8> {
        Some(match self {
            WallClass::Hidden => return None,
            WallClass::SecretSector => SECRET_SECTOR,
            WallClass::FoundSecret => FOUND_SECRET,
            WallClass::OneSided => WALLCOLORS,
            WallClass::Teleporter => TELEPORTER,
            WallClass::SecretDoor => SECRETDOOR,
            WallClass::FloorStep => FDWALLCOLORS,
            WallClass::CeilingStep => CDWALLCOLORS,
            WallClass::Flat => TSWALLCOLORS,
            WallClass::Revealed => ALLMAP,
        })
    }
}

/// First matching rule wins.
pub fn classify(level: &Level, line: &Linedef, cheating: bool, allmap: bool, secrets: bool) -> WallClass {
    let hidden_on_map = line.flags.contains(LinedefFlags::NOT_ON_MAP);
    if !cheating && !line.is_mapped() {
        return if allmap && !hidden_on_map {
            WallClass::Revealed
        } else {
            WallClass::Hidden
        };
    }
    if hidden_on_map && !cheating {
        return WallClass::Hidden;
    }

    let front = level.front_sector(line);
    let back = level.back_sector(line);
    if secrets {
        let sides = || [front, back].into_iter().flatten();
        if sides().any(|s| s.is_hidden_secret()) {
            return WallClass::SecretSector;
        }
        if sides().any(|s| s.is_found_secret()) {
            return WallClass::FoundSecret;
        }
    }
    let Some(back) = back else {
        return WallClass::OneSided;
    };
    if line.special == TELEPORT_SPECIAL {
        WallClass::Teleporter
    } else if line.flags.contains(LinedefFlags::SECRET) {
        if cheating { WallClass::SecretDoor } else { WallClass::OneSided }
    } else if front.map(|f| f.floor_h) != Some(back.floor_h) {
        WallClass::FloorStep
    } else if front.map(|f| f.ceil_h) != Some(back.ceil_h) {
        WallClass::CeilingStep
    } else if cheating {
        WallClass::Flat
    } else {
        WallClass::Hidden
    }
}

/// World box around everything the window can show; widened to the
/// half-diagonal when the map is turned.
fn visible_area(view: &Viewport, rot: &RotationFrame) -> Aabb {
    let half = if rot.active {
        I64Vec2::splat((view.size.x + view.size.y) / 2)
    } else {
        view.size / 2
    };
    let c = view.center();
    Aabb {
        min: map_to_world(c - half),
        max: map_to_world(c + half),
    }
}

/// Rasterizes map geometry for one frame.
pub struct Painter<'a> {
    fb: &'a mut FrameBuffer,
    view: &'a Viewport,
    rot: RotationFrame,
    frac: Fixed,
}

impl Painter<'_> {
    /// Line already in (turned) map space.
    fn line(&mut self, l: &MapLine, color: u8) {
        if let Some(fl) = clip_mline(l, self.view) {
            self.fb.draw_line(self.view.frame, &fl, color);
        }
    }

    fn turned_line(&mut self, l: &MapLine, color: u8) {
        let l = MapLine::new(self.rot.apply(l.a), self.rot.apply(l.b));
        self.line(&l, color);
    }

    fn glyph(&mut self, glyph: &[MapLine], scale: Option<i64>, angle: Angle, at: I64Vec2, color: u8) {
        let at = self.rot.apply(at);
        let heading = self.rot.heading(angle);
        for l in place(glyph, scale, heading, at) {
            self.line(&l, color);
        }
    }
}

impl LineDrawer for Painter<'_> {
    fn draw_screen_line(&mut self, color: u8, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) {
        let a = to_frame(world_to_map(IVec2::new(x1, y1)), self.view);
        let b = to_frame(world_to_map(IVec2::new(x2, y2)), self.view);
        if let Some(fl) = clip_frame(a, b, self.view.frame) {
            self.fb.draw_line(self.view.frame, &fl, color);
        }
    }

    fn draw_map_line(&mut self, color: u8, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) {
        let l = MapLine::new(
            world_to_map(IVec2::new(x1, y1)),
            world_to_map(IVec2::new(x2, y2)),
        );
        self.turned_line(&l, color);
    }

    fn visible_area(&self) -> Aabb {
        visible_area(self.view, &self.rot)
    }

    fn frac(&self) -> Fixed {
        self.frac
    }
}

impl Automap {
    /// Passes enabled for the next frame.
    pub fn layers(&self, world: &AutomapWorld, has_overlay: bool) -> Layers {
        let mut l = Layers::WALLS | Layers::PLAYERS | Layers::MARKS | Layers::TITLE;
        l.set(Layers::BACKGROUND, !self.cfg.overlay_on());
        l.set(Layers::GRID, self.cfg.grid_on());
        l.set(Layers::OVERLAY, has_overlay);
        l.set(Layers::THINGS, self.cheating == 2 || self.cfg.things != 0);
        l.set(
            Layers::SPECTATOR,
            self.cfg.spectator != 0 && world.spectator.is_some(),
        );
        l.set(Layers::CROSSHAIR, !self.cfg.follow_on());
        l & self.layer_mask
    }

    /// Draw one frame, `frac` of the way into the current tic.
    pub fn drawer(
        &mut self,
        fb: &mut FrameBuffer,
        world: &AutomapWorld,
        frac: Fixed,
        overlay: Option<&mut dyn Overlay>,
    ) {
        if !self.active {
            return;
        }
        let frac = if self.cfg.uncapped != 0 {
            frac.clamp(0, FRACUNIT)
        } else {
            FRACUNIT
        };
        let view = self.frame_view(frac);
        let facing = world
            .console_player()
            .map_or(Angle::ZERO, |p| p.lerped(frac).1);
        let mode = RotationMode::resolve(
            self.cfg.rotate_on(),
            self.cfg.follow_on(),
            self.cfg.overlay_on(),
        );
        let rot = RotationFrame::new(mode, view.center(), facing, &mut self.map_angle);
        let layers = self.layers(world, overlay.is_some());

        let mut p = Painter {
            fb,
            view: &view,
            rot,
            frac,
        };

        if layers.contains(Layers::BACKGROUND) {
            p.fb.fill(view.frame, BACKGROUND);
        }
        if layers.contains(Layers::GRID) {
            draw_grid(&mut p, world.level);
        }
        if layers.contains(Layers::WALLS) {
            self.draw_walls(&mut p, world);
        }
        if let Some(ov) = overlay {
            ov.draw_overlay(&mut p);
        }
        if layers.contains(Layers::PLAYERS) {
            self.draw_players(&mut p, world);
        }
        if layers.contains(Layers::THINGS) {
            self.draw_things(&mut p, world);
        }
        if layers.contains(Layers::SPECTATOR) {
            if let Some(s) = &world.spectator {
                let (pos, angle) = s.lerped(frac);
                let color = self.spectator_pulse.value();
                p.glyph(&PLAYER_ARROW, None, angle, world_to_map(pos), color);
            }
        }
        if layers.contains(Layers::CROSSHAIR) {
            let c = view.frame.center();
            for d in [IVec2::ZERO, IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y] {
                p.fb.put(view.frame, c + d, XHAIRCOLORS);
            }
        }
        if layers.contains(Layers::MARKS) {
            self.draw_marks(&mut p);
        }
        if layers.contains(Layers::TITLE) {
            let f = view.frame;
            let at = IVec2::new(f.x + 1, f.y + f.h - CELL_H);
            put_string(p.fb, f, at, &world.level.name, LEVEL_NAME);
        }
    }

    fn draw_walls(&self, p: &mut Painter, world: &AutomapWorld) {
        let level = world.level;
        let cheating = self.cheating > 0;
        let allmap = world.console_player().is_some_and(|pl| pl.allmap);
        let secrets = self.cfg.secrets != 0;
        for line in &level.linedefs {
            let Some(color) = classify(level, line, cheating, allmap, secrets).color() else {
                continue;
            };
            let (a, b) = level.line_ends(line);
            p.turned_line(&MapLine::new(world_to_map(a), world_to_map(b)), color);
        }
    }

    fn draw_players(&self, p: &mut Painter, world: &AutomapWorld) {
        let frac = p.frac;
        if !world.netgame {
            if let Some(pl) = world.console_player() {
                let (pos, angle) = pl.lerped(frac);
                let arrow: &[MapLine] = if self.cheating > 0 {
                    &CHEAT_PLAYER_ARROW
                } else {
                    &PLAYER_ARROW
                };
                p.glyph(arrow, None, angle, world_to_map(pos), SINGLE_PLAYER);
            }
            return;
        }

        for (i, slot) in world.players.iter().enumerate() {
            let Some(pl) = slot else { continue };
            if world.deathmatch && i != world.console {
                continue;
            }
            let color = if pl.invisible {
                INVISIBLE_PLAYER
            } else {
                THEIR_COLORS[i % THEIR_COLORS.len()]
            };
            let (pos, angle) = pl.lerped(frac);
            p.glyph(&PLAYER_ARROW, None, angle, world_to_map(pos), color);
        }
    }

    fn draw_things(&self, p: &mut Painter, world: &AutomapWorld) {
        let Some(grid) = world.things else { return };
        let area = p.visible_area();
        let frac = p.frac;
        grid.for_each_in_bbox(area, |t| {
            let (glyph, color): (&[MapLine], u8) = match t.kind {
                ThingKind::Player => return true,
                ThingKind::Monster if t.active => (&TRIANGLE_GUY, MONSTER_ACTIVE),
                ThingKind::Monster => (&TRIANGLE_GUY, self.monster_pulse.value()),
                ThingKind::Projectile => (&THINTRIANGLE_GUY, PROJECTILE),
                ThingKind::Pickup => (&THINTRIANGLE_GUY, PICKUP),
                ThingKind::Corpse => (&THINTRIANGLE_GUY, CORPSE),
                ThingKind::Decoration => (&THINTRIANGLE_GUY, DECORATION),
            };
            let (pos, angle) = t.lerped(frac);
            let scale = (t.radius >> FRACTOMAPBITS) as i64;
            p.glyph(glyph, Some(scale), angle, world_to_map(pos), color);
            true
        });
    }

    fn draw_marks(&self, p: &mut Painter) {
        let f = p.view.frame;
        for (slot, &at) in self.marks.iter() {
            let pt = to_frame(p.rot.apply(at), p.view);
            let (fx, fy) = (pt.x, pt.y);
            let inside = fx >= f.x as i64
                && fx <= (f.x + f.w - MARK_W) as i64
                && fy >= f.y as i64
                && fy <= (f.y + f.h - MARK_H) as i64;
            if !inside {
                continue;
            }
            let origin = IVec2::new(fx as i32, fy as i32);
            for l in digit_lines(slot, origin) {
                p.fb.draw_line(f, &l, MARKCOLORS);
            }
        }
    }
}

/// Blockmap-aligned grid.  Turned maps draw a wider patch so the corners
/// stay covered.
fn draw_grid(p: &mut Painter, level: &Level) {
    let view = p.view;
    let org = world_to_map(level.blockmap_origin);
    let (pad_x, pad_y) = if p.rot.active {
        (view.size.y / 2, view.size.x / 2)
    } else {
        (0, 0)
    };

    // vertical lines
    let mut start = view.origin.x - pad_x;
    start -= (start - org.x).rem_euclid(GRID_STEP);
    let end = view.far.x + pad_x;
    let (y0, y1) = (view.origin.y - pad_y, view.far.y + pad_y);
    let mut x = start;
    while x < end {
        p.turned_line(&MapLine::new(I64Vec2::new(x, y0), I64Vec2::new(x, y1)), GRIDCOLORS);
        x += GRID_STEP;
    }

    // horizontal lines
    let mut start = view.origin.y - pad_y;
    start -= (start - org.y).rem_euclid(GRID_STEP);
    let end = view.far.y + pad_y;
    let (x0, x1) = (view.origin.x - pad_x, view.far.x + pad_x);
    let mut y = start;
    while y < end {
        p.turned_line(&MapLine::new(I64Vec2::new(x0, y), I64Vec2::new(x1, y)), GRIDCOLORS);
        y += GRID_STEP;
    }
}
