//! Top-down line map: state machine, input, per-tic motion and drawing.
//!
//! The game owns one [`Automap`].  Each tic it calls
//! [`Automap::ticker`]; each rendered frame it calls [`Automap::drawer`]
//! with the fraction of a tic elapsed; key events go through
//! [`Automap::responder`].

pub mod clip;
pub mod colors;
pub mod config;
pub mod draw;
pub mod font;
pub mod glyphs;
pub mod input;
pub mod marks;
pub mod overlay;
pub mod raster;
pub mod scene;
pub mod ticker;
pub mod transform;
pub mod viewport;

pub use self::{
    config::{AutomapConfig, ConfigError},
    draw::{Layers, WallClass, classify},
    input::{Action, CheatSeq, Event},
    marks::{OverflowPolicy, RingBuffer},
    overlay::{HitboxOverlay, LineDrawer, Overlay},
    raster::{FrameBuffer, FrameRect},
    scene::{AutomapWorld, MAXPLAYERS, PlayerView},
    viewport::Viewport,
};

use glam::I64Vec2;
use tracing::{debug, info};

use self::colors::ColorPulse;
use self::input::AMAP_CHEAT;
use self::ticker::ViewSnapshot;
use crate::fixed::{Angle, FRACUNIT, Fixed};

pub const NUM_MARKS: usize = 10;
const MESSAGE_SLOTS: usize = 8;

pub struct Automap {
    pub cfg: AutomapConfig,
    active: bool,
    viewport: Viewport,
    /// View at the start of the current tic, for interpolation.
    prev: ViewSnapshot,
    /// Pan per tic in map units.
    paninc: I64Vec2,
    mtof_zoommul: Fixed,
    ftom_zoommul: Fixed,
    /// Max-zoom view shown; the previous view is saved.
    bigstate: bool,
    cheating: u8,
    cheat: CheatSeq,
    marks: RingBuffer<I64Vec2, NUM_MARKS>,
    messages: RingBuffer<String, MESSAGE_SLOTS>,
    monster_pulse: ColorPulse,
    spectator_pulse: ColorPulse,
    amclock: u32,
    last_level: Option<String>,
    /// Map turn last used; held while the overlay is not following.
    map_angle: Angle,
    /// Player position the window was last centred on.
    last_follow: Option<I64Vec2>,
    /// Passes the caller allows; intersected with the ones the state enables.
    layer_mask: Layers,
}

impl Automap {
    pub fn new(cfg: AutomapConfig, frame: FrameRect) -> Self {
        let viewport = Viewport::new(frame);
        Self {
            cfg,
            active: false,
            prev: ViewSnapshot::of(&viewport),
            viewport,
            paninc: I64Vec2::ZERO,
            mtof_zoommul: FRACUNIT,
            ftom_zoommul: FRACUNIT,
            bigstate: false,
            cheating: 0,
            cheat: CheatSeq::new(AMAP_CHEAT),
            marks: RingBuffer::new(OverflowPolicy::Overwrite),
            messages: RingBuffer::new(OverflowPolicy::Drop),
            monster_pulse: ColorPulse::inactive_monster(),
            spectator_pulse: ColorPulse::spectator(),
            amclock: 0,
            last_level: None,
            map_angle: Angle::ZERO,
            last_follow: None,
            layer_mask: Layers::all(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 0 = off, 1 = every line, 2 = lines and things.
    #[inline]
    pub fn cheating(&self) -> u8 {
        self.cheating
    }

    /// Restrict later frames to `mask`; `Layers::all()` lifts the limit.
    pub fn set_layer_mask(&mut self, mask: Layers) {
        self.layer_mask = mask;
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn marks(&self) -> &RingBuffer<I64Vec2, NUM_MARKS> {
        &self.marks
    }

    /// Tics since the map was last opened.
    #[inline]
    pub fn amclock(&self) -> u32 {
        self.amclock
    }

    /// Oldest HUD message not yet shown.
    pub fn take_message(&mut self) -> Option<String> {
        self.messages.pop_front()
    }

    fn message(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(%text, "automap message");
        if let Err(text) = self.messages.push(text) {
            debug!(%text, "message queue full, dropped");
        }
    }

    /// Open the map.  A level different from the last one opened is
    /// scanned again and its marks cleared.
    pub fn start(&mut self, world: &AutomapWorld) {
        if self.active {
            self.stop();
        }
        let name = &world.level.name;
        if self.last_level.as_deref() != Some(name.as_str()) {
            self.level_init(world);
        }

        self.active = true;
        self.amclock = 0;
        self.bigstate = false;
        self.paninc = I64Vec2::ZERO;
        self.mtof_zoommul = FRACUNIT;
        self.ftom_zoommul = FRACUNIT;
        self.monster_pulse.reset();
        self.spectator_pulse.reset();

        let center = world
            .console_player()
            .map(PlayerView::map_pos)
            .unwrap_or_else(|| world.level_center());
        self.viewport.activate_new_scale();
        self.viewport.center_on(center);
        self.viewport.clamp_to_bounds();
        self.last_follow = None;
        self.snap_interpolation();
        debug!(level = %name, "automap opened");
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.paninc = I64Vec2::ZERO;
        debug!("automap closed");
    }

    fn level_init(&mut self, world: &AutomapWorld) {
        let level = world.level;
        self.viewport.level_init(level.vertices.iter().map(|v| v.pos));
        self.marks.clear();
        self.last_level = Some(level.name.clone());
        info!(
            level = %level.name,
            lines = level.linedefs.len(),
            vertices = level.vertices.len(),
            "automap level init"
        );
    }

    fn add_mark(&mut self) -> usize {
        let at = self.viewport.center();
        // overwrite policy always finds a slot
        self.marks.push(at).unwrap_or_default()
    }

    fn clear_marks(&mut self) {
        self.marks.clear();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::world::{Level, LevelBuilder};

    pub const FRAME: FrameRect = FrameRect::new(0, 0, 320, 168);

    /// 1000×1000 unit room, every line seen.
    pub fn square_level() -> Level {
        let mut b = LevelBuilder::new("MAP01");
        let s = b.sector(0, 128);
        b.room((0, 0), (1000, 1000), s);
        b.all_mapped();
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::fixed::{MAPUNIT, from_int};
    use glam::IVec2;

    #[test]
    fn start_centres_on_console_player() {
        let level = square_level();
        let p = PlayerView::at(IVec2::new(from_int(500), from_int(400)), Angle::ZERO);
        let world = AutomapWorld::new(&level).with_player(0, p);
        let mut am = Automap::new(AutomapConfig::default(), FRAME);
        am.start(&world);
        assert!(am.is_active());
        let c = am.viewport().center();
        assert!((c - I64Vec2::new(500 * MAPUNIT, 400 * MAPUNIT)).abs().max_element() <= 1);
    }

    #[test]
    fn without_players_starts_on_level_centre() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = Automap::new(AutomapConfig::default(), FRAME);
        am.start(&world);
        let c = am.viewport().center();
        assert!((c - I64Vec2::splat(500 * MAPUNIT)).abs().max_element() <= 1);
    }

    #[test]
    fn marks_survive_reopening_the_same_level_only() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = Automap::new(AutomapConfig::default(), FRAME);
        am.start(&world);
        am.add_mark();
        am.stop();
        am.start(&world);
        assert_eq!(am.marks().len(), 1);

        let mut other = square_level();
        other.name = "MAP02".into();
        am.start(&AutomapWorld::new(&other));
        assert!(am.marks().is_empty());
    }
}
