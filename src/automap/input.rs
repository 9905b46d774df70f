//! Key events and the responder.

use glam::I64Vec2;
use tracing::debug;

use super::scene::{AutomapWorld, PlayerView};
use super::viewport::{F_PANINC, M_ZOOMIN, M_ZOOMOUT};
use super::Automap;
use crate::fixed::{FRACUNIT, Fixed};

/// Bindable automap commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    PanRight,
    PanLeft,
    PanUp,
    PanDown,
    ZoomOut,
    ZoomIn,
    Toggle,
    MaxZoom,
    Follow,
    Grid,
    Mark,
    ClearMarks,
    Rotate,
    Overlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A key went down.  `ch` is the typed character, fed to the cheat
    /// matcher whether or not the key is bound.
    KeyDown {
        action: Option<Action>,
        ch: Option<char>,
    },
    KeyUp(Action),
}

impl Event {
    pub fn down(action: Action) -> Self {
        Event::KeyDown {
            action: Some(action),
            ch: None,
        }
    }

    pub fn typed(ch: char) -> Self {
        Event::KeyDown {
            action: None,
            ch: Some(ch),
        }
    }
}

pub const AMAP_CHEAT: &[u8] = b"iddt";

/// Matches a cheat one character at a time; a wrong character starts
/// over (and may itself begin a new attempt).
#[derive(Clone, Debug)]
pub struct CheatSeq {
    seq: &'static [u8],
    read: usize,
}

impl CheatSeq {
    pub const fn new(seq: &'static [u8]) -> Self {
        Self { seq, read: 0 }
    }

    /// Feed one character; `true` when it completes the sequence.
    pub fn feed(&mut self, ch: char) -> bool {
        if self.seq.is_empty() || !ch.is_ascii() {
            self.read = 0;
            return false;
        }
        let ch = ch.to_ascii_lowercase() as u8;
        if self.seq[self.read] == ch {
            self.read += 1;
        } else {
            self.read = usize::from(self.seq[0] == ch);
        }
        if self.read == self.seq.len() {
            self.read = 0;
            return true;
        }
        false
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

impl Automap {
    /// Handle a key event; `true` means the map consumed it.
    pub fn responder(&mut self, ev: &Event, world: &AutomapWorld) -> bool {
        if !self.active {
            if let Event::KeyDown {
                action: Some(Action::Toggle),
                ..
            } = ev
            {
                self.start(world);
                return true;
            }
            return false;
        }

        match *ev {
            Event::KeyDown { action, ch } => {
                let mut handled = match action {
                    Some(a) => self.key_down(a, world),
                    None => false,
                };
                if let Some(ch) = ch {
                    if !world.deathmatch && self.cheat.feed(ch) {
                        self.cheating = (self.cheating + 1) % 3;
                        debug!(level = self.cheating, "map cheat");
                        handled = false;
                    }
                }
                handled
            }
            Event::KeyUp(action) => {
                self.key_up(action);
                false
            }
        }
    }

    fn key_down(&mut self, action: Action, world: &AutomapWorld) -> bool {
        let following = self.cfg.follow_on();
        let pan = self.viewport.ftom(F_PANINC as i64);
        match action {
            Action::PanRight | Action::PanLeft | Action::PanUp | Action::PanDown if following => {
                return false;
            }
            Action::PanRight => self.paninc.x = pan,
            Action::PanLeft => self.paninc.x = -pan,
            Action::PanUp => self.paninc.y = pan,
            Action::PanDown => self.paninc.y = -pan,
            Action::ZoomOut => {
                self.mtof_zoommul = M_ZOOMOUT;
                self.ftom_zoommul = M_ZOOMIN;
            }
            Action::ZoomIn => {
                self.mtof_zoommul = M_ZOOMIN;
                self.ftom_zoommul = M_ZOOMOUT;
            }
            Action::Toggle => {
                self.bigstate = false;
                self.stop();
            }
            Action::MaxZoom => {
                self.bigstate = !self.bigstate;
                if self.bigstate {
                    self.viewport.save_scale_and_loc();
                    self.viewport.min_out();
                } else {
                    let follow = if following {
                        world.console_player().map(PlayerView::map_pos)
                    } else {
                        None
                    };
                    self.viewport.restore_scale_and_loc(follow);
                }
                self.snap_interpolation();
            }
            Action::Follow => {
                self.cfg.follow = i32::from(!following);
                self.last_follow = None;
                self.message(format!("Follow Mode {}", on_off(!following)));
            }
            Action::Grid => {
                let on = !self.cfg.grid_on();
                self.cfg.grid = i32::from(on);
                self.message(format!("Grid {}", on_off(on)));
            }
            Action::Mark => {
                let slot = self.add_mark();
                self.message(format!("Marked Spot {slot}"));
            }
            Action::ClearMarks => {
                self.clear_marks();
                self.message("All Marks Cleared");
            }
            Action::Rotate => {
                let on = !self.cfg.rotate_on();
                self.cfg.rotate = i32::from(on);
                self.message(format!("Rotate Mode {}", on_off(on)));
            }
            Action::Overlay => {
                let on = !self.cfg.overlay_on();
                self.cfg.overlay = i32::from(on);
                self.message(format!("Overlay Mode {}", on_off(on)));
            }
        }
        true
    }

    fn key_up(&mut self, action: Action) {
        let following = self.cfg.follow_on();
        match action {
            Action::PanRight | Action::PanLeft if !following => self.paninc.x = 0,
            Action::PanUp | Action::PanDown if !following => self.paninc.y = 0,
            Action::ZoomOut | Action::ZoomIn => {
                self.mtof_zoommul = FRACUNIT;
                self.ftom_zoommul = FRACUNIT;
            }
            _ => {}
        }
    }

    /// Zoom multipliers applied each tic, `(mtof, ftom)`.
    pub fn zoom_rate(&self) -> (Fixed, Fixed) {
        (self.mtof_zoommul, self.ftom_zoommul)
    }

    pub fn pan_rate(&self) -> I64Vec2 {
        self.paninc
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::automap::AutomapConfig;

    fn opened(world: &AutomapWorld) -> Automap {
        let mut am = Automap::new(
            AutomapConfig {
                follow: 0,
                ..AutomapConfig::default()
            },
            FRAME,
        );
        am.start(world);
        am
    }

    fn feed(am: &mut Automap, world: &AutomapWorld, s: &str) -> Vec<bool> {
        s.chars().map(|c| am.responder(&Event::typed(c), world)).collect()
    }

    #[test]
    fn cheat_resets_on_mismatch_and_restarts() {
        let mut c = CheatSeq::new(AMAP_CHEAT);
        assert!(!"idx".chars().any(|ch| c.feed(ch)));
        assert!(!"iid".chars().any(|ch| c.feed(ch)));
        // "iid" left us at "id"
        assert!(!c.feed('d'));
        assert!(c.feed('T'));
    }

    #[test]
    fn toggle_opens_only_when_closed() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = Automap::new(AutomapConfig::default(), FRAME);
        assert!(!am.responder(&Event::down(Action::ZoomIn), &world));
        assert!(am.responder(&Event::down(Action::Toggle), &world));
        assert!(am.is_active());
        assert!(am.responder(&Event::down(Action::Toggle), &world));
        assert!(!am.is_active());
    }

    #[test]
    fn pans_are_refused_while_following() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = Automap::new(AutomapConfig::default(), FRAME);
        am.start(&world);
        assert!(!am.responder(&Event::down(Action::PanLeft), &world));
        assert_eq!(am.pan_rate(), I64Vec2::ZERO);
    }

    #[test]
    fn key_up_stops_motion_and_is_not_consumed() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = opened(&world);
        am.responder(&Event::down(Action::PanDown), &world);
        am.responder(&Event::down(Action::ZoomOut), &world);
        assert!(am.pan_rate().y < 0);
        assert_eq!(am.zoom_rate(), (M_ZOOMOUT, M_ZOOMIN));
        assert!(!am.responder(&Event::KeyUp(Action::PanUp), &world));
        assert!(!am.responder(&Event::KeyUp(Action::ZoomOut), &world));
        assert_eq!(am.pan_rate(), I64Vec2::ZERO);
        assert_eq!(am.zoom_rate(), (FRACUNIT, FRACUNIT));
    }

    #[test]
    fn toggles_report_their_state() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = opened(&world);
        for a in [Action::Follow, Action::Grid, Action::Rotate, Action::Overlay, Action::Grid] {
            assert!(am.responder(&Event::down(a), &world));
        }
        let msgs: Vec<_> = std::iter::from_fn(|| am.take_message()).collect();
        assert_eq!(
            msgs,
            ["Follow Mode ON", "Grid ON", "Rotate Mode ON", "Overlay Mode ON", "Grid OFF"]
        );
        assert!(am.cfg.follow_on() && am.cfg.rotate_on() && am.cfg.overlay_on());
        assert!(!am.cfg.grid_on());
    }

    #[test]
    fn marks_report_their_slot() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = opened(&world);
        am.responder(&Event::down(Action::Mark), &world);
        am.responder(&Event::down(Action::Mark), &world);
        am.responder(&Event::down(Action::ClearMarks), &world);
        let msgs: Vec<_> = std::iter::from_fn(|| am.take_message()).collect();
        assert_eq!(msgs, ["Marked Spot 0", "Marked Spot 1", "All Marks Cleared"]);
        assert!(am.marks().is_empty());
    }

    #[test]
    fn cheat_cycles_and_is_ignored_in_deathmatch() {
        let level = square_level();
        let mut world = AutomapWorld::new(&level);
        let mut am = opened(&world);
        assert!(feed(&mut am, &world, "iddt").iter().all(|h| !h));
        assert_eq!(am.cheating(), 1);
        feed(&mut am, &world, "iddt");
        assert_eq!(am.cheating(), 2);
        feed(&mut am, &world, "iddt");
        assert_eq!(am.cheating(), 0);

        world.deathmatch = true;
        feed(&mut am, &world, "iddt");
        assert_eq!(am.cheating(), 0);
    }

    #[test]
    fn max_zoom_round_trip() {
        let level = square_level();
        let world = AutomapWorld::new(&level);
        let mut am = opened(&world);
        am.responder(&Event::down(Action::ZoomIn), &world);
        for _ in 0..10 {
            am.ticker(&world);
        }
        let (scale, center) = (am.viewport().scale_mtof, am.viewport().center());

        am.responder(&Event::down(Action::MaxZoom), &world);
        assert_eq!(am.viewport().scale_mtof, am.viewport().bounds.min_scale_mtof);
        am.responder(&Event::down(Action::MaxZoom), &world);
        assert!((am.viewport().scale_mtof - scale).abs() <= scale / 100);
        assert!((am.viewport().center() - center).abs().max_element() <= 1);
    }
}
