//! Automap viewer: walk a level and look at it from above.
//!
//! ```bash
//! cargo run --release -- doom.wad --map 0 --set rotate=1 --hitboxes
//! ```
//!
//! WASD moves, Q/E turns, Shift runs, Space fires.  Tab closes and opens
//! the map; arrows pan, `=`/`-` zoom, `0` toggles the whole-level view,
//! F G M C R O switch follow, grid, mark, clear marks, rotate and overlay.

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crl_automap::{
    automap::{
        Action, Automap, AutomapConfig, Event, FrameBuffer, FrameRect, HitboxOverlay, Overlay,
        colors,
    },
    sim::{InputCmd, TicRunner},
    wad::{Wad, load_level, load_palette},
    world::Palette,
};

const SCREENWIDTH: usize = 320;
const SCREENHEIGHT: usize = 200;
/// Rows kept for the status bar under the map.
const ST_HEIGHT: i32 = 32;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// IWAD or PWAD holding the level
    #[arg(value_name = "FILE")]
    wad: PathBuf,

    /// Index of the map inside the WAD, in directory order
    #[arg(long, default_value_t = 0)]
    map: usize,

    /// Window scale: 1, 2, 4 or 8
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Automap option, e.g. `--set grid=1`; may be repeated
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Draw thing hitboxes over the map
    #[arg(long)]
    hitboxes: bool,
}

fn window_scale(n: u8) -> Scale {
    match n {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        _ => Scale::X8,
    }
}

fn binding(key: Key) -> Option<Action> {
    Some(match key {
        Key::Right => Action::PanRight,
        Key::Left => Action::PanLeft,
        Key::Up => Action::PanUp,
        Key::Down => Action::PanDown,
        Key::Minus | Key::NumPadMinus => Action::ZoomOut,
        Key::Equal | Key::NumPadPlus => Action::ZoomIn,
        Key::Tab => Action::Toggle,
        Key::Key0 => Action::MaxZoom,
        Key::F => Action::Follow,
        Key::G => Action::Grid,
        Key::M => Action::Mark,
        Key::C => Action::ClearMarks,
        Key::R => Action::Rotate,
        Key::O => Action::Overlay,
        _ => return None,
    })
}

/// Lower-case letter typed by `key`, for the cheat matcher.
fn typed_char(key: Key) -> Option<char> {
    let k = key as u32;
    let a = Key::A as u32;
    (a..=Key::Z as u32)
        .contains(&k)
        .then(|| char::from(b'a' + (k - a) as u8))
}

/// Key press as the map sees it.  Pans and zooms run until their `KeyUp`,
/// so presses are read without auto-repeat.
fn key_down(key: Key) -> Event {
    Event::KeyDown {
        action: binding(key),
        ch: typed_char(key),
    }
}

fn movement(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::W) {
        cmd.forward += 1;
    }
    if win.is_key_down(Key::S) {
        cmd.forward -= 1;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1;
    }
    if win.is_key_down(Key::Q) {
        cmd.turn -= 1;
    }
    if win.is_key_down(Key::E) {
        cmd.turn += 1;
    }
    cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
    cmd.fire = win.is_key_down(Key::Space);
    cmd
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();

    let mut cfg = AutomapConfig::default();
    for assignment in &opts.set {
        cfg.apply(assignment)?;
    }

    let wad = Wad::from_file(&opts.wad)
        .with_context(|| format!("opening {}", opts.wad.display()))?;
    let markers = wad.level_indices();
    let marker = *markers
        .get(opts.map)
        .with_context(|| format!("map {} out of range ({} maps)", opts.map, markers.len()))?;
    let mut level = load_level(&wad, marker)?;
    let palette = load_palette(&wad).unwrap_or_else(|e| {
        warn!(error = %e, "no usable PLAYPAL, falling back to grey");
        Palette::default()
    });
    info!(level = %level.name, lines = level.linedefs.len(), "level loaded");

    let mut sim = TicRunner::new(&level);
    sim.spawn_level_things(&level);
    if sim.console_entity().is_none() {
        warn!("no player 1 start; the map will centre on the level");
    }

    let frame = FrameRect::new(0, 0, SCREENWIDTH as i32, SCREENHEIGHT as i32 - ST_HEIGHT);
    let mut am = Automap::new(cfg, frame);
    am.start(&sim.automap_world(&level));

    let mut fb = FrameBuffer::new(SCREENWIDTH, SCREENHEIGHT);
    let mut rgb = vec![0u32; SCREENWIDTH * SCREENHEIGHT];

    let mut win = Window::new(
        &level.name,
        SCREENWIDTH,
        SCREENHEIGHT,
        WindowOptions {
            scale: window_scale(opts.scale),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(35);

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* ---------------- keys -> automap events ---------------------- */
        for key in win.get_keys_pressed(KeyRepeat::No) {
            am.responder(&key_down(key), &sim.automap_world(&level));
        }
        for key in win.get_keys_released() {
            if let Some(action) = binding(key) {
                am.responder(&Event::KeyUp(action), &sim.automap_world(&level));
            }
        }

        /* ---------------- game tics ----------------------------------- */
        sim.set_input(movement(&win));
        sim.pump(&mut level, |s, l| am.ticker(&s.automap_world(l)));

        while let Some(msg) = am.take_message() {
            info!(%msg, "automap");
            win.set_title(&format!("{} - {msg}", level.name));
        }

        /* ---------------- frame --------------------------------------- */
        let full = FrameRect::new(0, 0, SCREENWIDTH as i32, SCREENHEIGHT as i32);
        fb.fill(full, colors::BLACK);
        let world = sim.automap_world(&level);
        let mut hitboxes = opts
            .hitboxes
            .then(|| HitboxOverlay::new(sim.grid(), colors::GREENS));
        am.drawer(
            &mut fb,
            &world,
            sim.frac(),
            hitboxes.as_mut().map(|h| h as &mut dyn Overlay),
        );

        palette.expand(&fb.pixels, &mut rgb);
        win.update_with_buffer(&rgb, SCREENWIDTH, SCREENHEIGHT)?;
    }
    Ok(())
}
