//! Static table of the map things the automap knows how to show.
//!
//! Only the fields the map view needs survive: editor number, a short id,
//! collision radius and the behaviour flags that drive colouring.

use super::flags::MobjFlags;
use crate::fixed::{Fixed, from_int};

/// How a thing is drawn on the automap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThingKind {
    Player,
    Monster,
    Projectile,
    Pickup,
    Corpse,
    Decoration,
}

#[derive(Debug)]
pub struct ThingInfo {
    pub doomednum: u16,
    pub id: &'static str,
    /// Radius in whole map units.
    pub radius: i32,
    pub flags: MobjFlags,
}

impl ThingInfo {
    #[inline]
    pub fn radius_fixed(&self) -> Fixed {
        from_int(self.radius)
    }

    /// Classification from flags, so runtime-spawned things (missiles,
    /// dropped items, fresh corpses) follow the same rules.
    pub fn kind(&self) -> ThingKind {
        kind_of(self.id == "PLAYER", self.flags)
    }
}

pub fn kind_of(is_player: bool, flags: MobjFlags) -> ThingKind {
    if is_player {
        ThingKind::Player
    } else if flags.contains(MobjFlags::MISSILE) {
        ThingKind::Projectile
    } else if flags.contains(MobjFlags::CORPSE) {
        ThingKind::Corpse
    } else if flags.contains(MobjFlags::COUNTKILL) {
        ThingKind::Monster
    } else if flags.contains(MobjFlags::SPECIAL) {
        ThingKind::Pickup
    } else {
        ThingKind::Decoration
    }
}

const MONSTER: MobjFlags = MobjFlags::SOLID
    .union(MobjFlags::SHOOTABLE)
    .union(MobjFlags::COUNTKILL);
const FLYER: MobjFlags = MONSTER
    .union(MobjFlags::FLOAT)
    .union(MobjFlags::NOGRAVITY);
const ITEM: MobjFlags = MobjFlags::SPECIAL;
const ARTIFACT: MobjFlags = MobjFlags::SPECIAL.union(MobjFlags::COUNTITEM);
const OBSTACLE: MobjFlags = MobjFlags::SOLID;
const GORE: MobjFlags = MobjFlags::CORPSE;

macro_rules! thing {
    ($num:expr, $id:expr, $r:expr, $flags:expr) => {
        ThingInfo {
            doomednum: $num,
            id: $id,
            radius: $r,
            flags: $flags,
        }
    };
}

pub static THINGS: &[ThingInfo] = &[
    // player starts
    thing!(1, "PLAYER", 16, MobjFlags::SOLID.union(MobjFlags::SHOOTABLE)),
    thing!(2, "PLAYER", 16, MobjFlags::SOLID.union(MobjFlags::SHOOTABLE)),
    thing!(3, "PLAYER", 16, MobjFlags::SOLID.union(MobjFlags::SHOOTABLE)),
    thing!(4, "PLAYER", 16, MobjFlags::SOLID.union(MobjFlags::SHOOTABLE)),
    // monsters
    thing!(3004, "POSSESSED", 20, MONSTER),
    thing!(9, "SHOTGUY", 20, MONSTER),
    thing!(65, "CHAINGUY", 20, MONSTER),
    thing!(84, "WOLFSS", 20, MONSTER),
    thing!(3001, "TROOP", 20, MONSTER),
    thing!(3002, "SERGEANT", 30, MONSTER),
    thing!(58, "SHADOWS", 30, MONSTER.union(MobjFlags::SHADOW)),
    thing!(3006, "SKULL", 16, FLYER),
    thing!(3005, "HEAD", 31, FLYER),
    thing!(69, "KNIGHT", 24, MONSTER),
    thing!(3003, "BRUISER", 24, MONSTER),
    thing!(68, "BABY", 64, MONSTER),
    thing!(71, "PAIN", 31, FLYER),
    thing!(66, "UNDEAD", 20, MONSTER),
    thing!(67, "FATSO", 48, MONSTER),
    thing!(64, "VILE", 20, MONSTER),
    thing!(7, "SPIDER", 128, MONSTER),
    thing!(16, "CYBORG", 40, MONSTER),
    // weapons
    thing!(2001, "SHOTGUN", 20, ITEM),
    thing!(82, "SUPERSHOTGUN", 20, ITEM),
    thing!(2002, "CHAINGUN", 20, ITEM),
    thing!(2003, "MISSILE_LAUNCHER", 20, ITEM),
    thing!(2004, "PLASMA_GUN", 20, ITEM),
    thing!(2005, "CHAINSAW", 20, ITEM),
    thing!(2006, "BFG9000", 20, ITEM),
    // ammo
    thing!(2007, "CLIP", 20, ITEM),
    thing!(2048, "AMMO_BOX", 20, ITEM),
    thing!(2008, "SHELLS", 20, ITEM),
    thing!(2049, "SHELL_BOX", 20, ITEM),
    thing!(2010, "ROCKET", 20, ITEM),
    thing!(2046, "ROCKET_BOX", 20, ITEM),
    thing!(2047, "CELL", 20, ITEM),
    thing!(17, "CELL_PACK", 20, ITEM),
    thing!(8, "BACKPACK", 20, ITEM),
    // health, armour, keys
    thing!(2011, "STIMPACK", 20, ITEM),
    thing!(2012, "MEDIKIT", 20, ITEM),
    thing!(2014, "HEALTH_BONUS", 20, ARTIFACT),
    thing!(2015, "ARMOR_BONUS", 20, ARTIFACT),
    thing!(2018, "GREEN_ARMOR", 20, ITEM),
    thing!(2019, "BLUE_ARMOR", 20, ITEM),
    thing!(5, "BLUE_CARD", 20, ITEM),
    thing!(6, "YELLOW_CARD", 20, ITEM),
    thing!(13, "RED_CARD", 20, ITEM),
    thing!(40, "BLUE_SKULL", 20, ITEM),
    thing!(39, "YELLOW_SKULL", 20, ITEM),
    thing!(38, "RED_SKULL", 20, ITEM),
    // powerups
    thing!(2013, "SOULSPHERE", 20, ARTIFACT),
    thing!(83, "MEGASPHERE", 20, ARTIFACT),
    thing!(2022, "INVULNERABILITY", 20, ARTIFACT),
    thing!(2023, "BERSERK", 20, ARTIFACT),
    thing!(2024, "INVISIBILITY", 20, ARTIFACT),
    thing!(2025, "RADIATION_SUIT", 20, ITEM),
    thing!(2026, "COMPUTER_MAP", 20, ARTIFACT),
    thing!(2045, "LIGHT_AMP", 20, ARTIFACT),
    // obstacles
    thing!(2035, "BARREL", 10, OBSTACLE.union(MobjFlags::SHOOTABLE)),
    thing!(48, "TECH_COLUMN", 16, OBSTACLE),
    thing!(30, "TALL_GREEN_PILLAR", 16, OBSTACLE),
    thing!(32, "TALL_RED_PILLAR", 16, OBSTACLE),
    thing!(2028, "FLOOR_LAMP", 16, OBSTACLE),
    thing!(44, "BLUE_TORCH", 16, OBSTACLE),
    thing!(45, "GREEN_TORCH", 16, OBSTACLE),
    thing!(46, "RED_TORCH", 16, OBSTACLE),
    thing!(43, "BURNT_TREE", 16, OBSTACLE),
    thing!(54, "BIG_TREE", 32, OBSTACLE),
    // corpses and gore
    thing!(15, "DEAD_PLAYER", 20, GORE),
    thing!(18, "DEAD_POSSESSED", 20, GORE),
    thing!(19, "DEAD_SHOTGUY", 20, GORE),
    thing!(20, "DEAD_TROOP", 20, GORE),
    thing!(21, "DEAD_SERGEANT", 20, GORE),
    thing!(22, "DEAD_HEAD", 20, GORE),
    thing!(10, "GIBBED_PLAYER", 20, GORE),
    thing!(12, "GIBBED_PLAYER2", 20, GORE),
    thing!(24, "POOL_OF_BLOOD", 20, GORE),
];

/// Runtime-only class for projectiles the engine spawns (never placed in
/// a map, so it has no editor number).
pub static PROJECTILE: ThingInfo = thing!(
    0,
    "PROJECTILE",
    6,
    MobjFlags::MISSILE
        .union(MobjFlags::NOGRAVITY)
        .union(MobjFlags::DROPPED)
);
