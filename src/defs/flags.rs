use bitflags::bitflags;

bitflags! {
    /// Behaviour flags carried by every thing at runtime.
    ///
    /// Values match `doom/info.h`; the automap only reads the handful that
    /// decide how a thing is coloured.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        // Call `P_SpecialThing` when touched (pickups).
        const SPECIAL        = 0x0000_0001;
        // Blocks movement.
        const SOLID          = 0x0000_0002;
        // Can be hit by bullets/projectiles.
        const SHOOTABLE      = 0x0000_0004;
        const AMBUSH         = 0x0000_0020;
        const NOGRAVITY      = 0x0000_0200;
        const FLOAT          = 0x0000_4000;

        // Projectiles / drops
        const MISSILE        = 0x0001_0000;
        const DROPPED        = 0x0002_0000;

        // Partial invisibility (spectres, invisible players).
        const SHADOW         = 0x0004_0000;
        const CORPSE         = 0x0010_0000;

        // Inter-mission counters
        const COUNTKILL      = 0x0040_0000;
        const COUNTITEM      = 0x0080_0000;

        const NOTDMATCH      = 0x0200_0000;
    }
}

bitflags! {
    /// Spawn options stored with each map thing (`THINGS` lump).
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SpawnOptions: u16 {
        const EASY        = 0x0001;
        const MEDIUM      = 0x0002;
        const HARD        = 0x0004;
        const AMBUSH      = 0x0008;
        const NOT_SINGLE  = 0x0010;
    }
}
