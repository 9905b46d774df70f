pub mod flags;
pub mod things;

pub use self::{
    flags::{MobjFlags, SpawnOptions},
    things::{PROJECTILE, THINGS, ThingInfo, ThingKind, kind_of},
};

use once_cell::sync::Lazy;
use std::collections::HashMap;

static BY_DOOMEDNUM: Lazy<HashMap<u16, &'static ThingInfo>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(THINGS.len());
    for info in THINGS {
        map.insert(info.doomednum, info);
    }
    map
});

pub fn by_doomednum(num: u16) -> Option<&'static ThingInfo> {
    BY_DOOMEDNUM.get(&num).copied()
}

static BY_ID: Lazy<HashMap<&'static str, &'static ThingInfo>> =
    Lazy::new(|| THINGS.iter().map(|info| (info.id, info)).collect());

pub fn by_id(id: &str) -> Option<&'static ThingInfo> {
    BY_ID.get(id).copied()
}
