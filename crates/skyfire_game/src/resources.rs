// crates/skyfire_game/src/resources.rs
//! Handle caches and the asset set every factory draws from.

use std::collections::HashMap;
use std::path::PathBuf;

use skyfire_shared::mesh::{self, BufferUsage, Mesh};
use skyfire_shared::services::YELLOW;
use skyfire_shared::{
    AssetError, Device, DrawableId, FontInfo, SoundBufferId, TextureFilter, TextureId,
};
use tracing::debug;

/// Glyph rasterization height for every font the game loads.
pub const FONT_PIXEL_HEIGHT: f32 = 22.0;

/// Maps a key (usually a relative asset path) to a device handle. The first
/// successful load wins; later lookups return the same handle.
#[derive(Debug)]
pub struct ResourceCache<H> {
    entries: HashMap<String, H>,
}

impl<H> Default for ResourceCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H: Copy> ResourceCache<H> {
    pub fn get_or_load<E>(
        &mut self,
        key: &str,
        load: impl FnOnce() -> Result<H, E>,
    ) -> Result<H, E> {
        if let Some(handle) = self.entries.get(key) {
            return Ok(*handle);
        }
        let handle = load()?;
        self.entries.insert(key.to_owned(), handle);
        Ok(handle)
    }

    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> H) -> H {
        if let Some(handle) = self.entries.get(key) {
            return *handle;
        }
        let handle = make();
        self.entries.insert(key.to_owned(), handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All loaded handles, keyed by asset name.
#[derive(Debug, Default)]
pub struct Resources {
    root: PathBuf,
    pub textures: ResourceCache<TextureId>,
    pub sounds: ResourceCache<SoundBufferId>,
    pub meshes: ResourceCache<DrawableId>,
}

impl Resources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Textures live at the asset root.
    pub fn texture<D: Device>(
        &mut self,
        device: &mut D,
        name: &str,
        filter: TextureFilter,
    ) -> Result<TextureId, AssetError> {
        let path = self.root.join(name);
        self.textures.get_or_load(name, || {
            debug!("Loading texture {}", path.display());
            device.load_texture(&path, filter)
        })
    }

    /// Sounds live under `audio/`.
    pub fn sound<D: Device>(&mut self, device: &mut D, name: &str) -> Result<SoundBufferId, AssetError> {
        let path = self.root.join("audio").join(name);
        self.sounds.get_or_load(name, || {
            debug!("Loading audio {}", path.display());
            device.decode(&path)
        })
    }

    pub fn mesh<D: Device>(&mut self, device: &mut D, key: &str, build: impl FnOnce() -> Mesh) -> DrawableId {
        self.meshes
            .get_or_insert_with(key, || device.upload(&build(), BufferUsage::Static))
    }

    /// Fonts live under `fonts/` and are loaded once at startup, uncached.
    pub fn font<D: Device>(&self, device: &mut D, name: &str) -> Result<FontInfo, AssetError> {
        let path = self.root.join("fonts").join(name);
        debug!("Loading font {}", path.display());
        device.load_font(&path, FONT_PIXEL_HEIGHT)
    }
}

/// Handles resolved once at startup so that spawning at runtime cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct SpriteAssets {
    pub quad: DrawableId,
    pub ship_sheet: DrawableId,
    pub explosion_sheet: DrawableId,
    pub outline: DrawableId,

    pub background: TextureId,
    pub player: TextureId,
    pub enemy: TextureId,
    pub projectile: TextureId,
    pub explosion: TextureId,

    pub laser_sound: SoundBufferId,
    pub explosion_sound: SoundBufferId,
}

pub const SHIP_FRAMES: u32 = 4;
pub const EXPLOSION_FRAMES: u32 = 6;

impl SpriteAssets {
    pub fn load<D: Device>(device: &mut D, resources: &mut Resources) -> Result<Self, AssetError> {
        Ok(Self {
            quad: resources.mesh(device, "quad", mesh::textured_quad),
            ship_sheet: resources.mesh(device, "sheet-4", || mesh::sprite_sheet(SHIP_FRAMES)),
            explosion_sheet: resources.mesh(device, "sheet-6", || mesh::sprite_sheet(EXPLOSION_FRAMES)),
            outline: resources.mesh(device, "outline", || mesh::outline_quad(YELLOW)),

            background: resources.texture(device, "background01.png", TextureFilter::Nearest)?,
            player: resources.texture(device, "Lightning.png", TextureFilter::Nearest)?,
            enemy: resources.texture(device, "Saboteur.png", TextureFilter::Nearest)?,
            projectile: resources.texture(device, "Projectile01.png", TextureFilter::Linear)?,
            explosion: resources.texture(device, "Explosion.png", TextureFilter::Linear)?,

            laser_sound: resources.sound(device, "laser-14729.wav")?,
            explosion_sound: resources.sound(device, "explosionCrunch_000.wav")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_first_handle_for_a_key() {
        let mut cache = ResourceCache::<u32>::default();
        let mut loads = 0;
        let a = cache.get_or_load("a.png", || -> Result<u32, ()> {
            loads += 1;
            Ok(10)
        });
        let b = cache.get_or_load("a.png", || -> Result<u32, ()> {
            loads += 1;
            Ok(11)
        });
        assert_eq!(a, Ok(10));
        assert_eq!(b, Ok(10));
        assert_eq!(loads, 1);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = ResourceCache::<u32>::default();
        assert_eq!(cache.get_or_load("x", || Err::<u32, _>("missing")), Err("missing"));
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_load("x", || Ok::<_, &str>(3)), Ok(3));
        assert_eq!(cache.len(), 1);
    }
}
