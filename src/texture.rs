//! Texture handles and the registry that owns the underlying GPU resources.

use std::fmt;

use ahash::{HashMap, HashMapExt};

/// Identifier of a source texture owned by the surrounding pipeline.
///
/// Descriptors hold ids, never textures: the id is a lookup capability
/// without ownership. Whoever owns the registry keeps the texture alive for
/// the lifetime of the draw or compile request that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct RegisteredTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

/// Owning storage for source textures, keyed by [`TextureId`].
///
/// The registry is the single owner of the GPU resources blur passes read;
/// dropping an entry invalidates every descriptor still holding its id,
/// which is why descriptors live only as long as the request that created
/// them.
#[derive(Default)]
pub struct TextureRegistry {
    textures: HashMap<u64, RegisteredTexture>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Takes ownership of `texture` and makes it addressable by `id`.
    /// Replaces any previous texture registered under the same id.
    pub fn register(&mut self, id: TextureId, texture: wgpu::Texture) {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let size = (texture.width(), texture.height());
        self.textures.insert(
            id.0,
            RegisteredTexture {
                _texture: texture,
                view,
                size,
            },
        );
    }

    pub fn view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.textures.get(&id.0).map(|entry| &entry.view)
    }

    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id.0).map(|entry| entry.size)
    }

    /// Size of one texel in UV space, `(1/width, 1/height)`.
    pub fn texel_size(&self, id: TextureId) -> Option<[f32; 2]> {
        self.size(id)
            .map(|(width, height)| [1.0 / width as f32, 1.0 / height as f32])
    }

    /// Drops the texture registered under `id`. Returns whether it existed.
    pub fn remove(&mut self, id: TextureId) -> bool {
        self.textures.remove(&id.0).is_some()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
