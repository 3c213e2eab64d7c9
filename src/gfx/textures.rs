//! Texture name registry
//!
//! Materials refer to textures by mnemonic while the scene is authored, and
//! by integer index in the shaders. Registration fixes the index once;
//! looking a name up afterwards is the only fallible step. Image decoding
//! and upload happen elsewhere; the registry only records where each image
//! lives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::TextureError;

/// Index of a texture in the shader-side texture array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    by_name: HashMap<String, TextureHandle>,
    entries: Vec<TextureEntry>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` at the next free index.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<TextureHandle, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let handle = TextureHandle(self.entries.len() as u32);
        self.by_name.insert(name.clone(), handle);
        self.entries.push(TextureEntry {
            name,
            path: path.as_ref().to_path_buf(),
        });
        Ok(handle)
    }

    pub fn handle(&self, name: &str) -> Result<TextureHandle, TextureError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TextureError::Unknown(name.to_string()))
    }

    pub fn entry(&self, handle: TextureHandle) -> &TextureEntry {
        &self.entries[handle.0 as usize]
    }

    /// Entries in index order.
    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_follow_registration_order() {
        let mut registry = TextureRegistry::new();
        let ball = registry.register("ball", "textures/ball.png").unwrap();
        let brick = registry.register("brick", "textures/brick.png").unwrap();
        assert_eq!(ball.index(), 0);
        assert_eq!(brick.index(), 1);
        assert_eq!(registry.handle("brick"), Ok(brick));
        assert_eq!(registry.entry(ball).path, Path::new("textures/ball.png"));
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let mut registry = TextureRegistry::new();
        registry.register("ball", "a.png").unwrap();
        assert_eq!(
            registry.register("ball", "b.png"),
            Err(TextureError::Duplicate("ball".into()))
        );
        assert_eq!(registry.handle("moon"), Err(TextureError::Unknown("moon".into())));
        assert_eq!(registry.len(), 1);
    }
}
