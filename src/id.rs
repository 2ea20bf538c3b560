use std::fmt;

/// Identifier of a texture owned by the texture/atlas collaborator.
///
/// Line builders never touch texture memory; they only carry this id into the
/// [`RenderState`](crate::RenderState) so the batching layer can bind the right atlas page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u64);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}
