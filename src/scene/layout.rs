//! Statically declared vertex attribute schema.
//!
//! A renderer binds each attribute from `(semantic, components, offset)` and the
//! layout stride; no runtime inspection of the vertex type is needed.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Color,
    TexCoord,
}

impl Semantic {
    /// Conventional attribute slot for this semantic.
    pub fn location(self) -> u32 {
        match self {
            Semantic::Position => 0,
            Semantic::Normal => 1,
            Semantic::Color => 2,
            Semantic::TexCoord => 3,
        }
    }
}

/// One `f32`-component attribute inside an interleaved vertex.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub components: u32,
    pub offset: usize,
}

impl VertexAttribute {
    pub const fn new(semantic: Semantic, components: u32, offset: usize) -> Self {
        Self {
            semantic,
            components,
            offset,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.components as usize * std::mem::size_of::<f32>()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VertexLayout {
    pub stride: usize,
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    pub fn find(&self, semantic: Semantic) -> Option<&VertexAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.semantic == semantic)
    }

    /// True when no attribute overlaps another or runs past the stride.
    pub fn is_consistent(&self) -> bool {
        let mut spans: Vec<(usize, usize)> = self
            .attributes
            .iter()
            .map(|a| (a.offset, a.offset + a.size_in_bytes()))
            .collect();
        spans.sort_unstable();

        spans.windows(2).all(|pair| pair[0].1 <= pair[1].0)
            && spans.last().is_none_or(|&(_, end)| end <= self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::{Semantic, VertexAttribute, VertexLayout};
    use crate::scene::Vertex;

    #[test]
    fn crate_vertex_layout_is_consistent() {
        assert!(Vertex::LAYOUT.is_consistent());
        assert_eq!(Vertex::LAYOUT.find(Semantic::Position).unwrap().components, 4);
    }

    #[test]
    fn overlapping_attributes_are_inconsistent() {
        const BROKEN: VertexLayout = VertexLayout {
            stride: 20,
            attributes: &[
                VertexAttribute::new(Semantic::Position, 3, 0),
                VertexAttribute::new(Semantic::TexCoord, 2, 8),
            ],
        };
        assert!(!BROKEN.is_consistent());
    }
}
