//! Identity-memoized icon building.

use std::rc::Rc;

use tracing::debug;

use super::descriptor::{IconBuilder, IconConfig, IconDescriptor};
use crate::symbol::Glyph;

/// Rebuilds the descriptor only when handed a different glyph `Rc`.
///
/// The cached glyph is held strongly, so its address cannot be reused by a
/// new allocation while the comparison depends on it.
#[derive(Debug, Default)]
pub struct IconCache {
    builder: IconBuilder,
    current: Option<(Rc<dyn Glyph>, Rc<IconDescriptor>)>,
    builds: u64,
}

impl IconCache {
    pub fn new(config: IconConfig) -> Self {
        Self {
            builder: IconBuilder::new(config),
            current: None,
            builds: 0,
        }
    }

    /// Descriptor for `glyph`; the same `Rc` while the glyph is unchanged.
    pub fn get(&mut self, glyph: &Rc<dyn Glyph>) -> Rc<IconDescriptor> {
        if let Some((cached, icon)) = &self.current {
            if Rc::ptr_eq(cached, glyph) {
                return Rc::clone(icon);
            }
        }

        let icon = Rc::new(self.builder.build(glyph.as_ref()));
        self.builds += 1;
        debug!(
            width = icon.size[0],
            height = icon.size[1],
            builds = self.builds,
            "Built icon descriptor"
        );

        self.current = Some((Rc::clone(glyph), Rc::clone(&icon)));
        icon
    }

    /// Last built descriptor.
    pub fn current(&self) -> Option<&Rc<IconDescriptor>> {
        self.current.as_ref().map(|(_, icon)| icon)
    }

    /// Number of descriptors built.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameRenderer;
    use crate::symbol::{Renderer, SymbolCode, SymbolOptions};

    fn render(code: &str) -> Rc<dyn Glyph> {
        FrameRenderer::new()
            .render(&SymbolCode::from(code), &SymbolOptions::new().with_size(35.0))
            .unwrap()
    }

    #[test]
    fn test_same_glyph_reuses_descriptor() {
        let mut cache = IconCache::default();
        let glyph = render("SFGPEWRH--MT");

        let first = cache.get(&glyph);
        let second = cache.get(&Rc::clone(&glyph));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_equal_but_distinct_glyph_rebuilds() {
        let mut cache = IconCache::default();
        let a = render("SFGPEWRH--MT");
        let b = render("SFGPEWRH--MT");

        let first = cache.get(&a);
        let second = cache.get(&b);

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(cache.builds(), 2);
    }

    #[test]
    fn test_clear_forces_rebuild() {
        let mut cache = IconCache::default();
        let glyph = render("SFGPEWRH--MT");
        cache.get(&glyph);
        cache.clear();
        assert!(cache.current().is_none());
        cache.get(&glyph);
        assert_eq!(cache.builds(), 2);
    }
}
