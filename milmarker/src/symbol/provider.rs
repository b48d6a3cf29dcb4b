//! Memoized symbol instances.
//!
//! A [`SymbolInstanceProvider`] sits at one render site (one marker, one
//! animation) and holds at most one live glyph. It re-renders exactly when the
//! [`CacheKey`] of the requested `(code, options)` changes, and otherwise hands
//! back the same `Rc` so downstream caches can compare by pointer.
//!
//! # Failure
//!
//! Rendering is never retried. When the renderer rejects a code, the error is
//! returned to the caller and nothing is cached for that key; the previously
//! cached glyph is discarded as well, so a later request for the old key
//! renders afresh instead of being confused with the failed one.

use std::rc::Rc;

use tracing::{debug, warn};

use super::code::SymbolCode;
use super::glyph::{Glyph, Renderer};
use super::key::{CacheKey, KeyStrategy};
use super::options::{SymbolOptions, DEFAULT_SYMBOL_SIZE};
use crate::error::SymbolResult;

/// Configuration for a [`SymbolInstanceProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Size injected when the options do not set one.
    pub default_size: f64,
    /// Cache key derivation.
    pub key_strategy: KeyStrategy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SYMBOL_SIZE,
            key_strategy: KeyStrategy::default(),
        }
    }
}

/// Single-slot memo of rendered glyphs.
pub struct SymbolInstanceProvider {
    renderer: Rc<dyn Renderer>,
    config: ProviderConfig,
    current: Option<(CacheKey, Rc<dyn Glyph>)>,
    constructions: u64,
}

impl std::fmt::Debug for SymbolInstanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolInstanceProvider")
            .field("config", &self.config)
            .field("current_key", &self.current.as_ref().map(|(k, _)| k))
            .field("constructions", &self.constructions)
            .finish_non_exhaustive()
    }
}

impl SymbolInstanceProvider {
    /// Create a provider with the default configuration.
    pub fn new(renderer: Rc<dyn Renderer>) -> Self {
        Self::with_config(renderer, ProviderConfig::default())
    }

    /// Create a provider with an explicit configuration.
    pub fn with_config(renderer: Rc<dyn Renderer>, config: ProviderConfig) -> Self {
        Self {
            renderer,
            config,
            current: None,
            constructions: 0,
        }
    }

    /// Get the glyph for `(code, options)`.
    ///
    /// `size` is filled in from the configured default when absent. Returns
    /// the cached `Rc` when the key matches the previous call. A failed
    /// render leaves the previous entry in place; the failing key is never
    /// cached.
    pub fn get(&mut self, code: &SymbolCode, options: &SymbolOptions) -> SymbolResult<Rc<dyn Glyph>> {
        let effective = options.with_default_size(self.config.default_size);
        let key = CacheKey::derive(code, &effective, self.config.key_strategy);

        if let Some((cached_key, glyph)) = &self.current {
            if *cached_key == key {
                return Ok(Rc::clone(glyph));
            }
        }

        for name in effective.unknown_names() {
            warn!(code = %code, option = name, "Unknown symbol option passed through to renderer");
        }

        let glyph = match self.renderer.render(code, &effective) {
            Ok(glyph) => glyph,
            Err(e) => {
                warn!(code = %code, error = %e, "Symbol rendering failed");
                return Err(e);
            }
        };

        self.constructions += 1;
        debug!(
            key = %key,
            constructions = self.constructions,
            "Rendered new symbol instance"
        );

        self.current = Some((key, Rc::clone(&glyph)));
        Ok(glyph)
    }

    /// The glyph from the last successful render, if still cached.
    pub fn current(&self) -> Option<&Rc<dyn Glyph>> {
        self.current.as_ref().map(|(_, glyph)| glyph)
    }

    /// Key of the cached glyph.
    pub fn current_key(&self) -> Option<&CacheKey> {
        self.current.as_ref().map(|(key, _)| key)
    }

    /// Number of glyphs rendered so far.
    pub fn constructions(&self) -> u64 {
        self.constructions
    }

    /// Provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Drop the cached glyph.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolError;
    use crate::render::{FrameRenderer, RenderNode};
    use crate::symbol::glyph::{Anchor, GlyphSize};
    use std::cell::Cell;

    fn provider() -> SymbolInstanceProvider {
        SymbolInstanceProvider::new(Rc::new(FrameRenderer::new()))
    }

    fn code(s: &str) -> SymbolCode {
        SymbolCode::from(s)
    }

    #[test]
    fn test_same_inputs_return_same_instance() {
        let mut provider = provider();
        let options = SymbolOptions::new().with_size(35.0);

        let first = provider.get(&code("SFG-UCI----D"), &options).unwrap();
        let second = provider.get(&code("SFG-UCI----D"), &options.clone()).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(provider.constructions(), 1);
    }

    #[test]
    fn test_code_change_creates_new_instance() {
        let mut provider = provider();
        let options = SymbolOptions::new();

        let first = provider.get(&code("SFG-UCI----D"), &options).unwrap();
        let second = provider.get(&code("SHG-UCIZ---D"), &options).unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(provider.constructions(), 2);
    }

    #[test]
    fn test_option_change_creates_new_instance() {
        let mut provider = provider();

        let first = provider
            .get(&code("SFG-UCI----D"), &SymbolOptions::new().with_size(35.0))
            .unwrap();
        let second = provider
            .get(&code("SFG-UCI----D"), &SymbolOptions::new().with_size(50.0))
            .unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_default_size_matches_explicit_35() {
        let mut provider = provider();

        let implicit = provider.get(&code("SFG-UCI----D"), &SymbolOptions::new()).unwrap();
        let explicit = provider
            .get(&code("SFG-UCI----D"), &SymbolOptions::new().with_size(35.0))
            .unwrap();

        assert!(Rc::ptr_eq(&implicit, &explicit));
        assert_eq!(
            provider.current_key().unwrap().options_repr(),
            r#"{"size":35.0}"#
        );
    }

    #[test]
    fn test_size_override_changes_glyph_size() {
        let mut provider = provider();
        let default = provider.get(&code("SFG-UCI----D"), &SymbolOptions::new()).unwrap();
        let large = provider
            .get(&code("SFG-UCI----D"), &SymbolOptions::new().with_size(100.0))
            .unwrap();

        assert_ne!(default.size().width, large.size().width);
        assert_ne!(default.size().height, large.size().height);
    }

    #[test]
    fn test_reordered_options_share_instance_with_canonical_keys() {
        let mut provider = provider();
        let a = SymbolOptions::new().with("fill", true).with_size(35.0);
        let b = SymbolOptions::new().with_size(35.0).with("fill", true);

        let first = provider.get(&code("SFG-UCI----D"), &a).unwrap();
        let second = provider.get(&code("SFG-UCI----D"), &b).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reordered_options_differ_with_insertion_order_keys() {
        // Historical behaviour: key order leaks into the memo key.
        let mut provider = SymbolInstanceProvider::with_config(
            Rc::new(FrameRenderer::new()),
            ProviderConfig {
                key_strategy: KeyStrategy::InsertionOrder,
                ..ProviderConfig::default()
            },
        );
        let a = SymbolOptions::new().with("fill", true).with_size(35.0);
        let b = SymbolOptions::new().with_size(35.0).with("fill", true);

        let first = provider.get(&code("SFG-UCI----D"), &a).unwrap();
        let second = provider.get(&code("SFG-UCI----D"), &b).unwrap();

        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalid_code_propagates_and_is_not_cached() {
        let mut provider = provider();
        let options = SymbolOptions::new();

        let good = provider.get(&code("SFG-UCI----D"), &options).unwrap();
        let err = provider.get(&code("??"), &options).unwrap_err();

        assert!(matches!(err, SymbolError::InvalidSymbolCode { .. }));
        assert_eq!(provider.current_key().unwrap().code().as_str(), "SFG-UCI----D");
        assert_eq!(provider.constructions(), 1);

        // The failing code is retried, not served from the slot.
        assert!(provider.get(&code("??"), &options).is_err());

        let again = provider.get(&code("SFG-UCI----D"), &options).unwrap();
        assert!(Rc::ptr_eq(&good, &again));
        assert_eq!(provider.constructions(), 1);
    }

    #[derive(Debug)]
    struct StubGlyph;

    impl Glyph for StubGlyph {
        fn to_markup(&self) -> String {
            "<svg/>".to_string()
        }
        fn to_node(&self) -> RenderNode {
            RenderNode::element("svg")
        }
        fn size(&self) -> GlyphSize {
            GlyphSize {
                width: 1.0,
                height: 1.0,
            }
        }
        fn anchor(&self) -> Anchor {
            Anchor { x: 0.0, y: 0.0 }
        }
    }

    #[test]
    fn test_failed_render_is_not_retried() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let renderer = move |code: &SymbolCode, _: &SymbolOptions| -> SymbolResult<Rc<dyn Glyph>> {
            counter.set(counter.get() + 1);
            if code.as_str() == "BAD" {
                Err(SymbolError::invalid_code("BAD", "rejected"))
            } else {
                Ok(Rc::new(StubGlyph))
            }
        };
        let mut provider = SymbolInstanceProvider::new(Rc::new(renderer));

        assert!(provider.get(&code("BAD"), &SymbolOptions::new()).is_err());
        assert_eq!(calls.get(), 1);

        provider.get(&code("GOOD"), &SymbolOptions::new()).unwrap();
        provider.get(&code("GOOD"), &SymbolOptions::new()).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_renderer_receives_defaulted_options() {
        let seen = Rc::new(std::cell::RefCell::new(None));
        let sink = Rc::clone(&seen);
        let renderer = move |_: &SymbolCode, options: &SymbolOptions| -> SymbolResult<Rc<dyn Glyph>> {
            *sink.borrow_mut() = Some(options.clone());
            Ok(Rc::new(StubGlyph))
        };
        let mut provider = SymbolInstanceProvider::new(Rc::new(renderer));

        provider
            .get(&code("SFG-UCI----D"), &SymbolOptions::new().with("fill", false))
            .unwrap();

        let options = seen.borrow().clone().unwrap();
        assert_eq!(options.size(), Some(35.0));
        assert_eq!(options.get("fill").and_then(|v| v.as_bool()), Some(false));
    }
}
