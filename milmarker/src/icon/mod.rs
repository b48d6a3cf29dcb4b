//! Icon descriptors for marker hosts.
//!
//! A descriptor packages a glyph's markup with its pixel size and anchor in
//! the shape a map host needs to place the icon. [`IconCache`] keeps the
//! descriptor stable for as long as the provider keeps returning the same
//! glyph, so hosts only see a new descriptor when the symbol really changed.

mod cache;
mod descriptor;

pub use cache::IconCache;
pub use descriptor::{IconBuilder, IconConfig, IconDescriptor, IconMarkup, MarkupStrategy};

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::render::FrameRenderer;
    use crate::symbol::{SymbolCode, SymbolOptions};
    use proptest::prelude::*;

    const CODES: &[&str] = &[
        "SFGPEWRH--MT",
        "SFGPUCA---MT",
        "SFGPUCD---MT",
        "SFGPUCF---MT",
        "SHG-UCIZ---D",
        "SNGPUCI----",
        "SUGPUCI----",
        "10031000161200000000",
    ];

    proptest! {
        #[test]
        fn prop_icon_geometry_is_finite_and_positive(
            index in 0..CODES.len(),
            size in 5.0f64..300.0,
            direction in proptest::option::of(-720.0f64..720.0),
            node in any::<bool>(),
        ) {
            let mut options = SymbolOptions::new().with_size(size);
            if let Some(d) = direction {
                options.insert("direction", d);
            }
            let glyph = FrameRenderer::new()
                .render_frame(&SymbolCode::from(CODES[index]), &options)
                .unwrap();
            let markup = if node { MarkupStrategy::Node } else { MarkupStrategy::Svg };
            let icon = IconBuilder::new(IconConfig { markup, class_name: String::new() })
                .build(&glyph);

            prop_assert!(icon.size.iter().all(|v| v.is_finite() && *v > 0.0));
            prop_assert!(icon.anchor.iter().all(|v| v.is_finite()));
            prop_assert!(icon.markup.to_markup().contains("<svg"));
        }
    }
}
