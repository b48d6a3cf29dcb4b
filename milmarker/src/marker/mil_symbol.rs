//! Military symbol markers.
//!
//! [`MilSymbolMarker`] ties the pieces together for one marker: the props
//! are turned into effective options, the provider memoizes the glyph, the
//! icon cache memoizes the descriptor and the binding pushes changes to the
//! host. Re-applying unchanged props costs a key comparison and nothing
//! reaches the host.

use std::rc::{Rc, Weak};

use tracing::{debug, info};

use super::binding::{MarkerBinding, UpdateOutcome};
use super::handle::{EventHandlers, MarkerEvent, MarkerHandle, MarkerHost};
use crate::error::SymbolResult;
use crate::geo::LatLng;
use crate::icon::{IconCache, IconConfig, IconDescriptor};
use crate::symbol::{
    Glyph, OptionValue, ProviderConfig, Renderer, SymbolCode, SymbolInstanceProvider,
    SymbolOptions,
};

/// Declarative description of a symbol marker.
#[derive(Debug, Clone)]
pub struct MilSymbolProps {
    pub position: LatLng,
    pub code: SymbolCode,
    /// Symbol size; the provider default applies when unset.
    pub size: Option<f64>,
    /// Renderer options. Entries here win over `size`.
    pub options: SymbolOptions,
    pub tooltip: Option<String>,
    pub popup: Option<String>,
    pub event_handlers: EventHandlers,
}

impl MilSymbolProps {
    pub fn new(position: impl Into<LatLng>, code: impl Into<SymbolCode>) -> Self {
        Self {
            position: position.into(),
            code: code.into(),
            size: None,
            options: SymbolOptions::new(),
            tooltip: None,
            popup: None,
            event_handlers: EventHandlers::default(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_options(mut self, options: SymbolOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name, value);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_popup(mut self, popup: impl Into<String>) -> Self {
        self.popup = Some(popup.into());
        self
    }

    pub fn on(mut self, kind: impl Into<String>, handler: impl Fn(&MarkerEvent) + 'static) -> Self {
        self.event_handlers = self.event_handlers.on(kind, handler);
        self
    }

    /// Options handed to the provider: `size` first, then `options` on top.
    pub fn effective_options(&self, default_size: f64) -> SymbolOptions {
        let base = SymbolOptions::new().with_size(self.size.unwrap_or(default_size));
        self.options.merged_over(&base)
    }
}

/// Provider and icon settings for a marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerConfig {
    pub provider: ProviderConfig,
    pub icon: IconConfig,
}

/// A mounted military symbol marker.
///
/// Dropping the marker removes it from the host.
pub struct MilSymbolMarker {
    host: Rc<dyn MarkerHost>,
    props: MilSymbolProps,
    provider: SymbolInstanceProvider,
    icons: IconCache,
    binding: MarkerBinding,
}

impl std::fmt::Debug for MilSymbolMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MilSymbolMarker")
            .field("props", &self.props)
            .field("provider", &self.provider)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl MilSymbolMarker {
    /// Render the symbol and add it to `host` with the default config.
    pub fn mount(
        host: Rc<dyn MarkerHost>,
        renderer: Rc<dyn Renderer>,
        props: MilSymbolProps,
    ) -> SymbolResult<Self> {
        Self::mount_with(host, renderer, props, MarkerConfig::default())
    }

    /// Render the symbol and add it to `host`.
    ///
    /// Fails without touching the host when the symbol cannot be rendered.
    pub fn mount_with(
        host: Rc<dyn MarkerHost>,
        renderer: Rc<dyn Renderer>,
        props: MilSymbolProps,
        config: MarkerConfig,
    ) -> SymbolResult<Self> {
        let mut provider = SymbolInstanceProvider::with_config(renderer, config.provider);
        let mut icons = IconCache::new(config.icon);

        let options = props.effective_options(provider.config().default_size);
        let glyph = provider.get(&props.code, &options)?;
        let icon = icons.get(&glyph);

        let mut binding = MarkerBinding::new(props.position, icon)
            .with_event_handlers(props.event_handlers.clone())
            .with_tooltip(props.tooltip.clone())
            .with_popup(props.popup.clone());
        binding.mount(host.as_ref());

        info!(code = %props.code, position = %props.position, "Mounted symbol marker");

        Ok(Self {
            host,
            props,
            provider,
            icons,
            binding,
        })
    }

    /// Apply new props.
    ///
    /// Position changes move the marker. Symbol changes re-render and swap
    /// the icon in place. Tooltip, popup and handlers are handed to the host
    /// at mount time and take effect on the next [`remount`](Self::remount).
    /// On a render error the marker keeps showing its previous icon.
    pub fn update(&mut self, props: MilSymbolProps) -> SymbolResult<UpdateOutcome> {
        self.binding.move_to(props.position);
        self.binding.set_event_handlers(props.event_handlers.clone());
        self.binding.set_tooltip(props.tooltip.clone());
        self.binding.set_popup(props.popup.clone());
        self.props = props;
        self.refresh()
    }

    /// Set or replace one renderer option.
    pub fn set_option(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> SymbolResult<UpdateOutcome> {
        self.props.options.insert(name, value);
        self.refresh()
    }

    /// Move the marker through its binding.
    pub fn move_to(&mut self, position: LatLng) -> UpdateOutcome {
        self.props.position = position;
        self.binding.move_to(position)
    }

    fn refresh(&mut self) -> SymbolResult<UpdateOutcome> {
        let options = self
            .props
            .effective_options(self.provider.config().default_size);
        let glyph = self.provider.get(&self.props.code, &options)?;
        let icon = self.icons.get(&glyph);
        let outcome = self.binding.update_icon(icon);
        if outcome == UpdateOutcome::Applied {
            debug!(code = %self.props.code, "Swapped marker icon");
        }
        Ok(outcome)
    }

    /// Mount again after [`unmount`](Self::unmount), with the current icon.
    pub fn remount(&mut self) -> bool {
        self.binding.mount(self.host.as_ref())
    }

    /// Remove the marker from the host. Later updates are kept but not
    /// pushed until remounted.
    pub fn unmount(&mut self) -> bool {
        let removed = self.binding.unmount(self.host.as_ref());
        if removed {
            info!(code = %self.props.code, "Unmounted symbol marker");
        }
        removed
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_mounted()
    }

    pub fn props(&self) -> &MilSymbolProps {
        &self.props
    }

    /// Glyph currently cached by the provider.
    pub fn glyph(&self) -> Option<&Rc<dyn Glyph>> {
        self.provider.current()
    }

    pub fn icon(&self) -> &Rc<IconDescriptor> {
        self.binding.icon()
    }

    /// Position `Rc` handed to the host.
    pub fn position(&self) -> &Rc<LatLng> {
        self.binding.position()
    }

    /// Non-owning handle to the live marker.
    pub fn handle(&self) -> Option<Weak<dyn MarkerHandle>> {
        self.binding.handle()
    }

    pub fn provider(&self) -> &SymbolInstanceProvider {
        &self.provider
    }

    pub fn icon_builds(&self) -> u64 {
        self.icons.builds()
    }
}

impl Drop for MilSymbolMarker {
    fn drop(&mut self) {
        self.binding.unmount(self.host.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolError;
    use crate::marker::recording::RecordingHost;
    use crate::render::FrameRenderer;
    use std::cell::Cell;

    fn setup() -> (Rc<RecordingHost>, Rc<dyn Renderer>) {
        (Rc::new(RecordingHost::new()), Rc::new(FrameRenderer::new()))
    }

    fn props() -> MilSymbolProps {
        MilSymbolProps::new([51.505, -0.09], "SFGPEWRH--MT").with_size(35.0)
    }

    #[test]
    fn test_mount_creates_one_marker() {
        let (host, renderer) = setup();
        let marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();

        assert!(marker.is_mounted());
        assert_eq!(host.created_count(), 1);
        let live = host.marker(0).unwrap();
        assert!(Rc::ptr_eq(&live.icon(), marker.icon()));
        assert!(live.icon().markup.to_markup().contains("<svg"));
    }

    #[test]
    fn test_unchanged_props_do_not_touch_host() {
        let (host, renderer) = setup();
        let mut marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();

        assert_eq!(marker.update(props()).unwrap(), UpdateOutcome::Unchanged);
        assert_eq!(marker.update(props()).unwrap(), UpdateOutcome::Unchanged);

        assert_eq!(host.calls().len(), 1);
        assert_eq!(marker.provider().constructions(), 1);
        assert_eq!(marker.icon_builds(), 1);
    }

    #[test]
    fn test_option_change_swaps_icon_in_place() {
        let (host, renderer) = setup();
        let mut marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();

        let outcome = marker
            .update(props().with_option("fillOpacity", 0.5))
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(host.created_count(), 1);
        assert_eq!(host.set_icon_count(), 1);
        assert!(Rc::ptr_eq(&host.marker(0).unwrap().icon(), marker.icon()));
    }

    #[test]
    fn test_options_override_size_prop() {
        let (host, renderer) = setup();
        let props = props().with_option("size", 80.0);
        let marker = MilSymbolMarker::mount(host, renderer, props).unwrap();

        assert_eq!(marker.glyph().unwrap().size().width, (154.0_f64 * 0.8).ceil());
    }

    #[test]
    fn test_missing_size_uses_default() {
        let (host, renderer) = setup();
        let marker = MilSymbolMarker::mount(
            host,
            renderer,
            MilSymbolProps::new([0.0, 0.0], "SFGPEWRH--MT"),
        )
        .unwrap();

        assert_eq!(
            marker.provider().current_key().unwrap().options_repr(),
            r#"{"size":35.0}"#
        );
    }

    #[test]
    fn test_invalid_code_fails_mount_without_host_calls() {
        let (host, renderer) = setup();
        let err = MilSymbolMarker::mount(
            host.clone(),
            renderer,
            MilSymbolProps::new([0.0, 0.0], "NOT-A-SIDC"),
        )
        .unwrap_err();

        assert!(matches!(err, SymbolError::InvalidSymbolCode { .. }));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_invalid_update_keeps_previous_icon() {
        let (host, renderer) = setup();
        let mut marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();
        let before = Rc::clone(marker.icon());

        let mut bad = props();
        bad.code = SymbolCode::from("??");
        assert!(marker.update(bad).is_err());

        assert!(Rc::ptr_eq(&before, marker.icon()));
        assert_eq!(host.set_icon_count(), 0);
    }

    #[test]
    fn test_restoring_props_after_failed_update_is_silent() {
        let (host, renderer) = setup();
        let mut marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();
        let shown = Rc::clone(marker.icon());

        let mut bad = props();
        bad.code = SymbolCode::from("??");
        assert!(marker.update(bad).is_err());

        assert_eq!(marker.update(props()).unwrap(), UpdateOutcome::Unchanged);
        assert_eq!(host.set_icon_count(), 0);
        assert!(Rc::ptr_eq(&shown, marker.icon()));
        assert_eq!(marker.provider().constructions(), 1);
        assert_eq!(marker.icon_builds(), 1);
    }

    #[test]
    fn test_events_forwarded_to_host() {
        let (host, renderer) = setup();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let props = props()
            .with_tooltip("Infantry")
            .with_popup("1st Platoon")
            .on("click", move |_: &MarkerEvent| counter.set(counter.get() + 1));

        let _marker = MilSymbolMarker::mount(host.clone(), renderer, props).unwrap();
        let live = host.marker(0).unwrap();

        assert!(live.fire("click"));
        assert!(!live.fire("mouseover"));
        assert_eq!(clicks.get(), 1);
        assert_eq!(live.tooltip(), Some("Infantry"));
        assert_eq!(live.popup(), Some("1st Platoon"));
    }

    #[test]
    fn test_unmount_remount_uses_current_icon() {
        let (host, renderer) = setup();
        let mut marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();

        assert!(marker.unmount());
        assert_eq!(
            marker.set_option("direction", 90.0).unwrap(),
            UpdateOutcome::Detached
        );
        assert!(marker.remount());

        let live = host.marker(1).unwrap();
        assert!(Rc::ptr_eq(&live.icon(), marker.icon()));
        assert_eq!(host.set_icon_count(), 0);
        assert_eq!(host.created_count(), 2);
    }

    #[test]
    fn test_drop_removes_marker() {
        let (host, renderer) = setup();
        let marker = MilSymbolMarker::mount(host.clone(), renderer, props()).unwrap();
        drop(marker);
        assert_eq!(host.live_count(), 0);
        assert_eq!(host.removed_count(), 1);
    }
}
