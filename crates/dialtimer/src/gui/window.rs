use crate::config::WindowConfig;
use dialkit::host::{HostError, WindowHost};
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

fn layer_for(pinned: bool) -> Layer {
    if pinned { Layer::Overlay } else { Layer::Bottom }
}

/// Anchors the window to the bottom-right corner of the output. Returns
/// `false` when the compositor has no layer-shell support.
pub fn init_layer_shell(window: &gtk::ApplicationWindow, cfg: &WindowConfig, pinned: bool) -> bool {
    if !gtk4_layer_shell::is_supported() {
        log::warn!("Layer shell unsupported, window placement and pinning disabled");
        return false;
    }
    window.init_layer_shell();
    window.set_layer(layer_for(pinned));
    window.set_namespace(Some("dialtimer"));
    window.set_exclusive_zone(0);
    for edge in [Edge::Right, Edge::Bottom] {
        window.set_anchor(edge, true);
        window.set_margin(edge, cfg.margin);
    }
    window.set_keyboard_mode(KeyboardMode::OnDemand);
    true
}

/// Always-on-top backed by the layer the surface lives on: pinned windows sit
/// in the overlay layer, unpinned ones below regular windows.
pub struct LayerHost {
    window: gtk::ApplicationWindow,
    layered: bool,
    pinned: bool,
}

impl LayerHost {
    pub fn new(window: gtk::ApplicationWindow, cfg: &WindowConfig, pinned: bool) -> Self {
        let layered = init_layer_shell(&window, cfg, pinned);
        Self {
            window,
            layered,
            pinned,
        }
    }
}

impl WindowHost for LayerHost {
    fn always_on_top(&self) -> Result<bool, HostError> {
        if !self.layered {
            return Err(HostError::Unavailable("layer shell"));
        }
        Ok(self.pinned)
    }

    fn toggle_always_on_top(&mut self) -> Result<bool, HostError> {
        if !self.layered {
            return Err(HostError::Unavailable("layer shell"));
        }
        self.pinned = !self.pinned;
        self.window.set_layer(layer_for(self.pinned));
        Ok(self.pinned)
    }
}
