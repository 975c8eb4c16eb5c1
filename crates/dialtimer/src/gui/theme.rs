use dialkit::host::Theme;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub accent: Srgba<f64>,
    pub track: Srgba<f64>,
    pub thumb_outline: Srgba<f64>,
    pub hover: Srgba<f64>,
    pub label: Srgba<f64>,
    pub tooltip_bg: Srgba<f64>,
    pub tooltip_fg: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext, dark: bool) -> Self {
        let (fg, bg) = if dark {
            (Srgba::new(0.93, 0.93, 0.93, 1.0), Srgba::new(0.14, 0.14, 0.14, 1.0))
        } else {
            (Srgba::new(0.1, 0.1, 0.1, 1.0), Srgba::new(0.98, 0.98, 0.98, 1.0))
        };

        Self {
            accent: Self::lookup_color(
                context,
                "accent_bg_color",
                Srgba::new(0.21, 0.52, 0.89, 1.0),
                None,
            ),
            track: Self::lookup_color(context, "theme_fg_color", fg, Some(0.15)),
            thumb_outline: Srgba::new(1.0, 1.0, 1.0, 0.9),
            hover: Self::lookup_color(context, "theme_fg_color", fg, Some(0.5)),
            label: Self::lookup_color(context, "theme_fg_color", fg, None),
            tooltip_bg: Self::lookup_color(context, "theme_fg_color", fg, Some(0.9)),
            tooltip_fg: Self::lookup_color(context, "theme_bg_color", bg, None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or_else(|| {
                let (r, g, b, a) = fallback.into_components();
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
    }
}

pub fn prefers_dark() -> bool {
    gtk::Settings::default().is_some_and(|s| s.is_gtk_application_prefer_dark_theme())
}

/// Dark preference of the desktop before the app applies its own.
pub fn system_prefers_dark() -> bool {
    gtk::Settings::default().is_some_and(|s| {
        s.is_gtk_application_prefer_dark_theme()
            || s
                .gtk_theme_name()
                .is_some_and(|name| name.to_lowercase().contains("dark"))
    })
}

pub fn apply_theme(theme: Theme) {
    if let Some(settings) = gtk::Settings::default() {
        settings.set_gtk_application_prefer_dark_theme(theme.is_dark());
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.dialtimer-window {
    background: none;
    background-color: transparent;
}
.dialtimer-panel {
    background-color: alpha(@theme_bg_color, 0.92);
    border-radius: 12px;
}
.top-bar button {
    min-width: 20px;
    min-height: 20px;
    padding: 0;
}
.countdown {
    font-weight: bold;
    font-size: 56px;
    font-feature-settings: \"tnum\";
}
.countdown.with-hours {
    font-size: 40px;
}
.countdown.compact {
    font-size: 44px;
}
.countdown.with-hours.compact {
    font-size: 32px;
}
.play-button {
    min-width: 48px;
    min-height: 48px;
    margin-right: 15px;
}
.active-controls {
    margin-right: 15px;
}
.countdown-progress {
    margin: 0 12px 10px 12px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
