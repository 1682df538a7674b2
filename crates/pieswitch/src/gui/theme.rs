use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub stroke: Srgba<f64>,
    pub label: Srgba<f64>,
    pub label_shadow: Srgba<f64>,
    pub badge: Srgba<f64>,
    pub badge_text: Srgba<f64>,
    pub center_hole: Srgba<f64>,
    pub center_dot: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            stroke: Srgba::new(1.0, 1.0, 1.0, 1.0),
            label: Srgba::new(1.0, 1.0, 1.0, 1.0),
            label_shadow: Srgba::new(0.0, 0.0, 0.0, 0.8),
            badge: Srgba::new(1.0, 1.0, 1.0, 1.0),
            badge_text: Srgba::new(0.0, 0.0, 0.0, 1.0),
            center_hole: Srgba::new(0.0, 0.0, 0.0, 0.5),
            center_dot: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl ThemeColors {
    /// Slice fills come from the config; only the chrome follows the GTK theme.
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            badge: Self::lookup_color(context, "theme_selected_fg_color", fallback.badge, None),
            badge_text: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.badge_text,
                Some(1.0),
            ),
            center_hole: Self::lookup_color(
                context,
                "theme_bg_color",
                fallback.center_hole,
                Some(0.5),
            ),
            ..fallback
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        #[allow(deprecated)]
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
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.pieswitch-window, .pieswitch-drawing-area {
    background: none;
    background-color: transparent;
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
