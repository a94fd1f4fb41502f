//! Theme palettes and the only code allowed to write primitive colors.

use foundation::color::Rgba;
use tracing::debug;

use crate::region::{LayerKind, PrimitiveRole, Region};
use crate::registry::{RegionKey, RegionRegistry};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }
}

/// Subdivision borders are drawn fainter than country borders.
const SUBDIVISION_BORDER_ALPHA: f32 = 0.6;
const FILL_ALPHA: f32 = 0.55;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThemePalette {
    pub clear: Rgba,
    pub globe: Rgba,
    pub border: Rgba,
    pub visited: Rgba,
    pub highlight_border: Rgba,
    pub highlight_fill: Rgba,
}

impl ThemePalette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                clear: hex(0x11, 0x18, 0x27),
                globe: hex(0x1f, 0x29, 0x37),
                border: hex(0x4b, 0x55, 0x63),
                visited: hex(0x05, 0x96, 0x69),
                highlight_border: hex(0xff, 0xff, 0xff),
                highlight_fill: hex(0x05, 0x96, 0x69),
            },
            Theme::Light => Self {
                clear: hex(0xff, 0xff, 0xff),
                globe: hex(0xe5, 0xe7, 0xeb),
                border: hex(0xd1, 0xd5, 0xdb),
                visited: hex(0x10, 0xb9, 0x81),
                highlight_border: hex(0x37, 0x41, 0x51),
                highlight_fill: hex(0x10, 0xb9, 0x81),
            },
        }
    }

    pub fn color_for(&self, region: &Region, role: PrimitiveRole, highlighted: bool) -> Rgba {
        match (role, highlighted) {
            (PrimitiveRole::Boundary, true) => self.highlight_border,
            (PrimitiveRole::Fill, true) => self.highlight_fill,
            (PrimitiveRole::Boundary, false) => {
                let base = if region.visited { self.visited } else { self.border };
                match region.layer {
                    LayerKind::Base => base,
                    LayerKind::Detailed => base.with_alpha(SUBDIVISION_BORDER_ALPHA),
                }
            }
            (PrimitiveRole::Fill, false) => self.visited.with_alpha(FILL_ALPHA),
        }
    }
}

const fn hex(r: u8, g: u8, b: u8) -> Rgba {
    Rgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Hover label for hosts: the region id plus its visited state.
pub fn region_label(id: &str, visited: bool) -> String {
    if visited {
        format!("{id}\n✓ visited")
    } else {
        format!("{id}\nnot visited yet")
    }
}

/// Recolors primitives in place; never touches geometry or `visited`.
#[derive(Debug, Clone)]
pub struct MaterialManager {
    theme: Theme,
    palette: ThemePalette,
    highlighted: Option<RegionKey>,
}

impl MaterialManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            palette: ThemePalette::for_theme(theme),
            highlighted: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    pub fn globe_color(&self) -> Rgba {
        self.palette.globe
    }

    pub fn clear_color(&self) -> Rgba {
        self.palette.clear
    }

    pub fn highlighted(&self) -> Option<RegionKey> {
        self.highlighted
    }

    /// Colors every primitive of a freshly built registry for the current
    /// theme. Any previous highlight belonged to an older registry and is
    /// forgotten.
    pub fn paint(&mut self, registry: &mut RegionRegistry) {
        self.highlighted = None;
        self.repaint(registry);
    }

    /// Switches theme and recolors in place. Returns `false` if the theme was
    /// already active.
    pub fn apply_theme(&mut self, theme: Theme, registry: &mut RegionRegistry) -> bool {
        if theme == self.theme {
            return false;
        }
        self.theme = theme;
        self.palette = ThemePalette::for_theme(theme);
        self.repaint(registry);
        debug!(?theme, regions = registry.len(), "theme applied");
        true
    }

    /// Moves the highlight to `key`, restoring the previously highlighted
    /// region. Returns `true` if anything changed.
    pub fn set_highlight(&mut self, key: Option<RegionKey>, registry: &mut RegionRegistry) -> bool {
        if key == self.highlighted {
            return false;
        }
        if let Some(prev) = self.highlighted.take()
            && let Some(region) = registry.get_mut(prev)
        {
            paint_region(&self.palette, region, false);
        }
        if let Some(next) = key
            && let Some(region) = registry.get_mut(next)
        {
            paint_region(&self.palette, region, true);
            self.highlighted = Some(next);
        }
        true
    }

    fn repaint(&self, registry: &mut RegionRegistry) {
        for (key, region) in registry.iter_mut() {
            paint_region(&self.palette, region, Some(key) == self.highlighted);
        }
    }
}

fn paint_region(palette: &ThemePalette, region: &mut Region, highlighted: bool) {
    for role in [PrimitiveRole::Boundary, PrimitiveRole::Fill] {
        let color = palette.color_for(region, role, highlighted);
        region.set_color(role, color);
    }
}

#[cfg(test)]
mod tests {
    use super::{MaterialManager, Theme, ThemePalette, region_label};
    use crate::builder::RegionBuilder;
    use crate::config::BuildConfig;
    use crate::registry::RegionRegistry;
    use formats::{GeoPoint, RegionDataset, RegionFeature, VisitedPlaces};
    use foundation::color::Rgba;
    use pretty_assertions::assert_eq;

    fn registry() -> RegionRegistry {
        let square = |name: &str, lon: f64| {
            RegionFeature::new(
                name,
                vec![vec![vec![
                    GeoPoint::new(lon, 0.0),
                    GeoPoint::new(lon + 2.0, 0.0),
                    GeoPoint::new(lon + 2.0, 2.0),
                    GeoPoint::new(lon, 2.0),
                ]]],
            )
        };
        let base = RegionDataset::new(vec![square("A", 0.0), square("B", 10.0)]);
        let visited: VisitedPlaces = ["A"].into_iter().collect();
        RegionBuilder::new(BuildConfig::default()).build(&base, None, &visited)
    }

    #[test]
    fn palettes_match_heatmap_colors() {
        let dark = ThemePalette::for_theme(Theme::Dark);
        assert_eq!(Some(dark.globe), Rgba::from_hex("#1f2937"));
        assert_eq!(Some(dark.visited), Rgba::from_hex("#059669"));
        let light = ThemePalette::for_theme(Theme::Light);
        assert_eq!(Some(light.border), Rgba::from_hex("#d1d5db"));
        assert_eq!(Some(light.visited), Rgba::from_hex("#10b981"));
    }

    #[test]
    fn theme_switch_recolors_without_touching_geometry() {
        let mut reg = registry();
        let mut materials = MaterialManager::new(Theme::Light);
        materials.paint(&mut reg);

        let before: Vec<_> = reg
            .iter()
            .map(|(_, r)| (r.id.clone(), r.visited, r.bounds, r.boundaries[0].points.clone()))
            .collect();

        assert!(materials.apply_theme(Theme::Dark, &mut reg));
        assert!(!materials.apply_theme(Theme::Dark, &mut reg));

        let after: Vec<_> = reg
            .iter()
            .map(|(_, r)| (r.id.clone(), r.visited, r.bounds, r.boundaries[0].points.clone()))
            .collect();
        assert_eq!(before, after);

        let dark = ThemePalette::for_theme(Theme::Dark);
        let a = reg.by_id("A").expect("A");
        let b = reg.by_id("B").expect("B");
        assert_eq!(a.boundaries[0].color(), dark.visited);
        assert_eq!(b.boundaries[0].color(), dark.border);
        assert_eq!(a.fill.as_ref().map(|f| f.color().a), Some(super::FILL_ALPHA));
        assert_eq!(materials.globe_color(), dark.globe);
    }

    #[test]
    fn highlight_moves_and_reverts() {
        let mut reg = registry();
        let mut materials = MaterialManager::new(Theme::Dark);
        materials.paint(&mut reg);
        let palette = *materials.palette();
        let a = reg.key_of("A").expect("A");
        let b = reg.key_of("B").expect("B");

        assert!(materials.set_highlight(Some(a), &mut reg));
        assert!(!materials.set_highlight(Some(a), &mut reg));
        assert_eq!(reg.get(a).map(|r| r.boundaries[0].color()), Some(palette.highlight_border));

        assert!(materials.set_highlight(Some(b), &mut reg));
        assert_eq!(reg.get(a).map(|r| r.boundaries[0].color()), Some(palette.visited));
        assert_eq!(reg.get(b).map(|r| r.boundaries[0].color()), Some(palette.highlight_border));

        // Highlight survives a theme switch with the new palette.
        materials.apply_theme(Theme::Light, &mut reg);
        let light = ThemePalette::for_theme(Theme::Light);
        assert_eq!(reg.get(b).map(|r| r.boundaries[0].color()), Some(light.highlight_border));

        assert!(materials.set_highlight(None, &mut reg));
        assert_eq!(reg.get(b).map(|r| r.boundaries[0].color()), Some(light.border));
    }

    #[test]
    fn labels_mark_visited_state() {
        assert_eq!(region_label("中国-北京", true), "中国-北京\n✓ visited");
        assert_eq!(region_label("France", false), "France\nnot visited yet");
    }
}
