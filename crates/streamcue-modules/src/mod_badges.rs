//! Mod-badge overlay descriptor
//!
//! Computes where each active mod's badge icon belongs on the overlay strip
//! and publishes the layout as a JSON artifact. An external compositor does
//! the pixel work; only icons that actually exist in the badge directory are
//! placed.

use crate::handle;
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use streamcue_core::{MapSearchResult, Result, Saver, Settings, TokenMap};
use streamcue_runtime::{
    MapReplacementProvider, ModParser, ModParserListConsumer, Module, ModuleEntry, SaveConsumer,
    SettingsProvider,
};
use tracing::warn;

pub const ENABLE_BADGES_KEY: &str = "enableModBadges";
const BADGE_DIR: &str = "badges";
const DESCRIPTOR_FILE: &str = "mod_badges.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, Copy)]
pub struct BadgeGeometry {
    pub image_width: i64,
    pub badge_width: i64,
    pub badge_height: i64,
    pub spacing: i64,
    pub opacity_pct: i64,
    pub side: DrawSide,
    pub direction: DrawDirection,
}

#[derive(Serialize)]
struct BadgeDescriptor {
    width: i64,
    height: i64,
    opacity: f64,
    label: String,
    badges: Vec<BadgePlacement>,
}

#[derive(Serialize)]
struct BadgePlacement {
    icon: String,
    x: i64,
    y: i64,
}

pub struct ModBadgeGenerator {
    settings: OnceLock<Arc<Settings>>,
    saver: OnceLock<Arc<Saver>>,
    parsers: OnceLock<Vec<Arc<dyn ModParser>>>,
    badge_dir: OnceLock<PathBuf>,
}

impl ModBadgeGenerator {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
            saver: OnceLock::new(),
            parsers: OnceLock::new(),
            badge_dir: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_map_replacement_provider(Arc::clone(&module) as Arc<dyn MapReplacementProvider>)
            .with_settings_provider(Arc::clone(&module) as Arc<dyn SettingsProvider>)
            .with_save_consumer(Arc::clone(&module) as Arc<dyn SaveConsumer>)
            .with_mod_parser_list_consumer(module)
    }

    fn geometry(settings: &Settings) -> BadgeGeometry {
        BadgeGeometry {
            image_width: settings.get("badgeImageWidth", 720i64),
            badge_width: settings.get("badgeWidth", 64i64),
            badge_height: settings.get("badgeHeight", 64i64),
            spacing: settings.get("badgeSpacing", -25i64),
            opacity_pct: settings.get("badgeOpacity", 85i64),
            side: if settings.get("badgesOnRightSide", false) {
                DrawSide::Right
            } else {
                DrawSide::Left
            },
            direction: if settings.get("badgesRightToLeft", false) {
                DrawDirection::RightToLeft
            } else {
                DrawDirection::LeftToRight
            },
        }
    }

    fn label_for(&self, result: &MapSearchResult) -> String {
        self.parsers
            .get()
            .and_then(|parsers| parsers.first().cloned())
            .map(|parser| parser.mods_to_string(result.mods))
            .unwrap_or_else(|| result.mods.to_string())
    }
}

#[async_trait]
impl Module for ModBadgeGenerator {
    fn name(&self) -> &'static str {
        "mod-badges"
    }

    async fn start(&self) -> Result<()> {
        let saver = handle(&self.saver, self.name(), "saver")?;
        let dir = saver.sub_dir(BADGE_DIR)?;
        let readme = dir.join("README.txt");
        if !readme.exists() {
            std::fs::write(
                &readme,
                "Drop badge icons here, named after the two-letter mod code (HD.png, DT.png, ...).\n",
            )?;
        }
        let _ = self.badge_dir.set(dir);
        Ok(())
    }
}

impl MapReplacementProvider for ModBadgeGenerator {
    fn map_replacements(&self, result: &MapSearchResult) -> TokenMap {
        let mut tokens = TokenMap::new();
        let (Some(settings), Some(saver), Some(dir)) =
            (self.settings.get(), self.saver.get(), self.badge_dir.get())
        else {
            return tokens;
        };
        if !settings.get(ENABLE_BADGES_KEY, true) || !result.found || result.mods.is_empty() {
            return tokens;
        }

        let icons: Vec<PathBuf> = result
            .mods
            .codes()
            .iter()
            .map(|code| dir.join(format!("{code}.png")))
            .filter(|path| path.exists())
            .collect();

        let geometry = Self::geometry(settings);
        let positions = badge_positions(icons.len(), &geometry);
        let badges = icons
            .iter()
            .zip(positions)
            .map(|(icon, x)| BadgePlacement {
                icon: icon.display().to_string(),
                x,
                y: 0,
            })
            .collect();

        let descriptor = BadgeDescriptor {
            width: geometry.image_width,
            height: geometry.badge_height,
            opacity: geometry.opacity_pct as f64 / 100.0,
            label: self.label_for(result),
            badges,
        };
        match serde_json::to_string_pretty(&descriptor) {
            Ok(body) => match saver.save(DESCRIPTOR_FILE, &body) {
                Ok(path) => {
                    tokens.insert("modBadges".into(), path.display().to_string());
                }
                Err(e) => warn!(error = %e, "failed to write badge descriptor"),
            },
            Err(e) => warn!(error = %e, "failed to serialize badge descriptor"),
        }
        tokens
    }
}

impl SettingsProvider for ModBadgeGenerator {
    fn settings_group(&self) -> &'static str {
        "Mod badges"
    }

    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

impl SaveConsumer for ModBadgeGenerator {
    fn set_saver(&self, saver: Arc<Saver>) {
        let _ = self.saver.set(saver);
    }
}

impl ModParserListConsumer for ModBadgeGenerator {
    fn set_mod_parsers(&self, parsers: Vec<Arc<dyn ModParser>>) {
        let _ = self.parsers.set(parsers);
    }
}

/// X position for each badge on the strip. Badges overlap by `spacing`
/// (negative values pull them together); `side` picks the anchored edge and
/// `direction` the fill order.
pub fn badge_positions(count: usize, geometry: &BadgeGeometry) -> Vec<i64> {
    let n = count as i64;
    if n == 0 {
        return Vec::new();
    }
    let step = geometry.badge_width + geometry.spacing;
    let strip_width = if n == 1 {
        geometry.badge_width
    } else {
        n * step - geometry.spacing
    };
    (0..n)
        .map(|i| {
            let x = i * step;
            match (geometry.side, geometry.direction) {
                (DrawSide::Left, DrawDirection::LeftToRight) => x,
                (DrawSide::Left, DrawDirection::RightToLeft) => {
                    strip_width - x - geometry.badge_width
                }
                (DrawSide::Right, DrawDirection::RightToLeft) => {
                    geometry.image_width - x - geometry.badge_width
                }
                (DrawSide::Right, DrawDirection::LeftToRight) => {
                    x + geometry.image_width - strip_width
                }
            }
        })
        .collect()
}
