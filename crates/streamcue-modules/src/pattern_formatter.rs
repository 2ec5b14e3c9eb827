//! Token-pattern formatting for output lines
//!
//! Patterns live in settings so users can add their own; `{token}` markers
//! are substituted from the pipeline's token map, unknown tokens collapse to
//! nothing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use streamcue_core::{FormattedOutput, MapSearchResult, Result, Settings, TokenMap};
use streamcue_runtime::{MapDataParser, Module, ModuleEntry, SettingsProvider};

pub const PATTERNS_KEY: &str = "outputPatterns";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPattern {
    pub name: String,
    pub pattern: String,
}

pub fn default_patterns() -> Vec<OutputPattern> {
    vec![
        OutputPattern {
            name: "nowplaying".into(),
            pattern: "{artist} - {title} [{difficulty}] {mods}".into(),
        },
        OutputPattern {
            name: "status".into(),
            pattern: "{status}".into(),
        },
    ]
}

pub struct PatternFormatter {
    settings: OnceLock<Arc<Settings>>,
}

impl PatternFormatter {
    pub fn entry() -> ModuleEntry {
        let module = Arc::new(Self {
            settings: OnceLock::new(),
        });
        ModuleEntry::new(Arc::clone(&module))
            .with_settings_provider(Arc::clone(&module) as Arc<dyn SettingsProvider>)
            .with_map_data_parser(module)
    }
}

#[async_trait]
impl Module for PatternFormatter {
    fn name(&self) -> &'static str {
        "pattern-formatter"
    }

    async fn start(&self) -> Result<()> {
        // Seed the default patterns so they show up in the settings file.
        if let Some(settings) = self.settings.get() {
            let _ = settings.get(PATTERNS_KEY, default_patterns());
        }
        Ok(())
    }
}

impl SettingsProvider for PatternFormatter {
    fn settings_group(&self) -> &'static str {
        "Output patterns"
    }

    fn set_settings(&self, settings: Arc<Settings>) {
        let _ = self.settings.set(settings);
    }
}

impl MapDataParser for PatternFormatter {
    fn format_map_data(&self, _result: &MapSearchResult, tokens: &TokenMap) -> Vec<FormattedOutput> {
        let Some(settings) = self.settings.get() else {
            return Vec::new();
        };
        let patterns: Vec<OutputPattern> = settings.get(PATTERNS_KEY, default_patterns());
        patterns
            .into_iter()
            .map(|p| FormattedOutput {
                line: expand(&p.pattern, tokens),
                name: p.name,
            })
            .collect()
    }
}

/// Replace every `{token}` marker from the map; unknown tokens vanish.
fn expand(pattern: &str, tokens: &TokenMap) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(rel) => {
                let key = &rest[open + 1..open + rel];
                if let Some(value) = tokens.get(key) {
                    out.push_str(value);
                }
                rest = &rest[open + rel + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_substitutes_known_tokens() {
        let mut tokens = TokenMap::new();
        tokens.insert("artist".into(), "Vega".into());
        tokens.insert("title".into(), "Afterglow".into());
        assert_eq!(
            expand("{artist} - {title}", &tokens),
            "Vega - Afterglow"
        );
    }

    #[test]
    fn expand_drops_unknown_tokens() {
        let tokens = TokenMap::new();
        assert_eq!(expand("[{missing}] done", &tokens), "[] done");
    }

    #[test]
    fn expand_keeps_unterminated_braces() {
        let tokens = TokenMap::new();
        assert_eq!(expand("oops {title", &tokens), "oops {title");
    }
}
