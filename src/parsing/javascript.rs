//! Script-style (JavaScript) front end using tree-sitter.

use super::FrontEnd;
use tree_sitter::Language;

/// JavaScript source front end, covering CommonJS and ESM modules.
pub struct ScriptFrontEnd {
    language: Language,
    extensions: &'static [&'static str],
}

impl ScriptFrontEnd {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
            extensions: &["js", "mjs", "cjs"],
        }
    }
}

impl Default for ScriptFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontEnd for ScriptFrontEnd {
    fn language(&self) -> Language {
        self.language.clone()
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn default_extension(&self) -> &'static str {
        "js"
    }
}
