//! Typed (TypeScript/TSX) front end using tree-sitter.

use super::FrontEnd;
use tree_sitter::Language;

/// TypeScript/TSX source front end.
pub struct TypedFrontEnd {
    language: Language,
    extensions: &'static [&'static str],
}

impl TypedFrontEnd {
    pub fn new_typescript() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            extensions: &["ts", "mts", "cts"],
        }
    }

    pub fn new_tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            extensions: &["tsx"],
        }
    }
}

impl FrontEnd for TypedFrontEnd {
    fn language(&self) -> Language {
        self.language.clone()
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn default_extension(&self) -> &'static str {
        "ts"
    }
}
