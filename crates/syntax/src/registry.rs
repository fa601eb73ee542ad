// Chunk: docs/chunks/syntax_highlighting - Language registry for fenced code languages
// Chunk: docs/chunks/highlight_injection - Markdown inline layer configuration

//! Language registry mapping language names to tree-sitter configurations.
//!
//! Code blocks name their language the way fenced code blocks do ("rust",
//! "js", "c++"), so the registry is keyed by canonical language name and
//! resolves the usual aliases and file-extension spellings onto it.

use std::collections::HashMap;
use std::sync::OnceLock;
use tree_sitter::Language;

/// C++ needs the C highlight query as a base, with C++-specific additions layered on top.
/// The C++ grammar's HIGHLIGHT_QUERY only covers C++-specific constructs (templates,
/// namespaces, `this`, etc.), while types, keywords, and functions come from the C query.
fn cpp_highlights_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();
    QUERY.get_or_init(|| format!("{}\n{}", tree_sitter_c::HIGHLIGHT_QUERY, tree_sitter_cpp::HIGHLIGHT_QUERY))
}

/// TypeScript layers its query over the JavaScript one, same as C/C++.
fn typescript_highlights_query() -> &'static str {
    static QUERY: OnceLock<String> = OnceLock::new();
    QUERY.get_or_init(|| {
        format!(
            "{}\n{}",
            tree_sitter_javascript::HIGHLIGHT_QUERY,
            tree_sitter_typescript::HIGHLIGHTS_QUERY
        )
    })
}

/// A second grammar parsed over ranges of the primary tree.
///
/// Markdown is split this way: the block grammar finds paragraphs and
/// headings, the inline grammar parses emphasis and links inside the
/// block tree's `inline` nodes.
#[derive(Clone)]
pub struct InlineLayer {
    pub language: Language,
    pub highlights_query: &'static str,
    /// Node kind in the primary tree whose ranges the layer parses.
    pub host_kind: &'static str,
}

/// Configuration for a language's syntax highlighting.
#[derive(Clone)]
pub struct LanguageConfig {
    /// The tree-sitter language
    pub language: Language,
    /// The highlights query (tree-sitter query syntax)
    pub highlights_query: &'static str,
    pub inline: Option<InlineLayer>,
}

impl LanguageConfig {
    /// Creates a new language configuration.
    pub fn new(language: Language, highlights_query: &'static str) -> Self {
        Self {
            language,
            highlights_query,
            inline: None,
        }
    }

    pub fn with_inline_layer(mut self, layer: InlineLayer) -> Self {
        self.inline = Some(layer);
        self
    }
}

/// Registry mapping language names to language configurations.
///
/// Supports Rust, C++, C, Python, TypeScript, TSX, JavaScript, Go, JSON,
/// TOML, Markdown, HTML, CSS, and Bash.
pub struct LanguageRegistry {
    /// Map from canonical language name to config
    configs: HashMap<&'static str, LanguageConfig>,
}

impl LanguageRegistry {
    /// Creates an empty language registry.
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Creates a new language registry with all supported languages.
    pub fn new() -> Self {
        let mut configs = HashMap::new();

        configs.insert(
            "rust",
            LanguageConfig::new(tree_sitter_rust::LANGUAGE.into(), tree_sitter_rust::HIGHLIGHTS_QUERY),
        );

        configs.insert(
            "cpp",
            LanguageConfig::new(tree_sitter_cpp::LANGUAGE.into(), cpp_highlights_query()),
        );

        // C (uses HIGHLIGHT_QUERY - no S)
        configs.insert(
            "c",
            LanguageConfig::new(tree_sitter_c::LANGUAGE.into(), tree_sitter_c::HIGHLIGHT_QUERY),
        );

        configs.insert(
            "python",
            LanguageConfig::new(tree_sitter_python::LANGUAGE.into(), tree_sitter_python::HIGHLIGHTS_QUERY),
        );

        let ts_combined_query = typescript_highlights_query();
        configs.insert(
            "typescript",
            LanguageConfig::new(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), ts_combined_query),
        );
        configs.insert(
            "tsx",
            LanguageConfig::new(tree_sitter_typescript::LANGUAGE_TSX.into(), ts_combined_query),
        );

        configs.insert(
            "javascript",
            LanguageConfig::new(
                tree_sitter_javascript::LANGUAGE.into(),
                tree_sitter_javascript::HIGHLIGHT_QUERY,
            ),
        );

        configs.insert(
            "go",
            LanguageConfig::new(tree_sitter_go::LANGUAGE.into(), tree_sitter_go::HIGHLIGHTS_QUERY),
        );

        configs.insert(
            "json",
            LanguageConfig::new(tree_sitter_json::LANGUAGE.into(), tree_sitter_json::HIGHLIGHTS_QUERY),
        );

        configs.insert(
            "toml",
            LanguageConfig::new(tree_sitter_toml_ng::LANGUAGE.into(), tree_sitter_toml_ng::HIGHLIGHTS_QUERY),
        );

        // Markdown: block grammar first, inline grammar over its `inline` nodes
        let md_config = LanguageConfig::new(tree_sitter_md::LANGUAGE.into(), tree_sitter_md::HIGHLIGHT_QUERY_BLOCK)
            .with_inline_layer(InlineLayer {
                language: tree_sitter_md::INLINE_LANGUAGE.into(),
                highlights_query: tree_sitter_md::HIGHLIGHT_QUERY_INLINE,
                host_kind: "inline",
            });
        configs.insert("markdown", md_config);

        configs.insert(
            "html",
            LanguageConfig::new(tree_sitter_html::LANGUAGE.into(), tree_sitter_html::HIGHLIGHTS_QUERY),
        );

        configs.insert(
            "css",
            LanguageConfig::new(tree_sitter_css::LANGUAGE.into(), tree_sitter_css::HIGHLIGHTS_QUERY),
        );

        // Bash (uses HIGHLIGHT_QUERY - no S)
        configs.insert(
            "bash",
            LanguageConfig::new(tree_sitter_bash::LANGUAGE.into(), tree_sitter_bash::HIGHLIGHT_QUERY),
        );

        Self { configs }
    }

    /// Maps a language name or alias to its canonical registry name.
    ///
    /// Lowercases and trims the name first. Returns `None` for names the
    /// registry does not know.
    ///
    /// # Supported aliases
    ///
    /// - "rs" → "rust"
    /// - "py" → "python"
    /// - "js", "jsx", "mjs" → "javascript"
    /// - "ts" → "typescript"
    /// - "sh", "shell", "zsh" → "bash"
    /// - "c++", "cc", "cxx", "hpp", "h" → "cpp"
    /// - "golang" → "go"
    /// - "md" → "markdown"
    /// - "htm" → "html"
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        let name = name.trim().to_lowercase();
        let canonical = match name.as_str() {
            "rs" => "rust",
            "py" => "python",
            "js" | "jsx" | "mjs" => "javascript",
            "ts" => "typescript",
            "sh" | "shell" | "zsh" => "bash",
            "c++" | "cc" | "cxx" | "hpp" | "h" => "cpp",
            "golang" => "go",
            "md" => "markdown",
            "htm" => "html",
            other => other,
        };
        self.configs.get_key_value(canonical).map(|(key, _)| *key)
    }

    /// Returns the language configuration for a language name or alias.
    ///
    /// Unknown languages return `None`; callers treat that as "no
    /// highlighting", not as an error.
    pub fn config_for_language_name(&self, name: &str) -> Option<&LanguageConfig> {
        let canonical = self.canonical_name(name)?;
        self.configs.get(canonical)
    }

    /// Returns the canonical names of all registered languages, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.configs.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
