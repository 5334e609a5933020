//! File extension to language tag lookup.

use std::path::Path;

/// Tag used when the extension is missing or unknown.
pub const FALLBACK_LANGUAGE: &str = "diff";

const EXTENSIONS: &[(&str, &str)] = &[
    ("py", "python"),
    ("pyi", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("less", "less"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("rs", "rust"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("swift", "swift"),
    ("c", "c"),
    ("h", "c"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("rb", "ruby"),
    ("php", "php"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("sql", "sql"),
    ("xml", "xml"),
    ("vue", "vue"),
    ("lua", "lua"),
    ("r", "r"),
    ("scala", "scala"),
    ("dockerfile", "dockerfile"),
];

/// Returns the language tag for `filename` based on its lowercased extension.
///
/// Dotfiles such as `.gitignore` have no extension and map to
/// [`FALLBACK_LANGUAGE`].
pub fn language_for(filename: &str) -> &'static str {
    let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return FALLBACK_LANGUAGE;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, tag)| *tag)
        .unwrap_or(FALLBACK_LANGUAGE)
}
