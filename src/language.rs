//! Maps file names to highlight.js language tags.

use std::path::Path;

/// Tag used when nothing else matches.
pub const PLAINTEXT: &str = "plaintext";

/// Extensionless (or dot-only) files recognized by their full, lower-cased name.
const NAME_LANGS: &[(&str, &str)] = &[
    ("dockerfile", "dockerfile"),
    ("makefile", "makefile"),
    ("gnumakefile", "makefile"),
    ("brewfile", "ruby"),
    ("gemfile", "ruby"),
    ("rakefile", "ruby"),
    ("vagrantfile", "ruby"),
    (".env", "bash"),
    (".bashrc", "bash"),
    (".zshrc", "bash"),
    (".profile", "bash"),
    (".gitconfig", "ini"),
    (".editorconfig", "ini"),
];

/// Lower-cased extension to language tag.
const EXT_LANGS: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "bash"),
    ("env", "bash"),
    ("fish", "fish"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("toml", "toml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("json", "json"),
    ("md", "markdown"),
    ("html", "xml"),
    ("xml", "xml"),
    ("css", "css"),
    ("scss", "scss"),
    ("sql", "sql"),
    ("lua", "lua"),
    ("vim", "vim"),
    ("dockerfile", "dockerfile"),
    ("tf", "hcl"),
    ("hcl", "hcl"),
    ("nix", "nix"),
    ("conf", "ini"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("java", "java"),
    ("kt", "kotlin"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, tag)| *tag)
}

/// Returns the highlight language for `filename`. Never fails.
///
/// Full-name matches win over extension matches; anything unknown is
/// [`PLAINTEXT`].
pub fn classify(filename: &str) -> &'static str {
    let name = filename.to_lowercase();
    if let Some(tag) = lookup(NAME_LANGS, &name) {
        return tag;
    }

    Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| lookup(EXT_LANGS, ext))
        .unwrap_or(PLAINTEXT)
}
