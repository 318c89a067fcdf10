//! Sass/Scss to CSS path translation
//!
//! Browsers only know about the compiled stylesheet, so a change to
//! `styles/app.scss` has to be announced as `styles/app.css`.

// Compound suffixes come first so `app.css.scss` collapses to `app.css`.
const SASS_SUFFIXES: [&str; 4] = [".css.sass", ".css.scss", ".sass", ".scss"];

/// Map a `.sass`/`.scss` path to the compiled `.css` path.
///
/// Returns `None` when the path does not end in a Sass extension. The match
/// is case-sensitive and only the final path segment is rewritten.
pub fn rewrite_sass_path(path: &str) -> Option<String> {
    let (dir, file) = match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    };

    let stem = SASS_SUFFIXES
        .iter()
        .find_map(|suffix| file.strip_suffix(suffix))?;

    Some(format!("{}{}.css", dir, stem))
}

/// Apply the rewrite when enabled, passing the path through otherwise
pub fn apply_sass_rule(path: String, apply_sass_live: bool) -> String {
    if !apply_sass_live {
        return path;
    }
    rewrite_sass_path(&path).unwrap_or(path)
}
