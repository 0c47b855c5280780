use std::path::PathBuf;

/// Expands `~`, `$VAR` and `${VAR}` in a user supplied path.
///
/// Unknown variables are left as written instead of failing the expansion.
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
    PathBuf::from(expanded)
}
