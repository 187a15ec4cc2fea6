/// Maps a user supplied path to an absolute one.
///
/// Empty or missing input becomes `/`, anything not starting with `/` gets
/// one prepended. Repeated slashes and `.`/`..` segments are passed through
/// untouched; the remote server is responsible for rejecting them.
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => "/".to_string(),
        Some(path) if path.starts_with('/') => path.to_string(),
        Some(path) => format!("/{}", path),
    }
}

pub fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Last `/` separated segment of a remote path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Name offered to the browser for a download: the last non-empty segment.
pub fn display_name(path: &str) -> &str {
    match file_name(path.trim_end_matches('/')) {
        "" => "download",
        name => name,
    }
}

/// Strips any client side directory from an uploaded file name.
///
/// Some browsers send the full local path, with either separator.
pub fn base_name(original: &str) -> &str {
    match original.rfind(|c| c == '/' || c == '\\') {
        Some(idx) => &original[idx + 1..],
        None => original,
    }
}

/// Substring after the last `.`, if there is a non-empty one.
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}
