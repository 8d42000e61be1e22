//! Entry name canonicalization and safe extraction paths.
//!
//! Both functions are purely lexical: nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Canonicalize an entry name for storage.
///
/// Backslashes become `/`, `.` and `..` segments are resolved against a
/// virtual root (so `..` can never climb above it), leading slashes are
/// dropped and a trailing `/` is kept.
///
/// ```rust
/// use zipcodec::path::canonical_name;
///
/// assert_eq!(canonical_name("..\\docs\\.\\a.txt"), "docs/a.txt");
/// assert_eq!(canonical_name("/abs/dir/"), "abs/dir/");
/// ```
pub fn canonical_name(name: &str) -> String {
    let unified = name.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = segments.join("/");
    if unified.ends_with('/') && !out.is_empty() {
        out.push('/');
    }
    out
}

/// Lexically normalize a path, resolving `.` and `..` without following
/// symlinks.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Push `segment` onto `path` as relative components only.
///
/// Root and drive prefixes inside an entry name must never replace the
/// extraction root, which a plain `join` would allow.
fn push_relative(path: &mut PathBuf, segment: &str) {
    for component in Path::new(segment).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::ParentDir => path.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
}

/// Resolve where `name` should be written beneath `root`.
///
/// Progressively shorter suffixes of the `/`-separated name are tried; the
/// first that stays inside `root` wins. If none does, the entry lands
/// directly in `root` under its base name.
///
/// ```rust
/// use std::path::Path;
/// use zipcodec::path::sanitize_extract_path;
///
/// let out = sanitize_extract_path(Path::new("/srv/out"), "../../etc/passwd");
/// assert_eq!(out, Path::new("/srv/out/etc/passwd"));
/// ```
pub fn sanitize_extract_path(root: &Path, name: &str) -> PathBuf {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(root))
            .unwrap_or_else(|_| root.to_path_buf())
    };
    let root = normalize_lexically(&absolute);

    let parts: Vec<&str> = name.split('/').collect();
    for start in 0..parts.len() {
        let mut candidate = root.clone();
        for part in &parts[start..] {
            push_relative(&mut candidate, part);
        }
        let candidate = normalize_lexically(&candidate);
        if candidate.starts_with(&root) {
            return candidate;
        }
    }

    match parts.iter().rev().find(|p| !p.is_empty()) {
        Some(&base) if base != "." && base != ".." => {
            let mut fallback = root.clone();
            push_relative(&mut fallback, base);
            normalize_lexically(&fallback)
        }
        _ => root,
    }
}
