// Path helpers for OS-native path strings
// Every helper takes the separator explicitly so the same rules work for
// paths reported by any gateway, independent of the host platform.

/// Characters that can't appear in a file or directory name on common platforms.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Windows drive prefix such as "C:". Only meaningful with a '\\' separator;
/// on '/' systems a name may legally end in ':'.
fn is_drive(head: &str, sep: char) -> bool {
    sep == '\\' && head.ends_with(':')
}

/// Strip a trailing separator, keeping a bare root ("/" or "C:\") intact
pub fn trim_trailing_separator(path: &str, sep: char) -> &str {
    let trimmed = path.trim_end_matches(sep);
    if trimmed.is_empty() {
        // "/" or "///"
        return &path[..sep.len_utf8().min(path.len())];
    }
    if is_drive(trimmed, sep) && trimmed.len() < path.len() {
        // Drive root such as "C:\"
        return &path[..trimmed.len() + sep.len_utf8()];
    }
    trimmed
}

/// Prefix that every direct child of `parent` starts with
fn child_prefix(parent: &str, sep: char) -> String {
    let parent = trim_trailing_separator(parent, sep);
    if parent.ends_with(sep) {
        parent.to_string()
    } else {
        format!("{}{}", parent, sep)
    }
}

/// Immediate parent directory of `path`, or None for a bare name or root
pub fn parent_of(path: &str, sep: char) -> Option<&str> {
    let path = trim_trailing_separator(path, sep);
    let idx = path.rfind(sep)?;
    if idx + sep.len_utf8() == path.len() {
        // path is itself a root
        return None;
    }
    let head = &path[..idx];
    if head.is_empty() || is_drive(head, sep) {
        Some(&path[..idx + sep.len_utf8()])
    } else {
        Some(head)
    }
}

/// True when `path` lives directly inside `parent`: it starts with
/// `parent + sep` and the remainder has no further separator.
pub fn is_direct_child(parent: &str, path: &str, sep: char) -> bool {
    depth_below(parent, path, sep) == Some(1)
}

/// Number of path segments between `ancestor` and `path`
/// (1 for a direct child, None when `path` is not below `ancestor`)
pub fn depth_below(ancestor: &str, path: &str, sep: char) -> Option<usize> {
    let rest = relative_to(ancestor, path, sep)?;
    Some(rest.split(sep).filter(|s| !s.is_empty()).count())
}

/// Remainder of `path` below `root`, without a leading separator
pub fn relative_to<'a>(root: &str, path: &'a str, sep: char) -> Option<&'a str> {
    let prefix = child_prefix(root, sep);
    let path = trim_trailing_separator(path, sep);
    let rest = path.strip_prefix(prefix.as_str())?;
    if rest.is_empty() { None } else { Some(rest) }
}

pub fn join(parent: &str, name: &str, sep: char) -> String {
    format!("{}{}", child_prefix(parent, sep), name.trim_start_matches(sep))
}

/// Last path segment (the entry's display name)
pub fn file_name(path: &str, sep: char) -> &str {
    let path = trim_trailing_separator(path, sep);
    match path.rfind(sep) {
        Some(idx) => &path[idx + sep.len_utf8()..],
        None => path,
    }
}

/// File name without its extension ("notes.tar.md" -> "notes.tar")
pub fn file_stem(path: &str, sep: char) -> &str {
    let name = file_name(path, sep);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Make a user-typed name safe to use as a single path segment.
/// Reserved and control characters become '_'; surrounding whitespace and
/// dots are dropped. May return an empty string.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if RESERVED.contains(&c) || c.is_control() { '_' } else { c })
        .collect();
    replaced
        .trim()
        .trim_matches('.')
        .trim()
        .to_string()
}
