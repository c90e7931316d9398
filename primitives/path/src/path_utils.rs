// SPDX-License-Identifier: Apache-2.0

//! Nesting escape and `filepath`-style lexical joins.

/// Compute the relative path that climbs from `nested` back to the root.
///
/// Emits one `..` for every component of `nested` that is neither empty nor a
/// `.`/`..` literal, joined with `/`. An empty (or trivial) input needs no
/// escaping and yields an empty string.
///
/// ```
/// assert_eq!(korpc_path::escape(""), "");
/// assert_eq!(korpc_path::escape("gen"), "..");
/// assert_eq!(korpc_path::escape("gen/entrypoint"), "../..");
/// ```
pub fn escape(nested: &str) -> String {
    nested
        .split('/')
        .filter(|component| !matches!(*component, "" | "." | ".."))
        .map(|_| "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically normalize a slash-separated path.
///
/// Mirrors Go's `path.Clean`: repeated separators collapse, `.` components
/// drop, and `..` removes the preceding component where one exists. A path
/// that reduces to nothing becomes `"."`.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                // `..` at the root of an absolute path stays at the root.
                _ if rooted => {}
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join path elements and normalize the result.
///
/// Empty elements are ignored. If every element is empty the result is an
/// empty string; otherwise the joined path is passed through [`clean`].
pub fn join(elements: &[&str]) -> String {
    let parts: Vec<&str> = elements.iter().copied().filter(|e| !e.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Directory portion of `path`, as Go's `path.Dir` computes it.
///
/// `"foo/bar.proto"` yields `"foo"` and a bare file name yields `"."`.
pub fn parent(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => clean(&path[..=idx]),
        None => ".".to_string(),
    }
}

/// The protoc include root for a run that writes into `out`, expressed
/// relative to the directory `nested` where the invoking build step lives.
///
/// `out` is relative to `nested`, so the run's own nesting is first undone
/// (`join(nested, escape(out))`) and the remaining depth is escaped. A run
/// that already sits at the root yields `"."` so the result is always a
/// usable `-I` argument.
pub fn to_root(out: &str, nested: &str) -> String {
    match escape(&join(&[nested, &escape(out)])) {
        root if root.is_empty() => ".".to_string(),
        root => root,
    }
}
