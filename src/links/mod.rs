//! Link generation: best-effort walk of an object graph into source links.
//!
//! The walk starts at a root object, visits every public member, and
//! produces one [`ApiLink`] per function, class, method and generator it
//! finds, descending into classes. Any failure while handling an object
//! drops that object and everything beneath it; siblings are unaffected.

use std::fmt;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::introspect::{Introspect, IntrospectError, MemberKind};
use crate::repo::RepoCoordinate;

/// One reference-link definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiLink {
    /// Dotted name relative to the root, e.g. `Outer.Inner.method`.
    pub qualified_name: String,
    /// What kind of member the link points at.
    pub kind: MemberKind,
    /// Absolute URL of the defining line.
    pub url: String,
}

impl fmt::Display for ApiLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}{}]: {}", self.qualified_name, self.kind.suffix(), self.url)
    }
}

/// Walk parameters that stay fixed for a whole run.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Top-level package name; members from other modules are skipped.
    pub namespace: String,
    /// Directory source paths are made relative to before joining the URL.
    pub link_root: PathBuf,
}

impl LinkSettings {
    /// Returns `true` if `module` is the namespace package or one of its submodules.
    #[must_use]
    pub fn in_namespace(&self, module: &str) -> bool {
        module
            .strip_prefix(self.namespace.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

/// Collects links for every public member reachable from `root`.
///
/// Never fails: per-object failures are logged at debug level and
/// contribute no links.
pub fn collect_links<I: Introspect>(
    introspector: &I,
    root: &I::Object,
    coordinate: &RepoCoordinate,
    settings: &LinkSettings,
) -> Vec<ApiLink> {
    let walker = Walker { introspector, blob_base: coordinate.blob_base(), settings };
    let mut links = Vec::new();
    let mut path = vec![root.clone()];
    walker.walk(root, "", &mut path, &mut links);
    links
}

/// Writes one link per line and flushes.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_links<W: Write>(links: &[ApiLink], writer: &mut W) -> std::io::Result<()> {
    for link in links {
        writeln!(writer, "{link}")?;
    }
    writer.flush()
}

struct Walker<'a, I> {
    introspector: &'a I,
    blob_base: String,
    settings: &'a LinkSettings,
}

impl<I: Introspect> Walker<'_, I> {
    /// Emits links for the members of `obj`. `path` holds the objects from
    /// the root down to `obj`, used to stop self-referencing classes.
    fn walk(&self, obj: &I::Object, prefix: &str, path: &mut Vec<I::Object>, out: &mut Vec<ApiLink>) {
        let module = match self.introspector.module_name(obj) {
            Ok(module) => module,
            Err(e) => {
                tracing::debug!(prefix, error = %e, "skipping branch: no owning module");
                return;
            }
        };
        if !self.settings.in_namespace(&module) {
            tracing::trace!(prefix, module = %module, "skipping branch outside namespace");
            return;
        }

        let names = match self.introspector.member_names(obj) {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!(prefix, error = %e, "skipping branch: members not enumerable");
                return;
            }
        };

        for name in names.iter().filter(|name| !name.starts_with('_')) {
            let qualified_name = format!("{prefix}{name}");
            let member = match self.introspector.attribute(obj, name) {
                Ok(member) => member,
                Err(e) => {
                    tracing::debug!(member = %qualified_name, error = %e, "skipping member");
                    continue;
                }
            };
            let Some(kind) = self.introspector.kind(&member) else {
                continue;
            };

            match self.introspector.module_name(&member) {
                Ok(module) if self.settings.in_namespace(&module) => {}
                Ok(module) => {
                    tracing::trace!(member = %qualified_name, module = %module, "member outside namespace");
                    continue;
                }
                Err(e) => {
                    tracing::debug!(member = %qualified_name, error = %e, "skipping member");
                    continue;
                }
            }

            let url = match self.url_for(&member) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(member = %qualified_name, error = %e, "skipping member");
                    continue;
                }
            };
            out.push(ApiLink { qualified_name: qualified_name.clone(), kind, url });

            if kind == MemberKind::Class {
                if path.contains(&member) {
                    tracing::debug!(member = %qualified_name, "class already on walk path");
                    continue;
                }
                path.push(member.clone());
                self.walk(&member, &format!("{qualified_name}."), path, out);
                path.pop();
            }
        }
    }

    fn url_for(&self, obj: &I::Object) -> Result<String, IntrospectError> {
        let location = self.introspector.source_location(obj)?;
        let relative = relative_url_path(&location.path, &self.settings.link_root)?;
        Ok(format!("{}/{relative}#L{}", self.blob_base, location.line))
    }
}

/// Renders `path` relative to `root` with `/` separators.
fn relative_url_path(path: &Path, root: &Path) -> Result<String, IntrospectError> {
    let outside = || IntrospectError::OutsideLinkRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let relative = path.strip_prefix(root).map_err(|_| outside())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy()),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }
    if segments.is_empty() {
        return Err(outside());
    }
    Ok(segments.join("/"))
}
