//! Introspection seam the link generator walks through.
//!
//! An [`Introspect`] implementation answers the handful of reflection
//! questions the walk needs: which module an object belongs to, which
//! names it exposes, what kind of callable it is and where it is defined.

pub mod error;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub use error::IntrospectError;

/// The kinds of member that produce a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A plain function (including static methods).
    Function,
    /// A class; its body is walked recursively.
    Class,
    /// A method bound to a class or instance.
    Method,
    /// A generator object.
    Generator,
}

impl MemberKind {
    /// Text appended to the qualified name inside the link label.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Function => "() function",
            Self::Class => " class",
            Self::Method => "() method",
            Self::Generator => "() generator",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Generator => "generator",
        })
    }
}

/// Where an object is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Path of the defining file, as the introspector located it.
    pub path: PathBuf,
    /// 1-based line the definition starts on.
    pub line: usize,
}

/// Read-only reflection over an object graph.
pub trait Introspect {
    /// Handle to one object in the graph.
    type Object: Clone + PartialEq + fmt::Debug;

    /// Dotted name of the module that owns `obj` (a module owns itself).
    ///
    /// # Errors
    ///
    /// Returns an error if `obj` has no owning module.
    fn module_name(&self, obj: &Self::Object) -> Result<String, IntrospectError>;

    /// Names of every attribute of `obj`, in the order they should be walked.
    ///
    /// # Errors
    ///
    /// Returns an error if the members of `obj` cannot be enumerated.
    fn member_names(&self, obj: &Self::Object) -> Result<Vec<String>, IntrospectError>;

    /// Looks up attribute `name` of `obj`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute does not exist or cannot be resolved.
    fn attribute(&self, obj: &Self::Object, name: &str) -> Result<Self::Object, IntrospectError>;

    /// Classifies `obj`; `None` for anything that does not get a link.
    fn kind(&self, obj: &Self::Object) -> Option<MemberKind>;

    /// Defining file and line of `obj`.
    ///
    /// # Errors
    ///
    /// Returns an error if `obj` has no retrievable source.
    fn source_location(&self, obj: &Self::Object) -> Result<SourceLocation, IntrospectError>;
}
