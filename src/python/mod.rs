//! Python source introspector.
//!
//! Stands in for runtime reflection: modules are located under a source
//! directory, parsed with tree-sitter, and their bindings realized into
//! objects on demand. Name resolution follows Python's import-time rules
//! closely enough for documentation links. Attribute access sees the last
//! binding of a name, while base classes and assignments see the bindings
//! made before their own statement. Class bodies see their own names and
//! module globals, and attribute lookup on a class falls back to its bases
//! in order.

mod parse;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::introspect::{Introspect, IntrospectError, MemberKind, SourceLocation};
use crate::ports::FileSystem;

use self::parse::{Binding, ClassDef, Entry, FunctionDef, ModuleRef, Scope};

/// Bound on alias/import/inheritance chains followed while resolving one name.
const MAX_RESOLUTION_DEPTH: usize = 64;

/// A loaded module: its file and every binding its body made.
#[derive(Debug)]
struct Module {
    name: String,
    path: PathBuf,
    is_package: bool,
    scope: Scope,
    exports: Option<Vec<String>>,
    constants: BTreeMap<String, String>,
}

impl Module {
    /// Names a `from <module> import *` brings in.
    fn star_names(&self) -> Vec<String> {
        match &self.exports {
            Some(exports) => exports.clone(),
            None => self.scope.names().filter(|name| !name.starts_with('_')).cloned().collect(),
        }
    }
}

/// A class realized in the scope it was defined in.
#[derive(Debug)]
struct ClassObject {
    def: Rc<ClassDef>,
    /// Statement number of the `class` statement; bases resolve before it.
    seq: usize,
    module: Rc<Module>,
    /// Enclosing classes, outermost first.
    enclosing: Vec<Rc<ClassObject>>,
}

/// A function, method or generator together with where it was defined.
#[derive(Debug)]
struct FunctionObject {
    def: Rc<FunctionDef>,
    module: Rc<Module>,
}

#[derive(Debug, Clone)]
enum Repr {
    Module(Rc<Module>),
    Class(Rc<ClassObject>),
    Function(Rc<FunctionObject>),
    Method(Rc<FunctionObject>),
    Generator(Rc<FunctionObject>),
    Data,
}

/// Handle to an object produced by [`PythonIntrospector`].
#[derive(Clone)]
pub struct PyObject(Repr);

impl PartialEq for PyObject {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Module(a), Repr::Module(b)) => a.name == b.name,
            (Repr::Class(a), Repr::Class(b)) => Rc::ptr_eq(&a.def, &b.def),
            (Repr::Function(a), Repr::Function(b))
            | (Repr::Method(a), Repr::Method(b))
            | (Repr::Generator(a), Repr::Generator(b)) => Rc::ptr_eq(&a.def, &b.def),
            (Repr::Data, Repr::Data) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for PyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Module(m) => write!(f, "<module {}>", m.name),
            Repr::Class(c) => write!(f, "<class {}.{}>", c.module.name, c.def.name),
            Repr::Function(func) => write!(f, "<function {}.{}>", func.module.name, func.def.name),
            Repr::Method(func) => write!(f, "<method {}.{}>", func.module.name, func.def.name),
            Repr::Generator(func) => {
                write!(f, "<generator {}.{}>", func.module.name, func.def.name)
            }
            Repr::Data => f.write_str("<data>"),
        }
    }
}

/// Scope a binding is realized in: its module, plus the class whose body
/// holds it (innermost last) when it is a class attribute.
#[derive(Clone)]
struct Frame {
    module: Rc<Module>,
    classes: Vec<Rc<ClassObject>>,
}

impl Frame {
    fn module(module: &Rc<Module>) -> Self {
        Self { module: Rc::clone(module), classes: Vec::new() }
    }
}

/// Introspects a Python package by parsing its source files.
///
/// Parsed modules are cached for the lifetime of the introspector.
pub struct PythonIntrospector<'a> {
    fs: &'a dyn FileSystem,
    search_root: PathBuf,
    modules: RefCell<HashMap<String, Rc<Module>>>,
    loading: RefCell<Vec<String>>,
}

impl<'a> PythonIntrospector<'a> {
    /// Creates an introspector that resolves modules under `search_root`
    /// (the directory containing the top-level package).
    pub fn new(fs: &'a dyn FileSystem, search_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            search_root: search_root.into(),
            modules: RefCell::new(HashMap::new()),
            loading: RefCell::new(Vec::new()),
        }
    }

    /// Imports the module with the given dotted name.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot be found, read or parsed.
    pub fn import(&self, module: &str) -> Result<PyObject, IntrospectError> {
        self.load(module).map(|m| PyObject(Repr::Module(m)))
    }

    /// Value of a module-level string constant such as `__commit__`.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot be imported.
    pub fn string_constant(&self, module: &str, name: &str) -> Result<Option<String>, IntrospectError> {
        Ok(self.load(module)?.constants.get(name).cloned())
    }

    fn load(&self, name: &str) -> Result<Rc<Module>, IntrospectError> {
        if let Some(module) = self.modules.borrow().get(name) {
            return Ok(Rc::clone(module));
        }
        if self.loading.borrow().iter().any(|loading| loading == name) {
            return Err(IntrospectError::CircularImport { module: name.to_string() });
        }

        self.loading.borrow_mut().push(name.to_string());
        let result = self.load_uncached(name);
        self.loading.borrow_mut().pop();

        let module = Rc::new(result?);
        self.modules.borrow_mut().insert(name.to_string(), Rc::clone(&module));
        Ok(module)
    }

    fn load_uncached(&self, name: &str) -> Result<Module, IntrospectError> {
        let (path, is_package) = self.locate(name)?;
        tracing::trace!(module = name, path = %path.display(), "loading module");

        let source = self.fs.read_to_string(&path).map_err(|e| IntrospectError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let parsed = parse::parse_module(&path, &source)?;

        let mut module = Module {
            name: name.to_string(),
            path,
            is_package,
            scope: Scope::default(),
            exports: parsed.exports,
            constants: parsed.constants,
        };

        for entry in parsed.entries {
            match entry {
                Entry::Bind { seq, name: bound, binding } => {
                    module.scope.bind(bound, seq, binding);
                }
                Entry::Wildcard { seq, module: reference } => {
                    let source = match self.absolute_module(&reference, &module) {
                        Ok(source) => source,
                        Err(e) => {
                            tracing::debug!(module = name, error = %e, "skipping star import");
                            continue;
                        }
                    };
                    match self.load(&source) {
                        Ok(imported) => {
                            for star in imported.star_names() {
                                let binding = Binding::ImportFrom {
                                    module: ModuleRef { level: 0, path: source.clone() },
                                    name: star.clone(),
                                };
                                module.scope.bind(star, seq, binding);
                            }
                        }
                        Err(e) => {
                            tracing::debug!(module = name, error = %e, "skipping star import");
                        }
                    }
                }
            }
        }
        Ok(module)
    }

    /// Finds `a/b/c/__init__.py` or `a/b/c.py` for module `a.b.c`.
    fn locate(&self, name: &str) -> Result<(PathBuf, bool), IntrospectError> {
        let not_found = || IntrospectError::ModuleNotFound {
            module: name.to_string(),
            search_root: self.search_root.clone(),
        };
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(not_found());
        }

        let mut dir = self.search_root.clone();
        dir.extend(name.split('.'));

        let package = dir.join("__init__.py");
        if self.fs.is_file(&package) {
            return Ok((package, true));
        }
        let file = dir.with_extension("py");
        if self.fs.is_file(&file) {
            return Ok((file, false));
        }
        Err(not_found())
    }

    /// Turns a possibly relative import reference into a dotted module name.
    fn absolute_module(&self, reference: &ModuleRef, from: &Module) -> Result<String, IntrospectError> {
        if reference.level == 0 {
            return Ok(reference.path.clone());
        }
        let escapes = || IntrospectError::RelativeImport {
            module: from.name.clone(),
            import: format!("{}{}", ".".repeat(reference.level), reference.path),
        };

        let mut package: Vec<&str> = from.name.split('.').collect();
        if !from.is_package {
            package.pop();
        }
        for _ in 1..reference.level {
            package.pop().ok_or_else(escapes)?;
        }
        if package.is_empty() {
            return Err(escapes());
        }
        if !reference.path.is_empty() {
            package.push(&reference.path);
        }
        Ok(package.join("."))
    }

    /// Turns `binding`, made by statement `seq` of `frame`, into an object.
    fn realize(&self, binding: &Binding, seq: usize, frame: &Frame, depth: usize) -> Result<Repr, IntrospectError> {
        let depth = next_depth(depth, &frame.module.name)?;
        match binding {
            Binding::Function(def) => {
                let function = Rc::new(FunctionObject { def: Rc::clone(def), module: Rc::clone(&frame.module) });
                if frame.classes.is_empty() {
                    return Ok(Repr::Function(function));
                }
                Ok(match class_member_flavor(&def.decorators) {
                    Flavor::Static => Repr::Function(function),
                    Flavor::Property => Repr::Data,
                    Flavor::Bound => Repr::Method(function),
                })
            }
            Binding::Class(def) => Ok(Repr::Class(Rc::new(ClassObject {
                def: Rc::clone(def),
                seq,
                module: Rc::clone(&frame.module),
                enclosing: frame.classes.clone(),
            }))),
            Binding::Module(reference) => {
                let name = self.absolute_module(reference, &frame.module)?;
                Ok(Repr::Module(self.load(&name)?))
            }
            Binding::ImportFrom { module, name } => {
                let source = self.absolute_module(module, &frame.module)?;
                let source = self.load(&source)?;
                self.module_attribute(&source, name, depth)
            }
            Binding::Alias(parts) => self.resolve_dotted(parts, frame, Some(seq), depth),
            // A decorator may replace what the call returns (`@contextmanager`).
            Binding::Call(parts) => match self.resolve_dotted(parts, frame, Some(seq), depth)? {
                Repr::Function(f) | Repr::Method(f)
                    if f.def.is_generator && f.def.decorators.is_empty() =>
                {
                    Ok(Repr::Generator(f))
                }
                _ => Ok(Repr::Data),
            },
            Binding::Data => Ok(Repr::Data),
        }
    }

    /// Resolves `a.b.c` as seen from `frame`: `a` in the innermost class
    /// body, then the module globals; the rest by attribute lookup. With
    /// `before` set, `a` only sees bindings made before that statement.
    fn resolve_dotted(
        &self,
        parts: &[String],
        frame: &Frame,
        before: Option<usize>,
        depth: usize,
    ) -> Result<Repr, IntrospectError> {
        let depth = next_depth(depth, &frame.module.name)?;
        let (first, rest) = parts.split_first().ok_or_else(|| IntrospectError::Unresolved {
            module: frame.module.name.clone(),
            name: String::new(),
        })?;

        let from_class = frame.classes.last().and_then(|class| class.def.body.lookup(first, before));
        let mut current = if let Some((seq, binding)) = from_class {
            self.realize(binding, seq, frame, depth)?
        } else if let Some((seq, binding)) = frame.module.scope.lookup(first, before) {
            self.realize(binding, seq, &Frame::module(&frame.module), depth)?
        } else {
            return Err(IntrospectError::Unresolved {
                module: frame.module.name.clone(),
                name: parts.join("."),
            });
        };

        for part in rest {
            current = self.attribute_of(&current, part, depth)?;
        }
        Ok(current)
    }

    fn attribute_of(&self, obj: &Repr, name: &str, depth: usize) -> Result<Repr, IntrospectError> {
        match obj {
            Repr::Module(module) => self.module_attribute(module, name, depth),
            Repr::Class(class) => self.class_attribute(class, name, depth),
            other => Err(IntrospectError::NoAttribute {
                owner: format!("{:?}", PyObject(other.clone())),
                name: name.to_string(),
            }),
        }
    }

    /// Module globals first, then a submodule of the same name.
    fn module_attribute(&self, module: &Rc<Module>, name: &str, depth: usize) -> Result<Repr, IntrospectError> {
        if let Some((seq, binding)) = module.scope.get(name) {
            return self.realize(binding, seq, &Frame::module(module), depth);
        }
        if module.is_package {
            if let Ok(submodule) = self.load(&format!("{}.{name}", module.name)) {
                return Ok(Repr::Module(submodule));
            }
        }
        Err(IntrospectError::NoAttribute { owner: module.name.clone(), name: name.to_string() })
    }

    /// The class body first, then each base class depth-first in order.
    fn class_attribute(&self, class: &Rc<ClassObject>, name: &str, depth: usize) -> Result<Repr, IntrospectError> {
        let depth = next_depth(depth, &class.module.name)?;
        if let Some((seq, binding)) = class.def.body.get(name) {
            let mut classes = class.enclosing.clone();
            classes.push(Rc::clone(class));
            let frame = Frame { module: Rc::clone(&class.module), classes };
            return self.realize(binding, seq, &frame, depth);
        }
        for base in self.bases(class, depth) {
            if let Ok(found) = self.class_attribute(&base, name, depth) {
                return Ok(found);
            }
        }
        Err(IntrospectError::NoAttribute {
            owner: format!("{}.{}", class.module.name, class.def.name),
            name: name.to_string(),
        })
    }

    /// Base classes that resolve to classes; anything else contributes nothing.
    fn bases(&self, class: &Rc<ClassObject>, depth: usize) -> Vec<Rc<ClassObject>> {
        let frame = Frame { module: Rc::clone(&class.module), classes: class.enclosing.clone() };
        class
            .def
            .bases
            .iter()
            .filter_map(|base| match self.resolve_dotted(base, &frame, Some(class.seq), depth) {
                Ok(Repr::Class(base)) => Some(base),
                Ok(_) => None,
                Err(e) => {
                    tracing::trace!(class = %class.def.name, error = %e, "unresolved base class");
                    None
                }
            })
            .collect()
    }

    fn class_member_names(&self, class: &Rc<ClassObject>, depth: usize) -> Result<BTreeSet<String>, IntrospectError> {
        let depth = next_depth(depth, &class.module.name)?;
        let mut names: BTreeSet<String> = class.def.body.names().cloned().collect();
        for base in self.bases(class, depth) {
            names.extend(self.class_member_names(&base, depth)?);
        }
        Ok(names)
    }
}

impl Introspect for PythonIntrospector<'_> {
    type Object = PyObject;

    fn module_name(&self, obj: &PyObject) -> Result<String, IntrospectError> {
        match &obj.0 {
            Repr::Module(module) => Ok(module.name.clone()),
            Repr::Class(class) => Ok(class.module.name.clone()),
            Repr::Function(f) | Repr::Method(f) | Repr::Generator(f) => Ok(f.module.name.clone()),
            Repr::Data => Err(IntrospectError::NoModule),
        }
    }

    fn member_names(&self, obj: &PyObject) -> Result<Vec<String>, IntrospectError> {
        match &obj.0 {
            Repr::Module(module) => Ok(module.scope.names().cloned().collect()),
            Repr::Class(class) => Ok(self.class_member_names(class, 0)?.into_iter().collect()),
            _ => Ok(Vec::new()),
        }
    }

    fn attribute(&self, obj: &PyObject, name: &str) -> Result<PyObject, IntrospectError> {
        self.attribute_of(&obj.0, name, 0).map(PyObject)
    }

    fn kind(&self, obj: &PyObject) -> Option<MemberKind> {
        match &obj.0 {
            Repr::Class(_) => Some(MemberKind::Class),
            Repr::Function(_) => Some(MemberKind::Function),
            Repr::Method(_) => Some(MemberKind::Method),
            Repr::Generator(_) => Some(MemberKind::Generator),
            Repr::Module(_) | Repr::Data => None,
        }
    }

    fn source_location(&self, obj: &PyObject) -> Result<SourceLocation, IntrospectError> {
        let (module, line) = match &obj.0 {
            Repr::Class(class) => (&class.module, class.def.line),
            Repr::Function(f) | Repr::Method(f) | Repr::Generator(f) => (&f.module, f.def.line),
            Repr::Module(_) | Repr::Data => return Err(IntrospectError::NoSource),
        };
        Ok(SourceLocation { path: module.path.clone(), line })
    }
}

/// How a `def` in a class body behaves when fetched from the class.
enum Flavor {
    Bound,
    Static,
    Property,
}

fn class_member_flavor(decorators: &[String]) -> Flavor {
    let last_segment = |decorator: &String| decorator.rsplit('.').next().unwrap_or_default().to_string();
    let names: Vec<String> = decorators.iter().map(last_segment).collect();
    if names.iter().any(|name| name == "staticmethod") {
        Flavor::Static
    } else if names
        .iter()
        .any(|name| matches!(name.as_str(), "property" | "cached_property" | "setter" | "getter" | "deleter"))
    {
        Flavor::Property
    } else {
        Flavor::Bound
    }
}

fn next_depth(depth: usize, module: &str) -> Result<usize, IntrospectError> {
    if depth >= MAX_RESOLUTION_DEPTH {
        return Err(IntrospectError::Unresolved {
            module: module.to_string(),
            name: "<resolution too deep>".to_string(),
        });
    }
    Ok(depth + 1)
}

/// Path of the top-level package directory for `namespace` under `search_root`.
#[must_use]
pub fn package_dir(search_root: &Path, namespace: &str) -> PathBuf {
    let top = namespace.split('.').next().unwrap_or(namespace);
    search_root.join(top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::links::{collect_links, LinkSettings};
    use crate::repo::RepoCoordinate;
    use std::fs;
    use tempfile::TempDir;

    fn package(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (relative, source) in files {
            let path = dir.path().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
        dir
    }

    fn member(py: &PythonIntrospector<'_>, module: &str, dotted: &str) -> PyObject {
        let mut obj = py.import(module).unwrap();
        for name in dotted.split('.') {
            obj = py.attribute(&obj, name).unwrap();
        }
        obj
    }

    #[test]
    fn star_import_honours_all_and_relative_imports_resolve() {
        let dir = package(&[
            ("pkg/__init__.py", ""),
            ("pkg/helpers.py", "def util():\n    return 1\n"),
            (
                "pkg/core/__init__.py",
                "from .api import *\nfrom ..helpers import util as helper\nimport os\n",
            ),
            (
                "pkg/core/api.py",
                "__all__ = [\"run\", \"Test\"]\n\ndef run():\n    pass\n\ndef hidden():\n    pass\n\nclass Test:\n    pass\n",
            ),
        ]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());

        let core = py.import("pkg.core").unwrap();
        assert_eq!(py.member_names(&core).unwrap(), vec!["Test", "helper", "os", "run"]);

        let run = member(&py, "pkg.core", "run");
        assert_eq!(py.kind(&run), Some(MemberKind::Function));
        assert_eq!(py.module_name(&run).unwrap(), "pkg.core.api");
        assert_eq!(
            py.source_location(&run).unwrap(),
            SourceLocation { path: dir.path().join("pkg/core/api.py"), line: 3 }
        );

        let helper = member(&py, "pkg.core", "helper");
        assert_eq!(py.module_name(&helper).unwrap(), "pkg.helpers");
        assert!(py.attribute(&core, "os").is_err());
    }

    #[test]
    fn class_members_cover_bases_and_decorators() {
        let dir = package(&[
            ("pkg/__init__.py", ""),
            ("pkg/base.py", "class Base:\n    def describe(self):\n        pass\n"),
            (
                "pkg/shapes.py",
                "from .base import Base\n\n\nclass Shape(Base):\n    @staticmethod\n    def make():\n        pass\n\n    @property\n    def area(self):\n        return 0\n\n    def draw(self):\n        pass\n\n    class Style:\n        pass\n",
            ),
        ]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());

        let shape = member(&py, "pkg.shapes", "Shape");
        assert_eq!(py.kind(&shape), Some(MemberKind::Class));
        assert_eq!(
            py.member_names(&shape).unwrap(),
            vec!["Style", "area", "describe", "draw", "make"]
        );

        let kind_of = |name: &str| py.kind(&py.attribute(&shape, name).unwrap());
        assert_eq!(kind_of("make"), Some(MemberKind::Function));
        assert_eq!(kind_of("area"), None);
        assert_eq!(kind_of("draw"), Some(MemberKind::Method));
        assert_eq!(kind_of("Style"), Some(MemberKind::Class));

        let describe = py.attribute(&shape, "describe").unwrap();
        assert_eq!(py.kind(&describe), Some(MemberKind::Method));
        assert_eq!(
            py.source_location(&describe).unwrap(),
            SourceLocation { path: dir.path().join("pkg/base.py"), line: 2 }
        );
        assert_eq!(py.source_location(&py.attribute(&shape, "make").unwrap()).unwrap().line, 5);
    }

    #[test]
    fn generator_instances_point_at_their_function() {
        let dir = package(&[(
            "gen.py",
            "def numbers():\n    yield 1\n\n\nstream = numbers()\nvalue = len([])\nplain = numbers\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        let module = py.import("gen").unwrap();

        let stream = py.attribute(&module, "stream").unwrap();
        assert_eq!(py.kind(&stream), Some(MemberKind::Generator));
        assert_eq!(py.source_location(&stream).unwrap().line, 1);

        let plain = py.attribute(&module, "plain").unwrap();
        assert_eq!(py.kind(&plain), Some(MemberKind::Function));
        assert!(py.attribute(&module, "value").ok().and_then(|v| py.kind(&v)).is_none());
    }

    #[test]
    fn decorated_function_starts_at_first_decorator() {
        let dir = package(&[(
            "deco.py",
            "import functools\n\n\n@functools.lru_cache()\n@other\ndef cached():\n    pass\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        let cached = member(&py, "deco", "cached");
        assert_eq!(py.source_location(&cached).unwrap().line, 4);
    }

    #[test]
    fn nested_class_aliases_resolve_to_the_same_object() {
        let dir = package(&[(
            "nest.py",
            "class Outer:\n    class Inner:\n        pass\n\n    Alias = Inner\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        assert_eq!(member(&py, "nest", "Outer.Alias"), member(&py, "nest", "Outer.Inner"));
        assert_ne!(member(&py, "nest", "Outer"), member(&py, "nest", "Outer.Inner"));
    }

    #[test]
    fn circular_star_imports_and_alias_loops_terminate() {
        let dir = package(&[
            ("loop/__init__.py", ""),
            ("loop/a.py", "from .b import *\n"),
            ("loop/b.py", "from .a import *\nX = 1\n"),
            ("alias.py", "a = b\nb = a\n"),
        ]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());

        let a = py.import("loop.a").unwrap();
        assert_eq!(py.member_names(&a).unwrap(), vec!["X"]);

        let alias = py.import("alias").unwrap();
        assert!(py.attribute(&alias, "a").is_err());
    }

    #[test]
    fn missing_module_is_an_error() {
        let dir = package(&[("pkg/__init__.py", "")]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        assert!(matches!(
            py.import("pkg.nope"),
            Err(IntrospectError::ModuleNotFound { .. })
        ));
        assert!(py.import("").is_err());
    }

    #[test]
    fn string_constants_are_read_from_metadata_modules() {
        let dir = package(&[(
            "pkg/_core.py",
            "__repository__ = \"https://github.com/org/pkg.git\"\n__commit__ = 'abc123'\n__version__ = VERSION\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        assert_eq!(
            py.string_constant("pkg._core", "__repository__").unwrap().as_deref(),
            Some("https://github.com/org/pkg.git")
        );
        assert_eq!(py.string_constant("pkg._core", "__commit__").unwrap().as_deref(), Some("abc123"));
        assert_eq!(py.string_constant("pkg._core", "__version__").unwrap(), None);
    }

    #[test]
    fn broken_import_does_not_hide_its_siblings() {
        let dir = package(&[
            ("pkg/__init__.py", "from .good import ok\nfrom .missing import gone\n"),
            ("pkg/good.py", "def ok():\n    pass\n"),
        ]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        let root = py.import("pkg").unwrap();
        let settings =
            LinkSettings { namespace: "pkg".into(), link_root: package_dir(dir.path(), "pkg") };
        let coordinate = RepoCoordinate::new("https://github.com/org/pkg.git", "abc123");

        let lines: Vec<String> = collect_links(&py, &root, &coordinate, &settings)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec!["[ok() function]: https://github.com/org/pkg/blob/abc123/good.py#L1"]
        );
    }

    #[test]
    fn class_may_shadow_the_base_it_imports() {
        let dir = package(&[
            ("pkg/base.py", "class Base:\n    def a(self):\n        pass\n"),
            (
                "pkg/__init__.py",
                "from .base import Base\n\n\nclass Base(Base):\n    def b(self):\n        pass\n",
            ),
        ]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());

        let derived = member(&py, "pkg", "Base");
        assert_eq!(py.source_location(&derived).unwrap().line, 4);
        assert_eq!(py.member_names(&derived).unwrap(), vec!["a", "b"]);

        let inherited = py.attribute(&derived, "a").unwrap();
        assert_eq!(py.kind(&inherited), Some(MemberKind::Method));
        assert_eq!(
            py.source_location(&inherited).unwrap(),
            SourceLocation { path: dir.path().join("pkg/base.py"), line: 2 }
        );
    }

    #[test]
    fn aliases_bind_what_the_name_meant_at_that_point() {
        let dir = package(&[(
            "m.py",
            "def f():\n    pass\n\n\ng = f\n\n\ndef f():\n    return 1\n\n\nclass C:\n    def m(self):\n        pass\n\n    n = m\n\n    def m(self):\n        pass\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());

        assert_eq!(py.source_location(&member(&py, "m", "g")).unwrap().line, 1);
        assert_eq!(py.source_location(&member(&py, "m", "f")).unwrap().line, 8);
        assert_eq!(py.source_location(&member(&py, "m", "C.n")).unwrap().line, 13);
        assert_eq!(py.source_location(&member(&py, "m", "C.m")).unwrap().line, 18);
    }

    #[test]
    fn only_plain_generator_functions_make_generators() {
        let dir = package(&[(
            "calls.py",
            "from contextlib import contextmanager\n\n\n@contextmanager\ndef opened():\n    yield 1\n\n\nasync def ticks():\n    yield 2\n\n\ndef plain():\n    yield 3\n\n\nresource = opened()\nstream = ticks()\nnumbers = plain()\n",
        )]);
        let py = PythonIntrospector::new(&LiveFileSystem, dir.path());
        let kind_of = |name: &str| py.kind(&member(&py, "calls", name));

        assert_eq!(kind_of("resource"), None);
        assert_eq!(kind_of("stream"), None);
        assert_eq!(kind_of("numbers"), Some(MemberKind::Generator));
        assert_eq!(kind_of("opened"), Some(MemberKind::Function));
    }
}

