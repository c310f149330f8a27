//! Extraction of module and class bindings from Python source.
//!
//! Only the statements that run at import time are considered: module and
//! class bodies, and the `if`/`try`/`with` blocks nested directly in them.
//! Function bodies are never entered except to look for `yield`.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use tree_sitter::{Node, Parser};

use crate::introspect::IntrospectError;

/// A module reference as written in an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleRef {
    /// Number of leading dots; `0` for absolute imports.
    pub level: usize,
    /// Dotted name after the dots, possibly empty (`from . import x`).
    pub path: String,
}

impl ModuleRef {
    fn absolute(path: &str) -> Self {
        Self { level: 0, path: path.to_string() }
    }
}

/// A `def`, with what is needed to classify and locate it.
#[derive(Debug)]
pub(crate) struct FunctionDef {
    pub name: String,
    pub line: usize,
    pub decorators: Vec<String>,
    /// A plain `def` whose own body yields. `async def` never counts.
    pub is_generator: bool,
}

/// A `class` statement.
#[derive(Debug)]
pub(crate) struct ClassDef {
    pub name: String,
    pub line: usize,
    /// Positional base-class expressions as dotted names.
    pub bases: Vec<Vec<String>>,
    /// Bindings made by the class body.
    pub body: Scope,
}

/// Bindings of a module or class body. Every binding of a name is kept
/// with the statement number that made it, in statement order.
#[derive(Debug, Default)]
pub(crate) struct Scope {
    names: BTreeMap<String, Vec<(usize, Binding)>>,
}

impl Scope {
    pub fn bind(&mut self, name: String, seq: usize, binding: Binding) {
        self.names.entry(name).or_default().push((seq, binding));
    }

    /// The binding in effect once the whole body has run.
    pub fn get(&self, name: &str) -> Option<(usize, &Binding)> {
        self.names.get(name)?.last().map(|(seq, binding)| (*seq, binding))
    }

    /// The binding in effect when statement `before` starts, or the final
    /// one when `before` is `None`.
    pub fn lookup(&self, name: &str, before: Option<usize>) -> Option<(usize, &Binding)> {
        let Some(before) = before else {
            return self.get(name);
        };
        self.names
            .get(name)?
            .iter()
            .rev()
            .find(|(seq, _)| *seq < before)
            .map(|(seq, binding)| (*seq, binding))
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.names.keys()
    }
}

/// What a name is bound to.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Function(Rc<FunctionDef>),
    Class(Rc<ClassDef>),
    /// `import a.b` (binds `a`) or `import a.b as c` (binds `a.b`).
    Module(ModuleRef),
    /// `from m import name`.
    ImportFrom { module: ModuleRef, name: String },
    /// `x = y` or `x = a.b`.
    Alias(Vec<String>),
    /// `x = f(...)`.
    Call(Vec<String>),
    Data,
}

/// One import-time binding statement. `seq` numbers statements across the
/// whole file in execution order; a class statement counts after its body.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Bind { seq: usize, name: String, binding: Binding },
    /// `from m import *`.
    Wildcard { seq: usize, module: ModuleRef },
}

/// Everything extracted from one module file.
#[derive(Debug, Default)]
pub(crate) struct ParsedModule {
    pub entries: Vec<Entry>,
    /// Names listed in a literal `__all__`, if any.
    pub exports: Option<Vec<String>>,
    /// Module-level `NAME = "literal"` assignments.
    pub constants: BTreeMap<String, String>,
}

/// Parses `source` (read from `path`) into its import-time bindings.
pub(crate) fn parse_module(path: &Path, source: &str) -> Result<ParsedModule, IntrospectError> {
    let parse_error = || IntrospectError::Parse { path: path.to_path_buf() };

    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_python::LANGUAGE.into()).map_err(|_| parse_error())?;
    let tree = parser.parse(source, None).ok_or_else(parse_error)?;
    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!(path = %path.display(), "syntax errors in module, extracting what parsed");
    }

    let mut extractor = Extractor { source, module: ParsedModule::default(), next_seq: 0 };
    let mut entries = Vec::new();
    extractor.block(root, &mut entries, true);
    extractor.module.entries = entries;
    Ok(extractor.module)
}

struct Extractor<'s> {
    source: &'s str,
    module: ParsedModule,
    next_seq: usize,
}

impl Extractor<'_> {
    fn seq(&mut self) -> usize {
        self.next_seq += 1;
        self.next_seq - 1
    }

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Walks the statements of a module or class body. Module-only
    /// bookkeeping (`__all__`, string constants) happens when `top` is set.
    fn block(&mut self, node: Node<'_>, out: &mut Vec<Entry>, top: bool) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" | "class_definition" => {
                    if let Some(entry) = self.definition(child, child, &[]) {
                        out.push(entry);
                    }
                }
                "decorated_definition" => {
                    let decorators = self.decorators(child);
                    if let Some(def) = child.child_by_field_name("definition") {
                        if let Some(entry) = self.definition(def, child, &decorators) {
                            out.push(entry);
                        }
                    }
                }
                "import_statement" => self.import(child, out),
                "import_from_statement" => self.import_from(child, out),
                "expression_statement" => self.expression_statement(child, out, top),
                "if_statement" | "try_statement" | "with_statement" => {
                    for nested in nested_blocks(child) {
                        self.block(nested, out, top);
                    }
                }
                _ => {}
            }
        }
    }

    /// Builds the binding for a `def`/`class`; `start` is the node whose
    /// first line counts as the definition line (the decorated wrapper when
    /// decorators are present).
    fn definition(&mut self, def: Node<'_>, start: Node<'_>, decorators: &[String]) -> Option<Entry> {
        let name = self.text(def.child_by_field_name("name")?).to_string();
        let line = start.start_position().row + 1;

        match def.kind() {
            "function_definition" => {
                let mut cursor = def.walk();
                let is_async = def.children(&mut cursor).any(|child| child.kind() == "async");
                let is_generator =
                    !is_async && def.child_by_field_name("body").is_some_and(contains_yield);
                let function = FunctionDef {
                    name: name.clone(),
                    line,
                    decorators: decorators.to_vec(),
                    is_generator,
                };
                let binding = Binding::Function(Rc::new(function));
                Some(Entry::Bind { seq: self.seq(), name, binding })
            }
            "class_definition" => {
                let bases = def
                    .child_by_field_name("superclasses")
                    .map(|args| {
                        let mut cursor = args.walk();
                        args.named_children(&mut cursor)
                            .filter_map(|base| self.dotted(base))
                            .collect()
                    })
                    .unwrap_or_default();

                let mut entries = Vec::new();
                if let Some(body) = def.child_by_field_name("body") {
                    self.block(body, &mut entries, false);
                }
                let mut body = Scope::default();
                for entry in entries {
                    if let Entry::Bind { seq, name, binding } = entry {
                        body.bind(name, seq, binding);
                    }
                }

                let class = ClassDef { name: name.clone(), line, bases, body };
                let binding = Binding::Class(Rc::new(class));
                Some(Entry::Bind { seq: self.seq(), name, binding })
            }
            _ => None,
        }
    }

    /// Dotted names of a decorated definition's decorators, with any call
    /// arguments dropped (`@a.b(x)` gives `a.b`).
    fn decorators(&self, decorated: Node<'_>) -> Vec<String> {
        let mut cursor = decorated.walk();
        decorated
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| {
                let expr = decorator.named_child(0)?;
                let expr = if expr.kind() == "call" {
                    expr.child_by_field_name("function")?
                } else {
                    expr
                };
                self.dotted(expr).map(|parts| parts.join("."))
            })
            .collect()
    }

    fn import(&mut self, node: Node<'_>, out: &mut Vec<Entry>) {
        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            match name.kind() {
                "dotted_name" => {
                    let full = self.text(name);
                    let first = full.split('.').next().unwrap_or(full).trim().to_string();
                    let binding = Binding::Module(ModuleRef::absolute(&first));
                    out.push(Entry::Bind { seq: self.seq(), name: first, binding });
                }
                "aliased_import" => {
                    let (Some(target), Some(alias)) =
                        (name.child_by_field_name("name"), name.child_by_field_name("alias"))
                    else {
                        continue;
                    };
                    let binding = Binding::Module(ModuleRef::absolute(&compact(self.text(target))));
                    let name = self.text(alias).to_string();
                    out.push(Entry::Bind { seq: self.seq(), name, binding });
                }
                _ => {}
            }
        }
    }

    fn import_from(&mut self, node: Node<'_>, out: &mut Vec<Entry>) {
        let Some(module) = node.child_by_field_name("module_name").map(|m| self.module_ref(m)) else {
            return;
        };

        let mut cursor = node.walk();
        if node.named_children(&mut cursor).any(|child| child.kind() == "wildcard_import") {
            out.push(Entry::Wildcard { seq: self.seq(), module });
            return;
        }

        let mut cursor = node.walk();
        for name in node.children_by_field_name("name", &mut cursor) {
            let (imported, bound) = match name.kind() {
                "dotted_name" => {
                    let imported = compact(self.text(name));
                    (imported.clone(), imported)
                }
                "aliased_import" => {
                    let (Some(target), Some(alias)) =
                        (name.child_by_field_name("name"), name.child_by_field_name("alias"))
                    else {
                        continue;
                    };
                    (compact(self.text(target)), self.text(alias).to_string())
                }
                _ => continue,
            };
            let binding = Binding::ImportFrom { module: module.clone(), name: imported };
            out.push(Entry::Bind { seq: self.seq(), name: bound, binding });
        }
    }

    fn module_ref(&self, node: Node<'_>) -> ModuleRef {
        if node.kind() != "relative_import" {
            return ModuleRef::absolute(&compact(self.text(node)));
        }
        let mut level = 0;
        let mut path = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_prefix" => level = self.text(child).chars().filter(|c| *c == '.').count(),
                "dotted_name" => path = compact(self.text(child)),
                _ => {}
            }
        }
        ModuleRef { level, path }
    }

    fn expression_statement(&mut self, node: Node<'_>, out: &mut Vec<Entry>, top: bool) {
        let Some(expr) = node.named_child(0) else {
            return;
        };
        match expr.kind() {
            "assignment" => self.assignment(expr, out, top),
            "augmented_assignment" if top => {
                let (Some(left), Some(right)) =
                    (expr.child_by_field_name("left"), expr.child_by_field_name("right"))
                else {
                    return;
                };
                if self.text(left) == "__all__" {
                    if let Some(names) = self.string_sequence(right) {
                        self.module.exports.get_or_insert_with(Vec::new).extend(names);
                    }
                }
            }
            _ => {}
        }
    }

    /// Handles `a = b = value`: every plain-name target gets the binding of
    /// the final right-hand side.
    fn assignment(&mut self, node: Node<'_>, out: &mut Vec<Entry>, top: bool) {
        let mut targets = Vec::new();
        let mut current = node;
        let value = loop {
            if let Some(left) = current.child_by_field_name("left") {
                if left.kind() == "identifier" {
                    targets.push(self.text(left).to_string());
                }
            }
            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                other => break other,
            }
        };

        let binding = match value {
            Some(value) => match value.kind() {
                "identifier" | "attribute" => {
                    self.dotted(value).map_or(Binding::Data, Binding::Alias)
                }
                "call" => value
                    .child_by_field_name("function")
                    .and_then(|function| self.dotted(function))
                    .map_or(Binding::Data, Binding::Call),
                _ => Binding::Data,
            },
            None => Binding::Data,
        };

        if top {
            if let Some(value) = value {
                for target in &targets {
                    if target == "__all__" {
                        if let Some(names) = self.string_sequence(value) {
                            self.module.exports = Some(names);
                        }
                    } else if let Some(literal) = self.string_literal(value) {
                        self.module.constants.insert(target.clone(), literal);
                    } else {
                        self.module.constants.remove(target);
                    }
                }
            }
        }

        for name in targets {
            out.push(Entry::Bind { seq: self.seq(), name, binding: binding.clone() });
        }
    }

    /// `a`, `a.b.c` as name segments; `None` for any other expression.
    fn dotted(&self, node: Node<'_>) -> Option<Vec<String>> {
        match node.kind() {
            "identifier" => Some(vec![self.text(node).to_string()]),
            "dotted_name" => Some(compact(self.text(node)).split('.').map(String::from).collect()),
            "attribute" => {
                let mut parts = self.dotted(node.child_by_field_name("object")?)?;
                parts.push(self.text(node.child_by_field_name("attribute")?).to_string());
                Some(parts)
            }
            _ => None,
        }
    }

    /// The value of a plain (non-interpolated) string literal.
    fn string_literal(&self, node: Node<'_>) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let mut cursor = node.walk();
        if node.named_children(&mut cursor).any(|child| child.kind() == "interpolation") {
            return None;
        }
        let text = self.text(node);
        let unprefixed = text.trim_start_matches(|c: char| "rRbBuU".contains(c));
        for quote in ["\"\"\"", "'''", "\"", "'"] {
            if let Some(inner) =
                unprefixed.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote))
            {
                return Some(inner.to_string());
            }
        }
        None
    }

    /// Items of a list or tuple made only of string literals.
    fn string_sequence(&self, node: Node<'_>) -> Option<Vec<String>> {
        if !matches!(node.kind(), "list" | "tuple") {
            return None;
        }
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|item| item.kind() != "comment")
            .map(|item| self.string_literal(item))
            .collect()
    }
}

/// Blocks executed as part of an `if`/`try`/`with` statement, including
/// `elif`/`else`/`except`/`finally` clauses.
fn nested_blocks(node: Node<'_>) -> Vec<Node<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block" => blocks.push(child),
            "elif_clause" | "else_clause" | "except_clause" | "except_group_clause"
            | "finally_clause" => blocks.extend(nested_blocks(child)),
            _ => {}
        }
    }
    blocks
}

/// Whether a function body yields, ignoring nested scopes.
fn contains_yield(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().any(|child| match child.kind() {
        "yield" => true,
        "function_definition" | "lambda" | "class_definition" | "decorated_definition" => false,
        _ => contains_yield(child),
    })
}

/// Removes whitespace inside a dotted name (`a . b` is legal Python).
fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
