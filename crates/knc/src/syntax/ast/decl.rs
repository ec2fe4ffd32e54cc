//! Declaration AST nodes

use crate::common::Span;

/// Identity of a lexical node, assigned by the parser in creation order.
/// The resolver keys its descriptor map on this.
pub type NodeId = u32;

/// A parsed compilation unit
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub package: Option<DottedPath>,
    pub imports: Vec<ImportDirective>,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

/// Dot-separated name as written in source: `kotlin.native.concurrent.ThreadLocal`
#[derive(Debug, Clone)]
pub struct DottedPath {
    pub segments: Vec<String>,
    pub span: Span,
}

impl DottedPath {
    pub fn new(segments: Vec<String>, span: Span) -> Self {
        Self { segments, span }
    }

    pub fn join(&self) -> String {
        self.segments.join(".")
    }

    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }
}

/// Import directive: `import a.b.C` or `import a.b.*`
#[derive(Debug, Clone)]
pub struct ImportDirective {
    pub path: DottedPath,
    pub star: bool,
    pub span: Span,
}

/// Annotation as written on a declaration: `@ThreadLocal`, `@Suppress("X")`
///
/// The span covers the `@` and the annotation path (and arguments, if any),
/// which is what diagnostics anchored to the annotation point at.
#[derive(Debug, Clone)]
pub struct AnnotationEntry {
    pub path: DottedPath,
    pub span: Span,
}

/// Declaration node
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}

impl Declaration {
    pub fn new(id: NodeId, kind: DeclKind, span: Span) -> Self {
        Self { id, kind, span }
    }

    /// Nested declarations, in source order
    pub fn members(&self) -> &[Declaration] {
        match &self.kind {
            DeclKind::Class(class) => &class.members,
            DeclKind::EnumEntry(entry) => &entry.members,
            _ => &[],
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Class(class) => class.name.as_deref(),
            DeclKind::EnumEntry(entry) => Some(&entry.name),
            DeclKind::Property(property) => Some(&property.name),
            DeclKind::PropertyParameter(parameter) => Some(&parameter.name),
            DeclKind::Function(function) => Some(&function.name),
        }
    }
}

/// Declaration kinds
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// Class-like declaration: class, interface, object, companion object, enum class
    Class(ClassDecl),

    /// Entry of an enum class, possibly with a body
    EnumEntry(EnumEntryDecl),

    /// Property declaration: `val x = 1`, `var y by lazy { ... }`
    Property(PropertyDecl),

    /// `val`/`var` parameter of a primary constructor (a property, but not a
    /// plain stored property declaration)
    PropertyParameter(ParameterDecl),

    /// Function declaration (body skipped)
    Function(FunctionDecl),
}

/// Which keyword introduced a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKeyword {
    Class,
    Interface,
    Object,
}

/// Declaration modifiers (visibility and others the checker ignores)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Open,
    Abstract,
    Final,
    Sealed,
    Data,
    Override,
    Lateinit,
    Const,
}

/// Class-like declaration
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Absent for anonymous companion objects
    pub name: Option<String>,
    pub keyword: ClassKeyword,
    pub is_enum: bool,
    pub is_companion: bool,
    pub is_annotation: bool,
    pub annotations: Vec<AnnotationEntry>,
    pub modifiers: Vec<Modifier>,
    /// Constructor `val`/`var` parameters, enum entries, and body members,
    /// in source order
    pub members: Vec<Declaration>,
}

/// Enum entry, e.g. `A` or `B(1) { override fun f() {} }`
#[derive(Debug, Clone)]
pub struct EnumEntryDecl {
    pub name: String,
    pub annotations: Vec<AnnotationEntry>,
    pub members: Vec<Declaration>,
}

/// Property declaration
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub is_var: bool,
    pub annotations: Vec<AnnotationEntry>,
    pub modifiers: Vec<Modifier>,
    pub ty: Option<TypeRef>,
    pub initializer: Option<ExprStub>,
    /// `by <expr>` clause; a delegated property stores no state of its own
    pub delegate: Option<ExprStub>,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
}

impl PropertyDecl {
    pub fn is_delegated(&self) -> bool {
        self.delegate.is_some()
    }
}

/// Primary constructor parameter with `val`/`var`
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub name: String,
    pub is_var: bool,
    pub annotations: Vec<AnnotationEntry>,
    pub ty: Option<TypeRef>,
    pub default: Option<ExprStub>,
}

/// Function declaration; the body is parsed but not represented
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub annotations: Vec<AnnotationEntry>,
    pub modifiers: Vec<Modifier>,
}

/// Type reference, kept as written
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub text: String,
    pub span: Span,
}

/// An expression the checkers never look inside; only its extent matters
#[derive(Debug, Clone, Copy)]
pub struct ExprStub {
    pub span: Span,
}

/// Property accessor clause: `get`, `set`, `get() = ...`, `set(value) { ... }`
///
/// An accessor written without a body (e.g. `private set`) still counts as
/// user-declared for setter-defaultness, but does not replace the backing
/// field the way a bodied accessor can.
#[derive(Debug, Clone)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub has_body: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}
