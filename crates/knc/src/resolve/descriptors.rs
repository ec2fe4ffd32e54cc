//! Resolved symbol descriptors
//!
//! Descriptors are the semantic view of declarations after resolution:
//! which kind of class-like thing a declaration is, who contains it, which
//! annotations it carries, and the property facts (mutability, backing
//! field, setter) the checkers ask about. The graph is built once by the
//! resolver and is read-only from then on.

use super::name::{NameId, NameTable};
use crate::common::Span;
use crate::syntax::ast::NodeId;
use std::collections::HashMap;

/// Index of a class-like descriptor in its `ResolvedUnit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

/// Index of a property descriptor in its `ResolvedUnit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(u32);

/// Index of a function descriptor in its `ResolvedUnit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

/// Resolved descriptor for one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    Class(ClassId),
    Property(PropertyId),
    Function(FunctionId),
}

/// Classification of class-like declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    EnumClass,
    EnumEntry,
    Object,
    CompanionObject,
    AnnotationClass,
}

impl ClassKind {
    pub fn is_enum_class(self) -> bool {
        matches!(self, ClassKind::EnumClass)
    }

    /// Kinds whose instances are process-wide singletons: object
    /// declarations, companion objects, and enum entries
    pub fn is_singleton(self) -> bool {
        matches!(
            self,
            ClassKind::Object | ClassKind::CompanionObject | ClassKind::EnumEntry
        )
    }
}

/// Resolved annotation on a declaration
///
/// The span is the annotation's own source location when the syntax provides
/// one; diagnostics prefer it over the owning declaration's span.
#[derive(Debug, Clone)]
pub struct AnnotationInstance {
    pub fq_name: NameId,
    pub span: Option<Span>,
}

/// Annotation set of a declaration
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: Vec<AnnotationInstance>,
}

impl Annotations {
    pub fn new(entries: Vec<AnnotationInstance>) -> Self {
        Self { entries }
    }

    pub fn find(&self, name: NameId) -> Option<&AnnotationInstance> {
        self.entries.iter().find(|entry| entry.fq_name == name)
    }

    /// Find an annotation by fully-qualified name text
    pub fn find_named<'a>(
        &'a self,
        names: &NameTable,
        fq_name: &str,
    ) -> Option<&'a AnnotationInstance> {
        let id = names.get(fq_name)?;
        self.find(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationInstance> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved class-like declaration
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: Option<String>,
    pub kind: ClassKind,
    pub annotations: Annotations,
    pub containing: Option<ClassId>,
}

/// Setter of a mutable property
#[derive(Debug, Clone, Copy)]
pub struct PropertySetter {
    /// True when the setter is compiler-generated, with no user-supplied
    /// accessor clause in the source
    pub is_default: bool,
}

/// Resolved property declaration
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub containing: Option<ClassId>,
    pub is_var: bool,
    /// Whether the property stores state directly, as opposed to being
    /// fully computed or delegate-backed
    pub has_backing_field: bool,
    /// `None` for `val` properties
    pub setter: Option<PropertySetter>,
}

/// Resolved function declaration; carried so the traversal sees descriptors
/// no rule family matches
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub containing: Option<ClassId>,
}

/// The resolved symbol graph of one compilation unit
#[derive(Debug, Default)]
pub struct ResolvedUnit {
    pub names: NameTable,
    classes: Vec<ClassDescriptor>,
    properties: Vec<PropertyDescriptor>,
    functions: Vec<FunctionDescriptor>,
    by_node: HashMap<NodeId, Descriptor>,
}

impl ResolvedUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_class(&mut self, descriptor: ClassDescriptor) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(descriptor);
        id
    }

    pub(crate) fn add_property(&mut self, descriptor: PropertyDescriptor) -> PropertyId {
        let id = PropertyId(self.properties.len() as u32);
        self.properties.push(descriptor);
        id
    }

    pub(crate) fn add_function(&mut self, descriptor: FunctionDescriptor) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(descriptor);
        id
    }

    pub(crate) fn record(&mut self, node: NodeId, descriptor: Descriptor) {
        self.by_node.insert(node, descriptor);
    }

    pub fn class(&self, id: ClassId) -> &ClassDescriptor {
        &self.classes[id.0 as usize]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDescriptor {
        &self.properties[id.0 as usize]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDescriptor {
        &self.functions[id.0 as usize]
    }

    /// Descriptor for a lexical node, if resolution produced one
    pub fn descriptor_for(&self, node: NodeId) -> Option<Descriptor> {
        self.by_node.get(&node).copied()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.iter()
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }
}
