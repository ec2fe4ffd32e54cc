//! Builds the resolved symbol graph from the declaration AST

use super::descriptors::{
    AnnotationInstance, Annotations, ClassDescriptor, ClassId, ClassKind, Descriptor,
    FunctionDescriptor, PropertyDescriptor, PropertySetter, ResolvedUnit,
};
use crate::syntax::ast::{
    AnnotationEntry, ClassDecl, ClassKeyword, DeclKind, Declaration, DottedPath, PropertyDecl,
    SourceFile,
};

/// Resolver for one source file
///
/// Walks the declaration tree once, creating a descriptor per declaration
/// and recording containment. Resolution is total: it cannot fail, and
/// unresolvable names simply stay unresolvable.
pub struct Resolver<'a> {
    file: &'a SourceFile,
    unit: ResolvedUnit,
}

impl<'a> Resolver<'a> {
    /// Resolve all declarations of a file into a fresh unit
    pub fn resolve(file: &'a SourceFile) -> ResolvedUnit {
        let mut resolver = Resolver {
            file,
            unit: ResolvedUnit::new(),
        };
        for declaration in &file.declarations {
            resolver.resolve_declaration(declaration, None);
        }
        resolver.unit
    }

    fn resolve_declaration(&mut self, declaration: &Declaration, containing: Option<ClassId>) {
        match &declaration.kind {
            DeclKind::Class(class) => {
                let annotations = self.resolve_annotations(&class.annotations);
                let id = self.unit.add_class(ClassDescriptor {
                    name: class.name.clone(),
                    kind: class_kind(class),
                    annotations,
                    containing,
                });
                self.unit.record(declaration.id, Descriptor::Class(id));
                for member in &class.members {
                    self.resolve_declaration(member, Some(id));
                }
            }

            DeclKind::EnumEntry(entry) => {
                let annotations = self.resolve_annotations(&entry.annotations);
                let id = self.unit.add_class(ClassDescriptor {
                    name: Some(entry.name.clone()),
                    kind: ClassKind::EnumEntry,
                    annotations,
                    containing,
                });
                self.unit.record(declaration.id, Descriptor::Class(id));
                for member in &entry.members {
                    self.resolve_declaration(member, Some(id));
                }
            }

            DeclKind::Property(property) => {
                let id = self.unit.add_property(PropertyDescriptor {
                    name: property.name.clone(),
                    containing,
                    is_var: property.is_var,
                    has_backing_field: has_backing_field(property),
                    setter: property.is_var.then(|| PropertySetter {
                        is_default: property.setter.is_none(),
                    }),
                });
                self.unit.record(declaration.id, Descriptor::Property(id));
            }

            DeclKind::PropertyParameter(parameter) => {
                // A val/var constructor parameter always stores its value
                let id = self.unit.add_property(PropertyDescriptor {
                    name: parameter.name.clone(),
                    containing,
                    is_var: parameter.is_var,
                    has_backing_field: true,
                    setter: parameter
                        .is_var
                        .then(|| PropertySetter { is_default: true }),
                });
                self.unit.record(declaration.id, Descriptor::Property(id));
            }

            DeclKind::Function(function) => {
                let id = self.unit.add_function(FunctionDescriptor {
                    name: function.name.clone(),
                    containing,
                });
                self.unit.record(declaration.id, Descriptor::Function(id));
            }
        }
    }

    fn resolve_annotations(&mut self, entries: &[AnnotationEntry]) -> Annotations {
        let instances = entries
            .iter()
            .map(|entry| {
                let fq_name = self.expand_annotation_path(&entry.path);
                AnnotationInstance {
                    fq_name: self.unit.names.intern(&fq_name),
                    span: Some(entry.span),
                }
            })
            .collect();
        Annotations::new(instances)
    }

    /// Expand an annotation name as written to a fully-qualified name.
    ///
    /// Qualified paths are taken verbatim. A simple name resolves through an
    /// explicit import with a matching last segment, then through the first
    /// star import; otherwise it stays bare and cannot match any
    /// fully-qualified constant.
    fn expand_annotation_path(&self, path: &DottedPath) -> String {
        if !path.is_simple() {
            return path.join();
        }
        let simple = path.last();

        for import in &self.file.imports {
            if !import.star && import.path.last() == simple {
                return import.path.join();
            }
        }
        if let Some(star) = self.file.imports.iter().find(|import| import.star) {
            return format!("{}.{}", star.path.join(), simple);
        }
        simple.to_string()
    }
}

fn class_kind(class: &ClassDecl) -> ClassKind {
    if class.is_enum {
        ClassKind::EnumClass
    } else if class.is_annotation {
        ClassKind::AnnotationClass
    } else if class.is_companion {
        ClassKind::CompanionObject
    } else {
        match class.keyword {
            ClassKeyword::Class => ClassKind::Class,
            ClassKeyword::Interface => ClassKind::Interface,
            ClassKeyword::Object => ClassKind::Object,
        }
    }
}

/// Whether a property stores state directly.
///
/// A delegated property never has a field of its own. Otherwise an
/// initializer forces a field, and a property whose every accessor is
/// user-written with a body is fully computed.
fn has_backing_field(property: &PropertyDecl) -> bool {
    if property.is_delegated() {
        return false;
    }
    if property.initializer.is_some() {
        return true;
    }
    let getter_bodied = property
        .getter
        .as_ref()
        .is_some_and(|accessor| accessor.has_body);
    let setter_bodied = property
        .setter
        .as_ref()
        .is_some_and(|accessor| accessor.has_body);
    if property.is_var {
        !(getter_bodied && setter_bodied)
    } else {
        !getter_bodied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Parser;

    fn resolve(source: &str) -> (SourceFile, ResolvedUnit) {
        let mut parser = Parser::new(source);
        let file = parser.parse_file().unwrap();
        let unit = Resolver::resolve(&file);
        (file, unit)
    }

    fn single_class(file: &SourceFile, unit: &ResolvedUnit) -> ClassId {
        match unit.descriptor_for(file.declarations[0].id) {
            Some(Descriptor::Class(id)) => id,
            other => panic!("expected class descriptor, got {:?}", other),
        }
    }

    #[test]
    fn test_class_kinds() {
        let (file, unit) = resolve(
            "class A\ninterface B\nobject C\nenum class D { X }\nannotation class E",
        );

        let kinds: Vec<ClassKind> = file
            .declarations
            .iter()
            .map(|declaration| match unit.descriptor_for(declaration.id) {
                Some(Descriptor::Class(id)) => unit.class(id).kind,
                other => panic!("expected class descriptor, got {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ClassKind::Class,
                ClassKind::Interface,
                ClassKind::Object,
                ClassKind::EnumClass,
                ClassKind::AnnotationClass,
            ]
        );
    }

    #[test]
    fn test_companion_and_entry_kinds() {
        let (file, unit) = resolve("class H { companion object { } }\nenum class E { A }");

        let holder = single_class(&file, &unit);
        let companion = match unit.descriptor_for(file.declarations[0].members()[0].id) {
            Some(Descriptor::Class(id)) => unit.class(id),
            other => panic!("expected class descriptor, got {:?}", other),
        };
        assert_eq!(companion.kind, ClassKind::CompanionObject);
        assert_eq!(companion.containing, Some(holder));
        assert!(companion.kind.is_singleton());

        let entry = match unit.descriptor_for(file.declarations[1].members()[0].id) {
            Some(Descriptor::Class(id)) => unit.class(id),
            other => panic!("expected class descriptor, got {:?}", other),
        };
        assert_eq!(entry.kind, ClassKind::EnumEntry);
        assert!(entry.kind.is_singleton());
    }

    #[test]
    fn test_property_facts() {
        let (file, unit) = resolve(
            "object O {\n    var plain = 1\n    val computed get() = 2\n    var custom = 3\n        set(value) { field = value }\n    val delegated by lazy { 4 }\n}",
        );

        let members = file.declarations[0].members();
        let property = |index: usize| match unit.descriptor_for(members[index].id) {
            Some(Descriptor::Property(id)) => unit.property(id),
            other => panic!("expected property descriptor, got {:?}", other),
        };

        let plain = property(0);
        assert!(plain.is_var);
        assert!(plain.has_backing_field);
        assert!(plain.setter.unwrap().is_default);

        let computed = property(1);
        assert!(!computed.is_var);
        assert!(!computed.has_backing_field);
        assert!(computed.setter.is_none());

        let custom = property(2);
        assert!(custom.has_backing_field);
        assert!(!custom.setter.unwrap().is_default);

        let delegated = property(3);
        assert!(!delegated.has_backing_field);
    }

    #[test]
    fn test_annotation_fq_expansion_via_import() {
        let (file, unit) = resolve(
            "import kotlin.native.concurrent.ThreadLocal\n@ThreadLocal object O",
        );

        let class = unit.class(single_class(&file, &unit));
        assert!(class
            .annotations
            .find_named(&unit.names, "kotlin.native.concurrent.ThreadLocal")
            .is_some());
    }

    #[test]
    fn test_annotation_fq_expansion_via_star_import() {
        let (file, unit) = resolve("import kotlin.native.concurrent.*\n@ThreadLocal object O");

        let class = unit.class(single_class(&file, &unit));
        assert!(class
            .annotations
            .find_named(&unit.names, "kotlin.native.concurrent.ThreadLocal")
            .is_some());
    }

    #[test]
    fn test_qualified_annotation_taken_verbatim() {
        let (file, unit) = resolve("@kotlin.native.concurrent.ThreadLocal object O");

        let class = unit.class(single_class(&file, &unit));
        assert!(class
            .annotations
            .find_named(&unit.names, "kotlin.native.concurrent.ThreadLocal")
            .is_some());
    }

    #[test]
    fn test_unimported_simple_annotation_stays_bare() {
        let (file, unit) = resolve("@ThreadLocal object O");

        let class = unit.class(single_class(&file, &unit));
        assert!(class
            .annotations
            .find_named(&unit.names, "kotlin.native.concurrent.ThreadLocal")
            .is_none());
        assert!(!class.annotations.is_empty());
    }

    #[test]
    fn test_constructor_parameter_properties() {
        let (file, unit) = resolve("class Point(val x: Int, var y: Int)");

        let members = file.declarations[0].members();
        let y = match unit.descriptor_for(members[1].id) {
            Some(Descriptor::Property(id)) => unit.property(id),
            other => panic!("expected property descriptor, got {:?}", other),
        };
        assert!(y.is_var);
        assert!(y.has_backing_field);
        assert!(y.setter.unwrap().is_default);
    }

    #[test]
    fn test_top_level_property_has_no_container() {
        let (file, unit) = resolve("var global = 1");

        let global = match unit.descriptor_for(file.declarations[0].id) {
            Some(Descriptor::Property(id)) => unit.property(id),
            other => panic!("expected property descriptor, got {:?}", other),
        };
        assert!(global.containing.is_none());
    }
}
