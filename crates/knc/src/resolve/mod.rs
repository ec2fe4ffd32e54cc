//! Resolution layer: descriptors and the symbol-graph builder
//!
//! Produces the read-only resolved view the checkers consume. The checkers
//! themselves never resolve anything; they only query what is built here.

mod descriptors;
mod name;
mod resolver;

pub use descriptors::{
    AnnotationInstance, Annotations, ClassDescriptor, ClassId, ClassKind, Descriptor,
    FunctionDescriptor, FunctionId, PropertyDescriptor, PropertyId, PropertySetter, ResolvedUnit,
};
pub use name::{NameId, NameTable};
pub use resolver::Resolver;
