//! Type declarations: parsing into descriptors and mapping to output types.
//!
//! Both DB2 column types (`DECIMAL(15,4)`, `VARCHAR(100) FOR BIT DATA`) and
//! COBOL picture clauses (`PIC S9(7)V99 COMP-3`) parse into the same
//! [`TypeDescriptor`], which the mapper resolves to an [`OutputType`].

mod descriptor;
mod mapper;
mod parser;

pub use descriptor::{date_span, time_span, timestamp_span, TypeDescriptor, TypeKind};
pub use mapper::{map_type, output_type, MappedType, OutputType, TypeWarning};
pub use parser::{
    parse_declaration, MAX_BINARY_DIGITS, MAX_LENGTH, MAX_PRECISION, MAX_TIMESTAMP_PRECISION,
};
