//! Stub generation support: parse script sources into a minimal model and
//! render hollow Java skeletons from it, so a downstream Java compiler can
//! resolve references into script-defined types.

mod model;
mod parser;
mod render;
mod tokens;

pub use model::{SourceType, TypeDef, TypeKind, UnitModel};
pub use parser::{parse_unit, script_class_name};
pub use render::{render_stub, stub_path};
pub use tokens::DynamicTokens;
