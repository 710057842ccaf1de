pub use lir_def::*;

mod lir_def;
pub mod symbol_table;
