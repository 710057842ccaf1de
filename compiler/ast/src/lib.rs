pub use ast_def::*;

mod ast_def;
