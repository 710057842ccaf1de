use log::debug;

use unique_ident::UniqueIdent;

use crate::tacky;
use crate::tacky::{Instruction, Val};

pub fn gen_tacky(ast: &ast::TranslationUnit) -> tacky::TranslationUnit {
    TackyGen::new().gen(ast)
}

/// Lowers one AST into TACKY. Owns the temporary counter for a single compilation.
#[derive(Debug, Default)]
pub struct TackyGen {
    names: UniqueIdent,
}

impl TackyGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gen(&mut self, ast: &ast::TranslationUnit) -> tacky::TranslationUnit {
        tacky::TranslationUnit {
            func: self.tacky_func(&ast.func),
        }
    }

    fn tacky_func(&mut self, func: &ast::Func) -> tacky::Func {
        let mut instructions = vec![];

        self.tacky_stmt(&func.body, &mut instructions);

        debug!(
            "generated {} TACKY instructions for '{}'",
            instructions.len(),
            func.ident
        );

        tacky::Func {
            name: func.ident.clone(),
            instructions,
        }
    }

    fn tacky_stmt(&mut self, stmt: &ast::Stmt, instructions: &mut Vec<Instruction>) {
        match stmt {
            ast::Stmt::Return { expr } => {
                let value = self.tacky_expr(expr, instructions);
                instructions.push(Instruction::Return(value));
            }
        }
    }

    /// Appends the instructions computing `expr` and returns where its result lives
    fn tacky_expr(&mut self, expr: &ast::Expr, instructions: &mut Vec<Instruction>) -> Val {
        match expr {
            ast::Expr::Constant(val) => Val::Constant(*val),
            ast::Expr::Unary { op, expr } => {
                let src = self.tacky_expr(expr, instructions);
                let dest = Val::Var(self.names.make_temp());

                instructions.push(Instruction::Unary {
                    op: tacky_unop(*op),
                    src,
                    dest: dest.clone(),
                });

                dest
            }
            ast::Expr::Binary { op, left, right } => {
                // left operand is fully evaluated before the right one
                let first = self.tacky_expr(left, instructions);
                let second = self.tacky_expr(right, instructions);
                let dest = Val::Var(self.names.make_temp());

                instructions.push(Instruction::Binary {
                    op: tacky_binop(*op),
                    first,
                    second,
                    dest: dest.clone(),
                });

                dest
            }
        }
    }
}

fn tacky_unop(op: ast::UnaryOp) -> tacky::UnaryOp {
    match op {
        ast::UnaryOp::Complement => tacky::UnaryOp::Complement,
        ast::UnaryOp::Negate => tacky::UnaryOp::Negate,
    }
}

fn tacky_binop(op: ast::BinaryOp) -> tacky::BinaryOp {
    match op {
        ast::BinaryOp::Add => tacky::BinaryOp::Add,
        ast::BinaryOp::Subtract => tacky::BinaryOp::Subtract,
        ast::BinaryOp::Multiply => tacky::BinaryOp::Multiply,
        ast::BinaryOp::Divide => tacky::BinaryOp::Divide,
        ast::BinaryOp::Remainder => tacky::BinaryOp::Remainder,
    }
}
