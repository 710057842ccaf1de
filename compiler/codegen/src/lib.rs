use log::debug;
use thiserror::Error;

use lir::*;
use mir::tacky;

pub use crate::fix_instructions::fix_invalid_instructions;

mod fix_instructions;
mod replace_pseudoregisters;

/// Broken pipeline invariants. These indicate a compiler defect, never bad user input.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Internal Error: AllocateStack found before stack frame size was computed")]
    UnexpectedAllocateStack,
    #[error("Internal Error: pseudo-register '{0}' survived stack slot assignment")]
    UnresolvedPseudo(String),
}

/// Lower TACKY into assembly with every pseudo-register placed on the stack
/// and every instruction in a form x86-64 accepts
pub fn gen_assm(tacky: &tacky::TranslationUnit) -> Result<Program, CodegenError> {
    let prog = select_instructions(tacky);

    fix_invalid_instructions(&prog)
}

/// Naive instruction selection, temporaries become pseudo-registers
pub fn select_instructions(tacky: &tacky::TranslationUnit) -> Program {
    Program {
        func: gen_func(&tacky.func),
    }
}

fn gen_func(func: &tacky::Func) -> Func {
    let instructions = gen_instructions(&func.instructions);

    debug!(
        "selected {} instructions for '{}'",
        instructions.len(),
        func.name
    );

    Func {
        name: func.name.clone(),
        instructions,
    }
}

fn gen_instructions(instructions: &[tacky::Instruction]) -> Vec<Instruction> {
    let mut assm_instr = vec![];

    for i in instructions {
        match i {
            tacky::Instruction::Return(val) => {
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(val),
                    dest: Operand::Register(Register::AX),
                });
                assm_instr.push(Instruction::Ret);
            }
            tacky::Instruction::Unary { op, src, dest } => {
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(src),
                    dest: gen_operand(dest),
                });
                assm_instr.push(Instruction::Unary {
                    op: gen_unary(op),
                    dest: gen_operand(dest),
                });
            }
            tacky::Instruction::Binary {
                op: op @ (tacky::BinaryOp::Divide | tacky::BinaryOp::Remainder),
                first,
                second,
                dest,
            } => {
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(first),
                    dest: Operand::Register(Register::AX),
                });
                assm_instr.push(Instruction::Cdq);
                assm_instr.push(Instruction::Idiv(gen_operand(second)));

                // idiv leaves the quotient in eax and the remainder in edx
                let result = match op {
                    tacky::BinaryOp::Divide => Register::AX,
                    _ => Register::DX,
                };
                assm_instr.push(Instruction::Mov {
                    src: Operand::Register(result),
                    dest: gen_operand(dest),
                });
            }
            tacky::Instruction::Binary {
                op,
                first,
                second,
                dest,
            } => {
                assm_instr.push(Instruction::Mov {
                    src: gen_operand(first),
                    dest: gen_operand(dest),
                });
                assm_instr.push(Instruction::Binary {
                    op: gen_binary(op),
                    src: gen_operand(second),
                    dest: gen_operand(dest),
                });
            }
        }
    }

    assm_instr
}

fn gen_unary(operator: &tacky::UnaryOp) -> UnaryOp {
    match operator {
        tacky::UnaryOp::Complement => UnaryOp::Not,
        tacky::UnaryOp::Negate => UnaryOp::Neg,
    }
}

fn gen_binary(operator: &tacky::BinaryOp) -> BinaryOp {
    match operator {
        tacky::BinaryOp::Add => BinaryOp::Add,
        tacky::BinaryOp::Subtract => BinaryOp::Sub,
        tacky::BinaryOp::Multiply => BinaryOp::Mult,
        tacky::BinaryOp::Divide | tacky::BinaryOp::Remainder => {
            unreachable!("Internal Error: {:?} is lowered through idiv", operator)
        }
    }
}

fn gen_operand(operand: &tacky::Val) -> Operand {
    match operand {
        tacky::Val::Constant(val) => Operand::Imm(*val),
        tacky::Val::Var(var) => Operand::Pseudo(var.clone()),
    }
}

/// Round `x` to a multiple of `alignment`, moving away from zero
pub(crate) fn round_away_from_zero(alignment: i32, x: i32) -> i32 {
    let rem = x % alignment;

    if rem == 0 {
        x
    } else if x < 0 {
        x - alignment - rem
    } else {
        x + alignment - rem
    }
}
