use log::{debug, trace};

use lir::*;

use crate::replace_pseudoregisters::PseudoReplacer;
use crate::{round_away_from_zero, CodegenError};

/// System V requires rsp to stay 16 byte aligned
const STACK_ALIGNMENT: i32 = 16;

/// Place pseudo-registers on the stack, rewrite instructions x86-64 cannot
/// encode and prepend the stack frame allocation
pub fn fix_invalid_instructions(assm: &Program) -> Result<Program, CodegenError> {
    Ok(Program {
        func: fix_func(&assm.func)?,
    })
}

fn fix_func(func: &Func) -> Result<Func, CodegenError> {
    let mut replacer = PseudoReplacer::new();
    let mut fixed_instr = vec![];

    for i in &func.instructions {
        let replaced = replacer.replace_instruction(i)?;
        fix_instruction(replaced, &mut fixed_instr)?;
    }

    let stack_size = round_away_from_zero(STACK_ALIGNMENT, replacer.bytes_required());
    fixed_instr.insert(0, Instruction::AllocateStack(stack_size));

    debug!(
        "'{}' needs a {} byte stack frame, {} instructions after fixup",
        func.name,
        stack_size,
        fixed_instr.len()
    );

    Ok(Func {
        name: func.name.clone(),
        instructions: fixed_instr,
    })
}

fn fix_instruction(
    instruction: Instruction,
    fixed_instr: &mut Vec<Instruction>,
) -> Result<(), CodegenError> {
    check_resolved(&instruction)?;

    match instruction {
        Instruction::Mov {
            src: src @ Operand::Stack(_),
            dest: dest @ Operand::Stack(_),
        } => {
            trace!("splitting memory to memory mov {:?} -> {:?}", src, dest);

            fixed_instr.push(Instruction::Mov {
                src,
                dest: Operand::Register(Register::R10),
            });
            fixed_instr.push(Instruction::Mov {
                src: Operand::Register(Register::R10),
                dest,
            });
        }
        Instruction::Idiv(imm @ Operand::Imm(_)) => {
            trace!("moving idiv operand {:?} into r10d", imm);

            fixed_instr.push(Instruction::Mov {
                src: imm,
                dest: Operand::Register(Register::R10),
            });
            fixed_instr.push(Instruction::Idiv(Operand::Register(Register::R10)));
        }
        Instruction::Binary {
            op: BinaryOp::Mult,
            src,
            dest: dest @ Operand::Stack(_),
        } => {
            trace!("routing imul into {:?} through r11d", dest);

            fixed_instr.push(Instruction::Mov {
                src: dest.clone(),
                dest: Operand::Register(Register::R11),
            });
            fixed_instr.push(Instruction::Binary {
                op: BinaryOp::Mult,
                src,
                dest: Operand::Register(Register::R11),
            });
            fixed_instr.push(Instruction::Mov {
                src: Operand::Register(Register::R11),
                dest,
            });
        }
        Instruction::Binary {
            op: op @ (BinaryOp::Add | BinaryOp::Sub),
            src: src @ Operand::Stack(_),
            dest: dest @ Operand::Stack(_),
        } => {
            trace!("splitting memory to memory {:?}", op);

            fixed_instr.push(Instruction::Mov {
                src,
                dest: Operand::Register(Register::R10),
            });
            fixed_instr.push(Instruction::Binary {
                op,
                src: Operand::Register(Register::R10),
                dest,
            });
        }
        _ => fixed_instr.push(instruction),
    }

    Ok(())
}

fn check_resolved(instruction: &Instruction) -> Result<(), CodegenError> {
    let operands = match instruction {
        Instruction::Mov { src, dest } | Instruction::Binary { src, dest, .. } => vec![src, dest],
        Instruction::Unary { dest, .. } => vec![dest],
        Instruction::Idiv(op) => vec![op],
        Instruction::Cdq | Instruction::AllocateStack(_) | Instruction::Ret => vec![],
    };

    match operands.into_iter().find(|op| matches!(op, Operand::Pseudo(_))) {
        Some(Operand::Pseudo(name)) => Err(CodegenError::UnresolvedPseudo(name.clone())),
        _ => Ok(()),
    }
}
