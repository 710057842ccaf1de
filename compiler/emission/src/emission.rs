use std::fs::File;
use std::io::{BufWriter, Write};

use lir::*;

use crate::EmitError;

type EmitResult = Result<(), EmitError>;

/// Write NASM assembly for `assm` to the file at `path`
pub fn output(path: &str, assm: &Program) -> EmitResult {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);

    emit(&mut writer, assm)?;

    writer.flush()?;

    Ok(())
}

pub fn emit<W: Write>(writer: &mut W, assm: &Program) -> EmitResult {
    writeln!(writer, "section .text")?;
    writeln!(writer, "global {}", assm.func.name)?;

    emit_func(writer, &assm.func)?;
    emit_stack_note(writer)?;

    Ok(())
}

fn emit_func<W: Write>(writer: &mut W, func: &Func) -> EmitResult {
    writeln!(writer, "{}:", func.name)?;
    writeln!(writer, "\tpush rbp")?;
    writeln!(writer, "\tmov rbp, rsp")?;

    for instruction in &func.instructions {
        emit_instruction(writer, instruction)?;
    }

    Ok(())
}

fn emit_instruction<W: Write>(writer: &mut W, instruction: &Instruction) -> EmitResult {
    match instruction {
        Instruction::Mov { src, dest } => writeln!(
            writer,
            "\tmov {}, {}",
            show_operand(dest)?,
            show_operand(src)?
        )?,
        Instruction::Unary { op, dest } => {
            writeln!(writer, "\t{} {}", show_unary(op), show_operand(dest)?)?
        }
        Instruction::Binary { op, src, dest } => writeln!(
            writer,
            "\t{} {}, {}",
            show_binary(op),
            show_operand(dest)?,
            show_operand(src)?
        )?,
        Instruction::Idiv(op) => writeln!(writer, "\tidiv {}", show_operand(op)?)?,
        Instruction::Cdq => writeln!(writer, "\tcdq")?,
        Instruction::AllocateStack(amt) => writeln!(writer, "\tsub rsp, {}", amt)?,
        Instruction::Ret => {
            writeln!(writer, "\tmov rsp, rbp")?;
            writeln!(writer, "\tpop rbp")?;
            writeln!(writer, "\tret")?
        }
    }

    Ok(())
}

fn show_unary(op: &UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "neg",
        UnaryOp::Not => "not",
    }
}

fn show_binary(op: &BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mult => "imul",
    }
}

fn show_reg(reg: &Register) -> &'static str {
    match reg {
        Register::AX => "eax",
        Register::DX => "edx",
        Register::R10 => "r10d",
        Register::R11 => "r11d",
    }
}

fn show_operand(op: &Operand) -> Result<String, EmitError> {
    match op {
        Operand::Register(reg) => Ok(show_reg(reg).to_string()),
        Operand::Stack(offset) => Ok(format!("dword [rbp - {}]", offset.abs())),
        Operand::Imm(val) => Ok(val.to_string()),
        Operand::Pseudo(name) => Err(EmitError::PseudoOperand(name.clone())),
    }
}

fn emit_stack_note<W: Write>(writer: &mut W) -> EmitResult {
    writeln!(writer, "section .note.GNU-stack noexec")?;
    Ok(())
}
