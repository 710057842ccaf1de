use std::fs::File;
use std::io::{BufWriter, Write};

use crate::tacky::*;

type IOResult = std::io::Result<()>;

pub fn debug_tacky(program: &TranslationUnit, file_name: String) -> IOResult {
    let output = File::create(file_name)?;
    let mut writer = BufWriter::new(output);

    write_tacky(&mut writer, program)?;

    writer.flush()?;

    Ok(())
}

pub fn write_tacky<W: Write>(writer: &mut W, program: &TranslationUnit) -> IOResult {
    print_func(writer, &program.func)
}

fn print_func<W: Write>(writer: &mut W, func: &Func) -> IOResult {
    writeln!(writer, "{}:", func.name)?;

    for instruction in &func.instructions {
        print_instruction(writer, instruction)?;
    }

    Ok(())
}

fn print_instruction<W: Write>(writer: &mut W, instr: &Instruction) -> IOResult {
    match instr {
        Instruction::Return(val) => {
            writeln!(writer, "\tReturn({})", format_val(val))
        }
        Instruction::Unary { op, src, dest } => {
            writeln!(
                writer,
                "\t{} = {}{}",
                format_val(dest),
                format_unary(op),
                format_val(src)
            )
        }
        Instruction::Binary {
            op,
            first,
            second,
            dest,
        } => {
            writeln!(
                writer,
                "\t{} = {} {} {}",
                format_val(dest),
                format_val(first),
                format_binary(op),
                format_val(second)
            )
        }
    }
}

fn format_val(val: &Val) -> String {
    match val {
        Val::Constant(c) => c.to_string(),
        Val::Var(var) => var.clone(),
    }
}

fn format_unary(op: &UnaryOp) -> &'static str {
    match op {
        UnaryOp::Complement => "~",
        UnaryOp::Negate => "-",
    }
}

fn format_binary(op: &BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Remainder => "%",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_function_listing() {
        let program = TranslationUnit {
            func: Func {
                name: "main".to_string(),
                instructions: vec![
                    Instruction::Unary {
                        op: UnaryOp::Negate,
                        src: Val::Constant(2),
                        dest: Val::Var("tmp.0".to_string()),
                    },
                    Instruction::Binary {
                        op: BinaryOp::Remainder,
                        first: Val::Var("tmp.0".to_string()),
                        second: Val::Constant(4),
                        dest: Val::Var("tmp.1".to_string()),
                    },
                    Instruction::Return(Val::Var("tmp.1".to_string())),
                ],
            },
        };

        let mut out = vec![];
        write_tacky(&mut out, &program).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "main:\n\ttmp.0 = -2\n\ttmp.1 = tmp.0 % 4\n\tReturn(tmp.1)\n"
        );
    }
}
