use log::trace;

use lir::symbol_table::FrameTable;
use lir::*;

use crate::CodegenError;

/// Assigns every pseudo-register a dedicated stack slot, in first-use order
#[derive(Debug)]
pub(crate) struct PseudoReplacer {
    frame: FrameTable,
}

impl PseudoReplacer {
    pub(crate) fn new() -> Self {
        Self {
            frame: FrameTable::new(),
        }
    }

    /// Bytes below rbp needed by the slots handed out so far
    pub(crate) fn bytes_required(&self) -> i32 {
        self.frame.bytes_required()
    }

    pub(crate) fn replace_instruction(
        &mut self,
        instruction: &Instruction,
    ) -> Result<Instruction, CodegenError> {
        let replaced = match instruction {
            Instruction::Mov { src, dest } => {
                let src = self.replace_operand(src);
                let dest = self.replace_operand(dest);
                Instruction::Mov { src, dest }
            }
            Instruction::Unary { op, dest } => Instruction::Unary {
                op: *op,
                dest: self.replace_operand(dest),
            },
            Instruction::Binary { op, src, dest } => {
                let src = self.replace_operand(src);
                let dest = self.replace_operand(dest);
                Instruction::Binary { op: *op, src, dest }
            }
            Instruction::Idiv(op) => Instruction::Idiv(self.replace_operand(op)),
            Instruction::Cdq => Instruction::Cdq,
            Instruction::Ret => Instruction::Ret,
            // frame size is only known once every instruction has been visited
            Instruction::AllocateStack(_) => return Err(CodegenError::UnexpectedAllocateStack),
        };

        Ok(replaced)
    }

    fn replace_operand(&mut self, operand: &Operand) -> Operand {
        match operand {
            Operand::Pseudo(var) => {
                let is_new = self.frame.get(var).is_none();
                let offset = self.frame.slot_for(var);

                if is_new {
                    trace!("assigned '{}' to stack slot {}", var, offset);
                }

                Operand::Stack(offset)
            }
            _ => operand.clone(),
        }
    }
}
