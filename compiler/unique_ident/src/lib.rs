/// Hands out temporary names that are unique within one compilation.
/// Each compilation owns its own generator, so numbering restarts at `tmp.0`.
#[derive(Debug, Default)]
pub struct UniqueIdent {
    temp_counter: usize,
}

impl UniqueIdent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_temp(&mut self) -> String {
        let name = format!("tmp.{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }
}
