use anyhow::Result;

fn main() -> Result<()> {
    ccomp_driver::main()
}
