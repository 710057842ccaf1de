pub use print_tacky::{debug_tacky, write_tacky};
pub use tacky_gen::{gen_tacky, TackyGen};

pub mod tacky;
mod print_tacky;
mod tacky_gen;
