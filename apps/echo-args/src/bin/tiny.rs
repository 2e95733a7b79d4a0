#![no_main]

use std::io::{self, Write as _};

use stack_args::{render::Quoted, ArgView};

// 4 スロット分しか取らないので、argc が 3 を超えると拒否される
#[stack_args::main(max_arena_bytes = 4 * 16, mode = bump)]
fn main(args: &[ArgView<'_>]) -> i32 {
    let mut out = io::stdout().lock();
    match writeln!(out, "{}", Quoted(args)).and_then(|()| out.flush()) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
