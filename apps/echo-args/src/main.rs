#![no_main]

use std::io::{self, Write as _};

use stack_args::{render::Quoted, ArgView};

/// 受け取った引数 (先頭は必ず起動されたプログラムのパス) をクォートで囲んで 1 行に表示する。
#[stack_args::main]
fn better_main(args: &[ArgView<'_>]) -> i32 {
    let mut out = io::stdout().lock();
    let written = Quoted(args)
        .write_to(&mut out)
        .and_then(|()| out.write_all(b"\n"))
        // no_main ではランタイムが終了時に flush しない
        .and_then(|()| out.flush());

    match written {
        Ok(()) => 0,
        Err(e) => {
            log::error!("failed to write arguments: {}", e);
            1
        }
    }
}
