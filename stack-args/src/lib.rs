//! コマンドライン引数を、スタック上に確保した領域だけを使って `&[ArgView]` として渡す。
//!
//! ヒープは一切使わない。`argc` に上限は設けず、領域の大きさは `argc` から都度決める。
//! 普通は [main] 属性を `#![no_main]` なクレートのエントリ関数に付けて使う。

pub mod arena;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod logger;
pub mod render;
pub mod vec;

pub use stack_args_macros::main;

pub use arena::{arena_size_for, ArenaMode, MemoryResource, StackArena};
pub use args::{ArgView, Argv};
pub use config::Config;
pub use entry::{start, start_with, with_args, with_args_config, with_args_in};
pub use error::{Code, Error, Result};
pub use vec::ArenaVec;
