//! `argc`, `argv` から `&[ArgView]` を作り、アプリケーションのメイン関数に渡す。
//!
//! 作った `&[ArgView]` はクロージャの引数としてしか触れないので、
//! 領域を確保したスタックフレームの外へ持ち出すことはできない。

use core::{
    ffi::{c_char, c_int},
    mem::{size_of, MaybeUninit},
};

use crate::{
    arena::{arena_size_for, ArenaMode, StackArena},
    args::{ArgView, Argv},
    config::Config,
    error::{Code, Result},
    logger, make_error,
    vec::ArenaVec,
};

/// [Config::DEFAULT] で [with_args_config] を呼ぶ。
///
/// # Safety
///
/// [Argv::new] と同じ。
pub unsafe fn with_args<R>(
    argc: c_int,
    argv: *const *const c_char,
    f: impl FnOnce(&[ArgView<'_>]) -> R,
) -> Result<R> {
    unsafe { with_args_config(Config::DEFAULT, argc, argv, f) }
}

/// 引数の数から必要な大きさを求めてスタック上に領域を確保し、
/// そこに並べた引数を `f` に渡す。`f` の戻り値はそのまま返す。
///
/// 必要な大きさが `config.max_arena_bytes` を超える場合は [Code::TooManyArguments] を返す。
///
/// # Safety
///
/// [Argv::new] と同じ。
pub unsafe fn with_args_config<R>(
    config: Config,
    argc: c_int,
    argv: *const *const c_char,
    f: impl FnOnce(&[ArgView<'_>]) -> R,
) -> Result<R> {
    let argv = unsafe { Argv::new(argc, argv) };
    let size = match arena_size_for(argv.len()) {
        Some(size) if size <= config.max_arena_bytes => size,
        _ => return Err(make_error!(Code::TooManyArguments)),
    };

    alloca::with_alloca(size, |region| with_args_in(region, config.mode, argv, f))
}

/// 呼び出し側が用意した `region` をアリーナにして引数を並べ、`f` に渡す。
///
/// 領域の予約は [ArenaVec::reserve_exact] の 1 回だけで、
/// [ArenaMode::SingleShot] のアリーナでもそのまま通る。
/// `region` が [arena_size_for] より小さい場合は [Code::NoEnoughMemory] になる。
pub fn with_args_in<R>(
    region: &mut [MaybeUninit<u8>],
    mode: ArenaMode,
    argv: Argv<'_>,
    f: impl FnOnce(&[ArgView<'_>]) -> R,
) -> Result<R> {
    let arena = StackArena::with_mode(region, mode);
    let mut args = ArenaVec::new_in(&arena);
    args.reserve_exact(argv.len())?;
    for arg in argv.iter() {
        args.push(arg)?;
    }

    Ok(f(args.as_slice()))
}

/// [Config::DEFAULT] で [start_with] を呼ぶ。
///
/// # Safety
///
/// [Argv::new] と同じ。
pub unsafe fn start(
    argc: c_int,
    argv: *const *const c_char,
    main: fn(&[ArgView<'_>]) -> i32,
) -> c_int {
    unsafe { start_with(Config::DEFAULT, argc, argv, main) }
}

/// [main][crate::main] 属性が生成するエントリポイントから呼ばれる。
///
/// ロガーを初期化し、`main` の戻り値をそのままプロセスの終了ステータスとして返す。
/// 引数の領域を確保できなかった場合は [Error::exit_status][crate::Error::exit_status] を返す。
///
/// # Safety
///
/// [Argv::new] と同じ。
pub unsafe fn start_with(
    config: Config,
    argc: c_int,
    argv: *const *const c_char,
    main: fn(&[ArgView<'_>]) -> i32,
) -> c_int {
    logger::init();
    log::debug!(
        "argc: {}, size_of::<ArgView>(): {}",
        argc,
        size_of::<ArgView<'static>>()
    );

    match unsafe { with_args_config(config, argc, argv, main) } {
        Ok(status) => status,
        Err(e) => {
            log::error!("failed to collect {} arguments: {}", argc, e);
            e.exit_status()
        }
    }
}
