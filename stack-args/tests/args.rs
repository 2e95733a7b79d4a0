mod common;

use std::{
    ffi::{c_char, CStr},
    mem::MaybeUninit,
    ptr,
};

use common::OwnedArgv;
use stack_args::{
    arena_size_for, with_args, with_args_config, with_args_in, ArenaMode, ArgView, Argv, Code,
    Config,
};

/// 受け取った引数を複製して返す。
fn collect(argv: &OwnedArgv) -> Vec<Vec<u8>> {
    unsafe {
        with_args(argv.argc(), argv.argv(), |args| {
            args.iter().map(|arg| arg.as_bytes().to_vec()).collect()
        })
    }
    .unwrap()
}

fn expected(argv: &OwnedArgv) -> Vec<Vec<u8>> {
    argv.strings().iter().map(|s| s.as_bytes().to_vec()).collect()
}

#[test]
fn test_hello_world() {
    let argv = OwnedArgv::new(["prog", "hello", "world"]);
    assert_eq!(collect(&argv), expected(&argv));

    let len = unsafe {
        with_args(argv.argc(), argv.argv(), |args| {
            assert_eq!(args[0], "prog");
            assert_eq!(args[1], "hello");
            assert_eq!(args[2], "world");
            args.len()
        })
    }
    .unwrap();
    assert_eq!(len, 3);
}

#[test]
fn test_program_path_only() {
    let argv = OwnedArgv::new(["prog"]);
    assert_eq!(collect(&argv), vec![b"prog".to_vec()]);
}

#[test]
fn test_no_arguments_at_all() {
    let argv = OwnedArgv::new(Vec::<String>::new());
    assert!(collect(&argv).is_empty());

    // 負の argc とヌルの argv は空として扱う
    let len = unsafe { with_args(-1, ptr::null(), |args| args.len()) }.unwrap();
    assert_eq!(len, 0);
}

#[test]
fn test_views_point_into_argv() {
    let argv = OwnedArgv::new(["prog", "", "a b", "\"quoted\""]);
    unsafe {
        with_args(argv.argc(), argv.argv(), |args| {
            for (arg, s) in args.iter().zip(argv.strings()) {
                // バイト列は複製されていない
                assert_eq!(arg.as_bytes().as_ptr(), s.as_ptr().cast::<u8>());
                assert_eq!(arg.len(), s.as_bytes().len());
            }
            assert!(args[1].is_empty());
        })
    }
    .unwrap();
}

#[test]
fn test_raw_bytes_are_kept() {
    let argv = OwnedArgv::new([b"prog".to_vec(), vec![0xff, 0xfe, b'x'], "日本語".into()]);
    assert_eq!(collect(&argv), expected(&argv));

    unsafe {
        with_args(argv.argc(), argv.argv(), |args| {
            assert_eq!(args[1].to_str(), None);
            assert_eq!(args[1].to_string(), "\u{FFFD}\u{FFFD}x");
            assert_eq!(args[2].to_str(), Some("日本語"));
            assert_eq!(format!("{:?}", args[1]), "\"\\xff\\xfex\"");
        })
    }
    .unwrap();
}

#[test]
fn test_many_arguments() {
    let argv = OwnedArgv::synthetic(10_000);
    let args = collect(&argv);
    assert_eq!(args.len(), 10_001);
    assert_eq!(args, expected(&argv));
}

#[test]
fn test_more_than_255_arguments_in_bump_mode() {
    let argv = OwnedArgv::synthetic(300);
    let config = Config::DEFAULT.with_mode(ArenaMode::Bump);
    let args = unsafe {
        with_args_config(config, argv.argc(), argv.argv(), |args| {
            args.iter().map(|arg| arg.as_bytes().to_vec()).collect::<Vec<_>>()
        })
    }
    .unwrap();
    assert_eq!(args, expected(&argv));
}

#[test]
fn test_limit_rejects() {
    let argv = OwnedArgv::new(["prog", "a", "b", "c"]);
    let exact = arena_size_for(4).unwrap();

    let config = Config::DEFAULT.with_max_arena_bytes(exact - 1);
    assert_eq!(config.max_args(), 3);
    let e = unsafe { with_args_config(config, argv.argc(), argv.argv(), |_| ()) }.unwrap_err();
    assert_eq!(e.cause(), Code::TooManyArguments);

    let config = Config::DEFAULT.with_max_arena_bytes(exact);
    assert_eq!(config.max_args(), 4);
    let len = unsafe { with_args_config(config, argv.argc(), argv.argv(), |args| args.len()) };
    assert_eq!(len.unwrap(), 4);
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config, Config::DEFAULT);
    assert_eq!(config.mode, ArenaMode::SingleShot);
    assert_eq!(config.max_arena_bytes, 1024 * 1024);
    assert!(config.max_args() > 255);
}

#[repr(align(16))]
struct Region([MaybeUninit<u8>; 128]);

#[test]
fn test_fixed_region() {
    let owned = OwnedArgv::new(["prog", "x", "y"]);
    let mut region = Region([MaybeUninit::uninit(); 128]);
    let size = arena_size_for(3).unwrap();

    let argv = unsafe { Argv::new(owned.argc(), owned.argv()) };
    let joined = with_args_in(&mut region.0[..size], ArenaMode::SingleShot, argv, |args| {
        args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>().join(",")
    })
    .unwrap();
    assert_eq!(joined, "prog,x,y");
}

#[test]
fn test_undersized_region_is_exhausted() {
    let owned = OwnedArgv::new(["prog", "x", "y"]);
    let argv = unsafe { Argv::new(owned.argc(), owned.argv()) };
    let mut region = Region([MaybeUninit::uninit(); 128]);

    // argc 個分より小さい領域は、組み立ての途中で容量不足になる
    let short = 2 * std::mem::size_of::<ArgView<'static>>();
    let e = with_args_in(&mut region.0[..short], ArenaMode::SingleShot, argv, |_| ()).unwrap_err();
    assert_eq!(e.cause(), Code::NoEnoughMemory);
}

#[test]
fn test_argv() {
    let owned = OwnedArgv::new(["prog", "one"]);
    let argv = unsafe { Argv::new(owned.argc(), owned.argv()) };

    assert_eq!(argv.len(), 2);
    assert!(!argv.is_empty());
    assert_eq!(argv.get(1), Some(ArgView::new(b"one")));
    assert_eq!(argv.get(2), None);
    assert_eq!(argv.iter().len(), 2);
    assert_eq!(format!("{:?}", argv), "[\"prog\", \"one\"]");

    let empty = unsafe { Argv::new(0, ptr::null::<*const c_char>()) };
    assert!(empty.is_empty());
    assert_eq!(empty.get(0), None);
}

#[test]
fn test_arg_view() {
    let view = ArgView::from_cstr(c"hello");
    assert_eq!(view, "hello");
    assert_eq!(view, *b"hello".as_slice());
    assert_eq!(view.len(), 5);

    let s: &CStr = c"";
    assert!(ArgView::from_cstr(s).is_empty());
    assert_eq!(std::mem::size_of::<ArgView<'static>>(), std::mem::size_of::<&[u8]>());
}
