#![allow(dead_code)]

use std::ffi::{c_char, c_int, CString};

use rand::{distributions::Alphanumeric, Rng as _};

/// テスト用に `argc`, `argv` を所有する。
pub struct OwnedArgv {
    strings: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl OwnedArgv {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let strings: Vec<CString> = args
            .into_iter()
            .map(|s| CString::new(s).expect("argument contains a nul byte"))
            .collect();
        let mut ptrs: Vec<*const c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        // C の argv と同じくヌルで終端する
        ptrs.push(std::ptr::null());
        Self { strings, ptrs }
    }

    /// `prog` の後ろに英数字の引数を `n` 個並べる。
    pub fn synthetic(n: usize) -> Self {
        let mut rng = rand::thread_rng();
        let args = std::iter::once("prog".to_string()).chain((0..n).map(|i| {
            let len = rng.gen_range(0..12);
            let body: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect();
            format!("{i}-{body}")
        }));
        Self::new(args)
    }

    pub fn argc(&self) -> c_int {
        self.strings.len() as c_int
    }

    pub fn argv(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }

    pub fn strings(&self) -> &[CString] {
        &self.strings
    }
}
