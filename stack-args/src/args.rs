use core::{
    ffi::{c_char, c_int, CStr},
    fmt::{self, Debug, Display, Write as _},
    slice, str,
};

/// コマンドライン引数 1 つ分への参照。バイト列を複製せずに指すだけ。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ArgView<'a> {
    bytes: &'a [u8],
}

impl<'a> ArgView<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// 終端のヌル文字を除いた部分を指す。
    pub fn from_cstr(s: &'a CStr) -> Self {
        Self::new(s.to_bytes())
    }

    /// # Safety
    ///
    /// `ptr` は `'a` の間有効なヌル終端文字列を指していなければならない。
    pub unsafe fn from_ptr(ptr: *const c_char) -> Self {
        Self::from_cstr(unsafe { CStr::from_ptr(ptr) })
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// UTF-8 として正しければ `&str` として返す。
    pub fn to_str(&self) -> Option<&'a str> {
        str::from_utf8(self.bytes).ok()
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// UTF-8 として不正な部分は U+FFFD に置き換えて表示する。
impl Display for ArgView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.bytes.utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl Debug for ArgView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.bytes.escape_ascii())
    }
}

impl PartialEq<[u8]> for ArgView<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<str> for ArgView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for ArgView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

/// プラットフォームから渡される `argc`, `argv` を表す構造体。
#[derive(Clone, Copy)]
pub struct Argv<'a> {
    ptrs: &'a [*const c_char],
}

impl<'a> Argv<'a> {
    /// `argc`, `argv` から [Argv] を構成する。
    /// `argc` が負の場合や `argv` がヌルの場合は空として扱う。
    ///
    /// # Safety
    ///
    /// `argv` はヌル終端された文字列へのポインタの配列へのポインタでなければならない。
    /// また、`argv` が指す配列の長さは `argc` 以上で、各文字列は `'a` の間有効でなければならない。
    pub unsafe fn new(argc: c_int, argv: *const *const c_char) -> Self {
        let len = usize::try_from(argc).unwrap_or(0);
        if len == 0 || argv.is_null() {
            return Self { ptrs: &[] };
        }
        let ptrs = unsafe { slice::from_raw_parts(argv, len) };
        Self { ptrs }
    }

    /// コマンドライン引数の数を返す。
    pub fn len(&self) -> usize {
        self.ptrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ptrs.is_empty()
    }

    /// `index` 番目の引数が存在すればそれを返す。
    pub fn get(&self, index: usize) -> Option<ArgView<'a>> {
        self.ptrs
            .get(index)
            .map(|&ptr| unsafe { ArgView::from_ptr(ptr) })
    }

    /// 0 番目から順に [ArgView] を返す [Iterator] に変換する。
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ArgView<'a>> + 'a {
        let ptrs: &'a [*const c_char] = self.ptrs;
        ptrs.iter()
            .map(|&ptr| unsafe { ArgView::from_ptr(ptr) })
    }
}

impl Debug for Argv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
