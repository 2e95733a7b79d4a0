use core::fmt::{self, Display, Write as _};
use std::io;

use crate::args::ArgView;

/// 各引数をダブルクォートで囲み、空白 1 つで区切って並べる。末尾に空白は付けない。
///
/// 引数の中のクォートや空白はエスケープしない。
#[derive(Debug, Clone, Copy)]
pub struct Quoted<'s, 'a>(pub &'s [ArgView<'a>]);

impl Quoted<'_, '_> {
    /// バイト列をそのまま `out` に書き込む。改行は付けない。
    pub fn write_to<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (i, arg) in self.0.iter().enumerate() {
            if i != 0 {
                out.write_all(b" ")?;
            }
            out.write_all(b"\"")?;
            out.write_all(arg.as_bytes())?;
            out.write_all(b"\"")?;
        }
        Ok(())
    }
}

/// UTF-8 として不正な部分は U+FFFD として表示する。
impl Display for Quoted<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_char(' ')?;
            }
            write!(f, "\"{}\"", arg)?;
        }
        Ok(())
    }
}
