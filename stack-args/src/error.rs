use core::fmt::{self, Display};

/// エラーの原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Code {
    /// アリーナの残り容量が要求に足りない。
    NoEnoughMemory,
    /// 1 回しか割り当てを許さないアリーナに、2 回目の要求があった。
    AlreadyAllocated,
    /// コンテナの容量を使い切っている。
    Full,
    /// 引数が多過ぎてスタック上に領域を確保できない。
    TooManyArguments,
}

impl Code {
    /// このエラーでプロセスが終了するときの終了ステータス。
    pub const fn exit_status(self) -> i32 {
        match self {
            // ENOMEM
            Self::NoEnoughMemory => 12,
            // E2BIG
            Self::TooManyArguments => 7,
            // EX_SOFTWARE
            Self::AlreadyAllocated | Self::Full => 70,
        }
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnoughMemory => write!(f, "NoEnoughMemory"),
            Self::AlreadyAllocated => write!(f, "AlreadyAllocated"),
            Self::Full => write!(f, "Full"),
            Self::TooManyArguments => write!(f, "TooManyArguments"),
        }
    }
}

/// エラーの原因と発生箇所。[make_error] で作る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    code: Code,
    line: u32,
    file: &'static str,
}

impl Error {
    pub const fn new(code: Code, file: &'static str, line: u32) -> Self {
        Self { code, line, file }
    }

    pub const fn cause(&self) -> Code {
        self.code
    }

    pub const fn file(&self) -> &str {
        self.file
    }

    pub const fn line(&self) -> u32 {
        self.line
    }

    pub const fn exit_status(&self) -> i32 {
        self.code.exit_status()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} at {}", self.code, self.file, self.line)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

/// 呼び出した場所のファイル名と行番号を付けて [Error] を作る。
#[macro_export]
macro_rules! make_error {
    ($code:expr) => {
        $crate::error::Error::new($code, file!(), line!())
    };
}

