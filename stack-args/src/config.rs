use core::mem::size_of;

use crate::{arena::ArenaMode, args::ArgView};

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

/// スタック上に取るアリーナの上限の既定値。
pub const DEFAULT_MAX_ARENA_BYTES: usize = MIB;

/// 引数の領域をどう確保するかの設定。
///
/// スタックは有限なので、必要なバイト数が `max_arena_bytes` を超える場合は確保せずに
/// [TooManyArguments][crate::Code::TooManyArguments] で拒否する。ヒープには切り替えない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_arena_bytes: usize,
    pub mode: ArenaMode,
}

impl Config {
    pub const DEFAULT: Self = Self {
        max_arena_bytes: DEFAULT_MAX_ARENA_BYTES,
        mode: ArenaMode::SingleShot,
    };

    pub const fn new() -> Self {
        Self::DEFAULT
    }

    pub const fn with_max_arena_bytes(self, max_arena_bytes: usize) -> Self {
        Self {
            max_arena_bytes,
            ..self
        }
    }

    pub const fn with_mode(self, mode: ArenaMode) -> Self {
        Self { mode, ..self }
    }

    /// この設定で受け付けられる `argc` の最大値。
    pub const fn max_args(&self) -> usize {
        (self.max_arena_bytes / size_of::<ArgView<'static>>()).saturating_sub(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
