use core::{
    alloc::Layout,
    cell::Cell,
    marker::PhantomData,
    mem::{size_of, MaybeUninit},
    ptr::NonNull,
};

use crate::{
    args::ArgView,
    error::{Code, Result},
    make_error,
};

/// コンテナにメモリを供給するもの。
///
/// # Safety
///
/// [MemoryResource::allocate] が返す領域は `layout` の大きさとアラインメントを満たし、
/// [MemoryResource::deallocate] に渡されるかリソース自体が破棄されるまで他の割り当てと重ならない。
pub unsafe trait MemoryResource {
    /// `layout` を満たす領域を割り当てる。
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// [MemoryResource::allocate] で得た領域を返却する。
    ///
    /// # Safety
    ///
    /// `ptr` と `layout` は同じリソースの [MemoryResource::allocate] で得たものでなければならない。
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// `other` が割り当てた領域をこのリソースで返却できるなら `true`。
    fn is_equal(&self, other: &dyn MemoryResource) -> bool;
}

/// [StackArena] の割り当て方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaMode {
    /// 要求ごとに先頭を進めていく。
    Bump,
    /// 1 回だけ割り当てを受け付け、2 回目以降は [Code::AlreadyAllocated] を返す。
    SingleShot,
}

/// 呼び出し側が用意した領域の先頭から必要な分を渡し、
/// 先頭をその分増加させていくだけのアロケータ。
///
/// 解放はなにもしない。領域はそれを確保したスタックフレームが戻るときにまとめて消える。
#[derive(Debug)]
pub struct StackArena<'a> {
    base: NonNull<u8>,
    capacity: usize,
    /// 先頭から使用済みのバイト数。アラインメント調整の隙間も含む。
    used: Cell<usize>,
    allocations: Cell<usize>,
    mode: ArenaMode,
    _region: PhantomData<&'a mut [MaybeUninit<u8>]>,
}

impl<'a> StackArena<'a> {
    pub fn new(region: &'a mut [MaybeUninit<u8>]) -> Self {
        Self::with_mode(region, ArenaMode::Bump)
    }

    pub fn single_shot(region: &'a mut [MaybeUninit<u8>]) -> Self {
        Self::with_mode(region, ArenaMode::SingleShot)
    }

    pub fn with_mode(region: &'a mut [MaybeUninit<u8>], mode: ArenaMode) -> Self {
        let capacity = region.len();
        Self {
            base: NonNull::from(region).cast(),
            capacity,
            used: Cell::new(0),
            allocations: Cell::new(0),
            mode,
            _region: PhantomData,
        }
    }

    /// 領域全体のバイト数。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used.get()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    /// 成功した割り当ての回数。大きさ 0 の要求は数えない。
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn mode(&self) -> ArenaMode {
        self.mode
    }
}

unsafe impl MemoryResource for StackArena<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if self.mode == ArenaMode::SingleShot && self.allocations.get() != 0 && layout.size() != 0
        {
            return Err(make_error!(Code::AlreadyAllocated));
        }

        let offset = self.used.get();
        // アラインメント調整
        let padding = match (self.base.as_ptr() as usize + offset) % layout.align() {
            0 => 0,
            rem => layout.align() - rem,
        };

        // 領域を超えないか確認
        let needed = match padding.checked_add(layout.size()) {
            Some(needed) if needed <= self.remaining() => needed,
            _ => {
                log::debug!(
                    "requested bytes: {}, remaining bytes capacity: {}",
                    layout.size(),
                    self.remaining()
                );
                return Err(make_error!(Code::NoEnoughMemory));
            }
        };

        // Safety: offset + padding <= capacity なので領域内を指している
        let ptr = unsafe { NonNull::new_unchecked(self.base.as_ptr().add(offset + padding)) };
        if layout.size() != 0 {
            self.used.set(offset + needed);
            self.allocations.set(self.allocations.get() + 1);
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, _: NonNull<u8>, _: Layout) {
        // 解放は特になにもしない
    }

    fn is_equal(&self, _: &dyn MemoryResource) -> bool {
        // コンテナごとに別のアリーナを使う
        false
    }
}

/// `argc` 個の [ArgView] を収めるのに必要なアリーナのバイト数。
///
/// 1 つ分多く取るのは、ヌル終端を数える慣習に合わせた余白で、アラインメント調整の隙間にもなる。
/// 桁あふれする場合は [None] を返す。
pub const fn arena_size_for(argc: usize) -> Option<usize> {
    match argc.checked_add(1) {
        Some(slots) => slots.checked_mul(size_of::<ArgView<'static>>()),
        None => None,
    }
}
