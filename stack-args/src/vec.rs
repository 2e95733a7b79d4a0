use core::{
    alloc::Layout,
    fmt::{self, Debug},
    marker::PhantomData,
    mem::size_of,
    ops::Deref,
    ptr::{self, NonNull},
    slice,
};

use crate::{
    arena::MemoryResource,
    error::{Code, Result},
    make_error,
};

/// [MemoryResource] から 1 度だけ領域を受け取る、容量固定の可変長配列。
///
/// 最初の [ArenaVec::reserve_exact] で容量が決まり、それ以上には伸びない。
pub struct ArenaVec<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    resource: &'a dyn MemoryResource,
    _marker: PhantomData<T>,
}

impl<'a, T> ArenaVec<'a, T> {
    /// 空の配列を作る。この時点では割り当てを行わない。
    pub fn new_in(resource: &'a dyn MemoryResource) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            // 大きさ 0 の型は領域を必要としない
            cap: if size_of::<T>() == 0 { usize::MAX } else { 0 },
            resource,
            _marker: PhantomData,
        }
    }

    /// 合計で `len() + additional` 個を収められるようにする。
    ///
    /// 容量が 0 のときに限り、ちょうどその大きさを 1 回でリソースに要求する。
    /// すでに確保した容量を超える要求は [Code::Full] になる。
    pub fn reserve_exact(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(make_error!(Code::Full))?;
        if required <= self.cap {
            return Ok(());
        }
        if self.cap != 0 {
            return Err(make_error!(Code::Full));
        }

        let layout = Layout::array::<T>(required).map_err(|_| make_error!(Code::NoEnoughMemory))?;
        self.ptr = self.resource.allocate(layout)?.cast();
        self.cap = required;
        Ok(())
    }

    /// 末尾に `value` を追加する。容量が足りない場合は [Code::Full] を返す。
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.cap {
            return Err(make_error!(Code::Full));
        }
        // Safety: len < cap なので確保済みの領域内
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn as_slice(&self) -> &[T] {
        // Safety: 先頭から len 個は初期化済み
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Deref for ArenaVec<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> Drop for ArenaVec<'_, T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
        }
        if size_of::<T>() != 0 && self.cap != 0 {
            // reserve_exact で同じ大きさの Layout を作れているので失敗しない
            if let Ok(layout) = Layout::array::<T>(self.cap) {
                unsafe { self.resource.deallocate(self.ptr.cast(), layout) };
            }
        }
    }
}

impl<T: Debug> Debug for ArenaVec<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
