//! Safe wrappers around AVBufferRef and AVBufferPool
//!
//! Reference counting follows libavutil: cloning a `BufferRef` adds a
//! reference to the same data, and the data is writable only through the
//! sole reference.

use std::os::raw::c_void;
use std::ptr::NonNull;

use crate::ffi::buffer::{AVBufferPool, AVBufferRef};
use crate::ffi::AvUtil;

use super::{c_len, check, lib, UtilError, UtilResult};

/// Owned reference to a native reference-counted buffer
pub struct BufferRef {
    ptr: NonNull<AVBufferRef>,
    lib: &'static AvUtil,
}

impl BufferRef {
    /// Allocate an uninitialised buffer
    pub fn new(size: usize) -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = unsafe { (lib.buffer.av_buffer_alloc)(c_len(size, "buffer size")?) };
        Self::wrap(lib, ptr)
    }

    /// Allocate a zero-filled buffer
    pub fn zeroed(size: usize) -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = unsafe { (lib.buffer.av_buffer_allocz)(c_len(size, "buffer size")?) };
        Self::wrap(lib, ptr)
    }

    /// Hand a Rust vector to libavutil; it is dropped with the last reference
    pub fn from_vec(data: Vec<u8>) -> UtilResult<Self> {
        let lib = lib()?;
        let size = c_len(data.len(), "buffer size")?;

        let mut owner = Box::new(data);
        let data_ptr = owner.as_mut_ptr();
        let opaque = Box::into_raw(owner).cast::<c_void>();

        let ptr = unsafe { (lib.buffer.av_buffer_create)(data_ptr, size, Some(free_vec), opaque, 0) };
        if ptr.is_null() {
            // Not adopted; reclaim the vector
            drop(unsafe { Box::from_raw(opaque.cast::<Vec<u8>>()) });
        }
        Self::wrap(lib, ptr)
    }

    fn wrap(lib: &'static AvUtil, ptr: *mut AVBufferRef) -> UtilResult<Self> {
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, lib })
            .ok_or(UtilError::AllocationFailed("AVBufferRef"))
    }

    /// Take ownership of a raw reference
    ///
    /// # Safety
    /// `ptr` must be a valid reference obtained from the same library.
    pub unsafe fn from_raw(lib: &'static AvUtil, ptr: *mut AVBufferRef) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, lib })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const AVBufferRef {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut AVBufferRef {
        self.ptr.as_ptr()
    }

    /// Consume the wrapper; the caller must unref the returned reference
    pub fn into_raw(self) -> *mut AVBufferRef {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    #[inline]
    fn raw(&self) -> &AVBufferRef {
        unsafe { self.ptr.as_ref() }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.raw().size.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer contents
    pub fn data(&self) -> &[u8] {
        let raw = self.raw();
        if raw.data.is_null() || raw.size <= 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(raw.data, raw.size as usize) }
        }
    }

    /// Mutable contents, only when this is the sole writable reference
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        if !self.is_writable() {
            return None;
        }
        let raw = self.raw();
        if raw.data.is_null() || raw.size <= 0 {
            return Some(&mut []);
        }
        Some(unsafe { std::slice::from_raw_parts_mut(raw.data, raw.size as usize) })
    }

    pub fn is_writable(&self) -> bool {
        unsafe { (self.lib.buffer.av_buffer_is_writable)(self.as_ptr()) != 0 }
    }

    /// Number of references to the underlying buffer
    pub fn ref_count(&self) -> usize {
        unsafe { (self.lib.buffer.av_buffer_get_ref_count)(self.as_ptr()).max(0) as usize }
    }

    /// Copy the data if other references exist
    pub fn make_writable(&mut self) -> UtilResult<()> {
        let mut ptr = self.ptr.as_ptr();
        let ret = unsafe { (self.lib.buffer.av_buffer_make_writable)(&mut ptr) };
        self.replace(ptr);
        check(ret)?;
        Ok(())
    }

    /// Resize, reallocating (and copying) when needed
    pub fn realloc(&mut self, size: usize) -> UtilResult<()> {
        let size = c_len(size, "buffer size")?;
        let mut ptr = self.ptr.as_ptr();
        let ret = unsafe { (self.lib.buffer.av_buffer_realloc)(&mut ptr, size) };
        self.replace(ptr);
        check(ret)?;
        Ok(())
    }

    fn replace(&mut self, ptr: *mut AVBufferRef) {
        // Both entry points keep the old reference on failure
        if let Some(ptr) = NonNull::new(ptr) {
            self.ptr = ptr;
        }
    }

    /// Add a reference to the same data
    pub fn try_clone(&self) -> UtilResult<Self> {
        let ptr = unsafe { (self.lib.buffer.av_buffer_ref)(self.ptr.as_ptr()) };
        Self::wrap(self.lib, ptr)
    }
}

unsafe extern "C" fn free_vec(opaque: *mut c_void, _data: *mut u8) {
    drop(Box::from_raw(opaque.cast::<Vec<u8>>()));
}

impl Drop for BufferRef {
    fn drop(&mut self) {
        let mut ptr = self.ptr.as_ptr();
        unsafe { (self.lib.buffer.av_buffer_unref)(&mut ptr) };
    }
}

// Reference counts are atomic
unsafe impl Send for BufferRef {}

impl std::fmt::Debug for BufferRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferRef")
            .field("size", &self.len())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

/// Pool of equally sized buffers
pub struct BufferPool {
    ptr: NonNull<AVBufferPool>,
    lib: &'static AvUtil,
    size: usize,
}

impl BufferPool {
    /// Create a pool handing out buffers of `size` bytes
    pub fn new(size: usize) -> UtilResult<Self> {
        let lib = lib()?;
        let ptr = unsafe { (lib.buffer.av_buffer_pool_init)(c_len(size, "pool buffer size")?, None) };
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, lib, size })
            .ok_or(UtilError::AllocationFailed("AVBufferPool"))
    }

    /// Size of every buffer
    pub fn buffer_size(&self) -> usize {
        self.size
    }

    /// Take a buffer, reusing a returned one when available
    pub fn get(&self) -> UtilResult<BufferRef> {
        let ptr = unsafe { (self.lib.buffer.av_buffer_pool_get)(self.ptr.as_ptr()) };
        BufferRef::wrap(self.lib, ptr)
    }
}

impl Drop for BufferPool {
    fn drop(&mut self) {
        // Outstanding buffers keep the pool alive until they are released
        let mut ptr = self.ptr.as_ptr();
        unsafe { (self.lib.buffer.av_buffer_pool_uninit)(&mut ptr) };
    }
}

// av_buffer_pool_get is thread-safe
unsafe impl Send for BufferPool {}
unsafe impl Sync for BufferPool {}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool").field("size", &self.size).finish()
    }
}
