//! Safe wrapper around AVDictionary

use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::ptr;

use crate::ffi::dict::{dict_flag, AVDictionary, AVDictionaryEntry};
use crate::ffi::AvUtil;

use super::{c_string, check, lib, require, take_av_string, UtilResult};

/// Owned key/value dictionary
///
/// libavutil represents the empty dictionary as a null pointer, so creating
/// one allocates nothing.
pub struct Dictionary {
    ptr: *mut AVDictionary,
    lib: &'static AvUtil,
}

impl Dictionary {
    pub fn new() -> UtilResult<Self> {
        Ok(Self {
            ptr: ptr::null_mut(),
            lib: lib()?,
        })
    }

    /// Take ownership of a raw dictionary (null is empty)
    ///
    /// # Safety
    /// `ptr` must be null or a dictionary of the same library that nothing
    /// else frees.
    pub unsafe fn from_raw(lib: &'static AvUtil, ptr: *mut AVDictionary) -> Self {
        Self { ptr, lib }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const AVDictionary {
        self.ptr
    }

    /// For entry points that take `AVDictionary **`
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut *mut AVDictionary {
        &mut self.ptr
    }

    pub fn into_raw(self) -> *mut AVDictionary {
        let ptr = self.ptr;
        std::mem::forget(self);
        ptr
    }

    /// Set `key`, replacing any previous value
    pub fn set(&mut self, key: &str, value: &str) -> UtilResult<()> {
        self.set_with_flags(key, value, 0)
    }

    /// Set `key` with `dict_flag` bits such as `APPEND` or `DONT_OVERWRITE`
    pub fn set_with_flags(&mut self, key: &str, value: &str, flags: c_int) -> UtilResult<()> {
        let key = c_string(key)?;
        let value = c_string(value)?;
        // The strings are always duplicated
        let flags = flags & !(dict_flag::DONT_STRDUP_KEY | dict_flag::DONT_STRDUP_VAL);
        check(unsafe { (self.lib.dict.av_dict_set)(&mut self.ptr, key.as_ptr(), value.as_ptr(), flags) })?;
        Ok(())
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> UtilResult<()> {
        let key = c_string(key)?;
        check(unsafe { (self.lib.dict.av_dict_set_int)(&mut self.ptr, key.as_ptr(), value, 0) })?;
        Ok(())
    }

    /// Delete `key`
    pub fn remove(&mut self, key: &str) -> UtilResult<()> {
        let key = c_string(key)?;
        check(unsafe { (self.lib.dict.av_dict_set)(&mut self.ptr, key.as_ptr(), ptr::null(), 0) })?;
        Ok(())
    }

    /// Case-insensitive lookup
    pub fn get(&self, key: &str) -> Option<String> {
        let key = c_string(key).ok()?;
        unsafe {
            let entry = (self.lib.dict.av_dict_get)(self.ptr, key.as_ptr(), ptr::null(), 0);
            entry
                .as_ref()
                .map(|e| CStr::from_ptr(e.value).to_string_lossy().into_owned())
        }
    }

    pub fn len(&self) -> usize {
        unsafe { (self.lib.dict.av_dict_count)(self.ptr).max(0) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_null() || self.len() == 0
    }

    /// Entries in insertion order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            dict: self,
            prev: ptr::null(),
        }
    }

    /// Merge "key=value" pairs parsed from `s`
    pub fn parse(&mut self, s: &str, key_val_sep: &str, pairs_sep: &str) -> UtilResult<()> {
        let s = c_string(s)?;
        let kv = c_string(key_val_sep)?;
        let pairs = c_string(pairs_sep)?;
        let ret = unsafe {
            (self.lib.dict.av_dict_parse_string)(&mut self.ptr, s.as_ptr(), kv.as_ptr(), pairs.as_ptr(), 0)
        };
        check(ret)?;
        Ok(())
    }

    /// Deep copy
    pub fn try_clone(&self) -> UtilResult<Self> {
        let mut copy = Self {
            ptr: ptr::null_mut(),
            lib: self.lib,
        };
        unsafe { (self.lib.dict.av_dict_copy)(&mut copy.ptr, self.ptr, 0) };
        if copy.len() != self.len() {
            return Err(super::UtilError::AllocationFailed("AVDictionary copy"));
        }
        Ok(copy)
    }

    /// Serialise as "k=v,k=v" style text
    pub fn serialize(&self, key_val_sep: u8, pairs_sep: u8) -> UtilResult<String> {
        let get_string = require(self.lib.dict.av_dict_get_string, "av_dict_get_string")?;
        let mut buffer: *mut c_char = ptr::null_mut();
        let ret = unsafe { get_string(self.ptr, &mut buffer, key_val_sep as c_char, pairs_sep as c_char) };
        let text = unsafe { take_av_string(self.lib, buffer) };
        check(ret)?;
        Ok(text.unwrap_or_default())
    }
}

impl Drop for Dictionary {
    fn drop(&mut self) {
        unsafe { (self.lib.dict.av_dict_free)(&mut self.ptr) };
    }
}

unsafe impl Send for Dictionary {}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over dictionary entries
pub struct Iter<'a> {
    dict: &'a Dictionary,
    prev: *const AVDictionaryEntry,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = unsafe {
            (self.dict.lib.dict.av_dict_get)(self.dict.ptr, c"".as_ptr(), self.prev, dict_flag::IGNORE_SUFFIX)
        };
        let entry: &'a AVDictionaryEntry = unsafe { entry.as_ref()? };
        self.prev = entry;
        unsafe {
            Some((
                CStr::from_ptr(entry.key).to_string_lossy(),
                CStr::from_ptr(entry.value).to_string_lossy(),
            ))
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (Cow<'a, str>, Cow<'a, str>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
