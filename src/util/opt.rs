//! Typed access to the `AVOption` table of an `AVClass`-enabled object

use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use crate::ffi::log::AVClass;
use crate::ffi::opt::{search_flag, AVOption, AVOptionType};
use crate::ffi::{AVPixelFormat, AVRational, AVSampleFormat, AvUtil};

use super::dict::Dictionary;
use super::{c_len, c_string, check, lib, owned_str, require, take_av_string, UtilError, UtilResult};

/// Value of one option
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Double(f64),
    Str(String),
    Rational(AVRational),
    ImageSize(u32, u32),
    PixelFormat(AVPixelFormat),
    SampleFormat(AVSampleFormat),
    ChannelLayout(u64),
    Binary(Vec<u8>),
}

/// Owned description of one table entry
#[derive(Debug, Clone, PartialEq)]
pub struct OptionInfo {
    pub name: String,
    pub help: Option<String>,
    /// `None` for types this crate does not know
    pub kind: Option<AVOptionType>,
    pub default: Option<OptionValue>,
    pub min: f64,
    pub max: f64,
    /// `opt_flag` bits
    pub flags: i32,
    pub unit: Option<String>,
}

impl OptionInfo {
    /// # Safety
    /// `opt` must be a live table entry with a non-null name.
    pub unsafe fn from_raw(opt: &AVOption) -> Self {
        let kind = opt.option_type();
        let default = match kind {
            Some(
                AVOptionType::Flags
                | AVOptionType::Int
                | AVOptionType::Int64
                | AVOptionType::Const
                | AVOptionType::PixelFmt
                | AVOptionType::SampleFmt
                | AVOptionType::Duration
                | AVOptionType::ChannelLayout,
            ) => Some(OptionValue::Int(opt.default_val.i64_)),
            Some(AVOptionType::Double | AVOptionType::Float | AVOptionType::Rational) => {
                Some(OptionValue::Double(opt.default_val.dbl))
            }
            Some(
                AVOptionType::String
                | AVOptionType::ImageSize
                | AVOptionType::VideoRate
                | AVOptionType::Color
                | AVOptionType::Binary
                | AVOptionType::Dict,
            ) => owned_str(opt.default_val.str_).map(OptionValue::Str),
            None => None,
        };
        Self {
            name: owned_str(opt.name).unwrap_or_default(),
            help: owned_str(opt.help),
            kind,
            default,
            min: opt.min,
            max: opt.max,
            flags: opt.flags,
            unit: owned_str(opt.unit),
        }
    }
}

/// Option access to an object borrowed for `'a`
pub struct Options<'a> {
    obj: *mut c_void,
    lib: &'static AvUtil,
    search_flags: c_int,
    _object: PhantomData<&'a mut ()>,
}

impl<'a> Options<'a> {
    /// # Safety
    /// `obj` must point to a struct whose first member is a valid
    /// `*const AVClass`, and stay valid and unaliased for `'a`.
    pub unsafe fn new(obj: *mut c_void) -> UtilResult<Self> {
        if obj.is_null() {
            return Err(UtilError::InvalidArgument("null option object".into()));
        }
        Ok(Self {
            obj,
            lib: lib()?,
            search_flags: 0,
            _object: PhantomData,
        })
    }

    /// Also search child objects
    pub fn search_children(mut self) -> Self {
        self.search_flags |= search_flag::CHILDREN;
        self
    }

    /// Reset every option to its default
    pub fn set_defaults(&mut self) {
        unsafe { (self.lib.opt.av_opt_set_defaults)(self.obj) }
    }

    /// Set from text, as a command line would
    pub fn set(&mut self, name: &str, value: &str) -> UtilResult<()> {
        let name = c_string(name)?;
        let value = c_string(value)?;
        check(unsafe { (self.lib.opt.av_opt_set)(self.obj, name.as_ptr(), value.as_ptr(), self.search_flags) })?;
        Ok(())
    }

    /// Set with a typed value
    pub fn set_value(&mut self, name: &str, value: &OptionValue) -> UtilResult<()> {
        let c_name = c_string(name)?;
        let (api, obj, n, flags) = (&self.lib.opt, self.obj, c_name.as_ptr(), self.search_flags);
        let ret = unsafe {
            match value {
                OptionValue::Int(v) => (api.av_opt_set_int)(obj, n, *v, flags),
                OptionValue::Double(v) => (api.av_opt_set_double)(obj, n, *v, flags),
                OptionValue::Str(v) => {
                    let v = c_string(v)?;
                    (api.av_opt_set)(obj, n, v.as_ptr(), flags)
                }
                OptionValue::Rational(q) => (api.av_opt_set_q)(obj, n, *q, flags),
                OptionValue::ImageSize(w, h) => (api.av_opt_set_image_size)(obj, n, *w as c_int, *h as c_int, flags),
                OptionValue::PixelFormat(f) => (api.av_opt_set_pixel_fmt)(obj, n, f.as_raw(), flags),
                OptionValue::SampleFormat(f) => (api.av_opt_set_sample_fmt)(obj, n, f.as_raw(), flags),
                OptionValue::ChannelLayout(l) => (api.av_opt_set_channel_layout)(obj, n, *l as i64, flags),
                OptionValue::Binary(b) => {
                    let len = c_len(b.len(), "binary option")?;
                    (api.av_opt_set_bin)(obj, n, b.as_ptr(), len, flags)
                }
            }
        };
        check(ret)?;
        Ok(())
    }

    /// Current value as text
    pub fn get(&self, name: &str) -> UtilResult<Option<String>> {
        let name = c_string(name)?;
        let mut out: *mut u8 = ptr::null_mut();
        let ret = unsafe { (self.lib.opt.av_opt_get)(self.obj, name.as_ptr(), self.search_flags, &mut out) };
        check(ret)?;
        Ok(unsafe { take_av_string(self.lib, out.cast()) })
    }

    pub fn get_int(&self, name: &str) -> UtilResult<i64> {
        let name = c_string(name)?;
        let mut out = 0i64;
        check(unsafe { (self.lib.opt.av_opt_get_int)(self.obj, name.as_ptr(), self.search_flags, &mut out) })?;
        Ok(out)
    }

    pub fn get_double(&self, name: &str) -> UtilResult<f64> {
        let name = c_string(name)?;
        let mut out = 0f64;
        check(unsafe { (self.lib.opt.av_opt_get_double)(self.obj, name.as_ptr(), self.search_flags, &mut out) })?;
        Ok(out)
    }

    pub fn get_rational(&self, name: &str) -> UtilResult<AVRational> {
        let name = c_string(name)?;
        let mut out = AVRational::default();
        check(unsafe { (self.lib.opt.av_opt_get_q)(self.obj, name.as_ptr(), self.search_flags, &mut out) })?;
        Ok(out)
    }

    pub fn get_image_size(&self, name: &str) -> UtilResult<(u32, u32)> {
        let name = c_string(name)?;
        let (mut w, mut h): (c_int, c_int) = (0, 0);
        check(unsafe {
            (self.lib.opt.av_opt_get_image_size)(self.obj, name.as_ptr(), self.search_flags, &mut w, &mut h)
        })?;
        Ok((w.max(0) as u32, h.max(0) as u32))
    }

    /// Apply "key=value" pairs separated by `pairs_sep`; returns how many were set
    pub fn set_from_string(&mut self, opts: &str, key_val_sep: &str, pairs_sep: &str) -> UtilResult<usize> {
        let opts = c_string(opts)?;
        let kv = c_string(key_val_sep)?;
        let pairs = c_string(pairs_sep)?;
        let ret = unsafe { (self.lib.opt.av_set_options_string)(self.obj, opts.as_ptr(), kv.as_ptr(), pairs.as_ptr()) };
        Ok(check(ret)? as usize)
    }

    /// Apply every entry the object knows; unknown entries stay in `options`
    pub fn set_dict(&mut self, options: &mut Dictionary) -> UtilResult<()> {
        let ret = match self.lib.opt.av_opt_set_dict2 {
            Some(set_dict2) => unsafe { set_dict2(self.obj, options.as_mut_ptr(), self.search_flags) },
            None => unsafe { (self.lib.opt.av_opt_set_dict)(self.obj, options.as_mut_ptr()) },
        };
        check(ret)?;
        Ok(())
    }

    /// Look up one entry
    pub fn find(&self, name: &str) -> UtilResult<Option<OptionInfo>> {
        let name = c_string(name)?;
        let opt = unsafe { (self.lib.opt.av_opt_find)(self.obj, name.as_ptr(), ptr::null(), 0, self.search_flags) };
        Ok(unsafe { opt.as_ref() }.map(|o| unsafe { OptionInfo::from_raw(o) }))
    }

    /// Every entry of the table, named constants included
    pub fn list(&self) -> Vec<OptionInfo> {
        let mut out = Vec::new();
        let mut prev: *const AVOption = ptr::null();
        loop {
            prev = unsafe { (self.lib.opt.av_opt_next)(self.obj, prev) };
            match unsafe { prev.as_ref() } {
                Some(opt) if !opt.name.is_null() => out.push(unsafe { OptionInfo::from_raw(opt) }),
                _ => break,
            }
        }
        out
    }

    /// Whether `name` holds its default value
    pub fn is_default(&self, name: &str) -> UtilResult<bool> {
        let is_default = require(
            self.lib.opt.av_opt_is_set_to_default_by_name,
            "av_opt_is_set_to_default_by_name",
        )?;
        let name = c_string(name)?;
        Ok(check(unsafe { is_default(self.obj, name.as_ptr(), self.search_flags) })? > 0)
    }

    /// "key=value" text of every option matching `opt_flags`
    pub fn serialize(&self, opt_flags: i32, flags: i32, key_val_sep: u8, pairs_sep: u8) -> UtilResult<String> {
        let serialize = require(self.lib.opt.av_opt_serialize, "av_opt_serialize")?;
        let mut buffer: *mut c_char = ptr::null_mut();
        let ret = unsafe {
            serialize(
                self.obj,
                opt_flags,
                flags,
                &mut buffer,
                key_val_sep as c_char,
                pairs_sep as c_char,
            )
        };
        let text = unsafe { take_av_string(self.lib, buffer) };
        check(ret)?;
        Ok(text.unwrap_or_default())
    }

    /// Free string, binary and dictionary fields held by the object
    pub fn free_fields(&mut self) {
        unsafe { (self.lib.opt.av_opt_free)(self.obj) }
    }

    /// Class name of the object
    pub fn class_name(&self) -> Option<String> {
        unsafe {
            let class = *(self.obj as *const *const AVClass);
            class.as_ref().and_then(|c| owned_str(c.class_name))
        }
    }
}

impl std::fmt::Debug for Options<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("class", &self.class_name())
            .field("search_flags", &self.search_flags)
            .finish()
    }
}

/// Split "key=value" off the front of `opts`; returns the pair and the rest
pub fn next_key_value<'s>(opts: &'s str, key_val_sep: &str, pairs_sep: &str) -> UtilResult<Option<(String, String, &'s str)>> {
    if opts.is_empty() {
        return Ok(None);
    }
    let lib = lib()?;
    let c_opts = c_string(opts)?;
    let kv = c_string(key_val_sep)?;
    let pairs = c_string(pairs_sep)?;
    let mut cursor: *const c_char = c_opts.as_ptr();
    let (mut key, mut value): (*mut c_char, *mut c_char) = (ptr::null_mut(), ptr::null_mut());
    let ret = unsafe {
        (lib.opt.av_opt_get_key_value)(&mut cursor, kv.as_ptr(), pairs.as_ptr(), 0, &mut key, &mut value)
    };
    let key = unsafe { take_av_string(lib, key) };
    let value = unsafe { take_av_string(lib, value) };
    check(ret)?;
    let consumed = cursor as usize - c_opts.as_ptr() as usize;
    let mut rest = opts.get(consumed..).unwrap_or("");
    // The pair separator is left in place
    if let Some(c) = rest.chars().next() {
        if pairs_sep.contains(c) {
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(Some((key.unwrap_or_default(), value.unwrap_or_default(), rest)))
}
