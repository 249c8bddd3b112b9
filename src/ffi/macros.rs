//! Declaration macros shared by the header modules

/// Declare a table of libavutil entry points.
///
/// Field names are the exported symbol names; field types are the
/// `unsafe extern "C" fn` signatures of the 54.27 headers. Entries listed in
/// the trailing `optional` block become `Option<fn>` and do not fail binding
/// when the library lacks them.
macro_rules! avutil_symbols {
  (
    $(#[$meta:meta])*
    pub struct $name:ident {
      $( $(#[$fmeta:meta])* $field:ident: $fty:ty; )*
    }
    $(
      optional {
        $( $(#[$ometa:meta])* $ofield:ident: $ofty:ty; )*
      }
    )?
  ) => {
    $(#[$meta])*
    #[derive(Clone, Copy)]
    pub struct $name {
      $( $(#[$fmeta])* pub $field: $fty, )*
      $($( $(#[$ometa])* pub $ofield: Option<$ofty>, )*)?
    }

    impl $name {
      /// Symbols that must be exported by the library
      pub const SYMBOLS: &'static [&'static str] = &[$(stringify!($field)),*];

      /// Symbols bound when present
      pub const OPTIONAL_SYMBOLS: &'static [&'static str] = &[$($(stringify!($ofield)),*)?];

      /// Resolve every entry point of this table.
      ///
      /// # Safety
      /// `library` must be a libavutil build whose exports have the declared
      /// signatures. The returned pointers are only valid while it stays loaded.
      pub unsafe fn bind(library: &::libloading::Library) -> Result<Self, $crate::ffi::BindError> {
        Ok(Self {
          $( $field: $crate::ffi::loader::required::<$fty>(library, stringify!($field))?, )*
          $($( $ofield: $crate::ffi::loader::optional::<$ofty>(library, stringify!($ofield)), )*)?
        })
      }
    }

    impl ::std::fmt::Debug for $name {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.debug_struct(stringify!($name))
          .field("symbols", &Self::SYMBOLS.len())
          .field("optional", &Self::OPTIONAL_SYMBOLS.len())
          .finish()
      }
    }
  };
}

/// Declare a C enum mirrored as a Rust enum with lossless raw conversion.
///
/// Values read from native memory stay `c_int`; `from_raw` rejects values
/// outside the pinned set instead of transmuting.
macro_rules! c_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $value:expr, )*
    }
  ) => {
    $(#[$meta])*
    #[repr(C)]
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum $name {
      $( $(#[$vmeta])* $variant = ($value) as isize, )*
    }

    impl $name {
      /// Every declared value, in declaration order
      pub const ALL: &'static [Self] = &[$(Self::$variant),*];

      /// Get the raw FFmpeg value
      #[inline]
      pub const fn as_raw(self) -> ::std::os::raw::c_int {
        self as ::std::os::raw::c_int
      }

      /// Convert from the raw FFmpeg value
      pub fn from_raw(raw: ::std::os::raw::c_int) -> Option<Self> {
        match raw {
          $( x if x == Self::$variant as ::std::os::raw::c_int => Some(Self::$variant), )*
          _ => None,
        }
      }
    }
  };
}

/// Declare opaque native types that are only ever handled behind pointers
macro_rules! opaque_types {
  ($( $(#[$meta:meta])* $name:ident; )*) => {
    $(
      $(#[$meta])*
      #[repr(C)]
      pub struct $name {
        _opaque: [u8; 0],
        _marker: ::std::marker::PhantomData<(*mut u8, ::std::marker::PhantomPinned)>,
      }
    )*
  };
}
