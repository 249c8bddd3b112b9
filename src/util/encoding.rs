//! Base64 and LZO1X

use std::os::raw::c_char;

use crate::ffi::encoding::{av_base64_size, lzo_result, AV_LZO_INPUT_PADDING, AV_LZO_OUTPUT_PADDING};

use super::{c_len, c_string, check, lib, owned_str, UtilError, UtilResult};

/// Standard alphabet with padding
pub fn base64_encode(data: &[u8]) -> UtilResult<String> {
    let lib = lib()?;
    let in_size = c_len(data.len(), "base64 input")?;
    let mut out = vec![0 as c_char; av_base64_size(data.len())];
    let out_size = c_len(out.len(), "base64 output")?;
    let ret = unsafe { (lib.base64.av_base64_encode)(out.as_mut_ptr(), out_size, data.as_ptr(), in_size) };
    if ret.is_null() {
        return Err(UtilError::InvalidArgument("base64 output buffer too small".into()));
    }
    Ok(unsafe { owned_str(out.as_ptr()) }.unwrap_or_default())
}

/// Decode standard base64; characters outside the alphabet are an error
pub fn base64_decode(text: &str) -> UtilResult<Vec<u8>> {
    let lib = lib()?;
    let c_text = c_string(text)?;
    let mut out = vec![0u8; text.len() / 4 * 3 + 3];
    let out_size = c_len(out.len(), "base64 output")?;
    let len = check(unsafe { (lib.base64.av_base64_decode)(out.as_mut_ptr(), c_text.as_ptr(), out_size) })?;
    out.truncate(len as usize);
    Ok(out)
}

/// Decode an LZO1X stream expected to produce at most `max_len` bytes
pub fn lzo_decode(input: &[u8], max_len: usize) -> UtilResult<Vec<u8>> {
    let lib = lib()?;
    let mut inlen = c_len(input.len(), "LZO input")?;
    let mut outlen = c_len(max_len, "LZO output")?;

    // The decoder reads and writes past both ends in word-sized steps
    let mut padded = Vec::with_capacity(input.len() + AV_LZO_INPUT_PADDING);
    padded.extend_from_slice(input);
    padded.resize(input.len() + AV_LZO_INPUT_PADDING, 0);
    let mut out = vec![0u8; max_len + AV_LZO_OUTPUT_PADDING];

    let ret = unsafe {
        (lib.lzo.av_lzo1x_decode)(out.as_mut_ptr().cast(), &mut outlen, padded.as_ptr().cast(), &mut inlen)
    };
    if ret & (lzo_result::ERROR | lzo_result::INVALID_BACKPTR) != 0 {
        return Err(UtilError::InvalidArgument(format!("corrupt LZO stream (flags {ret:#x})")));
    }
    if ret & lzo_result::OUTPUT_FULL != 0 {
        return Err(UtilError::InvalidArgument(format!("LZO output exceeds {max_len} bytes")));
    }
    if ret & lzo_result::INPUT_DEPLETED != 0 {
        return Err(UtilError::InvalidArgument("LZO stream is truncated".into()));
    }
    out.truncate(max_len - outlen.max(0) as usize);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::testing;

    #[test]
    fn test_base64() {
        let Some(_) = testing::native() else {
            return;
        };

        assert_eq!(base64_encode(b"").unwrap(), "");
        assert_eq!(base64_encode(b"f").unwrap(), "Zg==");
        assert_eq!(base64_encode(b"foobar").unwrap(), "Zm9vYmFy");
        assert_eq!(base64_decode("Zm9vYg==").unwrap(), b"foob");
        assert_eq!(base64_decode("").unwrap(), b"");
        assert!(base64_decode("Zm9v*mFy").is_err());

        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(base64_decode(&base64_encode(&bytes).unwrap()).unwrap(), bytes);
    }

    #[test]
    fn test_lzo() {
        let Some(_) = testing::native() else {
            return;
        };

        // Literal run "abc" then the end-of-stream marker
        let stream = [17 + 3, b'a', b'b', b'c', 0x11, 0x00, 0x00];
        assert_eq!(lzo_decode(&stream, 16).unwrap(), b"abc");
        assert!(lzo_decode(&stream, 2).is_err());
        assert!(lzo_decode(&stream[..3], 16).is_err());
    }
}
