//! Hashes, checksums and base64

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::ffi::hash::{AVCRCId, AVHMACType};
use crate::util::encoding;
use crate::util::{adler32 as native_adler32, Crc, Hasher, Hmac, Md5};

use super::unknown;

const HMAC_NAMES: &[(&str, AVHMACType)] = &[
  ("md5", AVHMACType::Md5),
  ("sha1", AVHMACType::Sha1),
  ("sha224", AVHMACType::Sha224),
  ("sha256", AVHMACType::Sha256),
  ("sha384", AVHMACType::Sha384),
  ("sha512", AVHMACType::Sha512),
];

const CRC_NAMES: &[(&str, AVCRCId)] = &[
  ("crc8-atm", AVCRCId::Crc8Atm),
  ("crc16-ansi", AVCRCId::Crc16Ansi),
  ("crc16-ccitt", AVCRCId::Crc16Ccitt),
  ("crc32-ieee", AVCRCId::Crc32Ieee),
  ("crc32-ieee-le", AVCRCId::Crc32IeeeLe),
  ("crc16-ansi-le", AVCRCId::Crc16AnsiLe),
  ("crc24-ieee", AVCRCId::Crc24Ieee),
];

fn lookup<T: Copy>(what: &str, table: &[(&str, T)], name: &str) -> Result<T> {
  let lower = name.to_ascii_lowercase();
  table
    .iter()
    .find(|(n, _)| *n == lower)
    .map(|(_, v)| *v)
    .ok_or_else(|| {
      let known: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
      unknown(what, name, &known)
    })
}

/// MD5 digest of `data`
#[napi]
pub fn md5(data: Buffer) -> Result<Buffer> {
  Ok(Md5::digest(&data)?.to_vec().into())
}

/// Digest of `data` with any algorithm listed by `hashNames()`
#[napi]
pub fn hash(algorithm: String, data: Buffer) -> Result<Buffer> {
  let mut hasher = Hasher::new(&algorithm)?;
  hasher.update(&data);
  Ok(hasher.finalize().into())
}

/// Names accepted by `hash()`, e.g. "SHA256"
#[napi]
pub fn hash_names() -> Result<Vec<String>> {
  Ok(Hasher::names()?)
}

/// HMAC of `data` under `key`; `algorithm` is md5, sha1, sha224, sha256,
/// sha384 or sha512
#[napi]
pub fn hmac(algorithm: String, key: Buffer, data: Buffer) -> Result<Buffer> {
  let kind = lookup("HMAC algorithm", HMAC_NAMES, &algorithm)?;
  Ok(Hmac::mac(kind, &key, &data)?.into())
}

/// CRC register after feeding `data` through a standard table, starting
/// from `initial` (default 0); no inversion is applied
#[napi]
pub fn crc(algorithm: String, data: Buffer, initial: Option<u32>) -> Result<u32> {
  let id = lookup("CRC", CRC_NAMES, &algorithm)?;
  let crc = Crc::standard(id)?;
  Ok(crc.update(initial.unwrap_or(0), &data))
}

/// Adler-32 checksum, continuing from `initial` (default 1)
#[napi]
pub fn adler32(data: Buffer, initial: Option<u32>) -> Result<u32> {
  Ok(native_adler32(initial.unwrap_or(1), &data)?)
}

#[napi]
pub fn base64_encode(data: Buffer) -> Result<String> {
  Ok(encoding::base64_encode(&data)?)
}

#[napi]
pub fn base64_decode(text: String) -> Result<Buffer> {
  Ok(encoding::base64_decode(&text)?.into())
}
