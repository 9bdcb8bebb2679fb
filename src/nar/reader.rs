//! NAR token stream cursor
//!
//! Every string in a NAR archive is length-prefixed: an 8-byte
//! little-endian length, the raw bytes, then zero padding up to the
//! next multiple of 8 counted from the start of the length field. A
//! single shared cursor keeps nested entry decoding in sync; one
//! misread offset corrupts every subsequent token.

use crate::error::{NarlockError, NarlockResult};
use std::io::{self, Read};

/// Structural tokens are tiny; anything longer than this in a
/// structural position means the stream is desynchronized.
const MAX_TOKEN_LEN: u64 = 4096;

/// Cursor over a NAR byte stream.
pub struct TokenReader<R: Read> {
    inner: R,
}

impl<R: Read> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the 8-byte little-endian length prefix.
    fn read_len(&mut self) -> NarlockResult<u64> {
        let mut buf = [0u8; 8];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| NarlockError::io("reading NAR token length", e))?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Skip the zero padding that rounds a token out to an 8-byte
    /// boundary. A zero-length token has no padding: 0 is already a
    /// multiple of 8.
    fn skip_padding(&mut self, len: u64) -> NarlockResult<()> {
        let pad = (8 - (len % 8)) % 8;
        if pad > 0 {
            let mut buf = [0u8; 8];
            self.inner
                .read_exact(&mut buf[..pad as usize])
                .map_err(|e| NarlockError::io("reading NAR token padding", e))?;
        }
        Ok(())
    }

    /// Read one structural token as UTF-8.
    pub fn read_token(&mut self) -> NarlockResult<String> {
        let len = self.read_len()?;
        if len > MAX_TOKEN_LEN {
            return Err(NarlockError::NarToken {
                expected: "structural token".to_string(),
                found: format!("<{len} byte blob>"),
            });
        }
        let mut buf = vec![0u8; len as usize];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| NarlockError::io("reading NAR token", e))?;
        self.skip_padding(len)?;
        String::from_utf8(buf).map_err(|_| NarlockError::NarTokenEncoding)
    }

    /// Read a token and require an exact value.
    pub fn expect_token(&mut self, expected: &str) -> NarlockResult<()> {
        let token = self.read_token()?;
        if token != expected {
            return Err(NarlockError::NarToken {
                expected: format!("{expected:?}"),
                found: token,
            });
        }
        Ok(())
    }

    /// Stream one length-prefixed payload into `dest` without
    /// buffering it whole, returning the payload length.
    pub fn copy_payload<W: io::Write>(&mut self, dest: &mut W) -> NarlockResult<u64> {
        let len = self.read_len()?;
        let copied = io::copy(&mut self.inner.by_ref().take(len), dest)
            .map_err(|e| NarlockError::io("copying NAR file contents", e))?;
        if copied != len {
            return Err(NarlockError::io(
                "copying NAR file contents".to_string(),
                io::Error::new(io::ErrorKind::UnexpectedEof, "truncated payload"),
            ));
        }
        self.skip_padding(len)?;
        Ok(len)
    }
}
