//! NAR stream decompression
//!
//! Caches serve NAR files compressed; the narinfo `Compression` field
//! names the codec. Decompression happens at the fetch boundary so the
//! archive decoder only ever sees raw NAR bytes.

use crate::error::{NarlockError, NarlockResult};
use std::io::Read;

/// Wrap a compressed NAR stream in the right decoder.
///
/// The public cache serves mostly `xz`; `zstd`, `gzip`, and `bzip2`
/// also appear. Unknown codecs produce
/// [`NarlockError::UnsupportedCompression`].
pub fn decompress<'a, R: Read + 'a>(
    reader: R,
    compression: &str,
) -> NarlockResult<Box<dyn Read + 'a>> {
    match compression {
        "" | "none" => Ok(Box::new(reader)),
        "xz" => Ok(Box::new(xz2::read::XzDecoder::new(reader))),
        "zstd" => {
            let decoder = zstd::stream::read::Decoder::new(reader)
                .map_err(|e| NarlockError::io("initializing zstd decoder", e))?;
            Ok(Box::new(decoder))
        }
        "gzip" => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        "bzip2" => Ok(Box::new(bzip2::read::BzDecoder::new(reader))),
        other => Err(NarlockError::UnsupportedCompression(other.to_string())),
    }
}
