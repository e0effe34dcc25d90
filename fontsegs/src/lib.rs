//! Decode the segmented data area of PCL and PCL XL soft font headers.
//!
//! TrueType (format 15 / 16) and Universal font headers end with a list of
//! segments, each a two byte type tag followed by a 16 bit (narrow) or 32 bit
//! (wide) size and the segment body. Font downloads arrive in blocks, so the
//! decoder is incremental: `SegmentParser::step()` consumes as many segments
//! as one block holds and returns a `Step` carrying the new `Region` state and,
//! when a structure straddles the end of the block, a `Continuation` telling
//! the caller where the next block has to start.
//!
//! `Feeder` runs that protocol over an in-memory buffer.
//!
//! Decoding never fails on malformed segment data. Inconsistencies are
//! reported as warning rows in the trace and clear the region's validity flag.

mod checksum;
mod collection;
mod cursor;
mod decode;
mod feed;
mod parser;
mod region;
mod tag;
mod trace;

#[cfg(test)]
mod test_data;

pub use checksum::Checksum;
pub use collection::{decode_collections, CollectionView, Collections, SymbolIndex};
pub use cursor::Block;
pub use feed::{Feeder, Summary};
pub use parser::{ParseOption, ParseOptionBuilder, SegmentParser};
pub use region::{Continuation, Region, Step, Verdict};
pub use tag::{HeaderWidth, SegmentTag};
pub use trace::{Diagnostic, OffsetFormat, Row, RowKind, RowSink};

/// Largest block a device buffers for one font header segment. Segments whose
/// interpreted part is larger can never be decoded in one piece.
pub const MAX_BLOCK_LEN: usize = 2048;

/// PCL or PCL XL. Decides whether consumed bytes contribute to the font header
/// checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum Dialect {
    #[default]
    #[strum(serialize = "PCL")]
    Pcl,
    #[strum(serialize = "PCL XL")]
    PclXl,
}

/// Error may returned in this crate.
///
/// Malformed segments are not errors, they are reported in the trace. These
/// are failures of the input delivery itself.
#[derive(PartialEq, Eq, Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("No enough data at offset {offset}, {remaining} bytes of segmented data outstanding")]
    NoEnoughData { offset: u64, remaining: u32 },
    #[error("Block of {block_len} bytes can not hold the structure at offset {offset}")]
    BlockTooSmall { offset: u64, block_len: usize },
    #[error("Segmented data start {start} is outside of {len} bytes input")]
    RegionOutOfBounds { start: usize, len: usize },
    #[error("Parse field error: {0}")]
    ParseError(String),
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(e: nom::Err<E>) -> Self {
        Self::ParseError(format!("{:?}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
