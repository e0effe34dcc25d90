use log::debug;

use crate::{
    cursor::Block, trace::RowSink, Checksum, Error, Region, Result, SegmentParser, Verdict,
    MAX_BLOCK_LEN,
};

/// Feeds an in-memory buffer to a `SegmentParser` in blocks of at most
/// `block_len` bytes, honoring the continuation of each step.
pub struct Feeder<'a> {
    data: &'a [u8],
    block_len: usize,
    parser: SegmentParser,
}

/// Final state after feeding a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub region: Region,
    /// Number of `step()` calls.
    pub blocks: usize,
    /// Offset of the first byte after the consumed data.
    pub end: u64,
}

impl Summary {
    pub fn verdict(&self) -> Verdict {
        self.region.verdict()
    }

    pub fn checksum(&self) -> Checksum {
        self.region.checksum()
    }
}

impl<'a> Feeder<'a> {
    pub fn new(data: &'a [u8], parser: SegmentParser) -> Self {
        Self {
            data,
            block_len: MAX_BLOCK_LEN,
            parser,
        }
    }

    pub fn block_len(mut self, block_len: usize) -> Self {
        debug_assert!(block_len > 0);
        self.block_len = block_len;
        self
    }

    /// Decode `region`, whose segmented data starts at `start`.
    pub fn run(&self, start: usize, region: Region, sink: &mut dyn RowSink) -> Result<Summary> {
        let len = self.data.len();
        if start > len {
            return Err(Error::RegionOutOfBounds { start, len });
        }

        let mut region = region;
        let mut pos = start;
        let mut blocks = 0;
        loop {
            let end = (pos + self.block_len).min(len);
            let block = Block::new(&self.data[pos..end], pos as u64);
            let step = self.parser.step(&region, block, sink);
            blocks += 1;
            region = step.region;
            let Some(continuation) = step.continuation else {
                return Ok(Summary {
                    region,
                    blocks,
                    end: (pos + step.consumed) as u64,
                });
            };

            let next = continuation.next_offset(&block) as usize;
            if next <= pos {
                return Err(if end == len {
                    Error::NoEnoughData {
                        offset: pos as u64,
                        remaining: region.data_remaining(),
                    }
                } else {
                    Error::BlockTooSmall {
                        offset: pos as u64,
                        block_len: self.block_len,
                    }
                });
            }
            debug!("next block at {}", next);
            pos = next;
        }
    }
}
