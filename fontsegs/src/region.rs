use crate::{cursor::Block, Checksum, Dialect, SegmentTag};

/// Decoding state of one segmented data area, carried by the caller from one
/// `SegmentParser::step()` call to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    data_rem: u32,
    hddr_rem: u32,
    seg_rem: u32,
    seg_tag: Option<SegmentTag>,
    checksum: Checksum,
    valid: bool,
    started: bool,
}

impl Region {
    /// Region of `len` bytes of segmented data.
    pub fn new(len: u32) -> Self {
        Self {
            data_rem: len,
            hddr_rem: len,
            seg_rem: 0,
            seg_tag: None,
            checksum: Checksum::default(),
            valid: true,
            started: false,
        }
    }

    /// Set the outer header counter, which includes bytes that follow the
    /// segmented data. Must not be less than the region length.
    pub fn with_header_remaining(mut self, hddr_rem: u32) -> Self {
        debug_assert!(hddr_rem >= self.data_rem);
        self.hddr_rem = hddr_rem;
        self
    }

    /// Continue the checksum accumulated over the preceding header bytes.
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = checksum;
        self
    }

    /// Segmented data bytes not yet consumed.
    pub fn data_remaining(&self) -> u32 {
        self.data_rem
    }

    /// Header bytes not yet consumed.
    pub fn header_remaining(&self) -> u32 {
        self.hddr_rem
    }

    /// Body bytes of the current segment still to come from later blocks.
    pub fn segment_remaining(&self) -> u32 {
        self.seg_rem
    }

    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn verdict(&self) -> Verdict {
        if !self.valid {
            Verdict::Invalid
        } else if self.data_rem == 0 {
            Verdict::Done
        } else {
            Verdict::Pending
        }
    }

    pub(crate) fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn start(&mut self) {
        self.started = true;
        self.seg_rem = 0;
        self.seg_tag = None;
        self.valid = true;
    }

    pub(crate) fn segment_tag(&self) -> Option<SegmentTag> {
        self.seg_tag
    }

    pub(crate) fn set_segment(&mut self, tag: SegmentTag, seg_rem: u32) {
        debug_assert!(seg_rem <= self.data_rem);
        self.seg_tag = Some(tag);
        self.seg_rem = seg_rem;
    }

    /// Account for `bytes` taken from the block as part of the segment body.
    pub(crate) fn consume_body(&mut self, bytes: &[u8], dialect: Dialect) {
        debug_assert!(bytes.len() as u32 <= self.seg_rem);
        self.seg_rem -= bytes.len() as u32;
        self.consume(bytes, dialect);
    }

    /// Account for `bytes` taken from the block.
    pub(crate) fn consume(&mut self, bytes: &[u8], dialect: Dialect) {
        let n = bytes.len() as u32;
        debug_assert!(n <= self.data_rem);
        self.data_rem -= n;
        self.hddr_rem = self.hddr_rem.saturating_sub(n);
        if dialect == Dialect::Pcl {
            self.checksum.add(bytes);
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// Outcome of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Verdict {
    /// All segmented data consumed and consistent.
    Done,
    /// More blocks are needed.
    Pending,
    /// Consistency problems were reported, see the warning rows.
    Invalid,
}

/// Why a call stopped before the region was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Nothing past the last complete structure could be used. Supply the next
    /// block starting `distance` bytes before the end of the current one.
    Backtrack {
        distance: usize,
        segment: Option<SegmentTag>,
    },
    /// The block is used up with the body of `segment` still incomplete.
    /// Supply the next block starting where the current one ended.
    Resume { segment: Option<SegmentTag> },
}

impl Continuation {
    /// File offset where the next block must start.
    pub fn next_offset(&self, block: &Block) -> u64 {
        let end = block.offset() + block.len() as u64;
        match self {
            Self::Backtrack { distance, .. } => end - *distance as u64,
            Self::Resume { .. } => end,
        }
    }

    pub fn segment(&self) -> Option<SegmentTag> {
        match self {
            Self::Backtrack { segment, .. } | Self::Resume { segment } => *segment,
        }
    }
}

/// Result of one `SegmentParser::step()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Bytes taken from the block.
    pub consumed: usize,
    /// Region state to pass to the next call.
    pub region: Region,
    /// Set when the call stopped for lack of data.
    pub continuation: Option<Continuation>,
}

impl Step {
    pub fn verdict(&self) -> Verdict {
        self.region.verdict()
    }
}
