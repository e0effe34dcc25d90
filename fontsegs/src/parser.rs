use educe::Educe;
use log::debug;

use crate::{
    cursor::{Block, Window},
    decode::{decode_segment, Outcome, SegmentHeader},
    region::{Continuation, Region, Step},
    trace::{Diagnostic, Emitter, RowSink},
    Dialect, HeaderWidth,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Educe)]
#[educe(Default)]
pub struct ParseOption {
    pub(crate) dialect: Dialect,
    pub(crate) width: HeaderWidth,
    /// Emit hex rows of the bytes each segment decoder interprets.
    pub(crate) show_binary: bool,
    /// Analysis level of the segment rows.
    #[educe(Default = 1)]
    pub(crate) level: u8,
}

impl ParseOption {
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn width(&self) -> HeaderWidth {
        self.width
    }

    pub fn show_binary(&self) -> bool {
        self.show_binary
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

#[derive(Educe)]
#[educe(Default(new))]
pub struct ParseOptionBuilder(ParseOption);

impl ParseOptionBuilder {
    /// Set dialect. PCL XL switches to wide segment headers, a later
    /// `width()` call overrides that.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.0.dialect = dialect;
        if dialect == Dialect::PclXl {
            self.0.width = HeaderWidth::Wide;
        }
        self
    }

    pub fn width(mut self, width: HeaderWidth) -> Self {
        self.0.width = width;
        self
    }

    pub fn show_binary(mut self, show: bool) -> Self {
        self.0.show_binary = show;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.0.level = level;
        self
    }

    pub fn build(self) -> ParseOption {
        self.0
    }
}

/// Decodes a segmented data region one block at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentParser {
    option: ParseOption,
}

impl SegmentParser {
    pub fn new(option: ParseOption) -> Self {
        Self { option }
    }

    /// Consume as many segments of `block` as possible.
    ///
    /// `region` is the state returned by the previous call, or a fresh
    /// `Region::new()` for the first block. Stops when the region is
    /// exhausted, when the next structure is not complete in the block (the
    /// returned step then carries a `Continuation`), or after a consistency
    /// problem once the segment in flight is consumed.
    pub fn step(&self, region: &Region, block: Block, sink: &mut dyn RowSink) -> Step {
        let option = &self.option;
        let mut region = region.clone();
        let mut window = Window::new(block);
        let mut out = Emitter::new(sink, option.level);
        let hlen = option.width.header_len();

        if !region.is_started() {
            region.start();
            out.begin(window.file_offset(), "");
            out.comment(
                0,
                "Segmented data",
                format!("begins here: {} bytes", region.data_remaining()),
            );
        }

        let mut continuation = None;
        while region.data_remaining() > 0
            && continuation.is_none()
            && (region.is_valid() || region.segment_remaining() > 0)
        {
            if region.segment_remaining() == 0 {
                if (region.data_remaining() as usize) < hlen {
                    out.begin(window.file_offset(), "");
                    out.warning(
                        0,
                        &Diagnostic::new(format!(
                            "{} bytes of segmented data left, less than segment header",
                            region.data_remaining()
                        )),
                    );
                    region.invalidate();
                    break;
                }

                let Some(header) = window
                    .peek(hlen)
                    .and_then(|buf| SegmentHeader::parse(buf, option.width))
                else {
                    continuation = Some(Continuation::Backtrack {
                        distance: window.remaining(),
                        segment: None,
                    });
                    break;
                };

                if decode_segment(header, &mut window, &mut region, option, &mut out)
                    == Outcome::Starved
                {
                    continuation = Some(Continuation::Backtrack {
                        distance: window.remaining(),
                        segment: Some(header.tag),
                    });
                    break;
                }
            }

            let seg_rem = region.segment_remaining() as usize;
            if seg_rem > window.remaining() {
                let bytes = window.advance(window.remaining());
                region.consume_body(bytes, option.dialect);
                continuation = Some(Continuation::Resume {
                    segment: region.segment_tag(),
                });
            } else if seg_rem > 0 {
                let bytes = window.advance(seg_rem);
                region.consume_body(bytes, option.dialect);
            }
        }

        if let Some(c) = continuation {
            debug!(
                "suspend at {} ({} of {} bytes used): {:?}",
                window.file_offset(),
                window.consumed(),
                block.len(),
                c
            );
        }

        Step {
            consumed: window.consumed(),
            region,
            continuation,
        }
    }
}
