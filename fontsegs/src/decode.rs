//! Segment decoders.
//!
//! Every segment type shares one decode routine. The type decides the layout
//! of the interpreted part of the body (`Body`) and how its fields render
//! (`render_fields()`), the routine does the bounds checks, starvation
//! detection, checksum and counter bookkeeping.

use log::{debug, error};

use crate::{
    collection::{decode_collections, CollectionView, SymbolIndex},
    cursor::{FieldReader, Window},
    parser::ParseOption,
    trace::{Diagnostic, Emitter},
    HeaderWidth, Region, Result, SegmentTag, MAX_BLOCK_LEN,
};

/// Copyright and vendor text is shown in lines of at most this many bytes.
const TEXT_LINE_LEN: usize = 50;
/// Vertical transformation table terminator.
const VT_END_MARKER: u16 = 0xffff;

/// Segment header: type tag and declared body size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SegmentHeader {
    pub tag: SegmentTag,
    pub size: u32,
    /// Header length, 4 or 6.
    pub len: usize,
}

impl SegmentHeader {
    /// Parse header from `buf`, returns `None` if it is shorter than the header.
    pub fn parse(buf: &[u8], width: HeaderWidth) -> Option<Self> {
        let len = width.header_len();
        let buf = buf.get(..len)?;
        let tag = u16::from_be_bytes([buf[0], buf[1]]);
        let size = match width {
            HeaderWidth::Narrow => u16::from_be_bytes([buf[2], buf[3]]) as u32,
            HeaderWidth::Wide => u32::from_be_bytes([buf[2], buf[3], buf[4], buf[5]]),
        };
        Some(Self {
            tag: SegmentTag::from_u16(tag),
            size,
            len,
        })
    }
}

/// Layout of the interpreted part of a segment body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Body {
    /// Format not known or unknown type, the body is skipped.
    Opaque,
    /// Fixed length fields. If `strict`, bytes past them are an error.
    Fixed { len: usize, strict: bool },
    /// The whole body is ASCII text.
    Text,
    /// Fixed part with a 16 bit record count at `count_at`, then the records.
    Counted {
        fixed: usize,
        count_at: usize,
        record: usize,
        count_name: &'static str,
        strict: bool,
    },
    /// Substitution pairs, count derived from the segment size.
    VerticalTransformation,
}

impl Body {
    pub fn of(tag: SegmentTag) -> Self {
        use SegmentTag::*;

        match tag {
            ApplicationSupport | CharacterEnhancement | GlobalIntellifont | IntellifontFace
            | PostScriptFont | TypefaceString | XWindowFont | Unknown(_) => Self::Opaque,
            BitmapResolution => Self::Fixed {
                len: 4,
                strict: true,
            },
            // Trailing data after the complement is not reported.
            CharacterComplement => Self::Fixed {
                len: 8,
                strict: false,
            },
            PanoseDescription => Self::Fixed {
                len: 10,
                strict: true,
            },
            VerticalRotation => Self::Fixed {
                len: 4,
                strict: true,
            },
            Null => Self::Fixed {
                len: 0,
                strict: true,
            },
            Copyright | VendorInformation => Self::Text,
            GalleyCharacter => Self::Counted {
                fixed: 6,
                count_at: 4,
                record: 6,
                count_name: "Region Count",
                strict: true,
            },
            GlobalTrueType => Self::Counted {
                fixed: 12,
                count_at: 4,
                record: 16,
                count_name: "Table Count",
                // table data follows the directory
                strict: false,
            },
            VerticalExclude => Self::Counted {
                fixed: 2,
                count_at: 0,
                record: 4,
                count_name: "Range Count",
                strict: true,
            },
            VerticalTransformation => Self::VerticalTransformation,
        }
    }

    /// Length of the part interpreted before any count is known.
    fn fixed_len(self, size: usize) -> usize {
        match self {
            Self::Opaque => 0,
            Self::Fixed { len, .. } => len,
            Self::Text => size,
            Self::Counted { fixed, .. } => fixed,
            Self::VerticalTransformation => vt_substitutions(size) * 4 + 4,
        }
    }

    /// Whether a nonzero remainder after the interpreted part is an error.
    fn strict(self) -> bool {
        match self {
            Self::Fixed { strict, .. } | Self::Counted { strict, .. } => strict,
            Self::VerticalTransformation => true,
            Self::Opaque | Self::Text => false,
        }
    }
}

/// Number of substitution pairs in a vertical transformation segment of
/// `size` bytes: pairs of 4 bytes followed by 4 bytes of end markers.
fn vt_substitutions(size: usize) -> usize {
    size.saturating_sub(4) / 4
}

/// Decode result of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Header and interpreted part consumed, the rest of the body is recorded
    /// in the region's segment remainder.
    Decoded,
    /// The window does not hold the interpreted part, nothing consumed.
    Starved,
}

/// Rows for one segment, with diagnostics that invalidate the region.
struct Reporter<'a, 's> {
    out: &'a mut Emitter<'s>,
    region: &'a mut Region,
}

impl<'a, 's> Reporter<'a, 's> {
    fn field(&mut self, rel: usize, col2: impl Into<String>, col3: impl Into<String>) {
        self.out.field(rel, col2, col3);
    }

    fn note(&mut self, col2: impl Into<String>, col3: impl Into<String>) {
        self.out.note(col2, col3);
    }

    fn diagnose(&mut self, rel: usize, diag: Diagnostic) {
        self.out.warning(rel, &diag);
        self.region.invalidate();
    }
}

/// Decode the segment that starts at the window position.
///
/// Caller ensures the header is in the window and the region holds at least
/// a header.
pub(crate) fn decode_segment(
    header: SegmentHeader,
    window: &mut Window,
    region: &mut Region,
    option: &ParseOption,
    out: &mut Emitter,
) -> Outcome {
    let h = header.len;
    let room = region.data_remaining() - h as u32;
    let size = header.size.min(room);
    let body = Body::of(header.tag);
    let fixed = body.fixed_len(size as usize);

    if fixed > size as usize {
        // declared size can not hold the fields of this type, skip it as opaque
        let bytes = window.advance(h);
        region.consume(bytes, option.dialect);
        let mut rep = start_segment(header, size, bytes, window, region, option, out);
        rep.diagnose(
            0,
            Diagnostic::new(format!(
                "Segment size {} is less than minimum {} for {} segment",
                size,
                fixed,
                header.tag.code()
            ))
            .line("segment larger than declared size"),
        );
        rep.region.set_segment(header.tag, size);
        return Outcome::Decoded;
    }

    if h + fixed > MAX_BLOCK_LEN {
        let bytes = window.advance(h);
        region.consume(bytes, option.dialect);
        let mut rep = start_segment(header, size, bytes, window, region, option, out);
        rep.diagnose(
            0,
            Diagnostic::new(format!(
                "Segment of {} bytes exceeds maximum block size {}",
                h + fixed,
                MAX_BLOCK_LEN
            ))
            .line("segment data not interpreted"),
        );
        rep.region.set_segment(header.tag, size);
        return Outcome::Decoded;
    }

    let Some(buf) = window.peek(h + fixed) else {
        return Outcome::Starved;
    };

    let mut records = 0;
    let mut var = 0;
    if let Body::Counted {
        count_at,
        record,
        count_name,
        ..
    } = body
    {
        let at = h + count_at;
        records = u16::from_be_bytes([buf[at], buf[at + 1]]) as usize;
        var = records * record;
        let problem = if h + fixed + var > MAX_BLOCK_LEN {
            Some(
                Diagnostic::new(format!(
                    "{} {} implies header segment of {} bytes",
                    count_name,
                    records,
                    h + fixed + var
                ))
                .line(format!("larger than maximum block size {}", MAX_BLOCK_LEN))
                .line(format!("possibly corrupt {}", count_name)),
            )
        } else if fixed + var > size as usize {
            Some(
                Diagnostic::new(format!(
                    "{} {} implies segment of {} bytes",
                    count_name,
                    records,
                    fixed + var
                ))
                .line(format!("segment larger than declared size {}", size)),
            )
        } else {
            None
        };
        if let Some(diag) = problem {
            let bytes = window.advance(h + fixed);
            region.consume(bytes, option.dialect);
            let mut rep = start_segment(header, size, bytes, window, region, option, out);
            render(header.tag, &bytes[h..], h, size, None, &mut rep);
            rep.diagnose(at, diag);
            rep.region.set_segment(header.tag, size - fixed as u32);
            return Outcome::Decoded;
        }
    }

    if window.peek(h + fixed + var).is_none() {
        return Outcome::Starved;
    }
    let bytes = window.advance(h + fixed + var);
    region.consume(bytes, option.dialect);
    let mut rep = start_segment(header, size, bytes, window, region, option, out);
    let records = matches!(body, Body::Counted { .. }).then_some(records);
    render(header.tag, &bytes[h..], h, size, records, &mut rep);

    let seg_rem = size - (fixed + var) as u32;
    if seg_rem > 0 && body.strict() {
        rep.diagnose(
            h + fixed + var,
            Diagnostic::new(format!(
                "{} bytes remain in {} segment after known fields",
                seg_rem,
                header.tag.code()
            ))
            .line("possible format inconsistency"),
        );
    }
    rep.region.set_segment(header.tag, seg_rem);
    Outcome::Decoded
}

/// Emit dump and header rows of a segment whose first bytes, `consumed`, have
/// just been taken from the window.
fn start_segment<'a, 's>(
    header: SegmentHeader,
    size: u32,
    consumed: &[u8],
    window: &Window,
    region: &'a mut Region,
    option: &ParseOption,
    out: &'a mut Emitter<'s>,
) -> Reporter<'a, 's> {
    let base = window.file_offset() - consumed.len() as u64;
    debug!(
        "segment {} at {}, size {}",
        header.tag.code(),
        base,
        header.size
    );
    out.begin(base, header.tag.code());
    if option.show_binary {
        out.binary(0, consumed);
    }
    let type_text = match header.tag {
        SegmentTag::Null => "Null (end of segmented data)".to_owned(),
        SegmentTag::Unknown(_) => format!("{} (unknown type)", header.tag.code()),
        tag => format!("{} ({})", tag.code(), tag.name()),
    };
    out.segment(0, "Segment Type:", type_text);
    out.segment(2, "Segment Size:", header.size.to_string());

    let mut rep = Reporter { out, region };
    if size < header.size {
        rep.diagnose(
            2,
            Diagnostic::new(format!(
                "Segment size {} larger than remainder of segmented data",
                header.size
            ))
            .line(format!("only {} bytes left for segment data", size)),
        );
    }
    rep
}

/// Render fields of the interpreted part `buf`, which starts `h` bytes into
/// the segment. `records` is the count of a counted segment, `None` if the
/// records were not read.
fn render(
    tag: SegmentTag,
    buf: &[u8],
    h: usize,
    size: u32,
    records: Option<usize>,
    rep: &mut Reporter,
) {
    let mut r = FieldReader::new(buf, h);
    if let Err(e) = render_fields(tag, &mut r, size, records, rep) {
        // bounds are checked before rendering
        error!("render {} segment: {}", tag.code(), e);
    }
}

fn render_fields(
    tag: SegmentTag,
    r: &mut FieldReader,
    size: u32,
    records: Option<usize>,
    rep: &mut Reporter,
) -> Result<()> {
    use SegmentTag::*;

    match tag {
        ApplicationSupport | CharacterEnhancement | GlobalIntellifont | IntellifontFace
        | PostScriptFont | TypefaceString | XWindowFont => {
            if size > 0 {
                rep.field(r.offset(), "Segment Data:", format!("{} bytes, format not known", size));
            }
        }
        Unknown(_) => {
            if size > 0 {
                rep.field(r.offset(), "Segment Data:", format!("{} bytes, not interpreted", size));
            }
        }
        Null => {}
        BitmapResolution => {
            for label in ["X Resolution:", "Y Resolution:"] {
                let at = r.offset();
                let v = r.u16()?;
                rep.field(at, label, format!("{} dots per inch", v));
            }
        }
        CharacterComplement => {
            let at = r.offset();
            let v = r.u64()?;
            rep.field(at, "Character Complement:", format!("0x{:016x}", v));
            let index = SymbolIndex::from_complement(v);
            let view = CollectionView::Complement;
            for (label, text) in decode_collections(v, index, view).describe(index, view) {
                rep.note(label, text);
            }
        }
        Copyright | VendorInformation => {
            let label = if tag == Copyright {
                "Copyright:"
            } else {
                "Vendor Information:"
            };
            let at = r.offset();
            let text = r.bytes(r.remaining())?;
            for (i, line) in text.chunks(TEXT_LINE_LEN).enumerate() {
                let label = if i == 0 { label } else { "" };
                rep.field(at + i * TEXT_LINE_LEN, label, ascii_text(line));
            }
        }
        GalleyCharacter => {
            let at = r.offset();
            rep.field(at, "Format:", r.u16()?.to_string());
            let at = r.offset();
            rep.field(at, "Default Galley Character:", format!("0x{:04x}", r.u16()?));
            let at = r.offset();
            rep.field(at, "Number of Regions:", r.u16()?.to_string());
            for i in 0..records.unwrap_or_default() {
                let at = r.offset();
                let upper_left = r.u16()?;
                let lower_right = r.u16()?;
                let galley = r.u16()?;
                rep.field(
                    at,
                    format!("Region {}:", i),
                    format!("0x{:04x} - 0x{:04x}", upper_left, lower_right),
                );
                rep.note("Galley Character:", format!("0x{:04x}", galley));
            }
        }
        GlobalTrueType => {
            let at = r.offset();
            let version = r.u32()?;
            rep.field(
                at,
                "SFNT Version:",
                format!("0x{:08x} ({}.{})", version, version >> 16, version & 0xffff),
            );
            for label in [
                "Number of Tables:",
                "Search Range:",
                "Entry Selector:",
                "Range Shift:",
            ] {
                let at = r.offset();
                rep.field(at, label, r.u16()?.to_string());
            }
            for _ in 0..records.unwrap_or_default() {
                let at = r.offset();
                let name = ascii_text(r.bytes(4)?);
                let checksum = r.u32()?;
                let offset = r.u32()?;
                let length = r.u32()?;
                rep.field(
                    at,
                    format!("Table '{}':", name),
                    format!("offset {}, length {}", offset, length),
                );
                rep.note("Checksum:", format!("0x{:08x}", checksum));
                if offset as u64 + length as u64 > size as u64 {
                    rep.diagnose(
                        at,
                        Diagnostic::new(format!(
                            "Table '{}' offset {} + length {}",
                            name, offset, length
                        ))
                        .line(format!("exceeds segment size {}", size)),
                    );
                }
            }
        }
        PanoseDescription => {
            let at = r.offset();
            let v = r.bytes(10)?;
            let text = v.iter().map(|b| b.to_string()).collect::<Vec<_>>().join("-");
            rep.field(at, "PANOSE:", text);
        }
        VerticalExclude => {
            let at = r.offset();
            rep.field(at, "Number of Ranges:", r.u16()?.to_string());
            for i in 0..records.unwrap_or_default() {
                let at = r.offset();
                let first = r.u16()?;
                let last = r.u16()?;
                rep.field(
                    at,
                    format!("Range {}:", i),
                    format!("0x{:04x} - 0x{:04x}", first, last),
                );
            }
        }
        VerticalRotation => {
            let at = r.offset();
            rep.field(at, "Format:", r.u16()?.to_string());
            let at = r.offset();
            rep.field(at, "Descender:", r.i16()?.to_string());
        }
        VerticalTransformation => {
            let subs = vt_substitutions(size as usize);
            rep.field(r.offset(), "Substitutions:", subs.to_string());
            for i in 0..subs {
                let at = r.offset();
                rep.field(at, format!("Horizontal Glyph {}:", i), format!("0x{:04x}", r.u16()?));
                let at = r.offset();
                rep.field(at, format!("Vertical Glyph {}:", i), format!("0x{:04x}", r.u16()?));
            }
            for _ in 0..2 {
                let at = r.offset();
                let marker = r.u16()?;
                let text = if marker == VT_END_MARKER {
                    format!("0x{:04x}", marker)
                } else {
                    format!("0x{:04x} (expected 0x{:04x})", marker, VT_END_MARKER)
                };
                rep.field(at, "End Marker:", text);
            }
        }
    }
    Ok(())
}

/// Printable ASCII, other bytes as '.'.
fn ascii_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b == b' ' || b.is_ascii_graphic() {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
