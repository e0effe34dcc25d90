use anyhow::{bail, Context, Result as AnyResult};
use clap::{arg, value_parser, ArgMatches, Command};
use mimalloc::MiMalloc;
use pcl_fontsegs::{
    Dialect, Feeder, HeaderWidth, OffsetFormat, ParseOptionBuilder, Region, Row, SegmentParser,
    Summary, MAX_BLOCK_LEN,
};
use std::{
    io::{stdout, BufWriter, Write},
    path::PathBuf,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn cli() -> Command {
    Command::new("fontsegs-dump")
        .about("Dump the segmented data of a PCL / PCL XL soft font header")
        .arg(
            arg!(-f <filename> "File holding the font header")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            arg!(--offset <offset> "Offset of the first segment, default: 0")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--size <size> "Bytes of segmented data, default: rest of the file")
                .value_parser(value_parser!(u32)),
        )
        .arg(arg!(--xl "PCL XL font: wide segment headers, no checksum"))
        .arg(arg!(--wide "Segment sizes are 32 bit").conflicts_with("narrow"))
        .arg(arg!(--narrow "Segment sizes are 16 bit"))
        .arg(arg!(--binary "Show hex dump of the interpreted bytes"))
        .arg(arg!(--hex "Show offsets in hexadecimal"))
        .arg(
            arg!(--block <block> "Block length the data is fed in, default: 2048")
                .value_parser(value_parser!(usize)),
        )
}

struct DumpArgs<'a> {
    path: &'a PathBuf,
    offset: usize,
    size: Option<u32>,
    dialect: Dialect,
    width: Option<HeaderWidth>,
    show_binary: bool,
    offset_format: OffsetFormat,
    block_len: usize,
}

impl<'a> DumpArgs<'a> {
    fn from_matches(m: &'a ArgMatches) -> AnyResult<Self> {
        let flag = |id: &str| m.get_one::<bool>(id).copied().unwrap_or_default();
        let width = if flag("wide") {
            Some(HeaderWidth::Wide)
        } else if flag("narrow") {
            Some(HeaderWidth::Narrow)
        } else {
            None
        };
        Ok(Self {
            path: m.get_one("filename").context("missing file name")?,
            offset: m.get_one::<usize>("offset").copied().unwrap_or_default(),
            size: m.get_one::<u32>("size").copied(),
            dialect: if flag("xl") {
                Dialect::PclXl
            } else {
                Dialect::Pcl
            },
            width,
            show_binary: flag("binary"),
            offset_format: if flag("hex") {
                OffsetFormat::Hexadecimal
            } else {
                OffsetFormat::Decimal
            },
            block_len: m
                .get_one::<usize>("block")
                .copied()
                .unwrap_or(MAX_BLOCK_LEN),
        })
    }
}

fn dump(args: DumpArgs) -> AnyResult<()> {
    let DumpArgs {
        path,
        offset,
        size,
        dialect,
        width,
        show_binary,
        offset_format,
        block_len,
    } = args;

    if block_len == 0 {
        bail!("block length must not be zero");
    }
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let size = match size {
        Some(size) => size,
        None => u32::try_from(data.len().saturating_sub(offset))?,
    };

    let mut option = ParseOptionBuilder::new()
        .dialect(dialect)
        .show_binary(show_binary);
    if let Some(width) = width {
        option = option.width(width);
    }
    let parser = SegmentParser::new(option.build());

    let mut rows: Vec<Row> = vec![];
    let result = Feeder::new(&data, parser)
        .block_len(block_len)
        .run(offset, Region::new(size), &mut rows);

    let mut out = BufWriter::new(stdout().lock());
    for row in &rows {
        writeln!(out, "{}", row.display(offset_format))?;
    }
    // rows decoded before a delivery error are still shown
    let summary = result?;
    writeln!(out, "{}", summary_line(&summary, offset, size, dialect))?;
    out.flush()?;
    Ok(())
}

/// Consumed bytes, checksum (PCL only) and verdict.
fn summary_line(summary: &Summary, offset: usize, size: u32, dialect: Dialect) -> String {
    let mut r = format!(
        "{} of {} bytes consumed in {} blocks",
        summary.end - offset as u64,
        size,
        summary.blocks
    );
    if dialect == Dialect::Pcl {
        let checksum = summary.checksum();
        r.push_str(&format!(
            ", checksum 0x{:02x} (complement 0x{:02x})",
            checksum.value(),
            checksum.complement()
        ));
    }
    r.push_str(&format!(", {}", summary.verdict()));
    r
}

fn main() -> AnyResult<()> {
    env_logger::init();

    let matches = cli().get_matches();
    dump(DumpArgs::from_matches(&matches)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn parse_args() {
        let m = cli()
            .try_get_matches_from([
                "fontsegs-dump",
                "-f",
                "font.sfp",
                "--offset",
                "72",
                "--xl",
                "--narrow",
                "--hex",
            ])
            .unwrap();
        let args = DumpArgs::from_matches(&m).unwrap();
        assert_eq!(72, args.offset);
        assert_eq!(None, args.size);
        assert_eq!(Dialect::PclXl, args.dialect);
        assert_eq!(Some(HeaderWidth::Narrow), args.width);
        assert_eq!(OffsetFormat::Hexadecimal, args.offset_format);
        assert_eq!(MAX_BLOCK_LEN, args.block_len);
    }

    #[test]
    fn summary_shows_checksum_for_pcl() {
        let mut rows: Vec<Row> = vec![];
        let data = [0x42, 0x52, 0x00, 0x04, 0x02, 0x58, 0x02, 0x58];
        let summary = Feeder::new(&data, SegmentParser::default())
            .run(0, Region::new(8), &mut rows)
            .unwrap();
        assert_eq!(
            "8 of 8 bytes consumed in 1 blocks, checksum 0x4c (complement 0xb4), Done",
            summary_line(&summary, 0, 8, Dialect::Pcl)
        );
        assert_eq!(
            "8 of 8 bytes consumed in 1 blocks, Done",
            summary_line(&summary, 0, 8, Dialect::PclXl)
        );
    }

    #[test]
    fn wide_conflicts_with_narrow() {
        assert!(cli()
            .try_get_matches_from(["fontsegs-dump", "-f", "x", "--wide", "--narrow"])
            .is_err());
    }
}
