//! Character collection bit arrays.
//!
//! A font header's Character Complement and a symbol set's Character
//! Requirements are 64 bit arrays that are the bitwise complement of each
//! other: a font can print a symbol set if `complement & requirements == 0`.
//! Bits 0-2 name the symbol index the font or symbol set uses, bits 3-63 are
//! character collections.

/// Symbol index identifier bits.
const INDEX_MASK: u64 = 0b111;
/// Index bits of an MSL complement.
const MSL_BITS: u64 = 0b000;
/// Index bits of a Unicode complement.
const UNICODE_BITS: u64 = 0b110;
/// Character collection bits.
const COLLECTION_MASK: u64 = !INDEX_MASK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SymbolIndex {
    #[strum(serialize = "MSL")]
    Msl,
    Unicode,
}

impl SymbolIndex {
    /// Index named by the identifier bits of a complement, Unicode only on an
    /// exact match.
    pub fn from_complement(value: u64) -> Self {
        if value & INDEX_MASK == UNICODE_BITS {
            Self::Unicode
        } else {
            Self::Msl
        }
    }

    fn index_bits(self) -> u64 {
        match self {
            Self::Msl => MSL_BITS,
            Self::Unicode => UNICODE_BITS,
        }
    }

    fn collections(self) -> &'static [(u8, &'static str)] {
        match self {
            Self::Msl => MSL_COLLECTIONS,
            Self::Unicode => UNICODE_COLLECTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionView {
    /// Font header Character Complement, a clear bit means the font supports
    /// the collection.
    Complement,
    /// Symbol set Character Requirements, a set bit means the symbol set uses
    /// the collection.
    Requirements,
}

const MSL_COLLECTIONS: &[(u8, &str)] = &[
    (63, "Latin 1 (West Europe)"),
    (62, "Latin 2 (East Europe)"),
    (61, "Latin 5 (Turkish)"),
    (60, "Desktop Publishing"),
    (59, "PC Extensions"),
    (58, "Accents"),
    (57, "PCL Extensions"),
    (56, "Specials"),
    (55, "Line Draw"),
    (54, "Greek"),
    (53, "Cyrillic"),
    (52, "Math"),
    (51, "Arrows"),
    (50, "ITC Zapf Dingbats"),
];

const UNICODE_COLLECTIONS: &[(u8, &str)] = &[
    (63, "Latin 1 (West Europe)"),
    (62, "Latin 2 (East Europe)"),
    (61, "Latin 5 (Turkish)"),
    (60, "Latin 6 (Baltic)"),
    (59, "Cyrillic"),
    (58, "Greek"),
    (57, "Arabic"),
    (56, "Hebrew"),
    (55, "Thai"),
    (54, "Vietnamese"),
    (53, "Desktop Publishing"),
    (52, "PC Extensions"),
    (51, "Accents"),
    (50, "PCL Extensions"),
    (49, "Specials"),
    (48, "Line Draw"),
    (47, "Math"),
    (46, "Arrows"),
    (45, "Dingbats"),
    (44, "Private Use Area"),
];

/// Decoded collection bit array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    /// Identifier bits match the expected symbol index.
    pub index_matched: bool,
    /// Every collection bit clear, `collections` is empty.
    pub all_clear: bool,
    /// Collections supported (complement) or used (requirements).
    pub collections: Vec<&'static str>,
}

impl Collections {
    /// Text rows: symbol index first, then one line per collection.
    pub fn describe(&self, index: SymbolIndex, view: CollectionView) -> Vec<(String, String)> {
        let mut r = Vec::with_capacity(self.collections.len() + 1);
        r.push((
            "Symbol Index:".to_owned(),
            if self.index_matched {
                index.to_string()
            } else {
                "not MSL/Unicode value".to_owned()
            },
        ));
        let label = match view {
            CollectionView::Complement => "Supports:",
            CollectionView::Requirements => "Requires:",
        };
        if self.all_clear {
            let text = match view {
                CollectionView::Complement => "all character collections",
                CollectionView::Requirements => "no specific character collection",
            };
            r.push((label.to_owned(), text.to_owned()));
        } else {
            r.extend(
                self.collections
                    .iter()
                    .map(|c| (label.to_owned(), (*c).to_owned())),
            );
        }
        r
    }
}

/// Decode a Character Complement or Character Requirements value using the
/// collection table of `index`.
pub fn decode_collections(value: u64, index: SymbolIndex, view: CollectionView) -> Collections {
    let complement = match view {
        CollectionView::Complement => value,
        CollectionView::Requirements => !value,
    };
    let index_matched = complement & INDEX_MASK == index.index_bits();
    let all_clear = value & COLLECTION_MASK == 0;
    let collections = if all_clear {
        vec![]
    } else {
        index
            .collections()
            .iter()
            .filter(|(bit, _)| complement & (1u64 << bit) == 0)
            .map(|(_, name)| *name)
            .collect()
    };
    Collections {
        index_matched,
        all_clear,
        collections,
    }
}
