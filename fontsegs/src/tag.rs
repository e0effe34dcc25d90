use strum::EnumIter;

/// Size of the segment size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderWidth {
    /// Format 15 TrueType headers: 16 bit size, 4 byte segment header.
    #[default]
    Narrow,
    /// Format 16 (Universal) and PCL XL headers: 32 bit size, 6 byte segment
    /// header.
    Wide,
}

impl HeaderWidth {
    /// Segment header length, tag plus size.
    pub fn header_len(self) -> usize {
        match self {
            Self::Narrow => 4,
            Self::Wide => 6,
        }
    }
}

/// Segment type, read as two big-endian ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SegmentTag {
    ApplicationSupport,
    BitmapResolution,
    CharacterComplement,
    CharacterEnhancement,
    Copyright,
    GalleyCharacter,
    GlobalIntellifont,
    GlobalTrueType,
    IntellifontFace,
    PanoseDescription,
    PostScriptFont,
    TypefaceString,
    VerticalExclude,
    VendorInformation,
    VerticalRotation,
    VerticalTransformation,
    XWindowFont,
    /// 0xFFFF, ends the segmented data.
    Null,
    Unknown(u16),
}

const NULL_TAG: u16 = 0xffff;

const fn code(s: &[u8; 2]) -> u16 {
    ((s[0] as u16) << 8) | s[1] as u16
}

/// Known two character codes.
const KNOWN: [(SegmentTag, u16); 17] = [
    (SegmentTag::ApplicationSupport, code(b"AP")),
    (SegmentTag::BitmapResolution, code(b"BR")),
    (SegmentTag::CharacterComplement, code(b"CC")),
    (SegmentTag::CharacterEnhancement, code(b"CE")),
    (SegmentTag::Copyright, code(b"CP")),
    (SegmentTag::GalleyCharacter, code(b"GC")),
    (SegmentTag::GlobalIntellifont, code(b"GI")),
    (SegmentTag::GlobalTrueType, code(b"GT")),
    (SegmentTag::IntellifontFace, code(b"IF")),
    (SegmentTag::PanoseDescription, code(b"PA")),
    (SegmentTag::PostScriptFont, code(b"PF")),
    (SegmentTag::TypefaceString, code(b"TF")),
    (SegmentTag::VerticalExclude, code(b"VE")),
    (SegmentTag::VendorInformation, code(b"VI")),
    (SegmentTag::VerticalRotation, code(b"VR")),
    (SegmentTag::VerticalTransformation, code(b"VT")),
    (SegmentTag::XWindowFont, code(b"XW")),
];

impl SegmentTag {
    pub fn from_u16(v: u16) -> Self {
        if v == NULL_TAG {
            return Self::Null;
        }
        KNOWN
            .iter()
            .find_map(|(tag, c)| (*c == v).then_some(*tag))
            .unwrap_or(Self::Unknown(v))
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Self::Null => NULL_TAG,
            Self::Unknown(v) => v,
            tag => KNOWN
                .iter()
                .find_map(|(t, c)| (*t == tag).then_some(*c))
                .unwrap_or_default(),
        }
    }

    /// Two letter code, or the tag value in hex if it is not printable.
    pub fn code(self) -> String {
        let v = self.to_u16();
        let [hi, lo] = v.to_be_bytes();
        if self != Self::Null && hi.is_ascii_graphic() && lo.is_ascii_graphic() {
            format!("{}{}", hi as char, lo as char)
        } else {
            format!("0x{:04x}", v)
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ApplicationSupport => "Application Support",
            Self::BitmapResolution => "Bitmap Resolution",
            Self::CharacterComplement => "Character Complement",
            Self::CharacterEnhancement => "Character Enhancement",
            Self::Copyright => "Copyright",
            Self::GalleyCharacter => "Galley Character",
            Self::GlobalIntellifont => "Global Intellifont",
            Self::GlobalTrueType => "Global TrueType",
            Self::IntellifontFace => "Intellifont Face",
            Self::PanoseDescription => "Panose Description",
            Self::PostScriptFont => "PostScript Font",
            Self::TypefaceString => "Type Face String",
            Self::VerticalExclude => "Vertical Exclude",
            Self::VendorInformation => "Vendor Information",
            Self::VerticalRotation => "Vertical Rotation",
            Self::VerticalTransformation => "Vertical Transformation",
            Self::XWindowFont => "X-Window Font",
            Self::Null => "Null",
            Self::Unknown(_) => "Unknown type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(0x4252 => SegmentTag::BitmapResolution; "BR")]
    #[test_case(0x4754 => SegmentTag::GlobalTrueType; "GT")]
    #[test_case(0xffff => SegmentTag::Null)]
    #[test_case(0x5a5a => SegmentTag::Unknown(0x5a5a); "ZZ")]
    fn tag_from_u16(v: u16) -> SegmentTag {
        SegmentTag::from_u16(v)
    }

    #[test]
    fn known_tags_round_trip() {
        for tag in SegmentTag::iter().filter(|t| !matches!(t, SegmentTag::Unknown(_))) {
            assert_eq!(tag, SegmentTag::from_u16(tag.to_u16()), "{:?}", tag);
        }
    }

    #[test_case(SegmentTag::VerticalTransformation => "VT")]
    #[test_case(SegmentTag::Null => "0xffff")]
    #[test_case(SegmentTag::Unknown(0x5a5a) => "ZZ")]
    #[test_case(SegmentTag::Unknown(0x0102) => "0x0102")]
    fn tag_code(tag: SegmentTag) -> String {
        tag.code()
    }

    #[test_case(HeaderWidth::Narrow => 4)]
    #[test_case(HeaderWidth::Wide => 6)]
    fn header_len(w: HeaderWidth) -> usize {
        w.header_len()
    }
}
