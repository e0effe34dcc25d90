/// Running byte sum of a PCL font header, modulo 256.
///
/// The printer expects the sum of all header bytes from offset 64 up to and
/// including the checksum byte to be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checksum(u8);

impl Checksum {
    pub fn new(initial: u8) -> Self {
        Self(initial)
    }

    pub fn add(&mut self, bytes: &[u8]) {
        self.0 = bytes.iter().fold(self.0, |acc, b| acc.wrapping_add(*b));
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// The checksum byte that makes the header sum to zero.
    pub fn complement(&self) -> u8 {
        self.0.wrapping_neg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[] => 0)]
    #[test_case(&[1, 2, 3] => 6)]
    #[test_case(&[0xff, 0x02] => 1; "wraps")]
    fn sum(bytes: &[u8]) -> u8 {
        let mut c = Checksum::default();
        c.add(bytes);
        c.value()
    }

    #[test]
    fn split_add_is_same() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut whole = Checksum::default();
        whole.add(&bytes);
        let mut parts = Checksum::default();
        for chunk in bytes.chunks(7) {
            parts.add(chunk);
        }
        assert_eq!(whole, parts);
    }

    #[test]
    fn complement_zeroes_sum() {
        let mut c = Checksum::new(0x10);
        c.add(&[0x35, 0x7f]);
        let byte = c.complement();
        c.add(&[byte]);
        assert_eq!(0, c.value());
    }
}
