//! Bit-level helpers for the two orderings the formats use.
//!
//! The forward LZ and RLE streams interleave flag bytes with data blocks, so
//! the flag readers here hold only the current byte's state and are refilled
//! by the codec as it goes. Huffman packs its prefix codes into 32-bit
//! little-endian words with bit 31 first; the word reader/writer pair covers
//! that. LZ-Overlay walks its stream backwards and consumes flag bits
//! LSB-first; per the formats' design these orderings are kept as separate
//! types rather than unified behind a direction parameter.

/// MSB-first flag bits, one byte at a time.
///
/// Used by LZ10 and LZ11: each flag byte announces the kind of the next
/// eight blocks, most significant bit first.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagReader {
    bits: u8,
    remaining: u8,
}

impl FlagReader {
    /// Create an empty reader; the first `take` returns `None` until a
    /// refill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the next flag byte.
    pub fn refill(&mut self, byte: u8) {
        self.bits = byte;
        self.remaining = 8;
    }

    /// Take the next flag, or `None` when the current byte is spent.
    pub fn take(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        let flag = self.bits & 0x80 != 0;
        self.bits <<= 1;
        self.remaining -= 1;
        Some(flag)
    }
}

/// LSB-first flag bits for the reversed LZ-Overlay stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevFlagReader {
    bits: u8,
    remaining: u8,
}

impl RevFlagReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the next flag byte (read from high addresses toward low).
    pub fn refill(&mut self, byte: u8) {
        self.bits = byte;
        self.remaining = 8;
    }

    /// Take the next flag, or `None` when the current byte is spent.
    pub fn take(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        let flag = self.bits & 0x01 != 0;
        self.bits >>= 1;
        self.remaining -= 1;
        Some(flag)
    }
}

/// Bit reader over 32-bit little-endian words, bit 31 first.
///
/// The Huffman bitstream is stored as whole words; the codec reads each word
/// from the stream and feeds it here.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordBitReader {
    word: u32,
    remaining: u8,
}

impl WordBitReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the next 32-bit word.
    pub fn refill(&mut self, word: u32) {
        self.word = word;
        self.remaining = 32;
    }

    /// Take the next bit, or `None` when the current word is spent.
    pub fn take(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.word & 0x8000_0000 != 0;
        self.word <<= 1;
        self.remaining -= 1;
        Some(bit)
    }
}

/// Bit writer producing 32-bit words, bit 31 first.
///
/// Completed words surface through the return value of [`push`] and the
/// final partial word through [`flush`]; the caller writes them out
/// little-endian.
///
/// [`push`]: WordBitWriter::push
/// [`flush`]: WordBitWriter::flush
#[derive(Debug, Default, Clone, Copy)]
pub struct WordBitWriter {
    word: u32,
    used: u8,
}

impl WordBitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit; returns the finished word every 32nd push.
    pub fn push(&mut self, bit: bool) -> Option<u32> {
        self.word = (self.word << 1) | u32::from(bit);
        self.used += 1;
        if self.used == 32 {
            let word = self.word;
            self.word = 0;
            self.used = 0;
            Some(word)
        } else {
            None
        }
    }

    /// Append the low `len` bits of `code`, most significant first.
    ///
    /// Returns the words completed along the way (at most two for codes up
    /// to 64 bits).
    pub fn push_code(&mut self, code: u64, len: u8) -> [Option<u32>; 2] {
        let mut completed = [None, None];
        let mut n = 0;
        for i in (0..len).rev() {
            if let Some(word) = self.push(code >> i & 1 != 0) {
                completed[n] = Some(word);
                n += 1;
            }
        }
        completed
    }

    /// Finish the stream: the partial word zero-padded on the right, or
    /// `None` when the writer is word-aligned.
    pub fn flush(&mut self) -> Option<u32> {
        if self.used == 0 {
            return None;
        }
        let word = self.word << (32 - self.used);
        self.word = 0;
        self.used = 0;
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_reader_msb_first() {
        let mut flags = FlagReader::new();
        assert_eq!(flags.take(), None);

        flags.refill(0b1010_0001);
        let taken: Vec<bool> = std::iter::from_fn(|| flags.take()).collect();
        assert_eq!(
            taken,
            vec![true, false, true, false, false, false, false, true]
        );
        assert_eq!(flags.take(), None);
    }

    #[test]
    fn test_rev_flag_reader_lsb_first() {
        let mut flags = RevFlagReader::new();
        flags.refill(0b1010_0001);
        let taken: Vec<bool> = std::iter::from_fn(|| flags.take()).collect();
        assert_eq!(
            taken,
            vec![true, false, false, false, false, true, false, true]
        );
    }

    #[test]
    fn test_word_reader_bit31_first() {
        let mut bits = WordBitReader::new();
        bits.refill(0x8000_0001);
        assert_eq!(bits.take(), Some(true));
        for _ in 0..30 {
            assert_eq!(bits.take(), Some(false));
        }
        assert_eq!(bits.take(), Some(true));
        assert_eq!(bits.take(), None);
    }

    #[test]
    fn test_word_writer_roundtrip() {
        let mut writer = WordBitWriter::new();
        let mut words = Vec::new();
        for i in 0..40 {
            if let Some(word) = writer.push(i % 3 == 0) {
                words.push(word);
            }
        }
        if let Some(word) = writer.flush() {
            words.push(word);
        }
        assert_eq!(words.len(), 2);

        let mut reader = WordBitReader::new();
        let mut taken = Vec::new();
        for word in words {
            reader.refill(word);
            while let Some(bit) = reader.take() {
                taken.push(bit);
            }
        }
        for (i, bit) in taken.iter().enumerate().take(40) {
            assert_eq!(*bit, i % 3 == 0, "bit {i}");
        }
        // flush padding is zero bits
        assert!(taken[40..].iter().all(|bit| !bit));
    }

    #[test]
    fn test_push_code_matches_single_bits() {
        let mut by_code = WordBitWriter::new();
        let mut by_bits = WordBitWriter::new();

        // 40 bits so one word completes mid-code
        let completed = by_code.push_code(0xAB_CDEF, 24);
        assert_eq!(completed, [None, None]);
        let completed = by_code.push_code(0x5A5A, 16);
        assert!(completed[0].is_some());

        for i in (0..24).rev() {
            by_bits.push(0xAB_CDEFu64 >> i & 1 != 0);
        }
        let mut expected_word = None;
        for i in (0..16).rev() {
            if let Some(word) = by_bits.push(0x5A5Au64 >> i & 1 != 0) {
                expected_word = Some(word);
            }
        }
        assert_eq!(completed[0], expected_word);
        assert_eq!(by_code.flush(), by_bits.flush());
    }
}
