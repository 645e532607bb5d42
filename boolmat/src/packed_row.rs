//! Packed rows: one row of a boolean matrix stored as a single fixed-width value
//!
//! Bit `j` of a packed row is column `j` of the matrix, counting from the least significant bit.
//! Rows of up to 128 bits are plain unsigned integers. Wider rows use [`BitRow`], an array of
//! [`BitBlock`]s.

use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A block of bits in a [`BitRow`]. This is an alias for [`u64`]
pub type BitBlock = u64;

/// Number of bits in a [`BitBlock`]
pub const BLOCKSIZE: usize = 64;

/// Bitwise OR with this constant to set the least significant bit to one
const LSB_ON: BitBlock = 0x0000000000000001;

/// Bitwise AND with this constant to set the least significant bit to zero
const LSB_OFF: BitBlock = 0xfffffffffffffffe;

/// A fixed-width row of bits that supports word-parallel boolean operations
///
/// `|` and `&` act on all [`PackedRow::BITS`] bits at once. [`PackedRow::broadcast`] turns a
/// single bit into an all-zero or all-ones row without branching, which is what the packed
/// matrix product relies on.
pub trait PackedRow:
    Copy
    + Eq
    + Hash
    + Debug
    + Send
    + Sync
    + BitOr<Output = Self>
    + BitAnd<Output = Self>
    + Not<Output = Self>
    + BitOrAssign
    + BitAndAssign
{
    /// Number of bits in the row
    const BITS: usize;

    /// The row with every bit set to 0
    const ZERO: Self;

    /// Returns the bit at `index`
    fn bit(&self, index: usize) -> bool;

    /// Sets the bit at `index` to `value`
    fn set_bit(&mut self, index: usize, value: bool);

    /// Returns the row with only the bit at `index` set
    fn unit(index: usize) -> Self;

    /// Returns the row whose lowest `len` bits are set
    fn low_mask(len: usize) -> Self;

    /// Expands a single bit to a full row: all zeros for `false`, all ones for `true`
    fn broadcast(bit: bool) -> Self;

    /// Number of bits set to 1
    fn count_ones(&self) -> u32;

    /// A uniformly random row
    fn random(rng: &mut impl Rng) -> Self;

    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

macro_rules! impl_packed_row_for_uint {
    ($($word:ty),*) => {
        $(
            impl PackedRow for $word {
                const BITS: usize = <$word>::BITS as usize;
                const ZERO: Self = 0;

                #[inline]
                fn bit(&self, index: usize) -> bool {
                    debug_assert!(index < <Self as PackedRow>::BITS);
                    (*self >> index) & 1 == 1
                }

                #[inline]
                fn set_bit(&mut self, index: usize, value: bool) {
                    debug_assert!(index < <Self as PackedRow>::BITS);
                    *self = (*self & !(1 << index)) | ((value as $word) << index);
                }

                #[inline]
                fn unit(index: usize) -> Self {
                    1 << index
                }

                #[inline]
                fn low_mask(len: usize) -> Self {
                    if len >= <Self as PackedRow>::BITS {
                        <$word>::MAX
                    } else {
                        (1 << len) - 1
                    }
                }

                #[inline]
                fn broadcast(bit: bool) -> Self {
                    (bit as $word).wrapping_neg()
                }

                #[inline]
                fn count_ones(&self) -> u32 {
                    <$word>::count_ones(*self)
                }

                #[inline]
                fn random(rng: &mut impl Rng) -> Self {
                    rng.random::<$word>()
                }
            }
        )*
    };
}

impl_packed_row_for_uint!(u8, u16, u32, u64, u128);

/// A row of `W * 64` bits, stored as `W` [`BitBlock`]s
///
/// Block `k` holds bits `64 * k` through `64 * k + 63`, least significant bit first, so bit
/// `j` of the row lives in block `j / 64` at position `j % 64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct BitRow<const W: usize>([BitBlock; W]);

impl<const W: usize> BitRow<W> {
    #[inline]
    pub const fn from_blocks(blocks: [BitBlock; W]) -> Self {
        BitRow(blocks)
    }

    #[inline]
    pub fn blocks(&self) -> &[BitBlock; W] {
        &self.0
    }

    /// Returns an iterator over the [`BitBlock`]s in this row.
    #[inline]
    pub fn block_iter(&self) -> impl Iterator<Item = BitBlock> + '_ {
        self.0.iter().copied()
    }
}

impl<const W: usize> Default for BitRow<W> {
    fn default() -> Self {
        BitRow([0; W])
    }
}

impl<const W: usize> PackedRow for BitRow<W> {
    const BITS: usize = W * BLOCKSIZE;
    const ZERO: Self = BitRow([0; W]);

    #[inline]
    fn bit(&self, index: usize) -> bool {
        let block_index = index / BLOCKSIZE;
        let bit_index = (index % BLOCKSIZE) as u32;
        self.0[block_index].rotate_right(bit_index) & LSB_ON == LSB_ON
    }

    #[inline]
    fn set_bit(&mut self, index: usize, value: bool) {
        let block_index = index / BLOCKSIZE;
        let bit_index = (index % BLOCKSIZE) as u32;
        let mut block = self.0[block_index].rotate_right(bit_index);
        if value {
            block |= LSB_ON;
        } else {
            block &= LSB_OFF;
        }
        self.0[block_index] = block.rotate_left(bit_index);
    }

    #[inline]
    fn unit(index: usize) -> Self {
        let mut row = Self::ZERO;
        row.set_bit(index, true);
        row
    }

    fn low_mask(len: usize) -> Self {
        let mut row = Self::ZERO;
        for (k, block) in row.0.iter_mut().enumerate() {
            let covered = len.saturating_sub(k * BLOCKSIZE);
            *block = if covered >= BLOCKSIZE {
                BitBlock::MAX
            } else {
                (1 << covered) - 1
            };
        }
        row
    }

    #[inline]
    fn broadcast(bit: bool) -> Self {
        BitRow([(bit as BitBlock).wrapping_neg(); W])
    }

    #[inline]
    fn count_ones(&self) -> u32 {
        self.block_iter().fold(0, |c, bits| c + bits.count_ones())
    }

    #[inline]
    fn random(rng: &mut impl Rng) -> Self {
        BitRow(std::array::from_fn(|_| rng.random::<BitBlock>()))
    }
}

impl<const W: usize> BitOrAssign for BitRow<W> {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        for (bits0, bits1) in self.0.iter_mut().zip(rhs.0.iter()) {
            *bits0 |= bits1;
        }
    }
}

impl<const W: usize> BitAndAssign for BitRow<W> {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        for (bits0, bits1) in self.0.iter_mut().zip(rhs.0.iter()) {
            *bits0 &= bits1;
        }
    }
}

impl<const W: usize> BitOr for BitRow<W> {
    type Output = Self;

    #[inline]
    fn bitor(mut self, rhs: Self) -> Self {
        self |= rhs;
        self
    }
}

impl<const W: usize> BitAnd for BitRow<W> {
    type Output = Self;

    #[inline]
    fn bitand(mut self, rhs: Self) -> Self {
        self &= rhs;
        self
    }
}

impl<const W: usize> Not for BitRow<W> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        BitRow(self.0.map(|bits| !bits))
    }
}

impl<const W: usize> From<[BitBlock; W]> for BitRow<W> {
    fn from(value: [BitBlock; W]) -> Self {
        BitRow(value)
    }
}

/// Places `value` in the lowest block, so small literals can be used as rows
impl<const W: usize> From<BitBlock> for BitRow<W> {
    fn from(value: BitBlock) -> Self {
        let mut row = Self::ZERO;
        if let Some(block) = row.0.first_mut() {
            *block = value;
        }
        row
    }
}

impl<const W: usize> From<BitRow<W>> for [BitBlock; W] {
    fn from(value: BitRow<W>) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn broadcast() {
        assert_eq!(u8::broadcast(false), 0);
        assert_eq!(u8::broadcast(true), 0xff);
        assert_eq!(u64::broadcast(true), u64::MAX);
        assert_eq!(u128::broadcast(true), u128::MAX);
        assert_eq!(BitRow::<3>::broadcast(false), BitRow::ZERO);
        assert_eq!(BitRow::<3>::broadcast(true), BitRow([u64::MAX; 3]));
    }

    #[test]
    fn low_mask() {
        assert_eq!(u8::low_mask(0), 0);
        assert_eq!(u8::low_mask(5), 0b11111);
        assert_eq!(u8::low_mask(8), 0xff);
        assert_eq!(u32::low_mask(32), u32::MAX);
        assert_eq!(BitRow::<3>::low_mask(70), BitRow([u64::MAX, 0b111111, 0]));
        assert_eq!(BitRow::<2>::low_mask(128), BitRow([u64::MAX; 2]));
    }

    #[test]
    fn bit_get_set() {
        let bits = vec![0, 3, 63, 64, 100, 201, 255];

        let mut row = BitRow::<4>::ZERO;
        for &b in &bits {
            row.set_bit(b, true);
        }
        for i in 0..BitRow::<4>::BITS {
            assert_eq!(row.bit(i), bits.contains(&i));
        }
        assert_eq!(row.count_ones(), bits.len() as u32);

        let mut row = !BitRow::<4>::ZERO;
        for &b in &bits {
            row.set_bit(b, false);
        }
        for i in 0..BitRow::<4>::BITS {
            assert_eq!(row.bit(i), !bits.contains(&i));
        }

        let mut word = 0u16;
        word.set_bit(3, true);
        word.set_bit(15, true);
        assert_eq!(word, 0b1000_0000_0000_1000);
        word.set_bit(3, false);
        assert_eq!(word, 0b1000_0000_0000_0000);
        assert!(word.bit(15));
        assert!(!word.bit(14));
    }

    #[test]
    fn unit_rows() {
        for i in 0..8 {
            assert_eq!(u8::unit(i), 1 << i);
        }
        let row = BitRow::<2>::unit(70);
        assert_eq!(row.blocks(), &[0, 1 << 6]);

        assert_eq!(BitRow::<2>::from(0b101u64), BitRow::from_blocks([0b101, 0]));
        assert_eq!(BitRow::<2>::from(1u64), BitRow::<2>::unit(0));
    }

    #[test]
    fn or_and() {
        let mut rng = SmallRng::seed_from_u64(1);
        let a = BitRow::<4>::random(&mut rng);
        let b = BitRow::<4>::random(&mut rng);
        for i in 0..BitRow::<4>::BITS {
            assert_eq!((a | b).bit(i), a.bit(i) | b.bit(i));
            assert_eq!((a & b).bit(i), a.bit(i) & b.bit(i));
            assert_eq!((!a).bit(i), !a.bit(i));
        }
        assert_eq!(a & BitRow::ZERO, BitRow::ZERO);
        assert_eq!(a | BitRow::ZERO, a);
    }
}
