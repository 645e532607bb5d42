use crate::{
    error::BoolMatrixError,
    packed_row::{BitRow, PackedRow},
};
use log::debug;
use rand::Rng;
use ref_cast::RefCast;
use std::{
    fmt,
    ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, Index, Mul, MulAssign},
    str::FromStr,
};

pub mod parallel;
pub mod powers;

/// A square matrix over the boolean semiring, stored as `N` packed rows of type `R`
///
/// Bit `j` of row `i` is the entry at row `i`, column `j`. `N` must be at least 1 and at most
/// `R::BITS`, which is checked at compile time. When `N < R::BITS` the bits of each row at
/// positions `N..R::BITS` are padding: they are always 0 and are never read.
///
/// Addition is logical OR and multiplication is the boolean product
/// `C[i][j] = OR_k (A[i][k] AND B[k][j])`, computed a full row at a time.
#[derive(RefCast, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct BoolMatrix<R, const N: usize> {
    rows: [R; N],
}

pub type BoolMatrix8 = BoolMatrix<u8, 8>;
pub type BoolMatrix16 = BoolMatrix<u16, 16>;
pub type BoolMatrix32 = BoolMatrix<u32, 32>;
pub type BoolMatrix64 = BoolMatrix<u64, 64>;
pub type BoolMatrix128 = BoolMatrix<u128, 128>;
pub type BoolMatrix256 = BoolMatrix<BitRow<4>, 256>;
pub type BoolMatrix512 = BoolMatrix<BitRow<8>, 512>;

impl<R: PackedRow, const N: usize> BoolMatrix<R, N> {
    const VALID_SIZE: () = assert!(
        N > 0 && N <= R::BITS,
        "BoolMatrix size must be at least 1 and at most the width of its packed rows"
    );

    /// Wraps rows that are already known to have zero padding
    #[inline]
    pub(crate) fn from_array_unchecked(rows: [R; N]) -> Self {
        let () = Self::VALID_SIZE;
        BoolMatrix { rows }
    }

    #[inline]
    fn check_index(row: usize, col: usize) -> Result<(), BoolMatrixError> {
        if row < N && col < N {
            Ok(())
        } else {
            Err(BoolMatrixError::IndexOutOfRange { row, col, size: N })
        }
    }

    fn check_padding(rows: &[R; N]) -> Result<(), BoolMatrixError> {
        let padding = !R::low_mask(N);
        match rows.iter().position(|&row| !(row & padding).is_zero()) {
            Some(row) => Err(BoolMatrixError::PaddingBitsSet { row }),
            None => Ok(()),
        }
    }

    /// The all-zero matrix, which is the identity for OR
    #[inline]
    pub fn zeros() -> Self {
        Self::from_array_unchecked([R::ZERO; N])
    }

    /// The all-ones matrix, which is the identity for AND
    #[inline]
    pub fn ones() -> Self {
        Self::from_array_unchecked([R::low_mask(N); N])
    }

    /// The matrix with a 1 at `(i, j)` iff `i == j`
    pub fn identity() -> Self {
        Self::from_array_unchecked(std::array::from_fn(R::unit))
    }

    /// Builds a matrix from a function `f(i, j)` giving the value of each entry
    pub fn build(mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut m = Self::zeros();
        for (i, row) in m.rows.iter_mut().enumerate() {
            for j in 0..N {
                row.set_bit(j, f(i, j));
            }
        }
        m
    }

    #[inline]
    pub fn random(rng: &mut impl Rng) -> Self {
        let mask = R::low_mask(N);
        Self::from_array_unchecked(std::array::from_fn(|_| R::random(rng) & mask))
    }

    /// Builds a matrix from a sequence of packed rows
    ///
    /// Missing rows are filled with zeros and rows beyond the first `N` are ignored, so
    /// `from_rows([1, 2, 3, 4])` and `from_rows([1, 2, 3, 4, 0, 0, 0, 0])` give the same 8x8
    /// matrix. Bits at or beyond column `N` are cleared.
    pub fn from_rows<I: IntoIterator<Item = R>>(rows: I) -> Self {
        let mask = R::low_mask(N);
        let mut m = Self::zeros();
        let mut rows = rows.into_iter();
        for (dest, row) in m.rows.iter_mut().zip(rows.by_ref()) {
            *dest = row & mask;
        }
        if rows.next().is_some() {
            debug!("from_rows: ignoring rows beyond the first {}", N);
        }
        m
    }

    /// Builds a matrix from rows of `bool`s, padding or truncating rows and columns to `N`
    pub fn from_bool_rows(data: &[Vec<bool>]) -> Self {
        if data.len() > N || data.iter().any(|row| row.len() > N) {
            debug!("from_bool_rows: ignoring entries beyond {}x{}", N, N);
        }
        let mut m = Self::zeros();
        for (row, bits) in m.rows.iter_mut().zip(data) {
            for (j, &b) in bits.iter().take(N).enumerate() {
                row.set_bit(j, b);
            }
        }
        m
    }

    /// Views an array of packed rows as a matrix without copying
    ///
    /// # Errors
    ///
    /// [`BoolMatrixError::PaddingBitsSet`] if some row has a bit set at or beyond column `N`
    pub fn try_view(rows: &[R; N]) -> Result<&Self, BoolMatrixError> {
        let () = Self::VALID_SIZE;
        Self::check_padding(rows)?;
        Ok(Self::ref_cast(rows))
    }

    /// Mutable version of [`BoolMatrix::try_view`]
    ///
    /// # Errors
    ///
    /// [`BoolMatrixError::PaddingBitsSet`] if some row has a bit set at or beyond column `N`
    pub fn try_view_mut(rows: &mut [R; N]) -> Result<&mut Self, BoolMatrixError> {
        let () = Self::VALID_SIZE;
        Self::check_padding(rows)?;
        Ok(Self::ref_cast_mut(rows))
    }

    /// Number of rows, which is also the number of columns
    #[inline]
    pub const fn size(&self) -> usize {
        N
    }

    /// Returns the entry at `(i, j)`, or an error if either index is out of range
    #[inline]
    pub fn try_bit(&self, i: usize, j: usize) -> Result<bool, BoolMatrixError> {
        Self::check_index(i, j)?;
        Ok(self.rows[i].bit(j))
    }

    /// Sets the entry at `(i, j)`, or returns an error if either index is out of range
    #[inline]
    pub fn try_set_bit(&mut self, i: usize, j: usize, b: bool) -> Result<(), BoolMatrixError> {
        Self::check_index(i, j)?;
        self.rows[i].set_bit(j, b);
        Ok(())
    }

    /// Returns the entry at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not less than `N`
    #[inline]
    pub fn bit(&self, i: usize, j: usize) -> bool {
        self.try_bit(i, j).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Sets the entry at `(i, j)` to `b`, leaving every other entry unchanged
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not less than `N`
    #[inline]
    pub fn set_bit(&mut self, i: usize, j: usize, b: bool) {
        self.try_set_bit(i, j, b).unwrap_or_else(|e| panic!("{}", e));
    }

    /// Flips the entry at `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not less than `N`
    #[inline]
    pub fn flip_bit(&mut self, i: usize, j: usize) {
        let b = self.bit(i, j);
        self.set_bit(i, j, !b);
    }

    /// Returns row `i` as a packed row
    ///
    /// # Panics
    ///
    /// Panics if `i` is not less than `N`
    #[inline]
    pub fn row(&self, i: usize) -> R {
        assert!(i < N, "row index {} out of range for a {}x{} matrix", i, N, N);
        self.rows[i]
    }

    /// Returns column `j` as a packed row, i.e. bit `i` of the result is the entry at `(i, j)`
    ///
    /// This reads bit `j` of every row, so it costs `N` bit operations.
    ///
    /// # Panics
    ///
    /// Panics if `j` is not less than `N`
    pub fn column(&self, j: usize) -> R {
        assert!(j < N, "column index {} out of range for a {}x{} matrix", j, N, N);
        let mut column = R::ZERO;
        for (i, row) in self.rows.iter().enumerate() {
            column.set_bit(i, row.bit(j));
        }
        column
    }

    #[inline]
    pub fn as_rows(&self) -> &[R; N] {
        &self.rows
    }

    /// Returns a transposed copy of the matrix
    pub fn transposed(&self) -> Self {
        Self::from_array_unchecked(std::array::from_fn(|j| self.column(j)))
    }

    /// Number of entries equal to 1
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|row| row.is_zero())
    }

    /// Returns `row * self`, treating `row` as a row vector
    ///
    /// Every set bit `n` of `row` contributes row `n` of `self`.
    #[inline]
    pub(crate) fn row_product(&self, row: R) -> R {
        let mut acc = R::ZERO;
        for (n, &pivot_row) in self.rows.iter().enumerate() {
            acc |= R::broadcast(row.bit(n)) & pivot_row;
        }
        acc
    }

    /// Main working function for multiplication
    ///
    /// For each pivot `n`, row `n` of `rhs` is ORed into every output row `i` whose bit `n` is
    /// set in `self`. The bit is broadcast to a full-row mask rather than branched on.
    fn product(&self, rhs: &Self) -> [R; N] {
        let mut result = [R::ZERO; N];
        for (n, &pivot_row) in rhs.rows.iter().enumerate() {
            for (acc, row) in result.iter_mut().zip(self.rows.iter()) {
                *acc |= R::broadcast(row.bit(n)) & pivot_row;
            }
        }
        result
    }

    /// Replaces `self` with the boolean product `self * rhs`
    #[inline]
    pub fn multiply(&mut self, rhs: &Self) -> &mut Self {
        self.rows = self.product(rhs);
        self
    }

    /// Computes the boolean product entry by entry, with no packing tricks
    ///
    /// This is the reference the packed product is checked against.
    pub fn naive_mul(&self, rhs: &Self) -> Self {
        let mut res = Self::zeros();
        for i in 0..N {
            for j in 0..N {
                let mut b = false;
                for k in 0..N {
                    b |= self.rows[i].bit(k) & rhs.rows[k].bit(j);
                }
                res.rows[i].set_bit(j, b);
            }
        }
        res
    }
}

impl<R: PackedRow, const N: usize> Default for BoolMatrix<R, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Clears any bits at or beyond column `N`
impl<R: PackedRow, const N: usize> From<[R; N]> for BoolMatrix<R, N> {
    fn from(rows: [R; N]) -> Self {
        Self::from_rows(rows)
    }
}

impl<R: PackedRow, const N: usize> From<BoolMatrix<R, N>> for [R; N] {
    fn from(matrix: BoolMatrix<R, N>) -> Self {
        matrix.rows
    }
}

/// `matrix[(i, j)]` is equivalent to `matrix.bit(i, j)`
impl<R: PackedRow, const N: usize> Index<(usize, usize)> for BoolMatrix<R, N> {
    type Output = bool;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.bit(index.0, index.1) {
            &true
        } else {
            &false
        }
    }
}

/// Implements an entrywise operator and its assigning form, for owned and borrowed operands
macro_rules! impl_rowwise_op {
    ($op:ident, $op_fn:ident, $assign:ident, $assign_fn:ident, $row_op:tt) => {
        impl<R: PackedRow, const N: usize> $assign<&BoolMatrix<R, N>> for BoolMatrix<R, N> {
            #[inline]
            fn $assign_fn(&mut self, rhs: &BoolMatrix<R, N>) {
                for (row0, row1) in self.rows.iter_mut().zip(rhs.rows.iter()) {
                    *row0 $row_op *row1;
                }
            }
        }

        impl<R: PackedRow, const N: usize> $assign for BoolMatrix<R, N> {
            #[inline]
            fn $assign_fn(&mut self, rhs: BoolMatrix<R, N>) {
                $assign::$assign_fn(self, &rhs);
            }
        }

        impl<R: PackedRow, const N: usize> $op for &BoolMatrix<R, N> {
            type Output = BoolMatrix<R, N>;

            #[inline]
            fn $op_fn(self, rhs: Self) -> Self::Output {
                let mut res = *self;
                $assign::$assign_fn(&mut res, rhs);
                res
            }
        }

        impl<R: PackedRow, const N: usize> $op for BoolMatrix<R, N> {
            type Output = BoolMatrix<R, N>;

            #[inline]
            fn $op_fn(mut self, rhs: Self) -> Self::Output {
                $assign::$assign_fn(&mut self, &rhs);
                self
            }
        }
    };
}

impl_rowwise_op!(BitOr, bitor, BitOrAssign, bitor_assign, |=);
impl_rowwise_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &=);
// boolean addition is OR
impl_rowwise_op!(Add, add, AddAssign, add_assign, |=);

impl<R: PackedRow, const N: usize> Mul for &BoolMatrix<R, N> {
    type Output = BoolMatrix<R, N>;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        BoolMatrix::from_array_unchecked(self.product(rhs))
    }
}

impl<R: PackedRow, const N: usize> Mul for BoolMatrix<R, N> {
    type Output = BoolMatrix<R, N>;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl<R: PackedRow, const N: usize> MulAssign<&BoolMatrix<R, N>> for BoolMatrix<R, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: &BoolMatrix<R, N>) {
        self.multiply(rhs);
    }
}

impl<R: PackedRow, const N: usize> MulAssign for BoolMatrix<R, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: BoolMatrix<R, N>) {
        self.multiply(&rhs);
    }
}

/// Writes one line of `N` digits per row. The alternate form (`{:#}`) puts a space between
/// entries.
impl<R: PackedRow, const N: usize> fmt::Display for BoolMatrix<R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spaced = f.alternate();
        for row in self.rows.iter() {
            for j in 0..N {
                if spaced && j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", if row.bit(j) { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the output of [`fmt::Display`], with or without spaces between entries
///
/// Blank lines are skipped. Like [`BoolMatrix::from_rows`], missing rows or columns are zero
/// and extra ones are ignored.
impl<R: PackedRow, const N: usize> FromStr for BoolMatrix<R, N> {
    type Err = BoolMatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut m = Self::zeros();
        let mut clamped = false;
        let lines = s
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        for (i, (line_index, line)) in lines.enumerate() {
            let mut j = 0;
            for (char_index, c) in line.chars().enumerate() {
                let b = match c {
                    '0' => false,
                    '1' => true,
                    c if c.is_whitespace() => continue,
                    found => {
                        return Err(BoolMatrixError::Parse {
                            line: line_index + 1,
                            column: char_index + 1,
                            found,
                        })
                    }
                };
                if i < N && j < N {
                    m.rows[i].set_bit(j, b);
                } else {
                    clamped = true;
                }
                j += 1;
            }
        }

        if clamped {
            debug!("from_str: ignoring entries beyond {}x{}", N, N);
        }
        Ok(m)
    }
}
