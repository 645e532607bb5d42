//! `boolmat` is a Rust library for square matrices over the boolean semiring, where addition is
//! logical OR and multiplication is logical AND. Some features include:
//! - getting and setting individual matrix elements (as `bool`s), with checked and panicking
//!   accessors
//! - entrywise OR and AND, one packed row at a time
//! - matrix multiplication using word-parallel row operations, serially or with rayon
//! - powers, transitive closure and the index/period of the power sequence
//! - conversion to and from arrays of packed rows and a `'0'`/`'1'` text form
//!
//! The two main pieces provided by this crate are:
//! - [`PackedRow`]: a fixed-width row of bits, implemented for `u8` through `u128` and for
//!   [`BitRow`], an array of 64-bit blocks for wider rows
//! - [`BoolMatrix`]: an `N`x`N` matrix of `N` packed rows, with the size fixed at compile time
//!
//! ```
//! use boolmat::BoolMatrix8;
//!
//! let shift = BoolMatrix8::from_rows([2, 4, 8, 16, 32, 64, 128]);
//! assert!(shift.pow(8).is_zero());
//! assert_eq!(&shift * &BoolMatrix8::identity(), shift);
//! ```

#![allow(
    clippy::needless_range_loop,
    clippy::suspicious_arithmetic_impl,
    clippy::suspicious_op_assign_impl,
    clippy::uninlined_format_args,
    clippy::bool_assert_comparison,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::bool_to_int_with_if
)]
pub mod boolmatrix;
pub mod error;
pub mod packed_row;

pub use boolmatrix::parallel::ParallelMatrixOps;
pub use boolmatrix::{
    BoolMatrix, BoolMatrix128, BoolMatrix16, BoolMatrix256, BoolMatrix32, BoolMatrix512,
    BoolMatrix64, BoolMatrix8,
};
pub use error::BoolMatrixError;
pub use packed_row::{BitBlock, BitRow, PackedRow};
