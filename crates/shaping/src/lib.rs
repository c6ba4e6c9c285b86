#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Reward Shaping Primitives
//!
//! Pure functions that turn distances into bounded rewards. Every task in the
//! manipulation suite builds its dense reward out of the same two pieces:
//!
//! -   [`tolerance`]: maps a scalar to `[0, 1]`, returning exactly `1.0`
//!     inside a target band and decaying smoothly outside it. The shape of
//!     the decay is one of the [`Sigmoid`] families and its width is set by
//!     a margin.
//! -   [`hamacher_product`]: a fuzzy AND over two `[0, 1]` scores. The result
//!     never exceeds either input, so a composed reward is only high when
//!     both parts are.
//!
//! ```rust
//! use shaping::{hamacher_product, tolerance, Bounds, Sigmoid};
//!
//! # fn main() -> Result<(), shaping::ShapingError> {
//! let in_place = tolerance(0.2, Bounds::new(0.0, 0.05), 0.5, Sigmoid::LongTail)?;
//! let reward = hamacher_product(0.8, in_place)?;
//! assert!(reward <= in_place);
//! # Ok(())
//! # }
//! ```

pub mod hamacher;
pub mod sigmoid;
pub mod tolerance;

pub use hamacher::hamacher_product;
pub use sigmoid::Sigmoid;
pub use tolerance::{tolerance, Bounds, Tolerance, DEFAULT_VALUE_AT_MARGIN};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapingError {
    #[error("lower bound {lower} must be <= upper bound {upper}")]
    InvalidBounds { lower: f64, upper: f64 },
    #[error("margin must be finite and non-negative, got {0}")]
    InvalidMargin(f64),
    #[error("value_at_margin {value} is outside the range allowed for the {sigmoid} sigmoid")]
    InvalidValueAtMargin { sigmoid: Sigmoid, value: f64 },
    #[error("unknown sigmoid type {0:?}")]
    UnknownSigmoid(String),
    #[error("input must be finite, got {0}")]
    NonFinite(f64),
    #[error("fuzzy operands must lie in [0, 1], got {0}")]
    OutOfUnitRange(f64),
}
