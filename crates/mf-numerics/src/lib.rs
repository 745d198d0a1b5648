//! Pseudospectral operators for segment discretization.
//!
//! A segment is sampled at `N` Chebyshev-Gauss-Lobatto control points on the
//! dimensionless interval `[0, 1]`. The builder returns the node locations
//! together with a differentiation matrix `D` and an integration matrix `I`;
//! both are later rescaled to the segment's physical time or distance extent.
//!
//! # Example
//!
//! ```
//! use mf_numerics::chebyshev;
//!
//! let ops = chebyshev(8).unwrap();
//! let f = ops.nodes.map(|x| x * x);
//! let df = &ops.differentiate * &f;
//! assert!((df[7] - 2.0).abs() < 1e-9);
//! ```

pub mod chebyshev;
pub mod error;
pub mod operators;

pub use chebyshev::chebyshev;
pub use error::{NumericsError, NumericsResult};
pub use operators::Operators;
