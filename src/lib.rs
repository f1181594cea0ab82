//! A from-scratch multilayer perceptron on a hand-written dense matrix core.
//!
//! `dense-mlp` pairs a small dense [`Matrix`] library with a layered
//! feed-forward [`Network`] trained by per-example stochastic gradient
//! descent. There is no autograd and no BLAS underneath; the multiply is the
//! classic triple loop, so every number the network produces can be traced
//! by hand.
//!
//! # Design goals
//!
//! - Readable numerics: each operation is a direct transcription of its
//!   textbook definition.
//! - Strict shapes: arithmetic on mismatched dimensions returns
//!   [`Error::DimensionMismatch`] instead of broadcasting or truncating.
//! - Reproducibility: constructors accept a seed or any [`rand::Rng`].
//!
//! # Panics vs `Result`
//!
//! Shape-dependent arithmetic and bounds-checked access return [`Result`],
//! as does construction. Two places panic instead:
//!
//! - [`Matrix::randomize`] requires `max > min`.
//! - Index accessors such as [`Network::layer_size`] and [`Network::weight`]
//!   index straight into their backing storage.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - [`Matrix`] stores its cells row-major; [`Matrix::as_slice`] exposes them.
//! - A network built from widths `[n0, n1, ..., nk]` holds one
//!   `(n[i+1], n[i])` weight matrix and one `(n[i+1], 1)` bias column per
//!   adjacent pair of layers.
//! - Inputs and targets are single columns: `(n0, 1)` in, `(nk, 1)` out.
//! - Hidden layers apply the logistic sigmoid; the final layer is linear, so
//!   outputs are unbounded.
//!
//! # Quick start
//!
//! ```rust
//! use dense_mlp::{loss, Matrix, Network};
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let input = Matrix::from_vec(2, 1, vec![0.5, -0.25])?;
//! let target = Matrix::from_vec(1, 1, vec![0.3])?;
//!
//! let mut net = Network::new_with_seed(&[2, 3, 1], 0.01, 0)?;
//! for _ in 0..1_000 {
//!     net.train(&input, &target)?;
//! }
//!
//! let prediction = net.forward(&input)?;
//! assert!(loss::mse(&prediction, &target)? < 0.05);
//! # Ok(())
//! # }
//! ```
//!
//! # Deterministic construction
//!
//! Tests and collaborators that need exact numbers can skip random
//! initialization entirely:
//!
//! ```rust
//! use dense_mlp::{Matrix, Network};
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let weights = vec![Matrix::from_vec(1, 2, vec![0.5, -0.5])?];
//! let biases = vec![Matrix::from_vec(1, 1, vec![0.25])?];
//! let net = Network::from_parameters(&[2, 1], 0.1, weights, biases)?;
//!
//! let out = net.forward(&Matrix::from_vec(2, 1, vec![1.0, 1.0])?)?;
//! assert_eq!(out.get(0, 0)?, 0.25);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loss;
pub mod matrix;
pub mod network;

pub use error::{Error, Result};
pub use matrix::Matrix;
pub use network::Network;
