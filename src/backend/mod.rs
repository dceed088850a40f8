//! # Backend Abstraction
//!
//! Models and losses are written against the [`Backend`] trait so the numeric
//! storage can change without touching training code. The crate ships a single
//! pure-Rust [`CpuBackend`]; encoded fare features are small dense one-hot
//! matrices, so nothing heavier is needed.
//!
//! The trait surface is kept to the operations the linear trainer actually
//! uses: construction, element-wise 1D arithmetic, reductions and the two
//! matrix-vector products needed for the forward and backward passes.
//!
//! ## Example
//!
//! ```rust
//! use farecast::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![3.0, 4.0]);
//! assert_eq!(x.dot(&w).to_vec(), vec![3.0, 4.0]);
//! ```

mod cpu;
/// Pure-Rust CPU backend implementation.
pub use cpu::{CpuBackend, CpuTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the operations training needs.
///
/// Checked operations panic on shape mismatch; callers validate shapes at the
/// dataset boundary (see [`crate::dataset::EncodedDataset::new`]), so a panic
/// here indicates a bug rather than bad input.
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type (row-major).
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 1D tensor from host `f64` values without losing precision.
    fn from_f64_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend scalar from an `f64` host value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Element-wise operations (1D) ---

    /// Element-wise addition.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise subtraction.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Reductions ---

    /// Sum of all elements.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Inner product of two 1D tensors.
    fn dot(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar;

    // --- Linear algebra ---

    /// Matrix-vector product `A @ x`.
    ///
    /// # Panics
    /// If `A.cols != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Transposed matrix-vector product `A^T @ x`.
    ///
    /// # Panics
    /// If `A.rows != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Access ---

    /// Copies a 1D tensor out as host `f64` values.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// `(rows, cols)` of a 2D tensor.
    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize);
}
