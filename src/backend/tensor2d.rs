use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 2D tensor in row-major layout.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a `rows x cols` tensor from row-major `f32` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    /// Matrix-vector product `self @ other`.
    pub fn dot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &other.data))
    }

    /// Transposed product `self^T @ other`.
    pub fn tdot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &other.data))
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape_2d(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!(t.shape(), (2, 3));
    }

    #[test]
    fn test_tensor2d_dot_and_tdot() {
        // One-hot rows: [[1, 0, 0], [0, 0, 1]]
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0], 2, 3);
        let w = Tensor1D::<CpuBackend>::new(vec![10.0, 20.0, 30.0]);
        assert_eq!(x.dot(&w).to_vec(), vec![10.0, 30.0]);

        let g = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        assert_eq!(x.tdot(&g).to_vec(), vec![1.0, 0.0, 2.0]);
    }
}
