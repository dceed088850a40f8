use super::Backend;

/// Pure-Rust backend storing tensors as `f64` vectors.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major dense matrix used by [`CpuBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D {
    pub(crate) data: Vec<f64>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self { data, rows, cols }
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data.into_iter().map(f64::from).collect()
    }

    fn from_f64_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data.into_iter().map(f64::from).collect(), rows, cols)
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "add_1d: length mismatch");
        a.iter().zip(b).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "sub_1d: length mismatch");
        a.iter().zip(b).map(|(a, b)| a - b).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum()
    }

    fn dot(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Scalar {
        assert_eq!(a.len(), b.len(), "dot: length mismatch");
        a.iter().zip(b).map(|(a, b)| a * b).sum()
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.cols, x.len(), "matvec: A.cols != x.len()");
        (0..a.rows)
            .map(|i| a.row(i).iter().zip(x).map(|(a, x)| a * x).sum())
            .collect()
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.rows, x.len(), "matvec_transposed: A.rows != x.len()");
        let mut out = vec![0.0; a.cols];
        for (i, &xi) in x.iter().enumerate() {
            // One-hot rows are mostly zeros.
            if xi == 0.0 {
                continue;
            }
            for (o, &v) in out.iter_mut().zip(a.row(i)) {
                *o += v * xi;
            }
        }
        out
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize) {
        (t.rows, t.cols)
    }
}
