/// A dense row-major `rows × cols` buffer of solution components.
///
/// One row per population slot, one column per solution component. This is
/// the shape exchanged by [`ProcessGroup::allreduce_sum`](super::ProcessGroup::allreduce_sum).
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SolutionMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Rows in order. Yields nothing for a matrix without columns.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        let rows = if self.cols == 0 { 0 } else { self.rows };
        (0..rows).map(move |row| self.row(row))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut matrix = SolutionMatrix::zeros(3, 2);
        matrix.row_mut(1).copy_from_slice(&[4.0, 5.0]);
        assert_eq!(matrix.as_slice(), &[0.0, 0.0, 4.0, 5.0, 0.0, 0.0]);
        assert_eq!(matrix.row(1), &[4.0, 5.0]);
        assert_eq!(matrix.iter_rows().count(), 3);
        assert_eq!((matrix.rows(), matrix.cols()), (3, 2));
    }

    #[test]
    fn test_empty_columns() {
        let matrix = SolutionMatrix::zeros(4, 0);
        assert_eq!(matrix.iter_rows().count(), 0);
        assert!(matrix.as_slice().is_empty());
    }
}
