//! Minimum-cost one-to-one assignment (Hungarian algorithm).

use ndarray::Array2;

/// Solves the rectangular linear sum assignment problem.
///
/// Returns `(rows, cols)` of the `min(n_rows, n_cols)` assigned pairs whose
/// total cost is minimal, sorted by row. Costs must be finite.
pub fn linear_sum_assignment(cost: &Array2<f64>) -> (Vec<usize>, Vec<usize>) {
    let (n_rows, n_cols) = cost.dim();
    if n_rows == 0 || n_cols == 0 {
        return (Vec::new(), Vec::new());
    }

    if n_rows > n_cols {
        let transposed = cost.t().to_owned();
        let (cols, rows) = linear_sum_assignment(&transposed);
        let mut pairs: Vec<(usize, usize)> = rows.into_iter().zip(cols).collect();
        pairs.sort_unstable();
        return pairs.into_iter().unzip();
    }

    let (n, m) = (n_rows, n_cols);
    // Potentials and matching are 1-indexed, slot 0 is the virtual source.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    let mut row_of = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut min_slack = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let slack = cost[[i0 - 1, j - 1]] - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| row_of[j] != 0)
        .map(|j| (row_of[j] - 1, j - 1))
        .collect();
    pairs.sort_unstable();
    pairs.into_iter().unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn total(cost: &Array2<f64>, rows: &[usize], cols: &[usize]) -> f64 {
        rows.iter().zip(cols).map(|(&r, &c)| cost[[r, c]]).sum()
    }

    #[test]
    fn test_square_assignment_is_optimal() {
        let cost = array![[4.0, 1.0, 3.0], [2.0, 0.0, 5.0], [3.0, 2.0, 2.0]];
        let (rows, cols) = linear_sum_assignment(&cost);
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(cols, vec![1, 0, 2]);
        assert_eq!(total(&cost, &rows, &cols), 5.0);
    }

    #[test]
    fn test_wide_matrix_assigns_every_row() {
        let cost = array![[10.0, 1.0, 7.0, 3.0], [2.0, 9.0, 1.0, 8.0]];
        let (rows, cols) = linear_sum_assignment(&cost);
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(cols, vec![1, 2]);
    }

    #[test]
    fn test_tall_matrix_assigns_every_column() {
        let cost = array![[-0.1, -0.9], [-0.8, -0.2], [-0.5, -0.5]];
        let (rows, cols) = linear_sum_assignment(&cost);
        assert_eq!(rows, vec![0, 1]);
        assert_eq!(cols, vec![1, 0]);
    }

    #[test]
    fn test_greedy_choice_is_not_taken() {
        // Greedy would pick (0, 0) first and end with a worse total.
        let cost = array![[-0.9, -0.8], [-0.85, -0.1]];
        let (rows, cols) = linear_sum_assignment(&cost);
        assert_eq!(cols, vec![1, 0]);
        assert!((total(&cost, &rows, &cols) + 1.65).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let cost = Array2::<f64>::zeros((0, 3));
        assert_eq!(linear_sum_assignment(&cost), (vec![], vec![]));
    }
}
