use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsError;

const EPS: f64 = 1e-9;
const MAX_ITERATIONS: usize = 10_000;

/// The bounds of one variable. The upper bound is optional.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VariableBound {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Default for VariableBound {
    fn default() -> Self {
        VariableBound {
            lower: 0.0,
            upper: None,
        }
    }
}

/// A linear program in inequality form:
///
/// minimize `objective . x` subject to `constraints * x <= limits` and the
/// variable bounds. When `bounds` is empty, every variable is non-negative.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LinearProgram {
    pub objective: Vec<f64>,
    pub constraints: Vec<Vec<f64>>,
    pub limits: Vec<f64>,
    #[serde(default)]
    pub bounds: Vec<VariableBound>,
}

/// An optimal solution.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Allocation {
    pub values: Vec<f64>,
    /// The value of the (minimized) objective at the solution.
    pub objective: f64,
}

impl Allocation {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl LinearProgram {
    /// The capital allocation trade-off: maximize `x + y` under `x + 2y <= 7`
    /// and `3x + y <= 8`, expressed as a minimization of `-x - y`.
    pub fn capital_allocation() -> LinearProgram {
        LinearProgram {
            objective: vec![-1.0, -1.0],
            constraints: vec![vec![1.0, 2.0], vec![3.0, 1.0]],
            limits: vec![7.0, 8.0],
            bounds: Vec::new(),
        }
    }

    fn resolved_bounds(&self) -> Result<Vec<VariableBound>, AnalyticsError> {
        let n = self.objective.len();
        if n == 0 {
            return Err(AnalyticsError::DimensionMismatch(
                "the objective has no variables".to_string(),
            ));
        }
        if self.constraints.len() != self.limits.len() {
            return Err(AnalyticsError::DimensionMismatch(format!(
                "{} constraints but {} limits",
                self.constraints.len(),
                self.limits.len()
            )));
        }
        if let Some((idx, row)) = self
            .constraints
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n)
        {
            return Err(AnalyticsError::DimensionMismatch(format!(
                "constraint {} has {} coefficients, expected {}",
                idx,
                row.len(),
                n
            )));
        }
        let all_finite = self
            .objective
            .iter()
            .chain(self.limits.iter())
            .chain(self.constraints.iter().flatten())
            .all(|x| x.is_finite());
        if !all_finite {
            return Err(AnalyticsError::DimensionMismatch(
                "non-finite coefficient".to_string(),
            ));
        }
        let bounds = match self.bounds.len() {
            0 => vec![VariableBound::default(); n],
            x if x == n => self.bounds.clone(),
            x => {
                return Err(AnalyticsError::DimensionMismatch(format!(
                    "{} bounds for {} variables",
                    x, n
                )))
            }
        };
        for b in bounds.iter() {
            if !b.lower.is_finite() {
                return Err(AnalyticsError::DimensionMismatch(
                    "lower bounds must be finite".to_string(),
                ));
            }
            if let Some(u) = b.upper {
                if u < b.lower {
                    return Err(AnalyticsError::Infeasible);
                }
            }
        }
        Ok(bounds)
    }

    /// Solves the program with the two-phase simplex method.
    ///
    /// Entering and leaving variables follow Bland's rule, so the method
    /// always terminates.
    pub fn solve(&self) -> Result<Allocation, AnalyticsError> {
        let bounds = self.resolved_bounds()?;
        let n = self.objective.len();

        // Shift every variable by its lower bound (x = lower + y, y >= 0) and
        // turn the finite upper bounds into extra constraints.
        let mut rows: Vec<(Vec<f64>, f64)> = self
            .constraints
            .iter()
            .zip(self.limits.iter())
            .map(|(a, b)| {
                let shift: f64 = a.iter().zip(bounds.iter()).map(|(x, bd)| x * bd.lower).sum();
                (a.clone(), b - shift)
            })
            .collect();
        for (j, bd) in bounds.iter().enumerate() {
            if let Some(u) = bd.upper {
                let mut a = vec![0.0; n];
                a[j] = 1.0;
                rows.push((a, u - bd.lower));
            }
        }

        let m = rows.len();
        let num_artificials = rows.iter().filter(|(_, b)| *b < 0.0).count();
        let width = n + m + num_artificials;
        let mut tableau = Tableau {
            rows: Vec::with_capacity(m),
            basis: Vec::with_capacity(m),
            width,
        };
        let mut next_artificial = n + m;
        for (i, (a, b)) in rows.iter().enumerate() {
            let sign = if *b < 0.0 { -1.0 } else { 1.0 };
            let mut row = vec![0.0; width + 1];
            for (j, x) in a.iter().enumerate() {
                row[j] = sign * x;
            }
            row[n + i] = sign;
            row[width] = sign * b;
            if *b < 0.0 {
                row[next_artificial] = 1.0;
                tableau.basis.push(next_artificial);
                next_artificial += 1;
            } else {
                tableau.basis.push(n + i);
            }
            tableau.rows.push(row);
        }

        if num_artificials > 0 {
            let mut cost = vec![0.0; width];
            for c in cost.iter_mut().skip(n + m) {
                *c = 1.0;
            }
            tableau.minimize(&cost, width)?;
            let infeasibility = tableau.objective(&cost);
            debug!("LinearProgram::solve: phase 1 residual {}", infeasibility);
            if infeasibility > EPS {
                return Err(AnalyticsError::Infeasible);
            }
            tableau.drive_out_artificials(n + m);
        }

        let mut cost = vec![0.0; width];
        cost[..n].copy_from_slice(&self.objective);
        tableau.minimize(&cost, n + m)?;

        let mut values: Vec<f64> = bounds.iter().map(|b| b.lower).collect();
        for (i, col) in tableau.basis.iter().enumerate() {
            if *col < n {
                values[*col] += tableau.rhs(i);
            }
        }
        let objective = values
            .iter()
            .zip(self.objective.iter())
            .map(|(x, c)| x * c)
            .sum();
        info!(
            "LinearProgram::solve: values {:?} objective {}",
            values, objective
        );
        Ok(Allocation { values, objective })
    }
}

// A dense simplex tableau. Each row holds the coefficients of every column
// followed by the right-hand side.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    width: usize,
}

impl Tableau {
    fn rhs(&self, i: usize) -> f64 {
        self.rows[i][self.width]
    }

    fn objective(&self, cost: &[f64]) -> f64 {
        self.basis
            .iter()
            .enumerate()
            .map(|(i, col)| cost[*col] * self.rhs(i))
            .sum()
    }

    fn reduced_cost(&self, cost: &[f64], col: usize) -> f64 {
        let basic: f64 = self
            .basis
            .iter()
            .zip(self.rows.iter())
            .map(|(b, row)| cost[*b] * row[col])
            .sum();
        cost[col] - basic
    }

    fn pivot(&mut self, r: usize, c: usize) {
        let p = self.rows[r][c];
        for v in self.rows[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let f = row[c];
            if f != 0.0 {
                for (v, pv) in row.iter_mut().zip(pivot_row.iter()) {
                    *v -= f * pv;
                }
            }
        }
        self.basis[r] = c;
    }

    // Only the columns below `allowed` may enter the basis.
    fn minimize(&mut self, cost: &[f64], allowed: usize) -> Result<(), AnalyticsError> {
        for _ in 0..MAX_ITERATIONS {
            let entering = (0..allowed)
                .filter(|j| !self.basis.contains(j))
                .find(|j| self.reduced_cost(cost, *j) < -EPS);
            let c = match entering {
                Some(c) => c,
                None => return Ok(()),
            };
            let mut leaving: Option<(usize, f64)> = None;
            for i in 0..self.rows.len() {
                let a = self.rows[i][c];
                if a <= EPS {
                    continue;
                }
                let ratio = self.rhs(i) / a;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((bi, br)) => {
                        if ratio < br - EPS || (ratio <= br + EPS && self.basis[i] < self.basis[bi])
                        {
                            Some((i, ratio))
                        } else {
                            Some((bi, br))
                        }
                    }
                };
            }
            match leaving {
                Some((r, _)) => self.pivot(r, c),
                None => return Err(AnalyticsError::Unbounded),
            }
        }
        Err(AnalyticsError::NoConvergence)
    }

    // After a successful phase 1, the artificial variables still in the basis
    // are at zero. Swap them for a regular column when the row allows it.
    fn drive_out_artificials(&mut self, first_artificial: usize) {
        for i in 0..self.rows.len() {
            if self.basis[i] < first_artificial {
                continue;
            }
            if let Some(c) = (0..first_artificial)
                .find(|j| !self.basis.contains(j) && self.rows[i][*j].abs() > EPS)
            {
                self.pivot(i, c);
            }
        }
    }
}
