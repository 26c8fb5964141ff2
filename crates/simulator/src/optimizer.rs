//! Bounded derivative-free minimization by implicit filtering.
//!
//! Each iteration samples a coordinate stencil of scale `h` around the
//! current point (in coordinates normalized to the unit box), forms a
//! finite-difference gradient from it, and tries a short projected line
//! search along the negative gradient. When no stencil point improves on the
//! centre the scale is halved; the run converges once the scale drops below
//! `min_scale`. Coarse stencils step over high-frequency noise, which is what
//! makes the method usable on shot-noise objectives.

use std::f64::consts::PI;
use tracing::debug;

/// Box applied to every variational angle.
pub const PARAM_BOUNDS: (f64, f64) = (-PI, PI);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Iterating,
    Converged,
    MaxIterReached,
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub optimal_params: Vec<f64>,
    pub optimal_value: f64,
    pub num_evaluations: usize,
    pub num_iterations: usize,
    /// Terminal state: `Converged` or `MaxIterReached`.
    pub state: LoopState,
}

impl OptimizationResult {
    pub fn converged(&self) -> bool {
        self.state == LoopState::Converged
    }
}

pub trait Optimizer {
    /// Minimize `objective` inside `bounds`, starting from `initial`.
    ///
    /// The first evaluation is always `initial` (projected onto the box).
    /// The first objective error aborts the run.
    fn minimize<F, E>(
        &self,
        objective: F,
        initial: Vec<f64>,
        bounds: &[(f64, f64)],
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;
}

#[derive(Debug, Clone)]
pub struct ImplicitFiltering {
    /// Objective evaluation budget.
    pub max_evaluations: usize,
    /// Starting stencil scale, as a fraction of each box width.
    pub initial_scale: f64,
    pub min_scale: f64,
    pub shrink: f64,
    pub max_backtracks: usize,
}

impl Default for ImplicitFiltering {
    fn default() -> Self {
        Self {
            max_evaluations: 500,
            initial_scale: 0.5,
            min_scale: 1e-3,
            shrink: 0.5,
            max_backtracks: 3,
        }
    }
}

impl ImplicitFiltering {
    pub fn new(max_evaluations: usize) -> Self {
        Self {
            max_evaluations,
            ..Self::default()
        }
    }

    pub fn with_scales(mut self, initial_scale: f64, min_scale: f64) -> Self {
        self.initial_scale = initial_scale;
        self.min_scale = min_scale;
        self
    }
}

/// Objective wrapper that maps unit-box points to parameters, enforces the
/// budget and tracks the best point seen.
struct Budgeted<F> {
    objective: F,
    lower: Vec<f64>,
    width: Vec<f64>,
    used: usize,
    max: usize,
    best_x: Vec<f64>,
    best_f: f64,
}

impl<F> Budgeted<F> {
    fn to_params(&self, u: &[f64]) -> Vec<f64> {
        u.iter()
            .zip(self.lower.iter().zip(&self.width))
            .map(|(&ui, (&lo, &w))| lo + ui * w)
            .collect()
    }

    /// `Ok(None)` once the budget is spent.
    fn eval<E>(&mut self, u: &[f64]) -> Result<Option<f64>, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        if self.used >= self.max {
            return Ok(None);
        }
        let x = self.to_params(u);
        let f = (self.objective)(&x)?;
        self.used += 1;
        if f < self.best_f {
            self.best_f = f;
            self.best_x = x;
        }
        Ok(Some(f))
    }
}

impl Optimizer for ImplicitFiltering {
    fn minimize<F, E>(
        &self,
        objective: F,
        initial: Vec<f64>,
        bounds: &[(f64, f64)],
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        assert_eq!(bounds.len(), initial.len(), "one bound per parameter");
        let n = initial.len();

        let lower: Vec<f64> = bounds.iter().map(|b| b.0).collect();
        let width: Vec<f64> = bounds.iter().map(|b| b.1 - b.0).collect();
        let mut u: Vec<f64> = initial
            .iter()
            .zip(lower.iter().zip(&width))
            .map(|(&x, (&lo, &w))| if w > 0.0 { ((x - lo) / w).clamp(0.0, 1.0) } else { 0.0 })
            .collect();

        let mut ev = Budgeted {
            objective,
            lower,
            width,
            used: 0,
            max: self.max_evaluations,
            best_x: initial.clone(),
            best_f: f64::INFINITY,
        };

        let mut state = LoopState::Initializing;
        let mut iterations = 0;
        debug!(?state, n, budget = self.max_evaluations, "implicit filtering start");

        let mut fu = match ev.eval(&u)? {
            Some(f) => f,
            None => {
                return Ok(OptimizationResult {
                    optimal_params: initial,
                    optimal_value: f64::INFINITY,
                    num_evaluations: 0,
                    num_iterations: 0,
                    state: LoopState::MaxIterReached,
                })
            }
        };

        let mut h = self.initial_scale;
        state = LoopState::Iterating;

        'outer: loop {
            if h < self.min_scale {
                state = LoopState::Converged;
                break;
            }

            let mut grad = vec![0.0; n];
            let mut best: Option<(Vec<f64>, f64)> = None;

            for i in 0..n {
                let mut sides: [Option<(f64, f64)>; 2] = [None, None];
                for (k, sign) in [1.0, -1.0].into_iter().enumerate() {
                    let mut p = u.clone();
                    p[i] = (u[i] + sign * h).clamp(0.0, 1.0);
                    let step = p[i] - u[i];
                    if step == 0.0 {
                        continue;
                    }
                    let Some(f) = ev.eval(&p)? else {
                        state = LoopState::MaxIterReached;
                        break 'outer;
                    };
                    sides[k] = Some((step, f));
                    if best.as_ref().map_or(true, |b| f < b.1) {
                        best = Some((p, f));
                    }
                }

                grad[i] = match sides {
                    [Some((sp, fp)), Some((sm, fm))] => (fp - fm) / (sp - sm),
                    [Some((s, f)), None] | [None, Some((s, f))] => (f - fu) / s,
                    [None, None] => 0.0,
                };
            }
            iterations += 1;

            let mut candidate = match best {
                Some(b) if b.1 < fu => b,
                _ => {
                    h *= self.shrink;
                    debug!(iteration = iterations, scale = h, "stencil failure, shrinking");
                    continue;
                }
            };

            let gnorm = grad.iter().map(|g| g * g).sum::<f64>().sqrt();
            let mut exhausted = false;
            if gnorm > 0.0 {
                let mut len = 2.0 * h;
                for _ in 0..self.max_backtracks {
                    let trial: Vec<f64> = u
                        .iter()
                        .zip(&grad)
                        .map(|(&ui, &g)| (ui - len * g / gnorm).clamp(0.0, 1.0))
                        .collect();
                    match ev.eval(&trial)? {
                        Some(f) if f < candidate.1 => {
                            candidate = (trial, f);
                            break;
                        }
                        Some(_) => len *= self.shrink,
                        None => {
                            exhausted = true;
                            break;
                        }
                    }
                }
            }

            u = candidate.0;
            fu = candidate.1;
            debug!(iteration = iterations, value = fu, scale = h, "accepted step");

            if exhausted {
                state = LoopState::MaxIterReached;
                break;
            }
        }

        debug!(?state, evaluations = ev.used, iterations, "implicit filtering done");
        Ok(OptimizationResult {
            optimal_params: ev.best_x,
            optimal_value: ev.best_f,
            num_evaluations: ev.used,
            num_iterations: iterations,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn bounds(n: usize) -> Vec<(f64, f64)> {
        vec![PARAM_BOUNDS; n]
    }

    fn quadratic(x: &[f64]) -> Result<f64, Infallible> {
        Ok(x.iter().map(|v| (v - 0.3) * (v - 0.3)).sum())
    }

    #[test]
    fn converges_on_quadratic() {
        let opt = ImplicitFiltering::new(2000);
        let res = opt.minimize(quadratic, vec![2.0, -2.0, 1.0], &bounds(3)).unwrap();

        assert!(res.converged(), "state = {:?}", res.state);
        assert!(res.optimal_value < 1e-3, "f = {}", res.optimal_value);
        for x in &res.optimal_params {
            assert!((x - 0.3).abs() < 0.05, "x = {:?}", res.optimal_params);
        }
    }

    #[test]
    fn respects_budget_and_bounds() {
        let mut seen = Vec::new();
        let opt = ImplicitFiltering::new(7);
        let res = opt
            .minimize(
                |x: &[f64]| {
                    seen.push(x.to_vec());
                    quadratic(x)
                },
                vec![3.0, -3.0],
                &bounds(2),
            )
            .unwrap();

        assert_eq!(res.state, LoopState::MaxIterReached);
        assert_eq!(res.num_evaluations, 7);
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[0], vec![3.0, -3.0]);
        for x in seen.iter().flatten() {
            assert!((-PI..=PI).contains(x), "x = {}", x);
        }
    }

    #[test]
    fn objective_error_aborts() {
        let mut calls = 0;
        let opt = ImplicitFiltering::new(100);
        let res = opt.minimize(
            |_x: &[f64]| {
                calls += 1;
                if calls == 3 {
                    Err("backend failed")
                } else {
                    Ok(1.0)
                }
            },
            vec![0.0],
            &bounds(1),
        );
        assert_eq!(res.unwrap_err(), "backend failed");
    }
}
