//! Scalar Newton-Raphson with a backtracking line search.
//!
//! The residual closure returns `None` for points outside the admissible
//! domain; the line search halves the step until the iterate is admissible
//! and the residual magnitude decreases.

use thiserror::Error;

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on |f|
    pub abs_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            abs_tol: 1e-5,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Converged Newton iterate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonResult {
    /// Root estimate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Number of Newton steps taken
    pub iterations: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NewtonError {
    #[error("Initial guess {x} is outside the admissible domain")]
    InadmissibleStart { x: f64 },

    #[error("Zero or non-finite derivative at iteration {iteration}")]
    ZeroDerivative { iteration: usize, residual: f64 },

    #[error("Line search stagnated at iteration {iteration}")]
    Stagnated { iteration: usize, residual: f64 },

    #[error("Maximum iterations {iterations} reached, residual = {residual}")]
    MaxIterations { iterations: usize, residual: f64 },
}

impl NewtonError {
    /// Iterations consumed and last residual, when any step was attempted.
    pub fn progress(&self) -> Option<(usize, f64)> {
        match *self {
            Self::InadmissibleStart { .. } => None,
            Self::ZeroDerivative {
                iteration,
                residual,
            }
            | Self::Stagnated {
                iteration,
                residual,
            } => Some((iteration, residual)),
            Self::MaxIterations {
                iterations,
                residual,
            } => Some((iterations, residual)),
        }
    }
}

/// Solve `f(x) = 0` from `x0`. `eval` returns `(f, f')` or `None` when `x`
/// is inadmissible.
pub fn newton_solve<F>(x0: f64, eval: F, config: &NewtonConfig) -> Result<NewtonResult, NewtonError>
where
    F: Fn(f64) -> Option<(f64, f64)>,
{
    let admissible = |x: f64| eval(x).filter(|(f, df)| f.is_finite() && df.is_finite());

    let (mut f, mut df) = admissible(x0).ok_or(NewtonError::InadmissibleStart { x: x0 })?;
    let mut x = x0;

    for iter in 0..=config.max_iterations {
        // Check convergence
        if f.abs() < config.abs_tol {
            return Ok(NewtonResult {
                x,
                residual: f,
                iterations: iter,
            });
        }
        if iter == config.max_iterations {
            break;
        }
        if df == 0.0 {
            return Err(NewtonError::ZeroDerivative {
                iteration: iter,
                residual: f,
            });
        }

        let dx = -f / df;

        // Backtrack until admissible with a smaller residual
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = x + alpha * dx;
            if let Some((f_new, df_new)) = admissible(x_new)
                && f_new.abs() < f.abs()
            {
                accepted = Some((x_new, f_new, df_new));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, f_new, df_new)) = accepted else {
            return Err(NewtonError::Stagnated {
                iteration: iter,
                residual: f,
            });
        };

        tracing::trace!(iteration = iter, x = x_new, residual = f_new, alpha, "newton step");
        x = x_new;
        f = f_new;
        df = df_new;
    }

    Err(NewtonError::MaxIterations {
        iterations: config.max_iterations,
        residual: f,
    })
}
