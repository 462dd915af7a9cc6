use num_complex::Complex64;

/// Experience curve n(t), real or complex for the whole curve.
#[derive(Debug, Clone, PartialEq)]
pub enum ExperienceCurve {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl ExperienceCurve {
    pub fn len(&self) -> usize {
        match self {
            ExperienceCurve::Real(values) => values.len(),
            ExperienceCurve::Complex(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, ExperienceCurve::Complex(_))
    }

    pub fn as_real(&self) -> Option<&[f64]> {
        match self {
            ExperienceCurve::Real(values) => Some(values),
            ExperienceCurve::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&[Complex64]> {
        match self {
            ExperienceCurve::Real(_) => None,
            ExperienceCurve::Complex(values) => Some(values),
        }
    }

    /// Real parts; for a real curve this is the curve itself.
    pub fn real_parts(&self) -> Vec<f64> {
        match self {
            ExperienceCurve::Real(values) => values.clone(),
            ExperienceCurve::Complex(values) => values.iter().map(|c| c.re).collect(),
        }
    }

    /// x̂_i = x0·λ^{n_i}; for a complex curve the real part of x0·exp(n_i·ln λ).
    pub fn reconstruct(&self, x0: f64, lambda_param: f64) -> Vec<f64> {
        let log_lambda = lambda_param.ln();
        match self {
            ExperienceCurve::Real(values) => values
                .iter()
                .map(|&n| x0 * (n * log_lambda).exp())
                .collect(),
            ExperienceCurve::Complex(values) => values
                .iter()
                .map(|&n| x0 * (n * log_lambda).exp().re)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn accessors_follow_variant() {
        let real = ExperienceCurve::Real(vec![0.0, 1.0]);
        assert_eq!(real.len(), 2);
        assert!(!real.is_complex());
        assert_eq!(real.as_real(), Some(&[0.0, 1.0][..]));
        assert!(real.as_complex().is_none());

        let complex = ExperienceCurve::Complex(vec![Complex64::new(1.0, 2.0)]);
        assert!(complex.is_complex());
        assert_eq!(complex.real_parts(), vec![1.0]);
    }

    #[test]
    fn reconstruct_inverts_exponent() {
        let curve = ExperienceCurve::Real(vec![0.0, 1.0, 2.0]);
        let x = curve.reconstruct(2.0, 0.5);
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-15);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-15);
        assert_relative_eq!(x[2], 0.5, epsilon = 1e-15);
    }

    #[test]
    fn complex_reconstruct_recovers_sign() {
        // n = (ln 0.5 + iπ) / ln 0.8 encodes the ratio -0.5
        let log_lambda = 0.8f64.ln();
        let n = Complex64::new(0.5f64.ln(), std::f64::consts::PI) / log_lambda;
        let x = ExperienceCurve::Complex(vec![n]).reconstruct(1.0, 0.8);
        assert_relative_eq!(x[0], -0.5, epsilon = 1e-12);
    }
}
