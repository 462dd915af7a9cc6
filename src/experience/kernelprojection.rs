use tracing::info;

use crate::configuration::ProjectionConfiguration;
use crate::experience::experiencecurve::ExperienceCurve;
use crate::experience::experienceprojector::ExperienceProjector;
use crate::kernel::kernelevaluator::KernelEvaluator;
use crate::kernelexperienceerror::KernelExperienceError;
use crate::solver::trajectory::Trajectory;
use crate::stabilizer::curvestabilizer::running_minimum;
use crate::stabilizer::hilbertenvelope::hilbert_envelope;

/// Result of K(t) → n(t): the solved trajectory and its experience curve.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelProjection {
    trajectory: Trajectory,
    experience: ExperienceCurve,
}

impl KernelProjection {
    pub fn t(&self) -> &[f64] {
        self.trajectory.t()
    }

    pub fn x(&self) -> &[f64] {
        self.trajectory.x()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn experience(&self) -> &ExperienceCurve {
        &self.experience
    }

    pub fn into_parts(self) -> (Trajectory, ExperienceCurve) {
        (self.trajectory, self.experience)
    }
}

/// Result of the envelope pipeline: t, |analytic x|, and the monotone n(t).
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeProjection {
    t: Vec<f64>,
    envelope: Vec<f64>,
    experience: Vec<f64>,
}

impl EnvelopeProjection {
    pub fn t(&self) -> &[f64] {
        &self.t
    }

    pub fn envelope(&self) -> &[f64] {
        &self.envelope
    }

    /// Non-increasing experience curve of the envelope.
    pub fn experience(&self) -> &[f64] {
        &self.experience
    }
}

/// Solves the Volterra equation for `kernel` and projects x(t) onto n(t).
#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn project_kernel<K>(
    kernel: &K,
    config: &ProjectionConfiguration,
) -> Result<KernelProjection, KernelExperienceError>
where
    K: KernelEvaluator + ?Sized,
{
    config.validate()?;
    let projector = ExperienceProjector::new(config.solver.x0, config.lambda_param)?;
    let trajectory = config
        .solver
        .solver()
        .solve(kernel, config.solver.t_max, config.solver.n_points, config.solver.x0)?;
    let experience = projector.project(trajectory.x(), config.return_complex);
    info!(n_points = trajectory.len(), complex = config.return_complex, "kernel projected");
    Ok(KernelProjection { trajectory, experience })
}

/// Envelope pipeline for oscillatory kernels.
///
/// 1. 解 x(t)
/// 2. 以 Hilbert transform 取 envelope |x + i·H[x]|
/// 3. 對 envelope 做實數投影（含 1e-12 clamp）
/// 4. running minimum，使 n(t) 單調不增
///
/// `return_complex` is ignored: the envelope is non-negative by construction.
#[tracing::instrument(skip_all, fields(kernel = kernel.name()))]
pub fn project_to_envelope<K>(
    kernel: &K,
    config: &ProjectionConfiguration,
) -> Result<EnvelopeProjection, KernelExperienceError>
where
    K: KernelEvaluator + ?Sized,
{
    config.validate()?;
    let projector = ExperienceProjector::new(config.solver.x0, config.lambda_param)?;
    let (t, x) = config
        .solver
        .solver()
        .solve(kernel, config.solver.t_max, config.solver.n_points, config.solver.x0)?
        .into_parts();

    let envelope = hilbert_envelope(&x)?;
    let experience = running_minimum(&projector.project_real(&envelope))?;
    info!(n_points = t.len(), "envelope projected");
    Ok(EnvelopeProjection { t, envelope, experience })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::analytickernel::ExponentialKernel;

    #[test]
    fn invalid_configuration_is_rejected_before_solving() {
        let kernel = ExponentialKernel::new(1.0).unwrap();
        let mut config = ProjectionConfiguration::default();
        config.lambda_param = 1.0;
        assert!(matches!(
            project_kernel(&kernel, &config),
            Err(KernelExperienceError::InvalidArgument { .. })
        ));
        assert!(matches!(
            project_to_envelope(&kernel, &config),
            Err(KernelExperienceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn mode_follows_configuration() {
        let kernel = ExponentialKernel::new(1.0).unwrap();
        let mut config = ProjectionConfiguration::default();
        config.solver.n_points = 64;
        assert!(!project_kernel(&kernel, &config).unwrap().experience().is_complex());
        config.return_complex = true;
        let projection = project_kernel(&kernel, &config).unwrap();
        assert!(projection.experience().is_complex());
        assert_eq!(projection.experience().len(), projection.t().len());
    }
}
