/// Liveness reply returned by [`HealthService::ping`].
pub const PONG: &str = "pong";

/// Simple health service used by the REST API and the CLI.
///
/// Liveness does not depend on the patient store, so the check never fails.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Static liveness check.
    ///
    /// # Returns
    /// The literal text `pong`.
    pub fn ping() -> &'static str {
        PONG
    }
}
