//! Camera device abstraction.
//!
//! The console only needs two things from the sensor: apply a parameter set
//! (with retries) and capture a frame. Each succeeds or fails; how the device
//! does it is up to the implementation.

mod simulated;
mod types;

pub use simulated::{FailingCamera, SimulatedCamera};
pub use types::{CameraModel, CameraSettings, Frame, PixelFormat, Resolution, PIN_MAP};

use crate::error::{ConsoleError, Result};
use crate::retry::RetryPolicy;
use tracing::info;

/// Trait implemented by camera drivers.
pub trait CameraDevice {
    /// Makes one attempt to apply `settings`. Settings are committed only on
    /// success.
    fn apply(&mut self, settings: &CameraSettings) -> Result<()>;

    /// The settings currently in effect.
    fn settings(&self) -> &CameraSettings;

    /// Captures one frame at the current settings.
    fn capture(&mut self) -> Result<Frame>;

    /// Applies `settings`, retrying per `policy`.
    ///
    /// On failure the previous settings stay in effect.
    fn configure(&mut self, settings: CameraSettings, policy: &RetryPolicy) -> Result<()> {
        info!(
            "Configuring camera: {} / {}",
            settings.resolution, settings.format
        );
        policy
            .run("camera configuration", |_| self.apply(&settings))
            .map_err(|e| match e {
                ConsoleError::DeviceConfig(_) => e,
                other => ConsoleError::device_config(other.to_string()),
            })?;
        info!("Camera settings applied correctly");
        Ok(())
    }
}
