//! Shutdown, restart and sleep through the platform's own commands

use athena::{collaborators::ControlResult, ControlError, PowerAction, SystemPower};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

/// Program and arguments that perform `action` on this platform
pub fn power_command(action: PowerAction) -> ControlResult<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "windows") {
        Ok(match action {
            PowerAction::Shutdown => ("shutdown", &["/s", "/t", "1"] as &[_]),
            PowerAction::Restart => ("shutdown", &["/r", "/t", "1"] as &[_]),
            PowerAction::Sleep => ("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"] as &[_]),
        })
    } else if cfg!(target_os = "macos") {
        Ok(match action {
            PowerAction::Shutdown => ("shutdown", &["-h", "now"] as &[_]),
            PowerAction::Restart => ("shutdown", &["-r", "now"] as &[_]),
            PowerAction::Sleep => ("pmset", &["sleepnow"] as &[_]),
        })
    } else if cfg!(target_os = "linux") {
        Ok(match action {
            PowerAction::Shutdown => ("systemctl", &["poweroff"] as &[_]),
            PowerAction::Restart => ("systemctl", &["reboot"] as &[_]),
            PowerAction::Sleep => ("systemctl", &["suspend"] as &[_]),
        })
    } else {
        Err(ControlError::Unsupported(std::env::consts::OS.to_string()))
    }
}

pub struct PlatformPower {
    enabled: bool,
}

impl PlatformPower {
    /// Power actions only run when `enabled`; otherwise they are refused.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl SystemPower for PlatformPower {
    async fn perform(&self, action: PowerAction) -> ControlResult<()> {
        if !self.enabled {
            warn!(?action, "Power action refused");
            return Err(ControlError::Disabled(
                "power control is off, start with --allow-power".to_string(),
            ));
        }

        let (program, args) = power_command(action)?;
        info!(?action, program, "Running power command");
        let status = Command::new(program).args(args).status().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ControlError::CommandFailed(format!("{program} exited with {status}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_power_refuses() {
        let power = PlatformPower::new(false);
        let err = power.perform(PowerAction::Shutdown).await.unwrap_err();
        assert!(matches!(err, ControlError::Disabled(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_commands() {
        assert_eq!(
            power_command(PowerAction::Sleep).unwrap(),
            ("systemctl", &["suspend"][..])
        );
        assert_eq!(
            power_command(PowerAction::Restart).unwrap(),
            ("systemctl", &["reboot"][..])
        );
    }
}
