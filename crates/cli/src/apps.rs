//! Launch and close desktop applications by spoken name

use std::{path::PathBuf, process::Stdio};

use athena::AppControl;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Spoken names that rarely match an executable
const ALIASES: &[(&str, &[&str])] = &[
    ("browser", &["firefox", "google-chrome", "chromium", "msedge"]),
    ("chrome", &["google-chrome", "chromium", "chrome"]),
    ("calculator", &["gnome-calculator", "kcalc", "calc"]),
    ("notepad", &["notepad", "gedit", "kate", "mousepad"]),
    ("terminal", &["gnome-terminal", "konsole", "xterm", "wt"]),
    ("word", &["winword", "libreoffice"]),
    ("excel", &["excel", "libreoffice"]),
    ("vs code", &["code"]),
    ("visual studio code", &["code"]),
];

/// Executable names to try for a spoken application name
pub fn candidates(name: &str) -> Vec<String> {
    let name = name.trim().to_lowercase();
    if let Some((_, programs)) = ALIASES.iter().find(|(alias, _)| *alias == name) {
        return programs.iter().map(|p| p.to_string()).collect();
    }

    let mut names = vec![name.clone()];
    if name.contains(' ') {
        names.push(name.replace(' ', "-"));
        names.push(name.replace(' ', ""));
    }
    names
}

#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    fn resolve(name: &str) -> Option<PathBuf> {
        candidates(name)
            .into_iter()
            .find_map(|candidate| which::which(&candidate).ok())
    }

    async fn kill(program: &str) -> std::io::Result<bool> {
        let mut command = if cfg!(target_os = "windows") {
            let mut command = Command::new("taskkill");
            command.arg("/IM").arg(format!("{program}.exe")).arg("/F");
            command
        } else {
            let mut command = Command::new("pkill");
            command.args(["-i", "-x", program]);
            command
        };
        let status = command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(status.success())
    }
}

#[async_trait]
impl AppControl for ProcessLauncher {
    async fn open(&self, name: &str) -> String {
        let Some(path) = Self::resolve(name) else {
            debug!(app = name, "No executable found");
            return format!("Sorry, I couldn't find an application called {name}");
        };

        let spawned = Command::new(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => {
                info!(app = name, path = %path.display(), "Application launched");
                format!("Opening {name}")
            }
            Err(e) => {
                warn!(app = name, "Failed to launch application: {}", e);
                format!("Sorry, I couldn't open {name}")
            }
        }
    }

    async fn close(&self, name: &str) -> String {
        for program in candidates(name) {
            match Self::kill(&program).await {
                Ok(true) => {
                    info!(app = name, program = %program, "Application closed");
                    return format!("Closing {name}");
                }
                Ok(false) => continue,
                Err(e) => {
                    warn!(app = name, "Failed to close application: {}", e);
                    return format!("Sorry, I couldn't close {name}");
                }
            }
        }
        format!("{name} doesn't seem to be running")
    }
}
