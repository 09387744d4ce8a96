//! Start-on-login registration via an XDG autostart desktop entry

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::autostart::{AUTOSTART_DIR, DESKTOP_FILE, ENTRY_NAME};

pub trait AutostartRegistry {
    fn is_enabled(&self) -> bool;
    fn enable(&self) -> Result<()>;
    fn disable(&self) -> Result<()>;
}

pub struct XdgAutostart {
    entry_path: PathBuf,
    exec: PathBuf,
}

impl XdgAutostart {
    pub fn new(entry_path: PathBuf, exec: PathBuf) -> Self {
        Self { entry_path, exec }
    }

    /// `<config_dir>/autostart/net-floater.desktop` launching this executable
    pub fn for_current_exe() -> Result<Self> {
        let mut entry_path = dirs::config_dir().context("Failed to determine user config directory")?;
        entry_path.push(AUTOSTART_DIR);
        entry_path.push(DESKTOP_FILE);

        let exec = std::env::current_exe().context("Failed to resolve executable path")?;
        Ok(Self::new(entry_path, exec))
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={ENTRY_NAME}\n\
             Exec=\"{}\"\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec.display()
        )
    }
}

impl AutostartRegistry for XdgAutostart {
    fn is_enabled(&self) -> bool {
        self.entry_path.exists()
    }

    fn enable(&self) -> Result<()> {
        if let Some(parent) = self.entry_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create autostart directory {:?}", parent))?;
        }
        fs::write(&self.entry_path, self.desktop_entry())
            .with_context(|| format!("Failed to write autostart entry {:?}", self.entry_path))?;
        info!(path = %self.entry_path.display(), "Enabled start on login");
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        if self.entry_path.exists() {
            fs::remove_file(&self.entry_path)
                .with_context(|| format!("Failed to remove autostart entry {:?}", self.entry_path))?;
        }
        info!(path = %self.entry_path.display(), "Disabled start on login");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_registry(name: &str) -> XdgAutostart {
        let mut dir = std::env::temp_dir();
        dir.push(format!("net-floater-autostart-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        XdgAutostart::new(dir.join("autostart").join(DESKTOP_FILE), PathBuf::from("/usr/bin/net-floater"))
    }

    #[test]
    fn test_enable_then_disable() {
        let registry = scratch_registry("toggle");
        assert!(!registry.is_enabled());

        registry.enable().unwrap();
        assert!(registry.is_enabled());
        let entry = fs::read_to_string(registry.entry_path()).unwrap();
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=\"/usr/bin/net-floater\"\n"));

        registry.disable().unwrap();
        assert!(!registry.is_enabled());
        // Disabling twice is fine
        registry.disable().unwrap();

        let _ = fs::remove_dir_all(registry.entry_path().parent().unwrap().parent().unwrap());
    }
}
