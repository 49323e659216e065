//! Rendering surface abstraction

use std::io::Write;
use std::process::{Child, Command};

use parking_lot::Mutex;
use url::Url;

use crate::error::RenderError;
use crate::Result;

/// A place a tab renders into.
///
/// Backends differ wildly in capability (an in-process widget, a full web
/// engine in another process), but the navigation core only ever needs these
/// two entry points.
pub trait RenderSurface: Send + Sync {
    /// Fetch and display a URL directly. The stable path.
    fn load_url(&self, url: &str) -> Result<()>;

    /// Display pre-fetched, possibly rewritten HTML. `base_url` is the origin
    /// relative links should resolve against.
    fn load_raw_content(&self, html: &str, base_url: &str) -> Result<()>;

    /// URL the surface is currently showing, for backends that can report
    /// it. `None` disables external-navigation detection for this surface.
    fn observed_url(&self) -> Option<String> {
        None
    }
}

/// One load handed to a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceLoad {
    Url(String),
    RawContent { html: String, base_url: String },
}

/// In-memory surface that records every load it receives. Stands in for the
/// lightweight renderer and doubles as the test backend.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    loads: Mutex<Vec<SurfaceLoad>>,
    observed: Mutex<Option<String>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything loaded so far, oldest first.
    pub fn loads(&self) -> Vec<SurfaceLoad> {
        self.loads.lock().clone()
    }

    /// Simulate the surface navigating on its own (an in-page link the core
    /// never saw).
    pub fn set_observed_url(&self, url: impl Into<String>) {
        *self.observed.lock() = Some(url.into());
    }
}

impl RenderSurface for HeadlessSurface {
    fn load_url(&self, url: &str) -> Result<()> {
        self.loads.lock().push(SurfaceLoad::Url(url.to_string()));
        *self.observed.lock() = Some(url.to_string());
        Ok(())
    }

    fn load_raw_content(&self, html: &str, base_url: &str) -> Result<()> {
        self.loads.lock().push(SurfaceLoad::RawContent {
            html: html.to_string(),
            base_url: base_url.to_string(),
        });
        *self.observed.lock() = Some(base_url.to_string());
        Ok(())
    }

    fn observed_url(&self) -> Option<String> {
        self.observed.lock().clone()
    }
}

/// Out-of-process viewer surface.
///
/// Each load replaces the previous viewer process; the handle is killed when
/// the surface is dropped, so closing a tab never leaks a window. Raw
/// content is staged through a scratch file and loaded as a `file://` URL,
/// which is exactly why the enhancement pipeline injects a `<base>` tag
/// first.
pub struct ExternalViewerSurface {
    command: String,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
    scratch: Mutex<Option<tempfile::NamedTempFile>>,
}

impl ExternalViewerSurface {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            child: Mutex::new(None),
            scratch: Mutex::new(None),
        }
    }

    pub fn with_args(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            child: Mutex::new(None),
            scratch: Mutex::new(None),
        }
    }

    fn spawn(&self, target: &str) -> Result<()> {
        let mut guard = self.child.lock();
        if let Some(mut old) = guard.take() {
            let _ = old.kill();
            let _ = old.wait();
        }

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(target)
            .spawn()
            .map_err(|err| {
                RenderError::Surface(format!("failed to launch viewer '{}': {err}", self.command))
            })?;

        tracing::debug!(command = %self.command, target = %target, "spawned viewer process");
        *guard = Some(child);
        Ok(())
    }
}

impl RenderSurface for ExternalViewerSurface {
    fn load_url(&self, url: &str) -> Result<()> {
        self.spawn(url)
    }

    fn load_raw_content(&self, html: &str, _base_url: &str) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("nimbus-page-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;

        let target = Url::from_file_path(file.path())
            .map_err(|()| RenderError::Surface("scratch file path is not absolute".to_string()))?;
        self.spawn(target.as_str())?;

        // Keep the file alive for as long as it is on screen.
        *self.scratch.lock() = Some(file);
        Ok(())
    }
}

impl Drop for ExternalViewerSurface {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.lock().take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
