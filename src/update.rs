//! Self-update
//!
//! The release channel publishes a bare version marker next to per-platform
//! binaries. A newer release is downloaded into a staging file beside the
//! running executable and renamed over it, so the executable on disk is always
//! either the complete old build or the complete new one. Any failure on the
//! way leaves the current build in place and the run continues.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::error::{BastionError, Result};
use crate::output;
use crate::progress::Spinner;
use crate::version::Version;

/// Flag passed to the relaunched process so it does not check again
pub const SKIP_UPDATE_FLAG: &str = "--skip-update";

/// Where the latest version and its binary come from
pub trait ReleaseSource {
    /// Raw body of the version marker
    fn version_marker(&self) -> Result<String>;

    /// Stream the binary for `version` into `sink`, returning the bytes written
    fn download(&self, version: &Version, sink: &mut dyn Write) -> Result<u64>;
}

/// Expand `{version}`, `{os}`, `{arch}` and `{exe}` in a download URL template
pub fn download_url(template: &str, version: &Version) -> String {
    template
        .replace("{version}", &version.to_string())
        .replace("{os}", std::env::consts::OS)
        .replace("{arch}", std::env::consts::ARCH)
        .replace("{exe}", std::env::consts::EXE_SUFFIX)
}

/// [`ReleaseSource`] over HTTP
///
/// The client is built per request, so a TLS backend that cannot be set up only
/// fails the update check and never the run.
pub struct HttpReleaseSource {
    version_url: String,
    download_template: String,
}

impl HttpReleaseSource {
    pub fn new(version_url: impl Into<String>, download_template: impl Into<String>) -> Self {
        Self {
            version_url: version_url.into(),
            download_template: download_template.into(),
        }
    }

    fn client() -> Result<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(concat!("bastion-connect/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        log::debug!("GET {url}");
        let response = Self::client()?.get(url).send()?;
        if !response.status().is_success() {
            return Err(BastionError::DownloadFailed {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn version_marker(&self) -> Result<String> {
        Ok(self.get(&self.version_url)?.text()?)
    }

    fn download(&self, version: &Version, sink: &mut dyn Write) -> Result<u64> {
        let url = download_url(&self.download_template, version);
        let mut response = self.get(&url)?;
        Ok(std::io::copy(&mut response, sink)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    /// The check or the update failed; the current build keeps running
    Unavailable,
    /// The executable on disk now holds this version
    Replaced(Version),
}

/// Only a strictly newer release triggers an update
pub fn needs_update(current: Version, remote: Version) -> bool {
    remote > current
}

/// Check the release channel and replace `executable` when a newer build exists.
///
/// Never fails: problems are printed as warnings and reported as
/// [`UpdateOutcome::Unavailable`].
pub fn check_for_update(
    source: &dyn ReleaseSource,
    current: Version,
    executable: &Path,
) -> UpdateOutcome {
    remove_previous_backup(executable);

    let remote = match source
        .version_marker()
        .and_then(|marker| Version::parse(&marker))
    {
        Ok(remote) => remote,
        Err(e) => {
            output::warn(format!("Could not check for updates: {e}"));
            return UpdateOutcome::Unavailable;
        }
    };

    if !needs_update(current, remote) {
        log::debug!("running {current}, latest release is {remote}");
        return UpdateOutcome::UpToDate;
    }

    output::info(format!("Updating bastion-connect {current} -> {remote}"));
    match apply_update(source, remote, executable) {
        Ok(()) => {
            output::success(format!("Updated to {remote}, restarting"));
            UpdateOutcome::Replaced(remote)
        }
        Err(e) => {
            output::warn(format!(
                "Update to {remote} failed, continuing with {current}: {e}"
            ));
            UpdateOutcome::Unavailable
        }
    }
}

fn apply_update(source: &dyn ReleaseSource, version: Version, executable: &Path) -> Result<()> {
    let staged = stage(source, version, executable)?;
    replace_executable(staged, executable)
}

/// Download into a staging file in the executable's directory.
/// The staging file is deleted when dropped without being persisted.
fn stage(source: &dyn ReleaseSource, version: Version, executable: &Path) -> Result<NamedTempFile> {
    let dir = executable.parent().ok_or_else(|| BastionError::Io {
        message: format!("{} has no parent directory", executable.display()),
    })?;

    let mut staged = tempfile::Builder::new()
        .prefix(".bastion-connect-")
        .suffix(".staged")
        .tempfile_in(dir)?;

    let spinner = Spinner::start(format!("Downloading bastion-connect {version}..."));
    let written = source.download(&version, staged.as_file_mut());
    spinner.finish();

    if written? == 0 {
        return Err(BastionError::Io {
            message: "downloaded file is empty".to_string(),
        });
    }

    staged.as_file_mut().flush()?;
    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), fs::metadata(executable)?.permissions())?;

    Ok(staged)
}

/// Windows keeps the running executable locked against overwrite but allows a
/// rename, so the old build is moved aside first.
#[cfg(windows)]
fn replace_executable(staged: NamedTempFile, executable: &Path) -> Result<()> {
    let backup = backup_path(executable);
    if backup.exists() {
        fs::remove_file(&backup)?;
    }
    fs::rename(executable, &backup)?;

    if let Err(e) = staged.persist(executable) {
        fs::rename(&backup, executable)?;
        return Err(e.error.into());
    }
    Ok(())
}

#[cfg(not(windows))]
fn replace_executable(staged: NamedTempFile, executable: &Path) -> Result<()> {
    staged
        .persist(executable)
        .map_err(|e| BastionError::from(e.error))?;
    Ok(())
}

fn backup_path(executable: &Path) -> std::path::PathBuf {
    let mut name = executable.as_os_str().to_owned();
    name.push(".old");
    name.into()
}

/// Remove the build moved aside by a previous update, if it is no longer in use
fn remove_previous_backup(executable: &Path) {
    let backup = backup_path(executable);
    if backup.exists() {
        if let Err(e) = fs::remove_file(&backup) {
            log::debug!("could not remove {}: {e}", backup.display());
        }
    }
}

/// Arguments for the relaunched process: the original ones plus [`SKIP_UPDATE_FLAG`]
pub fn relaunch_args<I>(original: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = original.into_iter().skip(1).collect();
    if !args.iter().any(|arg| arg == SKIP_UPDATE_FLAG) {
        args.push(SKIP_UPDATE_FLAG.into());
    }
    args
}

/// Hand over to the freshly installed executable.
///
/// On Unix the current process image is replaced and this only returns on
/// failure. On Windows the new build runs attached to the same console and its
/// exit code is returned.
pub fn relaunch(executable: &Path, args: &[OsString]) -> Result<i32> {
    let mut command = Command::new(executable);
    command.args(args);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        Err(command.exec().into())
    }

    #[cfg(not(unix))]
    {
        let status = command.status()?;
        Ok(status.code().unwrap_or(1))
    }
}
