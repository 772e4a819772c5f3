use std::ffi::OsStr;
use std::os::unix::net::UnixStream;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::RpcStream;

/// Size of `sockaddr_un.sun_path`, including the trailing NUL.
/// Typically 108 bytes on Linux, 104 on macOS.
#[cfg(target_os = "linux")]
pub const MAX_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
pub const MAX_PATH_LEN: usize = 104;

#[cfg(target_os = "linux")]
const PROC_FD_DIR: &str = "/proc/self/fd";

/// How a socket path is turned into the address handed to `connect(2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectPlan {
    /// The path fits as-is.
    Direct,
    /// A shorter path relative to the current working directory.
    Relative(PathBuf),
    /// Open the parent directory and connect through `/proc/self/fd`.
    #[cfg(target_os = "linux")]
    DirectoryHandle,
}

impl ConnectPlan {
    fn name(&self) -> &'static str {
        match self {
            ConnectPlan::Direct => "direct",
            ConnectPlan::Relative(_) => "relative",
            #[cfg(target_os = "linux")]
            ConnectPlan::DirectoryHandle => "directory-handle",
        }
    }
}

/// Connect to the daemon's Unix domain socket (blocking).
///
/// Paths at or beyond [`MAX_PATH_LEN`] are shortened without touching the
/// process working directory, so concurrent connects never interfere.
pub fn connect(path: impl AsRef<Path>) -> Result<RpcStream> {
    let path = path.as_ref();
    let plan = if fits(path.as_os_str().len()) {
        ConnectPlan::Direct
    } else {
        let cwd = std::env::current_dir().map_err(|source| TransportError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        plan_connect(path, &cwd)?
    };

    let stream = match &plan {
        ConnectPlan::Direct => connect_address(path, path)?,
        ConnectPlan::Relative(relative) => connect_address(path, relative)?,
        #[cfg(target_os = "linux")]
        ConnectPlan::DirectoryHandle => connect_through_directory(path)?,
    };

    debug!(?path, strategy = plan.name(), "connected to unix domain socket");
    Ok(RpcStream::from_unix(stream, path.to_path_buf()))
}

/// Decide how to address `path`, resolving relative shortcuts against `cwd`.
pub fn plan_connect(path: &Path, cwd: &Path) -> Result<ConnectPlan> {
    let len = path.as_os_str().len();
    if fits(len) {
        return Ok(ConnectPlan::Direct);
    }

    let (parent, file_name) = split_socket_path(path)?;
    let parent = std::fs::canonicalize(parent).map_err(|source| TransportError::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    let base = std::fs::canonicalize(cwd).map_err(|source| TransportError::Resolve {
        path: cwd.to_path_buf(),
        source,
    })?;

    let relative = relative_path(&base, &parent).join(file_name);
    if fits(relative.as_os_str().len()) {
        return Ok(ConnectPlan::Relative(relative));
    }

    #[cfg(target_os = "linux")]
    {
        // Longest possible fd number keeps the check independent of the fd we get.
        let proxy_len = PROC_FD_DIR.len() + 1 + 10 + 1 + file_name.len();
        if fits(proxy_len) {
            return Ok(ConnectPlan::DirectoryHandle);
        }
    }

    Err(TransportError::PathTooLong {
        path: path.to_path_buf(),
        len,
        max: MAX_PATH_LEN - 1,
    })
}

/// Lexical path from `base` to `target`. Both must be absolute and normalized.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

fn fits(len: usize) -> bool {
    len < MAX_PATH_LEN
}

fn split_socket_path(path: &Path) -> Result<(&Path, &OsStr)> {
    let file_name = path.file_name().ok_or_else(|| TransportError::Resolve {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "socket path has no file name",
        ),
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((parent, file_name))
}

fn connect_address(path: &Path, address: &Path) -> Result<UnixStream> {
    UnixStream::connect(address).map_err(|source| TransportError::Connect {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(target_os = "linux")]
fn connect_through_directory(path: &Path) -> Result<UnixStream> {
    use std::os::fd::AsRawFd;
    use std::os::unix::fs::OpenOptionsExt;

    let (parent, file_name) = split_socket_path(path)?;
    let dir = std::fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_PATH | libc::O_DIRECTORY)
        .open(parent)
        .map_err(|source| TransportError::Connect {
            path: path.to_path_buf(),
            source,
        })?;

    let proxy = Path::new(PROC_FD_DIR)
        .join(dir.as_raw_fd().to_string())
        .join(file_name);
    let stream = connect_address(path, &proxy)?;
    drop(dir);
    Ok(stream)
}
