use std::fs::{File, OpenOptions};
use std::io::{IsTerminal, Read};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SourceError};

/// A serial device opened for raw, blocking reads.
///
/// Terminal devices (USB-CDC ACM ports and the like) are switched to raw
/// input with flow control disabled. Anything that is not a terminal, such as
/// a regular file holding a recorded dump, is read as-is.
pub struct SerialPort {
    file: File,
    path: PathBuf,
    terminal: bool,
}

impl SerialPort {
    /// Default device path: the first USB-CDC ACM port.
    pub const DEFAULT_PATH: &'static str = "/dev/ttyACM0";
    /// Nominal line speed. USB-CDC ignores it, but the termios call wants one.
    pub const BAUD_RATE: libc::speed_t = libc::B115200;

    /// Open `path` and configure it for raw blocking reads.
    ///
    /// The device is opened without becoming the controlling terminal and
    /// without waiting on carrier detect, then switched back to blocking mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(&path)
            .map_err(|e| SourceError::Open {
                path: path.clone(),
                source: e,
            })?;

        set_blocking(&file).map_err(|e| SourceError::Open {
            path: path.clone(),
            source: e,
        })?;

        let terminal = file.is_terminal();
        if terminal {
            configure_raw(&file).map_err(|e| SourceError::Configure {
                path: path.clone(),
                source: e,
            })?;
        } else {
            debug!(?path, "not a terminal; skipping line configuration");
        }

        info!(?path, terminal, "opened serial source");

        Ok(Self {
            file,
            path,
            terminal,
        })
    }

    /// The path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the underlying handle is a terminal device.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl Read for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("path", &self.path)
            .field("terminal", &self.terminal)
            .finish()
    }
}

fn set_blocking(file: &File) -> std::io::Result<()> {
    // SAFETY: `fd` is an open descriptor owned by `file` for the duration of the call.
    let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_SETFL, 0) };
    if rc == -1 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

fn configure_raw(file: &File) -> std::io::Result<()> {
    let fd = file.as_raw_fd();

    // SAFETY: termios is plain old data; tcgetattr fully initialises it on success.
    let mut options: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: `fd` is an open terminal descriptor and `options` is a valid writable pointer.
    if unsafe { libc::tcgetattr(fd, &mut options) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    options.c_cflag |= libc::CLOCAL | libc::CREAD;
    options.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG);
    options.c_oflag &= !libc::OPOST;
    options.c_iflag &= !(libc::IXON | libc::IXOFF | libc::IXANY);

    // VMIN/VTIME are left alone: reads block until data arrives.

    // SAFETY: `options` is a valid termios obtained from tcgetattr above.
    if unsafe { libc::cfsetspeed(&mut options, SerialPort::BAUD_RATE) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    // SAFETY: `fd` is open and `options` is a valid termios.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &options) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ByteSource, Chunk};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("serialpcm-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn open_missing_device_is_unavailable() {
        let dir = temp_dir("missing");
        let result = SerialPort::open(dir.join("ttyNOPE"));

        let err = result.unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.is_unavailable());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn regular_file_is_read_without_configuration() {
        let dir = temp_dir("dump");
        let dump = dir.join("capture.raw");
        std::fs::write(&dump, [0x7F, 0x7F, 0x7F, 0x7F, 0x01, 0x02]).unwrap();

        let mut port = SerialPort::open(&dump).unwrap();
        assert!(!port.is_terminal());
        assert_eq!(port.path(), dump.as_path());

        let mut buf = [0u8; 16];
        assert_eq!(port.read_chunk(&mut buf).unwrap(), Chunk::Data(6));
        assert_eq!(&buf[..6], &[0x7F, 0x7F, 0x7F, 0x7F, 0x01, 0x02]);
        assert_eq!(port.read_chunk(&mut buf).unwrap(), Chunk::EndOfStream);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn debug_output_names_path() {
        let dir = temp_dir("debug");
        let dump = dir.join("empty.raw");
        std::fs::write(&dump, b"").unwrap();

        let port = SerialPort::open(&dump).unwrap();
        let text = format!("{port:?}");
        assert!(text.contains("empty.raw"));
        assert!(text.contains("terminal: false"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
