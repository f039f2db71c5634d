//! Message-framed control channel transports

use std::{
    io,
    os::fd::{AsRawFd, OwnedFd, RawFd},
    path::Path,
};

use nix::sys::socket::{self, AddressFamily, MsgFlags, SockFlag, SockType, UnixAddr};

use crate::error::{BotError, Result};

/// A bidirectional channel that preserves message boundaries
pub trait ControlChannel {
    /// Receive one message into `buf`; `Ok(0)` means the peer closed
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Send `frame` as one message
    fn send(&mut self, frame: &[u8]) -> io::Result<()>;
}

impl<C: ControlChannel + ?Sized> ControlChannel for &mut C {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }

    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).send(frame)
    }
}

/// `AF_UNIX` / `SOCK_SEQPACKET` socket
#[derive(Debug)]
pub struct SeqPacketChannel {
    fd: OwnedFd,
}

impl SeqPacketChannel {
    /// Connect to the game server's listening socket
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let fd = socket::socket(
            AddressFamily::Unix,
            SockType::SeqPacket,
            SockFlag::empty(),
            None,
        )
        .map_err(|e| BotError::platform(format!("Failed to create socket: {}", e)))?;
        let addr = UnixAddr::new(path).map_err(|_| {
            BotError::invalid_parameter(
                "socket_path",
                format!("{} is not a valid socket path", path.display()),
            )
        })?;

        socket::connect(fd.as_raw_fd(), &addr).map_err(|e| {
            let context = format!("Failed to connect to {}", path.display());
            BotError::from_io(io::Error::from(e), &context)
        })?;

        log::info!("connected to control socket {}", path.display());
        Ok(Self { fd })
    }

    /// A connected pair of channels within this process
    pub fn pair() -> Result<(Self, Self)> {
        let (a, b) = socket::socketpair(
            AddressFamily::Unix,
            SockType::SeqPacket,
            None,
            SockFlag::empty(),
        )
        .map_err(|e| BotError::platform(format!("Failed to create socket pair: {}", e)))?;
        Ok((Self { fd: a }, Self { fd: b }))
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl ControlChannel for SeqPacketChannel {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        socket::recv(self.fd.as_raw_fd(), buf, MsgFlags::empty()).map_err(io::Error::from)
    }

    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        let sent = socket::send(self.fd.as_raw_fd(), frame, MsgFlags::empty())
            .map_err(io::Error::from)?;
        if sent != frame.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, frame.len()),
            ));
        }
        Ok(())
    }
}
