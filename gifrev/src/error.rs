// error.rs
//
use std::fmt;
use std::io;

/// Parse phase where a read ran short.
///
/// Stored in [TruncatedStream](enum.Error.html#variant.TruncatedStream)
/// so callers can report which part of the file was cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 13-byte header / logical screen descriptor region
    Header,
    /// 768-byte global color table
    GlobalColorTable,
    /// Block tag byte at scan position
    BlockTag,
    /// Extension label byte after the introducer
    ExtensionLabel,
    /// Graphic control extension body
    GraphicControl,
    /// 9-byte image descriptor
    ImageDescriptor,
    /// 768-byte local color table
    LocalColorTable,
    /// LZW minimum code size byte
    CodeSize,
    /// Data sub-block length or payload
    SubBlock,
}

impl fmt::Display for Phase {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::Phase::*;
        let p = match self {
            Header => "header",
            GlobalColorTable => "global color table",
            BlockTag => "block tag",
            ExtensionLabel => "extension label",
            GraphicControl => "graphic control extension",
            ImageDescriptor => "image descriptor",
            LocalColorTable => "local color table",
            CodeSize => "LZW minimum code size",
            SubBlock => "data sub-block",
        };
        write!(fmt, "{}", p)
    }
}

/// Errors encountered while decoding or encoding
#[derive(Debug)]
pub enum Error {
    /// Input / output path could not be opened.
    CannotOpen(io::Error),
    /// A wrapped I/O error.
    Io(io::Error),
    /// First three header bytes are not "GIF".
    InvalidSignature([u8; 3]),
    /// File ended before a fixed-size or declared-size field.
    TruncatedStream(Phase),
    /// Byte at block-scan position is not a separator, introducer or
    /// trailer.
    UnknownBlockType(u8),
}

/// Gifrev result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CannotOpen(err) => write!(fmt, "cannot open: {}", err),
            Error::Io(err) => err.fmt(fmt),
            Error::InvalidSignature(sig) => {
                write!(fmt, "not a GIF image (signature {:02X?})", sig)
            }
            Error::TruncatedStream(phase) => {
                write!(fmt, "truncated stream in {}", phase)
            }
            Error::UnknownBlockType(t) => {
                write!(fmt, "unknown block type: 0x{:02X}", t)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::CannotOpen(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
