// file.rs
//
//! Top-level GIF container and its path-based operations.
use crate::block::{ColorTable, Frame, GraphicControl, Header};
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;

/// An in-memory GIF file.
///
/// Constructed by [load](struct.GifFile.html#method.load) (or a
/// [Decoder](struct.Decoder.html)), read-only afterwards.  Saving never
/// recomputes a field: the bytes that came in go back out, with the
/// frame list order as the only degree of freedom.
///
/// ## Example
/// ```no_run
/// # fn main() -> gifrev::Result<()> {
/// let file = gifrev::GifFile::load("bounce.gif")?;
/// println!("GIF{}, {} frames", file.version_str(), file.frames().len());
/// file.save_reversed("ecnuob.gif")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GifFile {
    /// Header and logical screen descriptor
    pub header: Header,
    /// Global color table (optional)
    pub global_color_table: Option<ColorTable>,
    /// Graphic control extension (optional, at most one retained)
    pub graphic_control_ext: Option<GraphicControl>,
    /// Frames in file order
    pub frames: Vec<Frame>,
}

impl GifFile {
    pub(crate) fn new(
        header: Header,
        global_color_table: Option<ColorTable>,
        graphic_control_ext: Option<GraphicControl>,
        frames: Vec<Frame>,
    ) -> Self {
        GifFile {
            header,
            global_color_table,
            graphic_control_ext,
            frames,
        }
    }

    /// Load a GIF file from a path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path).map_err(Error::CannotOpen)?;
        Decoder::new(f).decode()
    }

    /// Save to a path in original frame order
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let f = File::create(path).map_err(Error::CannotOpen)?;
        Encoder::new(f).encode(self)
    }

    /// Save to a path with the frame sequence reversed
    pub fn save_reversed<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let f = File::create(path).map_err(Error::CannotOpen)?;
        Encoder::new(f).encode_reversed(self)
    }

    /// GIF version string ("87a" or "89a")
    pub fn version_str(&self) -> String {
        String::from_utf8_lossy(&self.header.version()).to_string()
    }

    /// Logical screen width, in pixels
    pub fn screen_width(&self) -> u16 {
        self.header.screen_width()
    }

    /// Logical screen height, in pixels
    pub fn screen_height(&self) -> u16 {
        self.header.screen_height()
    }

    /// Frames in file order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Animation delay in centiseconds, if a graphic control extension
    /// was present
    pub fn delay_time_cs(&self) -> Option<u16> {
        self.graphic_control_ext
            .as_ref()
            .map(|gc| gc.delay_time_cs())
    }
}
