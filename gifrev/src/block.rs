// block.rs
//
//! Data-model types for the GIF container structure.
//!
//! These mirror the on-disk layout closely enough that a loaded file can
//! be written back byte-for-byte.  Packed flag bytes are carried verbatim
//! and only the presence bits are ever interpreted.

const CHANNELS: usize = 3;

/// Block codes at scan position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    ImageDesc_,
    Extension_,
    Trailer_,
}

impl BlockCode {
    pub fn from_u8(t: u8) -> Option<Self> {
        use self::BlockCode::*;
        match t {
            b',' => Some(ImageDesc_), // (0x2C) Image separator
            b'!' => Some(Extension_), // (0x21) Extension introducer
            b';' => Some(Trailer_),   // (0x3B) GIF trailer
            _ => None,
        }
    }
    pub fn signature(self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

/// Extension labels following the introducer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    PlainText_,
    GraphicControl_,
    Comment_,
    Application_,
    Unknown_(u8),
}

impl From<u8> for ExtensionCode {
    fn from(n: u8) -> Self {
        use self::ExtensionCode::*;
        match n {
            0x01 => PlainText_,
            0xF9 => GraphicControl_,
            0xFE => Comment_,
            0xFF => Application_,
            _ => Unknown_(n),
        }
    }
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            PlainText_ => 0x01,
            GraphicControl_ => 0xF9,
            Comment_ => 0xFE,
            Application_ => 0xFF,
            Unknown_(n) => n,
        }
    }
}

/// GIF header and logical screen descriptor.
///
/// Covers the first 13 bytes of the file.  The "GIF" signature is
/// validated on read and emitted on write, but not stored here.
#[derive(Debug, Clone)]
pub struct Header {
    version: [u8; 3],
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            version: *b"89a",
            screen_width: 0,
            screen_height: 0,
            flags: 0,
            background_color_idx: 0,
            pixel_aspect_ratio: 0,
        }
    }
}

impl Header {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;

    pub fn with_version(mut self, version: [u8; 3]) -> Self {
        self.version = version;
        self
    }
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    /// Set the packed flags byte.  Bit 7 declares the global color
    /// table; the remaining bits (color resolution, sort, size) pass
    /// through unmodified.
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn has_global_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }
    pub fn with_background_color_idx(
        mut self,
        background_color_idx: u8,
    ) -> Self {
        self.background_color_idx = background_color_idx;
        self
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn with_pixel_aspect_ratio(mut self, pixel_aspect_ratio: u8) -> Self {
        self.pixel_aspect_ratio = pixel_aspect_ratio;
        self
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// A 256-entry RGB color table.
///
/// Always the full 768 bytes.  The size sub-field of the packed byte is
/// not consulted when reading or writing the table.
#[derive(Clone)]
pub struct ColorTable {
    colors: Box<[u8; ColorTable::SIZE_BYTES]>,
}

impl Default for ColorTable {
    fn default() -> Self {
        ColorTable {
            colors: Box::new([0; ColorTable::SIZE_BYTES]),
        }
    }
}

impl ColorTable {
    /// Number of entries in a table
    pub const ENTRIES: usize = 256;
    /// Size of a table on disk, in bytes
    pub const SIZE_BYTES: usize = Self::ENTRIES * CHANNELS;

    pub fn with_colors(colors: Box<[u8; ColorTable::SIZE_BYTES]>) -> Self {
        ColorTable { colors }
    }
    pub fn colors(&self) -> &[u8; ColorTable::SIZE_BYTES] {
        &self.colors
    }
}

impl std::fmt::Debug for ColorTable {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "ColorTable {{ {} entries }}", Self::ENTRIES)
    }
}

/// Graphic control extension.
///
/// All six body bytes are kept exactly as read, including the block size
/// (expected 4) and terminator (expected 0), so the block round-trips
/// without re-validation.
#[derive(Debug, Clone)]
pub struct GraphicControl {
    block_size: u8,
    flags: u8,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
    terminator: u8,
}

impl Default for GraphicControl {
    fn default() -> Self {
        GraphicControl {
            block_size: 4,
            flags: 0,
            delay_time_cs: 0,
            transparent_color_idx: 0,
            terminator: 0,
        }
    }
}

impl GraphicControl {
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    pub fn with_block_size(mut self, block_size: u8) -> Self {
        self.block_size = block_size;
        self
    }
    pub fn block_size(&self) -> u8 {
        self.block_size
    }
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn with_delay_time_cs(mut self, delay_time_cs: u16) -> Self {
        self.delay_time_cs = delay_time_cs;
        self
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn with_transparent_color_idx(
        mut self,
        transparent_color_idx: u8,
    ) -> Self {
        self.transparent_color_idx = transparent_color_idx;
        self
    }
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }
    pub fn transparent_color(&self) -> Option<u8> {
        if self.flags & Self::TRANSPARENT_COLOR != 0 {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }
    pub fn with_terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }
    pub fn terminator(&self) -> u8 {
        self.terminator
    }
}

/// Image descriptor for one frame
#[derive(Debug, Clone, Default)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;

    pub fn with_left(mut self, left: u16) -> Self {
        self.left = left;
        self
    }
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn with_top(mut self, top: u16) -> Self {
        self.top = top;
        self
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn has_local_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }
}

/// One frame of a GIF animation.
///
/// Image data stays LZW-compressed; the sub-blocks are opaque byte runs
/// preserved at their original sizes.  The zero-length stream terminator
/// is implicit, not stored.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Image descriptor
    pub image_desc: ImageDesc,
    /// Local color table (optional)
    pub local_color_table: Option<ColorTable>,
    /// LZW minimum code size
    pub min_code_size: u8,
    /// Compressed image data sub-blocks
    pub image_data: Vec<Vec<u8>>,
}

impl Frame {
    pub fn new(
        image_desc: ImageDesc,
        local_color_table: Option<ColorTable>,
        min_code_size: u8,
        image_data: Vec<Vec<u8>>,
    ) -> Self {
        Frame {
            image_desc,
            local_color_table,
            min_code_size,
            image_data,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_codes() {
        assert_eq!(BlockCode::from_u8(0x2C), Some(BlockCode::ImageDesc_));
        assert_eq!(BlockCode::from_u8(0x21), Some(BlockCode::Extension_));
        assert_eq!(BlockCode::from_u8(0x3B), Some(BlockCode::Trailer_));
        assert_eq!(BlockCode::from_u8(0x99), None);
        assert_eq!(BlockCode::Trailer_.signature(), b";");
    }

    #[test]
    fn extension_codes() {
        assert_eq!(ExtensionCode::from(0xF9), ExtensionCode::GraphicControl_);
        assert_eq!(ExtensionCode::from(0xFE), ExtensionCode::Comment_);
        assert_eq!(ExtensionCode::from(0x42), ExtensionCode::Unknown_(0x42));
        assert_eq!(u8::from(ExtensionCode::GraphicControl_), 0xF9);
        assert_eq!(u8::from(ExtensionCode::Unknown_(0x42)), 0x42);
    }

    #[test]
    fn header_flags() {
        let h = Header::default().with_flags(0xF7);
        assert!(h.has_global_color_table());
        assert_eq!(h.flags(), 0xF7);
        let h = Header::default().with_flags(0x77);
        assert!(!h.has_global_color_table());
    }

    #[test]
    fn image_desc_flags() {
        let d = ImageDesc::default().with_flags(0x80);
        assert!(d.has_local_color_table());
        let d = ImageDesc::default().with_flags(0x47);
        assert!(!d.has_local_color_table());
    }

    #[test]
    fn transparent_color() {
        let gc = GraphicControl::default()
            .with_flags(0x01)
            .with_transparent_color_idx(7);
        assert_eq!(gc.transparent_color(), Some(7));
        let gc = GraphicControl::default().with_transparent_color_idx(7);
        assert_eq!(gc.transparent_color(), None);
    }

    #[test]
    fn color_table_size() {
        assert_eq!(ColorTable::SIZE_BYTES, 768);
        let t = ColorTable::default();
        assert_eq!(t.colors().len(), 768);
    }
}
