// decode.rs
//
use crate::block::*;
use crate::error::{Error, Phase, Result};
use crate::file::GifFile;
use std::io::{BufReader, ErrorKind, Read};

/// GIF container decoder.
///
/// Walks the block structure in a single pass without touching the LZW
/// image data.  Frame boundaries are found by consuming the length
/// prefixes of the sub-block streams.
///
/// ## Example
/// ```
/// # fn main() -> gifrev::Result<()> {
/// # let gif = &[
/// #   0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00,
/// #   0x02, 0x00, 0x00, 0x00, 0x00, 0x3b,
/// # ][..];
/// let file = gifrev::Decoder::new(gif).decode()?;
/// println!("frames: {}", file.frames().len());
/// # Ok(())
/// # }
/// ```
pub struct Decoder<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> Decoder<R> {
    /// Create a new Decoder
    pub fn new(r: R) -> Self {
        Decoder {
            reader: BufReader::new(r),
        }
    }

    /// Decode the whole container.
    ///
    /// The first error encountered aborts the load; no partial result
    /// is returned.
    pub fn decode(mut self) -> Result<GifFile> {
        let header = self.read_header()?;
        let global_color_table = if header.has_global_color_table() {
            Some(self.read_color_table(Phase::GlobalColorTable)?)
        } else {
            None
        };
        let mut graphic_control_ext = None;
        let mut frames = Vec::new();
        loop {
            let tag = self.read_byte(Phase::BlockTag)?;
            match BlockCode::from_u8(tag) {
                Some(BlockCode::ImageDesc_) => {
                    let frame = self.read_frame()?;
                    debug!("frame {}: {:?}", frames.len(), frame.image_desc);
                    frames.push(frame);
                }
                Some(BlockCode::Extension_) => {
                    if let Some(gc) = self.read_extension()? {
                        if graphic_control_ext.is_some() {
                            warn!(
                                "duplicate graphic control extension; \
                                 keeping the last"
                            );
                        }
                        graphic_control_ext = Some(gc);
                    }
                }
                Some(BlockCode::Trailer_) => break,
                None => return Err(Error::UnknownBlockType(tag)),
            }
        }
        Ok(GifFile::new(
            header,
            global_color_table,
            graphic_control_ext,
            frames,
        ))
    }

    /// Read exactly `buf.len()` bytes, tagging a short read with `phase`
    fn read_exact(&mut self, buf: &mut [u8], phase: Phase) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::TruncatedStream(phase)
            } else {
                Error::Io(e)
            }
        })
    }

    fn read_byte(&mut self, phase: Phase) -> Result<u8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf, phase)?;
        Ok(buf[0])
    }

    /// Read the header and logical screen descriptor (13 bytes)
    fn read_header(&mut self) -> Result<Header> {
        let mut buf = [0; 13];
        self.read_exact(&mut buf, Phase::Header)?;
        if &buf[..3] != b"GIF" {
            return Err(Error::InvalidSignature([buf[0], buf[1], buf[2]]));
        }
        let header = Header::default()
            .with_version([buf[3], buf[4], buf[5]])
            .with_screen_width(u16::from_le_bytes([buf[6], buf[7]]))
            .with_screen_height(u16::from_le_bytes([buf[8], buf[9]]))
            .with_flags(buf[10])
            .with_background_color_idx(buf[11])
            .with_pixel_aspect_ratio(buf[12]);
        debug!("header: {:?}", header);
        Ok(header)
    }

    /// Read a full 256-entry color table.
    ///
    /// The size sub-field of the packed byte is ignored; 768 bytes are
    /// always consumed.
    fn read_color_table(&mut self, phase: Phase) -> Result<ColorTable> {
        let mut colors = Box::new([0; ColorTable::SIZE_BYTES]);
        self.read_exact(&mut colors[..], phase)?;
        Ok(ColorTable::with_colors(colors))
    }

    /// Read one frame (after the 0x2C separator)
    fn read_frame(&mut self) -> Result<Frame> {
        let mut buf = [0; 9];
        self.read_exact(&mut buf, Phase::ImageDescriptor)?;
        let image_desc = ImageDesc::default()
            .with_left(u16::from_le_bytes([buf[0], buf[1]]))
            .with_top(u16::from_le_bytes([buf[2], buf[3]]))
            .with_width(u16::from_le_bytes([buf[4], buf[5]]))
            .with_height(u16::from_le_bytes([buf[6], buf[7]]))
            .with_flags(buf[8]);
        let local_color_table = if image_desc.has_local_color_table() {
            Some(self.read_color_table(Phase::LocalColorTable)?)
        } else {
            None
        };
        let min_code_size = self.read_byte(Phase::CodeSize)?;
        let image_data = self.read_sub_blocks()?;
        Ok(Frame::new(
            image_desc,
            local_color_table,
            min_code_size,
            image_data,
        ))
    }

    /// Read one extension (after the 0x21 introducer).
    ///
    /// Only the graphic control extension is retained; all other labels
    /// have their sub-blocks drained and discarded.
    fn read_extension(&mut self) -> Result<Option<GraphicControl>> {
        let label = self.read_byte(Phase::ExtensionLabel)?;
        match ExtensionCode::from(label) {
            ExtensionCode::GraphicControl_ => {
                let mut buf = [0; 6];
                self.read_exact(&mut buf, Phase::GraphicControl)?;
                let gc = GraphicControl::default()
                    .with_block_size(buf[0])
                    .with_flags(buf[1])
                    .with_delay_time_cs(u16::from_le_bytes([buf[2], buf[3]]))
                    .with_transparent_color_idx(buf[4])
                    .with_terminator(buf[5]);
                debug!("graphic control: {:?}", gc);
                Ok(Some(gc))
            }
            et => {
                debug!("skipping extension: {:?}", et);
                self.read_sub_blocks()?;
                Ok(None)
            }
        }
    }

    /// Read a sub-block stream up to and including its 0x00 terminator
    fn read_sub_blocks(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut blocks = Vec::new();
        loop {
            let len = self.read_byte(Phase::SubBlock)? as usize;
            if len == 0 {
                break;
            }
            let mut block = vec![0; len];
            self.read_exact(&mut block, Phase::SubBlock)?;
            blocks.push(block);
        }
        Ok(blocks)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// 10x10 screen header with the given packed flags byte
    pub(crate) fn header(flags: u8) -> Vec<u8> {
        let mut v = b"GIF89a".to_vec();
        v.extend_from_slice(&[0x0A, 0x00, 0x0A, 0x00, flags, 0x00, 0x00]);
        v
    }

    /// Full 768-byte color table filled from a seed
    pub(crate) fn color_table(seed: u8) -> Vec<u8> {
        (0..ColorTable::SIZE_BYTES)
            .map(|i| (i as u8).wrapping_add(seed))
            .collect()
    }

    /// One frame with optional local color table and one data sub-block
    pub(crate) fn frame(local_table: Option<u8>, data: &[u8]) -> Vec<u8> {
        assert!(data.len() < 256);
        let flags = if local_table.is_some() { 0x80 } else { 0x00 };
        let mut v = vec![
            0x2C, // image separator
            0x01, 0x00, 0x02, 0x00, 0x05, 0x00, 0x05, 0x00, flags,
        ];
        if let Some(seed) = local_table {
            v.extend_from_slice(&color_table(seed));
        }
        v.push(0x02); // LZW minimum code size
        v.push(data.len() as u8);
        v.extend_from_slice(data);
        v.push(0x00); // sub-block terminator
        v
    }

    /// Graphic control extension with the given delay
    pub(crate) fn graphic_control(delay: u16) -> Vec<u8> {
        let d = delay.to_le_bytes();
        vec![0x21, 0xF9, 0x04, 0x01, d[0], d[1], 0x03, 0x00]
    }

    #[test]
    fn two_frames() -> Result<()> {
        let mut gif = header(0x80);
        gif.extend_from_slice(&color_table(0));
        gif.extend_from_slice(&graphic_control(25));
        gif.extend_from_slice(&frame(None, &[0x8C, 0x2D, 0x99]));
        gif.extend_from_slice(&frame(None, &[0x44]));
        gif.push(0x3B);
        let file = Decoder::new(&gif[..]).decode()?;
        assert_eq!(file.version_str(), "89a".to_string());
        assert_eq!(file.screen_width(), 10);
        assert_eq!(file.screen_height(), 10);
        assert_eq!(file.frames().len(), 2);
        assert_eq!(file.delay_time_cs(), Some(25));
        assert_eq!(file.frames()[0].image_data, vec![vec![0x8C, 0x2D, 0x99]]);
        assert_eq!(file.frames()[1].image_data, vec![vec![0x44]]);
        assert_eq!(file.frames()[0].min_code_size, 2);
        Ok(())
    }

    #[test]
    fn zero_frames() -> Result<()> {
        let mut gif = header(0x00);
        gif.push(0x3B);
        let file = Decoder::new(&gif[..]).decode()?;
        assert!(file.frames().is_empty());
        assert!(file.global_color_table.is_none());
        assert!(file.graphic_control_ext.is_none());
        Ok(())
    }

    #[test]
    fn invalid_signature() {
        let mut gif = b"GIX89a".to_vec();
        gif.extend_from_slice(&[0x0A, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x00]);
        gif.push(0x3B);
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSignature([b'G', b'I', b'X'])
        ));
    }

    #[test]
    fn truncated_header() {
        let gif = b"GIF89";
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(err, Error::TruncatedStream(Phase::Header)));
    }

    #[test]
    fn truncated_global_color_table() {
        let mut gif = header(0x80);
        gif.extend_from_slice(&color_table(0)[..100]);
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedStream(Phase::GlobalColorTable)
        ));
    }

    #[test]
    fn truncated_sub_block() {
        let mut gif = header(0x00);
        // declared length 5, only 2 payload bytes present
        gif.extend_from_slice(&[
            0x2C, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x05, 0x00, 0x00,
            0x02, 0x05, 0xAA, 0xBB,
        ]);
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(err, Error::TruncatedStream(Phase::SubBlock)));
    }

    #[test]
    fn missing_trailer() {
        let gif = header(0x00);
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(err, Error::TruncatedStream(Phase::BlockTag)));
    }

    #[test]
    fn unknown_block_type() {
        let mut gif = header(0x00);
        gif.push(0x99);
        let err = Decoder::new(&gif[..]).decode().unwrap_err();
        assert!(matches!(err, Error::UnknownBlockType(0x99)));
    }

    #[test]
    fn comment_extension_skipped() -> Result<()> {
        let mut gif = header(0x00);
        gif.extend_from_slice(&[0x21, 0xFE, 0x05]);
        gif.extend_from_slice(b"hello");
        gif.push(0x00);
        gif.extend_from_slice(&graphic_control(10));
        gif.extend_from_slice(&frame(None, &[0x01]));
        gif.extend_from_slice(&frame(None, &[0x02]));
        gif.push(0x3B);
        let file = Decoder::new(&gif[..]).decode()?;
        assert_eq!(file.delay_time_cs(), Some(10));
        assert_eq!(file.frames().len(), 2);
        assert_eq!(file.frames()[0].image_data, vec![vec![0x01]]);
        assert_eq!(file.frames()[1].image_data, vec![vec![0x02]]);
        Ok(())
    }

    #[test]
    fn duplicate_graphic_control_keeps_last() -> Result<()> {
        let mut gif = header(0x00);
        gif.extend_from_slice(&graphic_control(10));
        gif.extend_from_slice(&graphic_control(50));
        gif.push(0x3B);
        let file = Decoder::new(&gif[..]).decode()?;
        assert_eq!(file.delay_time_cs(), Some(50));
        Ok(())
    }

    #[test]
    fn local_color_table() -> Result<()> {
        let mut gif = header(0x00);
        gif.extend_from_slice(&frame(None, &[0x01]));
        gif.extend_from_slice(&frame(Some(7), &[0x02]));
        gif.push(0x3B);
        let file = Decoder::new(&gif[..]).decode()?;
        assert!(file.frames()[0].local_color_table.is_none());
        let table = file.frames()[1].local_color_table.as_ref().unwrap();
        assert_eq!(&table.colors()[..], &color_table(7)[..]);
        Ok(())
    }

    #[test]
    fn multi_sub_block_stream() -> Result<()> {
        let mut gif = header(0x00);
        gif.extend_from_slice(&[
            0x2C, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00, 0x05, 0x00, 0x00,
            0x02, // code size
            0x03, 0x10, 0x20, 0x30, // first sub-block
            0x01, 0x40, // second sub-block
            0x00, // terminator
            0x3B,
        ]);
        let file = Decoder::new(&gif[..]).decode()?;
        assert_eq!(
            file.frames()[0].image_data,
            vec![vec![0x10, 0x20, 0x30], vec![0x40]]
        );
        Ok(())
    }
}
