// encode.rs
//
use crate::block::*;
use crate::error::Result;
use crate::file::GifFile;
use std::io::{BufWriter, Write};

/// GIF container encoder.
///
/// Writes a loaded container back out byte-for-byte, either in original
/// frame order or reversed.  No field is recomputed; every descriptor,
/// color table and sub-block is emitted exactly as it was read.
pub struct Encoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> Encoder<W> {
    /// Create a new Encoder
    pub fn new(w: W) -> Self {
        Encoder {
            writer: BufWriter::new(w),
        }
    }

    /// Encode a container in original frame order
    pub fn encode(&mut self, file: &GifFile) -> Result<()> {
        self.encode_ordered(file, file.frames.iter())
    }

    /// Encode a container with the frame list reversed
    pub fn encode_reversed(&mut self, file: &GifFile) -> Result<()> {
        self.encode_ordered(file, file.frames.iter().rev())
    }

    /// Encode a container, visiting frames in the given order
    fn encode_ordered<'a, I>(&mut self, file: &GifFile, frames: I) -> Result<()>
    where
        I: Iterator<Item = &'a Frame>,
    {
        self.format_header(&file.header)?;
        if let Some(table) = &file.global_color_table {
            self.writer.write_all(table.colors())?;
        }
        if let Some(gc) = &file.graphic_control_ext {
            self.format_graphic_control(gc)?;
        }
        for frame in frames {
            self.writer.write_all(BlockCode::ImageDesc_.signature())?;
            self.format_frame(frame)?;
        }
        self.writer.write_all(BlockCode::Trailer_.signature())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write the header and logical screen descriptor (13 bytes)
    fn format_header(&mut self, header: &Header) -> Result<()> {
        let mut buf = Vec::with_capacity(13);
        buf.extend_from_slice(b"GIF");
        buf.extend_from_slice(&header.version());
        buf.extend_from_slice(&header.screen_width().to_le_bytes());
        buf.extend_from_slice(&header.screen_height().to_le_bytes());
        buf.push(header.flags());
        buf.push(header.background_color_idx());
        buf.push(header.pixel_aspect_ratio());
        self.writer.write_all(&buf)?;
        Ok(())
    }

    /// Write a graphic control extension, tag pair plus body as read
    fn format_graphic_control(&mut self, gc: &GraphicControl) -> Result<()> {
        self.writer.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(7);
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(gc.block_size());
        buf.push(gc.flags());
        buf.extend_from_slice(&gc.delay_time_cs().to_le_bytes());
        buf.push(gc.transparent_color_idx());
        buf.push(gc.terminator());
        self.writer.write_all(&buf)?;
        Ok(())
    }

    /// Write one frame (the 0x2C separator is the caller's)
    fn format_frame(&mut self, frame: &Frame) -> Result<()> {
        let desc = &frame.image_desc;
        let mut buf = Vec::with_capacity(9);
        buf.extend_from_slice(&desc.left().to_le_bytes());
        buf.extend_from_slice(&desc.top().to_le_bytes());
        buf.extend_from_slice(&desc.width().to_le_bytes());
        buf.extend_from_slice(&desc.height().to_le_bytes());
        buf.push(desc.flags());
        self.writer.write_all(&buf)?;
        if let Some(table) = &frame.local_color_table {
            self.writer.write_all(table.colors())?;
        }
        self.writer.write_all(&[frame.min_code_size])?;
        self.format_sub_blocks(&frame.image_data)?;
        Ok(())
    }

    /// Write a sub-block stream followed by its 0x00 terminator
    fn format_sub_blocks(&mut self, blocks: &[Vec<u8>]) -> Result<()> {
        for b in blocks {
            assert!(b.len() < 256);
            self.writer.write_all(&[b.len() as u8])?;
            self.writer.write_all(b)?;
        }
        self.writer.write_all(&[0])?;
        Ok(())
    }
}
