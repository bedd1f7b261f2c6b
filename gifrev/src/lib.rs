// lib.rs      gifrev crate.
//
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod decode;
mod encode;
mod error;
mod file;

pub use crate::decode::Decoder;
pub use crate::encode::Encoder;
pub use crate::error::{Error, Phase, Result};
pub use crate::file::GifFile;
