// Core modules implementing field codecs, the decode pipeline, and error modeling.
pub mod codec;
pub mod decode;
pub mod error;
pub mod failure;
pub mod list;
pub mod timestamp;
