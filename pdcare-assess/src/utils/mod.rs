//! Utility modules for pdcare-assess

pub mod audio_decoder;
