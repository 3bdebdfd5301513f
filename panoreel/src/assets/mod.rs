/// Audio duration probing and concatenation through `ffprobe`/`ffmpeg`.
pub mod audio;
/// Photo listing, dimension probing, and RGBA8 decode.
pub mod photos;
