pub mod hls;
pub mod playlist;
