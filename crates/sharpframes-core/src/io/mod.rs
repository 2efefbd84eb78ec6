pub mod image_io;
pub mod writer;

pub use image_io::{frame_to_rgb8, load_frame, load_frames_dir, save_frame_png};
pub use writer::{next_counter, write_frames};
