#[cfg(feature = "ssr")]
pub mod script_writer;
#[cfg(feature = "ssr")]
pub mod video_assembler;
#[cfg(feature = "ssr")]
pub mod youtube;

#[cfg(feature = "ssr")]
pub use script_writer::*;
#[cfg(feature = "ssr")]
pub use video_assembler::*;
#[cfg(feature = "ssr")]
pub use youtube::*;
