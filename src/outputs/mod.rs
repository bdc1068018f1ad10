//! Output generation for finished resource packages.
//!
//! # Submodules
//!
//! - [`manifest`]: Writes the package as `resources.json` for the renderer
//!
//! # Output Structure
//!
//! ```text
//! content_dir/
//! ├── image_00.jpg
//! ├── narration.wav
//! ├── narration.srt
//! └── resources.json
//! ```

pub mod manifest;
