//! Reading and writing of brush-based MAP level files.
//!
//! A document is a [`qmap::Level`] of entities, each holding ordered
//! properties and zero or more brushes of textured faces.
//!
//! ```
//! use maplevel::qmap;
//!
//! let text = "{\n\"classname\" \"worldspawn\"\n}\n";
//! let level = qmap::parse_str(text)?;
//!
//! assert_eq!(level.entities()[0].classname(), Some("worldspawn"));
//! assert_eq!(level.to_map_string(), format!("// Entity 0\n{}", text));
//! # Ok::<(), qmap::Error>(())
//! ```

#![no_std]

#[cfg(all(not(feature = "std"), not(feature = "alloc_fills")))]
compile_error!("Enable feature 'std' or 'alloc_fills'");

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

pub mod qmap;
