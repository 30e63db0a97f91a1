//! Persistence of layer visibility and graphic overrides.
//!
//! Each container (imported drawing) is stored as its own JSON file named
//! after the sanitized, normalized container name:
//!
//! ```text
//! LayerToggles/
//!   Site Plan.dwg.json   {"visible": true, "halftone": false, ..., "subitems": {...}}
//!   Floor Plan.dwg.json
//! ```
//!
//! Saving replaces each container's file atomically. Loading applies every
//! file to a staged copy of the hierarchy and only swaps it in once all
//! files have been read, so a damaged file never leaves a partial load.

mod error;
mod io;
mod layout;
mod record;

pub use error::{Result, StoreError};
pub use io::{
    LoadSummary, SaveSummary, find_matching_folder, folder_matches, load_hierarchy,
    save_hierarchy,
};
pub use layout::{ProjectLocation, StoreLayout, sanitize_file_name};
pub use record::{ApplyCounts, ContainerRecord, SubItemRecord, SubItemValue};
