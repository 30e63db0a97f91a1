//! File I/O: saving, loading, and locating record folders.

mod load;
mod matching;
mod save;

pub use load::{LoadSummary, load_hierarchy};
pub use matching::{find_matching_folder, folder_matches};
pub use save::{SaveSummary, save_hierarchy};
