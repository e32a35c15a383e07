//! Output generation for the run's admitted articles.
//!
//! One [`NewsSheet`](crate::models::NewsSheet) is written per source per
//! run as a JSON file under a date-keyed directory:
//!
//! ```text
//! json_output_dir/
//! └── 2025-08-12/
//!     ├── inquirer.json
//!     ├── businessmirror.json
//!     └── philstar.json
//! ```
//!
//! The JSON sink is the pipeline's downstream boundary; everything past it
//! (spreadsheets, cloud upload) is somebody else's job.

pub mod json;
