pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;

pub use domain::{JobPosting, JobTable, LoadReport};
pub use error::{PipelineError, Result};
pub use pipeline::DataPipeline;
