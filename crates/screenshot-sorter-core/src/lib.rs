pub mod annotate;
pub mod config;
pub mod engine;
pub mod error;
pub mod font;
pub mod planner;
pub mod progress;
pub mod record;
pub mod report;
pub mod scanner;

pub use annotate::{Annotator, StatusText};
pub use config::AppConfig;
pub use engine::{OrganizeEngine, OrganizeResult, Preview};
pub use error::{AnnotateError, Error, MalformedName};
pub use progress::{ProgressReporter, SilentReporter};
