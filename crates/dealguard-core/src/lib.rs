pub mod analytics;
pub mod audit;
pub mod cleaning;
pub mod errors;
pub mod pipeline;
pub mod readers;
pub mod results;
pub mod schema;
pub mod table;
pub mod utils;
pub mod validation;
pub mod writers;

pub use audit::{AuditRecord, RuleStatus, TransformationResult};
pub use cleaning::{clean, CleaningConfig, CleaningEngine, CleaningOutcome, TransformationRule};
pub use errors::{LoadError, RuleError};
pub use results::{Category, OverallStatus, RuleResult, Severity, Summary, ValidationReport};
pub use schema::{AllowedValues, ColumnType, ValidationSchema};
pub use table::Table;
pub use validation::{validate, ValidationEngine, ValidationRule};
