//! Data types for the record graph and its resolved output.

pub mod config;
pub mod field;
pub mod locale;
pub mod record;
pub mod resolved;

pub use config::{ResolverConfig, VisitScope};
pub use field::{ContentType, Field};
pub use locale::{Locale, Space};
pub use record::{LocaleValueMap, Record, RecordId, RecordKind, RecordSet, Value};
pub use resolved::{ResolvedNode, ResolvedSet, ResolvedValue};
