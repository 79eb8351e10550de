pub mod types;

pub use types::{
    ComplianceMode, ComplianceVerdict, MatchStatus, NormalizedToken, ParaphrasedSection,
    ReferenceScript, ScriptUnit, SequenceError, Thresholds, UnitMatch,
};
