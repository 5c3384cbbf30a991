pub mod estimators;
pub mod precision;
