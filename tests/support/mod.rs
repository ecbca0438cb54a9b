pub mod png;
pub mod skinalyze_env;
