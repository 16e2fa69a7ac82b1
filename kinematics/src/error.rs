use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("symbol `{0}` has no value")]
    UnboundSymbol(String),

    #[error("`{0}` has no real value")]
    NotReal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
