use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("address has no outbound transactions and therefore no realized activity")]
    EmptyOutbound,

    #[error("data provider failed: {0}")]
    Provider(#[from] anyhow::Error),
}
