pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("cannot lay out an empty tech tree")]
    EmptyGraph,

    #[error("no layout has been built yet")]
    NotBuilt,
}
