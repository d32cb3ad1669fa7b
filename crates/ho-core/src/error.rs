/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the world model. These indicate broken static data,
/// never a bad player command.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A recipe mentions an item that is not in the catalog.
    #[error("recipe \"{recipe}\" references unknown item \"{item}\"")]
    UnknownItem {
        /// The offending recipe.
        recipe: String,
        /// The item missing from the catalog.
        item: String,
    },

    /// A world was configured with a size that cannot hold a single cell.
    #[error("world of {width}x{height} is smaller than one grid cell")]
    WorldTooSmall {
        /// Requested width in world units.
        width: u32,
        /// Requested height in world units.
        height: u32,
    },
}
