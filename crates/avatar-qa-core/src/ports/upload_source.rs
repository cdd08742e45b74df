//! Upload source port for feeding avatar candidates into the pipeline.

use crate::domain::Upload;

/// Port for reading uploads from a source.
pub trait UploadSource: Send + Sync {
    /// Returns an iterator over uploads from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if an upload cannot be read.
    fn uploads(&self) -> Box<dyn Iterator<Item = anyhow::Result<Upload>> + Send + '_>;

    /// Returns the total number of uploads, if known.
    fn count_hint(&self) -> Option<usize>;
}
