//! Generated artifacts.

use bitflags::bitflags;

bitflags! {
    /// Artifacts a verbatim code fragment is inserted into.
    ///
    /// ```
    /// use gluegen::Artifact;
    ///
    /// let both = Artifact::HEADER | Artifact::SOURCE;
    /// assert_eq!(both, Artifact::all());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Artifact: u8 {
        /// The declarations file.
        const HEADER = 1 << 0;
        /// The implementation file.
        const SOURCE = 1 << 1;
    }
}

/// Header/source pair produced by a finalized session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub header: String,
    pub source: String,
}

impl GeneratedOutput {
    /// Text of one artifact.
    pub fn artifact(&self, artifact: Artifact) -> Option<&str> {
        if artifact == Artifact::HEADER {
            Some(&self.header)
        } else if artifact == Artifact::SOURCE {
            Some(&self.source)
        } else {
            None
        }
    }
}
