use std::path::{Path, PathBuf};

/// Pre-rendered route images, one `NNN.png` per lot.
#[derive(Clone, Debug)]
pub struct RouteImages {
    dir: PathBuf,
}

impl RouteImages {
    pub fn new(dir: impl Into<PathBuf>) -> RouteImages {
        RouteImages { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lot numbers are zero padded to three digits: lot 7 is `007.png`.
    pub fn file_name(lot: u32) -> String {
        format!("{:03}.png", lot)
    }

    pub fn path(&self, lot: u32) -> PathBuf {
        self.dir.join(RouteImages::file_name(lot))
    }

    /// The image for the lot, if one was rendered.
    pub fn find(&self, lot: u32) -> Option<PathBuf> {
        let path = self.path(lot);
        path.is_file().then_some(path)
    }
}
